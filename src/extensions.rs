//! The Legacy/Modern behavioral switch and the sprite edge policy.
//!
//! Four instruction families changed semantics between the original
//! interpreter and its later descendants. The mode is fixed when the VM is
//! built and only changes via an explicit reload; individual instructions
//! query it through the predicates below rather than matching on the variant.

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExtensionMode {
    /// Original interpreter rules.
    #[default]
    Legacy,
    /// Rules of the later interpreter lineage.
    Modern,
}

impl ExtensionMode {
    /// OR/AND/XOR zero VF as a side effect under Legacy rules.
    pub fn clears_flag_on_logic(self) -> bool {
        self == ExtensionMode::Legacy
    }

    /// Modern shifts operate on Vx in place; Legacy shifts read Vy.
    pub fn shifts_in_place(self) -> bool {
        self == ExtensionMode::Modern
    }

    /// Legacy bulk register store/load advances I past the copied range.
    pub fn increments_index_on_transfer(self) -> bool {
        self == ExtensionMode::Legacy
    }

    /// Modern jump-with-offset adds NNN to Vx instead of V0.
    pub fn offset_jump_uses_vx(self) -> bool {
        self == ExtensionMode::Modern
    }
}

/// What a sprite does when its body crosses the display edge. The origin
/// always wraps; this only governs pixels past the right/bottom border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SpriteEdge {
    /// Stop drawing at the edge.
    #[default]
    Clip,
    /// Continue on the opposite side.
    Wrap,
}
