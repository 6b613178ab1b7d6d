/// Errors surfaced by the VM's public API.
///
/// Stack faults and unrecognized opcodes never appear here: the interpreter
/// clamps or skips those and keeps running, logging a diagnostic instead.
#[derive(Debug, thiserror::Error)]
pub enum VmError {
    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("ROM could not be read")]
    RomUnreadable(#[source] std::io::Error),

    #[error("invalid key index {index}, keypad has 16 keys")]
    InvalidKey { index: usize },
}

pub type Result<T> = std::result::Result<T, VmError>;
