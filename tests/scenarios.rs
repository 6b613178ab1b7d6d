//! Multi-instruction programs driven through the public API.

use chip8_vm::conf::{FONTSET, MAX_ROM_SIZE};
use chip8_vm::{Chip8Vm, ExtensionMode, SpriteEdge, VmError, VmOptions};

fn vm(mode: ExtensionMode) -> Chip8Vm {
    Chip8Vm::new(VmOptions {
        mode,
        edge: SpriteEdge::Clip,
        cycles_per_frame: 1,
    })
}

#[test]
fn two_set_const_instructions() {
    let mut vm = vm(ExtensionMode::Legacy);
    vm.load(&[0x60, 0x05, 0x61, 0x05]).unwrap();

    vm.tick();
    vm.tick();

    assert_eq!(vm.register(0), 5);
    assert_eq!(vm.register(1), 5);
    assert_eq!(vm.pc(), 0x204);
}

#[test]
fn drawing_the_zero_glyph_from_font_memory() {
    let mut vm = vm(ExtensionMode::Legacy);
    // I = 0x000 (glyph '0'), then draw 5 rows at (V0, V0) = (0, 0).
    vm.load(&[0xA0, 0x00, 0xD0, 0x05]).unwrap();

    vm.tick();
    assert_eq!(vm.index(), 0x000);
    vm.tick();

    assert_eq!(vm.register(0xF), 0);
    let fb = vm.framebuffer();
    for (row, &bits) in FONTSET[..5].iter().enumerate() {
        for col in 0..8 {
            let expected = bits & (0b1000_0000 >> col) != 0;
            assert_eq!(fb.get(col, row), expected, "pixel ({col}, {row})");
        }
    }
}

#[test]
fn call_then_return_resumes_after_the_call() {
    let mut vm = vm(ExtensionMode::Legacy);
    // 0x200: CALL 0x300; 0x300: RET.
    let mut rom = vec![0u8; 0x102];
    rom[0] = 0x23;
    rom[1] = 0x00;
    rom[0x100] = 0x00;
    rom[0x101] = 0xEE;
    vm.load(&rom).unwrap();

    vm.tick();
    assert_eq!(vm.pc(), 0x300);
    vm.tick();
    assert_eq!(vm.pc(), 0x202);
}

#[test]
fn counting_loop_with_skip_exit() {
    // V0 counts to 3, then the SE skips the back-jump.
    //   0x200: LD V0, 0
    //   0x202: ADD V0, 1
    //   0x204: SE V0, 3
    //   0x206: JP 0x202
    //   0x208: (exit)
    let mut vm = vm(ExtensionMode::Legacy);
    vm.load(&[0x60, 0x00, 0x70, 0x01, 0x30, 0x03, 0x12, 0x02])
        .unwrap();

    for _ in 0..64 {
        if vm.pc() == 0x208 {
            break;
        }
        vm.tick();
    }

    assert_eq!(vm.register(0), 3);
    assert_eq!(vm.pc(), 0x208);
}

#[test]
fn bcd_dump_load_pipeline() {
    // Store BCD of V0 = 254 at I = 0x400, then read the digits back into
    // V0..V2 with a bulk load.
    let mut vm = vm(ExtensionMode::Modern);
    vm.load(&[0x60, 0xFE, 0xA4, 0x00, 0xF0, 0x33, 0xF2, 0x65])
        .unwrap();

    for _ in 0..4 {
        vm.tick();
    }

    assert_eq!(vm.register(0), 2);
    assert_eq!(vm.register(1), 5);
    assert_eq!(vm.register(2), 4);
    // Modern mode leaves I where it was.
    assert_eq!(vm.index(), 0x400);
}

#[test]
fn exact_fit_rom_loads_and_runs() {
    let mut rom = vec![0u8; MAX_ROM_SIZE];
    rom[0] = 0x61; // LD V1, 0x44
    rom[1] = 0x44;
    let mut vm = vm(ExtensionMode::Legacy);
    vm.load(&rom).unwrap();
    vm.tick();
    assert_eq!(vm.register(1), 0x44);

    let mut vm2 = Chip8Vm::default();
    let oversized = vec![0u8; MAX_ROM_SIZE + 1];
    assert!(matches!(
        vm2.load(&oversized),
        Err(VmError::RomTooLarge { .. })
    ));
}

#[test]
fn frame_batching_runs_the_configured_cycle_count() {
    let mut vm = Chip8Vm::new(VmOptions {
        mode: ExtensionMode::Legacy,
        edge: SpriteEdge::Clip,
        cycles_per_frame: 7,
    });
    // ADD V0, 1 then jump back, forever.
    vm.load(&[0x70, 0x01, 0x12, 0x00]).unwrap();

    vm.run_frame();
    // Each loop pass is two cycles, so 7 cycles advance V0 four times
    // (the eighth cycle would complete the jump, not the add).
    assert_eq!(vm.register(0), 4);
}

#[test]
fn sound_timer_drives_the_audio_signal() {
    let mut vm = vm(ExtensionMode::Legacy);
    vm.load(&[0x60, 0x02, 0xF0, 0x18]).unwrap(); // ST = 2
    vm.tick();
    vm.tick();

    assert!(vm.sound_active());
    vm.tick_timers();
    assert!(vm.sound_active());
    vm.tick_timers();
    assert!(!vm.sound_active());
}
