pub mod chip8_vm;

pub use chip8_vm::app::{run_emulator_app, run_emulator_headless};
pub use chip8_vm::cpu::{execute_cycle, execute_opcode, tick_timers};
pub use chip8_vm::display::DisplayBuffer;
pub use chip8_vm::error::{Chip8Error, StackFault};
pub use chip8_vm::input::{KeyInput, Keypad, NoInput};
pub use chip8_vm::opcode::{decode, Opcode};
pub use chip8_vm::quirks::{
    load_quirks_profile, load_quirks_profile_from_env, Chip8Quirks, MODERN_QUIRKS,
    ORIGINAL_QUIRKS, STANDARD_QUIRKS,
};
pub use chip8_vm::scaler::{scale, scale_to_presentation_buffer, Resolution};
pub use chip8_vm::state::{
    clear_display, create_state, display_snapshot, load_program, load_rom, reset_state,
    EmulatorState,
};
