use std::fs;
use std::path::Path;

use log::debug;

use crate::chip8_vm::config::{
    FONT_BYTES, FONT_GLYPH_BYTES, FONT_GLYPH_COUNT, FONT_START, MAX_PROGRAM_SIZE, MEMORY_SIZE,
    PROGRAM_START, REGISTER_COUNT, STACK_SIZE,
};
use crate::chip8_vm::display::DisplayBuffer;
use crate::chip8_vm::error::Chip8Error;

/// All mutable machine state. `sp` indexes the most recently pushed stack
/// slot; slot 0 is never written, so 0 means empty and `STACK_SIZE - 1`
/// means full.
#[derive(Debug, Clone)]
pub struct EmulatorState {
    pub memory: [u8; MEMORY_SIZE],
    pub registers: [u8; REGISTER_COUNT],
    pub stack: [u16; STACK_SIZE],
    pub sp: usize,
    pub display: DisplayBuffer,
    pub pc: usize,
    pub index: usize,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub font_offsets: [usize; FONT_GLYPH_COUNT],
    pub op: u16,
    program: Vec<u8>,
}

impl Default for EmulatorState {
    fn default() -> Self {
        let mut state = Self {
            memory: [0; MEMORY_SIZE],
            registers: [0; REGISTER_COUNT],
            stack: [0; STACK_SIZE],
            sp: 0,
            display: DisplayBuffer::default(),
            pc: PROGRAM_START,
            index: 0,
            delay_timer: 0,
            sound_timer: 0,
            font_offsets: [0; FONT_GLYPH_COUNT],
            op: 0,
            program: Vec::new(),
        };
        load_font(&mut state);
        state
    }
}

pub fn create_state(rom_path: Option<&Path>) -> Result<EmulatorState, Chip8Error> {
    let mut state = EmulatorState::default();
    if let Some(path) = rom_path {
        load_rom(&mut state, path)?;
    }
    Ok(state)
}

/// Returns the machine to power-on state and re-copies the last loaded
/// program image.
pub fn reset_state(state: &mut EmulatorState) {
    state.memory = [0; MEMORY_SIZE];
    state.registers = [0; REGISTER_COUNT];
    state.stack = [0; STACK_SIZE];
    state.sp = 0;
    clear_display(state);

    state.pc = PROGRAM_START;
    state.index = 0;
    state.delay_timer = 0;
    state.sound_timer = 0;
    state.op = 0;

    load_font(state);

    let end = PROGRAM_START + state.program.len();
    state.memory[PROGRAM_START..end].copy_from_slice(&state.program);
    debug!("reset state, {} program bytes restored", state.program.len());
}

pub fn clear_display(state: &mut EmulatorState) {
    state.display.clear();
}

pub fn load_font(state: &mut EmulatorState) {
    for (digit, glyph) in FONT_BYTES.chunks(FONT_GLYPH_BYTES).enumerate() {
        let offset = FONT_START + digit * FONT_GLYPH_BYTES;
        state.memory[offset..offset + glyph.len()].copy_from_slice(glyph);
        state.font_offsets[digit] = offset;
    }
}

/// Copies a raw program image to `PROGRAM_START`. Oversized images are
/// rejected before any byte is written.
pub fn load_program(state: &mut EmulatorState, bytes: &[u8]) -> Result<(), Chip8Error> {
    if bytes.len() > MAX_PROGRAM_SIZE {
        return Err(Chip8Error::LoadTooLarge {
            size: bytes.len(),
            max: MAX_PROGRAM_SIZE,
        });
    }

    let end = PROGRAM_START + bytes.len();
    state.memory[PROGRAM_START..end].copy_from_slice(bytes);
    state.program = bytes.to_vec();
    debug!("loaded program into 0x{PROGRAM_START:03x}..0x{end:03x}");

    Ok(())
}

pub fn load_rom(state: &mut EmulatorState, path: &Path) -> Result<(), Chip8Error> {
    let rom_bytes = fs::read(path)?;
    load_program(state, &rom_bytes)?;
    debug!("read {} bytes from {}", rom_bytes.len(), path.display());
    Ok(())
}

pub fn display_snapshot(state: &EmulatorState) -> &DisplayBuffer {
    &state.display
}
