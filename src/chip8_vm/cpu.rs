use log::{trace, warn};
use rand::random;

use crate::chip8_vm::config::{MEMORY_SIZE, STACK_SIZE};
use crate::chip8_vm::error::{Chip8Error, StackFault};
use crate::chip8_vm::input::KeyInput;
use crate::chip8_vm::opcode::{decode, Opcode};
use crate::chip8_vm::quirks::Chip8Quirks;
use crate::chip8_vm::state::{clear_display, EmulatorState};

const FLAG_REGISTER: usize = 0xF;

fn fetch(state: &EmulatorState) -> Result<u16, Chip8Error> {
    if state.pc > (MEMORY_SIZE - 2) {
        return Err(Chip8Error::MemoryFault(state.pc));
    }

    Ok(((state.memory[state.pc] as u16) << 8) | state.memory[state.pc + 1] as u16)
}

/// Runs exactly one instruction. A faulting instruction, or one that would
/// leave PC without a full instruction word to fetch, leaves PC where it was
/// before the fetch.
pub fn execute_cycle(
    state: &mut EmulatorState,
    quirks: Chip8Quirks,
    input: &dyn KeyInput,
) -> Result<(), Chip8Error> {
    let pc_before = state.pc;
    let word = fetch(state)?;

    if !quirks.deferred_pc_increment {
        state.pc += 2;
    }

    if let Err(error) = execute_opcode(state, word, quirks, input) {
        state.pc = pc_before;
        return Err(error);
    }

    if quirks.deferred_pc_increment {
        state.pc += 2;
    }

    if state.pc > (MEMORY_SIZE - 2) {
        let next_pc = state.pc;
        state.pc = pc_before;
        return Err(Chip8Error::MemoryFault(next_pc));
    }

    Ok(())
}

/// Decrements both timers once; called by the host at 60 Hz.
pub fn tick_timers(state: &mut EmulatorState, mut sound_callback: Option<&mut dyn FnMut()>) {
    state.delay_timer = state.delay_timer.saturating_sub(1);

    if state.sound_timer > 0 {
        state.sound_timer -= 1;
        if let Some(callback) = sound_callback.as_mut() {
            callback();
        }
    }
}

pub fn execute_opcode(
    state: &mut EmulatorState,
    word: u16,
    quirks: Chip8Quirks,
    input: &dyn KeyInput,
) -> Result<(), Chip8Error> {
    state.op = word;
    let opcode = decode(word);
    trace!("pc=0x{:03x} op=0x{word:04x}", state.pc);

    match opcode.address {
        0x0 => handle_family_0(state, opcode),
        0x1 => jump(state, opcode.nnn as usize),
        0x2 => handle_opcode_2nnn_call(state, opcode),
        0x3 => {
            if state.registers[opcode.x] == opcode.kk {
                state.pc += 2;
            }
            Ok(())
        }
        0x4 => {
            if state.registers[opcode.x] != opcode.kk {
                state.pc += 2;
            }
            Ok(())
        }
        0x5 => handle_opcode_5xy0_skip_eq_register(state, opcode),
        0x6 => {
            state.registers[opcode.x] = opcode.kk;
            Ok(())
        }
        0x7 => {
            state.registers[opcode.x] = state.registers[opcode.x].wrapping_add(opcode.kk);
            Ok(())
        }
        0x8 => handle_family_8(state, opcode, quirks),
        0x9 => handle_opcode_9xy0_skip_neq_register(state, opcode),
        0xA => {
            state.index = opcode.nnn as usize;
            Ok(())
        }
        0xB => {
            let offset_register = if quirks.jump_with_vx { opcode.x } else { 0 };
            jump(
                state,
                opcode.nnn as usize + state.registers[offset_register] as usize,
            )
        }
        0xC => {
            state.registers[opcode.x] = random::<u8>() & opcode.kk;
            Ok(())
        }
        0xD => handle_opcode_dxyn_draw(state, opcode, quirks),
        0xE => handle_family_e(state, opcode, input),
        0xF => handle_family_f(state, opcode, quirks, input),
        _ => unimplemented_opcode(word),
    }
}

fn unimplemented_opcode(word: u16) -> Result<(), Chip8Error> {
    warn!("unimplemented opcode 0x{word:04x}, skipping");
    Ok(())
}

fn jump(state: &mut EmulatorState, target: usize) -> Result<(), Chip8Error> {
    if target > (MEMORY_SIZE - 2) {
        return Err(Chip8Error::MemoryFault(target));
    }

    state.pc = target;
    Ok(())
}

fn handle_family_0(state: &mut EmulatorState, opcode: Opcode) -> Result<(), Chip8Error> {
    match opcode.nnn {
        0x0E0 => {
            clear_display(state);
            Ok(())
        }
        0x0EE => {
            if state.sp == 0 {
                return Err(Chip8Error::StackFault(StackFault::Underflow));
            }
            state.pc = state.stack[state.sp] as usize;
            state.sp -= 1;
            Ok(())
        }
        _ => unimplemented_opcode(state.op),
    }
}

fn handle_opcode_2nnn_call(state: &mut EmulatorState, opcode: Opcode) -> Result<(), Chip8Error> {
    if state.sp >= STACK_SIZE - 1 {
        return Err(Chip8Error::StackFault(StackFault::Overflow));
    }

    let return_address = state.pc as u16;
    jump(state, opcode.nnn as usize)?;
    state.sp += 1;
    state.stack[state.sp] = return_address;
    Ok(())
}

fn handle_opcode_5xy0_skip_eq_register(
    state: &mut EmulatorState,
    opcode: Opcode,
) -> Result<(), Chip8Error> {
    if opcode.n != 0 {
        return unimplemented_opcode(state.op);
    }

    if state.registers[opcode.x] == state.registers[opcode.y] {
        state.pc += 2;
    }

    Ok(())
}

fn handle_family_8(
    state: &mut EmulatorState,
    opcode: Opcode,
    quirks: Chip8Quirks,
) -> Result<(), Chip8Error> {
    let x_reg = opcode.x;
    let vx = state.registers[x_reg];
    let vy = state.registers[opcode.y];
    let shift_source = if quirks.shift_uses_vy { vy } else { vx };

    match opcode.n {
        0x0 => state.registers[x_reg] = vy,
        0x1 => state.registers[x_reg] = vx | vy,
        0x2 => state.registers[x_reg] = vx & vy,
        0x3 => state.registers[x_reg] = vx ^ vy,
        0x4 => {
            let (result, carry) = vx.overflowing_add(vy);
            state.registers[FLAG_REGISTER] = u8::from(carry);
            state.registers[x_reg] = result;
        }
        0x5 => {
            state.registers[FLAG_REGISTER] = u8::from(vx > vy);
            state.registers[x_reg] = vx.wrapping_sub(vy);
        }
        0x6 => {
            state.registers[FLAG_REGISTER] = shift_source & 0x1;
            state.registers[x_reg] = shift_source >> 1;
        }
        0x7 => {
            state.registers[FLAG_REGISTER] = u8::from(vy > vx);
            state.registers[x_reg] = vy.wrapping_sub(vx);
        }
        0xE => {
            state.registers[FLAG_REGISTER] = (shift_source >> 7) & 0x1;
            state.registers[x_reg] = shift_source << 1;
        }
        _ => return unimplemented_opcode(state.op),
    }

    Ok(())
}

fn handle_opcode_9xy0_skip_neq_register(
    state: &mut EmulatorState,
    opcode: Opcode,
) -> Result<(), Chip8Error> {
    if opcode.n != 0 {
        return unimplemented_opcode(state.op);
    }

    if state.registers[opcode.x] != state.registers[opcode.y] {
        state.pc += 2;
    }

    Ok(())
}

fn handle_opcode_dxyn_draw(
    state: &mut EmulatorState,
    opcode: Opcode,
    quirks: Chip8Quirks,
) -> Result<(), Chip8Error> {
    let height = opcode.n as usize;
    if state.index + height > MEMORY_SIZE {
        return Err(Chip8Error::MemoryFault(state.index + height - 1));
    }

    let width_limit = state.display.width();
    let height_limit = state.display.height();
    let x_start = (state.registers[opcode.x] as usize) % width_limit;
    let y_start = (state.registers[opcode.y] as usize) % height_limit;

    let mut collision = false;

    for row in 0..height {
        let y_pos = y_start + row;
        if !quirks.draw_wrap && y_pos >= height_limit {
            break;
        }

        let sprite_row = state.memory[state.index + row];

        for bit in 0..8 {
            let x_pos = x_start + bit;
            if !quirks.draw_wrap && x_pos >= width_limit {
                break;
            }

            if (sprite_row >> (7 - bit)) & 0x1 == 0 {
                continue;
            }

            collision |= state.display.toggle(x_pos, y_pos);
        }
    }

    state.registers[FLAG_REGISTER] = u8::from(collision);

    Ok(())
}

fn handle_family_e(
    state: &mut EmulatorState,
    opcode: Opcode,
    input: &dyn KeyInput,
) -> Result<(), Chip8Error> {
    let key = state.registers[opcode.x] & 0x0F;

    match opcode.kk {
        0x9E => {
            if input.is_key_down(key) {
                state.pc += 2;
            }
            Ok(())
        }
        0xA1 => {
            if !input.is_key_down(key) {
                state.pc += 2;
            }
            Ok(())
        }
        _ => unimplemented_opcode(state.op),
    }
}

fn ensure_addressable(last_address: usize) -> Result<(), Chip8Error> {
    if last_address >= MEMORY_SIZE {
        return Err(Chip8Error::MemoryFault(last_address));
    }
    Ok(())
}

fn handle_family_f(
    state: &mut EmulatorState,
    opcode: Opcode,
    quirks: Chip8Quirks,
    input: &dyn KeyInput,
) -> Result<(), Chip8Error> {
    let x_reg = opcode.x;

    match opcode.kk {
        0x07 => state.registers[x_reg] = state.delay_timer,
        0x0A => {
            if let Some(key) = input.first_pressed_key() {
                state.registers[x_reg] = key;
            } else {
                state.pc = state.pc.saturating_sub(2);
            }
        }
        0x15 => state.delay_timer = state.registers[x_reg],
        0x18 => state.sound_timer = state.registers[x_reg],
        0x1E => {
            let index = state.index + state.registers[x_reg] as usize;
            ensure_addressable(index)?;
            state.index = index;
        }
        0x29 => {
            let digit = (state.registers[x_reg] & 0x0F) as usize;
            state.index = state.font_offsets[digit];
        }
        0x33 => {
            ensure_addressable(state.index + 2)?;
            let value = state.registers[x_reg];
            state.memory[state.index] = value / 100;
            state.memory[state.index + 1] = (value % 100) / 10;
            state.memory[state.index + 2] = value % 10;
        }
        0x55 => {
            ensure_addressable(state.index + x_reg)?;
            let base = state.index;
            state.memory[base..=base + x_reg].copy_from_slice(&state.registers[..=x_reg]);
            if quirks.load_store_increment_i {
                state.index = (base + x_reg + 1) & 0x0FFF;
            }
        }
        0x65 => {
            ensure_addressable(state.index + x_reg)?;
            let base = state.index;
            state.registers[..=x_reg].copy_from_slice(&state.memory[base..=base + x_reg]);
            if quirks.load_store_increment_i {
                state.index = (base + x_reg + 1) & 0x0FFF;
            }
        }
        _ => return unimplemented_opcode(state.op),
    }

    Ok(())
}
