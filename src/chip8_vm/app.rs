use std::path::Path;
use std::time::Instant;

use log::{debug, info};

use crate::chip8_vm::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::chip8_vm::cpu::{execute_cycle, tick_timers};
use crate::chip8_vm::display::DisplayBuffer;
use crate::chip8_vm::error::Chip8Error;
use crate::chip8_vm::input::{Keypad, NoInput};
use crate::chip8_vm::quirks::Chip8Quirks;
use crate::chip8_vm::scaler::{scale, Resolution};
use crate::chip8_vm::state::{create_state, EmulatorState};

pub fn run_emulator_headless(
    quirks: Chip8Quirks,
    rom_path: &Path,
    max_cycles: usize,
    cpu_hz: usize,
) -> Result<EmulatorState, Chip8Error> {
    if max_cycles == 0 {
        return Err(Chip8Error::InvalidArgument("max_cycles must be > 0"));
    }
    if cpu_hz == 0 {
        return Err(Chip8Error::InvalidArgument("cpu_hz must be > 0"));
    }

    let mut state = create_state(Some(rom_path))?;
    let cycles_per_timer_tick = usize::max(1, cpu_hz / 60);

    for i in 0..max_cycles {
        execute_cycle(&mut state, quirks, &NoInput)?;

        if ((i + 1) % cycles_per_timer_tick) == 0 {
            tick_timers(&mut state, None);
        }
    }

    debug!("headless run finished after {max_cycles} cycles");
    Ok(state)
}

fn peek_word(state: &EmulatorState) -> Option<u16> {
    let high = *state.memory.get(state.pc)?;
    let low = *state.memory.get(state.pc + 1)?;
    Some(((high as u16) << 8) | low as u16)
}

pub fn run_emulator_app(
    quirks: Chip8Quirks,
    rom_path: &Path,
    scale_factor: usize,
    cpu_hz: usize,
    target_fps: usize,
) -> Result<EmulatorState, Chip8Error> {
    use raylib::prelude::{Color, Image, KeyboardKey, RaylibDraw};

    if scale_factor == 0 {
        return Err(Chip8Error::InvalidArgument("scale must be > 0"));
    }
    if cpu_hz == 0 {
        return Err(Chip8Error::InvalidArgument("cpu_hz must be > 0"));
    }
    if target_fps == 0 {
        return Err(Chip8Error::InvalidArgument("target_fps must be > 0"));
    }

    let mut state = create_state(Some(rom_path))?;
    let mut keypad = Keypad::default();

    // RGBA8 so the scaled buffer can be uploaded to the texture as is.
    let resolution = Resolution::new(SCREEN_WIDTH * scale_factor, SCREEN_HEIGHT * scale_factor, 4);
    let (mut rl, thread) = raylib::init()
        .size(resolution.width as i32, resolution.height as i32)
        .title("chip8-vm-rs")
        .build();
    rl.set_target_fps(target_fps as u32);
    let image = Image::gen_image_color(
        resolution.width as i32,
        resolution.height as i32,
        Color::BLACK,
    );
    let mut texture = rl
        .load_texture_from_image(&thread, &image)
        .map_err(|error| Chip8Error::Presentation(error.to_string()))?;
    info!(
        "window {}x{}, {cpu_hz} Hz, {target_fps} fps",
        resolution.width, resolution.height
    );

    let key_map = [
        (KeyboardKey::KEY_ONE, 0x1u8),
        (KeyboardKey::KEY_TWO, 0x2),
        (KeyboardKey::KEY_THREE, 0x3),
        (KeyboardKey::KEY_FOUR, 0xC),
        (KeyboardKey::KEY_Q, 0x4),
        (KeyboardKey::KEY_W, 0x5),
        (KeyboardKey::KEY_E, 0x6),
        (KeyboardKey::KEY_R, 0xD),
        (KeyboardKey::KEY_A, 0x7),
        (KeyboardKey::KEY_S, 0x8),
        (KeyboardKey::KEY_D, 0x9),
        (KeyboardKey::KEY_F, 0xE),
        (KeyboardKey::KEY_Z, 0xA),
        (KeyboardKey::KEY_X, 0x0),
        (KeyboardKey::KEY_C, 0xB),
        (KeyboardKey::KEY_V, 0xF),
    ];

    let cycle_interval = 1.0f32 / cpu_hz as f32;
    let timer_interval = 1.0f32 / 60.0;
    let max_cycles_per_frame = usize::max(1, (cpu_hz / target_fps) * 3);
    let mut accumulated_time = 0.0f32;
    let mut timer_accumulated_time = 0.0f32;
    let mut front_buffer: DisplayBuffer = state.display.clone();
    let mut previous_tick = Instant::now();
    let mut frame_in_progress_after_clear = false;
    let mut has_draw_since_clear = false;

    while !rl.window_should_close() {
        if rl.is_key_pressed(KeyboardKey::KEY_ESCAPE) {
            break;
        }

        if rl.is_window_focused() {
            for (key, mapped) in key_map {
                keypad.set_key_state(mapped, rl.is_key_down(key));
            }
        } else {
            keypad.release_all();
        }

        let now = Instant::now();
        let frame_dt = (now - previous_tick).as_secs_f32().min(0.1);
        previous_tick = now;
        accumulated_time += frame_dt;
        timer_accumulated_time += frame_dt;

        let mut cycles_run = 0;
        while accumulated_time >= cycle_interval && cycles_run < max_cycles_per_frame {
            // CLS-framed ROMs: publish the completed frame right before the
            // next clear starts the following one.
            if peek_word(&state) == Some(0x00E0) && has_draw_since_clear {
                front_buffer.clone_from(&state.display);
                has_draw_since_clear = false;
            }

            let pc_before = state.pc;
            execute_cycle(&mut state, quirks, &keypad)?;
            if state.op == 0x00E0 {
                frame_in_progress_after_clear = true;
                has_draw_since_clear = false;
            }
            if (state.op & 0xF000) == 0xD000 {
                if frame_in_progress_after_clear {
                    has_draw_since_clear = true;
                } else {
                    front_buffer.clone_from(&state.display);
                }
            }
            // A ROM parked on Fx0A after drawing still gets its frame shown.
            if (state.op & 0xF0FF) == 0xF00A && state.pc == pc_before && has_draw_since_clear {
                front_buffer.clone_from(&state.display);
                has_draw_since_clear = false;
            }
            accumulated_time -= cycle_interval;
            cycles_run += 1;
        }

        while timer_accumulated_time >= timer_interval {
            tick_timers(&mut state, None);
            timer_accumulated_time -= timer_interval;
        }

        let pixels = scale(&front_buffer, resolution)?;

        texture
            .update_texture(&pixels)
            .map_err(|error| Chip8Error::Presentation(error.to_string()))?;

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        d.draw_texture(&texture, 0, 0, Color::WHITE);
    }

    Ok(state)
}
