use crate::chip8_vm::display::DisplayBuffer;
use crate::chip8_vm::error::Chip8Error;
use crate::chip8_vm::state::EmulatorState;

pub const PIXEL_ON: u8 = 255;
pub const PIXEL_OFF: u8 = 0;

/// Device-side geometry of a presentation surface. `stride` is bytes per
/// pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: usize,
    pub height: usize,
    pub stride: usize,
}

impl Resolution {
    pub fn new(width: usize, height: usize, stride: usize) -> Self {
        Self {
            width,
            height,
            stride,
        }
    }

    pub fn buffer_len(&self) -> usize {
        self.width * self.height * self.stride
    }
}

fn scale_factor(logical: usize, output: usize) -> Option<usize> {
    if logical == 0 || output == 0 || output % logical != 0 {
        return None;
    }
    Some(output / logical)
}

/// Expands every logical cell into a `sx * sy` block of `stride`-byte
/// pixels, 255 for lit cells and 0 otherwise.
pub fn scale(display: &DisplayBuffer, resolution: Resolution) -> Result<Vec<u8>, Chip8Error> {
    let invalid = || Chip8Error::InvalidScale {
        logical: (display.width(), display.height()),
        output: (resolution.width, resolution.height),
    };

    let sx = scale_factor(display.width(), resolution.width).ok_or_else(invalid)?;
    let sy = scale_factor(display.height(), resolution.height).ok_or_else(invalid)?;
    if resolution.stride == 0 {
        return Err(Chip8Error::InvalidArgument("stride must be > 0"));
    }

    let row_bytes = resolution.width * resolution.stride;
    let block_bytes = sx * resolution.stride;
    let mut pixels = Vec::with_capacity(resolution.buffer_len());
    let mut device_row = vec![PIXEL_OFF; row_bytes];

    for logical_row in display.cells().chunks(display.width()) {
        for (cell, block) in logical_row.iter().zip(device_row.chunks_mut(block_bytes)) {
            block.fill(if *cell != 0 { PIXEL_ON } else { PIXEL_OFF });
        }
        for _ in 0..sy {
            pixels.extend_from_slice(&device_row);
        }
    }

    Ok(pixels)
}

pub fn scale_to_presentation_buffer(
    state: &EmulatorState,
    resolution: Resolution,
) -> Result<Vec<u8>, Chip8Error> {
    scale(&state.display, resolution)
}
