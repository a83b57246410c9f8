use crate::chip8_vm::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Monochrome framebuffer. Cells hold 0 (off) or 1 (on), row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBuffer {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DisplayBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Coordinates wrap modulo the buffer dimensions.
    pub fn is_on(&self, x: usize, y: usize) -> bool {
        self.cells[self.offset(x, y)] != 0
    }

    /// XORs one lit sprite bit into the cell at (x, y), wrapping both
    /// coordinates. Returns true when the cell went from on to off.
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        let offset = self.offset(x, y);
        let was_on = self.cells[offset] != 0;
        self.cells[offset] = u8::from(!was_on);
        was_on
    }

    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|cell| **cell != 0).count()
    }

    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width) {
            out.extend(row.iter().map(|cell| if *cell != 0 { '#' } else { '.' }));
            out.push('\n');
        }
        out
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y % self.height) * self.width + (x % self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_blank() {
        let display = DisplayBuffer::default();
        assert_eq!(display.cells().len(), SCREEN_WIDTH * SCREEN_HEIGHT);
        assert_eq!(display.lit_count(), 0);
    }

    #[test]
    fn toggle_reports_collision_only_when_turning_off() {
        let mut display = DisplayBuffer::new(4, 2);
        assert!(!display.toggle(1, 1));
        assert!(display.is_on(1, 1));
        assert!(display.toggle(1, 1));
        assert!(!display.is_on(1, 1));
    }

    #[test]
    fn toggle_wraps_coordinates() {
        let mut display = DisplayBuffer::new(4, 2);
        display.toggle(5, 3);
        assert!(display.is_on(1, 1));
        assert_eq!(display.cells()[5], 1);
    }

    #[test]
    fn clear_resets_every_cell() {
        let mut display = DisplayBuffer::new(4, 2);
        display.toggle(0, 0);
        display.toggle(3, 1);
        display.clear();
        assert_eq!(display.lit_count(), 0);
    }

    #[test]
    fn ascii_rendering_marks_lit_cells() {
        let mut display = DisplayBuffer::new(3, 2);
        display.toggle(2, 0);
        assert_eq!(display.to_ascii(), "..#\n...\n");
    }
}
