use crate::chip8_vm::config::KEY_COUNT;

/// Source of keypad state queried by Ex9E, ExA1 and Fx0A.
pub trait KeyInput {
    fn is_key_down(&self, key: u8) -> bool;

    fn first_pressed_key(&self) -> Option<u8> {
        (0..KEY_COUNT as u8).find(|key| self.is_key_down(*key))
    }
}

/// Host-driven hex keypad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn set_key_state(&mut self, key: u8, is_pressed: bool) {
        if let Some(slot) = self.keys.get_mut(key as usize) {
            *slot = is_pressed;
        }
    }

    /// Drops every held key, e.g. when the host window loses focus.
    pub fn release_all(&mut self) {
        self.keys = [false; KEY_COUNT];
    }
}

impl KeyInput for Keypad {
    fn is_key_down(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }
}

/// Keypad with nothing ever pressed, for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl KeyInput for NoInput {
    fn is_key_down(&self, _key: u8) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypad_tracks_presses() {
        let mut keypad = Keypad::default();
        keypad.set_key_state(0xA, true);
        assert!(keypad.is_key_down(0xA));
        assert_eq!(keypad.first_pressed_key(), Some(0xA));

        keypad.set_key_state(0xA, false);
        assert_eq!(keypad.first_pressed_key(), None);
    }

    #[test]
    fn out_of_range_keys_are_ignored() {
        let mut keypad = Keypad::default();
        keypad.set_key_state(16, true);
        keypad.set_key_state(0xFF, true);
        assert_eq!(keypad, Keypad::default());
        assert!(!keypad.is_key_down(16));
        assert!(!keypad.is_key_down(0xFF));
    }

    #[test]
    fn first_pressed_key_picks_lowest() {
        let mut keypad = Keypad::default();
        keypad.set_key_state(0x7, true);
        keypad.set_key_state(0x3, true);
        assert_eq!(keypad.first_pressed_key(), Some(0x3));
        keypad.release_all();
        assert_eq!(keypad.first_pressed_key(), None);
    }

    #[test]
    fn no_input_never_reports_keys() {
        assert!((0..16).all(|key| !NoInput.is_key_down(key)));
    }
}
