// Chordkeys Pressed Code State
// Device codes currently held on the virtual keyboard

use std::collections::BTreeSet;

/// Codes the virtual device has pressed and not yet released
#[derive(Debug, Clone, Default)]
pub struct PressedCodes {
    pressed: BTreeSet<u16>,
}

impl PressedCodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a write; `value` is the evdev key value
    pub fn record(&mut self, code: u16, value: i32) {
        match value {
            0 => {
                self.pressed.remove(&code);
            }
            1 => {
                self.pressed.insert(code);
            }
            _ => {}
        }
    }

    pub fn is_pressed(&self, code: u16) -> bool {
        self.pressed.contains(&code)
    }

    /// Remove and return every held code, highest first
    pub fn take_all(&mut self) -> Vec<u16> {
        let codes = self.pressed.iter().rev().copied().collect();
        self.pressed.clear();
        codes
    }

    pub fn len(&self) -> usize {
        self.pressed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }
}
