// Chordkeys Synthetic Keyboard
// Expands logical output edges into device-level key events

use smallvec::SmallVec;

use crate::state::KeyRegistry;
use crate::{EdgeCommand, KeyEvent, LogicalKey};

const SHIFT: LogicalKey = LogicalKey::LeftShift;

/// Mirror of the synthetic output device.
///
/// Every logical edge passes through `emit`, which turns symbol keys
/// (`!`, `{`, ...) into shift + base-key events and drops any repeat or
/// release for a key the output never saw pressed. A key held by several
/// sources at once (a plain press, a mapping, a symbol's base) is written
/// once and released when the last of them lets go. The output-side
/// registry reflects what the device currently holds.
#[derive(Debug, Clone)]
pub struct SyntheticKeyboard {
    registry: KeyRegistry,
    /// Symbols currently relying on a synthetic shift
    shift_holders: SmallVec<[LogicalKey; 4]>,
    /// Shift was pressed by this keyboard, not forwarded from the user
    shift_owned: bool,
    /// One entry per additional holder of a key already down
    extra_holds: SmallVec<[LogicalKey; 4]>,
}

impl SyntheticKeyboard {
    pub fn new() -> Self {
        Self {
            registry: KeyRegistry::new(),
            shift_holders: SmallVec::new(),
            shift_owned: false,
            extra_holds: SmallVec::new(),
        }
    }

    /// Output-side registry
    pub fn registry(&self) -> &KeyRegistry {
        &self.registry
    }

    pub fn is_down(&self, key: LogicalKey) -> bool {
        self.registry.is_down(key)
    }

    /// Expand one logical edge, appending device events to `out`
    pub fn emit(&mut self, event: KeyEvent, out: &mut Vec<KeyEvent>) {
        match event.key.unshifted_variant() {
            Some(base) => self.emit_symbol(event.key, base, event.command, out),
            None => self.emit_plain(event.key, event.command, out),
        }
    }

    /// Expand a batch of logical edges in order
    pub fn emit_all(&mut self, events: impl IntoIterator<Item = KeyEvent>) -> Vec<KeyEvent> {
        let mut out = Vec::new();
        for event in events {
            self.emit(event, &mut out);
        }
        out
    }

    fn emit_plain(&mut self, key: LogicalKey, command: EdgeCommand, out: &mut Vec<KeyEvent>) {
        let down = self.registry.is_down(key);

        if key == SHIFT {
            match command {
                EdgeCommand::Press if self.shift_owned => {
                    // The user now holds the shift we synthesized
                    self.shift_owned = false;
                    return;
                }
                EdgeCommand::Release
                    if !self.shift_holders.is_empty() && !self.extra_holds.contains(&SHIFT) =>
                {
                    self.shift_owned = true;
                    return;
                }
                _ => {}
            }
        }

        match command {
            EdgeCommand::Press if down => self.extra_holds.push(key),
            EdgeCommand::Press => {
                self.registry.set_synthetic(key, true);
                out.push(KeyEvent::press(key));
            }
            EdgeCommand::Repeat if down => out.push(KeyEvent::repeat(key)),
            EdgeCommand::Release if self.release_extra(key) => {}
            EdgeCommand::Release if down => {
                self.registry.set_synthetic(key, false);
                out.push(KeyEvent::release(key));
            }
            _ => log::debug!("dropping {} {}: key is not down on the output", key, command),
        }
    }

    fn emit_symbol(
        &mut self,
        symbol: LogicalKey,
        base: LogicalKey,
        command: EdgeCommand,
        out: &mut Vec<KeyEvent>,
    ) {
        let down = self.registry.is_down(symbol);

        match command {
            EdgeCommand::Press if down => self.extra_holds.push(symbol),
            EdgeCommand::Press => {
                if !self.registry.is_down(SHIFT) {
                    self.registry.set_synthetic(SHIFT, true);
                    self.shift_owned = true;
                    out.push(KeyEvent::press(SHIFT));
                }
                if !self.shift_holders.contains(&symbol) {
                    self.shift_holders.push(symbol);
                }
                self.registry.set_synthetic(symbol, true);
                if self.registry.is_down(base) {
                    self.extra_holds.push(base);
                } else {
                    self.registry.set_synthetic(base, true);
                    out.push(KeyEvent::press(base));
                }
            }
            EdgeCommand::Repeat if down => out.push(KeyEvent::repeat(base)),
            EdgeCommand::Release if self.release_extra(symbol) => {}
            EdgeCommand::Release if down => {
                self.registry.set_synthetic(symbol, false);
                if !self.release_extra(base) {
                    self.registry.set_synthetic(base, false);
                    out.push(KeyEvent::release(base));
                }

                self.shift_holders.retain(|k| *k != symbol);
                if self.shift_holders.is_empty() && self.shift_owned {
                    self.shift_owned = false;
                    if !self.release_extra(SHIFT) {
                        self.registry.set_synthetic(SHIFT, false);
                        out.push(KeyEvent::release(SHIFT));
                    }
                }
            }
            _ => log::debug!("dropping {} {}: key is not down on the output", symbol, command),
        }
    }

    /// Drop one extra hold on `key`. Returns false if it had none.
    fn release_extra(&mut self, key: LogicalKey) -> bool {
        match self.extra_holds.iter().position(|k| *k == key) {
            Some(index) => {
                self.extra_holds.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Release events for every device key still down, clearing the mirror
    pub fn release_all(&mut self) -> Vec<KeyEvent> {
        let held = self.registry.held();
        let mut out = Vec::new();
        for key in held {
            self.registry.set_synthetic(key, false);
            if key.requires_modifier() {
                continue;
            }
            out.push(KeyEvent::release(key));
        }
        self.shift_holders.clear();
        self.shift_owned = false;
        self.extra_holds.clear();
        out
    }

    /// Close the tick on the output mirror
    pub fn advance(&mut self) {
        self.registry.advance();
    }
}

impl Default for SyntheticKeyboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_key_passes_through() {
        let mut kb = SyntheticKeyboard::new();
        let out = kb.emit_all([
            KeyEvent::press(LogicalKey::Escape),
            KeyEvent::repeat(LogicalKey::Escape),
            KeyEvent::release(LogicalKey::Escape),
        ]);
        assert_eq!(
            out,
            vec![
                KeyEvent::press(LogicalKey::Escape),
                KeyEvent::repeat(LogicalKey::Escape),
                KeyEvent::release(LogicalKey::Escape),
            ]
        );
        assert!(!kb.is_down(LogicalKey::Escape));
    }

    #[test]
    fn test_symbol_is_bracketed_by_shift() {
        let mut kb = SyntheticKeyboard::new();
        let out = kb.emit_all([
            KeyEvent::press(LogicalKey::Exclamation),
            KeyEvent::repeat(LogicalKey::Exclamation),
            KeyEvent::release(LogicalKey::Exclamation),
        ]);
        assert_eq!(
            out,
            vec![
                KeyEvent::press(LogicalKey::LeftShift),
                KeyEvent::press(LogicalKey::Num1),
                KeyEvent::repeat(LogicalKey::Num1),
                KeyEvent::release(LogicalKey::Num1),
                KeyEvent::release(LogicalKey::LeftShift),
            ]
        );
    }

    #[test]
    fn test_symbol_mirror_state() {
        let mut kb = SyntheticKeyboard::new();
        kb.emit_all([KeyEvent::press(LogicalKey::LeftBrace)]);
        assert!(kb.is_down(LogicalKey::LeftBrace));
        assert!(kb.is_down(LogicalKey::LeftBracket));
        assert!(kb.is_down(LogicalKey::LeftShift));
    }

    #[test]
    fn test_overlapping_symbols_share_shift() {
        let mut kb = SyntheticKeyboard::new();
        let out = kb.emit_all([
            KeyEvent::press(LogicalKey::LeftParen),
            KeyEvent::press(LogicalKey::RightParen),
            KeyEvent::release(LogicalKey::LeftParen),
            KeyEvent::release(LogicalKey::RightParen),
        ]);
        assert_eq!(
            out,
            vec![
                KeyEvent::press(LogicalKey::LeftShift),
                KeyEvent::press(LogicalKey::Num9),
                KeyEvent::press(LogicalKey::Num0),
                KeyEvent::release(LogicalKey::Num9),
                KeyEvent::release(LogicalKey::Num0),
                KeyEvent::release(LogicalKey::LeftShift),
            ]
        );
    }

    #[test]
    fn test_user_shift_is_not_released_by_symbol() {
        let mut kb = SyntheticKeyboard::new();
        let out = kb.emit_all([
            KeyEvent::press(LogicalKey::LeftShift),
            KeyEvent::press(LogicalKey::At),
            KeyEvent::release(LogicalKey::At),
        ]);
        assert_eq!(
            out,
            vec![
                KeyEvent::press(LogicalKey::LeftShift),
                KeyEvent::press(LogicalKey::Num2),
                KeyEvent::release(LogicalKey::Num2),
            ]
        );
        assert!(kb.is_down(LogicalKey::LeftShift));
    }

    #[test]
    fn test_user_shift_release_waits_for_symbol() {
        let mut kb = SyntheticKeyboard::new();
        let out = kb.emit_all([
            KeyEvent::press(LogicalKey::LeftShift),
            KeyEvent::press(LogicalKey::Plus),
            KeyEvent::release(LogicalKey::LeftShift),
            KeyEvent::release(LogicalKey::Plus),
        ]);
        assert_eq!(
            out,
            vec![
                KeyEvent::press(LogicalKey::LeftShift),
                KeyEvent::press(LogicalKey::Equal),
                KeyEvent::release(LogicalKey::Equal),
                KeyEvent::release(LogicalKey::LeftShift),
            ]
        );
    }

    #[test]
    fn test_symbol_leaves_held_base_key_down() {
        let mut kb = SyntheticKeyboard::new();
        let out = kb.emit_all([
            KeyEvent::press(LogicalKey::Num1),
            KeyEvent::press(LogicalKey::Exclamation),
            KeyEvent::release(LogicalKey::Exclamation),
        ]);
        assert_eq!(
            out,
            vec![
                KeyEvent::press(LogicalKey::Num1),
                KeyEvent::press(LogicalKey::LeftShift),
                KeyEvent::release(LogicalKey::LeftShift),
            ]
        );
        assert!(kb.is_down(LogicalKey::Num1));

        let out = kb.emit_all([
            KeyEvent::repeat(LogicalKey::Num1),
            KeyEvent::release(LogicalKey::Num1),
        ]);
        assert_eq!(
            out,
            vec![KeyEvent::repeat(LogicalKey::Num1), KeyEvent::release(LogicalKey::Num1)]
        );
        assert!(kb.registry().held().is_empty());
    }

    #[test]
    fn test_plain_press_joins_symbol_base() {
        let mut kb = SyntheticKeyboard::new();
        let out = kb.emit_all([
            KeyEvent::press(LogicalKey::Exclamation),
            KeyEvent::press(LogicalKey::Num1),
            KeyEvent::release(LogicalKey::Num1),
            KeyEvent::release(LogicalKey::Exclamation),
        ]);
        assert_eq!(
            out,
            vec![
                KeyEvent::press(LogicalKey::LeftShift),
                KeyEvent::press(LogicalKey::Num1),
                KeyEvent::release(LogicalKey::Num1),
                KeyEvent::release(LogicalKey::LeftShift),
            ]
        );
        assert!(kb.registry().held().is_empty());
    }

    #[test]
    fn test_key_held_twice_is_written_once() {
        let mut kb = SyntheticKeyboard::new();
        let out = kb.emit_all([
            KeyEvent::press(LogicalKey::Num1),
            KeyEvent::press(LogicalKey::Num1),
            KeyEvent::press(LogicalKey::Exclamation),
            KeyEvent::release(LogicalKey::Num1),
            KeyEvent::release(LogicalKey::Num1),
        ]);
        assert_eq!(
            out,
            vec![KeyEvent::press(LogicalKey::Num1), KeyEvent::press(LogicalKey::LeftShift)]
        );

        let out = kb.emit_all([KeyEvent::release(LogicalKey::Exclamation)]);
        assert_eq!(
            out,
            vec![KeyEvent::release(LogicalKey::Num1), KeyEvent::release(LogicalKey::LeftShift)]
        );
        assert!(kb.registry().held().is_empty());
    }

    #[test]
    fn test_mapped_shift_outlives_symbol() {
        let mut kb = SyntheticKeyboard::new();
        let out = kb.emit_all([
            KeyEvent::press(LogicalKey::LeftShift),
            KeyEvent::press(LogicalKey::LeftShift),
            KeyEvent::press(LogicalKey::Colon),
            KeyEvent::release(LogicalKey::LeftShift),
            KeyEvent::release(LogicalKey::Colon),
        ]);
        assert_eq!(
            out,
            vec![
                KeyEvent::press(LogicalKey::LeftShift),
                KeyEvent::press(LogicalKey::Semicolon),
                KeyEvent::release(LogicalKey::Semicolon),
            ]
        );
        assert!(kb.is_down(LogicalKey::LeftShift));

        let out = kb.emit_all([KeyEvent::release(LogicalKey::LeftShift)]);
        assert_eq!(out, vec![KeyEvent::release(LogicalKey::LeftShift)]);
    }

    #[test]
    fn test_repeat_and_release_without_press_are_dropped() {
        let mut kb = SyntheticKeyboard::new();
        let out = kb.emit_all([
            KeyEvent::repeat(LogicalKey::A),
            KeyEvent::release(LogicalKey::A),
            KeyEvent::release(LogicalKey::Ampersand),
        ]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_release_all() {
        let mut kb = SyntheticKeyboard::new();
        kb.emit_all([
            KeyEvent::press(LogicalKey::A),
            KeyEvent::press(LogicalKey::Underscore),
        ]);
        let released = kb.release_all();
        assert!(released.contains(&KeyEvent::release(LogicalKey::A)));
        assert!(released.contains(&KeyEvent::release(LogicalKey::Minus)));
        assert!(released.contains(&KeyEvent::release(LogicalKey::LeftShift)));
        assert!(!released.contains(&KeyEvent::release(LogicalKey::Underscore)));
        assert!(kb.registry().held().is_empty());
    }
}
