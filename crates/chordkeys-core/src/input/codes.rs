// Chordkeys Input Layer - Key Codes
// Static mapping between Linux input event codes and logical keys

use crate::LogicalKey;

/// Linux `KEY_KPENTER`, used for every synthetic Enter
pub const KEY_KPENTER: u16 = 96;

/// (logical key, linux input code) for every key the hardware can produce.
/// Shifted symbols have no code of their own.
const KEY_CODES: &[(LogicalKey, u16)] = &[
    (LogicalKey::Escape, 1),
    (LogicalKey::Num1, 2),
    (LogicalKey::Num2, 3),
    (LogicalKey::Num3, 4),
    (LogicalKey::Num4, 5),
    (LogicalKey::Num5, 6),
    (LogicalKey::Num6, 7),
    (LogicalKey::Num7, 8),
    (LogicalKey::Num8, 9),
    (LogicalKey::Num9, 10),
    (LogicalKey::Num0, 11),
    (LogicalKey::Minus, 12),
    (LogicalKey::Equal, 13),
    (LogicalKey::Backspace, 14),
    (LogicalKey::Tab, 15),
    (LogicalKey::Q, 16),
    (LogicalKey::W, 17),
    (LogicalKey::E, 18),
    (LogicalKey::R, 19),
    (LogicalKey::T, 20),
    (LogicalKey::Y, 21),
    (LogicalKey::U, 22),
    (LogicalKey::I, 23),
    (LogicalKey::O, 24),
    (LogicalKey::P, 25),
    (LogicalKey::LeftBracket, 26),
    (LogicalKey::RightBracket, 27),
    (LogicalKey::Enter, 28),
    (LogicalKey::LeftCtrl, 29),
    (LogicalKey::A, 30),
    (LogicalKey::S, 31),
    (LogicalKey::D, 32),
    (LogicalKey::F, 33),
    (LogicalKey::G, 34),
    (LogicalKey::H, 35),
    (LogicalKey::J, 36),
    (LogicalKey::K, 37),
    (LogicalKey::L, 38),
    (LogicalKey::Semicolon, 39),
    (LogicalKey::Apostrophe, 40),
    (LogicalKey::Grave, 41),
    (LogicalKey::LeftShift, 42),
    (LogicalKey::Backslash, 43),
    (LogicalKey::Z, 44),
    (LogicalKey::X, 45),
    (LogicalKey::C, 46),
    (LogicalKey::V, 47),
    (LogicalKey::B, 48),
    (LogicalKey::N, 49),
    (LogicalKey::M, 50),
    (LogicalKey::Comma, 51),
    (LogicalKey::Period, 52),
    (LogicalKey::Slash, 53),
    (LogicalKey::RightShift, 54),
    (LogicalKey::LeftAlt, 56),
    (LogicalKey::Space, 57),
    (LogicalKey::CapsLock, 58),
    (LogicalKey::F1, 59),
    (LogicalKey::F2, 60),
    (LogicalKey::F3, 61),
    (LogicalKey::F4, 62),
    (LogicalKey::F5, 63),
    (LogicalKey::F6, 64),
    (LogicalKey::F7, 65),
    (LogicalKey::F8, 66),
    (LogicalKey::F9, 67),
    (LogicalKey::F10, 68),
    (LogicalKey::F11, 87),
    (LogicalKey::F12, 88),
    (LogicalKey::RightCtrl, 97),
    (LogicalKey::RightAlt, 100),
    (LogicalKey::Home, 102),
    (LogicalKey::Up, 103),
    (LogicalKey::PageUp, 104),
    (LogicalKey::Left, 105),
    (LogicalKey::Right, 106),
    (LogicalKey::End, 107),
    (LogicalKey::Down, 108),
    (LogicalKey::PageDown, 109),
    (LogicalKey::Insert, 110),
    (LogicalKey::Delete, 111),
    (LogicalKey::LeftMeta, 125),
    (LogicalKey::RightMeta, 126),
    (LogicalKey::Menu, 127),
    (LogicalKey::MouseLeft, 272),
    (LogicalKey::MouseRight, 273),
    (LogicalKey::MouseMiddle, 274),
];

/// Logical key for a hardware code. Unmapped codes yield `None`.
pub fn key_for_code(code: u16) -> Option<LogicalKey> {
    if code == KEY_KPENTER {
        return Some(LogicalKey::Enter);
    }
    KEY_CODES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(key, _)| *key)
}

/// Output code for a logical key. Symbols must be expanded first.
pub fn code_for_key(key: LogicalKey) -> Option<u16> {
    if key == LogicalKey::Enter {
        return Some(KEY_KPENTER);
    }
    KEY_CODES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, code)| *code)
}

/// Every code the virtual device must advertise
pub fn output_codes() -> impl Iterator<Item = u16> {
    KEY_CODES
        .iter()
        .map(|(_, code)| *code)
        .chain(std::iter::once(KEY_KPENTER))
}
