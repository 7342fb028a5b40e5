// Chordkeys Logical Keys
// The closed set of keys the engine reasons about, with shift metadata

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// A logical key identifier.
///
/// Physical keys map onto the unshifted variants. The shifted punctuation
/// variants (`Exclamation`, `LeftParen`, ...) have no hardware code of their own
/// and are produced on the output by pressing shift together with their
/// unshifted base key.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum LogicalKey {
    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Number row
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    Num0,
    Minus,
    Equal,

    // Punctuation
    Grave,
    LeftBracket,
    RightBracket,
    Backslash,
    Semicolon,
    Apostrophe,
    Comma,
    Period,
    Slash,

    // Whitespace and editing
    Space,
    Enter,
    Tab,
    Backspace,
    Escape,
    CapsLock,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    // Arrows
    Left,
    Right,
    Up,
    Down,

    // Function row
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Modifiers
    LeftShift,
    RightShift,
    LeftCtrl,
    RightCtrl,
    LeftAlt,
    RightAlt,
    LeftMeta,
    RightMeta,
    Menu,

    // Mouse buttons
    MouseLeft,
    MouseRight,
    MouseMiddle,

    // Shifted variants
    Tilde,
    Exclamation,
    At,
    Hash,
    Dollar,
    Percent,
    Caret,
    Ampersand,
    Asterisk,
    LeftParen,
    RightParen,
    Underscore,
    Plus,
    LeftBrace,
    RightBrace,
    Pipe,
    Colon,
    DoubleQuote,
    LessThan,
    GreaterThan,
    Question,
}

/// (base, shifted) pairs for every key whose shifted form is itself a logical key.
const SHIFT_PAIRS: &[(LogicalKey, LogicalKey)] = &[
    (LogicalKey::Grave, LogicalKey::Tilde),
    (LogicalKey::Num1, LogicalKey::Exclamation),
    (LogicalKey::Num2, LogicalKey::At),
    (LogicalKey::Num3, LogicalKey::Hash),
    (LogicalKey::Num4, LogicalKey::Dollar),
    (LogicalKey::Num5, LogicalKey::Percent),
    (LogicalKey::Num6, LogicalKey::Caret),
    (LogicalKey::Num7, LogicalKey::Ampersand),
    (LogicalKey::Num8, LogicalKey::Asterisk),
    (LogicalKey::Num9, LogicalKey::LeftParen),
    (LogicalKey::Num0, LogicalKey::RightParen),
    (LogicalKey::Minus, LogicalKey::Underscore),
    (LogicalKey::Equal, LogicalKey::Plus),
    (LogicalKey::LeftBracket, LogicalKey::LeftBrace),
    (LogicalKey::RightBracket, LogicalKey::RightBrace),
    (LogicalKey::Backslash, LogicalKey::Pipe),
    (LogicalKey::Semicolon, LogicalKey::Colon),
    (LogicalKey::Apostrophe, LogicalKey::DoubleQuote),
    (LogicalKey::Comma, LogicalKey::LessThan),
    (LogicalKey::Period, LogicalKey::GreaterThan),
    (LogicalKey::Slash, LogicalKey::Question),
];

impl LogicalKey {
    /// Canonical upper-case name, e.g. `LEFT_SHIFT`
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// The key produced when this key is typed with shift held, if representable
    pub fn shifted_variant(self) -> Option<LogicalKey> {
        SHIFT_PAIRS
            .iter()
            .find(|(base, _)| *base == self)
            .map(|(_, shifted)| *shifted)
    }

    /// The base key that must be typed with shift to produce this key
    pub fn unshifted_variant(self) -> Option<LogicalKey> {
        SHIFT_PAIRS
            .iter()
            .find(|(_, shifted)| *shifted == self)
            .map(|(base, _)| *base)
    }

    /// Whether the output device can only produce this key as shift + base key
    pub fn requires_modifier(self) -> bool {
        self.unshifted_variant().is_some()
    }

    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            LogicalKey::LeftShift
                | LogicalKey::RightShift
                | LogicalKey::LeftCtrl
                | LogicalKey::RightCtrl
                | LogicalKey::LeftAlt
                | LogicalKey::RightAlt
                | LogicalKey::LeftMeta
                | LogicalKey::RightMeta
        )
    }

    /// Short label used by the terminal monitor
    pub fn label(self) -> &'static str {
        use LogicalKey::*;
        match self {
            A => "a",
            B => "b",
            C => "c",
            D => "d",
            E => "e",
            F => "f",
            G => "g",
            H => "h",
            I => "i",
            J => "j",
            K => "k",
            L => "l",
            M => "m",
            N => "n",
            O => "o",
            P => "p",
            Q => "q",
            R => "r",
            S => "s",
            T => "t",
            U => "u",
            V => "v",
            W => "w",
            X => "x",
            Y => "y",
            Z => "z",
            Num1 => "1",
            Num2 => "2",
            Num3 => "3",
            Num4 => "4",
            Num5 => "5",
            Num6 => "6",
            Num7 => "7",
            Num8 => "8",
            Num9 => "9",
            Num0 => "0",
            Minus => "-",
            Equal => "=",
            Grave => "`",
            LeftBracket => "[",
            RightBracket => "]",
            Backslash => "\\",
            Semicolon => ";",
            Apostrophe => "'",
            Comma => ",",
            Period => ".",
            Slash => "/",
            Space => "spc",
            Enter => "ent",
            Tab => "tab",
            Backspace => "bks",
            Escape => "esc",
            CapsLock => "cap",
            Insert => "ins",
            Delete => "del",
            Home => "hom",
            End => "end",
            PageUp => "pgu",
            PageDown => "pgd",
            Left => "lt",
            Right => "rt",
            Up => "up",
            Down => "dn",
            F1 => "f1",
            F2 => "f2",
            F3 => "f3",
            F4 => "f4",
            F5 => "f5",
            F6 => "f6",
            F7 => "f7",
            F8 => "f8",
            F9 => "f9",
            F10 => "f10",
            F11 => "f11",
            F12 => "f12",
            LeftShift => "lsh",
            RightShift => "rsh",
            LeftCtrl => "lct",
            RightCtrl => "rct",
            LeftAlt => "lal",
            RightAlt => "ral",
            LeftMeta => "lsu",
            RightMeta => "rsu",
            Menu => "mnu",
            MouseLeft => "lmb",
            MouseRight => "rmb",
            MouseMiddle => "mmb",
            Tilde => "~",
            Exclamation => "!",
            At => "@",
            Hash => "#",
            Dollar => "$",
            Percent => "%",
            Caret => "^",
            Ampersand => "&",
            Asterisk => "*",
            LeftParen => "(",
            RightParen => ")",
            Underscore => "_",
            Plus => "+",
            LeftBrace => "{",
            RightBrace => "}",
            Pipe => "|",
            Colon => ":",
            DoubleQuote => "\"",
            LessThan => "<",
            GreaterThan => ">",
            Question => "?",
        }
    }

    /// Parse a key name, accepting canonical names and common aliases
    pub fn from_name(name: &str) -> Option<LogicalKey> {
        let trimmed = name.trim();
        if let Ok(key) = trimmed.parse::<LogicalKey>() {
            return Some(key);
        }

        let upper = trimmed.to_uppercase();
        let alias = match upper.as_str() {
            "1" => LogicalKey::Num1,
            "2" => LogicalKey::Num2,
            "3" => LogicalKey::Num3,
            "4" => LogicalKey::Num4,
            "5" => LogicalKey::Num5,
            "6" => LogicalKey::Num6,
            "7" => LogicalKey::Num7,
            "8" => LogicalKey::Num8,
            "9" => LogicalKey::Num9,
            "0" => LogicalKey::Num0,
            "ESC" => LogicalKey::Escape,
            "RETURN" => LogicalKey::Enter,
            "CAPS" | "CAPSLOCK" => LogicalKey::CapsLock,
            "DOT" => LogicalKey::Period,
            "QUOTE" | "SINGLE_QUOTE" => LogicalKey::Apostrophe,
            "GRAVE_ACCENT" => LogicalKey::Grave,
            "LEFT_SQUARE_BRACKET" => LogicalKey::LeftBracket,
            "RIGHT_SQUARE_BRACKET" => LogicalKey::RightBracket,
            "SHIFT" => LogicalKey::LeftShift,
            "CTRL" | "CONTROL" | "LEFT_CONTROL" => LogicalKey::LeftCtrl,
            "RIGHT_CONTROL" => LogicalKey::RightCtrl,
            "ALT" => LogicalKey::LeftAlt,
            "SUPER" | "META" | "LEFT_SUPER" => LogicalKey::LeftMeta,
            "RIGHT_SUPER" => LogicalKey::RightMeta,
            "DEL" => LogicalKey::Delete,
            "PGUP" => LogicalKey::PageUp,
            "PGDN" => LogicalKey::PageDown,
            "`" => LogicalKey::Grave,
            "-" => LogicalKey::Minus,
            "=" => LogicalKey::Equal,
            "[" => LogicalKey::LeftBracket,
            "]" => LogicalKey::RightBracket,
            "\\" => LogicalKey::Backslash,
            ";" => LogicalKey::Semicolon,
            "'" => LogicalKey::Apostrophe,
            "," => LogicalKey::Comma,
            "." => LogicalKey::Period,
            "/" => LogicalKey::Slash,
            "!" => LogicalKey::Exclamation,
            "@" => LogicalKey::At,
            "#" => LogicalKey::Hash,
            "$" => LogicalKey::Dollar,
            "%" => LogicalKey::Percent,
            "^" => LogicalKey::Caret,
            "&" => LogicalKey::Ampersand,
            "*" => LogicalKey::Asterisk,
            "(" => LogicalKey::LeftParen,
            ")" => LogicalKey::RightParen,
            "_" => LogicalKey::Underscore,
            "+" => LogicalKey::Plus,
            "{" => LogicalKey::LeftBrace,
            "}" => LogicalKey::RightBrace,
            "|" => LogicalKey::Pipe,
            ":" => LogicalKey::Colon,
            "\"" => LogicalKey::DoubleQuote,
            "<" => LogicalKey::LessThan,
            ">" => LogicalKey::GreaterThan,
            "?" => LogicalKey::Question,
            _ => return None,
        };
        Some(alias)
    }

    /// Every key whose shifted form is representable, in declaration order
    pub fn shiftable_keys() -> impl Iterator<Item = LogicalKey> {
        LogicalKey::iter().filter(|k| k.shifted_variant().is_some())
    }
}
