use std::fmt;

use crate::LogicalKey;

/// Edge command sent to the output device.
///
/// The discriminants are the evdev `EV_KEY` values:
///   0 == 'released'
///   1 == 'pressed'
///   2 == 'repeated'
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum EdgeCommand {
    Release = 0,
    Press = 1,
    Repeat = 2,
}

impl EdgeCommand {
    /// Returns true if the command leaves the key down (PRESS or REPEAT)
    pub fn is_pressed(self) -> bool {
        matches!(self, EdgeCommand::Press | EdgeCommand::Repeat)
    }

    /// Create EdgeCommand from an evdev value
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(EdgeCommand::Release),
            1 => Some(EdgeCommand::Press),
            2 => Some(EdgeCommand::Repeat),
            _ => None,
        }
    }

    /// Convert to the evdev value
    pub fn to_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for EdgeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeCommand::Release => write!(f, "release"),
            EdgeCommand::Press => write!(f, "press"),
            EdgeCommand::Repeat => write!(f, "repeat"),
        }
    }
}

/// One `(key, command)` pair on its way to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: LogicalKey,
    pub command: EdgeCommand,
}

impl KeyEvent {
    pub fn new(key: LogicalKey, command: EdgeCommand) -> Self {
        Self { key, command }
    }

    pub fn press(key: LogicalKey) -> Self {
        Self::new(key, EdgeCommand::Press)
    }

    pub fn repeat(key: LogicalKey) -> Self {
        Self::new(key, EdgeCommand::Repeat)
    }

    pub fn release(key: LogicalKey) -> Self {
        Self::new(key, EdgeCommand::Release)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.command)
    }
}

/// One edge read from the hardware. Autorepeat arrives as `pressed = true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HardwareEdge {
    pub key: LogicalKey,
    pub pressed: bool,
}

impl HardwareEdge {
    pub fn new(key: LogicalKey, pressed: bool) -> Self {
        Self { key, pressed }
    }

    /// Build an edge from an evdev key value (0, 1 or 2)
    pub fn from_value(key: LogicalKey, value: i32) -> Option<Self> {
        EdgeCommand::from_i32(value).map(|command| Self::new(key, command.is_pressed()))
    }
}
