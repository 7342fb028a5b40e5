// Chordkeys Edge Switch
// Boolean signal with one tick of memory

use std::fmt;

/// Edge classification of a boolean input for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeState {
    SustainedOff,
    JustSwitchedOn,
    SustainedOn,
    JustSwitchedOff,
}

impl EdgeState {
    /// True for `JustSwitchedOn` and `SustainedOn`
    pub fn is_down(self) -> bool {
        matches!(self, EdgeState::JustSwitchedOn | EdgeState::SustainedOn)
    }

    /// True for the two single-tick states
    pub fn is_edge(self) -> bool {
        matches!(self, EdgeState::JustSwitchedOn | EdgeState::JustSwitchedOff)
    }
}

impl fmt::Display for EdgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeState::SustainedOff => write!(f, "sustained_off"),
            EdgeState::JustSwitchedOn => write!(f, "just_switched_on"),
            EdgeState::SustainedOn => write!(f, "sustained_on"),
            EdgeState::JustSwitchedOff => write!(f, "just_switched_off"),
        }
    }
}

/// A boolean signal that remembers its value from the previous tick.
///
/// `set` records this tick's input; `state` derives the edge from the
/// previous and current values; `advance` commits the tick so the "just_"
/// states are visible for exactly one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeSwitch {
    previous: bool,
    current: bool,
}

impl EdgeSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the input for the current tick
    pub fn set(&mut self, pressed: bool) {
        self.current = pressed;
    }

    pub fn state(&self) -> EdgeState {
        match (self.previous, self.current) {
            (false, false) => EdgeState::SustainedOff,
            (false, true) => EdgeState::JustSwitchedOn,
            (true, true) => EdgeState::SustainedOn,
            (true, false) => EdgeState::JustSwitchedOff,
        }
    }

    pub fn is_down(&self) -> bool {
        self.current
    }

    /// Whether the input already differs from the previous tick
    pub fn changed_this_tick(&self) -> bool {
        self.previous != self.current
    }

    /// Move to the next tick
    pub fn advance(&mut self) {
        self.previous = self.current;
    }
}

impl fmt::Display for EdgeSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state())
    }
}
