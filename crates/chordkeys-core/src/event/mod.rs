// Chordkeys Event Handling
// Per-tick dispatch and loop pacing

pub mod cadence;
pub mod dispatch;

pub use cadence::FixedRateLoop;
pub use dispatch::{Dispatcher, Snapshot};
