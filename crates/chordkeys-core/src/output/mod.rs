// Chordkeys Output Layer
// Synthetic keyboard expansion and the uinput device

mod state;
mod synth;

#[cfg(feature = "pure-rust")]
mod uinput;

pub use state::PressedCodes;
pub use synth::SyntheticKeyboard;

#[cfg(feature = "pure-rust")]
pub use uinput::{UInputError, VirtualDevice};
