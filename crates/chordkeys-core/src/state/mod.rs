// Chordkeys State
// Key registry and per-tick consumption

pub mod consumed;
pub mod registry;

pub use consumed::ConsumedKeys;
pub use registry::{KeyRecord, KeyRegistry, KeySet, RegistryError};
