// Chordkeys Transform Module
// Layer engine driving per-tick key translation

pub mod engine;

pub use engine::{ActivationMode, EngineConfig, EngineError, EngineTick, LayerEngine, Mode};
