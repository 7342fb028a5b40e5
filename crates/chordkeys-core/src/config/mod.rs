// Chordkeys Config
// TOML configuration and built-in layers

pub mod parser;
pub mod presets;

pub use parser::{Config, ConfigError, ConfigToml, DevicesConfig, GeneralConfig, LayerToml};
pub use presets::builtin_layers;
