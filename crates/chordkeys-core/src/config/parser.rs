// Chordkeys Config Parser - TOML with Serde
// Parses and validates the layer configuration

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;

use super::presets;
use crate::event::FixedRateLoop;
use crate::input::code_for_key;
use crate::layer::Layer;
use crate::state::{KeyRegistry, RegistryError};
use crate::transform::{ActivationMode, EngineConfig, EngineError, LayerEngine};
use crate::LogicalKey;

const ACTIVATION_WINDOW_RANGE: (u64, u64) = (50, 1000);
const COMBO_WINDOW_RANGE: (u64, u64) = (5, 200);
const TICK_RATE_MAX: u32 = 2000;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Layer {0} is defined more than once")]
    DuplicateLayer(String),

    #[error("Layer {layer} maps {key} more than once")]
    DuplicateMapping { layer: String, key: LogicalKey },

    #[error("Secondary key {key} is used by layers {first} and {second}")]
    DuplicateSecondary {
        key: LogicalKey,
        first: String,
        second: String,
    },

    #[error("Trigger key {trigger} cannot be used in layer {layer}")]
    TriggerInLayer { trigger: LogicalKey, layer: String },

    #[error("Layer {layer} outputs {key}, which the output device cannot produce")]
    UnemittableKey { layer: String, key: LogicalKey },

    #[error("Unknown default layer: {0}")]
    UnknownLayer(String),

    #[error("Key registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Layer engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Root TOML table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigToml {
    #[serde(default)]
    pub general: Option<GeneralConfig>,

    #[serde(default)]
    pub devices: Option<DevicesConfig>,

    /// `[[layer]]` entries; when absent the built-in layers are used
    #[serde(default)]
    pub layer: Vec<LayerToml>,
}

/// `[general]`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    pub trigger: Option<String>,
    /// `"double_tap"` (default) or `"chord"`
    pub activation: Option<ActivationMode>,
    pub activation_window_ms: Option<u64>,
    pub combo_window_ms: Option<u64>,
    pub tick_rate_hz: Option<u32>,
    pub default_layer: Option<String>,
}

/// `[devices]`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DevicesConfig {
    /// Explicit device names/paths to use
    #[serde(default)]
    pub only: Vec<String>,
}

/// One `[[layer]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerToml {
    pub name: String,

    #[serde(default)]
    pub secondary: Vec<String>,

    #[serde(default)]
    pub mappings: IndexMap<String, String>,

    /// Map every shiftable key to its shifted variant
    #[serde(default)]
    pub shift_lock: bool,
}

/// Validated configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub trigger: LogicalKey,
    pub activation: ActivationMode,
    pub activation_window_ms: u64,
    pub combo_window_ms: u64,
    pub tick_rate_hz: u32,
    pub default_layer: Option<String>,
    pub device_filter: Vec<String>,
    pub layers: Vec<Layer>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trigger: LogicalKey::Space,
            activation: ActivationMode::DoubleTap,
            activation_window_ms: 200,
            combo_window_ms: 35,
            tick_rate_hz: FixedRateLoop::DEFAULT_RATE_HZ,
            default_layer: None,
            device_filter: vec![],
            layers: presets::builtin_layers(),
        }
    }
}

impl Config {
    /// `~/.config/chordkeys/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chordkeys").join("config.toml"))
    }

    /// Load an explicit file, else the default path if it exists, else the built-in layers
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            log::info!("loading config from {}", path.display());
            return Self::from_toml_path(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                log::info!("loading config from {}", path.display());
                Self::from_toml_path(path)
            }
            _ => {
                log::info!("no config file found, using built-in layers");
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Parse a TOML configuration file
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let toml_config: ConfigToml =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;

        let config = toml_config.to_config()?;
        config.validate()?;
        Ok(config)
    }

    pub fn activation_window(&self) -> Duration {
        Duration::from_millis(self.activation_window_ms)
    }

    pub fn combo_window(&self) -> Duration {
        Duration::from_millis(self.combo_window_ms)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            trigger: self.trigger,
            activation: self.activation,
            activation_window: self.activation_window(),
            combo_window: self.combo_window(),
            default_layer: self.default_layer.clone(),
        }
    }

    /// Build the layer engine for this configuration
    pub fn build_engine(&self) -> Result<LayerEngine, ConfigError> {
        Ok(LayerEngine::new(self.engine_config(), self.layers.clone())?)
    }

    /// Check every startup invariant
    pub fn validate(&self) -> Result<(), ConfigError> {
        KeyRegistry::new().validate()?;

        check_range(
            "general.activation_window_ms",
            self.activation_window_ms,
            ACTIVATION_WINDOW_RANGE,
        )?;
        check_range("general.combo_window_ms", self.combo_window_ms, COMBO_WINDOW_RANGE)?;
        if self.combo_window_ms >= self.activation_window_ms {
            return Err(ConfigError::OutOfRange(format!(
                "general.combo_window_ms ({}) must be shorter than activation_window_ms ({})",
                self.combo_window_ms, self.activation_window_ms
            )));
        }
        if self.tick_rate_hz < FixedRateLoop::MIN_RATE_HZ || self.tick_rate_hz > TICK_RATE_MAX {
            return Err(ConfigError::OutOfRange(format!(
                "general.tick_rate_hz must be {}-{}, got {}",
                FixedRateLoop::MIN_RATE_HZ,
                TICK_RATE_MAX,
                self.tick_rate_hz
            )));
        }

        let mut names = HashSet::new();
        let mut secondaries: Vec<(LogicalKey, &str)> = Vec::new();

        for layer in &self.layers {
            if !names.insert(layer.name()) {
                return Err(ConfigError::DuplicateLayer(layer.name().to_string()));
            }

            for &key in layer.secondaries() {
                if key == self.trigger {
                    return Err(ConfigError::TriggerInLayer {
                        trigger: self.trigger,
                        layer: layer.name().to_string(),
                    });
                }
                if let Some((_, first)) = secondaries.iter().find(|(k, _)| *k == key) {
                    return Err(ConfigError::DuplicateSecondary {
                        key,
                        first: first.to_string(),
                        second: layer.name().to_string(),
                    });
                }
                secondaries.push((key, layer.name()));
            }

            for mapping in layer.mappings() {
                if mapping.input == self.trigger {
                    return Err(ConfigError::TriggerInLayer {
                        trigger: self.trigger,
                        layer: layer.name().to_string(),
                    });
                }
                if !is_emittable(mapping.output) {
                    return Err(ConfigError::UnemittableKey {
                        layer: layer.name().to_string(),
                        key: mapping.output,
                    });
                }
            }

            if layer.secondaries().is_empty()
                && self.default_layer.as_deref() != Some(layer.name())
            {
                log::warn!("layer {} has no secondary key and cannot be selected", layer.name());
            }
        }

        if let Some(name) = &self.default_layer {
            if !names.contains(name.as_str()) {
                return Err(ConfigError::UnknownLayer(name.clone()));
            }
            if self.activation == ActivationMode::Chord {
                log::warn!("default_layer {} is never used with chord activation", name);
            }
        }

        Ok(())
    }
}

impl ConfigToml {
    /// Convert parsed TOML into a Config. Range checks happen in `validate`.
    fn to_config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::default();

        if let Some(general) = &self.general {
            if let Some(name) = &general.trigger {
                config.trigger = parse_key(name)?;
            }
            if let Some(activation) = general.activation {
                config.activation = activation;
            }
            if let Some(ms) = general.activation_window_ms {
                config.activation_window_ms = ms;
            }
            if let Some(ms) = general.combo_window_ms {
                config.combo_window_ms = ms;
            }
            if let Some(hz) = general.tick_rate_hz {
                config.tick_rate_hz = hz;
            }
            config.default_layer = general.default_layer.clone();
        }

        if let Some(devices) = &self.devices {
            config.device_filter = devices.only.clone();
        }

        if !self.layer.is_empty() {
            config.layers = self
                .layer
                .iter()
                .map(LayerToml::to_layer)
                .collect::<Result<Vec<_>, ConfigError>>()?;
        }

        log::debug!("config parsed with {} layers", config.layers.len());
        Ok(config)
    }
}

impl LayerToml {
    fn to_layer(&self) -> Result<Layer, ConfigError> {
        let mut layer = Layer::new(self.name.trim());

        for name in &self.secondary {
            let key = parse_key(name)?;
            if !layer.add_secondary(key) {
                log::warn!("layer {} lists secondary {} twice", self.name, key);
            }
        }

        for (from, to) in &self.mappings {
            let input = parse_key(from)?;
            let output = parse_key(to)?;
            if !layer.add_mapping(input, output) {
                return Err(ConfigError::DuplicateMapping {
                    layer: self.name.clone(),
                    key: input,
                });
            }
        }

        if self.shift_lock {
            for key in LogicalKey::shiftable_keys() {
                if let Some(shifted) = key.shifted_variant() {
                    // Explicit mappings take precedence
                    layer.add_mapping(key, shifted);
                }
            }
        }

        Ok(layer)
    }
}

/// A key is emittable if it has a device code or expands to one under shift
fn is_emittable(key: LogicalKey) -> bool {
    code_for_key(key)
        .or_else(|| key.unshifted_variant().and_then(code_for_key))
        .is_some()
}

fn check_range(name: &str, value: u64, (min, max): (u64, u64)) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange(format!(
            "{} must be {}-{}ms, got {}",
            name, min, max, value
        )));
    }
    Ok(())
}

fn parse_key(name: &str) -> Result<LogicalKey, ConfigError> {
    LogicalKey::from_name(name).ok_or_else(|| ConfigError::InvalidKey(name.trim().to_string()))
}
