// Chordkeys Core Library
// Timing-based keyboard layers: key state, combos, layer engine, dispatch

pub mod combo;
pub mod command;
pub mod config;
pub mod event;
pub mod input;
pub mod key;
pub mod layer;
pub mod output;
pub mod state;
pub mod switch;
pub mod transform;

pub use combo::{ComboOutcome, ComboRegistration, ComboTimer};
pub use command::{EdgeCommand, HardwareEdge, KeyEvent};
pub use config::{builtin_layers, Config, ConfigError};
pub use event::{Dispatcher, FixedRateLoop, Snapshot};
pub use input::{code_for_key, key_for_code};
pub use key::LogicalKey;
pub use layer::{Layer, LayerActivation, Mapping};
pub use output::SyntheticKeyboard;
pub use state::{ConsumedKeys, KeyRecord, KeyRegistry, KeySet, RegistryError};
pub use switch::{EdgeState, EdgeSwitch};
pub use transform::{ActivationMode, EngineConfig, EngineError, EngineTick, LayerEngine, Mode};

#[cfg(feature = "pure-rust")]
pub use input::{DeviceError, DeviceInfo, InputDevice};
#[cfg(feature = "pure-rust")]
pub use output::{UInputError, VirtualDevice};
