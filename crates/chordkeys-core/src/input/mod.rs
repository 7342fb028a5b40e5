// Chordkeys Input Layer
// Key codes, device detection and the evdev reader

pub mod codes;
mod device;
mod filter;

#[cfg(feature = "pure-rust")]
mod reader;

pub use codes::{code_for_key, key_for_code, output_codes, KEY_KPENTER};
pub use device::{is_keyboard, is_virtual_device, DeviceCapabilities, VIRTUAL_DEVICE_PREFIX};
pub use filter::{matches_device_filter, select_device, DeviceCandidate};

#[cfg(feature = "pure-rust")]
pub use reader::{DeviceError, DeviceInfo, DeviceResult, InputDevice};
