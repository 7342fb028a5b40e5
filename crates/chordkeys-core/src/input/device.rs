// Chordkeys Input Layer - Device Detection
// Capability checks used to pick the keyboard to grab

use std::collections::HashSet;

use crate::input::codes::code_for_key;
use crate::LogicalKey;

/// Name prefix of the virtual output device
pub const VIRTUAL_DEVICE_PREFIX: &str = "chordkeys (virtual)";

/// Keys a device must expose to count as a keyboard
const KEYBOARD_MARKER_KEYS: &[LogicalKey] = &[
    LogicalKey::Q,
    LogicalKey::W,
    LogicalKey::E,
    LogicalKey::R,
    LogicalKey::T,
    LogicalKey::Y,
    LogicalKey::A,
    LogicalKey::Z,
    LogicalKey::Space,
];

/// Key capabilities reported by an input device
#[derive(Debug, Clone, Default)]
pub struct DeviceCapabilities {
    pub has_ev_key: bool,
    pub supported_keys: HashSet<u16>,
}

impl DeviceCapabilities {
    pub fn new(has_ev_key: bool, supported_keys: impl IntoIterator<Item = u16>) -> Self {
        Self {
            has_ev_key,
            supported_keys: supported_keys.into_iter().collect(),
        }
    }

    pub fn supports_key(&self, code: u16) -> bool {
        self.supported_keys.contains(&code)
    }
}

/// A device is a keyboard if it reports EV_KEY and has the letter row and space
pub fn is_keyboard(capabilities: &DeviceCapabilities) -> bool {
    capabilities.has_ev_key
        && KEYBOARD_MARKER_KEYS
            .iter()
            .filter_map(|key| code_for_key(*key))
            .all(|code| capabilities.supports_key(code))
}

/// Whether `name` belongs to the device we create for output
pub fn is_virtual_device(name: &str) -> bool {
    name.starts_with(VIRTUAL_DEVICE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyboard_caps() -> DeviceCapabilities {
        let mut codes: Vec<u16> = (1..=58).collect();
        codes.extend_from_slice(&[59, 60, 61, 62, 63, 64, 65, 66, 67, 68]);
        DeviceCapabilities::new(true, codes)
    }

    #[test]
    fn test_full_keyboard() {
        assert!(is_keyboard(&keyboard_caps()));
    }

    #[test]
    fn test_missing_space_is_not_a_keyboard() {
        let caps = DeviceCapabilities::new(true, (1..=56).collect::<Vec<_>>());
        assert!(!is_keyboard(&caps));
    }

    #[test]
    fn test_mouse_is_not_a_keyboard() {
        let caps = DeviceCapabilities::new(true, [272, 273, 274]);
        assert!(!is_keyboard(&caps));
    }

    #[test]
    fn test_no_ev_key() {
        let mut caps = keyboard_caps();
        caps.has_ev_key = false;
        assert!(!is_keyboard(&caps));
    }

    #[test]
    fn test_virtual_device_name() {
        assert!(is_virtual_device("chordkeys (virtual) Keyboard"));
        assert!(!is_virtual_device("AT Translated Set 2 keyboard"));
    }
}
