// Chordkeys uinput Output Layer
// Virtual device creation and key event emission

use evdev::uinput::VirtualDeviceBuilder;
use evdev::{AttributeSet, EventType, InputEvent};

use super::state::PressedCodes;
use crate::input::{code_for_key, output_codes, VIRTUAL_DEVICE_PREFIX};
use crate::KeyEvent;

/// Error types for uinput operations
#[derive(Debug, thiserror::Error)]
pub enum UInputError {
    #[error("Failed to create virtual device: {0}")]
    DeviceCreation(std::io::Error),

    #[error("Failed to write event: {0}")]
    WriteError(std::io::Error),

    #[error("Key {0} has no device code")]
    NoCode(crate::LogicalKey),
}

/// Virtual uinput keyboard receiving the transformed stream
pub struct VirtualDevice {
    device: evdev::uinput::VirtualDevice,
    pressed: PressedCodes,
}

impl VirtualDevice {
    pub fn new() -> Result<Self, UInputError> {
        let mut keys = AttributeSet::new();
        for code in output_codes() {
            keys.insert(evdev::Key::new(code));
        }

        let name = format!("{} Keyboard", VIRTUAL_DEVICE_PREFIX);
        let device = VirtualDeviceBuilder::new()
            .map_err(UInputError::DeviceCreation)?
            .name(&name)
            .with_keys(&keys)
            .map_err(UInputError::DeviceCreation)?
            .build()
            .map_err(UInputError::DeviceCreation)?;

        log::info!("created virtual device \"{}\"", name);

        Ok(Self {
            device,
            pressed: PressedCodes::new(),
        })
    }

    fn write_code(&mut self, code: u16, value: i32) -> Result<(), UInputError> {
        let key_event = InputEvent::new(EventType::KEY, code, value);
        // SYN is required for the kernel to process the key event
        let syn_event = InputEvent::new(EventType::SYNCHRONIZATION, 0, 0);

        self.device
            .emit(&[key_event, syn_event])
            .map_err(UInputError::WriteError)?;
        self.pressed.record(code, value);
        Ok(())
    }

    /// Write one expanded (non-symbol) key event
    pub fn send(&mut self, event: KeyEvent) -> Result<(), UInputError> {
        let code = code_for_key(event.key).ok_or(UInputError::NoCode(event.key))?;
        log::trace!("uinput {} -> code {}", event, code);
        self.write_code(code, event.command.to_i32())
    }

    pub fn send_all(&mut self, events: &[KeyEvent]) -> Result<(), UInputError> {
        for event in events {
            self.send(*event)?;
        }
        Ok(())
    }

    /// Release every code still held on the device
    pub fn release_all(&mut self) -> Result<(), UInputError> {
        for code in self.pressed.take_all() {
            self.write_code(code, 0)?;
        }
        Ok(())
    }

    pub fn pressed_count(&self) -> usize {
        self.pressed.len()
    }
}
