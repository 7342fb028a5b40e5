// Chordkeys Input Layer - Device Reader
// Exclusive evdev access to the single keyboard we remap

use std::os::unix::io::AsRawFd;

use evdev::{Device, EventType, InputEvent};

use super::codes::key_for_code;
use super::device::{is_keyboard, DeviceCapabilities};
use super::filter::{select_device, DeviceCandidate};
use crate::HardwareEdge;

/// Result type for input device operations
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Errors raised while opening or reading the input device
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Device not found: {0}")]
    NotFound(String),

    #[error("Failed to grab {path}: {source}")]
    Grab {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Device listing entry for `--list-devices`
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub index: usize,
    pub name: String,
    pub path: String,
    pub is_keyboard: bool,
}

fn capabilities(device: &Device) -> DeviceCapabilities {
    let codes = device
        .supported_keys()
        .map(|keys| keys.iter().map(|k| k.code()).collect::<Vec<_>>())
        .unwrap_or_default();
    DeviceCapabilities::new(device.supported_events().contains(EventType::KEY), codes)
}

fn enumerate() -> (Vec<Device>, Vec<DeviceCandidate>) {
    let mut devices = Vec::new();
    let mut candidates = Vec::new();
    for (path, device) in evdev::enumerate() {
        candidates.push(DeviceCandidate {
            name: device.name().unwrap_or("Unknown").to_string(),
            path: path.to_string_lossy().into_owned(),
            is_keyboard: is_keyboard(&capabilities(&device)),
        });
        devices.push(device);
    }
    (devices, candidates)
}

/// Append the key edges among `events`, skipping codes we do not model
fn push_key_edges(events: impl IntoIterator<Item = InputEvent>, out: &mut Vec<HardwareEdge>) {
    for event in events {
        if event.event_type() != EventType::KEY {
            continue;
        }
        let Some(key) = key_for_code(event.code()) else {
            log::trace!("dropping unmapped code {}", event.code());
            continue;
        };
        if let Some(edge) = HardwareEdge::from_value(key, event.value()) {
            out.push(edge);
        }
    }
}

/// The grabbed input keyboard.
///
/// The device is ungrabbed on drop, including during unwinding, so the
/// keyboard never stays captured after the process stops.
pub struct InputDevice {
    device: Device,
    name: String,
    path: String,
    poll_fd: libc::pollfd,
    grabbed: bool,
}

impl InputDevice {
    /// List every input device with its keyboard classification
    pub fn list_devices() -> DeviceResult<Vec<DeviceInfo>> {
        let (_, candidates) = enumerate();
        if candidates.is_empty() {
            return Err(DeviceError::NotFound("No input devices found".to_string()));
        }
        Ok(candidates
            .into_iter()
            .enumerate()
            .map(|(index, c)| DeviceInfo {
                index,
                name: c.name,
                path: c.path,
                is_keyboard: c.is_keyboard,
            })
            .collect())
    }

    /// Find the keyboard matching `only` (or the first keyboard) and grab it
    pub fn open(only: &[String]) -> DeviceResult<Self> {
        let (devices, candidates) = enumerate();
        let index = select_device(&candidates, only).ok_or_else(|| {
            DeviceError::NotFound(if only.is_empty() {
                "No keyboard devices found".to_string()
            } else {
                format!("No device matches {}", only.join(", "))
            })
        })?;

        let candidate = candidates[index].clone();
        let mut device = devices
            .into_iter()
            .nth(index)
            .ok_or_else(|| DeviceError::NotFound(candidate.path.clone()))?;

        // A previous crashed run may have left the device grabbed
        let _ = device.ungrab();
        device.grab().map_err(|source| DeviceError::Grab {
            path: candidate.path.clone(),
            source,
        })?;

        log::info!("grabbed {} ({})", candidate.name, candidate.path);

        let poll_fd = libc::pollfd {
            fd: device.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };

        Ok(Self {
            device,
            name: candidate.name,
            path: candidate.path,
            poll_fd,
            grabbed: true,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Read everything currently queued without blocking.
    ///
    /// Polls and fetches until the device reports no more data, so a burst
    /// larger than one read lands in the same tick.
    pub fn drain(&mut self, out: &mut Vec<HardwareEdge>) -> DeviceResult<()> {
        while self.readable()? {
            let events = match self.device.fetch_events() {
                Ok(events) => events,
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(DeviceError::Io(e)),
            };
            push_key_edges(events, out);
        }
        Ok(())
    }

    /// Zero-timeout poll of the device fd
    fn readable(&mut self) -> DeviceResult<bool> {
        self.poll_fd.revents = 0;
        let ready = unsafe { libc::poll(&mut self.poll_fd, 1, 0) };

        if ready < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(DeviceError::Io(err));
        }
        Ok(ready > 0 && self.poll_fd.revents & libc::POLLIN != 0)
    }

    /// Release the exclusive grab
    pub fn ungrab(&mut self) {
        if self.grabbed {
            let _ = self.device.ungrab();
            self.grabbed = false;
            log::info!("released {}", self.path);
        }
    }
}

impl Drop for InputDevice {
    fn drop(&mut self) {
        self.ungrab();
    }
}
