// Chordkeys Input Layer - Device Filtering
// Choosing the single input device to grab

/// What we know about one enumerated input device
#[derive(Debug, Clone)]
pub struct DeviceCandidate {
    pub name: String,
    pub path: String,
    pub is_keyboard: bool,
}

impl DeviceCandidate {
    pub fn is_virtual(&self) -> bool {
        super::is_virtual_device(&self.name)
    }
}

/// Check a device against the configured filter.
///
/// With an explicit list, a device matches by path or by name. Without one,
/// any physical keyboard matches. Our own virtual device never matches.
pub fn matches_device_filter(candidate: &DeviceCandidate, only: &[String]) -> bool {
    if candidate.is_virtual() {
        return false;
    }

    if !only.is_empty() {
        return only
            .iter()
            .any(|m| *m == candidate.path || *m == candidate.name);
    }

    candidate.is_keyboard
}

/// Index of the device to drive.
///
/// Explicit filters are honoured in the order they were given; autodetection
/// takes the first keyboard in enumeration order.
pub fn select_device(candidates: &[DeviceCandidate], only: &[String]) -> Option<usize> {
    if only.is_empty() {
        return candidates
            .iter()
            .position(|c| matches_device_filter(c, only));
    }

    only.iter().find_map(|wanted| {
        candidates.iter().position(|c| {
            !c.is_virtual() && (c.path == *wanted || c.name == *wanted)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, path: &str, is_keyboard: bool) -> DeviceCandidate {
        DeviceCandidate {
            name: name.to_string(),
            path: path.to_string(),
            is_keyboard,
        }
    }

    #[test]
    fn test_matches_by_path() {
        let dev = candidate("Logitech Keyboard", "/dev/input/event0", true);
        assert!(matches_device_filter(&dev, &["/dev/input/event0".to_string()]));
    }

    #[test]
    fn test_matches_by_name() {
        let dev = candidate("Logitech Keyboard", "/dev/input/event5", true);
        assert!(matches_device_filter(&dev, &["Logitech Keyboard".to_string()]));
    }

    #[test]
    fn test_no_match_when_filtered() {
        let dev = candidate("Logitech Keyboard", "/dev/input/event5", true);
        assert!(!matches_device_filter(&dev, &["/dev/input/event9".to_string()]));
    }

    #[test]
    fn test_autodetect_excludes_non_keyboard() {
        let dev = candidate("Logitech Mouse", "/dev/input/event2", false);
        assert!(!matches_device_filter(&dev, &[]));
    }

    #[test]
    fn test_virtual_device_never_matches() {
        let dev = candidate("chordkeys (virtual) Keyboard", "/dev/input/event9", true);
        assert!(!matches_device_filter(&dev, &[]));
        assert!(!matches_device_filter(&dev, &["/dev/input/event9".to_string()]));
    }

    #[test]
    fn test_select_first_keyboard() {
        let devices = vec![
            candidate("Power Button", "/dev/input/event0", false),
            candidate("chordkeys (virtual) Keyboard", "/dev/input/event1", true),
            candidate("AT Translated Set 2 keyboard", "/dev/input/event2", true),
            candidate("USB Keyboard", "/dev/input/event3", true),
        ];
        assert_eq!(select_device(&devices, &[]), Some(2));
    }

    #[test]
    fn test_select_honours_filter_order() {
        let devices = vec![
            candidate("AT Translated Set 2 keyboard", "/dev/input/event2", true),
            candidate("USB Keyboard", "/dev/input/event3", true),
        ];
        let only = vec!["USB Keyboard".to_string(), "/dev/input/event2".to_string()];
        assert_eq!(select_device(&devices, &only), Some(1));
        assert_eq!(select_device(&devices, &["nothing".to_string()]), None);
    }
}
