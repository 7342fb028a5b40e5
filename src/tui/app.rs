use chordkeys_core::{ActivationMode, Config, KeyEvent, LogicalKey, Snapshot};

/// Non-repeat device events kept on screen
const MAX_EVENT_LINES: usize = 64;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pane {
    Status,
    Layers,
    Events,
}

/// One configured layer as shown in the layers pane
#[derive(Clone, Debug)]
pub struct LayerSummary {
    pub name: String,
    pub secondaries: Vec<LogicalKey>,
    /// `input -> output` pairs in declaration order
    pub mappings: Vec<(LogicalKey, LogicalKey)>,
}

pub struct App {
    pub focused_pane: Pane,
    pub device_name: String,
    pub trigger: LogicalKey,
    pub activation: ActivationMode,
    pub tick_rate_hz: u32,
    pub layers: Vec<LayerSummary>,
    pub layer_index: usize,
    pub snapshot: Option<Snapshot>,
    /// Device events seen across snapshots, oldest first
    pub events: Vec<KeyEvent>,
    pub overruns: u64,
    pub paused: bool,
    last_tick: u64,
}

impl App {
    pub fn new(device_name: &str, config: &Config) -> Self {
        let layers = config
            .layers
            .iter()
            .map(|layer| LayerSummary {
                name: layer.name().to_string(),
                secondaries: layer.secondaries().to_vec(),
                mappings: layer.mappings().iter().map(|m| (m.input, m.output)).collect(),
            })
            .collect();

        Self {
            focused_pane: Pane::Status,
            device_name: device_name.to_string(),
            trigger: config.trigger,
            activation: config.activation,
            tick_rate_hz: config.tick_rate_hz,
            layers,
            layer_index: 0,
            snapshot: None,
            events: Vec::new(),
            overruns: 0,
            paused: false,
            last_tick: 0,
        }
    }

    /// Take a new dispatcher snapshot, appending events not yet seen
    pub fn update(&mut self, snapshot: Snapshot, overruns: u64) {
        if self.paused {
            return;
        }

        if snapshot.tick != self.last_tick {
            // `recent` is a short ring; keep only what we have not shown yet
            let fresh = fresh_events(&self.events, &snapshot.recent);
            self.events.extend_from_slice(fresh);
            if self.events.len() > MAX_EVENT_LINES {
                let overflow = self.events.len() - MAX_EVENT_LINES;
                self.events.drain(0..overflow);
            }
        }

        self.last_tick = snapshot.tick;
        self.overruns = overruns;
        if let Some(name) = &snapshot.layer {
            if let Some(index) = self.layers.iter().position(|l| &l.name == name) {
                self.layer_index = index;
            }
        }
        self.snapshot = Some(snapshot);
    }

    pub fn selected_layer(&self) -> Option<&LayerSummary> {
        self.layers.get(self.layer_index)
    }

    pub fn select_next_layer(&mut self) {
        if !self.layers.is_empty() {
            self.layer_index = (self.layer_index + 1) % self.layers.len();
        }
    }

    pub fn select_previous_layer(&mut self) {
        if !self.layers.is_empty() {
            self.layer_index = (self.layer_index + self.layers.len() - 1) % self.layers.len();
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn cycle_pane_forward(&mut self) {
        self.focused_pane = match self.focused_pane {
            Pane::Status => Pane::Layers,
            Pane::Layers => Pane::Events,
            Pane::Events => Pane::Status,
        };
    }

    pub fn cycle_pane_backward(&mut self) {
        self.focused_pane = match self.focused_pane {
            Pane::Status => Pane::Events,
            Pane::Layers => Pane::Status,
            Pane::Events => Pane::Layers,
        };
    }
}

/// Suffix of `recent` that is not already at the end of `shown`.
///
/// Finds the longest prefix of `recent` matching a suffix of `shown`.
fn fresh_events<'a>(shown: &[KeyEvent], recent: &'a [KeyEvent]) -> &'a [KeyEvent] {
    let max = shown.len().min(recent.len());
    for overlap in (1..=max).rev() {
        if shown[shown.len() - overlap..] == recent[..overlap] {
            return &recent[overlap..];
        }
    }
    recent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_events_skips_overlap() {
        let a = KeyEvent::press(LogicalKey::A);
        let b = KeyEvent::release(LogicalKey::A);
        let c = KeyEvent::press(LogicalKey::B);

        assert_eq!(fresh_events(&[], &[a, b]), &[a, b]);
        assert_eq!(fresh_events(&[a, b], &[a, b, c]), &[c]);
        assert_eq!(fresh_events(&[a, b, c], &[b, c]), &[] as &[KeyEvent]);
        assert_eq!(fresh_events(&[c], &[a, b]), &[a, b]);
    }

    #[test]
    fn test_layer_selection_wraps() {
        let mut app = App::new("test", &Config::default());
        assert_eq!(app.selected_layer().map(|l| l.name.as_str()), Some("homesick"));
        app.select_previous_layer();
        assert_eq!(app.selected_layer().map(|l| l.name.as_str()), Some("shift_lock"));
        app.select_next_layer();
        assert_eq!(app.selected_layer().map(|l| l.name.as_str()), Some("homesick"));
    }
}
