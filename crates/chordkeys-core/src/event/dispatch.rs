// Chordkeys Dispatcher
// One tick: hardware edges in, device events out

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::output::SyntheticKeyboard;
use crate::state::{KeyRegistry, KeySet};
use crate::transform::{LayerEngine, Mode};
use crate::{HardwareEdge, KeyEvent, LogicalKey};

/// Number of device events kept for the monitor
const HISTORY_LEN: usize = 16;

/// Read-only view of the dispatcher for the terminal monitor
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub tick: u64,
    pub mode: Mode,
    pub layer: Option<String>,
    pub activation_key: Option<LogicalKey>,
    pub last_combo_separation: Option<Duration>,
    pub input_held: KeySet,
    pub output_held: KeySet,
    /// Most recent device events, oldest first
    pub recent: Vec<KeyEvent>,
}

/// Owns the input registry, the layer engine and the output mirror.
///
/// Per tick: apply hardware edges, run the engine, collect its edges, then
/// forward every real edge it did not consume (presses, then repeats, then
/// releases), expand everything through the synthetic keyboard and advance
/// both registries.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    input: KeyRegistry,
    engine: LayerEngine,
    output: SyntheticKeyboard,
    history: VecDeque<KeyEvent>,
    ticks: u64,
}

impl Dispatcher {
    pub fn new(engine: LayerEngine) -> Self {
        Self {
            input: KeyRegistry::new(),
            engine,
            output: SyntheticKeyboard::new(),
            history: VecDeque::with_capacity(HISTORY_LEN),
            ticks: 0,
        }
    }

    pub fn input(&self) -> &KeyRegistry {
        &self.input
    }

    pub fn engine(&self) -> &LayerEngine {
        &self.engine
    }

    pub fn output(&self) -> &SyntheticKeyboard {
        &self.output
    }

    /// Run one tick and return the device events to write, in order
    pub fn tick(&mut self, edges: &[HardwareEdge], now: Instant) -> Vec<KeyEvent> {
        for edge in edges {
            self.input.apply_hardware_edge(edge.key, edge.pressed);
        }

        let engine_tick = self.engine.tick(&self.input, now);
        let consumed = engine_tick.consumed;
        let mut logical = engine_tick.emitted;

        logical.extend(
            self.input
                .just_pressed()
                .into_iter()
                .filter(|k| !consumed.contains(*k))
                .map(KeyEvent::press),
        );
        logical.extend(
            self.input
                .sustained()
                .into_iter()
                .filter(|k| !consumed.contains(*k))
                .map(KeyEvent::repeat),
        );
        logical.extend(
            self.input
                .just_released()
                .into_iter()
                .filter(|k| !consumed.contains(*k))
                .map(KeyEvent::release),
        );

        let device = self.output.emit_all(logical);

        self.input.advance();
        self.output.advance();
        self.ticks += 1;

        for event in device.iter().filter(|e| e.command != crate::EdgeCommand::Repeat) {
            if self.history.len() == HISTORY_LEN {
                self.history.pop_front();
            }
            self.history.push_back(*event);
        }

        device
    }

    /// Release everything the output still holds
    pub fn release_all(&mut self) -> Vec<KeyEvent> {
        let events = self.output.release_all();
        self.output.advance();
        events
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.ticks,
            mode: self.engine.mode(),
            layer: self.engine.current_layer().map(|l| l.name().to_string()),
            activation_key: self.engine.activation_key(),
            last_combo_separation: self.engine.last_combo_separation(),
            input_held: self.input.held(),
            output_held: self.output.registry().held(),
            recent: self.history.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layer;
    use crate::transform::EngineConfig;

    fn dispatcher() -> Dispatcher {
        let layers = vec![Layer::new("homesick")
            .with_secondary(LogicalKey::F)
            .with_mapping(LogicalKey::A, LogicalKey::Escape)];
        Dispatcher::new(LayerEngine::new(EngineConfig::default(), layers).unwrap())
    }

    #[test]
    fn test_plain_typing_passes_through() {
        let base = Instant::now();
        let mut d = dispatcher();

        let out = d.tick(&[HardwareEdge::new(LogicalKey::Q, true)], base);
        assert_eq!(out, vec![KeyEvent::press(LogicalKey::Q)]);

        let out = d.tick(&[], base + Duration::from_millis(2));
        assert_eq!(out, vec![KeyEvent::repeat(LogicalKey::Q)]);

        let out = d.tick(&[HardwareEdge::new(LogicalKey::Q, false)], base + Duration::from_millis(4));
        assert_eq!(out, vec![KeyEvent::release(LogicalKey::Q)]);
    }

    #[test]
    fn test_engine_edges_come_before_forwarded_edges() {
        let base = Instant::now();
        let mut d = dispatcher();

        d.tick(&[HardwareEdge::new(LogicalKey::Space, true)], base);
        let out = d.tick(&[HardwareEdge::new(LogicalKey::Q, true)], base + Duration::from_millis(30));
        assert_eq!(
            out,
            vec![
                KeyEvent::press(LogicalKey::Space),
                KeyEvent::release(LogicalKey::Space),
                KeyEvent::press(LogicalKey::Q),
            ]
        );
    }

    #[test]
    fn test_snapshot_reports_state() {
        let base = Instant::now();
        let mut d = dispatcher();
        d.tick(&[HardwareEdge::new(LogicalKey::J, true)], base);

        let snap = d.snapshot();
        assert_eq!(snap.tick, 1);
        assert_eq!(snap.mode, Mode::Idle);
        assert_eq!(snap.input_held.as_slice(), &[LogicalKey::J]);
        assert_eq!(snap.output_held.as_slice(), &[LogicalKey::J]);
        assert_eq!(snap.recent, vec![KeyEvent::press(LogicalKey::J)]);
    }

    #[test]
    fn test_release_all() {
        let base = Instant::now();
        let mut d = dispatcher();
        d.tick(&[HardwareEdge::new(LogicalKey::W, true)], base);
        assert_eq!(d.release_all(), vec![KeyEvent::release(LogicalKey::W)]);
        assert!(d.output().registry().held().is_empty());
    }
}
