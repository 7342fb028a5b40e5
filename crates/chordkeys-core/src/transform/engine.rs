// Chordkeys Layer Engine
// Trigger state machine and per-tick layer translation
//
// The engine reads one KeyRegistry snapshot per tick and returns the edges it
// synthesized together with the keys whose real edges it claimed. It never
// touches the output directly.

use std::fmt;
use std::time::{Duration, Instant};

use crate::combo::ComboTimer;
use crate::layer::{Layer, LayerActivation};
use crate::state::{ConsumedKeys, KeyRegistry};
use crate::switch::EdgeState;
use crate::{KeyEvent, LogicalKey};

/// Errors raised when building an engine from layers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    #[error("Trigger key {trigger} cannot be a secondary key (layer {layer})")]
    TriggerAsSecondary { trigger: LogicalKey, layer: String },

    #[error("Secondary key {key} selects more than one layer")]
    DuplicateSecondary { key: LogicalKey },
}

/// How layer mode is entered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationMode {
    /// Tap the trigger, then press it again together with a secondary key
    #[default]
    DoubleTap,
    /// Press the trigger and a secondary key together. The trigger types
    /// normally when no secondary follows.
    Chord,
}

impl fmt::Display for ActivationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationMode::DoubleTap => write!(f, "double_tap"),
            ActivationMode::Chord => write!(f, "chord"),
        }
    }
}

/// Timing and trigger settings for the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Key that engages layer mode
    pub trigger: LogicalKey,
    pub activation: ActivationMode,
    /// Maximum time between the two trigger presses
    pub activation_window: Duration,
    /// Maximum separation between trigger and secondary presses
    pub combo_window: Duration,
    /// Layer engaged when no secondary key is pressed with the trigger
    pub default_layer: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trigger: LogicalKey::Space,
            activation: ActivationMode::DoubleTap,
            activation_window: Duration::from_millis(200),
            combo_window: Duration::from_millis(35),
            default_layer: None,
        }
    }
}

/// Engine mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    /// First trigger press seen, waiting for the second (double tap only)
    Pending { started_at: Instant },
    /// Trigger confirmed and still held. `layer` indexes the engine's layers.
    Engaged { layer: Option<usize> },
}

impl Mode {
    pub fn is_engaged(&self) -> bool {
        matches!(self, Mode::Engaged { .. })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Idle => write!(f, "idle"),
            Mode::Pending { .. } => write!(f, "pending"),
            Mode::Engaged { .. } => write!(f, "engaged"),
        }
    }
}

/// Output of one engine tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineTick {
    /// Synthesized edges, in emission order
    pub emitted: Vec<KeyEvent>,
    /// Keys whose real edges must not be forwarded this tick
    pub consumed: ConsumedKeys,
}

/// Layer remapping engine
#[derive(Debug, Clone)]
pub struct LayerEngine {
    config: EngineConfig,
    layers: Vec<Layer>,
    combos: ComboTimer<LayerActivation>,
    default_layer: Option<usize>,
    mode: Mode,
    current_layer: Option<usize>,
    activation_key: Option<LogicalKey>,
    engaged_at: Option<Instant>,
    /// A mapping emitted a press since layer mode was engaged
    mapping_used: bool,
}

impl LayerEngine {
    pub fn new(config: EngineConfig, layers: Vec<Layer>) -> Result<Self, EngineError> {
        let default_layer = match &config.default_layer {
            Some(name) => Some(
                layers
                    .iter()
                    .position(|l| l.name() == name)
                    .ok_or_else(|| EngineError::UnknownLayer(name.clone()))?,
            ),
            None => None,
        };

        let mut combos = ComboTimer::new();
        for layer in &layers {
            for &secondary in layer.secondaries() {
                if secondary == config.trigger {
                    return Err(EngineError::TriggerAsSecondary {
                        trigger: config.trigger,
                        layer: layer.name().to_string(),
                    });
                }
                let activation = LayerActivation::new(layer.name(), secondary);
                if !combos.register(config.trigger, secondary, config.combo_window, activation) {
                    return Err(EngineError::DuplicateSecondary { key: secondary });
                }
            }
        }

        log::debug!(
            "layer engine: trigger {}, {} layers, {} combos",
            config.trigger,
            layers.len(),
            combos.len()
        );

        Ok(Self {
            config,
            layers,
            combos,
            default_layer,
            mode: Mode::Idle,
            current_layer: None,
            activation_key: None,
            engaged_at: None,
            mapping_used: false,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn trigger(&self) -> LogicalKey {
        self.config.trigger
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_layer(&self) -> Option<&Layer> {
        self.current_layer.and_then(|i| self.layers.get(i))
    }

    pub fn activation_key(&self) -> Option<LogicalKey> {
        self.activation_key
    }

    /// Separation between the trigger and secondary of the last fired combo
    pub fn last_combo_separation(&self) -> Option<Duration> {
        self.combos.last_separation()
    }

    /// Run one tick against the registry snapshot
    pub fn tick(&mut self, registry: &KeyRegistry, now: Instant) -> EngineTick {
        let mut out = EngineTick::default();
        self.combos.record_presses(registry, now);

        match self.config.activation {
            ActivationMode::DoubleTap => self.tick_double_tap(registry, now, &mut out),
            ActivationMode::Chord => self.tick_chord(registry, &mut out),
        }

        self.translate(registry, &mut out);
        self.consume_activation_key(registry, &mut out);
        out
    }

    fn tick_double_tap(&mut self, registry: &KeyRegistry, now: Instant, out: &mut EngineTick) {
        let trigger = self.config.trigger;

        // The trigger only ever reaches the output through the literal tap
        out.consumed.insert(trigger);

        match self.mode {
            Mode::Idle => {
                if registry.is_just_pressed(trigger) {
                    log::debug!("{} pressed, waiting for second tap", trigger);
                    self.mode = Mode::Pending { started_at: now };
                }
            }
            Mode::Pending { started_at } => {
                if registry.is_just_pressed(trigger) {
                    self.engage(registry, now);
                } else if now.saturating_duration_since(started_at) >= self.config.activation_window {
                    log::debug!("activation window elapsed, sending literal {}", trigger);
                    self.emit_literal_trigger(out);
                    self.mode = Mode::Idle;
                } else if registry.just_pressed().iter().any(|&k| k != trigger) {
                    log::debug!("key pressed during activation window, sending literal {}", trigger);
                    self.emit_literal_trigger(out);
                    self.mode = Mode::Idle;
                }
            }
            Mode::Engaged { layer } => {
                if registry.is_just_released(trigger) {
                    let used = self.mapping_used;
                    self.disengage(registry, out);
                    if !used {
                        log::debug!("layer mode left unused, sending literal {}", trigger);
                        self.emit_literal_trigger(out);
                    }
                } else if layer.is_none() {
                    self.select_layer(registry);
                }
            }
        }
    }

    /// The trigger passes through until a secondary lands within the combo
    /// window of it; from then on it is consumed until released.
    fn tick_chord(&mut self, registry: &KeyRegistry, out: &mut EngineTick) {
        let trigger = self.config.trigger;

        match self.mode {
            Mode::Idle | Mode::Pending { .. } => {
                if !registry.is_down(trigger) {
                    return;
                }
                let Some(pressed_at) = self.combos.last_press(trigger) else {
                    return;
                };
                self.engaged_at = Some(pressed_at);
                self.select_layer(registry);
                if self.current_layer.is_none() {
                    self.engaged_at = None;
                    return;
                }

                log::debug!("layer mode engaged by chord");
                self.mapping_used = false;
                out.consumed.insert(trigger);
                if !registry.is_just_pressed(trigger) {
                    // Its press already reached the output
                    out.emitted.push(KeyEvent::release(trigger));
                }
            }
            Mode::Engaged { .. } => {
                out.consumed.insert(trigger);
                if registry.is_just_released(trigger) {
                    self.disengage(registry, out);
                }
            }
        }
    }

    fn emit_literal_trigger(&self, out: &mut EngineTick) {
        out.emitted.push(KeyEvent::press(self.config.trigger));
        out.emitted.push(KeyEvent::release(self.config.trigger));
    }

    fn engage(&mut self, registry: &KeyRegistry, now: Instant) {
        log::debug!("layer mode engaged");
        self.mode = Mode::Engaged { layer: None };
        self.engaged_at = Some(now);
        self.mapping_used = false;
        self.select_layer(registry);

        if self.current_layer.is_none() {
            if let Some(index) = self.default_layer {
                self.set_layer(index, None);
            }
        }
    }

    /// Evaluate trigger/secondary combos; the first declared match wins.
    ///
    /// A secondary pressed before the confirming trigger press was already
    /// forwarded literally, so it cannot select a layer.
    fn select_layer(&mut self, registry: &KeyRegistry) {
        let Some(engaged_at) = self.engaged_at else {
            return;
        };
        let outcome = self.combos.evaluate(registry);
        let Some(activation) = outcome.fired.into_iter().find(|a| {
            self.combos
                .last_press(a.secondary)
                .is_some_and(|t| t >= engaged_at)
        }) else {
            return;
        };

        match self.layers.iter().position(|l| l.name() == activation.layer_name) {
            Some(index) => self.set_layer(index, Some(activation.secondary)),
            None => log::warn!("combo fired for unknown layer {}", activation.layer_name),
        }
    }

    fn set_layer(&mut self, index: usize, secondary: Option<LogicalKey>) {
        if let Some(layer) = self.layers.get(index) {
            log::debug!(
                "layer {} selected{}",
                layer.name(),
                secondary.map(|k| format!(" by {}", k)).unwrap_or_default()
            );
        }
        self.mode = Mode::Engaged { layer: Some(index) };
        self.current_layer = Some(index);
        if secondary.is_some() {
            self.activation_key = secondary;
        }
    }

    /// Trigger released: end layer mode and release everything not held through
    fn disengage(&mut self, registry: &KeyRegistry, out: &mut EngineTick) {
        log::debug!("layer mode released");
        for layer in self.layers.iter_mut() {
            for mapping in layer.mappings_mut() {
                if !mapping.active {
                    continue;
                }
                if mapping.output_down {
                    // Held through: released when its input goes up
                    if registry.is_down(mapping.input) {
                        continue;
                    }
                    log::trace!("sweep releases {}", mapping.output);
                    out.emitted.push(KeyEvent::release(mapping.output));
                    out.consumed.insert(mapping.input);
                }
                mapping.deactivate();
            }
        }
        self.mode = Mode::Idle;
        self.current_layer = None;
        self.engaged_at = None;
    }

    fn translate(&mut self, registry: &KeyRegistry, out: &mut EngineTick) {
        if let Mode::Engaged { layer: Some(index) } = self.mode {
            if let Some(layer) = self.layers.get_mut(index) {
                for mapping in layer.mappings_mut() {
                    mapping.active = true;
                }
            }
        }

        let exempt = self.activation_key;
        for layer in self.layers.iter_mut() {
            for mapping in layer.mappings_mut() {
                if !mapping.active || Some(mapping.input) == exempt {
                    continue;
                }
                match registry.state(mapping.input) {
                    EdgeState::JustSwitchedOn => {
                        out.emitted.push(KeyEvent::press(mapping.output));
                        out.consumed.insert(mapping.input);
                        mapping.output_down = true;
                        self.mapping_used = true;
                    }
                    EdgeState::SustainedOn => {
                        if mapping.output_down {
                            out.emitted.push(KeyEvent::repeat(mapping.output));
                            out.consumed.insert(mapping.input);
                        }
                    }
                    EdgeState::JustSwitchedOff => {
                        if mapping.output_down {
                            out.emitted.push(KeyEvent::release(mapping.output));
                            out.consumed.insert(mapping.input);
                        }
                        mapping.deactivate();
                    }
                    EdgeState::SustainedOff => {}
                }
            }
        }
    }

    /// The secondary that selected the layer stays silent until it is released
    fn consume_activation_key(&mut self, registry: &KeyRegistry, out: &mut EngineTick) {
        let Some(key) = self.activation_key else {
            return;
        };
        match registry.state(key) {
            EdgeState::JustSwitchedOn | EdgeState::SustainedOn => out.consumed.insert(key),
            EdgeState::JustSwitchedOff => {
                out.consumed.insert(key);
                self.activation_key = None;
            }
            EdgeState::SustainedOff => self.activation_key = None,
        }
    }
}
