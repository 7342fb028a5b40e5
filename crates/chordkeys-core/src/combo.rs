// Chordkeys Combo Timer
// Detects two keys pressed close together in time

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::state::{ConsumedKeys, KeyRegistry};
use crate::LogicalKey;

/// One registered key pair and the action it fires
#[derive(Debug, Clone)]
pub struct ComboRegistration<A> {
    pub first: LogicalKey,
    pub second: LogicalKey,
    pub max_separation: Duration,
    pub action: A,
    latched: bool,
}

impl<A> ComboRegistration<A> {
    /// True if this registration is for the unordered pair `{a, b}`
    pub fn is_pair(&self, a: LogicalKey, b: LogicalKey) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }

    pub fn involves(&self, key: LogicalKey) -> bool {
        self.first == key || self.second == key
    }
}

/// Result of evaluating the registered combos for one tick
#[derive(Debug, Clone)]
pub struct ComboOutcome<A> {
    /// Actions fired this tick, in registration order
    pub fired: Vec<A>,
    /// Members of every fired pair
    pub consumed: ConsumedKeys,
}

impl<A> Default for ComboOutcome<A> {
    fn default() -> Self {
        Self {
            fired: Vec::new(),
            consumed: ConsumedKeys::new(),
        }
    }
}

impl<A> ComboOutcome<A> {
    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}

/// Pairs of keys with a maximum press separation.
///
/// The last press time of every registered key is kept centrally, so a key
/// that takes part in several pairs is timestamped once. Time is always
/// supplied by the caller.
///
/// By default a pair fires on every tick that both keys are held and their
/// presses were close enough. `with_one_shot` latches a pair after it fires
/// until one of its keys is released.
#[derive(Debug, Clone)]
pub struct ComboTimer<A> {
    registrations: Vec<ComboRegistration<A>>,
    last_press: HashMap<LogicalKey, Instant>,
    last_separation: Option<Duration>,
    one_shot: bool,
}

impl<A: Clone> ComboTimer<A> {
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            last_press: HashMap::new(),
            last_separation: None,
            one_shot: false,
        }
    }

    pub fn with_one_shot(mut self) -> Self {
        self.one_shot = true;
        self
    }

    /// Register a pair. Returns false if the unordered pair already exists,
    /// in which case the existing registration is kept.
    pub fn register(
        &mut self,
        a: LogicalKey,
        b: LogicalKey,
        max_separation: Duration,
        action: A,
    ) -> bool {
        if self.registrations.iter().any(|r| r.is_pair(a, b)) {
            log::debug!("combo {}+{} already registered", a, b);
            return false;
        }
        self.registrations.push(ComboRegistration {
            first: a,
            second: b,
            max_separation,
            action,
            latched: false,
        });
        true
    }

    pub fn registrations(&self) -> &[ComboRegistration<A>] {
        &self.registrations
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Whether any registration uses `key`
    pub fn involves(&self, key: LogicalKey) -> bool {
        self.registrations.iter().any(|r| r.involves(key))
    }

    pub fn last_press(&self, key: LogicalKey) -> Option<Instant> {
        self.last_press.get(&key).copied()
    }

    /// Separation of the most recently fired pair
    pub fn last_separation(&self) -> Option<Duration> {
        self.last_separation
    }

    /// Timestamp every registered key that went down this tick
    pub fn record_presses(&mut self, registry: &KeyRegistry, now: Instant) {
        for key in registry.just_pressed() {
            if self.involves(key) {
                log::trace!("combo timestamp {} at {:?}", key, now);
                self.last_press.insert(key, now);
            }
        }
    }

    /// Fire every pair whose keys are both held and were pressed close enough
    pub fn evaluate(&mut self, registry: &KeyRegistry) -> ComboOutcome<A> {
        let mut outcome = ComboOutcome::default();

        for reg in self.registrations.iter_mut() {
            let both_held = registry.is_down(reg.first) && registry.is_down(reg.second);
            if !both_held {
                reg.latched = false;
                continue;
            }

            let (Some(ta), Some(tb)) = (
                self.last_press.get(&reg.first),
                self.last_press.get(&reg.second),
            ) else {
                continue;
            };

            let separation = if ta >= tb { *ta - *tb } else { *tb - *ta };
            if separation >= reg.max_separation {
                continue;
            }

            if self.one_shot && reg.latched {
                continue;
            }
            reg.latched = true;

            log::debug!(
                "combo {}+{} fired ({:?} apart)",
                reg.first,
                reg.second,
                separation
            );
            self.last_separation = Some(separation);
            outcome.fired.push(reg.action.clone());
            outcome.consumed.insert(reg.first);
            outcome.consumed.insert(reg.second);
        }

        outcome
    }

    /// `record_presses` followed by `evaluate`
    pub fn tick(&mut self, registry: &KeyRegistry, now: Instant) -> ComboOutcome<A> {
        self.record_presses(registry, now);
        self.evaluate(registry)
    }
}

impl<A: Clone> Default for ComboTimer<A> {
    fn default() -> Self {
        Self::new()
    }
}
