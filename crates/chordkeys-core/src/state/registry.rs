// Chordkeys Key Registry
// Owned per-key edge state with static shift metadata

use std::collections::VecDeque;

use indexmap::IndexMap;
use smallvec::SmallVec;
use strum::IntoEnumIterator;

use crate::switch::{EdgeState, EdgeSwitch};
use crate::LogicalKey;

/// Small inline set of keys, in registry order
pub type KeySet = SmallVec<[LogicalKey; 8]>;

/// Registry invariant violations, reported at startup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Key {0} is not present in the registry")]
    UnknownKey(LogicalKey),

    #[error("Key {key} refers to {variant}, which is not present in the registry")]
    MissingVariant { key: LogicalKey, variant: LogicalKey },

    #[error("Shift relation is not an involution: {key} <-> {variant}")]
    BrokenShiftRelation { key: LogicalKey, variant: LogicalKey },
}

/// Per-key record: the switch plus static metadata
#[derive(Debug, Clone)]
pub struct KeyRecord {
    pub key: LogicalKey,
    pub switch: EdgeSwitch,
    pub display_label: &'static str,
    pub is_shiftable: bool,
    pub shifted_variant: Option<LogicalKey>,
    pub requires_modifier: bool,
    pub unshifted_variant: Option<LogicalKey>,
}

impl KeyRecord {
    pub fn new(key: LogicalKey) -> Self {
        let shifted_variant = key.shifted_variant();
        let unshifted_variant = key.unshifted_variant();
        Self {
            key,
            switch: EdgeSwitch::new(),
            display_label: key.label(),
            is_shiftable: shifted_variant.is_some(),
            shifted_variant,
            requires_modifier: unshifted_variant.is_some(),
            unshifted_variant,
        }
    }
}

/// The canonical set of logical keys and their per-tick edge state.
///
/// Reads (`just_pressed`, `held`, `just_released`, `state`) never mutate, so
/// every consumer in a tick sees the same snapshot. `advance` must run exactly
/// once per tick after all consumers are done.
///
/// A key may change state at most once per tick. A second changing edge for
/// the same key inside one tick (a tap shorter than the tick period) is queued
/// and replayed on the following tick instead of collapsing the edge.
#[derive(Debug, Clone)]
pub struct KeyRegistry {
    records: IndexMap<LogicalKey, KeyRecord>,
    deferred: VecDeque<(LogicalKey, bool)>,
}

impl KeyRegistry {
    /// Registry containing every logical key
    pub fn new() -> Self {
        Self::with_keys(LogicalKey::iter())
    }

    /// Registry restricted to the given keys
    pub fn with_keys(keys: impl IntoIterator<Item = LogicalKey>) -> Self {
        let records = keys
            .into_iter()
            .map(|key| (key, KeyRecord::new(key)))
            .collect();
        Self {
            records,
            deferred: VecDeque::new(),
        }
    }

    /// Check that every shift reference resolves and the relation is an involution
    pub fn validate(&self) -> Result<(), RegistryError> {
        for record in self.records.values() {
            if let Some(shifted) = record.shifted_variant {
                let target = self.records.get(&shifted).ok_or(RegistryError::MissingVariant {
                    key: record.key,
                    variant: shifted,
                })?;
                if target.unshifted_variant != Some(record.key) {
                    return Err(RegistryError::BrokenShiftRelation {
                        key: record.key,
                        variant: shifted,
                    });
                }
            }
            if let Some(base) = record.unshifted_variant {
                let target = self.records.get(&base).ok_or(RegistryError::MissingVariant {
                    key: record.key,
                    variant: base,
                })?;
                if target.shifted_variant != Some(record.key) {
                    return Err(RegistryError::BrokenShiftRelation {
                        key: record.key,
                        variant: base,
                    });
                }
            }
        }
        Ok(())
    }

    /// Number of keys in the registry
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, key: LogicalKey) -> bool {
        self.records.contains_key(&key)
    }

    pub fn get(&self, key: LogicalKey) -> Option<&KeyRecord> {
        self.records.get(&key)
    }

    pub fn require(&self, key: LogicalKey) -> Result<&KeyRecord, RegistryError> {
        self.records.get(&key).ok_or(RegistryError::UnknownKey(key))
    }

    /// Feed one hardware edge for the current tick
    pub fn apply_hardware_edge(&mut self, key: LogicalKey, pressed: bool) {
        let Some(record) = self.records.get_mut(&key) else {
            log::trace!("dropping edge for unregistered key {}", key);
            return;
        };

        let already_queued = self.deferred.iter().any(|(k, _)| *k == key);
        let would_collapse =
            record.switch.changed_this_tick() && record.switch.is_down() != pressed;

        if already_queued || would_collapse {
            log::trace!("deferring {} {} to the next tick", key, pressed);
            self.deferred.push_back((key, pressed));
        } else {
            record.switch.set(pressed);
        }
    }

    /// Directly set a key's input, bypassing edge deferral.
    ///
    /// Used for the output mirror, where the switch tracks synthetic state.
    pub fn set_synthetic(&mut self, key: LogicalKey, pressed: bool) {
        if let Some(record) = self.records.get_mut(&key) {
            record.switch.set(pressed);
        }
    }

    pub fn state(&self, key: LogicalKey) -> EdgeState {
        self.records
            .get(&key)
            .map(|r| r.switch.state())
            .unwrap_or(EdgeState::SustainedOff)
    }

    pub fn is_down(&self, key: LogicalKey) -> bool {
        self.state(key).is_down()
    }

    pub fn is_just_pressed(&self, key: LogicalKey) -> bool {
        self.state(key) == EdgeState::JustSwitchedOn
    }

    pub fn is_just_released(&self, key: LogicalKey) -> bool {
        self.state(key) == EdgeState::JustSwitchedOff
    }

    fn keys_in(&self, pred: impl Fn(EdgeState) -> bool) -> KeySet {
        self.records
            .values()
            .filter(|r| pred(r.switch.state()))
            .map(|r| r.key)
            .collect()
    }

    /// Keys that went down this tick
    pub fn just_pressed(&self) -> KeySet {
        self.keys_in(|s| s == EdgeState::JustSwitchedOn)
    }

    /// All keys currently down, including those that went down this tick
    pub fn held(&self) -> KeySet {
        self.keys_in(EdgeState::is_down)
    }

    /// Keys down for more than one tick
    pub fn sustained(&self) -> KeySet {
        self.keys_in(|s| s == EdgeState::SustainedOn)
    }

    /// Keys that went up this tick
    pub fn just_released(&self) -> KeySet {
        self.keys_in(|s| s == EdgeState::JustSwitchedOff)
    }

    /// Number of edges waiting for a later tick
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// Close the tick: commit every switch, then replay queued edges
    pub fn advance(&mut self) {
        for record in self.records.values_mut() {
            record.switch.advance();
        }

        let pending: Vec<_> = self.deferred.drain(..).collect();
        for (key, pressed) in pending {
            self.apply_hardware_edge(key, pressed);
        }
    }

    /// Iterate over all records in registry order
    pub fn iter(&self) -> impl Iterator<Item = &KeyRecord> {
        self.records.values()
    }
}

impl Default for KeyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_new_contains_every_key() {
        let registry = KeyRegistry::new();
        assert!(registry.contains(LogicalKey::Space));
        assert!(registry.contains(LogicalKey::Question));
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_record_metadata() {
        let registry = KeyRegistry::new();
        let one = registry.get(LogicalKey::Num1).unwrap();
        assert!(one.is_shiftable);
        assert_eq!(one.shifted_variant, Some(LogicalKey::Exclamation));
        assert!(!one.requires_modifier);

        let bang = registry.get(LogicalKey::Exclamation).unwrap();
        assert!(bang.requires_modifier);
        assert_eq!(bang.unshifted_variant, Some(LogicalKey::Num1));
        assert_eq!(bang.display_label, "!");
    }

    #[test]
    fn test_validate_reports_missing_variant() {
        let registry = KeyRegistry::with_keys([LogicalKey::Num1, LogicalKey::A]);
        assert_eq!(
            registry.validate(),
            Err(RegistryError::MissingVariant {
                key: LogicalKey::Num1,
                variant: LogicalKey::Exclamation,
            })
        );
    }

    #[test]
    fn test_edge_sets() {
        let mut registry = KeyRegistry::new();
        registry.apply_hardware_edge(LogicalKey::A, true);
        registry.apply_hardware_edge(LogicalKey::S, true);

        assert_eq!(registry.just_pressed().as_slice(), &[LogicalKey::A, LogicalKey::S]);
        assert_eq!(registry.held().as_slice(), &[LogicalKey::A, LogicalKey::S]);
        assert!(registry.just_released().is_empty());

        registry.advance();
        registry.apply_hardware_edge(LogicalKey::A, false);

        assert!(registry.just_pressed().is_empty());
        assert_eq!(registry.held().as_slice(), &[LogicalKey::S]);
        assert_eq!(registry.sustained().as_slice(), &[LogicalKey::S]);
        assert_eq!(registry.just_released().as_slice(), &[LogicalKey::A]);
    }

    #[test]
    fn test_reads_are_idempotent_within_a_tick() {
        let mut registry = KeyRegistry::new();
        registry.apply_hardware_edge(LogicalKey::Q, true);
        registry.apply_hardware_edge(LogicalKey::W, true);
        registry.advance();
        registry.apply_hardware_edge(LogicalKey::Q, false);
        registry.apply_hardware_edge(LogicalKey::E, true);

        let first = (registry.just_pressed(), registry.held(), registry.just_released());
        let second = (registry.just_pressed(), registry.held(), registry.just_released());
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_just_state_survives_advance() {
        let mut registry = KeyRegistry::new();
        let edges = [
            (LogicalKey::A, true),
            (LogicalKey::B, true),
            (LogicalKey::C, false),
            (LogicalKey::A, true),
        ];
        for (key, pressed) in edges {
            registry.apply_hardware_edge(key, pressed);
        }
        registry.advance();

        registry.apply_hardware_edge(LogicalKey::B, false);
        registry.advance();

        for record in registry.iter() {
            assert!(!record.switch.state().is_edge(), "{}", record.key);
        }
    }

    #[test]
    fn test_hardware_repeat_is_not_an_edge() {
        let mut registry = KeyRegistry::new();
        registry.apply_hardware_edge(LogicalKey::J, true);
        registry.advance();
        registry.apply_hardware_edge(LogicalKey::J, true);
        assert_eq!(registry.state(LogicalKey::J), EdgeState::SustainedOn);
        assert_eq!(registry.deferred_len(), 0);
    }

    #[test]
    fn test_tap_inside_one_tick_is_spread_over_two_ticks() {
        let mut registry = KeyRegistry::new();
        registry.apply_hardware_edge(LogicalKey::K, true);
        registry.apply_hardware_edge(LogicalKey::K, false);

        assert_eq!(registry.state(LogicalKey::K), EdgeState::JustSwitchedOn);
        assert_eq!(registry.deferred_len(), 1);

        registry.advance();
        assert_eq!(registry.state(LogicalKey::K), EdgeState::JustSwitchedOff);
        assert_eq!(registry.deferred_len(), 0);

        registry.advance();
        assert_eq!(registry.state(LogicalKey::K), EdgeState::SustainedOff);
    }

    #[test]
    fn test_deferred_edges_keep_their_order() {
        let mut registry = KeyRegistry::new();
        registry.apply_hardware_edge(LogicalKey::L, true);
        registry.apply_hardware_edge(LogicalKey::L, false);
        registry.apply_hardware_edge(LogicalKey::L, true);
        assert_eq!(registry.deferred_len(), 2);

        registry.advance();
        assert_eq!(registry.state(LogicalKey::L), EdgeState::JustSwitchedOff);
        registry.advance();
        assert_eq!(registry.state(LogicalKey::L), EdgeState::JustSwitchedOn);
        assert_eq!(registry.deferred_len(), 0);
    }

    #[test]
    fn test_unregistered_key_is_dropped() {
        let mut registry = KeyRegistry::with_keys([LogicalKey::A]);
        registry.apply_hardware_edge(LogicalKey::B, true);
        assert!(registry.held().is_empty());
        assert_eq!(registry.require(LogicalKey::B).err(), Some(RegistryError::UnknownKey(LogicalKey::B)));
    }
}
