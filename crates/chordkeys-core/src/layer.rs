// Chordkeys Layer Structures
// Mapping, Layer, LayerActivation

use std::fmt;

use crate::LogicalKey;

/// One input -> output translation inside a layer.
///
/// `active` is set while the layer is engaged and cleared on release or by
/// the trigger-release sweep. `output_down` records that a press for
/// `output` was emitted and its release is still owed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub input: LogicalKey,
    pub output: LogicalKey,
    pub active: bool,
    pub output_down: bool,
}

impl Mapping {
    pub fn new(input: LogicalKey, output: LogicalKey) -> Self {
        Self {
            input,
            output,
            active: false,
            output_down: false,
        }
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.output_down = false;
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.input, self.output)
    }
}

/// Named, ordered set of mappings plus the secondary keys that select it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    name: String,
    secondaries: Vec<LogicalKey>,
    mappings: Vec<Mapping>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secondaries: Vec::new(),
            mappings: Vec::new(),
        }
    }

    /// Layer mapping every shiftable key to its shifted variant
    pub fn shift_lock(name: impl Into<String>) -> Self {
        let mut layer = Self::new(name);
        for key in LogicalKey::shiftable_keys() {
            if let Some(shifted) = key.shifted_variant() {
                layer.add_mapping(key, shifted);
            }
        }
        layer
    }

    pub fn with_secondary(mut self, key: LogicalKey) -> Self {
        self.add_secondary(key);
        self
    }

    pub fn with_mapping(mut self, input: LogicalKey, output: LogicalKey) -> Self {
        self.add_mapping(input, output);
        self
    }

    /// Add a secondary key. Returns false if it was already present.
    pub fn add_secondary(&mut self, key: LogicalKey) -> bool {
        if self.secondaries.contains(&key) {
            return false;
        }
        self.secondaries.push(key);
        true
    }

    /// Add a mapping. Returns false if `input` is already mapped in this layer.
    pub fn add_mapping(&mut self, input: LogicalKey, output: LogicalKey) -> bool {
        if self.contains(input) {
            return false;
        }
        self.mappings.push(Mapping::new(input, output));
        true
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn secondaries(&self) -> &[LogicalKey] {
        &self.secondaries
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    pub fn mappings_mut(&mut self) -> &mut [Mapping] {
        &mut self.mappings
    }

    pub fn contains(&self, input: LogicalKey) -> bool {
        self.mappings.iter().any(|m| m.input == input)
    }

    /// Output key for `input`, if mapped
    pub fn get(&self, input: LogicalKey) -> Option<LogicalKey> {
        self.mappings
            .iter()
            .find(|m| m.input == input)
            .map(|m| m.output)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} mappings)", self.name, self.mappings.len())
    }
}

/// Combo action that selects a layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerActivation {
    pub layer_name: String,
    pub secondary: LogicalKey,
}

impl LayerActivation {
    pub fn new(layer_name: impl Into<String>, secondary: LogicalKey) -> Self {
        Self {
            layer_name: layer_name.into(),
            secondary,
        }
    }
}

impl fmt::Display for LayerActivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} via {}", self.layer_name, self.secondary)
    }
}
