// Chordkeys Consumed Keys
// Per-tick set of keys whose real edges are not forwarded

use smallvec::SmallVec;

use crate::LogicalKey;

/// Keys claimed by the layer engine for one tick.
///
/// Insertion order is kept and duplicates are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumedKeys {
    keys: SmallVec<[LogicalKey; 8]>,
}

impl ConsumedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: LogicalKey) {
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }

    pub fn contains(&self, key: LogicalKey) -> bool {
        self.keys.contains(&key)
    }

    pub fn merge(&mut self, other: &ConsumedKeys) {
        for &key in &other.keys {
            self.insert(key);
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = LogicalKey> + '_ {
        self.keys.iter().copied()
    }
}

impl Extend<LogicalKey> for ConsumedKeys {
    fn extend<I: IntoIterator<Item = LogicalKey>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl FromIterator<LogicalKey> for ConsumedKeys {
    fn from_iter<I: IntoIterator<Item = LogicalKey>>(iter: I) -> Self {
        let mut consumed = Self::new();
        consumed.extend(iter);
        consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_dedupes() {
        let mut consumed = ConsumedKeys::new();
        consumed.insert(LogicalKey::Space);
        consumed.insert(LogicalKey::F);
        consumed.insert(LogicalKey::Space);
        assert_eq!(consumed.len(), 2);
        assert_eq!(consumed.iter().collect::<Vec<_>>(), vec![LogicalKey::Space, LogicalKey::F]);
    }

    #[test]
    fn test_merge() {
        let mut a: ConsumedKeys = [LogicalKey::A].into_iter().collect();
        let b: ConsumedKeys = [LogicalKey::A, LogicalKey::B].into_iter().collect();
        a.merge(&b);
        assert!(a.contains(LogicalKey::B));
        assert_eq!(a.len(), 2);
    }
}
