//! Sets of matching entity keys and their algebra

use std::collections::HashSet;

use serde::{Serialize, Serializer};

/// The set of entity keys satisfying a filter node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet(HashSet<String>);

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.0.insert(key.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Keys in ascending order
    pub fn to_sorted_vec(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.0.iter().cloned().collect();
        keys.sort();
        keys
    }

    /// Set intersection; iterates the smaller operand and probes the larger
    pub fn intersect(self, other: MatchSet) -> MatchSet {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut keys = small.0;
        keys.retain(|k| large.0.contains(k));
        MatchSet(keys)
    }

    /// Set union; extends the larger operand with the smaller
    pub fn union(self, other: MatchSet) -> MatchSet {
        let (small, mut large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        large.0.extend(small.0);
        large
    }

    /// `universe − self`
    pub fn complement_in(&self, universe: &MatchSet) -> MatchSet {
        universe
            .0
            .iter()
            .filter(|k| !self.0.contains(*k))
            .cloned()
            .collect()
    }
}

impl FromIterator<String> for MatchSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        MatchSet(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for MatchSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        MatchSet(iter.into_iter().map(str::to_string).collect())
    }
}

impl IntoIterator for MatchSet {
    type Item = String;
    type IntoIter = std::collections::hash_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Serialize for MatchSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_sorted_vec().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(keys: &[&str]) -> MatchSet {
        keys.iter().copied().collect()
    }

    #[test]
    fn test_intersect_either_order() {
        let a = set(&["1", "2", "3", "4"]);
        let b = set(&["2", "4", "9"]);
        assert_eq!(a.clone().intersect(b.clone()), set(&["2", "4"]));
        assert_eq!(b.intersect(a), set(&["2", "4"]));
    }

    #[test]
    fn test_union() {
        let a = set(&["1"]);
        let b = set(&["2", "3"]);
        assert_eq!(a.union(b), set(&["1", "2", "3"]));
    }

    #[test]
    fn test_complement() {
        let universe = set(&["1", "2", "3"]);
        assert_eq!(set(&["2"]).complement_in(&universe), set(&["1", "3"]));
        assert_eq!(MatchSet::new().complement_in(&universe), universe);
        assert!(universe.complement_in(&universe).is_empty());
    }

    #[test]
    fn test_serializes_sorted() {
        let json = serde_json::to_string(&set(&["3", "1", "2"])).unwrap();
        assert_eq!(json, r#"["1","2","3"]"#);
    }
}
