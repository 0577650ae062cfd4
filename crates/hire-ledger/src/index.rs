//! # Secondary Indices
//!
//! An [`Index`] maps a secondary key (owner, category, type) to the ids of
//! primary records in insertion order. Indices are updated inside the same
//! operation that changes the primary record; nothing recomputes them.

use std::collections::HashMap;
use std::hash::Hash;

/// Secondary key → insertion-ordered ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index<K: Eq + Hash, I> {
    entries: HashMap<K, Vec<I>>,
}

impl<K: Eq + Hash, I> Default for Index<K, I> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, I: Copy + Eq> Index<K, I> {
    /// Empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` under `key`.
    pub fn insert(&mut self, key: K, id: I) {
        self.entries.entry(key).or_default().push(id);
    }

    /// Remove `id` from `key`, preserving the order of the rest.
    ///
    /// Returns whether it was present. Empty buckets are dropped.
    pub fn remove<Q>(&mut self, key: &Q, id: I) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let Some(ids) = self.entries.get_mut(key) else {
            return false;
        };
        let Some(pos) = ids.iter().position(|x| *x == id) else {
            return false;
        };
        ids.remove(pos);
        if ids.is_empty() {
            self.entries.remove(key);
        }
        true
    }

    /// Ids under `key`; empty for an unknown key.
    pub fn get<Q>(&self, key: &Q) -> &[I]
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of ids under `key`.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.get(key).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let mut idx: Index<String, u64> = Index::new();
        idx.insert("eng".into(), 3);
        idx.insert("eng".into(), 1);
        idx.insert("ops".into(), 2);
        assert_eq!(idx.get("eng"), &[3, 1]);
        assert_eq!(idx.get("ops"), &[2]);
        assert!(idx.get("missing").is_empty());
    }

    #[test]
    fn test_remove_keeps_rest_and_drops_empty_bucket() {
        let mut idx: Index<&str, u64> = Index::new();
        idx.insert("a", 1);
        idx.insert("a", 2);
        idx.insert("a", 3);
        assert!(idx.remove("a", 2));
        assert_eq!(idx.get("a"), &[1, 3]);
        assert!(!idx.remove("a", 2));
        assert!(idx.remove("a", 1));
        assert!(idx.remove("a", 3));
        assert_eq!(idx.count("a"), 0);
        assert!(idx.entries.is_empty());
    }

    #[test]
    fn test_equality_ignores_bucket_history() {
        let mut left: Index<String, u64> = Index::new();
        left.insert("eng".into(), 1);
        left.insert("ops".into(), 2);
        assert!(left.remove("ops", 2));

        let mut right = Index::new();
        right.insert("eng".to_string(), 1);
        assert_eq!(left, right);

        right.insert("eng".to_string(), 4);
        assert_ne!(left, right);
        let copy = right.clone();
        assert_eq!(copy, right);
    }
}
