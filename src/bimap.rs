//! Bidirectional pairing map for host-boundary handle mappings.
//!
//! Used where two id spaces must stay in one-to-one correspondence, e.g.
//! actor ids and host-side labels. Colliding with an existing pairing is a
//! programmer error and fails fast instead of silently overwriting.

use std::collections::HashMap;
use std::hash::Hash;
use thiserror::Error;

/// Errors raised when a pairing would collide with an existing entry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BiMapError {
    #[error("left key is already paired")]
    LeftTaken,
    #[error("right key is already paired")]
    RightTaken,
}

/// One-to-one map queryable from either side.
pub struct BiMap<L, R> {
    forward: HashMap<L, R>,
    reverse: HashMap<R, L>,
}

impl<L, R> BiMap<L, R>
where
    L: Eq + Hash + Clone,
    R: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            forward: HashMap::new(),
            reverse: HashMap::new(),
        }
    }

    /// Insert a pairing. Both sides must be unused; on error the map is
    /// unchanged.
    pub fn insert(&mut self, left: L, right: R) -> Result<(), BiMapError> {
        if self.forward.contains_key(&left) {
            return Err(BiMapError::LeftTaken);
        }
        if self.reverse.contains_key(&right) {
            return Err(BiMapError::RightTaken);
        }
        self.forward.insert(left.clone(), right.clone());
        self.reverse.insert(right, left);
        Ok(())
    }

    pub fn get_by_left(&self, left: &L) -> Option<&R> {
        self.forward.get(left)
    }

    pub fn get_by_right(&self, right: &R) -> Option<&L> {
        self.reverse.get(right)
    }

    /// Drop a pairing by its left key, returning the right key.
    pub fn remove_by_left(&mut self, left: &L) -> Option<R> {
        let right = self.forward.remove(left)?;
        self.reverse.remove(&right);
        Some(right)
    }

    /// Drop a pairing by its right key, returning the left key.
    pub fn remove_by_right(&mut self, right: &R) -> Option<L> {
        let left = self.reverse.remove(right)?;
        self.forward.remove(&left);
        Some(left)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

impl<L, R> Default for BiMap<L, R>
where
    L: Eq + Hash + Clone,
    R: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup_both_sides() {
        let mut map = BiMap::new();
        map.insert(1u64, "alpha").unwrap();
        map.insert(2u64, "beta").unwrap();

        assert_eq!(map.get_by_left(&1), Some(&"alpha"));
        assert_eq!(map.get_by_right(&"beta"), Some(&2));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_duplicate_left_fails_fast() {
        let mut map = BiMap::new();
        map.insert(1u64, "alpha").unwrap();

        let err = map.insert(1u64, "other").unwrap_err();
        assert_eq!(err, BiMapError::LeftTaken);
        // The failed insert left nothing behind.
        assert_eq!(map.len(), 1);
        assert_eq!(map.get_by_left(&1), Some(&"alpha"));
        assert_eq!(map.get_by_right(&"other"), None);
    }

    #[test]
    fn test_duplicate_right_fails_fast() {
        let mut map = BiMap::new();
        map.insert(1u64, "alpha").unwrap();

        let err = map.insert(2u64, "alpha").unwrap_err();
        assert_eq!(err, BiMapError::RightTaken);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove_frees_both_sides() {
        let mut map = BiMap::new();
        map.insert(1u64, "alpha").unwrap();

        assert_eq!(map.remove_by_left(&1), Some("alpha"));
        assert!(map.is_empty());
        assert_eq!(map.get_by_right(&"alpha"), None);

        // Both keys are usable again.
        map.insert(1u64, "alpha").unwrap();
        assert_eq!(map.remove_by_right(&"alpha"), Some(1));
        assert!(map.is_empty());
    }
}
