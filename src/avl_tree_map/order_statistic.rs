use core::borrow::Borrow;
use core::ops::Index;

use super::AvlTreeMap;
use crate::raw::{BinaryNode, Handle};
use crate::{Rank, TreeError};

impl<K, V> AvlTreeMap<K, V> {
    fn handle_at(&self, index: usize) -> Result<Handle, TreeError> {
        self.raw.select(index).ok_or(TreeError::OutOfRange { index, len: self.len() })
    }

    /// Returns the key at one-based position `index` in sorted order.
    ///
    /// `select(1)` is the smallest key and `select(len)` the largest.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::OutOfRange`] if `index` is 0 or greater than [`len`](Self::len).
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::{AvlTreeMap, TreeError};
    ///
    /// let map: AvlTreeMap<_, _> = [10, 20, 5].into_iter().map(|k| (k, ())).collect();
    ///
    /// assert_eq!(map.select(1), Ok(&5));
    /// assert_eq!(map.select(3), Ok(&20));
    /// assert_eq!(map.select(4), Err(TreeError::OutOfRange { index: 4, len: 3 }));
    /// assert!(map.select(0).is_err());
    /// ```
    pub fn select(&self, index: usize) -> Result<&K, TreeError> {
        self.select_entry(index).map(|(key, _)| key)
    }

    /// Returns the key-value pair at one-based position `index` in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::OutOfRange`] if `index` is outside `1..=len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([("a", 10), ("c", 30), ("b", 20)]);
    /// assert_eq!(map.select_entry(2), Ok((&"b", &20)));
    /// ```
    pub fn select_entry(&self, index: usize) -> Result<(&K, &V), TreeError> {
        let node = self.raw.node(self.handle_at(index)?);
        Ok((node.key(), node.value()))
    }

    /// Returns the key and a mutable reference to the value at one-based position `index`.
    ///
    /// The key is returned as a shared reference because mutating it could break the
    /// ordering of the map.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::OutOfRange`] if `index` is outside `1..=len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::from([(10, "a"), (20, "b")]);
    /// if let Ok((_, value)) = map.select_entry_mut(2) {
    ///     *value = "z";
    /// }
    /// assert_eq!(map[&20], "z");
    /// ```
    pub fn select_entry_mut(&mut self, index: usize) -> Result<(&K, &mut V), TreeError> {
        let handle = self.handle_at(index)?;
        Ok(self.raw.node_mut(handle).key_value_mut())
    }

    /// Removes and returns the entry at one-based position `index`.
    ///
    /// The position is checked before anything is touched, so an out-of-range call leaves
    /// the map exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::OutOfRange`] if `index` is outside `1..=len`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// assert_eq!(map.remove_by_rank(2), Ok((2, "b")));
    /// assert_eq!(map.len(), 2);
    /// assert!(map.remove_by_rank(3).is_err());
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn remove_by_rank(&mut self, index: usize) -> Result<(K, V), TreeError> {
        let len = self.len();
        if index == 0 || index > len {
            return Err(TreeError::OutOfRange { index, len });
        }
        self.raw.remove_by_rank(index).ok_or(TreeError::OutOfRange { index, len })
    }
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Returns the one-based position of `key` in sorted order, or 0 if the key is absent.
    ///
    /// For any present key, `select(rank(key))` returns that key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(10, ()), (20, ()), (30, ())]);
    /// assert_eq!(map.rank(&10), 1);
    /// assert_eq!(map.rank(&30), 3);
    /// assert_eq!(map.rank(&25), 0);
    /// ```
    #[must_use]
    pub fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.rank(key)
    }
}

impl<K, V> Index<Rank> for AvlTreeMap<K, V> {
    type Output = V;

    /// Returns a reference to the value at the given one-based rank.
    ///
    /// # Panics
    ///
    /// Panics if the rank is outside `1..=len`.
    fn index(&self, rank: Rank) -> &V {
        match self.select_entry(rank.0) {
            Ok((_, value)) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn select_and_rank_are_inverse() {
        let map: AvlTreeMap<_, _> = (1..=50).map(|k| (k * 3, k)).collect();
        for index in 1..=map.len() {
            let key = *map.select(index).expect("in range");
            assert_eq!(map.rank(&key), index);
        }
        assert_eq!(map.rank(&4), 0);
    }

    #[test]
    #[should_panic(expected = "position 3 is out of range for a tree of 2 elements")]
    fn index_by_rank_panics_past_the_end() {
        let map = AvlTreeMap::from([(1, 'a'), (2, 'b')]);
        let _value = map[Rank(3)];
    }

    #[test]
    fn remove_by_rank_on_empty_map() {
        let mut map: AvlTreeMap<u8, u8> = AvlTreeMap::new();
        assert_eq!(map.remove_by_rank(1), Err(TreeError::OutOfRange { index: 1, len: 0 }));
        assert_eq!(map.select(1), Err(TreeError::OutOfRange { index: 1, len: 0 }));
    }
}
