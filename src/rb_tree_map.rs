use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Index;

use alloc::format;
use alloc::string::String;
use alloc::vec;

use crate::InvariantError;
use crate::raw::{self, BinaryNode, Dir, RawIter, RawRbTree, RbNode};

/// An ordered map based on a [red-black tree].
///
/// Every node is colored red or black such that the root is black, no red node has a red
/// child, and every path from a node down to an empty link passes the same number of black
/// nodes. The longest path is then at most twice the shortest, and an update needs at most
/// three rotations.
///
/// The API mirrors [`AvlTreeMap`](crate::AvlTreeMap) without the order-statistic queries.
///
/// # Examples
///
/// ```
/// use poise_tree::RbTreeMap;
///
/// let mut map = RbTreeMap::new();
/// for key in [10, 20, 15] {
///     map.insert(key, key * 2);
/// }
///
/// assert_eq!(map.get(&15), Some(&30));
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [10, 15, 20]);
/// assert_eq!(map.height(), 2);
/// assert_eq!(map.black_height(), 1);
/// assert_eq!(map.validate(), Ok(()));
/// ```
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct RbTreeMap<K, V> {
    raw: RawRbTree<K, V>,
}

/// An iterator over the entries of an `RbTreeMap`.
///
/// This `struct` is created by the [`iter`] method on [`RbTreeMap`].
///
/// [`iter`]: RbTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: RawIter<'a, RbNode<K, V>>,
}

/// An owning iterator over the entries of an `RbTreeMap`, sorted by key.
pub struct IntoIter<K, V> {
    inner: vec::IntoIter<(K, V)>,
}

/// An iterator over the keys of an `RbTreeMap`.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of an `RbTreeMap`.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> RbTreeMap<K, V> {
    /// Makes a new, empty `RbTreeMap`.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> RbTreeMap<K, V> {
        RbTreeMap { raw: RawRbTree::new() }
    }

    /// Makes a new, empty `RbTreeMap` with room for at least `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> RbTreeMap<K, V> {
        RbTreeMap {
            raw: RawRbTree::with_capacity(capacity),
        }
    }

    /// Returns the number of entries the map can hold without reallocating.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::RbTreeMap;
    ///
    /// let map: RbTreeMap<u32, u32> = RbTreeMap::with_capacity(10);
    /// assert!(map.capacity() >= 10);
    /// ```
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the number of elements in the map.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, removing all elements.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of nodes on the longest root-to-leaf path, or 0 for an empty map.
    ///
    /// # Complexity
    ///
    /// O(n) - red-black nodes do not store their height.
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the number of black nodes on every path from the root to an empty link,
    /// counting the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::RbTreeMap;
    ///
    /// let mut map: RbTreeMap<i32, ()> = RbTreeMap::new();
    /// assert_eq!(map.black_height(), 0);
    /// map.extend([(20, ()), (10, ()), (30, ()), (5, ())]);
    /// assert_eq!(map.black_height(), 2);
    /// ```
    #[must_use]
    pub fn black_height(&self) -> usize {
        self.raw.black_height()
    }

    /// Returns the entry with the minimum key.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.extreme_entry(Dir::Left)
    }

    /// Returns the entry with the maximum key.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.extreme_entry(Dir::Right)
    }

    fn extreme_entry(&self, dir: Dir) -> Option<(&K, &V)> {
        let node = self.raw.node(self.raw.extreme(dir)?);
        Some((node.key(), node.value()))
    }

    /// Removes and returns the entry with the minimum key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.pop(Dir::Left)
    }

    /// Removes and returns the entry with the maximum key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.pop(Dir::Right)
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { inner: self.raw.iter() }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

impl<K: Ord, V> RbTreeMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find(key).map(|handle| self.raw.node(handle).value())
    }

    /// Returns the key-value pair corresponding to the supplied key.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::RbTreeMap;
    ///
    /// let map = RbTreeMap::from([(1, "a")]);
    /// assert_eq!(map.get_key_value(&1), Some((&1, &"a")));
    /// assert_eq!(map.get_key_value(&2), None);
    /// ```
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.raw.node(self.raw.find(key)?);
        Some((node.key(), node.value()))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::from([(1, "a")]);
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.find(key)?;
        Some(self.raw.node_mut(handle).value_mut())
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::RbTreeMap;
    ///
    /// let map = RbTreeMap::from([(1, "a")]);
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&2));
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find(key).is_some()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// A new key is attached as a red leaf and the coloring is repaired on the way up. If the
    /// key was already present its value is replaced and returned; colors and shape are left
    /// alone.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map[&37], "b");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(key, value)
    }

    /// Returns a mutable reference to the value for `key`, inserting `default()` first if the
    /// key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::RbTreeMap;
    ///
    /// let mut counts = RbTreeMap::new();
    /// for word in ["b", "a", "b"] {
    ///     *counts.get_or_insert_with(word, || 0) += 1;
    /// }
    /// assert_eq!(counts.iter().collect::<Vec<_>>(), [(&"a", &1), (&"b", &2)]);
    /// assert_eq!(counts.validate(), Ok(()));
    /// ```
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: K, default: F) -> &mut V {
        let handle = self.raw.get_or_insert_with(key, default);
        self.raw.node_mut(handle).value_mut()
    }

    /// Removes a key from the map, returning its value if it was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::RbTreeMap;
    ///
    /// let mut map: RbTreeMap<_, _> = (1..1000).map(|k| (k, k)).collect();
    /// for key in (1..1000).rev() {
    ///     assert_eq!(map.remove(&key), Some(key));
    /// }
    /// assert!(map.is_empty());
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if the key was
    /// previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::from([(1, "a")]);
    /// assert_eq!(map.remove_entry(&1), Some((1, "a")));
    /// assert_eq!(map.remove_entry(&1), None);
    /// ```
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key)
    }

    /// Checks key order, parent links and the red-black coloring rules.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantError`] found.
    pub fn validate(&self) -> Result<(), InvariantError> {
        self.raw.validate()
    }
}

impl<K: fmt::Debug, V> RbTreeMap<K, V> {
    /// Renders the shape of the tree, one node per line, with each node's color.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::RbTreeMap;
    ///
    /// let map = RbTreeMap::from([(10, ()), (20, ()), (15, ())]);
    /// assert_eq!(map.print_tree(), "RbTreeMap\n15 black\n← 10 red\n→ 20 red");
    /// ```
    #[must_use]
    pub fn print_tree(&self) -> String {
        raw::render(self.raw.nodes(), self.raw.root(), "RbTreeMap", |node| {
            format!("{:?} {}", node.key(), node.color())
        })
    }
}

impl<K: Clone, V: Clone> Clone for RbTreeMap<K, V> {
    fn clone(&self) -> Self {
        RbTreeMap {
            raw: self.raw.clone(),
        }
    }
}

impl<K: Hash, V: Hash> Hash for RbTreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for RbTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq> Eq for RbTreeMap<K, V> {}

impl<K: PartialOrd, V: PartialOrd> PartialOrd for RbTreeMap<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord> Ord for RbTreeMap<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RbTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for RbTreeMap<K, V> {
    fn default() -> Self {
        RbTreeMap::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RbTreeMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = RbTreeMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for RbTreeMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Ord + Copy, V: Copy> Extend<(&'a K, &'a V)> for RbTreeMap<K, V> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a RbTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V> IntoIterator for RbTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_sorted().into_iter(),
        }
    }
}

impl<K, Q, V> Index<&Q> for RbTreeMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RbTreeMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|node| (node.key(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.inner.len();
        (len, Some(len))
    }
}

impl<'a, K: 'a, V: 'a> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|node| (node.key(), node.value()))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<K, V> Default for IntoIter<K, V> {
    /// Creates an empty `rb_tree_map::IntoIter`.
    ///
    /// ```
    /// # use poise_tree::rb_tree_map;
    /// let iter: rb_tree_map::IntoIter<u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IntoIter {
            inner: vec::IntoIter::default(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}
