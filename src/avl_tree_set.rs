use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Index;

use alloc::string::String;

use crate::avl_tree_map::{IntoKeys, Keys};
use crate::{AvlTreeMap, InvariantError, Rank, TreeError};

/// An ordered set based on an AVL tree with order statistics.
///
/// See [`AvlTreeMap`]'s documentation for a discussion of the balancing scheme and of the
/// one-based positions used by [`select`](Self::select) and [`rank`](Self::rank).
///
/// It is a logic error for an item to be modified in such a way that the item's ordering relative
/// to any other item, as determined by the [`Ord`] trait, changes while it is in the set.
///
/// # Examples
///
/// ```
/// use poise_tree::AvlTreeSet;
///
/// let mut books = AvlTreeSet::new();
///
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
/// books.insert("The Great Gatsby");
///
/// if !books.contains("The Winds of Winter") {
///     println!("We have {} books, but The Winds of Winter ain't one.",
///              books.len());
/// }
///
/// books.remove("The Odyssey");
///
/// // the median title
/// assert_eq!(books.select(2), Ok(&"The Great Gatsby"));
///
/// for book in &books {
///     println!("{book}");
/// }
/// ```
pub struct AvlTreeSet<T> {
    map: AvlTreeMap<T, ()>,
}

/// An iterator over the items of an `AvlTreeSet`.
///
/// This `struct` is created by the [`iter`] method on [`AvlTreeSet`].
///
/// # Examples
///
/// ```
/// use poise_tree::AvlTreeSet;
///
/// let set = AvlTreeSet::from([3, 1, 2]);
/// let mut iter = set.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// ```
///
/// [`iter`]: AvlTreeSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    inner: Keys<'a, T, ()>,
}

/// An owning iterator over the items of an `AvlTreeSet` in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`AvlTreeSet`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: AvlTreeSet#method.into_iter
pub struct IntoIter<T> {
    inner: IntoKeys<T, ()>,
}

impl<T> AvlTreeSet<T> {
    /// Makes a new, empty `AvlTreeSet`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::AvlTreeSet;
    ///
    /// let mut set: AvlTreeSet<i32> = AvlTreeSet::new();
    /// ```
    #[must_use]
    pub const fn new() -> AvlTreeSet<T> {
        AvlTreeSet { map: AvlTreeMap::new() }
    }

    /// Makes a new, empty `AvlTreeSet` with room for at least `capacity` items.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> AvlTreeSet<T> {
        AvlTreeSet {
            map: AvlTreeMap::with_capacity(capacity),
        }
    }

    /// Returns the number of items the set can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::AvlTreeSet;
    ///
    /// let mut v = AvlTreeSet::new();
    /// assert_eq!(v.len(), 0);
    /// v.insert(1);
    /// assert_eq!(v.len(), 1);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Clears the set, removing all elements.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns the number of nodes on the longest root-to-leaf path, or 0 for an empty set.
    #[must_use]
    pub fn height(&self) -> usize {
        self.map.height()
    }

    /// Returns a reference to the first element in the set, if any.
    /// This element is always the minimum of all elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::AvlTreeSet;
    ///
    /// let mut set = AvlTreeSet::new();
    /// assert_eq!(set.first(), None);
    /// set.insert(1);
    /// assert_eq!(set.first(), Some(&1));
    /// set.insert(2);
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.map.first_key_value().map(|(k, ())| k)
    }

    /// Returns a reference to the last element in the set, if any.
    /// This element is always the maximum of all elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::AvlTreeSet;
    ///
    /// let set = AvlTreeSet::from([1, 2]);
    /// assert_eq!(set.last(), Some(&2));
    /// ```
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.map.last_key_value().map(|(k, ())| k)
    }

    /// Removes the first element from the set and returns it, if any.
    pub fn pop_first(&mut self) -> Option<T> {
        self.map.pop_first().map(|(k, ())| k)
    }

    /// Removes the last element from the set and returns it, if any.
    pub fn pop_last(&mut self) -> Option<T> {
        self.map.pop_last().map(|(k, ())| k)
    }

    /// Gets an iterator that visits the elements in the `AvlTreeSet` in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::AvlTreeSet;
    ///
    /// let set = AvlTreeSet::from([3, 1, 2]);
    /// let mut set_iter = set.iter();
    /// assert_eq!(set_iter.next(), Some(&1));
    /// assert_eq!(set_iter.next(), Some(&2));
    /// assert_eq!(set_iter.next(), Some(&3));
    /// assert_eq!(set_iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { inner: self.map.keys() }
    }

    /// Returns the element at one-based position `index` in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::OutOfRange`] if `index` is outside `1..=len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::AvlTreeSet;
    ///
    /// let set = AvlTreeSet::from([30, 10, 20]);
    /// assert_eq!(set.select(1), Ok(&10));
    /// assert!(set.select(4).is_err());
    /// ```
    pub fn select(&self, index: usize) -> Result<&T, TreeError> {
        self.map.select(index)
    }

    /// Removes and returns the element at one-based position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::OutOfRange`] if `index` is outside `1..=len`; the set is left
    /// unchanged.
    pub fn remove_by_rank(&mut self, index: usize) -> Result<T, TreeError> {
        self.map.remove_by_rank(index).map(|(k, ())| k)
    }
}

impl<T: Ord> AvlTreeSet<T> {
    /// Returns `true` if the set contains an element equal to the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::AvlTreeSet;
    ///
    /// let set = AvlTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.contains(&1), true);
    /// assert_eq!(set.contains(&4), false);
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map.contains_key(value)
    }

    /// Returns a reference to the element in the set, if any, that is equal to the value.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map.get_key_value(value).map(|(k, ())| k)
    }

    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. That is:
    ///
    /// - If the set did not previously contain an equal value, `true` is returned.
    /// - If the set already contained an equal value, `false` is returned, and the entry is
    ///   not updated.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::AvlTreeSet;
    ///
    /// let mut set = AvlTreeSet::new();
    ///
    /// assert_eq!(set.insert(2), true);
    /// assert_eq!(set.insert(2), false);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        self.map.insert(value, ()).is_none()
    }

    /// If the set contains an element equal to the value, removes it from the set and drops
    /// it. Returns whether such an element was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::AvlTreeSet;
    ///
    /// let mut set = AvlTreeSet::new();
    ///
    /// set.insert(2);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map.remove(value).is_some()
    }

    /// Removes and returns the element in the set, if any, that is equal to the value.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map.remove_entry(value).map(|(k, ())| k)
    }

    /// Returns the one-based position of `value` in ascending order, or 0 if it is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::AvlTreeSet;
    ///
    /// let set = AvlTreeSet::from([30, 10, 20]);
    /// assert_eq!(set.rank(&20), 2);
    /// assert_eq!(set.rank(&15), 0);
    /// ```
    #[must_use]
    pub fn rank<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map.rank(value)
    }

    /// Moves all elements from `other` into `self`, leaving `other` empty, and rebuilds the
    /// tree with minimal height.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::AvlTreeSet;
    ///
    /// let mut a = AvlTreeSet::from([1, 3, 5, 7]);
    /// let mut b = AvlTreeSet::from([2, 4, 6, 8]);
    /// a.merge(&mut b);
    ///
    /// assert!(b.is_empty());
    /// assert_eq!(a.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5, 6, 7, 8]);
    /// assert_eq!(a.rank(&5), 5);
    /// ```
    pub fn merge(&mut self, other: &mut Self) {
        self.map.merge(&mut other.map);
    }

    /// Checks every structural invariant of the underlying tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantError`] found.
    pub fn validate(&self) -> Result<(), InvariantError> {
        self.map.validate()
    }
}

impl<T: fmt::Debug> AvlTreeSet<T> {
    /// Renders the shape of the tree, one node per line, with each node's height and
    /// subtree size.
    #[must_use]
    pub fn print_tree(&self) -> String {
        self.map.render("AvlTreeSet")
    }
}

impl<T: Clone> Clone for AvlTreeSet<T> {
    fn clone(&self) -> Self {
        AvlTreeSet { map: self.map.clone() }
    }
}

impl<T: Hash> Hash for AvlTreeSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.map.hash(state);
    }
}

impl<T: PartialEq> PartialEq for AvlTreeSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<T: Eq> Eq for AvlTreeSet<T> {}

impl<T: PartialOrd> PartialOrd for AvlTreeSet<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for AvlTreeSet<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: fmt::Debug> fmt::Debug for AvlTreeSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Default for AvlTreeSet<T> {
    fn default() -> Self {
        AvlTreeSet::new()
    }
}

impl<T: Ord> FromIterator<T> for AvlTreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = AvlTreeSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for AvlTreeSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.insert(elem);
        }
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for AvlTreeSet<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for AvlTreeSet<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T> Index<Rank> for AvlTreeSet<T> {
    type Output = T;

    /// Returns the element at the given one-based rank.
    ///
    /// # Panics
    ///
    /// Panics if the rank is outside `1..=len`.
    fn index(&self, rank: Rank) -> &T {
        match self.select(rank.0) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<'a, T> IntoIterator for &'a AvlTreeSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for AvlTreeSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the `AvlTreeSet`'s contents in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use poise_tree::AvlTreeSet;
    ///
    /// let set = AvlTreeSet::from([1, 2, 3, 4]);
    ///
    /// let v: Vec<_> = set.into_iter().collect();
    /// assert_eq!(v, [1, 2, 3, 4]);
    /// ```
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.map.into_keys(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn min(mut self) -> Option<&'a T> {
        self.next()
    }

    fn max(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.inner.clone()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}
