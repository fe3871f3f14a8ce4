/// A one-based position in the sorted order of an AVL map or set.
///
/// `Rank(1)` is the smallest element and `Rank(len)` the largest, matching the numbering
/// used by `select` and `rank`.
///
/// # Examples
///
/// ```
/// use poise_tree::{AvlTreeMap, Rank};
///
/// let mut map = AvlTreeMap::new();
/// map.insert("a", 10);
/// map.insert("b", 20);
///
/// assert_eq!(map[Rank(1)], 10);
/// assert_eq!(map[Rank(2)], 20);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
