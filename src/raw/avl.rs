use core::borrow::Borrow;
use core::cmp::Ordering;

use alloc::vec::Vec;
use smallvec::SmallVec;

use super::arena::Arena;
use super::bst::{self, RawIter, STACK_DEPTH};
use super::handle::{Handle, Link};
use super::node::{BinaryNode, Children, Dir};
use crate::InvariantError;

/// An AVL node augmented with the size of its subtree.
#[derive(Clone)]
pub(crate) struct AvlNode<K, V> {
    key: K,
    value: V,
    children: Children,
    // 1 for a leaf; an empty link counts as 0.
    height: u8,
    // Number of nodes in the subtree rooted here, this one included.
    size: usize,
}

impl<K, V> AvlNode<K, V> {
    const fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            children: Children::EMPTY,
            height: 1,
            size: 1,
        }
    }

    pub(crate) const fn height(&self) -> u8 {
        self.height
    }

    pub(crate) const fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn key_value_mut(&mut self) -> (&K, &mut V) {
        (&self.key, &mut self.value)
    }

    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }
}

impl<K, V> BinaryNode for AvlNode<K, V> {
    type Key = K;
    type Value = V;

    #[inline]
    fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    fn children(&self) -> Children {
        self.children
    }

    fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// The nodes visited on the way down, with the side taken at each one.
type Path = SmallVec<[(Handle, Dir); STACK_DEPTH]>;

/// The AVL engine backing `AvlTreeMap` and `AvlTreeSet`.
///
/// Mutations record the descent in a [`Path`] and then retrace it bottom-up, refreshing the
/// height and size of every ancestor and rebalancing each one in turn.
#[derive(Clone)]
pub(crate) struct RawAvlTree<K, V> {
    nodes: Arena<AvlNode<K, V>>,
    root: Link,
}

impl<K, V> RawAvlTree<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn len(&self) -> usize {
        self.size_of(self.root)
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn height(&self) -> usize {
        usize::from(self.height_of(self.root))
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) const fn root(&self) -> Link {
        self.root
    }

    pub(crate) const fn nodes(&self) -> &Arena<AvlNode<K, V>> {
        &self.nodes
    }

    pub(crate) fn node(&self, handle: Handle) -> &AvlNode<K, V> {
        self.nodes.get(handle)
    }

    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut AvlNode<K, V> {
        self.nodes.get_mut(handle)
    }

    pub(crate) fn iter(&self) -> RawIter<'_, AvlNode<K, V>> {
        RawIter::new(&self.nodes, self.root, self.len())
    }

    /// Moves all entries out in ascending order, leaving the tree empty.
    pub(crate) fn drain_sorted(&mut self) -> Vec<(K, V)> {
        let entries = bst::drain(&mut self.nodes, self.root);
        self.root = None;
        entries
    }

    /// Leftmost (`Dir::Left`) or rightmost node.
    pub(crate) fn extreme(&self, dir: Dir) -> Link {
        self.root.map(|root| bst::extreme(&self.nodes, root, dir))
    }

    /// Builds a height-balanced tree from entries in strictly ascending key order.
    ///
    /// Each subtree root is the middle entry of its range, so sibling subtrees differ in size
    /// by at most one and therefore in height by at most one. O(n).
    pub(crate) fn from_sorted(entries: Vec<(K, V)>) -> Self {
        let len = entries.len();
        let mut tree = Self::with_capacity(len);
        let mut entries = entries.into_iter();
        tree.root = tree.build(&mut entries, len);
        debug_assert_eq!(tree.len(), len);
        tree
    }

    fn build(&mut self, entries: &mut impl Iterator<Item = (K, V)>, count: usize) -> Link {
        if count == 0 {
            return None;
        }
        let left_count = count / 2;
        let left = self.build(entries, left_count);
        let (key, value) = entries.next()?;
        let right = self.build(entries, count - left_count - 1);

        let mut node = AvlNode::leaf(key, value);
        node.children = Children::new(left, right);
        let handle = self.nodes.alloc(node);
        self.refresh(handle);
        Some(handle)
    }

    #[inline]
    fn height_of(&self, link: Link) -> u8 {
        link.map_or(0, |handle| self.nodes.get(handle).height)
    }

    #[inline]
    fn size_of(&self, link: Link) -> usize {
        link.map_or(0, |handle| self.nodes.get(handle).size)
    }

    /// `height(left) - height(right)`.
    fn balance_of(&self, handle: Handle) -> i16 {
        let children = self.nodes.get(handle).children;
        i16::from(self.height_of(children[Dir::Left])) - i16::from(self.height_of(children[Dir::Right]))
    }

    /// Recomputes height and size from the children, which must already be up to date.
    fn refresh(&mut self, handle: Handle) {
        let children = self.nodes.get(handle).children;
        let (left, right) = (children[Dir::Left], children[Dir::Right]);
        let height = 1 + self.height_of(left).max(self.height_of(right));
        let size = 1 + self.size_of(left) + self.size_of(right);

        let node = self.nodes.get_mut(handle);
        node.height = height;
        node.size = size;
    }

    /// Rotates the subtree at `handle` toward `dir` and returns its new root.
    ///
    /// `Dir::Left` lifts the right child, `Dir::Right` lifts the left child. The demoted node
    /// is refreshed before the promoted one.
    fn rotate(&mut self, handle: Handle, dir: Dir) -> Handle {
        let rising = dir.opposite();
        let pivot = self.nodes.get(handle).children[rising].expect("AVL rotation needs a child on the rising side");
        let inner = self.nodes.get(pivot).children[dir];

        self.nodes.get_mut(handle).children[rising] = inner;
        self.nodes.get_mut(pivot).children[dir] = Some(handle);

        self.refresh(handle);
        self.refresh(pivot);
        pivot
    }

    /// Restores `|balance| <= 1` at `handle`, whose children are already balanced and fresh.
    fn rebalance(&mut self, handle: Handle) -> Handle {
        let balance = self.balance_of(handle);

        if balance > 1 {
            let left = self.nodes.get(handle).children[Dir::Left].expect("left-heavy node has a left child");
            if self.balance_of(left) < 0 {
                let lifted = self.rotate(left, Dir::Left);
                self.nodes.get_mut(handle).children[Dir::Left] = Some(lifted);
            }
            return self.rotate(handle, Dir::Right);
        }

        if balance < -1 {
            let right = self.nodes.get(handle).children[Dir::Right].expect("right-heavy node has a right child");
            if self.balance_of(right) > 0 {
                let lifted = self.rotate(right, Dir::Right);
                self.nodes.get_mut(handle).children[Dir::Right] = Some(lifted);
            }
            return self.rotate(handle, Dir::Left);
        }

        handle
    }

    /// Hangs `subtree` under the last node of `path`, then walks back to the root.
    fn retrace(&mut self, path: &mut Path, mut subtree: Link) {
        while let Some((parent, dir)) = path.pop() {
            self.nodes.get_mut(parent).children[dir] = subtree;
            self.refresh(parent);
            subtree = Some(self.rebalance(parent));
        }
        self.root = subtree;
    }

    /// Unlinks the node at `target`, reached through `path`, and returns its entry.
    ///
    /// A node with two children swaps its entry with its in-order successor, which has no
    /// left child, and the successor's slot is unlinked instead.
    fn remove_at(&mut self, target: Handle, mut path: Path) -> (K, V) {
        let children = self.nodes.get(target).children;

        let (victim, replacement) = if let Some(right) = children[Dir::Right]
            && children.is_full()
        {
            path.push((target, Dir::Right));
            let mut successor = right;
            while let Some(next) = self.nodes.get(successor).children[Dir::Left] {
                path.push((successor, Dir::Left));
                successor = next;
            }

            let (slot, donor) = self.nodes.get_pair_mut(target, successor);
            core::mem::swap(&mut slot.key, &mut donor.key);
            core::mem::swap(&mut slot.value, &mut donor.value);

            (successor, self.nodes.get(successor).children[Dir::Right])
        } else {
            (target, children.only())
        };

        let node = self.nodes.take(victim);
        self.retrace(&mut path, replacement);
        (node.key, node.value)
    }

    /// Handle of the element at one-based position `index`, or `None` outside `1..=len`.
    pub(crate) fn select(&self, index: usize) -> Option<Handle> {
        let mut remaining = index;
        let mut current = self.root;
        while let Some(handle) = current {
            let children = self.nodes.get(handle).children;
            let before = self.size_of(children[Dir::Left]) + 1;
            match remaining.cmp(&before) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => current = children[Dir::Left],
                Ordering::Greater => {
                    remaining -= before;
                    current = children[Dir::Right];
                }
            }
        }
        None
    }

    /// Removes the element at one-based position `index`.
    pub(crate) fn remove_by_rank(&mut self, index: usize) -> Option<(K, V)> {
        let mut path = Path::new();
        let mut remaining = index;
        let mut current = self.root;
        while let Some(handle) = current {
            let children = self.nodes.get(handle).children;
            let before = self.size_of(children[Dir::Left]) + 1;
            let dir = match remaining.cmp(&before) {
                Ordering::Equal => return Some(self.remove_at(handle, path)),
                Ordering::Less => Dir::Left,
                Ordering::Greater => {
                    remaining -= before;
                    Dir::Right
                }
            };
            path.push((handle, dir));
            current = children[dir];
        }
        None
    }
}

impl<K: Ord, V> RawAvlTree<K, V> {
    pub(crate) fn find<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        bst::search(&self.nodes, self.root, key)
    }

    /// The node holding `key`, or the path to the empty link where it would be attached.
    fn descend(&self, key: &K) -> Result<Handle, Path> {
        let mut path = Path::new();
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let Some(dir) = Dir::toward(key.cmp(&node.key)) else {
                return Ok(handle);
            };
            current = node.children[dir];
            path.push((handle, dir));
        }
        Err(path)
    }

    fn attach(&mut self, mut path: Path, key: K, value: V) -> Handle {
        let leaf = self.nodes.alloc(AvlNode::leaf(key, value));
        self.retrace(&mut path, Some(leaf));
        leaf
    }

    /// Inserts or overwrites. Returns the previous value for an existing key, in which case
    /// the shape of the tree is untouched.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.descend(&key) {
            Ok(handle) => Some(core::mem::replace(&mut self.nodes.get_mut(handle).value, value)),
            Err(path) => {
                self.attach(path, key, value);
                None
            }
        }
    }

    /// Handle of the node for `key`, inserting `default()` first when it is missing.
    ///
    /// Rotations relink nodes without moving them between slots, so the handle stays valid
    /// after rebalancing.
    pub(crate) fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: K, default: F) -> Handle {
        match self.descend(&key) {
            Ok(handle) => handle,
            Err(path) => self.attach(path, key, default()),
        }
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut path = Path::new();
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let Some(dir) = Dir::toward(key.cmp(node.key.borrow())) else {
                return Some(self.remove_at(handle, path));
            };
            current = node.children[dir];
            path.push((handle, dir));
        }
        None
    }

    /// One-based position of `key`, or 0 when absent.
    pub(crate) fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut passed = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let before = self.size_of(node.children[Dir::Left]) + 1;
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.children[Dir::Left],
                Ordering::Equal => return passed + before,
                Ordering::Greater => {
                    passed += before;
                    current = node.children[Dir::Right];
                }
            }
        }
        0
    }

    /// Moves every entry of `other` into `self` and rebuilds a balanced tree.
    ///
    /// On equal keys the entry from `other` is kept.
    pub(crate) fn merge(&mut self, other: &mut Self) {
        if other.is_empty() {
            return;
        }
        let merged = merge_sorted(self.drain_sorted(), other.drain_sorted());
        *self = Self::from_sorted(merged);
    }

    /// Checks order, stored heights and sizes, and the balance of every node.
    pub(crate) fn validate(&self) -> Result<(), InvariantError> {
        let (_, actual) = self.validate_subtree(self.root, 0)?;
        if actual != self.nodes.len() {
            return Err(InvariantError::LenMismatch {
                stored: self.nodes.len(),
                actual,
            });
        }

        let mut iter = self.iter();
        let mut previous = iter.next();
        let mut position = 1;
        while let Some(node) = iter.next() {
            if previous.is_some_and(|previous| previous.key >= node.key) {
                return Err(InvariantError::Unordered { position });
            }
            previous = Some(node);
            position += 1;
        }
        Ok(())
    }

    // Returns (height, size) recomputed from scratch. `offset` is the number of nodes that
    // precede this subtree in order.
    fn validate_subtree(&self, link: Link, offset: usize) -> Result<(usize, usize), InvariantError> {
        let Some(handle) = link else {
            return Ok((0, 0));
        };
        let node = self.nodes.get(handle);
        let (left_height, left_size) = self.validate_subtree(node.children[Dir::Left], offset)?;
        let position = offset + left_size;
        let (right_height, right_size) = self.validate_subtree(node.children[Dir::Right], position + 1)?;

        let height = 1 + left_height.max(right_height);
        if usize::from(node.height) != height {
            return Err(InvariantError::HeightMismatch {
                position,
                stored: usize::from(node.height),
                actual: height,
            });
        }
        let size = 1 + left_size + right_size;
        if node.size != size {
            return Err(InvariantError::SizeMismatch {
                position,
                stored: node.size,
                actual: size,
            });
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let balance = left_height as i32 - right_height as i32;
        if balance.abs() > 1 {
            return Err(InvariantError::Unbalanced { position, balance });
        }
        Ok((height, size))
    }
}

/// Two-pointer merge of two strictly ascending runs. Equal keys keep the entry from `right`.
fn merge_sorted<K: Ord, V>(left: Vec<(K, V)>, right: Vec<(K, V)>) -> Vec<(K, V)> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let ordering = match (left.peek(), right.peek()) {
            (Some((a, _)), Some((b, _))) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => break,
        };
        match ordering {
            Ordering::Less => merged.extend(left.next()),
            Ordering::Greater => merged.extend(right.next()),
            Ordering::Equal => {
                left.next();
                merged.extend(right.next());
            }
        }
    }

    merged
}
