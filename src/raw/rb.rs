use core::borrow::Borrow;
use core::fmt;

use alloc::vec::Vec;

use super::arena::Arena;
use super::bst::{self, RawIter};
use super::handle::{Handle, Link};
use super::node::{BinaryNode, Children, Dir};
use crate::InvariantError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::Red => "red",
            Color::Black => "black",
        })
    }
}

#[derive(Clone)]
pub(crate) struct RbNode<K, V> {
    key: K,
    value: V,
    color: Color,
    // Non-owning; always the node whose child slot holds this one.
    parent: Link,
    children: Children,
}

impl<K, V> RbNode<K, V> {
    pub(crate) const fn color(&self) -> Color {
        self.color
    }

    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }
}

impl<K, V> BinaryNode for RbNode<K, V> {
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

/// The red-black engine backing `RbTreeMap`.
///
/// Empty links play the part of the black NIL leaves. Since an empty link cannot remember a
/// parent, delete fix-up carries the parent of the current position alongside it.
#[derive(Clone)]
pub(crate) struct RawRbTree<K, V> {
    nodes: Arena<RbNode<K, V>>,
    root: Link,
    len: usize,
}

impl<K, V> RawRbTree<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    pub(crate) const fn root(&self) -> Link {
        self.root
    }

    pub(crate) const fn nodes(&self) -> &Arena<RbNode<K, V>> {
        &self.nodes
    }

    pub(crate) fn node(&self, handle: Handle) -> &RbNode<K, V> {
        self.nodes.get(handle)
    }

    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut RbNode<K, V> {
        self.nodes.get_mut(handle)
    }

    pub(crate) fn iter(&self) -> RawIter<'_, RbNode<K, V>> {
        RawIter::new(&self.nodes, self.root, self.len)
    }

    pub(crate) fn drain_sorted(&mut self) -> Vec<(K, V)> {
        let entries = bst::drain(&mut self.nodes, self.root);
        self.root = None;
        self.len = 0;
        entries
    }

    pub(crate) fn extreme(&self, dir: Dir) -> Link {
        self.root.map(|root| bst::extreme(&self.nodes, root, dir))
    }

    pub(crate) fn height(&self) -> usize {
        bst::depth(&self.nodes, self.root)
    }

    /// Black nodes on the leftmost root-to-empty path, the root included.
    pub(crate) fn black_height(&self) -> usize {
        let mut count = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if node.color == Color::Black {
                count += 1;
            }
            current = node.children[Dir::Left];
        }
        count
    }

    #[inline]
    fn color_of(&self, link: Link) -> Color {
        link.map_or(Color::Black, |handle| self.nodes.get(handle).color)
    }

    #[inline]
    fn is_red(&self, link: Link) -> bool {
        self.color_of(link) == Color::Red
    }

    #[inline]
    fn set_color(&mut self, handle: Handle, color: Color) {
        self.nodes.get_mut(handle).color = color;
    }

    #[inline]
    fn parent_of(&self, handle: Handle) -> Link {
        self.nodes.get(handle).parent
    }

    #[inline]
    fn child_of(&self, handle: Handle, dir: Dir) -> Link {
        self.nodes.get(handle).children[dir]
    }

    /// Which child slot of `parent` holds `child`.
    fn side_of(&self, child: Link, parent: Handle) -> Dir {
        if self.child_of(parent, Dir::Left) == child { Dir::Left } else { Dir::Right }
    }

    /// Points whatever referenced `old` (the root or a parent's child slot) at `new`.
    fn replace_child(&mut self, parent: Link, old: Handle, new: Link) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(Some(old), parent);
                self.nodes.get_mut(parent).children[side] = new;
            }
        }
    }

    /// Puts the subtree `with` where the subtree at `target` was.
    fn transplant(&mut self, target: Handle, with: Link) {
        let parent = self.parent_of(target);
        self.replace_child(parent, target, with);
        if let Some(with) = with {
            self.nodes.get_mut(with).parent = parent;
        }
    }

    /// Rotates toward `dir`: `Dir::Left` lifts the right child of `handle` into its place.
    fn rotate(&mut self, handle: Handle, dir: Dir) {
        let rising = dir.opposite();
        let pivot = self.child_of(handle, rising).expect("red-black rotation needs a child on the rising side");
        let inner = self.child_of(pivot, dir);

        self.nodes.get_mut(handle).children[rising] = inner;
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).parent = Some(handle);
        }

        let parent = self.parent_of(handle);
        self.nodes.get_mut(pivot).parent = parent;
        self.replace_child(parent, handle, Some(pivot));

        self.nodes.get_mut(pivot).children[dir] = Some(handle);
        self.nodes.get_mut(handle).parent = Some(pivot);
    }

    /// Restores the red-black properties after `node` was attached as a red leaf.
    fn insert_fixup(&mut self, mut node: Handle) {
        while let Some(parent) = self.parent_of(node)
            && self.is_red(Some(parent))
        {
            // A red parent is never the root, so the grandparent exists.
            let Some(grandparent) = self.parent_of(parent) else {
                break;
            };
            let side = self.side_of(Some(parent), grandparent);
            let aunt = self.child_of(grandparent, side.opposite());

            if let Some(aunt) = aunt
                && self.is_red(Some(aunt))
            {
                // Push the violation two levels up.
                self.set_color(parent, Color::Black);
                self.set_color(aunt, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            let mut parent = parent;
            if self.child_of(parent, side.opposite()) == Some(node) {
                // Zig-zag: straighten it into a line first.
                self.rotate(parent, side);
                core::mem::swap(&mut node, &mut parent);
            }
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Removes the node at `target` and returns its entry.
    ///
    /// A node with two children takes over its in-order successor's entry, and the
    /// successor, which has at most one child, is unlinked instead.
    fn delete(&mut self, target: Handle) -> (K, V) {
        let children = self.nodes.get(target).children;
        let victim = match children[Dir::Right] {
            Some(right) if children.is_full() => {
                let successor = bst::extreme(&self.nodes, right, Dir::Left);
                let (slot, donor) = self.nodes.get_pair_mut(target, successor);
                core::mem::swap(&mut slot.key, &mut donor.key);
                core::mem::swap(&mut slot.value, &mut donor.value);
                successor
            }
            _ => target,
        };
        self.unlink(victim)
    }

    fn unlink(&mut self, victim: Handle) -> (K, V) {
        let node = self.nodes.get(victim);
        let (parent, color, child) = (node.parent, node.color, node.children.only());

        self.transplant(victim, child);
        let node = self.nodes.take(victim);
        self.len -= 1;

        // Removing a red node never changes a black height.
        if color == Color::Black {
            self.delete_fixup(child, parent);
        }
        (node.key, node.value)
    }

    /// Resolves the extra black carried by `node`, whose parent is `parent`.
    fn delete_fixup(&mut self, mut node: Link, mut parent: Link) {
        while node != self.root && !self.is_red(node) {
            let Some(above) = parent else {
                break;
            };
            let side = self.side_of(node, above);
            let far = side.opposite();

            // Black heights agree, so a double-black node always has a sibling.
            let mut sibling = self.child_of(above, far).expect("double-black node has a sibling");

            if self.is_red(Some(sibling)) {
                // Case 1: turn a red sibling into a black one.
                self.set_color(sibling, Color::Black);
                self.set_color(above, Color::Red);
                self.rotate(above, side);
                sibling = self.child_of(above, far).expect("rotation leaves a sibling in place");
            }

            let near_child = self.child_of(sibling, side);
            let far_child = self.child_of(sibling, far);

            if !self.is_red(near_child) && !self.is_red(far_child) {
                // Case 2: move the deficiency up.
                self.set_color(sibling, Color::Red);
                node = Some(above);
                parent = self.parent_of(above);
                continue;
            }

            if !self.is_red(far_child) {
                // Case 3: the near child is red; rotate it into the far position.
                if let Some(near_child) = near_child {
                    self.set_color(near_child, Color::Black);
                }
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, far);
                sibling = self.child_of(above, far).expect("rotation leaves a sibling in place");
            }

            // Case 4: the far child is red.
            let color = self.nodes.get(above).color;
            self.set_color(sibling, color);
            self.set_color(above, Color::Black);
            if let Some(far_child) = self.child_of(sibling, far) {
                self.set_color(far_child, Color::Black);
            }
            self.rotate(above, side);
            node = self.root;
            parent = None;
        }

        if let Some(node) = node {
            self.set_color(node, Color::Black);
        }
    }

    pub(crate) fn pop(&mut self, dir: Dir) -> Option<(K, V)> {
        let handle = self.extreme(dir)?;
        Some(self.delete(handle))
    }
}

impl<K: Ord, V> RawRbTree<K, V> {
    pub(crate) fn find<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        bst::search(&self.nodes, self.root, key)
    }

    /// The node holding `key`, or the parent and side of the empty link where it belongs.
    fn locate(&self, key: &K) -> Result<Handle, (Link, Dir)> {
        let mut parent = None;
        let mut side = Dir::Left;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let Some(dir) = Dir::toward(key.cmp(&node.key)) else {
                return Ok(handle);
            };
            parent = Some(handle);
            side = dir;
            current = node.children[dir];
        }
        Err((parent, side))
    }

    fn attach(&mut self, parent: Link, side: Dir, key: K, value: V) -> Handle {
        let node = self.nodes.alloc(RbNode {
            key,
            value,
            color: Color::Red,
            parent,
            children: Children::EMPTY,
        });
        match parent {
            None => self.root = Some(node),
            Some(parent) => self.nodes.get_mut(parent).children[side] = Some(node),
        }
        self.len += 1;

        self.insert_fixup(node);
        node
    }

    /// Inserts or overwrites. Overwriting leaves colors and shape untouched.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.locate(&key) {
            Ok(handle) => Some(core::mem::replace(&mut self.nodes.get_mut(handle).value, value)),
            Err((parent, side)) => {
                self.attach(parent, side, key, value);
                None
            }
        }
    }

    /// Handle of the node for `key`, inserting `default()` first when it is missing.
    pub(crate) fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: K, default: F) -> Handle {
        match self.locate(&key) {
            Ok(handle) => handle,
            Err((parent, side)) => self.attach(parent, side, key, default()),
        }
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.find(key)?;
        Some(self.delete(handle))
    }

    /// Checks order, parent links, root color, red-red edges and black heights.
    pub(crate) fn validate(&self) -> Result<(), InvariantError> {
        if self.is_red(self.root) {
            return Err(InvariantError::RedRoot);
        }
        let (_, actual) = self.validate_subtree(self.root, None, 0)?;
        if actual != self.len || actual != self.nodes.len() {
            return Err(InvariantError::LenMismatch {
                stored: self.len,
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

    // Returns (black height below and including this node, subtree size).
    fn validate_subtree(&self, link: Link, parent: Link, offset: usize) -> Result<(usize, usize), InvariantError> {
        let Some(handle) = link else {
            return Ok((0, 0));
        };
        let node = self.nodes.get(handle);
        let left = node.children[Dir::Left];
        let right = node.children[Dir::Right];

        let (left_black, left_size) = self.validate_subtree(left, link, offset)?;
        let position = offset + left_size;
        let (right_black, right_size) = self.validate_subtree(right, link, position + 1)?;

        if node.parent != parent {
            return Err(InvariantError::ParentMismatch { position });
        }
        if node.color == Color::Red && (self.is_red(left) || self.is_red(right)) {
            return Err(InvariantError::ConsecutiveReds { position });
        }
        if left_black != right_black {
            return Err(InvariantError::BlackHeightMismatch {
                position,
                left: left_black,
                right: right_black,
            });
        }

        let own = usize::from(node.color == Color::Black);
        Ok((left_black + own, left_size + right_size + 1))
    }
}
