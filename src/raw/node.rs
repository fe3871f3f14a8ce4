use core::cmp::Ordering;
use core::ops::{Index, IndexMut};

use super::handle::Link;

/// Which child slot of a binary node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Dir {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    /// The side a search for `probe` continues on after comparing it with a node's key.
    ///
    /// Returns `None` when the probe matches the node.
    #[inline]
    pub(crate) const fn toward(ordering: Ordering) -> Option<Self> {
        match ordering {
            Ordering::Less => Some(Dir::Left),
            Ordering::Equal => None,
            Ordering::Greater => Some(Dir::Right),
        }
    }
}

/// The two child slots of a binary node, addressable by [`Dir`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Children([Link; 2]);

impl Children {
    pub(crate) const EMPTY: Self = Self([None, None]);

    pub(crate) const fn new(left: Link, right: Link) -> Self {
        Self([left, right])
    }

    /// The single child of a node with at most one child.
    ///
    /// Returns `None` for leaves. Must not be called on a node with two children.
    pub(crate) fn only(self) -> Link {
        debug_assert!(!self.is_full(), "`Children::only()` called on a node with two children");
        self.0[0].or(self.0[1])
    }

    pub(crate) const fn is_full(self) -> bool {
        self.0[0].is_some() && self.0[1].is_some()
    }
}

impl Index<Dir> for Children {
    type Output = Link;

    #[inline]
    fn index(&self, dir: Dir) -> &Link {
        &self.0[dir as usize]
    }
}

impl IndexMut<Dir> for Children {
    #[inline]
    fn index_mut(&mut self, dir: Dir) -> &mut Link {
        &mut self.0[dir as usize]
    }
}

/// Read access shared by the AVL and red-black node types.
///
/// Everything that only needs BST order (search, extremes, in-order walks, draining and
/// rendering) is written once against this trait.
pub(crate) trait BinaryNode {
    type Key;
    type Value;

    fn key(&self) -> &Self::Key;
    fn value(&self) -> &Self::Value;
    fn children(&self) -> Children;
    fn into_entry(self) -> (Self::Key, Self::Value);

    #[inline]
    fn child(&self, dir: Dir) -> Link {
        self.children()[dir]
    }
}
