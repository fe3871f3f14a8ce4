//! Order-only algorithms shared by both balancing strategies.

use core::borrow::Borrow;

use alloc::vec::Vec;
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::{Handle, Link};
use super::node::{BinaryNode, Dir};

/// Inline capacity of explicit traversal stacks. A balanced tree of `u32::MAX` nodes is
/// shallower than this, so the stacks never spill in practice. Must be one of the array
/// lengths `smallvec` implements `Array` for.
pub(crate) const STACK_DEPTH: usize = 64;

pub(crate) type Stack = SmallVec<[Handle; STACK_DEPTH]>;

/// Standard BST descent. O(height) comparisons.
pub(crate) fn search<N, Q>(nodes: &Arena<N>, root: Link, key: &Q) -> Link
where
    N: BinaryNode,
    N::Key: Borrow<Q>,
    Q: ?Sized + Ord,
{
    let mut current = root;
    while let Some(handle) = current {
        let node = nodes.get(handle);
        match Dir::toward(key.cmp(node.key().borrow())) {
            Some(dir) => current = node.child(dir),
            None => return Some(handle),
        }
    }
    None
}

/// The last node reached by repeatedly stepping toward `dir` from `from`.
///
/// `extreme(.., Dir::Left)` is `findMin` of the subtree, `Dir::Right` its maximum.
pub(crate) fn extreme<N: BinaryNode>(nodes: &Arena<N>, from: Handle, dir: Dir) -> Handle {
    let mut current = from;
    while let Some(next) = nodes.get(current).child(dir) {
        current = next;
    }
    current
}

fn push_spine<N: BinaryNode>(nodes: &Arena<N>, stack: &mut Stack, mut link: Link, dir: Dir) {
    while let Some(handle) = link {
        stack.push(handle);
        link = nodes.get(handle).child(dir);
    }
}

/// Lazy in-order walk over a tree, from both ends.
///
/// `remaining` is what keeps the two ends from crossing: each yielded node is counted once,
/// and the walk stops when every node has been produced by one end or the other.
pub(crate) struct RawIter<'a, N> {
    nodes: &'a Arena<N>,
    front: Stack,
    back: Stack,
    remaining: usize,
}

impl<'a, N: BinaryNode> RawIter<'a, N> {
    pub(crate) fn new(nodes: &'a Arena<N>, root: Link, len: usize) -> Self {
        let mut front = Stack::new();
        let mut back = Stack::new();
        push_spine(nodes, &mut front, root, Dir::Left);
        push_spine(nodes, &mut back, root, Dir::Right);
        Self {
            nodes,
            front,
            back,
            remaining: len,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.remaining
    }

    pub(crate) fn next(&mut self) -> Option<&'a N> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front.pop()?;
        let node = self.nodes.get(handle);
        push_spine(self.nodes, &mut self.front, node.child(Dir::Right), Dir::Left);
        self.remaining -= 1;
        Some(node)
    }

    pub(crate) fn next_back(&mut self) -> Option<&'a N> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back.pop()?;
        let node = self.nodes.get(handle);
        push_spine(self.nodes, &mut self.back, node.child(Dir::Left), Dir::Right);
        self.remaining -= 1;
        Some(node)
    }
}

impl<N> Clone for RawIter<'_, N> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

/// Moves every entry out of the tree in ascending key order and empties the arena.
pub(crate) fn drain<N: BinaryNode>(nodes: &mut Arena<N>, root: Link) -> Vec<(N::Key, N::Value)> {
    let mut entries = Vec::with_capacity(nodes.len());
    let mut stack = Stack::new();
    push_spine(nodes, &mut stack, root, Dir::Left);

    while let Some(handle) = stack.pop() {
        let node = nodes.take(handle);
        push_spine(nodes, &mut stack, node.child(Dir::Right), Dir::Left);
        entries.push(node.into_entry());
    }

    nodes.clear();
    entries
}

/// Number of nodes on the longest root-to-leaf path, without recursion.
pub(crate) fn depth<N: BinaryNode>(nodes: &Arena<N>, root: Link) -> usize {
    let mut deepest = 0;
    let mut stack: SmallVec<[(Handle, usize); STACK_DEPTH]> = SmallVec::new();
    if let Some(root) = root {
        stack.push((root, 1));
    }

    while let Some((handle, level)) = stack.pop() {
        deepest = deepest.max(level);
        let children = nodes.get(handle).children();
        for dir in [Dir::Left, Dir::Right] {
            if let Some(child) = children[dir] {
                stack.push((child, level + 1));
            }
        }
    }

    deepest
}
