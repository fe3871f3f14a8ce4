use thiserror::Error;

/// Errors reported by the public API for caller mistakes.
///
/// Looking up or removing an absent key is not an error; those operations return `None`,
/// `false` or `0` instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum TreeError {
    /// A one-based position was outside `1..=len`.
    #[error("position {index} is out of range for a tree of {len} elements")]
    OutOfRange {
        /// The requested one-based position.
        index: usize,
        /// The number of elements in the tree at the time of the call.
        len: usize,
    },
}

/// A broken structural invariant, as reported by `validate`.
///
/// None of these can be produced through the public API; they exist so that tests (and
/// callers debugging a custom `Ord` implementation) can assert their absence. `position`
/// is the zero-based in-order index of the offending node.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum InvariantError {
    /// In-order traversal found a key that does not follow its predecessor.
    #[error("key at position {position} is not greater than its predecessor")]
    Unordered {
        /// In-order index of the out-of-order key.
        position: usize,
    },
    /// An AVL node's subtree heights differ by more than one.
    #[error("node at position {position} has balance factor {balance}")]
    Unbalanced {
        /// In-order index of the node.
        position: usize,
        /// Left subtree height minus right subtree height.
        balance: i32,
    },
    /// An AVL node's cached height disagrees with its subtree.
    #[error("node at position {position} stores height {stored} but its subtree has height {actual}")]
    HeightMismatch {
        /// In-order index of the node.
        position: usize,
        /// The cached height.
        stored: usize,
        /// The height recomputed from the children.
        actual: usize,
    },
    /// An AVL node's cached subtree size disagrees with its subtree.
    #[error("node at position {position} stores size {stored} but its subtree holds {actual} nodes")]
    SizeMismatch {
        /// In-order index of the node.
        position: usize,
        /// The cached size.
        stored: usize,
        /// The number of nodes actually in the subtree.
        actual: usize,
    },
    /// The red-black root is red.
    #[error("root is red")]
    RedRoot,
    /// A red node has a red child.
    #[error("red node at position {position} has a red child")]
    ConsecutiveReds {
        /// In-order index of the red parent.
        position: usize,
    },
    /// Two paths below a red-black node pass through different numbers of black nodes.
    #[error("node at position {position} has black height {left} on the left and {right} on the right")]
    BlackHeightMismatch {
        /// In-order index of the node.
        position: usize,
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// A red-black node's parent link does not match the node that holds it.
    #[error("node at position {position} does not point back at its structural parent")]
    ParentMismatch {
        /// In-order index of the node.
        position: usize,
    },
    /// The element count disagrees with the number of reachable nodes.
    #[error("tree reports {stored} elements but {actual} nodes are reachable")]
    LenMismatch {
        /// The stored element count.
        stored: usize,
        /// The number of nodes reached from the root.
        actual: usize,
    },
}
