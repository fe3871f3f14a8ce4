mod arena;
mod avl;
mod bst;
mod handle;
mod node;
mod print;
mod rb;

pub(crate) use avl::{AvlNode, RawAvlTree};
pub(crate) use bst::RawIter;
pub(crate) use handle::Handle;
pub(crate) use node::{BinaryNode, Dir};
pub(crate) use print::render;
pub(crate) use rb::{RawRbTree, RbNode};
