//! Self-balancing binary search trees for Rust.
//!
//! This crate provides two balancing strategies behind one ordered-map contract:
//!
//! - [`AvlTreeMap`] and [`AvlTreeSet`] keep every node's subtrees within one level of each
//!   other and store subtree sizes, which makes positional queries O(log n):
//!   - [`select`](AvlTreeMap::select) - the key at a one-based sorted position
//!   - [`rank`](AvlTreeMap::rank) - the one-based sorted position of a key
//!   - [`merge`](AvlTreeMap::merge) - union of two trees rebuilt perfectly balanced
//! - [`RbTreeMap`] keeps the red-black coloring invariants, trading a slightly taller tree
//!   for fewer rotations on update.
//!
//! # Example
//!
//! ```
//! use poise_tree::{AvlTreeMap, Rank, RbTreeMap};
//!
//! let mut scores = AvlTreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! // Ordered-map operations work as expected
//! assert_eq!(scores.get("Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Order statistics are one-based
//! assert_eq!(scores.select(2), Ok(&"Bob"));
//! assert_eq!(scores.rank("Carol"), 3);
//! assert_eq!(scores.rank("Dave"), 0);
//! assert_eq!(scores[Rank(1)], 100);
//!
//! // The red-black map answers the same ordered-map queries
//! let colors: RbTreeMap<_, _> = scores.into_iter().collect();
//! assert_eq!(colors.first_key_value(), Some((&"Alice", &100)));
//! assert_eq!(colors.validate(), Ok(()));
//! ```
//!
//! # Implementation
//!
//! Nodes live in a slot arena and refer to each other by index, so neither tree needs
//! `unsafe` code or reference counting. Missing children are plain empty links: the
//! red-black tree treats them as its black leaves, and its nodes keep a non-owning link
//! back to their parent. Every mutation walks an explicit path rather than recursing, and
//! dropping a tree frees the arena in one pass regardless of its shape.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod order_statistic;
mod raw;

pub mod avl_tree_map;
pub mod avl_tree_set;
pub mod rb_tree_map;

pub use avl_tree_map::AvlTreeMap;
pub use avl_tree_set::AvlTreeSet;
pub use error::{InvariantError, TreeError};
pub use order_statistic::Rank;
pub use rb_tree_map::RbTreeMap;
