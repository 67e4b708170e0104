//! An ordered multiset backed by a red-black tree.
//!
//! Nodes are stored in an arena and refer to each other by [`NodeId`], parent
//! links are plain indices, so the tree has no reference cycles and needs no
//! `unsafe`.
//!
//! ```
//! use rbtree::RedBlackTree;
//!
//! let mut tree = RedBlackTree::new();
//! tree.insert(2);
//! tree.insert(4);
//! tree.insert(7);
//! tree.insert(9);
//!
//! assert!(tree.delete(&7));
//! assert_eq!(tree.height(), 2);
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [2, 4, 9]);
//! ```
//!
//! The tree is not synchronized, wrap it in a lock to share it between
//! threads.
#![deny(rust_2018_idioms)]
#![deny(unsafe_code)]

mod compare;
mod iter;
mod node;
mod tree;
mod validate;

pub use compare::{Compare, Natural};
pub use iter::{Iter, Range};
pub use node::{Color, NodeId};
pub use tree::{NodeRef, RedBlackTree};
pub use validate::InvariantViolation;
