//! Self-balancing binary search tree that uses a color bit to ensure that the tree remains
//! approximately balanced during insertions and deletions.
//!
//! Nodes can be inspected through `NodeRef` views, which expose the key, color, and the left,
//! right, and parent links of a node. The `check` helpers verify the red black invariants using
//! only those views.

pub mod check;
mod node;
mod tree;

pub use self::node::{Color, NilLeaf, NodeId, NodeRef, Side};
pub use self::tree::{RedBlackTree, RedBlackTreeIter, TreeError};
