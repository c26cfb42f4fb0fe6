//! Read-only invariant checks for `RedBlackTree`.
//!
//! None of these are used when mutating the tree. They walk the public node views, so they check
//! exactly what a caller inspecting the tree would see.

use crate::red_black_tree::node::NodeRef;
use crate::red_black_tree::tree::RedBlackTree;

/// Returns the number of black nodes on every path from `node` down to a NIL leaf, counting the
/// leaf and `node` itself. Returns `None` if two paths disagree.
///
/// A NIL subtree has a black height of 1.
pub fn black_height(node: Option<NodeRef<'_>>) -> Option<usize> {
    match node {
        None => Some(1),
        Some(node) => {
            let left = black_height(node.left())?;
            let right = black_height(node.right())?;
            if left != right {
                return None;
            }
            Some(left + if node.is_black() { 1 } else { 0 })
        },
    }
}

impl RedBlackTree {
    /// Returns the black height of the whole tree, or `None` if it is inconsistent.
    pub fn black_height(&self) -> Option<usize> {
        black_height(self.root())
    }

    /// Returns every red node that has a red child.
    pub fn red_violations(&self) -> Vec<NodeRef<'_>> {
        self.all_nodes()
            .into_iter()
            .filter(|node| {
                node.is_red()
                    && (node.left().map_or(false, |child| child.is_red())
                        || node.right().map_or(false, |child| child.is_red()))
            })
            .collect()
    }

    /// Returns `true` if the in-order keys are strictly increasing.
    pub fn is_ordered(&self) -> bool {
        let keys = self.keys();
        keys.windows(2).all(|pair| pair[0] < pair[1])
    }

    /// Returns `true` if every node's parent link points at a node that has it as a child, and
    /// only the root lacks a parent.
    pub fn parent_links_consistent(&self) -> bool {
        let root = self.root();
        self.all_nodes().iter().all(|node| match node.parent() {
            None => root == Some(*node),
            Some(parent) => parent.left() == Some(*node) || parent.right() == Some(*node),
        })
    }

    /// Returns `true` if the tree satisfies every red black invariant, is ordered, and has
    /// consistent parent links.
    pub fn is_valid(&self) -> bool {
        self.root().map_or(true, |root| root.is_black())
            && self.red_violations().is_empty()
            && self.black_height().is_some()
            && self.is_ordered()
            && self.parent_links_consistent()
            && self.all_nodes().len() == self.len()
    }
}
