use crate::arena::Entry;
use crate::red_black_tree::tree::RedBlackTree;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::ptr;

/// Identifier of a node stored in a `RedBlackTree`.
///
/// An id is invalidated when its node is physically removed. Deleting a key whose node has two
/// children removes the node holding the in-order predecessor instead, after copying that key
/// into the deleted key's node, so ids of predecessor nodes can go stale as a side effect of
/// deleting a different key. `RedBlackTree::get` returns `None` for stale ids.
pub type NodeId = Entry;

/// An enum representing the color of a node in a red black tree.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Color {
    Red,
    Black,
}

/// The side of a parent a child hangs from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A struct representing an internal node of a red black tree.
pub(crate) struct Node {
    pub key: i64,
    pub color: Color,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub parent: Option<NodeId>,
}

impl Node {
    pub fn new(key: i64, parent: Option<NodeId>) -> Self {
        Node {
            key,
            color: Color::Red,
            left: None,
            right: None,
            parent,
        }
    }

    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn set_child(&mut self, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// A read-only view of a node in a `RedBlackTree`.
///
/// Views borrow the tree, so they cannot outlive a mutation. Use `id` to hold on to a node across
/// mutations and `RedBlackTree::get` to view it again.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a RedBlackTree,
    id: NodeId,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(tree: &'a RedBlackTree, id: NodeId, node: &'a Node) -> Self {
        NodeRef { tree, id, node }
    }

    fn view(&self, id: Option<NodeId>) -> Option<NodeRef<'a>> {
        id.and_then(|id| self.tree.get(id))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn key(&self) -> i64 {
        self.node.key
    }

    pub fn color(&self) -> Color {
        self.node.color
    }

    pub fn is_red(&self) -> bool {
        self.node.color == Color::Red
    }

    pub fn is_black(&self) -> bool {
        self.node.color == Color::Black
    }

    pub fn left(&self) -> Option<NodeRef<'a>> {
        self.view(self.node.left)
    }

    pub fn right(&self) -> Option<NodeRef<'a>> {
        self.view(self.node.right)
    }

    pub fn child(&self, side: Side) -> Option<NodeRef<'a>> {
        self.view(self.node.child(side))
    }

    /// Returns the parent of the node, or `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.view(self.node.parent)
    }

    /// Returns which side of its parent the node hangs from, or `None` for the root.
    pub fn side(&self) -> Option<Side> {
        self.parent().map(|parent| {
            if parent.node.left == Some(self.id) {
                Side::Left
            } else {
                Side::Right
            }
        })
    }

    /// Returns `true` if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }
}

impl<'a> PartialEq for NodeRef<'a> {
    fn eq(&self, other: &NodeRef<'a>) -> bool {
        ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<'a> Eq for NodeRef<'a> {}

impl<'a> fmt::Debug for NodeRef<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", &self.node.key)
            .field("color", &self.node.color)
            .finish()
    }
}

/// A NIL leaf of a `RedBlackTree`: an absent child slot of a real node.
///
/// NIL leaves carry no key and are always black.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NilLeaf<'a> {
    parent: NodeRef<'a>,
    side: Side,
}

impl<'a> NilLeaf<'a> {
    pub(crate) fn new(parent: NodeRef<'a>, side: Side) -> Self {
        NilLeaf { parent, side }
    }

    pub fn parent(&self) -> NodeRef<'a> {
        self.parent
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn color(&self) -> Color {
        Color::Black
    }

    pub fn key(&self) -> Option<i64> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, Side};
    use serde_test::{assert_tokens, Token};

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite().opposite(), Side::Right);
    }

    #[test]
    fn test_color_tokens() {
        assert_tokens(
            &Color::Black,
            &[Token::UnitVariant {
                name: "Color",
                variant: "Black",
            }],
        );
    }
}
