use crate::arena::TypedArena;
use crate::config::{Config, DEFAULT_ARENA_CHUNK_SIZE};
use crate::red_black_tree::node::{Color, NilLeaf, Node, NodeId, NodeRef, Side};
use log::trace;
use std::cmp::Ordering;
use std::collections::TryReserveError;
use thiserror::Error;

/// Errors returned by fallible `RedBlackTree` operations.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TreeError {
    #[error("failed to allocate a tree node: {0}")]
    AllocationFailed(#[from] TryReserveError),
}

/// A red black tree over `i64` keys with inspectable nodes.
///
/// Nodes live in a typed arena and link to their children and parent through `NodeId`s. Absent
/// children are the tree's NIL leaves and are treated as black. After every public mutation the
/// tree satisfies the red black invariants: the root is black, no red node has a red child, and
/// every path from a node down to a NIL leaf passes through the same number of black nodes.
///
/// # Examples
///
/// ```
/// use redblack_collections::red_black_tree::{Color, RedBlackTree};
///
/// let mut tree = RedBlackTree::new();
/// let (inserted, id) = tree.insert(10);
/// assert!(inserted);
///
/// let root = tree.root().unwrap();
/// assert_eq!(root.id(), id);
/// assert_eq!(root.key(), 10);
/// assert_eq!(root.color(), Color::Black);
///
/// assert!(tree.delete(10));
/// assert!(tree.find(10).is_none());
/// ```
pub struct RedBlackTree {
    arena: TypedArena<Node>,
    root: Option<NodeId>,
    chunk_size: usize,
}

impl RedBlackTree {
    /// Constructs a new, empty `RedBlackTree`.
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_ARENA_CHUNK_SIZE)
    }

    /// Constructs a new, empty `RedBlackTree` using the arena chunk size from `config`.
    pub fn with_config(config: &Config) -> Self {
        Self::with_chunk_size(config.arena_chunk_size)
    }

    fn with_chunk_size(chunk_size: usize) -> Self {
        RedBlackTree {
            arena: TypedArena::new(chunk_size),
            root: None,
            chunk_size,
        }
    }

    fn color_of(&self, id: Option<NodeId>) -> Color {
        id.map_or(Color::Black, |id| self.arena[id].color)
    }

    fn set_color(&mut self, id: NodeId, color: Color) {
        self.arena[id].color = color;
    }

    fn child_of(&self, id: NodeId, side: Side) -> Option<NodeId> {
        self.arena[id].child(side)
    }

    // precondition: `id` is not the root
    fn side_of(&self, id: NodeId) -> Side {
        let parent = self.arena[id]
            .parent
            .expect("Expected a non-root node to have a parent.");
        if self.arena[parent].left == Some(id) {
            Side::Left
        } else {
            Side::Right
        }
    }

    // Points whatever referenced `old` (its parent's child slot, or the root) at `new`.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(old);
                self.arena[parent].set_child(side, new);
            },
        }
    }

    // Moves `id` down towards `side`; its child on the opposite side takes its place.
    fn rotate(&mut self, id: NodeId, side: Side) {
        let child = self
            .child_of(id, side.opposite())
            .expect("Expected the rising child of a rotation to be `Some`.");
        trace!(
            "rotating {} {:?} around {}",
            self.arena[id].key,
            side,
            self.arena[child].key,
        );

        let inner = self.child_of(child, side);
        self.arena[id].set_child(side.opposite(), inner);
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(id);
        }

        let parent = self.arena[id].parent;
        self.replace_child(parent, id, Some(child));
        self.arena[child].parent = parent;

        self.arena[child].set_child(side, Some(id));
        self.arena[id].parent = Some(child);
    }

    #[cfg(test)]
    pub(crate) fn rotate_left(&mut self, id: NodeId) {
        self.rotate(id, Side::Left);
    }

    #[cfg(test)]
    pub(crate) fn rotate_right(&mut self, id: NodeId) {
        self.rotate(id, Side::Right);
    }

    fn find_id(&self, key: i64) -> Option<NodeId> {
        let mut curr = self.root;
        while let Some(id) = curr {
            let node = &self.arena[id];
            curr = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    fn extreme(&self, mut id: NodeId, side: Side) -> NodeId {
        while let Some(child) = self.child_of(id, side) {
            id = child;
        }
        id
    }

    fn view(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef::new(self, id, &self.arena[id])
    }

    /// Inserts a key into the tree, reporting allocation failure instead of panicking.
    ///
    /// Returns `(true, id)` for a newly inserted key and `(false, id)` with the id of the existing
    /// node if the key is already present. On error the tree is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// let (inserted, id) = tree.try_insert(3).unwrap();
    /// assert!(inserted);
    /// assert_eq!(tree.try_insert(3).unwrap(), (false, id));
    /// ```
    pub fn try_insert(&mut self, key: i64) -> Result<(bool, NodeId), TreeError> {
        let mut parent = None;
        let mut side = Side::Left;
        let mut curr = self.root;
        while let Some(id) = curr {
            let node = &self.arena[id];
            side = match key.cmp(&node.key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Ok((false, id)),
            };
            parent = Some(id);
            curr = node.child(side);
        }

        let id = self.arena.try_allocate(Node::new(key, parent))?;
        match parent {
            None => self.root = Some(id),
            Some(parent) => self.arena[parent].set_child(side, Some(id)),
        }
        self.insert_fixup(id);
        Ok((true, id))
    }

    /// Inserts a key into the tree. Returns `(true, id)` for a newly inserted key and
    /// `(false, id)` with the id of the existing node if the key is already present.
    ///
    /// # Panics
    ///
    /// Panics if a node cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// let (inserted, id) = tree.insert(1);
    /// assert!(inserted);
    /// assert_eq!(tree.insert(1), (false, id));
    /// ```
    pub fn insert(&mut self, key: i64) -> (bool, NodeId) {
        self.try_insert(key)
            .expect("Expected node allocation to succeed.")
    }

    /// Inserts every key of `keys` in order and returns one `(inserted, id)` pair per key.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// let results = tree.insert_batch(&[2, 1, 2]);
    /// assert_eq!(results.len(), 3);
    /// assert!(results[0].0 && results[1].0);
    /// assert_eq!(results[2], (false, results[0].1));
    /// ```
    pub fn insert_batch(&mut self, keys: &[i64]) -> Vec<(bool, NodeId)> {
        keys.iter().map(|key| self.insert(*key)).collect()
    }

    fn insert_fixup(&mut self, mut curr: NodeId) {
        while let Some(parent) = self.arena[curr].parent {
            if self.color_of(Some(parent)) == Color::Black {
                break;
            }

            let grandparent = self.arena[parent]
                .parent
                .expect("Expected a red node to have a parent.");
            let parent_side = self.side_of(parent);
            let uncle = self.child_of(grandparent, parent_side.opposite());

            if self.color_of(uncle) == Color::Red {
                trace!("insert fixup: recoloring around {}", self.arena[grandparent].key);
                self.set_color(parent, Color::Black);
                if let Some(uncle) = uncle {
                    self.set_color(uncle, Color::Black);
                }
                self.set_color(grandparent, Color::Red);
                curr = grandparent;
                continue;
            }

            let mut parent = parent;
            if self.side_of(curr) != parent_side {
                self.rotate(parent, parent_side);
                curr = parent;
                parent = self.arena[curr]
                    .parent
                    .expect("Expected a rotated node to have a parent.");
            }

            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, parent_side.opposite());
            break;
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Removes a key from the tree. Returns `true` if the key was present.
    ///
    /// If the key's node has two children, the key of its in-order predecessor is copied into it
    /// and the predecessor's node is removed instead. Ids of the removed node become stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// assert!(tree.delete(1));
    /// assert!(!tree.delete(1));
    /// ```
    pub fn delete(&mut self, key: i64) -> bool {
        let target = match self.find_id(key) {
            Some(id) => id,
            None => return false,
        };

        let removed = match (self.arena[target].left, self.arena[target].right) {
            (Some(left), Some(_)) => {
                let predecessor = self.extreme(left, Side::Right);
                self.arena[target].key = self.arena[predecessor].key;
                predecessor
            },
            _ => target,
        };

        let (replacement, parent) = {
            let node = &self.arena[removed];
            (node.left.or(node.right), node.parent)
        };
        let side = parent.map(|_| self.side_of(removed));

        self.replace_child(parent, removed, replacement);
        if let Some(replacement) = replacement {
            self.arena[replacement].parent = parent;
        }

        let node = self.arena.free(&removed);
        if node.color == Color::Black {
            self.delete_fixup(replacement, parent, side.unwrap_or(Side::Left));
        }
        true
    }

    // `curr` is the possibly NIL node carrying the extra black, hanging from `parent` on `side`.
    fn delete_fixup(&mut self, mut curr: Option<NodeId>, mut parent: Option<NodeId>, mut side: Side) {
        while let Some(p) = parent {
            if self.color_of(curr) == Color::Red {
                break;
            }

            let mut sibling = self
                .child_of(p, side.opposite())
                .expect("Expected a double black node to have a sibling.");

            if self.color_of(Some(sibling)) == Color::Red {
                trace!("delete fixup: red sibling {}", self.arena[sibling].key);
                self.set_color(sibling, Color::Black);
                self.set_color(p, Color::Red);
                self.rotate(p, side);
                sibling = self
                    .child_of(p, side.opposite())
                    .expect("Expected a double black node to have a sibling.");
            }

            let near = self.child_of(sibling, side);
            let far = self.child_of(sibling, side.opposite());

            if self.color_of(near) == Color::Black && self.color_of(far) == Color::Black {
                trace!("delete fixup: pushing black up to {}", self.arena[p].key);
                self.set_color(sibling, Color::Red);
                curr = Some(p);
                parent = self.arena[p].parent;
                if parent.is_some() {
                    side = self.side_of(p);
                }
                continue;
            }

            if self.color_of(far) == Color::Black {
                if let Some(near) = near {
                    self.set_color(near, Color::Black);
                }
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, side.opposite());
                sibling = self
                    .child_of(p, side.opposite())
                    .expect("Expected a double black node to have a sibling.");
            }

            trace!("delete fixup: resolving at {}", self.arena[p].key);
            let parent_color = self.arena[p].color;
            self.set_color(sibling, parent_color);
            self.set_color(p, Color::Black);
            if let Some(far) = self.child_of(sibling, side.opposite()) {
                self.set_color(far, Color::Black);
            }
            self.rotate(p, side);
            curr = None;
            break;
        }

        if let Some(curr) = curr {
            self.set_color(curr, Color::Black);
        }
        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Returns a view of the node holding `key`, or `None` if the key is absent.
    pub fn find(&self, key: i64) -> Option<NodeRef<'_>> {
        self.find_id(key).map(|id| self.view(id))
    }

    /// Returns a view of the node with a particular id, or `None` if the id is stale.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.arena.get(&id).map(|node| NodeRef::new(self, id, node))
    }

    /// Returns `true` if the tree holds `key`.
    pub fn contains(&self, key: i64) -> bool {
        self.find_id(key).is_some()
    }

    /// Returns a view of the root, or `None` if the tree is empty.
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.map(|id| self.view(id))
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Removes every key from the tree.
    pub fn clear(&mut self) {
        self.arena = TypedArena::new(self.chunk_size);
        self.root = None;
    }

    /// Returns the minimum key of the tree, or `None` if the tree is empty.
    pub fn min(&self) -> Option<i64> {
        self.root.map(|id| self.arena[self.extreme(id, Side::Left)].key)
    }

    /// Returns the maximum key of the tree, or `None` if the tree is empty.
    pub fn max(&self) -> Option<i64> {
        self.root.map(|id| self.arena[self.extreme(id, Side::Right)].key)
    }

    /// Returns every node of the tree in pre-order, starting with the root.
    pub fn all_nodes(&self) -> Vec<NodeRef<'_>> {
        let mut nodes = Vec::with_capacity(self.len());
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            let node = &self.arena[id];
            stack.extend(node.right);
            stack.extend(node.left);
            nodes.push(NodeRef::new(self, id, node));
        }
        nodes
    }

    /// Returns the NIL leaves of the tree in pre-order, one for every absent child of a node.
    ///
    /// An empty tree has no leaves. Every leaf is black.
    pub fn leaf_nodes(&self) -> Vec<NilLeaf<'_>> {
        let mut leaves = Vec::with_capacity(self.len() + 1);
        for node in self.all_nodes() {
            for side in [Side::Left, Side::Right].iter() {
                if node.child(*side).is_none() {
                    leaves.push(NilLeaf::new(node, *side));
                }
            }
        }
        leaves
    }

    /// Returns every node with at least one child, in pre-order.
    pub fn non_leaf_nodes(&self) -> Vec<NodeRef<'_>> {
        self.all_nodes()
            .into_iter()
            .filter(|node| !node.is_leaf())
            .collect()
    }

    /// Returns the keys of the tree in ascending order.
    pub fn keys(&self) -> Vec<i64> {
        self.iter().map(|node| node.key()).collect()
    }

    /// Returns an iterator over the nodes of the tree in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert_batch(&[3, 1, 2]);
    ///
    /// let keys: Vec<i64> = tree.iter().map(|node| node.key()).collect();
    /// assert_eq!(keys, vec![1, 2, 3]);
    /// ```
    pub fn iter(&self) -> RedBlackTreeIter<'_> {
        RedBlackTreeIter {
            tree: self,
            current: self.root,
            stack: Vec::new(),
        }
    }
}

impl Default for RedBlackTree {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a RedBlackTree {
    type IntoIter = RedBlackTreeIter<'a>;
    type Item = NodeRef<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator for `RedBlackTree`.
///
/// This iterator traverses the nodes of the tree in-order.
pub struct RedBlackTreeIter<'a> {
    tree: &'a RedBlackTree,
    current: Option<NodeId>,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for RedBlackTreeIter<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.current {
            self.stack.push(id);
            self.current = self.tree.arena[id].left;
        }
        self.stack.pop().map(|id| {
            self.current = self.tree.arena[id].right;
            self.tree.view(id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RedBlackTree;
    use crate::red_black_tree::node::{Color, Side};

    fn shape(tree: &RedBlackTree) -> Vec<(i64, Color, Option<i64>)> {
        tree.all_nodes()
            .iter()
            .map(|node| (node.key(), node.color(), node.parent().map(|p| p.key())))
            .collect()
    }

    #[test]
    fn test_rotate_left() {
        let mut tree = RedBlackTree::new();
        let (_, root) = tree.insert(2);
        tree.insert(1);
        tree.insert(3);
        tree.rotate_left(root);

        let root = tree.root().unwrap();
        assert_eq!(root.key(), 3);
        assert_eq!(root.parent(), None);
        assert_eq!(root.left().unwrap().key(), 2);
        assert_eq!(root.left().unwrap().left().unwrap().key(), 1);
        assert_eq!(tree.keys(), vec![1, 2, 3]);
    }

    #[test]
    fn test_rotate_right_keeps_colors() {
        let mut tree = RedBlackTree::new();
        let (_, root) = tree.insert(2);
        tree.insert(1);
        tree.insert(3);
        let before: Vec<(i64, Color)> = tree.iter().map(|n| (n.key(), n.color())).collect();
        tree.rotate_right(root);

        let root = tree.root().unwrap();
        assert_eq!(root.key(), 1);
        assert_eq!(root.right().unwrap().key(), 2);
        assert_eq!(root.right().unwrap().right().unwrap().parent().unwrap().key(), 2);
        let after: Vec<(i64, Color)> = tree.iter().map(|n| (n.key(), n.color())).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_insert_recolor() {
        let mut tree = RedBlackTree::new();
        tree.insert_batch(&[2, 1, 3, 4]);
        assert_eq!(
            shape(&tree),
            vec![
                (2, Color::Black, None),
                (1, Color::Black, Some(2)),
                (3, Color::Black, Some(2)),
                (4, Color::Red, Some(3)),
            ],
        );
    }

    #[test]
    fn test_insert_line_rotation() {
        let mut tree = RedBlackTree::new();
        tree.insert_batch(&[1, 2, 3]);
        assert_eq!(
            shape(&tree),
            vec![
                (2, Color::Black, None),
                (1, Color::Red, Some(2)),
                (3, Color::Red, Some(2)),
            ],
        );
    }

    #[test]
    fn test_insert_zig_zag_rotation() {
        let mut tree = RedBlackTree::new();
        tree.insert_batch(&[3, 1, 2]);
        assert_eq!(
            shape(&tree),
            vec![
                (2, Color::Black, None),
                (1, Color::Red, Some(2)),
                (3, Color::Red, Some(2)),
            ],
        );
    }

    #[test]
    fn test_delete_red_sibling() {
        let mut tree = RedBlackTree::new();
        tree.insert_batch(&[2, 1, 4, 3, 5, 6]);
        tree.delete(6);
        tree.delete(1);
        assert_eq!(tree.keys(), vec![2, 3, 4, 5]);
        assert!(tree.is_valid());
    }

    #[test]
    fn test_delete_to_empty() {
        let mut tree = RedBlackTree::new();
        tree.insert_batch(&[5, 3, 8]);
        assert!(tree.delete(5));
        assert!(tree.delete(3));
        assert!(tree.delete(8));
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.root().is_none());
    }

    #[test]
    fn test_delete_two_children_copies_predecessor() {
        let mut tree = RedBlackTree::new();
        let results = tree.insert_batch(&[50, 30, 70, 20, 40]);
        let root_id = results[0].1;
        let predecessor_id = results[4].1;

        assert!(tree.delete(50));
        assert_eq!(tree.get(root_id).unwrap().key(), 40);
        assert!(tree.get(predecessor_id).is_none());
    }

    #[test]
    fn test_leaf_nodes() {
        let mut tree = RedBlackTree::new();
        assert!(tree.leaf_nodes().is_empty());

        tree.insert_batch(&[2, 1]);
        let leaves: Vec<(i64, Side)> = tree
            .leaf_nodes()
            .iter()
            .map(|leaf| (leaf.parent().key(), leaf.side()))
            .collect();
        assert_eq!(leaves, vec![(2, Side::Right), (1, Side::Left), (1, Side::Right)]);
    }

    #[test]
    fn test_min_max() {
        let mut tree = RedBlackTree::new();
        assert_eq!(tree.min(), None);
        assert_eq!(tree.max(), None);
        tree.insert_batch(&[5, -3, 9, 0]);
        assert_eq!(tree.min(), Some(-3));
        assert_eq!(tree.max(), Some(9));
    }

    #[test]
    fn test_clear() {
        let mut tree = RedBlackTree::new();
        tree.insert_batch(&[1, 2, 3]);
        tree.clear();
        assert!(tree.is_empty());
        assert!(!tree.contains(1));
        assert!(tree.insert(1).0);
    }
}
