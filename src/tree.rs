//! Module implement pointer-linked binary tree, [Tree].
//!
//! Nodes are kept in an arena, addressed by slot index. Each node owns
//! its left and right child, while the parent link is a plain index used
//! to walk back up the tree. [Tree] provide the mechanical operations,
//! rotation, relinking and in-order traversal, and never look at the
//! node's payload.
//!
//! Building a tree by hand and rotating it:
//!
//! ```
//! use redblack::{Side, Tree};
//!
//! let mut tree: Tree<i32> = Tree::new();
//! let root = tree.set_root(1).unwrap();
//! let two = tree.attach(root, Side::Right, 2).unwrap();
//!
//! tree.rotate_left(root).unwrap();
//! assert_eq!(tree.root(), Some(two));
//! assert_eq!(tree.left(two), Some(root));
//! assert_eq!(tree.parent(root), Some(two));
//!
//! let items: Vec<i32> = tree.iter().cloned().collect();
//! assert_eq!(items, vec![1, 2]);
//! ```

use log::trace;
use slab::Slab;

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::{Error, Result};

// Source for process-unique tree identity, zero is never handed out.
static TREE_IDS: AtomicU64 = AtomicU64::new(1);

/// Identity of a node within a specific [Tree] instance.
///
/// A NodeId resolves only while the node it was issued for is alive in
/// the same tree. Ids of removed nodes, or of nodes from another tree,
/// never resolve, even after their slot is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    tree: u64,
    key: usize,
    serial: u64,
}

/// Which child of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

pub(crate) type Link = Option<usize>;

struct Node<T> {
    item: T,
    serial: u64,
    parent: Link,
    left: Link,  // owned
    right: Link, // owned
}

impl<T> Node<T> {
    #[inline]
    fn child(&self, side: Side) -> Link {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    fn child_mut(&mut self, side: Side) -> &mut Link {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Tree manage a single instance of pointer-linked binary tree.
pub struct Tree<T> {
    id: u64,
    nodes: Slab<Node<T>>,
    root: Link,
    serial: u64, // last serial handed out.
}

impl<T> Default for Tree<T> {
    fn default() -> Tree<T> {
        Tree::new()
    }
}

impl<T> Tree<T> {
    /// Create an empty tree.
    pub fn new() -> Tree<T> {
        Tree {
            id: TREE_IDS.fetch_add(1, AtomicOrdering::Relaxed),
            nodes: Slab::new(),
            root: None,
            serial: 0,
        }
    }

    /// Return number of nodes in this tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Return the root node, None if tree is empty.
    pub fn root(&self) -> Option<NodeId> {
        self.root.map(|key| self.to_id(key))
    }

    /// Return whether `id` refers to a live node in this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.resolve(id).is_some()
    }

    /// Make a new root node out of `item`. Fail if tree already has
    /// a root.
    pub fn set_root(&mut self, item: T) -> Result<NodeId> {
        if self.root.is_some() {
            return err_at!(InvalidOperation, msg: "tree already has a root");
        }
        let key = self.alloc(item);
        self.link(None, Side::Left, key);
        Ok(self.to_id(key))
    }

    /// Attach a new node, for `item`, as `side` child of `parent`. Fail
    /// if parent is not part of this tree or if its child slot is
    /// already occupied.
    pub fn attach(&mut self, parent: NodeId, side: Side, item: T) -> Result<NodeId> {
        let pkey = match self.resolve(parent) {
            Some(pkey) => pkey,
            None => return err_at!(InvalidArgument, msg: "parent {:?} not in tree", parent),
        };
        if self.child(pkey, side).is_some() {
            return err_at!(InvalidOperation, msg: "{:?} child of {:?} is occupied", side, parent);
        }
        let key = self.alloc(item);
        self.link(Some(pkey), side, key);
        Ok(self.to_id(key))
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.resolve(id).map(|key| &self.nodes[key].item)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        let key = self.resolve(id)?;
        Some(&mut self.nodes[key].item)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let key = self.resolve(id)?;
        self.nodes[key].parent.map(|key| self.to_id(key))
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        let key = self.resolve(id)?;
        self.child(key, Side::Left).map(|key| self.to_id(key))
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        let key = self.resolve(id)?;
        self.child(key, Side::Right).map(|key| self.to_id(key))
    }

    /// Return the other child of this node's parent. Binary tree can
    /// only have one sibling.
    pub fn sibling(&self, id: NodeId) -> Option<NodeId> {
        let key = self.resolve(id)?;
        self.sibling_of(key).map(|key| self.to_id(key))
    }

    /// Return sibling of this node's parent.
    pub fn uncle(&self, id: NodeId) -> Option<NodeId> {
        let key = self.resolve(id)?;
        let parent = self.nodes[key].parent?;
        self.sibling_of(parent).map(|key| self.to_id(key))
    }

    /// Rotate left around `id`, its right child takes its place.
    pub fn rotate_left(&mut self, id: NodeId) -> Result<()> {
        self.rotate_at(id, Side::Left)
    }

    /// Rotate right around `id`, its left child takes its place.
    pub fn rotate_right(&mut self, id: NodeId) -> Result<()> {
        self.rotate_at(id, Side::Right)
    }

    /// Return an iterator over all items in in-order sequence.
    ///
    /// Iteration walks the parent links and does not allocate.
    pub fn iter(&self) -> Iter<T> {
        Iter {
            tree: self,
            curr: self.root,
            prev: None,
        }
    }

    fn rotate_at(&mut self, id: NodeId, dir: Side) -> Result<()> {
        let key = match self.resolve(id) {
            Some(key) => key,
            None => return err_at!(InvalidArgument, msg: "node {:?} not in tree", id),
        };
        if self.child(key, dir.opposite()).is_none() {
            return err_at!(InvalidArgument, msg: "rotate {:?} {:?}, missing pivot", dir, id);
        }
        self.rotate(key, dir);
        Ok(())
    }
}

// Crate internal API, addressed by slot index. Callers guarantee the
// index refers to a live node.
impl<T> Tree<T> {
    #[inline]
    pub(crate) fn to_id(&self, key: usize) -> NodeId {
        NodeId {
            tree: self.id,
            key,
            serial: self.nodes[key].serial,
        }
    }

    #[inline]
    pub(crate) fn item(&self, key: usize) -> &T {
        &self.nodes[key].item
    }

    #[inline]
    pub(crate) fn item_mut(&mut self, key: usize) -> &mut T {
        &mut self.nodes[key].item
    }

    pub(crate) fn resolve(&self, id: NodeId) -> Link {
        if id.tree != self.id {
            return None;
        }
        match self.nodes.get(id.key) {
            Some(node) if node.serial == id.serial => Some(id.key),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn root_key(&self) -> Link {
        self.root
    }

    #[inline]
    pub(crate) fn parent_of(&self, key: usize) -> Link {
        self.nodes[key].parent
    }

    #[inline]
    pub(crate) fn child(&self, key: usize, side: Side) -> Link {
        self.nodes[key].child(side)
    }

    /// Side on which `key` hangs from its parent, None for root.
    pub(crate) fn side_of(&self, key: usize) -> Option<Side> {
        let parent = self.nodes[key].parent?;
        match self.nodes[parent].left == Some(key) {
            true => Some(Side::Left),
            false => Some(Side::Right),
        }
    }

    pub(crate) fn sibling_of(&self, key: usize) -> Link {
        let side = self.side_of(key)?;
        let parent = self.nodes[key].parent?;
        self.child(parent, side.opposite())
    }

    /// Follow `side` links from `key` until the last node.
    pub(crate) fn extreme(&self, mut key: usize, side: Side) -> usize {
        while let Some(next) = self.child(key, side) {
            key = next;
        }
        key
    }

    /// Allocate a detached node for `item`.
    pub(crate) fn alloc(&mut self, item: T) -> usize {
        self.serial += 1;
        self.nodes.insert(Node {
            item,
            serial: self.serial,
            parent: None,
            left: None,
            right: None,
        })
    }

    /// Release a node that is already unlinked from the tree.
    pub(crate) fn free(&mut self, key: usize) -> T {
        self.nodes.remove(key).item
    }

    /// Link detached node `key` as `side` child of `parent`, or as root
    /// when parent is None.
    pub(crate) fn link(&mut self, parent: Link, side: Side, key: usize) {
        match parent {
            Some(parent) => self.set_child(parent, side, Some(key)),
            None => {
                self.nodes[key].parent = None;
                self.root = Some(key);
            }
        }
    }

    /// Set `side` child of `key` and point the child back to `key`.
    pub(crate) fn set_child(&mut self, key: usize, side: Side, child: Link) {
        *self.nodes[key].child_mut(side) = child;
        if let Some(child) = child {
            self.nodes[child].parent = Some(key);
        }
    }

    /// Repoint the edge that reaches `key`, from its parent or from the
    /// root, to `with`. The node `key` keeps its own links.
    pub(crate) fn replace(&mut self, key: usize, with: Link) {
        let parent = self.nodes[key].parent;
        if let Some(with) = with {
            self.nodes[with].parent = parent;
        }
        match parent {
            None => self.root = with,
            Some(parent) if self.nodes[parent].left == Some(key) => {
                self.nodes[parent].left = with
            }
            Some(parent) => self.nodes[parent].right = with,
        }
    }

    //              (i)                      (i)
    //               |                        |
    //              key                     pivot
    //              /  \                     / \
    //             a   pivot     ==>       key  c
    //                 /  \                / \
    //                b    c              a   b
    //
    // Rotate with dir = Left, mirror for dir = Right. `key` moves down
    // towards `dir`, its child on the opposite side must exist.
    pub(crate) fn rotate(&mut self, key: usize, dir: Side) {
        let pivot = match self.child(key, dir.opposite()) {
            Some(pivot) => pivot,
            None => panic!("rotate(): missing pivot, fatal logic"),
        };
        trace!("rotate {:?} at slot {} pivot {}", dir, key, pivot);

        let inner = self.child(pivot, dir);
        self.set_child(key, dir.opposite(), inner);
        self.replace(key, Some(pivot));
        self.set_child(pivot, dir, Some(key));
    }
}


/// In-order iterator over [Tree], created by [Tree::iter].
///
/// Keeps only the current and previously visited node, the direction
/// of the next step follows from where the walk came from.
pub struct Iter<'a, T> {
    tree: &'a Tree<T>,
    curr: Link,
    prev: Link,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let key = self.curr?;
            let node = &self.tree.nodes[key];
            let from = self.prev;
            self.prev = Some(key);

            if from == node.parent {
                // descending
                if node.left.is_some() {
                    self.curr = node.left;
                    continue;
                }
            } else if from == node.right {
                // right subtree is done
                self.curr = node.parent;
                continue;
            }

            self.curr = node.right.or(node.parent);
            break Some(&node.item);
        }
    }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
