//! Module provide ordered container implemented by [RbTree] type.
//!
//! RbTree is a [red-black][wiki-rb] tree layered on [Tree]. The search
//! tree decides where nodes are attached and detached and when to
//! rotate, [Tree] does the relinking.
//!
//! - Values are ordered by an injected [Compare] capability.
//! - Duplicates are kept, equal values route to the right.
//! - add() return a [Handle], remove() take a handle and remove that
//!   very node, not just any node with an equal value.
//! - Full table scan, in ascending order.
//! - Not thread safe.
//!
//! Custom ordering:
//! ```
//! use redblack::RbTree;
//!
//! let mut tree = RbTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
//! tree.extend(vec![1, 7, 5, 9, 22, 4, 2, 4]);
//! let values: Vec<i32> = tree.iter().cloned().collect();
//! assert_eq!(values, vec![22, 9, 7, 5, 4, 4, 2, 1]);
//! ```
//!
//! [wiki-rb]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use log::{debug, trace};

use std::{cmp::Ordering, fmt};

use crate::{
    compare::{Compare, Natural},
    config::{Config, Substitute},
    tree::{self, Link, NodeId, Side, Tree},
    Error, Result,
};

/// Identity of a value inserted into [RbTree].
pub type Handle = NodeId;

/// Balance tag for each node. Absent children count as Black.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

struct Entry<T> {
    value: T,
    color: Color,
}

/// Statistics collected by [RbTree::validate].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Number of values in the tree.
    pub entries: usize,
    /// Black nodes on every path from root to an absent child.
    pub blacks: usize,
    /// Nodes on the longest path from root to a leaf.
    pub depth: usize,
}

/// RbTree manage a single instance of in-memory ordered container
/// using [red-black][wiki-rb] tree.
///
/// [wiki-rb]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct RbTree<T, C = Natural> {
    tree: Tree<Entry<T>>,
    cmp: C,
    config: Config,
}

impl<T> RbTree<T, Natural>
where
    T: Ord,
{
    /// Create an empty instance, ordered by `T`'s natural order.
    pub fn new() -> RbTree<T, Natural> {
        RbTree::with_config(Natural, Config::default())
    }
}

impl<T> Default for RbTree<T, Natural>
where
    T: Ord,
{
    fn default() -> RbTree<T, Natural> {
        RbTree::new()
    }
}

impl<T, C> RbTree<T, C>
where
    C: Compare<T>,
{
    /// Create an empty instance ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> RbTree<T, C> {
        RbTree::with_config(cmp, Config::default())
    }

    /// Create an empty instance ordered by `cmp` and configured by
    /// `config`.
    pub fn with_config(cmp: C, config: Config) -> RbTree<T, C> {
        RbTree {
            tree: Tree::new(),
            cmp,
            config,
        }
    }
}

/// Maintenance API.
impl<T, C> RbTree<T, C> {
    /// Return number of values in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Check whether this instance is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Return the configuration this instance was created with.
    pub fn to_config(&self) -> Config {
        self.config
    }

    /// Return the value held by node `handle`, None if handle is not
    /// linked into this tree.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.tree.get(handle).map(|entry| &entry.value)
    }

    /// Return the color of node `handle`.
    pub fn color(&self, handle: Handle) -> Option<Color> {
        self.tree.get(handle).map(|entry| entry.color)
    }

    /// Return the handle of root node, None if tree is empty.
    pub fn root(&self) -> Option<Handle> {
        self.tree.root()
    }

    /// Return an iterator over all values in ascending order.
    pub fn iter(&self) -> Iter<T> {
        Iter {
            iter: self.tree.iter(),
        }
    }
}

impl<T, C> RbTree<T, C>
where
    C: Compare<T>,
{
    /// Add value to this instance and return the handle of its node.
    /// Values equal to existing ones are kept alongside them.
    pub fn add(&mut self, value: T) -> Handle {
        let (mut parent, mut side) = (None, Side::Left);
        let mut node = self.tree.root_key();
        while let Some(key) = node {
            side = match self.cmp.compare(&value, &self.tree.item(key).value) {
                Ordering::Less => Side::Left,
                Ordering::Equal | Ordering::Greater => Side::Right,
            };
            parent = Some(key);
            node = self.tree.child(key, side);
        }

        let color = Color::Red;
        let key = self.tree.alloc(Entry { value, color });
        self.tree.link(parent, side, key);
        self.insert_repair(key);

        self.tree.to_id(key)
    }

    /// Find a node whose value compares equal to `value`.
    pub fn find(&self, value: &T) -> Option<Handle> {
        let mut node = self.tree.root_key();
        while let Some(key) = node {
            node = match self.cmp.compare(value, &self.tree.item(key).value) {
                Ordering::Less => self.tree.child(key, Side::Left),
                Ordering::Greater => self.tree.child(key, Side::Right),
                Ordering::Equal => return Some(self.tree.to_id(key)),
            };
        }
        None
    }

    /// Remove the node identified by `handle` and return its value.
    ///
    /// Fail with [Error::InvalidArgument] when handle is None, and with
    /// [Error::InvalidOperation] when handle is not linked into this
    /// tree, either because it belongs to another tree or because its
    /// node was already removed. Tree is left untouched on failure.
    pub fn remove<H>(&mut self, handle: H) -> Result<T>
    where
        H: Into<Option<Handle>>,
    {
        let handle = match handle.into() {
            Some(handle) => handle,
            None => {
                debug!("remove rejected, no handle");
                return err_at!(InvalidArgument, msg: "remove without handle");
            }
        };
        let key = match self.tree.resolve(handle) {
            Some(key) => key,
            None => {
                debug!("remove rejected, {:?} not linked", handle);
                return err_at!(InvalidOperation, msg: "{:?} not in this tree", handle);
            }
        };

        let (child, parent, color) = self.unlink(key);
        if color == Color::Black {
            self.delete_repair(child, parent);
        }

        Ok(self.tree.free(key).value)
    }

    /// Validate red-black tree with following rules:
    ///
    /// * Root node is black.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Number of blacks should be same under left child and right child.
    /// * Values are in sorted order, duplicates allowed.
    /// * Every child points back to its parent.
    ///
    /// Additionally return statistics on the tree, refer to [Stats].
    pub fn validate(&self) -> Result<Stats>
    where
        T: fmt::Debug,
    {
        let root = self.tree.root_key();
        if let Some(key) = root {
            if self.tree.parent_of(key).is_some() {
                return err_at!(Fatal, msg: "root has a parent");
            }
        }
        if self.is_red(root) {
            return err_at!(Fatal, msg: "root is red");
        }

        let mut stats = Stats::default();
        let blacks = self.validate_tree(root, false, 1, &mut stats)?;
        stats.blacks = blacks;

        if stats.entries != self.len() {
            return err_at!(Fatal, msg: "reachable {} nodes {}", stats.entries, self.len());
        }

        let mut iter = self.iter();
        if let Some(mut prev) = iter.next() {
            for value in iter {
                if self.cmp.compare(prev, value) == Ordering::Greater {
                    return err_at!(Fatal, msg: "unsorted {:?} {:?}", prev, value);
                }
                prev = value;
            }
        }

        Ok(stats)
    }
}

impl<T, C> RbTree<T, C>
where
    C: Compare<T>,
{
    fn insert_repair(&mut self, mut key: usize) {
        loop {
            let parent = match self.tree.parent_of(key) {
                Some(parent) if self.is_red(Some(parent)) => parent,
                Some(_) => break,
                None => {
                    self.set_color(key, Color::Black);
                    break;
                }
            };
            // a red parent is never the root, root stays black.
            let grand = match self.tree.parent_of(parent) {
                Some(grand) => grand,
                None => {
                    self.set_color(parent, Color::Black);
                    break;
                }
            };

            let uncle = self.tree.sibling_of(parent);
            if let Some(uncle) = uncle.filter(|uncle| self.is_red(Some(*uncle))) {
                trace!("insert_repair red uncle at slot {}", grand);
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grand, Color::Red);
                key = grand;
                continue;
            }

            let side = match self.tree.side_of(parent) {
                Some(side) => side,
                None => panic!("insert_repair(): parent off grand, fatal logic"),
            };
            let mut top = parent;
            if self.tree.side_of(key) != Some(side) {
                trace!("insert_repair zig-zag at slot {}", parent);
                self.tree.rotate(parent, side);
                top = key;
            }
            trace!("insert_repair rotate grand slot {}", grand);
            self.tree.rotate(grand, side.opposite());
            self.set_color(top, Color::Black);
            self.set_color(grand, Color::Red);
            break;
        }
    }

    // Detach `key` from the tree, reducing the two children case to
    // removal of the substitute node, which takes over `key`'s position
    // and color. Return the position that lost a node, as child and its
    // parent, and the color that was removed from that position.
    fn unlink(&mut self, key: usize) -> (Link, Link, Color) {
        let left = self.tree.child(key, Side::Left);
        let right = self.tree.child(key, Side::Right);

        let (outer, inner) = match (left, right) {
            (Some(_), Some(_)) => match self.config.substitute {
                Substitute::Successor => (Side::Right, Side::Left),
                Substitute::Predecessor => (Side::Left, Side::Right),
            },
            (child, None) | (None, child) => {
                let parent = self.tree.parent_of(key);
                self.tree.replace(key, child);
                return (child, parent, self.tree.item(key).color);
            }
        };

        let subtree = match self.tree.child(key, outer) {
            Some(subtree) => subtree,
            None => panic!("unlink(): missing subtree, fatal logic"),
        };
        let sub = self.tree.extreme(subtree, inner);
        let color = self.tree.item(sub).color;
        let child = self.tree.child(sub, outer);

        let parent = if sub == subtree {
            Some(sub)
        } else {
            let parent = self.tree.parent_of(sub);
            self.tree.replace(sub, child);
            self.tree.set_child(sub, outer, Some(subtree));
            parent
        };

        self.tree.replace(key, Some(sub));
        let other = self.tree.child(key, inner);
        self.tree.set_child(sub, inner, other);
        let color_key = self.tree.item(key).color;
        self.tree.item_mut(sub).color = color_key;

        (child, parent, color)
    }

    // Position `node`, under `parent`, is one black short of its sibling.
    fn delete_repair(&mut self, mut node: Link, mut parent: Link) {
        loop {
            if let Some(key) = node.filter(|key| self.is_red(Some(*key))) {
                self.set_color(key, Color::Black);
                break;
            }
            let pkey = match parent {
                Some(pkey) => pkey,
                None => break, // absorbed at root
            };

            let side = match self.tree.child(pkey, Side::Left) == node {
                true => Side::Left,
                false => Side::Right,
            };

            let mut sibling = self.expect_sibling(pkey, side);
            if self.is_red(Some(sibling)) {
                trace!("delete_repair red sibling at slot {}", pkey);
                self.set_color(sibling, Color::Black);
                self.set_color(pkey, Color::Red);
                self.tree.rotate(pkey, side);
                sibling = self.expect_sibling(pkey, side);
            }

            let near = self.tree.child(sibling, side);
            let far = self.tree.child(sibling, side.opposite());
            if !self.is_red(near) && !self.is_red(far) {
                self.set_color(sibling, Color::Red);
                if self.is_red(Some(pkey)) {
                    self.set_color(pkey, Color::Black);
                    break;
                }
                trace!("delete_repair propagate from slot {}", pkey);
                node = Some(pkey);
                parent = self.tree.parent_of(pkey);
                continue;
            }

            if !self.is_red(far) {
                if let Some(near) = near {
                    trace!("delete_repair near nephew at slot {}", sibling);
                    self.set_color(near, Color::Black);
                    self.set_color(sibling, Color::Red);
                    self.tree.rotate(sibling, side.opposite());
                    sibling = self.expect_sibling(pkey, side);
                }
            }

            let color = self.tree.item(pkey).color;
            self.set_color(sibling, color);
            self.set_color(pkey, Color::Black);
            if let Some(far) = self.tree.child(sibling, side.opposite()) {
                self.set_color(far, Color::Black);
            }
            self.tree.rotate(pkey, side);
            break;
        }
    }

    // A black-deficient position always has a sibling.
    fn expect_sibling(&self, parent: usize, side: Side) -> usize {
        match self.tree.child(parent, side.opposite()) {
            Some(sibling) => sibling,
            None => panic!("delete_repair(): missing sibling, fatal logic"),
        }
    }

    fn validate_tree(
        &self,
        node: Link,
        fromred: bool,
        depth: usize,
        stats: &mut Stats,
    ) -> Result<usize>
    where
        T: fmt::Debug,
    {
        let key = match node {
            Some(key) => key,
            None => return Ok(0),
        };
        stats.entries += 1;
        stats.depth = stats.depth.max(depth);

        let red = self.is_red(node);
        if fromred && red {
            return err_at!(Fatal, msg: "consecutive reds at {:?}", self.tree.item(key).value);
        }

        let value = &self.tree.item(key).value;
        for side in [Side::Left, Side::Right].iter() {
            let child = match self.tree.child(key, *side) {
                Some(child) => child,
                None => continue,
            };
            if self.tree.parent_of(child) != Some(key) {
                return err_at!(Fatal, msg: "broken parent link under {:?}", value);
            }
            let cval = &self.tree.item(child).value;
            match (side, self.cmp.compare(cval, value)) {
                (Side::Left, Ordering::Greater) | (Side::Right, Ordering::Less) => {
                    return err_at!(Fatal, msg: "sort {:?} {:?} parent:{:?}", side, cval, value);
                }
                _ => (),
            }
        }

        let left = self.tree.child(key, Side::Left);
        let right = self.tree.child(key, Side::Right);
        let lblacks = self.validate_tree(left, red, depth + 1, stats)?;
        let rblacks = self.validate_tree(right, red, depth + 1, stats)?;
        if lblacks != rblacks {
            return err_at!(Fatal, msg: "unbalanced blacks {} {}", lblacks, rblacks);
        }

        Ok(if red { lblacks } else { lblacks + 1 })
    }
}

impl<T, C> RbTree<T, C> {
    #[inline]
    fn is_red(&self, node: Link) -> bool {
        node.map_or(false, |key| self.tree.item(key).color == Color::Red)
    }

    #[inline]
    fn set_color(&mut self, key: usize, color: Color) {
        self.tree.item_mut(key).color = color
    }
}

impl<T, C> Extend<T> for RbTree<T, C>
where
    C: Compare<T>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        iter.into_iter().for_each(|value| {
            self.add(value);
        });
    }
}

impl<'a, T, C> IntoIterator for &'a RbTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Ascending iterator over [RbTree], created by [RbTree::iter].
pub struct Iter<'a, T> {
    iter: tree::Iter<'a, Entry<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|entry| &entry.value)
    }
}

#[cfg(test)]
#[path = "rbtree_test.rs"]
mod rbtree_test;
