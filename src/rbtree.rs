//! Module provide ordered index implemented by [RbTree] type.
//!
//! RbTree is implemented using classic [red-black][wiki-rb] tree, where
//! every node carries a link to its parent and balance is restored by a
//! bottom-up fix-up walk after each insert and delete.
//!
//! - Each entry in RbTree instance is a single key.
//! - Parametrised over `key-type` and over a [Comparator].
//! - Lookup via get(), min() and max().
//! - Mutations via insert() and delete().
//! - No Durability guarantee.
//! - Not thread safe.
//!
//! Constructing a new [RbTree] instance:
//! ```
//! use rbindex::RbTree;
//!
//! let mut index: RbTree<u64> = RbTree::new();
//! for key in [100, 10, 12, 33].iter() {
//!     index.insert(*key).unwrap();
//! }
//! assert!(index.get(&33).is_ok());
//! assert!(index.get(&199).is_err());
//! index.validate().unwrap();
//! ```
//!
//! [wiki-rb]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use log::{debug, trace};

use std::{cmp::Ordering, fmt};

use crate::{
    arena::Arena,
    node::{Node, NodeId, Side},
    order::{Comparator, Natural},
    Error, Result,
};

/// RbTree manage a single instance of in-memory ordered index using
/// [red-black][rb] tree.
///
/// [rb]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct RbTree<K, C = Natural> {
    arena: Arena<K>,
    root: Option<NodeId>,
    cmp: C,
    n_count: usize, // number of entries in the tree.
}

impl<K> RbTree<K, Natural> {
    /// Create an empty instance of RbTree, ordering keys by [Ord].
    pub fn new() -> RbTree<K, Natural> {
        RbTree::with_comparator(Natural)
    }
}

impl<K> Default for RbTree<K, Natural> {
    fn default() -> RbTree<K, Natural> {
        RbTree::new()
    }
}

impl<K, C> RbTree<K, C> {
    /// Create an empty instance of RbTree, ordering keys by `cmp`.
    pub fn with_comparator(cmp: C) -> RbTree<K, C> {
        RbTree {
            arena: Arena::new(),
            root: None,
            cmp,
            n_count: Default::default(),
        }
    }
}

/// Maintenance API.
impl<K, C> RbTree<K, C> {
    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_count == 0
    }

    /// Validate red-black tree with following rules:
    ///
    /// * Root is black.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Number of blacks should be same under left child and right child.
    /// * Make sure keys are in sorted order, without duplicates.
    /// * Every child links back to its parent.
    pub fn validate(&self) -> Result<()>
    where
        K: fmt::Debug,
        C: Comparator<K>,
    {
        let res = self.do_validate();
        if let Err(err) = &res {
            debug!("validate failed {}", err);
        }
        res
    }

    fn do_validate(&self) -> Result<()>
    where
        K: fmt::Debug,
        C: Comparator<K>,
    {
        if let Some(root) = self.root {
            let node = &self.arena[root];
            if node.parent.is_some() {
                err_at!(Fatal, msg: "root {:?} has parent {:?}", root, node.parent)?;
            }
            if node.is_red() {
                err_at!(Fatal, msg: "red root {:?}", node.key)?;
            }
        }

        let (n_count, _) = self.validate_tree(self.root, None, false, 0, None, None)?;
        if n_count != self.n_count {
            err_at!(Fatal, msg: "mismatch in count {} != {}", n_count, self.n_count)?;
        }
        if self.arena.len() != n_count {
            err_at!(Fatal, msg: "detached nodes {} != {}", self.arena.len(), n_count)?;
        }
        Ok(())
    }

    // return (number of nodes, black-height) for subtree at `id`.
    fn validate_tree(
        &self,
        id: Option<NodeId>,
        parent: Option<NodeId>,
        fromred: bool,
        n_blacks: usize,
        low: Option<&K>,
        high: Option<&K>,
    ) -> Result<(usize, usize)>
    where
        K: fmt::Debug,
        C: Comparator<K>,
    {
        let id = match id {
            Some(id) => id,
            None => return Ok((0, n_blacks)),
        };
        let node = &self.arena[id];

        if node.parent != parent {
            err_at!(Fatal, msg: "parent {:?} != {:?} at {:?}", node.parent, parent, node.key)?;
        }

        let red = node.is_red();
        if fromred && red {
            err_at!(Fatal, msg: "consecutive reds at {:?}", node.key)?;
        }

        if let Some(low) = low {
            if !self.cmp.less(low, &node.key) {
                err_at!(Fatal, msg: "sort key:{:?} low:{:?}", node.key, low)?;
            }
        }
        if let Some(high) = high {
            if !self.cmp.less(&node.key, high) {
                err_at!(Fatal, msg: "sort key:{:?} high:{:?}", node.key, high)?;
            }
        }

        let n_blacks = if red { n_blacks } else { n_blacks + 1 };
        let key = Some(&node.key);
        let (lcount, lblacks) =
            self.validate_tree(node.left, Some(id), red, n_blacks, low, key)?;
        let (rcount, rblacks) =
            self.validate_tree(node.right, Some(id), red, n_blacks, key, high)?;
        if lblacks != rblacks {
            err_at!(Fatal, msg: "unbalanced blacks {} {}", lblacks, rblacks)?;
        }

        Ok((lcount + rcount + 1, lblacks))
    }
}

/// Read API.
impl<K, C> RbTree<K, C> {
    /// Get the stored key that is equal to `key`.
    pub fn get(&self, key: &K) -> Result<&K>
    where
        C: Comparator<K>,
    {
        match self.find_position(key) {
            Some((id, Ordering::Equal)) => Ok(&self.arena[id].key),
            _ => err_at!(KeyNotFound, msg: "missing key"),
        }
    }

    /// Check whether an equal key is present in this instance.
    pub fn contains(&self, key: &K) -> bool
    where
        C: Comparator<K>,
    {
        matches!(self.find_position(key), Some((_, Ordering::Equal)))
    }

    /// Return the smallest key in this instance.
    pub fn min(&self) -> Result<&K> {
        match self.root {
            Some(root) => Ok(&self.arena[self.extreme(root, Side::Left)].key),
            None => err_at!(Empty, msg: "min on empty index"),
        }
    }

    /// Return the largest key in this instance.
    pub fn max(&self) -> Result<&K> {
        match self.root {
            Some(root) => Ok(&self.arena[self.extreme(root, Side::Right)].key),
            None => err_at!(Empty, msg: "max on empty index"),
        }
    }

    // Walk down from root. On exact match return that node, otherwise the
    // last node visited, which is the would-be parent for `key`. Ordering
    // is that of `key` against the returned node's key.
    fn find_position(&self, key: &K) -> Option<(NodeId, Ordering)>
    where
        C: Comparator<K>,
    {
        let mut id = self.root?;
        loop {
            let node = &self.arena[id];
            let cmp = self.cmp.compare(key, &node.key);
            let next = match cmp {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => None,
            };
            match next {
                Some(next) => id = next,
                None => break Some((id, cmp)),
            }
        }
    }

    fn extreme(&self, mut id: NodeId, side: Side) -> NodeId {
        while let Some(next) = self.arena[id].child(side) {
            id = next;
        }
        id
    }
}

/// Write API.
impl<K, C> RbTree<K, C> {
    /// Insert key into this instance. If an equal key is already present
    /// fail with [Error::KeyExists] and leave the index untouched.
    pub fn insert(&mut self, key: K) -> Result<()>
    where
        C: Comparator<K>,
    {
        let (parent, side) = match self.find_position(&key) {
            None => {
                let mut node = Node::new(key, None);
                node.set_black();
                self.root = Some(self.arena.alloc(node));
                self.n_count += 1;
                return Ok(());
            }
            Some((_, Ordering::Equal)) => return err_at!(KeyExists, msg: "duplicate key"),
            Some((parent, Ordering::Less)) => (parent, Side::Left),
            Some((parent, Ordering::Greater)) => (parent, Side::Right),
        };

        let id = self.arena.alloc(Node::new(key, Some(parent)));
        self.arena[parent].set_child(side, Some(id));
        self.n_count += 1;

        if self.arena[parent].is_red() {
            self.insert_fixup(id);
        }
        Ok(())
    }

    /// Delete key from this instance and return the key that was stored.
    /// If key is not present, then delete is effectively a no-op.
    pub fn delete(&mut self, key: &K) -> Option<K>
    where
        C: Comparator<K>,
    {
        let mut id = match self.find_position(key) {
            Some((id, Ordering::Equal)) => id,
            _ => return None,
        };

        // with two children, trade keys with the in-order predecessor and
        // remove that node instead, it has no right child.
        if let (Some(left), Some(_)) = (self.arena[id].left, self.arena[id].right) {
            let pred = self.extreme(left, Side::Right);
            self.arena.swap_keys(id, pred);
            id = pred;
        }

        let (parent, child) = {
            let node = &self.arena[id];
            (node.parent, node.left.or(node.right))
        };
        self.replace_child(parent, id, child);
        if let Some(child) = child {
            self.arena[child].parent = parent;
        }

        let node = self.arena.free(id);
        self.n_count -= 1;

        if node.is_black() {
            self.delete_fixup(child, parent);
        }
        Some(node.key)
    }
}

impl<K, C> Extend<K> for RbTree<K, C>
where
    C: Comparator<K>,
{
    /// Insert every key from `iter`, keys already present are skipped.
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = K>,
    {
        iter.into_iter().for_each(|key| {
            self.insert(key).ok();
        });
    }
}

// Local shape around a freshly recolored red node, seen from its parent.
#[derive(Debug)]
enum InsertCase {
    Done,
    RedUncle {
        parent: NodeId,
        uncle: NodeId,
        grand: NodeId,
    },
    // node is the inner grandchild, parent hangs from `side` of grand.
    Triangle {
        parent: NodeId,
        grand: NodeId,
        side: Side,
    },
    // node is the outer grandchild, parent hangs from `side` of grand.
    Line {
        parent: NodeId,
        grand: NodeId,
        side: Side,
    },
}

// Local shape around a position that is one black short, `side` is the
// side of that position under parent.
#[derive(Debug)]
enum DeleteCase {
    Root,
    Absorb(NodeId),
    NoSibling {
        parent: NodeId,
    },
    RedSibling {
        parent: NodeId,
        sibling: NodeId,
        side: Side,
    },
    BlackChildren {
        parent: NodeId,
        sibling: NodeId,
    },
    FarRed {
        parent: NodeId,
        sibling: NodeId,
        far: NodeId,
        side: Side,
    },
    NearRed {
        sibling: NodeId,
        near: NodeId,
        side: Side,
    },
}

impl<K, C> RbTree<K, C> {
    fn insert_fixup(&mut self, mut id: NodeId) {
        loop {
            let case = self.classify_insert(id);
            trace!("insert fixup {:?} {:?}", id, case);

            match case {
                InsertCase::Done => break,
                InsertCase::RedUncle {
                    parent,
                    uncle,
                    grand,
                } => {
                    self.arena[parent].set_black();
                    self.arena[uncle].set_black();
                    self.arena[grand].set_red();
                    id = grand;
                }
                InsertCase::Triangle {
                    parent,
                    grand,
                    side,
                } => {
                    // straighten, then node and parent trade places.
                    self.rotate(parent, side);
                    self.rotate_line(id, grand, side);
                    break;
                }
                InsertCase::Line {
                    parent,
                    grand,
                    side,
                } => {
                    self.rotate_line(parent, grand, side);
                    break;
                }
            }
        }

        if let Some(root) = self.root {
            self.arena[root].set_black();
        }
    }

    fn classify_insert(&self, id: NodeId) -> InsertCase {
        let parent = match self.arena[id].parent {
            Some(parent) if self.arena[parent].is_red() => parent,
            _ => return InsertCase::Done,
        };
        // red parent is never root, root is repainted on exit.
        let grand = match self.arena[parent].parent {
            Some(grand) => grand,
            None => return InsertCase::Done,
        };

        let side = self.arena[grand].side_of(Some(parent));
        match self.arena[grand].child(side.opposite()) {
            Some(uncle) if self.arena[uncle].is_red() => InsertCase::RedUncle {
                parent,
                uncle,
                grand,
            },
            _ if self.arena[parent].side_of(Some(id)) == side => InsertCase::Line {
                parent,
                grand,
                side,
            },
            _ => InsertCase::Triangle {
                parent,
                grand,
                side,
            },
        }
    }

    fn rotate_line(&mut self, parent: NodeId, grand: NodeId, side: Side) {
        self.arena[parent].set_black();
        self.arena[grand].set_red();
        self.rotate(grand, side.opposite());
    }

    // `current` is the position short of one black, `None` for an empty
    // slot, hence its parent is tracked alongside.
    fn delete_fixup(&mut self, mut current: Option<NodeId>, mut parent: Option<NodeId>) {
        loop {
            let case = self.classify_delete(current, parent);
            trace!("delete fixup {:?} {:?}", current, case);

            match case {
                DeleteCase::Root => break,
                DeleteCase::Absorb(id) => {
                    self.arena[id].set_black();
                    break;
                }
                DeleteCase::NoSibling { parent: p } => {
                    current = Some(p);
                    parent = self.arena[p].parent;
                }
                DeleteCase::RedSibling {
                    parent: p,
                    sibling,
                    side,
                } => {
                    self.arena[p].set_red();
                    self.arena[sibling].set_black();
                    self.rotate(p, side);
                }
                DeleteCase::BlackChildren { parent: p, sibling } => {
                    self.arena[sibling].set_red();
                    current = Some(p);
                    parent = self.arena[p].parent;
                }
                DeleteCase::FarRed {
                    parent: p,
                    sibling,
                    far,
                    side,
                } => {
                    self.rotate(p, side);
                    self.swap_colors(p, sibling);
                    self.arena[far].set_black();
                    break;
                }
                DeleteCase::NearRed {
                    sibling,
                    near,
                    side,
                } => {
                    self.rotate(sibling, side.opposite());
                    self.arena[near].set_black();
                    self.arena[sibling].set_red();
                }
            }
        }
    }

    fn classify_delete(&self, current: Option<NodeId>, parent: Option<NodeId>) -> DeleteCase {
        if let Some(id) = current {
            if self.arena[id].is_red() {
                return DeleteCase::Absorb(id);
            }
        }
        let parent = match parent {
            Some(parent) => parent,
            None => return DeleteCase::Root,
        };

        let side = self.arena[parent].side_of(current);
        let sibling = match self.arena[parent].child(side.opposite()) {
            Some(sibling) => sibling,
            None => return DeleteCase::NoSibling { parent },
        };
        if self.arena[sibling].is_red() {
            return DeleteCase::RedSibling {
                parent,
                sibling,
                side,
            };
        }

        let far = self.arena[sibling].child(side.opposite());
        let near = self.arena[sibling].child(side);
        match (far, near) {
            (Some(far), _) if self.arena[far].is_red() => DeleteCase::FarRed {
                parent,
                sibling,
                far,
                side,
            },
            (_, Some(near)) if self.arena[near].is_red() => DeleteCase::NearRed {
                sibling,
                near,
                side,
            },
            _ => DeleteCase::BlackChildren { parent, sibling },
        }
    }

    fn swap_colors(&mut self, a: NodeId, b: NodeId) {
        let color = self.arena[a].color;
        self.arena[a].color = self.arena[b].color;
        self.arena[b].color = color;
    }
}

//--------- rotation primitives ----------------

impl<K, C> RbTree<K, C> {
    // Rotating towards `Left` lifts the right child, and vice versa.
    fn rotate(&mut self, id: NodeId, dir: Side) {
        match dir {
            Side::Left => self.rotate_left(id),
            Side::Right => self.rotate_right(id),
        }
    }

    //              (p)                       (p)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //          left      x              node      xr
    //                   / \             /  \
    //                 xl   xr        left   xl
    //
    fn rotate_left(&mut self, id: NodeId) {
        let x = match self.arena[id].right {
            Some(x) => x,
            None => return,
        };
        let parent = self.arena[id].parent;

        let xl = self.arena[x].left;
        self.arena[id].right = xl;
        if let Some(xl) = xl {
            self.arena[xl].parent = Some(id);
        }

        self.replace_child(parent, id, Some(x));
        self.arena[x].parent = parent;
        self.arena[x].left = Some(id);
        self.arena[id].parent = Some(x);
    }

    //              (p)                       (p)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //           x       right             xl     node
    //          / \                               / \
    //        xl   xr                           xr   right
    //
    fn rotate_right(&mut self, id: NodeId) {
        let x = match self.arena[id].left {
            Some(x) => x,
            None => return,
        };
        let parent = self.arena[id].parent;

        let xr = self.arena[x].right;
        self.arena[id].left = xr;
        if let Some(xr) = xr {
            self.arena[xr].parent = Some(id);
        }

        self.replace_child(parent, id, Some(x));
        self.arena[x].parent = parent;
        self.arena[x].right = Some(id);
        self.arena[id].parent = Some(x);
    }

    // Point the slot that held `old` under `parent`, or the root, at `new`.
    // Parent link of `new` is left to the caller.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.arena[parent].side_of(Some(old));
                self.arena[parent].set_child(side, new);
            }
        }
    }
}

#[cfg(test)]
impl<K, C> RbTree<K, C> {
    #[allow(dead_code)]
    pub fn pretty_print(&self)
    where
        K: fmt::Debug,
    {
        if let Some(root) = self.root {
            self.pretty_print_node(root, "".to_string())
        }
    }

    fn pretty_print_node(&self, id: NodeId, mut prefix: String)
    where
        K: fmt::Debug,
    {
        let node = &self.arena[id];
        match node.is_black() {
            true => println!("{}(b)<{:?}>", prefix, node.key),
            false => println!("{}(r)<{:?}>", prefix, node.key),
        }
        prefix.push_str("  ");
        if let Some(l) = node.left {
            self.pretty_print_node(l, prefix.clone())
        }
        if let Some(r) = node.right {
            self.pretty_print_node(r, prefix)
        }
    }

    /// Collect keys in order, left to right.
    pub fn to_keys(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.n_count);
        let mut stack = vec![];
        let mut next = self.root;
        loop {
            while let Some(id) = next {
                stack.push(id);
                next = self.arena[id].left;
            }
            match stack.pop() {
                Some(id) => {
                    keys.push(&self.arena[id].key);
                    next = self.arena[id].right;
                }
                None => break keys,
            }
        }
    }

    pub fn height(&self) -> usize {
        let mut stack = vec![];
        if let Some(root) = self.root {
            stack.push((root, 1));
        }
        let mut height = 0;
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.arena[id];
            for child in [node.left, node.right].iter().flatten() {
                stack.push((*child, depth + 1));
            }
        }
        height
    }

    pub fn root_color(&self) -> Option<crate::Color> {
        self.root.map(|root| self.arena[root].color)
    }
}

#[cfg(test)]
#[path = "rbtree_test.rs"]
mod rbtree_test;
