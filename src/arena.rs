//! Slot arena holding every node of a tree.
//!
//! Nodes link to each other through [NodeId] handles, so the arena is the
//! single owner of all nodes. Freed slots are recycled by later allocations.

use std::{
    mem,
    ops::{Index, IndexMut},
};

use crate::node::{Node, NodeId};

pub struct Arena<K> {
    slots: Vec<Option<Node<K>>>,
    free: Vec<NodeId>,
}

impl<K> Arena<K> {
    pub fn new() -> Arena<K> {
        Arena {
            slots: Vec::default(),
            free: Vec::default(),
        }
    }

    /// Number of live nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Move `node` into the arena and return its handle.
    pub fn alloc(&mut self, node: Node<K>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Destroy the node behind `id`, handing it back to the caller. The
    /// handle must not be used afterwards.
    pub fn free(&mut self, id: NodeId) -> Node<K> {
        match self.slots[id.0].take() {
            Some(node) => {
                self.free.push(id);
                node
            }
            None => panic!("arena: double free of {:?}, call the programmer", id),
        }
    }

    /// Exchange the keys held by two distinct live nodes, leaving colors
    /// and links untouched.
    pub fn swap_keys(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        let (lo, hi) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        let (head, tail) = self.slots.split_at_mut(hi);
        match (head[lo].as_mut(), tail[0].as_mut()) {
            (Some(x), Some(y)) => mem::swap(&mut x.key, &mut y.key),
            _ => panic!("arena: swap on dead node {:?} {:?}", a, b),
        }
    }
}

impl<K> Index<NodeId> for Arena<K> {
    type Output = Node<K>;

    fn index(&self, id: NodeId) -> &Node<K> {
        match self.slots.get(id.0) {
            Some(Some(node)) => node,
            _ => panic!("arena: stale handle {:?}, call the programmer", id),
        }
    }
}

impl<K> IndexMut<NodeId> for Arena<K> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K> {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => panic!("arena: stale handle {:?}, call the programmer", id),
        }
    }
}

#[cfg(test)]
#[path = "arena_test.rs"]
mod arena_test;
