use std::fmt;

/// Color tag carried by every node in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Handle to a node slot inside the arena. Handles are only meaningful
/// for the tree that issued them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which child of its parent a node hangs from, and the direction of a
/// rotation. Rotating `Left` at a node lifts its right child.
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

// Node corresponds to a single key in RbTree instance. `parent` does not
// own anything, ownership of every node rests with the arena.
pub struct Node<K> {
    pub key: K,
    pub color: Color,
    pub left: Option<NodeId>,   // store: left child
    pub right: Option<NodeId>,  // store: right child
    pub parent: Option<NodeId>, // back-link, kept in sync on every relink
}

impl<K> Node<K> {
    /// New nodes are always red leaves.
    pub fn new(key: K, parent: Option<NodeId>) -> Node<K> {
        Node {
            key,
            color: Color::Red,
            left: None,
            right: None,
            parent,
        }
    }

    #[inline]
    pub fn set_red(&mut self) {
        self.color = Color::Red
    }

    #[inline]
    pub fn set_black(&mut self) {
        self.color = Color::Black
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        self.color == Color::Black
    }

    #[inline]
    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline]
    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub fn set_child(&mut self, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Return the side on which `child` hangs from this node. Absent
    /// children compare by slot, so an empty position resolves to the side
    /// whose slot is empty.
    #[inline]
    pub fn side_of(&self, child: Option<NodeId>) -> Side {
        if self.left == child {
            Side::Left
        } else {
            Side::Right
        }
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
