//! Node storage for the skip list.
//!
//! Nodes live in an arena and refer to each other by index. Slot 0 is the head
//! sentinel, which carries no value. Removed slots go on a free list and are
//! reused by later inserts.
//!
//! # Width Semantics
//!
//! Give the head position 0 and the element of rank `r` position `r + 1`; the
//! logical end sits at position `len + 1`. A link from position `p` to
//! position `q` has width `q - p`, so:
//!
//! - every level-0 width is 1
//! - the head's width is the rank of its target plus one
//! - the widths along any level, head included, sum to `len + 1`
//!
//! ```text
//! Level 2: HEAD --3----------------> B --3----------------> END
//! Level 1: HEAD --1-> A --2--------> B --2--------> D --1-> END
//! Level 0: HEAD --1-> A --1-> C --1-> B --1-> E --1-> D --1-> END
//! ```

use crate::error::Error;
use crate::error::Result;

/// Arena slot index; narrower than `usize` to keep links small.
pub(crate) type Idx = u32;

/// No forward node: the link runs to the logical end.
pub(crate) const NIL: Idx = Idx::MAX;

/// Arena slot of the head sentinel.
pub(crate) const HEAD: Idx = 0;

/// One level of a node: where it points and how far it jumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Link {
    pub next: Idx,
    pub width: usize,
}

impl Link {
    pub const fn new(next: Idx, width: usize) -> Link {
        Link { next, width }
    }
}

pub(crate) struct Node<T> {
    /// `None` for the head and for free slots.
    pub value: Option<T>,
    /// One link per level the node participates in.
    pub links: Vec<Link>,
}

impl<T> Node<T> {
    pub fn height(&self) -> usize {
        self.links.len()
    }

    pub fn next(&self, level: usize) -> Idx {
        self.links[level].next
    }

    pub fn width(&self, level: usize) -> usize {
        self.links[level].width
    }
}

pub(crate) struct Arena<T> {
    nodes: Vec<Node<T>>,
    free: Vec<Idx>,
}

impl<T> Arena<T> {
    /// An arena holding only a one-level head that links straight to the end.
    pub fn new() -> Arena<T> {
        let head = Node {
            value: None,
            links: vec![Link::new(NIL, 1)],
        };
        return Arena {
            nodes: vec![head],
            free: Vec::new(),
        };
    }

    pub fn node(&self, idx: Idx) -> &Node<T> {
        &self.nodes[idx as usize]
    }

    pub fn node_mut(&mut self, idx: Idx) -> &mut Node<T> {
        &mut self.nodes[idx as usize]
    }

    /// The node at `idx`, or `None` if the index is outside the arena.
    pub fn get(&self, idx: Idx) -> Option<&Node<T>> {
        self.nodes.get(idx as usize)
    }

    pub fn head(&self) -> &Node<T> {
        self.node(HEAD)
    }

    pub fn head_mut(&mut self) -> &mut Node<T> {
        self.node_mut(HEAD)
    }

    /// The value stored at `idx`; `None` for the head, free slots and `NIL`.
    pub fn value(&self, idx: Idx) -> Option<&T> {
        self.get(idx).and_then(|node| node.value.as_ref())
    }

    /// True if `idx` names a node currently holding a value.
    pub fn is_live(&self, idx: Idx) -> bool {
        self.value(idx).is_some()
    }

    /// Total slots, including the head and free slots.
    pub fn slots(&self) -> usize {
        self.nodes.len()
    }

    /// Allocate a node of `height` levels with every link unset.
    pub fn alloc(&mut self, value: T, height: usize) -> Result<Idx> {
        let links = vec![Link::new(NIL, 0); height];
        if let Some(idx) = self.free.pop() {
            let node = self.node_mut(idx);
            node.value = Some(value);
            node.links = links;
            return Ok(idx);
        }
        let idx = match Idx::try_from(self.nodes.len()) {
            Ok(idx) if idx != NIL => idx,
            _ => return Err(Error::CapacityExceeded(self.nodes.len())),
        };
        self.nodes.push(Node {
            value: Some(value),
            links,
        });
        return Ok(idx);
    }

    /// Take the value out of `idx` and put the slot on the free list.
    pub fn release(&mut self, idx: Idx) -> Option<T> {
        let node = self.node_mut(idx);
        let value = node.value.take();
        node.links.clear();
        if value.is_some() {
            self.free.push(idx);
        }
        value
    }

    /// Drop every node except the head, and reset the head to one level.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.free.clear();
        self.head_mut().links = vec![Link::new(NIL, 1)];
    }

    /// Estimate of heap and inline bytes held by the arena.
    pub fn size_of(&self) -> usize {
        let mut bytes = std::mem::size_of::<Self>()
            + self.nodes.capacity() * std::mem::size_of::<Node<T>>()
            + self.free.capacity() * std::mem::size_of::<Idx>();
        for node in &self.nodes {
            bytes += node.links.capacity() * std::mem::size_of::<Link>();
        }
        bytes
    }
}
