//! Arena-backed object tree.
//!
//! Every node lives in a [`Dom`] and is addressed by a generational
//! [`NodeId`]. A node is either a leaf carrying one universal [`Value`] or a
//! container carrying an application/universal type tag and an ordered list
//! of children. Each node records its parent so a subtree can be detached,
//! moved or removed without dangling references; removing a node bumps the
//! generation of its slot, turning every outstanding handle into a stale one.

use std::fmt;

use emberwire_ber::{Tag, Value};

use crate::error::{DomError, Result};

/// Handle to a node inside a [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Slot index inside the arena.
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Leaf(Value),
    Container { type_tag: Tag, children: Vec<NodeId> },
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: Tag,
    parent: Option<NodeId>,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<NodeData>,
}

/// Owner of a forest of tagged nodes.
#[derive(Debug, Clone, Default)]
pub struct Dom {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live nodes across all trees.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Returns true while `id` refers to a live node.
    pub fn is_valid(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Allocate a detached leaf.
    pub fn new_leaf(&mut self, tag: Tag, value: impl Into<Value>) -> NodeId {
        self.alloc(NodeData {
            tag: tag.to_constructed(),
            parent: None,
            kind: NodeKind::Leaf(value.into()),
        })
    }

    /// Allocate a detached, empty container.
    pub fn new_container(&mut self, tag: Tag, type_tag: Tag) -> NodeId {
        self.alloc(NodeData {
            tag: tag.to_constructed(),
            parent: None,
            kind: NodeKind::Container {
                type_tag: type_tag.to_constructed(),
                children: Vec::new(),
            },
        })
    }

    /// Outer tag of the node.
    pub fn tag(&self, id: NodeId) -> Option<Tag> {
        self.get(id).map(|node| node.tag)
    }

    /// Type tag of a container; `None` for leaves and stale handles.
    pub fn type_tag(&self, id: NodeId) -> Option<Tag> {
        match &self.get(id)?.kind {
            NodeKind::Container { type_tag, .. } => Some(*type_tag),
            NodeKind::Leaf(_) => None,
        }
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|node| &node.kind)
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Leaf(_)))
    }

    pub fn is_container(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Container { .. }))
    }

    /// Value of a leaf.
    pub fn value(&self, id: NodeId) -> Option<&Value> {
        match self.kind(id)? {
            NodeKind::Leaf(value) => Some(value),
            NodeKind::Container { .. } => None,
        }
    }

    /// Replace the value of a leaf.
    pub fn set_value(&mut self, id: NodeId, value: impl Into<Value>) -> Result<()> {
        let node = self.get_mut(id).ok_or(DomError::StaleNode(id))?;
        match &mut node.kind {
            NodeKind::Leaf(current) => {
                *current = value.into();
                Ok(())
            }
            NodeKind::Container { .. } => Err(DomError::Malformed("value assigned to a container")),
        }
    }

    /// Parent of the node, if attached and still live.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent.filter(|parent| self.is_valid(*parent))
    }

    /// Children in insertion order; empty for leaves and stale handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.kind(id) {
            Some(NodeKind::Container { children, .. }) => children.as_slice(),
            _ => &[],
        }
    }

    /// First child carrying `slot` as its outer tag.
    pub fn find_child(&self, id: NodeId, slot: Tag) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| self.tag(*child) == Some(slot))
    }

    /// Returns true if any child carries `slot`.
    pub fn contains(&self, id: NodeId, slot: Tag) -> bool {
        self.find_child(id, slot).is_some()
    }

    /// Value of the leaf child at `slot`.
    pub fn leaf_value(&self, id: NodeId, slot: Tag) -> Option<&Value> {
        self.value(self.find_child(id, slot)?)
    }

    /// Append a detached node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.is_valid(child) {
            return Err(DomError::StaleNode(child));
        }
        if !self.is_container(parent) {
            return Err(if self.is_valid(parent) {
                DomError::NotAContainer(parent)
            } else {
                DomError::StaleNode(parent)
            });
        }
        if self.parent(child).is_some() {
            return Err(DomError::AlreadyAttached(child));
        }
        if child == parent || self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(DomError::Cycle { parent, child });
        }

        self.attach(parent, child);
        Ok(())
    }

    /// Unlink a node from its parent, keeping its subtree alive.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if let Some(NodeKind::Container { children, .. }) =
            self.get_mut(parent).map(|node| &mut node.kind)
        {
            children.retain(|child| *child != id);
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
        }
        true
    }

    /// Remove a node and its whole subtree; all handles into it go stale.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if !self.is_valid(id) {
            return false;
        }
        self.detach(id);

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.release(next) {
                if let NodeKind::Container { children, .. } = node.kind {
                    pending.extend(children);
                }
            }
        }
        true
    }

    /// Remove every child of a container.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.remove(child);
        }
    }

    /// Remove the first child at `slot`.
    pub fn remove_child(&mut self, id: NodeId, slot: Tag) -> bool {
        match self.find_child(id, slot) {
            Some(child) => self.remove(child),
            None => false,
        }
    }

    /// Existing container child at `slot`, or a new empty one appended to `id`.
    pub fn get_or_insert_container(&mut self, id: NodeId, slot: Tag, type_tag: Tag) -> Result<NodeId> {
        if let Some(existing) = self.find_child(id, slot) {
            return if self.is_container(existing) {
                Ok(existing)
            } else {
                Err(DomError::SlotMismatch(slot))
            };
        }
        if !self.is_container(id) {
            return Err(if self.is_valid(id) {
                DomError::NotAContainer(id)
            } else {
                DomError::StaleNode(id)
            });
        }

        let child = self.new_container(slot, type_tag);
        self.attach(id, child);
        Ok(child)
    }

    /// Store `value` in the leaf at `slot`, creating or replacing as needed.
    pub fn set_leaf(&mut self, id: NodeId, slot: Tag, value: impl Into<Value>) -> Result<NodeId> {
        let value = value.into();
        if let Some(existing) = self.find_child(id, slot) {
            if self.is_leaf(existing) {
                self.set_value(existing, value)?;
                return Ok(existing);
            }
            self.remove(existing);
        }
        if !self.is_container(id) {
            return Err(if self.is_valid(id) {
                DomError::NotAContainer(id)
            } else {
                DomError::StaleNode(id)
            });
        }

        let leaf = self.new_leaf(slot, value);
        self.attach(id, leaf);
        Ok(leaf)
    }

    /// Walks from the parent of `id` up to its root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Pre-order walk over the subtree rooted at `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if !self.is_valid(id) {
            return order;
        }
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            order.push(next);
            pending.extend(self.children(next).iter().rev().copied());
        }
        order
    }

    /// Link without validation; caller guarantees `parent` is a container
    /// and `child` is detached.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(NodeKind::Container { children, .. }) =
            self.get_mut(parent).map(|node| &mut node.kind)
        {
            children.push(child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(data);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(data),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    fn release(&mut self, id: NodeId) -> Option<NodeData> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(node)
    }

    fn get(&self, id: NodeId) -> Option<&NodeData> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }
}
