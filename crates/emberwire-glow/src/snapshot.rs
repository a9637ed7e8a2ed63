//! Owned, arena-free copies of subtrees.
//!
//! Snapshots are useful for logging and comparisons; with the `serde`
//! feature they serialize to JSON or any other serde format.

use emberwire_ber::{Tag, Value};

use crate::dom::{Dom, NodeId, NodeKind};
use crate::glow_type::GlowType;

/// A detached copy of one node and its descendants.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeSnapshot {
    pub tag: Tag,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub type_tag: Option<Tag>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub glow_type: Option<GlowType>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub value: Option<Value>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// Rebuild the snapshot as a detached tree in `dom`.
    pub fn restore(&self, dom: &mut Dom) -> NodeId {
        match (&self.type_tag, &self.value) {
            (Some(type_tag), _) => {
                let id = dom.new_container(self.tag, *type_tag);
                for child in &self.children {
                    let child = child.restore(dom);
                    dom.attach(id, child);
                }
                id
            }
            (None, value) => dom.new_leaf(self.tag, value.clone().unwrap_or(Value::Null)),
        }
    }
}

impl Dom {
    /// Copy the subtree at `id`; `None` for stale handles.
    pub fn snapshot(&self, id: NodeId) -> Option<NodeSnapshot> {
        let tag = self.tag(id)?;
        Some(match self.kind(id)? {
            NodeKind::Leaf(value) => NodeSnapshot {
                tag,
                type_tag: None,
                glow_type: None,
                value: Some(value.clone()),
                children: Vec::new(),
            },
            NodeKind::Container { type_tag, children } => NodeSnapshot {
                tag,
                type_tag: Some(*type_tag),
                glow_type: GlowType::from_tag(*type_tag),
                value: None,
                children: children
                    .iter()
                    .filter_map(|child| self.snapshot(*child))
                    .collect(),
            },
        })
    }
}
