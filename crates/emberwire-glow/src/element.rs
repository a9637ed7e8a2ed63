//! Typed views over DOM containers.
//!
//! A Glow element is a container whose type tag identifies its kind. The
//! handles in this crate are thin `Copy` wrappers around a [`NodeId`]; every
//! accessor takes the owning [`Dom`] explicitly. Getters never fail and fall
//! back to a default when a field is absent. Mutating accessors create
//! missing intermediate containers on first use and return an error only
//! when the handle is stale or the tree has an unexpected shape.
//!
//! Shared capabilities are expressed as traits with provided methods, so a
//! Node and a QualifiedNode expose the same `identifier()` without a common
//! base type.

use emberwire_ber::{RelativeOid, Tag, Value};

use crate::dom::{Dom, NodeId};
use crate::error::Result;
use crate::glow_type::GlowType;
use crate::tags;
use crate::value::GlowValue;

/// A typed handle to a Glow container.
pub trait GlowElement: Copy {
    /// Discriminant matched against the container's type tag.
    const TYPE: GlowType;

    fn id(self) -> NodeId;

    /// Wrap `id` without checking its type.
    fn from_id_unchecked(id: NodeId) -> Self;

    /// View `id` as this element kind if its type tag matches.
    fn cast(dom: &Dom, id: NodeId) -> Option<Self> {
        (GlowType::of(dom, id) == Some(Self::TYPE)).then(|| Self::from_id_unchecked(id))
    }

    /// Allocate a detached, empty element with the given outer tag.
    fn create(dom: &mut Dom, tag: Tag) -> Self {
        Self::from_id_unchecked(dom.new_container(tag, Self::TYPE.tag()))
    }

    /// Allocate an element tagged as a collection item.
    fn create_default(dom: &mut Dom) -> Self {
        Self::create(dom, tags::ELEMENT_DEFAULT)
    }

    fn tag(self, dom: &Dom) -> Option<Tag> {
        dom.tag(self.id())
    }

    fn is_valid(self, dom: &Dom) -> bool {
        Self::cast(dom, self.id()).is_some()
    }
}

/// Elements whose descriptive fields live in a contents SET at `[1]`.
pub trait HasContents: GlowElement {
    fn contents(self, dom: &Dom) -> Option<NodeId> {
        dom.find_child(self.id(), tags::element::CONTENTS)
            .filter(|id| dom.is_container(*id))
    }

    fn contents_mut(self, dom: &mut Dom) -> Result<NodeId> {
        dom.get_or_insert_container(self.id(), tags::element::CONTENTS, GlowType::Set.tag())
    }

    /// Raw value stored under `slot` inside the contents set.
    fn content_value(self, dom: &Dom, slot: Tag) -> Option<&Value> {
        dom.leaf_value(self.contents(dom)?, slot)
    }

    fn set_content_value(self, dom: &mut Dom, slot: Tag, value: impl Into<Value>) -> Result<()> {
        let contents = self.contents_mut(dom)?;
        dom.set_leaf(contents, slot, value)?;
        Ok(())
    }
}

pub trait HasIdentifier: HasContents {
    /// Identifier, or an empty string when unset.
    fn identifier(self, dom: &Dom) -> String {
        text(self.content_value(dom, tags::contents::IDENTIFIER))
    }

    fn set_identifier(self, dom: &mut Dom, identifier: &str) -> Result<()> {
        self.set_content_value(dom, tags::contents::IDENTIFIER, identifier)
    }
}

pub trait HasDescription: HasContents {
    /// Description, or an empty string when unset.
    fn description(self, dom: &Dom) -> String {
        text(self.content_value(dom, tags::contents::DESCRIPTION))
    }

    fn set_description(self, dom: &mut Dom, description: &str) -> Result<()> {
        self.set_content_value(dom, tags::contents::DESCRIPTION, description)
    }
}

/// Elements addressed by a number relative to their parent.
pub trait HasNumber: GlowElement {
    fn number(self, dom: &Dom) -> Option<i32> {
        dom.leaf_value(self.id(), tags::element::NUMBER)
            .and_then(Value::as_integer)
            .and_then(|number| i32::try_from(number).ok())
    }

    fn set_number(self, dom: &mut Dom, number: i32) -> Result<()> {
        dom.set_leaf(self.id(), tags::element::NUMBER, i64::from(number))?;
        Ok(())
    }
}

/// Elements addressed by an absolute path.
pub trait HasPath: GlowElement {
    /// Path, or an empty one when unset.
    fn path(self, dom: &Dom) -> RelativeOid {
        dom.leaf_value(self.id(), tags::qualified::PATH)
            .and_then(Value::as_relative_oid)
            .cloned()
            .unwrap_or_default()
    }

    fn set_path(self, dom: &mut Dom, path: RelativeOid) -> Result<()> {
        dom.set_leaf(self.id(), tags::qualified::PATH, path)?;
        Ok(())
    }
}

/// Elements owning an ElementCollection of children at `[2]`.
pub trait HasChildren: GlowElement {
    fn children(self, dom: &Dom) -> Option<NodeId> {
        dom.find_child(self.id(), tags::element::CHILDREN)
            .filter(|id| dom.is_container(*id))
    }

    fn children_mut(self, dom: &mut Dom) -> Result<NodeId> {
        dom.get_or_insert_container(
            self.id(),
            tags::element::CHILDREN,
            GlowType::ElementCollection.tag(),
        )
    }

    /// Children of kind `U`, in order.
    fn typed_children<U: GlowElement>(self, dom: &Dom) -> Vec<U> {
        match self.children(dom) {
            Some(children) => collect_typed(dom, children),
            None => Vec::new(),
        }
    }

    /// Append a new child element of kind `U`.
    fn add_child<U: GlowElement>(self, dom: &mut Dom) -> Result<U> {
        let children = self.children_mut(dom)?;
        let child = U::create_default(dom);
        dom.append_child(children, child.id())?;
        Ok(child)
    }
}

/// Elements carrying an argument list.
pub trait HasArguments: GlowElement {
    fn arguments(self, dom: &Dom) -> Option<NodeId>;

    fn arguments_mut(self, dom: &mut Dom) -> Result<NodeId>;
}

/// Every child of `container` whose type is `U`, in order.
pub fn collect_typed<U: GlowElement>(dom: &Dom, container: NodeId) -> Vec<U> {
    dom.children(container)
        .iter()
        .filter_map(|child| U::cast(dom, *child))
        .collect()
}

/// Call `visit` for every child of `container` whose type is `U`; returns
/// how many matched.
pub fn visit_typed<U, F>(dom: &Dom, container: NodeId, mut visit: F) -> usize
where
    U: GlowElement,
    F: FnMut(U),
{
    let mut count = 0;
    for child in dom.children(container) {
        if let Some(element) = U::cast(dom, *child) {
            visit(element);
            count += 1;
        }
    }
    count
}

/// Leaf values of a sequence, skipping containers and foreign kinds.
pub(crate) fn read_values(dom: &Dom, sequence: Option<NodeId>) -> Vec<GlowValue> {
    let Some(sequence) = sequence else {
        return Vec::new();
    };
    dom.children(sequence)
        .iter()
        .filter_map(|child| dom.value(*child))
        .filter_map(GlowValue::from_ber)
        .collect()
}

/// Replace the children of `sequence` with one `[0]` leaf per value.
pub(crate) fn write_values<I>(dom: &mut Dom, sequence: NodeId, values: I) -> Result<()>
where
    I: IntoIterator<Item = GlowValue>,
{
    dom.clear_children(sequence);
    for value in values {
        let leaf = dom.new_leaf(tags::ELEMENT_DEFAULT, value);
        dom.append_child(sequence, leaf)?;
    }
    Ok(())
}

pub(crate) fn text(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default()
}

pub(crate) fn flag(value: Option<&Value>, default: bool) -> bool {
    value.and_then(Value::as_bool).unwrap_or(default)
}

macro_rules! glow_element {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name($crate::dom::NodeId);

        impl $crate::element::GlowElement for $name {
            const TYPE: $crate::glow_type::GlowType = $crate::glow_type::GlowType::$kind;

            fn id(self) -> $crate::dom::NodeId {
                self.0
            }

            fn from_id_unchecked(id: $crate::dom::NodeId) -> Self {
                Self(id)
            }
        }
    };
}

pub(crate) use glow_element;
