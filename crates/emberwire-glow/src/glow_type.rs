use std::fmt;

use emberwire_ber::{types, Class, Tag};

use crate::dom::{Dom, NodeId};

/// Discriminant of a container, derived from its type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlowType {
    Parameter,
    Command,
    Node,
    ElementCollection,
    StreamEntry,
    StreamCollection,
    StringIntegerPair,
    StringIntegerCollection,
    QualifiedParameter,
    QualifiedNode,
    RootElementCollection,
    StreamDescription,
    Matrix,
    Target,
    Source,
    Connection,
    QualifiedMatrix,
    Label,
    Function,
    QualifiedFunction,
    TupleItemDescription,
    Invocation,
    InvocationResult,
    Template,
    QualifiedTemplate,
    /// Universal SEQUENCE used for argument and result lists.
    Sequence,
    /// Universal SET used for element contents.
    Set,
}

const APPLICATION_TYPES: [GlowType; 25] = [
    GlowType::Parameter,
    GlowType::Command,
    GlowType::Node,
    GlowType::ElementCollection,
    GlowType::StreamEntry,
    GlowType::StreamCollection,
    GlowType::StringIntegerPair,
    GlowType::StringIntegerCollection,
    GlowType::QualifiedParameter,
    GlowType::QualifiedNode,
    GlowType::RootElementCollection,
    GlowType::StreamDescription,
    GlowType::Matrix,
    GlowType::Target,
    GlowType::Source,
    GlowType::Connection,
    GlowType::QualifiedMatrix,
    GlowType::Label,
    GlowType::Function,
    GlowType::QualifiedFunction,
    GlowType::TupleItemDescription,
    GlowType::Invocation,
    GlowType::InvocationResult,
    GlowType::Template,
    GlowType::QualifiedTemplate,
];

impl GlowType {
    /// APPLICATION number of the type tag; `None` for the universal kinds.
    pub fn application_number(self) -> Option<u32> {
        match self {
            GlowType::Sequence | GlowType::Set => None,
            other => APPLICATION_TYPES
                .iter()
                .position(|kind| *kind == other)
                .map(|index| index as u32 + 1),
        }
    }

    /// Type tag written for containers of this kind.
    pub fn tag(self) -> Tag {
        match self {
            GlowType::Set => Tag::universal(types::SET).to_constructed(),
            GlowType::Sequence => Tag::universal(types::SEQUENCE).to_constructed(),
            other => match other.application_number() {
                Some(number) => Tag::application(number).to_constructed(),
                None => Tag::universal(types::SEQUENCE).to_constructed(),
            },
        }
    }

    /// Map a type tag back to its discriminant.
    pub fn from_tag(tag: Tag) -> Option<Self> {
        match tag.class() {
            Class::Application => {
                let index = tag.number().checked_sub(1)? as usize;
                APPLICATION_TYPES.get(index).copied()
            }
            Class::Universal => match tag.number() {
                types::SEQUENCE => Some(GlowType::Sequence),
                types::SET => Some(GlowType::Set),
                _ => None,
            },
            _ => None,
        }
    }

    /// Discriminant of a container node; `None` for leaves, stale handles
    /// and unknown type tags.
    pub fn of(dom: &Dom, id: NodeId) -> Option<Self> {
        dom.type_tag(id).and_then(Self::from_tag)
    }
}

impl fmt::Display for GlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_types_map_both_ways() {
        for kind in APPLICATION_TYPES {
            let number = kind.application_number().unwrap();
            assert_eq!(kind.tag(), Tag::application(number));
            assert!(kind.tag().is_constructed());
            assert_eq!(GlowType::from_tag(Tag::application(number)), Some(kind));
        }
    }

    #[test]
    fn test_known_numbers() {
        assert_eq!(GlowType::Parameter.application_number(), Some(1));
        assert_eq!(GlowType::Function.application_number(), Some(19));
        assert_eq!(GlowType::InvocationResult.application_number(), Some(23));
        assert_eq!(GlowType::Sequence.application_number(), None);
        assert_eq!(GlowType::from_tag(Tag::application(0)), None);
    }

    #[test]
    fn test_universal_containers() {
        assert_eq!(
            GlowType::from_tag(Tag::universal(types::SEQUENCE)),
            Some(GlowType::Sequence)
        );
        assert_eq!(GlowType::from_tag(Tag::universal(types::SET)), Some(GlowType::Set));
        assert_eq!(GlowType::from_tag(Tag::universal(types::INTEGER)), None);
        assert_eq!(GlowType::from_tag(Tag::application(99)), None);
        assert_eq!(GlowType::from_tag(Tag::context(1)), None);
    }

    #[test]
    fn test_of_reads_the_container_type() {
        let mut dom = Dom::new();
        let function = dom.new_container(Tag::context(0), GlowType::Function.tag());
        let leaf = dom.new_leaf(Tag::context(0), 1i64);
        assert_eq!(GlowType::of(&dom, function), Some(GlowType::Function));
        assert_eq!(GlowType::of(&dom, leaf), None);
    }
}
