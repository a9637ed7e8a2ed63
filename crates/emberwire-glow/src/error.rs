use emberwire_ber::{BerError, Tag};

use crate::dom::NodeId;

/// Errors raised while building, encoding or decoding an object tree.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    /// The underlying TLV codec failed.
    #[error("BER error: {0}")]
    Ber(#[from] BerError),

    /// The handle refers to a node that has since been removed.
    #[error("stale node handle {0}")]
    StaleNode(NodeId),

    /// Children were attached to a leaf.
    #[error("node {0} is a leaf and cannot hold children")]
    NotAContainer(NodeId),

    /// The node already has a parent; detach it first.
    #[error("node {0} is already attached")]
    AlreadyAttached(NodeId),

    /// The insertion would make a node its own ancestor.
    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    /// A slot holds a leaf where a container was expected.
    #[error("slot {0} holds a leaf, expected a container")]
    SlotMismatch(Tag),

    /// Structurally invalid element encoding.
    #[error("malformed element: {0}")]
    Malformed(&'static str),

    /// Element nesting exceeded the decoder's depth limit.
    #[error("element nesting exceeds {0} levels")]
    TooDeep(usize),
}

pub type Result<T> = std::result::Result<T, DomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ber_errors_convert() {
        let err: DomError = BerError::IndefiniteLength.into();
        assert!(matches!(err, DomError::Ber(BerError::IndefiniteLength)));
    }

    #[test]
    fn test_display_names_the_slot() {
        let err = DomError::SlotMismatch(Tag::context(2));
        assert!(err.to_string().contains("[CONTEXT 2]"));
    }
}
