//! BER encoding and decoding of whole trees.
//!
//! A container is written as its outer tag wrapping its type tag, which in
//! turn wraps the encoded children:
//!
//! ```text
//! [outer]* len  [type]* len  child child ...
//! ```
//!
//! Leaves use the leaf framing of the TLV layer. Encoding always emits
//! definite lengths; decoding accepts definite and indefinite lengths at
//! every constructed level.

use bytes::Bytes;
use emberwire_ber::{
    at_end_of_contents, decode_header, encode_header, encode_tlv, header_length,
    read_end_of_contents, take, tlv_length, BerError, ByteSink, DynamicBuffer, Length, Tag, Value,
};
use tracing::{debug, trace};

use crate::dom::{Dom, NodeId, NodeKind};
use crate::error::{DomError, Result};

/// Nesting limit applied while encoding and decoding.
pub const MAX_DEPTH: usize = 128;

impl Dom {
    /// Total encoded size of the subtree at `id`.
    ///
    /// Zero for stale handles and for trees nested deeper than [`MAX_DEPTH`].
    pub fn encoded_length(&self, id: NodeId) -> usize {
        self.measure(id, 0, &mut Vec::new()).unwrap_or(0)
    }

    /// Write the subtree at `id`.
    ///
    /// Fails with [`DomError::TooDeep`] before writing anything if the tree
    /// could not be decoded again.
    pub fn encode<S: ByteSink + ?Sized>(&self, id: NodeId, out: &mut S) -> Result<()> {
        let mut lengths = Vec::new();
        self.measure(id, 0, &mut lengths)?;
        let mut next = 0;
        self.encode_measured(id, &lengths, &mut next, out)
    }

    /// Encode the subtree at `id` into a fresh buffer.
    pub fn to_bytes(&self, id: NodeId) -> Result<Bytes> {
        let mut lengths = Vec::new();
        let total = self.measure(id, 0, &mut lengths)?;
        let mut buffer = DynamicBuffer::with_capacity(total);
        self.encode_measured(id, &lengths, &mut 0, &mut buffer)?;
        Ok(buffer.into_bytes())
    }

    /// Decode one complete element into a new tree.
    ///
    /// The input must hold exactly one element; trailing bytes are an error.
    pub fn decode(input: &[u8]) -> Result<(Dom, NodeId)> {
        let mut dom = Dom::new();
        let mut cursor = input;
        let root = dom.decode_element(&mut cursor, 0)?;
        if !cursor.is_empty() {
            debug!(trailing = cursor.len(), "trailing bytes after root element");
            return Err(DomError::Malformed("trailing bytes after root element"));
        }
        trace!(nodes = dom.len(), bytes = input.len(), "decoded tree");
        Ok((dom, root))
    }

    /// Decode one element from the front of `input` as a new detached tree
    /// in this arena, advancing `input` past it.
    ///
    /// On failure neither the arena nor `input` is modified.
    pub fn decode_from(&mut self, input: &mut &[u8]) -> Result<NodeId> {
        let mut staging = Dom::new();
        let mut cursor = *input;
        let root = staging.decode_element(&mut cursor, 0)?;
        let id = self.graft(&staging, root).ok_or(DomError::StaleNode(root))?;
        *input = cursor;
        Ok(id)
    }

    /// Deep copy the subtree at `source_id` of `source` into this arena as a
    /// detached tree; `None` if `source_id` is stale.
    pub fn graft(&mut self, source: &Dom, source_id: NodeId) -> Option<NodeId> {
        let tag = source.tag(source_id)?;
        let id = match source.kind(source_id)? {
            NodeKind::Leaf(value) => self.new_leaf(tag, value.clone()),
            NodeKind::Container { type_tag, children } => {
                let id = self.new_container(tag, *type_tag);
                for child in children {
                    if let Some(copied) = self.graft(source, *child) {
                        self.attach(id, copied);
                    }
                }
                id
            }
        };
        Some(id)
    }

    /// Record the content length of every node in pre-order and return the
    /// total encoded size of `id`.
    fn measure(&self, id: NodeId, depth: usize, lengths: &mut Vec<usize>) -> Result<usize> {
        if depth > MAX_DEPTH {
            return Err(DomError::TooDeep(MAX_DEPTH));
        }
        let tag = self.tag(id).ok_or(DomError::StaleNode(id))?;
        match self.kind(id) {
            Some(NodeKind::Leaf(value)) => {
                let total = tlv_length(tag, value);
                lengths.push(total);
                Ok(total)
            }
            Some(NodeKind::Container { type_tag, children }) => {
                let slot = lengths.len();
                lengths.push(0);
                let mut inner = 0;
                for child in children {
                    inner += self.measure(*child, depth + 1, lengths)?;
                }
                lengths[slot] = inner;
                let typed = header_length(*type_tag, Length::Definite(inner)) + inner;
                Ok(header_length(tag, Length::Definite(typed)) + typed)
            }
            None => Err(DomError::StaleNode(id)),
        }
    }

    fn encode_measured<S: ByteSink + ?Sized>(
        &self,
        id: NodeId,
        lengths: &[usize],
        next: &mut usize,
        out: &mut S,
    ) -> Result<()> {
        let tag = self.tag(id).ok_or(DomError::StaleNode(id))?;
        let inner = lengths.get(*next).copied().ok_or(DomError::StaleNode(id))?;
        *next += 1;
        match self.kind(id) {
            Some(NodeKind::Leaf(value)) => {
                encode_tlv(out, tag, value)?;
            }
            Some(NodeKind::Container { type_tag, children }) => {
                let typed = header_length(*type_tag, Length::Definite(inner)) + inner;
                encode_header(out, tag.to_constructed(), Length::Definite(typed))?;
                encode_header(out, type_tag.to_constructed(), Length::Definite(inner))?;
                for child in children {
                    self.encode_measured(*child, lengths, next, out)?;
                }
            }
            None => return Err(DomError::StaleNode(id)),
        }
        Ok(())
    }

    fn decode_element(&mut self, input: &mut &[u8], depth: usize) -> Result<NodeId> {
        if depth > MAX_DEPTH {
            return Err(DomError::TooDeep(MAX_DEPTH));
        }
        let (tag, length) = decode_header(input)?;
        if !tag.is_constructed() {
            return Err(DomError::Malformed("element tag must be constructed"));
        }

        match length {
            Length::Definite(length) => {
                let mut body = take(input, length)?;
                let id = self.decode_body(tag, &mut body, depth)?;
                if !body.is_empty() {
                    return Err(DomError::Malformed("element holds more than one value"));
                }
                Ok(id)
            }
            Length::Indefinite => {
                let id = self.decode_body(tag, input, depth)?;
                read_end_of_contents(input)?;
                Ok(id)
            }
        }
    }

    fn decode_body(&mut self, tag: Tag, input: &mut &[u8], depth: usize) -> Result<NodeId> {
        let (inner, inner_length) = decode_header(input)?;

        if !inner.is_constructed() {
            let length = inner_length.definite().ok_or(BerError::IndefiniteLength)?;
            let value = Value::decode(inner, input, length)?;
            return Ok(self.new_leaf(tag, value));
        }

        let id = self.new_container(tag, inner);
        match inner_length {
            Length::Definite(length) => {
                let mut body = take(input, length)?;
                while !body.is_empty() {
                    let child = self.decode_element(&mut body, depth + 1)?;
                    self.attach(id, child);
                }
            }
            Length::Indefinite => {
                while !input.is_empty() && !at_end_of_contents(input) {
                    let child = self.decode_element(input, depth + 1)?;
                    self.attach(id, child);
                }
                read_end_of_contents(input)?;
            }
        }
        Ok(id)
    }
}
