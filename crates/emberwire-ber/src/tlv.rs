//! TLV headers and the leaf framing used by Ember+.
//!
//! A leaf is written as an outer (usually context) tag, constructed, whose
//! content is one complete universal TLV:
//!
//! ```text
//! [CONTEXT n]* len  [UNIVERSAL kind] len  content...
//! ```

use crate::buffer::ByteSink;
use crate::codec::{Decode, DecodeSelfDelimited, Encode};
use crate::error::{BerError, Result};
use crate::length::Length;
use crate::tag::Tag;
use crate::value::Value;

/// Content that can be written as a universal TLV, whether its kind is known
/// statically or only at runtime.
pub trait Primitive {
    fn universal_tag(&self) -> Tag;
    fn content_length(&self) -> usize;
    fn write_content<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()>;
}

impl<T: Encode + ?Sized> Primitive for T {
    fn universal_tag(&self) -> Tag {
        T::UNIVERSAL_TAG
    }

    fn content_length(&self) -> usize {
        self.encoded_length()
    }

    fn write_content<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()> {
        self.encode(out)
    }
}

impl Primitive for Value {
    fn universal_tag(&self) -> Tag {
        Value::universal_tag(self)
    }

    fn content_length(&self) -> usize {
        self.encoded_length()
    }

    fn write_content<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()> {
        self.encode(out)
    }
}

/// Bytes occupied by a tag and a length.
pub fn header_length(tag: Tag, length: Length) -> usize {
    tag.encoded_length() + length.encoded_length()
}

/// Write a tag followed by a length.
pub fn encode_header<S: ByteSink + ?Sized>(out: &mut S, tag: Tag, length: Length) -> Result<()> {
    tag.encode(out)?;
    length.encode(out)
}

/// Read a tag and a length. Indefinite lengths are rejected on primitive tags.
pub fn decode_header(input: &mut &[u8]) -> Result<(Tag, Length)> {
    let tag = Tag::decode_self_delimited(input)?;
    let length = Length::decode_self_delimited(input)?;
    if length.is_indefinite() && !tag.is_constructed() {
        return Err(BerError::IndefiniteLength);
    }
    Ok((tag, length))
}

/// Returns true if `input` starts with an end-of-contents marker.
pub fn at_end_of_contents(input: &[u8]) -> bool {
    input.starts_with(&[0x00, 0x00])
}

/// Consume an end-of-contents marker.
pub fn read_end_of_contents(input: &mut &[u8]) -> Result<()> {
    if !at_end_of_contents(input) {
        return Err(BerError::InvalidLength("missing end-of-contents marker"));
    }
    *input = &input[2..];
    Ok(())
}

/// Bytes occupied by the universal TLV of `value`.
pub fn universal_tlv_length<P: Primitive + ?Sized>(value: &P) -> usize {
    let content = value.content_length();
    header_length(value.universal_tag(), Length::Definite(content)) + content
}

/// Bytes occupied by `value` framed under `tag`.
pub fn tlv_length<P: Primitive + ?Sized>(tag: Tag, value: &P) -> usize {
    let inner = universal_tlv_length(value);
    header_length(tag.to_constructed(), Length::Definite(inner)) + inner
}

/// Write `value` framed under `tag`.
pub fn encode_tlv<S, P>(out: &mut S, tag: Tag, value: &P) -> Result<()>
where
    S: ByteSink + ?Sized,
    P: Primitive + ?Sized,
{
    let content = value.content_length();
    let inner = header_length(value.universal_tag(), Length::Definite(content)) + content;

    encode_header(out, tag.to_constructed(), Length::Definite(inner))?;
    encode_header(out, value.universal_tag(), Length::Definite(content))?;
    value.write_content(out)
}

/// Read a value of kind `T` framed under `expected`.
pub fn decode_tlv<T: Encode + Decode>(input: &mut &[u8], expected: Tag) -> Result<T> {
    let start = input.len();
    let (outer, outer_length) = decode_header(input)?;
    if outer != expected {
        return Err(BerError::UnexpectedTag {
            expected,
            found: outer,
        });
    }

    let body_start = input.len();
    let (inner, inner_length) = decode_header(input)?;
    if inner != T::UNIVERSAL_TAG {
        return Err(BerError::UnexpectedTag {
            expected: T::UNIVERSAL_TAG,
            found: inner,
        });
    }
    let Length::Definite(content_length) = inner_length else {
        return Err(BerError::IndefiniteLength);
    };
    let value = T::decode(input, content_length)?;

    match outer_length {
        Length::Definite(len) if len != body_start - input.len() => {
            return Err(BerError::InvalidLength("outer length does not match contents"));
        }
        Length::Indefinite => read_end_of_contents(input)?,
        Length::Definite(_) => {}
    }

    tracing::trace!(tag = %outer, consumed = start - input.len(), "decoded leaf");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::types;

    #[test]
    fn leaf_layout() {
        let mut out = Vec::new();
        encode_tlv(&mut out, Tag::context(0), "gain").unwrap();
        assert_eq!(
            out,
            vec![0xA0, 0x06, 0x0C, 0x04, b'g', b'a', b'i', b'n']
        );
        assert_eq!(out.len(), tlv_length(Tag::context(0), "gain"));
    }

    #[test]
    fn leaf_roundtrip() {
        let mut out = Vec::new();
        encode_tlv(&mut out, Tag::context(3), &-42i32).unwrap();
        let mut input = out.as_slice();
        assert_eq!(decode_tlv::<i32>(&mut input, Tag::context(3)).unwrap(), -42);
        assert!(input.is_empty());
    }

    #[test]
    fn runtime_value_matches_static_kind() {
        let mut typed = Vec::new();
        encode_tlv(&mut typed, Tag::context(1), &12.5f64).unwrap();

        let mut dynamic = Vec::new();
        encode_tlv(&mut dynamic, Tag::context(1), &Value::Real(12.5)).unwrap();

        assert_eq!(typed, dynamic);
    }

    #[test]
    fn indefinite_outer_length() {
        let bytes = [0xA1, 0x80, 0x01, 0x01, 0xFF, 0x00, 0x00];
        let mut input = &bytes[..];
        assert!(decode_tlv::<bool>(&mut input, Tag::context(1)).unwrap());
        assert!(input.is_empty());
    }

    #[test]
    fn mismatched_tags_fail() {
        let mut out = Vec::new();
        encode_tlv(&mut out, Tag::context(1), &true).unwrap();

        let mut input = out.as_slice();
        assert!(matches!(
            decode_tlv::<bool>(&mut input, Tag::context(2)),
            Err(BerError::UnexpectedTag { .. })
        ));

        let mut input = out.as_slice();
        assert!(matches!(
            decode_tlv::<i64>(&mut input, Tag::context(1)),
            Err(BerError::UnexpectedTag { .. })
        ));
    }

    #[test]
    fn indefinite_length_on_primitive_fails() {
        let mut input: &[u8] = &[0x02, 0x80];
        assert!(matches!(
            decode_header(&mut input),
            Err(BerError::IndefiniteLength)
        ));
    }

    #[test]
    fn header_helpers() {
        let tag = Tag::universal(types::SEQUENCE).to_constructed();
        let mut out = Vec::new();
        encode_header(&mut out, tag, Length::Definite(300)).unwrap();
        assert_eq!(out, vec![0x30, 0x82, 0x01, 0x2C]);
        assert_eq!(out.len(), header_length(tag, Length::Definite(300)));

        let mut input = out.as_slice();
        let (decoded_tag, length) = decode_header(&mut input).unwrap();
        assert_eq!(decoded_tag, tag);
        assert!(decoded_tag.is_constructed());
        assert_eq!(length, Length::Definite(300));
    }

    #[test]
    fn end_of_contents() {
        let mut input: &[u8] = &[0x00, 0x00, 0x05];
        assert!(at_end_of_contents(input));
        read_end_of_contents(&mut input).unwrap();
        assert_eq!(input, &[0x05]);
        assert!(read_end_of_contents(&mut input).is_err());
    }
}
