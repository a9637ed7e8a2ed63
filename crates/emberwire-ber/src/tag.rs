use std::fmt;
use std::hash::{Hash, Hasher};

use bytes::Buf;

use crate::base128::{self, Base128Error};
use crate::buffer::ByteSink;
use crate::codec::DecodeSelfDelimited;
use crate::error::{BerError, Result};

/// Universal type numbers.
pub mod types {
    pub const END_OF_CONTENTS: u32 = 0;
    pub const BOOLEAN: u32 = 1;
    pub const INTEGER: u32 = 2;
    pub const BIT_STRING: u32 = 3;
    pub const OCTET_STRING: u32 = 4;
    pub const NULL: u32 = 5;
    pub const OBJECT_IDENTIFIER: u32 = 6;
    pub const REAL: u32 = 9;
    pub const ENUMERATED: u32 = 10;
    pub const UTF8_STRING: u32 = 12;
    pub const RELATIVE_OBJECT: u32 = 13;
    pub const SEQUENCE: u32 = 16;
    pub const SET: u32 = 17;
}

/// Tag numbers from this value upward use the multi-byte form.
const MULTI_BYTE_MARKER: u8 = 0x1F;
const CONSTRUCTED_BIT: u8 = 0x20;

/// The class bits of a BER tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Class {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl Class {
    fn bits(self) -> u8 {
        match self {
            Class::Universal => 0x00,
            Class::Application => 0x40,
            Class::ContextSpecific => 0x80,
            Class::Private => 0xC0,
        }
    }

    fn from_bits(byte: u8) -> Self {
        match byte & 0xC0 {
            0x00 => Class::Universal,
            0x40 => Class::Application,
            0x80 => Class::ContextSpecific,
            _ => Class::Private,
        }
    }
}

/// A BER tag.
///
/// Two tags are equal when class and number match; the constructed flag is
/// part of the encoding but not of the tag's identity.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag {
    class: Class,
    number: u32,
    constructed: bool,
}

impl Tag {
    /// The end-of-contents marker closing an indefinite length.
    pub const END_OF_CONTENTS: Tag = Tag::universal(types::END_OF_CONTENTS);

    pub const fn new(class: Class, number: u32, constructed: bool) -> Self {
        Self {
            class,
            number,
            constructed,
        }
    }

    pub const fn universal(number: u32) -> Self {
        Self::new(Class::Universal, number, false)
    }

    pub const fn application(number: u32) -> Self {
        Self::new(Class::Application, number, false)
    }

    pub const fn context(number: u32) -> Self {
        Self::new(Class::ContextSpecific, number, false)
    }

    pub const fn private(number: u32) -> Self {
        Self::new(Class::Private, number, false)
    }

    /// The same tag with the constructed flag set.
    pub const fn to_constructed(self) -> Self {
        Self::new(self.class, self.number, true)
    }

    /// The same tag with the constructed flag cleared.
    pub const fn to_primitive(self) -> Self {
        Self::new(self.class, self.number, false)
    }

    pub const fn class(&self) -> Class {
        self.class
    }

    pub const fn number(&self) -> u32 {
        self.number
    }

    pub const fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Returns true for the universal zero tag.
    pub fn is_end_of_contents(&self) -> bool {
        self.class == Class::Universal && self.number == types::END_OF_CONTENTS
    }

    /// Number of bytes this tag occupies on the wire.
    pub fn encoded_length(&self) -> usize {
        if self.number < u32::from(MULTI_BYTE_MARKER) {
            1
        } else {
            1 + base128::encoded_length(self.number)
        }
    }

    /// Write the tag bytes.
    pub fn encode<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()> {
        let mut lead = self.class.bits();
        if self.constructed {
            lead |= CONSTRUCTED_BIT;
        }

        if self.number < u32::from(MULTI_BYTE_MARKER) {
            return out.push(lead | self.number as u8);
        }

        out.push(lead | MULTI_BYTE_MARKER)?;
        base128::encode(out, self.number)
    }
}

impl DecodeSelfDelimited for Tag {
    fn decode_self_delimited(input: &mut &[u8]) -> Result<Self> {
        if !input.has_remaining() {
            return Err(BerError::UnexpectedEnd {
                needed: 1,
                available: 0,
            });
        }

        let lead = input.get_u8();
        let class = Class::from_bits(lead);
        let constructed = lead & CONSTRUCTED_BIT != 0;
        let low = lead & MULTI_BYTE_MARKER;

        if low != MULTI_BYTE_MARKER {
            return Ok(Tag::new(class, u32::from(low), constructed));
        }

        let number = base128::decode(input).map_err(|err| match err {
            Base128Error::Truncated => BerError::InvalidTag("truncated tag continuation"),
            Base128Error::NonMinimal => BerError::InvalidTag("padded tag continuation"),
            Base128Error::Overflow => BerError::InvalidTag("tag number exceeds 32 bits"),
        })?;

        if number < u32::from(MULTI_BYTE_MARKER) {
            return Err(BerError::InvalidTag("multi-byte form used for a low tag number"));
        }

        Ok(Tag::new(class, number, constructed))
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class && self.number == other.number
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.class.hash(state);
        self.number.hash(state);
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = match self.class {
            Class::Universal => "UNIVERSAL",
            Class::Application => "APPLICATION",
            Class::ContextSpecific => "CONTEXT",
            Class::Private => "PRIVATE",
        };
        write!(f, "[{class} {}]", self.number)?;
        if self.constructed {
            f.write_str("*")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(tag: Tag) -> (Tag, usize) {
        let mut out = Vec::new();
        tag.encode(&mut out).unwrap();
        assert_eq!(out.len(), tag.encoded_length());

        let mut input = out.as_slice();
        let decoded = Tag::decode_self_delimited(&mut input).unwrap();
        assert!(input.is_empty());
        (decoded, out.len())
    }

    #[test]
    fn roundtrip_all_classes_and_numbers() {
        let classes = [
            Class::Universal,
            Class::Application,
            Class::ContextSpecific,
            Class::Private,
        ];
        for class in classes {
            for constructed in [false, true] {
                for number in [0u32, 1, 30, 31, 127, 128, 16383, 16384, u32::MAX] {
                    let tag = Tag::new(class, number, constructed);
                    let (decoded, len) = roundtrip(tag);
                    assert_eq!(decoded, tag);
                    assert_eq!(decoded.class(), class);
                    assert_eq!(decoded.number(), number);
                    assert_eq!(decoded.is_constructed(), constructed);
                    assert_eq!(len, tag.encoded_length());
                }
            }
        }
    }

    #[test]
    fn byte_layout() {
        let mut out = Vec::new();
        Tag::application(1).to_constructed().encode(&mut out).unwrap();
        Tag::context(30).encode(&mut out).unwrap();
        Tag::private(31).encode(&mut out).unwrap();
        Tag::universal(16383).to_constructed().encode(&mut out).unwrap();

        assert_eq!(
            out,
            vec![0x61, 0x9E, 0xDF, 0x1F, 0x3F, 0xFF, 0x7F]
        );
    }

    #[test]
    fn encoded_length_boundaries() {
        assert_eq!(Tag::context(30).encoded_length(), 1);
        assert_eq!(Tag::context(31).encoded_length(), 2);
        assert_eq!(Tag::context(127).encoded_length(), 2);
        assert_eq!(Tag::context(128).encoded_length(), 3);
        assert_eq!(Tag::context(16383).encoded_length(), 3);
    }

    #[test]
    fn equality_ignores_constructed_flag() {
        assert_eq!(Tag::context(2), Tag::context(2).to_constructed());
        assert_ne!(Tag::context(2), Tag::application(2));
        assert_ne!(Tag::context(2), Tag::context(3));
    }

    #[test]
    fn malformed_continuation_is_invalid_tag() {
        let mut truncated: &[u8] = &[0x7F, 0x81];
        assert!(matches!(
            Tag::decode_self_delimited(&mut truncated),
            Err(BerError::InvalidTag(_))
        ));

        let mut low_number: &[u8] = &[0x1F, 0x05];
        assert!(matches!(
            Tag::decode_self_delimited(&mut low_number),
            Err(BerError::InvalidTag(_))
        ));

        let mut empty: &[u8] = &[];
        assert!(matches!(
            Tag::decode_self_delimited(&mut empty),
            Err(BerError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn display_marks_constructed() {
        assert_eq!(Tag::application(19).to_string(), "[APPLICATION 19]");
        assert_eq!(Tag::context(0).to_constructed().to_string(), "[CONTEXT 0]*");
    }
}
