//! Type-directed scalar encode/decode.
//!
//! Each scalar kind implements [`Encode`] and [`Decode`]; the free functions
//! mirror the trait methods so call sites can name the kind with a turbofish.

use bytes::{Buf, Bytes};

use crate::buffer::ByteSink;
use crate::error::{BerError, Result};
use crate::tag::{types, Tag};

/// Encoding capability of a scalar kind.
pub trait Encode {
    /// The universal tag identifying this kind on the wire.
    const UNIVERSAL_TAG: Tag;

    /// Exact number of content bytes [`Encode::encode`] writes.
    fn encoded_length(&self) -> usize;

    /// Write the content bytes in canonical form.
    fn encode<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()>;
}

/// Decoding capability of a scalar kind whose size is the externally known length.
pub trait Decode: Sized {
    /// Decode exactly `length` content bytes from `input`.
    fn decode(input: &mut &[u8], length: usize) -> Result<Self>;
}

/// Decoding capability of a self-delimiting kind (tags, lengths).
pub trait DecodeSelfDelimited: Sized {
    fn decode_self_delimited(input: &mut &[u8]) -> Result<Self>;
}

/// The universal tag of a scalar kind.
pub fn universal_tag<T: Encode + ?Sized>() -> Tag {
    T::UNIVERSAL_TAG
}

/// Number of content bytes `value` encodes to.
pub fn encoded_length<T: Encode + ?Sized>(value: &T) -> usize {
    value.encoded_length()
}

/// Append the content bytes of `value` to `out`.
pub fn encode<T, S>(out: &mut S, value: &T) -> Result<()>
where
    T: Encode + ?Sized,
    S: ByteSink + ?Sized,
{
    value.encode(out)
}

/// Decode a value of kind `T` from exactly `length` bytes.
pub fn decode<T: Decode>(input: &mut &[u8], length: usize) -> Result<T> {
    T::decode(input, length)
}

/// Decode a self-delimiting value of kind `T`.
pub fn decode_self_delimited<T: DecodeSelfDelimited>(input: &mut &[u8]) -> Result<T> {
    T::decode_self_delimited(input)
}

/// Split off exactly `length` content bytes, failing without consuming on underrun.
pub fn take<'a>(input: &mut &'a [u8], length: usize) -> Result<&'a [u8]> {
    if input.len() < length {
        return Err(BerError::UnexpectedEnd {
            needed: length,
            available: input.len(),
        });
    }
    let (content, rest) = input.split_at(length);
    *input = rest;
    Ok(content)
}

/// The ASN.1 NULL value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Null;

impl Encode for bool {
    const UNIVERSAL_TAG: Tag = Tag::universal(types::BOOLEAN);

    fn encoded_length(&self) -> usize {
        1
    }

    fn encode<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()> {
        out.push(if *self { 0xFF } else { 0x00 })
    }
}

impl Decode for bool {
    fn decode(input: &mut &[u8], length: usize) -> Result<Self> {
        if length != 1 {
            return Err(BerError::invalid("boolean", "length must be exactly 1"));
        }
        let content = take(input, length)?;
        Ok(content[0] != 0)
    }
}

/// Minimal two's-complement byte count of a signed value.
pub(crate) fn signed_length(value: i64) -> usize {
    let mut len = 8;
    while len > 1 {
        let rest = value >> ((len - 1) * 8 - 1);
        if rest == 0 || rest == -1 {
            len -= 1;
        } else {
            break;
        }
    }
    len
}

pub(crate) fn encode_signed<S: ByteSink + ?Sized>(out: &mut S, value: i64) -> Result<()> {
    let len = signed_length(value);
    let be = value.to_be_bytes();
    out.push_slice(&be[be.len() - len..])
}

pub(crate) fn decode_signed(content: &[u8], kind: &'static str) -> Result<i64> {
    let Some((&first, rest)) = content.split_first() else {
        return Err(BerError::invalid(kind, "empty content"));
    };
    if content.len() > 8 {
        return Err(BerError::invalid(kind, "value exceeds 64 bits"));
    }

    let mut value = i64::from(first as i8);
    for &byte in rest {
        value = (value << 8) | i64::from(byte);
    }
    Ok(value)
}

impl Encode for i64 {
    const UNIVERSAL_TAG: Tag = Tag::universal(types::INTEGER);

    fn encoded_length(&self) -> usize {
        signed_length(*self)
    }

    fn encode<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()> {
        encode_signed(out, *self)
    }
}

impl Decode for i64 {
    fn decode(input: &mut &[u8], length: usize) -> Result<Self> {
        decode_signed(take(input, length)?, "integer")
    }
}

impl Encode for i32 {
    const UNIVERSAL_TAG: Tag = Tag::universal(types::INTEGER);

    fn encoded_length(&self) -> usize {
        signed_length(i64::from(*self))
    }

    fn encode<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()> {
        encode_signed(out, i64::from(*self))
    }
}

impl Decode for i32 {
    fn decode(input: &mut &[u8], length: usize) -> Result<Self> {
        let wide = decode_signed(take(input, length)?, "integer")?;
        i32::try_from(wide).map_err(|_| BerError::invalid("integer", "value exceeds 32 bits"))
    }
}

impl Encode for u32 {
    const UNIVERSAL_TAG: Tag = Tag::universal(types::INTEGER);

    fn encoded_length(&self) -> usize {
        signed_length(i64::from(*self))
    }

    fn encode<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()> {
        encode_signed(out, i64::from(*self))
    }
}

impl Decode for u32 {
    fn decode(input: &mut &[u8], length: usize) -> Result<Self> {
        let wide = decode_signed(take(input, length)?, "integer")?;
        u32::try_from(wide)
            .map_err(|_| BerError::invalid("integer", "value outside unsigned 32-bit range"))
    }
}

impl Encode for str {
    const UNIVERSAL_TAG: Tag = Tag::universal(types::UTF8_STRING);

    fn encoded_length(&self) -> usize {
        self.len()
    }

    fn encode<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()> {
        out.push_slice(self.as_bytes())
    }
}

impl Encode for String {
    const UNIVERSAL_TAG: Tag = Tag::universal(types::UTF8_STRING);

    fn encoded_length(&self) -> usize {
        self.len()
    }

    fn encode<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()> {
        out.push_slice(self.as_bytes())
    }
}

impl Decode for String {
    fn decode(input: &mut &[u8], length: usize) -> Result<Self> {
        let content = take(input, length)?;
        Ok(String::from_utf8(content.to_vec())?)
    }
}

impl Encode for [u8] {
    const UNIVERSAL_TAG: Tag = Tag::universal(types::OCTET_STRING);

    fn encoded_length(&self) -> usize {
        self.len()
    }

    fn encode<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()> {
        out.push_slice(self)
    }
}

impl Encode for Vec<u8> {
    const UNIVERSAL_TAG: Tag = Tag::universal(types::OCTET_STRING);

    fn encoded_length(&self) -> usize {
        self.len()
    }

    fn encode<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()> {
        out.push_slice(self)
    }
}

impl Decode for Vec<u8> {
    fn decode(input: &mut &[u8], length: usize) -> Result<Self> {
        Ok(take(input, length)?.to_vec())
    }
}

impl Encode for Bytes {
    const UNIVERSAL_TAG: Tag = Tag::universal(types::OCTET_STRING);

    fn encoded_length(&self) -> usize {
        self.len()
    }

    fn encode<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()> {
        out.push_slice(self)
    }
}

impl Decode for Bytes {
    fn decode(input: &mut &[u8], length: usize) -> Result<Self> {
        let mut content = take(input, length)?;
        Ok(content.copy_to_bytes(length))
    }
}

impl Encode for Null {
    const UNIVERSAL_TAG: Tag = Tag::universal(types::NULL);

    fn encoded_length(&self) -> usize {
        0
    }

    fn encode<S: ByteSink + ?Sized>(&self, _out: &mut S) -> Result<()> {
        Ok(())
    }
}

impl Decode for Null {
    fn decode(_input: &mut &[u8], length: usize) -> Result<Self> {
        if length != 0 {
            return Err(BerError::invalid("null", "content must be empty"));
        }
        Ok(Null)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    const UNIVERSAL_TAG: Tag = T::UNIVERSAL_TAG;

    fn encoded_length(&self) -> usize {
        (**self).encoded_length()
    }

    fn encode<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()> {
        (**self).encode(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_to_vec<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
        let mut out = Vec::new();
        encode(&mut out, value).unwrap();
        assert_eq!(out.len(), encoded_length(value));
        out
    }

    #[test]
    fn test_integer_minimal_lengths() {
        let cases: [(i64, usize); 8] = [
            (0, 1),
            (127, 1),
            (128, 2),
            (-1, 1),
            (-128, 1),
            (-129, 2),
            (2_147_483_647, 4),
            (-2_147_483_648, 4),
        ];
        for (value, expected) in cases {
            let bytes = encode_to_vec(&value);
            assert_eq!(bytes.len(), expected, "length of {value}");
            let mut input = bytes.as_slice();
            assert_eq!(decode::<i64>(&mut input, bytes.len()).unwrap(), value);
            assert!(input.is_empty());
        }
    }

    #[test]
    fn test_integer_bytes() {
        assert_eq!(encode_to_vec(&0i64), vec![0x00]);
        assert_eq!(encode_to_vec(&128i64), vec![0x00, 0x80]);
        assert_eq!(encode_to_vec(&-129i64), vec![0xFF, 0x7F]);
        assert_eq!(encode_to_vec(&-128i32), vec![0x80]);
        assert_eq!(
            encode_to_vec(&i64::MIN),
            vec![0x80, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(encode_to_vec(&u32::MAX), vec![0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_integer_range_checks() {
        let wide = encode_to_vec(&(i64::from(i32::MAX) + 1));
        let mut input = wide.as_slice();
        assert!(decode::<i32>(&mut input, wide.len()).is_err());

        let negative = encode_to_vec(&-1i64);
        let mut input = negative.as_slice();
        assert!(decode::<u32>(&mut input, 1).is_err());

        let mut empty: &[u8] = &[];
        assert!(decode::<i64>(&mut empty, 0).is_err());

        let nine = [0u8; 9];
        let mut input = &nine[..];
        assert!(decode::<i64>(&mut input, 9).is_err());
    }

    #[test]
    fn test_boolean() {
        assert_eq!(encode_to_vec(&true), vec![0xFF]);
        assert_eq!(encode_to_vec(&false), vec![0x00]);

        let mut input: &[u8] = &[0x01];
        assert!(decode::<bool>(&mut input, 1).unwrap());

        let mut input: &[u8] = &[0x00, 0x00];
        assert!(decode::<bool>(&mut input, 2).is_err());
    }

    #[test]
    fn test_strings_and_octets() {
        let text = "Gain \u{00B5}";
        let bytes = encode_to_vec(text);
        assert_eq!(bytes, text.as_bytes());
        let mut input = bytes.as_slice();
        assert_eq!(decode::<String>(&mut input, bytes.len()).unwrap(), text);

        let mut invalid: &[u8] = &[0xC3, 0x28];
        let err = decode::<String>(&mut invalid, 2).unwrap_err();
        assert!(matches!(err, BerError::InvalidUtf8(_)));
        assert!(err.is_invalid_encoding());

        let octets = Bytes::from_static(&[0xDE, 0xAD, 0xBE, 0xEF]);
        let encoded = encode_to_vec(&octets);
        let mut input = encoded.as_slice();
        assert_eq!(decode::<Bytes>(&mut input, 4).unwrap(), octets);
    }

    #[test]
    fn test_null() {
        assert!(encode_to_vec(&Null).is_empty());
        let mut input: &[u8] = &[];
        assert_eq!(decode::<Null>(&mut input, 0).unwrap(), Null);
        let mut input: &[u8] = &[0x00];
        assert!(decode::<Null>(&mut input, 1).is_err());
    }

    #[test]
    fn test_underrun_is_reported_and_consumes_nothing() {
        let mut input: &[u8] = &[0x01, 0x02];
        let err = decode::<i64>(&mut input, 4).unwrap_err();
        assert!(matches!(
            err,
            BerError::UnexpectedEnd {
                needed: 4,
                available: 2
            }
        ));
        assert_eq!(input, &[0x01, 0x02]);
    }

    #[test]
    fn test_decode_consumes_exactly_length() {
        let mut input: &[u8] = &[0x05, 0xAA];
        assert_eq!(decode::<i32>(&mut input, 1).unwrap(), 5);
        assert_eq!(input, &[0xAA]);
    }

    #[test]
    fn test_universal_tags() {
        assert_eq!(universal_tag::<bool>(), Tag::universal(types::BOOLEAN));
        assert_eq!(universal_tag::<i32>(), Tag::universal(types::INTEGER));
        assert_eq!(universal_tag::<str>(), Tag::universal(types::UTF8_STRING));
        assert_eq!(universal_tag::<Bytes>(), Tag::universal(types::OCTET_STRING));
        assert_eq!(universal_tag::<Null>(), Tag::universal(types::NULL));
        assert_eq!(universal_tag::<f64>(), Tag::universal(types::REAL));
    }
}
