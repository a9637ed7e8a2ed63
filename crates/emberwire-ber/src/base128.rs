//! Base-128 sub-identifiers shared by multi-byte tags and object identifiers.

use bytes::Buf;

use crate::buffer::ByteSink;
use crate::error::Result;

pub(crate) fn encoded_length(value: u32) -> usize {
    let bits = 32 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

pub(crate) fn encode<S: ByteSink + ?Sized>(out: &mut S, value: u32) -> Result<()> {
    let len = encoded_length(value);
    for i in (0..len).rev() {
        let group = ((value >> (i * 7)) & 0x7F) as u8;
        let more = if i > 0 { 0x80 } else { 0x00 };
        out.push(group | more)?;
    }
    Ok(())
}

/// Failure modes; callers map them onto their own error variant.
pub(crate) enum Base128Error {
    Truncated,
    NonMinimal,
    Overflow,
}

pub(crate) fn decode(input: &mut &[u8]) -> std::result::Result<u32, Base128Error> {
    let mut value: u32 = 0;
    let mut first = true;

    loop {
        if !input.has_remaining() {
            return Err(Base128Error::Truncated);
        }
        let byte = input.get_u8();
        if first && byte == 0x80 {
            return Err(Base128Error::NonMinimal);
        }
        first = false;

        if value > (u32::MAX >> 7) {
            return Err(Base128Error::Overflow);
        }
        value = (value << 7) | u32::from(byte & 0x7F);

        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
}
