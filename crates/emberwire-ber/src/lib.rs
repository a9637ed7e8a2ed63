//! BER tag/length/value codec for the Ember+ wire format.
//!
//! This is the lowest layer of emberwire. Every value on the wire is a
//! TLV triplet:
//! - A tag carrying class, constructed flag and number (multi-byte above 30)
//! - A length, short form below 128, long form or indefinite above that
//! - Content octets in the canonical form of the value's universal type
//!
//! Output goes through the [`ByteSink`] capability so callers choose between
//! a [`FixedBuffer`] over their own memory and a growable [`DynamicBuffer`].

mod base128;
pub mod buffer;
pub mod codec;
pub mod error;
pub mod length;
pub mod oid;
pub mod real;
pub mod tag;
pub mod tlv;
pub mod value;

pub use buffer::{ByteSink, DynamicBuffer, FixedBuffer};
pub use codec::{
    decode, decode_self_delimited, encode, encoded_length, take, universal_tag, Decode,
    DecodeSelfDelimited, Encode, Null,
};
pub use error::{BerError, Result};
pub use length::Length;
pub use oid::{ObjectIdentifier, RelativeOid};
pub use tag::{types, Class, Tag};
pub use tlv::{
    at_end_of_contents, decode_header, decode_tlv, encode_header, encode_tlv, header_length,
    read_end_of_contents, tlv_length, universal_tlv_length, Primitive,
};
pub use value::Value;
