use std::fmt;

use bytes::Bytes;

use crate::buffer::ByteSink;
use crate::codec::{Decode, Encode, Null};
use crate::error::{BerError, Result};
use crate::oid::{ObjectIdentifier, RelativeOid};
use crate::tag::{types, Class, Tag};

/// A scalar value of any supported universal kind.
///
/// This is the runtime counterpart of the [`Encode`]/[`Decode`] kinds, used
/// where the kind is only known from the tag on the wire.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Utf8String(String),
    OctetString(Bytes),
    Null,
    RelativeOid(RelativeOid),
    ObjectIdentifier(ObjectIdentifier),
}

impl Value {
    /// The universal tag of the contained kind.
    pub fn universal_tag(&self) -> Tag {
        match self {
            Value::Boolean(_) => bool::UNIVERSAL_TAG,
            Value::Integer(_) => i64::UNIVERSAL_TAG,
            Value::Real(_) => f64::UNIVERSAL_TAG,
            Value::Utf8String(_) => String::UNIVERSAL_TAG,
            Value::OctetString(_) => Bytes::UNIVERSAL_TAG,
            Value::Null => Null::UNIVERSAL_TAG,
            Value::RelativeOid(_) => RelativeOid::UNIVERSAL_TAG,
            Value::ObjectIdentifier(_) => ObjectIdentifier::UNIVERSAL_TAG,
        }
    }

    /// Number of content bytes.
    pub fn encoded_length(&self) -> usize {
        match self {
            Value::Boolean(v) => v.encoded_length(),
            Value::Integer(v) => v.encoded_length(),
            Value::Real(v) => v.encoded_length(),
            Value::Utf8String(v) => v.encoded_length(),
            Value::OctetString(v) => v.encoded_length(),
            Value::Null => 0,
            Value::RelativeOid(v) => v.encoded_length(),
            Value::ObjectIdentifier(v) => v.encoded_length(),
        }
    }

    /// Write the content bytes.
    pub fn encode<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()> {
        match self {
            Value::Boolean(v) => v.encode(out),
            Value::Integer(v) => v.encode(out),
            Value::Real(v) => v.encode(out),
            Value::Utf8String(v) => v.encode(out),
            Value::OctetString(v) => v.encode(out),
            Value::Null => Ok(()),
            Value::RelativeOid(v) => v.encode(out),
            Value::ObjectIdentifier(v) => v.encode(out),
        }
    }

    /// Decode `length` content bytes of the kind identified by `tag`.
    pub fn decode(tag: Tag, input: &mut &[u8], length: usize) -> Result<Self> {
        if tag.class() != Class::Universal || tag.is_constructed() {
            return Err(BerError::UnsupportedType(tag));
        }

        Ok(match tag.number() {
            types::BOOLEAN => Value::Boolean(bool::decode(input, length)?),
            types::INTEGER | types::ENUMERATED => Value::Integer(i64::decode(input, length)?),
            types::REAL => Value::Real(f64::decode(input, length)?),
            types::UTF8_STRING => Value::Utf8String(String::decode(input, length)?),
            types::OCTET_STRING => Value::OctetString(Bytes::decode(input, length)?),
            types::NULL => {
                Null::decode(input, length)?;
                Value::Null
            }
            types::RELATIVE_OBJECT => Value::RelativeOid(RelativeOid::decode(input, length)?),
            types::OBJECT_IDENTIFIER => {
                Value::ObjectIdentifier(ObjectIdentifier::decode(input, length)?)
            }
            _ => return Err(BerError::UnsupportedType(tag)),
        })
    }

    /// Short name of the contained kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Utf8String(_) => "utf8-string",
            Value::OctetString(_) => "octet-string",
            Value::Null => "null",
            Value::RelativeOid(_) => "relative-oid",
            Value::ObjectIdentifier(_) => "object-identifier",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as a real; integers widen.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_octets(&self) -> Option<&Bytes> {
        match self {
            Value::OctetString(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_relative_oid(&self) -> Option<&RelativeOid> {
        match self {
            Value::RelativeOid(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v}"),
            Value::Utf8String(v) => write!(f, "{v:?}"),
            Value::OctetString(v) => write!(f, "<{} octets>", v.len()),
            Value::Null => f.write_str("null"),
            Value::RelativeOid(v) => write!(f, "{v}"),
            Value::ObjectIdentifier(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Utf8String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Utf8String(v.to_owned())
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Value::OctetString(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::OctetString(Bytes::from(v))
    }
}

impl From<Null> for Value {
    fn from(_: Null) -> Self {
        Value::Null
    }
}

impl From<RelativeOid> for Value {
    fn from(v: RelativeOid) -> Self {
        Value::RelativeOid(v)
    }
}

impl From<ObjectIdentifier> for Value {
    fn from(v: ObjectIdentifier) -> Self {
        Value::ObjectIdentifier(v)
    }
}
