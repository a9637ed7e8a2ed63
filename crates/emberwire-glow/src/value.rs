use std::fmt;

use bytes::Bytes;
use emberwire_ber::Value;

/// Type of a parameter value or tuple item, as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParameterType {
    #[default]
    Null,
    Integer,
    Real,
    String,
    Boolean,
    Trigger,
    Enum,
    Octets,
}

impl ParameterType {
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => ParameterType::Null,
            1 => ParameterType::Integer,
            2 => ParameterType::Real,
            3 => ParameterType::String,
            4 => ParameterType::Boolean,
            5 => ParameterType::Trigger,
            6 => ParameterType::Enum,
            7 => ParameterType::Octets,
            _ => return None,
        })
    }

    pub fn code(self) -> i64 {
        match self {
            ParameterType::Null => 0,
            ParameterType::Integer => 1,
            ParameterType::Real => 2,
            ParameterType::String => 3,
            ParameterType::Boolean => 4,
            ParameterType::Trigger => 5,
            ParameterType::Enum => 6,
            ParameterType::Octets => 7,
        }
    }
}

/// Access rights of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParameterAccess {
    None,
    #[default]
    Read,
    Write,
    ReadWrite,
}

impl ParameterAccess {
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => ParameterAccess::None,
            1 => ParameterAccess::Read,
            2 => ParameterAccess::Write,
            3 => ParameterAccess::ReadWrite,
            _ => return None,
        })
    }

    pub fn code(self) -> i64 {
        match self {
            ParameterAccess::None => 0,
            ParameterAccess::Read => 1,
            ParameterAccess::Write => 2,
            ParameterAccess::ReadWrite => 3,
        }
    }
}

/// A scalar carried by parameters, invocation arguments and results.
///
/// Narrower than [`Value`]: object identifiers never appear in these
/// positions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlowValue {
    Integer(i64),
    Real(f64),
    String(String),
    Boolean(bool),
    Octets(Bytes),
    Null,
}

impl GlowValue {
    /// Convert a decoded leaf value; `None` for kinds Glow does not carry.
    pub fn from_ber(value: &Value) -> Option<Self> {
        Some(match value {
            Value::Integer(v) => GlowValue::Integer(*v),
            Value::Real(v) => GlowValue::Real(*v),
            Value::Utf8String(v) => GlowValue::String(v.clone()),
            Value::Boolean(v) => GlowValue::Boolean(*v),
            Value::OctetString(v) => GlowValue::Octets(v.clone()),
            Value::Null => GlowValue::Null,
            Value::RelativeOid(_) | Value::ObjectIdentifier(_) => return None,
        })
    }

    pub fn to_ber(&self) -> Value {
        self.clone().into()
    }

    /// Parameter type describing this value.
    pub fn parameter_type(&self) -> ParameterType {
        match self {
            GlowValue::Integer(_) => ParameterType::Integer,
            GlowValue::Real(_) => ParameterType::Real,
            GlowValue::String(_) => ParameterType::String,
            GlowValue::Boolean(_) => ParameterType::Boolean,
            GlowValue::Octets(_) => ParameterType::Octets,
            GlowValue::Null => ParameterType::Null,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            GlowValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            GlowValue::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            GlowValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            GlowValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<GlowValue> for Value {
    fn from(value: GlowValue) -> Self {
        match value {
            GlowValue::Integer(v) => Value::Integer(v),
            GlowValue::Real(v) => Value::Real(v),
            GlowValue::String(v) => Value::Utf8String(v),
            GlowValue::Boolean(v) => Value::Boolean(v),
            GlowValue::Octets(v) => Value::OctetString(v),
            GlowValue::Null => Value::Null,
        }
    }
}

impl From<i64> for GlowValue {
    fn from(value: i64) -> Self {
        GlowValue::Integer(value)
    }
}

impl From<i32> for GlowValue {
    fn from(value: i32) -> Self {
        GlowValue::Integer(value.into())
    }
}

impl From<f64> for GlowValue {
    fn from(value: f64) -> Self {
        GlowValue::Real(value)
    }
}

impl From<bool> for GlowValue {
    fn from(value: bool) -> Self {
        GlowValue::Boolean(value)
    }
}

impl From<String> for GlowValue {
    fn from(value: String) -> Self {
        GlowValue::String(value)
    }
}

impl From<&str> for GlowValue {
    fn from(value: &str) -> Self {
        GlowValue::String(value.to_owned())
    }
}

impl From<Bytes> for GlowValue {
    fn from(value: Bytes) -> Self {
        GlowValue::Octets(value)
    }
}

impl fmt::Display for GlowValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlowValue::Integer(v) => write!(f, "{v}"),
            GlowValue::Real(v) => write!(f, "{v}"),
            GlowValue::String(v) => write!(f, "{v:?}"),
            GlowValue::Boolean(v) => write!(f, "{v}"),
            GlowValue::Octets(v) => write!(f, "<{} bytes>", v.len()),
            GlowValue::Null => f.write_str("null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use emberwire_ber::RelativeOid;

    use super::*;

    #[test]
    fn test_ber_conversion() {
        let values = [
            GlowValue::Integer(-3),
            GlowValue::Real(1.5),
            GlowValue::String("mute".into()),
            GlowValue::Boolean(true),
            GlowValue::Octets(Bytes::from_static(b"\x01\x02")),
            GlowValue::Null,
        ];
        for value in values {
            assert_eq!(GlowValue::from_ber(&value.to_ber()), Some(value));
        }
    }

    #[test]
    fn test_object_identifiers_are_not_glow_values() {
        let oid = Value::RelativeOid(RelativeOid::new(vec![1, 2]));
        assert_eq!(GlowValue::from_ber(&oid), None);
    }

    #[test]
    fn test_parameter_type_codes() {
        for code in 0..8 {
            let kind = ParameterType::from_code(code).unwrap();
            assert_eq!(kind.code(), code);
        }
        assert_eq!(ParameterType::from_code(8), None);
        assert_eq!(GlowValue::from(2.0).parameter_type(), ParameterType::Real);
    }

    #[test]
    fn test_access_defaults_to_read() {
        assert_eq!(ParameterAccess::default(), ParameterAccess::Read);
        assert_eq!(ParameterAccess::from_code(3), Some(ParameterAccess::ReadWrite));
    }

    #[test]
    fn test_display() {
        assert_eq!(GlowValue::from("x").to_string(), "\"x\"");
        assert_eq!(GlowValue::Null.to_string(), "null");
    }
}
