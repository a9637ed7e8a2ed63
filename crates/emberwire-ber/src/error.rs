use crate::tag::Tag;

/// Errors that can occur while encoding or decoding BER data.
#[derive(Debug, thiserror::Error)]
pub enum BerError {
    /// The input ended before the declared content was complete.
    #[error("unexpected end of input (needed {needed} bytes, {available} available)")]
    UnexpectedEnd { needed: usize, available: usize },

    /// A multi-byte tag number is malformed or does not fit in 32 bits.
    #[error("invalid tag encoding: {0}")]
    InvalidTag(&'static str),

    /// A length field is malformed or does not fit in `usize`.
    #[error("invalid length encoding: {0}")]
    InvalidLength(&'static str),

    /// The content octets do not form a valid value of the expected type.
    #[error("invalid {kind} content: {reason}")]
    InvalidContent {
        kind: &'static str,
        reason: &'static str,
    },

    /// A string value is not valid UTF-8.
    #[error("invalid UTF-8 in string value: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// The decoded tag is not the one the caller expected.
    #[error("unexpected tag (expected {expected}, found {found})")]
    UnexpectedTag { expected: Tag, found: Tag },

    /// No scalar kind is registered for this universal tag.
    #[error("unsupported universal type {0}")]
    UnsupportedType(Tag),

    /// An indefinite length was found where only definite lengths are legal.
    #[error("indefinite length is only legal for constructed values")]
    IndefiniteLength,

    /// A fixed buffer has no room left for the requested write.
    #[error("buffer overflow (capacity {capacity} bytes, {requested} requested)")]
    BufferOverflow { capacity: usize, requested: usize },

    /// A dynamic buffer could not grow.
    #[error("buffer allocation failed: {0}")]
    Allocation(#[from] std::collections::TryReserveError),
}

impl BerError {
    /// Returns true for errors raised by malformed input rather than by the
    /// output buffer.
    pub fn is_invalid_encoding(&self) -> bool {
        !matches!(
            self,
            BerError::BufferOverflow { .. } | BerError::Allocation(_)
        )
    }

    pub(crate) fn invalid(kind: &'static str, reason: &'static str) -> Self {
        BerError::InvalidContent { kind, reason }
    }
}

pub type Result<T> = std::result::Result<T, BerError>;
