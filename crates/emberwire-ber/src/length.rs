use bytes::Buf;

use crate::buffer::ByteSink;
use crate::codec::DecodeSelfDelimited;
use crate::error::{BerError, Result};

const LONG_FORM_BIT: u8 = 0x80;
const INDEFINITE: u8 = 0x80;
const RESERVED: u8 = 0xFF;

/// The length field of a TLV triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    /// An exact content byte count.
    Definite(usize),
    /// Content runs until an end-of-contents marker (constructed values only).
    Indefinite,
}

impl Length {
    /// Returns the byte count of a definite length.
    pub fn definite(self) -> Option<usize> {
        match self {
            Length::Definite(len) => Some(len),
            Length::Indefinite => None,
        }
    }

    pub fn is_indefinite(self) -> bool {
        matches!(self, Length::Indefinite)
    }

    /// Number of bytes this length occupies on the wire.
    pub fn encoded_length(self) -> usize {
        match self {
            Length::Definite(len) if len < 0x80 => 1,
            Length::Definite(len) => 1 + significant_bytes(len),
            Length::Indefinite => 1,
        }
    }

    /// Write the length bytes using the short form below 128 and the long form above.
    pub fn encode<S: ByteSink + ?Sized>(self, out: &mut S) -> Result<()> {
        match self {
            Length::Definite(len) if len < 0x80 => out.push(len as u8),
            Length::Definite(len) => {
                let count = significant_bytes(len);
                out.push(LONG_FORM_BIT | count as u8)?;
                let be = len.to_be_bytes();
                out.push_slice(&be[be.len() - count..])
            }
            Length::Indefinite => out.push(INDEFINITE),
        }
    }
}

impl From<usize> for Length {
    fn from(len: usize) -> Self {
        Length::Definite(len)
    }
}

impl DecodeSelfDelimited for Length {
    fn decode_self_delimited(input: &mut &[u8]) -> Result<Self> {
        if !input.has_remaining() {
            return Err(BerError::InvalidLength("missing length byte"));
        }

        let lead = input.get_u8();
        if lead & LONG_FORM_BIT == 0 {
            return Ok(Length::Definite(usize::from(lead)));
        }
        if lead == INDEFINITE {
            return Ok(Length::Indefinite);
        }
        if lead == RESERVED {
            return Err(BerError::InvalidLength("reserved length form 0xFF"));
        }

        let count = usize::from(lead & !LONG_FORM_BIT);
        if input.remaining() < count {
            return Err(BerError::InvalidLength("truncated long-form length"));
        }

        let mut len: usize = 0;
        for _ in 0..count {
            if len > (usize::MAX >> 8) {
                return Err(BerError::InvalidLength("length does not fit in usize"));
            }
            len = (len << 8) | usize::from(input.get_u8());
        }
        Ok(Length::Definite(len))
    }
}

fn significant_bytes(value: usize) -> usize {
    let bits = usize::BITS - value.leading_zeros();
    (bits as usize).div_ceil(8).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(len: Length) -> Vec<u8> {
        let mut out = Vec::new();
        len.encode(&mut out).unwrap();
        assert_eq!(out.len(), len.encoded_length());
        out
    }

    #[test]
    fn roundtrip_boundaries() {
        for value in [0usize, 1, 127, 128, 255, 256, 65535, 65536, 16_777_215] {
            let bytes = encode(Length::Definite(value));
            let mut input = bytes.as_slice();
            let decoded = Length::decode_self_delimited(&mut input).unwrap();
            assert_eq!(decoded, Length::Definite(value));
            assert!(input.is_empty());

            if value < 128 {
                assert_eq!(bytes.len(), 1);
            } else {
                assert_eq!(bytes[0] & 0x80, 0x80);
                assert_eq!(usize::from(bytes[0] & 0x7F), bytes.len() - 1);
            }
        }
    }

    #[test]
    fn long_form_bytes() {
        assert_eq!(encode(Length::Definite(127)), vec![0x7F]);
        assert_eq!(encode(Length::Definite(128)), vec![0x81, 0x80]);
        assert_eq!(encode(Length::Definite(255)), vec![0x81, 0xFF]);
        assert_eq!(encode(Length::Definite(65535)), vec![0x82, 0xFF, 0xFF]);
        assert_eq!(
            encode(Length::Definite(16_777_215)),
            vec![0x83, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn indefinite_form() {
        assert_eq!(encode(Length::Indefinite), vec![0x80]);
        let mut input: &[u8] = &[0x80];
        assert_eq!(
            Length::decode_self_delimited(&mut input).unwrap(),
            Length::Indefinite
        );
    }

    #[test]
    fn accepts_non_minimal_long_form() {
        let mut input: &[u8] = &[0x82, 0x00, 0x05];
        assert_eq!(
            Length::decode_self_delimited(&mut input).unwrap(),
            Length::Definite(5)
        );
    }

    #[test]
    fn truncated_and_reserved_forms_fail() {
        let mut truncated: &[u8] = &[0x82, 0x01];
        assert!(matches!(
            Length::decode_self_delimited(&mut truncated),
            Err(BerError::InvalidLength(_))
        ));

        let mut reserved: &[u8] = &[0xFF];
        assert!(matches!(
            Length::decode_self_delimited(&mut reserved),
            Err(BerError::InvalidLength(_))
        ));

        let mut empty: &[u8] = &[];
        assert!(matches!(
            Length::decode_self_delimited(&mut empty),
            Err(BerError::InvalidLength(_))
        ));

        let mut oversized: &[u8] = &[0x89, 1, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(Length::decode_self_delimited(&mut oversized).is_err());
    }
}
