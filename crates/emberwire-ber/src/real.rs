//! Binary REAL encoding (ITU-T X.690 8.5) for `f64`.
//!
//! Finite values are written base 2 as `sign × mantissa × 2^exponent` with an
//! odd mantissa and a minimal two's-complement exponent, so every `f64`
//! round-trips bit-exactly.

use crate::buffer::ByteSink;
use crate::codec::{decode_signed, encode_signed, signed_length, take, Decode, Encode};
use crate::error::{BerError, Result};
use crate::tag::{types, Tag};

const BINARY: u8 = 0x80;
const NEGATIVE: u8 = 0x40;
const PLUS_INFINITY: u8 = 0x40;
const MINUS_INFINITY: u8 = 0x41;
const NOT_A_NUMBER: u8 = 0x42;
const MINUS_ZERO: u8 = 0x43;

const KIND: &str = "real";

struct Parts {
    negative: bool,
    mantissa: u64,
    exponent: i64,
}

fn split(value: f64) -> Parts {
    let bits = value.to_bits();
    let negative = bits >> 63 != 0;
    let biased = ((bits >> 52) & 0x7FF) as i64;
    let fraction = bits & ((1u64 << 52) - 1);

    let (mut mantissa, mut exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };

    let shift = mantissa.trailing_zeros();
    mantissa >>= shift;
    exponent += i64::from(shift);

    Parts {
        negative,
        mantissa,
        exponent,
    }
}

fn unsigned_length(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(8).max(1)
}

impl Encode for f64 {
    const UNIVERSAL_TAG: Tag = Tag::universal(types::REAL);

    fn encoded_length(&self) -> usize {
        if *self == 0.0 {
            return if self.is_sign_negative() { 1 } else { 0 };
        }
        if !self.is_finite() {
            return 1;
        }
        let parts = split(*self);
        1 + signed_length(parts.exponent) + unsigned_length(parts.mantissa)
    }

    fn encode<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()> {
        let value = *self;
        if value == 0.0 {
            return if value.is_sign_negative() {
                out.push(MINUS_ZERO)
            } else {
                Ok(())
            };
        }
        if value.is_nan() {
            return out.push(NOT_A_NUMBER);
        }
        if value.is_infinite() {
            return out.push(if value > 0.0 {
                PLUS_INFINITY
            } else {
                MINUS_INFINITY
            });
        }

        let parts = split(value);
        let exponent_len = signed_length(parts.exponent);
        let mut lead = BINARY | (exponent_len as u8 - 1);
        if parts.negative {
            lead |= NEGATIVE;
        }

        out.push(lead)?;
        encode_signed(out, parts.exponent)?;
        let be = parts.mantissa.to_be_bytes();
        out.push_slice(&be[be.len() - unsigned_length(parts.mantissa)..])
    }
}

impl Decode for f64 {
    fn decode(input: &mut &[u8], length: usize) -> Result<Self> {
        let content = take(input, length)?;
        let Some((&lead, rest)) = content.split_first() else {
            return Ok(0.0);
        };

        if lead & BINARY == 0 {
            return decode_special(lead, rest);
        }

        let negative = lead & NEGATIVE != 0;
        let base_bits: i64 = match (lead >> 4) & 0x03 {
            0 => 1,
            1 => 3,
            2 => 4,
            _ => return Err(BerError::invalid(KIND, "reserved base")),
        };
        let scale = i64::from((lead >> 2) & 0x03);

        let (exponent_len, rest) = match lead & 0x03 {
            3 => match rest.split_first() {
                Some((&len, rest)) => (usize::from(len), rest),
                None => return Err(BerError::invalid(KIND, "missing exponent length")),
            },
            format => (usize::from(format) + 1, rest),
        };
        if exponent_len == 0 || exponent_len > 4 || rest.len() < exponent_len {
            return Err(BerError::invalid(KIND, "exponent out of range"));
        }

        let (exponent, mantissa) = rest.split_at(exponent_len);
        let exponent = decode_signed(exponent, KIND)?;

        if mantissa.is_empty() {
            return Err(BerError::invalid(KIND, "missing mantissa"));
        }
        let significant = mantissa.iter().skip_while(|&&b| b == 0).count();
        if significant > 8 {
            return Err(BerError::invalid(KIND, "mantissa exceeds 64 bits"));
        }
        let mantissa = mantissa
            .iter()
            .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte));

        let value = scale_by_power_of_two(mantissa as f64, exponent * base_bits + scale);
        Ok(if negative { -value } else { value })
    }
}

fn decode_special(lead: u8, rest: &[u8]) -> Result<f64> {
    if !rest.is_empty() {
        return Err(BerError::invalid(KIND, "special value with trailing bytes"));
    }
    match lead {
        PLUS_INFINITY => Ok(f64::INFINITY),
        MINUS_INFINITY => Ok(f64::NEG_INFINITY),
        NOT_A_NUMBER => Ok(f64::NAN),
        MINUS_ZERO => Ok(-0.0),
        _ => Err(BerError::invalid(KIND, "decimal encoding is not supported")),
    }
}

/// `value × 2^exponent` without intermediate overflow or underflow.
///
/// `value` is a mantissa below 2^64, so exponents outside the clamp range
/// saturate to infinity or zero either way.
fn scale_by_power_of_two(mut value: f64, exponent: i64) -> f64 {
    if value == 0.0 {
        return value;
    }
    let mut exponent = exponent.clamp(-1200, 1200);
    let max_step = f64::from_bits(0x7FE0_0000_0000_0000); // 2^1023
    let min_step = f64::from_bits(0x0010_0000_0000_0000); // 2^-1022

    while exponent > 1023 {
        value *= max_step;
        exponent -= 1023;
        if value.is_infinite() {
            return value;
        }
    }
    while exponent < -1022 {
        value *= min_step;
        exponent += 1022;
        if value == 0.0 {
            return value;
        }
    }
    value * f64::from_bits(((exponent + 1023) as u64) << 52)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, encode, encoded_length};

    fn roundtrip(value: f64) -> (f64, Vec<u8>) {
        let mut out = Vec::new();
        encode(&mut out, &value).unwrap();
        assert_eq!(out.len(), encoded_length(&value));
        let mut input = out.as_slice();
        let decoded = decode::<f64>(&mut input, out.len()).unwrap();
        assert!(input.is_empty());
        (decoded, out)
    }

    #[test]
    fn bit_exact_roundtrip() {
        let values = [
            1.0,
            -1.0,
            0.5,
            3.25,
            -1234.5678,
            std::f64::consts::PI,
            f64::MAX,
            f64::MIN,
            f64::MIN_POSITIVE,
            f64::EPSILON,
            5e-324,
            1e300,
            -2.5e-310,
        ];
        for value in values {
            let (decoded, _) = roundtrip(value);
            assert_eq!(decoded.to_bits(), value.to_bits(), "roundtrip of {value:e}");
        }
    }

    #[test]
    fn special_values() {
        assert!(roundtrip(0.0).1.is_empty());
        assert_eq!(roundtrip(-0.0).1, vec![MINUS_ZERO]);
        assert!(roundtrip(-0.0).0.is_sign_negative());
        assert_eq!(roundtrip(f64::INFINITY).1, vec![PLUS_INFINITY]);
        assert_eq!(roundtrip(f64::NEG_INFINITY).1, vec![MINUS_INFINITY]);
        assert!(roundtrip(f64::NAN).0.is_nan());
    }

    #[test]
    fn one_encodes_with_unit_mantissa() {
        // 1.0 = 1 × 2^0
        assert_eq!(roundtrip(1.0).1, vec![0x80, 0x00, 0x01]);
        // -0.5 = -1 × 2^-1
        assert_eq!(roundtrip(-0.5).1, vec![0xC0, 0xFF, 0x01]);
    }

    #[test]
    fn decodes_base_16_and_scale_factor() {
        // base 16, F = 1, exponent 1, mantissa 3 => 3 × 2 × 16 = 96
        let bytes = [0xA4, 0x01, 0x03];
        let mut input = &bytes[..];
        assert_eq!(decode::<f64>(&mut input, 3).unwrap(), 96.0);
    }

    #[test]
    fn extreme_exponents_saturate() {
        // base 16, four-byte exponent 0x7FFFFFFF
        let mut zero_mantissa: &[u8] = &[0xA3, 0x04, 0x7F, 0xFF, 0xFF, 0xFF, 0x00];
        assert_eq!(decode::<f64>(&mut zero_mantissa, 7).unwrap(), 0.0);

        let mut huge: &[u8] = &[0xA3, 0x04, 0x7F, 0xFF, 0xFF, 0xFF, 0x01];
        assert_eq!(decode::<f64>(&mut huge, 7).unwrap(), f64::INFINITY);

        let mut tiny: &[u8] = &[0xE3, 0x04, 0x80, 0x00, 0x00, 0x00, 0x01];
        let value = decode::<f64>(&mut tiny, 7).unwrap();
        assert_eq!(value, 0.0);
        assert!(value.is_sign_negative());
    }

    #[test]
    fn rejects_malformed_content() {
        let mut decimal: &[u8] = &[0x01, b'1'];
        assert!(decode::<f64>(&mut decimal, 2).is_err());

        let mut no_mantissa: &[u8] = &[0x80, 0x00];
        assert!(decode::<f64>(&mut no_mantissa, 2).is_err());

        let mut reserved_base: &[u8] = &[0xB0, 0x00, 0x01];
        assert!(decode::<f64>(&mut reserved_base, 3).is_err());
    }
}
