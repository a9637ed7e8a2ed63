use std::fmt;

use crate::base128::{self, Base128Error};
use crate::buffer::ByteSink;
use crate::codec::{take, Decode, Encode};
use crate::error::{BerError, Result};
use crate::tag::{types, Tag};

/// A RELATIVE-OID: a sequence of arcs, each encoded base-128.
///
/// Ember+ uses these as numeric paths to elements in a provider's tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelativeOid(Vec<u32>);

impl RelativeOid {
    pub fn new(arcs: impl Into<Vec<u32>>) -> Self {
        Self(arcs.into())
    }

    pub fn arcs(&self) -> &[u32] {
        &self.0
    }

    pub fn push(&mut self, arc: u32) {
        self.0.push(arc);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u32>> for RelativeOid {
    fn from(arcs: Vec<u32>) -> Self {
        Self(arcs)
    }
}

impl fmt::Display for RelativeOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_dotted(f, &self.0)
    }
}

impl Encode for RelativeOid {
    const UNIVERSAL_TAG: Tag = Tag::universal(types::RELATIVE_OBJECT);

    fn encoded_length(&self) -> usize {
        self.0.iter().map(|&arc| base128::encoded_length(arc)).sum()
    }

    fn encode<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()> {
        for &arc in &self.0 {
            base128::encode(out, arc)?;
        }
        Ok(())
    }
}

impl Decode for RelativeOid {
    fn decode(input: &mut &[u8], length: usize) -> Result<Self> {
        let mut content = take(input, length)?;
        let mut arcs = Vec::new();
        while !content.is_empty() {
            arcs.push(decode_arc(&mut content, "relative oid")?);
        }
        Ok(Self(arcs))
    }
}

/// An OBJECT IDENTIFIER. The first two arcs share one sub-identifier (40·X + Y).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectIdentifier(Vec<u32>);

impl ObjectIdentifier {
    /// Create an identifier, validating the first two arcs.
    pub fn new(arcs: impl Into<Vec<u32>>) -> Result<Self> {
        let arcs = arcs.into();
        match arcs.as_slice() {
            [first, second, ..] if *first <= 2 => {
                if *first < 2 && *second >= 40 {
                    return Err(BerError::invalid(
                        "object identifier",
                        "second arc must be below 40",
                    ));
                }
                if *first == 2 && *second > u32::MAX - 80 {
                    return Err(BerError::invalid(
                        "object identifier",
                        "second arc too large",
                    ));
                }
                Ok(Self(arcs))
            }
            [_, _, ..] => Err(BerError::invalid(
                "object identifier",
                "first arc must be 0, 1 or 2",
            )),
            _ => Err(BerError::invalid(
                "object identifier",
                "at least two arcs are required",
            )),
        }
    }

    pub fn arcs(&self) -> &[u32] {
        &self.0
    }

    fn leading_subidentifier(&self) -> u32 {
        self.0[0] * 40 + self.0[1]
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_dotted(f, &self.0)
    }
}

impl Encode for ObjectIdentifier {
    const UNIVERSAL_TAG: Tag = Tag::universal(types::OBJECT_IDENTIFIER);

    fn encoded_length(&self) -> usize {
        base128::encoded_length(self.leading_subidentifier())
            + self.0[2..]
                .iter()
                .map(|&arc| base128::encoded_length(arc))
                .sum::<usize>()
    }

    fn encode<S: ByteSink + ?Sized>(&self, out: &mut S) -> Result<()> {
        base128::encode(out, self.leading_subidentifier())?;
        for &arc in &self.0[2..] {
            base128::encode(out, arc)?;
        }
        Ok(())
    }
}

impl Decode for ObjectIdentifier {
    fn decode(input: &mut &[u8], length: usize) -> Result<Self> {
        let mut content = take(input, length)?;
        if content.is_empty() {
            return Err(BerError::invalid("object identifier", "empty content"));
        }

        let leading = decode_arc(&mut content, "object identifier")?;
        let mut arcs = match leading {
            0..=39 => vec![0, leading],
            40..=79 => vec![1, leading - 40],
            _ => vec![2, leading - 80],
        };
        while !content.is_empty() {
            arcs.push(decode_arc(&mut content, "object identifier")?);
        }
        Ok(Self(arcs))
    }
}

fn decode_arc(content: &mut &[u8], kind: &'static str) -> Result<u32> {
    base128::decode(content).map_err(|err| match err {
        Base128Error::Truncated => BerError::invalid(kind, "truncated sub-identifier"),
        Base128Error::NonMinimal => BerError::invalid(kind, "padded sub-identifier"),
        Base128Error::Overflow => BerError::invalid(kind, "sub-identifier exceeds 32 bits"),
    })
}

fn write_dotted(f: &mut fmt::Formatter<'_>, arcs: &[u32]) -> fmt::Result {
    for (i, arc) in arcs.iter().enumerate() {
        if i > 0 {
            f.write_str(".")?;
        }
        write!(f, "{arc}")?;
    }
    Ok(())
}
