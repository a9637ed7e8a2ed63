//! S101 stream framing for Ember+.
//!
//! Every message travels as one frame:
//! - A `0xFE` start marker and a `0xFF` end marker
//! - Byte stuffing: every byte `>= 0xF8` becomes `0xFD, byte ^ 0x20`
//! - A CRC-16/X.25 trailer, checked against the `0xF0B8` residue
//!
//! [`StreamDecoder`] recovers payloads from arbitrarily chunked input and
//! silently drops corrupt frames. [`Message`] and [`PacketAssembler`] handle
//! the S101 header and multi-packet reassembly on top of it.

#[cfg(feature = "async")]
pub mod async_codec;
pub mod assembler;
pub mod codec;
pub mod crc;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod message;
pub mod reader;
pub mod writer;

pub use assembler::PacketAssembler;
#[cfg(feature = "async")]
pub use async_codec::S101Codec;
pub use codec::{
    encode_frame, needs_escape, FrameConfig, BOF, CE, DEFAULT_MAX_PAYLOAD, EOF, INVALID, XOR,
};
pub use crc::{crc16, FrameCrc, CRC_INITIAL, CRC_RESIDUE};
pub use decoder::StreamDecoder;
pub use encoder::StreamEncoder;
pub use error::{FrameError, MessageError, Result};
pub use message::{
    Body, Command, EmberData, Message, PacketFlags, DEFAULT_PACKET_PAYLOAD, DTD_GLOW,
    GLOW_DTD_VERSION, MESSAGE_TYPE_EMBER, VERSION,
};
pub use reader::FrameReader;
pub use writer::FrameWriter;
