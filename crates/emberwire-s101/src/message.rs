//! The S101 message header carried inside each frame.
//!
//! ```text
//! ┌──────┬──────┬─────────┬─────────┬───────┬─────┬───────┬───────────┬─────────┐
//! │ slot │ 0x0E │ command │ version │ flags │ dtd │ count │ app bytes │ payload │
//! └──────┴──────┴─────────┴─────────┴───────┴─────┴───────┴───────────┴─────────┘
//!                                     └─────────── EmberData only ─────────────┘
//! ```

use std::fmt;
use std::ops::BitOr;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::MessageError;

/// Message type of every Ember+ S101 message.
pub const MESSAGE_TYPE_EMBER: u8 = 0x0E;

/// Supported S101 protocol version.
pub const VERSION: u8 = 0x01;

/// DTD identifier of Glow payloads.
pub const DTD_GLOW: u8 = 0x01;

/// Glow DTD version announced in application bytes (minor, major).
pub const GLOW_DTD_VERSION: [u8; 2] = [0x1F, 0x02];

/// Payload size per packet when splitting large messages.
pub const DEFAULT_PACKET_PAYLOAD: usize = 1024;

const COMMON_HEADER_SIZE: usize = 4;
const EMBER_HEADER_SIZE: usize = COMMON_HEADER_SIZE + 3;

/// S101 command byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    EmberData,
    KeepAliveRequest,
    KeepAliveResponse,
}

impl Command {
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0x00 => Command::EmberData,
            0x01 => Command::KeepAliveRequest,
            0x02 => Command::KeepAliveResponse,
            _ => return None,
        })
    }

    pub fn code(self) -> u8 {
        match self {
            Command::EmberData => 0x00,
            Command::KeepAliveRequest => 0x01,
            Command::KeepAliveResponse => 0x02,
        }
    }
}

/// Packet flags of an EmberData message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PacketFlags(u8);

impl PacketFlags {
    pub const FIRST: Self = Self(0x80);
    pub const LAST: Self = Self(0x40);
    /// A message that fits in one packet.
    pub const SINGLE: Self = Self(0xC0);
    /// The packet carries no payload.
    pub const EMPTY: Self = Self(0x20);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_first(self) -> bool {
        self.contains(Self::FIRST)
    }

    pub const fn is_last(self) -> bool {
        self.contains(Self::LAST)
    }
}

impl BitOr for PacketFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for PacketFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// Body of an EmberData message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmberData {
    pub flags: PacketFlags,
    pub dtd: u8,
    pub app_bytes: Bytes,
    pub payload: Bytes,
}

impl EmberData {
    /// A Glow packet with the default application bytes.
    pub fn glow(flags: PacketFlags, payload: impl Into<Bytes>) -> Self {
        Self {
            flags,
            dtd: DTD_GLOW,
            app_bytes: Bytes::from_static(&GLOW_DTD_VERSION),
            payload: payload.into(),
        }
    }

    pub fn is_glow(&self) -> bool {
        self.dtd == DTD_GLOW
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    EmberData(EmberData),
    KeepAliveRequest,
    KeepAliveResponse,
}

/// One S101 message, the unescaped content of one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub slot: u8,
    pub body: Body,
}

impl Message {
    /// A single-packet Glow message.
    pub fn ember_data(slot: u8, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        let flags = if payload.is_empty() {
            PacketFlags::SINGLE | PacketFlags::EMPTY
        } else {
            PacketFlags::SINGLE
        };
        Self {
            slot,
            body: Body::EmberData(EmberData::glow(flags, payload)),
        }
    }

    pub fn keep_alive_request(slot: u8) -> Self {
        Self {
            slot,
            body: Body::KeepAliveRequest,
        }
    }

    pub fn keep_alive_response(slot: u8) -> Self {
        Self {
            slot,
            body: Body::KeepAliveResponse,
        }
    }

    /// Split a Glow payload into packets of at most `packet_size` bytes.
    pub fn split_ember_data(slot: u8, payload: &Bytes, packet_size: usize) -> Vec<Self> {
        let packet_size = packet_size.max(1);
        if payload.len() <= packet_size {
            return vec![Self::ember_data(slot, payload.clone())];
        }

        let count = payload.len().div_ceil(packet_size);
        (0..count)
            .map(|index| {
                let start = index * packet_size;
                let end = (start + packet_size).min(payload.len());
                let mut flags = PacketFlags::default();
                if index == 0 {
                    flags = flags | PacketFlags::FIRST;
                }
                if index + 1 == count {
                    flags = flags | PacketFlags::LAST;
                }
                Self {
                    slot,
                    body: Body::EmberData(EmberData::glow(flags, payload.slice(start..end))),
                }
            })
            .collect()
    }

    pub fn command(&self) -> Command {
        match self.body {
            Body::EmberData(_) => Command::EmberData,
            Body::KeepAliveRequest => Command::KeepAliveRequest,
            Body::KeepAliveResponse => Command::KeepAliveResponse,
        }
    }

    pub fn encoded_len(&self) -> usize {
        match &self.body {
            Body::EmberData(data) => EMBER_HEADER_SIZE + data.app_bytes.len() + data.payload.len(),
            _ => COMMON_HEADER_SIZE,
        }
    }

    /// Append the header and payload to `dst`.
    pub fn encode(&self, dst: &mut BytesMut) -> Result<(), MessageError> {
        dst.reserve(self.encoded_len());
        if let Body::EmberData(data) = &self.body {
            if data.app_bytes.len() > usize::from(u8::MAX) {
                return Err(MessageError::AppBytesTooLong(data.app_bytes.len()));
            }
        }

        dst.put_u8(self.slot);
        dst.put_u8(MESSAGE_TYPE_EMBER);
        dst.put_u8(self.command().code());
        dst.put_u8(VERSION);
        if let Body::EmberData(data) = &self.body {
            dst.put_u8(data.flags.bits());
            dst.put_u8(data.dtd);
            dst.put_u8(data.app_bytes.len() as u8);
            dst.put_slice(&data.app_bytes);
            dst.put_slice(&data.payload);
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Bytes, MessageError> {
        let mut dst = BytesMut::with_capacity(self.encoded_len());
        self.encode(&mut dst)?;
        Ok(dst.freeze())
    }

    /// Parse a decoded frame payload.
    pub fn parse(frame: Bytes) -> Result<Self, MessageError> {
        if frame.len() < COMMON_HEADER_SIZE {
            return Err(MessageError::Truncated {
                len: frame.len(),
                needed: COMMON_HEADER_SIZE,
            });
        }
        let slot = frame[0];
        if frame[1] != MESSAGE_TYPE_EMBER {
            return Err(MessageError::UnsupportedMessageType(frame[1]));
        }
        let command = Command::from_code(frame[2]).ok_or(MessageError::UnknownCommand(frame[2]))?;
        if frame[3] != VERSION {
            return Err(MessageError::UnsupportedVersion(frame[3]));
        }

        let body = match command {
            Command::KeepAliveRequest => Body::KeepAliveRequest,
            Command::KeepAliveResponse => Body::KeepAliveResponse,
            Command::EmberData => {
                if frame.len() < EMBER_HEADER_SIZE {
                    return Err(MessageError::Truncated {
                        len: frame.len(),
                        needed: EMBER_HEADER_SIZE,
                    });
                }
                let flags = PacketFlags::from_bits(frame[4]);
                let dtd = frame[5];
                let app_end = EMBER_HEADER_SIZE + usize::from(frame[6]);
                if frame.len() < app_end {
                    return Err(MessageError::Truncated {
                        len: frame.len(),
                        needed: app_end,
                    });
                }
                Body::EmberData(EmberData {
                    flags,
                    dtd,
                    app_bytes: frame.slice(EMBER_HEADER_SIZE..app_end),
                    payload: frame.slice(app_end..),
                })
            }
        };
        Ok(Self { slot, body })
    }
}
