use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use emberwire_glow::{Dom, NodeId};
use emberwire_s101::{
    encode_frame, Body, FrameConfig, FrameError, Message, MessageError, PacketAssembler,
    StreamDecoder,
};
use tracing::{debug, trace};

use crate::error::Result;

/// Slot used for outgoing messages.
const DEFAULT_SLOT: u8 = 0;

const READ_CHUNK_SIZE: usize = 4096;

/// Frame one S101 message.
pub fn encode_message(message: &Message) -> Result<BytesMut> {
    let payload = message.to_bytes()?;
    let mut dst = BytesMut::with_capacity(payload.len() + payload.len() / 8 + 4);
    encode_frame(&payload, &mut dst);
    Ok(dst)
}

/// Encode the tree at `root` as a single framed EmberData message.
pub fn encode_glow(dom: &Dom, root: NodeId) -> Result<BytesMut> {
    let glow = dom.to_bytes(root)?;
    encode_message(&Message::ember_data(DEFAULT_SLOT, glow))
}

/// Encode the tree at `root`, splitting it into packets of at most
/// `packet_size` payload bytes. All frames land in one buffer.
pub fn encode_glow_packets(dom: &Dom, root: NodeId, packet_size: usize) -> Result<BytesMut> {
    let glow = dom.to_bytes(root)?;
    let mut dst = BytesMut::new();
    for message in Message::split_ember_data(DEFAULT_SLOT, &glow, packet_size) {
        encode_frame(&message.to_bytes()?, &mut dst);
    }
    Ok(dst)
}

/// Something that arrived on a [`GlowStream`].
#[derive(Debug)]
pub enum GlowEvent {
    /// A complete Glow message, decoded into its own arena.
    Tree { slot: u8, dom: Dom, root: NodeId },
    KeepAliveRequest { slot: u8 },
    KeepAliveResponse { slot: u8 },
}

/// Inbound side of an Ember+ connection.
///
/// Raw transport bytes go in; decoded trees and keep-alive events come out.
/// Corrupt frames vanish in the framing layer, unknown S101 commands and
/// non-Glow payloads are skipped, and anything else that fails to parse is
/// reported as an error without stopping the stream.
#[derive(Debug)]
pub struct GlowStream {
    decoder: StreamDecoder,
    assembler: PacketAssembler,
}

impl GlowStream {
    pub fn new() -> Self {
        Self::with_config(&FrameConfig::default())
    }

    pub fn with_config(config: &FrameConfig) -> Self {
        Self {
            decoder: StreamDecoder::with_config(config),
            assembler: PacketAssembler::with_config(config),
        }
    }

    /// Feed raw bytes, returning events completed by them in order.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Result<GlowEvent>> {
        let mut events = Vec::new();
        for &byte in bytes {
            if let Some(frame) = self.decoder.decode_byte(byte) {
                if let Some(event) = self.handle_frame(frame) {
                    events.push(event);
                }
            }
        }
        events
    }

    /// Read from `reader` until at least one event completes (blocking).
    ///
    /// Returns `Err(Error::Frame(FrameError::ConnectionClosed))` at end of
    /// input.
    pub fn read_events<R: Read>(&mut self, reader: &mut R) -> Result<Vec<Result<GlowEvent>>> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            let read = match reader.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err).into()),
            };
            if read == 0 {
                return Err(FrameError::ConnectionClosed.into());
            }

            let events = self.feed(&chunk[..read]);
            if !events.is_empty() {
                return Ok(events);
            }
        }
    }

    /// Drop any partial frame or partial multi-packet message.
    pub fn reset(&mut self) {
        self.decoder.reset();
        self.assembler.reset();
    }

    fn handle_frame(&mut self, frame: bytes::Bytes) -> Option<Result<GlowEvent>> {
        let message = match Message::parse(frame) {
            Ok(message) => message,
            Err(MessageError::UnknownCommand(command)) => {
                debug!(command, "s101 unknown command, skipping");
                return None;
            }
            Err(err) => return Some(Err(err.into())),
        };

        let slot = message.slot;
        match message.body {
            Body::KeepAliveRequest => Some(Ok(GlowEvent::KeepAliveRequest { slot })),
            Body::KeepAliveResponse => Some(Ok(GlowEvent::KeepAliveResponse { slot })),
            Body::EmberData(data) => {
                if !data.is_glow() {
                    debug!(dtd = data.dtd, "s101 payload is not glow, skipping");
                    return None;
                }
                let payload = self.assembler.push(&data)?;
                if payload.is_empty() {
                    trace!(slot, "empty glow message");
                    return None;
                }
                Some(
                    Dom::decode(&payload)
                        .map(|(dom, root)| GlowEvent::Tree { slot, dom, root })
                        .map_err(Into::into),
                )
            }
        }
    }
}

impl Default for GlowStream {
    fn default() -> Self {
        Self::new()
    }
}
