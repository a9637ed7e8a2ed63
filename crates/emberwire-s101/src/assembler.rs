use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::codec::FrameConfig;
use crate::message::{EmberData, PacketFlags};

/// Joins multi-packet EmberData messages back into one payload.
///
/// Packets must arrive in order. A first packet while a message is in
/// progress, a continuation without a first packet, or a message that
/// grows past `max_message_size` discards the partial message.
#[derive(Debug)]
pub struct PacketAssembler {
    buf: BytesMut,
    in_progress: bool,
    max_message_size: usize,
}

impl PacketAssembler {
    pub fn new() -> Self {
        Self::with_config(&FrameConfig::default())
    }

    pub fn with_config(config: &FrameConfig) -> Self {
        Self {
            buf: BytesMut::new(),
            in_progress: false,
            max_message_size: config.max_message_size,
        }
    }

    /// Add one packet; returns the full payload when `data` completes it.
    pub fn push(&mut self, data: &EmberData) -> Option<Bytes> {
        let payload: &[u8] = if data.flags.contains(PacketFlags::EMPTY) {
            &[]
        } else {
            &data.payload
        };

        if data.flags.is_first() {
            if self.in_progress {
                debug!(
                    buffered = self.buf.len(),
                    "s101 first packet while reassembling, restarting"
                );
            }
            self.reset();
            if data.flags.is_last() {
                return Some(data.payload.slice(..payload.len()));
            }
            self.in_progress = true;
        } else if !self.in_progress {
            debug!(flags = %data.flags, "s101 continuation packet without first, dropping");
            return None;
        }

        if self.buf.len() + payload.len() > self.max_message_size {
            debug!(
                size = self.buf.len() + payload.len(),
                max = self.max_message_size,
                "s101 message exceeds max size, discarding"
            );
            self.reset();
            return None;
        }
        self.buf.extend_from_slice(payload);

        if data.flags.is_last() {
            self.in_progress = false;
            return Some(self.buf.split().freeze());
        }
        None
    }

    /// Whether a multi-packet message is partially buffered.
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Drop any partial message.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.in_progress = false;
    }
}

impl Default for PacketAssembler {
    fn default() -> Self {
        Self::new()
    }
}
