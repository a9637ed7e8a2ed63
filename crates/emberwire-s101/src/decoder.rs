use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::codec::{FrameConfig, BOF, CE, EOF, XOR};
use crate::crc::FrameCrc;

const CRC_SIZE: usize = 2;
const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Incremental S101 frame decoder.
///
/// Bytes may be fed one at a time or in runs of any size; every complete
/// frame whose checksum holds is delivered as soon as its end marker is
/// read. Frames that are too short, fail the checksum, or grow past
/// `max_payload_size` are dropped without an error and the decoder starts
/// over.
///
/// A decoder keeps no state across frames. Use one instance per stream.
#[derive(Debug)]
pub struct StreamDecoder {
    bytes: BytesMut,
    escape: bool,
    crc: FrameCrc,
    discarding: bool,
    max_payload_size: usize,
}

impl StreamDecoder {
    /// Create a decoder with default configuration.
    pub fn new() -> Self {
        Self::with_config(&FrameConfig::default())
    }

    /// Create a decoder with explicit configuration.
    pub fn with_config(config: &FrameConfig) -> Self {
        Self {
            bytes: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            escape: false,
            crc: FrameCrc::new(),
            discarding: false,
            max_payload_size: config.max_payload_size,
        }
    }

    /// Feed one byte; returns the payload when it completes a valid frame.
    pub fn decode_byte(&mut self, byte: u8) -> Option<Bytes> {
        if self.escape {
            self.escape = false;
            self.push(byte ^ XOR);
            return None;
        }

        match byte {
            BOF => {
                self.reset();
                None
            }
            CE => {
                self.escape = true;
                None
            }
            EOF => self.finish_frame(),
            _ => {
                self.push(byte);
                None
            }
        }
    }

    /// Feed one byte, invoking `callback` with a completed payload.
    pub fn read_byte<F>(&mut self, byte: u8, mut callback: F)
    where
        F: FnMut(&[u8]),
    {
        self.read_byte_with_state(byte, &mut callback, |callback, payload| callback(payload));
    }

    /// Feed a run of bytes, invoking `callback` once per completed payload.
    pub fn read<F>(&mut self, bytes: &[u8], mut callback: F)
    where
        F: FnMut(&[u8]),
    {
        self.read_with_state(bytes, &mut callback, |callback, payload| callback(payload));
    }

    /// Like [`read_byte`](Self::read_byte), threading `state` through to
    /// the callback.
    pub fn read_byte_with_state<S, F>(&mut self, byte: u8, state: &mut S, mut callback: F)
    where
        F: FnMut(&mut S, &[u8]),
    {
        if let Some(payload) = self.decode_byte(byte) {
            callback(state, &payload);
        }
    }

    /// Like [`read`](Self::read), threading `state` through to the callback.
    pub fn read_with_state<S, F>(&mut self, bytes: &[u8], state: &mut S, mut callback: F)
    where
        F: FnMut(&mut S, &[u8]),
    {
        for &byte in bytes {
            if let Some(payload) = self.decode_byte(byte) {
                callback(state, &payload);
            }
        }
    }

    /// Drop any partial frame.
    pub fn reset(&mut self) {
        self.bytes.clear();
        self.escape = false;
        self.crc.reset();
        self.discarding = false;
    }

    /// True when no partial frame is buffered.
    pub fn is_idle(&self) -> bool {
        self.bytes.is_empty() && !self.escape && !self.discarding
    }

    pub fn max_payload_size(&self) -> usize {
        self.max_payload_size
    }

    /// Update the maximum payload size for subsequent frames.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.max_payload_size = max_payload_size;
    }

    fn push(&mut self, byte: u8) {
        if self.discarding {
            return;
        }
        if self.bytes.len() >= self.max_payload_size.saturating_add(CRC_SIZE) {
            debug!(
                max = self.max_payload_size,
                "s101 frame exceeds max payload, discarding"
            );
            self.bytes.clear();
            self.discarding = true;
            return;
        }
        self.bytes.put_u8(byte);
        self.crc.add(byte);
    }

    fn finish_frame(&mut self) -> Option<Bytes> {
        let len = self.bytes.len();
        let payload = if self.discarding {
            None
        } else if len <= CRC_SIZE {
            debug!(len, "s101 frame too short, dropping");
            None
        } else if !self.crc.is_valid() {
            debug!(
                len,
                crc = self.crc.register(),
                "s101 frame checksum mismatch, dropping"
            );
            None
        } else {
            let mut payload = self.bytes.split_to(len).freeze();
            payload.truncate(len - CRC_SIZE);
            Some(payload)
        };
        self.reset();
        payload
    }
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}
