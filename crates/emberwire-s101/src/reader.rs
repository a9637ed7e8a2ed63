use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use bytes::Bytes;

use crate::codec::FrameConfig;
use crate::decoder::StreamDecoder;
use crate::error::{FrameError, Result};
use crate::message::Message;

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads validated S101 frames from any `Read` stream.
///
/// Handles partial reads internally. Corrupted frames are skipped the same
/// way [`StreamDecoder`] skips them.
pub struct FrameReader<T> {
    inner: T,
    decoder: StreamDecoder,
    pending: VecDeque<Bytes>,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            decoder: StreamDecoder::with_config(&config),
            pending: VecDeque::new(),
            config,
        }
    }

    /// Read the next valid frame payload (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached.
    pub fn read_frame(&mut self) -> Result<Bytes> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Ok(frame);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            for &byte in &chunk[..read] {
                if let Some(frame) = self.decoder.decode_byte(byte) {
                    self.pending.push_back(frame);
                }
            }
        }
    }

    /// Read the next frame and parse its S101 header.
    pub fn read_message(&mut self) -> Result<Message> {
        let frame = self.read_frame()?;
        Ok(Message::parse(frame)?)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent frame decoding.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
        self.decoder.set_max_payload_size(max_payload_size);
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}
