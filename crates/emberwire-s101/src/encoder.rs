use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::{needs_escape, BOF, CE, EOF, XOR};
use crate::crc::FrameCrc;

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Incremental S101 frame encoder.
///
/// [`append`](Self::append) opens a frame on first use and may be called
/// any number of times; [`finish`](Self::finish) writes the checksum trailer
/// and closes it. Several frames can accumulate in one encoder before the
/// output is taken.
#[derive(Debug)]
pub struct StreamEncoder {
    bytes: BytesMut,
    crc: FrameCrc,
    open: bool,
}

impl StreamEncoder {
    pub fn new() -> Self {
        Self::with_buffer(BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY))
    }

    /// Encode into an existing buffer, appending after its current contents.
    pub fn with_buffer(bytes: BytesMut) -> Self {
        Self {
            bytes,
            crc: FrameCrc::new(),
            open: false,
        }
    }

    /// Append payload bytes to the current frame.
    pub fn append(&mut self, payload: &[u8]) {
        self.open_frame();
        self.bytes.reserve(payload.len() + payload.len() / 8);
        for &byte in payload {
            self.crc.add(byte);
            self.put_escaped(byte);
        }
    }

    /// Close the current frame. An empty frame is written if none is open.
    pub fn finish(&mut self) {
        self.open_frame();
        let [lo, hi] = self.crc.trailer();
        self.put_escaped(lo);
        self.put_escaped(hi);
        self.bytes.put_u8(EOF);
        self.crc.reset();
        self.open = false;
    }

    /// Encoded output so far, including any unfinished frame.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Take the encoded output, leaving the encoder empty.
    pub fn take(&mut self) -> Bytes {
        self.reset_state();
        self.bytes.split().freeze()
    }

    /// Discard all output and any unfinished frame.
    pub fn reset(&mut self) {
        self.bytes.clear();
        self.reset_state();
    }

    pub fn into_inner(self) -> BytesMut {
        self.bytes
    }

    fn open_frame(&mut self) {
        if !self.open {
            self.bytes.put_u8(BOF);
            self.crc.reset();
            self.open = true;
        }
    }

    fn reset_state(&mut self) {
        self.crc.reset();
        self.open = false;
    }

    fn put_escaped(&mut self, byte: u8) {
        if needs_escape(byte) {
            self.bytes.put_u8(CE);
            self.bytes.put_u8(byte ^ XOR);
        } else {
            self.bytes.put_u8(byte);
        }
    }
}

impl Default for StreamEncoder {
    fn default() -> Self {
        Self::new()
    }
}
