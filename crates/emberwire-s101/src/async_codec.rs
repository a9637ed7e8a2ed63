//! `tokio_util` codec over the S101 stream decoder.

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{encode_frame, FrameConfig};
use crate::decoder::StreamDecoder;
use crate::error::{FrameError, Result};
use crate::message::Message;

/// Frames S101 payloads for `FramedRead` / `FramedWrite`.
///
/// Decoding yields raw frame payloads; parse them with
/// [`Message::parse`]. Encoding accepts raw payloads or whole messages.
#[derive(Debug)]
pub struct S101Codec {
    decoder: StreamDecoder,
    config: FrameConfig,
}

impl S101Codec {
    pub fn new() -> Self {
        Self::with_config(FrameConfig::default())
    }

    pub fn with_config(config: FrameConfig) -> Self {
        Self {
            decoder: StreamDecoder::with_config(&config),
            config,
        }
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    fn check_size(&self, len: usize) -> Result<()> {
        if len > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: len,
                max: self.config.max_payload_size,
            });
        }
        Ok(())
    }
}

impl Default for S101Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for S101Codec {
    type Item = Bytes;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        let mut consumed = 0;
        let mut frame = None;
        for &byte in src.iter() {
            consumed += 1;
            if let Some(payload) = self.decoder.decode_byte(byte) {
                frame = Some(payload);
                break;
            }
        }
        src.advance(consumed);
        Ok(frame)
    }
}

impl<'a> Encoder<&'a [u8]> for S101Codec {
    type Error = FrameError;

    fn encode(&mut self, payload: &'a [u8], dst: &mut BytesMut) -> Result<()> {
        self.check_size(payload.len())?;
        encode_frame(payload, dst);
        Ok(())
    }
}

impl Encoder<Bytes> for S101Codec {
    type Error = FrameError;

    fn encode(&mut self, payload: Bytes, dst: &mut BytesMut) -> Result<()> {
        Encoder::<&[u8]>::encode(self, payload.as_ref(), dst)
    }
}

impl Encoder<Message> for S101Codec {
    type Error = FrameError;

    fn encode(&mut self, message: Message, dst: &mut BytesMut) -> Result<()> {
        let payload = message.to_bytes()?;
        Encoder::<&[u8]>::encode(self, payload.as_ref(), dst)
    }
}
