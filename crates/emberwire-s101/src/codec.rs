use bytes::BytesMut;

use crate::encoder::StreamEncoder;

/// Begin of frame.
pub const BOF: u8 = 0xFE;

/// End of frame.
pub const EOF: u8 = 0xFF;

/// Escape marker; the following byte is XORed with [`XOR`].
pub const CE: u8 = 0xFD;

/// Mask applied to escaped bytes.
pub const XOR: u8 = 0x20;

/// Lowest byte value the encoder escapes. Covers all three markers.
pub const INVALID: u8 = 0xF8;

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Whether `byte` must be escaped on the wire.
#[inline]
pub fn needs_escape(byte: u8) -> bool {
    byte >= INVALID
}

/// Frame `payload` into `dst`.
///
/// Wire format:
/// ```text
/// ┌──────┬─────────────────────┬────────────────────┬──────┐
/// │ 0xFE │ payload (escaped)   │ !CRC LE (escaped)  │ 0xFF │
/// └──────┴─────────────────────┴────────────────────┴──────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) {
    let mut encoder = StreamEncoder::with_buffer(std::mem::take(dst));
    encoder.append(payload);
    encoder.finish();
    *dst = encoder.into_inner();
}

/// Configuration for frame decoding and message reassembly.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum unescaped payload of a single frame. Default: 16 MiB.
    pub max_payload_size: usize,
    /// Maximum size of a reassembled multi-packet message. Default: 16 MiB.
    pub max_message_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            max_message_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}
