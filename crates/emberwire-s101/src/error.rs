/// Errors that can occur while reading or writing S101 frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A frame passed its checksum but does not hold a valid S101 message.
    #[error("invalid message: {0}")]
    Message(#[from] MessageError),

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

/// Errors raised when parsing the S101 message header.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    #[error("message truncated ({len} bytes, need {needed})")]
    Truncated { len: usize, needed: usize },

    #[error("unsupported message type 0x{0:02X}")]
    UnsupportedMessageType(u8),

    #[error("unknown command 0x{0:02X}")]
    UnknownCommand(u8),

    #[error("unsupported version 0x{0:02X}")]
    UnsupportedVersion(u8),

    /// Application bytes do not fit in the one-byte count field.
    #[error("too many application bytes ({0}, max 255)")]
    AppBytesTooLong(usize),
}

pub type Result<T> = std::result::Result<T, FrameError>;
