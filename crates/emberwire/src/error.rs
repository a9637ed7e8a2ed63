/// Errors that can occur while moving Glow trees over S101.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Object tree encode/decode error.
    #[error("glow error: {0}")]
    Dom(#[from] emberwire_glow::DomError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] emberwire_s101::FrameError),

    /// Malformed S101 message header.
    #[error("message error: {0}")]
    Message(#[from] emberwire_s101::MessageError),
}

pub type Result<T> = std::result::Result<T, Error>;
