//! Ember+ wire stack.
//!
//! # Crate Structure
//!
//! - [`ber`]: BER tag/length/value codec and byte buffers
//! - [`glow`]: Object tree (DOM) and typed Glow element views
//! - [`s101`]: Byte-stuffed stream framing with CRC validation
//!
//! [`encode_glow`] and [`GlowStream`] connect the layers: a tree goes out as
//! framed bytes, and raw bytes come back as decoded trees.

/// Re-export BER codec types.
pub mod ber {
    pub use emberwire_ber::*;
}

/// Re-export object tree types.
pub mod glow {
    pub use emberwire_glow::*;
}

/// Re-export framing types.
pub mod s101 {
    pub use emberwire_s101::*;
}

pub mod error;
pub mod stream;

pub use error::{Error, Result};
pub use stream::{encode_glow, encode_glow_packets, encode_message, GlowEvent, GlowStream};
