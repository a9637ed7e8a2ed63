//! Frame checksum: CRC-16/X.25 (CCITT polynomial, reflected, init 0xFFFF).
//!
//! Encoders append the ones complement of the register little-endian;
//! folding those two bytes back in leaves the register at [`CRC_RESIDUE`].

use std::fmt;

use crc16::{State, X_25};

/// Register value at the start of every frame.
pub const CRC_INITIAL: u16 = 0xFFFF;

/// Register value after a valid frame including its checksum trailer.
pub const CRC_RESIDUE: u16 = 0xF0B8;

/// Running checksum of one frame.
pub struct FrameCrc(State<X_25>);

impl FrameCrc {
    pub fn new() -> Self {
        Self(State::new())
    }

    /// Fold one byte into the register.
    #[inline]
    pub fn add(&mut self, byte: u8) {
        self.0.update(&[byte]);
    }

    pub fn update(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    /// Raw register, before the final complement.
    pub fn register(&self) -> u16 {
        !self.0.get()
    }

    /// Checksum trailer as written on the wire.
    pub fn trailer(&self) -> [u8; 2] {
        self.0.get().to_le_bytes()
    }

    /// Whether the bytes so far form a payload followed by its own trailer.
    pub fn is_valid(&self) -> bool {
        self.register() == CRC_RESIDUE
    }

    pub fn reset(&mut self) {
        self.0 = State::new();
    }
}

impl Default for FrameCrc {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrameCrc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameCrc(0x{:04X})", self.register())
    }
}

/// Raw register after folding `bytes` into a fresh register.
pub fn crc16(bytes: &[u8]) -> u16 {
    !State::<X_25>::calculate(bytes)
}
