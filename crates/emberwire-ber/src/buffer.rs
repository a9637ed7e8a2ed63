use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{BerError, Result};

/// Default initial capacity of a [`DynamicBuffer`].
pub const DEFAULT_DYNAMIC_CAPACITY: usize = 256;

/// A destination for encoded bytes.
///
/// Writes either complete or fail; a sink never silently truncates.
pub trait ByteSink {
    /// Append a single byte.
    fn push(&mut self, byte: u8) -> Result<()>;

    /// Append a run of bytes. Nothing is written if the run does not fit.
    fn push_slice(&mut self, bytes: &[u8]) -> Result<()>;

    /// Number of bytes written so far.
    fn len(&self) -> usize;

    /// Returns true if nothing has been written.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A byte buffer over caller-owned memory with a fixed capacity.
///
/// Writing past the end fails with [`BerError::BufferOverflow`].
#[derive(Debug)]
pub struct FixedBuffer<'a> {
    memory: &'a mut [u8],
    position: usize,
}

impl<'a> FixedBuffer<'a> {
    /// Wrap a memory chunk. The write cursor starts at the beginning.
    pub fn new(memory: &'a mut [u8]) -> Self {
        Self {
            memory,
            position: 0,
        }
    }

    /// Total number of bytes the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.memory.len()
    }

    /// Number of bytes that can still be written.
    pub fn remaining(&self) -> usize {
        self.memory.len() - self.position
    }

    /// Returns true if the write cursor reached the end of the memory chunk.
    pub fn is_full(&self) -> bool {
        self.position >= self.memory.len()
    }

    /// Move the write cursor back to the beginning.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// The bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.memory[..self.position]
    }

    fn overflow(&self, additional: usize) -> BerError {
        BerError::BufferOverflow {
            capacity: self.memory.len(),
            requested: self.position + additional,
        }
    }
}

impl ByteSink for FixedBuffer<'_> {
    fn push(&mut self, byte: u8) -> Result<()> {
        if self.is_full() {
            return Err(self.overflow(1));
        }
        self.memory[self.position] = byte;
        self.position += 1;
        Ok(())
    }

    fn push_slice(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.remaining() {
            return Err(self.overflow(bytes.len()));
        }
        let end = self.position + bytes.len();
        self.memory[self.position..end].copy_from_slice(bytes);
        self.position = end;
        Ok(())
    }

    fn len(&self) -> usize {
        self.position
    }
}

/// A byte buffer that grows on demand.
///
/// Growth uses fallible reservation; running out of memory surfaces as
/// [`BerError::Allocation`] instead of aborting.
#[derive(Debug, Default, Clone)]
pub struct DynamicBuffer {
    bytes: Vec<u8>,
}

impl DynamicBuffer {
    /// Create a buffer with the default initial capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_DYNAMIC_CAPACITY)
    }

    /// Create a buffer with an explicit initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Ensure the buffer can hold at least `capacity` bytes without growing.
    pub fn resize(&mut self, capacity: usize) -> Result<()> {
        let additional = capacity.saturating_sub(self.bytes.len());
        self.bytes.try_reserve(additional)?;
        Ok(())
    }

    /// Current allocated capacity.
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// Number of bytes that can be written before the buffer grows.
    pub fn remaining(&self) -> usize {
        self.bytes.capacity() - self.bytes.len()
    }

    /// Drop the written bytes, keeping the allocation.
    pub fn reset(&mut self) {
        self.bytes.clear();
    }

    /// The bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Freeze the written bytes into a shareable buffer.
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.bytes)
    }
}

impl ByteSink for DynamicBuffer {
    fn push(&mut self, byte: u8) -> Result<()> {
        self.bytes.try_reserve(1)?;
        self.bytes.push(byte);
        Ok(())
    }

    fn push_slice(&mut self, bytes: &[u8]) -> Result<()> {
        self.bytes.try_reserve(bytes.len())?;
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    fn len(&self) -> usize {
        self.bytes.len()
    }
}

impl ByteSink for Vec<u8> {
    fn push(&mut self, byte: u8) -> Result<()> {
        self.try_reserve(1)?;
        Vec::push(self, byte);
        Ok(())
    }

    fn push_slice(&mut self, bytes: &[u8]) -> Result<()> {
        self.try_reserve(bytes.len())?;
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl ByteSink for BytesMut {
    fn push(&mut self, byte: u8) -> Result<()> {
        self.put_u8(byte);
        Ok(())
    }

    fn push_slice(&mut self, bytes: &[u8]) -> Result<()> {
        self.put_slice(bytes);
        Ok(())
    }

    fn len(&self) -> usize {
        BytesMut::len(self)
    }
}
