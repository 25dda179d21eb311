//! The heap side of the small-string optimization.
//!
//! [`FallbackBuf`] is an exclusively-owned, growable byte buffer that a
//! [`SmallString`](crate::SmallString) attaches once its contents no
//! longer fit inline. Ownership is a plain `Box<[u8]>`, so two live
//! strings can never observe the same allocation: cloning a string
//! re-derives a fresh buffer and moving transfers the box.
//!
//! Growth follows an allocate-then-commit order: the doubled
//! replacement buffer is fully allocated before any committed field is
//! touched, so a failed allocation leaves the buffer byte-for-byte as
//! it was.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::Error;
use crate::error::Result;

/// Capacity of a freshly created fallback buffer, in bytes.
pub const FALLBACK_INITIAL_CAPACITY: usize = 10;

/// An owned, growable byte buffer with doubling growth.
///
/// The capacity is `data.len()`: a capacity figure cannot exist
/// without the allocation that backs it, which is what keeps a failed
/// [`grow`](FallbackBuf::grow) from ever leaving a stale capacity
/// behind.
#[derive(Debug)]
pub(crate) struct FallbackBuf {
  data: Box<[u8]>,
  size: usize,
}

/// Allocates a zeroed boxed slice of exactly `capacity` bytes,
/// reporting failure instead of aborting.
fn alloc_bytes(capacity: usize) -> Result<Box<[u8]>> {
  let mut buf: Vec<u8> = Vec::new();
  buf
    .try_reserve_exact(capacity)
    .map_err(|_| Error::AllocationFailed {
      requested: capacity,
    })?;
  buf.resize(capacity, 0);
  Ok(buf.into_boxed_slice())
}

impl FallbackBuf {
  /// Creates a buffer able to hold `capacity` bytes before its first
  /// growth. A zero capacity is rejected up front: doubling zero goes
  /// nowhere, so such a buffer could never accept a byte.
  pub(crate) fn with_capacity(capacity: usize) -> Result<Self> {
    if capacity == 0 {
      return Err(Error::ZeroCapacity);
    }
    Ok(Self {
      data: alloc_bytes(capacity)?,
      size: 0,
    })
  }

  /// Number of bytes logically stored.
  pub(crate) const fn len(&self) -> usize {
    self.size
  }

  /// Number of bytes the current allocation can hold.
  pub(crate) const fn capacity(&self) -> usize {
    self.data.len()
  }

  /// The stored bytes, in append order.
  pub(crate) fn as_slice(&self) -> &[u8] {
    &self.data[..self.size]
  }

  /// Returns the byte at `index`, or `None` past the logical end.
  pub(crate) fn get(&self, index: usize) -> Option<u8> {
    self.as_slice().get(index).copied()
  }

  /// Appends one byte, doubling the allocation first if it is full.
  pub(crate) fn push(&mut self, byte: u8) -> Result<()> {
    if self.size == self.capacity() {
      self.grow()?;
    }
    self.data[self.size] = byte;
    self.size += 1;
    Ok(())
  }

  /// Replaces the allocation with one of twice the capacity.
  ///
  /// The new buffer is allocated before anything else happens; only
  /// once it exists are the live bytes copied over and the old box
  /// dropped. On `Err` the buffer is unchanged.
  fn grow(&mut self) -> Result<()> {
    let mut grown = alloc_bytes(self.capacity() * 2)?;
    grown[..self.size].copy_from_slice(self.as_slice());
    self.data = grown;
    Ok(())
  }
}
