//! Error taxonomy for [`SmallString`](crate::SmallString) operations.
//!
//! Every fallible operation on the crate's types reports one of the
//! variants below and leaves the value it was called on valid and
//! unchanged. Nothing is swallowed or retried internally; failures
//! propagate straight to the caller via [`Result`].

/// Errors reported by [`SmallString`](crate::SmallString) and its
/// fallback buffer.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  derive_more::Display,
  derive_more::Error,
)]
pub enum Error {
  /// An index at or beyond the current length was passed to an
  /// accessor.
  #[display("index {index} out of range for length {len}")]
  OutOfRange {
    /// The offending index.
    index: usize,
    /// The length of the string at the time of access.
    len:   usize,
  },

  /// The allocator could not provide the requested fallback buffer.
  ///
  /// The operation that triggered the allocation has no effect: the
  /// string keeps its previous contents, length, and capacity.
  #[display("allocation of {requested} bytes for the fallback buffer failed")]
  AllocationFailed {
    /// Number of bytes that could not be allocated.
    requested: usize,
  },

  /// A fallback buffer was requested with a capacity of zero.
  ///
  /// This is a programming error rather than a runtime condition; it
  /// is detected at construction so a broken buffer never exists.
  #[display("fallback buffer capacity must be non-zero")]
  ZeroCapacity,
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
