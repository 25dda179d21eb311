//! # smallstring
//!
//! ### Small-string optimization as a standalone value type
//!
//! This crate provides [`SmallString<N>`], a byte-string that stores
//! its first `N` bytes inline in the value itself and transparently
//! spills everything beyond that into an owned, growable heap buffer.
//! Short strings never touch the allocator; long strings pay for
//! exactly one owned fallback allocation that doubles as it grows.
//!
//! ### Example
//!
//! ```rust
//! use smallstring::SmallStr;
//!
//! # fn main() -> Result<(), smallstring::Error> {
//! // 22 inline slots; the alphabet's last 4 bytes spill to the heap.
//! let mut s: SmallStr = "abcdefghijklmnopqrstuvwxyz".parse()?;
//! assert_eq!(s.len(), 26);
//! assert_eq!(s.get(25)?, b'z');
//! assert!(!s.is_inline());
//!
//! s.clear();
//! assert!(s.is_inline());
//! # Ok(())
//! # }
//! ```
//!
//! ### Ownership
//!
//! The fallback buffer is exclusively owned: cloning a string
//! re-derives an independent copy byte by byte, and moving a string
//! transfers the allocation wholesale. Growth allocates the doubled
//! replacement buffer before committing anything, so a failed
//! allocation surfaces as [`Error::AllocationFailed`] and leaves the
//! string untouched.
//!
//! ## `no_std` Support
//!
//! The crate is `no_std` (plus `alloc`) by default, making it suitable
//! for embedded and other resource-constrained environments.
//!
//! ## Features
//!
//! - `std`: Enables integration with the Rust standard library. When
//!   disabled, which is the default, the crate operates in `no_std`
//!   mode.
//! - `serde`†: Enables serialization and deserialization support via
//!   Serde; strings serialize as plain strings.
//!
//! > † enabled by default

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;
extern crate core;

pub mod error;
mod fallback;
pub mod small_string;

pub use error::Error;
pub use error::Result;
pub use fallback::FALLBACK_INITIAL_CAPACITY;
pub use small_string::INLINE_LIMIT;
pub use small_string::SmallStr;
pub use small_string::SmallString;
