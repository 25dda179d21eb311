//! A byte-string type with inline storage and a heap fallback.
//!
//! `SmallString<N>` keeps its first `N` bytes in a buffer embedded in
//! the value itself. The byte that no longer fits attaches an owned,
//! growable fallback buffer, and everything past the inline limit
//! lives there from then on; the string never migrates back inline.
//! Contents are treated as raw bytes with no encoding awareness.
//!
//! ## Examples
//!
//! Creating a `SmallString` and appending to it:
//!
//! ```
//! use smallstring::SmallString;
//!
//! # fn main() -> Result<(), smallstring::Error> {
//! let mut s: SmallString<8> = SmallString::new();
//! s.push_str("hi")?;
//! s.push(b'!')?;
//! assert_eq!(s, "hi!");
//! assert!(s.is_inline());
//! # Ok(())
//! # }
//! ```
//!
//! Appending past the inline capacity attaches the heap fallback:
//!
//! ```
//! use smallstring::SmallString;
//!
//! # fn main() -> Result<(), smallstring::Error> {
//! let mut s: SmallString<4> = SmallString::new();
//! s.push_str("abcdef")?;
//! // 6 bytes exceed the inline capacity of 4
//! assert!(!s.is_inline());
//! assert_eq!(s.get(5)?, b'f');
//! # Ok(())
//! # }
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::convert::TryFrom;
use core::fmt;
use core::hash::Hash;
use core::hash::Hasher;
use core::ops::Add;
use core::str::FromStr;

use crate::error::Error;
use crate::error::Result;
use crate::fallback::FALLBACK_INITIAL_CAPACITY;
use crate::fallback::FallbackBuf;

/// Inline capacity of the [`SmallStr`] alias, in bytes.
///
/// Chosen to match what a heap-allocated string's header (pointer,
/// length, capacity) would occupy on a 64-bit target, less a couple of
/// bytes of bookkeeping, so the inline case is a pure win.
pub const INLINE_LIMIT: usize = 22;

/// A [`SmallString`] with the default inline capacity of
/// [`INLINE_LIMIT`] bytes.
pub type SmallStr = SmallString<INLINE_LIMIT>;

/// A byte string storing up to `N` bytes inline before spilling to an
/// owned heap buffer.
///
/// While `len() <= N` the bytes live entirely in the value and no
/// allocation exists. The push that would exceed `N` creates a
/// fallback buffer holding every byte past the inline limit; the
/// buffer doubles its capacity on demand and is released on
/// [`clear`](SmallString::clear), drop, or replacement. Exactly one
/// value owns a given fallback allocation at any time: cloning
/// re-derives an independent copy and moving transfers ownership.
///
/// All mutating operations are strongly error-safe: if an allocation
/// fails the string is left exactly as it was, and the error is
/// returned to the caller rather than swallowed.
pub struct SmallString<const N: usize> {
  /// Logical byte count, across both storage regions.
  len:      usize,
  /// Inline storage for the first `N` bytes.
  inline:   [u8; N],
  /// Heap storage for bytes `N..len`. `Some` iff `len > N`.
  fallback: Option<FallbackBuf>,
}

impl<const N: usize> SmallString<N> {
  /// Creates an empty `SmallString`. Never allocates.
  pub const fn new() -> Self {
    Self {
      len:      0,
      inline:   [0; N],
      fallback: None,
    }
  }

  /// Returns the length in bytes.
  pub const fn len(&self) -> usize {
    self.len
  }

  /// Returns `true` if the string is empty.
  pub const fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Returns `true` while the contents fit entirely inline.
  pub const fn is_inline(&self) -> bool {
    self.fallback.is_none()
  }

  /// Total capacity in bytes: the `N` inline slots, plus the fallback
  /// buffer's capacity once one is attached.
  pub fn capacity(&self) -> usize {
    match &self.fallback {
      Some(fallback) => N + fallback.capacity(),
      None => N,
    }
  }

  /// Appends a single byte.
  ///
  /// The byte lands inline while there is room; the first byte past
  /// the inline limit attaches a fallback buffer seeded with that
  /// byte, and later bytes append to it, doubling its capacity when
  /// full. On an allocation failure the string is unchanged.
  pub fn push(&mut self, byte: u8) -> Result<()> {
    if self.len < N {
      self.inline[self.len] = byte;
    } else if self.len == N {
      // Transition point: attach the fallback only once it has been
      // built and seeded, so a failure leaves the string inline.
      let mut fallback =
        FallbackBuf::with_capacity(FALLBACK_INITIAL_CAPACITY)?;
      fallback.push(byte)?;
      self.fallback = Some(fallback);
    } else {
      match self.fallback.as_mut() {
        Some(fallback) => fallback.push(byte)?,
        // `len > N` implies the fallback is attached.
        None => unreachable!("spilled string without a fallback buffer"),
      }
    }
    self.len += 1;
    Ok(())
  }

  /// Appends every byte of `s`, in order.
  pub fn push_str(&mut self, s: &str) -> Result<()> {
    for byte in s.bytes() {
      self.push(byte)?;
    }
    Ok(())
  }

  /// Returns the byte at `index`, or [`Error::OutOfRange`] when
  /// `index >= len()`. Read-only; the split between inline and
  /// fallback storage is invisible to the caller.
  pub fn get(&self, index: usize) -> Result<u8> {
    if index >= self.len {
      return Err(Error::OutOfRange {
        index,
        len: self.len,
      });
    }
    if index < N {
      Ok(self.inline[index])
    } else {
      self
        .fallback
        .as_ref()
        .and_then(|fallback| fallback.get(index - N))
        .ok_or(Error::OutOfRange {
          index,
          len: self.len,
        })
    }
  }

  /// Iterates over the stored bytes in order, crossing from inline to
  /// fallback storage transparently.
  pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
    let inline = &self.inline[..self.len.min(N)];
    let spilled = match &self.fallback {
      Some(fallback) => fallback.as_slice(),
      None => &[],
    };
    inline.iter().copied().chain(spilled.iter().copied())
  }

  /// Clears the string, releasing any fallback allocation and
  /// resetting the length to zero. Idempotent.
  pub fn clear(&mut self) {
    self.fallback = None;
    self.len = 0;
  }

  /// Consumes both operands and returns their concatenation: the
  /// bytes of `self` followed by the bytes of `other`, no separator.
  pub fn concat(mut self, other: Self) -> Result<Self> {
    for byte in other.bytes() {
      self.push(byte)?;
    }
    Ok(self)
  }

  /// Returns an independent copy, propagating allocation failure.
  ///
  /// The copy is built by appending each byte in order, so it
  /// re-derives its own inline/fallback split rather than duplicating
  /// the source's internal layout, and shares no allocation with the
  /// source.
  pub fn try_clone(&self) -> Result<Self> {
    let mut copy = Self::new();
    for byte in self.bytes() {
      copy.push(byte)?;
    }
    Ok(copy)
  }
}

impl<const N: usize> Default for SmallString<N> {
  fn default() -> Self {
    Self::new()
  }
}

impl<const N: usize> Clone for SmallString<N> {
  fn clone(&self) -> Self {
    self
      .try_clone()
      .expect("allocation failed while cloning a SmallString")
  }

  fn clone_from(&mut self, source: &Self) {
    self.clear();
    for byte in source.bytes() {
      self
        .push(byte)
        .expect("allocation failed while cloning a SmallString");
    }
  }
}

impl<const N: usize> fmt::Debug for SmallString<N> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let bytes: Vec<u8> = self.bytes().collect();
    fmt::Debug::fmt(&String::from_utf8_lossy(&bytes), f)
  }
}

impl<const N: usize> fmt::Display for SmallString<N> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let bytes: Vec<u8> = self.bytes().collect();
    f.write_str(&String::from_utf8_lossy(&bytes))
  }
}

/// Concatenation in the `lhs + rhs` form. Both operands are taken by
/// value; allocation failure panics, as it does for `String + &str`.
/// Use [`SmallString::concat`] to handle the failure instead.
impl<const N: usize> Add for SmallString<N> {
  type Output = Self;

  fn add(self, rhs: Self) -> Self {
    self
      .concat(rhs)
      .expect("allocation failed while concatenating SmallStrings")
  }
}

impl<const N: usize> TryFrom<&str> for SmallString<N> {
  type Error = Error;

  fn try_from(s: &str) -> Result<Self> {
    let mut out = Self::new();
    out.push_str(s)?;
    Ok(out)
  }
}

impl<const N: usize> FromStr for SmallString<N> {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::try_from(s)
  }
}

impl<const N: usize> PartialEq for SmallString<N> {
  fn eq(&self, other: &Self) -> bool {
    self.len == other.len && self.bytes().eq(other.bytes())
  }
}

impl<const N: usize> Eq for SmallString<N> {}

impl<const N: usize> PartialEq<str> for SmallString<N> {
  fn eq(&self, other: &str) -> bool {
    self.len == other.len() && self.bytes().eq(other.bytes())
  }
}

impl<const N: usize> PartialEq<&str> for SmallString<N> {
  fn eq(&self, other: &&str) -> bool {
    *self == **other
  }
}

impl<const N: usize> PartialEq<SmallString<N>> for str {
  fn eq(&self, other: &SmallString<N>) -> bool {
    *other == *self
  }
}

impl<const N: usize> PartialEq<SmallString<N>> for &str {
  fn eq(&self, other: &SmallString<N>) -> bool {
    *other == **self
  }
}

impl<const N: usize> PartialOrd for SmallString<N> {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl<const N: usize> Ord for SmallString<N> {
  fn cmp(&self, other: &Self) -> Ordering {
    self.bytes().cmp(other.bytes())
  }
}

impl<const N: usize> Hash for SmallString<N> {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.len.hash(state);
    for byte in self.bytes() {
      byte.hash(state);
    }
  }
}

#[cfg(feature = "serde")]
mod serde_impl {
  use super::*;

  impl<const N: usize> serde::Serialize for SmallString<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
      S: serde::Serializer,
    {
      let bytes: Vec<u8> = self.bytes().collect();
      let s =
        core::str::from_utf8(&bytes).map_err(serde::ser::Error::custom)?;
      serializer.serialize_str(s)
    }
  }

  impl<'de, const N: usize> serde::Deserialize<'de> for SmallString<N> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
      D: serde::Deserializer<'de>,
    {
      let s = <&str>::deserialize(deserializer)?;
      SmallString::try_from(s).map_err(serde::de::Error::custom)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_is_empty_and_inline() {
    let s: SmallStr = SmallString::new();
    assert_eq!(s.len(), 0);
    assert!(s.is_empty());
    assert!(s.is_inline());
    assert_eq!(s.capacity(), INLINE_LIMIT);
    assert_eq!(s, "");
  }

  #[test]
  fn push_tracks_length() {
    let mut s: SmallString<4> = SmallString::new();
    for (i, byte) in (*b"abcdef").into_iter().enumerate() {
      assert_eq!(s.len(), i);
      s.push(byte).unwrap();
    }
    assert_eq!(s.len(), 6);
    assert_eq!(s, "abcdef");
  }

  #[test]
  fn indexing_within_inline_storage() {
    let s: SmallStr = "small".parse().unwrap();
    assert_eq!(s.get(3).unwrap(), b'l');
    assert!(s.is_inline());
  }

  #[test]
  fn indexing_across_the_spill_boundary() {
    // 26 bytes into a 22-slot inline buffer: the last 4 spill.
    let s: SmallStr = "abcdefghijklmnopqrstuvwxyz".parse().unwrap();
    assert_eq!(s.len(), 26);
    assert!(!s.is_inline());
    assert_eq!(s.get(21).unwrap(), b'v');
    assert_eq!(s.get(22).unwrap(), b'w');
    assert_eq!(s.get(25).unwrap(), b'z');
    let spilled: Vec<u8> = s.bytes().skip(INLINE_LIMIT).collect();
    assert_eq!(spilled, b"wxyz");
  }

  #[test]
  fn out_of_range_access_fails() {
    let s: SmallString<4> = "abc".parse().unwrap();
    assert_eq!(s.get(3), Err(Error::OutOfRange { index: 3, len: 3 }));
    assert_eq!(
      s.get(100),
      Err(Error::OutOfRange {
        index: 100,
        len:   3,
      })
    );
    let empty: SmallString<4> = SmallString::new();
    assert_eq!(empty.get(0), Err(Error::OutOfRange { index: 0, len: 0 }));
  }

  #[test]
  fn spill_happens_exactly_past_the_inline_limit() {
    let mut s: SmallString<4> = SmallString::new();
    s.push_str("abcd").unwrap();
    assert!(s.is_inline());
    s.push(b'e').unwrap();
    assert!(!s.is_inline());
    assert_eq!(s.len(), 5);
    assert_eq!(s, "abcde");
  }

  #[test]
  fn capacity_doubles_on_demand() {
    let mut s: SmallStr = SmallString::new();
    for _ in 0..INLINE_LIMIT + 10 {
      s.push(b'x').unwrap();
    }
    // The fallback holds exactly its initial 10 bytes.
    assert_eq!(s.capacity(), INLINE_LIMIT + 10);
    s.push(b'x').unwrap();
    assert_eq!(s.capacity(), INLINE_LIMIT + 20);
  }

  #[test]
  fn ten_thousand_single_byte_appends() {
    let mut s: SmallStr = SmallString::new();
    for _ in 0..10_000 {
      s.push_str("a").unwrap();
    }
    assert_eq!(s.len(), 10_000);
    assert!(s.capacity() >= 10_000);
    assert_eq!(s.get(9_999).unwrap(), b'a');
  }

  #[test]
  fn clone_is_independent() {
    let original: SmallStr = "abcdefghijklmnopqrstuvwxyz".parse().unwrap();
    let mut copy = original.clone();
    assert_eq!(copy, original);
    copy.push(b'!').unwrap();
    assert_ne!(copy, original);
    assert_eq!(original.len(), 26);
    assert_eq!(original.get(25).unwrap(), b'z');
  }

  #[test]
  fn clone_rederives_the_storage_split() {
    let spilled: SmallString<4> = "abcdef".parse().unwrap();
    let copy = spilled.try_clone().unwrap();
    assert!(!copy.is_inline());
    assert_eq!(copy, "abcdef");

    let inline: SmallString<4> = "abc".parse().unwrap();
    let copy = inline.try_clone().unwrap();
    assert!(copy.is_inline());
    assert_eq!(copy, "abc");
  }

  #[test]
  fn clone_from_replaces_existing_contents() {
    let source: SmallString<4> = "wxyz99".parse().unwrap();
    // The destination already owns a fallback of its own.
    let mut dest: SmallString<4> = "abcdefgh".parse().unwrap();
    dest.clone_from(&source);
    assert_eq!(dest, "wxyz99");
    assert_eq!(source, "wxyz99");
  }

  #[test]
  fn self_clone_from_is_harmless() {
    let mut s: SmallString<4> = "abcdef".parse().unwrap();
    let snapshot = s.clone();
    s.clone_from(&snapshot);
    assert_eq!(s, "abcdef");
  }

  #[test]
  fn move_assignment_leaves_an_empty_source() {
    let y: SmallStr = "abcdefghijklmnopqrstuvwxyz".parse().unwrap();
    let mut x: SmallStr = SmallString::new();
    x.clone_from(&y);
    // Move x's contents into y, leaving x empty.
    let y = core::mem::take(&mut x);
    assert_eq!(y, "abcdefghijklmnopqrstuvwxyz");
    assert_eq!(x.len(), 0);
    assert!(x.is_inline());
    assert_eq!(x.get(0), Err(Error::OutOfRange { index: 0, len: 0 }));
  }

  #[test]
  fn clear_is_idempotent() {
    let mut s: SmallString<4> = "abcdef".parse().unwrap();
    assert!(!s.is_inline());
    s.clear();
    assert_eq!(s.len(), 0);
    assert!(s.is_inline());
    s.clear();
    assert_eq!(s.len(), 0);
    assert!(s.is_inline());
    // A cleared string is fully usable again.
    s.push_str("ok").unwrap();
    assert_eq!(s, "ok");
  }

  #[test]
  fn concatenation_appends_in_order() {
    let hello: SmallStr = "Hello, ".parse().unwrap();
    let world: SmallStr = "world!".parse().unwrap();
    let mut greeting = hello.clone();
    greeting.push_str("world!").unwrap();
    assert_eq!(greeting, "Hello, world!");

    let combined = greeting.clone() + world.clone();
    assert_eq!(combined, "Hello, world!world!");
    assert_ne!(combined, "Hello, world!");

    let lengths = hello.concat(world).unwrap();
    assert_eq!(lengths.len(), 13);
  }

  #[test]
  fn concatenation_content_is_associative() {
    let a: SmallString<4> = "abc".parse().unwrap();
    let b: SmallString<4> = "defg".parse().unwrap();
    let c: SmallString<4> = "hij".parse().unwrap();
    let left = a
      .clone()
      .concat(b.clone())
      .unwrap()
      .concat(c.clone())
      .unwrap();
    let right = a.concat(b.concat(c).unwrap()).unwrap();
    assert_eq!(left, right);
    assert_eq!(left, "abcdefghij");
  }

  #[test]
  fn equality_with_literals_is_symmetric() {
    let s: SmallStr = "Hello, world!".parse().unwrap();
    let same: SmallStr = "Hello, world!".parse().unwrap();
    assert_eq!(s, same);
    assert_eq!(s, "Hello, world!");
    assert_eq!("Hello, world!", s);
    assert_ne!(s, "Hello, world");
    assert_ne!(s, "Hello, world!!");
  }

  #[test]
  fn equality_ignores_the_storage_split() {
    let inline: SmallString<8> = "abcdef".parse().unwrap();
    let spilled: SmallString<8> = "abcdefghij".parse().unwrap();
    assert_ne!(inline, spilled);

    let mut rebuilt = spilled.clone();
    rebuilt.clear();
    rebuilt.push_str("abcdef").unwrap();
    assert_eq!(rebuilt, inline);
  }

  #[test]
  fn ordering_and_hash_follow_contents() {
    use std::collections::hash_map::DefaultHasher;

    let a: SmallString<4> = "apple".parse().unwrap();
    let b: SmallString<4> = "banana".parse().unwrap();
    assert!(a < b);

    let mut h1 = DefaultHasher::new();
    a.hash(&mut h1);
    let mut h2 = DefaultHasher::new();
    a.clone().hash(&mut h2);
    assert_eq!(h1.finish(), h2.finish());
  }

  #[test]
  fn display_and_debug_render_contents() {
    let s: SmallString<4> = "abcdef".parse().unwrap();
    assert_eq!(alloc::format!("{s}"), "abcdef");
    assert_eq!(alloc::format!("{s:?}"), "\"abcdef\"");
  }

  #[test]
  fn try_from_builds_from_a_literal() {
    let s = SmallString::<4>::try_from("a fairly long literal").unwrap();
    assert_eq!(s.len(), 21);
    assert_eq!(s.get(0).unwrap(), b'a');
    assert_eq!(s.get(20).unwrap(), b'l');
  }

  #[cfg(feature = "serde")]
  mod serde_tests {
    use super::*;

    #[test]
    fn round_trips_as_a_plain_string() {
      let s: SmallStr = "serde test".parse().unwrap();
      let json = serde_json::to_string(&s).unwrap();
      assert_eq!(json, "\"serde test\"");
      let de: SmallStr = serde_json::from_str(&json).unwrap();
      assert_eq!(de, "serde test");
    }

    #[test]
    fn round_trips_spilled_contents() {
      let s: SmallStr = "abcdefghijklmnopqrstuvwxyz".parse().unwrap();
      let json = serde_json::to_string(&s).unwrap();
      let de: SmallStr = serde_json::from_str(&json).unwrap();
      assert!(!de.is_inline());
      assert_eq!(de, s);
    }
  }
}
