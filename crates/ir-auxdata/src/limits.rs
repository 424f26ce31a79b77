//! Limits applied while decoding untrusted input.
//!
//! Type descriptors travel with the data, so their nesting is capped at
//! [`MAX_TYPE_DEPTH`] before anything recurses over them.
//!
//! Counts and lengths on the wire are full 64-bit values. They are honored
//! as written, but never trusted for eager allocation: a container is
//! pre-sized to at most [`MAX_PREALLOC_ITEMS`] elements and grows from there,
//! so a forged count fails on end of input instead of on allocation.

/// Deepest bracket nesting accepted in a type descriptor. Decoding and
/// encoding recurse once per level, so this also bounds their stack use.
pub const MAX_TYPE_DEPTH: usize = 64;

/// Upper bound on elements reserved up front for a decoded sequence or tuple.
pub const MAX_PREALLOC_ITEMS: usize = 4096;

/// Size in bytes of an encoded identifier.
pub const ID_LEN: usize = 16;

/// Size in bytes of an encoded fixed-width integer or count.
pub const WORD_LEN: usize = 8;

/// Size in bytes of an encoded `Offset`.
pub const OFFSET_LEN: usize = ID_LEN + WORD_LEN;
