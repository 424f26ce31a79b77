//! Binary encoding/decoding for auxiliary data.
//!
//! A type descriptor is parsed into a [`TypeTree`]; the [`Registry`] then
//! walks that tree, dispatching each level to the codec registered under its
//! name.

pub mod container;
pub mod primitives;
pub mod registry;
pub mod scalar;
pub mod typename;

pub use primitives::{Reader, Writer};
pub use registry::{Builtin, Codec, Decoder, Encoder, Registry};
pub use typename::{parse_type, TypeTree};
