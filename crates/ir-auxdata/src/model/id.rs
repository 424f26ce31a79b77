//! UUID-based identifiers for IR nodes.
//!
//! Every node in the IR graph is identified by an RFC 4122 UUID stored on the
//! wire as 16 raw bytes.

use uuid::Uuid;

/// A 16-byte UUID identifier.
pub type Id = Uuid;

/// The zero/nil UUID.
pub const NIL_ID: Id = Uuid::nil();

/// Generates a fresh random (version 4) identifier.
pub fn new_id() -> Id {
    Uuid::new_v4()
}

/// Formats a UUID as non-hyphenated lowercase hex.
pub fn format_id(id: &Id) -> String {
    id.simple().to_string()
}

/// Parses a UUID from hex string (with or without hyphens).
pub fn parse_id(s: &str) -> Option<Id> {
    Uuid::try_parse(s).ok()
}
