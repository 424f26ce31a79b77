//! Byte cursors for the auxiliary data wire format.
//!
//! Everything is little-endian and fixed-width: 8-byte integers and counts,
//! 16-byte identifiers, and strings prefixed by an 8-byte byte count.

use crate::error::DecodeError;
use crate::limits::{ID_LEN, WORD_LEN};
use crate::model::Id;

// =============================================================================
// DECODING
// =============================================================================

/// Cursor over an encoded value.
///
/// Every read is bounds checked; running past the end is
/// [`DecodeError::UnexpectedEof`] and leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// True once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads exactly `n` bytes.
    #[inline]
    pub fn read_bytes(
        &mut self,
        n: usize,
        context: &'static str,
    ) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining_len() {
            return Err(DecodeError::UnexpectedEof { context });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    #[inline]
    fn read_word(&mut self, context: &'static str) -> Result<[u8; WORD_LEN], DecodeError> {
        let mut word = [0u8; WORD_LEN];
        word.copy_from_slice(self.read_bytes(WORD_LEN, context)?);
        Ok(word)
    }

    /// Reads a little-endian u64.
    #[inline]
    pub fn read_u64(&mut self, context: &'static str) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.read_word(context)?))
    }

    /// Reads a little-endian two's-complement i64.
    #[inline]
    pub fn read_i64(&mut self, context: &'static str) -> Result<i64, DecodeError> {
        Ok(i64::from_le_bytes(self.read_word(context)?))
    }

    /// Reads a 16-byte UUID.
    #[inline]
    pub fn read_id(&mut self, context: &'static str) -> Result<Id, DecodeError> {
        let mut bytes = [0u8; ID_LEN];
        bytes.copy_from_slice(self.read_bytes(ID_LEN, context)?);
        Ok(Id::from_bytes(bytes))
    }

    /// Reads a u64 length or count and converts it to `usize`.
    pub fn read_len(&mut self, field: &'static str) -> Result<usize, DecodeError> {
        let len = self.read_u64(field)?;
        usize::try_from(len).map_err(|_| DecodeError::LengthOverflow { field, len })
    }

    /// Reads a length-prefixed UTF-8 string.
    #[inline]
    pub fn read_string(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let len = self.read_len(field)?;
        let bytes = self.read_bytes(len, field)?;
        // Validate UTF-8 on borrowed slice, then allocate once (avoids intermediate Vec)
        std::str::from_utf8(bytes)
            .map(|s| s.to_string())
            .map_err(|_| DecodeError::InvalidUtf8 { field })
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for encoding binary data.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drops everything written after the first `len` bytes.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a little-endian u64.
    #[inline]
    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian two's-complement i64.
    #[inline]
    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a 16-byte UUID.
    #[inline]
    pub fn write_id(&mut self, id: &Id) {
        self.buf.extend_from_slice(id.as_bytes());
    }

    /// Writes a length or count as u64.
    #[inline]
    pub fn write_len(&mut self, len: usize) {
        self.write_u64(len as u64);
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn write_string(&mut self, s: &str) {
        self.write_len(s.len());
        self.buf.extend_from_slice(s.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u64_little_endian() {
        let mut writer = Writer::new();
        writer.write_u64(0x0102030405060708);
        assert_eq!(writer.as_bytes(), &[8, 7, 6, 5, 4, 3, 2, 1]);

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(reader.read_u64("test").unwrap(), 0x0102030405060708);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_i64_twos_complement() {
        let mut writer = Writer::new();
        writer.write_i64(-2);
        assert_eq!(writer.as_bytes(), &[0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);

        for v in [0i64, 1, -1, i64::MAX, i64::MIN] {
            let mut writer = Writer::new();
            writer.write_i64(v);
            let mut reader = Reader::new(writer.as_bytes());
            assert_eq!(reader.read_i64("test").unwrap(), v, "failed for {}", v);
        }
    }

    #[test]
    fn test_string_layout() {
        let mut writer = Writer::new();
        writer.write_string("hi");
        assert_eq!(writer.as_bytes(), &[2, 0, 0, 0, 0, 0, 0, 0, b'h', b'i']);

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(reader.read_string("test").unwrap(), "hi");
    }

    #[test]
    fn test_string_unicode() {
        let mut writer = Writer::new();
        writer.write_string("unicode: \u{1F600}");

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(reader.read_string("test").unwrap(), "unicode: \u{1F600}");
    }

    #[test]
    fn test_string_invalid_utf8() {
        let mut writer = Writer::new();
        writer.write_len(2);
        writer.write_bytes(&[0xC3, 0x28]);

        let mut reader = Reader::new(writer.as_bytes());
        let result = reader.read_string("test");
        assert!(matches!(result, Err(DecodeError::InvalidUtf8 { field: "test" })));
    }

    #[test]
    fn test_string_length_past_end() {
        let mut writer = Writer::new();
        writer.write_u64(u64::MAX);

        let mut reader = Reader::new(writer.as_bytes());
        let result = reader.read_string("test");
        assert!(matches!(
            result,
            Err(DecodeError::UnexpectedEof { .. }) | Err(DecodeError::LengthOverflow { .. })
        ));
    }

    #[test]
    fn test_id_roundtrip() {
        let id = Id::from_bytes([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]);

        let mut writer = Writer::new();
        writer.write_id(&id);
        assert_eq!(writer.len(), 16);

        let mut reader = Reader::new(writer.as_bytes());
        let decoded = reader.read_id("test").unwrap();
        assert_eq!(id, decoded);
    }

    #[test]
    fn test_unexpected_eof() {
        let data = [0u8; 5];
        let mut reader = Reader::new(&data);
        let result = reader.read_u64("test");
        assert!(matches!(result, Err(DecodeError::UnexpectedEof { context: "test" })));
        assert_eq!(reader.position(), 0);
    }
}
