//! Heuristic field scanner for schema-less protobuf-like data.
//!
//! The scanner walks a byte buffer looking for length-delimited fields without
//! knowing anything about the message schema. Any byte whose low 3 bits equal
//! the LEN wire type is treated as a potential tag; the varint that follows is
//! read as a candidate length and validated against the buffer bounds. This is
//! a deliberate approximation rather than a protocol decode — arbitrary bytes
//! will occasionally look like tags, and downstream text filtering is expected
//! to discard the resulting junk spans.
//!
//! ## Algorithm Overview
//!
//! Conceptually a two-state machine:
//!
//! 1. `SeekingTag`: advance one byte at a time until a LEN-typed tag byte is
//!    found.
//! 2. `ParsingLength`: decode the varint after the tag. If the varint is
//!    truncated, or the length is zero, too large, or runs past the end of the
//!    buffer, backtrack to one byte past the tag and resume seeking.
//!
//! On success the span is emitted and scanning resumes immediately after it.
//! The cursor is monotonically non-decreasing and every iteration advances it
//! by at least one byte, so a scan always terminates in O(n) steps.

use std::ops::Range;
use tracing::trace;

use super::wire;

/// Default upper bound (exclusive) on a candidate field length.
///
/// Real note text fragments are short; anything this large is almost certainly
/// a misread of binary data.
pub const DEFAULT_MAX_FIELD_LEN: usize = 10_000;

/// Lazy iterator over candidate length-delimited field spans in a byte buffer.
///
/// Each yielded [`Range`] indexes into the buffer the scanner was created
/// with. Spans are produced in ascending offset order and never overlap the
/// end of the buffer. A scanner is single-use: create a fresh one per buffer.
#[derive(Debug, Clone)]
pub struct FieldScanner<'a> {
    data: &'a [u8],
    cursor: usize,
    max_field_len: usize,
}

impl<'a> FieldScanner<'a> {
    /// Creates a scanner over the given buffer with the default length bound
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_max_field_len(data, DEFAULT_MAX_FIELD_LEN)
    }

    /// Creates a scanner with a custom (exclusive) field length bound
    pub fn with_max_field_len(data: &'a [u8], max_field_len: usize) -> Self {
        Self {
            data,
            cursor: 0,
            max_field_len,
        }
    }

    /// Try to parse a length-delimited field whose tag byte sits at `tag_pos`.
    ///
    /// Returns the candidate span and the cursor position to resume from, or
    /// `None` when the attempt must be discarded. The caller then resumes at
    /// `tag_pos + 1`, never at wherever the failed parse reached.
    fn parse_length_at(&self, tag_pos: usize) -> Option<(Range<usize>, usize)> {
        let (length, varint_len) = wire::decode_varint(&self.data[tag_pos + 1..])?;
        let length = usize::try_from(length).ok()?;

        if length == 0 || length >= self.max_field_len {
            return None;
        }

        let start = tag_pos + 1 + varint_len;
        let end = start.checked_add(length)?;
        if end > self.data.len() {
            return None;
        }

        Some((start..end, end))
    }
}

impl Iterator for FieldScanner<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        while self.cursor < self.data.len() {
            let tag = self.data[self.cursor];

            if !wire::is_len_delimited(tag) {
                self.cursor += 1;
                continue;
            }

            match self.parse_length_at(self.cursor) {
                Some((span, resume)) => {
                    trace!(
                        "candidate field at {}..{} (tag at {})",
                        span.start,
                        span.end,
                        self.cursor
                    );
                    self.cursor = resume;
                    return Some(span);
                }
                None => {
                    // Backtrack: one byte past the tag, not past the attempt
                    self.cursor += 1;
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spans(data: &[u8]) -> Vec<Range<usize>> {
        FieldScanner::new(data).collect()
    }

    #[test]
    fn test_empty_buffer() {
        assert_eq!(spans(&[]), vec![]);
    }

    #[test]
    fn test_single_field() {
        // Tag 0x0A (field 1, LEN), length 5, "hello"
        let data = [0x0A, 0x05, b'h', b'e', b'l', b'l', b'o'];
        assert_eq!(spans(&data), vec![2..7]);
    }

    #[test]
    fn test_back_to_back_fields() {
        let mut data = vec![0x0A, 0x05];
        data.extend_from_slice(b"hello");
        data.extend_from_slice(&[0x12, 0x02]);
        data.extend_from_slice(b"ab");
        assert_eq!(spans(&data), vec![2..7, 9..11]);
    }

    #[test]
    fn test_zero_length_rejected() {
        // Length 0 is discarded; the scanner resumes one byte past the tag,
        // where 0x00 is not a LEN tag either
        let data = [0x0A, 0x00, 0x0A, 0x02, b'h', b'i'];
        assert_eq!(spans(&data), vec![4..6]);
    }

    #[test]
    fn test_length_past_end_backtracks_to_tag() {
        // Claimed length 200 overruns the buffer; the inner 0x12 byte is then
        // re-examined as a tag and yields the short field
        let data = [0x0A, 0xC8, 0x01, 0x12, 0x01, b'x'];
        assert_eq!(spans(&data), vec![5..6]);
    }

    #[test]
    fn test_truncated_varint_at_end() {
        // Continuation bit set with no further bytes; must terminate quietly
        let data = [0x0A, 0x80];
        assert_eq!(spans(&data), vec![]);
    }

    #[test]
    fn test_truncated_varint_after_valid_field() {
        let mut data = vec![0x0A, 0x02];
        data.extend_from_slice(b"ok");
        data.extend_from_slice(&[0x12, 0xFF]);
        assert_eq!(spans(&data), vec![2..4]);
    }

    #[test]
    fn test_all_zero_buffer() {
        assert_eq!(spans(&[0u8; 64]), vec![]);
    }

    #[test]
    fn test_multi_byte_length() {
        // Length 300 encoded as [0xAC, 0x02]
        let mut data = vec![0x0A, 0xAC, 0x02];
        data.extend(std::iter::repeat(b'a').take(300));
        assert_eq!(spans(&data), vec![3..303]);
    }

    #[test]
    fn test_max_field_len_is_exclusive() {
        let mut data = vec![0x0A];
        // Length 10000 encoded as a varint: 10000 = 0x2710 -> [0x90, 0x4E]
        data.extend_from_slice(&[0x90, 0x4E]);
        data.extend(std::iter::repeat(b'a').take(10_000));
        // 10000 is out of bounds; the remaining bytes (0x90, 0x4E, 'a'...)
        // never form a LEN tag, so nothing is emitted
        assert_eq!(spans(&data), vec![]);
    }

    #[test]
    fn test_custom_max_field_len() {
        let data = [0x0A, 0x05, b'h', b'e', b'l', b'l', b'o'];
        let got: Vec<_> = FieldScanner::with_max_field_len(&data, 4).collect();
        // Length 5 exceeds the bound of 4; 'l' (0x6C) has wire type 4, but
        // 'h' = 0x68 has wire type 0, so nothing valid remains
        assert_eq!(got, vec![]);
    }

    #[test]
    fn test_cursor_always_advances() {
        // Pathological input: every byte looks like a LEN tag with a huge or
        // truncated length. Termination is the property under test.
        let data = vec![0xFA; 4096];
        let count = FieldScanner::new(&data).count();
        assert_eq!(count, 0);
    }
}
