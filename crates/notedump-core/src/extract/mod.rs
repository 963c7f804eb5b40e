//! Text extraction from Apple Notes binary note data.
//!
//! Note bodies live in `ZICNOTEDATA.ZDATA` as a gzip-compressed protobuf-like
//! blob with no published schema. This module recovers the human-readable text
//! with a best-effort pipeline:
//!
//! 1. Decompress (gzip, falling back to the raw bytes)
//! 2. Scan for length-delimited field spans ([`FieldScanner`])
//! 3. Keep spans that decode as plausible text ([`readable_text`])
//! 4. Join, then drop duplicate lines while preserving first-seen order
//!
//! The pipeline is total: every input produces a (possibly empty) `String`,
//! and no step can fail outward. Unparseable or binary-looking data is silent
//! noise, not an error. Each call is a pure function of its input, so blobs
//! can be decoded on separate threads without coordination.
//!
//! ## Example
//!
//! ```
//! use notedump_core::extract::extract_text;
//!
//! let blob = [0x0A, 0x05, b'h', b'e', b'l', b'l', b'o'];
//! assert_eq!(extract_text(&blob), "hello");
//! assert_eq!(extract_text(&[]), "");
//! ```

mod scanner;
mod wire;

use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Read;

use flate2::read::GzDecoder;
use tracing::{debug, trace};

pub use scanner::{FieldScanner, DEFAULT_MAX_FIELD_LEN};
pub use wire::{decode_varint, is_len_delimited, wire_type, WIRE_TYPE_LEN};

/// Configuration for the text extractor
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Upper bound (exclusive) on a candidate field length
    pub max_field_len: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_field_len: DEFAULT_MAX_FIELD_LEN,
        }
    }
}

impl ExtractorConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum candidate field length (exclusive)
    pub fn max_field_len(mut self, len: usize) -> Self {
        self.max_field_len = len;
        self
    }
}

/// Extracts readable text from schema-less binary note data
#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    config: ExtractorConfig,
}

impl TextExtractor {
    /// Creates a new extractor with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new extractor with custom configuration
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Run the full extraction pipeline over one blob.
    ///
    /// Always returns a string; empty input and pure binary noise both yield
    /// `""`. The result contains no duplicate lines and no surrounding
    /// whitespace on any line.
    pub fn extract(&self, data: &[u8]) -> String {
        if data.is_empty() {
            return String::new();
        }

        let data = decompress(data);
        let data: &[u8] = data.as_ref();
        debug!("scanning {} bytes of note data", data.len());

        let parts: Vec<&str> = FieldScanner::with_max_field_len(data, self.config.max_field_len)
            .filter_map(|span| readable_text(&data[span]))
            .collect();

        trace!("{} readable candidates accepted", parts.len());
        dedup_lines(&parts)
    }
}

/// Extract readable text from one blob using the default configuration.
///
/// Convenience wrapper around [`TextExtractor::extract`].
pub fn extract_text(data: &[u8]) -> String {
    TextExtractor::new().extract(data)
}

/// Best-effort gzip decompression.
///
/// Returns the inflated bytes when the input is a valid gzip stream, and the
/// input unchanged otherwise. There is no error channel: the caller cannot
/// distinguish "not compressed" from "corrupt" and must proceed regardless.
pub fn decompress(data: &[u8]) -> Cow<'_, [u8]> {
    let mut decoder = GzDecoder::new(data);
    let mut inflated = Vec::new();
    match decoder.read_to_end(&mut inflated) {
        Ok(_) => Cow::Owned(inflated),
        Err(_) => Cow::Borrowed(data),
    }
}

/// Validate a candidate field as readable text.
///
/// Accepts the span only when it decodes as UTF-8, is longer than one
/// character, contains at least one alphabetic character, does not start with
/// NUL, and is not shaped like a UUID. Rejection is silent; false negatives
/// are expected over heuristic input.
pub fn readable_text(bytes: &[u8]) -> Option<&str> {
    let text = std::str::from_utf8(bytes).ok()?;

    if text.chars().count() <= 1 {
        return None;
    }
    if !text.chars().any(char::is_alphabetic) {
        return None;
    }
    if text.starts_with('\0') {
        return None;
    }
    if is_uuid_shaped(text) {
        return None;
    }

    Some(text)
}

/// True for strings of exactly 36 hex-or-dash characters, case-insensitive.
///
/// Note blobs carry sync identifiers that decode as valid UTF-8; they are
/// technical identifiers, not content.
fn is_uuid_shaped(text: &str) -> bool {
    text.len() == 36 && text.bytes().all(|b| b.is_ascii_hexdigit() || b == b'-')
}

/// Join accepted candidates and collapse duplicate lines.
///
/// The candidates are joined with newlines, re-split into lines, trimmed, and
/// emptied of blanks; only the first occurrence of each distinct line survives
/// (exact, case-sensitive), in first-seen order. The underlying format repeats
/// the same fragment across internal representations, so without this step the
/// output would be full of duplicates.
fn dedup_lines(parts: &[&str]) -> String {
    let joined = parts.join("\n");

    let mut seen = HashSet::new();
    let mut lines = Vec::new();
    for line in joined.split('\n') {
        let line = line.trim();
        if line.is_empty() || !seen.insert(line) {
            continue;
        }
        lines.push(line);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn len_field(text: &str) -> Vec<u8> {
        assert!(text.len() < 128);
        let mut out = vec![0x0A, text.len() as u8];
        out.extend_from_slice(text.as_bytes());
        out
    }

    #[test]
    fn test_extract_empty() {
        assert_eq!(extract_text(&[]), "");
    }

    #[test]
    fn test_extract_all_zero_buffer() {
        assert_eq!(extract_text(&[0u8; 256]), "");
    }

    #[test]
    fn test_extract_duplicate_fields_collapse() {
        let mut data = len_field("hello");
        data.extend(len_field("hello"));
        data.extend(len_field("ab"));
        assert_eq!(extract_text(&data), "hello\nab");
    }

    #[test]
    fn test_extract_preserves_first_seen_order() {
        let mut data = len_field("zebra");
        data.extend(len_field("apple"));
        data.extend(len_field("zebra"));
        assert_eq!(extract_text(&data), "zebra\napple");
    }

    #[test]
    fn test_extract_gzip_transparent() {
        let mut data = len_field("note body text");
        data.extend(len_field("second line"));
        let plain = extract_text(&data);
        let compressed = extract_text(&gzip(&data));
        assert_eq!(plain, compressed);
        assert_eq!(plain, "note body text\nsecond line");
    }

    #[test]
    fn test_extract_uuid_only_blob_is_empty() {
        let data = len_field("d9a8e077-6f10-4b2e-91c3-0a5b4f7d8e21");
        assert_eq!(extract_text(&data), "");
    }

    #[test]
    fn test_extract_truncated_varint_keeps_earlier_fields() {
        let mut data = len_field("kept");
        data.extend_from_slice(&[0x12, 0xFF]);
        assert_eq!(extract_text(&data), "kept");
    }

    #[test]
    fn test_decompress_garbage_falls_back() {
        let data = b"definitely not gzip";
        assert_eq!(decompress(data).as_ref(), data);
    }

    #[test]
    fn test_decompress_roundtrip() {
        let original = b"some note content";
        assert_eq!(decompress(&gzip(original)).as_ref(), original);
    }

    #[test]
    fn test_readable_text_rejects_invalid_utf8() {
        assert_eq!(readable_text(&[0xFF, 0xFE, 0x41]), None);
    }

    #[test]
    fn test_readable_text_rejects_short() {
        assert_eq!(readable_text(b"a"), None);
        assert_eq!(readable_text(b""), None);
        assert_eq!(readable_text(b"ab"), Some("ab"));
    }

    #[test]
    fn test_readable_text_requires_alphabetic() {
        assert_eq!(readable_text(b"1234"), None);
        assert_eq!(readable_text(b"--!!"), None);
        assert_eq!(readable_text(b"a123"), Some("a123"));
        // Unicode letters count
        assert_eq!(readable_text("日本語".as_bytes()), Some("日本語"));
    }

    #[test]
    fn test_readable_text_rejects_leading_nul() {
        assert_eq!(readable_text(b"\0ab"), None);
    }

    #[test]
    fn test_readable_text_rejects_uuid_shapes() {
        assert_eq!(readable_text(b"d9a8e077-6f10-4b2e-91c3-0a5b4f7d8e21"), None);
        assert_eq!(readable_text(b"D9A8E077-6F10-4B2E-91C3-0A5B4F7D8E21"), None);
        // 36 chars but not hex-or-dash: genuine content
        let sentence = b"a sentence that is thirty-six chars!";
        assert_eq!(sentence.len(), 36);
        assert!(readable_text(sentence).is_some());
    }

    #[test]
    fn test_dedup_trims_and_drops_empty_lines() {
        let parts = ["  hello  ", "", "world\n\nhello", "world"];
        assert_eq!(dedup_lines(&parts), "hello\nworld");
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        let parts = ["Hello", "hello"];
        assert_eq!(dedup_lines(&parts), "Hello\nhello");
    }

    #[test]
    fn test_extractor_config_builder() {
        let config = ExtractorConfig::new().max_field_len(64);
        assert_eq!(config.max_field_len, 64);

        let extractor = TextExtractor::with_config(config);
        let data = len_field("short enough");
        assert_eq!(extractor.extract(&data), "short enough");
    }
}
