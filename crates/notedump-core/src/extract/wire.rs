//! Low-level protobuf wire format helpers.
//!
//! Apple Notes stores note bodies as a protobuf-like blob without any published
//! schema, so the extractor never decodes field numbers or typed values. The
//! only wire-format machinery it needs is here: classifying a tag byte by its
//! wire type, and decoding the varint length that follows a length-delimited
//! tag.
//!
//! ## Wire Format Overview
//!
//! Each protobuf field is encoded as:
//! - A "tag" byte whose low 3 bits carry the wire type
//! - The field data (format depends on wire type)
//!
//! Wire types:
//! - 0: VARINT (int32, int64, uint32, uint64, sint32, sint64, bool, enum)
//! - 1: I64 (fixed64, sfixed64, double)
//! - 2: LEN (string, bytes, embedded messages, packed repeated fields)
//! - 5: I32 (fixed32, sfixed32, float)
//!
//! Only wire type 2 matters for text recovery; everything else is treated as
//! noise to skip over.

/// Wire type marker for length-delimited fields (strings, bytes, messages)
pub const WIRE_TYPE_LEN: u8 = 2;

/// Extract the wire type from a tag byte (low 3 bits).
pub fn wire_type(tag: u8) -> u8 {
    tag & 0x07
}

/// Returns true if the tag byte marks a length-delimited field.
pub fn is_len_delimited(tag: u8) -> bool {
    wire_type(tag) == WIRE_TYPE_LEN
}

/// Decode an unsigned little-endian base-128 varint from the given bytes.
///
/// Returns the decoded value and the number of bytes consumed, or `None` when
/// the buffer ends while the continuation bit is still set. A truncated or
/// overlong varint is expected noise in schema-less data, not an error.
pub fn decode_varint(data: &[u8]) -> Option<(u64, usize)> {
    let mut result: u64 = 0;
    let mut shift = 0;

    for (i, &byte) in data.iter().enumerate() {
        if i >= 10 {
            // Varints are at most 10 bytes for a 64-bit value
            return None;
        }

        result |= u64::from(byte & 0x7F) << shift;
        shift += 7;

        if byte & 0x80 == 0 {
            return Some((result, i + 1));
        }
    }

    None
}
