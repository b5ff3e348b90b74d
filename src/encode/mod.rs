//! UTF-8 byte counting and encoding for UTF-16 text.
//!
//! Text arriving as UTF-16 code units (from Windows APIs, JavaScript engines
//! or Java) is encoded to UTF-8 on its way into a builder. The byte count is
//! computed first so the encoded form can be written straight into chunk
//! storage when it fits. Unpaired surrogates become U+FFFD.

use std::char::{REPLACEMENT_CHARACTER, decode_utf16};

/// Returns the number of UTF-8 bytes `units` encode to.
///
/// # Example
///
/// ```
/// use chunkstr::encode::utf16_byte_count;
///
/// let units: Vec<u16> = "h€llo".encode_utf16().collect();
/// assert_eq!(utf16_byte_count(&units), "h€llo".len());
/// ```
pub fn utf16_byte_count(units: &[u16]) -> usize {
    decode_utf16(units.iter().copied())
        .map(|c| c.unwrap_or(REPLACEMENT_CHARACTER).len_utf8())
        .sum()
}

/// Encodes `units` as UTF-8 into the front of `dst`.
///
/// Returns the number of bytes written, or `None` if `dst` is too small; in
/// that case the contents of `dst` are unspecified.
pub fn encode_utf16(units: &[u16], dst: &mut [u8]) -> Option<usize> {
    let mut pos = 0;
    for c in decode_utf16(units.iter().copied()) {
        let c = c.unwrap_or(REPLACEMENT_CHARACTER);
        let end = pos + c.len_utf8();
        if end > dst.len() {
            return None;
        }
        c.encode_utf8(&mut dst[pos..end]);
        pos = end;
    }
    Some(pos)
}
