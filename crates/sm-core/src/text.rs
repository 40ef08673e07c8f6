//! UTF-16 offset helpers.
//!
//! DOM offsets (`selectionStart`, range offsets) count UTF-16 code units,
//! not bytes or chars.

/// Length of `s` in UTF-16 code units.
pub fn utf16_len(s: &str) -> u32 {
    s.encode_utf16().count() as u32
}

/// `String.prototype.substring` over UTF-16 offsets.
///
/// Offsets are clamped to the string and swapped if reversed. A boundary
/// that splits a surrogate pair yields U+FFFD for the orphaned half.
pub fn utf16_slice(s: &str, start: u32, end: u32) -> String {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    let units: Vec<u16> = s
        .encode_utf16()
        .skip(start as usize)
        .take((end - start) as usize)
        .collect();
    String::from_utf16_lossy(&units)
}

/// Collapse every run of whitespace into one space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
