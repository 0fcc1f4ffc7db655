use std::borrow::Cow;

/// Decode raw bytes to a string
///
/// Attempts UTF-8 decoding first, falling back to Windows-1252 (CP1252) if
/// UTF-8 fails. Older airspace exports are often Extended ASCII, and a
/// leading UTF-8 byte order mark is stripped.
///
/// Always succeeds with some valid string.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    match str::from_utf8(bytes) {
        Ok(s) => s.into(),
        Err(_) => encoding_rs::WINDOWS_1252.decode(bytes).0,
    }
}
