//! Fixed-width little-endian field decoding at arbitrary byte offsets.

use crate::error::FormatError;

/// Size of an encoded `f64`.
pub const F64_WIDTH: usize = 8;

/// Size of an encoded `bool`.
pub const BOOL_WIDTH: usize = 1;

fn field(buffer: &[u8], offset: usize, width: usize) -> Result<&[u8], FormatError> {
    offset
        .checked_add(width)
        .and_then(|end| buffer.get(offset..end))
        .ok_or(FormatError::OutOfRange {
            offset,
            width,
            len: buffer.len(),
        })
}

/// Decode an IEEE-754 double stored little-endian at `offset`.
pub fn read_f64(buffer: &[u8], offset: usize) -> Result<f64, FormatError> {
    let bytes = field(buffer, offset, F64_WIDTH)?;
    let mut raw = [0u8; F64_WIDTH];
    raw.copy_from_slice(bytes);
    Ok(f64::from_le_bytes(raw))
}

/// Decode a one-byte boolean at `offset`. Any non-zero byte is `true`.
pub fn read_bool(buffer: &[u8], offset: usize) -> Result<bool, FormatError> {
    Ok(field(buffer, offset, BOOL_WIDTH)?[0] != 0)
}

/// Offset of the first occurrence of `needle` at or after `start`.
pub fn find_from(haystack: &[u8], needle: &[u8], start: usize) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    haystack
        .get(start..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| start + i)
}
