//! Hex rendering for inspecting raw PCF messages

use std::fmt::Write;

const BYTES_PER_ROW: usize = 16;

/// Render at most `limit` bytes of `data` as rows of 16 space-separated
/// hex pairs, each row prefixed with its offset.
pub fn hex_dump(data: &[u8], limit: usize) -> String {
    let shown = &data[..data.len().min(limit)];
    let mut out = String::with_capacity(shown.len() * 3 + shown.len() / BYTES_PER_ROW * 8);

    for (row, chunk) in shown.chunks(BYTES_PER_ROW).enumerate() {
        let _ = write!(out, "{:08x} ", row * BYTES_PER_ROW);
        for byte in chunk {
            let _ = write!(out, " {:02x}", byte);
        }
        out.push('\n');
    }
    out
}
