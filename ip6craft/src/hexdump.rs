//! Hex dumps of raw packet bytes, annotated by header boundaries.

use std::fmt::Write;

/// A named byte span inside a dumped buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region<'a> {
    /// Label printed above the span.
    pub name: &'a str,
    /// Offset of the first byte.
    pub start: usize,
    /// Number of bytes.
    pub len: usize,
}

impl<'a> Region<'a> {
    /// Create a new region.
    pub const fn new(name: &'a str, start: usize, len: usize) -> Self {
        Self { name, start, len }
    }

    fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.start + self.len
    }
}

/// Label of bytes not covered by any region.
pub const PAYLOAD_LABEL: &str = "payload";

const BYTES_PER_LINE: usize = 16;

/// Dump the first `byte_count` bytes of `buf`.
///
/// Every region starts on a new line below a `name [start..end)` label,
/// uncovered bytes are labeled [`PAYLOAD_LABEL`]. Each line holds at most 16
/// bytes prefixed by their offset.
pub fn dump(buf: &[u8], byte_count: usize, regions: &[Region<'_>]) -> String {
    let end = byte_count.min(buf.len());
    let mut out = String::new();
    let mut offset = 0;

    while offset < end {
        let (name, span_end) = match regions.iter().find(|r| r.contains(offset)) {
            Some(region) => (region.name, (region.start + region.len).min(end)),
            None => {
                let next_start = regions
                    .iter()
                    .map(|r| r.start)
                    .filter(|start| *start > offset)
                    .min()
                    .unwrap_or(end);
                (PAYLOAD_LABEL, next_start.min(end))
            }
        };

        let _ = writeln!(out, "{} [{}..{})", name, offset, span_end);
        for line_start in (offset..span_end).step_by(BYTES_PER_LINE) {
            let line_end = (line_start + BYTES_PER_LINE).min(span_end);
            let _ = write!(out, "{:04x} ", line_start);
            for byte in &buf[line_start..line_end] {
                let _ = write!(out, " {:02x}", byte);
            }
            out.push('\n');
        }
        offset = span_end;
    }

    out
}
