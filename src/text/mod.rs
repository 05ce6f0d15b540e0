//! Offset to line/column conversion for source text.
//!
//! The JS/TS extractor and the usage locator work on absolute byte offsets
//! internally but report line/column ranges, so both build a `LineIndex`
//! over the file text once and convert through it.

use crate::scanner::types::Position;

/// Precomputed table of line start offsets for one source text.
///
/// Lines are zero-based; columns are byte offsets within the line.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line. Always contains at least `[0]`.
    line_starts: Vec<usize>,
    /// Total length of the indexed text in bytes.
    len: usize,
}

impl LineIndex {
    /// Build an index over the given text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(idx + 1);
            }
        }
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Number of lines in the indexed text.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset at which the given line starts.
    ///
    /// Lines past the end of the text clamp to the text length.
    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts.get(line).copied().unwrap_or(self.len)
    }

    /// Convert an absolute byte offset into a zero-based line/column position.
    ///
    /// Offsets past the end of the text clamp to the final position.
    pub fn position_of(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        // partition_point gives the first line starting after the offset.
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        Position {
            line,
            column: offset - self.line_starts[line],
        }
    }

    /// Convert a zero-based line/column position back into a byte offset.
    pub fn offset_of(&self, position: Position) -> usize {
        (self.line_start(position.line) + position.column).min(self.len)
    }
}
