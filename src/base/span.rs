//! Offsets, ranges and line/column positions in unit source.

pub use text_size::TextRange;
pub use text_size::TextSize;

/// A 0-indexed line and byte column, as editors send them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// Converts between byte offsets and [`LineCol`] for one text.
///
/// `\r\n` and `\n` both end a line; the `\r` belongs to the line it ends.
#[derive(Clone, Debug)]
pub struct LineIndex {
    /// Offset of the first byte of every line.
    starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .map(|i| TextSize::from(i as u32))
            .collect();
        Self {
            starts,
            len: TextSize::of(text),
        }
    }

    /// Position of `offset`. Offsets past the end land on the last line.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self.starts.partition_point(|&start| start <= offset) - 1;
        LineCol::new(line as u32, u32::from(offset - self.starts[line]))
    }

    /// Offset of `pos`, or `None` when the line does not exist or the column
    /// lies beyond the line's end.
    pub fn offset(&self, pos: LineCol) -> Option<TextSize> {
        let line = pos.line as usize;
        let start = *self.starts.get(line)?;
        let end = self.starts.get(line + 1).copied().unwrap_or(self.len);
        let offset = start + TextSize::from(pos.col);
        (offset <= end).then_some(offset)
    }
}
