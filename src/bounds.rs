use crate::text::GLYPH_ROWS;

/// Rows of the torch covered by the text overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBand {
    pub start: usize,
    pub end: usize,
}

impl TextBand {
    /// Band one glyph tall with its bottom at `base_line`
    pub const fn from_base_line(base_line: u8) -> Self {
        let start = base_line as usize;
        Self {
            start,
            end: start + GLYPH_ROWS,
        }
    }

    /// Number of rows in the band
    pub const fn count(self) -> usize {
        self.end - self.start
    }

    /// Band row for torch row `y`, `None` outside the band
    pub const fn row_of(self, y: usize) -> Option<usize> {
        if y >= self.start && y < self.end {
            Some(y - self.start)
        } else {
            None
        }
    }
}
