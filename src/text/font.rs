//! 7-row variable width bitmap font.
//!
//! Each glyph is a list of columns. Bit `n` of a column lights row `n`
//! counted from the top, so bit 6 is the bottom row.

/// Rows per glyph
pub const GLYPH_ROWS: usize = 7;

/// Widest glyph in the table
pub const MAX_GLYPH_WIDTH: usize = 7;

/// Blank columns between two glyphs
pub const GLYPH_SPACING: u8 = 1;

/// Glyph code drawn for characters the font does not cover
pub const FALLBACK_CODE: u8 = 0x7F;

/// First code covered by the table
const FIRST_CODE: u8 = 0x20;

/// Codes 0x80..=0x85 hold Ä Ö Ü ä ö ü
const ACCENTED_BASE: u8 = 0x80;
const ACCENTED_COUNT: u8 = 6;

/// Bitmap of one character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    width: u8,
    columns: [u8; MAX_GLYPH_WIDTH],
}

impl Glyph {
    /// Number of columns, 1 to [`MAX_GLYPH_WIDTH`]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Column bitmask, zero past the glyph's width
    pub const fn column(&self, index: usize) -> u8 {
        if index < self.width as usize {
            self.columns[index]
        } else {
            0
        }
    }

    /// Columns taken up in a line of text, trailing spacing included
    pub const fn advance(&self) -> u16 {
        self.width as u16 + GLYPH_SPACING as u16
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn glyph(columns: &[u8]) -> Glyph {
    let mut out = [0u8; MAX_GLYPH_WIDTH];
    let mut i = 0;
    while i < columns.len() && i < MAX_GLYPH_WIDTH {
        out[i] = columns[i];
        i += 1;
    }
    Glyph {
        width: i as u8,
        columns: out,
    }
}

/// Glyph for an internal character code
///
/// Covers ASCII 0x20..=0x7F and the accented codes 0x80..=0x85; anything
/// else gets the fallback box.
pub fn glyph_for(code: u8) -> &'static Glyph {
    &GLYPHS[glyph_index(code)]
}

/// Index into the glyph table for an internal character code
pub const fn glyph_index(code: u8) -> usize {
    if code >= FIRST_CODE && code <= FALLBACK_CODE {
        (code - FIRST_CODE) as usize
    } else if code >= ACCENTED_BASE && code < ACCENTED_BASE + ACCENTED_COUNT {
        (FALLBACK_CODE - FIRST_CODE + 1 + code - ACCENTED_BASE) as usize
    } else {
        (FALLBACK_CODE - FIRST_CODE) as usize
    }
}

/// Number of glyphs in the table
pub const GLYPH_COUNT: usize = 102;

static GLYPHS: [Glyph; GLYPH_COUNT] = [
    glyph(&[0x00, 0x00, 0x00]), // space
    glyph(&[0x5f]), // !
    glyph(&[0x01, 0x00, 0x01]), // "
    glyph(&[0x28, 0x7c, 0x28, 0x7c, 0x28]), // #
    glyph(&[0x24, 0x2a, 0x7f, 0x2a, 0x12]), // $
    glyph(&[0x4c, 0x2c, 0x10, 0x68, 0x64]), // %
    glyph(&[0x30, 0x4e, 0x55, 0x22, 0x40]), // &
    glyph(&[0x01]), // quote
    glyph(&[0x1c, 0x22, 0x41]), // (
    glyph(&[0x41, 0x22, 0x1c]), // )
    glyph(&[0x01, 0x03, 0x01, 0x03, 0x01]), // *
    glyph(&[0x08, 0x08, 0x3e, 0x08, 0x08]), // +
    glyph(&[0x50, 0x30]), // ,
    glyph(&[0x08, 0x08, 0x08, 0x08, 0x08]), // -
    glyph(&[0x60, 0x60]), // .
    glyph(&[0x40, 0x20, 0x10, 0x08, 0x04]), // /
    glyph(&[0x3e, 0x51, 0x49, 0x45, 0x3e]), // 0
    glyph(&[0x42, 0x7f, 0x40]), // 1
    glyph(&[0x62, 0x51, 0x49, 0x49, 0x46]), // 2
    glyph(&[0x22, 0x41, 0x49, 0x49, 0x36]), // 3
    glyph(&[0x0c, 0x0a, 0x09, 0x7f, 0x08]), // 4
    glyph(&[0x4f, 0x49, 0x49, 0x49, 0x31]), // 5
    glyph(&[0x3e, 0x49, 0x49, 0x49, 0x32]), // 6
    glyph(&[0x03, 0x01, 0x71, 0x09, 0x07]), // 7
    glyph(&[0x36, 0x49, 0x49, 0x49, 0x36]), // 8
    glyph(&[0x26, 0x49, 0x49, 0x49, 0x3e]), // 9
    glyph(&[0x66, 0x66]), // :
    glyph(&[0x56, 0x36]), // ;
    glyph(&[0x08, 0x14, 0x22, 0x41]), // <
    glyph(&[0x24, 0x24, 0x24, 0x24, 0x24]), // =
    glyph(&[0x41, 0x22, 0x14, 0x08]), // >
    glyph(&[0x02, 0x01, 0x59, 0x09, 0x06]), // ?
    glyph(&[0x3e, 0x41, 0x5d, 0x55, 0x5e]), // @
    glyph(&[0x7c, 0x0a, 0x09, 0x0a, 0x7c]), // A
    glyph(&[0x7f, 0x49, 0x49, 0x49, 0x36]), // B
    glyph(&[0x3e, 0x41, 0x41, 0x41, 0x22]), // C
    glyph(&[0x7f, 0x41, 0x41, 0x22, 0x1c]), // D
    glyph(&[0x7f, 0x49, 0x49, 0x41, 0x41]), // E
    glyph(&[0x7f, 0x09, 0x09, 0x01, 0x01]), // F
    glyph(&[0x3e, 0x41, 0x49, 0x49, 0x7a]), // G
    glyph(&[0x7f, 0x08, 0x08, 0x08, 0x7f]), // H
    glyph(&[0x41, 0x7f, 0x41]), // I
    glyph(&[0x30, 0x40, 0x40, 0x40, 0x3f]), // J
    glyph(&[0x7f, 0x08, 0x0c, 0x12, 0x61]), // K
    glyph(&[0x7f, 0x40, 0x40, 0x40, 0x40]), // L
    glyph(&[0x7f, 0x02, 0x1c, 0x02, 0x7f]), // M
    glyph(&[0x7f, 0x02, 0x04, 0x08, 0x7f]), // N
    glyph(&[0x3e, 0x41, 0x41, 0x41, 0x3e]), // O
    glyph(&[0x7f, 0x09, 0x09, 0x09, 0x06]), // P
    glyph(&[0x3e, 0x41, 0x51, 0x61, 0x7e]), // Q
    glyph(&[0x7f, 0x09, 0x09, 0x09, 0x76]), // R
    glyph(&[0x26, 0x49, 0x49, 0x49, 0x32]), // S
    glyph(&[0x01, 0x01, 0x7f, 0x01, 0x01]), // T
    glyph(&[0x3f, 0x40, 0x40, 0x40, 0x3f]), // U
    glyph(&[0x1f, 0x20, 0x40, 0x20, 0x1f]), // V
    glyph(&[0x7f, 0x40, 0x38, 0x40, 0x7f]), // W
    glyph(&[0x63, 0x14, 0x08, 0x14, 0x63]), // X
    glyph(&[0x03, 0x04, 0x78, 0x04, 0x03]), // Y
    glyph(&[0x61, 0x51, 0x49, 0x45, 0x43]), // Z
    glyph(&[0x7f, 0x41, 0x41]), // [
    glyph(&[0x04, 0x08, 0x10, 0x20, 0x40]), // backslash
    glyph(&[0x41, 0x41, 0x7f]), // ]
    glyph(&[0x04, 0x02, 0x01, 0x02]), // ^
    glyph(&[0x40, 0x40, 0x40, 0x40, 0x40]), // _
    glyph(&[0x01, 0x02]), // `
    glyph(&[0x20, 0x54, 0x54, 0x54, 0x78]), // a
    glyph(&[0x7f, 0x44, 0x44, 0x44, 0x38]), // b
    glyph(&[0x38, 0x44, 0x44, 0x44, 0x08]), // c
    glyph(&[0x38, 0x44, 0x44, 0x44, 0x7f]), // d
    glyph(&[0x38, 0x54, 0x54, 0x54, 0x18]), // e
    glyph(&[0x08, 0x7e, 0x09, 0x09, 0x02]), // f
    glyph(&[0x48, 0x54, 0x54, 0x54, 0x38]), // g
    glyph(&[0x7f, 0x08, 0x08, 0x08, 0x70]), // h
    glyph(&[0x48, 0x7a, 0x40]), // i
    glyph(&[0x20, 0x40, 0x40, 0x48, 0x3a]), // j
    glyph(&[0x7f, 0x10, 0x28, 0x44]), // k
    glyph(&[0x3f, 0x40, 0x40]), // l
    glyph(&[0x7c, 0x04, 0x38, 0x04, 0x78]), // m
    glyph(&[0x7c, 0x04, 0x04, 0x04, 0x78]), // n
    glyph(&[0x38, 0x44, 0x44, 0x44, 0x38]), // o
    glyph(&[0x7c, 0x14, 0x14, 0x14, 0x08]), // p
    glyph(&[0x08, 0x14, 0x14, 0x7c, 0x40]), // q
    glyph(&[0x7c, 0x04, 0x04, 0x04, 0x08]), // r
    glyph(&[0x48, 0x54, 0x54, 0x54, 0x24]), // s
    glyph(&[0x04, 0x04, 0x7f, 0x44, 0x44]), // t
    glyph(&[0x3c, 0x40, 0x40, 0x40, 0x7c]), // u
    glyph(&[0x1c, 0x20, 0x40, 0x20, 0x1c]), // v
    glyph(&[0x7c, 0x40, 0x38, 0x40, 0x7c]), // w
    glyph(&[0x44, 0x28, 0x10, 0x28, 0x44]), // x
    glyph(&[0x0c, 0x50, 0x50, 0x50, 0x3c]), // y
    glyph(&[0x44, 0x64, 0x54, 0x4c, 0x44]), // z
    glyph(&[0x08, 0x36, 0x41]), // {
    glyph(&[0x7f]), // |
    glyph(&[0x41, 0x36, 0x08]), // }
    glyph(&[0x04, 0x02, 0x04, 0x08]), // ~
    glyph(&[0x7f, 0x41, 0x41, 0x41, 0x7f]), // DEL (fallback box)
    glyph(&[0x7d, 0x0a, 0x09, 0x0a, 0x7d]), // Ä
    glyph(&[0x3f, 0x41, 0x41, 0x41, 0x3f]), // Ö
    glyph(&[0x3d, 0x40, 0x40, 0x40, 0x3d]), // Ü
    glyph(&[0x20, 0x55, 0x54, 0x55, 0x78]), // ä
    glyph(&[0x38, 0x45, 0x44, 0x45, 0x38]), // ö
    glyph(&[0x3c, 0x41, 0x40, 0x41, 0x7c]), // ü
];
