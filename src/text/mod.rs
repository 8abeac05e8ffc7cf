//! Bitmap text rendering for the torch.

mod compositor;
mod font;
mod message;

pub use compositor::{TextCompositor, TextParams, cross_fade};
pub use font::{
    FALLBACK_CODE, GLYPH_COUNT, GLYPH_ROWS, GLYPH_SPACING, Glyph, MAX_GLYPH_WIDTH, glyph_for,
    glyph_index,
};
pub use message::{MAX_MESSAGE_LEN, MessageText, accented_code, decode_message};
