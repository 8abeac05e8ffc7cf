//! Scrolling text overlay.
//!
//! The compositor keeps a brightness layer as tall as one glyph and as
//! wide as the torch. Text enters at one side and scrolls one column per
//! `cycles_per_pixel` ticks; in between, brightness is cross-faded from
//! the outgoing column to the incoming one so the motion looks smooth.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::font::{GLYPH_ROWS, glyph_for};
use super::message::{MessageText, decode_message};
use crate::color::Rgb;
use crate::math8::{clamp_u8, dim8, increase, progress8};

/// Text appearance and timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextParams {
    pub color: Rgb,
    /// Peak brightness on the first pass
    pub intensity: u8,
    /// Share of the brightness that does not take part in cross-fading
    pub fade_base: u8,
    /// Ticks per scrolled column
    pub cycles_per_pixel: u8,
    /// Passes before the message is dropped, 0 repeats forever
    pub repeats: u8,
    /// Peak brightness lost with every pass
    pub fade_per_repeat: u8,
    /// Torch row holding the bottom of the glyphs
    pub base_line: u8,
    /// Scroll in the opposite direction
    pub mirrored: bool,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            color: Rgb {
                r: 0,
                g: 255,
                b: 180,
            },
            intensity: 255,
            fade_base: 140,
            cycles_per_pixel: 5,
            repeats: 15,
            fade_per_repeat: 15,
            base_line: 8,
            mirrored: false,
        }
    }
}

/// Split `value` into the brightness of the outgoing and the incoming
/// column for a fader position (0 = all outgoing)
///
/// A `fade_base` share of `value` is kept by both columns, the rest moves
/// from the outgoing to the incoming column as the fader advances.
pub const fn cross_fade(fader: u8, value: u8, fade_base: u8) -> (u8, u8) {
    let base = dim8(value, fade_base);
    let variable = value - base;
    let fade = dim8(variable, fader);
    let outgoing = base + (variable - fade);
    let incoming = base + fade;
    (outgoing, incoming)
}

/// Scrolling text overlay for a torch `COLS` columns around
#[derive(Debug, Clone)]
pub struct TextCompositor<const COLS: usize> {
    text: MessageText,
    /// Scroll width of the whole message in columns
    total_width: i32,
    /// Message column shown in the first text column
    pixel_offset: i32,
    cycle_count: u8,
    repeat_count: u16,
    visible_columns: usize,
    layer: [[u8; COLS]; GLYPH_ROWS],
}

impl<const COLS: usize> Default for TextCompositor<COLS> {
    fn default() -> Self {
        Self::new(COLS)
    }
}

impl<const COLS: usize> TextCompositor<COLS> {
    /// Create an idle compositor drawing glyphs in the first
    /// `visible_columns` columns
    pub fn new(visible_columns: usize) -> Self {
        Self {
            text: MessageText::new(),
            total_width: 0,
            pixel_offset: 0,
            cycle_count: 0,
            repeat_count: 0,
            visible_columns: visible_columns.min(COLS),
            layer: [[0; COLS]; GLYPH_ROWS],
        }
    }

    /// Decode and start showing a new message from its first pass
    pub fn set_message(&mut self, encoded: &[u8]) {
        self.set_text(decode_message(encoded));
    }

    /// Start showing already decoded text
    pub fn set_text(&mut self, text: MessageText) {
        if text.is_empty() {
            self.clear();
            return;
        }
        self.total_width = text
            .iter()
            .map(|&code| i32::from(glyph_for(code).advance()))
            .sum();
        self.text = text;
        self.repeat_count = 0;
        self.restart_pass();

        #[cfg(feature = "esp32-log")]
        println!(
            "[TextCompositor.set_text] {} chars, {} columns",
            self.text.len(),
            self.total_width
        );
    }

    /// Drop the message and blank the overlay
    pub fn clear(&mut self) {
        self.text.clear();
        self.total_width = 0;
        self.layer = [[0; COLS]; GLYPH_ROWS];
    }

    /// Whether a message is being shown
    pub fn is_active(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub const fn total_width(&self) -> i32 {
        self.total_width
    }

    pub const fn pixel_offset(&self) -> i32 {
        self.pixel_offset
    }

    pub const fn repeat_count(&self) -> u16 {
        self.repeat_count
    }

    /// Overlay brightness at column `x` of band row `row` (0 = bottom)
    pub fn brightness(&self, x: usize, row: usize) -> u8 {
        self.layer
            .get(row)
            .and_then(|r| r.get(x))
            .copied()
            .unwrap_or(0)
    }

    /// The whole overlay, band row 0 at the bottom
    pub const fn layer(&self) -> &[[u8; COLS]; GLYPH_ROWS] {
        &self.layer
    }

    /// Peak brightness for the current pass, `None` once faded out
    pub fn peak_brightness(&self, params: &TextParams) -> Option<u8> {
        let peak = i32::from(params.intensity)
            - i32::from(self.repeat_count) * i32::from(params.fade_per_repeat);
        (peak > 0).then(|| clamp_u8(peak))
    }

    /// Character index and glyph column shown at text column `x`
    ///
    /// `None` for blank columns: outside the visible columns, before the
    /// message starts, in the spacing between glyphs or past the end.
    pub fn column_source(&self, x: usize) -> Option<(usize, usize)> {
        if x >= self.visible_columns {
            return None;
        }
        let x = i32::try_from(x).ok()?;
        let mut offset = self.pixel_offset + x;
        if offset < 0 {
            return None;
        }
        for (index, &code) in self.text.iter().enumerate() {
            let glyph = glyph_for(code);
            let advance = i32::from(glyph.advance());
            if offset < advance {
                let column = usize::try_from(offset).ok()?;
                return (column < usize::from(glyph.width())).then_some((index, column));
            }
            offset -= advance;
        }
        None
    }

    /// Render the overlay for this tick and advance the scroll position
    pub fn tick(&mut self, params: &TextParams) {
        if !self.is_active() {
            return;
        }
        let Some(peak) = self.peak_brightness(params) else {
            self.clear();
            return;
        };

        let cycles = params.cycles_per_pixel.max(1);
        let fader = progress8(u16::from(self.cycle_count), u16::from(cycles));
        let (outgoing, incoming) = cross_fade(fader, peak, params.fade_base);
        self.render(params.mirrored, peak, outgoing, incoming);
        self.advance(params, cycles);
    }

    fn render(&mut self, mirrored: bool, peak: u8, outgoing: u8, incoming: u8) {
        for x in 0..COLS {
            let bits = self
                .column_source(x)
                .and_then(|(index, column)| {
                    self.text
                        .get(index)
                        .map(|&code| glyph_for(code).column(column))
                })
                .unwrap_or(0);
            let target = Self::layer_column(x, mirrored);
            let previous = x.checked_sub(1).map(|p| Self::layer_column(p, mirrored));

            for (row, layer_row) in self.layer.iter_mut().enumerate() {
                // Band row 0 is the bottom of the glyph
                if bits & (0x40 >> row) == 0 {
                    layer_row[target] = 0;
                    continue;
                }
                layer_row[target] = outgoing;
                if let Some(previous) = previous {
                    layer_row[previous] = increase(layer_row[previous], incoming, peak);
                }
            }
        }
    }

    fn advance(&mut self, params: &TextParams, cycles: u8) {
        self.cycle_count += 1;
        if self.cycle_count < cycles {
            return;
        }
        self.cycle_count = 0;
        self.pixel_offset += 1;
        if self.pixel_offset <= self.total_width {
            return;
        }

        self.repeat_count = self.repeat_count.saturating_add(1);
        let limit_reached =
            params.repeats != 0 && self.repeat_count >= u16::from(params.repeats);
        if limit_reached || self.peak_brightness(params).is_none() {
            #[cfg(feature = "esp32-log")]
            println!(
                "[TextCompositor.advance] message done after {} passes",
                self.repeat_count
            );
            self.clear();
        } else {
            self.restart_pass();
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn restart_pass(&mut self) {
        self.pixel_offset = -(COLS as i32);
        self.cycle_count = 0;
    }

    const fn layer_column(x: usize, mirrored: bool) -> usize {
        if mirrored { COLS - 1 - x } else { x }
    }
}
