//! Per-tick frame composition.
//!
//! The composer owns everything that changes from frame to frame: the
//! configuration, the energy field, the text overlay and the random
//! source. Each tick it applies queued commands, advances the text and
//! the current mode, and paints the result into a [`PixelBuffer`].

#[cfg(feature = "esp32-log")]
use esp_println::println;

use rand::RngCore;

use crate::bounds::TextBand;
use crate::color::{Rgb, wheel};
use crate::command::{CommandReceiver, ControlCommand};
use crate::config::{DisplayConfig, DisplayMode, ParamsOutcome};
use crate::device::{self, DeviceRequest};
use crate::energy::EnergyField;
use crate::math8::{dim8, progress8};
use crate::pixel_buffer::PixelBuffer;
use crate::text::TextCompositor;

/// Orchestrates one torch frame per [`FrameComposer::render`] call
///
/// `COLS` x `ROWS` is the visual grid, row 0 at the bottom. It is mapped
/// onto the pixel buffer's logical coordinates one to one.
pub struct FrameComposer<R: RngCore, const COLS: usize, const ROWS: usize> {
    config: DisplayConfig,
    energy: EnergyField<COLS, ROWS>,
    text: TextCompositor<COLS>,
    rng: R,
    cycle: u8,
}

impl<R: RngCore, const COLS: usize, const ROWS: usize> FrameComposer<R, COLS, ROWS> {
    /// Create a composer with a cold field and no message
    ///
    /// Text is drawn in all but the last two columns, which hides the
    /// seam where the strip wraps around the torch.
    pub fn new(config: DisplayConfig, rng: R) -> Self {
        Self {
            config,
            energy: EnergyField::new(),
            text: TextCompositor::new(COLS.saturating_sub(2)),
            rng,
            cycle: 0,
        }
    }

    pub const fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub const fn energy(&self) -> &EnergyField<COLS, ROWS> {
        &self.energy
    }

    pub const fn text(&self) -> &TextCompositor<COLS> {
        &self.text
    }

    pub const fn mode(&self) -> DisplayMode {
        self.config.mode
    }

    /// Apply every queued command, returns how many were handled
    pub fn process_pending<const SIZE: usize>(
        &mut self,
        commands: &CommandReceiver<'_, SIZE>,
    ) -> usize {
        let mut handled = 0;
        while let Some(command) = commands.try_receive() {
            self.apply_command(command);
            handled += 1;
        }
        handled
    }

    /// Apply a single command right away
    pub fn apply_command(&mut self, command: ControlCommand) {
        match command {
            ControlCommand::Params(params) => {
                self.apply_params(&params);
            }
            ControlCommand::Message(encoded) => self.set_message(&encoded),
            ControlCommand::Mode(mode) => self.set_mode(mode),
            ControlCommand::Device(request) => {
                self.handle_device(request);
            }
        }
    }

    /// Apply a `key=value` parameter text, resetting the energy field when
    /// a simulation parameter asks for it
    pub fn apply_params(&mut self, params: &str) -> ParamsOutcome {
        let previous_mode = self.config.mode;
        let outcome = self.config.apply_params(params);
        if outcome.reset_energy {
            self.energy.reset();
        }
        self.log_mode_change(previous_mode);
        outcome
    }

    /// Decode and start showing a message
    pub fn set_message(&mut self, encoded: &[u8]) {
        #[cfg(feature = "esp32-log")]
        println!("[FrameComposer.set_message] {} bytes", encoded.len());
        self.text.set_message(encoded);
    }

    /// Switch the display mode from the next frame on
    pub fn set_mode(&mut self, mode: DisplayMode) {
        let previous_mode = self.config.mode;
        self.config.mode = mode;
        self.log_mode_change(previous_mode);
    }

    /// Answer a device interface request, applying writes
    pub fn handle_device(&mut self, request: DeviceRequest) -> i32 {
        let previous_mode = self.config.mode;
        let answer = device::handle(&mut self.config, request);
        self.log_mode_change(previous_mode);
        answer
    }

    /// Start the fire over from a cold field
    pub fn reset_energy(&mut self) {
        self.energy.reset();
    }

    /// Advance the animation by one tick and paint the frame
    pub fn render<const MAX_PIXELS: usize>(&mut self, frame: &mut PixelBuffer<MAX_PIXELS>) {
        self.text.tick(&self.config.text);

        match self.config.mode {
            DisplayMode::Off => frame.clear(),
            DisplayMode::Lamp => self.render_lamp(frame),
            DisplayMode::Torch => self.render_torch(frame),
            DisplayMode::ColorCycle => self.render_color_cycle(frame),
            DisplayMode::TestPattern => self.render_test_pattern(frame),
        }
    }

    fn render_lamp<const MAX_PIXELS: usize>(&self, frame: &mut PixelBuffer<MAX_PIXELS>) {
        let color = self.config.lamp_color;
        let brightness = self.config.brightness;
        self.paint(frame, |_, _| (color, brightness));
    }

    fn render_torch<const MAX_PIXELS: usize>(&mut self, frame: &mut PixelBuffer<MAX_PIXELS>) {
        self.energy.tick(&self.config.torch, &mut self.rng);

        let upside_down = self.config.torch.upside_down;
        let palette = self.config.palette;
        let brightness = self.config.brightness;
        let energy = &self.energy;
        self.paint(frame, |x, y| {
            // Mirroring the linear cell index flips both axes
            let (ex, ey) = if upside_down {
                (COLS - 1 - x, ROWS - 1 - y)
            } else {
                (x, y)
            };
            (palette.color_for(energy.energy(ex, ey)), brightness)
        });
    }

    fn render_color_cycle<const MAX_PIXELS: usize>(
        &mut self,
        frame: &mut PixelBuffer<MAX_PIXELS>,
    ) {
        self.cycle = self.cycle.wrapping_add(1);
        let cycle = self.cycle;
        let cells = COLS * ROWS;
        let brightness = self.config.brightness;

        self.paint_with_text(frame, |x, y, overlay| {
            let index = y * COLS + x;
            #[allow(clippy::cast_possible_truncation)]
            let hue = ((index * 256 / cells) as u8).wrapping_add(cycle);
            match overlay {
                Some(level) => (wheel(hue), dim8(level, brightness)),
                None => (wheel(hue), brightness >> 1),
            }
        });
    }

    fn render_test_pattern<const MAX_PIXELS: usize>(&self, frame: &mut PixelBuffer<MAX_PIXELS>) {
        let brightness = self.config.brightness;
        for y in 0..ROWS {
            for x in 0..COLS {
                let color = test_pattern_color::<COLS, ROWS>(x, y);
                set_dimmed(frame, x, y, color, brightness);
            }
        }
    }

    /// Paint every cell with the mode's color unless text covers it
    fn paint<const MAX_PIXELS: usize>(
        &self,
        frame: &mut PixelBuffer<MAX_PIXELS>,
        mut background: impl FnMut(usize, usize) -> (Rgb, u8),
    ) {
        let text_color = self.config.text.color;
        let brightness = self.config.brightness;
        self.paint_with_text(frame, |x, y, overlay| match overlay {
            Some(level) => (text_color, dim8(level, brightness)),
            None => background(x, y),
        });
    }

    /// Paint every cell, handing the painter the text overlay brightness
    /// where it is non-zero
    fn paint_with_text<const MAX_PIXELS: usize>(
        &self,
        frame: &mut PixelBuffer<MAX_PIXELS>,
        mut painter: impl FnMut(usize, usize, Option<u8>) -> (Rgb, u8),
    ) {
        let band = TextBand::from_base_line(self.config.text.base_line);
        for y in 0..ROWS {
            let band_row = band.row_of(y);
            for x in 0..COLS {
                let overlay = band_row
                    .map(|row| self.text.brightness(x, row))
                    .filter(|&level| level > 0);
                let (color, brightness) = painter(x, y, overlay);
                set_dimmed(frame, x, y, color, brightness);
            }
        }
    }

    #[allow(unused_variables, clippy::unused_self)]
    fn log_mode_change(&self, previous: DisplayMode) {
        #[cfg(feature = "esp32-log")]
        {
            if previous != self.config.mode {
                println!(
                    "[FrameComposer.set_mode] {} -> {}",
                    previous.as_str(),
                    self.config.mode.as_str()
                );
            }
        }
    }
}

/// Calibration gradient: red rises along X, green along Y, blue falls
/// along X
pub fn test_pattern_color<const COLS: usize, const ROWS: usize>(x: usize, y: usize) -> Rgb {
    let ramp = |pos: usize, len: usize| {
        let pos = u16::try_from(pos).unwrap_or(u16::MAX);
        let last = u16::try_from(len.saturating_sub(1)).unwrap_or(u16::MAX);
        progress8(pos, last)
    };
    let red = ramp(x, COLS);
    Rgb {
        r: red,
        g: ramp(y, ROWS),
        b: 255 - red,
    }
}

fn set_dimmed<const MAX_PIXELS: usize>(
    frame: &mut PixelBuffer<MAX_PIXELS>,
    x: usize,
    y: usize,
    color: Rgb,
    brightness: u8,
) {
    let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
        return;
    };
    frame.set_pixel_dimmed(x, y, color, brightness);
}
