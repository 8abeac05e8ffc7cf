//! WS281x bitstream encoding and transmission.
//!
//! The chips use a self-clocking one-wire protocol: every data bit is a
//! high pulse whose width tells a 1 from a 0. Driving the line from an
//! SPI peripheral clocked at ~9 MHz, one SPI byte covers one data bit, so
//! a bit is emitted as one of two byte patterns. A line held low for more
//! than ~50 µs latches the frame, which means nothing may stall the
//! stream in the middle of a frame.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use embedded_hal::spi::SpiBus;

use crate::color::Pixel;
use crate::gamma::{PWM_TABLE, PwmTable};
use crate::pixel_buffer::PixelBuffer;

/// Bytes emitted per data bit
pub const BYTES_PER_BIT: usize = 1;

/// Encoded size of one 8-bit channel
pub const BYTES_PER_CHANNEL: usize = 8 * BYTES_PER_BIT;

/// Encoded size of one LED
pub const BYTES_PER_LED: usize = 3 * BYTES_PER_CHANNEL;

/// Idle-low bytes sent after a frame; 60 bytes at 9 MHz hold the line
/// low for ~53 µs
pub const LATCH_BYTES: usize = 60;

/// Transmission order of the color channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorOrder {
    /// Green, red, blue (WS2812, WS2812B)
    Grb,
    /// Blue, red, green
    Brg,
}

impl ColorOrder {
    /// Channel levels of `pixel` in wire order
    pub const fn arrange(self, pixel: Pixel) -> [u8; 3] {
        let r = pixel.red().level();
        let g = pixel.green().level();
        let b = pixel.blue().level();
        match self {
            Self::Grb => [g, r, b],
            Self::Brg => [b, r, g],
        }
    }
}

/// SPI byte patterns for the two pulse widths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseEncoding {
    /// Long high pulse, logical 1
    pub one: u8,
    /// Short high pulse, logical 0
    pub zero: u8,
}

impl PulseEncoding {
    /// Patterns for an SPI clock of ~9 MHz
    pub const SPI_9MHZ: Self = Self {
        one: 0x7E,
        zero: 0x70,
    };

    /// Encode one byte, most significant bit first
    pub const fn encode_byte(self, value: u8) -> [u8; BYTES_PER_CHANNEL] {
        let mut out = [0u8; BYTES_PER_CHANNEL];
        let mut bit = 0;
        while bit < 8 {
            out[bit] = if value & (0x80 >> bit) != 0 {
                self.one
            } else {
                self.zero
            };
            bit += 1;
        }
        out
    }
}

/// Wire format of an LED chip variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedChip {
    pub order: ColorOrder,
    pub pulses: PulseEncoding,
}

impl LedChip {
    /// WS2812 family
    pub const WS2812: Self = Self {
        order: ColorOrder::Grb,
        pulses: PulseEncoding::SPI_9MHZ,
    };

    /// Chips expecting blue, red, green
    pub const BRG: Self = Self {
        order: ColorOrder::Brg,
        pulses: PulseEncoding::SPI_9MHZ,
    };

    /// Encode one pixel: each 5-bit level goes through `pwm` and is then
    /// serialized in the chip's channel order
    pub fn encode_pixel(&self, pixel: Pixel, pwm: &PwmTable) -> [u8; BYTES_PER_LED] {
        let mut out = [0u8; BYTES_PER_LED];
        for (chunk, level) in out
            .chunks_exact_mut(BYTES_PER_CHANNEL)
            .zip(self.order.arrange(pixel))
        {
            let duty = pwm[level as usize & (pwm.len() - 1)];
            chunk.copy_from_slice(&self.pulses.encode_byte(duty));
        }
        out
    }
}

/// Total encoded size of a frame, latch excluded
pub const fn frame_len(pixel_count: usize, leds_per_pixel: u8) -> usize {
    pixel_count * leds_per_pixel as usize * BYTES_PER_LED
}

/// Destination for the encoded bitstream
///
/// Implement this for the peripheral that drives the data line.
pub trait BitstreamSink {
    type Error;

    /// Put the data line into its idle-low state
    fn idle_low(&mut self) -> Result<(), Self::Error>;

    /// Shift out encoded bytes
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Hold the line low long enough for the chips to latch
    fn latch(&mut self) -> Result<(), Self::Error>;
}

/// [`BitstreamSink`] on top of a blocking SPI bus (MOSI only)
///
/// The SPI must be configured MSB first at ~9 MHz for
/// [`PulseEncoding::SPI_9MHZ`].
pub struct SpiSink<SPI> {
    spi: SPI,
}

impl<SPI: SpiBus<u8>> SpiSink<SPI> {
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI: SpiBus<u8>> BitstreamSink for SpiSink<SPI> {
    type Error = SPI::Error;

    fn idle_low(&mut self) -> Result<(), Self::Error> {
        // MOSI stays at the level of the last bit sent
        self.spi.write(&[0])?;
        self.spi.flush()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.spi.write(bytes)
    }

    fn latch(&mut self) -> Result<(), Self::Error> {
        self.spi.write(&[0; LATCH_BYTES])?;
        self.spi.flush()
    }
}

/// Serializes a [`PixelBuffer`] to an LED chain
pub struct ProtocolDriver<S: BitstreamSink> {
    sink: S,
    chip: LedChip,
    pwm: PwmTable,
}

impl<S: BitstreamSink> ProtocolDriver<S> {
    pub const fn new(sink: S, chip: LedChip) -> Self {
        Self {
            sink,
            chip,
            pwm: PWM_TABLE,
        }
    }

    /// Replace the brightness to duty table
    #[must_use]
    pub const fn with_pwm_table(mut self, pwm: PwmTable) -> Self {
        self.pwm = pwm;
        self
    }

    pub const fn chip(&self) -> LedChip {
        self.chip
    }

    /// Make sure the line idles low before the first frame
    pub fn begin(&mut self) -> Result<(), S::Error> {
        self.sink.idle_low()
    }

    /// Send a whole frame followed by the latch pause
    ///
    /// Runs inside a critical section: an interrupt firing mid-frame can
    /// stretch a gap past the latch threshold and split the frame. The
    /// section is left on every path, including a failing sink.
    pub fn transmit<const MAX_PIXELS: usize>(
        &mut self,
        frame: &PixelBuffer<MAX_PIXELS>,
    ) -> Result<(), S::Error> {
        let leds_per_pixel = frame.topology().leds_per_pixel();
        let chip = self.chip;
        let pwm = &self.pwm;
        let sink = &mut self.sink;

        let result = critical_section::with(|_cs| {
            for pixel in frame.as_slice() {
                let encoded = chip.encode_pixel(*pixel, pwm);
                for _ in 0..leds_per_pixel {
                    sink.write(&encoded)?;
                }
            }
            sink.latch()
        });

        #[cfg(feature = "esp32-log")]
        {
            if result.is_err() {
                println!("[ProtocolDriver.transmit] frame transmission failed");
            }
        }

        result
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn release(self) -> S {
        self.sink
    }
}
