//! Reduced-precision pixel storage.
//!
//! A frame of a few hundred LEDs has to live in a small RAM budget, so
//! the buffer keeps 5 bits per channel packed into one `u16`.

use super::Rgb;

const CHANNEL_BITS: u16 = 5;
const CHANNEL_MASK: u16 = 0x1F;
const RED_SHIFT: u16 = CHANNEL_BITS * 2;
const GREEN_SHIFT: u16 = CHANNEL_BITS;

/// Linear channel intensity in the 5-bit domain (0-31)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Intensity(u8);

impl Intensity {
    /// Highest representable level
    pub const MAX_LEVEL: u8 = 31;
    /// Channel off
    pub const OFF: Self = Self(0);
    /// Channel at full intensity
    pub const FULL: Self = Self(Self::MAX_LEVEL);

    /// Create an intensity from a 5-bit level, clamping anything above 31
    pub const fn new(level: u8) -> Self {
        if level > Self::MAX_LEVEL {
            Self(Self::MAX_LEVEL)
        } else {
            Self(level)
        }
    }

    /// Quantize an 8-bit linear value to 5 bits
    pub const fn from_u8(value: u8) -> Self {
        Self(value >> 3)
    }

    /// The raw 5-bit level
    pub const fn level(self) -> u8 {
        self.0
    }

    /// Expand back to an 8-bit linear value, replicating the top bits
    /// so that full intensity maps to 255
    pub const fn to_u8(self) -> u8 {
        (self.0 << 3) | (self.0 >> 2)
    }
}

/// One logical pixel: three 5-bit channels packed as `0rrrrrgggggbbbbb`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pixel(u16);

impl Pixel {
    /// All channels off
    pub const OFF: Self = Self(0);

    /// Create a pixel from three intensities
    pub const fn new(red: Intensity, green: Intensity, blue: Intensity) -> Self {
        Self(
            ((red.0 as u16) << RED_SHIFT)
                | ((green.0 as u16) << GREEN_SHIFT)
                | blue.0 as u16,
        )
    }

    /// Quantize an 8-bit color
    pub const fn from_rgb(color: Rgb) -> Self {
        Self::new(
            Intensity::from_u8(color.r),
            Intensity::from_u8(color.g),
            Intensity::from_u8(color.b),
        )
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn red(self) -> Intensity {
        Intensity(((self.0 >> RED_SHIFT) & CHANNEL_MASK) as u8)
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn green(self) -> Intensity {
        Intensity(((self.0 >> GREEN_SHIFT) & CHANNEL_MASK) as u8)
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn blue(self) -> Intensity {
        Intensity((self.0 & CHANNEL_MASK) as u8)
    }

    /// Expand to an approximate 8-bit linear color
    pub const fn to_rgb(self) -> Rgb {
        Rgb {
            r: self.red().to_u8(),
            g: self.green().to_u8(),
            b: self.blue().to_u8(),
        }
    }

    /// Whether every channel is off
    pub const fn is_off(self) -> bool {
        self.0 == 0
    }
}
