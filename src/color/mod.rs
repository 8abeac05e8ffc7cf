mod mapper;
mod pixel;
mod wheel;

use smart_leds::RGB8;

pub use mapper::{
    DEFAULT_OVERHEAT_THRESHOLD, ENERGY_BRIGHTNESS, EnergyCoefficients, EnergyPalette,
    OVERHEAT_GREEN, OVERHEAT_RED, energy_brightness,
};
pub use pixel::{Intensity, Pixel};
pub use wheel::wheel;

pub type Rgb = RGB8;

/// Create an RGB color from a u32 value (0xRRGGBB format)
#[allow(clippy::cast_possible_truncation)]
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}

/// Pack an RGB color into a u32 value (0xRRGGBB format)
pub const fn rgb_to_u32(color: Rgb) -> u32 {
    ((color.r as u32) << 16) | ((color.g as u32) << 8) | color.b as u32
}
