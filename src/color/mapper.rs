//! Energy to color mapping for the torch.

use super::Rgb;
use crate::math8::{increase, scale_coef};

/// Perceived brightness for raw energy, indexed by `energy >> 3`
///
/// Low energies rise steeply so dim embers are still visible, the top
/// end flattens out.
pub const ENERGY_BRIGHTNESS: [u8; 32] = [
    0, 64, 96, 112, 128, 144, 152, 160, 168, 176, 184, 184, 192, 200, 200, 208, 208, 216, 216, 224,
    224, 224, 232, 232, 232, 240, 240, 240, 240, 248, 248, 248,
];

/// Red and green of an overheated spark, blue follows the energy
pub const OVERHEAT_RED: u8 = 170;
pub const OVERHEAT_GREEN: u8 = 170;

/// Energies above this render as overheated sparks
pub const DEFAULT_OVERHEAT_THRESHOLD: u8 = 250;

/// Perceptually corrected brightness for a raw energy value
#[inline]
pub const fn energy_brightness(energy: u8) -> u8 {
    ENERGY_BRIGHTNESS[(energy >> 3) as usize]
}

/// How much color each unit of energy contributes, per channel
///
/// 256 means the corrected energy is added one to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnergyCoefficients {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

/// Colors used to render the energy field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnergyPalette {
    /// Color of cells without any energy
    pub background: Rgb,
    /// Base color added under every burning cell
    pub bias: Rgb,
    /// Energy contribution per channel
    pub energy: EnergyCoefficients,
    /// Energies above this render as overheated
    pub overheat_threshold: u8,
}

impl Default for EnergyPalette {
    fn default() -> Self {
        Self {
            background: Rgb { r: 0, g: 0, b: 0 },
            bias: Rgb { r: 5, g: 0, b: 0 },
            energy: EnergyCoefficients {
                red: 256,
                green: 150,
                blue: 0,
            },
            overheat_threshold: DEFAULT_OVERHEAT_THRESHOLD,
        }
    }
}

impl EnergyPalette {
    /// Color for a cell with the given energy
    pub const fn color_for(&self, energy: u8) -> Rgb {
        if energy > self.overheat_threshold {
            return Rgb {
                r: OVERHEAT_RED,
                g: OVERHEAT_GREEN,
                b: energy,
            };
        }
        if energy == 0 {
            return self.background;
        }
        let brightness = energy_brightness(energy);
        Rgb {
            r: increase(self.bias.r, scale_coef(brightness, self.energy.red), 255),
            g: increase(self.bias.g, scale_coef(brightness, self.energy.green), 255),
            b: increase(self.bias.b, scale_coef(brightness, self.energy.blue), 255),
        }
    }
}
