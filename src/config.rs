//! Display configuration and the named parameter update protocol.
//!
//! All tunables live in one [`DisplayConfig`]. Remote control changes them
//! with a text of comma separated `key=value` pairs, e.g.
//! `mode=1,brightness=128,spark_prob=5`.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{EnergyPalette, Rgb};
use crate::energy::TorchParams;
use crate::math8::{clamp_u8, clamp_u16};
use crate::text::TextParams;

const MODE_NAME_OFF: &str = "off";
const MODE_NAME_TORCH: &str = "torch";
const MODE_NAME_COLOR_CYCLE: &str = "color_cycle";
const MODE_NAME_LAMP: &str = "lamp";
const MODE_NAME_TEST_PATTERN: &str = "test_pattern";

const MODE_ID_OFF: u8 = 0;
const MODE_ID_TORCH: u8 = 1;
const MODE_ID_COLOR_CYCLE: u8 = 2;
const MODE_ID_LAMP: u8 = 3;
const MODE_ID_TEST_PATTERN: u8 = 4;

/// Highest spark probability in percent
const MAX_SPARK_PROBABILITY: u8 = 100;

/// What the torch shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum DisplayMode {
    /// All pixels dark
    Off = MODE_ID_OFF,
    /// Fire simulation with text overlay
    #[default]
    Torch = MODE_ID_TORCH,
    /// Rotating hue wheel with text overlay
    ColorCycle = MODE_ID_COLOR_CYCLE,
    /// Flat lamp color with text overlay
    Lamp = MODE_ID_LAMP,
    /// Calibration gradient
    TestPattern = MODE_ID_TEST_PATTERN,
}

impl DisplayMode {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            MODE_ID_OFF => Self::Off,
            MODE_ID_TORCH => Self::Torch,
            MODE_ID_COLOR_CYCLE => Self::ColorCycle,
            MODE_ID_LAMP => Self::Lamp,
            MODE_ID_TEST_PATTERN => Self::TestPattern,
            _ => return None,
        })
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => MODE_NAME_OFF,
            Self::Torch => MODE_NAME_TORCH,
            Self::ColorCycle => MODE_NAME_COLOR_CYCLE,
            Self::Lamp => MODE_NAME_LAMP,
            Self::TestPattern => MODE_NAME_TEST_PATTERN,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            MODE_NAME_OFF => Some(Self::Off),
            MODE_NAME_TORCH => Some(Self::Torch),
            MODE_NAME_COLOR_CYCLE => Some(Self::ColorCycle),
            MODE_NAME_LAMP => Some(Self::Lamp),
            MODE_NAME_TEST_PATTERN => Some(Self::TestPattern),
            _ => None,
        }
    }
}

/// Every tunable of the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    /// Global brightness
    pub brightness: u8,
    /// Pause between frames in milliseconds
    pub cycle_wait: u16,
    /// Color of the lamp mode
    pub lamp_color: Rgb,
    pub torch: TorchParams,
    pub palette: EnergyPalette,
    pub text: TextParams,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Torch,
            brightness: 255,
            cycle_wait: 1,
            lamp_color: Rgb {
                r: 220,
                g: 220,
                b: 200,
            },
            torch: TorchParams::default(),
            palette: EnergyPalette::default(),
            text: TextParams::default(),
        }
    }
}

/// Result of applying a single named parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamChange {
    /// Key not recognized, nothing changed
    Ignored,
    /// Value stored
    Applied,
    /// Value stored, the energy field must start over
    ResetEnergy,
}

/// Result of applying a parameter text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParamsOutcome {
    /// Recognized pairs applied
    pub applied: usize,
    /// Some applied parameter requires an energy reset
    pub reset_energy: bool,
    /// Parsing stopped at a pair without `=`
    pub truncated: bool,
}

impl DisplayConfig {
    /// Apply a text of comma separated `key=value` pairs
    ///
    /// Unknown keys are skipped. A pair without `=` stops parsing, pairs
    /// before it stay applied.
    pub fn apply_params(&mut self, input: &str) -> ParamsOutcome {
        let mut outcome = ParamsOutcome::default();

        for pair in input.split(',') {
            if pair.is_empty() {
                continue;
            }
            let Some((key, value)) = pair.split_once('=') else {
                #[cfg(feature = "esp32-log")]
                println!("[DisplayConfig.apply_params] malformed pair, stop parsing");
                outcome.truncated = true;
                break;
            };
            match self.apply(key.trim(), parse_int(value)) {
                ParamChange::Ignored => {}
                ParamChange::Applied => outcome.applied += 1,
                ParamChange::ResetEnergy => {
                    outcome.applied += 1;
                    outcome.reset_energy = true;
                }
            }
        }

        outcome
    }

    /// Apply one named parameter, clamping `value` into its domain
    pub fn apply(&mut self, key: &str, value: i32) -> ParamChange {
        let byte = clamp_u8(value);
        let word = clamp_u16(value);
        let flag = value != 0;

        match key {
            // global
            "wait" => self.cycle_wait = word,
            "mode" => match DisplayMode::from_raw(byte) {
                Some(mode) if i32::from(byte) == value => self.mode = mode,
                _ => return ParamChange::Ignored,
            },
            "brightness" => self.brightness = byte,
            "fade_base" => self.text.fade_base = byte,
            // lamp
            "lamp_red" => self.lamp_color.r = byte,
            "lamp_green" => self.lamp_color.g = byte,
            "lamp_blue" => self.lamp_color.b = byte,
            // text
            "red_text" => self.text.color.r = byte,
            "green_text" => self.text.color.g = byte,
            "blue_text" => self.text.color.b = byte,
            "cycles_per_px" => self.text.cycles_per_pixel = byte.max(1),
            "text_repeats" => self.text.repeats = byte,
            "text_base_line" => self.text.base_line = byte,
            "fade_per_repeat" => self.text.fade_per_repeat = byte,
            "text_intensity" => self.text.intensity = byte,
            "mirror_text" => self.text.mirrored = flag,
            // torch colors
            "red_bg" => self.palette.background.r = byte,
            "green_bg" => self.palette.background.g = byte,
            "blue_bg" => self.palette.background.b = byte,
            "red_bias" => self.palette.bias.r = byte,
            "green_bias" => self.palette.bias.g = byte,
            "blue_bias" => self.palette.bias.b = byte,
            "red_energy" => self.palette.energy.red = word,
            "green_energy" => self.palette.energy.green = word,
            "blue_energy" => self.palette.energy.blue = word,
            // torch simulation
            "spark_prob" => {
                self.torch.spark_probability = byte.min(MAX_SPARK_PROBABILITY);
                return ParamChange::ResetEnergy;
            }
            "upside_down" => {
                self.torch.upside_down = flag;
                return ParamChange::ResetEnergy;
            }
            "spark_cap" => self.torch.spark_cap = word,
            "spark_tfr" => self.torch.spark_transfer = byte,
            "side_rad" => self.torch.side_radiation = word,
            "up_rad" => self.torch.up_radiation = word,
            "heat_cap" => self.torch.heat_cap = word,
            "flame_min" => self.torch.flame_min = byte,
            "flame_max" => self.torch.flame_max = byte,
            "spark_min" => self.torch.spark_min = byte,
            "spark_max" => self.torch.spark_max = byte,
            _ => return ParamChange::Ignored,
        }

        ParamChange::Applied
    }
}

/// Parse a leading decimal integer
///
/// Leading whitespace and a sign are accepted, parsing stops at the
/// first non-digit. Text without digits yields zero, overflow saturates.
pub fn parse_int(input: &str) -> i32 {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i32 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value
            .saturating_mul(10)
            .saturating_add(i32::from(digit - b'0'));
    }

    if negative { value.saturating_neg() } else { value }
}
