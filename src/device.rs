//! Virtual device status interface.
//!
//! Home automation controllers talk to the torch through a tiny
//! request/answer protocol: a request is a name with an optional
//! `=value`, the answer a single integer.

use crate::color::{rgb_from_u32, rgb_to_u32};
use crate::config::{DisplayConfig, DisplayMode, parse_int};
use crate::math8::clamp_u8;

/// Protocol version reported by `version`
pub const DEVICE_API_VERSION: i32 = 2;

const MODE_SHIFT: u32 = 24;
const COLOR_MASK: u32 = 0x00FF_FFFF;

/// Kind of the device's output channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputKind {
    None = 0,
    OnOff = 1,
    Rgb = 2,
}

/// Capability word layout: `0xssiibboo` with sensor, binary input, button
/// and output counts, the output byte carrying the [`OutputKind`]
pub const fn capability_word(output: OutputKind) -> i32 {
    output as i32
}

/// A parsed device request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceRequest {
    Version,
    Config,
    GetOutput,
    SetOutput(i32),
    GetState,
    SetState(i32),
}

impl DeviceRequest {
    /// Parse `name` or `name=value`; unknown names yield `None`
    pub fn parse(request: &str) -> Option<Self> {
        let (name, value) = match request.split_once('=') {
            Some((name, value)) => (name, Some(parse_int(value))),
            None => (request, None),
        };
        Some(match (name.trim(), value) {
            ("version", _) => Self::Version,
            ("config", _) => Self::Config,
            ("output0", None) => Self::GetOutput,
            ("output0", Some(value)) => Self::SetOutput(value),
            ("state0", None) => Self::GetState,
            ("state0", Some(value)) => Self::SetState(value),
            _ => return None,
        })
    }

    /// Whether the request changes the configuration
    pub const fn is_write(self) -> bool {
        matches!(self, Self::SetOutput(_) | Self::SetState(_))
    }
}

/// Packed state word: mode in the top byte, then the lamp color as three
/// bytes in lamp mode, or the brightness in the lowest byte otherwise
pub fn state_word(config: &DisplayConfig) -> i32 {
    let mode = u32::from(config.mode.as_raw()) << MODE_SHIFT;
    let payload = match config.mode {
        DisplayMode::Lamp => rgb_to_u32(config.lamp_color),
        _ => u32::from(config.brightness),
    };
    i32::try_from(mode | payload).unwrap_or(i32::MAX)
}

/// Apply a packed state word, see [`state_word`]
///
/// An unknown mode byte leaves the mode unchanged.
#[allow(clippy::cast_sign_loss)]
pub fn apply_state_word(config: &mut DisplayConfig, word: i32) {
    let word = word as u32;
    #[allow(clippy::cast_possible_truncation)]
    let mode_byte = (word >> MODE_SHIFT) as u8;
    if let Some(mode) = DisplayMode::from_raw(mode_byte) {
        config.mode = mode;
    }
    match config.mode {
        DisplayMode::Lamp => config.lamp_color = rgb_from_u32(word & COLOR_MASK),
        #[allow(clippy::cast_possible_truncation)]
        _ => config.brightness = (word & 0xFF) as u8,
    }
}

/// Answer a request, applying it to `config` if it is a write
///
/// Writes answer 0.
pub fn handle(config: &mut DisplayConfig, request: DeviceRequest) -> i32 {
    match request {
        DeviceRequest::Version => DEVICE_API_VERSION,
        DeviceRequest::Config => capability_word(OutputKind::Rgb),
        DeviceRequest::GetOutput => i32::from(config.brightness),
        DeviceRequest::SetOutput(value) => {
            config.brightness = clamp_u8(value);
            0
        }
        DeviceRequest::GetState => state_word(config),
        DeviceRequest::SetState(word) => {
            apply_state_word(config, word);
            0
        }
    }
}
