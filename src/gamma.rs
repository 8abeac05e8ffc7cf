//! Brightness to PWM duty conversion.
//!
//! LEDs respond linearly to duty cycle while the eye does not, so the
//! 5-bit levels kept in the pixel buffer are expanded through an
//! exponential curve right before they are serialized.

/// Number of entries in a PWM table (one per 5-bit level)
pub const PWM_LEVELS: usize = 32;

/// Exponent used by [`PWM_TABLE`]
pub const DEFAULT_CURVE_EXPONENT: f32 = 4.0;

/// A 5-bit level to 8-bit duty table
pub type PwmTable = [u8; PWM_LEVELS];

/// Default 5-bit level to 8-bit duty table
///
/// Equals [`exponential_table`] with [`DEFAULT_CURVE_EXPONENT`].
pub const PWM_TABLE: PwmTable = [
    0, 1, 1, 2, 3, 4, 6, 7, 8, 10, 12, 15, 17, 20, 24, 28, 32, 37, 44, 50, 58, 66, 75, 87, 100,
    114, 130, 150, 171, 194, 221, 255,
];

/// Expand a 5-bit level to its PWM duty value
///
/// Levels above 31 saturate.
#[inline]
pub const fn pwm_for_level(level: u8) -> u8 {
    let index = if level as usize >= PWM_LEVELS {
        PWM_LEVELS - 1
    } else {
        level as usize
    };
    PWM_TABLE[index]
}

/// Duty value (0-255) for an 8-bit brightness on an exponential curve
///
/// `exponent` of 1 is nearly linear, larger values push more of the range
/// into the dark end. Non-positive exponents fall back to a linear mapping.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless
)]
pub fn exponential_duty(brightness: u8, exponent: f32) -> u8 {
    if exponent <= 0.0 {
        return brightness;
    }
    let b = brightness as f32;
    let curve = (libm::expf(b * exponent / 255.0) - 1.0) / (libm::expf(exponent) - 1.0);
    libm::roundf(255.0 * curve).clamp(0.0, 255.0) as u8
}

/// Build a 32-level PWM table sampled from [`exponential_duty`]
#[allow(clippy::cast_possible_truncation)]
pub fn exponential_table(exponent: f32) -> PwmTable {
    let mut table = [0u8; PWM_LEVELS];
    for (level, duty) in table.iter_mut().enumerate() {
        let brightness = (level * 255 / (PWM_LEVELS - 1)) as u8;
        *duty = exponential_duty(brightness, exponent);
    }
    table
}
