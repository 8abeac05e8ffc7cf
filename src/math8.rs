//! 8-bit fixed-point helpers shared by the simulation and the compositors.

/// Scale an 8-bit value by a factor (0-255 = 0.0-0.996)
///
/// Computes `value * factor / 256`, so a factor of 255 slightly dims.
/// This is the scaling the torch has always used for dimming.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn dim8(value: u8, factor: u8) -> u8 {
    ((value as u16 * factor as u16) >> 8) as u8
}

/// Scale an 8-bit value by a 16-bit coefficient where 256 means 1.0
///
/// Saturates at 255 for coefficients above 256.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn scale_coef(value: u8, coef: u16) -> u8 {
    let scaled = (value as u32 * coef as u32) >> 8;
    if scaled > 255 { 255 } else { scaled as u8 }
}

/// Add `amount` to `value`, never exceeding `max`
#[inline]
pub const fn increase(value: u8, amount: u8, max: u8) -> u8 {
    let sum = value as u16 + amount as u16;
    if sum > max as u16 {
        max
    } else {
        #[allow(clippy::cast_possible_truncation)]
        {
            sum as u8
        }
    }
}

/// Subtract `amount` from `value`, never going below `min`
#[inline]
pub const fn reduce(value: u8, amount: u8, min: u8) -> u8 {
    let diff = value as i16 - amount as i16;
    if diff < min as i16 {
        min
    } else {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        {
            diff as u8
        }
    }
}

/// Clamp an `i32` into the `u8` range
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub const fn clamp_u8(value: i32) -> u8 {
    if value < 0 {
        0
    } else if value > 255 {
        255
    } else {
        value as u8
    }
}

/// Clamp an `i32` into the `u16` range
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub const fn clamp_u16(value: i32) -> u16 {
    if value < 0 {
        0
    } else if value > u16::MAX as i32 {
        u16::MAX
    } else {
        value as u16
    }
}

/// Calculate progress (0-255) of `step` within `steps`
///
/// Returns 0 when `steps` is zero.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn progress8(step: u16, steps: u16) -> u8 {
    if steps == 0 {
        return 0;
    }
    if step >= steps {
        return 255;
    }
    ((step as u32 * 255) / steps as u32) as u8
}
