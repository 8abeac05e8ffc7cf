use super::Rgb;

/// Color on a red - green - blue - red wheel, `position` 0-255
#[allow(clippy::cast_possible_truncation)]
pub const fn wheel(position: u8) -> Rgb {
    if position < 85 {
        Rgb {
            r: position * 3,
            g: 255 - position * 3,
            b: 0,
        }
    } else if position < 170 {
        let p = position - 85;
        Rgb {
            r: 255 - p * 3,
            g: 0,
            b: p * 3,
        }
    } else {
        let p = position - 170;
        Rgb {
            r: 0,
            g: p * 3,
            b: 255 - p * 3,
        }
    }
}
