//! Decoding of injected messages into internal character codes.
//!
//! Messages arrive URL-encoded from a web form, possibly with raw UTF-8.
//! The font knows ASCII plus six German umlauts, which get the codes
//! 0x80..=0x85.

use heapless::Vec;

use super::font::FALLBACK_CODE;

/// Longest message kept; longer input is truncated
pub const MAX_MESSAGE_LEN: usize = 256;

/// Decoded message, one internal character code per entry
pub type MessageText = Vec<u8, MAX_MESSAGE_LEN>;

/// UTF-8 lead byte shared by all supported accented characters
const UTF8_LATIN1_LEAD: u8 = 0xC3;

/// Decode a percent-encoded and/or UTF-8 message
///
/// `%XX` escapes are resolved first, then `C3 xx` sequences are mapped to
/// the accented codes. Any other non-ASCII byte becomes the fallback
/// code. An escape or lead byte cut off by the end of input ends the
/// message there.
pub fn decode_message(input: &[u8]) -> MessageText {
    let mut text = MessageText::new();
    let mut pending_lead = false;

    for byte in PercentDecoder::new(input) {
        let code = if pending_lead {
            pending_lead = false;
            accented_code(byte)
        } else if byte == UTF8_LATIN1_LEAD {
            pending_lead = true;
            continue;
        } else if byte.is_ascii() {
            byte
        } else {
            FALLBACK_CODE
        };
        if text.push(code).is_err() {
            break;
        }
    }

    text
}

/// Internal code for the second byte of a `C3 xx` sequence
pub const fn accented_code(second: u8) -> u8 {
    match second {
        0x84 => 0x80, // Ä
        0x96 => 0x81, // Ö
        0x9C => 0x82, // Ü
        0xA4 => 0x83, // ä
        0xB6 => 0x84, // ö
        0xBC => 0x85, // ü
        _ => FALLBACK_CODE,
    }
}

/// Value of a hex digit; anything else counts as zero
const fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

/// Iterator resolving `%XX` escapes to raw bytes
struct PercentDecoder<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> PercentDecoder<'a> {
    const fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }
}

impl Iterator for PercentDecoder<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let byte = *self.input.get(self.pos)?;
        if byte != b'%' {
            self.pos += 1;
            return Some(byte);
        }
        let (&high, &low) = (self.input.get(self.pos + 1)?, self.input.get(self.pos + 2)?);
        self.pos += 3;
        Some((hex_value(high) << 4) | hex_value(low))
    }
}
