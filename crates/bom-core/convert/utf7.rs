//! Streaming UTF-7 to UTF-8 decoder
//!
//! UTF-7 (RFC 2152) was dropped from the WHATWG Encoding Standard, so
//! `encoding_rs` does not provide it. The format is algorithmic: ASCII
//! passes through directly, `+` shifts into a modified-base64 run encoding
//! UTF-16 code units, and `-` (or any non-base64 byte) shifts back out.
//! `+-` encodes a literal plus sign. Shift state, accumulated bits, and a
//! pending high surrogate are carried between calls.

use super::{Decode, DecodeStep};

/// Value of a modified-base64 alphabet byte
const fn base64_value(byte: u8) -> Option<u8> {
    match byte {
        b'A'..=b'Z' => Some(byte - b'A'),
        b'a'..=b'z' => Some(byte - b'a' + 26),
        b'0'..=b'9' => Some(byte - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

/// Streaming UTF-7 decoder
#[derive(Debug, Default)]
pub struct Utf7Decoder {
    /// Inside a modified-base64 run
    shifted: bool,
    /// Immediately after the `+` that opened the run (recognizes `+-`)
    just_shifted: bool,
    /// Accumulated base64 bits, at most `nbits` low bits valid
    bits: u32,
    /// Number of valid bits in `bits` (always below 16 between bytes)
    nbits: u32,
    /// First half of a surrogate pair awaiting its low surrogate
    high_surrogate: Option<u16>,
}

impl Utf7Decoder {
    /// Create a decoder in the direct (unshifted) state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn reset_run(&mut self) {
        self.shifted = false;
        self.just_shifted = false;
        self.bits = 0;
        self.nbits = 0;
        self.high_surrogate = None;
    }

    /// Leftover padding bits or a dangling high surrogate make the current
    /// run unterminatable.
    fn run_is_dirty(&self) -> bool {
        self.high_surrogate.is_some() || self.bits != 0
    }

    /// Emit one decoded UTF-16 code unit, pairing surrogates
    ///
    /// The caller guarantees at least 4 free bytes in `dst`.
    fn push_unit(&mut self, unit: u16, dst: &mut [u8], written: &mut usize) -> Result<(), ()> {
        if let Some(high) = self.high_surrogate.take() {
            if !(0xDC00..=0xDFFF).contains(&unit) {
                return Err(()); // unpaired high surrogate
            }
            let scalar =
                0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
            let ch = char::from_u32(scalar).ok_or(())?;
            *written += ch.encode_utf8(&mut dst[*written..]).len();
            return Ok(());
        }
        if (0xD800..=0xDBFF).contains(&unit) {
            self.high_surrogate = Some(unit);
            return Ok(());
        }
        if (0xDC00..=0xDFFF).contains(&unit) {
            return Err(()); // low surrogate without a high
        }
        let ch = char::from_u32(u32::from(unit)).ok_or(())?;
        *written += ch.encode_utf8(&mut dst[*written..]).len();
        Ok(())
    }
}

impl Decode for Utf7Decoder {
    #[allow(clippy::too_many_lines)]
    fn decode(&mut self, src: &[u8], dst: &mut [u8], last: bool) -> (DecodeStep, usize, usize) {
        let mut read = 0;
        let mut written = 0;
        while read < src.len() {
            // Worst case per byte: a base64 byte completing a surrogate pair
            // emits 4 bytes of UTF-8.
            if dst.len() - written < 4 {
                return (DecodeStep::OutputFull, read, written);
            }
            let byte = src[read];
            let at = read;

            if !self.shifted {
                read += 1;
                if byte == b'+' {
                    self.shifted = true;
                    self.just_shifted = true;
                    self.bits = 0;
                    self.nbits = 0;
                } else if byte < 0x80 {
                    dst[written] = byte;
                    written += 1;
                } else {
                    // Bytes above ASCII never occur in UTF-7.
                    return (DecodeStep::Malformed { valid: at }, read, written);
                }
                continue;
            }

            if self.just_shifted && byte == b'-' {
                read += 1;
                self.reset_run();
                dst[written] = b'+';
                written += 1;
                continue;
            }

            if let Some(value) = base64_value(byte) {
                read += 1;
                self.just_shifted = false;
                self.bits = (self.bits << 6) | u32::from(value);
                self.nbits += 6;
                if self.nbits >= 16 {
                    self.nbits -= 16;
                    let unit = ((self.bits >> self.nbits) & 0xFFFF) as u16;
                    self.bits &= (1 << self.nbits) - 1;
                    if self.push_unit(unit, dst, &mut written).is_err() {
                        return (DecodeStep::Malformed { valid: at }, read, written);
                    }
                }
                continue;
            }

            // Any other byte terminates the base64 run. The run itself must
            // be clean before the terminator is looked at.
            if self.run_is_dirty() {
                self.reset_run();
                // Leave the terminator unconsumed for direct reprocessing.
                return (DecodeStep::Malformed { valid: at }, read, written);
            }
            self.reset_run();
            if byte == b'-' {
                // Explicit terminator is absorbed, not emitted.
                read += 1;
            }
            // Otherwise the byte is reprocessed in direct mode next round.
        }

        if last && self.shifted {
            if self.run_is_dirty() {
                // Truncated run at end of stream; drop it so a lenient
                // caller makes progress.
                self.reset_run();
                return (DecodeStep::Malformed { valid: read }, read, written);
            }
            self.reset_run();
        }
        (DecodeStep::InputEmpty, read, written)
    }

    fn max_utf8_len(&self, byte_length: usize) -> usize {
        // Direct bytes map 1:1; base64 expands at most 3:4 overall, and a
        // carried run can complete one more unit.
        byte_length * 3 + 4
    }
}
