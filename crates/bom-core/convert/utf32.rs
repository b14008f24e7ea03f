//! Streaming UTF-32 to UTF-8 decoder
//!
//! UTF-32 sits outside the WHATWG Encoding Standard, so `encoding_rs` does
//! not provide it. The format is purely algorithmic: fixed 4-byte code
//! units, valid when they hold a Unicode scalar value (not a surrogate, not
//! above U+10FFFF). Up to three bytes of a split unit are carried between
//! calls.

use super::{Decode, DecodeStep};

/// Code unit width in bytes
const UNIT_LEN: usize = 4;

/// Streaming UTF-32LE/BE decoder
#[derive(Debug)]
pub struct Utf32Decoder {
    big_endian: bool,
    /// Partial code unit carried from the previous call
    carry: [u8; UNIT_LEN],
    carry_len: usize,
}

impl Utf32Decoder {
    /// Create a decoder for UTF-32BE input
    #[must_use]
    pub const fn big_endian() -> Self {
        Self {
            big_endian: true,
            carry: [0; UNIT_LEN],
            carry_len: 0,
        }
    }

    /// Create a decoder for UTF-32LE input
    #[must_use]
    pub const fn little_endian() -> Self {
        Self {
            big_endian: false,
            carry: [0; UNIT_LEN],
            carry_len: 0,
        }
    }
}

impl Decode for Utf32Decoder {
    fn decode(&mut self, src: &[u8], dst: &mut [u8], last: bool) -> (DecodeStep, usize, usize) {
        let mut read = 0;
        let mut written = 0;
        loop {
            // How many bytes of the pending unit came from earlier calls.
            let carried_before = self.carry_len;
            while self.carry_len < UNIT_LEN && read < src.len() {
                self.carry[self.carry_len] = src[read];
                self.carry_len += 1;
                read += 1;
            }

            if self.carry_len < UNIT_LEN {
                if last && self.carry_len > 0 {
                    // Truncated trailing code unit; drop it so a lenient
                    // caller makes progress on the next call.
                    let taken = self.carry_len - carried_before;
                    self.carry_len = 0;
                    return (
                        DecodeStep::Malformed {
                            valid: read.saturating_sub(taken),
                        },
                        read,
                        written,
                    );
                }
                return (DecodeStep::InputEmpty, read, written);
            }

            // Commit a full unit only when the output has room for the
            // longest UTF-8 encoding.
            if dst.len() - written < UNIT_LEN {
                return (DecodeStep::OutputFull, read, written);
            }
            let unit = if self.big_endian {
                u32::from_be_bytes(self.carry)
            } else {
                u32::from_le_bytes(self.carry)
            };
            self.carry_len = 0;
            match char::from_u32(unit) {
                Some(ch) => {
                    written += ch.encode_utf8(&mut dst[written..]).len();
                }
                None => {
                    return (
                        DecodeStep::Malformed {
                            valid: read.saturating_sub(UNIT_LEN),
                        },
                        read,
                        written,
                    );
                }
            }
        }
    }

    fn max_utf8_len(&self, byte_length: usize) -> usize {
        // At most one UTF-8 byte per UTF-32 byte, plus one unit completed
        // from carry.
        byte_length + 2 * UNIT_LEN
    }
}
