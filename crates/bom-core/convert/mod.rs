//! Streaming conversion from a source encoding to UTF-8
//!
//! The transcode pipeline treats text conversion as a capability boundary:
//! a [`Decode`] implementation takes byte chunks and produces UTF-8,
//! carrying partial multi-byte sequences internally between calls. The
//! contract mirrors `encoding_rs`, which backs the WHATWG encodings in the
//! catalog (UTF-8, UTF-16LE/BE, GB18030). UTF-32 and UTF-7 fall outside the
//! WHATWG Encoding Standard, so those decoders live in this module behind
//! the same trait; both are algorithmic rather than table-driven.

mod utf32;
mod utf7;

pub use utf32::Utf32Decoder;
pub use utf7::Utf7Decoder;

use encoding_rs::{DecoderResult, Encoding, GB18030, UTF_16BE, UTF_16LE, UTF_8};

use crate::catalog::BomType;

/// Result of one streaming decode step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStep {
    /// All input was consumed; refill the source (or stop when `last`)
    InputEmpty,
    /// The output buffer is exhausted; drain it and call again
    OutputFull,
    /// An invalid byte sequence was encountered and skipped
    Malformed {
        /// Bytes from the start of this call's input that precede the bad
        /// sequence (best effort when the sequence began in an earlier chunk)
        valid: usize,
    },
}

/// Streaming decoder from one source encoding to UTF-8
///
/// Call [`Decode::decode`] repeatedly with consecutive chunks of the input.
/// Incomplete trailing sequences are buffered internally, so the caller
/// never re-reads or shifts input; `last` must be true on the call carrying
/// the final bytes (and any follow-up calls), at which point a pending
/// partial sequence surfaces as [`DecodeStep::Malformed`].
pub trait Decode {
    /// Decode bytes of `src` into `dst`
    ///
    /// Returns the step outcome plus the number of input bytes read and
    /// output bytes written. After `Malformed`, the offending bytes have
    /// been consumed; calling again resumes past them.
    fn decode(&mut self, src: &[u8], dst: &mut [u8], last: bool) -> (DecodeStep, usize, usize);

    /// Worst-case number of UTF-8 bytes produced by `byte_length` input
    /// bytes plus any internal carry
    fn max_utf8_len(&self, byte_length: usize) -> usize;
}

/// Adapter over an `encoding_rs` streaming decoder
///
/// Driven in `without_replacement` mode so lenient and strict policies share
/// one code path: malformed input is reported, never substituted.
pub struct WhatwgDecoder {
    inner: encoding_rs::Decoder,
}

impl WhatwgDecoder {
    fn new(encoding: &'static Encoding) -> Self {
        // The BOM was consumed during matching; the decoder must not eat
        // another leading FF FE / FE FF / EF BB BF from the payload.
        Self {
            inner: encoding.new_decoder_without_bom_handling(),
        }
    }
}

impl Decode for WhatwgDecoder {
    fn decode(&mut self, src: &[u8], dst: &mut [u8], last: bool) -> (DecodeStep, usize, usize) {
        let (result, read, written) = self.inner.decode_to_utf8_without_replacement(src, dst, last);
        let step = match result {
            DecoderResult::InputEmpty => DecodeStep::InputEmpty,
            DecoderResult::OutputFull => DecodeStep::OutputFull,
            DecoderResult::Malformed(bad, pushed) => DecodeStep::Malformed {
                valid: read.saturating_sub(bad as usize + pushed as usize),
            },
        };
        (step, read, written)
    }

    fn max_utf8_len(&self, byte_length: usize) -> usize {
        self.inner
            .max_utf8_buffer_length_without_replacement(byte_length)
            .unwrap_or(byte_length * 3 + 16)
    }
}

/// Open a streaming decoder for the given BOM type's source encoding
///
/// Returns `None` for the sentinel, which has no source encoding to convert
/// from. The decoder's state drops with the returned box, on every exit
/// path.
#[must_use]
pub fn open_decoder(bom: BomType) -> Option<Box<dyn Decode>> {
    match bom {
        BomType::None => None,
        BomType::Utf7 => Some(Box::new(Utf7Decoder::new())),
        BomType::Utf8 => Some(Box::new(WhatwgDecoder::new(UTF_8))),
        BomType::Utf16Be => Some(Box::new(WhatwgDecoder::new(UTF_16BE))),
        BomType::Utf16Le => Some(Box::new(WhatwgDecoder::new(UTF_16LE))),
        BomType::Utf32Be => Some(Box::new(Utf32Decoder::big_endian())),
        BomType::Utf32Le => Some(Box::new(Utf32Decoder::little_endian())),
        BomType::Gb18030 => Some(Box::new(WhatwgDecoder::new(GB18030))),
    }
}
