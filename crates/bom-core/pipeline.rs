//! Streaming strip/transcode pipeline
//!
//! Resolves the byte-order mark at the head of a reader, then copies the
//! remainder to a writer, optionally transcoding it to UTF-8 with the
//! decoder matching the detected mark. Bytes consumed past the signature
//! during detection are fed back into the stream so nothing is lost.

use std::io::{ErrorKind, Read, Write};

use crate::catalog::{BomType, BomTypeSet};
use crate::convert::{open_decoder, DecodeStep};
use crate::error::{BomError, Result};
use crate::resolver::{resolve, DetectOptions};

/// Size of the input refill buffer in bytes
const IN_BUFFER: usize = 1024;

/// Behavior switches for [`strip`]
#[derive(Debug, Clone, Default)]
pub struct StripOptions {
    /// BOM types accepted at the head of the stream; empty accepts all
    pub expect: BomTypeSet,
    /// Resolve the `FF FE 00 00` ambiguity in favor of UTF-32LE
    pub prefer32: bool,
    /// Skip illegal byte sequences instead of failing on them
    pub lenient: bool,
    /// Transcode the body to UTF-8 using the detected mark's encoding
    pub to_utf8: bool,
}

impl StripOptions {
    const fn detect_options(&self) -> DetectOptions {
        DetectOptions {
            expect: self.expect,
            prefer32: self.prefer32,
        }
    }
}

/// Strip the BOM from `reader` and copy the rest to `writer`
///
/// With [`StripOptions::to_utf8`] set and a recognized mark present, the
/// body is transcoded to UTF-8; an absent mark leaves the body untouched
/// either way. Returns the detected BOM type.
///
/// # Errors
///
/// Returns [`BomError::UnexpectedType`] when the detected mark is outside
/// the expected set, [`BomError::IllegalBytes`] when transcoding hits an
/// invalid sequence in strict mode, and [`BomError::Io`] for read or write
/// failures.
pub fn strip<R, W>(reader: &mut R, writer: &mut W, opts: &StripOptions) -> Result<BomType>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let resolution = resolve(reader, &opts.detect_options())?;
    let bom = resolution.bom;
    let mut decoder = if opts.to_utf8 { open_decoder(bom) } else { None };

    let mut ibuf = vec![0u8; IN_BUFFER];
    let obuf_len = decoder
        .as_ref()
        .map_or(IN_BUFFER, |d| d.max_utf8_len(IN_BUFFER));
    let mut obuf = vec![0u8; obuf_len];

    // Detection may read past the signature; those bytes re-enter here.
    let residue = resolution.residue();
    let mut ilen = residue.len();
    ibuf[..ilen].copy_from_slice(residue);

    // Stream offset of ibuf[0], for absolute error positions.
    let mut offset = bom.len() as u64;
    let mut eof = false;
    loop {
        while ilen < ibuf.len() && !eof {
            match reader.read(&mut ibuf[ilen..]) {
                Ok(0) => eof = true,
                Ok(n) => ilen += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        if let Some(decoder) = decoder.as_deref_mut() {
            let mut pos = 0;
            loop {
                let (step, read, written) = decoder.decode(&ibuf[pos..ilen], &mut obuf, eof);
                writer.write_all(&obuf[..written])?;
                pos += read;
                match step {
                    DecodeStep::InputEmpty => break,
                    DecodeStep::OutputFull => {}
                    DecodeStep::Malformed { valid } => {
                        if !opts.lenient {
                            return Err(BomError::IllegalBytes {
                                encoding: bom.name(),
                                offset: offset + (pos - read + valid) as u64,
                            });
                        }
                    }
                }
            }
        } else {
            writer.write_all(&ibuf[..ilen])?;
        }
        offset += ilen as u64;
        ilen = 0;
        if eof {
            break;
        }
    }
    writer.flush()?;
    Ok(bom)
}
