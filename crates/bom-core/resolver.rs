//! BOM resolution: from per-signature match states to one decision
//!
//! Runs the prefix matcher to exhaustion, breaks the UTF-16LE/UTF-32LE tie
//! according to the caller's preference, verifies the catalog's consistency
//! invariants, and applies the expected-type policy. The resolution carries
//! the replay residue so downstream streaming never re-reads the source.

use std::io::{ErrorKind, Read};

use crate::catalog::{BomType, BomTypeSet};
use crate::error::{BomError, Result};
use crate::matcher::{BomMatcher, MatchState};

/// Options controlling BOM resolution
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectOptions {
    /// Expected BOM types; the empty set accepts every resolution
    pub expect: BomTypeSet,
    /// Prefer UTF-32LE over UTF-16LE followed by two NUL bytes
    pub prefer32: bool,
}

/// Outcome of a resolution: the chosen type plus the bytes read past it
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The single signature chosen as the stream's BOM
    pub bom: BomType,
    /// Every byte consumed during matching, BOM included
    consumed: Vec<u8>,
}

impl Resolution {
    /// Bytes consumed beyond the BOM's own length
    ///
    /// These belong to the post-BOM stream and must be replayed into any
    /// further processing, not re-read from the source.
    #[must_use]
    pub fn residue(&self) -> &[u8] {
        &self.consumed[self.bom.len()..]
    }
}

/// Resolve the BOM at the head of `reader`
///
/// Reads one byte at a time until every signature has reached a terminal
/// state or the source is exhausted, whichever comes first. At most
/// [`crate::MAX_SIGNATURE_LEN`] bytes are consumed.
///
/// # Errors
///
/// - [`BomError::UnexpectedType`] when the resolved type is outside a
///   non-empty expected set
/// - [`BomError::Io`] on read failure
/// - [`BomError::Internal`] on catalog-consistency violations (more than one
///   real signature completed after disambiguation)
pub fn resolve<R: Read + ?Sized>(reader: &mut R, opts: &DetectOptions) -> Result<Resolution> {
    let mut matcher = BomMatcher::new();
    let mut byte = [0u8; 1];
    while !matcher.is_settled() {
        match reader.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => matcher.feed(byte[0])?,
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(err.into()),
        }
    }

    // Break the designed ambiguity: both can complete only when the stream
    // starts with FF FE 00 00.
    if matcher.state(BomType::Utf16Le) == MatchState::Complete
        && matcher.state(BomType::Utf32Le) == MatchState::Complete
    {
        let loser = if opts.prefer32 {
            BomType::Utf16Le
        } else {
            BomType::Utf32Le
        };
        matcher.force_failed(loser)?;
    }

    if matcher.state(BomType::None) != MatchState::Complete {
        return Err(BomError::Internal("invalid match state"));
    }
    let bom = match matcher.completed_count() {
        1 => BomType::None,
        2 => BomType::ALL[1..]
            .iter()
            .copied()
            .find(|candidate| matcher.state(*candidate) == MatchState::Complete)
            .ok_or(BomError::Internal(">2 BOM type matches"))?,
        _ => return Err(BomError::Internal(">2 BOM type matches")),
    };

    if !opts.expect.allows(bom) {
        return Err(BomError::UnexpectedType(bom));
    }

    Ok(Resolution {
        bom,
        consumed: matcher.consumed().to_vec(),
    })
}

/// Resolve the BOM and return only its type
///
/// # Errors
///
/// Same conditions as [`resolve`].
pub fn detect<R: Read + ?Sized>(reader: &mut R, opts: &DetectOptions) -> Result<BomType> {
    Ok(resolve(reader, opts)?.bom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_bytes(bytes: &[u8], opts: &DetectOptions) -> Result<Resolution> {
        resolve(&mut &bytes[..], opts)
    }

    #[test]
    fn empty_stream_is_none() {
        let resolution = resolve_bytes(&[], &DetectOptions::default()).unwrap();
        assert_eq!(resolution.bom, BomType::None);
        assert!(resolution.residue().is_empty());
    }

    #[test]
    fn each_signature_resolves_to_itself() {
        for bom in &BomType::ALL[1..] {
            // The bare UTF-32LE signature is the ambiguous FF FE 00 00 and
            // reads as UTF-16LE unless prefer32 breaks the tie its way.
            let opts = DetectOptions {
                prefer32: *bom == BomType::Utf32Le,
                ..DetectOptions::default()
            };
            let resolution = resolve_bytes(bom.signature(), &opts).unwrap();
            assert_eq!(resolution.bom, *bom, "signature of {}", bom.name());
            assert!(resolution.residue().is_empty());
        }
    }

    #[test]
    fn utf32le_signature_resolves_utf16le_by_default() {
        // FF FE 00 00 is ambiguous; the 16-bit reading wins unless prefer32.
        let resolution =
            resolve_bytes(&[0xFF, 0xFE, 0x00, 0x00], &DetectOptions::default()).unwrap();
        assert_eq!(resolution.bom, BomType::Utf16Le);
        assert_eq!(resolution.residue(), &[0x00, 0x00]);
    }

    #[test]
    fn prefer32_flips_the_tie() {
        let opts = DetectOptions {
            prefer32: true,
            ..DetectOptions::default()
        };
        let resolution = resolve_bytes(&[0xFF, 0xFE, 0x00, 0x00], &opts).unwrap();
        assert_eq!(resolution.bom, BomType::Utf32Le);
        assert!(resolution.residue().is_empty());
    }

    #[test]
    fn prefer32_ignored_without_tie() {
        // FF FE followed by anything but 00 00 is UTF-16LE regardless.
        let opts = DetectOptions {
            prefer32: true,
            ..DetectOptions::default()
        };
        let resolution = resolve_bytes(&[0xFF, 0xFE, 0x00, 0x41], &opts).unwrap();
        assert_eq!(resolution.bom, BomType::Utf16Le);
        assert_eq!(resolution.residue(), &[0x00, 0x41]);
    }

    #[test]
    fn truncated_overlap_is_utf16le() {
        // Stream ends while UTF-32LE is still a possible prefix.
        let resolution = resolve_bytes(&[0xFF, 0xFE, 0x00], &DetectOptions::default()).unwrap();
        assert_eq!(resolution.bom, BomType::Utf16Le);
        assert_eq!(resolution.residue(), &[0x00]);
    }

    #[test]
    fn residue_excludes_bom_bytes() {
        let resolution =
            resolve_bytes(&[0xEF, 0xBB, 0xBF, b'h', b'i'], &DetectOptions::default()).unwrap();
        assert_eq!(resolution.bom, BomType::Utf8);
        // Matching settled on the third byte; nothing further was read.
        assert!(resolution.residue().is_empty());
    }

    #[test]
    fn expected_set_violation() {
        let opts = DetectOptions {
            expect: BomTypeSet::empty().with(BomType::Utf8),
            ..DetectOptions::default()
        };
        let err = resolve_bytes(&[0xFE, 0xFF], &opts).unwrap_err();
        assert!(matches!(err, BomError::UnexpectedType(BomType::Utf16Be)));
    }

    #[test]
    fn expected_set_match_passes() {
        let opts = DetectOptions {
            expect: BomTypeSet::empty().with(BomType::Utf8).with(BomType::None),
            ..DetectOptions::default()
        };
        assert_eq!(detect(&mut &b"plain"[..], &opts).unwrap(), BomType::None);
        assert_eq!(
            detect(&mut &[0xEF, 0xBB, 0xBF][..], &opts).unwrap(),
            BomType::Utf8
        );
    }

    #[test]
    fn resolution_is_always_single() {
        // Exhaustive over all 1- and 2-byte prefixes: resolution never fails
        // internally and always yields exactly one type.
        for first in 0..=255u8 {
            let resolution = resolve_bytes(&[first], &DetectOptions::default()).unwrap();
            assert!(BomType::ALL.contains(&resolution.bom));
            for second in 0..=255u8 {
                let resolution =
                    resolve_bytes(&[first, second], &DetectOptions::default()).unwrap();
                assert!(BomType::ALL.contains(&resolution.bom));
            }
        }
    }
}
