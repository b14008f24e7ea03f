//! Parallel prefix matching of BOM signatures
//!
//! Consumes a byte stream one byte at a time and tracks, for every catalog
//! entry simultaneously, whether the leading bytes of the stream are still a
//! prefix of that signature, matched it exactly, or diverged. A flat state
//! array plus two running counters keeps the algorithm `O(bytes * catalog)`
//! with a small constant catalog size.
//!
//! Every consumed byte is retained in a replay buffer: bytes read past the
//! winning signature belong to the post-BOM stream and must be handed to the
//! transcode pipeline rather than re-read from the source.

use crate::catalog::{BomType, MAX_SIGNATURE_LEN};
use crate::error::{BomError, Result};

/// Per-signature match state during byte-by-byte recognition
///
/// Transitions are monotonic: once a signature reaches `Complete` or
/// `Failed`, its state never changes again for that input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    /// Leading bytes so far are a strict prefix; the signature could still match
    Prefix,
    /// The signature matched exactly
    Complete,
    /// The stream diverged from the signature
    Failed,
}

impl MatchState {
    /// Check whether the state is terminal
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

/// Simultaneous multi-pattern matcher over the signature catalog
///
/// Owned exclusively by one matching session; feed bytes until
/// [`BomMatcher::is_settled`] or the source is exhausted, whichever comes
/// first.
#[derive(Debug)]
pub struct BomMatcher {
    /// Replay buffer of consumed bytes, bounded by the longest signature
    buf: [u8; MAX_SIGNATURE_LEN],
    /// Number of valid bytes in `buf`
    len: usize,
    /// Per-signature states, indexed by catalog position
    states: [MatchState; BomType::ALL.len()],
    /// Signatures that reached a terminal state
    finished: usize,
    /// Signatures in `Complete` state
    complete: usize,
}

impl BomMatcher {
    /// Create a matcher with every real signature in `Prefix` state
    ///
    /// The sentinel's empty signature is a trivially-matching prefix of any
    /// stream, so it starts (and stays) `Complete`.
    #[must_use]
    pub fn new() -> Self {
        let mut states = [MatchState::Prefix; BomType::ALL.len()];
        states[BomType::None.index()] = MatchState::Complete;
        Self {
            buf: [0; MAX_SIGNATURE_LEN],
            len: 0,
            states,
            finished: 1,
            complete: 1,
        }
    }

    /// Check whether every signature has reached a terminal state
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.finished == self.states.len()
    }

    /// Get the current match state of one signature
    #[must_use]
    pub const fn state(&self, bom: BomType) -> MatchState {
        self.states[bom.index()]
    }

    /// Number of signatures currently in `Complete` state
    #[must_use]
    pub const fn completed_count(&self) -> usize {
        self.complete
    }

    /// Bytes consumed so far, in order
    #[must_use]
    pub fn consumed(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Force a completed signature to `Failed`
    ///
    /// Used by the resolver to break the UTF-16LE/UTF-32LE tie. The entry
    /// must currently be `Complete`.
    pub(crate) fn force_failed(&mut self, bom: BomType) -> Result<()> {
        if self.states[bom.index()] != MatchState::Complete {
            return Err(BomError::Internal("invalid match state"));
        }
        self.states[bom.index()] = MatchState::Failed;
        self.complete -= 1;
        Ok(())
    }

    /// Feed one byte to every still-undecided signature
    ///
    /// The byte is appended to the replay buffer regardless of match
    /// outcome. The buffer cannot overflow given the catalog's signature
    /// length bound; the check exists as a safety invariant.
    ///
    /// # Errors
    ///
    /// Returns [`BomError::Internal`] if more bytes are fed than the replay
    /// buffer can hold (unreachable through [`crate::resolver::resolve`]).
    pub fn feed(&mut self, byte: u8) -> Result<()> {
        if self.len >= self.buf.len() {
            return Err(BomError::Internal("input buffer overflow"));
        }
        for bom in BomType::ALL {
            if self.states[bom.index()] != MatchState::Prefix {
                continue;
            }
            let signature = bom.signature();
            if signature[self.len] != byte {
                self.states[bom.index()] = MatchState::Failed;
                self.finished += 1;
            } else if signature.len() == self.len + 1 {
                self.states[bom.index()] = MatchState::Complete;
                self.finished += 1;
                self.complete += 1;
            }
        }
        self.buf[self.len] = byte;
        self.len += 1;
        Ok(())
    }
}

impl Default for BomMatcher {
    fn default() -> Self {
        Self::new()
    }
}
