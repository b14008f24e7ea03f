//! Fixed catalog of BOM signatures
//!
//! Each catalog entry pairs a BOM's exact byte sequence with its associated
//! text encoding. The catalog is an ordered, process-wide immutable table:
//! index 0 is reserved for the [`BomType::None`] sentinel whose empty
//! signature is a trivially-matching prefix of every stream.
//!
//! Signatures are pairwise distinct in byte content with one designed
//! ambiguity: the UTF-16LE signature (`FF FE`) is a byte-for-byte prefix of
//! the UTF-32LE signature (`FF FE 00 00`). The resolver owns that
//! disambiguation.

use crate::error::{BomError, Result};

/// Length in bytes of the longest signature in the catalog
pub const MAX_SIGNATURE_LEN: usize = 4;

/// A BOM type from the fixed signature catalog
///
/// Variant order matches the catalog table order and is observable through
/// [`BomType::ALL`] and the listing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BomType {
    /// Sentinel for "no BOM"; empty signature, no associated encoding
    None,
    /// UTF-7 BOM (2B 2F 76)
    Utf7,
    /// UTF-8 BOM (EF BB BF)
    Utf8,
    /// UTF-16 Big Endian (FE FF)
    Utf16Be,
    /// UTF-16 Little Endian (FF FE)
    Utf16Le,
    /// UTF-32 Big Endian (00 00 FE FF)
    Utf32Be,
    /// UTF-32 Little Endian (FF FE 00 00)
    Utf32Le,
    /// GB18030 (84 31 95 33)
    Gb18030,
}

impl BomType {
    /// All catalog entries in fixed table order, sentinel first
    pub const ALL: [Self; 8] = [
        Self::None,
        Self::Utf7,
        Self::Utf8,
        Self::Utf16Be,
        Self::Utf16Le,
        Self::Utf32Be,
        Self::Utf32Le,
        Self::Gb18030,
    ];

    /// Get the unique catalog name for this BOM type
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Utf7 => "UTF-7",
            Self::Utf8 => "UTF-8",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf32Be => "UTF-32BE",
            Self::Utf32Le => "UTF-32LE",
            Self::Gb18030 => "GB18030",
        }
    }

    /// Get the associated text encoding name
    ///
    /// Returns `None` for the sentinel, which represents the absence of a
    /// BOM and therefore has no source encoding to convert from.
    #[must_use]
    pub const fn encoding(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            other => Some(other.name()),
        }
    }

    /// Get the exact byte signature for this BOM type
    #[must_use]
    pub const fn signature(self) -> &'static [u8] {
        match self {
            Self::None => &[],
            Self::Utf7 => &[0x2B, 0x2F, 0x76],
            Self::Utf8 => &[0xEF, 0xBB, 0xBF],
            Self::Utf16Be => &[0xFE, 0xFF],
            Self::Utf16Le => &[0xFF, 0xFE],
            Self::Utf32Be => &[0x00, 0x00, 0xFE, 0xFF],
            Self::Utf32Le => &[0xFF, 0xFE, 0x00, 0x00],
            Self::Gb18030 => &[0x84, 0x31, 0x95, 0x33],
        }
    }

    /// Get the signature length in bytes (0 for the sentinel)
    #[must_use]
    pub const fn len(self) -> usize {
        self.signature().len()
    }

    /// Check whether the signature is empty (true only for the sentinel)
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Position of this entry in the catalog table
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Look up a catalog entry by its case-exact name
    ///
    /// # Errors
    ///
    /// Returns [`BomError::UnknownType`] when no entry matches.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|bom| bom.name() == name)
            .ok_or_else(|| BomError::UnknownType(name.to_string()))
    }
}

bitflags::bitflags! {
    /// Set of BOM types, one bit per catalog entry
    ///
    /// Used for the expected-type policy: an empty set means "no
    /// expectation" and accepts every resolution.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BomTypeSet: u8 {
        /// The "no BOM" sentinel
        const NONE = 1 << 0;
        /// UTF-7
        const UTF_7 = 1 << 1;
        /// UTF-8
        const UTF_8 = 1 << 2;
        /// UTF-16 Big Endian
        const UTF_16BE = 1 << 3;
        /// UTF-16 Little Endian
        const UTF_16LE = 1 << 4;
        /// UTF-32 Big Endian
        const UTF_32BE = 1 << 5;
        /// UTF-32 Little Endian
        const UTF_32LE = 1 << 6;
        /// GB18030
        const GB18030 = 1 << 7;
    }
}

impl From<BomType> for BomTypeSet {
    fn from(bom: BomType) -> Self {
        Self::from_bits_truncate(1u8 << bom.index())
    }
}

impl BomTypeSet {
    /// Return a copy of the set with `bom` added
    #[must_use]
    pub fn with(self, bom: BomType) -> Self {
        self | Self::from(bom)
    }

    /// Check whether the policy accepts `bom`
    ///
    /// The empty set carries no expectation and allows everything.
    #[must_use]
    pub fn allows(self, bom: BomType) -> bool {
        self.is_empty() || self.contains(Self::from(bom))
    }
}
