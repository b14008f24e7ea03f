//! # BOM Core
//!
//! Detection, stripping, and UTF-8 transcoding of Unicode byte order marks
//! on arbitrary byte streams. Recognizes a fixed catalog of BOM signatures
//! (UTF-7, UTF-8, UTF-16BE/LE, UTF-32BE/LE, GB18030), disambiguates the
//! UTF-16LE/UTF-32LE overlap, and streams the remainder of the input either
//! verbatim or converted to UTF-8.
//!
//! ## Design
//!
//! - **Parallel prefix matching**: all signatures are matched simultaneously,
//!   one byte at a time, with lookahead bounded by the longest signature
//! - **Streaming conversion**: fixed-size double buffering keeps memory
//!   constant regardless of stream length; partial multi-byte sequences are
//!   carried across buffer refills
//! - **Strict by default**: invalid byte sequences fail with the stream
//!   offset; lenient mode skips them instead
//!
//! ## Quick Start
//!
//! ```rust
//! use bom_core::{strip, BomType, StripOptions};
//!
//! let input: &[u8] = b"\xEF\xBB\xBFhello";
//! let mut output = Vec::new();
//! let bom = strip(&mut &input[..], &mut output, &StripOptions::default())?;
//! assert_eq!(bom, BomType::Utf8);
//! assert_eq!(output, b"hello");
//! # Ok::<(), bom_core::BomError>(())
//! ```

#![deny(clippy::all)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod convert;
pub mod error;
pub mod matcher;
pub mod pipeline;
pub mod resolver;

pub use catalog::{BomType, BomTypeSet, MAX_SIGNATURE_LEN};
pub use error::{BomError, Result};
pub use matcher::{BomMatcher, MatchState};
pub use pipeline::{strip, StripOptions};
pub use resolver::{detect, resolve, DetectOptions, Resolution};

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
