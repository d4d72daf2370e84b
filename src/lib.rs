// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-genbank: GenBank flat-file parser
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! # Example
//!
//! ```
//! use ferro_genbank::{parse_genbank, parse_location};
//!
//! let text = "\
//! LOCUS       DEMO                      9 bp    DNA     linear   UNK 01-JAN-2024
//! FEATURES             Location/Qualifiers
//!      gene            complement(1..9)
//!                      /gene=\"demo\"
//! ORIGIN
//!         1 atgcatgca
//! //
//! ";
//!
//! // Parse a record; recoverable problems come back as diagnostics
//! let outcome = parse_genbank(text).unwrap();
//! assert!(outcome.is_clean());
//!
//! // Feature sequences are evaluated on demand
//! let record = outcome.record;
//! let gene = record.feature(0).unwrap();
//! assert_eq!(gene.sequence().unwrap(), "TGCATGCAT");
//!
//! // Location expressions can also be parsed on their own
//! let loc = parse_location("join(1..3,7..9)").unwrap();
//! assert_eq!(loc.ranges().len(), 2);
//! ```

pub mod alphabet;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod coords;
pub mod diagnostic;
pub mod error;
pub mod genbank;
pub mod location;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod sequence;

use std::path::Path;

// Re-export commonly used types
pub use config::{ErrorMode, FerroConfig, ParseConfig};
pub use diagnostic::{Diagnostic, ParseOutcome};
pub use error::{ErrorCode, GenbankError};
pub use genbank::{
    Feature, FeatureKind, FeatureRef, GenbankReader, GenomeRecord, Reference, ReferenceRef,
};
pub use location::{evaluate, materialize, parse_location, Location};
pub use sequence::SequenceProvider;

// Re-export coordinate types for type-safe position handling
pub use coords::{OneBasedInterval, OneBasedPos, ZeroBasedInterval, ZeroBasedPos};

/// Result type alias for ferro-genbank operations
pub type Result<T> = std::result::Result<T, GenbankError>;

/// Parse the first record of GenBank text with the default configuration
pub fn parse_genbank(text: &str) -> Result<ParseOutcome> {
    genbank::parse_str(text, &ParseConfig::default())
}

/// Read and parse the first record of a GenBank file (`.gz` allowed)
pub fn read_genbank(path: impl AsRef<Path>) -> Result<ParseOutcome> {
    GenbankReader::new().path(path.as_ref()).parse()
}
