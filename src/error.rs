//! Error types for ferro-genbank
//!
//! Every failure carries a stable [`ErrorCode`] so that recovered
//! diagnostics and fatal errors can be filtered programmatically.
//!
//! Errors fall into two groups:
//! - Fatal: an unreadable source or a file with no recognizable blocks.
//! - Recoverable: a single malformed location, qualifier, reference or
//!   block. The file parser turns these into
//!   [`Diagnostic`](crate::diagnostic::Diagnostic)s and keeps going.
//!
//! Evaluation-time errors (out-of-range spans, cross-references, invalid
//! nucleotides) are returned to whoever asked for a feature's sequence.

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Location syntax errors (E1xxx)
    /// Location expression could not be parsed
    MalformedLocation = 1001,

    // Evaluation errors (E2xxx)
    /// Location range exceeds the record sequence
    RangeOutOfBounds = 2001,
    /// Location refers to another sequence record
    UnsupportedCrossReference = 2002,
    /// Character outside the IUPAC nucleotide alphabet
    InvalidNucleotide = 2003,
    /// Sequence mixes RNA (U) and DNA (T) bases
    MixedAlphabet = 2004,

    // File structure errors (E3xxx)
    /// Top-level block keyword has no handler
    UnrecognizedBlock = 3001,
    /// Qualifier line without `=`, or a quoted value that never closes
    MalformedQualifier = 3002,
    /// REFERENCE block could not be parsed
    MalformedReference = 3003,
    /// Metadata block could not be parsed
    MalformedBlock = 3004,
    /// Input contains no recognizable top-level block
    NoRecognizedBlocks = 3005,

    // Configuration errors (E4xxx)
    /// No path or text supplied, or the path could not be read
    MissingSource = 4001,
    /// Conflicting or invalid options
    InvalidConfig = 4002,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
}

impl ErrorCode {
    /// Every code, in numeric order
    pub const ALL: [ErrorCode; 13] = [
        ErrorCode::MalformedLocation,
        ErrorCode::RangeOutOfBounds,
        ErrorCode::UnsupportedCrossReference,
        ErrorCode::InvalidNucleotide,
        ErrorCode::MixedAlphabet,
        ErrorCode::UnrecognizedBlock,
        ErrorCode::MalformedQualifier,
        ErrorCode::MalformedReference,
        ErrorCode::MalformedBlock,
        ErrorCode::NoRecognizedBlocks,
        ErrorCode::MissingSource,
        ErrorCode::InvalidConfig,
        ErrorCode::IoError,
    ];

    /// Look up a code by its string form (case-insensitive, e.g. "e3001")
    pub fn from_code_str(code: &str) -> Option<ErrorCode> {
        let code = code.trim().to_uppercase();
        Self::ALL.into_iter().find(|c| c.as_str() == code)
    }

    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::MalformedLocation => "malformed location expression",
            ErrorCode::RangeOutOfBounds => "location range out of bounds",
            ErrorCode::UnsupportedCrossReference => "cross-record location not supported",
            ErrorCode::InvalidNucleotide => "invalid nucleotide character",
            ErrorCode::MixedAlphabet => "mixed RNA/DNA alphabet",
            ErrorCode::UnrecognizedBlock => "unrecognized top-level block",
            ErrorCode::MalformedQualifier => "malformed feature qualifier",
            ErrorCode::MalformedReference => "malformed reference block",
            ErrorCode::MalformedBlock => "malformed metadata block",
            ErrorCode::NoRecognizedBlocks => "no recognizable GenBank blocks",
            ErrorCode::MissingSource => "missing or unreadable source",
            ErrorCode::InvalidConfig => "invalid configuration",
            ErrorCode::IoError => "file I/O error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for ferro-genbank operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenbankError {
    /// Location expression syntax error
    #[error("Malformed location '{raw}': {reason}")]
    MalformedLocation { raw: String, reason: String },

    /// A range reaches past the end of the record sequence
    #[error("Range {start}..{end} out of bounds for sequence of length {len}")]
    RangeOutOfBounds { start: u64, end: u64, len: u64 },

    /// Location points into another record
    #[error("Cross-reference locations are not supported: {accession}")]
    UnsupportedCrossReference { accession: String },

    /// Characters outside the IUPAC nucleotide alphabet
    #[error("Invalid nucleotide(s): {chars}")]
    InvalidNucleotide { chars: String },

    /// Complementing a sequence holding both U and T
    #[error("Cannot complement a sequence mixing RNA (U) and DNA (T) bases")]
    MixedAlphabet,

    /// Top-level block without a handler
    #[error("Unrecognized block: {keyword}")]
    UnrecognizedBlock { keyword: String },

    /// Qualifier line without `=`
    #[error("Malformed qualifier '{name}': no '=' in '{line}'")]
    MalformedQualifier { name: String, line: String },

    /// Quoted qualifier value still open when its feature ends
    #[error("Unterminated qualifier '{name}': closing quote missing")]
    UnterminatedQualifier { name: String },

    /// REFERENCE block error
    #[error("Malformed reference: {reason}")]
    MalformedReference { reason: String },

    /// Metadata block error
    #[error("Malformed {keyword} block: {reason}")]
    MalformedBlock { keyword: String, reason: String },

    /// Nothing in the input looked like GenBank
    #[error("No recognizable GenBank blocks found")]
    NoRecognizedBlocks,

    /// No usable source
    #[error("Missing source: {msg}")]
    MissingSource { msg: String },

    /// Invalid options
    #[error("Invalid configuration: {msg}")]
    InvalidConfig { msg: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },
}

impl GenbankError {
    /// Create a location syntax error
    pub fn malformed_location(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        GenbankError::MalformedLocation {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            GenbankError::MalformedLocation { .. } => ErrorCode::MalformedLocation,
            GenbankError::RangeOutOfBounds { .. } => ErrorCode::RangeOutOfBounds,
            GenbankError::UnsupportedCrossReference { .. } => ErrorCode::UnsupportedCrossReference,
            GenbankError::InvalidNucleotide { .. } => ErrorCode::InvalidNucleotide,
            GenbankError::MixedAlphabet => ErrorCode::MixedAlphabet,
            GenbankError::UnrecognizedBlock { .. } => ErrorCode::UnrecognizedBlock,
            GenbankError::MalformedQualifier { .. } | GenbankError::UnterminatedQualifier { .. } => {
                ErrorCode::MalformedQualifier
            }
            GenbankError::MalformedReference { .. } => ErrorCode::MalformedReference,
            GenbankError::MalformedBlock { .. } => ErrorCode::MalformedBlock,
            GenbankError::NoRecognizedBlocks => ErrorCode::NoRecognizedBlocks,
            GenbankError::MissingSource { .. } => ErrorCode::MissingSource,
            GenbankError::InvalidConfig { .. } => ErrorCode::InvalidConfig,
            GenbankError::Io { .. } => ErrorCode::IoError,
        }
    }

    /// Whether the file parser may skip the offending item and continue
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GenbankError::MalformedLocation { .. }
                | GenbankError::UnrecognizedBlock { .. }
                | GenbankError::MalformedQualifier { .. }
                | GenbankError::UnterminatedQualifier { .. }
                | GenbankError::MalformedReference { .. }
                | GenbankError::MalformedBlock { .. }
        )
    }
}

impl From<std::io::Error> for GenbankError {
    fn from(err: std::io::Error) -> Self {
        GenbankError::Io {
            msg: err.to_string(),
        }
    }
}
