//! Recovered parse problems
//!
//! In lenient mode the file parser skips whatever it cannot read (a
//! feature with a bad location, a qualifier without `=`, an unknown block)
//! and records a [`Diagnostic`] for it. The caller gets the best-effort
//! record and the full list in a [`ParseOutcome`].
//!
//! # Example
//!
//! ```
//! use ferro_genbank::GenbankReader;
//!
//! let text = "\
//! LOCUS       X 8 bp DNA
//! CONTIG      join(A:1..8)
//! ORIGIN
//!         1 aaaccggg
//! //
//! ";
//! let outcome = GenbankReader::new().text(text).parse().unwrap();
//! assert_eq!(outcome.diagnostics.len(), 1);
//! assert_eq!(outcome.diagnostics[0].code().as_str(), "E3001");
//! ```

use std::fmt;

use crate::error::{ErrorCode, GenbankError};
use crate::genbank::GenomeRecord;

/// A recovered, non-fatal parse problem
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// 1-based line number where the offending item starts
    pub line: usize,
    /// What was skipped, e.g. `feature CDS` or `block CONTIG`
    pub context: String,
    pub error: GenbankError,
}

impl Diagnostic {
    pub fn new(line: usize, context: impl Into<String>, error: GenbankError) -> Self {
        Self {
            line,
            context: context.into(),
            error,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.error.code()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: [{}] {}: {}",
            self.line,
            self.code(),
            self.context,
            self.error
        )
    }
}

/// A parsed record plus everything that was skipped while parsing it
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub record: GenomeRecord,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    pub fn new(record: GenomeRecord, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            record,
            diagnostics,
        }
    }

    /// True if nothing was skipped
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics with the given code
    pub fn diagnostics_with_code(&self, code: ErrorCode) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code() == code)
    }

    pub fn into_record(self) -> GenomeRecord {
        self.record
    }
}
