//! Nucleotide alphabet utilities
//!
//! Complement tables over the extended IUPAC nucleotide codes, alphabet
//! detection, and validation. Complementing is case-preserving.
//!
//! Sequences that contain both `U` and `T` are rejected by
//! [`reverse_complement`] with [`GenbankError::MixedAlphabet`]: there is no
//! defined complement for an RNA/DNA hybrid.

use std::collections::BTreeSet;

use crate::error::GenbankError;

/// Every accepted nucleotide code, upper case
pub const IUPAC_NUCLEOTIDES: &str = "ACGTURYSWKMBDHVN";

/// Molecule alphabet inferred from a sequence's bases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alphabet {
    /// Contains `T`/`t` and no `U`/`u` (or neither)
    Dna,
    /// Contains `U`/`u` and no `T`/`t`
    Rna,
    /// Contains both `T` and `U`
    Mixed,
}

/// Check whether a character is an IUPAC nucleotide code (either case)
#[inline]
pub fn is_iupac(c: char) -> bool {
    matches!(
        c.to_ascii_uppercase(),
        'A' | 'C'
            | 'G'
            | 'T'
            | 'U'
            | 'R'
            | 'Y'
            | 'S'
            | 'W'
            | 'K'
            | 'M'
            | 'B'
            | 'D'
            | 'H'
            | 'V'
            | 'N'
    )
}

/// Complement a single nucleotide
///
/// `U` complements to `A`; `A` always complements to `T`.
///
/// # Examples
///
/// ```
/// use ferro_genbank::alphabet::complement_base;
///
/// assert_eq!(complement_base('A').unwrap(), 'T');
/// assert_eq!(complement_base('r').unwrap(), 'y');
/// assert!(complement_base('X').is_err());
/// ```
pub fn complement_base(c: char) -> Result<char, GenbankError> {
    let upper = match c.to_ascii_uppercase() {
        'A' => 'T',
        'T' => 'A',
        'U' => 'A',
        'C' => 'G',
        'G' => 'C',
        'R' => 'Y',
        'Y' => 'R',
        'S' => 'S',
        'W' => 'W',
        'K' => 'M',
        'M' => 'K',
        'B' => 'V',
        'V' => 'B',
        'D' => 'H',
        'H' => 'D',
        'N' => 'N',
        _ => {
            return Err(GenbankError::InvalidNucleotide {
                chars: c.to_string(),
            })
        }
    };
    if c.is_ascii_lowercase() {
        Ok(upper.to_ascii_lowercase())
    } else {
        Ok(upper)
    }
}

/// Reverse complement a nucleotide sequence
///
/// # Examples
///
/// ```
/// use ferro_genbank::alphabet::reverse_complement;
///
/// assert_eq!(reverse_complement("AAAGGG").unwrap(), "CCCTTT");
/// assert_eq!(reverse_complement("atgN").unwrap(), "Ncat");
/// assert!(reverse_complement("ATU").is_err());
/// ```
pub fn reverse_complement(seq: &str) -> Result<String, GenbankError> {
    if classify(seq) == Alphabet::Mixed {
        return Err(GenbankError::MixedAlphabet);
    }
    seq.chars().rev().map(complement_base).collect()
}

/// The set of distinct characters in a sequence
pub fn detect_alphabet(seq: &str) -> BTreeSet<char> {
    seq.chars().collect()
}

/// Infer whether a sequence is DNA, RNA or a hybrid of both
pub fn classify(seq: &str) -> Alphabet {
    let mut has_t = false;
    let mut has_u = false;
    for c in seq.chars() {
        match c {
            'T' | 't' => has_t = true,
            'U' | 'u' => has_u = true,
            _ => {}
        }
    }
    match (has_t, has_u) {
        (true, true) => Alphabet::Mixed,
        (false, true) => Alphabet::Rna,
        _ => Alphabet::Dna,
    }
}

/// Validate that every character is an IUPAC nucleotide code
///
/// The error names every offending character, sorted and de-duplicated.
pub fn validate_iupac(seq: &str) -> Result<(), GenbankError> {
    let invalid: String = detect_alphabet(seq)
        .into_iter()
        .filter(|c| !is_iupac(*c))
        .collect();
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(GenbankError::InvalidNucleotide { chars: invalid })
    }
}
