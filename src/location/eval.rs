//! Location expression evaluator
//!
//! Walks a [`Location`] tree against a [`SequenceProvider`]:
//!
//! | Node | Result |
//! |------|--------|
//! | `Range` / `SinglePoint` | slice of the provider |
//! | `Complement` | reverse complement of the inner result |
//! | `Join` / `Order` | parts concatenated in written order |
//! | `CrossReference` | [`GenbankError::UnsupportedCrossReference`] |
//!
//! `order()` is evaluated exactly like `join()`.

use crate::alphabet::{reverse_complement, validate_iupac};
use crate::coords::OneBasedInterval;
use crate::error::GenbankError;
use crate::location::Location;
use crate::sequence::SequenceProvider;

/// Evaluate a location to its nucleotide string
///
/// # Examples
///
/// ```
/// use ferro_genbank::location::{evaluate, parse_location};
///
/// let loc = parse_location("complement(join(1..3,5..7))").unwrap();
/// assert_eq!(evaluate(&loc, "AAACCGGG").unwrap(), "CCGTTT");
/// ```
pub fn evaluate<P: SequenceProvider + ?Sized>(
    location: &Location,
    provider: &P,
) -> Result<String, GenbankError> {
    match location {
        Location::Range { start, end, .. } => {
            let interval = OneBasedInterval::new(*start, *end).to_zero_based_half_open();
            Ok(provider.get_sequence(interval)?.to_string())
        }
        Location::SinglePoint { position, .. } => {
            let interval = OneBasedInterval::point(*position).to_zero_based_half_open();
            Ok(provider.get_sequence(interval)?.to_string())
        }
        Location::Complement { inner } => reverse_complement(&evaluate(inner, provider)?),
        Location::Join { parts } | Location::Order { parts } => {
            let mut out = String::new();
            for part in parts {
                out.push_str(&evaluate(part, provider)?);
            }
            Ok(out)
        }
        Location::CrossReference { accession, .. } => {
            Err(GenbankError::UnsupportedCrossReference {
                accession: accession.clone(),
            })
        }
    }
}

/// Evaluate a location and check the result is a valid nucleotide string
///
/// This is what feature sequence access uses: a sequence holding a
/// non-IUPAC character fails with [`GenbankError::InvalidNucleotide`]
/// rather than returning the suspect bases.
pub fn materialize<P: SequenceProvider + ?Sized>(
    location: &Location,
    provider: &P,
) -> Result<String, GenbankError> {
    let seq = evaluate(location, provider)?;
    validate_iupac(&seq)?;
    Ok(seq)
}
