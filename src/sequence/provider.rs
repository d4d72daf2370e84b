//! Sequence provider trait and string-backed implementations

use crate::coords::ZeroBasedInterval;
use crate::error::GenbankError;

/// Read-only access to a nucleotide sequence
///
/// Coordinates are 0-based half-open. Callers holding GenBank 1-based
/// closed coordinates convert through
/// [`OneBasedInterval::to_zero_based_half_open`](crate::coords::OneBasedInterval::to_zero_based_half_open).
pub trait SequenceProvider {
    /// Total sequence length in bases
    fn sequence_len(&self) -> u64;

    /// Borrow the bases in `interval`
    ///
    /// Fails with [`GenbankError::RangeOutOfBounds`] when the interval
    /// reaches past the end of the sequence.
    fn get_sequence(&self, interval: ZeroBasedInterval) -> Result<&str, GenbankError>;
}

/// Slice `seq` by a 0-based half-open interval, checking bounds
///
/// The out-of-bounds error reports the interval in 1-based closed
/// coordinates, as it was written in the file.
pub fn slice_checked(seq: &str, interval: ZeroBasedInterval) -> Result<&str, GenbankError> {
    let len = seq.len() as u64;
    let out_of_bounds = || GenbankError::RangeOutOfBounds {
        start: interval.start.value() + 1,
        end: interval.end.value(),
        len,
    };
    if interval.end.value() > len || interval.start > interval.end {
        return Err(out_of_bounds());
    }
    seq.get(interval.as_range()).ok_or_else(|| {
        // Only reachable when the slice splits a multi-byte character
        let chars: String = seq.chars().filter(|c| !c.is_ascii()).collect();
        GenbankError::InvalidNucleotide { chars }
    })
}

impl SequenceProvider for str {
    fn sequence_len(&self) -> u64 {
        self.len() as u64
    }

    fn get_sequence(&self, interval: ZeroBasedInterval) -> Result<&str, GenbankError> {
        slice_checked(self, interval)
    }
}

impl SequenceProvider for String {
    fn sequence_len(&self) -> u64 {
        self.len() as u64
    }

    fn get_sequence(&self, interval: ZeroBasedInterval) -> Result<&str, GenbankError> {
        slice_checked(self, interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::OneBasedInterval;

    #[test]
    fn test_slice_in_bounds() {
        let seq = "AAACCGGG";
        let iv = OneBasedInterval::try_new(4, 5).unwrap().to_zero_based_half_open();
        assert_eq!(seq.get_sequence(iv).unwrap(), "CC");
        assert_eq!(seq.sequence_len(), 8);
    }

    #[test]
    fn test_slice_whole_sequence() {
        let seq = String::from("ACGT");
        let iv = OneBasedInterval::try_new(1, 4).unwrap().to_zero_based_half_open();
        assert_eq!(seq.get_sequence(iv).unwrap(), "ACGT");
    }

    #[test]
    fn test_slice_out_of_bounds_reports_one_based() {
        let iv = OneBasedInterval::try_new(3, 9).unwrap().to_zero_based_half_open();
        assert_eq!(
            "ACGTACGT".get_sequence(iv),
            Err(GenbankError::RangeOutOfBounds {
                start: 3,
                end: 9,
                len: 8
            })
        );
    }
}
