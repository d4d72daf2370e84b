//! Parallel feature materialization for ferro-genbank
//!
//! Evaluates feature sequences across threads using rayon. Enable with the
//! `parallel` feature.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "parallel")]
//! # fn main() {
//! use ferro_genbank::parallel::{materialize_all, ParallelStats};
//! use ferro_genbank::read_genbank;
//!
//! let record = read_genbank("NC_000913.3.gb").unwrap().record;
//! let results = materialize_all(&record);
//! let stats = ParallelStats::from_results(&results);
//! println!("{} of {} features materialized", stats.successful, stats.total);
//! # }
//! # #[cfg(not(feature = "parallel"))]
//! # fn main() {}
//! ```

use std::borrow::Cow;

use rayon::prelude::*;

use crate::error::GenbankError;
use crate::genbank::{FeatureRef, GenomeRecord};

/// Materialize every feature of a record in parallel
///
/// Returns one result per feature. Order is preserved. With caching on,
/// each feature's cell is filled at most once even under contention.
pub fn materialize_all(record: &GenomeRecord) -> Vec<Result<String, GenbankError>> {
    materialize_where(record, |_| true)
}

/// Materialize the features accepted by `select`, in parallel
///
/// Results are paired with the feature's index and returned in file order.
pub fn materialize_selected<F>(
    record: &GenomeRecord,
    select: F,
) -> Vec<(usize, Result<String, GenbankError>)>
where
    F: Fn(&FeatureRef<'_>) -> bool + Sync,
{
    (0..record.feature_count())
        .into_par_iter()
        .filter_map(|i| record.feature(i))
        .filter(|feature| select(feature))
        .map(|feature| (feature.index(), feature.sequence().map(Cow::into_owned)))
        .collect()
}

fn materialize_where<F>(record: &GenomeRecord, select: F) -> Vec<Result<String, GenbankError>>
where
    F: Fn(&FeatureRef<'_>) -> bool + Sync,
{
    materialize_selected(record, select)
        .into_iter()
        .map(|(_, result)| result)
        .collect()
}

/// Statistics for a batch of materializations
#[derive(Debug, Clone, Default)]
pub struct ParallelStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

impl ParallelStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally a batch of results
    pub fn from_results<T>(results: &[Result<T, GenbankError>]) -> Self {
        let successful = results.iter().filter(|r| r.is_ok()).count();
        Self {
            total: results.len(),
            successful,
            failed: results.len() - successful,
        }
    }

    /// Success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.successful as f64 / self.total as f64) * 100.0
        }
    }
}
