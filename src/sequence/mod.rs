//! Sequence access
//!
//! Location evaluation never copies a record's sequence. It asks a
//! [`SequenceProvider`] for borrowed slices by 0-based half-open interval.

mod provider;

pub use provider::{slice_checked, SequenceProvider};
