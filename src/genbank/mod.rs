//! GenBank record model and parser
//!
//! [`GenomeRecord`] owns the sequence; [`Feature`]s and [`Reference`]s
//! are reached through the borrowed views [`FeatureRef`] and
//! [`ReferenceRef`], which read sequence through the owning record.

mod feature;
mod index;
pub mod parser;
mod record;
mod reference;

pub use feature::{Feature, FeatureKind, Qualifiers};
pub use index::GeneIndex;
pub use parser::{parse_all_str, parse_str, GenbankReader};
pub use record::{FeatureRef, GenomeRecord, Locus, ReferenceRef, Topology};
pub use reference::{BaseRange, Reference};
