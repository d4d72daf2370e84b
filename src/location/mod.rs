//! Feature location expressions
//!
//! A location expression says which bases of a record a feature covers:
//!
//! ```text
//! 467                              single base
//! 340..565                         closed range
//! <345..500                        range whose true start lies upstream
//! complement(3300..4037)           reverse strand
//! join(12..78,134..202)            spliced parts, concatenated 5' to 3'
//! order(1..10,20..30)              parts in unspecified arrangement
//! J00194.1:100..202                range on another record
//! ```
//!
//! [`parser::parse_location`] builds a [`Location`] tree and
//! [`eval::evaluate`] resolves it against a
//! [`SequenceProvider`](crate::sequence::SequenceProvider).

pub mod eval;
pub mod parser;

pub use eval::{evaluate, materialize};
pub use parser::{parse_location, MAX_NESTING};

use serde::Serialize;
use std::fmt;

use crate::coords::{OneBasedInterval, OneBasedPos};

/// Partial-boundary marker on a location endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Fuzzy {
    /// `<`: the feature extends beyond this point toward the 5' end
    Before,
    /// `>`: the feature extends beyond this point toward the 3' end
    After,
}

impl Fuzzy {
    pub fn symbol(self) -> char {
        match self {
            Fuzzy::Before => '<',
            Fuzzy::After => '>',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '<' => Some(Fuzzy::Before),
            '>' => Some(Fuzzy::After),
            _ => None,
        }
    }
}

/// Parsed location expression
///
/// Range endpoints are 1-based and inclusive. A `Range` always satisfies
/// `start <= end`; the parser rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Location {
    Range {
        start: OneBasedPos,
        end: OneBasedPos,
        fuzzy_start: Option<Fuzzy>,
        fuzzy_end: Option<Fuzzy>,
    },
    SinglePoint {
        position: OneBasedPos,
        fuzzy: Option<Fuzzy>,
    },
    Complement {
        inner: Box<Location>,
    },
    Join {
        parts: Vec<Location>,
    },
    Order {
        parts: Vec<Location>,
    },
    CrossReference {
        accession: String,
        inner: Box<Location>,
    },
}

impl Location {
    /// An exact range
    ///
    /// # Panics
    ///
    /// Panics if either position is 0 or `start > end`.
    pub fn range(start: u64, end: u64) -> Self {
        assert!(start <= end, "range start {start} exceeds end {end}");
        Location::Range {
            start: OneBasedPos::new(start),
            end: OneBasedPos::new(end),
            fuzzy_start: None,
            fuzzy_end: None,
        }
    }

    /// An exact single base
    pub fn point(position: u64) -> Self {
        Location::SinglePoint {
            position: OneBasedPos::new(position),
            fuzzy: None,
        }
    }

    /// True if any endpoint in the tree carries a `<`/`>` marker
    pub fn is_fuzzy(&self) -> bool {
        match self {
            Location::Range {
                fuzzy_start,
                fuzzy_end,
                ..
            } => fuzzy_start.is_some() || fuzzy_end.is_some(),
            Location::SinglePoint { fuzzy, .. } => fuzzy.is_some(),
            Location::Complement { inner } => inner.is_fuzzy(),
            Location::Join { parts } | Location::Order { parts } => parts.iter().any(Location::is_fuzzy),
            Location::CrossReference { inner, .. } => inner.is_fuzzy(),
        }
    }

    /// True if every local base lies on the reverse strand
    ///
    /// A leaf is reverse-strand when it sits under an odd number of
    /// `complement(...)` operators, so `join(complement(1..5),complement(8..9))`
    /// counts as well as `complement(join(1..5,8..9))`.
    pub fn is_complement(&self) -> bool {
        let mut strands = Vec::new();
        self.collect_strands(false, &mut strands);
        !strands.is_empty() && strands.iter().all(|reverse| *reverse)
    }

    fn collect_strands(&self, reverse: bool, out: &mut Vec<bool>) {
        match self {
            Location::Range { .. } | Location::SinglePoint { .. } => out.push(reverse),
            Location::Complement { inner } => inner.collect_strands(!reverse, out),
            Location::Join { parts } | Location::Order { parts } => {
                for part in parts {
                    part.collect_strands(reverse, out);
                }
            }
            Location::CrossReference { .. } => {}
        }
    }

    /// Leaf intervals on this record, in written order
    ///
    /// Cross-reference parts point at another record and are left out.
    pub fn ranges(&self) -> Vec<OneBasedInterval> {
        let mut out = Vec::new();
        self.collect_ranges(&mut out);
        out
    }

    fn collect_ranges(&self, out: &mut Vec<OneBasedInterval>) {
        match self {
            Location::Range { start, end, .. } => out.push(OneBasedInterval::new(*start, *end)),
            Location::SinglePoint { position, .. } => out.push(OneBasedInterval::point(*position)),
            Location::Complement { inner } => inner.collect_ranges(out),
            Location::Join { parts } | Location::Order { parts } => {
                for part in parts {
                    part.collect_ranges(out);
                }
            }
            Location::CrossReference { .. } => {}
        }
    }

    /// Smallest interval covering every local leaf
    pub fn bounds(&self) -> Option<OneBasedInterval> {
        let ranges = self.ranges();
        let start = ranges.iter().map(|r| r.start).min()?;
        let end = ranges.iter().map(|r| r.end).max()?;
        Some(OneBasedInterval::new(start, end))
    }

    /// True if any part refers to another record
    pub fn has_cross_reference(&self) -> bool {
        match self {
            Location::Range { .. } | Location::SinglePoint { .. } => false,
            Location::Complement { inner } => inner.has_cross_reference(),
            Location::Join { parts } | Location::Order { parts } => {
                parts.iter().any(Location::has_cross_reference)
            }
            Location::CrossReference { .. } => true,
        }
    }
}

fn write_parts(f: &mut fmt::Formatter<'_>, op: &str, parts: &[Location]) -> fmt::Result {
    write!(f, "{op}(")?;
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{part}")?;
    }
    write!(f, ")")
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Range {
                start,
                end,
                fuzzy_start,
                fuzzy_end,
            } => {
                if let Some(fz) = fuzzy_start {
                    write!(f, "{}", fz.symbol())?;
                }
                write!(f, "{start}..")?;
                if let Some(fz) = fuzzy_end {
                    write!(f, "{}", fz.symbol())?;
                }
                write!(f, "{end}")
            }
            Location::SinglePoint { position, fuzzy } => {
                if let Some(fz) = fuzzy {
                    write!(f, "{}", fz.symbol())?;
                }
                write!(f, "{position}")
            }
            Location::Complement { inner } => write!(f, "complement({inner})"),
            Location::Join { parts } => write_parts(f, "join", parts),
            Location::Order { parts } => write_parts(f, "order", parts),
            Location::CrossReference { accession, inner } => write!(f, "{accession}:{inner}"),
        }
    }
}
