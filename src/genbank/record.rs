//! The parsed record and borrowed views into it

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ops::Deref;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::coords::{OneBasedInterval, ZeroBasedInterval};
use crate::error::GenbankError;
use crate::genbank::feature::Feature;
use crate::genbank::index::GeneIndex;
use crate::genbank::reference::Reference;
use crate::sequence::{slice_checked, SequenceProvider};

static LOCUS_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}-[A-Z]{3}-\d{4}$").expect("valid regex"));

/// Molecule topology from the LOCUS line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    Linear,
    Circular,
}

/// The LOCUS line, raw and split into its fields
///
/// ```text
/// LOCUS       NC_000913            4641652 bp    DNA     circular BCT 09-MAR-2016
/// ```
///
/// Field extraction is best-effort; anything not recognized stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Locus {
    pub raw: String,
    pub name: Option<String>,
    pub length: Option<u64>,
    /// `bp` or `aa`
    pub unit: Option<String>,
    pub molecule: Option<String>,
    pub topology: Option<Topology>,
    pub division: Option<String>,
    pub date: Option<String>,
}

impl Locus {
    /// Split a LOCUS line (with or without the `LOCUS` keyword)
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let body = raw.strip_prefix("LOCUS").unwrap_or(raw);
        let tokens: Vec<&str> = body.split_whitespace().collect();
        let mut locus = Locus {
            raw: raw.to_string(),
            name: tokens.first().map(|s| s.to_string()),
            ..Default::default()
        };

        let mut i = 1;
        while i < tokens.len() {
            let token = tokens[i];
            let next = tokens.get(i + 1).copied();
            if locus.length.is_none() && matches!(next, Some("bp" | "aa")) {
                if let Ok(n) = token.parse::<u64>() {
                    locus.length = Some(n);
                    locus.unit = next.map(str::to_string);
                    i += 2;
                    continue;
                }
            }
            match token {
                "linear" => locus.topology = Some(Topology::Linear),
                "circular" => locus.topology = Some(Topology::Circular),
                t if LOCUS_DATE.is_match(t) => locus.date = Some(t.to_string()),
                t if locus.molecule.is_none() && is_molecule_type(t) => {
                    locus.molecule = Some(t.to_string())
                }
                t if t.len() == 3 && t.chars().all(|c| c.is_ascii_uppercase()) => {
                    locus.division = Some(t.to_string())
                }
                _ => {}
            }
            i += 1;
        }
        locus
    }
}

fn is_molecule_type(token: &str) -> bool {
    token.contains("DNA") || token.contains("RNA") || token == "PROTEIN"
}

/// A parsed GenBank record
///
/// Built once by the parser and read-only afterwards. Features and
/// references do not copy the sequence; [`FeatureRef`] and
/// [`ReferenceRef`] pair them with the owning record for sequence access.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenomeRecord {
    pub locus: Locus,
    pub accession: Vec<String>,
    pub definition: Option<String>,
    /// First line of the SOURCE block
    pub source: Option<String>,
    pub organism: Option<String>,
    pub taxonomy: Vec<String>,
    /// Empty when the file declares `KEYWORDS    .`
    pub keywords: Vec<String>,
    /// DBLINK database name to identifier
    pub dblinks: BTreeMap<String, String>,
    /// Full VERSION text, e.g. `NC_000913.3  GI:556503834`
    pub version: Option<String>,
    pub comment: Option<String>,
    #[serde(skip)]
    pub(crate) sequence: String,
    pub(crate) features: Vec<Feature>,
    pub(crate) references: Vec<Reference>,
    #[serde(skip)]
    pub(crate) cache_sequences: bool,
}

impl GenomeRecord {
    /// Upper-case nucleotide sequence from ORIGIN
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Sequence length in bases
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Whether feature sequences are memoized
    pub fn caches_sequences(&self) -> bool {
        self.cache_sequences
    }

    /// Slice the sequence by 1-based inclusive coordinates
    ///
    /// ```
    /// use ferro_genbank::coords::OneBasedInterval;
    /// use ferro_genbank::GenbankReader;
    ///
    /// let text = "LOCUS       X 8 bp DNA\nORIGIN\n        1 aaaccggg\n//\n";
    /// let record = GenbankReader::new().text(text).parse().unwrap().record;
    /// let range = OneBasedInterval::try_new(4, 5).unwrap();
    /// assert_eq!(record.subsequence(range).unwrap(), "CC");
    /// ```
    pub fn subsequence(&self, range: OneBasedInterval) -> Result<&str, GenbankError> {
        slice_checked(&self.sequence, range.to_zero_based_half_open())
    }

    /// Features in file order
    pub fn features(&self) -> impl ExactSizeIterator<Item = FeatureRef<'_>> + '_ {
        self.features
            .iter()
            .enumerate()
            .map(move |(index, feature)| FeatureRef {
                record: self,
                feature,
                index,
            })
    }

    /// Feature by position in file order
    pub fn feature(&self, index: usize) -> Option<FeatureRef<'_>> {
        self.features.get(index).map(|feature| FeatureRef {
            record: self,
            feature,
            index,
        })
    }

    /// Accession.version token from the VERSION line
    pub fn accession_version(&self) -> Option<&str> {
        self.version.as_deref()?.split_whitespace().next()
    }

    /// GenInfo identifier from a `GI:` token on the VERSION line
    pub fn gi(&self) -> Option<&str> {
        self.version
            .as_deref()?
            .split_whitespace()
            .find_map(|token| token.strip_prefix("GI:"))
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// References in file order
    pub fn references(&self) -> impl ExactSizeIterator<Item = ReferenceRef<'_>> + '_ {
        self.references.iter().map(move |reference| ReferenceRef {
            record: self,
            reference,
        })
    }

    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    /// Index features by `/gene` and `/locus_tag`
    pub fn gene_index(&self) -> GeneIndex {
        GeneIndex::new(self)
    }

    /// Primary accession
    pub fn primary_accession(&self) -> Option<&str> {
        self.accession.first().map(String::as_str)
    }
}

impl SequenceProvider for GenomeRecord {
    fn sequence_len(&self) -> u64 {
        self.sequence.len() as u64
    }

    fn get_sequence(&self, interval: ZeroBasedInterval) -> Result<&str, GenbankError> {
        slice_checked(&self.sequence, interval)
    }
}

/// A feature together with the record that owns it
#[derive(Debug, Clone, Copy)]
pub struct FeatureRef<'a> {
    record: &'a GenomeRecord,
    feature: &'a Feature,
    index: usize,
}

impl<'a> FeatureRef<'a> {
    /// Position in the record's feature list
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn record(&self) -> &'a GenomeRecord {
        self.record
    }

    pub fn feature(&self) -> &'a Feature {
        self.feature
    }

    /// The nucleotide sequence this feature covers
    ///
    /// Evaluated on first access; memoized when the record was parsed with
    /// sequence caching on.
    pub fn sequence(&self) -> Result<Cow<'a, str>, GenbankError> {
        self.feature
            .materialize_with(self.record, self.record.cache_sequences)
    }
}

impl Deref for FeatureRef<'_> {
    type Target = Feature;

    fn deref(&self) -> &Feature {
        self.feature
    }
}

/// A reference together with the record that owns it
#[derive(Debug, Clone, Copy)]
pub struct ReferenceRef<'a> {
    record: &'a GenomeRecord,
    reference: &'a Reference,
}

impl<'a> ReferenceRef<'a> {
    pub fn reference(&self) -> &'a Reference {
        self.reference
    }

    /// Bases covered by the reference's declared range
    ///
    /// `Ok(None)` when the REFERENCE line carried no `(bases X to Y)`.
    pub fn sequence(&self) -> Result<Option<&'a str>, GenbankError> {
        self.reference
            .base_range
            .map(|range| self.record.subsequence(range))
            .transpose()
    }
}

impl Deref for ReferenceRef<'_> {
    type Target = Reference;

    fn deref(&self) -> &Reference {
        self.reference
    }
}
