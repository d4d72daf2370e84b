//! Feature-table entries

use std::borrow::Cow;
use std::fmt;

use log::trace;
use once_cell::sync::OnceCell;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::GenbankError;
use crate::location::{materialize, Location};
use crate::sequence::SequenceProvider;

/// Feature key from the first column of the feature table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Source,
    Gene,
    Cds,
    MRna,
    NcRna,
    MiscFeature,
    RRna,
    TRna,
    TmRna,
    RepeatRegion,
    MobileElement,
    MiscRna,
    RegulatoryRegion,
    Exon,
    Intron,
    Other(String),
}

impl FeatureKind {
    /// Map a feature key to its kind; unknown keys are kept verbatim
    pub fn from_key(key: &str) -> Self {
        match key {
            "source" => FeatureKind::Source,
            "gene" => FeatureKind::Gene,
            "CDS" => FeatureKind::Cds,
            "mRNA" => FeatureKind::MRna,
            "ncRNA" => FeatureKind::NcRna,
            "misc_feature" => FeatureKind::MiscFeature,
            "rRNA" => FeatureKind::RRna,
            "tRNA" => FeatureKind::TRna,
            "tmRNA" => FeatureKind::TmRna,
            "repeat_region" => FeatureKind::RepeatRegion,
            "mobile_element" => FeatureKind::MobileElement,
            "misc_RNA" => FeatureKind::MiscRna,
            "regulatory" => FeatureKind::RegulatoryRegion,
            "exon" => FeatureKind::Exon,
            "intron" => FeatureKind::Intron,
            other => FeatureKind::Other(other.to_string()),
        }
    }

    /// The feature key as written in GenBank files
    pub fn as_str(&self) -> &str {
        match self {
            FeatureKind::Source => "source",
            FeatureKind::Gene => "gene",
            FeatureKind::Cds => "CDS",
            FeatureKind::MRna => "mRNA",
            FeatureKind::NcRna => "ncRNA",
            FeatureKind::MiscFeature => "misc_feature",
            FeatureKind::RRna => "rRNA",
            FeatureKind::TRna => "tRNA",
            FeatureKind::TmRna => "tmRNA",
            FeatureKind::RepeatRegion => "repeat_region",
            FeatureKind::MobileElement => "mobile_element",
            FeatureKind::MiscRna => "misc_RNA",
            FeatureKind::RegulatoryRegion => "regulatory",
            FeatureKind::Exon => "exon",
            FeatureKind::Intron => "intron",
            FeatureKind::Other(key) => key,
        }
    }

    /// True for RNA product features
    pub fn is_rna(&self) -> bool {
        matches!(
            self,
            FeatureKind::MRna
                | FeatureKind::NcRna
                | FeatureKind::RRna
                | FeatureKind::TRna
                | FeatureKind::TmRna
                | FeatureKind::MiscRna
        )
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FeatureKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Qualifier multimap
///
/// Names keep the order in which they first appear; values keep file
/// order, so repeated qualifiers such as `/db_xref` are all retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Qualifiers {
    entries: Vec<(String, Vec<String>)>,
}

impl Qualifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to a qualifier
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    /// All values of a qualifier, empty if it never appeared
    pub fn get(&self, name: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// First value of a qualifier
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).first().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Qualifier names in first-appearance order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(n, values)| (n.as_str(), values.as_slice()))
    }

    /// Number of distinct qualifier names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Qualifiers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, values) in &self.entries {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

/// One feature-table entry
///
/// The materialized sequence lives in a compute-once cell: concurrent
/// first accesses block on a single evaluation, and a failed evaluation
/// stores nothing.
#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    pub kind: FeatureKind,
    /// Location text with whitespace removed
    pub raw_location: String,
    pub location: Location,
    /// True if the location uses `<`/`>` partial-boundary markers
    pub fuzzy: bool,
    pub qualifiers: Qualifiers,
    #[serde(skip)]
    cache: OnceCell<String>,
}

impl Feature {
    pub fn new(
        kind: FeatureKind,
        raw_location: impl Into<String>,
        location: Location,
        qualifiers: Qualifiers,
    ) -> Self {
        Self {
            kind,
            raw_location: raw_location.into(),
            fuzzy: location.is_fuzzy(),
            location,
            qualifiers,
            cache: OnceCell::new(),
        }
    }

    /// All values of a qualifier, empty if absent
    pub fn qualifier(&self, name: &str) -> &[String] {
        self.qualifiers.get(name)
    }

    /// `/gene` name
    pub fn gene(&self) -> Option<&str> {
        self.qualifiers.first("gene")
    }

    /// `/locus_tag`
    pub fn locus_tag(&self) -> Option<&str> {
        self.qualifiers.first("locus_tag")
    }

    /// `/product`
    pub fn product(&self) -> Option<&str> {
        self.qualifiers.first("product")
    }

    /// The supplied `/translation`, if any
    ///
    /// Amino acids are never computed from the nucleotide sequence.
    pub fn translation(&self) -> Option<&str> {
        self.qualifiers.first("translation")
    }

    /// A short label: gene, then locus tag, then the feature key
    pub fn label(&self) -> &str {
        self.gene()
            .or_else(|| self.locus_tag())
            .unwrap_or_else(|| self.kind.as_str())
    }

    /// True once the sequence has been evaluated and stored
    pub fn is_cached(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Evaluate this feature's sequence against `provider`
    ///
    /// With `cache` set the result is stored on first success and borrowed
    /// afterwards; otherwise every call re-evaluates. The provider must be
    /// the record that owns this feature.
    pub(crate) fn materialize_with<'a, P: SequenceProvider + ?Sized>(
        &'a self,
        provider: &P,
        cache: bool,
    ) -> Result<Cow<'a, str>, GenbankError> {
        if !cache {
            return materialize(&self.location, provider).map(Cow::Owned);
        }
        if let Some(seq) = self.cache.get() {
            trace!("sequence cache hit for {} {}", self.kind, self.raw_location);
            return Ok(Cow::Borrowed(seq.as_str()));
        }
        self.cache
            .get_or_try_init(|| materialize(&self.location, provider))
            .map(|seq| Cow::Borrowed(seq.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::parse_location;

    fn feature(raw: &str) -> Feature {
        Feature::new(
            FeatureKind::Cds,
            raw,
            parse_location(raw).unwrap(),
            Qualifiers::new(),
        )
    }

    #[test]
    fn test_feature_kind_round_trip() {
        for key in ["source", "gene", "CDS", "mRNA", "tRNA", "misc_feature", "STS"] {
            assert_eq!(FeatureKind::from_key(key).as_str(), key);
        }
        assert_eq!(
            FeatureKind::from_key("STS"),
            FeatureKind::Other("STS".to_string())
        );
        assert!(FeatureKind::TRna.is_rna());
        assert!(!FeatureKind::Cds.is_rna());
    }

    #[test]
    fn test_qualifiers_keep_multiplicity_and_order() {
        let mut q = Qualifiers::new();
        q.push("db_xref", "GeneID:1");
        q.push("gene", "thrL");
        q.push("db_xref", "ASAP:ABE-0000006");
        assert_eq!(q.get("db_xref"), ["GeneID:1", "ASAP:ABE-0000006"]);
        assert_eq!(q.first("gene"), Some("thrL"));
        assert!(q.get("note").is_empty());
        assert_eq!(q.names().collect::<Vec<_>>(), vec!["db_xref", "gene"]);
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_qualifiers_serialize_as_map() {
        let mut q = Qualifiers::new();
        q.push("gene", "thrL");
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(json, r#"{"gene":["thrL"]}"#);
    }

    #[test]
    fn test_fuzzy_flag_follows_location() {
        assert!(feature("<1..20").fuzzy);
        assert!(!feature("1..20").fuzzy);
    }

    #[test]
    fn test_cache_stores_only_on_success() {
        let f = feature("1..4");
        assert!(f.materialize_with("ACG", true).is_err());
        assert!(!f.is_cached());
        assert_eq!(f.materialize_with("ACGT", true).unwrap(), "ACGT");
        assert!(f.is_cached());
    }

    #[test]
    fn test_uncached_evaluation_leaves_cell_empty() {
        let f = feature("complement(1..2)");
        assert_eq!(f.materialize_with("ACGT", false).unwrap(), "GT");
        assert!(!f.is_cached());
    }

    #[test]
    fn test_label_fallbacks() {
        let mut q = Qualifiers::new();
        q.push("locus_tag", "b0001");
        let f = Feature::new(FeatureKind::Gene, "1..3", Location::range(1, 3), q);
        assert_eq!(f.label(), "b0001");
        assert_eq!(feature("1..3").label(), "CDS");
    }
}
