//! CLI utilities for ferro-genbank
//!
//! This module provides testable functions used by the `ferro-gb` binary.
//! Feature selection, FASTA layout and output formatting live here so they
//! can be unit tested without running the binary.

pub mod format;

use std::str::FromStr;

use crate::error::GenbankError;
use crate::genbank::{FeatureKind, FeatureRef, GenomeRecord};

// Re-export commonly used items
pub use format::{
    output_error, write_fasta, write_features, write_location, write_summary, OutputFormat,
};

/// Default FASTA line width
pub const FASTA_LINE_WIDTH: usize = 70;

/// How the `extract` command picks features
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureSelector {
    /// Position in file order (0-based)
    Index(usize),
    /// `/gene` qualifier
    Gene(String),
    /// `/locus_tag` qualifier
    LocusTag(String),
    /// Feature key, e.g. `CDS`
    Kind(FeatureKind),
    /// Every feature
    All,
}

impl FeatureSelector {
    /// Whether a feature is selected
    pub fn matches(&self, feature: &FeatureRef<'_>) -> bool {
        match self {
            FeatureSelector::Index(i) => feature.index() == *i,
            FeatureSelector::Gene(gene) => feature.gene() == Some(gene.as_str()),
            FeatureSelector::LocusTag(tag) => feature.locus_tag() == Some(tag.as_str()),
            FeatureSelector::Kind(kind) => &feature.kind == kind,
            FeatureSelector::All => true,
        }
    }

    /// Selected features of a record, in file order
    pub fn select<'a>(&self, record: &'a GenomeRecord) -> Vec<FeatureRef<'a>> {
        match self {
            FeatureSelector::Index(i) => record.feature(*i).into_iter().collect(),
            FeatureSelector::Gene(gene) => record.gene_index().features_for_gene(record, gene),
            _ => record.features().filter(|f| self.matches(f)).collect(),
        }
    }
}

impl FromStr for FeatureSelector {
    type Err = GenbankError;

    /// Parse `index:N`, `gene:NAME`, `locus_tag:TAG`, `type:KEY` or `all`
    ///
    /// # Examples
    ///
    /// ```
    /// use ferro_genbank::cli::FeatureSelector;
    /// use ferro_genbank::FeatureKind;
    ///
    /// assert_eq!("index:3".parse::<FeatureSelector>().unwrap(), FeatureSelector::Index(3));
    /// assert_eq!(
    ///     "type:CDS".parse::<FeatureSelector>().unwrap(),
    ///     FeatureSelector::Kind(FeatureKind::Cds)
    /// );
    /// assert!("colour:red".parse::<FeatureSelector>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(FeatureSelector::All);
        }
        let invalid = || GenbankError::InvalidConfig {
            msg: format!(
                "invalid feature selector '{s}' (expected index:N, gene:NAME, locus_tag:TAG, type:KEY or all)"
            ),
        };
        let (kind, value) = s.split_once(':').ok_or_else(invalid)?;
        let value = value.trim();
        if value.is_empty() {
            return Err(invalid());
        }
        match kind.trim().to_lowercase().as_str() {
            "index" => value.parse().map(FeatureSelector::Index).map_err(|_| invalid()),
            "gene" => Ok(FeatureSelector::Gene(value.to_string())),
            "locus_tag" | "locus-tag" => Ok(FeatureSelector::LocusTag(value.to_string())),
            "type" | "kind" => Ok(FeatureSelector::Kind(FeatureKind::from_key(value))),
            _ => Err(invalid()),
        }
    }
}

/// FASTA header for a feature: `>ACCESSION:index kind label location`
pub fn fasta_header(feature: &FeatureRef<'_>) -> String {
    let record = feature.record();
    let accession = record
        .primary_accession()
        .or(record.locus.name.as_deref())
        .unwrap_or("record");
    format!(
        "{}:{} {} {} {}",
        accession,
        feature.index(),
        feature.kind,
        feature.label(),
        feature.location
    )
}

/// Wrap a sequence into lines of at most `width` characters
///
/// A width of 0 leaves the sequence on one line.
///
/// # Examples
///
/// ```
/// use ferro_genbank::cli::wrap_sequence;
///
/// assert_eq!(wrap_sequence("ACGTACGT", 3), vec!["ACG", "TAC", "GT"]);
/// assert!(wrap_sequence("", 3).is_empty());
/// ```
pub fn wrap_sequence(seq: &str, width: usize) -> Vec<&str> {
    if seq.is_empty() {
        return Vec::new();
    }
    if width == 0 {
        return vec![seq];
    }
    let mut lines = Vec::with_capacity(seq.len() / width + 1);
    let mut rest = seq;
    while !rest.is_empty() {
        let cut = rest
            .char_indices()
            .nth(width)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (line, tail) = rest.split_at(cut);
        lines.push(line);
        rest = tail;
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseConfig;
    use crate::genbank::parse_str;

    const RECORD: &str = "\
LOCUS       SEL 12 bp DNA linear
ACCESSION   SEL1
FEATURES             Location/Qualifiers
     gene            1..6
                     /gene=\"selA\"
                     /locus_tag=\"b0001\"
     CDS             1..6
                     /gene=\"selA\"
                     /locus_tag=\"b0001\"
     gene            complement(7..12)
                     /gene=\"selB\"
ORIGIN
        1 atgaaa cccggg
//
";

    fn record() -> GenomeRecord {
        parse_str(RECORD, &ParseConfig::default()).unwrap().record
    }

    #[test]
    fn test_selector_parse() {
        assert_eq!("all".parse::<FeatureSelector>().unwrap(), FeatureSelector::All);
        assert_eq!(
            "gene:selA".parse::<FeatureSelector>().unwrap(),
            FeatureSelector::Gene("selA".to_string())
        );
        assert_eq!(
            "locus-tag: b0001".parse::<FeatureSelector>().unwrap(),
            FeatureSelector::LocusTag("b0001".to_string())
        );
        assert!("index:x".parse::<FeatureSelector>().is_err());
        assert!("gene:".parse::<FeatureSelector>().is_err());
        assert!("selA".parse::<FeatureSelector>().is_err());
    }

    #[test]
    fn test_select_by_gene_and_tag() {
        let record = record();
        let by_gene: Vec<usize> = FeatureSelector::Gene("selA".to_string())
            .select(&record)
            .iter()
            .map(|f| f.index())
            .collect();
        assert_eq!(by_gene, vec![0, 1]);

        let by_tag = FeatureSelector::LocusTag("b0001".to_string()).select(&record);
        assert_eq!(by_tag.len(), 2);
    }

    #[test]
    fn test_select_by_kind_and_index() {
        let record = record();
        let cds = FeatureSelector::Kind(FeatureKind::Cds).select(&record);
        assert_eq!(cds.len(), 1);
        assert_eq!(cds[0].index(), 1);

        let third = FeatureSelector::Index(2).select(&record);
        assert_eq!(third[0].sequence().unwrap(), "CCCGGG");
        assert!(FeatureSelector::Index(9).select(&record).is_empty());
        assert_eq!(FeatureSelector::All.select(&record).len(), 3);
    }

    #[test]
    fn test_fasta_header() {
        let record = record();
        let feature = record.feature(2).unwrap();
        assert_eq!(fasta_header(&feature), "SEL1:2 gene selB complement(7..12)");
    }

    #[test]
    fn test_wrap_sequence() {
        assert_eq!(wrap_sequence("ACGT", 4), vec!["ACGT"]);
        assert_eq!(wrap_sequence("ACGTA", 4), vec!["ACGT", "A"]);
        assert_eq!(wrap_sequence("ACGTA", 0), vec!["ACGTA"]);
    }
}
