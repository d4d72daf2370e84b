//! Gene name lookup over a record's features
//!
//! A read-only view: building it never changes the record, and names are
//! used exactly as written in the `/gene` and `/locus_tag` qualifiers.

use std::collections::BTreeMap;

use crate::genbank::record::{FeatureRef, GenomeRecord};

/// Feature indices grouped by `/gene` and by `/locus_tag`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneIndex {
    by_gene: BTreeMap<String, Vec<usize>>,
    by_locus_tag: BTreeMap<String, Vec<usize>>,
}

impl GeneIndex {
    pub fn new(record: &GenomeRecord) -> Self {
        let mut index = GeneIndex::default();
        for feature in record.features() {
            for gene in feature.qualifier("gene") {
                index
                    .by_gene
                    .entry(gene.clone())
                    .or_default()
                    .push(feature.index());
            }
            for tag in feature.qualifier("locus_tag") {
                index
                    .by_locus_tag
                    .entry(tag.clone())
                    .or_default()
                    .push(feature.index());
            }
        }
        index
    }

    /// Indices of features naming `gene`, in file order
    pub fn by_gene(&self, gene: &str) -> &[usize] {
        self.by_gene.get(gene).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Indices of features carrying `locus_tag`, in file order
    pub fn by_locus_tag(&self, locus_tag: &str) -> &[usize] {
        self.by_locus_tag
            .get(locus_tag)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Gene names in sorted order
    pub fn gene_names(&self) -> impl Iterator<Item = &str> {
        self.by_gene.keys().map(String::as_str)
    }

    pub fn locus_tags(&self) -> impl Iterator<Item = &str> {
        self.by_locus_tag.keys().map(String::as_str)
    }

    pub fn gene_count(&self) -> usize {
        self.by_gene.len()
    }

    /// Features named `gene` (gene, CDS, mRNA, ...) from `record`
    pub fn features_for_gene<'a>(&self, record: &'a GenomeRecord, gene: &str) -> Vec<FeatureRef<'a>> {
        self.by_gene(gene)
            .iter()
            .filter_map(|&i| record.feature(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genbank::feature::{Feature, FeatureKind, Qualifiers};
    use crate::location::Location;

    fn feature(kind: FeatureKind, gene: Option<&str>, tag: &str) -> Feature {
        let mut q = Qualifiers::new();
        if let Some(gene) = gene {
            q.push("gene", gene);
        }
        q.push("locus_tag", tag);
        Feature::new(kind, "1..3", Location::range(1, 3), q)
    }

    fn record() -> GenomeRecord {
        GenomeRecord {
            sequence: "ACGTACGT".to_string(),
            features: vec![
                feature(FeatureKind::Source, None, "src"),
                feature(FeatureKind::Gene, Some("thrL"), "b0001"),
                feature(FeatureKind::Cds, Some("thrL"), "b0001"),
                feature(FeatureKind::Gene, Some("thrA"), "b0002"),
            ],
            cache_sequences: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_lookup_by_gene() {
        let rec = record();
        let index = rec.gene_index();
        assert_eq!(index.by_gene("thrL"), &[1, 2]);
        assert!(index.by_gene("missing").is_empty());
        assert_eq!(index.gene_names().collect::<Vec<_>>(), vec!["thrA", "thrL"]);
        assert_eq!(index.gene_count(), 2);
    }

    #[test]
    fn test_lookup_by_locus_tag() {
        let index = GeneIndex::new(&record());
        assert_eq!(index.by_locus_tag("b0002"), &[3]);
        assert_eq!(index.locus_tags().count(), 3);
    }

    #[test]
    fn test_features_for_gene() {
        let rec = record();
        let index = rec.gene_index();
        let kinds: Vec<String> = index
            .features_for_gene(&rec, "thrL")
            .iter()
            .map(|f| f.kind.to_string())
            .collect();
        assert_eq!(kinds, vec!["gene", "CDS"]);
    }
}
