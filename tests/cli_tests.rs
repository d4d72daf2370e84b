//! Tests for the CLI helpers against a real fixture
//!
//! The binary itself is a thin wrapper; these exercise the selection and
//! output functions it calls.

#![cfg(feature = "cli")]

use std::path::Path;

use ferro_genbank::cli::{
    fasta_header, write_fasta, write_features, write_summary, FeatureSelector, OutputFormat,
};
use ferro_genbank::{read_genbank, ParseOutcome};
use serde_json::Value;

fn ecoli() -> ParseOutcome {
    read_genbank(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/genbank/ecoli_thrL.gb"),
    )
    .unwrap()
}

fn render(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
    let mut buffer = Vec::new();
    f(&mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[test]
fn test_summary_text() {
    let outcome = ecoli();
    let text = render(|w| write_summary(w, &outcome, OutputFormat::Text));
    assert!(text.contains("Locus:       NC_000913\n"));
    assert!(text.contains("Version:     NC_000913.3  GI:556503834\n"));
    assert!(text.contains("Length:      120\n"));
    assert!(text.contains("Features:    8\n"));
    assert!(text.contains("References:  3\n"));
    assert!(text.contains("Diagnostics: 3\n"));
    assert!(text.contains("  line 6: [E3001] block PROJECT"));
}

#[test]
fn test_summary_json() {
    let outcome = ecoli();
    let text = render(|w| write_summary(w, &outcome, OutputFormat::Json));
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["length"], 120);
    assert_eq!(value["taxonomy"].as_array().unwrap().len(), 6);
    assert_eq!(value["diagnostics"][2]["line"], 70);
    assert_eq!(value["diagnostics"][2]["code"], "E1001");
}

#[test]
fn test_features_by_kind_with_filter() {
    let outcome = ecoli();
    let selector: FeatureSelector = "type:CDS".parse().unwrap();
    let qualifiers = vec!["gene".to_string()];
    let text = render(|w| {
        write_features(
            w,
            selector.select(&outcome.record),
            &qualifiers,
            OutputFormat::Text,
        )
    });
    assert_eq!(
        text,
        "2\tCDS\t1..66\texact\tgene=thrL\n6\tCDS\t5..10\texact\tgene=pseuA\n"
    );
}

#[test]
fn test_extract_gene_as_fasta() {
    let outcome = ecoli();
    let selector: FeatureSelector = "gene:revA".parse().unwrap();
    let selected = selector.select(&outcome.record);
    assert_eq!(selected.len(), 1);
    let feature = &selected[0];
    assert_eq!(
        fasta_header(feature),
        "NC_000913:5 gene revA complement(10..20)"
    );

    let sequence = feature.sequence().unwrap();
    let text = render(|w| write_fasta(w, &fasta_header(feature), &sequence, 5));
    assert_eq!(
        text,
        ">NC_000913:5 gene revA complement(10..20)\nGTGGT\nGCTAA\nT\n"
    );
}

#[test]
fn test_locus_tag_selects_gene_and_cds() {
    let outcome = ecoli();
    let selector: FeatureSelector = "locus_tag:b0001".parse().unwrap();
    let indices: Vec<usize> = selector
        .select(&outcome.record)
        .iter()
        .map(|f| f.index())
        .collect();
    assert_eq!(indices, vec![1, 2]);
}
