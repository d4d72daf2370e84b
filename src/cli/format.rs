//! Output formatting utilities for CLI operations

use std::io::{self, Write};
use std::str::FromStr;

use serde_json::{json, Map, Value};

use crate::cli::wrap_sequence;
use crate::diagnostic::ParseOutcome;
use crate::error::GenbankError;
use crate::genbank::FeatureRef;
use crate::location::Location;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text format (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

impl FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    /// Parse an output format from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use ferro_genbank::cli::OutputFormat;
    /// use std::str::FromStr;
    ///
    /// assert!(matches!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json));
    /// assert!(matches!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        })
    }
}

/// Write record metadata, counts and diagnostics
///
/// # Examples
///
/// ```
/// use ferro_genbank::cli::{write_summary, OutputFormat};
/// use ferro_genbank::parse_genbank;
///
/// let outcome = parse_genbank("LOCUS       X 4 bp DNA\nORIGIN\n        1 acgt\n//\n").unwrap();
/// let mut buffer = Vec::new();
/// write_summary(&mut buffer, &outcome, OutputFormat::Text).unwrap();
/// assert!(String::from_utf8(buffer).unwrap().contains("Length:      4"));
/// ```
pub fn write_summary<W: Write>(
    writer: &mut W,
    outcome: &ParseOutcome,
    format: OutputFormat,
) -> io::Result<()> {
    let record = &outcome.record;
    match format {
        OutputFormat::Json => {
            let diagnostics: Vec<Value> = outcome
                .diagnostics
                .iter()
                .map(|d| {
                    json!({
                        "line": d.line,
                        "code": d.code().as_str(),
                        "context": d.context,
                        "message": d.error.to_string(),
                    })
                })
                .collect();
            let value = json!({
                "locus": record.locus,
                "accession": record.accession,
                "version": record.version,
                "definition": record.definition,
                "organism": record.organism,
                "taxonomy": record.taxonomy,
                "keywords": record.keywords,
                "dblinks": record.dblinks,
                "length": record.len(),
                "features": record.feature_count(),
                "references": record.reference_count(),
                "diagnostics": diagnostics,
            });
            writeln!(writer, "{}", to_json(&value)?)
        }
        OutputFormat::Text => {
            let name = record.locus.name.as_deref().unwrap_or("-");
            writeln!(writer, "Locus:       {}", name)?;
            if let Some(accession) = record.primary_accession() {
                writeln!(writer, "Accession:   {}", accession)?;
            }
            if let Some(version) = &record.version {
                writeln!(writer, "Version:     {}", version)?;
            }
            if let Some(definition) = &record.definition {
                writeln!(writer, "Definition:  {}", definition)?;
            }
            if let Some(organism) = &record.organism {
                writeln!(writer, "Organism:    {}", organism)?;
            }
            writeln!(writer, "Length:      {}", record.len())?;
            writeln!(writer, "Features:    {}", record.feature_count())?;
            writeln!(writer, "References:  {}", record.reference_count())?;
            writeln!(writer, "Diagnostics: {}", outcome.diagnostics.len())?;
            for diagnostic in &outcome.diagnostics {
                writeln!(writer, "  {}", diagnostic)?;
            }
            Ok(())
        }
    }
}

/// Write one line (text) or one object (JSON) per feature
///
/// `qualifiers` limits which qualifiers are shown; empty shows all.
pub fn write_features<'a, W, I>(
    writer: &mut W,
    features: I,
    qualifiers: &[String],
    format: OutputFormat,
) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = FeatureRef<'a>>,
{
    let shown = |name: &str| qualifiers.is_empty() || qualifiers.iter().any(|q| q == name);
    match format {
        OutputFormat::Json => {
            let rows: Vec<Value> = features
                .into_iter()
                .map(|f| {
                    let mut selected = Map::new();
                    for (name, values) in f.qualifiers.iter().filter(|(n, _)| shown(*n)) {
                        selected.insert(name.to_string(), json!(values));
                    }
                    json!({
                        "index": f.index(),
                        "type": f.kind.as_str(),
                        "location": f.raw_location,
                        "fuzzy": f.fuzzy,
                        "qualifiers": selected,
                    })
                })
                .collect();
            writeln!(writer, "{}", to_json(&Value::Array(rows))?)
        }
        OutputFormat::Text => {
            for f in features {
                let mut line = format!(
                    "{}\t{}\t{}\t{}",
                    f.index(),
                    f.kind,
                    f.raw_location,
                    if f.fuzzy { "fuzzy" } else { "exact" }
                );
                for (name, values) in f.qualifiers.iter().filter(|(n, _)| shown(*n)) {
                    for value in values {
                        line.push_str(&format!("\t{}={}", name, value));
                    }
                }
                writeln!(writer, "{}", line)?;
            }
            Ok(())
        }
    }
}

/// Write a FASTA entry, wrapping the sequence at `width` characters
///
/// # Examples
///
/// ```
/// use ferro_genbank::cli::write_fasta;
///
/// let mut buffer = Vec::new();
/// write_fasta(&mut buffer, "seq1", "ACGTACGT", 4).unwrap();
/// assert_eq!(String::from_utf8(buffer).unwrap(), ">seq1\nACGT\nACGT\n");
/// ```
pub fn write_fasta<W: Write>(
    writer: &mut W,
    header: &str,
    sequence: &str,
    width: usize,
) -> io::Result<()> {
    writeln!(writer, ">{}", header)?;
    for line in wrap_sequence(sequence, width) {
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

/// Write a parsed location as an indented tree (text) or its serde form (JSON)
///
/// # Examples
///
/// ```
/// use ferro_genbank::cli::{write_location, OutputFormat};
/// use ferro_genbank::parse_location;
///
/// let loc = parse_location("complement(join(1..3,<5..7))").unwrap();
/// let mut buffer = Vec::new();
/// write_location(&mut buffer, &loc, OutputFormat::Text).unwrap();
/// let text = String::from_utf8(buffer).unwrap();
/// assert!(text.starts_with("complement\n  join\n    range 1..3\n"));
/// assert!(text.contains("range <5..7 (fuzzy)"));
/// ```
pub fn write_location<W: Write>(
    writer: &mut W,
    location: &Location,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => writeln!(writer, "{}", to_json(location)?),
        OutputFormat::Text => write_tree(writer, location, 0),
    }
}

fn write_tree<W: Write>(writer: &mut W, location: &Location, depth: usize) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    match location {
        Location::Range { .. } | Location::SinglePoint { .. } => {
            let kind = if matches!(location, Location::Range { .. }) {
                "range"
            } else {
                "point"
            };
            let fuzzy = if location.is_fuzzy() { " (fuzzy)" } else { "" };
            writeln!(writer, "{}{} {}{}", indent, kind, location, fuzzy)
        }
        Location::Complement { inner } => {
            writeln!(writer, "{}complement", indent)?;
            write_tree(writer, inner, depth + 1)
        }
        Location::Join { parts } | Location::Order { parts } => {
            let op = if matches!(location, Location::Join { .. }) {
                "join"
            } else {
                "order"
            };
            writeln!(writer, "{}{}", indent, op)?;
            for part in parts {
                write_tree(writer, part, depth + 1)?;
            }
            Ok(())
        }
        Location::CrossReference { accession, inner } => {
            writeln!(writer, "{}cross-reference {}", indent, accession)?;
            write_tree(writer, inner, depth + 1)
        }
    }
}

/// Write an error to the output
///
/// # Examples
///
/// ```
/// use ferro_genbank::cli::{output_error, OutputFormat};
/// use ferro_genbank::GenbankError;
///
/// let mut buffer = Vec::new();
/// let error = GenbankError::MixedAlphabet;
/// output_error(&mut buffer, "gene:abc", &error, OutputFormat::Text).unwrap();
/// let result = String::from_utf8(buffer).unwrap();
/// assert!(result.starts_with("ERROR [E2004]: gene:abc"));
/// ```
pub fn output_error<W: Write>(
    writer: &mut W,
    input: &str,
    error: &GenbankError,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let value = json!({
                "input": input,
                "code": error.code().as_str(),
                "error": error.to_string(),
                "status": "error",
            });
            writeln!(writer, "{}", to_json(&value)?)
        }
        OutputFormat::Text => {
            writeln!(writer, "ERROR [{}]: {} - {}", error.code(), input, error)
        }
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> io::Result<String> {
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
