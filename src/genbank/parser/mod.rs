//! GenBank flat-file parser
//!
//! The file is cut into top-level blocks ([`segment`]), grouped into
//! records at `//`, and each block is handed to the handler for its
//! keyword:
//!
//! | Keyword | Handler |
//! |---------|---------|
//! | `LOCUS` | raw line plus [`Locus`] fields |
//! | `DEFINITION` | lines joined with spaces |
//! | `ACCESSION` | whitespace-separated accessions |
//! | `VERSION` | first token |
//! | `DBLINK` | `name: id` pairs |
//! | `KEYWORDS` | `;`-separated, `.` means none |
//! | `SOURCE` | first line, `ORGANISM` and lineage |
//! | `REFERENCE` | [`reference`] |
//! | `COMMENT` | lines joined with newlines |
//! | `FEATURES` | [`feature`] |
//! | `ORIGIN` | bases with numbering and spaces removed, upper-cased |
//!
//! Any other keyword is skipped with an
//! [`UnrecognizedBlock`](GenbankError::UnrecognizedBlock) diagnostic.

pub(crate) mod feature;
pub(crate) mod reference;
pub(crate) mod segment;

use std::path::PathBuf;

use log::{debug, warn};

use crate::config::{ErrorMode, GenbankSource, ParseConfig};
use crate::diagnostic::{Diagnostic, ParseOutcome};
use crate::error::GenbankError;
use crate::genbank::record::{GenomeRecord, Locus};
use segment::{segment, split_records, Block};

/// Parse the first record in `text`
///
/// # Example
///
/// ```
/// use ferro_genbank::genbank::parser::parse_str;
/// use ferro_genbank::ParseConfig;
///
/// let text = "\
/// LOCUS       X 8 bp DNA linear
/// FEATURES             Location/Qualifiers
///      CDS             complement(join(1..3,5..7))
///                      /gene=\"abc\"
/// ORIGIN
///         1 aaaccggg
/// //
/// ";
/// let outcome = parse_str(text, &ParseConfig::default()).unwrap();
/// let cds = outcome.record.feature(0).unwrap();
/// assert_eq!(cds.sequence().unwrap(), "CCGTTT");
/// ```
pub fn parse_str(text: &str, config: &ParseConfig) -> Result<ParseOutcome, GenbankError> {
    let mut outcomes = assemble_records(text, config, Some(1))?;
    // assemble_records never returns an empty list
    Ok(outcomes.remove(0))
}

/// Parse every record in `text`
pub fn parse_all_str(text: &str, config: &ParseConfig) -> Result<Vec<ParseOutcome>, GenbankError> {
    assemble_records(text, config, None)
}

fn assemble_records(
    text: &str,
    config: &ParseConfig,
    limit: Option<usize>,
) -> Result<Vec<ParseOutcome>, GenbankError> {
    let mut outcomes: Vec<ParseOutcome> = Vec::new();
    let mut stray: Vec<Diagnostic> = Vec::new();

    for group in split_records(segment(text)) {
        if limit.is_some_and(|n| outcomes.len() >= n) {
            break;
        }
        let mut assembler = Assembler::new(config);
        for block in &group {
            assembler.apply(block);
        }
        if assembler.recognized == 0 {
            stray.append(&mut assembler.diagnostics);
            continue;
        }
        let mut diagnostics = std::mem::take(&mut stray);
        diagnostics.append(&mut assembler.diagnostics);
        outcomes.push(assembler.finish(diagnostics));
    }

    let Some(last) = outcomes.last_mut() else {
        return Err(GenbankError::NoRecognizedBlocks);
    };
    last.diagnostics.append(&mut stray);

    for outcome in &mut outcomes {
        outcome.diagnostics.retain(|d| !config.ignores(d.code()));
        if config.mode == ErrorMode::Strict {
            if let Some(first) = outcome.diagnostics.first() {
                return Err(first.error.clone());
            }
        }
    }
    Ok(outcomes)
}

/// Builds one record from its blocks
struct Assembler<'c> {
    config: &'c ParseConfig,
    record: GenomeRecord,
    diagnostics: Vec<Diagnostic>,
    recognized: usize,
}

impl<'c> Assembler<'c> {
    fn new(config: &'c ParseConfig) -> Self {
        Self {
            config,
            record: GenomeRecord {
                cache_sequences: config.cache_sequences,
                ..Default::default()
            },
            diagnostics: Vec::new(),
            recognized: 0,
        }
    }

    fn report(&mut self, line: usize, context: String, error: GenbankError) {
        warn!("line {line}: skipping {context}: {error}");
        self.diagnostics.push(Diagnostic::new(line, context, error));
    }

    fn apply(&mut self, block: &Block<'_>) {
        let record = &mut self.record;
        match block.keyword {
            "LOCUS" => record.locus = Locus::parse(block.lines[0].1),
            "DEFINITION" => record.definition = Some(block.joined_text()),
            "ACCESSION" => {
                record.accession = block
                    .text_lines()
                    .flat_map(str::split_whitespace)
                    .map(str::to_string)
                    .collect()
            }
            "VERSION" => {
                let text = block.joined_text();
                record.version = (!text.is_empty()).then_some(text);
            }
            "DBLINK" => self.apply_dblink(block),
            "KEYWORDS" => record.keywords = parse_keywords(&block.joined_text()),
            "SOURCE" => apply_source(record, block),
            "REFERENCE" => match reference::parse_reference(block) {
                Ok(reference) => record.references.push(reference),
                Err(err) => self.report(block.line, "block REFERENCE".to_string(), err),
            },
            "COMMENT" => {
                record.comment = Some(block.text_lines().collect::<Vec<_>>().join("\n"))
            }
            "FEATURES" => {
                let features = feature::parse_features(block, &mut self.diagnostics);
                record.features.extend(features);
            }
            "ORIGIN" => {
                for &(_, line) in &block.lines[1..] {
                    record.sequence.extend(
                        line.chars()
                            .filter(|c| !c.is_ascii_digit() && !c.is_whitespace())
                            .map(|c| c.to_ascii_uppercase()),
                    );
                }
            }
            other => {
                self.report(
                    block.line,
                    format!("block {other}"),
                    GenbankError::UnrecognizedBlock {
                        keyword: other.to_string(),
                    },
                );
                return;
            }
        }
        self.recognized += 1;
    }

    fn apply_dblink(&mut self, block: &Block<'_>) {
        let mut last: Option<String> = None;
        for line in block.text_lines().filter(|l| !l.is_empty()) {
            match line.split_once(':') {
                Some((name, id)) => {
                    let name = name.trim().to_string();
                    self.record
                        .dblinks
                        .insert(name.clone(), id.trim().to_string());
                    last = Some(name);
                }
                None => match last.as_ref().and_then(|n| self.record.dblinks.get_mut(n)) {
                    Some(id) => {
                        id.push(' ');
                        id.push_str(line);
                    }
                    None => {
                        let err = GenbankError::MalformedBlock {
                            keyword: "DBLINK".to_string(),
                            reason: format!("expected 'name: id', found '{line}'"),
                        };
                        self.report(block.line, "block DBLINK".to_string(), err);
                    }
                },
            }
        }
    }

    fn finish(self, diagnostics: Vec<Diagnostic>) -> ParseOutcome {
        let record = &self.record;
        debug!(
            "parsed record {}: {} bp, {} features, {} references, {} diagnostics",
            record.locus.name.as_deref().unwrap_or("?"),
            record.sequence.len(),
            record.features.len(),
            record.references.len(),
            diagnostics.len()
        );
        if !self.config.cache_sequences {
            debug!("feature sequence caching disabled");
        }
        ParseOutcome::new(self.record, diagnostics)
    }
}

/// `KEYWORDS    a; b; c.`; a lone `.` means no keywords
///
/// Splits on `;` only, so multi-word keywords such as `complete genome`
/// stay whole.
fn parse_keywords(text: &str) -> Vec<String> {
    let text = text.trim();
    let text = text.strip_suffix('.').unwrap_or(text);
    text.split(';')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// SOURCE first line, then the indented ORGANISM name and lineage
fn apply_source(record: &mut GenomeRecord, block: &Block<'_>) {
    let header = block.header();
    record.source = (!header.is_empty()).then(|| header.to_string());

    let mut lineage: Vec<&str> = Vec::new();
    let mut in_organism = false;
    for &(_, line) in &block.lines[1..] {
        let trimmed = line.trim();
        if let Some(name) = trimmed.strip_prefix("ORGANISM") {
            record.organism = Some(name.trim().to_string());
            in_organism = true;
        } else if in_organism {
            lineage.push(trimmed);
        }
    }
    let lineage = lineage.join(" ");
    let lineage = lineage.trim().trim_end_matches('.');
    record.taxonomy = lineage
        .split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
}

/// Builder for parsing from a path or in-memory text
///
/// # Example
///
/// ```
/// use ferro_genbank::{ErrorMode, GenbankReader};
///
/// let text = "LOCUS       X 4 bp DNA\nORIGIN\n        1 acgt\n//\n";
/// let outcome = GenbankReader::new()
///     .text(text)
///     .cache_sequences(false)
///     .mode(ErrorMode::Strict)
///     .parse()
///     .unwrap();
/// assert_eq!(outcome.record.sequence(), "ACGT");
///
/// assert!(GenbankReader::new().parse().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GenbankReader {
    path: Option<PathBuf>,
    text: Option<String>,
    config: ParseConfig,
}

impl GenbankReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read from a file (`.gz` is decompressed)
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Parse text already in memory
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn cache_sequences(mut self, cache: bool) -> Self {
        self.config.cache_sequences = cache;
        self
    }

    pub fn mode(mut self, mode: ErrorMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Replace all parse options
    pub fn config(mut self, config: ParseConfig) -> Self {
        self.config = config;
        self
    }

    /// The single configured source
    ///
    /// Neither a path nor text is [`GenbankError::MissingSource`]; both is
    /// [`GenbankError::InvalidConfig`].
    pub fn source(&self) -> Result<GenbankSource, GenbankError> {
        match (&self.path, &self.text) {
            (Some(path), None) => Ok(GenbankSource::Path(path.clone())),
            (None, Some(text)) => Ok(GenbankSource::Text(text.clone())),
            (None, None) => Err(GenbankError::MissingSource {
                msg: "no path or text supplied".to_string(),
            }),
            (Some(_), Some(_)) => Err(GenbankError::InvalidConfig {
                msg: "path and text are mutually exclusive".to_string(),
            }),
        }
    }

    /// Parse the first record
    pub fn parse(self) -> Result<ParseOutcome, GenbankError> {
        let text = self.source()?.load()?;
        parse_str(&text, &self.config)
    }

    /// Parse every record
    pub fn parse_all(self) -> Result<Vec<ParseOutcome>, GenbankError> {
        let text = self.source()?.load()?;
        parse_all_str(&text, &self.config)
    }
}
