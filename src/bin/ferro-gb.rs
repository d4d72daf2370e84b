// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-gb CLI
//!
//! Command-line interface for inspecting GenBank flat files.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ferro_genbank::cli::{
    fasta_header, output_error, write_fasta, write_features, write_location, write_summary,
    FeatureSelector, OutputFormat, FASTA_LINE_WIDTH,
};
use ferro_genbank::{
    materialize, parse_location, ErrorMode, FerroConfig, GenbankReader, GenomeRecord,
    ParseConfig, ParseOutcome,
};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "ferro-gb")]
#[command(author, version, about = "GenBank flat-file inspector")]
#[command(
    long_about = "Parse GenBank flat files and extract feature sequences.

Examples:
  ferro-gb summary NC_000913.3.gb
  ferro-gb features NC_000913.3.gb --select type:CDS -q gene -q product
  ferro-gb extract NC_000913.3.gb.gz --select gene:thrL
  ferro-gb extract NC_000913.3.gb --location 'complement(join(1..10,20..30))'
  ferro-gb locate 'join(<1..100,J00194.1:1..50)' -f json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    parse: ParseArgs,

    /// Log level or filter directive (e.g. debug, ferro_genbank=trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

/// Options controlling how files are parsed
#[derive(Args)]
struct ParseArgs {
    /// Fail on the first recoverable problem instead of reporting it
    #[arg(long, global = true)]
    strict: bool,

    /// Re-evaluate feature sequences on every access
    #[arg(long, global = true)]
    no_cache: bool,

    /// Diagnostic codes to drop (e.g. E3001)
    #[arg(long, global = true, value_delimiter = ',')]
    ignore: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show record metadata, counts and diagnostics
    Summary {
        /// GenBank file (.gz allowed)
        input: PathBuf,

        /// Summarize every record instead of the first
        #[arg(long)]
        all: bool,

        /// Output format
        #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// List features with their locations and qualifiers
    Features {
        /// GenBank file (.gz allowed)
        input: PathBuf,

        /// Which features to list (index:N, gene:NAME, locus_tag:TAG, type:KEY or all)
        #[arg(short, long, default_value = "all")]
        select: String,

        /// Qualifiers to show (default: all)
        #[arg(short, long = "qualifier")]
        qualifiers: Vec<String>,

        /// Output format
        #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Write feature sequences as FASTA
    Extract {
        /// GenBank file (.gz allowed)
        input: PathBuf,

        /// Which features to extract (index:N, gene:NAME, locus_tag:TAG, type:KEY or all)
        #[arg(short, long, conflicts_with = "location")]
        select: Option<String>,

        /// Evaluate an ad-hoc location expression instead of features
        #[arg(short, long)]
        location: Option<String>,

        /// FASTA line width (0 for a single line)
        #[arg(short, long, default_value_t = FASTA_LINE_WIDTH)]
        width: usize,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a location expression and print its tree
    Locate {
        /// Location expression, e.g. complement(join(1..10,20..30))
        expression: String,

        /// Output format
        #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Summary { input, all, format } => {
            let config = build_parse_config(&cli.parse)?;
            run_summary(input, config, all, parse_format(&format))
        }
        Commands::Features {
            input,
            select,
            qualifiers,
            format,
        } => {
            let config = build_parse_config(&cli.parse)?;
            run_features(input, config, &select, &qualifiers, parse_format(&format))
        }
        Commands::Extract {
            input,
            select,
            location,
            width,
            output,
        } => {
            let config = build_parse_config(&cli.parse)?;
            run_extract(input, config, select.as_deref(), location.as_deref(), width, output)
        }
        Commands::Locate { expression, format } => run_locate(&expression, parse_format(&format)),
    }
}

fn parse_format(format: &str) -> OutputFormat {
    format.parse().unwrap_or_default()
}

/// Parse options from flags layered over any `.ferro.toml` settings
///
/// With neither, parsing is lenient with sequence caching on.
fn build_parse_config(args: &ParseArgs) -> Result<ParseConfig, Box<dyn std::error::Error>> {
    let cli_mode = args.strict.then_some(ErrorMode::Strict);
    let cli_cache = args.no_cache.then_some(false);
    let file_config = FerroConfig::load().unwrap_or_default();
    let config = file_config.merge_with_cli(cli_mode, cli_cache, &args.ignore)?;
    debug!(
        "parse config: mode={}, cache_sequences={}, ignored={}",
        config.mode,
        config.cache_sequences,
        config.ignore.len()
    );
    Ok(config)
}

fn read_first(input: PathBuf, config: ParseConfig) -> Result<ParseOutcome, Box<dyn std::error::Error>> {
    info!("reading {}", input.display());
    let outcome = GenbankReader::new().path(input).config(config).parse()?;
    if !outcome.is_clean() {
        info!("{} diagnostic(s) while parsing", outcome.diagnostics.len());
    }
    Ok(outcome)
}

fn run_summary(
    input: PathBuf,
    config: ParseConfig,
    all: bool,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let reader = GenbankReader::new().path(input).config(config);
    let outcomes = if all {
        reader.parse_all()?
    } else {
        vec![reader.parse()?]
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for (i, outcome) in outcomes.iter().enumerate() {
        if i > 0 && format == OutputFormat::Text {
            writeln!(out)?;
        }
        write_summary(&mut out, outcome, format)?;
    }
    out.flush()?;
    Ok(())
}

fn run_features(
    input: PathBuf,
    config: ParseConfig,
    select: &str,
    qualifiers: &[String],
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let selector: FeatureSelector = select.parse()?;
    let outcome = read_first(input, config)?;
    let features = selector.select(&outcome.record);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_features(&mut out, features, qualifiers, format)?;
    out.flush()?;
    Ok(())
}

fn run_extract(
    input: PathBuf,
    config: ParseConfig,
    select: Option<&str>,
    location: Option<&str>,
    width: usize,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = read_first(input, config)?;
    let record = &outcome.record;

    let mut out: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(std::fs::File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let failures = match location {
        Some(expression) => extract_location(&mut out, record, expression, width)?,
        None => {
            let selector: FeatureSelector = select.unwrap_or("all").parse()?;
            extract_features(&mut out, record, &selector, width)?
        }
    };
    out.flush()?;

    if failures > 0 {
        return Err(format!("{} sequence(s) could not be extracted", failures).into());
    }
    Ok(())
}

fn extract_location<W: Write>(
    out: &mut W,
    record: &GenomeRecord,
    expression: &str,
    width: usize,
) -> Result<usize, Box<dyn std::error::Error>> {
    let location = parse_location(expression)?;
    match materialize(&location, record) {
        Ok(sequence) => {
            let name = record.primary_accession().unwrap_or("record");
            write_fasta(out, &format!("{}:{}", name, location), &sequence, width)?;
            Ok(0)
        }
        Err(e) => {
            output_error(&mut io::stderr(), expression, &e, OutputFormat::Text)?;
            Ok(1)
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn extract_features<W: Write>(
    out: &mut W,
    record: &GenomeRecord,
    selector: &FeatureSelector,
    width: usize,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut failures = 0;
    for feature in selector.select(record) {
        match feature.sequence() {
            Ok(sequence) => write_fasta(out, &fasta_header(&feature), &sequence, width)?,
            Err(e) => {
                output_error(&mut io::stderr(), &fasta_header(&feature), &e, OutputFormat::Text)?;
                failures += 1;
            }
        }
    }
    Ok(failures)
}

#[cfg(feature = "parallel")]
fn extract_features<W: Write>(
    out: &mut W,
    record: &GenomeRecord,
    selector: &FeatureSelector,
    width: usize,
) -> Result<usize, Box<dyn std::error::Error>> {
    use ferro_genbank::parallel::materialize_selected;

    let results = materialize_selected(record, |f| selector.matches(f));
    let mut failures = 0;
    for (index, result) in results {
        let Some(feature) = record.feature(index) else {
            continue;
        };
        match result {
            Ok(sequence) => write_fasta(out, &fasta_header(&feature), &sequence, width)?,
            Err(e) => {
                output_error(&mut io::stderr(), &fasta_header(&feature), &e, OutputFormat::Text)?;
                failures += 1;
            }
        }
    }
    Ok(failures)
}

fn run_locate(expression: &str, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let location = parse_location(expression)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_location(&mut out, &location, format)?;
    if format == OutputFormat::Text {
        if let Some(bounds) = location.bounds() {
            writeln!(out, "bounds: {} ({} bp)", bounds, bounds.len())?;
        }
        let strand = if location.is_complement() { "-" } else { "+" };
        writeln!(out, "strand: {}", strand)?;
    }
    Ok(())
}

fn init_tracing(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter =
        EnvFilter::try_new(level).map_err(|e| format!("invalid --log-level '{level}': {e}"))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    debug!("Tracing initialized with level: {}", level);
    Ok(())
}
