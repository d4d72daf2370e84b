//! Parse options and configuration file support.
//!
//! [`ParseConfig`] holds the options recognized when a file is parsed.
//! [`GenbankSource`] is where the text comes from. Defaults can be set in a
//! `.ferro.toml` configuration file.
//!
//! # Example
//!
//! ```toml
//! [genbank]
//! cache-sequences = true
//! mode = "strict"
//! ignore = ["E3001"]
//! ```
//!
//! The first of `./.ferro.toml` and `~/.config/ferro/config.toml` that
//! exists and parses is used. Other sections of the file are skipped, and
//! flags given to `ferro-gb` override whatever it sets.

use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use crate::error::{ErrorCode, GenbankError};

/// How recoverable problems are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorMode {
    /// Skip what cannot be parsed and report it as a diagnostic.
    #[default]
    Lenient,

    /// Fail on the first diagnostic.
    Strict,
}

impl ErrorMode {
    /// Returns true if diagnostics become errors.
    pub fn is_strict(&self) -> bool {
        matches!(self, ErrorMode::Strict)
    }
}

impl fmt::Display for ErrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorMode::Lenient => "lenient",
            ErrorMode::Strict => "strict",
        })
    }
}

impl std::str::FromStr for ErrorMode {
    type Err = GenbankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(ErrorMode::Lenient),
            "strict" => Ok(ErrorMode::Strict),
            other => Err(GenbankError::InvalidConfig {
                msg: format!("unknown mode '{other}', expected 'lenient' or 'strict'"),
            }),
        }
    }
}

/// Options applied while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfig {
    /// Memoize feature sequences after first evaluation.
    pub cache_sequences: bool,
    /// Lenient or strict handling of recoverable problems.
    pub mode: ErrorMode,
    /// Diagnostic codes dropped without reporting.
    pub ignore: Vec<ErrorCode>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            cache_sequences: true,
            mode: ErrorMode::Lenient,
            ignore: Vec::new(),
        }
    }
}

impl ParseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            mode: ErrorMode::Strict,
            ..Self::default()
        }
    }

    pub fn with_cache_sequences(mut self, cache: bool) -> Self {
        self.cache_sequences = cache;
        self
    }

    pub fn with_mode(mut self, mode: ErrorMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_ignored(mut self, code: ErrorCode) -> Self {
        if !self.ignore.contains(&code) {
            self.ignore.push(code);
        }
        self
    }

    /// Whether diagnostics with this code are dropped
    pub fn ignores(&self, code: ErrorCode) -> bool {
        self.ignore.contains(&code)
    }
}

/// Where GenBank text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenbankSource {
    /// A file on disk; `.gz` files are decompressed.
    Path(PathBuf),
    /// Text already in memory.
    Text(String),
}

impl GenbankSource {
    /// Read the whole source into memory
    ///
    /// An unreadable path is reported as [`GenbankError::MissingSource`].
    pub fn load(&self) -> Result<String, GenbankError> {
        match self {
            GenbankSource::Text(text) => Ok(text.clone()),
            GenbankSource::Path(path) => read_path(path).map_err(|e| GenbankError::MissingSource {
                msg: format!("cannot read {}: {}", path.display(), e),
            }),
        }
    }
}

fn read_path(path: &Path) -> std::io::Result<String> {
    let is_gzip = path.extension().is_some_and(|ext| ext == "gz");
    if is_gzip {
        let mut text = String::new();
        MultiGzDecoder::new(File::open(path)?).read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(path)
    }
}

/// Settings read from a `.ferro.toml` file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FerroConfig {
    /// `[genbank]` section.
    pub genbank: GenbankSection,
}

/// `[genbank]` section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenbankSection {
    pub cache_sequences: Option<bool>,
    pub mode: Option<String>,
    /// Diagnostic codes to drop.
    pub ignore: Vec<String>,
}

impl FerroConfig {
    /// First readable config file, if any
    pub fn load() -> Option<Self> {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        let candidates = std::iter::once(PathBuf::from(".ferro.toml"))
            .chain(home.map(|h| h.join(".config").join("ferro").join("config.toml")));
        candidates
            .filter(|path| path.is_file())
            .find_map(|path| Self::load_from_path(&path).ok())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, GenbankError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Read the `[genbank]` section
    ///
    /// Only flat `key = value` lines are understood; unknown keys are skipped.
    pub fn parse(content: &str) -> Result<Self, GenbankError> {
        let mut config = FerroConfig::default();
        let mut in_genbank = false;

        for line in content.lines() {
            let line = strip_comment(line).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                in_genbank = &line[1..line.len() - 1] == "genbank";
                continue;
            }

            if !in_genbank {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(GenbankError::InvalidConfig {
                    msg: format!("expected 'key = value', found '{line}'"),
                });
            };
            let value = value.trim();
            match key.trim() {
                "cache-sequences" => {
                    config.genbank.cache_sequences = Some(match value {
                        "true" => true,
                        "false" => false,
                        other => {
                            return Err(GenbankError::InvalidConfig {
                                msg: format!("cache-sequences must be true or false, found '{other}'"),
                            })
                        }
                    })
                }
                "mode" => config.genbank.mode = Some(unquote(value).to_string()),
                "ignore" => config.genbank.ignore = parse_string_array(value),
                _ => {}
            }
        }

        Ok(config)
    }

    /// Convert this config to parse options.
    pub fn to_parse_config(&self) -> Result<ParseConfig, GenbankError> {
        self.merge_with_cli(None, None, &[])
    }

    /// Combine file settings with command-line flags; flags win
    pub fn merge_with_cli(
        &self,
        cli_mode: Option<ErrorMode>,
        cli_cache: Option<bool>,
        cli_ignore: &[String],
    ) -> Result<ParseConfig, GenbankError> {
        let mut config = ParseConfig::default();

        if let Some(cache) = cli_cache.or(self.genbank.cache_sequences) {
            config.cache_sequences = cache;
        }

        config.mode = match (cli_mode, self.genbank.mode.as_deref()) {
            (Some(mode), _) => mode,
            (None, Some(mode)) => mode.parse()?,
            (None, None) => ErrorMode::default(),
        };

        for code in self.genbank.ignore.iter().chain(cli_ignore) {
            let parsed = ErrorCode::from_code_str(code).ok_or_else(|| GenbankError::InvalidConfig {
                msg: format!("unknown error code '{code}'"),
            })?;
            config = config.with_ignored(parsed);
        }

        Ok(config)
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

fn unquote(value: &str) -> &str {
    value.trim_matches('"').trim_matches('\'')
}

/// Parse a TOML array of strings like `["E3001", "E3002"]`.
fn parse_string_array(value: &str) -> Vec<String> {
    let value = value.trim();
    if !value.starts_with('[') || !value.ends_with(']') {
        return Vec::new();
    }

    let inner = &value[1..value.len() - 1];
    inner
        .split(',')
        .map(|s| unquote(s.trim()).to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_config_defaults() {
        let config = ParseConfig::default();
        assert!(config.cache_sequences);
        assert_eq!(config.mode, ErrorMode::Lenient);
        assert!(config.ignore.is_empty());
    }

    #[test]
    fn test_error_mode_from_str() {
        assert_eq!("Strict".parse::<ErrorMode>().unwrap(), ErrorMode::Strict);
        assert_eq!("lenient".parse::<ErrorMode>().unwrap(), ErrorMode::Lenient);
        assert!("silent".parse::<ErrorMode>().is_err());
        assert_eq!(ErrorMode::Strict.to_string(), "strict");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = FerroConfig::parse("").unwrap();
        assert_eq!(config, FerroConfig::default());
    }

    #[test]
    fn test_parse_genbank_section() {
        let content = r#"
# shared toolkit config
[error-handling]
mode = "silent"

[genbank]
cache-sequences = false  # memory is tight
mode = "strict"
ignore = ["E3001", "e3002"]
"#;
        let config = FerroConfig::parse(content).unwrap();
        assert_eq!(config.genbank.cache_sequences, Some(false));
        assert_eq!(config.genbank.mode.as_deref(), Some("strict"));

        let parse = config.to_parse_config().unwrap();
        assert!(!parse.cache_sequences);
        assert!(parse.mode.is_strict());
        assert!(parse.ignores(ErrorCode::UnrecognizedBlock));
        assert!(parse.ignores(ErrorCode::MalformedQualifier));
    }

    #[test]
    fn test_invalid_values() {
        assert!(FerroConfig::parse("[genbank]\ncache-sequences = maybe\n").is_err());
        assert!(FerroConfig::parse("[genbank]\nmode\n").is_err());
        let config = FerroConfig::parse("[genbank]\nmode = \"loose\"\n").unwrap();
        assert!(matches!(
            config.to_parse_config(),
            Err(GenbankError::InvalidConfig { .. })
        ));
        let config = FerroConfig::parse("[genbank]\nignore = [\"X1\"]\n").unwrap();
        assert!(config.to_parse_config().is_err());
    }

    #[test]
    fn test_merge_with_cli() {
        let config = FerroConfig::parse("[genbank]\nmode = \"strict\"\ncache-sequences = false\n").unwrap();

        let merged = config
            .merge_with_cli(Some(ErrorMode::Lenient), None, &[])
            .unwrap();
        assert_eq!(merged.mode, ErrorMode::Lenient);
        assert!(!merged.cache_sequences);

        let merged = config
            .merge_with_cli(None, Some(true), &["E3005".to_string()])
            .unwrap();
        assert_eq!(merged.mode, ErrorMode::Strict);
        assert!(merged.cache_sequences);
        assert!(merged.ignores(ErrorCode::NoRecognizedBlocks));
    }

    #[test]
    fn test_parse_string_array() {
        assert_eq!(
            parse_string_array(r#"["E1001", "E2001"]"#),
            vec!["E1001", "E2001"]
        );
        assert!(parse_string_array("").is_empty());
        assert!(parse_string_array("not an array").is_empty());
    }

    #[test]
    fn test_source_text_and_missing_path() {
        let text = GenbankSource::Text("LOCUS X".to_string());
        assert_eq!(text.load().unwrap(), "LOCUS X");

        let missing = GenbankSource::Path(PathBuf::from("/nonexistent/file.gb"));
        assert!(matches!(
            missing.load(),
            Err(GenbankError::MissingSource { .. })
        ));
    }

    #[test]
    fn test_source_gzip_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.gb.gz");
        let file = File::create(&path).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        encoder.write_all(b"LOCUS       GZ\n").unwrap();
        encoder.finish().unwrap();

        let loaded = GenbankSource::Path(path).load().unwrap();
        assert_eq!(loaded, "LOCUS       GZ\n");
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".ferro.toml");
        fs::write(&path, "[genbank]\nmode = \"strict\"\n").unwrap();
        let config = FerroConfig::load_from_path(&path).unwrap();
        assert_eq!(config.genbank.mode.as_deref(), Some("strict"));
    }
}
