//! Feature-table block parser
//!
//! ```text
//! FEATURES             Location/Qualifiers
//!      gene            complement(join(2691..4571,
//!                      4918..5163))
//!                      /gene="thrL"
//!                      /db_xref="GeneID:944742"
//!                      /db_xref="ASAP:ABE-0000006"
//! ```
//!
//! Lines indented at or below the first feature key start a new feature.
//! Within a feature, lines before the first `/qualifier` hold the location;
//! a line starting with `/` opens a new qualifier unless a quoted value is
//! still open.

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostic::Diagnostic;
use crate::error::GenbankError;
use crate::genbank::feature::{Feature, FeatureKind, Qualifiers};
use crate::genbank::parser::segment::{Block, Line};
use crate::location::parse_location;

/// The only qualifier whose wrapped lines are joined without spaces
const TRANSLATION: &str = "translation";

/// `/name=` or a bare `/flag`, used to recover qualifiers swallowed by an unclosed quote
static QUALIFIER_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/[A-Za-z_][A-Za-z0-9_]*(=|$)").expect("valid regex"));

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Split a FEATURES block body into per-feature line groups
pub(crate) fn split_features<'a>(block: &Block<'a>) -> Vec<Vec<Line<'a>>> {
    let body = block.lines.get(1..).unwrap_or(&[]);
    let Some(&(_, first)) = body.first() else {
        return Vec::new();
    };
    let key_indent = indent_of(first);

    let mut features: Vec<Vec<Line<'a>>> = Vec::new();
    for &(number, line) in body {
        if indent_of(line) <= key_indent || features.is_empty() {
            features.push(vec![(number, line)]);
        } else if let Some(current) = features.last_mut() {
            current.push((number, line));
        }
    }
    features
}

/// Parse every feature in a FEATURES block
///
/// Features whose location does not parse are dropped; each drop and each
/// skipped qualifier is pushed onto `diagnostics`.
pub(crate) fn parse_features(block: &Block<'_>, diagnostics: &mut Vec<Diagnostic>) -> Vec<Feature> {
    split_features(block)
        .iter()
        .filter_map(|lines| parse_feature(lines, diagnostics))
        .collect()
}

/// Qualifier text collected across lines
struct PendingQualifier<'a> {
    pieces: Vec<Line<'a>>,
}

impl<'a> PendingQualifier<'a> {
    fn line(&self) -> usize {
        self.pieces.first().map_or(0, |&(number, _)| number)
    }

    fn texts(&self) -> Vec<&'a str> {
        self.pieces.iter().map(|&(_, text)| text).collect()
    }

    fn quote_open(&self) -> bool {
        self.pieces
            .iter()
            .map(|(_, p)| p.matches('"').count())
            .sum::<usize>()
            % 2
            == 1
    }

    /// Split a value whose quote never closed at every line that looks
    /// like the start of another qualifier
    fn resplit(self) -> Vec<PendingQualifier<'a>> {
        let mut parts: Vec<PendingQualifier<'a>> = Vec::new();
        for piece in self.pieces {
            if parts.is_empty() || QUALIFIER_START.is_match(piece.1) {
                parts.push(PendingQualifier {
                    pieces: vec![piece],
                });
            } else if let Some(current) = parts.last_mut() {
                current.pieces.push(piece);
            }
        }
        parts
    }
}

/// Parse one feature's lines (key line first)
pub(crate) fn parse_feature(
    lines: &[Line<'_>],
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Feature> {
    let &(start_line, first) = lines.first()?;
    let first = first.trim();
    let key = first.split_whitespace().next()?;
    let kind = FeatureKind::from_key(key);

    let mut location_text = String::from(first[key.len()..].trim());
    let mut pending: Option<PendingQualifier<'_>> = None;
    let mut finished: Vec<PendingQualifier<'_>> = Vec::new();

    for &(number, raw) in &lines[1..] {
        let line = raw.trim();
        let continues_quote = pending.as_ref().is_some_and(PendingQualifier::quote_open);
        if line.starts_with('/') && !continues_quote {
            finished.extend(pending.take());
            pending = Some(PendingQualifier {
                pieces: vec![(number, line)],
            });
        } else if let Some(q) = pending.as_mut() {
            q.pieces.push((number, line));
        } else {
            location_text.push_str(line);
        }
    }
    match pending {
        Some(last) if last.quote_open() => finished.extend(last.resplit()),
        Some(last) => finished.push(last),
        None => {}
    }

    let compact: String = location_text.split_whitespace().collect();
    let location = match parse_location(&compact) {
        Ok(location) => location,
        Err(err) => {
            warn!("line {start_line}: dropping {key} feature: {err}");
            diagnostics.push(Diagnostic::new(start_line, format!("feature {key}"), err));
            return None;
        }
    };

    let mut qualifiers = Qualifiers::new();
    for q in finished {
        let built = if q.quote_open() {
            Err(GenbankError::UnterminatedQualifier {
                name: qualifier_name(q.texts().first().copied().unwrap_or_default()),
            })
        } else {
            build_qualifier(&q.texts())
        };
        match built {
            Ok((name, value)) => qualifiers.push(name, value),
            Err(err) => {
                warn!("line {}: skipping qualifier in {key} feature: {err}", q.line());
                diagnostics.push(Diagnostic::new(q.line(), format!("feature {key}"), err));
            }
        }
    }

    Some(Feature::new(kind, compact, location, qualifiers))
}

/// Turn `/name=value` text (possibly wrapped) into a name and clean value
fn build_qualifier(pieces: &[&str]) -> Result<(String, String), GenbankError> {
    let first = pieces.first().copied().unwrap_or_default();
    let Some((name, head)) = first.split_once('=') else {
        return Err(GenbankError::MalformedQualifier {
            name: qualifier_name(first),
            line: first.to_string(),
        });
    };
    let name = name.trim_start_matches('/').trim();
    let rest = pieces.iter().skip(1).copied();

    let joined = if name == TRANSLATION {
        std::iter::once(head)
            .chain(rest)
            .flat_map(str::split_whitespace)
            .collect::<String>()
    } else {
        std::iter::once(head.trim())
            .chain(rest)
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    };
    Ok((name.to_string(), unquote(&joined)))
}

fn qualifier_name(first: &str) -> String {
    let text = first.trim_start_matches('/');
    text.split('=').next().unwrap_or(text).trim().to_string()
}

/// Strip one pair of surrounding quotes and collapse `""` escapes
fn unquote(value: &str) -> String {
    let value = value.strip_prefix('"').unwrap_or(value);
    let value = value.strip_suffix('"').unwrap_or(value);
    value.replace("\"\"", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::genbank::parser::segment::segment;
    use crate::location::Location;

    fn features(text: &str) -> (Vec<Feature>, Vec<Diagnostic>) {
        let blocks = segment(text);
        let mut diagnostics = Vec::new();
        let features = parse_features(&blocks[0], &mut diagnostics);
        (features, diagnostics)
    }

    #[test]
    fn test_repeated_qualifiers_are_kept_in_order() {
        let (features, diags) = features(
            "\
FEATURES             Location/Qualifiers
     gene            190..255
                     /gene=\"thrL\"
                     /db_xref=\"ASAP:ABE-0000006\"
                     /db_xref=\"GeneID:944742\"
",
        );
        assert!(diags.is_empty());
        assert_eq!(features.len(), 1);
        assert_eq!(
            features[0].qualifier("db_xref"),
            ["ASAP:ABE-0000006", "GeneID:944742"]
        );
        assert_eq!(features[0].gene(), Some("thrL"));
    }

    #[test]
    fn test_wrapped_location_and_values() {
        let (features, _) = features(
            "\
FEATURES             Location/Qualifiers
     CDS             complement(join(2691..4571,
                     4918..5163))
                     /note=\"a long note that
                     wraps onto a second line\"
                     /translation=\"MKRISTTITT
                     TITITTGNGAG\"
",
        );
        let f = &features[0];
        assert_eq!(f.raw_location, "complement(join(2691..4571,4918..5163))");
        assert!(matches!(f.location, Location::Complement { .. }));
        assert_eq!(
            f.qualifiers.first("note"),
            Some("a long note that wraps onto a second line")
        );
        assert_eq!(f.translation(), Some("MKRISTTITTTITITTGNGAG"));
    }

    #[test]
    fn test_slash_inside_open_quote_is_continuation() {
        let (features, _) = features(
            "\
FEATURES             Location/Qualifiers
     misc_feature    1..10
                     /note=\"see
                     /path/to/thing\"
                     /gene=\"x\"
",
        );
        assert_eq!(
            features[0].qualifiers.first("note"),
            Some("see /path/to/thing")
        );
        assert_eq!(features[0].gene(), Some("x"));
    }

    #[test]
    fn test_unclosed_quote_does_not_swallow_later_qualifiers() {
        let (features, diags) = features(
            "\
FEATURES             Location/Qualifiers
     gene            1..9
                     /note=\"unterminated
                     /gene=\"abc\"
                     /locus_tag=\"b1\"
     gene            10..12
                     /gene=\"next\"
",
        );
        assert_eq!(features.len(), 2);
        assert!(!features[0].qualifiers.contains("note"));
        assert_eq!(features[0].gene(), Some("abc"));
        assert_eq!(features[0].locus_tag(), Some("b1"));
        assert_eq!(features[1].gene(), Some("next"));

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].line, 3);
        assert_eq!(diags[0].code(), ErrorCode::MalformedQualifier);
        assert_eq!(
            diags[0].error,
            GenbankError::UnterminatedQualifier {
                name: "note".to_string()
            }
        );
    }

    #[test]
    fn test_unclosed_quote_keeps_plain_slash_lines_in_value() {
        let (features, diags) = features(
            "\
FEATURES             Location/Qualifiers
     misc_feature    1..10
                     /note=\"see
                     /path/to/thing
                     /gene=\"x\"
",
        );
        // `/path/to/thing` is not a qualifier start, so it stays with the note
        assert!(!features[0].qualifiers.contains("path"));
        assert_eq!(features[0].gene(), Some("x"));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].line, 3);
    }

    #[test]
    fn test_malformed_qualifier_does_not_abort_feature() {
        let (features, diags) = features(
            "\
FEATURES             Location/Qualifiers
     gene            1..9
                     /gene=\"abc\"
                     /pseudo
                     /locus_tag=\"b0001\"
",
        );
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].gene(), Some("abc"));
        assert_eq!(features[0].locus_tag(), Some("b0001"));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code(), ErrorCode::MalformedQualifier);
        assert_eq!(diags[0].line, 4);
    }

    #[test]
    fn test_bad_location_drops_only_that_feature() {
        let (features, diags) = features(
            "\
FEATURES             Location/Qualifiers
     gene            20..10
                     /gene=\"bad\"
     gene            1..5
                     /gene=\"good\"
",
        );
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].gene(), Some("good"));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code(), ErrorCode::MalformedLocation);
        assert_eq!(diags[0].line, 2);
        assert_eq!(diags[0].context, "feature gene");
    }

    #[test]
    fn test_unquoted_and_escaped_values() {
        let (features, _) = features(
            "\
FEATURES             Location/Qualifiers
     CDS             1..9
                     /codon_start=1
                     /note=\"the \"\"best\"\" gene\"
",
        );
        assert_eq!(features[0].qualifiers.first("codon_start"), Some("1"));
        assert_eq!(
            features[0].qualifiers.first("note"),
            Some("the \"best\" gene")
        );
    }

    #[test]
    fn test_fuzzy_feature() {
        let (features, _) = features(
            "\
FEATURES             Location/Qualifiers
     source          <1..>100
",
        );
        assert!(features[0].fuzzy);
        assert_eq!(features[0].kind, FeatureKind::Source);
    }

    #[test]
    fn test_empty_features_block() {
        let (features, diags) = features("FEATURES             Location/Qualifiers\n");
        assert!(features.is_empty());
        assert!(diags.is_empty());
    }
}
