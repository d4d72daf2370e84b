//! REFERENCE block parser
//!
//! ```text
//! REFERENCE   1  (bases 1 to 4641652)
//!   AUTHORS   Riley,M., Abe,T., Arnaud,M.B., Berlyn,M.K. and Blattner,F.R.
//!   TITLE     Escherichia coli K-12: a cooperatively developed annotation
//!             snapshot--2005
//!   JOURNAL   Nucleic Acids Res. 34 (1), 1-9 (2006)
//!    PUBMED   16397293
//! ```
//!
//! A line whose first token is a known field keyword, written left of the
//! value column, starts a new field; every other line continues the
//! current one.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::coords::OneBasedInterval;
use crate::error::GenbankError;
use crate::genbank::parser::segment::Block;
use crate::genbank::reference::Reference;

static BASE_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(bases\s+(\d+)\s+to\s+(\d+)").expect("valid regex"));

/// Column where field values start
const VALUE_COLUMN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Authors,
    Consortium,
    Title,
    Journal,
    Pubmed,
    Remark,
}

impl Field {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "AUTHORS" => Some(Field::Authors),
            "CONSRTM" => Some(Field::Consortium),
            "TITLE" => Some(Field::Title),
            "JOURNAL" => Some(Field::Journal),
            "PUBMED" => Some(Field::Pubmed),
            "REMARK" => Some(Field::Remark),
            _ => None,
        }
    }
}

fn store(reference: &mut Reference, field: Field, buffer: &[&str]) {
    let value = buffer
        .iter()
        .copied()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let slot = match field {
        Field::Authors => &mut reference.authors,
        Field::Consortium => &mut reference.consortium,
        Field::Title => &mut reference.title,
        Field::Journal => &mut reference.journal,
        Field::Pubmed => &mut reference.pubmed,
        Field::Remark => &mut reference.remark,
    };
    *slot = Some(value);
}

/// Parse one REFERENCE block
pub(crate) fn parse_reference(block: &Block<'_>) -> Result<Reference, GenbankError> {
    let header = block.header();
    let number_token = header.split_whitespace().next().ok_or_else(|| {
        GenbankError::MalformedReference {
            reason: "missing reference number".to_string(),
        }
    })?;
    let number: u32 = number_token
        .parse()
        .map_err(|_| GenbankError::MalformedReference {
            reason: format!("invalid reference number '{number_token}'"),
        })?;

    let mut reference = Reference::new(number);
    reference.base_range = parse_base_range(header)?;

    let mut current: Option<(Field, Vec<&str>)> = None;
    for &(_, line) in block.lines.iter().skip(1) {
        let trimmed = line.trim();
        let indent = line.len() - line.trim_start().len();
        let keyword = trimmed.split_whitespace().next().unwrap_or_default();
        let is_keyword_line = indent < VALUE_COLUMN && keyword.chars().all(|c| c.is_ascii_uppercase());

        if is_keyword_line {
            if let Some((field, buffer)) = current.take() {
                store(&mut reference, field, &buffer);
            }
            match Field::from_keyword(keyword) {
                Some(field) => current = Some((field, vec![trimmed[keyword.len()..].trim()])),
                None => debug!("ignoring REFERENCE field {keyword}"),
            }
        } else if let Some((_, buffer)) = current.as_mut() {
            buffer.push(trimmed);
        }
    }
    if let Some((field, buffer)) = current {
        store(&mut reference, field, &buffer);
    }
    Ok(reference)
}

/// First `(bases X to Y)` range on the REFERENCE line, if any
fn parse_base_range(header: &str) -> Result<Option<OneBasedInterval>, GenbankError> {
    let Some(caps) = BASE_RANGE.captures(header) else {
        return Ok(None);
    };
    let bound = |i: usize| -> Result<u64, GenbankError> {
        caps[i].parse().map_err(|_| GenbankError::MalformedReference {
            reason: format!("base range endpoint '{}' out of range", &caps[i]),
        })
    };
    let (start, end) = (bound(1)?, bound(2)?);
    OneBasedInterval::try_new(start, end)
        .map(Some)
        .ok_or_else(|| GenbankError::MalformedReference {
            reason: format!("invalid base range {start} to {end}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genbank::parser::segment::segment;

    fn parse(text: &str) -> Result<Reference, GenbankError> {
        parse_reference(&segment(text)[0])
    }

    #[test]
    fn test_full_reference() {
        let r = parse(
            "\
REFERENCE   1  (bases 1 to 4641652)
  AUTHORS   Riley,M., Abe,T. and Arnaud,M.B.
  TITLE     Escherichia coli K-12: a cooperatively developed annotation
            snapshot--2005
  JOURNAL   Nucleic Acids Res. 34 (1), 1-9 (2006)
   PUBMED   16397293
  REMARK    Publication Status: Online-Only
",
        )
        .unwrap();
        assert_eq!(r.number, 1);
        assert_eq!(r.base_range.unwrap().to_string(), "1..4641652");
        assert_eq!(
            r.title.as_deref(),
            Some("Escherichia coli K-12: a cooperatively developed annotation snapshot--2005")
        );
        assert_eq!(r.journal.as_deref(), Some("Nucleic Acids Res. 34 (1), 1-9 (2006)"));
        assert_eq!(r.pubmed.as_deref(), Some("16397293"));
        assert_eq!(r.remark.as_deref(), Some("Publication Status: Online-Only"));
        assert!(r.consortium.is_none());
    }

    #[test]
    fn test_reference_without_range() {
        let r = parse(
            "\
REFERENCE   2
  CONSRTM   NCBI Genome Project
  TITLE     Direct Submission
",
        )
        .unwrap();
        assert_eq!(r.number, 2);
        assert!(r.base_range.is_none());
        assert_eq!(r.consortium.as_deref(), Some("NCBI Genome Project"));
        assert!(r.authors.is_none());
    }

    #[test]
    fn test_first_of_several_ranges() {
        let r = parse("REFERENCE   3  (bases 10 to 20; 40 to 50)\n").unwrap();
        assert_eq!(r.base_range.unwrap().to_string(), "10..20");
    }

    #[test]
    fn test_uppercase_continuation_stays_in_field() {
        let r = parse(
            "\
REFERENCE   1  (bases 1 to 10)
  TITLE     Sequence of the
            DNA POLYMERASE gene
",
        )
        .unwrap();
        assert_eq!(r.title.as_deref(), Some("Sequence of the DNA POLYMERASE gene"));
    }

    #[test]
    fn test_unknown_field_is_ignored() {
        let r = parse(
            "\
REFERENCE   1
  MEDLINE   12345
  TITLE     Kept
",
        )
        .unwrap();
        assert_eq!(r.title.as_deref(), Some("Kept"));
    }

    #[test]
    fn test_malformed_references() {
        assert!(matches!(
            parse("REFERENCE   one\n"),
            Err(GenbankError::MalformedReference { .. })
        ));
        assert!(matches!(
            parse("REFERENCE\n"),
            Err(GenbankError::MalformedReference { .. })
        ));
        assert!(matches!(
            parse("REFERENCE   1  (bases 20 to 10)\n"),
            Err(GenbankError::MalformedReference { .. })
        ));
    }
}
