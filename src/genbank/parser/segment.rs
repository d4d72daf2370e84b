//! Top-level block segmentation
//!
//! A GenBank file is a sequence of blocks: a line starting in column 0
//! opens a block, and every indented line after it belongs to that block.
//! Blank lines are ignored. `//` closes a record.

/// A line and its 1-based line number
pub(crate) type Line<'a> = (usize, &'a str);

/// A top-level block
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block<'a> {
    /// 1-based line number of the block's first line
    pub line: usize,
    /// First whitespace-delimited token of the first line
    pub keyword: &'a str,
    /// All lines of the block, first line included
    pub lines: Vec<Line<'a>>,
}

impl<'a> Block<'a> {
    /// First line with the keyword removed and whitespace trimmed
    pub fn header(&self) -> &'a str {
        self.lines
            .first()
            .map(|&(_, first)| first[self.keyword.len()..].trim())
            .unwrap_or("")
    }

    /// Header and continuation lines, each trimmed
    pub fn text_lines(&self) -> impl Iterator<Item = &'a str> + '_ {
        std::iter::once(self.header()).chain(self.lines.iter().skip(1).map(|&(_, l)| l.trim()))
    }

    /// Header and continuation lines joined by single spaces
    pub fn joined_text(&self) -> String {
        self.text_lines()
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_terminator(&self) -> bool {
        self.keyword == "//"
    }
}

/// Split text into top-level blocks
///
/// Indented lines before the first top-level line have no block to join
/// and are dropped.
pub(crate) fn segment(text: &str) -> Vec<Block<'_>> {
    let mut blocks: Vec<Block<'_>> = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        let number = i + 1;
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with(|c: char| !c.is_whitespace()) {
            let keyword = line.split_whitespace().next().unwrap_or_default();
            blocks.push(Block {
                line: number,
                keyword,
                lines: vec![(number, line)],
            });
        } else if let Some(block) = blocks.last_mut() {
            block.lines.push((number, line));
        }
    }
    blocks
}

/// Group blocks into records at `//` terminators
///
/// A final group without a terminator still forms a record. Terminators
/// themselves are not included.
pub(crate) fn split_records<'a>(blocks: Vec<Block<'a>>) -> Vec<Vec<Block<'a>>> {
    let mut records = Vec::new();
    let mut current = Vec::new();
    for block in blocks {
        if block.is_terminator() {
            if !current.is_empty() {
                records.push(std::mem::take(&mut current));
            }
        } else {
            current.push(block);
        }
    }
    if !current.is_empty() {
        records.push(current);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "\
LOCUS       TEST 12 bp DNA linear
DEFINITION  A test
            record.

ACCESSION   X1
ORIGIN
        1 acgtacgtac gt
//
";

    #[test]
    fn test_segment_blocks() {
        let blocks = segment(TEXT);
        let keywords: Vec<&str> = blocks.iter().map(|b| b.keyword).collect();
        assert_eq!(
            keywords,
            vec!["LOCUS", "DEFINITION", "ACCESSION", "ORIGIN", "//"]
        );
        assert_eq!(blocks[1].lines.len(), 2);
        assert_eq!(blocks[2].line, 5);
    }

    #[test]
    fn test_block_text() {
        let blocks = segment(TEXT);
        assert_eq!(blocks[1].header(), "A test");
        assert_eq!(blocks[1].joined_text(), "A test record.");
        assert_eq!(blocks[3].header(), "");
    }

    #[test]
    fn test_crlf_and_leading_indent() {
        let blocks = segment("   orphan\r\nLOCUS       A\r\n   more\r\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines, vec![(2, "LOCUS       A"), (3, "   more")]);
    }

    #[test]
    fn test_split_records() {
        let text = "LOCUS A\n//\nLOCUS B\nORIGIN\n//\n\nLOCUS C\n";
        let records = split_records(segment(text));
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].len(), 2);
        assert_eq!(records[2][0].header(), "C");
    }
}
