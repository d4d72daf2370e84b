//! Bibliographic references

use serde::Serialize;

use crate::coords::OneBasedInterval;

/// Base range from a `REFERENCE n (bases X to Y)` line, 1-based inclusive
pub type BaseRange = OneBasedInterval;

/// One REFERENCE block
///
/// Fields that did not appear in the block are `None`, never an empty
/// string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub number: u32,
    pub base_range: Option<BaseRange>,
    pub authors: Option<String>,
    pub consortium: Option<String>,
    pub title: Option<String>,
    pub journal: Option<String>,
    pub pubmed: Option<String>,
    pub remark: Option<String>,
}

impl Reference {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }

    /// Individual `Surname,Initials` names
    ///
    /// GenBank separates authors with `, ` and joins the last with ` and `.
    pub fn author_list(&self) -> Vec<&str> {
        self.authors
            .as_deref()
            .map(|authors| {
                authors
                    .split(", ")
                    .flat_map(|part| part.split(" and "))
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}
