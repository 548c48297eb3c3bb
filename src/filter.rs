//! Date-range filtering and AND/OR combination of per-keyword results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{FeedEntry, NewsItem};

/// How results for several keywords are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicMode {
    /// Keep only items whose title contains every keyword.
    #[default]
    And,
    /// Keep everything any keyword query returned.
    Or,
}

impl LogicMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicMode::And => "AND",
            LogicMode::Or => "OR",
        }
    }
}

impl fmt::Display for LogicMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogicMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(LogicMode::And),
            "OR" => Ok(LogicMode::Or),
            other => Err(anyhow::anyhow!("unknown logic mode '{other}', expected AND or OR")),
        }
    }
}

/// Entries fetched for one keyword token.
#[derive(Debug, Clone)]
pub struct KeywordResults {
    pub keyword: String,
    pub entries: Vec<FeedEntry>,
}

/// True when the entry's publish date lies in `[start, end]`.
pub fn in_range(entry: &FeedEntry, start: NaiveDate, end: NaiveDate) -> bool {
    let date = entry.published_date();
    start <= date && date <= end
}

/// True when `title` contains every keyword as a case-sensitive substring.
pub fn title_matches_all(title: &str, keywords: &[String]) -> bool {
    keywords.iter().all(|kw| title.contains(kw.as_str()))
}

/// Range-filters every keyword's entries, unions them in keyword order, and
/// applies the logic mode.
///
/// Under [`LogicMode::And`] with two or more keywords the union is
/// post-filtered on title text, regardless of which query surfaced an entry.
/// With a single keyword both modes behave the same. Items are not
/// de-duplicated across keywords.
pub fn combine(
    results: Vec<KeywordResults>,
    start: NaiveDate,
    end: NaiveDate,
    logic: LogicMode,
) -> Vec<NewsItem> {
    let keywords: Vec<String> = results.iter().map(|r| r.keyword.clone()).collect();

    let union = results.into_iter().flat_map(|r| {
        let keyword = r.keyword;
        r.entries
            .into_iter()
            .filter(move |e| in_range(e, start, end))
            .map(move |e| NewsItem::from_entry(e, &keyword))
    });

    if logic == LogicMode::And && keywords.len() > 1 {
        union
            .filter(|item| title_matches_all(&item.title, &keywords))
            .collect()
    } else {
        union.collect()
    }
}
