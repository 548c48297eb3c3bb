//! Artifact naming and spreadsheet export.
//!
//! Every request writes its artifacts into a shared output directory under
//! timestamp-qualified names. Nothing here deletes old files.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::types::ScoredNewsItem;

pub const SPREADSHEET_PREFIX: &str = "news";
pub const SPREADSHEET_EXT: &str = "xlsx";
pub const WORDCLOUD_PREFIX: &str = "wordcloud";
pub const WORDCLOUD_EXT: &str = "png";

/// Where artifacts are written and how they are named.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
    timestamp_format: String,
}

impl ArtifactStore {
    pub const DEFAULT_TIMESTAMP_FORMAT: &'static str = "%Y%m%d_%H%M%S";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            timestamp_format: Self::DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }

    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the output directory if it is missing.
    pub fn ensure_root(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create output directory {}", self.root.display()))
    }

    /// `<prefix>_<timestamp>.<ext>`, e.g. `news_20251027_143000.xlsx`.
    pub fn file_name(&self, prefix: &str, ext: &str, now: DateTime<Local>) -> String {
        format!("{}_{}.{}", prefix, now.format(&self.timestamp_format), ext)
    }

    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Resolves a client-supplied name to a file directly inside the root.
    ///
    /// Returns `None` for anything that could escape it.
    pub fn resolve(&self, file_name: &str) -> Option<PathBuf> {
        let invalid = file_name.is_empty()
            || file_name == "."
            || file_name.contains("..")
            || file_name.contains(['/', '\\', '\0']);
        (!invalid).then(|| self.path_of(file_name))
    }
}

/// Column headers, in sheet order.
pub const SPREADSHEET_COLUMNS: [&str; 7] = [
    "title",
    "link",
    "published_at",
    "source",
    "keyword",
    "sentiment_score",
    "sentiment_label",
];

/// One spreadsheet row.
#[derive(Debug, PartialEq)]
struct SpreadsheetRow<'a> {
    title: &'a str,
    link: &'a str,
    published_at: String,
    source: &'a str,
    keyword: &'a str,
    sentiment_score: Option<f64>,
    sentiment_label: &'static str,
}

impl<'a> From<&'a ScoredNewsItem> for SpreadsheetRow<'a> {
    fn from(s: &'a ScoredNewsItem) -> Self {
        Self {
            title: &s.item.title,
            link: &s.item.link,
            published_at: s.item.published_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            source: &s.item.source,
            keyword: &s.item.keyword,
            sentiment_score: s.sentiment_score,
            sentiment_label: s.sentiment_label.as_str(),
        }
    }
}

impl SpreadsheetRow<'_> {
    fn write(&self, sheet: &mut Worksheet, row: u32) -> Result<(), XlsxError> {
        sheet.write_string(row, 0, self.title)?;
        sheet.write_string(row, 1, self.link)?;
        sheet.write_string(row, 2, &self.published_at)?;
        sheet.write_string(row, 3, self.source)?;
        sheet.write_string(row, 4, self.keyword)?;
        // a missing score stays a blank cell
        if let Some(score) = self.sentiment_score {
            sheet.write_number(row, 5, score)?;
        }
        sheet.write_string(row, 6, self.sentiment_label)?;
        Ok(())
    }
}

/// Writes `items` as an Excel workbook: one header row, then one row per item.
#[tracing::instrument(skip_all, fields(path = %path.display(), rows = items.len()))]
pub fn write_spreadsheet(path: &Path, items: &[ScoredNewsItem]) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("news")?;

    let header = Format::new().set_bold();
    for (col, name) in (0u16..).zip(SPREADSHEET_COLUMNS) {
        sheet.write_string_with_format(0, col, name, &header)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    sheet.set_column_width(0, 60.0)?;
    sheet.set_column_width(1, 40.0)?;
    sheet.set_column_width(2, 20.0)?;

    for (row, item) in (1u32..).zip(items) {
        SpreadsheetRow::from(item).write(sheet, row)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed to write spreadsheet {}", path.display()))?;

    debug!("Spreadsheet written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewsItem, SentimentLabel};
    use chrono::{TimeZone, Utc};
    use std::fs;

    fn scored(title: &str, score: Option<f64>, label: SentimentLabel) -> ScoredNewsItem {
        ScoredNewsItem {
            item: NewsItem {
                title: title.to_string(),
                link: "https://example.com/a,b".to_string(),
                published_at: Utc.with_ymd_and_hms(2025, 10, 27, 12, 0, 0).unwrap(),
                source: "中央社".to_string(),
                keyword: "台灣".to_string(),
            },
            sentiment_score: score,
            sentiment_label: label,
        }
    }

    #[test]
    fn test_file_name_uses_timestamp() {
        let store = ArtifactStore::new("static");
        let now = Local.with_ymd_and_hms(2025, 10, 27, 14, 30, 5).unwrap();
        assert_eq!(store.file_name("news", "xlsx", now), "news_20251027_143005.xlsx");
        assert_eq!(store.path_of("x.png"), PathBuf::from("static").join("x.png"));
    }

    #[test]
    fn test_custom_timestamp_format() {
        let store = ArtifactStore::new("out").with_timestamp_format("%Y%m%d");
        let now = Local.with_ymd_and_hms(2025, 10, 27, 14, 30, 5).unwrap();
        assert_eq!(store.file_name("wordcloud", "png", now), "wordcloud_20251027.png");
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let store = ArtifactStore::new("static");
        assert!(store.resolve("news_20251027_143005.xlsx").is_some());
        assert!(store.resolve("../secret").is_none());
        assert!(store.resolve("a/b.csv").is_none());
        assert!(store.resolve("a\\b.csv").is_none());
        assert!(store.resolve("..").is_none());
        assert!(store.resolve("").is_none());
    }

    #[test]
    fn test_ensure_root_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("a/b"));
        store.ensure_root().unwrap();
        assert!(store.root().is_dir());
    }

    #[test]
    fn test_row_cells_follow_item() {
        let item = scored("台灣經濟成長", Some(0.75), SentimentLabel::Positive);
        let row = SpreadsheetRow::from(&item);
        assert_eq!(
            row,
            SpreadsheetRow {
                title: "台灣經濟成長",
                link: "https://example.com/a,b",
                published_at: "2025-10-27 12:00:00".to_string(),
                source: "中央社",
                keyword: "台灣",
                sentiment_score: Some(0.75),
                sentiment_label: "positive",
            }
        );

        let item = scored("台灣治安良好", None, SentimentLabel::Unknown);
        let row = SpreadsheetRow::from(&item);
        assert_eq!(row.sentiment_score, None);
        assert_eq!(row.sentiment_label, "unknown");
    }

    #[test]
    fn test_spreadsheet_is_an_xlsx_package() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news.xlsx");
        let items = vec![
            scored("台灣經濟成長", Some(0.75), SentimentLabel::Positive),
            scored("台灣治安良好", None, SentimentLabel::Unknown),
        ];

        write_spreadsheet(&path, &items).unwrap();

        // xlsx is a zip container
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }

    #[test]
    fn test_empty_spreadsheet_is_still_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        write_spreadsheet(&path, &[]).unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }
}
