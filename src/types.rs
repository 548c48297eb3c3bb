//! Record types that flow through the search pipeline.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;

/// Source name used when a feed entry carries no `<source>` element.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// A single parsed feed entry, before it is attributed to a keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub published_at: DateTime<Utc>,
    pub source: String,
}

impl FeedEntry {
    /// Calendar date of publication. Time of day is ignored by range filters.
    pub fn published_date(&self) -> NaiveDate {
        self.published_at.date_naive()
    }
}

/// A feed entry that passed filtering, tagged with the keyword whose query
/// surfaced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub published_at: DateTime<Utc>,
    pub source: String,
    pub keyword: String,
}

impl NewsItem {
    pub fn from_entry(entry: FeedEntry, keyword: &str) -> Self {
        Self {
            title: entry.title,
            link: entry.link,
            published_at: entry.published_at,
            source: entry.source,
            keyword: keyword.to_string(),
        }
    }

    pub fn published_date(&self) -> NaiveDate {
        self.published_at.date_naive()
    }
}

/// Discrete sentiment bucket.
///
/// Declaration order is the fixed presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
    Unknown,
}

impl SentimentLabel {
    /// Every label in presentation order.
    pub const ORDER: [SentimentLabel; 4] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
        SentimentLabel::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A [`NewsItem`] with its sentiment score and label attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredNewsItem {
    #[serde(flatten)]
    pub item: NewsItem,
    pub sentiment_score: Option<f64>,
    pub sentiment_label: SentimentLabel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_published_date_ignores_time_of_day() {
        let entry = FeedEntry {
            title: "t".into(),
            link: "l".into(),
            published_at: Utc.with_ymd_and_hms(2025, 10, 27, 23, 59, 59).unwrap(),
            source: UNKNOWN_SOURCE.into(),
        };
        assert_eq!(
            entry.published_date(),
            NaiveDate::from_ymd_opt(2025, 10, 27).unwrap()
        );
    }

    #[test]
    fn test_label_order_and_names() {
        let names: Vec<_> = SentimentLabel::ORDER.iter().map(|l| l.as_str()).collect();
        assert_eq!(names, ["positive", "neutral", "negative", "unknown"]);
        assert!(SentimentLabel::Positive < SentimentLabel::Unknown);
    }

    #[test]
    fn test_scored_item_serializes_flat() {
        let item = NewsItem {
            title: "台灣經濟成長".into(),
            link: "https://example.com/a".into(),
            published_at: Utc.with_ymd_and_hms(2025, 10, 27, 12, 0, 0).unwrap(),
            source: "中央社".into(),
            keyword: "台灣".into(),
        };
        let scored = ScoredNewsItem {
            item,
            sentiment_score: None,
            sentiment_label: SentimentLabel::Unknown,
        };
        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["title"], "台灣經濟成長");
        assert_eq!(json["sentiment_label"], "unknown");
        assert!(json["sentiment_score"].is_null());
    }
}
