//! Count aggregation over scored news items, plus chart payloads.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::types::{ScoredNewsItem, SentimentLabel};

/// Per-request counts grouped by source, date and sentiment label.
///
/// Each grouping sums to the number of items it was built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateCounts {
    /// Descending by count; ties keep first-seen order.
    pub by_source: Vec<(String, usize)>,
    /// Ascending by date.
    pub by_date: Vec<(NaiveDate, usize)>,
    /// Fixed label order; labels with no items are omitted.
    pub by_sentiment: Vec<(SentimentLabel, usize)>,
}

impl AggregateCounts {
    pub fn from_items(items: &[ScoredNewsItem]) -> Self {
        let by_source = count_by_first_seen(items.iter().map(|s| s.item.source.as_str()))
            .into_iter()
            .map(|(source, n)| (source.to_string(), n))
            .collect();

        let mut dates: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for s in items {
            *dates.entry(s.item.published_date()).or_default() += 1;
        }

        let mut labels: HashMap<SentimentLabel, usize> = HashMap::new();
        for s in items {
            *labels.entry(s.sentiment_label).or_default() += 1;
        }
        let by_sentiment = SentimentLabel::ORDER
            .iter()
            .filter_map(|label| labels.get(label).map(|&n| (*label, n)))
            .collect();

        Self {
            by_source,
            by_date: dates.into_iter().collect(),
            by_sentiment,
        }
    }

    pub fn total(&self) -> usize {
        self.by_source.iter().map(|(_, n)| n).sum()
    }

    pub fn source_chart(&self) -> ChartData {
        ChartData::from_pairs(self.by_source.iter().map(|(s, n)| (s.clone(), *n)))
    }

    pub fn trend_chart(&self) -> ChartData {
        ChartData::from_pairs(
            self.by_date
                .iter()
                .map(|(d, n)| (d.format("%Y-%m-%d").to_string(), *n)),
        )
    }

    pub fn sentiment_chart(&self) -> ChartData {
        ChartData::from_pairs(self.by_sentiment.iter().map(|(l, n)| (l.to_string(), *n)))
    }
}

/// Labels and values ready for a bar, line or pie chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub data: Vec<usize>,
}

impl ChartData {
    fn from_pairs(pairs: impl Iterator<Item = (String, usize)>) -> Self {
        let (labels, data) = pairs.unzip();
        Self { labels, data }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Distinct source names in first-seen order.
pub fn distinct_sources(items: &[ScoredNewsItem]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for s in items {
        if !seen.contains(&s.item.source) {
            seen.push(s.item.source.clone());
        }
    }
    seen
}

/// Counts keys, sorted by descending count with first-seen order for ties.
fn count_by_first_seen<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for key in keys {
        match index.get(key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key, counts.len());
                counts.push((key, 1));
            }
        }
    }

    // stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
