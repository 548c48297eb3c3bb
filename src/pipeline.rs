//! End-to-end search: keywords in, scored and aggregated news out.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::aggregate::{AggregateCounts, distinct_sources};
use crate::config::AppConfig;
use crate::error::ValidationError;
use crate::feed::{FeedSource, GoogleNewsSource};
use crate::fetch::BasicClient;
use crate::filter::{KeywordResults, LogicMode, combine};
use crate::keywords::parse_keywords;
use crate::output::{
    ArtifactStore, SPREADSHEET_EXT, SPREADSHEET_PREFIX, WORDCLOUD_EXT, WORDCLOUD_PREFIX,
    write_spreadsheet,
};
use crate::sentiment::SentimentScorer;
use crate::types::ScoredNewsItem;
use crate::wordcloud::{WeightedTerm, WordCloudRenderer, top_terms};

/// A validated search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub keyword: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub logic: LogicMode,
}

impl SearchRequest {
    /// Validates raw form values.
    ///
    /// A missing or blank logic value defaults to [`LogicMode::And`].
    pub fn parse(
        keyword: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
        logic: Option<&str>,
    ) -> Result<Self, ValidationError> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|v| !v.is_empty())
        }

        let (Some(keyword), Some(start), Some(end)) =
            (present(keyword), present(start_date), present(end_date))
        else {
            return Err(ValidationError::MissingFields);
        };

        let parse_date = |raw: &str| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
        };
        let start_date = parse_date(start)?;
        let end_date = parse_date(end)?;
        if start_date > end_date {
            return Err(ValidationError::InvertedRange);
        }

        let logic = match present(logic) {
            Some(raw) => raw
                .parse()
                .map_err(|_| ValidationError::InvalidLogic(raw.to_string()))?,
            None => LogicMode::default(),
        };

        Ok(Self {
            keyword: keyword.to_string(),
            start_date,
            end_date,
            logic,
        })
    }
}

/// Everything the results page and CLI summary need.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub request: SearchRequest,
    pub keywords: Vec<String>,
    pub items: Vec<ScoredNewsItem>,
    pub counts: AggregateCounts,
    pub sources: Vec<String>,
    pub terms: Vec<WeightedTerm>,
    pub word_cloud_file: Option<String>,
    pub spreadsheet_file: Option<String>,
}

impl SearchReport {
    fn empty(request: SearchRequest, keywords: Vec<String>) -> Self {
        Self {
            request,
            keywords,
            items: Vec::new(),
            counts: AggregateCounts::default(),
            sources: Vec::new(),
            terms: Vec::new(),
            word_cloud_file: None,
            spreadsheet_file: None,
        }
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }
}

/// Wires the feed source, scorer, word-cloud renderer and artifact store.
pub struct Pipeline {
    source: Box<dyn FeedSource>,
    scorer: SentimentScorer,
    word_cloud: WordCloudRenderer,
    store: ArtifactStore,
}

impl Pipeline {
    pub fn new(
        source: impl FeedSource + 'static,
        scorer: SentimentScorer,
        word_cloud: WordCloudRenderer,
        store: ArtifactStore,
    ) -> Self {
        Self {
            source: Box::new(source),
            scorer,
            word_cloud,
            store,
        }
    }

    /// Production wiring: Google News over HTTP, components gated by the
    /// configured capabilities.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let client = BasicClient::new(config.fetch_timeout)?;
        let source = GoogleNewsSource::new(client, &config.feed_base_url, config.locale.clone());

        Ok(Self::new(
            source,
            SentimentScorer::new(&config.capabilities),
            WordCloudRenderer::new(&config.capabilities)
                .with_installed_font(config.word_cloud_font.as_deref()),
            ArtifactStore::new(config.output_dir.clone()),
        ))
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Runs one search start to finish.
    ///
    /// Keyword feeds are fetched one at a time; a keyword whose fetch fails
    /// contributes no entries. Artifact failures are logged and the artifact
    /// is left out of the report.
    #[tracing::instrument(skip_all, fields(keyword = %request.keyword, logic = %request.logic))]
    pub async fn run(&self, request: &SearchRequest) -> SearchReport {
        let keywords = parse_keywords(&request.keyword);
        if keywords.is_empty() {
            info!("No keyword tokens, nothing to fetch");
            return SearchReport::empty(request.clone(), keywords);
        }

        let mut results = Vec::with_capacity(keywords.len());
        for keyword in &keywords {
            match self.source.fetch(keyword).await {
                Ok(entries) => {
                    info!(keyword = %keyword, entry_count = entries.len(), "Feed fetched");
                    results.push(KeywordResults {
                        keyword: keyword.clone(),
                        entries,
                    });
                }
                Err(e) => {
                    error!(keyword = %keyword, error = %e, "Feed fetch failed, skipping keyword");
                    results.push(KeywordResults {
                        keyword: keyword.clone(),
                        entries: Vec::new(),
                    });
                }
            }
        }

        let items = combine(results, request.start_date, request.end_date, request.logic);
        if items.is_empty() {
            info!("No news matched the search");
            return SearchReport::empty(request.clone(), keywords);
        }

        let items = self.scorer.analyze(items);
        let counts = AggregateCounts::from_items(&items);
        info!(
            total = items.len(),
            sentiment = ?counts.by_sentiment,
            "Search complete"
        );

        let titles: Vec<&str> = items.iter().map(|s| s.item.title.as_str()).collect();
        let terms = top_terms(&titles, self.word_cloud.max_words);

        let now = Local::now();
        let word_cloud_file = self.write_word_cloud(
            &terms,
            &self.store.file_name(WORDCLOUD_PREFIX, WORDCLOUD_EXT, now),
        );
        let spreadsheet_file = self.write_spreadsheet(
            &items,
            &self.store.file_name(SPREADSHEET_PREFIX, SPREADSHEET_EXT, now),
        );

        SearchReport {
            request: request.clone(),
            keywords,
            sources: distinct_sources(&items),
            counts,
            items,
            terms,
            word_cloud_file,
            spreadsheet_file,
        }
    }

    fn write_word_cloud(&self, terms: &[WeightedTerm], file_name: &str) -> Option<String> {
        if !self.word_cloud.is_available() {
            return None;
        }
        if terms.is_empty() {
            warn!("No usable terms for a word cloud");
            return None;
        }

        let result = self
            .store
            .ensure_root()
            .and_then(|_| self.word_cloud.render(terms, &self.store.path_of(file_name)));
        match result {
            Ok(()) => Some(file_name.to_string()),
            Err(e) => {
                error!(error = %e, "Word cloud generation failed");
                None
            }
        }
    }

    fn write_spreadsheet(&self, items: &[ScoredNewsItem], file_name: &str) -> Option<String> {
        let result = self
            .store
            .ensure_root()
            .and_then(|_| write_spreadsheet(&self.store.path_of(file_name), items));
        match result {
            Ok(()) => Some(file_name.to_string()),
            Err(e) => {
                error!(error = %e, "Spreadsheet export failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_valid_request() {
        let req = SearchRequest::parse(Some(" 台灣,經濟 "), Some("2025-10-01"), Some("2025-10-31"), Some("or"))
            .unwrap();
        assert_eq!(req.keyword, "台灣,經濟");
        assert_eq!(req.start_date, date(2025, 10, 1));
        assert_eq!(req.end_date, date(2025, 10, 31));
        assert_eq!(req.logic, LogicMode::Or);
    }

    #[test]
    fn test_parse_defaults_logic_to_and() {
        let req = SearchRequest::parse(Some("a"), Some("2025-10-01"), Some("2025-10-01"), None).unwrap();
        assert_eq!(req.logic, LogicMode::And);
        let req = SearchRequest::parse(Some("a"), Some("2025-10-01"), Some("2025-10-01"), Some("")).unwrap();
        assert_eq!(req.logic, LogicMode::And);
    }

    #[test]
    fn test_parse_missing_fields() {
        assert_eq!(
            SearchRequest::parse(None, Some("2025-10-01"), Some("2025-10-31"), None),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            SearchRequest::parse(Some("   "), Some("2025-10-01"), Some("2025-10-31"), None),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            SearchRequest::parse(Some("a"), Some("2025-10-01"), None, None),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn test_parse_bad_date() {
        assert_eq!(
            SearchRequest::parse(Some("a"), Some("2025/10/01"), Some("2025-10-31"), None),
            Err(ValidationError::InvalidDate("2025/10/01".to_string()))
        );
        assert_eq!(
            SearchRequest::parse(Some("a"), Some("2025-10-01"), Some("2025-02-30"), None),
            Err(ValidationError::InvalidDate("2025-02-30".to_string()))
        );
    }

    #[test]
    fn test_parse_inverted_range() {
        assert_eq!(
            SearchRequest::parse(Some("a"), Some("2025-10-31"), Some("2025-10-01"), None),
            Err(ValidationError::InvertedRange)
        );
    }

    #[test]
    fn test_from_config_builds_without_network() {
        let config = AppConfig {
            output_dir: "scratch".into(),
            ..AppConfig::default()
        };
        let pipeline = Pipeline::from_config(&config).unwrap();
        assert_eq!(pipeline.store().root(), std::path::Path::new("scratch"));
    }

    #[test]
    fn test_parse_unknown_logic() {
        assert_eq!(
            SearchRequest::parse(Some("a"), Some("2025-10-01"), Some("2025-10-31"), Some("XOR")),
            Err(ValidationError::InvalidLogic("XOR".to_string()))
        );
    }
}
