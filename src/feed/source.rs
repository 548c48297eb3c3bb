//! Trait and default implementation for per-keyword feed retrieval.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::feed::parser::parse_feed;
use crate::feed::query::{FeedLocale, search_url};
use crate::fetch::{HttpClient, fetch_bytes};
use crate::types::FeedEntry;

/// Abstraction over a news search provider.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Returns every entry the provider lists for `keyword`.
    async fn fetch(&self, keyword: &str) -> Result<Vec<FeedEntry>>;
}

/// Google News RSS search, one request per keyword.
pub struct GoogleNewsSource<C> {
    client: C,
    base_url: String,
    locale: FeedLocale,
}

impl<C: HttpClient> GoogleNewsSource<C> {
    pub fn new(client: C, base_url: impl Into<String>, locale: FeedLocale) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            locale,
        }
    }

    pub fn url_for(&self, keyword: &str) -> String {
        search_url(&self.base_url, keyword, &self.locale)
    }
}

#[async_trait]
impl<C: HttpClient> FeedSource for GoogleNewsSource<C> {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, keyword: &str) -> Result<Vec<FeedEntry>> {
        let url = self.url_for(keyword);
        let bytes = fetch_bytes(&self.client, &url).await?;
        debug!(bytes = bytes.len(), "Feed bytes received, parsing");

        let entries = parse_feed(&bytes)?;
        debug!(entry_count = entries.len(), "Feed parsed successfully");
        Ok(entries)
    }
}
