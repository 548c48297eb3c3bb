//! Maps a keyword token to a news-search RSS URL.

/// Google News RSS search endpoint.
pub const DEFAULT_BASE_URL: &str = "https://news.google.com/rss/search";

/// Locale parameters appended to every search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedLocale {
    /// Interface language, e.g. `zh-TW`.
    pub hl: String,
    /// Country, e.g. `TW`.
    pub gl: String,
    /// Edition id, e.g. `TW:zh-Hant`.
    pub ceid: String,
}

impl Default for FeedLocale {
    fn default() -> Self {
        Self {
            hl: "zh-TW".to_string(),
            gl: "TW".to_string(),
            ceid: "TW:zh-Hant".to_string(),
        }
    }
}

/// Builds the search URL for a single keyword.
pub fn search_url(base_url: &str, keyword: &str, locale: &FeedLocale) -> String {
    format!(
        "{}?q={}&hl={}&gl={}&ceid={}",
        base_url,
        urlencoding::encode(keyword),
        urlencoding::encode(&locale.hl),
        urlencoding::encode(&locale.gl),
        urlencoding::encode(&locale.ceid),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locale_url() {
        let url = search_url(DEFAULT_BASE_URL, "economy", &FeedLocale::default());
        assert_eq!(
            url,
            "https://news.google.com/rss/search?q=economy&hl=zh-TW&gl=TW&ceid=TW%3Azh-Hant"
        );
    }

    #[test]
    fn test_keyword_is_percent_encoded() {
        let url = search_url("http://localhost/rss", "台灣 & 經濟", &FeedLocale::default());
        assert!(url.starts_with("http://localhost/rss?q="));
        assert!(!url.contains(' '));
        assert!(url.contains("%E5%8F%B0%E7%81%A3"));
        assert!(url.contains("%26"));
    }

    #[test]
    fn test_custom_locale() {
        let locale = FeedLocale {
            hl: "en-US".into(),
            gl: "US".into(),
            ceid: "US:en".into(),
        };
        let url = search_url(DEFAULT_BASE_URL, "tsmc", &locale);
        assert!(url.ends_with("&hl=en-US&gl=US&ceid=US%3Aen"));
    }
}
