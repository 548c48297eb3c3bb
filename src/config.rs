//! Runtime configuration loaded from the environment.
//!
//! Every setting has a default so the service starts with no `.env` file.
//! CLI flags override the port and output directory after loading.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::feed::{DEFAULT_BASE_URL, FeedLocale};

/// Optional features the pipeline may use.
///
/// Passed to component constructors so tests can pin either code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub sentiment: bool,
    pub word_cloud: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            sentiment: true,
            word_cloud: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub feed_base_url: String,
    pub locale: FeedLocale,
    pub fetch_timeout: Duration,
    pub capabilities: Capabilities,
    /// Font for word-cloud text; common CJK fonts are tried when unset.
    pub word_cloud_font: Option<PathBuf>,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("static"),
            feed_base_url: DEFAULT_BASE_URL.to_string(),
            locale: FeedLocale::default(),
            fetch_timeout: Duration::from_secs(30),
            capabilities: Capabilities::default(),
            word_cloud_font: None,
            port: 5000,
        }
    }
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let fetch_timeout = match get("NEWS_FETCH_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.parse()
                    .with_context(|| format!("NEWS_FETCH_TIMEOUT_SECS must be an integer, got '{v}'"))?,
            ),
            None => defaults.fetch_timeout,
        };

        let port = match get("SERVER_PORT") {
            Some(v) => v
                .parse()
                .with_context(|| format!("SERVER_PORT must be a port number, got '{v}'"))?,
            None => defaults.port,
        };

        let capabilities = Capabilities {
            sentiment: match get("NEWS_SENTIMENT_ENABLED") {
                Some(v) => parse_flag("NEWS_SENTIMENT_ENABLED", &v)?,
                None => defaults.capabilities.sentiment,
            },
            word_cloud: match get("NEWS_WORDCLOUD_ENABLED") {
                Some(v) => parse_flag("NEWS_WORDCLOUD_ENABLED", &v)?,
                None => defaults.capabilities.word_cloud,
            },
        };

        Ok(Self {
            output_dir: get("NEWS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            feed_base_url: get("NEWS_FEED_BASE_URL").unwrap_or(defaults.feed_base_url),
            locale: FeedLocale {
                hl: get("NEWS_FEED_HL").unwrap_or(defaults.locale.hl),
                gl: get("NEWS_FEED_GL").unwrap_or(defaults.locale.gl),
                ceid: get("NEWS_FEED_CEID").unwrap_or(defaults.locale.ceid),
            },
            fetch_timeout,
            capabilities,
            word_cloud_font: get("NEWS_WORDCLOUD_FONT").map(PathBuf::from),
            port,
        })
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("{key} must be a boolean, got '{value}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("static"));
        assert_eq!(config.feed_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.locale, FeedLocale::default());
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
        assert_eq!(config.capabilities, Capabilities::default());
        assert_eq!(config.word_cloud_font, None);
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("NEWS_OUTPUT_DIR", "/tmp/out"),
            ("NEWS_FEED_HL", "en-US"),
            ("NEWS_FETCH_TIMEOUT_SECS", "5"),
            ("NEWS_SENTIMENT_ENABLED", "off"),
            ("NEWS_WORDCLOUD_ENABLED", "0"),
            ("NEWS_WORDCLOUD_FONT", "/fonts/msjh.ttc"),
            ("SERVER_PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.locale.hl, "en-US");
        assert_eq!(config.locale.gl, "TW");
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert!(!config.capabilities.sentiment);
        assert!(!config.capabilities.word_cloud);
        assert_eq!(config.word_cloud_font, Some(PathBuf::from("/fonts/msjh.ttc")));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("NEWS_OUTPUT_DIR", "  "), ("SERVER_PORT", "")]).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("static"));
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config_from(&[("SERVER_PORT", "http")]).is_err());
        assert!(config_from(&[("NEWS_FETCH_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config_from(&[("NEWS_SENTIMENT_ENABLED", "maybe")]).is_err());
    }
}
