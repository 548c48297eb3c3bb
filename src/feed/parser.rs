//! RSS parser for news search feeds.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::types::{FeedEntry, UNKNOWN_SOURCE};

/// Decodes an RSS 2.0 document into [`FeedEntry`] records, in document order.
///
/// Items missing a title, a link, or a parsable publish date are skipped.
///
/// # Errors
///
/// Returns an error if the bytes are not a well-formed RSS channel.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<FeedEntry>> {
    let channel = rss::Channel::read_from(bytes).context("failed to parse RSS channel")?;

    let entries = channel
        .items()
        .iter()
        .filter_map(|item| {
            let title = item.title()?.trim().to_string();
            let link = item.link()?.trim().to_string();

            let Some(published_at) = item.pub_date().and_then(parse_pub_date) else {
                debug!(title = %title, pub_date = ?item.pub_date(), "Skipping item without a usable date");
                return None;
            };

            let source = item
                .source()
                .and_then(|s| s.title())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(UNKNOWN_SOURCE)
                .to_string();

            Some(FeedEntry {
                title,
                link,
                published_at,
                source,
            })
        })
        .collect();

    Ok(entries)
}

/// Parses an RSS `pubDate`, accepting RFC 2822 and RFC 3339.
fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>"台灣" - Google News</title>
    <link>https://news.google.com</link>
    <description>Google News</description>
    <item>
      <title>台灣經濟成長 - 中央社</title>
      <link>https://news.google.com/articles/a</link>
      <pubDate>Mon, 27 Oct 2025 08:30:00 GMT</pubDate>
      <source url="https://www.cna.com.tw">中央社</source>
    </item>
    <item>
      <title>沒有來源的新聞</title>
      <link>https://news.google.com/articles/b</link>
      <pubDate>2025-10-26T01:02:03+08:00</pubDate>
    </item>
    <item>
      <title>沒有日期</title>
      <link>https://news.google.com/articles/c</link>
    </item>
    <item>
      <link>https://news.google.com/articles/d</link>
      <pubDate>Mon, 27 Oct 2025 08:30:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_sample_feed() {
        let entries = parse_feed(SAMPLE.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].title, "台灣經濟成長 - 中央社");
        assert_eq!(entries[0].source, "中央社");
        assert_eq!(
            entries[0].published_at,
            Utc.with_ymd_and_hms(2025, 10, 27, 8, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_missing_source_defaults_to_unknown() {
        let entries = parse_feed(SAMPLE.as_bytes()).unwrap();
        assert_eq!(entries[1].source, UNKNOWN_SOURCE);
        // RFC 3339 with offset is normalised to UTC
        assert_eq!(
            entries[1].published_at,
            Utc.with_ymd_and_hms(2025, 10, 25, 17, 2, 3).unwrap()
        );
    }

    #[test]
    fn test_parse_invalid_bytes() {
        let result = parse_feed(b"\xFF\xFE not xml");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_empty_channel() {
        let xml = r#"<rss version="2.0"><channel><title>t</title><link>l</link><description>d</description></channel></rss>"#;
        let entries = parse_feed(xml.as_bytes()).unwrap();
        assert!(entries.is_empty());
    }
}
