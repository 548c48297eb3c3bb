//! News feed retrieval: query URLs, RSS parsing and the provider seam.

pub mod parser;
pub mod query;
pub mod source;

pub use parser::parse_feed;
pub use query::{DEFAULT_BASE_URL, FeedLocale, search_url};
pub use source::{FeedSource, GoogleNewsSource};
