//! Title sentiment scoring and bucketing.
//!
//! A [`SentimentModel`] produces a polarity score in `[0, 1]`, [`classify`]
//! buckets it into a [`SentimentLabel`](crate::types::SentimentLabel), and
//! [`SentimentScorer`] applies both to a batch of news items without ever
//! failing the batch.

pub mod classify;
pub mod model;
pub mod scorer;

pub use classify::classify;
pub use model::{LexiconModel, SentimentModel};
pub use scorer::SentimentScorer;
