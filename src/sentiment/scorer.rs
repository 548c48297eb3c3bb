use tracing::{info, warn};

use crate::config::Capabilities;
use crate::sentiment::classify::classify;
use crate::sentiment::model::{LexiconModel, SentimentModel};
use crate::types::{NewsItem, ScoredNewsItem, SentimentLabel};

/// Best-effort sentiment scoring over news titles.
///
/// When no model is configured every item is labelled
/// [`SentimentLabel::Unknown`] and no score is attached.
pub struct SentimentScorer {
    model: Option<Box<dyn SentimentModel>>,
}

impl SentimentScorer {
    /// Uses the built-in lexicon model if the sentiment capability is enabled.
    pub fn new(capabilities: &Capabilities) -> Self {
        if capabilities.sentiment {
            Self::with_model(LexiconModel::new())
        } else {
            info!("Sentiment analysis disabled, items will be labelled unknown");
            Self::unavailable()
        }
    }

    pub fn with_model(model: impl SentimentModel + 'static) -> Self {
        Self {
            model: Some(Box::new(model)),
        }
    }

    pub fn unavailable() -> Self {
        Self { model: None }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    /// Scores `text`, returning `None` when no model is configured or the
    /// model fails. Scores outside `[0, 1]` are clamped.
    pub fn score(&self, text: &str) -> Option<f64> {
        let model = self.model.as_ref()?;
        match model.score(text) {
            Ok(s) if s.is_nan() => {
                warn!(text, "Sentiment model returned NaN");
                None
            }
            Ok(s) => Some(s.clamp(0.0, 1.0)),
            Err(e) => {
                warn!(text, error = %e, "Sentiment scoring failed");
                None
            }
        }
    }

    /// Scores every item's title, preserving input order.
    pub fn analyze(&self, items: Vec<NewsItem>) -> Vec<ScoredNewsItem> {
        items
            .into_iter()
            .map(|item| {
                let sentiment_score = self.score(&item.title);
                ScoredNewsItem {
                    sentiment_label: classify(sentiment_score),
                    sentiment_score,
                    item,
                }
            })
            .collect()
    }
}
