use crate::types::SentimentLabel;

/// Lower bound (inclusive) of the positive bucket.
pub const POSITIVE_THRESHOLD: f64 = 0.6;
/// Upper bound (inclusive) of the negative bucket.
pub const NEGATIVE_THRESHOLD: f64 = 0.4;

/// Converts a sentiment score (0.0–1.0) into a label.
///
/// | Score          | Label    |
/// |----------------|----------|
/// | absent         | unknown  |
/// | >= 0.6         | positive |
/// | <= 0.4         | negative |
/// | otherwise      | neutral  |
pub fn classify(score: Option<f64>) -> SentimentLabel {
    match score {
        None => SentimentLabel::Unknown,
        Some(s) if s >= POSITIVE_THRESHOLD => SentimentLabel::Positive,
        Some(s) if s <= NEGATIVE_THRESHOLD => SentimentLabel::Negative,
        Some(_) => SentimentLabel::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(Some(1.00)), SentimentLabel::Positive);
        assert_eq!(classify(Some(0.60)), SentimentLabel::Positive);
        assert_eq!(classify(Some(0.59)), SentimentLabel::Neutral);
        assert_eq!(classify(Some(0.50)), SentimentLabel::Neutral);
        assert_eq!(classify(Some(0.41)), SentimentLabel::Neutral);
        assert_eq!(classify(Some(0.40)), SentimentLabel::Negative);
        assert_eq!(classify(Some(0.00)), SentimentLabel::Negative);
        assert_eq!(classify(None), SentimentLabel::Unknown);
    }

    #[test]
    fn test_classify_is_monotonic() {
        // Rank by polarity: negative < neutral < positive.
        let rank = |l: SentimentLabel| match l {
            SentimentLabel::Negative => 0,
            SentimentLabel::Neutral => 1,
            SentimentLabel::Positive => 2,
            SentimentLabel::Unknown => unreachable!(),
        };

        let scores: Vec<f64> = (0..=100).map(|i| i as f64 / 100.0).collect();
        for pair in scores.windows(2) {
            assert!(rank(classify(Some(pair[0]))) <= rank(classify(Some(pair[1]))));
        }
    }
}
