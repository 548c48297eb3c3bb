//! Sentiment models that turn free text into a polarity score.

use anyhow::Result;

/// Maps text to a score in `[0, 1]`; near 1 is positive, near 0 negative.
pub trait SentimentModel: Send + Sync {
    fn score(&self, text: &str) -> Result<f64>;
}

/// Positive cue words for Traditional Chinese business and general news.
static POSITIVE_ZH: &[&str] = &[
    "成長", "成功", "看好", "上漲", "大漲", "創新高", "獲利", "利多", "提升", "突破",
    "樂觀", "良好", "穩定", "強勁", "復甦", "改善", "受惠", "優異", "佳績", "勝利",
    "圓滿", "亮眼", "回升", "熱銷", "獲獎", "雙贏", "增長", "擴大", "順利", "肯定",
];

/// Negative cue words for Traditional Chinese business and general news.
static NEGATIVE_ZH: &[&str] = &[
    "下跌", "大跌", "暴跌", "虧損", "損失", "衰退", "裁員", "不滿", "危機", "利空",
    "下滑", "崩盤", "慘重", "悲觀", "疲弱", "警告", "爭議", "事故", "倒閉", "違規",
    "詐騙", "抗議", "衝突", "跌破", "停工", "罰款", "失敗", "重挫", "擔憂", "惡化",
];

/// English cue stems, matched against the start of lower-cased words.
static POSITIVE_EN: &[&str] = &[
    "growth", "gain", "surge", "soar", "record", "profit", "beat", "strong", "upgrade",
    "optimis", "success", "rally", "recover", "boost",
];

static NEGATIVE_EN: &[&str] = &[
    "fall", "drop", "plunge", "loss", "crash", "decline", "layoff", "warn", "weak",
    "downgrade", "lawsuit", "crisis", "slump", "fraud",
];

/// Dictionary model: counts positive and negative cues and smooths the ratio.
///
/// The score is `(pos + 1) / (pos + neg + 2)`, so text without any cue sits at
/// exactly 0.5 and a single cue moves it to 2/3 or 1/3.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconModel;

impl LexiconModel {
    pub fn new() -> Self {
        Self
    }

    /// Returns `(positive, negative)` cue counts for `text`.
    pub fn cue_counts(&self, text: &str) -> (usize, usize) {
        let count_zh = |cues: &[&str]| -> usize { cues.iter().map(|c| text.matches(*c).count()).sum() };

        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let count_en = |stems: &[&str]| -> usize {
            words
                .iter()
                .filter(|w| stems.iter().any(|s| w.starts_with(s)))
                .count()
        };

        (
            count_zh(POSITIVE_ZH) + count_en(POSITIVE_EN),
            count_zh(NEGATIVE_ZH) + count_en(NEGATIVE_EN),
        )
    }
}

impl SentimentModel for LexiconModel {
    fn score(&self, text: &str) -> Result<f64> {
        let (pos, neg) = self.cue_counts(text);
        Ok((pos as f64 + 1.0) / ((pos + neg) as f64 + 2.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::classify;
    use crate::types::SentimentLabel;

    fn label(text: &str) -> SentimentLabel {
        classify(Some(LexiconModel::new().score(text).unwrap()))
    }

    #[test]
    fn test_score_stays_in_unit_interval() {
        let model = LexiconModel::new();
        for text in ["", "成長成長成長成長成長", "大跌大跌大跌大跌", "plain text"] {
            let s = model.score(text).unwrap();
            assert!((0.0..=1.0).contains(&s), "{text}: {s}");
        }
    }

    #[test]
    fn test_no_cues_is_exactly_neutral() {
        assert_eq!(LexiconModel::new().score("今天天氣不錯").unwrap(), 0.5);
    }

    #[test]
    fn test_news_headlines() {
        assert_eq!(label("台灣經濟持續成長，前景看好"), SentimentLabel::Positive);
        assert_eq!(label("股市大跌，投資者損失慘重"), SentimentLabel::Negative);
        assert_eq!(label("今天天氣不錯"), SentimentLabel::Neutral);
        assert_eq!(label("新產品發布會圓滿成功"), SentimentLabel::Positive);
        assert_eq!(label("公司裁員計畫引發員工不滿"), SentimentLabel::Negative);
    }

    #[test]
    fn test_english_stems_match_word_starts() {
        let model = LexiconModel::new();
        assert_eq!(model.cue_counts("Chipmaker gains after record profits"), (3, 0));
        // "enterprise" must not match anything
        assert_eq!(model.cue_counts("enterprise software"), (0, 0));
        assert_eq!(model.cue_counts("Shares plunge on layoffs"), (0, 2));
    }

    #[test]
    fn test_mixed_cues_balance_out() {
        // one positive, one negative
        assert_eq!(LexiconModel::new().score("營收成長但股價下跌").unwrap(), 0.5);
    }
}
