//! Coarse sentiment labelling and the genre query each label maps to.

use serde::Serialize;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Five-way sentiment bucket derived from a polarity score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SentimentLabel {
    #[serde(rename = "Very Positive")]
    VeryPositive,
    Positive,
    Neutral,
    Negative,
    #[serde(rename = "Very Negative")]
    VeryNegative,
}

impl SentimentLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::VeryPositive => "Very Positive",
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::VeryNegative => "Very Negative",
        }
    }

    pub fn genre_query(self) -> &'static str {
        genre_query(self.as_str())
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buckets a polarity score. The +/-0.5 boundaries belong to the "Very" labels.
/// NaN fails every comparison and lands on `Neutral`.
pub fn classify(score: f64) -> SentimentLabel {
    if score >= 0.5 {
        SentimentLabel::VeryPositive
    } else if score > 0.0 {
        SentimentLabel::Positive
    } else if score <= -0.5 {
        SentimentLabel::VeryNegative
    } else if score < 0.0 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Catalog query for a label. Matching is by substring, Positive and Negative first.
pub fn genre_query(label: &str) -> &'static str {
    if label.contains("Positive") {
        "genre:pop happy"
    } else if label.contains("Negative") {
        "genre:pop sad"
    } else if label == "Neutral" {
        "genre:pop chill"
    } else {
        "genre:pop"
    }
}

/// Text the scorer sees for a request.
pub fn scoring_text(song_name: &str, artist_name: Option<&str>) -> String {
    match artist_name {
        Some(artist) => format!("{} by {}", song_name, artist),
        None => song_name.to_string(),
    }
}

/// Anything that turns free text into a polarity score in [-1, 1].
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

/// Lexicon-based scorer backed by VADER; reports the `compound` score.
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for VaderScorer {
    fn polarity(&self, text: &str) -> f64 {
        self.analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
    }
}
