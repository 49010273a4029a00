//! Hybrid sentiment classifier for user utterances.
//!
//! Two scoring strategies implement [`PolarityScorer`]:
//!
//! 1. **Lexical** ([`LexicalScorer`]): weighted keyword sum normalized by
//!    utterance length.
//! 2. **Valence model** ([`ValenceModel`]): compound-polarity model with
//!    boosters, negation, contrast and emphasis handling.
//!
//! [`SentimentClassifier`] blends both with a fixed weight, buckets the
//! blended score into a [`SentimentLabel`] with [`BucketThresholds`], and
//! derives confidence from how well the two strategies agree and how sure
//! each strategy is of its own signal.

pub mod lexical;
pub mod valence;

pub use lexical::LexicalScorer;
pub use valence::ValenceModel;

use crate::context::Utterance;
use crate::error::{Result, SolaceError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Scores below this are `very_negative`.
pub const VERY_NEGATIVE_BELOW: f32 = -0.6;
/// Scores below this (and not very negative) are `negative`.
pub const NEGATIVE_BELOW: f32 = -0.2;
/// Scores above this (and not very positive) are `positive`.
pub const POSITIVE_ABOVE: f32 = 0.2;
/// Scores above this are `very_positive`.
pub const VERY_POSITIVE_ABOVE: f32 = 0.6;

/// Default weight of the lexical score in the blend (the model gets the rest).
pub const DEFAULT_BLEND_WEIGHT: f32 = 0.5;

/// Signals closer to zero than this count as carrying no polarity.
const POLARITY_EPSILON: f32 = 1e-6;

// ── Labels ──────────────────────────────────────────────────────────────

/// Discrete valence bucket, ordered from most negative to most positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    VeryPositive,
}

impl SentimentLabel {
    /// Every label in scale order.
    pub const ALL: [Self; 5] = [
        Self::VeryNegative,
        Self::Negative,
        Self::Neutral,
        Self::Positive,
        Self::VeryPositive,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryNegative => "very_negative",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Positive => "positive",
            Self::VeryPositive => "very_positive",
        }
    }

    /// `negative` or `very_negative`.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self < Self::Neutral
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cut points between the five labels, strictly ascending.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketThresholds {
    pub very_negative_below: f32,
    pub negative_below: f32,
    pub positive_above: f32,
    pub very_positive_above: f32,
}

impl BucketThresholds {
    pub const DEFAULT: Self = Self {
        very_negative_below: VERY_NEGATIVE_BELOW,
        negative_below: NEGATIVE_BELOW,
        positive_above: POSITIVE_ABOVE,
        very_positive_above: VERY_POSITIVE_ABOVE,
    };

    /// Check the cut points lie in `[-1, 1]` and ascend strictly.
    ///
    /// # Errors
    ///
    /// Returns [`SolaceError::Config`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let cuts = [
            self.very_negative_below,
            self.negative_below,
            self.positive_above,
            self.very_positive_above,
        ];
        if cuts.iter().any(|c| !c.is_finite() || !(-1.0..=1.0).contains(c)) {
            return Err(SolaceError::Config(format!(
                "bucket thresholds must lie in [-1, 1]: {cuts:?}"
            )));
        }
        if cuts.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SolaceError::Config(format!(
                "bucket thresholds must be strictly ascending: {cuts:?}"
            )));
        }
        Ok(())
    }

    /// Bucket a score. Non-finite scores are `neutral`.
    #[must_use]
    pub fn label(&self, score: f32) -> SentimentLabel {
        if !score.is_finite() {
            SentimentLabel::Neutral
        } else if score < self.very_negative_below {
            SentimentLabel::VeryNegative
        } else if score < self.negative_below {
            SentimentLabel::Negative
        } else if score <= self.positive_above {
            SentimentLabel::Neutral
        } else if score <= self.very_positive_above {
            SentimentLabel::Positive
        } else {
            SentimentLabel::VeryPositive
        }
    }
}

impl Default for BucketThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ── Scoring strategies ──────────────────────────────────────────────────

/// Output contract shared by every scoring strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Polarity {
    /// Valence in `[-1, 1]`.
    pub score: f32,
    /// Strategy's own confidence in `[0, 1]`.
    pub confidence: f32,
}

impl Polarity {
    /// No signal at all.
    pub const NONE: Self = Self {
        score: 0.0,
        confidence: 0.0,
    };

    /// Build a polarity, clamping both fields into range. Non-finite values
    /// become zero.
    #[must_use]
    pub fn new(score: f32, confidence: f32) -> Self {
        let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
        Self {
            score: finite(score).clamp(-1.0, 1.0),
            confidence: finite(confidence).clamp(0.0, 1.0),
        }
    }

    fn has_signal(self) -> bool {
        self.score.abs() > POLARITY_EPSILON
    }
}

/// A sentiment scoring strategy.
pub trait PolarityScorer: fmt::Debug + Send + Sync {
    /// Short strategy name for logs.
    fn name(&self) -> &'static str;

    /// Score raw utterance text. Must never panic, and must return
    /// [`Polarity::NONE`] for text without words.
    fn polarity(&self, text: &str) -> Polarity;
}

// ── Classifier ──────────────────────────────────────────────────────────

/// Classified sentiment of one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    /// Blended valence in `[-1, 1]`.
    pub score: f32,
    /// Agreement and evidence based confidence in `[0, 1]`.
    pub confidence: f32,
}

impl SentimentResult {
    /// Neutral result with zero confidence, used for degenerate input.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: 0.0,
            confidence: 0.0,
        }
    }
}

/// Blends a lexical and a model strategy into one [`SentimentResult`].
#[derive(Debug, Clone)]
pub struct SentimentClassifier {
    lexical: Arc<dyn PolarityScorer>,
    model: Arc<dyn PolarityScorer>,
    blend_weight: f32,
    thresholds: BucketThresholds,
}

impl SentimentClassifier {
    /// Classifier with the built-in lexical scorer and valence model.
    #[must_use]
    pub fn new(blend_weight: f32, thresholds: BucketThresholds) -> Self {
        Self::with_scorers(
            Arc::new(LexicalScorer::new()),
            Arc::new(ValenceModel::new()),
            blend_weight,
            thresholds,
        )
    }

    /// Classifier over arbitrary strategies. The weight is clamped to `[0, 1]`.
    #[must_use]
    pub fn with_scorers(
        lexical: Arc<dyn PolarityScorer>,
        model: Arc<dyn PolarityScorer>,
        blend_weight: f32,
        thresholds: BucketThresholds,
    ) -> Self {
        let blend_weight = if blend_weight.is_finite() {
            blend_weight.clamp(0.0, 1.0)
        } else {
            DEFAULT_BLEND_WEIGHT
        };
        Self {
            lexical,
            model,
            blend_weight,
            thresholds,
        }
    }

    #[must_use]
    pub fn thresholds(&self) -> &BucketThresholds {
        &self.thresholds
    }

    #[must_use]
    pub fn blend_weight(&self) -> f32 {
        self.blend_weight
    }

    /// Classify an utterance.
    #[must_use]
    pub fn score(&self, utterance: &Utterance) -> SentimentResult {
        self.score_text(utterance.text())
    }

    /// Classify raw text. Empty or word-free text is neutral with zero
    /// confidence.
    #[must_use]
    pub fn score_text(&self, text: &str) -> SentimentResult {
        if crate::text::is_degenerate(text) {
            return SentimentResult::neutral();
        }

        let lexical = self.lexical.polarity(text);
        let model = self.model.polarity(text);
        let score = blend(lexical.score, model.score, self.blend_weight);

        tracing::trace!(
            lexical_scorer = self.lexical.name(),
            lexical = lexical.score,
            model_scorer = self.model.name(),
            model = model.score,
            blended = score,
            "sentiment signals"
        );

        SentimentResult {
            label: self.thresholds.label(score),
            score,
            confidence: agreement_confidence(lexical, model),
        }
    }
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_BLEND_WEIGHT, BucketThresholds::DEFAULT)
    }
}

/// Weighted blend of the two scores, clamped to `[-1, 1]`.
#[must_use]
pub fn blend(lexical: f32, model: f32, lexical_weight: f32) -> f32 {
    (lexical_weight * lexical + (1.0 - lexical_weight) * model).clamp(-1.0, 1.0)
}

/// Confidence from the agreement of two polarity signals, weighed by the
/// strategies' own confidence.
///
/// Agreement sets the base:
///
/// - neither carries polarity → 0.5
/// - only one carries polarity → 0.6
/// - same sign → 0.75..=1.0, higher the closer the scores
/// - opposite sign → 0.5..=0.75, sliding toward 0.5 as they diverge
///
/// The base is then scaled by `0.5 + 0.5 * evidence`, where `evidence` is the
/// mean confidence of the strategies that carry polarity. A single weak
/// keyword hit therefore halves toward the base, and fully confident
/// strategies leave it unchanged.
#[must_use]
pub fn agreement_confidence(a: Polarity, b: Polarity) -> f32 {
    let closeness = 1.0 - (a.score - b.score).abs() / 2.0;
    let (base, evidence) = match (a.has_signal(), b.has_signal()) {
        (false, false) => return 0.5,
        (true, false) => (0.6, a.confidence),
        (false, true) => (0.6, b.confidence),
        (true, true) if a.score.signum() == b.score.signum() => {
            (0.75 + 0.25 * closeness, (a.confidence + b.confidence) / 2.0)
        }
        (true, true) => (0.5 + 0.25 * closeness, (a.confidence + b.confidence) / 2.0),
    };
    (base * (0.5 + 0.5 * evidence)).clamp(0.0, 1.0)
}
