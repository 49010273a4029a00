//! Rule-based lexical polarity.
//!
//! Fast keyword scan over the utterance: every listed word or phrase adds its
//! weight, a negation cue scoping it (same clause, filler words only in
//! between) flips it, and the raw sum is normalized by `sqrt(word_count)` so long rambling
//! messages do not saturate on a single keyword.

use super::{Polarity, PolarityScorer};
use crate::text::Normalized;

// ── Keyword tables ──────────────────────────────────────────────────────

/// (weight, terms). Multi-word terms match on word boundaries.
const TERM_TABLE: &[(f32, &[&str])] = &[
    (
        -2.0,
        &[
            "depressed",
            "miserable",
            "devastated",
            "hopeless",
            "worthless",
            "awful",
            "terrible",
            "horrible",
            "unbearable",
            "heartbroken",
            "hate",
            "despair",
        ],
    ),
    (
        -1.0,
        &[
            "sad",
            "down",
            "anxious",
            "anxiety",
            "stressed",
            "overwhelmed",
            "lonely",
            "tired",
            "burned out",
            "burnt out",
            "upset",
            "worried",
            "afraid",
            "scared",
            "angry",
            "frustrated",
            "hurt",
            "bad",
            "empty",
            "exhausted",
            "cry",
            "crying",
            "struggling",
        ],
    ),
    (
        1.0,
        &[
            "okay",
            "ok",
            "good",
            "fine",
            "calm",
            "relieved",
            "hopeful",
            "better",
            "glad",
            "nice",
            "thankful",
            "proud",
        ],
    ),
    (
        2.0,
        &[
            "happy",
            "excited",
            "grateful",
            "great",
            "wonderful",
            "amazing",
            "fantastic",
            "love",
            "joy",
            "thrilled",
            "awesome",
        ],
    ),
];

/// Keyword-table scorer.
#[derive(Debug, Clone)]
pub struct LexicalScorer {
    /// (weight, term split into words)
    terms: Vec<(f32, Vec<String>)>,
}

impl LexicalScorer {
    #[must_use]
    pub fn new() -> Self {
        let terms = TERM_TABLE
            .iter()
            .flat_map(|&(weight, words)| {
                words
                    .iter()
                    .map(move |w| (weight, crate::text::tokens(w)))
            })
            .collect();
        Self { terms }
    }
}

impl Default for LexicalScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for LexicalScorer {
    fn name(&self) -> &'static str {
        "lexical"
    }

    fn polarity(&self, text: &str) -> Polarity {
        let normalized = Normalized::new(text);
        if normalized.is_empty() {
            return Polarity::NONE;
        }

        let mut raw = 0.0_f32;
        let mut hits = 0_usize;
        for (weight, term) in &self.terms {
            if term.len() > normalized.len() {
                continue;
            }
            for (start, window) in normalized.tokens.windows(term.len()).enumerate() {
                if window == term.as_slice() {
                    hits += 1;
                    raw += if normalized.negated_at(start) {
                        -weight
                    } else {
                        *weight
                    };
                }
            }
        }

        if hits == 0 {
            return Polarity::NONE;
        }

        let score = raw / (normalized.len() as f32).sqrt();

        // Confidence: scale by hit count with diminishing returns.
        // 1 hit → 0.35, 2 → 0.55, 3 → 0.70, 4+ → capped at 0.90.
        let confidence = match hits {
            1 => 0.35,
            2 => 0.55,
            3 => 0.70,
            _ => (0.70 + 0.05 * (hits as f32 - 3.0)).min(0.90),
        };

        Polarity::new(score, confidence)
    }
}
