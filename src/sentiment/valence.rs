//! Compound valence model.
//!
//! A general-purpose polarity model in the VADER family. Each word found in
//! the valence lexicon contributes its valence, adjusted by:
//!
//! - boosters and dampeners up to three words earlier (decaying with distance),
//! - ALL-CAPS emphasis when the rest of the text is mixed case,
//! - negation cues up to three words earlier in the same clause,
//! - a contrastive `but` (earlier half weighted 0.5, later half 1.5),
//! - trailing `!` / `?` emphasis.
//!
//! The summed valence is squashed with `x / sqrt(x² + 15)` into `[-1, 1]`.
//! Tables are built once in [`ValenceModel::new`] and the model is read-only
//! afterwards, so one instance can be shared by every session.

use super::{Polarity, PolarityScorer};
use crate::text::{NEGATION_CUES, Word, words};
use std::collections::HashMap;

/// Valence added or removed by a booster / dampener word.
const BOOST: f32 = 0.293;
/// Extra valence for a word shouted in capitals.
const CAPS_BOOST: f32 = 0.733;
/// Multiplier applied to a negated valence.
const NEGATION_SCALAR: f32 = -0.74;
/// Squashing constant for the compound score.
const NORMALIZATION_ALPHA: f32 = 15.0;
/// Per-`!` emphasis, up to [`MAX_EXCLAIM`] marks.
const EXCLAIM_BOOST: f32 = 0.292;
const MAX_EXCLAIM: usize = 4;
/// Per-`?` emphasis when more than one question mark is present.
const QUESTION_BOOST: f32 = 0.18;
/// Booster decay by distance (1, 2, 3 words back).
const BOOST_DECAY: [f32; 3] = [1.0, 0.95, 0.9];

const VALENCE: &[(&str, f32)] = &[
    // negative
    ("afraid", -1.5),
    ("alone", -1.0),
    ("angry", -2.3),
    ("annoyed", -1.6),
    ("anxiety", -1.4),
    ("anxious", -1.0),
    ("ashamed", -2.1),
    ("awful", -2.0),
    ("bad", -2.5),
    ("boring", -1.3),
    ("broken", -1.7),
    ("cry", -2.1),
    ("crying", -2.1),
    ("dead", -3.3),
    ("depressed", -2.3),
    ("despair", -2.8),
    ("devastated", -2.9),
    ("die", -2.9),
    ("disappointed", -1.9),
    ("down", -1.5),
    ("empty", -0.8),
    ("exhausted", -1.5),
    ("failure", -2.3),
    ("fear", -2.2),
    ("frustrated", -2.0),
    ("grief", -2.2),
    ("guilty", -1.8),
    ("hate", -2.7),
    ("heartbroken", -2.7),
    ("hopeless", -2.6),
    ("horrible", -2.5),
    ("hurt", -2.4),
    ("kill", -3.7),
    ("lonely", -1.6),
    ("lost", -1.3),
    ("miserable", -2.6),
    ("nervous", -1.1),
    ("numb", -1.0),
    ("overwhelmed", -1.5),
    ("pain", -2.3),
    ("painful", -2.4),
    ("panic", -2.3),
    ("problem", -1.7),
    ("sad", -2.1),
    ("scared", -1.9),
    ("sick", -1.7),
    ("stress", -1.8),
    ("stressed", -1.4),
    ("struggling", -1.5),
    ("suicide", -3.5),
    ("terrible", -2.5),
    ("tired", -1.1),
    ("unbearable", -2.5),
    ("upset", -1.6),
    ("useless", -1.8),
    ("worried", -1.2),
    ("worse", -2.1),
    ("worst", -3.1),
    ("worthless", -2.7),
    ("wrong", -2.1),
    // positive
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("better", 1.9),
    ("calm", 1.3),
    ("care", 2.2),
    ("confident", 2.2),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("excited", 2.0),
    ("fantastic", 2.6),
    ("fine", 0.8),
    ("friend", 2.2),
    ("friends", 2.1),
    ("fun", 2.3),
    ("glad", 2.0),
    ("good", 1.9),
    ("grateful", 2.0),
    ("great", 3.1),
    ("happy", 2.7),
    ("hope", 1.9),
    ("hopeful", 1.9),
    ("joy", 2.8),
    ("laugh", 2.6),
    ("love", 3.2),
    ("loved", 2.9),
    ("lucky", 1.8),
    ("nice", 1.8),
    ("ok", 0.9),
    ("okay", 0.9),
    ("peaceful", 2.2),
    ("proud", 2.1),
    ("relaxed", 2.2),
    ("relieved", 1.5),
    ("safe", 1.9),
    ("smile", 1.5),
    ("strong", 2.3),
    ("support", 1.7),
    ("thankful", 2.0),
    ("thanks", 1.9),
    ("thrilled", 2.1),
    ("win", 2.8),
    ("wonderful", 2.7),
];

const BOOSTERS_UP: &[&str] = &[
    "absolutely",
    "completely",
    "deeply",
    "especially",
    "extremely",
    "incredibly",
    "particularly",
    "really",
    "so",
    "super",
    "totally",
    "truly",
    "utterly",
    "very",
];

const BOOSTERS_DOWN: &[&str] = &[
    "almost",
    "barely",
    "bit",
    "kinda",
    "less",
    "little",
    "marginally",
    "mildly",
    "occasionally",
    "partly",
    "slightly",
    "somewhat",
    "sorta",
];

/// Compound valence scorer.
#[derive(Debug, Clone)]
pub struct ValenceModel {
    lexicon: HashMap<&'static str, f32>,
    boosters: HashMap<&'static str, f32>,
}

impl ValenceModel {
    #[must_use]
    pub fn new() -> Self {
        let lexicon = VALENCE.iter().copied().collect();
        let boosters = BOOSTERS_UP
            .iter()
            .map(|&w| (w, BOOST))
            .chain(BOOSTERS_DOWN.iter().map(|&w| (w, -BOOST)))
            .collect();
        Self { lexicon, boosters }
    }

    /// Valence of the word at `i`, or `None` when it carries no sentiment.
    fn word_valence(&self, all: &[Word], i: usize, mixed_case: bool) -> Option<f32> {
        let word = &all[i];
        if self.boosters.contains_key(word.lower.as_str()) {
            return None;
        }
        let base = *self.lexicon.get(word.lower.as_str())?;
        let sign = base.signum();
        let mut valence = base;
        if mixed_case && word.is_shouted() {
            valence += CAPS_BOOST * sign;
        }

        let mut negated = false;
        for (dist, decay) in BOOST_DECAY.iter().enumerate().map(|(d, k)| (d + 1, k)) {
            let Some(prev) = i.checked_sub(dist).map(|j| &all[j]) else {
                break;
            };
            if prev.clause != word.clause {
                break;
            }
            if let Some(&boost) = self.boosters.get(prev.lower.as_str()) {
                let mut scalar = boost * sign;
                if mixed_case && prev.is_shouted() {
                    scalar += CAPS_BOOST * sign;
                }
                valence += scalar * decay;
            }
            if NEGATION_CUES.contains(&prev.lower.as_str()) {
                negated = true;
            }
        }
        if negated {
            valence *= NEGATION_SCALAR;
        }
        Some(valence)
    }
}

impl Default for ValenceModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for ValenceModel {
    fn name(&self) -> &'static str {
        "valence"
    }

    fn polarity(&self, text: &str) -> Polarity {
        let all = words(text);
        if all.is_empty() {
            return Polarity::NONE;
        }

        let shouted = all.iter().filter(|w| w.is_shouted()).count();
        let mixed_case = shouted > 0 && shouted < all.len();

        let mut valences = vec![0.0_f32; all.len()];
        let mut carrying = 0_usize;
        for (i, slot) in valences.iter_mut().enumerate() {
            if let Some(v) = self.word_valence(&all, i, mixed_case) {
                *slot = v;
                carrying += 1;
            }
        }
        if carrying == 0 {
            return Polarity::NONE;
        }

        if let Some(pivot) = all.iter().position(|w| w.lower == "but") {
            for (i, v) in valences.iter_mut().enumerate() {
                if i < pivot {
                    *v *= 0.5;
                } else if i > pivot {
                    *v *= 1.5;
                }
            }
        }

        let mut sum: f32 = valences.iter().sum();
        let emphasis = punctuation_emphasis(text);
        if sum > 0.0 {
            sum += emphasis;
        } else if sum < 0.0 {
            sum -= emphasis;
        }

        let compound = sum / (sum * sum + NORMALIZATION_ALPHA).sqrt();
        let density = carrying as f32 / all.len() as f32;
        Polarity::new(compound, (density * 2.0).min(1.0))
    }
}

fn punctuation_emphasis(text: &str) -> f32 {
    let exclaims = text.matches('!').count().min(MAX_EXCLAIM);
    let questions = text.matches('?').count();
    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f32 * QUESTION_BOOST,
        _ => 0.96,
    };
    exclaims as f32 * EXCLAIM_BOOST + question_emphasis
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn compound(text: &str) -> f32 {
        ValenceModel::new().polarity(text).score
    }

    #[test]
    fn no_valence_words_is_none() {
        assert_eq!(ValenceModel::new().polarity(""), Polarity::NONE);
        assert_eq!(
            ValenceModel::new().polarity("the train leaves at nine"),
            Polarity::NONE
        );
    }

    #[test]
    fn dampener_softens_valence() {
        // down (-1.5) softened by "bit" → -1.207, squashed.
        let expected = -1.207_f32 / (1.207_f32 * 1.207 + 15.0).sqrt();
        assert!((compound("I feel a bit down today") - expected).abs() < 1e-3);
        assert!(compound("I feel down today") < compound("I feel a bit down today"));
    }

    #[test]
    fn booster_intensifies_valence() {
        assert!(compound("I am really happy") > compound("I am happy"));
        assert!(compound("I am very sad") < compound("I am sad"));
    }

    #[test]
    fn negation_flips_and_dampens() {
        let happy = compound("I am happy");
        let not_happy = compound("I am not happy");
        assert!(not_happy < 0.0);
        assert!(not_happy.abs() < happy.abs());
    }

    #[test]
    fn negation_does_not_cross_clauses() {
        assert!(compound("no, I am happy") > 0.0);
    }

    #[test]
    fn but_shifts_weight_to_second_clause() {
        assert!(compound("I was sad but now I am happy") > 0.0);
        assert!(compound("I was happy but now I am sad") < 0.0);
    }

    #[test]
    fn caps_and_exclamation_add_emphasis() {
        assert!(compound("I am so HAPPY") > compound("I am so happy"));
        assert!(compound("I am happy!!") > compound("I am happy"));
    }

    #[test]
    fn compound_stays_in_range() {
        let p = ValenceModel::new().polarity(
            "AMAZING wonderful fantastic great awesome best love joy happy!!!!!!!",
        );
        assert!(p.score <= 1.0 && p.score > 0.9);
        assert!(p.confidence <= 1.0);
    }
}
