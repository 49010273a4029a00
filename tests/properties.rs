//! Property tests for detector, classifier and session invariants.

use proptest::prelude::*;
use solace::crisis::CrisisDetector;
use solace::sentiment::BucketThresholds;
use solace::text::NEGATION_CUES;
use solace::{
    EngineConfig, LexiconStore, RiskTier, SafetyEngine, SentimentClassifier, SentimentLabel,
};
use std::sync::Arc;

fn detector() -> CrisisDetector {
    CrisisDetector::new(Arc::new(LexiconStore::builtin()))
}

const IMMINENT: &[&str] = &[
    "I want to kill myself",
    "I want to end my life",
    "I have been thinking about suicide",
    "I keep wanting to hurt myself",
    "there is no reason to live",
];

proptest! {
    #[test]
    fn imminent_phrases_always_reach_crisis(
        before in "[a-z ]{0,40}",
        after in "[a-z ]{0,40}",
        index in 0..IMMINENT.len(),
    ) {
        let text = format!("{before} {} {after}", IMMINENT[index]);
        let outcome = Arc::new(SafetyEngine::builtin()).start_session().respond(&text);
        prop_assert_eq!(outcome.plan.tier, RiskTier::Crisis);
        prop_assert!(outcome.plan.suggested_action.is_none());
    }

    #[test]
    fn cue_before_a_new_subject_never_masks_crisis(
        before in "[a-z ]{0,30}",
        cue in 0..NEGATION_CUES.len(),
        index in 0..IMMINENT.len(),
    ) {
        let text = format!("{before} {} {}", NEGATION_CUES[cue], IMMINENT[index]);
        let a = detector().assess_text(&text, &[]);
        prop_assert_eq!(a.tier, RiskTier::Crisis, "{}", text);
    }

    #[test]
    fn blank_input_is_neutral_and_safe(text in "[ \t\r\n]{0,20}") {
        let engine = Arc::new(SafetyEngine::builtin());
        let outcome = engine.start_session().respond(&text);
        prop_assert_eq!(outcome.plan.tier, RiskTier::None);
        prop_assert_eq!(outcome.plan.label, SentimentLabel::Neutral);
        prop_assert_eq!(outcome.record.sentiment.confidence, 0.0);
    }

    #[test]
    fn assessment_and_scoring_are_idempotent(text in "\\PC{0,80}", prior in "\\PC{0,40}") {
        let d = detector();
        prop_assert_eq!(
            d.assess_text(&text, &[prior.as_str()]),
            d.assess_text(&text, &[prior.as_str()])
        );
        let c = SentimentClassifier::default();
        prop_assert_eq!(c.score_text(&text), c.score_text(&text));
    }

    #[test]
    fn scores_stay_in_range(text in "\\PC{0,120}") {
        let result = SentimentClassifier::default().score_text(&text);
        prop_assert!((-1.0..=1.0).contains(&result.score));
        prop_assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn bucketing_is_monotonic(a in -1.0f32..=1.0, b in -1.0f32..=1.0) {
        let t = BucketThresholds::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(t.label(lo) <= t.label(hi));
    }

    #[test]
    fn context_keeps_only_the_newest_turns(capacity in 1usize..8, turns in 0usize..20) {
        let config = EngineConfig {
            context_window_size: capacity,
            ..EngineConfig::default()
        };
        let mut session = Arc::new(SafetyEngine::new(config).unwrap()).start_session();
        for i in 0..turns {
            session.respond(&format!("turn {i}"));
        }
        let kept: Vec<String> = session
            .context()
            .iter()
            .map(|e| e.utterance.text().to_owned())
            .collect();
        let expected: Vec<String> = (turns.saturating_sub(capacity)..turns)
            .map(|i| format!("turn {i}"))
            .collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn every_turn_gets_a_reply(text in "\\PC{0,200}") {
        let outcome = Arc::new(SafetyEngine::builtin()).start_session().respond(&text);
        prop_assert!(!outcome.plan.reply_text.trim().is_empty());
    }

    #[test]
    fn context_never_raises_to_crisis(prior in "\\PC{0,60}") {
        let d = detector();
        let a = d.assess_text("I feel hopeless", &["I want to kill myself", prior.as_str()]);
        prop_assert_eq!(a.tier, RiskTier::Elevated);
    }
}
