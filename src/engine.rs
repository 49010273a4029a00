//! Turn loop.
//!
//! [`SafetyEngine`] holds the shared, read-only parts (lexicon, detector,
//! classifier, composer) and is meant to live behind an `Arc` for the whole
//! process. Each conversation gets a [`Session`], which exclusively owns its
//! rolling context and suggestion rotation.
//!
//! A turn runs strictly in order: crisis check, sentiment, composition,
//! context append. [`Session::respond`] cannot fail. A panic in the crisis
//! check counts as no risk. A panic after it keeps the detected tier: crisis
//! turns still get the crisis template, and other turns degrade to the
//! fallback reply with a persistent disclaimer.

use crate::composer::{Disclaimer, ResponseComposer, ResponsePlan, SuggestionRotation};
use crate::config::EngineConfig;
use crate::context::{ContextEntry, ConversationContext, Utterance};
use crate::crisis::{CrisisDetector, RiskAssessment, RiskTier};
use crate::error::Result;
use crate::lexicon::LexiconStore;
use crate::sentiment::{SentimentClassifier, SentimentLabel, SentimentResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Everything one turn produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub plan: ResponsePlan,
    pub record: TurnRecord,
}

/// Serializable account of one turn, for transcript logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub session_id: Uuid,
    pub turn_index: u64,
    pub timestamp: DateTime<Utc>,
    pub utterance: String,
    pub sentiment: SentimentResult,
    pub risk: RiskAssessment,
    pub reply_text: String,
    pub fallback: bool,
    pub lexicon_version: String,
}

/// Totals reported when a session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub turns: u64,
    /// Turns that reached the crisis tier.
    pub crisis_turns: u64,
}

// ── Engine ──────────────────────────────────────────────────────────────

/// Shared, immutable pipeline components.
#[derive(Debug)]
pub struct SafetyEngine {
    config: EngineConfig,
    lexicon: Arc<LexiconStore>,
    detector: CrisisDetector,
    classifier: SentimentClassifier,
    composer: ResponseComposer,
}

impl SafetyEngine {
    /// Validate `config` and load the lexicon it names.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the lexicon file cannot
    /// be loaded.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let lexicon = LexiconStore::load(config.lexicon_path.as_deref())?;
        Ok(Self::assemble(config, Arc::new(lexicon)))
    }

    /// Use an already loaded lexicon, ignoring `config.lexicon_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid.
    pub fn with_lexicon(config: EngineConfig, lexicon: Arc<LexiconStore>) -> Result<Self> {
        config.validate()?;
        if !lexicon.can_detect_crisis() {
            warn!(
                version = lexicon.version(),
                "lexicon has no imminent-severity pattern, crisis tier is unreachable"
            );
        }
        Ok(Self::assemble(config, lexicon))
    }

    /// Default configuration with the built-in lexicon.
    #[must_use]
    pub fn builtin() -> Self {
        Self::assemble(EngineConfig::default(), Arc::new(LexiconStore::builtin()))
    }

    /// Replace the sentiment classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: SentimentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    fn assemble(config: EngineConfig, lexicon: Arc<LexiconStore>) -> Self {
        let detector = CrisisDetector::new(Arc::clone(&lexicon));
        let classifier =
            SentimentClassifier::new(config.sentiment_blend_weight, config.bucket_thresholds);
        let composer = ResponseComposer::new(Arc::clone(&lexicon), config.composer_settings());
        Self {
            config,
            lexicon,
            detector,
            classifier,
            composer,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn lexicon(&self) -> &LexiconStore {
        &self.lexicon
    }

    #[must_use]
    pub fn detector(&self) -> &CrisisDetector {
        &self.detector
    }

    #[must_use]
    pub fn classifier(&self) -> &SentimentClassifier {
        &self.classifier
    }

    #[must_use]
    pub fn composer(&self) -> &ResponseComposer {
        &self.composer
    }

    /// Open a new conversation on this engine.
    #[must_use]
    pub fn start_session(self: &Arc<Self>) -> Session {
        Session::new(Arc::clone(self))
    }
}

// ── Session ─────────────────────────────────────────────────────────────

/// One conversation. Owns its context; not shared between threads.
#[derive(Debug)]
pub struct Session {
    engine: Arc<SafetyEngine>,
    id: Uuid,
    started_at: DateTime<Utc>,
    context: ConversationContext,
    rotation: SuggestionRotation,
    turns: u64,
    crisis_turns: u64,
}

impl Session {
    #[must_use]
    pub fn new(engine: Arc<SafetyEngine>) -> Self {
        let id = Uuid::new_v4();
        let context = ConversationContext::new(engine.config.context_window_size);
        info!(
            session_id = %id,
            lexicon_version = engine.lexicon.version(),
            "session started"
        );
        Self {
            engine,
            id,
            started_at: Utc::now(),
            context,
            rotation: SuggestionRotation::new(),
            turns: 0,
            crisis_turns: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Turns taken so far; also the index of the next turn.
    #[must_use]
    pub fn turn_count(&self) -> u64 {
        self.turns
    }

    #[must_use]
    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<SafetyEngine> {
        &self.engine
    }

    /// Run one turn.
    pub fn respond(&mut self, text: &str) -> TurnOutcome {
        let utterance = Utterance::new(text, self.turns);
        let engine = &self.engine;
        let context = &self.context;
        let mut rotation = self.rotation;

        let risk = panic::catch_unwind(AssertUnwindSafe(|| {
            engine.detector.assess(&utterance, context)
        }))
        .unwrap_or_else(|_| {
            error!(
                session_id = %self.id,
                turn = utterance.turn_index(),
                "crisis check panicked, treating turn as no risk"
            );
            RiskAssessment::none()
        });

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let sentiment = engine.classifier.score(&utterance);
            let plan = engine
                .composer
                .compose(&utterance, &risk, &sentiment, &mut rotation);
            (sentiment, plan)
        }));

        let (sentiment, plan) = match result {
            Ok(turn) => {
                self.rotation = rotation;
                turn
            }
            Err(_) => {
                error!(
                    session_id = %self.id,
                    turn = utterance.turn_index(),
                    tier = risk.tier.as_str(),
                    "pipeline panicked, sending fallback reply"
                );
                let mut plan = if risk.tier == RiskTier::Crisis {
                    engine.composer.crisis_plan(SentimentLabel::Neutral)
                } else {
                    engine.composer.fallback_plan(risk.tier, SentimentLabel::Neutral)
                };
                plan.disclaimer = Disclaimer::Persistent;
                (SentimentResult::neutral(), plan)
            }
        };

        debug!(
            session_id = %self.id,
            turn = utterance.turn_index(),
            tier = risk.tier.as_str(),
            label = sentiment.label.as_str(),
            score = sentiment.score,
            fallback = plan.fallback,
            "turn complete"
        );

        if risk.tier == RiskTier::Crisis {
            self.crisis_turns += 1;
        }
        let record = TurnRecord {
            session_id: self.id,
            turn_index: utterance.turn_index(),
            timestamp: utterance.timestamp(),
            utterance: utterance.text().to_owned(),
            sentiment,
            risk,
            reply_text: plan.reply_text.clone(),
            fallback: plan.fallback,
            lexicon_version: engine.lexicon.version().to_owned(),
        };
        self.context.push(ContextEntry {
            utterance,
            sentiment,
        });
        self.turns += 1;

        TurnOutcome { plan, record }
    }

    /// Close the session and report its totals.
    pub fn end(self) -> SessionSummary {
        let summary = SessionSummary {
            session_id: self.id,
            started_at: self.started_at,
            ended_at: Utc::now(),
            turns: self.turns,
            crisis_turns: self.crisis_turns,
        };
        info!(
            session_id = %summary.session_id,
            turns = summary.turns,
            crisis_turns = summary.crisis_turns,
            "session ended"
        );
        summary
    }
}
