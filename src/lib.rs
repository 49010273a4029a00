//! Solace: emotional safety and response engine for supportive chat.
//!
//! Each user turn flows through a fixed, synchronous pipeline:
//! Utterance → Crisis Detector → Sentiment Classifier → Response Composer
//!
//! # Architecture
//!
//! - **Lexicon**: versioned crisis patterns, coping strategies and reply
//!   templates, loaded once and shared read-only
//! - **Crisis detection**: severity-tagged pattern table with negation and
//!   short-range context corroboration; always evaluated first
//! - **Sentiment**: blend of a keyword scorer and a compound valence model,
//!   bucketed into five labels
//! - **Composition**: crisis, elevated and plain replies by strict precedence,
//!   with rotating coping suggestions
//! - **Sessions**: per-conversation context window and turn counter over a
//!   shared [`SafetyEngine`]
//!
//! ```
//! use std::sync::Arc;
//! use solace::{RiskTier, SafetyEngine};
//!
//! let engine = Arc::new(SafetyEngine::builtin());
//! let mut session = engine.start_session();
//! let outcome = session.respond("I want to kill myself");
//! assert_eq!(outcome.plan.tier, RiskTier::Crisis);
//! ```

pub mod composer;
pub mod config;
pub mod context;
pub mod crisis;
pub mod engine;
pub mod error;
pub mod lexicon;
pub mod sentiment;
pub mod solace_dirs;
pub mod text;
pub mod transcript;

pub use composer::{Disclaimer, ResponsePlan, SuggestedAction};
pub use config::EngineConfig;
pub use context::{ConversationContext, Utterance};
pub use crisis::{CrisisDetector, RiskAssessment, RiskTier};
pub use engine::{SafetyEngine, Session, SessionSummary, TurnOutcome, TurnRecord};
pub use error::{Result, SolaceError};
pub use lexicon::LexiconStore;
pub use sentiment::{SentimentClassifier, SentimentLabel, SentimentResult};
