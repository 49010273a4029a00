//! Response composer.
//!
//! Picks the reply for a turn by strict precedence:
//!
//! 1. **Crisis**: the fixed crisis template, whatever the sentiment. No
//!    coping tip, persistent disclaimer.
//! 2. **Elevated**: an acknowledgment for the sentiment label plus exactly
//!    one coping suggestion, rotated round-robin within a category bucket.
//! 3. **None**: a reply for the sentiment label; negative labels also get a
//!    follow-up question. Word-free input gets a clarifying question instead.
//!
//! Selection is deterministic: the same (tier, label, turn index, rotation
//! cursor) always yields the same plan. A template family missing from the
//! lexicon is a configuration defect and degrades to the generic fallback
//! reply; a turn never fails.

use crate::context::Utterance;
use crate::crisis::{RiskAssessment, RiskTier};
use crate::error::{Result, SolaceError};
use crate::lexicon::{CopingEntry, LexiconStore};
use crate::sentiment::{SentimentLabel, SentimentResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Maximum characters of the utterance echoed into `{excerpt}`.
pub const EXCERPT_CHARS: usize = 160;

/// Crisis reply used when no template is configured.
pub const DEFAULT_CRISIS_TEMPLATE: &str = "\
It sounds like you're going through something extremely painful. Your safety matters.\n\
Please reach out to someone you trust right now, or contact your local emergency number \
or a crisis line (in the US, call or text 988).\n\n\
I am an AI program and not a licensed therapist or doctor. \
I can't diagnose, treat, or handle emergencies.";

/// Reply used when a template family is missing or the pipeline faults.
pub const DEFAULT_FALLBACK_REPLY: &str =
    "Thank you for sharing that with me. I'm here and I'm listening.";

/// Full disclaimer shown at session start and kept visible after a crisis turn.
pub const DISCLAIMER: &str = "\
I am an AI program and not a licensed therapist or doctor. \
I can't diagnose, treat, or handle emergencies. \
If you're in crisis, please reach out to a trusted person or local emergency services.";

/// Short reminder appended to non-crisis replies.
pub const DEFAULT_SAFETY_NOTE: &str =
    "I'm an AI and not a professional. I can't diagnose or handle emergencies.";

// ── Plan types ──────────────────────────────────────────────────────────

/// A family of interchangeable reply templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateFamily {
    /// Reply for a no-risk turn.
    Reply(SentimentLabel),
    /// Empathetic acknowledgment for an elevated-risk turn.
    Acknowledge(SentimentLabel),
    /// Question inviting the user to elaborate.
    FollowUp,
    /// Gentle question for empty or unreadable input.
    Clarify,
}

impl TemplateFamily {
    /// Lexicon key, e.g. `reply.negative`.
    #[must_use]
    pub fn key(self) -> String {
        match self {
            Self::Reply(label) => format!("reply.{label}"),
            Self::Acknowledge(label) => format!("acknowledge.{label}"),
            Self::FollowUp => "follow_up".to_owned(),
            Self::Clarify => "clarify".to_owned(),
        }
    }
}

/// How the rendering side should present the safety disclaimer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disclaimer {
    #[default]
    None,
    /// The short safety note is appended to the reply text.
    Footnote,
    /// Keep a disclaimer on screen until the session ends.
    Persistent,
}

/// Coping strategy attached to a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedAction {
    /// Id of the coping entry in the lexicon.
    pub id: String,
    pub category: String,
    pub text: String,
}

impl From<&CopingEntry> for SuggestedAction {
    fn from(entry: &CopingEntry) -> Self {
        Self {
            id: entry.id.clone(),
            category: entry.category.clone(),
            text: entry.display_text.clone(),
        }
    }
}

/// What to say this turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePlan {
    pub reply_text: String,
    pub tier: RiskTier,
    pub label: SentimentLabel,
    pub suggested_action: Option<SuggestedAction>,
    pub disclaimer: Disclaimer,
    /// True when the generic fallback reply was used.
    pub fallback: bool,
}

/// Round-robin cursor over coping suggestions. One per session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuggestionRotation {
    cursor: u64,
}

impl SuggestionRotation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a given position.
    #[must_use]
    pub fn at(cursor: u64) -> Self {
        Self { cursor }
    }

    #[must_use]
    pub fn position(self) -> u64 {
        self.cursor
    }

    fn take(&mut self, len: usize) -> usize {
        let index = (self.cursor % len as u64) as usize;
        self.cursor = self.cursor.wrapping_add(1);
        index
    }
}

// ── Composer ────────────────────────────────────────────────────────────

/// Composer texts and selection options.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerSettings {
    pub crisis_template: String,
    pub fallback_reply: String,
    /// Appended to non-crisis replies when set.
    pub safety_note: Option<String>,
    /// Seed for variant selection. `None` cycles variants by turn index.
    pub variant_seed: Option<u64>,
}

impl Default for ComposerSettings {
    fn default() -> Self {
        Self {
            crisis_template: DEFAULT_CRISIS_TEMPLATE.to_owned(),
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_owned(),
            safety_note: Some(DEFAULT_SAFETY_NOTE.to_owned()),
            variant_seed: None,
        }
    }
}

/// Per-turn reply selection over the shared lexicon.
#[derive(Debug, Clone)]
pub struct ResponseComposer {
    lexicon: Arc<LexiconStore>,
    settings: ComposerSettings,
}

impl ResponseComposer {
    #[must_use]
    pub fn new(lexicon: Arc<LexiconStore>, settings: ComposerSettings) -> Self {
        Self { lexicon, settings }
    }

    #[must_use]
    pub fn settings(&self) -> &ComposerSettings {
        &self.settings
    }

    /// Compose the plan for one turn. Never fails.
    pub fn compose(
        &self,
        utterance: &Utterance,
        risk: &RiskAssessment,
        sentiment: &SentimentResult,
        rotation: &mut SuggestionRotation,
    ) -> ResponsePlan {
        match self.try_compose(utterance, risk, sentiment, rotation) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(
                    tier = risk.tier.as_str(),
                    label = sentiment.label.as_str(),
                    "configuration defect, using fallback reply: {e}"
                );
                self.fallback_plan(risk.tier, sentiment.label)
            }
        }
    }

    /// The generic supportive reply, used on configuration defects.
    #[must_use]
    pub fn fallback_plan(&self, tier: RiskTier, label: SentimentLabel) -> ResponsePlan {
        let mut reply_text = self.settings.fallback_reply.clone();
        let disclaimer = self.append_footnote(&mut reply_text);
        ResponsePlan {
            reply_text,
            tier,
            label,
            suggested_action: None,
            disclaimer,
            fallback: true,
        }
    }

    /// The crisis template with a persistent disclaimer. Needs nothing from
    /// the lexicon, so it is always available.
    #[must_use]
    pub fn crisis_plan(&self, label: SentimentLabel) -> ResponsePlan {
        ResponsePlan {
            reply_text: self.settings.crisis_template.clone(),
            tier: RiskTier::Crisis,
            label,
            suggested_action: None,
            disclaimer: Disclaimer::Persistent,
            fallback: false,
        }
    }

    fn try_compose(
        &self,
        utterance: &Utterance,
        risk: &RiskAssessment,
        sentiment: &SentimentResult,
        rotation: &mut SuggestionRotation,
    ) -> Result<ResponsePlan> {
        let label = sentiment.label;
        let turn = utterance.turn_index();

        if risk.tier == RiskTier::Crisis {
            debug!(patterns = ?risk.matched_patterns, "crisis template selected");
            return Ok(self.crisis_plan(label));
        }

        let (mut reply_text, suggested_action) = if risk.tier == RiskTier::Elevated {
            let ack = self.render(TemplateFamily::Acknowledge(label), utterance, turn)?;
            (ack, self.pick_coping(label, rotation))
        } else if crate::text::is_degenerate(utterance.text()) {
            (self.render(TemplateFamily::Clarify, utterance, turn)?, None)
        } else {
            let mut reply = self.render(TemplateFamily::Reply(label), utterance, turn)?;
            if label.is_negative() {
                let question = self.render(TemplateFamily::FollowUp, utterance, turn)?;
                reply.push(' ');
                reply.push_str(&question);
            }
            (reply, None)
        };

        let disclaimer = self.append_footnote(&mut reply_text);
        debug!(
            tier = risk.tier.as_str(),
            label = label.as_str(),
            suggestion = suggested_action.as_ref().map(|s| s.id.as_str()),
            "reply composed"
        );

        Ok(ResponsePlan {
            reply_text,
            tier: risk.tier,
            label,
            suggested_action,
            disclaimer,
            fallback: false,
        })
    }

    /// Pick a variant of `family` and fill its placeholders.
    fn render(&self, family: TemplateFamily, utterance: &Utterance, turn: u64) -> Result<String> {
        let key = family.key();
        let variants = self.lexicon.templates_for(&key);
        if variants.is_empty() {
            return Err(SolaceError::MissingTemplate(key));
        }
        let index = match self.settings.variant_seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ turn).gen_range(0..variants.len()),
            None => (turn % variants.len() as u64) as usize,
        };
        let excerpt = crate::text::excerpt(utterance.text(), EXCERPT_CHARS);
        Ok(variants[index]
            .display_text
            .replace("{excerpt}", &excerpt))
    }

    /// Next coping suggestion from the label's bucket (or all entries when
    /// the bucket is empty).
    fn pick_coping(
        &self,
        label: SentimentLabel,
        rotation: &mut SuggestionRotation,
    ) -> Option<SuggestedAction> {
        let categories: &[&str] = if label.is_negative() {
            &["sad", "anxious", "stressed"]
        } else {
            &["general"]
        };
        let mut bucket: Vec<&CopingEntry> = categories
            .iter()
            .flat_map(|c| self.lexicon.coping_in(c))
            .collect();
        if bucket.is_empty() {
            bucket = self.lexicon.coping().iter().collect();
        }
        if bucket.is_empty() {
            warn!("lexicon has no coping entries, elevated reply sent without a suggestion");
            return None;
        }
        let index = rotation.take(bucket.len());
        Some(SuggestedAction::from(bucket[index]))
    }

    fn append_footnote(&self, reply: &mut String) -> Disclaimer {
        match self.settings.safety_note.as_deref() {
            Some(note) if !note.trim().is_empty() => {
                reply.push_str("\n\n(Safety note: ");
                reply.push_str(note.trim());
                reply.push(')');
                Disclaimer::Footnote
            }
            _ => Disclaimer::None,
        }
    }
}
