//! Crisis detector.
//!
//! Scans an utterance against the lexicon's pattern table and maps the
//! strongest finding to a [`RiskTier`]:
//!
//! | strongest finding | tier                                         |
//! |-------------------|----------------------------------------------|
//! | imminent          | crisis                                       |
//! | elevated          | elevated                                     |
//! | informational     | elevated if corroborated by context, else none |
//! | nothing           | none                                         |
//!
//! Multiple findings never average: the maximum severity wins. A negated
//! match ("not suicidal") counts one severity class lower. Corroboration
//! looks at the two most recent prior utterances; any finding there lifts an
//! informational-only turn to elevated. Context never raises a turn to crisis
//! and never lowers a tier, and sentiment plays no part here at all.

use crate::context::{ConversationContext, Utterance};
use crate::lexicon::{LexiconStore, Severity};
use crate::text::Normalized;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// How many prior utterances are checked for corroborating distress.
pub const CORROBORATION_DEPTH: usize = 2;

/// Discrete crisis-severity classification, independent of sentiment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    #[default]
    None,
    Elevated,
    Crisis,
}

impl RiskTier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Elevated => "elevated",
            Self::Crisis => "crisis",
        }
    }
}

/// Outcome of a risk check for one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub tier: RiskTier,
    /// Matched pattern ids, current utterance first. Empty when tier is none.
    pub matched_patterns: Vec<String>,
    /// Whether prior turns lifted this turn to elevated.
    pub corroborated: bool,
}

impl RiskAssessment {
    /// No risk found.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

/// One pattern that fired in an utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub pattern_id: String,
    /// Effective severity after negation.
    pub severity: Severity,
    /// True when every occurrence was negated.
    pub negated: bool,
}

/// Map the strongest finding of a turn to a tier.
#[must_use]
pub fn tier_for(strongest: Option<Severity>, corroborated: bool) -> RiskTier {
    match strongest {
        Some(Severity::Imminent) => RiskTier::Crisis,
        Some(Severity::Elevated) => RiskTier::Elevated,
        Some(Severity::Informational) if corroborated => RiskTier::Elevated,
        Some(Severity::Informational) | None => RiskTier::None,
    }
}

/// Strongest severity among findings.
#[must_use]
pub fn strongest(findings: &[Finding]) -> Option<Severity> {
    findings.iter().map(|f| f.severity).max()
}

/// Pattern-table crisis detector. Cheap to clone; shares the lexicon.
#[derive(Debug, Clone)]
pub struct CrisisDetector {
    lexicon: Arc<LexiconStore>,
}

impl CrisisDetector {
    #[must_use]
    pub fn new(lexicon: Arc<LexiconStore>) -> Self {
        Self { lexicon }
    }

    /// Every pattern that fires in `text`, in pattern-table order.
    #[must_use]
    pub fn scan(&self, text: &str) -> Vec<Finding> {
        let normalized = Normalized::new(text);
        if normalized.is_empty() {
            return Vec::new();
        }

        let mut findings = Vec::new();
        for pattern in self.lexicon.patterns() {
            let hits = pattern.hits(&normalized);
            if hits.is_empty() {
                continue;
            }
            let entry = pattern.entry();
            let negated = hits.iter().all(|h| h.negated);
            let severity = if negated {
                entry.severity.downgraded()
            } else {
                Some(entry.severity)
            };
            if let Some(severity) = severity {
                findings.push(Finding {
                    pattern_id: entry.id.clone(),
                    severity,
                    negated,
                });
            }
        }
        findings
    }

    /// Assess the current utterance, using the context for corroboration.
    #[must_use]
    pub fn assess(&self, utterance: &Utterance, context: &ConversationContext) -> RiskAssessment {
        let prior: Vec<&str> = context
            .recent(CORROBORATION_DEPTH)
            .map(|e| e.utterance.text())
            .collect();
        self.assess_text(utterance.text(), &prior)
    }

    /// Assess raw text against prior utterances (newest first).
    #[must_use]
    pub fn assess_text(&self, text: &str, prior: &[&str]) -> RiskAssessment {
        let findings = self.scan(text);
        let current = strongest(&findings);
        let mut matched: Vec<String> = findings.into_iter().map(|f| f.pattern_id).collect();

        let mut corroborated = false;
        if current == Some(Severity::Informational) {
            for earlier in prior.iter().take(CORROBORATION_DEPTH) {
                for finding in self.scan(earlier) {
                    corroborated = true;
                    if !matched.contains(&finding.pattern_id) {
                        matched.push(finding.pattern_id);
                    }
                }
            }
        }

        let tier = tier_for(current, corroborated);
        if tier == RiskTier::None {
            matched.clear();
            corroborated = false;
        }

        debug!(
            tier = tier.as_str(),
            patterns = matched.len(),
            corroborated,
            "risk assessed"
        );

        RiskAssessment {
            tier,
            matched_patterns: matched,
            corroborated,
        }
    }
}
