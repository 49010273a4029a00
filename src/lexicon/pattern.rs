//! Matching mechanics for crisis patterns.
//!
//! Policy (severity tie-break, negation downgrade, corroboration) lives in
//! [`crate::crisis`]; this module only answers "where does this pattern occur".

use regex::{Regex, RegexBuilder};

use super::{PatternEntry, PatternKind};
use crate::error::{Result, SolaceError};
use crate::text::{Normalized, tokens};

/// A single occurrence of a pattern in an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternHit {
    /// Index of the first matched token.
    pub start: usize,
    /// Index one past the last matched token.
    pub end: usize,
    /// Whether a negation cue precedes the match.
    pub negated: bool,
}

#[derive(Debug, Clone)]
enum Matcher {
    Phrase(Vec<String>),
    Regex(Regex),
}

/// A pattern entry with its matcher built.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    entry: PatternEntry,
    matcher: Matcher,
}

impl CompiledPattern {
    /// Build the matcher for an entry.
    ///
    /// # Errors
    ///
    /// Returns [`SolaceError::Lexicon`] for an empty phrase or invalid regex.
    pub fn compile(entry: PatternEntry) -> Result<Self> {
        let matcher = match entry.kind {
            PatternKind::Phrase => {
                let phrase = tokens(&entry.pattern);
                if phrase.is_empty() {
                    return Err(SolaceError::Lexicon(format!(
                        "pattern {} has no words",
                        entry.id
                    )));
                }
                Matcher::Phrase(phrase)
            }
            PatternKind::Regex => {
                let re = RegexBuilder::new(&entry.pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| SolaceError::Lexicon(format!("pattern {}: {e}", entry.id)))?;
                Matcher::Regex(re)
            }
        };
        Ok(Self { entry, matcher })
    }

    #[must_use]
    pub fn entry(&self) -> &PatternEntry {
        &self.entry
    }

    /// Find every occurrence in a normalized utterance.
    #[must_use]
    pub fn hits(&self, text: &Normalized) -> Vec<PatternHit> {
        let tokens = &text.tokens;
        let joined = text.joined.as_str();
        match &self.matcher {
            Matcher::Phrase(phrase) => {
                if phrase.len() > tokens.len() {
                    return Vec::new();
                }
                tokens
                    .windows(phrase.len())
                    .enumerate()
                    .filter(|(_, window)| *window == phrase.as_slice())
                    .map(|(start, _)| PatternHit {
                        start,
                        end: start + phrase.len(),
                        negated: text.negated_at(start),
                    })
                    .collect()
            }
            Matcher::Regex(re) => re
                .find_iter(joined)
                .filter(|m| !m.as_str().trim().is_empty())
                .map(|m| {
                    let start = joined[..m.start()].matches(' ').count();
                    let end = joined[..m.end()].trim_end().matches(' ').count() + 1;
                    PatternHit {
                        start,
                        end,
                        negated: text.negated_at(start),
                    }
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::lexicon::Severity;

    fn entry(pattern: &str, kind: PatternKind) -> PatternEntry {
        PatternEntry {
            id: "test".to_owned(),
            pattern: pattern.to_owned(),
            kind,
            severity: Severity::Elevated,
            display_text: String::new(),
        }
    }

    fn scan(p: &CompiledPattern, text: &str) -> Vec<PatternHit> {
        p.hits(&Normalized::new(text))
    }

    #[test]
    fn phrase_matches_on_token_boundaries() {
        let p = CompiledPattern::compile(entry("harm", PatternKind::Phrase)).unwrap();
        assert!(scan(&p, "the pharmacy is closed").is_empty());
        assert_eq!(scan(&p, "self-harm").len(), 1);
    }

    #[test]
    fn phrase_ignores_punctuation_and_case() {
        let p = CompiledPattern::compile(entry("can't go on", PatternKind::Phrase)).unwrap();
        let hits = scan(&p, "Honestly... I CANT go on.");
        assert_eq!(
            hits,
            vec![PatternHit {
                start: 2,
                end: 5,
                negated: false
            }]
        );
    }

    #[test]
    fn phrase_reports_negation() {
        let p = CompiledPattern::compile(entry("suicidal", PatternKind::Phrase)).unwrap();
        let hits = scan(&p, "I'm not suicidal");
        assert_eq!(hits.len(), 1);
        assert!(hits[0].negated);
    }

    #[test]
    fn regex_maps_offsets_to_tokens() {
        let p = CompiledPattern::compile(entry(r"\bend (it|things) all\b", PatternKind::Regex))
            .unwrap();
        let hits = scan(&p, "sometimes I want to END things all");
        assert_eq!(
            hits,
            vec![PatternHit {
                start: 4,
                end: 7,
                negated: false
            }]
        );
    }

    #[test]
    fn invalid_regex_is_rejected() {
        assert!(CompiledPattern::compile(entry("(unclosed", PatternKind::Regex)).is_err());
    }

    #[test]
    fn empty_phrase_is_rejected() {
        assert!(CompiledPattern::compile(entry(" ... ", PatternKind::Phrase)).is_err());
    }
}
