//! Utterances and the bounded rolling conversation context.
//!
//! The context is the only memory a session keeps between turns, and it is
//! read only by the crisis detector. It holds at most K entries; pushing
//! past capacity evicts the oldest.

use crate::sentiment::SentimentResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of prior turns kept in context.
pub const DEFAULT_CONTEXT_WINDOW: usize = 5;

/// One user submission. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    text: String,
    turn_index: u64,
    timestamp: DateTime<Utc>,
}

impl Utterance {
    /// Create an utterance stamped with the current time.
    #[must_use]
    pub fn new(text: impl Into<String>, turn_index: u64) -> Self {
        Self::at(text, turn_index, Utc::now())
    }

    /// Create an utterance with an explicit timestamp.
    #[must_use]
    pub fn at(text: impl Into<String>, turn_index: u64, timestamp: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            turn_index,
            timestamp,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Zero-based turn number within the session.
    #[must_use]
    pub fn turn_index(&self) -> u64 {
        self.turn_index
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A prior turn as remembered by the context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub utterance: Utterance,
    pub sentiment: SentimentResult,
}

/// Fixed-capacity window over the most recent turns (oldest first).
#[derive(Debug, Clone)]
pub struct ConversationContext {
    entries: VecDeque<ContextEntry>,
    capacity: usize,
}

impl ConversationContext {
    /// Create an empty context. A capacity of 0 is treated as 1.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a turn, evicting the oldest if at capacity.
    ///
    /// Only the session turn loop appends.
    pub(crate) fn push(&mut self, entry: ContextEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Up to `n` most recent entries, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &ContextEntry> {
        self.entries.iter().rev().take(n)
    }

    /// All entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ContextEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn entry(text: &str, turn: u64) -> ContextEntry {
        ContextEntry {
            utterance: Utterance::new(text, turn),
            sentiment: SentimentResult::neutral(),
        }
    }

    fn texts(ctx: &ConversationContext) -> Vec<String> {
        ctx.iter().map(|e| e.utterance.text().to_owned()).collect()
    }

    #[test]
    fn evicts_oldest_first() {
        let mut ctx = ConversationContext::new(3);
        for (i, t) in ["a", "b", "c", "d"].iter().enumerate() {
            ctx.push(entry(t, i as u64));
        }
        assert_eq!(ctx.len(), 3);
        assert_eq!(texts(&ctx), vec!["b", "c", "d"]);
    }

    #[test]
    fn recent_is_newest_first() {
        let mut ctx = ConversationContext::default();
        ctx.push(entry("first", 0));
        ctx.push(entry("second", 1));
        ctx.push(entry("third", 2));
        let recent: Vec<&str> = ctx.recent(2).map(|e| e.utterance.text()).collect();
        assert_eq!(recent, vec!["third", "second"]);
    }

    #[test]
    fn zero_capacity_is_coerced() {
        let mut ctx = ConversationContext::new(0);
        assert_eq!(ctx.capacity(), 1);
        ctx.push(entry("x", 0));
        ctx.push(entry("y", 1));
        assert_eq!(texts(&ctx), vec!["y"]);
    }

    #[test]
    fn default_capacity() {
        let ctx = ConversationContext::default();
        assert!(ctx.is_empty());
        assert_eq!(ctx.capacity(), DEFAULT_CONTEXT_WINDOW);
    }

    #[test]
    fn utterance_accessors() {
        let ts = Utc::now();
        let u = Utterance::at("hello", 7, ts);
        assert_eq!(u.text(), "hello");
        assert_eq!(u.turn_index(), 7);
        assert_eq!(u.timestamp(), ts);
    }
}
