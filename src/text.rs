//! Tokenization shared by the crisis detector and the sentiment scorers.
//!
//! Text is split on every character that is neither alphanumeric nor an
//! in-word apostrophe. Apostrophes are dropped so `don't` and `dont` produce
//! the same token. Clause punctuation (`, . ; : ! ?` and line breaks) also
//! closes the current clause; negation never reaches across a clause.
//!
//! A negation cue only scopes a phrase when nothing but filler (copulas,
//! intensifiers, `feeling`, `going to`) sits between them. Any other word,
//! such as a pronoun or a main verb, starts a new scope, so unpunctuated
//! speech like "no I want to die" is not read as negated.

/// Words that negate a following phrase within [`NEGATION_WINDOW`] tokens.
pub const NEGATION_CUES: &[&str] = &[
    "not", "no", "never", "dont", "doesnt", "didnt", "isnt", "arent", "wasnt", "werent", "wont",
    "without", "nor", "hardly",
];

/// Number of tokens before a match that are searched for a negation cue.
pub const NEGATION_WINDOW: usize = 3;

/// Words that may sit between a negation cue and the phrase it negates.
pub const NEGATION_FILLER: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "really", "very", "so", "too",
    "that", "at", "all", "even", "quite", "totally", "actually", "exactly", "just", "remotely",
    "particularly", "feeling", "feel", "going", "gonna", "to", "a", "an", "the",
];

/// One word of an utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// Word as typed (case preserved, apostrophes removed).
    pub raw: String,
    /// Lowercased form used for all lookups.
    pub lower: String,
    /// Index of the clause the word belongs to.
    pub clause: usize,
}

impl Word {
    /// True when the word is written in capitals and contains a letter.
    #[must_use]
    pub fn is_shouted(&self) -> bool {
        self.raw.chars().any(char::is_alphabetic) && !self.raw.chars().any(char::is_lowercase)
    }
}

fn is_clause_break(c: char) -> bool {
    matches!(c, ',' | '.' | ';' | ':' | '!' | '?' | '\n' | '\r')
}

/// Split text into words.
#[must_use]
pub fn words(text: &str) -> Vec<Word> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut clause = 0;
    for c in text.chars() {
        if c.is_alphanumeric() {
            current.push(c);
            continue;
        }
        if matches!(c, '\'' | '\u{2019}') && !current.is_empty() {
            continue;
        }
        if !current.is_empty() {
            let lower = current.to_lowercase();
            out.push(Word {
                raw: std::mem::take(&mut current),
                lower,
                clause,
            });
        }
        if is_clause_break(c) && out.last().is_some_and(|w: &Word| w.clause == clause) {
            clause += 1;
        }
    }
    if !current.is_empty() {
        let lower = current.to_lowercase();
        out.push(Word {
            raw: current,
            lower,
            clause,
        });
    }
    out
}

/// Lowercased token stream of an utterance, with clause boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Lowercased tokens.
    pub tokens: Vec<String>,
    /// Tokens joined by single spaces; regex patterns run against this.
    pub joined: String,
    clauses: Vec<usize>,
}

impl Normalized {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let words = words(text);
        let clauses = words.iter().map(|w| w.clause).collect();
        let tokens: Vec<String> = words.into_iter().map(|w| w.lower).collect();
        let joined = tokens.join(" ");
        Self {
            tokens,
            joined,
            clauses,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when a negation cue scopes token `start`: it sits in the same
    /// clause within the window, separated from `start` by filler only.
    #[must_use]
    pub fn negated_at(&self, start: usize) -> bool {
        let Some(&clause) = self.clauses.get(start) else {
            return false;
        };
        for i in (start.saturating_sub(NEGATION_WINDOW)..start).rev() {
            if self.clauses[i] != clause {
                return false;
            }
            let token = self.tokens[i].as_str();
            if NEGATION_CUES.contains(&token) {
                return true;
            }
            if !NEGATION_FILLER.contains(&token) {
                return false;
            }
        }
        false
    }
}

/// Lowercased tokens only.
#[must_use]
pub fn tokens(text: &str) -> Vec<String> {
    words(text).into_iter().map(|w| w.lower).collect()
}

/// True when the text carries no word at all (empty, whitespace, punctuation).
#[must_use]
pub fn is_degenerate(text: &str) -> bool {
    !text.chars().any(char::is_alphanumeric)
}

/// Shorten text for echoing back, appending `...` past `max_chars`.
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let cleaned = text.trim();
    if cleaned.chars().count() <= max_chars {
        return cleaned.to_owned();
    }
    let mut short: String = cleaned.chars().take(max_chars).collect();
    short.push_str("...");
    short
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn apostrophes_join_words() {
        assert_eq!(tokens("I don't know"), vec!["i", "dont", "know"]);
        assert_eq!(tokens("I can\u{2019}t"), vec!["i", "cant"]);
    }

    #[test]
    fn punctuation_splits_words() {
        assert_eq!(tokens("self-harm... again!"), vec!["self", "harm", "again"]);
    }

    #[test]
    fn clauses_advance_on_punctuation() {
        let w = words("fine, really. ok");
        assert_eq!(
            w.iter().map(|w| w.clause).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn shouting_detection() {
        let w = words("I am SO tired");
        assert!(w[2].is_shouted());
        assert!(!w[3].is_shouted());
    }

    #[test]
    fn degenerate_inputs() {
        assert!(is_degenerate(""));
        assert!(is_degenerate("   \n\t"));
        assert!(is_degenerate("?!..."));
        assert!(!is_degenerate("ok"));
    }

    #[test]
    fn negation_window_is_bounded() {
        let n = Normalized::new("i am not really feeling very suicidal");
        // "not" is four tokens before "suicidal".
        assert!(!n.negated_at(6));
        assert!(n.negated_at(5));
        assert!(!n.negated_at(0));
        assert!(!n.negated_at(99));
    }

    #[test]
    fn negation_stops_at_clause_break() {
        let n = Normalized::new("I'm not okay, I want to die");
        // tokens: im not okay i want to die
        assert!(!n.negated_at(4));
    }

    #[test]
    fn negation_stops_at_pronoun_or_verb() {
        // tokens: im not okay i want to die
        let n = Normalized::new("I'm not okay I want to die");
        assert!(!n.negated_at(4));
        // tokens: no i want to die
        let n = Normalized::new("no I want to die");
        assert!(!n.negated_at(2));
        // tokens: i dont want to hurt myself
        let n = Normalized::new("I don't want to hurt myself");
        assert!(!n.negated_at(4));
    }

    #[test]
    fn negation_reaches_through_filler() {
        // tokens: im not going to hurt myself
        let n = Normalized::new("I'm not going to hurt myself");
        assert!(n.negated_at(4));
        // tokens: i am not really suicidal
        let n = Normalized::new("I am not really suicidal");
        assert!(n.negated_at(4));
        assert!(Normalized::new("not bad").negated_at(1));
    }

    #[test]
    fn joined_is_single_spaced() {
        let n = Normalized::new("  Hello,   WORLD!! ");
        assert_eq!(n.joined, "hello world");
        assert_eq!(n.len(), 2);
    }

    #[test]
    fn excerpt_truncates_on_char_boundary() {
        assert_eq!(excerpt("  short  ", 10), "short");
        assert_eq!(excerpt("ééééé", 3), "ééé...");
    }
}
