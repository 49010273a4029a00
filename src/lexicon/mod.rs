//! Lexicon / pattern store.
//!
//! Holds the crisis pattern table, the coping-strategy entries and the reply
//! template families. A store is loaded once (from the built-in tables or an
//! external TOML/JSON file) and then shared read-only by every session.
//!
//! Malformed entries are configuration defects: they are logged and skipped
//! so that one bad line never takes the whole engine down. A store without a
//! single imminent-severity pattern is refused, since it could never raise a
//! crisis.

pub mod builtin;
mod pattern;

pub use pattern::{CompiledPattern, PatternHit};

use crate::error::{Result, SolaceError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// Severity class of a crisis pattern. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Distress signal that does not reach "elevated" on its own.
    Informational,
    /// Sustained or serious distress.
    Elevated,
    /// Imminent risk of self-harm.
    Imminent,
}

impl Severity {
    /// One class lower, or `None` below informational.
    #[must_use]
    pub fn downgraded(self) -> Option<Self> {
        match self {
            Self::Imminent => Some(Self::Elevated),
            Self::Elevated => Some(Self::Informational),
            Self::Informational => None,
        }
    }
}

/// How a pattern string is interpreted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Word sequence matched on token boundaries.
    #[default]
    Phrase,
    /// Case-insensitive regular expression over normalized text.
    Regex,
}

/// A crisis-detection pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEntry {
    pub id: String,
    pub pattern: String,
    #[serde(default)]
    pub kind: PatternKind,
    pub severity: Severity,
    #[serde(default)]
    pub display_text: String,
}

/// A coping strategy that can be suggested alongside a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopingEntry {
    pub id: String,
    /// Bucket name, e.g. `sad`, `anxious`, `stressed`, `general`.
    pub category: String,
    pub display_text: String,
}

/// One variant of a reply template family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub id: String,
    /// Family key, e.g. `reply.negative` or `follow_up`.
    pub family: String,
    /// Template text. `{excerpt}` is replaced with a short echo of the utterance.
    pub display_text: String,
}

/// Raw lexicon contents, as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconData {
    pub version: String,
    pub patterns: Vec<PatternEntry>,
    pub coping: Vec<CopingEntry>,
    pub templates: Vec<TemplateEntry>,
}

impl LexiconData {
    /// Parse TOML lexicon data.
    ///
    /// # Errors
    ///
    /// Returns [`SolaceError::Lexicon`] if the document does not match the schema.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SolaceError::Lexicon(e.to_string()))
    }

    /// Parse JSON lexicon data.
    ///
    /// # Errors
    ///
    /// Returns [`SolaceError::Lexicon`] if the document does not match the schema.
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| SolaceError::Lexicon(e.to_string()))
    }

    /// Read lexicon data from a `.toml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unknown extension,
    /// or fails to parse.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            other => Err(SolaceError::Lexicon(format!(
                "unsupported lexicon format {other:?} for {}",
                path.display()
            ))),
        }
    }
}

/// Read-only, validated lexicon shared across sessions.
#[derive(Debug, Clone)]
pub struct LexiconStore {
    version: String,
    patterns: Vec<CompiledPattern>,
    coping: Vec<CopingEntry>,
    templates: Vec<TemplateEntry>,
}

impl LexiconStore {
    /// The built-in lexicon compiled into the binary.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_data(LexiconData::builtin())
    }

    /// Validate and compile lexicon data, skipping malformed entries.
    #[must_use]
    pub fn from_data(data: LexiconData) -> Self {
        let mut seen = HashSet::new();
        let mut patterns = Vec::with_capacity(data.patterns.len());
        for entry in data.patterns {
            if !seen.insert(entry.id.clone()) {
                warn!(id = %entry.id, "duplicate pattern id, keeping the first");
                continue;
            }
            match CompiledPattern::compile(entry) {
                Ok(p) => patterns.push(p),
                Err(e) => warn!("skipping lexicon pattern: {e}"),
            }
        }

        let coping: Vec<CopingEntry> = data
            .coping
            .into_iter()
            .filter(|c| {
                let ok = !c.display_text.trim().is_empty();
                if !ok {
                    warn!(id = %c.id, "skipping coping entry with empty text");
                }
                ok
            })
            .collect();

        let templates: Vec<TemplateEntry> = data
            .templates
            .into_iter()
            .filter(|t| {
                let ok = !t.display_text.trim().is_empty() && !t.family.trim().is_empty();
                if !ok {
                    warn!(id = %t.id, "skipping malformed template entry");
                }
                ok
            })
            .collect();

        info!(
            version = %data.version,
            patterns = patterns.len(),
            coping = coping.len(),
            templates = templates.len(),
            "lexicon loaded"
        );

        Self {
            version: data.version,
            patterns,
            coping,
            templates,
        }
    }

    /// Load and validate a lexicon file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded, or if no usable
    /// imminent-severity pattern survives validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let store = Self::from_data(LexiconData::from_file(path)?);
        if !store.can_detect_crisis() {
            return Err(SolaceError::Lexicon(format!(
                "{} contains no imminent-severity pattern",
                path.display()
            )));
        }
        Ok(store)
    }

    /// Load from `path` when given, otherwise the built-in lexicon.
    ///
    /// # Errors
    ///
    /// See [`LexiconStore::from_file`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::builtin()),
        }
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    #[must_use]
    pub fn coping(&self) -> &[CopingEntry] {
        &self.coping
    }

    /// Coping entries in a category, in table order.
    pub fn coping_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a CopingEntry> {
        self.coping.iter().filter(move |c| c.category == category)
    }

    /// All variants of a template family, in table order. Empty when missing.
    #[must_use]
    pub fn templates_for(&self, family: &str) -> Vec<&TemplateEntry> {
        self.templates.iter().filter(|t| t.family == family).collect()
    }

    /// Whether at least one imminent-severity pattern is loaded.
    #[must_use]
    pub fn can_detect_crisis(&self) -> bool {
        self.patterns
            .iter()
            .any(|p| p.entry().severity == Severity::Imminent)
    }
}
