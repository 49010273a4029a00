//! Engine configuration.

use crate::composer::{
    ComposerSettings, DEFAULT_CRISIS_TEMPLATE, DEFAULT_FALLBACK_REPLY, DEFAULT_SAFETY_NOTE,
};
use crate::context::DEFAULT_CONTEXT_WINDOW;
use crate::error::{Result, SolaceError};
use crate::sentiment::{BucketThresholds, DEFAULT_BLEND_WEIGHT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for the safety engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of prior turns kept per session.
    pub context_window_size: usize,
    /// Weight of the lexical score in the sentiment blend (0.0–1.0). The
    /// valence model gets the remainder.
    pub sentiment_blend_weight: f32,
    /// Reply sent on every crisis turn.
    pub crisis_template: String,
    /// External lexicon file (TOML or JSON). `None` uses the built-in set.
    pub lexicon_path: Option<PathBuf>,
    /// Append `safety_note` to non-crisis replies.
    pub safety_footnote: bool,
    pub safety_note: String,
    /// Generic supportive reply used when a template family is missing.
    pub fallback_reply: String,
    /// Seed for reply variant selection. Unset cycles variants by turn.
    pub variant_seed: Option<u64>,
    /// Cut points between sentiment labels. Kept last so it serializes as a
    /// trailing TOML table.
    pub bucket_thresholds: BucketThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            context_window_size: DEFAULT_CONTEXT_WINDOW,
            sentiment_blend_weight: DEFAULT_BLEND_WEIGHT,
            crisis_template: DEFAULT_CRISIS_TEMPLATE.to_owned(),
            lexicon_path: None,
            safety_footnote: true,
            safety_note: DEFAULT_SAFETY_NOTE.to_owned(),
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_owned(),
            variant_seed: None,
            bucket_thresholds: BucketThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails [`EngineConfig::validate`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| SolaceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SolaceError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/solace/config.toml`.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        crate::solace_dirs::config_file()
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`SolaceError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.context_window_size == 0 {
            return Err(SolaceError::Config(
                "context_window_size must be at least 1".to_owned(),
            ));
        }
        if !(0.0..=1.0).contains(&self.sentiment_blend_weight) {
            return Err(SolaceError::Config(format!(
                "sentiment_blend_weight must lie in [0, 1], got {}",
                self.sentiment_blend_weight
            )));
        }
        self.bucket_thresholds.validate()?;
        if self.crisis_template.trim().is_empty() {
            return Err(SolaceError::Config("crisis_template is empty".to_owned()));
        }
        if self.fallback_reply.trim().is_empty() {
            return Err(SolaceError::Config("fallback_reply is empty".to_owned()));
        }
        Ok(())
    }

    /// Composer texts derived from this config.
    #[must_use]
    pub fn composer_settings(&self) -> ComposerSettings {
        ComposerSettings {
            crisis_template: self.crisis_template.clone(),
            fallback_reply: self.fallback_reply.clone(),
            safety_note: self
                .safety_footnote
                .then(|| self.safety_note.clone())
                .filter(|n| !n.trim().is_empty()),
            variant_seed: self.variant_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.context_window_size, 5);
        assert!((config.sentiment_blend_weight - 0.5).abs() < f32::EPSILON);
        assert!(config.safety_footnote);
        assert!(config.lexicon_path.is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = EngineConfig {
            context_window_size: 8,
            variant_seed: Some(7),
            lexicon_path: Some(PathBuf::from("/etc/solace/lexicon.toml")),
            ..EngineConfig::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = EngineConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "context_window_size = 3\nsafety_footnote = false\n").unwrap();

        let loaded = EngineConfig::from_file(&path).unwrap();
        assert_eq!(loaded.context_window_size, 3);
        assert!(!loaded.safety_footnote);
        assert_eq!(loaded.crisis_template, DEFAULT_CRISIS_TEMPLATE);
    }

    #[test]
    fn partial_threshold_table_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[bucket_thresholds]\nvery_positive_above = 0.7\n").unwrap();

        let loaded = EngineConfig::from_file(&path).unwrap();
        let expected = BucketThresholds {
            very_positive_above: 0.7,
            ..BucketThresholds::DEFAULT
        };
        assert_eq!(loaded.bucket_thresholds, expected);
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = EngineConfig::from_file(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(SolaceError::Io(_))));
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();
        assert!(matches!(
            EngineConfig::from_file(&path),
            Err(SolaceError::Config(_))
        ));
    }

    #[test]
    fn from_file_rejects_unordered_thresholds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[bucket_thresholds]\nvery_negative_below = 0.1\nnegative_below = -0.2\n\
             positive_above = 0.2\nvery_positive_above = 0.6\n",
        )
        .unwrap();
        assert!(EngineConfig::from_file(&path).is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let zero_window = EngineConfig {
            context_window_size: 0,
            ..EngineConfig::default()
        };
        assert!(zero_window.validate().is_err());

        let heavy = EngineConfig {
            sentiment_blend_weight: 1.5,
            ..EngineConfig::default()
        };
        assert!(heavy.validate().is_err());

        let silent = EngineConfig {
            crisis_template: "  ".to_owned(),
            ..EngineConfig::default()
        };
        assert!(silent.validate().is_err());
    }

    #[test]
    fn footnote_switch_controls_composer_note() {
        let on = EngineConfig::default().composer_settings();
        assert_eq!(on.safety_note.as_deref(), Some(DEFAULT_SAFETY_NOTE));

        let off = EngineConfig {
            safety_footnote: false,
            ..EngineConfig::default()
        }
        .composer_settings();
        assert!(off.safety_note.is_none());
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = EngineConfig::default_config_path();
        assert!(path.ends_with("config.toml"));
    }

    #[test]
    fn config_serializes_to_toml() {
        let toml_str = toml::to_string_pretty(&EngineConfig::default()).unwrap();
        assert!(toml_str.contains("context_window_size"));
        assert!(toml_str.contains("[bucket_thresholds]"));
    }
}
