//! Integration tests for external lexicon files and engine configuration.

use solace::lexicon::LexiconData;
use solace::{EngineConfig, LexiconStore, RiskTier, SafetyEngine, SolaceError};
use std::path::Path;
use std::sync::Arc;

const CUSTOM_TOML: &str = r#"
version = "clinic-2"

[[patterns]]
id = "imminent.bridge"
pattern = "jump off the bridge"
severity = "imminent"

[[patterns]]
id = "imminent.pills"
pattern = '\btake all (my|the) pills\b'
kind = "regex"
severity = "imminent"

[[patterns]]
id = "elevated.give_up"
pattern = "giving up"
severity = "elevated"

[[patterns]]
id = "broken.regex"
pattern = "(unclosed"
kind = "regex"
severity = "elevated"

[[coping]]
id = "general.breathe"
category = "general"
display_text = "Take three slow breaths."

[[templates]]
id = "ack"
family = "acknowledge.neutral"
display_text = "I hear how hard this is."

[[templates]]
id = "plain"
family = "reply.neutral"
display_text = "Thanks for telling me."
"#;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn engine_with(path: &Path) -> solace::Result<Arc<SafetyEngine>> {
    let config = EngineConfig {
        lexicon_path: Some(path.to_path_buf()),
        safety_footnote: false,
        ..EngineConfig::default()
    };
    SafetyEngine::new(config).map(Arc::new)
}

// ---------------------------------------------------------------------------
// TOML lexicons
// ---------------------------------------------------------------------------

#[test]
fn custom_toml_lexicon_drives_detection() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "lexicon.toml", CUSTOM_TOML);
    let engine = engine_with(&path).unwrap();
    assert_eq!(engine.lexicon().version(), "clinic-2");

    let mut session = engine.start_session();
    assert_eq!(
        session.respond("I might jump off the bridge").plan.tier,
        RiskTier::Crisis
    );
    assert_eq!(
        session.respond("I want to take all my pills").plan.tier,
        RiskTier::Crisis
    );
    // Built-in phrases are not active with a custom lexicon.
    assert_eq!(session.respond("I hate myself").plan.tier, RiskTier::None);
}

#[test]
fn invalid_regex_entries_are_skipped() {
    let data = LexiconData::from_toml_str(CUSTOM_TOML).unwrap();
    assert_eq!(data.patterns.len(), 4);
    let store = LexiconStore::from_data(data);
    assert_eq!(store.patterns().len(), 3);
    assert!(store.can_detect_crisis());
}

#[test]
fn elevated_reply_uses_custom_templates() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "lexicon.toml", CUSTOM_TOML);
    let mut session = engine_with(&path).unwrap().start_session();

    let outcome = session.respond("thinking about giving up");
    assert_eq!(outcome.plan.tier, RiskTier::Elevated);
    assert_eq!(outcome.plan.reply_text, "I hear how hard this is.");
    assert_eq!(
        outcome.plan.suggested_action.map(|a| a.id),
        Some("general.breathe".to_owned())
    );
    assert_eq!(outcome.record.lexicon_version, "clinic-2");
}

#[test]
fn lexicon_without_imminent_patterns_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "weak.toml",
        r#"
version = "weak"
[[patterns]]
id = "info.sad"
pattern = "sad"
severity = "informational"
"#,
    );
    assert!(matches!(engine_with(&path), Err(SolaceError::Lexicon(_))));
}

// ---------------------------------------------------------------------------
// JSON lexicons and formats
// ---------------------------------------------------------------------------

#[test]
fn builtin_lexicon_roundtrips_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let json = serde_json::to_string_pretty(&LexiconData::builtin()).unwrap();
    let path = write(dir.path(), "lexicon.json", &json);

    let engine = engine_with(&path).unwrap();
    assert_eq!(
        engine.lexicon().patterns().len(),
        LexiconStore::builtin().patterns().len()
    );
    let outcome = engine.start_session().respond("I want to kill myself");
    assert_eq!(outcome.plan.tier, RiskTier::Crisis);
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "lexicon.yaml", "version: nope");
    assert!(engine_with(&path).is_err());
}

#[test]
fn malformed_toml_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "lexicon.toml", "[[patterns]\nid = ");
    assert!(engine_with(&path).is_err());
}

// ---------------------------------------------------------------------------
// Config files
// ---------------------------------------------------------------------------

#[test]
fn config_file_points_at_lexicon() {
    let dir = tempfile::tempdir().unwrap();
    let lexicon = write(dir.path(), "lexicon.toml", CUSTOM_TOML);
    let config_path = dir.path().join("config.toml");
    EngineConfig {
        lexicon_path: Some(lexicon),
        context_window_size: 3,
        ..EngineConfig::default()
    }
    .save_to_file(&config_path)
    .unwrap();

    let config = EngineConfig::from_file(&config_path).unwrap();
    let engine = SafetyEngine::new(config).unwrap();
    assert_eq!(engine.lexicon().version(), "clinic-2");
    assert_eq!(engine.config().context_window_size, 3);
}
