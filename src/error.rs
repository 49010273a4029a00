//! Error types for the solace engine.
//!
//! Only construction can fail. Once an engine is built, a conversational turn
//! always yields a reply; see [`crate::engine::Session::respond`].

/// Load-time error for the safety engine.
#[derive(Debug, thiserror::Error)]
pub enum SolaceError {
    /// Configuration error (unreadable TOML, out-of-range values).
    #[error("config error: {0}")]
    Config(String),

    /// Lexicon / pattern store error (malformed file, unknown format).
    #[error("lexicon error: {0}")]
    Lexicon(String),

    /// Template family missing from the lexicon.
    ///
    /// Never surfaced to callers of a turn; the composer recovers with the
    /// generic fallback reply.
    #[error("missing template family: {0}")]
    MissingTemplate(String),

    /// Transcript serialization error.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, SolaceError>;
