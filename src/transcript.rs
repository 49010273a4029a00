//! Append-only JSONL transcript.
//!
//! One JSON object per line, tagged by `event`: a `session_start` marker, a
//! `turn` per [`TurnRecord`], and a `session_end` marker carrying the
//! [`SessionSummary`].

use crate::engine::{Session, SessionSummary, TurnRecord};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// One transcript line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TranscriptEvent {
    SessionStart {
        session_id: Uuid,
        timestamp: DateTime<Utc>,
        lexicon_version: String,
    },
    Turn(TurnRecord),
    SessionEnd(SessionSummary),
}

impl TranscriptEvent {
    /// Start marker for a freshly opened session.
    #[must_use]
    pub fn session_start(session: &Session) -> Self {
        Self::SessionStart {
            session_id: session.id(),
            timestamp: session.started_at(),
            lexicon_version: session.engine().lexicon().version().to_owned(),
        }
    }
}

/// Appends events to a transcript file.
#[derive(Debug)]
pub struct TranscriptWriter {
    path: PathBuf,
    out: BufWriter<File>,
}

impl TranscriptWriter {
    /// Open `path` for appending, creating it and its parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or opened.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!(path = %path.display(), "transcript opened");
        Ok(Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
        })
    }

    /// Default location: `<data_dir>/solace/transcript.jsonl`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        crate::solace_dirs::transcript_file()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one event and flush it.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn append(&mut self, event: &TranscriptEvent) -> Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }

    /// Shorthand for appending a turn.
    ///
    /// # Errors
    ///
    /// See [`TranscriptWriter::append`].
    pub fn append_turn(&mut self, record: &TurnRecord) -> Result<()> {
        self.append(&TranscriptEvent::Turn(record.clone()))
    }
}

/// Read every event from a transcript file. Malformed lines are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_events(path: &Path) -> Result<Vec<TranscriptEvent>> {
    let reader = BufReader::new(File::open(path)?);
    let mut events = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(event) => events.push(event),
            Err(e) => warn!(line = n + 1, "skipping malformed transcript line: {e}"),
        }
    }
    Ok(events)
}
