use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::domain::{AnswerRecord, SessionId};
use super::prediction::outcome::{PredictionOutcome, RiskLevel};

pub const STORAGE_SCHEMA_VERSION: u32 = 1;
pub const ASSESSMENT_KEY: &str = "assessment";
pub const PREDICTION_KEY: &str = "prediction";
pub const HISTORY_KEY: &str = "history";

/// A finished session handed off for the results view and analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub session_id: SessionId,
    pub submitted_at: DateTime<Utc>,
    pub answers: AnswerRecord,
    pub outcome: PredictionOutcome,
}

impl StoredSession {
    pub fn risk_level(&self) -> RiskLevel {
        self.outcome.assessment.risk_level
    }

    pub fn risk_score(&self) -> u8 {
        self.outcome.assessment.risk_score
    }
}

/// Persistence capability for submitted sessions.
pub trait SessionStore: Send + Sync {
    fn save(&self, session: &StoredSession) -> Result<(), StorageError>;
    fn latest(&self) -> Result<Option<StoredSession>, StorageError>;
    /// All saved sessions, oldest first.
    fn history(&self) -> Result<Vec<StoredSession>, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("session storage io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("session payload could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("'{key}' was written with schema version {found}, expected at most {supported}")]
    UnsupportedVersion {
        key: String,
        found: u64,
        supported: u32,
    },
    #[error("stored answers ({answers}) and prediction ({prediction}) belong to different sessions")]
    Inconsistent {
        answers: SessionId,
        prediction: SessionId,
    },
    #[error("session storage unavailable: {0}")]
    Unavailable(String),
}

/// Versioned wrapper written under each storage key.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    schema_version: u32,
    session_id: SessionId,
    submitted_at: DateTime<Utc>,
    payload: T,
}

#[derive(Debug, Serialize, Deserialize)]
struct HistoryPayload {
    answers: AnswerRecord,
    outcome: PredictionOutcome,
}

fn envelope<T>(session: &StoredSession, payload: T) -> Envelope<T> {
    Envelope {
        schema_version: STORAGE_SCHEMA_VERSION,
        session_id: session.session_id.clone(),
        submitted_at: session.submitted_at,
        payload,
    }
}

fn decode_envelope<T: DeserializeOwned>(key: &str, raw: &str) -> Result<Envelope<T>, StorageError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let found = value
        .get("schema_version")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0);
    if found == 0 || found > u64::from(STORAGE_SCHEMA_VERSION) {
        return Err(StorageError::UnsupportedVersion {
            key: key.to_string(),
            found,
            supported: STORAGE_SCHEMA_VERSION,
        });
    }
    Ok(serde_json::from_value(value)?)
}

/// A torn append leaves the log without its final newline.
fn lacks_trailing_newline(file: &mut fs::File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// File-backed store: one JSON document per key plus an append-only history log.
///
/// Saves and reads are serialized through one lock, so the `assessment` and `prediction`
/// keys always describe the same session. Clones share the lock.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    directory: PathBuf,
    guard: Arc<Mutex<()>>,
}

impl FileSessionStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            guard: Arc::new(Mutex::new(())),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StorageError> {
        self.guard
            .lock()
            .map_err(|_| StorageError::Unavailable("session store lock poisoned".to_string()))
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }

    fn history_path(&self) -> PathBuf {
        self.directory.join(format!("{HISTORY_KEY}.jsonl"))
    }

    fn write_key<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let target = self.key_path(key);
        let staging = self
            .directory
            .join(format!(".{key}.{}.tmp", Uuid::new_v4().simple()));
        fs::write(&staging, serde_json::to_vec_pretty(value)?)?;
        if let Err(err) = fs::rename(&staging, &target) {
            let _ = fs::remove_file(&staging);
            return Err(err.into());
        }
        Ok(())
    }

    fn read_key<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Envelope<T>>, StorageError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(raw) => decode_envelope(key, &raw).map(Some),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        fs::create_dir_all(&self.directory)?;

        self.write_key(ASSESSMENT_KEY, &envelope(session, &session.answers))?;
        self.write_key(PREDICTION_KEY, &envelope(session, &session.outcome))?;

        let line = serde_json::to_string(&envelope(
            session,
            HistoryPayload {
                answers: session.answers.clone(),
                outcome: session.outcome.clone(),
            },
        ))?;
        let mut history = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(self.history_path())?;
        if lacks_trailing_newline(&mut history)? {
            history.write_all(b"\n")?;
        }
        writeln!(history, "{line}")?;
        Ok(())
    }

    fn latest(&self) -> Result<Option<StoredSession>, StorageError> {
        let _guard = self.lock()?;
        let answers = self.read_key::<AnswerRecord>(ASSESSMENT_KEY)?;
        let prediction = self.read_key::<PredictionOutcome>(PREDICTION_KEY)?;

        let (answers, prediction) = match (answers, prediction) {
            (Some(answers), Some(prediction)) => (answers, prediction),
            _ => return Ok(None),
        };

        if answers.session_id != prediction.session_id {
            return Err(StorageError::Inconsistent {
                answers: answers.session_id,
                prediction: prediction.session_id,
            });
        }

        Ok(Some(StoredSession {
            session_id: answers.session_id,
            submitted_at: answers.submitted_at,
            answers: answers.payload,
            outcome: prediction.payload,
        }))
    }

    /// Lines that fail to decode, such as a torn trailing append, are logged and skipped.
    fn history(&self) -> Result<Vec<StoredSession>, StorageError> {
        let _guard = self.lock()?;
        let file = match fs::File::open(self.history_path()) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut sessions = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = match decode_envelope::<HistoryPayload>(HISTORY_KEY, &line) {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(line = index + 1, error = %err, "skipping unreadable history entry");
                    continue;
                }
            };
            sessions.push(StoredSession {
                session_id: entry.session_id,
                submitted_at: entry.submitted_at,
                answers: entry.payload.answers,
                outcome: entry.payload.outcome,
            });
        }
        Ok(sessions)
    }
}
