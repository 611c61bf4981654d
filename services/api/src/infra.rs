use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use student_risk::error::AppError;
use student_risk::workflows::assessment::{
    AnswerRecord, SessionStore, StorageError, StoredSession,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session store for demos.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<Vec<StoredSession>>>,
}

impl InMemorySessionStore {
    fn with_sessions<T>(
        &self,
        f: impl FnOnce(&mut Vec<StoredSession>) -> T,
    ) -> Result<T, StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|_| StorageError::Unavailable("session store lock poisoned".to_string()))?;
        Ok(f(&mut guard))
    }
}

impl SessionStore for InMemorySessionStore {
    fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
        self.with_sessions(|sessions| sessions.push(session.clone()))
    }

    fn latest(&self) -> Result<Option<StoredSession>, StorageError> {
        self.with_sessions(|sessions| sessions.last().cloned())
    }

    fn history(&self) -> Result<Vec<StoredSession>, StorageError> {
        self.with_sessions(|sessions| sessions.clone())
    }
}

pub(crate) fn load_answers(path: &Path) -> Result<AnswerRecord, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_answers_reads_partial_records() {
        let path = std::env::temp_dir().join(format!(
            "student-risk-answers-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"consent_given": true, "attendance": "often"}"#)
            .expect("write answers");

        let answers = load_answers(&path).expect("answers decode");
        std::fs::remove_file(&path).ok();

        assert!(answers.consent_given);
        assert!(answers.academic_year.is_none());
    }

    #[test]
    fn load_answers_rejects_malformed_json() {
        let path = std::env::temp_dir().join(format!(
            "student-risk-malformed-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{not json").expect("write answers");

        let result = load_answers(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(AppError::Payload(_))));
    }

    #[test]
    fn empty_in_memory_store_has_no_sessions() {
        let store = InMemorySessionStore::default();
        assert!(store.latest().expect("latest").is_none());
        assert!(store.history().expect("history").is_empty());
    }
}
