use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use super::domain::{AnswerRecord, SessionId};
use super::form::{AssessmentForm, FormStep, SubmitError};
use super::prediction::outcome::{PredictionSource, RiskAssessment};
use super::prediction::resilient::ResilientPredictor;
use super::prediction::RiskPredictor;
use super::repository::{SessionStore, StorageError, StoredSession};

/// Result handed to the results view after a submission.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReceipt {
    pub session_id: SessionId,
    pub submitted_at: DateTime<Utc>,
    pub source: PredictionSource,
    pub persisted: bool,
    pub assessment: RiskAssessment,
}

/// Service composing the form gate, the resilient predictor, and the session store.
pub struct AssessmentService<P, S> {
    predictor: Arc<ResilientPredictor<P>>,
    store: Arc<S>,
}

impl<P, S> AssessmentService<P, S>
where
    P: RiskPredictor + 'static,
    S: SessionStore + 'static,
{
    pub fn new(predictor: ResilientPredictor<P>, store: Arc<S>) -> Self {
        Self {
            predictor: Arc::new(predictor),
            store,
        }
    }

    pub fn predictor(&self) -> &ResilientPredictor<P> {
        &self.predictor
    }

    /// Submit a form sitting on its final step.
    ///
    /// Prediction failures never surface here; a store failure is logged and reported through
    /// `persisted: false` so the student still sees the result.
    pub async fn submit(&self, form: &AssessmentForm) -> Result<AssessmentReceipt, SubmitError> {
        let submitted = form.submit()?;
        let outcome = self.predictor.assess(submitted.answers()).await;
        let (session_id, submitted_at, answers) = submitted.into_parts();

        let session = StoredSession {
            session_id: session_id.clone(),
            submitted_at,
            answers,
            outcome,
        };

        let pending = session.clone();
        let persisted = match self.with_store(move |store| store.save(&pending)).await {
            Ok(()) => true,
            Err(err) => {
                error!(session_id = %session_id, error = %err, "failed to persist assessment session");
                false
            }
        };

        info!(
            session_id = %session_id,
            risk_level = session.risk_level().label(),
            risk_score = session.risk_score(),
            source = session.outcome.source.label(),
            "assessment submitted"
        );

        Ok(AssessmentReceipt {
            session_id,
            submitted_at,
            source: session.outcome.source,
            persisted,
            assessment: session.outcome.assessment,
        })
    }

    /// Replay a complete answer record through every step gate, then submit it.
    pub async fn submit_answers(
        &self,
        answers: AnswerRecord,
    ) -> Result<AssessmentReceipt, SubmitError> {
        let mut form = AssessmentForm::prefilled(answers);
        let reached = form.advance_to_review();
        if reached != FormStep::Services {
            if reached == FormStep::Consent && !form.answers().consent_given {
                return Err(SubmitError::ConsentRequired);
            }
            return Err(SubmitError::IncompleteStep { step: reached });
        }
        self.submit(&form).await
    }

    pub async fn latest(&self) -> Result<Option<StoredSession>, StorageError> {
        self.with_store(|store| store.latest()).await
    }

    pub async fn history(&self) -> Result<Vec<StoredSession>, StorageError> {
        self.with_store(|store| store.history()).await
    }

    /// Run a store call on the blocking pool; stores do synchronous file I/O.
    async fn with_store<T, F>(&self, call: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> Result<T, StorageError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || call(store.as_ref()))
            .await
            .map_err(|err| StorageError::Unavailable(format!("storage task failed: {err}")))?
    }

    pub async fn prediction_service_healthy(&self) -> bool {
        self.predictor.primary_healthy().await
    }
}
