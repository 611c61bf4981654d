use std::sync::Arc;

use super::common::*;
use crate::workflows::assessment::domain::{AnswerRecord, Attendance};
use crate::workflows::assessment::form::{AssessmentForm, FieldUpdate, FormStep, SubmitError};
use crate::workflows::assessment::prediction::outcome::PredictionSource;
use crate::workflows::assessment::prediction::resilient::ResilientPredictor;
use crate::workflows::assessment::service::AssessmentService;

#[tokio::test]
async fn submission_is_predicted_and_persisted() {
    let (service, store) = online_service();

    let receipt = service
        .submit_answers(complete_answers())
        .await
        .expect("complete answers submit");

    assert_eq!(receipt.source, PredictionSource::Remote);
    assert!(receipt.persisted);
    assert_eq!(receipt.assessment, remote_assessment());

    let saved = store.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].session_id, receipt.session_id);
    assert_eq!(saved[0].answers, complete_answers());
    assert_eq!(saved[0].outcome.source, PredictionSource::Remote);

    let latest = service.latest().await.expect("latest").expect("a saved session");
    assert_eq!(latest.session_id, receipt.session_id);
}

#[tokio::test]
async fn unavailable_model_still_yields_a_result() {
    let (service, store) = offline_service();

    let receipt = service
        .submit_answers(worst_case_answers())
        .await
        .expect("fallback result");

    assert_eq!(receipt.source, PredictionSource::Fallback);
    assert_eq!(receipt.assessment.risk_score, 100);
    assert_eq!(store.saved()[0].outcome.source, PredictionSource::Fallback);
    assert!(!service.prediction_service_healthy().await);
}

#[tokio::test]
async fn storage_failure_does_not_hide_the_result() {
    let service = AssessmentService::new(
        ResilientPredictor::new(StaticPredictor(remote_assessment())),
        Arc::new(UnavailableStore),
    );

    let receipt = service
        .submit_answers(complete_answers())
        .await
        .expect("result despite storage failure");

    assert!(!receipt.persisted);
    assert_eq!(receipt.assessment.risk_score, 48);
    assert!(service.latest().await.is_err());
}

#[tokio::test]
async fn missing_consent_is_rejected_before_prediction() {
    let (service, store) = online_service();
    let answers = AnswerRecord {
        consent_given: false,
        ..complete_answers()
    };

    let err = service
        .submit_answers(answers)
        .await
        .expect_err("consent required");

    assert_eq!(err, SubmitError::ConsentRequired);
    assert_eq!(err.to_string(), "Please provide consent to continue");
    assert!(store.saved().is_empty());
}

#[tokio::test]
async fn incomplete_step_is_reported() {
    let (service, store) = online_service();
    let answers = AnswerRecord {
        attendance: Some(Attendance::Unknown),
        ..complete_answers()
    };

    let err = service
        .submit_answers(answers)
        .await
        .expect_err("academic step incomplete");

    assert_eq!(
        err,
        SubmitError::IncompleteStep {
            step: FormStep::Academic
        }
    );
    assert!(store.saved().is_empty());
}

#[tokio::test]
async fn consent_without_data_processing_is_an_incomplete_consent_step() {
    let (service, _store) = online_service();
    let answers = AnswerRecord {
        consent_data_processing: false,
        ..complete_answers()
    };

    let err = service.submit_answers(answers).await.expect_err("gated");

    assert_eq!(
        err,
        SubmitError::IncompleteStep {
            step: FormStep::Consent
        }
    );
}

#[tokio::test]
async fn form_must_reach_final_step() {
    let (service, _store) = online_service();
    let mut form = AssessmentForm::new();
    form.update(FieldUpdate::ConsentGiven(true));

    let err = service.submit(&form).await.expect_err("still on consent");

    assert_eq!(
        err,
        SubmitError::NotOnFinalStep {
            step: FormStep::Consent
        }
    );
}

#[tokio::test]
async fn repeated_submissions_each_produce_a_session() {
    let (service, store) = offline_service();
    let mut form = AssessmentForm::prefilled(complete_answers());
    assert_eq!(form.advance_to_review(), FormStep::Services);

    let first = service.submit(&form).await.expect("first");
    let second = service.submit(&form).await.expect("second");

    assert_eq!(first.session_id, second.session_id);
    assert_eq!(store.saved().len(), 2);
    assert_eq!(service.history().await.expect("history").len(), 2);
}
