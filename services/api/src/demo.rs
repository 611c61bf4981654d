use crate::infra::{load_answers, InMemorySessionStore};
use chrono::Local;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use student_risk::config::AppConfig;
use student_risk::error::AppError;
use student_risk::telemetry;
use student_risk::workflows::analytics::DashboardReport;
use student_risk::workflows::assessment::form::CONSENT_REQUIRED_MESSAGE;
use student_risk::workflows::assessment::{
    AcademicYear, AdvisorInteraction, AnswerRecord, AssessmentForm, AssessmentReceipt,
    AssessmentService, Attendance, EmploymentStatus, FallbackScorer, FieldUpdate,
    FileSessionStore, FinancialStress, FormStep, OverwhelmFrequency, RemotePredictor,
    ResilientPredictor, RiskPredictor, Scale, ScoreBreakdown, SessionStore, StudyHours,
    SupportService, WeeklyHours, WITHDRAWAL_REASON_OPTIONS,
};

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// JSON file holding a completed answer record
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Skip the remote model and score with the local fallback rules
    #[arg(long)]
    pub(crate) offline: bool,
    /// Print the receipt as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DashboardArgs {
    /// Print the dashboard as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the dashboard portion of the demo output.
    #[arg(long)]
    pub(crate) skip_dashboard: bool,
}

pub(crate) async fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        answers,
        offline,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init_for_cli(&config.telemetry)?;
    let answers = load_answers(&answers)?;
    let store = Arc::new(FileSessionStore::new(config.storage.directory.clone()));
    let breakdown = FallbackScorer::default().breakdown(&answers);

    let receipt = if offline {
        submit_with(FallbackScorer::default(), store, answers).await?
    } else {
        let predictor = RemotePredictor::new(config.prediction.clone())?;
        submit_with(predictor, store, answers).await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        render_receipt(&receipt, &breakdown);
        if receipt.persisted {
            println!(
                "Session stored under {}",
                config.storage.directory.display()
            );
        }
    }
    Ok(())
}

async fn submit_with<P, S>(
    predictor: P,
    store: Arc<S>,
    answers: AnswerRecord,
) -> Result<AssessmentReceipt, AppError>
where
    P: RiskPredictor + 'static,
    S: SessionStore + 'static,
{
    let service = AssessmentService::new(ResilientPredictor::new(predictor), store);
    Ok(service.submit_answers(answers).await?)
}

pub(crate) async fn run_health() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_for_cli(&config.telemetry)?;
    let predictor = RemotePredictor::new(config.prediction)?;

    if predictor.health_check().await {
        println!("Prediction service at {} is healthy", predictor.base_url());
    } else {
        println!(
            "Prediction service at {} is unavailable; assessments will use the local fallback scorer",
            predictor.base_url()
        );
    }
    Ok(())
}

pub(crate) fn run_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = FileSessionStore::new(config.storage.directory);
    let report = DashboardReport::build(&store.history()?);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_dashboard(&report);
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Student risk assessment demo");

    let store = Arc::new(InMemorySessionStore::default());
    let service = AssessmentService::new(
        ResilientPredictor::new(FallbackScorer::default()),
        store.clone(),
    );

    let mut form = AssessmentForm::new();
    println!("Session {}", form.session_id());
    print_step(&form);

    if !form.advance() {
        println!("  Next blocked: {CONSENT_REQUIRED_MESSAGE}");
    }
    form.update(FieldUpdate::ConsentGiven(true));
    form.update(FieldUpdate::ConsentDataProcessing(true));
    form.update(FieldUpdate::ConsentAnonymousAnalytics(true));
    advance(&mut form);

    form.update(FieldUpdate::AcademicYear(AcademicYear::Second));
    form.update(FieldUpdate::Attendance(Attendance::Sometimes));
    if !form.advance() {
        println!("  Next blocked: academic answers incomplete");
    }
    form.update(FieldUpdate::OverwhelmFrequency(OverwhelmFrequency::Often));
    form.update(FieldUpdate::StudyHours(StudyHours::OneToThree));
    form.update(FieldUpdate::PerformanceSatisfaction(Scale::new(4)));
    advance(&mut form);

    form.update(FieldUpdate::AdvisorInteraction(AdvisorInteraction::OnceSemester));
    form.update(FieldUpdate::SupportNetworkStrength(Scale::new(6)));
    form.update(FieldUpdate::ExtracurricularHours(WeeklyHours::new(3)));
    advance(&mut form);

    form.update(FieldUpdate::EmploymentStatus(EmploymentStatus::PartTime));
    form.update(FieldUpdate::FinancialStress(FinancialStress::High));
    form.update(FieldUpdate::CareerAlignment(Scale::new(7)));
    advance(&mut form);

    form.toggle_service(SupportService::Counseling);
    form.toggle_service(SupportService::None);
    println!("  Services after choosing None: {}", services_line(form.answers()));
    form.toggle_service(SupportService::Financial);
    form.toggle_service(SupportService::Academic);
    println!("  Services selected: {}", services_line(form.answers()));

    form.update(FieldUpdate::WithdrawalConsidered(true));
    if form.withdrawal_panel_visible() {
        form.toggle_withdrawal_reason(WITHDRAWAL_REASON_OPTIONS[1]);
        println!(
            "  Withdrawal reasons: {}",
            form.answers().effective_withdrawal_reasons().join(", ")
        );
    }

    let breakdown = service.predictor().fallback().breakdown(form.answers());
    let receipt = match service.submit(&form).await {
        Ok(receipt) => receipt,
        Err(err) => {
            println!("  Submission rejected: {}", err);
            return Ok(());
        }
    };
    println!();
    render_receipt(&receipt, &breakdown);

    if args.skip_dashboard {
        return Ok(());
    }

    println!();
    let report = DashboardReport::build(&store.history()?);
    render_dashboard(&report);
    Ok(())
}

fn advance(form: &mut AssessmentForm) {
    if form.advance() {
        print_step(form);
    } else {
        println!("  Next blocked on {}", form.step().title());
    }
}

fn print_step(form: &AssessmentForm) {
    let step = form.step();
    println!(
        "[{}/{}] {} ({:.0}% complete)",
        step.index() + 1,
        FormStep::COUNT,
        step.title(),
        form.progress()
    );
}

fn services_line(answers: &AnswerRecord) -> String {
    let labels: Vec<&str> = answers
        .services_used
        .iter()
        .map(SupportService::label)
        .collect();
    if labels.is_empty() {
        "(none selected)".to_string()
    } else {
        labels.join(", ")
    }
}

pub(crate) fn render_receipt(receipt: &AssessmentReceipt, breakdown: &ScoreBreakdown) {
    let assessment = &receipt.assessment;
    println!(
        "Assessment {} scored by {}",
        receipt.session_id,
        receipt.source.label()
    );
    println!(
        "- Risk {} | score {} | dropout probability {:.0}% | confidence {:.0}%",
        assessment.risk_level.label(),
        assessment.risk_score,
        assessment.dropout_probability * 100.0,
        assessment.model_confidence * 100.0
    );
    println!(
        "- Local rule points: attendance {} | overwhelm {} | financial {} | withdrawal {} | satisfaction {} (raw {})",
        breakdown.attendance,
        breakdown.overwhelm,
        breakdown.financial_stress,
        breakdown.withdrawal,
        breakdown.satisfaction,
        breakdown.raw_total()
    );

    if !assessment.risk_factors.is_empty() {
        println!("Risk factors:");
        for factor in &assessment.risk_factors {
            println!(
                "  - [{}] {} ({:?} impact): {}",
                factor.category, factor.factor, factor.impact, factor.description
            );
        }
    }

    println!("Recommendations:");
    for recommendation in &assessment.recommendations {
        println!(
            "  - {} ({}): {}",
            recommendation.title,
            recommendation.urgency.label(),
            recommendation.description
        );
        if let Some(contact) = &recommendation.contact {
            println!("    contact: {contact}");
        }
    }

    if !receipt.persisted {
        println!("Session could not be stored; results shown above were not saved");
    }
}

pub(crate) fn render_dashboard(report: &DashboardReport) {
    let stats = &report.stats;
    println!("Retention dashboard");
    println!(
        "- {} assessments | {} high / {} medium / {} low risk",
        stats.total_assessments,
        stats.high_risk_count,
        stats.medium_risk_count,
        stats.low_risk_count
    );
    println!(
        "- Average risk score {:.1} | {:.0}% scored by the local fallback",
        stats.average_risk_score,
        stats.fallback_share * 100.0
    );

    if !report.recent_assessments.is_empty() {
        println!("Recent assessments:");
        for entry in &report.recent_assessments {
            println!(
                "  - {} at {}: {} ({})",
                entry.session_id,
                entry.submitted_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                entry.risk_level.label(),
                entry.risk_score
            );
        }
    }

    println!("Weekly risk trend:");
    for point in &report.weekly_trend {
        println!(
            "  - {}: {}% high | {}% low",
            point.week, point.high_risk_pct, point.low_risk_pct
        );
    }

    println!("Risk factor prevalence:");
    for factor in &report.risk_factors {
        println!(
            "  - {}: {}% ({:?})",
            factor.name, factor.percentage, factor.trend
        );
    }

    let interventions: Vec<&str> = report
        .interventions
        .iter()
        .map(|intervention| intervention.name)
        .collect();
    println!("Intervention types: {}", interventions.join(", "));
}
