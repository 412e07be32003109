use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::{Args, Parser, Subcommand, ValueEnum};
use intake_gateway::assessments::{
    parse_explanation, transform, validate, AssessmentKind, AssessmentPayload, ExplanationDocument,
    Item, RawRecord, ResultViewModel,
};
use intake_gateway::config::AppConfig;
use intake_gateway::error::AppError;
use intake_gateway::predictor::PredictionClient;
use intake_gateway::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
    predictor: PredictionClient,
}

#[derive(Parser, Debug)]
#[command(
    name = "Health Risk Intake Gateway",
    about = "Run the intake gateway or exercise its assessment pipeline from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Validate and transform a raw intake record, optionally submitting it
    Assess(AssessArgs),
    /// Parse an explanation text file and print its document structure
    Explain(ExplainArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct AssessArgs {
    /// Assessment type the record belongs to
    #[arg(long, value_enum)]
    assessment: AssessmentArg,
    /// Path to a JSON object of raw form fields
    #[arg(long)]
    input: PathBuf,
    /// Submit the transformed payload to the configured prediction service
    #[arg(long)]
    submit: bool,
}

#[derive(Args, Debug)]
struct ExplainArgs {
    /// Path to a text file holding the explanation to parse
    #[arg(long)]
    input: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AssessmentArg {
    Diabetes,
    Heart,
}

impl From<AssessmentArg> for AssessmentKind {
    fn from(value: AssessmentArg) -> Self {
        match value {
            AssessmentArg::Diabetes => AssessmentKind::Diabetes,
            AssessmentArg::Heart => AssessmentKind::Heart,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Assess(args) => run_assess(args).await,
        Command::Explain(args) => run_explain(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = telemetry::metrics_pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        predictor: PredictionClient::new(&config.predictor)?,
    };

    let app = router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, predictor = %config.predictor.base_url, "intake gateway ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/assess/diabetes", post(assess_diabetes_endpoint))
        .route("/api/v1/assess/heart", post(assess_heart_endpoint))
        .with_state(state)
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn assess_diabetes_endpoint(
    State(state): State<AppState>,
    Json(raw): Json<RawRecord>,
) -> Result<Json<ResultViewModel>, AppError> {
    run_assessment(&state, AssessmentKind::Diabetes, &raw)
        .await
        .map(Json)
}

async fn assess_heart_endpoint(
    State(state): State<AppState>,
    Json(raw): Json<RawRecord>,
) -> Result<Json<ResultViewModel>, AppError> {
    run_assessment(&state, AssessmentKind::Heart, &raw)
        .await
        .map(Json)
}

async fn run_assessment(
    state: &AppState,
    kind: AssessmentKind,
    raw: &RawRecord,
) -> Result<ResultViewModel, AppError> {
    let payload = prepare_submission(kind, raw)?;
    let response = state.predictor.predict(kind, &payload).await?;
    info!(
        assessment = kind.label(),
        prediction = response.prediction,
        "prediction received"
    );
    Ok(response.to_view())
}

/// The offline half of the pipeline: validate, then transform. The
/// transformer is only ever reached with a record that validated
/// clean.
fn prepare_submission(kind: AssessmentKind, raw: &RawRecord) -> Result<AssessmentPayload, AppError> {
    let spec = kind.spec();
    let result = validate(raw, spec);
    if !result.is_ok() {
        return Err(AppError::Validation(result.into_errors()));
    }
    Ok(transform(raw, spec)?)
}

async fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let kind = AssessmentKind::from(args.assessment);
    let contents = std::fs::read_to_string(&args.input)?;
    let raw: RawRecord = serde_json::from_str(&contents)?;

    let payload = match prepare_submission(kind, &raw) {
        Ok(payload) => payload,
        Err(AppError::Validation(errors)) => {
            println!("{} record is incomplete:", kind.label());
            for (field, message) in &errors {
                println!("- {field}: {message}");
            }
            return Err(AppError::Validation(errors));
        }
        Err(err) => return Err(err),
    };

    println!("{} payload:", kind.label());
    println!("{}", serde_json::to_string_pretty(&payload)?);

    if args.submit {
        let config = AppConfig::load()?;
        let client = PredictionClient::new(&config.predictor)?;
        let response = client.predict(kind, &payload).await?;
        render_result(&response.to_view());
    }

    Ok(())
}

fn run_explain(args: ExplainArgs) -> Result<(), AppError> {
    let text = std::fs::read_to_string(&args.input)?;
    let document = parse_explanation(&text);

    if document.is_empty() {
        println!("No sections recognized in {}", args.input.display());
        return Ok(());
    }

    render_document(&document);
    Ok(())
}

fn render_result(view: &ResultViewModel) {
    println!("\nAssessment result");
    match (&view.label, view.verdict_positive) {
        (Some(label), _) => println!("Verdict: {label}"),
        (None, true) => println!("Verdict: elevated risk"),
        (None, false) => println!("Verdict: no elevated risk"),
    }

    if let Some(probability) = view.probability {
        println!("Probability: {:.2}%", probability * 100.0);
    }

    if view.contributors.is_empty() {
        println!("Contributing factors: none reported");
    } else {
        println!("\nContributing factors");
        for contributor in &view.contributors {
            println!(
                "- {} ({}): value {}, SHAP {:.3}",
                contributor.feature, contributor.impact_label, contributor.value, contributor.shap
            );
        }
    }

    if let Some(document) = &view.explanation {
        if !document.is_empty() {
            render_document(document);
        }
    }
}

fn render_document(document: &ExplanationDocument) {
    for section in &document.sections {
        println!("\n## {}", section.heading);
        for item in &section.items {
            match item {
                Item::Subheading { text } => println!("### {text}"),
                Item::Paragraph { text } => println!("{text}"),
                Item::Numbered { text, subitems } => {
                    println!("- {text}");
                    for subitem in subitems {
                        println!("    * {subitem}");
                    }
                }
            }
        }
    }
}
