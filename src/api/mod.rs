use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    CompoundingFrequency, ProjectionInputs, ProjectionResult, ScenarioResult, YearlyCheckpoint,
    build_comparison_scenarios, project,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliFrequency {
    Annually,
    Quarterly,
    Monthly,
    Daily,
}

impl From<CliFrequency> for CompoundingFrequency {
    fn from(value: CliFrequency) -> Self {
        match value {
            CliFrequency::Annually => CompoundingFrequency::Annually,
            CliFrequency::Quarterly => CompoundingFrequency::Quarterly,
            CliFrequency::Monthly => CompoundingFrequency::Monthly,
            CliFrequency::Daily => CompoundingFrequency::Daily,
        }
    }
}

impl From<CompoundingFrequency> for CliFrequency {
    fn from(value: CompoundingFrequency) -> Self {
        match value {
            CompoundingFrequency::Annually => CliFrequency::Annually,
            CompoundingFrequency::Quarterly => CliFrequency::Quarterly,
            CompoundingFrequency::Monthly => CliFrequency::Monthly,
            CompoundingFrequency::Daily => CliFrequency::Daily,
        }
    }
}

/// Request body / query parameters for `/api/project`. Every field is
/// optional; missing values fall back to the calculator's defaults. The
/// frequency arrives as periods per year (1, 4, 12 or 365), matching the
/// values of the frontend's select control.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    principal: Option<f64>,
    #[serde(alias = "rate")]
    annual_rate: Option<f64>,
    #[serde(alias = "time")]
    years: Option<u32>,
    #[serde(alias = "compoundingFrequency")]
    frequency: Option<u32>,
    monthly_contribution: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "compound",
    about = "Compound interest projector (monthly contributions + fixed comparison scenarios)"
)]
struct Cli {
    #[arg(long, default_value_t = 10_000.0, help = "Initial principal amount")]
    principal: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        help = "Annual interest rate in percent, e.g. 7"
    )]
    annual_rate: f64,
    #[arg(long, default_value_t = 10, help = "Investment horizon in years")]
    years: u32,
    #[arg(
        long,
        value_enum,
        default_value_t = CliFrequency::Monthly,
        help = "How often interest is nominally applied"
    )]
    frequency: CliFrequency,
    #[arg(
        long,
        default_value_t = 500.0,
        help = "Amount added to the balance at the start of every month"
    )]
    monthly_contribution: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioResponse {
    name: &'static str,
    final_amount: f64,
    interest_earned: f64,
    total_contributions: f64,
    delta_vs_plan: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    final_amount: f64,
    interest_earned: f64,
    total_contributions: f64,
    yearly_breakdown: Vec<YearlyCheckpoint>,
    scenarios: Vec<ScenarioResponse>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: Cli) -> Result<ProjectionInputs, String> {
    if !cli.principal.is_finite() || cli.principal < 0.0 {
        return Err("--principal must be >= 0".to_string());
    }

    if !cli.annual_rate.is_finite() || !(0.0..=100.0).contains(&cli.annual_rate) {
        return Err("--annual-rate must be between 0 and 100".to_string());
    }

    if !(1..=100).contains(&cli.years) {
        return Err("--years must be between 1 and 100".to_string());
    }

    if !cli.monthly_contribution.is_finite() || cli.monthly_contribution < 0.0 {
        return Err("--monthly-contribution must be >= 0".to_string());
    }

    Ok(ProjectionInputs {
        principal: cli.principal,
        annual_rate_percent: cli.annual_rate,
        years: cli.years,
        frequency: cli.frequency.into(),
        monthly_contribution: cli.monthly_contribution,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("Compound interest calculator listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_handler_impl(payload: ProjectPayload) -> Response {
    let inputs = match inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let primary = match project(&inputs) {
        Ok(result) => result,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };
    let scenarios = match build_comparison_scenarios(&inputs) {
        Ok(scenarios) => scenarios,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    json_response(StatusCode::OK, build_project_response(&primary, scenarios))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<ProjectionInputs, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload)
}

fn inputs_from_payload(payload: ProjectPayload) -> Result<ProjectionInputs, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.principal {
        cli.principal = v;
    }
    if let Some(v) = payload.annual_rate {
        cli.annual_rate = v;
    }
    if let Some(v) = payload.years {
        cli.years = v;
    }
    if let Some(v) = payload.frequency {
        let Some(frequency) = CompoundingFrequency::from_periods_per_year(v) else {
            return Err(
                "frequency must be 1 (annual), 4 (quarterly), 12 (monthly) or 365 (daily)"
                    .to_string(),
            );
        };
        cli.frequency = frequency.into();
    }
    if let Some(v) = payload.monthly_contribution {
        cli.monthly_contribution = v;
    }

    build_inputs(cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        principal: 10_000.0,
        annual_rate: 7.0,
        years: 10,
        frequency: CliFrequency::Monthly,
        monthly_contribution: 500.0,
    }
}

fn build_project_response(
    primary: &ProjectionResult,
    scenarios: [ScenarioResult; 3],
) -> ProjectResponse {
    ProjectResponse {
        final_amount: primary.final_balance,
        interest_earned: primary.total_interest_earned,
        total_contributions: primary.total_contributions,
        yearly_breakdown: primary.checkpoints.clone(),
        scenarios: scenarios
            .into_iter()
            .map(|scenario| ScenarioResponse {
                name: scenario.name,
                final_amount: scenario.final_amount,
                interest_earned: scenario.interest_earned,
                total_contributions: scenario.total_contributions,
                delta_vs_plan: scenario.final_amount - primary.final_balance,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_cli() -> Cli {
        default_cli_for_api()
    }

    fn assert_golden_snapshot(path: &str, actual: &str) {
        let update = matches!(
            std::env::var("UPDATE_GOLDEN").as_deref(),
            Ok("1") | Ok("true") | Ok("TRUE")
        );
        let snapshot_path = Path::new(path);

        if update {
            if let Some(parent) = snapshot_path.parent() {
                fs::create_dir_all(parent).expect("failed to create snapshot directory");
            }
            fs::write(snapshot_path, actual).expect("failed to write golden snapshot");
            return;
        }

        let expected = fs::read_to_string(snapshot_path).unwrap_or_else(|_| {
            panic!("missing golden snapshot at {path}; run with UPDATE_GOLDEN=1 to generate")
        });
        assert_eq!(
            actual, expected,
            "snapshot mismatch for {path}; run with UPDATE_GOLDEN=1 to refresh if expected"
        );
    }

    #[test]
    fn build_inputs_accepts_the_defaults() {
        let inputs = build_inputs(sample_cli()).expect("valid inputs");
        assert_approx(inputs.principal, 10_000.0);
        assert_approx(inputs.annual_rate_percent, 7.0);
        assert_eq!(inputs.years, 10);
        assert_eq!(inputs.frequency, CompoundingFrequency::Monthly);
        assert_approx(inputs.monthly_contribution, 500.0);
    }

    #[test]
    fn build_inputs_rejects_negative_principal() {
        let mut cli = sample_cli();
        cli.principal = -100.0;
        let err = build_inputs(cli).expect_err("must reject negative principal");
        assert!(err.contains("--principal"));
    }

    #[test]
    fn build_inputs_rejects_rate_out_of_range() {
        let mut cli = sample_cli();
        cli.annual_rate = 150.0;
        let err = build_inputs(cli).expect_err("must reject rate > 100");
        assert!(err.contains("--annual-rate"));

        let mut cli = sample_cli();
        cli.annual_rate = f64::NAN;
        let err = build_inputs(cli).expect_err("must reject NaN rate");
        assert!(err.contains("--annual-rate"));
    }

    #[test]
    fn build_inputs_rejects_years_out_of_range() {
        let mut cli = sample_cli();
        cli.years = 0;
        let err = build_inputs(cli).expect_err("must reject zero years");
        assert!(err.contains("--years"));

        let mut cli = sample_cli();
        cli.years = 101;
        let err = build_inputs(cli).expect_err("must reject > 100 years");
        assert!(err.contains("--years"));
    }

    #[test]
    fn build_inputs_rejects_negative_contribution() {
        let mut cli = sample_cli();
        cli.monthly_contribution = -1.0;
        let err = build_inputs(cli).expect_err("must reject negative contribution");
        assert!(err.contains("--monthly-contribution"));
    }

    #[test]
    fn inputs_from_json_parses_web_keys() {
        let json = r#"{
          "principal": 25000,
          "annualRate": 6.5,
          "years": 20,
          "frequency": 4,
          "monthlyContribution": 250
        }"#;
        let inputs = inputs_from_json(json).expect("json should parse");

        assert_approx(inputs.principal, 25_000.0);
        assert_approx(inputs.annual_rate_percent, 6.5);
        assert_eq!(inputs.years, 20);
        assert_eq!(inputs.frequency, CompoundingFrequency::Quarterly);
        assert_approx(inputs.monthly_contribution, 250.0);
    }

    #[test]
    fn inputs_from_json_accepts_legacy_aliases() {
        let json = r#"{ "rate": 4.0, "time": 15, "compoundingFrequency": 365 }"#;
        let inputs = inputs_from_json(json).expect("json should parse");
        assert_approx(inputs.annual_rate_percent, 4.0);
        assert_eq!(inputs.years, 15);
        assert_eq!(inputs.frequency, CompoundingFrequency::Daily);
        // Unspecified fields keep the calculator defaults.
        assert_approx(inputs.principal, 10_000.0);
        assert_approx(inputs.monthly_contribution, 500.0);
    }

    #[test]
    fn inputs_from_json_rejects_unsupported_frequency() {
        let err = inputs_from_json(r#"{ "frequency": 52 }"#)
            .expect_err("weekly compounding is not offered");
        assert!(err.contains("frequency must be"));
    }

    #[test]
    fn project_response_serialization_contains_expected_fields() {
        let inputs = build_inputs(sample_cli()).expect("valid inputs");
        let primary = project(&inputs).expect("projection succeeds");
        let scenarios = build_comparison_scenarios(&inputs).expect("scenarios succeed");
        let response = build_project_response(&primary, scenarios);

        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"finalAmount\""));
        assert!(json.contains("\"interestEarned\""));
        assert!(json.contains("\"totalContributions\""));
        assert!(json.contains("\"yearlyBreakdown\""));
        assert!(json.contains("\"cumulativeInterest\""));
        assert!(json.contains("\"scenarios\""));
        assert!(json.contains("\"deltaVsPlan\""));
        assert!(json.contains("\"No Monthly Contributions\""));
        assert!(json.contains("\"Lower Interest Rate (5%)\""));
        assert!(json.contains("\"Higher Interest Rate (10%)\""));
    }

    #[test]
    fn scenario_deltas_are_signed_against_the_primary_run() {
        let inputs = build_inputs(sample_cli()).expect("valid inputs");
        let primary = project(&inputs).expect("projection succeeds");
        let scenarios = build_comparison_scenarios(&inputs).expect("scenarios succeed");
        let response = build_project_response(&primary, scenarios);

        for scenario in &response.scenarios {
            assert_approx(
                scenario.delta_vs_plan,
                scenario.final_amount - response.final_amount,
            );
        }
        // At the 7% default the 5% scenario trails the plan and the 10%
        // scenario beats it.
        assert!(response.scenarios[1].delta_vs_plan < 0.0);
        assert!(response.scenarios[2].delta_vs_plan > 0.0);
    }

    #[test]
    fn golden_snapshot_default_monthly_json() {
        let inputs = build_inputs(sample_cli()).expect("valid inputs");
        let primary = project(&inputs).expect("projection succeeds");
        let scenarios = build_comparison_scenarios(&inputs).expect("scenarios succeed");
        let response = build_project_response(&primary, scenarios);
        let json = format!(
            "{}\n",
            serde_json::to_string(&response).expect("response should serialize")
        );

        assert_golden_snapshot("tests/golden/project_default_monthly.json", &json);
    }

    #[test]
    fn golden_snapshot_quarterly_json() {
        let mut cli = sample_cli();
        cli.years = 5;
        cli.frequency = CliFrequency::Quarterly;
        cli.monthly_contribution = 250.0;

        let inputs = build_inputs(cli).expect("valid inputs");
        let primary = project(&inputs).expect("projection succeeds");
        let scenarios = build_comparison_scenarios(&inputs).expect("scenarios succeed");
        let response = build_project_response(&primary, scenarios);
        let json = format!(
            "{}\n",
            serde_json::to_string(&response).expect("response should serialize")
        );

        assert_golden_snapshot("tests/golden/project_quarterly.json", &json);
    }
}
