use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::core::{
    AcceleratorResult, BlindSpot, BlindSpotSummary, InputProfile, ProfileError, ProjectionResult,
    ProjectionSettings, RealityTiers, RequiredCorpusRule, compute_accelerator, compute_blind_spots,
    compute_reality_tiers_with, project_with, summarize, validate_profile, validate_settings,
};

const INSUFFICIENT_DATA: &str = "insufficient data";

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliCorpusRule {
    ExpenseMultiple,
    Solved,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiCorpusRule {
    #[serde(alias = "expenseMultiple", alias = "expense_multiple")]
    ExpenseMultiple,
    #[serde(alias = "solvedNoDepletion", alias = "solved-no-depletion")]
    Solved,
}

impl From<ApiCorpusRule> for CliCorpusRule {
    fn from(value: ApiCorpusRule) -> Self {
        match value {
            ApiCorpusRule::ExpenseMultiple => CliCorpusRule::ExpenseMultiple,
            ApiCorpusRule::Solved => CliCorpusRule::Solved,
        }
    }
}

// Query strings carry the ladder as "55,50,45"; JSON bodies may use either form.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AgeList {
    Many(Vec<u32>),
    Csv(String),
}

impl AgeList {
    fn into_ages(self) -> Result<Vec<u32>, ApiError> {
        match self {
            AgeList::Many(ages) => Ok(ages),
            AgeList::Csv(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| {
                    part.parse::<u32>()
                        .map_err(|_| ApiError::InvalidAgeList(raw.clone()))
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProfilePayload {
    current_age: Option<u32>,
    retirement_age: Option<u32>,
    lifespan_age: Option<u32>,

    monthly_expenses: Option<f64>,
    #[serde(rename = "monthlySIP", alias = "monthlySip")]
    monthly_sip: Option<f64>,
    money_saved: Option<f64>,
    monthly_income: Option<f64>,

    expected_returns: Option<f64>,
    retirement_returns: Option<f64>,
    inflation_rate: Option<f64>,
    sip_increase_rate: Option<f64>,
    withdrawal_increase_rate: Option<f64>,

    required_corpus_rule: Option<ApiCorpusRule>,
    corpus_multiple: Option<f64>,
    survival_horizon_years: Option<u32>,
    aggressive_target_ages: Option<AgeList>,
    aggressive_min_years: Option<u32>,
    income_buffer: Option<f64>,
    income_stretch: Option<f64>,
}

impl ProfilePayload {
    fn has_blind_spot_inputs(&self) -> bool {
        self.current_age.is_some()
            && self.retirement_age.is_some()
            && self.monthly_expenses.is_some()
            && self.inflation_rate.is_some()
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "freedom",
    about = "Deterministic retirement corpus projection with gap, blind-spot and reality analysis"
)]
struct Cli {
    #[arg(long, default_value_t = 30)]
    current_age: u32,
    #[arg(long, default_value_t = 60)]
    retirement_age: u32,
    #[arg(long, default_value_t = 85, help = "Age to fund through")]
    lifespan_age: u32,
    #[arg(long, help = "Monthly expenses in today's money")]
    monthly_expenses: f64,
    #[arg(long, default_value_t = 0.0)]
    monthly_sip: f64,
    #[arg(long, default_value_t = 0.0, help = "Corpus already invested")]
    money_saved: f64,
    #[arg(long, help = "Net monthly income; enables the realistic optimizer")]
    monthly_income: Option<f64>,
    #[arg(
        long,
        default_value_t = 12.0,
        help = "Expected annual return before retirement in percent"
    )]
    expected_returns: f64,
    #[arg(
        long,
        default_value_t = 8.0,
        help = "Expected annual return after retirement in percent"
    )]
    retirement_returns: f64,
    #[arg(long, default_value_t = 6.0, help = "Expected annual inflation in percent")]
    inflation_rate: f64,
    #[arg(long, default_value_t = 0.0, help = "Annual SIP step-up in percent")]
    sip_increase_rate: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Annual withdrawal step-up in percent; inflation is used when higher"
    )]
    withdrawal_increase_rate: f64,
    #[arg(
        long,
        value_enum,
        default_value_t = CliCorpusRule::ExpenseMultiple,
        help = "Required corpus: multiple of annual expenses, or solved so the corpus never depletes"
    )]
    required_corpus_rule: CliCorpusRule,
    #[arg(
        long,
        default_value_t = 25.0,
        help = "Annual expense multiple used by --required-corpus-rule=expense-multiple"
    )]
    corpus_multiple: f64,
    #[arg(
        long,
        default_value_t = 15,
        help = "Years after retirement a depletion still counts as near-term danger"
    )]
    survival_horizon_years: u32,
    #[arg(long, value_delimiter = ',', default_values_t = [55, 50, 45, 40, 35])]
    aggressive_target_ages: Vec<u32>,
    #[arg(long, default_value_t = 5)]
    aggressive_min_years: u32,
    #[arg(
        long,
        default_value_t = 20_000.0,
        help = "Monthly living buffer added to the income an aggressive target requires"
    )]
    income_buffer: f64,
    #[arg(
        long,
        default_value_t = 1.3,
        help = "Income growth multiple still considered realistic"
    )]
    income_stretch: f64,
}

#[derive(Debug)]
struct ApiRequest {
    profile: InputProfile,
    settings: ProjectionSettings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportResponse {
    projection: ProjectionResult,
    accelerator: AcceleratorResult,
    blind_spots: Option<Vec<BlindSpot>>,
    blind_spot_summary: Option<BlindSpotSummary>,
    reality: RealityTiers,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BlindSpotsResponse {
    blind_spots: Option<Vec<BlindSpot>>,
    summary: Option<BlindSpotSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Error)]
enum ApiError {
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error("aggressiveTargetAges must be a list of whole ages, got {0:?}")]
    InvalidAgeList(String),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Args(#[from] clap::Error),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

fn build_profile(cli: Cli) -> Result<ApiRequest, ProfileError> {
    let profile = InputProfile {
        current_age: cli.current_age,
        retirement_age: cli.retirement_age,
        lifespan_age: cli.lifespan_age,
        monthly_expenses: cli.monthly_expenses,
        monthly_sip: cli.monthly_sip,
        money_saved: cli.money_saved,
        expected_returns: cli.expected_returns,
        retirement_returns: cli.retirement_returns,
        inflation_rate: cli.inflation_rate,
        sip_increase_rate: cli.sip_increase_rate,
        withdrawal_increase_rate: cli.withdrawal_increase_rate,
        monthly_income: cli.monthly_income,
    };
    validate_profile(&profile)?;

    let settings = ProjectionSettings {
        required_corpus_rule: match cli.required_corpus_rule {
            CliCorpusRule::ExpenseMultiple => RequiredCorpusRule::ExpenseMultiple {
                multiple: cli.corpus_multiple,
            },
            CliCorpusRule::Solved => RequiredCorpusRule::SolvedNoDepletion,
        },
        survival_horizon_years: cli.survival_horizon_years,
        aggressive_target_ages: cli.aggressive_target_ages,
        aggressive_min_years: cli.aggressive_min_years,
        income_buffer: cli.income_buffer,
        income_stretch: cli.income_stretch,
    };
    validate_settings(&settings)?;

    Ok(ApiRequest { profile, settings })
}

fn build_report(request: &ApiRequest) -> ReportResponse {
    let projection = project_with(&request.profile, &request.settings);
    let accelerator = compute_accelerator(&request.profile, &projection);
    let blind_spots = compute_blind_spots(&request.profile, &projection);
    let blind_spot_summary = blind_spots.as_deref().map(summarize);
    let reality = compute_reality_tiers_with(&request.profile, &projection, &request.settings);

    ReportResponse {
        projection,
        accelerator,
        blind_spots,
        blind_spot_summary,
        reality,
    }
}

pub fn run_report_cli<I, T>(args: I) -> Result<String, ReportError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    let request = build_profile(cli)?;
    let report = build_report(&request);
    Ok(serde_json::to_string_pretty(&report)?)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/project", analysis_route("project", project_handler_impl))
        .route(
            "/api/accelerator",
            analysis_route("accelerator", accelerator_handler_impl),
        )
        .route(
            "/api/blind-spots",
            analysis_route("blind-spots", blind_spots_handler_impl),
        )
        .route("/api/reality", analysis_route("reality", reality_handler_impl))
        .route("/api/report", analysis_route("report", report_handler_impl))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    log::info!("freedom HTTP API listening on http://{addr}");
    log::info!("local access: http://127.0.0.1:{port}/api/health");

    axum::serve(listener, app).await
}

/// GET reads the profile from the query string, POST from a JSON body.
fn analysis_route(name: &'static str, handler: fn(ProfilePayload) -> Response) -> MethodRouter {
    get(
        move |payload: Result<Query<ProfilePayload>, QueryRejection>| async move {
            log::info!("GET /api/{name}");
            match payload {
                Ok(Query(payload)) => handler(payload),
                Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
            }
        },
    )
    .post(
        move |payload: Result<Json<ProfilePayload>, JsonRejection>| async move {
            log::info!("POST /api/{name}");
            match payload {
                Ok(Json(payload)) => handler(payload),
                Err(rejection) => error_response(rejection.status(), &rejection.body_text()),
            }
        },
    )
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn project_handler_impl(payload: ProfilePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    };
    json_response(
        StatusCode::OK,
        project_with(&request.profile, &request.settings),
    )
}

fn accelerator_handler_impl(payload: ProfilePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    };
    let projection = project_with(&request.profile, &request.settings);
    json_response(
        StatusCode::OK,
        compute_accelerator(&request.profile, &projection),
    )
}

fn blind_spots_handler_impl(payload: ProfilePayload) -> Response {
    json_response(StatusCode::OK, blind_spots_body(payload))
}

fn blind_spots_body(payload: ProfilePayload) -> BlindSpotsResponse {
    let insufficient = |reason: String| BlindSpotsResponse {
        blind_spots: None,
        summary: None,
        reason: Some(reason),
    };

    if !payload.has_blind_spot_inputs() {
        return insufficient(INSUFFICIENT_DATA.to_string());
    }
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(err) => return insufficient(format!("{INSUFFICIENT_DATA}: {err}")),
    };

    let projection = project_with(&request.profile, &request.settings);
    match compute_blind_spots(&request.profile, &projection) {
        Some(spots) => BlindSpotsResponse {
            summary: Some(summarize(&spots)),
            blind_spots: Some(spots),
            reason: None,
        },
        None => insufficient(INSUFFICIENT_DATA.to_string()),
    }
}

fn reality_handler_impl(payload: ProfilePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    };
    let projection = project_with(&request.profile, &request.settings);
    json_response(
        StatusCode::OK,
        compute_reality_tiers_with(&request.profile, &projection, &request.settings),
    )
}

fn report_handler_impl(payload: ProfilePayload) -> Response {
    match api_request_from_payload(payload) {
        Ok(request) => json_response(StatusCode::OK, build_report(&request)),
        Err(err) => error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
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
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<ProfilePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload).map_err(|e| e.to_string())
}

fn api_request_from_payload(payload: ProfilePayload) -> Result<ApiRequest, ApiError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.current_age {
        cli.current_age = v;
    }
    if let Some(v) = payload.retirement_age {
        cli.retirement_age = v;
    }
    if let Some(v) = payload.lifespan_age {
        cli.lifespan_age = v;
    }

    if let Some(v) = payload.monthly_expenses {
        cli.monthly_expenses = v;
    }
    if let Some(v) = payload.monthly_sip {
        cli.monthly_sip = v;
    }
    if let Some(v) = payload.money_saved {
        cli.money_saved = v;
    }
    if let Some(v) = payload.monthly_income {
        cli.monthly_income = Some(v);
    }

    if let Some(v) = payload.expected_returns {
        cli.expected_returns = v;
    }
    if let Some(v) = payload.retirement_returns {
        cli.retirement_returns = v;
    }
    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.sip_increase_rate {
        cli.sip_increase_rate = v;
    }
    if let Some(v) = payload.withdrawal_increase_rate {
        cli.withdrawal_increase_rate = v;
    }

    if let Some(v) = payload.required_corpus_rule {
        cli.required_corpus_rule = v.into();
    }
    if let Some(v) = payload.corpus_multiple {
        cli.corpus_multiple = v;
    }
    if let Some(v) = payload.survival_horizon_years {
        cli.survival_horizon_years = v;
    }
    if let Some(v) = payload.aggressive_target_ages {
        cli.aggressive_target_ages = v.into_ages()?;
    }
    if let Some(v) = payload.aggressive_min_years {
        cli.aggressive_min_years = v;
    }
    if let Some(v) = payload.income_buffer {
        cli.income_buffer = v;
    }
    if let Some(v) = payload.income_stretch {
        cli.income_stretch = v;
    }

    build_profile(cli).map_err(ApiError::from)
}

fn default_cli_for_api() -> Cli {
    let settings = ProjectionSettings::default();
    Cli {
        current_age: 30,
        retirement_age: 60,
        lifespan_age: 85,
        monthly_expenses: 50_000.0,
        monthly_sip: 20_000.0,
        money_saved: 1_000_000.0,
        monthly_income: None,
        expected_returns: 12.0,
        retirement_returns: 8.0,
        inflation_rate: 6.0,
        sip_increase_rate: 0.0,
        withdrawal_increase_rate: 0.0,
        required_corpus_rule: CliCorpusRule::ExpenseMultiple,
        corpus_multiple: 25.0,
        survival_horizon_years: settings.survival_horizon_years,
        aggressive_target_ages: settings.aggressive_target_ages,
        aggressive_min_years: settings.aggressive_min_years,
        income_buffer: settings.income_buffer,
        income_stretch: settings.income_stretch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DepletionAge, RealisticPlan};

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

    #[test]
    fn api_request_from_json_parses_web_keys() {
        let json = r#"{
          "currentAge": 28,
          "retirementAge": 55,
          "lifespanAge": 90,
          "monthlyExpenses": 60000,
          "monthlySIP": 35000,
          "moneySaved": 500000,
          "monthlyIncome": 180000,
          "expectedReturns": 11,
          "retirementReturns": 7,
          "inflationRate": 5.5,
          "sipIncreaseRate": 10,
          "withdrawalIncreaseRate": 4,
          "requiredCorpusRule": "solved",
          "survivalHorizonYears": 10
        }"#;
        let request = api_request_from_json(json).expect("json should parse");
        let profile = request.profile;

        assert_eq!(profile.current_age, 28);
        assert_eq!(profile.retirement_age, 55);
        assert_eq!(profile.lifespan_age, 90);
        assert_approx(profile.monthly_expenses, 60_000.0);
        assert_approx(profile.monthly_sip, 35_000.0);
        assert_approx(profile.money_saved, 500_000.0);
        assert_eq!(profile.monthly_income, Some(180_000.0));
        assert_approx(profile.expected_returns, 11.0);
        assert_approx(profile.retirement_returns, 7.0);
        assert_approx(profile.inflation_rate, 5.5);
        assert_approx(profile.sip_increase_rate, 10.0);
        assert_approx(profile.withdrawal_increase_rate, 4.0);
        assert_eq!(
            request.settings.required_corpus_rule,
            RequiredCorpusRule::SolvedNoDepletion
        );
        assert_eq!(request.settings.survival_horizon_years, 10);
    }

    #[test]
    fn empty_payload_uses_defaults() {
        let request = api_request_from_json("{}").expect("defaults are valid");
        assert_eq!(request.profile.current_age, 30);
        assert_eq!(request.profile.retirement_age, 60);
        assert_eq!(request.profile.lifespan_age, 85);
        assert_eq!(request.profile.monthly_income, None);
        assert_eq!(request.settings, ProjectionSettings::default());
    }

    #[test]
    fn monthly_sip_accepts_lower_camel_alias() {
        let request = api_request_from_json(r#"{"monthlySip": 12000}"#).expect("alias parses");
        assert_approx(request.profile.monthly_sip, 12_000.0);
    }

    #[test]
    fn build_profile_rejects_retirement_not_after_current() {
        let mut cli = sample_cli();
        cli.retirement_age = cli.current_age;
        let err = build_profile(cli).expect_err("must reject");
        assert!(matches!(err, ProfileError::RetirementNotAfterCurrent { .. }));
    }

    #[test]
    fn build_profile_rejects_non_positive_corpus_multiple() {
        let mut cli = sample_cli();
        cli.corpus_multiple = 0.0;
        let err = build_profile(cli).expect_err("must reject");
        assert!(err.to_string().contains("corpusMultiple"));
    }

    #[test]
    fn cli_parses_flags_and_ladder() {
        let cli = Cli::try_parse_from([
            "freedom",
            "--monthly-expenses",
            "40000",
            "--required-corpus-rule",
            "solved",
            "--aggressive-target-ages",
            "50,45",
        ])
        .expect("flags parse");
        assert_eq!(cli.current_age, 30);
        assert_eq!(cli.required_corpus_rule, CliCorpusRule::Solved);
        assert_eq!(cli.aggressive_target_ages, vec![50, 45]);
        assert_approx(cli.income_stretch, 1.3);
    }

    #[test]
    fn query_string_accepts_comma_separated_ladder() {
        let uri: axum::http::Uri = "/api/reality?currentAge=35&aggressiveTargetAges=50,45"
            .parse()
            .expect("valid uri");
        let Query(payload) = Query::<ProfilePayload>::try_from_uri(&uri).expect("query parses");
        let request = api_request_from_payload(payload).expect("valid request");
        assert_eq!(request.profile.current_age, 35);
        assert_eq!(request.settings.aggressive_target_ages, vec![50, 45]);
    }

    #[test]
    fn json_ladder_accepts_array_or_string() {
        let request = api_request_from_json(r#"{"aggressiveTargetAges": [52, 48]}"#)
            .expect("array parses");
        assert_eq!(request.settings.aggressive_target_ages, vec![52, 48]);

        let request = api_request_from_json(r#"{"aggressiveTargetAges": "52, 48"}"#)
            .expect("string parses");
        assert_eq!(request.settings.aggressive_target_ages, vec![52, 48]);

        let err = api_request_from_json(r#"{"aggressiveTargetAges": "52,abc"}"#)
            .expect_err("must reject");
        assert!(err.contains("aggressiveTargetAges"));
    }

    #[test]
    fn out_of_range_age_is_bad_request() {
        let payload = ProfilePayload {
            current_age: Some(0),
            retirement_age: Some(400_000_000),
            lifespan_age: Some(400_000_000),
            ..ProfilePayload::default()
        };
        assert_eq!(
            accelerator_handler_impl(payload).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn cli_requires_monthly_expenses() {
        assert!(Cli::try_parse_from(["freedom"]).is_err());
    }

    #[test]
    fn invalid_profile_is_bad_request() {
        let payload = ProfilePayload {
            current_age: Some(60),
            retirement_age: Some(55),
            ..ProfilePayload::default()
        };
        let response = project_handler_impl(payload);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&HeaderValue::from_static("no-store"))
        );
    }

    #[test]
    fn valid_profile_is_ok() {
        assert_eq!(
            report_handler_impl(ProfilePayload::default()).status(),
            StatusCode::OK
        );
    }

    #[test]
    fn blind_spots_without_core_inputs_report_insufficient_data() {
        let payload = ProfilePayload {
            current_age: Some(30),
            retirement_age: Some(60),
            ..ProfilePayload::default()
        };
        let body = blind_spots_body(payload);
        assert!(body.blind_spots.is_none());
        assert_eq!(body.reason.as_deref(), Some(INSUFFICIENT_DATA));

        let json = serde_json::to_string(&body).expect("serializes");
        assert!(json.contains("\"blindSpots\":null"));
    }

    #[test]
    fn blind_spots_with_core_inputs_return_five_spots() {
        let payload = ProfilePayload {
            current_age: Some(30),
            retirement_age: Some(60),
            monthly_expenses: Some(50_000.0),
            inflation_rate: Some(6.0),
            ..ProfilePayload::default()
        };
        let body = blind_spots_body(payload);
        let spots = body.blind_spots.expect("spots computed");
        assert_eq!(spots.len(), 5);
        let summary = body.summary.expect("summary present");
        assert_eq!(summary.total, 5);
        assert!(body.reason.is_none());
    }

    #[test]
    fn report_serialization_contains_expected_fields() {
        let mut cli = sample_cli();
        cli.monthly_income = Some(40_000.0);
        cli.monthly_expenses = 45_000.0;
        let request = build_profile(cli).expect("valid profile");
        let report = build_report(&request);

        assert!(matches!(
            report.reality.realistic,
            RealisticPlan::Infeasible { .. }
        ));

        let json = serde_json::to_string(&report).expect("report should serialize");
        assert!(json.contains("\"projection\""));
        assert!(json.contains("\"expectedCorpus\""));
        assert!(json.contains("\"requiredMonthlySip\""));
        assert!(json.contains("\"accelerator\""));
        assert!(json.contains("\"blindSpots\""));
        assert!(json.contains("\"blindSpotSummary\""));
        assert!(json.contains("\"financialReality\""));
        assert!(json.contains("\"status\":\"infeasible\""));
    }

    #[test]
    fn report_cli_prints_json() {
        let json = run_report_cli([
            "report",
            "--monthly-expenses",
            "50000",
            "--monthly-sip",
            "20000",
            "--money-saved",
            "1000000",
        ])
        .expect("report renders");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        let rows = value["projection"]["rows"].as_array().expect("rows array");
        assert!(rows.len() >= 30);
        assert!(value["reality"]["realistic"]["status"] == "income-required");
    }

    #[test]
    fn report_cli_surfaces_profile_errors() {
        let err = run_report_cli([
            "report",
            "--monthly-expenses",
            "50000",
            "--retirement-age",
            "25",
        ])
        .expect_err("must reject");
        assert!(matches!(err, ReportError::Profile(_)));
    }

    #[test]
    fn projection_reports_depletion_sentinel() {
        let mut cli = sample_cli();
        cli.money_saved = 0.0;
        cli.monthly_sip = 0.0;
        let request = build_profile(cli).expect("valid profile");
        let projection = project_with(&request.profile, &request.settings);
        assert_eq!(projection.depletion_age, DepletionAge::Depleted(61));
    }
}
