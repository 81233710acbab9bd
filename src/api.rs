use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::{OpenApi, ToSchema};

use crate::models::{Averages, WeatherObservation};
use crate::query::DateRange;
use crate::services::{ChatOutcome, ChatService, WeatherService, WeatherServiceError};

#[derive(Clone)]
pub struct AppState {
    pub chat_service: ChatService,
    pub weather_service: WeatherService,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    #[serde(default)]
    pub query: String,
}

/// Flattened chat outcome for clients that render a single card.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub success: bool,
    /// One of `weather_answer`, `clarification_needed`,
    /// `location_not_covered`, `service_unavailable`.
    pub kind: String,
    /// Headline for answers, the message otherwise.
    pub summary: String,
    pub explanation: Option<String>,
    pub source_note: Option<String>,
    pub chart_data: Vec<WeatherObservation>,
    pub averages: Option<Averages>,
    pub location: Option<String>,
    pub date_range: Option<String>,
    pub suggested_questions: Vec<String>,
}

impl ChatResponse {
    fn message(outcome_kind: &str, summary: String) -> Self {
        Self {
            success: false,
            kind: outcome_kind.to_string(),
            summary,
            explanation: None,
            source_note: None,
            chart_data: Vec::new(),
            averages: None,
            location: None,
            date_range: None,
            suggested_questions: Vec::new(),
        }
    }

    /// Map an outcome tag to its HTTP status and flattened body.
    pub fn from_outcome(outcome: ChatOutcome) -> (StatusCode, Self) {
        let kind = outcome.kind();
        match outcome {
            ChatOutcome::ClarificationNeeded {
                message,
                suggested_questions,
            } => (
                StatusCode::OK,
                ChatResponse {
                    success: true,
                    suggested_questions,
                    ..ChatResponse::message(kind, message)
                },
            ),
            ChatOutcome::LocationNotCovered { message, location } => (
                StatusCode::NOT_FOUND,
                ChatResponse {
                    location: Some(location),
                    ..ChatResponse::message(kind, message)
                },
            ),
            ChatOutcome::ServiceUnavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ChatResponse::message(kind, message),
            ),
            ChatOutcome::WeatherAnswer {
                headline,
                explanation,
                source_note,
                series,
                averages,
                location,
                date_range_label,
            } => (
                StatusCode::OK,
                ChatResponse {
                    success: true,
                    kind: kind.to_string(),
                    summary: headline,
                    explanation: Some(explanation),
                    source_note: Some(source_note),
                    chart_data: series.into_vec(),
                    averages: Some(averages),
                    location: Some(location),
                    date_range: Some(date_range_label),
                    suggested_questions: Vec::new(),
                },
            ),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WeatherRequest {
    #[serde(default)]
    pub location: String,
    /// `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationInfo {
    pub lat: f64,
    pub lon: f64,
    pub address: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WeatherResponse {
    pub location: LocationInfo,
    pub data: Vec<WeatherObservation>,
    pub averages: Averages,
    pub summary: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn parse_request_date(field: &str, value: Option<&str>) -> Result<NaiveDate, ApiError> {
    let value = value.map(str::trim).filter(|v| !v.is_empty()).ok_or_else(|| {
        api_error(StatusCode::BAD_REQUEST, format!("{} is required", field))
    })?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("{} must be a date in YYYY-MM-DD format", field),
        )
    })
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/weather", post(weather))
        .with_state(state);

    Router::new().nest("/api/v1", api_routes)
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
#[instrument(skip(_state))]
async fn health(State(_state): State<AppState>) -> impl IntoResponse {
    debug!("Health check requested");
    let response = HealthResponse {
        status: "healthy".to_string(),
    };
    (StatusCode::OK, Json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Narrated answer or clarification request", body = ChatResponse),
        (status = 400, description = "Blank query", body = ErrorResponse),
        (status = 404, description = "No data coverage for the location", body = ChatResponse),
        (status = 503, description = "Weather data service unavailable", body = ChatResponse)
    )
)]
#[instrument(skip(state, request))]
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<(StatusCode, Json<ChatResponse>), ApiError> {
    let query = request.query.trim();
    if query.is_empty() {
        warn!("Rejected blank chat query");
        return Err(api_error(StatusCode::BAD_REQUEST, "query must not be empty"));
    }

    debug!("Chat query: {}", query);
    let outcome = state.chat_service.handle(query, Utc::now().date_naive()).await;
    info!("Chat query answered with {}", outcome.kind());

    let (status, response) = ChatResponse::from_outcome(outcome);
    Ok((status, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/weather",
    request_body = WeatherRequest,
    responses(
        (status = 200, description = "Daily observations and averages", body = WeatherResponse),
        (status = 400, description = "Invalid location or dates", body = ErrorResponse),
        (status = 404, description = "No data coverage for the location", body = ErrorResponse),
        (status = 502, description = "Upstream returned no usable data", body = ErrorResponse),
        (status = 503, description = "Weather data service unavailable", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(location = %request.location))]
async fn weather(
    State(state): State<AppState>,
    Json(request): Json<WeatherRequest>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let location = request.location.trim();
    if location.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "location is required"));
    }
    let start = parse_request_date("start_date", request.start_date.as_deref())?;
    let end = parse_request_date("end_date", request.end_date.as_deref())?;
    if start > end {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "start_date must not be after end_date",
        ));
    }

    let range = DateRange { start, end };
    let report = state
        .weather_service
        .fetch(location, range)
        .await
        .map_err(|e| {
            error!("Weather request for {} failed: {}", location, e);
            let status = match e {
                WeatherServiceError::LocationNotCovered(_) => StatusCode::NOT_FOUND,
                WeatherServiceError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                WeatherServiceError::DataUnavailable(_) => StatusCode::BAD_GATEWAY,
            };
            api_error(status, e.to_string())
        })?;

    let averages = report.averages;
    let summary = format!(
        "{} days of NASA POWER data for {} ({}): average {}°C, {}mm precipitation, {} m/s wind.",
        report.series.len(),
        report.location.display_name,
        range.label(),
        averages.temperature,
        averages.precipitation,
        averages.wind_speed
    );
    info!("Returning {} observations for {}", report.series.len(), location);

    Ok(Json(WeatherResponse {
        location: LocationInfo {
            lat: report.location.lat,
            lon: report.location.lon,
            address: report.location.display_name,
        },
        data: report.series.into_vec(),
        averages,
        summary,
    }))
}

#[derive(OpenApi)]
#[openapi(
    paths(health, chat, weather),
    components(schemas(
        HealthResponse,
        ErrorResponse,
        ChatRequest,
        ChatResponse,
        WeatherRequest,
        WeatherResponse,
        LocationInfo,
        WeatherObservation,
        Averages
    )),
    info(
        title = "Weather Companion API",
        description = "Natural-language weather questions answered from NASA POWER satellite data"
    )
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
