use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tax_core::{
    TaxError, TaxYearRegistry,
    api::{self, CalculationRequest, CalculationResponse, ErrorResponse, TaxYearsResponse},
};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<TaxYearRegistry>,
}

impl AppState {
    pub fn new(registry: TaxYearRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}

/// Errors surfaced to HTTP clients as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    /// Request failed validation: 400.
    Tax(TaxError),
    /// Body was not usable JSON; status comes from the rejection.
    Body(JsonRejection),
}

impl From<TaxError> for ApiError {
    fn from(err: TaxError) -> Self {
        Self::Tax(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Tax(err) => (StatusCode::BAD_REQUEST, ErrorResponse::from(&err)),
            ApiError::Body(rejection) => (
                rejection.status(),
                ErrorResponse {
                    error: rejection.body_text(),
                },
            ),
        };
        warn!(status = %status, error = %body.error, "request rejected");
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/calculator/calculate", post(calculate))
        .route("/api/calculator/tax-years", get(tax_years))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn calculate(
    State(state): State<AppState>,
    body: Result<Json<CalculationRequest>, JsonRejection>,
) -> Result<Json<CalculationResponse>, ApiError> {
    let Json(request) = body?;
    debug!(?request, "calculate");
    let response = api::calculate(&state.registry, &request)?;
    Ok(Json(response))
}

async fn tax_years(State(state): State<AppState>) -> Json<TaxYearsResponse> {
    Json(TaxYearsResponse::from(state.registry.as_ref()))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
