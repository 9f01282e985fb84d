//! Request handlers.

use crate::error::{ApiError, status_for};
use crate::html;
use crate::server::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use cbam_core::{EstimateReport, EstimateRequest, RawEstimateRequest};
use serde_json::{Value, json};

/// `GET /`: the input form.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.form_page.to_string())
}

/// `POST /compute`: run an estimate and render the dashboard.
///
/// Empty results are reported as a normal page, not an error status.
pub async fn compute(
    State(state): State<AppState>,
    Form(raw): Form<RawEstimateRequest>,
) -> Response {
    match estimate(&state, &raw).await {
        Ok(report) => Html(html::render_report(&report)).into_response(),
        Err(err) => {
            let status = if err.is_empty_result() {
                StatusCode::OK
            } else {
                status_for(&err)
            };
            if status.is_server_error() {
                tracing::warn!(error = %err, "Estimate failed");
            } else {
                tracing::debug!(error = %err, "Estimate rejected");
            }
            (status, Html(html::render_message(&html::error_message(&err)))).into_response()
        }
    }
}

/// `POST /api/estimate`: run an estimate and return it as JSON.
///
/// An unreadable body is reported as invalid input in the usual error shape.
pub async fn api_estimate(
    State(state): State<AppState>,
    payload: Result<Json<RawEstimateRequest>, JsonRejection>,
) -> Result<Json<EstimateReport>, ApiError> {
    let Json(raw) = payload.map_err(|rejection| {
        cbam_core::Error::invalid_input(format!("unreadable request body: {}", rejection.body_text()))
    })?;
    Ok(Json(estimate(&state, &raw).await?))
}

/// `GET /health`: liveness and reference-data counts.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let reference = state.estimator.context().reference();
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "factor_rows": reference.factors.len(),
        "commodities": reference.commodities.len(),
        "countries": reference.countries.len(),
    }))
}

async fn estimate(state: &AppState, raw: &RawEstimateRequest) -> cbam_core::Result<EstimateReport> {
    let request = EstimateRequest::parse(raw)?;
    state.estimator.estimate(&request).await
}
