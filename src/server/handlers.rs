use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::relay::{RelayError, ResponseEnvelope};
use crate::serp::SearchRequest;

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

/// Error reply, rendered as `{"detail": ...}`.
pub struct ApiError {
    status: StatusCode,
    detail: Value,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

fn api_error(status: StatusCode, detail: impl Into<Value>) -> ApiError {
    ApiError {
        status,
        detail: detail.into(),
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Upstream(failure) => {
                let detail = serde_json::to_value(&failure).unwrap_or_else(|_| Value::String(failure.message.clone()));
                api_error(StatusCode::BAD_REQUEST, detail)
            }
            RelayError::Config(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    }
}

// ─── POST /serp ──────────────────────────────────────────────────

pub async fn serp(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let start = Instant::now();

    let Json(request) = payload.map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, e.body_text()))?;
    if request.query.trim().is_empty() {
        return Err(api_error(StatusCode::UNPROCESSABLE_ENTITY, "'query' must not be empty"));
    }

    let caller_ip = peer.ip();
    let query = request.query.clone();

    let worker = state.clone();
    let result = match tokio::task::spawn_blocking(move || worker.relay.handle(&request, caller_ip)).await {
        Ok(outcome) => outcome.map_err(ApiError::from),
        Err(e) => Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    };

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    match &result {
        Ok(envelope) => tracing::info!(
            %caller_ip,
            %query,
            location = %envelope.detected_location,
            elapsed_ms,
            "POST /serp -> 200"
        ),
        Err(e) => tracing::info!(
            %caller_ip,
            %query,
            status = e.status.as_u16(),
            elapsed_ms,
            "POST /serp -> error"
        ),
    }

    result.map(Json)
}
