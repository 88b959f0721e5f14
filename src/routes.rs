use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error};

use crate::error::TranslateError;
use crate::models::{
    BulkItem, BulkTranslatePayload, BulkTranslationResponse, LogsResponse, TranslatePayload,
    TranslationResult,
};
use crate::state::AppState;

const BULK_SHAPE_DETAIL: &str = "Bulk body must be {\"requests\": [{\"text\", \"targetLanguage\"}, ...]} or {\"sentences\": [...], \"targetLanguage\": ...}";

/// Error returned to HTTP clients as `{ "detail": ... }`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl From<TranslateError> for ApiError {
    fn from(err: TranslateError) -> Self {
        let status = match &err {
            TranslateError::Validation(_) | TranslateError::UnsupportedLanguage(_) => {
                StatusCode::BAD_REQUEST
            }
            TranslateError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            TranslateError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            TranslateError::BadResponse(_) | TranslateError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request failed with {}: {}", self.status, self.detail);
        } else {
            debug!("Request rejected with {}: {}", self.status, self.detail);
        }
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub fn create_routes() -> Router<AppState> {
    let api = Router::new()
        .route("/health", get(health_check))
        .route("/translate", post(translate_text))
        .route("/translate/bulk", post(translate_bulk))
        // older clients post bulk requests here
        .route("/bulk-translate", post(translate_bulk))
        .route("/logs", get(get_logs));

    Router::new()
        .route("/", get(welcome))
        .merge(api.clone())
        .nest("/api", api)
}

/// Full application: routes, request tracing and CORS
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn welcome() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Project Udaan - Translation Microservice! POST /translate to get started."
    }))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "provider": state.pipeline.provider_name(),
        "logEntries": state.log_store.len(),
        "limits": {
            "maxTextChars": state.config.limits.max_text_chars,
            "maxBatchItems": state.config.limits.max_batch_items
        }
    }))
}

async fn translate_text(
    State(state): State<AppState>,
    payload: Result<Json<TranslatePayload>, JsonRejection>,
) -> Result<Json<TranslationResult>, ApiError> {
    let Json(payload) = payload?;
    let result = state
        .pipeline
        .translate_one(&payload.text, &payload.target_language)
        .await?;
    Ok(Json(result))
}

async fn translate_bulk(
    State(state): State<AppState>,
    payload: Result<Json<BulkTranslatePayload>, JsonRejection>,
) -> Result<Json<BulkTranslationResponse>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| match rejection {
        JsonRejection::JsonDataError(_) => ApiError {
            status: StatusCode::BAD_REQUEST,
            detail: BULK_SHAPE_DETAIL.to_string(),
        },
        other => other.into(),
    })?;
    let items = payload.into_items();
    let results = state.pipeline.translate_bulk(&items).await?;

    Ok(Json(BulkTranslationResponse {
        results: results.into_iter().map(BulkItem::into_result).collect(),
    }))
}

async fn get_logs(State(state): State<AppState>) -> Json<LogsResponse> {
    Json(LogsResponse {
        request_logs: state.log_store.list_all(),
    })
}
