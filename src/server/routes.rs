//! HTTP Routes
//!
//! The remote execution endpoints the router consumes, plus catalog and
//! health routes. Every failure maps to an `{ "error": string }` JSON body.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::core::error::TtsError;
use crate::engine::catalog::{profile, Engine};
use crate::engine::mode::Mode;
use crate::engine::voice::Voice;
use crate::router::EnablementStore;

use super::exec;
use super::server_core::ServerState;
use super::types::{EngineDescriptor, ErrorResponse, HealthResponse, TtsRequestBody, VoicesQuery};

/// Route failure with its HTTP status mapping
pub enum ApiError {
    /// Malformed request input
    BadRequest(String),
    /// Execution failure
    Tts(TtsError),
}

impl From<TtsError> for ApiError {
    fn from(err: TtsError) -> Self {
        ApiError::Tts(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Tts(err) => {
                let status = match &err {
                    TtsError::UnknownEngine { .. } => StatusCode::BAD_REQUEST,
                    TtsError::EngineUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
                    TtsError::RemoteCallFailed { status, .. } => status
                        .and_then(|code| StatusCode::from_u16(code).ok())
                        .unwrap_or(StatusCode::BAD_GATEWAY),
                    TtsError::SynthesisFailed { .. }
                    | TtsError::Config { .. }
                    | TtsError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string())
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> ApiError {
    ApiError::BadRequest(message.into())
}

/// `GET /api/voices?engine=&mode=`
pub async fn get_voices(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<VoicesQuery>,
) -> Result<Json<Vec<Voice>>, ApiError> {
    let engine = Engine::from_str(&query.engine)?;

    // Mode travels with the request for observability; server-side
    // execution is the same either way.
    let mode = match query.mode.as_deref() {
        Some(raw) => Some(Mode::from_str(raw).map_err(|_| bad_request(format!("unknown mode: {}", raw)))?),
        None => None,
    };
    info!(engine = %engine, mode = ?mode, "listing voices");

    let voices = exec::list_engine_voices(&state.adapters, &state.store, engine).await?;
    Ok(Json(voices))
}

/// `POST /api/tts`
pub async fn post_tts(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<TtsRequestBody>,
) -> Result<Response, ApiError> {
    if body.text.is_empty() || body.voice_id.is_empty() {
        return Err(bad_request("missing required parameters"));
    }

    let engine = Engine::from_str(&body.engine)?;
    let request_id = uuid::Uuid::new_v4();
    info!(%request_id, engine = %engine, voice_id = %body.voice_id, "synthesis request");

    let result = exec::synthesize_speech(
        &state.adapters,
        &state.store,
        engine,
        &body.voice_id,
        &body.text,
        &body.options,
    )
    .await?;

    let response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, result.format.mime().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"tts-output.{}\"",
                    result.format.extension()
                ),
            ),
        ],
        result.audio,
    )
        .into_response();

    Ok(response)
}

/// `GET /api/engines`
pub async fn get_engines(State(state): State<Arc<ServerState>>) -> Json<Vec<EngineDescriptor>> {
    let descriptors = Engine::ALL
        .iter()
        .map(|engine| {
            let prof = profile(*engine);
            EngineDescriptor {
                id: *engine,
                name: prof.name.to_string(),
                engine_type: prof.engine_type,
                requires_credentials: prof.requires_credentials,
                supports_offline: prof.supports_offline,
                description: prof.description.to_string(),
                capabilities: prof.capabilities,
                enabled: state.store.is_enabled(*engine),
            }
        })
        .collect();

    Json(descriptors)
}

/// `GET /health`
pub async fn health_check(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        uptime: state.uptime().as_secs(),
        engines: state.store.enabled_engines(),
    })
}
