//! Server Wire Types
//!
//! Request and response bodies for the HTTP surface. Engine names arrive
//! as raw strings and are parsed explicitly so unknown engines produce the
//! documented `{ "error": ... }` body instead of a generic decode failure.

use serde::{Deserialize, Serialize};

use crate::engine::catalog::{Capabilities, Engine, EngineType};
use crate::engine::voice::SynthesisOptions;

/// Body of `POST /api/tts`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsRequestBody {
    pub text: String,

    /// Engine name, parsed server-side
    pub engine: String,

    pub voice_id: String,

    #[serde(default)]
    pub options: SynthesisOptions,
}

/// Query parameters of `GET /api/voices`
#[derive(Debug, Clone, Deserialize)]
pub struct VoicesQuery {
    pub engine: String,

    #[serde(default)]
    pub mode: Option<String>,
}

/// Error body returned by every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Uptime in seconds
    pub uptime: u64,
    /// Engines currently enabled
    pub engines: Vec<Engine>,
}

/// Catalog entry projection for `GET /api/engines`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineDescriptor {
    pub id: Engine,
    pub name: String,
    #[serde(rename = "type")]
    pub engine_type: EngineType,
    pub requires_credentials: bool,
    pub supports_offline: bool,
    pub description: String,
    pub capabilities: Capabilities,
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tts_body_decodes_camel_case() {
        let body: TtsRequestBody = serde_json::from_str(
            r#"{"text":"Hello","engine":"mock","voiceId":"mock-browser-voice-1","options":{"rate":1.5}}"#,
        )
        .unwrap();
        assert_eq!(body.voice_id, "mock-browser-voice-1");
        assert_eq!(body.options.rate, Some(1.5));
    }

    #[test]
    fn test_options_default_when_absent() {
        let body: TtsRequestBody =
            serde_json::from_str(r#"{"text":"Hi","engine":"mock","voiceId":"v"}"#).unwrap();
        assert!(body.options.rate.is_none());
    }
}
