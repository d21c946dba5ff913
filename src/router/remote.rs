//! Remote Execution Endpoint
//!
//! HTTP client for the server-side voices/synthesis endpoints the router's
//! remote path consumes. Non-2xx responses carry an `{ "error": string }`
//! JSON body; when that decodes, the upstream message is surfaced verbatim.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::error::{Result, TtsError};
use crate::engine::catalog::Engine;
use crate::engine::mode::Mode;
use crate::engine::voice::{SynthesisOptions, Voice};

/// Wire body for `POST /api/tts`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSynthesisRequest {
    pub text: String,
    pub engine: Engine,
    pub voice_id: String,
    #[serde(default)]
    pub options: SynthesisOptions,
}

/// Raw audio returned by the remote synthesis endpoint
#[derive(Debug, Clone)]
pub struct RemoteAudio {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// The remote half of the execution router. Production code talks HTTP;
/// tests substitute scripted implementations.
#[async_trait]
pub trait RemoteEndpoint: Send + Sync {
    async fn fetch_voices(&self, engine: Engine, mode: Mode) -> Result<Vec<Voice>>;

    async fn synthesize(&self, request: &RemoteSynthesisRequest) -> Result<RemoteAudio>;
}

#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    error: String,
}

/// Default request timeout, seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for a VoiceRoute server
pub struct HttpRemoteClient {
    client: Client,
    base_url: String,
}

impl HttpRemoteClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TtsError::Config {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into a typed failure carrying the
    /// server-reported message when one is present.
    async fn error_from_response(response: reqwest::Response) -> TtsError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let message = match serde_json::from_str::<RemoteErrorBody>(&body) {
            Ok(parsed) => parsed.error,
            Err(_) => format!("server responded with status {}", status),
        };

        TtsError::RemoteCallFailed {
            status: Some(status.as_u16()),
            message,
        }
    }
}

#[async_trait]
impl RemoteEndpoint for HttpRemoteClient {
    async fn fetch_voices(&self, engine: Engine, mode: Mode) -> Result<Vec<Voice>> {
        let response = self
            .client
            .get(self.url("/api/voices"))
            .query(&[("engine", engine.as_str()), ("mode", mode.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(response.json::<Vec<Voice>>().await?)
    }

    async fn synthesize(&self, request: &RemoteSynthesisRequest) -> Result<RemoteAudio> {
        let response = self
            .client
            .post(self.url("/api/tts"))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await?;

        Ok(RemoteAudio {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let client = HttpRemoteClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.url("/api/tts"), "http://localhost:8080/api/tts");
    }

    #[test]
    fn test_request_wire_shape() {
        let request = RemoteSynthesisRequest {
            text: "Hello".to_string(),
            engine: Engine::Azure,
            voice_id: "en-US-AriaNeural".to_string(),
            options: SynthesisOptions {
                rate: Some(1.2),
                ..Default::default()
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["engine"], "azure");
        assert_eq!(json["voiceId"], "en-US-AriaNeural");
        assert_eq!(json["options"]["rate"], 1.2);
    }
}
