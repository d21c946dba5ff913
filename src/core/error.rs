//! Structured error handling for VoiceRoute-TTS
//!
//! One taxonomy shared by the routing core, the adapters, and the HTTP
//! surface. Selection functions never return these - "no engine available"
//! is a normal outcome and is modeled as `None`/empty, not as an error.

use thiserror::Error;

/// Result type alias with TtsError
pub type Result<T> = std::result::Result<T, TtsError>;

/// Main error type for VoiceRoute-TTS
#[derive(Error, Debug, Clone)]
pub enum TtsError {
    /// Requested engine is not in the catalog
    #[error("unknown engine: {name}")]
    UnknownEngine { name: String },

    /// Engine is enabled but its adapter could not be constructed or its
    /// credential check failed
    #[error("engine {engine} unavailable: {reason}")]
    EngineUnavailable { engine: String, reason: String },

    /// Network/HTTP failure or non-2xx response on the remote path
    #[error("remote call failed: {message}")]
    RemoteCallFailed {
        /// Upstream HTTP status, when one was received
        status: Option<u16>,
        message: String,
    },

    /// Adapter-level failure during in-process synthesis
    #[error("synthesis failed on {engine}: {message}")]
    SynthesisFailed { engine: String, message: String },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Config { message: String },

    /// I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl TtsError {
    /// True when falling back to another mode may succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TtsError::EngineUnavailable { .. }
                | TtsError::RemoteCallFailed { .. }
                | TtsError::SynthesisFailed { .. }
        )
    }
}

impl From<std::io::Error> for TtsError {
    fn from(err: std::io::Error) -> Self {
        TtsError::Io {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for TtsError {
    fn from(err: reqwest::Error) -> Self {
        TtsError::RemoteCallFailed {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TtsError::UnknownEngine {
            name: "klingon-tts".to_string(),
        };
        assert_eq!(err.to_string(), "unknown engine: klingon-tts");

        let err = TtsError::RemoteCallFailed {
            status: Some(502),
            message: "bad gateway".to_string(),
        };
        assert!(err.to_string().contains("bad gateway"));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(TtsError::SynthesisFailed {
            engine: "mock".to_string(),
            message: "boom".to_string(),
        }
        .is_recoverable());

        assert!(!TtsError::Config {
            message: "bad yaml".to_string(),
        }
        .is_recoverable());
    }
}
