//! VoiceRoute TTS Server
//!
//! The HTTP surface behind the router's remote execution path:
//! - `GET /api/voices?engine=&mode=` - voice listing
//! - `POST /api/tts` - synthesis, raw audio bytes in the response body
//! - `GET /api/engines` - engine catalog with enablement flags
//! - `GET /health` - liveness

pub mod config;
pub mod credentials;
pub mod exec;
pub mod routes;
pub mod server_core;
pub mod types;

pub use config::{LoggingConfig, ServerConfig};
pub use credentials::{CredentialStatus, CredentialStore, EngineCredentials};
pub use server_core::{create_router, ServerState, TtsServer};
pub use types::{EngineDescriptor, ErrorResponse, HealthResponse, TtsRequestBody, VoicesQuery};
