//! # VoiceRoute-TTS - Multi-Engine TTS Routing Framework
//!
//! Given a requested execution mode (server, browser, hybrid, auto) and a
//! pool of TTS engines with heterogeneous capabilities, VoiceRoute decides
//! which runtime environment is usable, which engines are compatible with
//! it, which single engine is best, and how to execute synthesis and
//! voice-listing requests against it - with bounded fallback on failure.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use voiceroute_tts::{
//!     AdapterCache, HttpRemoteClient, Mode, ProcessEnvironment, RouterOptions,
//!     StaticEnablement, TtsRouter, Engine,
//! };
//!
//! let router = TtsRouter::new(
//!     Arc::new(ProcessEnvironment),
//!     Arc::new(AdapterCache::new()),
//!     Arc::new(HttpRemoteClient::new("http://localhost:8080")?),
//!     Arc::new(StaticEnablement::new([Engine::Mock, Engine::SherpaonnxWasm])),
//!     RouterOptions::default(),
//! );
//!
//! let voices = router.list_voices(Engine::Mock, Some(Mode::Auto)).await?;
//! let result = router.synthesize("Hello world", &voices[0], &Default::default(), None).await?;
//! ```
//!
//! ## Mode Resolution
//!
//! `auto` is never executed directly: it resolves to `server`, `browser`,
//! or `hybrid` from the current environment and the enabled engine set.
//! An incompatible requested mode silently falls back to auto-detection;
//! the public API is total over modes by design.
//!
//! ## Engines
//!
//! | Engine | Type | Credentials | Offline |
//! |--------|------|-------------|---------|
//! | azure, elevenlabs, google, openai, playht, polly, watson, witai | server | yes | no |
//! | espeak / espeak-wasm | server / browser | no | yes |
//! | sherpaonnx / sherpaonnx-wasm | server / browser | no | yes |
//! | mock | hybrid | no | yes |

pub mod adapters;
pub mod audio;
pub mod core;
pub mod engine;
pub mod router;
pub mod server;

// Core re-exports
pub use crate::core::error::{Result, TtsError};

// Engine re-exports
pub use engine::{
    browser_engines, engines_for_mode, offline_engines, preference_order, profile, select_best,
    server_engines, AudioFormat, Capabilities, Engine, EngineProfile, EngineType, Environment,
    EnvironmentProbe, Gender, LanguageCode, LanguageCoverage, Mode, ModeInfo, ModeResolver,
    ProcessEnvironment, Rating, Speed, StaticEnvironment, SynthesisOptions, SynthesisResult,
    Voice,
};

// Adapter re-exports
pub use adapters::{
    AdapterCache, EspeakWasmAdapter, MockAdapter, SharedAdapter, SherpaOnnxWasmAdapter,
    TtsAdapter,
};

// Router re-exports
pub use router::{
    EnablementStore, HttpRemoteClient, RemoteAudio, RemoteEndpoint, RemoteSynthesisRequest,
    RouterOptions, StaticEnablement, TtsRouter,
};

// Server re-exports
pub use server::{CredentialStore, ServerConfig, TtsServer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Framework name
pub const FRAMEWORK_NAME: &str = "VoiceRoute-TTS";
