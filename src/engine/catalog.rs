//! Engine Catalog
//!
//! Static capability metadata for every known TTS engine. This is
//! configuration data, not logic: the catalog is immutable after process
//! start and total over the `Engine` enum, so lookups cannot fail for a
//! registered engine. Parsing a wire string is the only fallible entry
//! point and yields `TtsError::UnknownEngine`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::TtsError;
use super::mode::Mode;

/// Known TTS engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Engine {
    /// Microsoft Azure Cognitive Services
    Azure,
    /// ElevenLabs
    Elevenlabs,
    /// Google Cloud TTS
    Google,
    /// OpenAI TTS
    Openai,
    /// PlayHT
    Playht,
    /// Amazon Polly
    Polly,
    /// IBM Watson
    Watson,
    /// Meta Wit.ai
    Witai,
    /// eSpeak, server-side build
    Espeak,
    /// eSpeak compiled to WebAssembly
    EspeakWasm,
    /// SherpaOnnx neural TTS, server-side build
    Sherpaonnx,
    /// SherpaOnnx compiled to WebAssembly
    SherpaonnxWasm,
    /// Mock engine for testing
    Mock,
}

impl Engine {
    /// Every registered engine, in catalog order
    pub const ALL: [Engine; 13] = [
        Engine::Azure,
        Engine::Elevenlabs,
        Engine::Google,
        Engine::Openai,
        Engine::Playht,
        Engine::Polly,
        Engine::Watson,
        Engine::Witai,
        Engine::Espeak,
        Engine::EspeakWasm,
        Engine::Sherpaonnx,
        Engine::SherpaonnxWasm,
        Engine::Mock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Azure => "azure",
            Engine::Elevenlabs => "elevenlabs",
            Engine::Google => "google",
            Engine::Openai => "openai",
            Engine::Playht => "playht",
            Engine::Polly => "polly",
            Engine::Watson => "watson",
            Engine::Witai => "witai",
            Engine::Espeak => "espeak",
            Engine::EspeakWasm => "espeak-wasm",
            Engine::Sherpaonnx => "sherpaonnx",
            Engine::SherpaonnxWasm => "sherpaonnx-wasm",
            Engine::Mock => "mock",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "azure" => Ok(Engine::Azure),
            "elevenlabs" => Ok(Engine::Elevenlabs),
            "google" => Ok(Engine::Google),
            "openai" => Ok(Engine::Openai),
            "playht" => Ok(Engine::Playht),
            "polly" => Ok(Engine::Polly),
            "watson" => Ok(Engine::Watson),
            "witai" => Ok(Engine::Witai),
            "espeak" => Ok(Engine::Espeak),
            "espeak-wasm" => Ok(Engine::EspeakWasm),
            "sherpaonnx" => Ok(Engine::Sherpaonnx),
            "sherpaonnx-wasm" => Ok(Engine::SherpaonnxWasm),
            "mock" => Ok(Engine::Mock),
            other => Err(TtsError::UnknownEngine {
                name: other.to_string(),
            }),
        }
    }
}

/// Where an engine's synthesis logic physically executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineType {
    /// Runs on the server only
    Server,
    /// Runs in-process on the client only
    Browser,
    /// Can run in either place
    Hybrid,
}

/// Ordinal rating for voice count and quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Low,
    Medium,
    High,
}

/// Ordinal rating for synthesis speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Slow,
    Medium,
    Fast,
}

/// Ordinal rating for language coverage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCoverage {
    Limited,
    Good,
    Extensive,
}

/// Informational capability ratings. Not consulted by the selection logic,
/// which uses the static preference ordering instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub voice_count: Rating,
    pub quality: Rating,
    pub speed: Speed,
    pub languages: LanguageCoverage,
}

/// Capability metadata for one engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineProfile {
    pub id: Engine,
    pub name: &'static str,
    pub engine_type: EngineType,
    /// Server-side counterpart for engines shipped in two builds
    pub server_engine: Option<Engine>,
    /// Browser-side counterpart for engines shipped in two builds
    pub browser_engine: Option<Engine>,
    pub requires_credentials: bool,
    pub supports_offline: bool,
    pub description: &'static str,
    pub capabilities: Capabilities,
}

/// Capability metadata for `engine`. Total: every `Engine` has exactly one
/// profile.
pub fn profile(engine: Engine) -> &'static EngineProfile {
    match engine {
        Engine::Azure => &EngineProfile {
            id: Engine::Azure,
            name: "Microsoft Azure",
            engine_type: EngineType::Server,
            server_engine: None,
            browser_engine: None,
            requires_credentials: true,
            supports_offline: false,
            description: "High-quality neural voices from Microsoft Azure Cognitive Services",
            capabilities: Capabilities {
                voice_count: Rating::High,
                quality: Rating::High,
                speed: Speed::Fast,
                languages: LanguageCoverage::Extensive,
            },
        },
        Engine::Elevenlabs => &EngineProfile {
            id: Engine::Elevenlabs,
            name: "ElevenLabs",
            engine_type: EngineType::Server,
            server_engine: None,
            browser_engine: None,
            requires_credentials: true,
            supports_offline: false,
            description: "AI-powered voice synthesis with natural-sounding voices",
            capabilities: Capabilities {
                voice_count: Rating::Medium,
                quality: Rating::High,
                speed: Speed::Medium,
                languages: LanguageCoverage::Good,
            },
        },
        Engine::Google => &EngineProfile {
            id: Engine::Google,
            name: "Google Cloud TTS",
            engine_type: EngineType::Server,
            server_engine: None,
            browser_engine: None,
            requires_credentials: true,
            supports_offline: false,
            description: "Google Cloud Text-to-Speech with WaveNet voices",
            capabilities: Capabilities {
                voice_count: Rating::High,
                quality: Rating::High,
                speed: Speed::Fast,
                languages: LanguageCoverage::Extensive,
            },
        },
        Engine::Openai => &EngineProfile {
            id: Engine::Openai,
            name: "OpenAI TTS",
            engine_type: EngineType::Server,
            server_engine: None,
            browser_engine: None,
            requires_credentials: true,
            supports_offline: false,
            description: "OpenAI text-to-speech with natural voices",
            capabilities: Capabilities {
                voice_count: Rating::Low,
                quality: Rating::High,
                speed: Speed::Fast,
                languages: LanguageCoverage::Good,
            },
        },
        Engine::Playht => &EngineProfile {
            id: Engine::Playht,
            name: "PlayHT",
            engine_type: EngineType::Server,
            server_engine: None,
            browser_engine: None,
            requires_credentials: true,
            supports_offline: false,
            description: "AI voice generation platform with realistic voices",
            capabilities: Capabilities {
                voice_count: Rating::High,
                quality: Rating::High,
                speed: Speed::Medium,
                languages: LanguageCoverage::Good,
            },
        },
        Engine::Polly => &EngineProfile {
            id: Engine::Polly,
            name: "Amazon Polly",
            engine_type: EngineType::Server,
            server_engine: None,
            browser_engine: None,
            requires_credentials: true,
            supports_offline: false,
            description: "Amazon Polly text-to-speech service",
            capabilities: Capabilities {
                voice_count: Rating::High,
                quality: Rating::High,
                speed: Speed::Fast,
                languages: LanguageCoverage::Extensive,
            },
        },
        Engine::Watson => &EngineProfile {
            id: Engine::Watson,
            name: "IBM Watson",
            engine_type: EngineType::Server,
            server_engine: None,
            browser_engine: None,
            requires_credentials: true,
            supports_offline: false,
            description: "IBM Watson Text to Speech service",
            capabilities: Capabilities {
                voice_count: Rating::Medium,
                quality: Rating::High,
                speed: Speed::Medium,
                languages: LanguageCoverage::Good,
            },
        },
        Engine::Witai => &EngineProfile {
            id: Engine::Witai,
            name: "Wit.ai",
            engine_type: EngineType::Server,
            server_engine: None,
            browser_engine: None,
            requires_credentials: true,
            supports_offline: false,
            description: "Meta Wit.ai speech synthesis",
            capabilities: Capabilities {
                voice_count: Rating::Low,
                quality: Rating::Medium,
                speed: Speed::Medium,
                languages: LanguageCoverage::Limited,
            },
        },
        Engine::Espeak => &EngineProfile {
            id: Engine::Espeak,
            name: "eSpeak (Server)",
            engine_type: EngineType::Server,
            server_engine: Some(Engine::Espeak),
            browser_engine: Some(Engine::EspeakWasm),
            requires_credentials: false,
            supports_offline: true,
            description: "Open-source speech synthesizer (server-side)",
            capabilities: Capabilities {
                voice_count: Rating::Medium,
                quality: Rating::Medium,
                speed: Speed::Fast,
                languages: LanguageCoverage::Extensive,
            },
        },
        Engine::EspeakWasm => &EngineProfile {
            id: Engine::EspeakWasm,
            name: "eSpeak (Browser)",
            engine_type: EngineType::Browser,
            server_engine: Some(Engine::Espeak),
            browser_engine: Some(Engine::EspeakWasm),
            requires_credentials: false,
            supports_offline: true,
            description: "Open-source speech synthesizer (browser WebAssembly)",
            capabilities: Capabilities {
                voice_count: Rating::Medium,
                quality: Rating::Medium,
                speed: Speed::Fast,
                languages: LanguageCoverage::Extensive,
            },
        },
        Engine::Sherpaonnx => &EngineProfile {
            id: Engine::Sherpaonnx,
            name: "SherpaOnnx (Server)",
            engine_type: EngineType::Server,
            server_engine: Some(Engine::Sherpaonnx),
            browser_engine: Some(Engine::SherpaonnxWasm),
            requires_credentials: false,
            supports_offline: true,
            description: "High-quality neural TTS (server-side)",
            capabilities: Capabilities {
                voice_count: Rating::High,
                quality: Rating::High,
                speed: Speed::Medium,
                languages: LanguageCoverage::Extensive,
            },
        },
        Engine::SherpaonnxWasm => &EngineProfile {
            id: Engine::SherpaonnxWasm,
            name: "SherpaOnnx (Browser)",
            engine_type: EngineType::Browser,
            server_engine: Some(Engine::Sherpaonnx),
            browser_engine: Some(Engine::SherpaonnxWasm),
            requires_credentials: false,
            supports_offline: true,
            description: "High-quality neural TTS (browser WebAssembly)",
            capabilities: Capabilities {
                voice_count: Rating::High,
                quality: Rating::High,
                speed: Speed::Medium,
                languages: LanguageCoverage::Extensive,
            },
        },
        Engine::Mock => &EngineProfile {
            id: Engine::Mock,
            name: "Mock TTS",
            engine_type: EngineType::Hybrid,
            server_engine: None,
            browser_engine: None,
            requires_credentials: false,
            supports_offline: true,
            description: "Mock TTS engine for testing purposes",
            capabilities: Capabilities {
                voice_count: Rating::Low,
                quality: Rating::Low,
                speed: Speed::Fast,
                languages: LanguageCoverage::Limited,
            },
        },
    }
}

/// Engines usable from the server execution path (server or hybrid type)
pub fn server_engines() -> Vec<Engine> {
    Engine::ALL
        .iter()
        .copied()
        .filter(|e| {
            matches!(
                profile(*e).engine_type,
                EngineType::Server | EngineType::Hybrid
            )
        })
        .collect()
}

/// Engines usable from the in-process browser path (browser or hybrid type)
pub fn browser_engines() -> Vec<Engine> {
    Engine::ALL
        .iter()
        .copied()
        .filter(|e| {
            matches!(
                profile(*e).engine_type,
                EngineType::Browser | EngineType::Hybrid
            )
        })
        .collect()
}

/// Engines that can synthesize without network access
pub fn offline_engines() -> Vec<Engine> {
    Engine::ALL
        .iter()
        .copied()
        .filter(|e| profile(*e).supports_offline)
        .collect()
}

/// Engine types allowed for a mode. Hybrid mode is deliberately narrow:
/// only hybrid-typed engines can serve both halves of it.
pub fn engines_for_mode(mode: Mode) -> Vec<Engine> {
    match mode {
        Mode::Server => server_engines(),
        Mode::Browser => browser_engines(),
        Mode::Hybrid => Engine::ALL
            .iter()
            .copied()
            .filter(|e| profile(*e).engine_type == EngineType::Hybrid)
            .collect(),
        Mode::Auto => Engine::ALL.to_vec(),
    }
}
