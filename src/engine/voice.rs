//! Voice and Synthesis Types
//!
//! Common types shared by the adapters, the router, and the HTTP surface.

use serde::{Deserialize, Serialize};

use super::catalog::Engine;

/// One language a voice can speak. The sequence order on a voice is display
/// priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCode {
    /// BCP-47 code, e.g. "en-US"
    pub code: String,
    /// Human-readable label, e.g. "English (US)"
    pub display: String,
}

impl LanguageCode {
    pub fn new(code: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display: display.into(),
        }
    }
}

/// Voice gender, upper-cased on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    Neutral,
}

/// A synthesizable voice. Ids are engine-scoped, not globally unique;
/// instances are immutable once produced by an adapter's list operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Engine-scoped voice ID
    pub id: String,

    /// Display name
    pub name: String,

    /// Owning engine
    pub engine: Engine,

    /// Languages in display-priority order
    #[serde(rename = "languageCodes")]
    pub language_codes: Vec<LanguageCode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    /// Preview audio URL, when the engine provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// Output audio container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Wav,
    Mp3,
}

impl AudioFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Mp3 => "audio/mp3",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.split(';').next().unwrap_or("").trim() {
            "audio/wav" | "audio/x-wav" | "audio/wave" => Some(AudioFormat::Wav),
            "audio/mp3" | "audio/mpeg" => Some(AudioFormat::Mp3),
            _ => None,
        }
    }
}

/// Per-request synthesis options. Unset fields are left at the adapter's
/// defaults, never zeroed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SynthesisOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<AudioFormat>,
}

/// Synthesized audio. Exclusively owned by the caller once returned; the
/// router keeps no reference.
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub audio: Vec<u8>,
    pub format: AudioFormat,
}

impl SynthesisResult {
    pub fn new(audio: Vec<u8>, format: AudioFormat) -> Self {
        Self { audio, format }
    }
}
