//! Mock TTS Adapter
//!
//! Always-available adapter producing a 440 Hz test tone. Used by the demo
//! UI and by tests that need a working engine without any backend.

use async_trait::async_trait;
use std::sync::Mutex;
use tracing::debug;

use crate::audio::{encode_wav_pcm16, mock_tone, PLACEHOLDER_SAMPLE_RATE};
use crate::core::error::Result;
use crate::engine::catalog::Engine;
use crate::engine::voice::{Gender, LanguageCode, SynthesisOptions, Voice};

use super::{AdapterState, TtsAdapter};

pub struct MockAdapter {
    state: Mutex<AdapterState>,
}

impl MockAdapter {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(AdapterState::default()),
        }
    }
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TtsAdapter for MockAdapter {
    fn engine(&self) -> Engine {
        Engine::Mock
    }

    async fn check_credentials(&self) -> Result<bool> {
        Ok(true)
    }

    async fn voices(&self) -> Result<Vec<Voice>> {
        Ok(vec![
            Voice {
                id: "mock-browser-voice-1".to_string(),
                name: "Mock Browser Voice 1".to_string(),
                engine: Engine::Mock,
                language_codes: vec![LanguageCode::new("en-US", "English (US)")],
                gender: Some(Gender::Female),
                preview: None,
            },
            Voice {
                id: "mock-browser-voice-2".to_string(),
                name: "Mock Browser Voice 2".to_string(),
                engine: Engine::Mock,
                language_codes: vec![LanguageCode::new("en-GB", "English (UK)")],
                gender: Some(Gender::Male),
                preview: None,
            },
        ])
    }

    fn set_voice(&self, voice_id: &str) {
        debug!(voice_id, "mock: set voice");
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.voice_id = Some(voice_id.to_string());
    }

    fn set_property(&self, property: &str, value: f32) {
        debug!(property, value, "mock: set property");
        AdapterState::set_property(&self.state, property, value);
    }

    async fn synth_to_bytes(&self, text: &str, _options: &SynthesisOptions) -> Result<Vec<u8>> {
        let (voice_id, rate, pitch, volume) = {
            let state = match self.state.lock() {
                Ok(state) => state,
                Err(poisoned) => poisoned.into_inner(),
            };
            (state.voice_id.clone(), state.rate, state.pitch, state.volume)
        };
        debug!(?voice_id, ?rate, ?pitch, "mock: synthesizing");

        let mut samples = mock_tone(text);
        if let Some(volume) = volume {
            let gain = volume.clamp(0.0, 1.0);
            for sample in &mut samples {
                *sample *= gain;
            }
        }

        Ok(encode_wav_pcm16(&samples, PLACEHOLDER_SAMPLE_RATE))
    }
}
