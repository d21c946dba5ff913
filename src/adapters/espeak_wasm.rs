//! eSpeak Adapter
//!
//! Placeholder build of the eSpeak formant synthesizer. The server-side
//! `espeak` engine and the WebAssembly `espeak-wasm` engine share this
//! synthesis core; the owning engine is fixed at construction.

use async_trait::async_trait;
use std::sync::Mutex;
use tracing::debug;

use crate::audio::{encode_wav_pcm16, formant_tone, PLACEHOLDER_SAMPLE_RATE};
use crate::core::error::Result;
use crate::engine::catalog::Engine;
use crate::engine::voice::{Gender, LanguageCode, SynthesisOptions, Voice};

use super::{AdapterState, TtsAdapter};

pub struct EspeakWasmAdapter {
    engine: Engine,
    state: Mutex<AdapterState>,
}

impl EspeakWasmAdapter {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            state: Mutex::new(AdapterState::default()),
        }
    }
}

#[async_trait]
impl TtsAdapter for EspeakWasmAdapter {
    fn engine(&self) -> Engine {
        self.engine
    }

    async fn check_credentials(&self) -> Result<bool> {
        // No credentials needed for the open-source synthesizer
        Ok(true)
    }

    async fn voices(&self) -> Result<Vec<Voice>> {
        Ok(vec![
            Voice {
                id: "espeak-en-us".to_string(),
                name: "eSpeak English (US)".to_string(),
                engine: self.engine,
                language_codes: vec![LanguageCode::new("en-US", "English (US)")],
                gender: Some(Gender::Neutral),
                preview: None,
            },
            Voice {
                id: "espeak-en-gb".to_string(),
                name: "eSpeak English (UK)".to_string(),
                engine: self.engine,
                language_codes: vec![LanguageCode::new("en-GB", "English (UK)")],
                gender: Some(Gender::Neutral),
                preview: None,
            },
            Voice {
                id: "espeak-es".to_string(),
                name: "eSpeak Spanish".to_string(),
                engine: self.engine,
                language_codes: vec![LanguageCode::new("es-ES", "Spanish (Spain)")],
                gender: Some(Gender::Neutral),
                preview: None,
            },
        ])
    }

    fn set_voice(&self, voice_id: &str) {
        debug!(engine = %self.engine, voice_id, "espeak: set voice");
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.voice_id = Some(voice_id.to_string());
    }

    fn set_property(&self, property: &str, value: f32) {
        debug!(engine = %self.engine, property, value, "espeak: set property");
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
        debug!(engine = %self.engine, ?voice_id, ?rate, ?pitch, "espeak: synthesizing");

        let mut samples = formant_tone(text);
        if let Some(volume) = volume {
            let gain = volume.clamp(0.0, 1.0);
            for sample in &mut samples {
                *sample *= gain;
            }
        }

        Ok(encode_wav_pcm16(&samples, PLACEHOLDER_SAMPLE_RATE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_voices_carry_constructed_engine() {
        let wasm = EspeakWasmAdapter::new(Engine::EspeakWasm);
        for voice in wasm.voices().await.unwrap() {
            assert_eq!(voice.engine, Engine::EspeakWasm);
        }

        let server = EspeakWasmAdapter::new(Engine::Espeak);
        for voice in server.voices().await.unwrap() {
            assert_eq!(voice.engine, Engine::Espeak);
        }
    }

    #[tokio::test]
    async fn test_synthesis_non_empty() {
        let adapter = EspeakWasmAdapter::new(Engine::EspeakWasm);
        adapter.set_voice("espeak-en-us");
        let bytes = adapter
            .synth_to_bytes("testing", &SynthesisOptions::default())
            .await
            .unwrap();
        assert!(bytes.len() > 44);
    }
}
