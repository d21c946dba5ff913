//! SherpaOnnx Adapter
//!
//! Placeholder build of the SherpaOnnx neural TTS. The server-side
//! `sherpaonnx` engine and the WebAssembly `sherpaonnx-wasm` engine share
//! this synthesis core. The credential check reports "not ready" when the
//! model directory is absent; callers treat that as non-fatal because the
//! engine is offline-capable.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

use crate::audio::{encode_wav_pcm16, harmonic_tone, PLACEHOLDER_SAMPLE_RATE};
use crate::core::error::Result;
use crate::engine::catalog::Engine;
use crate::engine::voice::{Gender, LanguageCode, SynthesisOptions, Voice};

use super::{AdapterState, TtsAdapter};

pub struct SherpaOnnxWasmAdapter {
    engine: Engine,
    /// Optional model directory; when set and missing, the credential
    /// check reports not-ready
    model_dir: Option<PathBuf>,
    state: Mutex<AdapterState>,
}

impl SherpaOnnxWasmAdapter {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            model_dir: std::env::var_os("SHERPAONNX_MODEL_DIR").map(PathBuf::from),
            state: Mutex::new(AdapterState::default()),
        }
    }
}

#[async_trait]
impl TtsAdapter for SherpaOnnxWasmAdapter {
    fn engine(&self) -> Engine {
        self.engine
    }

    async fn check_credentials(&self) -> Result<bool> {
        match &self.model_dir {
            Some(dir) => Ok(dir.is_dir()),
            // No configured model directory: the bundled placeholder model
            // is always available
            None => Ok(true),
        }
    }

    async fn voices(&self) -> Result<Vec<Voice>> {
        Ok(vec![
            Voice {
                id: "sherpa-jenny".to_string(),
                name: "SherpaOnnx Jenny (Neural)".to_string(),
                engine: self.engine,
                language_codes: vec![LanguageCode::new("en-US", "English (US)")],
                gender: Some(Gender::Female),
                preview: None,
            },
            Voice {
                id: "sherpa-ryan".to_string(),
                name: "SherpaOnnx Ryan (Neural)".to_string(),
                engine: self.engine,
                language_codes: vec![LanguageCode::new("en-US", "English (US)")],
                gender: Some(Gender::Male),
                preview: None,
            },
            Voice {
                id: "sherpa-multilingual".to_string(),
                name: "SherpaOnnx Multilingual".to_string(),
                engine: self.engine,
                language_codes: vec![
                    LanguageCode::new("en-US", "English (US)"),
                    LanguageCode::new("es-ES", "Spanish (Spain)"),
                    LanguageCode::new("fr-FR", "French (France)"),
                ],
                gender: Some(Gender::Neutral),
                preview: None,
            },
        ])
    }

    fn set_voice(&self, voice_id: &str) {
        debug!(engine = %self.engine, voice_id, "sherpaonnx: set voice");
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.voice_id = Some(voice_id.to_string());
    }

    fn set_property(&self, property: &str, value: f32) {
        debug!(engine = %self.engine, property, value, "sherpaonnx: set property");
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
        debug!(engine = %self.engine, ?voice_id, ?rate, ?pitch, "sherpaonnx: synthesizing");

        let mut samples = harmonic_tone(text);
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
    async fn test_voice_list_includes_multilingual() {
        let adapter = SherpaOnnxWasmAdapter::new(Engine::SherpaonnxWasm);
        let voices = adapter.voices().await.unwrap();
        assert_eq!(voices.len(), 3);
        let multi = voices.iter().find(|v| v.id == "sherpa-multilingual").unwrap();
        assert_eq!(multi.language_codes.len(), 3);
        // Order is display priority
        assert_eq!(multi.language_codes[0].code, "en-US");
    }

    #[tokio::test]
    async fn test_synthesis_longer_text_longer_audio() {
        let adapter = SherpaOnnxWasmAdapter::new(Engine::Sherpaonnx);
        let short = adapter
            .synth_to_bytes("Hi", &SynthesisOptions::default())
            .await
            .unwrap();
        let long = adapter
            .synth_to_bytes("A considerably longer sentence to synthesize", &SynthesisOptions::default())
            .await
            .unwrap();
        assert!(long.len() > short.len());
    }
}
