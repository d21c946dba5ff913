//! Server-Side Execution
//!
//! The synthesis and voice-listing logic behind the HTTP routes, shared
//! with the CLI so `speak` runs the same path without a server round trip.

use tracing::warn;

use crate::adapters::{AdapterCache, SharedAdapter};
use crate::core::error::{Result, TtsError};
use crate::engine::catalog::{profile, Engine};
use crate::engine::voice::{AudioFormat, SynthesisOptions, SynthesisResult, Voice};
use crate::router::EnablementStore;

use super::credentials::CredentialStore;

/// Build the adapter for `engine` and gate on its credential check.
///
/// A credential check that *errors* (as opposed to reporting `false`) is
/// tolerated for offline-capable engines: missing model files or secrets
/// must not block a backend that can synthesize without them.
pub async fn ready_adapter(
    adapters: &AdapterCache,
    store: &CredentialStore,
    engine: Engine,
) -> Result<SharedAdapter> {
    if !store.is_enabled(engine) {
        return Err(TtsError::EngineUnavailable {
            engine: engine.to_string(),
            reason: "engine is disabled".to_string(),
        });
    }

    let adapter = adapters.get(engine).await?;

    match adapter.check_credentials().await {
        Ok(true) => {}
        Ok(false) => {
            return Err(TtsError::EngineUnavailable {
                engine: engine.to_string(),
                reason: format!("invalid credentials for {} TTS engine", engine),
            });
        }
        Err(e) => {
            if profile(engine).supports_offline {
                warn!(
                    engine = %engine,
                    error = %e,
                    "credential check failed for offline-capable engine, continuing"
                );
            } else {
                return Err(TtsError::EngineUnavailable {
                    engine: engine.to_string(),
                    reason: format!("credential check failed: {}", e),
                });
            }
        }
    }

    Ok(adapter)
}

/// List an engine's voices, re-tagged with the owning engine
pub async fn list_engine_voices(
    adapters: &AdapterCache,
    store: &CredentialStore,
    engine: Engine,
) -> Result<Vec<Voice>> {
    let adapter = ready_adapter(adapters, store, engine).await?;
    let voices = adapter.voices().await?;

    Ok(voices
        .into_iter()
        .map(|voice| Voice { engine, ..voice })
        .collect())
}

/// Synthesize text with an engine's voice
pub async fn synthesize_speech(
    adapters: &AdapterCache,
    store: &CredentialStore,
    engine: Engine,
    voice_id: &str,
    text: &str,
    options: &SynthesisOptions,
) -> Result<SynthesisResult> {
    let adapter = ready_adapter(adapters, store, engine).await?;

    adapter.set_voice(voice_id);
    if let Some(rate) = options.rate {
        adapter.set_property("rate", rate);
    }
    if let Some(pitch) = options.pitch {
        adapter.set_property("pitch", pitch);
    }
    if let Some(volume) = options.volume {
        adapter.set_property("volume", volume);
    }

    let audio = adapter.synth_to_bytes(text, options).await?;
    let format = options.format.unwrap_or(AudioFormat::Wav);
    Ok(SynthesisResult::new(audio, format))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_synthesis_end_to_end() {
        let adapters = AdapterCache::new();
        let store = CredentialStore::offline_only();

        let result = synthesize_speech(
            &adapters,
            &store,
            Engine::Mock,
            "mock-browser-voice-1",
            "Hello world",
            &SynthesisOptions::default(),
        )
        .await
        .unwrap();

        assert!(!result.audio.is_empty());
        assert_eq!(result.format, AudioFormat::Wav);
    }

    #[tokio::test]
    async fn test_cloud_engine_without_adapter_fails() {
        let adapters = AdapterCache::new();
        let store = CredentialStore::offline_only();

        let err = list_engine_voices(&adapters, &store, Engine::Azure)
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::EngineUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_disabled_engine_is_refused() {
        let adapters = AdapterCache::new();
        let store = CredentialStore::offline_only();
        store.set_enabled(Engine::Mock, false);

        let err = ready_adapter(&adapters, &store, Engine::Mock)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, TtsError::EngineUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_voices_are_tagged_with_engine() {
        let adapters = AdapterCache::new();
        let store = CredentialStore::offline_only();

        let voices = list_engine_voices(&adapters, &store, Engine::Sherpaonnx)
            .await
            .unwrap();
        assert!(!voices.is_empty());
        for voice in voices {
            assert_eq!(voice.engine, Engine::Sherpaonnx);
        }
    }
}
