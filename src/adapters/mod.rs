//! Engine Adapters
//!
//! The capability interface every TTS backend plugs into, plus the lazily
//! built per-engine adapter cache. The cache is an explicitly owned
//! component: construct one per hosting session and share it by `Arc`.

pub mod espeak_wasm;
pub mod mock;
pub mod sherpaonnx_wasm;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::OnceCell;

use crate::core::error::{Result, TtsError};
use crate::engine::catalog::Engine;
use crate::engine::voice::{SynthesisOptions, Voice};

pub use espeak_wasm::EspeakWasmAdapter;
pub use mock::MockAdapter;
pub use sherpaonnx_wasm::SherpaOnnxWasmAdapter;

/// Capability interface of a TTS backend.
///
/// The core treats every adapter polymorphically through this set,
/// regardless of which concrete backend it wraps. Credential-check failure
/// means "not ready", never a fatal condition for the system as a whole.
#[async_trait]
pub trait TtsAdapter: Send + Sync {
    /// Engine this adapter synthesizes for
    fn engine(&self) -> Engine;

    /// Whether the backend is ready to serve requests
    async fn check_credentials(&self) -> Result<bool>;

    /// List the voices the backend offers. Callers re-tag the owning
    /// engine themselves; adapters are not trusted to self-report it.
    async fn voices(&self) -> Result<Vec<Voice>>;

    /// Select the voice used by subsequent synthesis calls
    fn set_voice(&self, voice_id: &str);

    /// Set a named property ("rate", "pitch", "volume"). Properties not
    /// set keep the adapter's defaults.
    fn set_property(&self, property: &str, value: f32);

    /// Synthesize `text` into encoded audio bytes
    async fn synth_to_bytes(&self, text: &str, options: &SynthesisOptions) -> Result<Vec<u8>>;
}

/// Shared adapter handle
pub type SharedAdapter = Arc<dyn TtsAdapter>;

/// Mutable per-adapter voice/property state, shared behind the trait object
#[derive(Debug, Default)]
pub(crate) struct AdapterState {
    pub voice_id: Option<String>,
    pub rate: Option<f32>,
    pub pitch: Option<f32>,
    pub volume: Option<f32>,
}

impl AdapterState {
    pub fn set_property(state: &Mutex<AdapterState>, property: &str, value: f32) {
        let mut guard = match state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match property {
            "rate" => guard.rate = Some(value),
            "pitch" => guard.pitch = Some(value),
            "volume" => guard.volume = Some(value),
            other => tracing::debug!(property = other, "ignoring unknown adapter property"),
        }
    }
}

/// Lazily constructed adapter cache.
///
/// Construction is at-most-once per engine: concurrent callers share the
/// in-flight construction and receive the same instance. A construction
/// failure is reported to the caller and does not poison the slot - the
/// next call retries.
#[derive(Default)]
pub struct AdapterCache {
    cells: RwLock<HashMap<Engine, Arc<OnceCell<SharedAdapter>>>>,
}

impl AdapterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an in-process adapter exists for `engine`
    pub fn supported(engine: Engine) -> bool {
        matches!(
            engine,
            Engine::Mock
                | Engine::Espeak
                | Engine::EspeakWasm
                | Engine::Sherpaonnx
                | Engine::SherpaonnxWasm
        )
    }

    /// Pre-seed the cache with a custom adapter, replacing any built-in
    /// construction for its engine.
    pub fn register(&self, adapter: SharedAdapter) {
        let cell = OnceCell::new();
        let engine = adapter.engine();
        // A fresh cell cannot already be set
        let _ = cell.set(adapter);
        let mut cells = match self.cells.write() {
            Ok(cells) => cells,
            Err(poisoned) => poisoned.into_inner(),
        };
        cells.insert(engine, Arc::new(cell));
    }

    /// Get the adapter for `engine`, constructing it on first use
    pub async fn get(&self, engine: Engine) -> Result<SharedAdapter> {
        let cell = {
            let mut cells = match self.cells.write() {
                Ok(cells) => cells,
                Err(poisoned) => poisoned.into_inner(),
            };
            Arc::clone(
                cells
                    .entry(engine)
                    .or_insert_with(|| Arc::new(OnceCell::new())),
            )
        };

        cell.get_or_try_init(|| async move { construct(engine) })
            .await
            .map(Arc::clone)
    }
}

/// Built-in adapter construction. The server-side espeak and sherpaonnx
/// builds share their WASM siblings' synthesis core in this crate; cloud
/// engines have no in-process backend and live behind the remote path.
fn construct(engine: Engine) -> Result<SharedAdapter> {
    match engine {
        Engine::Mock => Ok(Arc::new(MockAdapter::new())),
        Engine::Espeak | Engine::EspeakWasm => Ok(Arc::new(EspeakWasmAdapter::new(engine))),
        Engine::Sherpaonnx | Engine::SherpaonnxWasm => {
            Ok(Arc::new(SherpaOnnxWasmAdapter::new(engine)))
        }
        other => Err(TtsError::EngineUnavailable {
            engine: other.to_string(),
            reason: "no in-process adapter; synthesis goes through the remote path".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_returns_same_instance() {
        let cache = AdapterCache::new();
        let first = cache.get(Engine::Mock).await.unwrap();
        let second = cache.get(Engine::Mock).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_concurrent_gets_share_construction() {
        let cache = Arc::new(AdapterCache::new());
        let a = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get(Engine::SherpaonnxWasm).await.unwrap() })
        };
        let b = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get(Engine::SherpaonnxWasm).await.unwrap() })
        };
        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn test_cloud_engine_has_no_local_adapter() {
        let cache = AdapterCache::new();
        let err = cache.get(Engine::Azure).await.err().unwrap();
        assert!(matches!(err, TtsError::EngineUnavailable { .. }));

        // Failure does not poison the slot; the next call gets the same
        // answer rather than a stale panic or a cached error.
        let err = cache.get(Engine::Azure).await.err().unwrap();
        assert!(matches!(err, TtsError::EngineUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_registered_adapter_wins() {
        let cache = AdapterCache::new();
        let custom: SharedAdapter = Arc::new(MockAdapter::new());
        cache.register(Arc::clone(&custom));
        let fetched = cache.get(Engine::Mock).await.unwrap();
        assert!(Arc::ptr_eq(&custom, &fetched));
    }

    #[test]
    fn test_supported_set() {
        assert!(AdapterCache::supported(Engine::Mock));
        assert!(AdapterCache::supported(Engine::EspeakWasm));
        assert!(AdapterCache::supported(Engine::Sherpaonnx));
        assert!(!AdapterCache::supported(Engine::Azure));
        assert!(!AdapterCache::supported(Engine::Witai));
    }
}
