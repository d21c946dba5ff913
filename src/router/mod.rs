//! Execution Router
//!
//! Dispatches voice-listing and synthesis requests to the in-process
//! adapter path or the remote HTTP path, according to the effective mode,
//! and retries synthesis through configured fallback modes - an explicit
//! two-iteration loop, at most one retry per direction, so a failing call
//! can never ping-pong between modes.

pub mod remote;

use std::sync::Arc;
use tracing::{debug, warn};

use crate::adapters::AdapterCache;
use crate::core::error::Result;
use crate::engine::catalog::{profile, Engine, EngineType};
use crate::engine::mode::{Environment, EnvironmentProbe, Mode, ModeResolver};
use crate::engine::selector::select_best;
use crate::engine::voice::{AudioFormat, SynthesisOptions, SynthesisResult, Voice};

pub use remote::{HttpRemoteClient, RemoteAudio, RemoteEndpoint, RemoteSynthesisRequest};

/// Read side of the credential/enablement store. The router only ever asks
/// which engines are enabled; secret validation belongs to the adapters.
pub trait EnablementStore: Send + Sync {
    fn enabled_engines(&self) -> Vec<Engine>;

    fn is_enabled(&self, engine: Engine) -> bool {
        self.enabled_engines().contains(&engine)
    }
}

/// Enablement store with a fixed engine list
#[derive(Debug, Clone, Default)]
pub struct StaticEnablement {
    pub engines: Vec<Engine>,
}

impl StaticEnablement {
    pub fn new(engines: impl Into<Vec<Engine>>) -> Self {
        Self {
            engines: engines.into(),
        }
    }
}

impl EnablementStore for StaticEnablement {
    fn enabled_engines(&self) -> Vec<Engine> {
        self.engines.clone()
    }
}

/// Router configuration
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Mode used when a call does not specify one
    pub preferred_mode: Mode,
    /// Retry a failed synthesis once through the browser path
    pub fallback_to_browser: bool,
    /// Retry a failed synthesis once through the server path
    pub fallback_to_server: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            preferred_mode: Mode::Auto,
            fallback_to_browser: true,
            fallback_to_server: true,
        }
    }
}

/// The caller-facing execution surface: mode resolution, engine pools,
/// voice listing, and synthesis with bounded fallback.
pub struct TtsRouter {
    probe: Arc<dyn EnvironmentProbe>,
    resolver: ModeResolver,
    adapters: Arc<AdapterCache>,
    remote: Arc<dyn RemoteEndpoint>,
    store: Arc<dyn EnablementStore>,
    options: RouterOptions,
}

impl TtsRouter {
    pub fn new(
        probe: Arc<dyn EnvironmentProbe>,
        adapters: Arc<AdapterCache>,
        remote: Arc<dyn RemoteEndpoint>,
        store: Arc<dyn EnablementStore>,
        options: RouterOptions,
    ) -> Self {
        Self {
            resolver: ModeResolver::new(Arc::clone(&probe)),
            probe,
            adapters,
            remote,
            store,
            options,
        }
    }

    pub fn resolver(&self) -> &ModeResolver {
        &self.resolver
    }

    /// Engines currently enabled in the store. Recomputed per call - the
    /// enabled set can change between calls and is never cached here.
    pub fn available_engines(&self) -> Vec<Engine> {
        self.store.enabled_engines()
    }

    /// Enabled engines runnable on the in-process browser path
    pub fn browser_engines(&self) -> Vec<Engine> {
        self.available_engines()
            .into_iter()
            .filter(|e| {
                matches!(
                    profile(*e).engine_type,
                    EngineType::Browser | EngineType::Hybrid
                ) && AdapterCache::supported(*e)
            })
            .collect()
    }

    /// Enabled engines reachable through the server path
    pub fn server_engines(&self) -> Vec<Engine> {
        self.available_engines()
            .into_iter()
            .filter(|e| {
                matches!(
                    profile(*e).engine_type,
                    EngineType::Server | EngineType::Hybrid
                )
            })
            .collect()
    }

    /// Mode a call will actually execute under
    pub fn effective_mode(&self, mode: Option<Mode>) -> Mode {
        let requested = mode.unwrap_or(self.options.preferred_mode);
        self.resolver
            .resolve_effective_mode(requested, &self.available_engines())
    }

    /// Enabled engines compatible with `mode` in the current environment
    pub fn compatible_engines(&self, mode: Mode) -> Vec<Engine> {
        self.resolver
            .compatible_engines(mode, &self.available_engines())
    }

    /// Best engine for a mode, or `None` when nothing is compatible
    pub fn best_engine_for_mode(&self, mode: Option<Mode>) -> Option<Engine> {
        let target = self.effective_mode(mode);
        let pool = match target {
            Mode::Browser => self.browser_engines(),
            Mode::Server => self.server_engines(),
            _ => self.available_engines(),
        };
        let compatible = self.resolver.compatible_engines(target, &pool);
        select_best(target, &compatible)
    }

    /// Whether `engine` can serve requests under `mode` right now
    pub async fn is_engine_available(&self, engine: Engine, mode: Option<Mode>) -> bool {
        if !self.store.is_enabled(engine) {
            return false;
        }

        let target = self.effective_mode(mode);
        let engine_type = profile(engine).engine_type;

        if target == Mode::Browser && engine_type == EngineType::Server {
            return false;
        }
        if target == Mode::Server
            && engine_type == EngineType::Browser
            && !self.probe.can_reach_network()
        {
            return false;
        }

        // Browser-path engines must actually construct
        if target == Mode::Browser || engine_type == EngineType::Browser {
            return AdapterCache::supported(engine) && self.adapters.get(engine).await.is_ok();
        }

        true
    }

    /// List the voices of one engine.
    ///
    /// Failures surface directly - voice enumeration is never silently
    /// retried through another mode; the caller decides what to do.
    pub async fn list_voices(&self, engine: Engine, mode: Option<Mode>) -> Result<Vec<Voice>> {
        let target = self.effective_mode(mode);
        let environment = self.probe.environment();

        let in_process = target == Mode::Browser
            || (target == Mode::Hybrid && environment == Environment::Browser);
        let engine_permits = profile(engine).engine_type != EngineType::Server;

        let voices = if in_process && engine_permits {
            let adapter = self.adapters.get(engine).await?;
            adapter.voices().await?
        } else {
            self.remote.fetch_voices(engine, target).await?
        };

        // Adapters are not trusted to self-report the owning engine
        Ok(voices
            .into_iter()
            .map(|voice| Voice { engine, ..voice })
            .collect())
    }

    /// List the voices of every engine in the mode's pool. Per-engine
    /// failures are logged and skipped; the result is a full replacement,
    /// not an incremental update.
    pub async fn list_all_voices(&self, mode: Option<Mode>) -> Vec<Voice> {
        let target = self.effective_mode(mode);
        let engines = match target {
            Mode::Browser => self.browser_engines(),
            Mode::Server => self.server_engines(),
            _ => self.available_engines(),
        };

        let mut all = Vec::new();
        for engine in engines {
            match self.list_voices(engine, Some(target)).await {
                Ok(voices) => all.extend(voices),
                Err(e) => warn!(engine = %engine, error = %e, "skipping voices for engine"),
            }
        }
        all
    }

    /// Synthesize `text` with `voice`.
    ///
    /// On failure, retries once per configured fallback direction (browser
    /// first, then server), skipping a direction when the primary attempt
    /// already ran under it or the engine is absent from that direction's
    /// pool. At most two attempts beyond the original; the final failure
    /// propagates unchanged.
    pub async fn synthesize(
        &self,
        text: &str,
        voice: &Voice,
        options: &SynthesisOptions,
        mode: Option<Mode>,
    ) -> Result<SynthesisResult> {
        let primary = self.effective_mode(mode);

        let mut last_err = match self.dispatch(text, voice, options, primary).await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        for direction in [Mode::Browser, Mode::Server] {
            let (enabled, pool) = match direction {
                Mode::Browser => (self.options.fallback_to_browser, self.browser_engines()),
                _ => (self.options.fallback_to_server, self.server_engines()),
            };

            if !enabled || primary == direction || !pool.contains(&voice.engine) {
                continue;
            }

            warn!(
                engine = %voice.engine,
                from = %primary,
                to = %direction,
                error = %last_err,
                "synthesis failed, retrying via fallback mode"
            );

            match self.dispatch(text, voice, options, direction).await {
                Ok(result) => return Ok(result),
                Err(e) => last_err = e,
            }
        }

        Err(last_err)
    }

    /// One synthesis attempt under a fixed mode, no fallback
    async fn dispatch(
        &self,
        text: &str,
        voice: &Voice,
        options: &SynthesisOptions,
        mode: Mode,
    ) -> Result<SynthesisResult> {
        let engine_type = profile(voice.engine).engine_type;
        let environment = self.probe.environment();

        let in_process = mode == Mode::Browser
            || (mode == Mode::Hybrid
                && environment == Environment::Browser
                && engine_type != EngineType::Server);

        if in_process {
            debug!(engine = %voice.engine, mode = %mode, "dispatching synthesis in-process");
            let adapter = self.adapters.get(voice.engine).await?;

            adapter.set_voice(&voice.id);
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
            Ok(SynthesisResult::new(audio, AudioFormat::Wav))
        } else {
            debug!(engine = %voice.engine, mode = %mode, "dispatching synthesis to remote endpoint");
            let request = RemoteSynthesisRequest {
                text: text.to_string(),
                engine: voice.engine,
                voice_id: voice.id.clone(),
                options: options.clone(),
            };

            let audio = self.remote.synthesize(&request).await?;
            let format = audio
                .content_type
                .as_deref()
                .and_then(AudioFormat::from_mime)
                .or(options.format)
                .unwrap_or_default();

            Ok(SynthesisResult::new(audio.bytes, format))
        }
    }
}
