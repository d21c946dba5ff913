//! Integration tests for the execution router
//!
//! Exercises routing, re-tagging, and the bounded fallback protocol with a
//! scripted remote endpoint and a deterministic environment probe.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use voiceroute_tts::adapters::{AdapterCache, TtsAdapter};
use voiceroute_tts::engine::catalog::Engine;
use voiceroute_tts::engine::mode::{Mode, StaticEnvironment};
use voiceroute_tts::engine::voice::{Gender, LanguageCode, SynthesisOptions, Voice};
use voiceroute_tts::router::{
    RemoteAudio, RemoteEndpoint, RemoteSynthesisRequest, RouterOptions, StaticEnablement,
    TtsRouter,
};
use voiceroute_tts::{Result, TtsError};

/// Remote endpoint with call counters and a scriptable failure switch
struct ScriptedRemote {
    voices_calls: AtomicUsize,
    synth_calls: AtomicUsize,
    fail: bool,
    /// Voices returned on success; note the deliberately wrong engine tag
    voices: Vec<Voice>,
}

impl ScriptedRemote {
    fn ok() -> Self {
        Self {
            voices_calls: AtomicUsize::new(0),
            synth_calls: AtomicUsize::new(0),
            fail: false,
            voices: vec![Voice {
                id: "remote-voice".to_string(),
                name: "Remote Voice".to_string(),
                // Wrong on purpose: the router must re-tag
                engine: Engine::Mock,
                language_codes: vec![LanguageCode::new("en-US", "English (US)")],
                gender: Some(Gender::Neutral),
                preview: None,
            }],
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::ok()
        }
    }

    fn voices_calls(&self) -> usize {
        self.voices_calls.load(Ordering::SeqCst)
    }

    fn synth_calls(&self) -> usize {
        self.synth_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteEndpoint for ScriptedRemote {
    async fn fetch_voices(&self, _engine: Engine, _mode: Mode) -> Result<Vec<Voice>> {
        self.voices_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TtsError::RemoteCallFailed {
                status: Some(500),
                message: "scripted failure".to_string(),
            });
        }
        Ok(self.voices.clone())
    }

    async fn synthesize(&self, _request: &RemoteSynthesisRequest) -> Result<RemoteAudio> {
        self.synth_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TtsError::RemoteCallFailed {
                status: Some(500),
                message: "scripted failure".to_string(),
            });
        }
        Ok(RemoteAudio {
            bytes: vec![1, 2, 3, 4],
            content_type: Some("audio/wav".to_string()),
        })
    }
}

/// Adapter that fails every synthesis, counting attempts
struct FailingAdapter {
    engine: Engine,
    synth_calls: AtomicUsize,
}

impl FailingAdapter {
    fn new(engine: Engine) -> Self {
        Self {
            engine,
            synth_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TtsAdapter for FailingAdapter {
    fn engine(&self) -> Engine {
        self.engine
    }

    async fn check_credentials(&self) -> Result<bool> {
        Ok(true)
    }

    async fn voices(&self) -> Result<Vec<Voice>> {
        Err(TtsError::EngineUnavailable {
            engine: self.engine.to_string(),
            reason: "always fails".to_string(),
        })
    }

    fn set_voice(&self, _voice_id: &str) {}

    fn set_property(&self, _property: &str, _value: f32) {}

    async fn synth_to_bytes(&self, _text: &str, _options: &SynthesisOptions) -> Result<Vec<u8>> {
        self.synth_calls.fetch_add(1, Ordering::SeqCst);
        Err(TtsError::SynthesisFailed {
            engine: self.engine.to_string(),
            message: "always fails".to_string(),
        })
    }
}

fn mock_voice() -> Voice {
    Voice {
        id: "mock-browser-voice-1".to_string(),
        name: "Mock Browser Voice 1".to_string(),
        engine: Engine::Mock,
        language_codes: vec![LanguageCode::new("en-US", "English (US)")],
        gender: Some(Gender::Female),
        preview: None,
    }
}

fn azure_voice() -> Voice {
    Voice {
        id: "en-US-AriaNeural".to_string(),
        name: "Aria".to_string(),
        engine: Engine::Azure,
        language_codes: vec![LanguageCode::new("en-US", "English (US)")],
        gender: Some(Gender::Female),
        preview: None,
    }
}

fn build_router(
    env: StaticEnvironment,
    enabled: Vec<Engine>,
    remote: Arc<ScriptedRemote>,
    adapters: Arc<AdapterCache>,
) -> TtsRouter {
    TtsRouter::new(
        Arc::new(env),
        adapters,
        remote,
        Arc::new(StaticEnablement::new(enabled)),
        RouterOptions::default(),
    )
}

#[tokio::test]
async fn browser_synthesis_makes_no_remote_calls() {
    let remote = Arc::new(ScriptedRemote::ok());
    let router = build_router(
        StaticEnvironment::browser(),
        vec![Engine::Mock],
        Arc::clone(&remote),
        Arc::new(AdapterCache::new()),
    );

    let result = router
        .synthesize(
            "Hello world",
            &mock_voice(),
            &SynthesisOptions::default(),
            Some(Mode::Browser),
        )
        .await
        .unwrap();

    assert!(!result.audio.is_empty());
    assert_eq!(remote.synth_calls(), 0);
    assert_eq!(remote.voices_calls(), 0);
}

#[tokio::test]
async fn remote_voices_are_retagged_with_requested_engine() {
    let remote = Arc::new(ScriptedRemote::ok());
    let router = build_router(
        StaticEnvironment::server(),
        vec![Engine::Azure],
        Arc::clone(&remote),
        Arc::new(AdapterCache::new()),
    );

    let voices = router
        .list_voices(Engine::Azure, Some(Mode::Server))
        .await
        .unwrap();

    assert_eq!(remote.voices_calls(), 1);
    assert!(!voices.is_empty());
    for voice in voices {
        assert_eq!(voice.engine, Engine::Azure);
    }
}

#[tokio::test]
async fn adapter_voices_are_retagged_too() {
    // Sherpaonnx (server build) shares the wasm adapter, whose voices are
    // tagged with the constructed engine; the router re-tags regardless.
    let remote = Arc::new(ScriptedRemote::ok());
    let router = build_router(
        StaticEnvironment::browser(),
        vec![Engine::SherpaonnxWasm],
        remote,
        Arc::new(AdapterCache::new()),
    );

    let voices = router
        .list_voices(Engine::SherpaonnxWasm, Some(Mode::Browser))
        .await
        .unwrap();

    assert_eq!(voices.len(), 3);
    for voice in voices {
        assert_eq!(voice.engine, Engine::SherpaonnxWasm);
    }
}

#[tokio::test]
async fn list_voices_failure_surfaces_without_fallback() {
    let remote = Arc::new(ScriptedRemote::failing());
    let router = build_router(
        StaticEnvironment::server(),
        vec![Engine::Mock],
        Arc::clone(&remote),
        Arc::new(AdapterCache::new()),
    );

    let err = router
        .list_voices(Engine::Mock, Some(Mode::Server))
        .await
        .unwrap_err();

    assert!(matches!(err, TtsError::RemoteCallFailed { status: Some(500), .. }));
    // Exactly one attempt: voice enumeration never retries another mode
    assert_eq!(remote.voices_calls(), 1);
}

#[tokio::test]
async fn failing_synthesis_is_bounded_to_two_fallback_attempts() {
    let remote = Arc::new(ScriptedRemote::failing());
    let adapters = Arc::new(AdapterCache::new());
    let failing = Arc::new(FailingAdapter::new(Engine::Mock));
    adapters.register(Arc::clone(&failing) as Arc<dyn TtsAdapter>);

    // Browser environment, hybrid primary: in-process attempt, then one
    // browser retry, then one server retry. Never more.
    let router = build_router(
        StaticEnvironment::browser(),
        vec![Engine::Mock],
        Arc::clone(&remote),
        adapters,
    );

    let err = router
        .synthesize(
            "Hello",
            &mock_voice(),
            &SynthesisOptions::default(),
            Some(Mode::Hybrid),
        )
        .await
        .unwrap_err();

    // Final failure propagates unchanged (the server retry failed last)
    assert!(matches!(err, TtsError::RemoteCallFailed { .. }));

    let in_process_attempts = failing.synth_calls.load(Ordering::SeqCst);
    let remote_attempts = remote.synth_calls();
    assert_eq!(in_process_attempts, 2, "primary hybrid + browser retry");
    assert_eq!(remote_attempts, 1, "server retry");
    assert_eq!(in_process_attempts + remote_attempts, 3);
}

#[tokio::test]
async fn fallback_skips_direction_already_attempted() {
    let remote = Arc::new(ScriptedRemote::failing());
    let adapters = Arc::new(AdapterCache::new());
    let failing = Arc::new(FailingAdapter::new(Engine::Mock));
    adapters.register(Arc::clone(&failing) as Arc<dyn TtsAdapter>);

    let router = build_router(
        StaticEnvironment::browser(),
        vec![Engine::Mock],
        Arc::clone(&remote),
        adapters,
    );

    // Primary browser: the browser direction must not retry itself
    let err = router
        .synthesize(
            "Hello",
            &mock_voice(),
            &SynthesisOptions::default(),
            Some(Mode::Browser),
        )
        .await
        .unwrap_err();

    assert!(err.is_recoverable());
    assert_eq!(failing.synth_calls.load(Ordering::SeqCst), 1);
    assert_eq!(remote.synth_calls(), 1);
}

#[tokio::test]
async fn failed_remote_synthesis_recovers_through_browser_path() {
    let remote = Arc::new(ScriptedRemote::failing());
    let router = build_router(
        StaticEnvironment::server(),
        vec![Engine::Mock],
        Arc::clone(&remote),
        Arc::new(AdapterCache::new()),
    );

    let result = router
        .synthesize(
            "Hello world",
            &mock_voice(),
            &SynthesisOptions::default(),
            Some(Mode::Server),
        )
        .await
        .unwrap();

    assert_eq!(remote.synth_calls(), 1);
    assert!(!result.audio.is_empty());
    assert_eq!(&result.audio[0..4], b"RIFF");
}

#[tokio::test]
async fn fallback_requires_engine_in_direction_pool() {
    // Azure is server-only: after a remote failure there is no browser
    // pool membership, so no retry happens at all.
    let remote = Arc::new(ScriptedRemote::failing());
    let router = build_router(
        StaticEnvironment::server(),
        vec![Engine::Azure],
        Arc::clone(&remote),
        Arc::new(AdapterCache::new()),
    );

    let err = router
        .synthesize(
            "Hello",
            &azure_voice(),
            &SynthesisOptions::default(),
            Some(Mode::Server),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TtsError::RemoteCallFailed { .. }));
    assert_eq!(remote.synth_calls(), 1);
}

#[tokio::test]
async fn server_mode_from_browser_uses_remote_path() {
    let remote = Arc::new(ScriptedRemote::ok());
    let router = build_router(
        StaticEnvironment::browser(),
        vec![Engine::Azure],
        Arc::clone(&remote),
        Arc::new(AdapterCache::new()),
    );

    // Network reachable: server mode stays server and goes remote
    assert_eq!(router.effective_mode(Some(Mode::Server)), Mode::Server);

    let result = router
        .synthesize(
            "Hello",
            &azure_voice(),
            &SynthesisOptions::default(),
            Some(Mode::Server),
        )
        .await
        .unwrap();

    assert_eq!(remote.synth_calls(), 1);
    assert_eq!(result.audio, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn auto_mode_picks_browser_engine_in_browser_environment() {
    let remote = Arc::new(ScriptedRemote::ok());
    let router = build_router(
        StaticEnvironment::browser(),
        vec![Engine::Azure, Engine::SherpaonnxWasm],
        remote,
        Arc::new(AdapterCache::new()),
    );

    assert_eq!(router.effective_mode(Some(Mode::Auto)), Mode::Browser);

    let compatible = router.compatible_engines(Mode::Auto);
    assert_eq!(compatible, vec![Engine::SherpaonnxWasm]);

    assert_eq!(
        router.best_engine_for_mode(Some(Mode::Auto)),
        Some(Engine::SherpaonnxWasm)
    );
}

#[tokio::test]
async fn nothing_enabled_resolves_to_hybrid_and_selects_nothing() {
    let remote = Arc::new(ScriptedRemote::ok());
    let router = build_router(
        StaticEnvironment::server(),
        vec![],
        remote,
        Arc::new(AdapterCache::new()),
    );

    assert_eq!(router.effective_mode(Some(Mode::Server)), Mode::Hybrid);
    assert!(router.compatible_engines(Mode::Server).is_empty());
    assert_eq!(router.best_engine_for_mode(Some(Mode::Server)), None);
}

#[tokio::test]
async fn list_all_voices_skips_failing_engines() {
    let remote = Arc::new(ScriptedRemote::failing());
    let adapters = Arc::new(AdapterCache::new());
    // Mock's adapter refuses to enumerate; sherpaonnx-wasm still answers
    adapters.register(Arc::new(FailingAdapter::new(Engine::Mock)));

    let router = build_router(
        StaticEnvironment::browser(),
        vec![Engine::Mock, Engine::SherpaonnxWasm],
        remote,
        adapters,
    );

    let voices = router.list_all_voices(Some(Mode::Browser)).await;
    assert_eq!(voices.len(), 3);
    assert!(voices.iter().all(|v| v.engine == Engine::SherpaonnxWasm));
}

#[tokio::test]
async fn unset_options_are_not_sent_as_zeroes() {
    // The adapter keeps its default amplitude when volume is unset; a
    // zeroed volume would produce silence and a different byte stream.
    let remote = Arc::new(ScriptedRemote::ok());
    let router = build_router(
        StaticEnvironment::browser(),
        vec![Engine::Mock],
        remote,
        Arc::new(AdapterCache::new()),
    );

    let unset = router
        .synthesize(
            "same text",
            &mock_voice(),
            &SynthesisOptions::default(),
            Some(Mode::Browser),
        )
        .await
        .unwrap();

    let silent = router
        .synthesize(
            "same text",
            &mock_voice(),
            &SynthesisOptions {
                volume: Some(0.0),
                ..Default::default()
            },
            Some(Mode::Browser),
        )
        .await
        .unwrap();

    assert_ne!(unset.audio, silent.audio);
}
