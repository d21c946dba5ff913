//! Execution Modes and Mode Resolution
//!
//! Decides which runtime environment is usable and which execution mode a
//! request effectively runs under. Mode mismatch is never an error: an
//! incompatible requested mode silently falls back to auto-detection, and
//! the fallback is reported as a log event only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

use crate::core::error::TtsError;
use super::catalog::{engines_for_mode, profile, Engine, EngineType};

/// Requested execution context for a synthesis or voice-listing call.
///
/// `Auto` is a request-side value only; it is always resolved to one of the
/// other three before execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Server,
    Browser,
    Hybrid,
    #[default]
    Auto,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Server => "server",
            Mode::Browser => "browser",
            Mode::Hybrid => "hybrid",
            Mode::Auto => "auto",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "server" => Ok(Mode::Server),
            "browser" => Ok(Mode::Browser),
            "hybrid" => Ok(Mode::Hybrid),
            "auto" => Ok(Mode::Auto),
            other => Err(TtsError::Config {
                message: format!("unknown mode: {}", other),
            }),
        }
    }
}

/// Descriptive facts about a mode, for UI surfaces
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModeInfo {
    pub mode: Mode,
    pub is_server: bool,
    pub is_browser: bool,
    pub supports_offline: bool,
    pub description: &'static str,
}

impl Mode {
    pub fn info(&self) -> ModeInfo {
        match self {
            Mode::Server => ModeInfo {
                mode: Mode::Server,
                is_server: true,
                is_browser: false,
                supports_offline: false,
                description: "Server-side TTS with cloud engines for best quality and voice selection",
            },
            Mode::Browser => ModeInfo {
                mode: Mode::Browser,
                is_server: false,
                is_browser: true,
                supports_offline: true,
                description: "Client-side TTS with WebAssembly engines for offline capability",
            },
            Mode::Hybrid => ModeInfo {
                mode: Mode::Hybrid,
                is_server: true,
                is_browser: true,
                supports_offline: true,
                description: "Flexible TTS that can use both server and browser engines",
            },
            Mode::Auto => ModeInfo {
                mode: Mode::Auto,
                is_server: true,
                is_browser: true,
                supports_offline: true,
                description: "Automatically selects the best available TTS mode based on environment",
            },
        }
    }
}

/// The runtime context a call is actually executing in. Recomputed at query
/// time, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Server,
    Browser,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Server => f.write_str("server"),
            Environment::Browser => f.write_str("browser"),
        }
    }
}

/// Queries the ambient runtime. These two facts are the only environment
/// details the rest of the system may branch on.
pub trait EnvironmentProbe: Send + Sync {
    fn environment(&self) -> Environment;

    /// Whether the current context can issue outbound HTTP requests
    fn can_reach_network(&self) -> bool;
}

/// Probe for a headless process: server environment, network reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl EnvironmentProbe for ProcessEnvironment {
    fn environment(&self) -> Environment {
        Environment::Server
    }

    fn can_reach_network(&self) -> bool {
        true
    }
}

/// Probe with fixed answers, for embedding hosts and tests
#[derive(Debug, Clone, Copy)]
pub struct StaticEnvironment {
    pub environment: Environment,
    pub network: bool,
}

impl StaticEnvironment {
    pub fn browser() -> Self {
        Self {
            environment: Environment::Browser,
            network: true,
        }
    }

    pub fn offline_browser() -> Self {
        Self {
            environment: Environment::Browser,
            network: false,
        }
    }

    pub fn server() -> Self {
        Self {
            environment: Environment::Server,
            network: true,
        }
    }
}

impl EnvironmentProbe for StaticEnvironment {
    fn environment(&self) -> Environment {
        self.environment
    }

    fn can_reach_network(&self) -> bool {
        self.network
    }
}

/// Resolves requested modes against the current environment and the set of
/// currently enabled engines.
#[derive(Clone)]
pub struct ModeResolver {
    probe: Arc<dyn EnvironmentProbe>,
}

impl ModeResolver {
    pub fn new(probe: Arc<dyn EnvironmentProbe>) -> Self {
        Self { probe }
    }

    pub fn environment(&self) -> Environment {
        self.probe.environment()
    }

    /// Compatibility rule table. Server mode works from a browser context
    /// as long as the API is reachable; hybrid and auto are compatible
    /// everywhere by construction.
    pub fn is_compatible(&self, mode: Mode, environment: Environment) -> bool {
        match mode {
            Mode::Server => {
                environment == Environment::Server
                    || (environment == Environment::Browser && self.probe.can_reach_network())
            }
            Mode::Browser => environment == Environment::Browser,
            Mode::Hybrid | Mode::Auto => true,
        }
    }

    /// Pick the best mode for the current environment. Hybrid is the
    /// universal fallback when no engine matches the environment's native
    /// mode; an empty engine set therefore resolves to hybrid.
    pub fn auto_detect_mode(&self, enabled_engines: &[Engine]) -> Mode {
        match self.probe.environment() {
            Environment::Browser => {
                let has_browser = enabled_engines.iter().any(|e| {
                    matches!(
                        profile(*e).engine_type,
                        EngineType::Browser | EngineType::Hybrid
                    )
                });
                if has_browser {
                    Mode::Browser
                } else {
                    Mode::Hybrid
                }
            }
            Environment::Server => {
                let has_server = enabled_engines.iter().any(|e| {
                    matches!(
                        profile(*e).engine_type,
                        EngineType::Server | EngineType::Hybrid
                    )
                });
                if has_server {
                    Mode::Server
                } else {
                    Mode::Hybrid
                }
            }
        }
    }

    /// Resolve the mode a request will actually execute under. Never fails
    /// and never returns `Auto`: an incompatible requested mode silently
    /// falls back to auto-detection.
    pub fn resolve_effective_mode(&self, requested: Mode, enabled_engines: &[Engine]) -> Mode {
        if requested == Mode::Auto {
            return self.auto_detect_mode(enabled_engines);
        }

        let environment = self.probe.environment();
        if !self.is_compatible(requested, environment) {
            warn!(
                requested = %requested,
                environment = %environment,
                "requested mode incompatible with environment, falling back to auto-detection"
            );
            return self.auto_detect_mode(enabled_engines);
        }

        requested
    }

    /// Filter `enabled_engines` down to those usable under the effective
    /// mode in the current environment.
    pub fn compatible_engines(&self, mode: Mode, enabled_engines: &[Engine]) -> Vec<Engine> {
        let effective = self.resolve_effective_mode(mode, enabled_engines);
        let mode_engines = engines_for_mode(effective);
        let environment = self.probe.environment();

        enabled_engines
            .iter()
            .copied()
            .filter(|engine| {
                if !mode_engines.contains(engine) {
                    return false;
                }

                // An auto-downgrade can land on a mode whose nominal engine
                // set still contains engines the environment cannot run.
                let engine_type = profile(*engine).engine_type;
                if environment == Environment::Browser
                    && engine_type == EngineType::Server
                    && effective == Mode::Browser
                {
                    return false;
                }
                if environment == Environment::Server
                    && engine_type == EngineType::Browser
                    && effective == Mode::Server
                {
                    return false;
                }

                true
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(env: StaticEnvironment) -> ModeResolver {
        ModeResolver::new(Arc::new(env))
    }

    #[test]
    fn test_compatibility_table() {
        let browser = resolver(StaticEnvironment::browser());
        assert!(browser.is_compatible(Mode::Server, Environment::Browser));
        assert!(browser.is_compatible(Mode::Browser, Environment::Browser));

        let offline = resolver(StaticEnvironment::offline_browser());
        assert!(!offline.is_compatible(Mode::Server, Environment::Browser));

        let server = resolver(StaticEnvironment::server());
        assert!(server.is_compatible(Mode::Server, Environment::Server));
        assert!(!server.is_compatible(Mode::Browser, Environment::Server));

        // Hybrid and auto are compatible with every environment
        for env in [Environment::Server, Environment::Browser] {
            assert!(server.is_compatible(Mode::Hybrid, env));
            assert!(server.is_compatible(Mode::Auto, env));
            assert!(offline.is_compatible(Mode::Hybrid, env));
            assert!(offline.is_compatible(Mode::Auto, env));
        }
    }

    #[test]
    fn test_empty_engine_set_never_yields_auto() {
        for env in [
            StaticEnvironment::server(),
            StaticEnvironment::browser(),
            StaticEnvironment::offline_browser(),
        ] {
            let r = resolver(env);
            for mode in [Mode::Server, Mode::Browser, Mode::Hybrid, Mode::Auto] {
                let effective = r.resolve_effective_mode(mode, &[]);
                assert_ne!(effective, Mode::Auto);
                assert!(r.compatible_engines(mode, &[]).is_empty());
            }
        }
    }

    #[test]
    fn test_empty_set_auto_resolves_to_hybrid() {
        let r = resolver(StaticEnvironment::server());
        assert_eq!(r.resolve_effective_mode(Mode::Auto, &[]), Mode::Hybrid);

        // Browser requested in a server environment: incompatible, and with
        // nothing enabled the silent fallback lands on hybrid too.
        assert_eq!(r.resolve_effective_mode(Mode::Browser, &[]), Mode::Hybrid);
    }

    #[test]
    fn test_auto_resolution_is_idempotent() {
        let r = resolver(StaticEnvironment::browser());
        let enabled = [Engine::Azure, Engine::SherpaonnxWasm];
        let first = r.resolve_effective_mode(Mode::Auto, &enabled);
        let second = r.resolve_effective_mode(first, &enabled);
        assert_eq!(first, second);
    }

    #[test]
    fn test_auto_prefers_environment_native_mode() {
        let browser = resolver(StaticEnvironment::browser());
        assert_eq!(
            browser.auto_detect_mode(&[Engine::SherpaonnxWasm]),
            Mode::Browser
        );
        // Only server engines enabled in a browser: hybrid fallback
        assert_eq!(browser.auto_detect_mode(&[Engine::Azure]), Mode::Hybrid);

        let server = resolver(StaticEnvironment::server());
        assert_eq!(server.auto_detect_mode(&[Engine::Azure]), Mode::Server);
        assert_eq!(server.auto_detect_mode(&[Engine::EspeakWasm]), Mode::Hybrid);
    }

    #[test]
    fn test_browser_auto_excludes_server_only_engines() {
        let r = resolver(StaticEnvironment::browser());
        let enabled = [Engine::Azure, Engine::SherpaonnxWasm];

        assert_eq!(r.resolve_effective_mode(Mode::Auto, &enabled), Mode::Browser);

        let compatible = r.compatible_engines(Mode::Auto, &enabled);
        assert_eq!(compatible, vec![Engine::SherpaonnxWasm]);
    }

    #[test]
    fn test_server_mode_sticks_in_browser_with_network() {
        let r = resolver(StaticEnvironment::browser());
        let enabled = [Engine::Azure];
        assert_eq!(r.resolve_effective_mode(Mode::Server, &enabled), Mode::Server);
    }

    #[test]
    fn test_compatible_engines_filters_by_mode_type() {
        let r = resolver(StaticEnvironment::server());
        let enabled = [Engine::Azure, Engine::EspeakWasm, Engine::Mock];

        let compatible = r.compatible_engines(Mode::Server, &enabled);
        assert!(compatible.contains(&Engine::Azure));
        assert!(compatible.contains(&Engine::Mock));
        assert!(!compatible.contains(&Engine::EspeakWasm));
    }
}
