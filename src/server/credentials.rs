//! Credential and Enablement Store
//!
//! Per-engine credentials loaded from environment variables, with an
//! enablement flag the routing core reads. The store never validates
//! secret correctness - that is the adapters' `check_credentials` job; it
//! only tracks which fields are populated.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::engine::catalog::{profile, Engine};
use crate::router::EnablementStore;

/// Environment variables backing each engine's credential fields
fn env_vars(engine: Engine) -> &'static [(&'static str, &'static str)] {
    match engine {
        Engine::Azure => &[
            ("subscription_key", "MICROSOFT_TOKEN"),
            ("region", "MICROSOFT_REGION"),
        ],
        Engine::Elevenlabs => &[("api_key", "ELEVENLABS_API_KEY")],
        Engine::Google => &[("key_filename", "GOOGLE_SA_PATH")],
        Engine::Openai => &[("api_key", "OPENAI_API_KEY")],
        Engine::Playht => &[("api_key", "PLAYHT_API_KEY"), ("user_id", "PLAYHT_USER_ID")],
        Engine::Polly => &[
            ("access_key_id", "POLLY_AWS_KEY_ID"),
            ("secret_access_key", "POLLY_AWS_ACCESS_KEY"),
            ("region", "POLLY_REGION"),
        ],
        Engine::Watson => &[
            ("api_key", "WATSON_API_KEY"),
            ("url", "WATSON_URL"),
            ("region", "WATSON_REGION"),
            ("instance_id", "WATSON_INSTANCE_ID"),
        ],
        Engine::Witai => &[("token", "WITAI_TOKEN")],
        // Offline engines need no credentials
        Engine::Espeak
        | Engine::EspeakWasm
        | Engine::Sherpaonnx
        | Engine::SherpaonnxWasm
        | Engine::Mock => &[],
    }
}

/// Credentials and enablement for one engine
#[derive(Debug, Clone, Default)]
pub struct EngineCredentials {
    pub enabled: bool,
    /// Populated credential fields, keyed by field name
    pub fields: BTreeMap<String, String>,
}

/// Credential availability report for one engine
#[derive(Debug, Clone)]
pub struct CredentialStatus {
    pub engine: Engine,
    pub has_credentials: bool,
    pub available_vars: Vec<&'static str>,
    pub missing_vars: Vec<&'static str>,
}

/// Mapping from Engine to enablement and credential fields
pub struct CredentialStore {
    entries: RwLock<BTreeMap<Engine, EngineCredentials>>,
}

impl CredentialStore {
    /// Load from environment variables. Credential-free engines come up
    /// enabled; an engine requiring credentials is enabled once at least
    /// one of its variables is populated.
    pub fn from_env() -> Self {
        let mut entries = BTreeMap::new();

        for engine in Engine::ALL {
            let mut fields = BTreeMap::new();
            for (field, var) in env_vars(engine) {
                if let Ok(value) = std::env::var(var) {
                    if !value.trim().is_empty() {
                        fields.insert(field.to_string(), value);
                    }
                }
            }

            let enabled = !profile(engine).requires_credentials || !fields.is_empty();
            entries.insert(engine, EngineCredentials { enabled, fields });
        }

        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Build from explicit entries; engines not mentioned are disabled.
    pub fn from_entries(entries: impl IntoIterator<Item = (Engine, EngineCredentials)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }

    /// Store with every credential-free engine enabled and nothing else
    pub fn offline_only() -> Self {
        Self::from_entries(Engine::ALL.iter().filter_map(|engine| {
            if profile(*engine).requires_credentials {
                None
            } else {
                Some((
                    *engine,
                    EngineCredentials {
                        enabled: true,
                        fields: BTreeMap::new(),
                    },
                ))
            }
        }))
    }

    pub fn get(&self, engine: Engine) -> EngineCredentials {
        let entries = match self.entries.read() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.get(&engine).cloned().unwrap_or_default()
    }

    pub fn set_enabled(&self, engine: Engine, enabled: bool) {
        let mut entries = match self.entries.write() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.entry(engine).or_default().enabled = enabled;
    }

    /// Whether any credential field is populated
    pub fn has_credentials(&self, engine: Engine) -> bool {
        !self.get(engine).fields.is_empty()
    }

    /// Per-engine availability report, for diagnostics surfaces
    pub fn credential_status(&self) -> Vec<CredentialStatus> {
        Engine::ALL
            .iter()
            .map(|engine| {
                let fields = self.get(*engine).fields;
                let mut available = Vec::new();
                let mut missing = Vec::new();

                for (field, var) in env_vars(*engine) {
                    if fields.contains_key(*field) {
                        available.push(*var);
                    } else {
                        missing.push(*var);
                    }
                }

                CredentialStatus {
                    engine: *engine,
                    has_credentials: !available.is_empty() || env_vars(*engine).is_empty(),
                    available_vars: available,
                    missing_vars: missing,
                }
            })
            .collect()
    }
}

impl EnablementStore for CredentialStore {
    fn enabled_engines(&self) -> Vec<Engine> {
        let entries = match self.entries.read() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        Engine::ALL
            .iter()
            .copied()
            .filter(|e| entries.get(e).map(|c| c.enabled).unwrap_or(false))
            .collect()
    }

    fn is_enabled(&self, engine: Engine) -> bool {
        let entries = match self.entries.read() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.get(&engine).map(|c| c.enabled).unwrap_or(false)
    }
}
