//! Engine catalog, mode resolution, and selection
//!
//! The decision-making half of the routing core: which engines exist and
//! what they can do (`catalog`), which execution mode a request effectively
//! runs under (`mode`), and which single engine serves it (`selector`).

pub mod catalog;
pub mod mode;
pub mod selector;
pub mod voice;

pub use catalog::{
    browser_engines, engines_for_mode, offline_engines, profile, server_engines, Capabilities,
    Engine, EngineProfile, EngineType, LanguageCoverage, Rating, Speed,
};
pub use mode::{
    Environment, EnvironmentProbe, Mode, ModeInfo, ModeResolver, ProcessEnvironment,
    StaticEnvironment,
};
pub use selector::{preference_order, select_best};
pub use voice::{AudioFormat, Gender, LanguageCode, SynthesisOptions, SynthesisResult, Voice};
