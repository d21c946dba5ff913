//! Engine Selection
//!
//! Deterministic tie-break over a compatible engine subset. The preference
//! orderings are hand-curated static data, one ranked list per mode, so the
//! rule stays auditable and testable in isolation.

use super::catalog::Engine;
use super::mode::Mode;

/// Server mode prefers the high-capability cloud engines before the
/// local/offline ones.
const SERVER_PREFERENCE: &[Engine] = &[
    Engine::Azure,
    Engine::Google,
    Engine::Elevenlabs,
    Engine::Openai,
    Engine::Polly,
    Engine::Sherpaonnx,
    Engine::Espeak,
];

/// Browser mode prefers the higher-quality WASM engine before mock.
const BROWSER_PREFERENCE: &[Engine] = &[
    Engine::SherpaonnxWasm,
    Engine::EspeakWasm,
    Engine::Mock,
];

const HYBRID_PREFERENCE: &[Engine] = &[
    Engine::Sherpaonnx,
    Engine::Espeak,
    Engine::SherpaonnxWasm,
    Engine::EspeakWasm,
];

const AUTO_PREFERENCE: &[Engine] = &[
    Engine::Azure,
    Engine::Google,
    Engine::Sherpaonnx,
    Engine::Elevenlabs,
    Engine::SherpaonnxWasm,
    Engine::EspeakWasm,
];

/// Ranked preference list for a mode
pub fn preference_order(mode: Mode) -> &'static [Engine] {
    match mode {
        Mode::Server => SERVER_PREFERENCE,
        Mode::Browser => BROWSER_PREFERENCE,
        Mode::Hybrid => HYBRID_PREFERENCE,
        Mode::Auto => AUTO_PREFERENCE,
    }
}

/// Pick the single best engine from a compatible subset.
///
/// Walks the mode's preference list and returns the first engine present in
/// `compatible`. An unranked engine is still selectable: when no preferred
/// engine is present, the first element of `compatible` in input order wins.
/// Returns `None` only for an empty subset - selection itself never fails.
pub fn select_best(mode: Mode, compatible: &[Engine]) -> Option<Engine> {
    if compatible.is_empty() {
        return None;
    }

    preference_order(mode)
        .iter()
        .copied()
        .find(|preferred| compatible.contains(preferred))
        .or_else(|| compatible.first().copied())
}
