//! Handshake strategy resolution.
//!
//! Decides whether an inbound payload is a handshake request for a trigger's
//! declared [`HandshakeConfiguration`]. Pure and deterministic: no IO, no
//! state, identical answers for identical inputs.

use flowhook_types::handshake::{HandshakeConfiguration, HandshakeStrategy, TriggerPayload};

/// Returns `true` if `payload` is a handshake request under `config`.
///
/// - No configuration, `NONE`, or an unrecognized strategy never match.
/// - Every strategy requires a non-empty `paramName`.
/// - Headers match ignoring ASCII case; query and body keys match exactly.
/// - Body matching only considers JSON objects.
pub fn resolve_handshake(payload: &TriggerPayload, config: Option<&HandshakeConfiguration>) -> bool {
    let Some(config) = config else {
        return false;
    };
    let param_name = config.param_name();

    match config.effective_strategy() {
        HandshakeStrategy::None => false,
        HandshakeStrategy::HeaderPresent => param_name.is_some_and(|name| payload.has_header(name)),
        HandshakeStrategy::QueryPresent => {
            param_name.is_some_and(|name| payload.has_query_param(name))
        }
        HandshakeStrategy::BodyParamPresent => {
            param_name.is_some_and(|name| payload.body_has_key(name))
        }
        HandshakeStrategy::Unrecognized => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
