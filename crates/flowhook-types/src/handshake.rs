//! Handshake domain types.
//!
//! Block authors declare a [`HandshakeConfiguration`] per trigger. When an
//! inbound [`TriggerPayload`] satisfies it, the call is a provider
//! verification request (Slack URL verification, Stripe challenge, ...) and
//! the trigger's handshake hook answers it with a [`WebhookResponse`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Strategy + configuration
// ---------------------------------------------------------------------------

/// How a trigger recognizes handshake requests.
///
/// Strategy strings this build does not know deserialize to
/// [`HandshakeStrategy::Unrecognized`], which never matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandshakeStrategy {
    /// The trigger never performs handshakes.
    #[default]
    None,
    /// A header named `paramName` is present (case-insensitive).
    HeaderPresent,
    /// A query parameter named `paramName` is present.
    QueryPresent,
    /// The JSON body is an object with a `paramName` key.
    BodyParamPresent,
    #[serde(other)]
    Unrecognized,
}

/// Per-trigger handshake declaration from the block metadata.
///
/// Only JSON objects decode; arrays and scalars are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Map<String, Value>")]
pub struct HandshakeConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<HandshakeStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_name: Option<String>,
}

impl TryFrom<Map<String, Value>> for HandshakeConfiguration {
    type Error = String;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let strategy = match fields.remove("strategy") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                serde_json::from_value(value).map_err(|e| format!("invalid strategy: {e}"))?,
            ),
        };
        let param_name = match fields.remove("paramName") {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(name),
            Some(other) => return Err(format!("paramName must be a string, got {other}")),
        };
        Ok(Self {
            strategy,
            param_name,
        })
    }
}

impl HandshakeConfiguration {
    pub fn new(strategy: HandshakeStrategy, param_name: impl Into<String>) -> Self {
        Self {
            strategy: Some(strategy),
            param_name: Some(param_name.into()),
        }
    }

    /// The declared strategy, `None` when unset.
    pub fn effective_strategy(&self) -> HandshakeStrategy {
        self.strategy.unwrap_or_default()
    }

    /// The parameter to look for. Empty names count as unset.
    pub fn param_name(&self) -> Option<&str> {
        self.param_name.as_deref().filter(|name| !name.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Inbound payload
// ---------------------------------------------------------------------------

/// A normalized inbound webhook call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerPayload {
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub query_params: HashMap<String, String>,
    /// Parsed request body. `Value::Null` when the request had none.
    #[serde(default)]
    pub body: Value,
}

impl TriggerPayload {
    /// Whether a header with this name is present, ignoring ASCII case.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.keys().any(|key| key.eq_ignore_ascii_case(name))
    }

    /// Whether a query parameter with exactly this name is present.
    pub fn has_query_param(&self, name: &str) -> bool {
        self.query_params.contains_key(name)
    }

    /// Whether the body is a JSON object containing exactly this key.
    ///
    /// Null, scalar and array bodies never contain keys.
    pub fn body_has_key(&self, key: &str) -> bool {
        self.body
            .as_object()
            .is_some_and(|object| object.contains_key(key))
    }
}

// ---------------------------------------------------------------------------
// Responses + outcomes
// ---------------------------------------------------------------------------

/// HTTP-shaped response returned to the webhook caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: u16,
    #[serde(default)]
    pub body: Value,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

impl WebhookResponse {
    /// Error message of the fallback response.
    pub const HANDSHAKE_FAILURE_MESSAGE: &'static str = "Failed to execute handshake";

    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            headers: HashMap::new(),
        }
    }

    /// The fixed response sent when the handshake hook fails or yields nothing.
    pub fn handshake_failure() -> Self {
        Self::new(
            500,
            serde_json::json!({ "error": Self::HANDSHAKE_FAILURE_MESSAGE }),
        )
    }
}

/// Result of a dispatch attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum HandshakeOutcome {
    /// Not a handshake; the caller continues with normal trigger processing.
    NotHandshake,
    /// The handshake was executed and this response must be returned.
    Responded(WebhookResponse),
}

impl HandshakeOutcome {
    pub fn is_handshake(&self) -> bool {
        matches!(self, HandshakeOutcome::Responded(_))
    }

    pub fn into_response(self) -> Option<WebhookResponse> {
        match self {
            HandshakeOutcome::NotHandshake => None,
            HandshakeOutcome::Responded(response) => Some(response),
        }
    }
}

/// Why detection concluded the call is not a handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The flow's trigger settings name no trigger.
    NoTriggerName,
    /// The trigger declares no handshake configuration.
    NoHandshakeConfiguration,
    /// The payload does not satisfy the declared strategy.
    StrategyNotMatched,
}

/// Result of the detection phase, before any execution.
#[derive(Debug, Clone, PartialEq)]
pub enum HandshakeDecision {
    Skip(SkipReason),
    Matched(HandshakeConfiguration),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strategy_wire_names() {
        let parsed: HandshakeStrategy = serde_json::from_value(json!("HEADER_PRESENT")).unwrap();
        assert_eq!(parsed, HandshakeStrategy::HeaderPresent);
        let parsed: HandshakeStrategy = serde_json::from_value(json!("BODY_PARAM_PRESENT")).unwrap();
        assert_eq!(parsed, HandshakeStrategy::BodyParamPresent);
        assert_eq!(
            serde_json::to_value(HandshakeStrategy::QueryPresent).unwrap(),
            json!("QUERY_PRESENT")
        );
    }

    #[test]
    fn test_unknown_strategy_is_unrecognized() {
        let parsed: HandshakeStrategy = serde_json::from_value(json!("SIGNATURE_VALID")).unwrap();
        assert_eq!(parsed, HandshakeStrategy::Unrecognized);
    }

    #[test]
    fn test_configuration_missing_strategy_defaults_to_none() {
        let config: HandshakeConfiguration =
            serde_json::from_value(json!({ "paramName": "challenge" })).unwrap();
        assert!(config.strategy.is_none());
        assert_eq!(config.effective_strategy(), HandshakeStrategy::None);

        let config: HandshakeConfiguration =
            serde_json::from_value(json!({ "strategy": null })).unwrap();
        assert_eq!(config.effective_strategy(), HandshakeStrategy::None);
        assert!(config.param_name().is_none());
    }

    #[test]
    fn test_configuration_rejects_non_objects() {
        for value in [json!([]), json!(["QUERY_PRESENT", "verify"]), json!("QUERY_PRESENT"), json!(5)] {
            assert!(serde_json::from_value::<HandshakeConfiguration>(value).is_err());
        }
    }

    #[test]
    fn test_configuration_rejects_non_string_param_name() {
        let result: Result<HandshakeConfiguration, _> =
            serde_json::from_value(json!({ "strategy": "QUERY_PRESENT", "paramName": 5 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_configuration_serializes_camel_case() {
        let config = HandshakeConfiguration::new(HandshakeStrategy::HeaderPresent, "X-Hook-Secret");
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({ "strategy": "HEADER_PRESENT", "paramName": "X-Hook-Secret" })
        );
    }

    #[test]
    fn test_configuration_empty_param_name_is_unset() {
        let config = HandshakeConfiguration::new(HandshakeStrategy::QueryPresent, "");
        assert!(config.param_name().is_none());
    }

    #[test]
    fn test_payload_defaults() {
        let payload: TriggerPayload = serde_json::from_value(json!({})).unwrap();
        assert!(payload.headers.is_empty());
        assert!(payload.query_params.is_empty());
        assert!(payload.body.is_null());
    }

    #[test]
    fn test_payload_header_lookup_ignores_case() {
        let payload = TriggerPayload {
            headers: HashMap::from([("X-Slack-Signature".to_string(), "v0=abc".to_string())]),
            ..Default::default()
        };
        assert!(payload.has_header("x-slack-signature"));
        assert!(payload.has_header("X-SLACK-SIGNATURE"));
        assert!(!payload.has_header("x-slack-request-timestamp"));
    }

    #[test]
    fn test_payload_body_key_only_on_objects() {
        let mut payload = TriggerPayload {
            body: json!({ "challenge": "abc" }),
            ..Default::default()
        };
        assert!(payload.body_has_key("challenge"));
        assert!(!payload.body_has_key("Challenge"));

        payload.body = json!(["challenge"]);
        assert!(!payload.body_has_key("challenge"));

        payload.body = json!("challenge");
        assert!(!payload.body_has_key("challenge"));
    }

    #[test]
    fn test_handshake_failure_response() {
        let response = WebhookResponse::handshake_failure();
        assert_eq!(response.status, 500);
        assert_eq!(response.body, json!({ "error": "Failed to execute handshake" }));
        assert!(response.headers.is_empty());
    }

    #[test]
    fn test_webhook_response_omits_empty_headers() {
        let value = serde_json::to_value(WebhookResponse::new(200, json!("ok"))).unwrap();
        assert_eq!(value, json!({ "status": 200, "body": "ok" }));
    }

    #[test]
    fn test_outcome_into_response() {
        assert_eq!(HandshakeOutcome::NotHandshake.into_response(), None);
        let outcome = HandshakeOutcome::Responded(WebhookResponse::new(200, Value::Null));
        assert!(outcome.is_handshake());
        assert_eq!(outcome.into_response().unwrap().status, 200);
    }
}
