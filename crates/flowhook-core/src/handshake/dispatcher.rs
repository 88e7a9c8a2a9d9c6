//! Handshake dispatcher: the public entry point of the handshake layer.
//!
//! For every inbound webhook call destined for a flow's trigger, the
//! dispatcher decides whether the call is a provider handshake and, if so,
//! answers it through the [`ExecutionBridge`]. The sequence is linear:
//!
//! 1. `EMPTY` trigger or no trigger name -> not a handshake (no lookup performed)
//! 2. decode the flow's trigger settings
//! 3. fetch the trigger's handshake configuration (cache or metadata service)
//! 4. no configuration -> not a handshake
//! 5. resolve the strategy against the payload
//! 6. no match -> not a handshake
//! 7. match -> execute and return the hook's response
//!
//! Lookup failures are errors, never "not a handshake". The two suspension
//! points (lookup, execution) are bounded by timeouts and observe an optional
//! caller cancellation token.

use std::future::Future;
use std::time::Duration;

use secrecy::SecretString;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use flowhook_types::config::HandshakeSettings;
use flowhook_types::error::{DispatchStage, HandshakeError, LookupError};
use flowhook_types::flow::{FlowVersion, ProjectId, TriggerSettings};
use flowhook_types::handshake::{
    HandshakeConfiguration, HandshakeDecision, HandshakeOutcome, SkipReason, TriggerPayload,
};

use super::cache::{HandshakeCacheKey, HandshakeConfigCache};
use super::execution::ExecutionBridge;
use super::strategy::resolve_handshake;
use crate::ports::{BlockMetadataService, TriggerEngine, WebhookUrlResolver};

// ---------------------------------------------------------------------------
// Request + options
// ---------------------------------------------------------------------------

/// Inputs of a single dispatch.
#[derive(Debug, Clone, Copy)]
pub struct HandshakeRequest<'a> {
    pub flow_version: &'a FlowVersion,
    pub project_id: &'a ProjectId,
    pub payload: &'a TriggerPayload,
}

/// Timeouts applied at the dispatcher's suspension points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherOptions {
    pub lookup_timeout: Duration,
    pub execution_timeout: Duration,
}

impl Default for DispatcherOptions {
    fn default() -> Self {
        Self::from(&HandshakeSettings::default())
    }
}

impl From<&HandshakeSettings> for DispatcherOptions {
    fn from(settings: &HandshakeSettings) -> Self {
        Self {
            lookup_timeout: settings.lookup_timeout(),
            execution_timeout: settings.execution_timeout(),
        }
    }
}

// ---------------------------------------------------------------------------
// HandshakeDispatcher
// ---------------------------------------------------------------------------

/// Routes inbound webhook calls to the handshake path when they match.
///
/// Stateless across invocations apart from the optional configuration cache;
/// share one instance behind an `Arc` across concurrent deliveries.
pub struct HandshakeDispatcher<M, E, U> {
    metadata: M,
    bridge: ExecutionBridge<E, U>,
    cache: Option<HandshakeConfigCache>,
    options: DispatcherOptions,
}

impl<M, E, U> HandshakeDispatcher<M, E, U>
where
    M: BlockMetadataService,
    E: TriggerEngine,
    U: WebhookUrlResolver,
{
    /// Create a dispatcher with default timeouts and no cache.
    pub fn new(metadata: M, engine: E, urls: U) -> Self {
        Self {
            metadata,
            bridge: ExecutionBridge::new(engine, urls),
            cache: None,
            options: DispatcherOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DispatcherOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cache(mut self, cache: HandshakeConfigCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Apply timeouts and caching from configuration.
    pub fn with_settings(self, settings: &HandshakeSettings) -> Self {
        let dispatcher = self.with_options(DispatcherOptions::from(settings));
        match HandshakeConfigCache::from_settings(&settings.cache) {
            Some(cache) => dispatcher.with_cache(cache),
            None => dispatcher,
        }
    }

    pub fn options(&self) -> DispatcherOptions {
        self.options
    }

    pub fn cache(&self) -> Option<&HandshakeConfigCache> {
        self.cache.as_ref()
    }

    /// Handle a webhook call: answer it if it is a handshake.
    ///
    /// Returns [`HandshakeOutcome::NotHandshake`] when the caller must continue
    /// with normal trigger processing.
    pub async fn try_handshake(
        &self,
        token: &SecretString,
        request: HandshakeRequest<'_>,
    ) -> Result<HandshakeOutcome, HandshakeError> {
        self.dispatch(token, request, None).await
    }

    /// Like [`try_handshake`](Self::try_handshake), aborting with
    /// [`HandshakeError::Cancelled`] once `cancel` fires.
    pub async fn try_handshake_with_cancel(
        &self,
        token: &SecretString,
        request: HandshakeRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<HandshakeOutcome, HandshakeError> {
        self.dispatch(token, request, Some(cancel)).await
    }

    /// Run detection only: decide without executing the handshake hook.
    pub async fn detect(
        &self,
        token: &SecretString,
        request: HandshakeRequest<'_>,
    ) -> Result<HandshakeDecision, HandshakeError> {
        let span = dispatch_span(&request);
        self.decide(token, request, None).instrument(span).await
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    async fn dispatch(
        &self,
        token: &SecretString,
        request: HandshakeRequest<'_>,
        cancel: Option<&CancellationToken>,
    ) -> Result<HandshakeOutcome, HandshakeError> {
        let span = dispatch_span(&request);

        async move {
            let decision = self.decide(token, request, cancel).await;
            let outcome = match decision {
                Ok(HandshakeDecision::Skip(reason)) => {
                    tracing::debug!(?reason, "not a handshake request");
                    Ok(HandshakeOutcome::NotHandshake)
                }
                Ok(HandshakeDecision::Matched(config)) => {
                    tracing::info!(
                        strategy = ?config.effective_strategy(),
                        param_name = config.param_name().unwrap_or_default(),
                        "handshake request detected, executing hook"
                    );
                    bounded(
                        DispatchStage::Execution,
                        self.options.execution_timeout,
                        cancel,
                        self.bridge.execute_handshake(
                            token,
                            request.flow_version,
                            request.project_id,
                            request.payload,
                        ),
                    )
                    .await
                    .map(HandshakeOutcome::Responded)
                }
                Err(e) => Err(e),
            };

            match &outcome {
                Ok(HandshakeOutcome::Responded(response)) => {
                    tracing::info!(status = response.status, "handshake answered");
                }
                Ok(HandshakeOutcome::NotHandshake) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "handshake dispatch failed");
                }
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn decide(
        &self,
        token: &SecretString,
        request: HandshakeRequest<'_>,
        cancel: Option<&CancellationToken>,
    ) -> Result<HandshakeDecision, HandshakeError> {
        if request.flow_version.trigger.selected_trigger_name().is_none() {
            return Ok(HandshakeDecision::Skip(SkipReason::NoTriggerName));
        }

        let settings = request.flow_version.trigger_settings()?;
        let span = tracing::Span::current();
        span.record("block", settings.block_name.as_str());
        span.record("block_version", settings.block_version.as_str());

        let Some(trigger_name) = settings.trigger_name.as_deref() else {
            return Ok(HandshakeDecision::Skip(SkipReason::NoTriggerName));
        };

        let Some(config) = self
            .handshake_configuration(token, &settings, trigger_name, cancel)
            .await?
        else {
            return Ok(HandshakeDecision::Skip(SkipReason::NoHandshakeConfiguration));
        };

        if resolve_handshake(request.payload, Some(&config)) {
            Ok(HandshakeDecision::Matched(config))
        } else {
            Ok(HandshakeDecision::Skip(SkipReason::StrategyNotMatched))
        }
    }

    /// Fetch the trigger's handshake configuration, consulting the cache first.
    async fn handshake_configuration(
        &self,
        token: &SecretString,
        settings: &TriggerSettings,
        trigger_name: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<Option<HandshakeConfiguration>, HandshakeError> {
        ensure_concrete_version(&settings.block_version)?;

        let key = HandshakeCacheKey::new(&settings.block_name, &settings.block_version, trigger_name);
        if let Some(hit) = self.cache.as_ref().and_then(|cache| cache.get(&key)) {
            tracing::debug!(
                block = %settings.block_name,
                version = %settings.block_version,
                trigger = trigger_name,
                "handshake configuration cache hit"
            );
            return Ok(hit);
        }

        let block = bounded(DispatchStage::Lookup, self.options.lookup_timeout, cancel, async {
            self.metadata
                .get_block(token, &settings.block_name, &settings.block_version)
                .await
                .map_err(HandshakeError::from)
        })
        .await?;

        let config = block.handshake_configuration(trigger_name).cloned();
        if let Some(cache) = &self.cache {
            cache.insert(key, config.clone());
        }
        Ok(config)
    }
}

/// Span shared by every step of one dispatch.
fn dispatch_span(request: &HandshakeRequest<'_>) -> tracing::Span {
    tracing::info_span!(
        "handshake_dispatch",
        dispatch_id = %Uuid::now_v7(),
        flow_id = %request.flow_version.flow_id,
        flow_version_id = %request.flow_version.id,
        project_id = %request.project_id,
        block = tracing::field::Empty,
        block_version = tracing::field::Empty,
    )
}

/// Reject version ranges and other non-concrete block versions.
fn ensure_concrete_version(version: &str) -> Result<(), LookupError> {
    semver::Version::parse(version)
        .map(|_| ())
        .map_err(|_| LookupError::InvalidVersion(version.to_string()))
}

/// Await `fut` under a timeout and an optional cancellation token.
async fn bounded<T, F>(
    stage: DispatchStage,
    limit: Duration,
    cancel: Option<&CancellationToken>,
    fut: F,
) -> Result<T, HandshakeError>
where
    F: Future<Output = Result<T, HandshakeError>>,
{
    let timed = tokio::time::timeout(limit, fut);
    let result = match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(HandshakeError::Cancelled { stage }),
                result = timed => result,
            }
        }
        None => timed.await,
    };

    match result {
        Ok(inner) => inner,
        Err(_) => Err(HandshakeError::Timeout {
            stage,
            timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
