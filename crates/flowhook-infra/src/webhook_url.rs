//! Webhook URL resolution from the configured public base URL.

use flowhook_core::ports::WebhookUrlResolver;
use flowhook_types::config::ServiceConfig;
use flowhook_types::error::WebhookUrlError;
use flowhook_types::flow::FlowId;

use crate::http;

/// Builds `{public_url}/v1/webhooks/{flowId}`, with `/test` when simulating.
#[derive(Debug, Clone)]
pub struct ConfiguredWebhookUrlResolver {
    public_url: String,
}

impl ConfiguredWebhookUrlResolver {
    pub fn new(public_url: impl Into<String>) -> Self {
        Self {
            public_url: public_url.into(),
        }
    }

    pub fn from_config(services: &ServiceConfig) -> Self {
        Self::new(services.public_url.clone())
    }

    pub fn webhook_url(&self, flow_id: &FlowId, simulate: bool) -> Result<String, WebhookUrlError> {
        let base = self.public_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(WebhookUrlError::NotConfigured);
        }
        let mut segments = vec!["v1", "webhooks", flow_id.as_str()];
        if simulate {
            segments.push("test");
        }
        let url = http::join_segments(base, &segments).map_err(WebhookUrlError::Invalid)?;
        Ok(url.into())
    }
}

impl WebhookUrlResolver for ConfiguredWebhookUrlResolver {
    async fn get_webhook_url(
        &self,
        flow_id: &FlowId,
        simulate: bool,
    ) -> Result<String, WebhookUrlError> {
        self.webhook_url(flow_id, simulate)
    }
}
