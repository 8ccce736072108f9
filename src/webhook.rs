use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::error::ScanError;
use crate::types::{DecodedEvent, WebhookPayload};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delivery seam between the scan loop and the subscriber. The production
/// implementation is [`WebhookDispatcher`]; tests substitute a recorder.
#[async_trait]
pub trait Deliver: Send + Sync {
    async fn deliver(&self, event: &DecodedEvent) -> Result<(), ScanError>;
}

/// Relays decoded events to the configured subscriber as JSON POSTs.
///
/// There is no retry here: a failed delivery aborts the scan cycle and the
/// whole chunk is re-fetched and re-dispatched on the next tick.
pub struct WebhookDispatcher {
    client: Client,
    url: String,
}

impl WebhookDispatcher {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Deliver for WebhookDispatcher {
    async fn deliver(&self, event: &DecodedEvent) -> Result<(), ScanError> {
        let payload = WebhookPayload::from_event(event);

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ScanError::Dispatch(format!("request to {} failed: {}", self.url, e)))?;

        // Success is the inclusive 200-299 range; everything else, including
        // un-followed redirects, counts as a delivery failure.
        if !response.status().is_success() {
            return Err(ScanError::Dispatch(format!(
                "unexpected response code {}",
                response.status()
            )));
        }

        info!(
            "delivered event {} at tx {} (log index {})",
            payload.event, payload.tx_hash, payload.log_index
        );
        Ok(())
    }
}
