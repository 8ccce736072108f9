use std::collections::BTreeMap;

use alloy::primitives::B256;
use serde::Serialize;
use serde_json::Value;

/// A log that matched the watched event, with its parameters decoded
/// into named JSON values.
#[derive(Debug, Clone)]
pub struct DecodedEvent {
    pub event: String,
    pub tx_hash: B256,
    pub log_index: u64,
    pub fields: BTreeMap<String, Value>,
}

/// Wire shape of a webhook notification.
///
/// The log index is part of the canonical payload so subscribers can
/// distinguish duplicate deliveries of the same transaction.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub event: String,
    pub tx_hash: String,
    pub log_index: u64,
    pub data: BTreeMap<String, Value>,
}

impl WebhookPayload {
    pub fn from_event(event: &DecodedEvent) -> Self {
        Self {
            event: event.event.clone(),
            tx_hash: format!("0x{}", hex::encode(event.tx_hash.0.as_slice())),
            log_index: event.log_index,
            data: event.fields.clone(),
        }
    }
}
