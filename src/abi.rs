use std::fs;
use std::path::Path;

use alloy_json_abi::{Event, EventParam, JsonAbi};
use alloy_primitives::B256;
use anyhow::Context;

/// The single event this relay watches, resolved from the contract ABI at
/// startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct TargetEvent {
    pub name: String,
    pub selector: B256,
    /// Indexed parameters, in declaration order. One topic each.
    pub indexed: Vec<EventParam>,
    /// Non-indexed parameters, in declaration order. Packed into the log data.
    pub body: Vec<EventParam>,
}

impl TargetEvent {
    pub fn load(abi_path: &Path, event_name: &str) -> anyhow::Result<Self> {
        let abi_json = fs::read_to_string(abi_path)
            .with_context(|| format!("failed to read ABI file {}", abi_path.display()))?;
        let abi: JsonAbi = serde_json::from_str(&abi_json)
            .with_context(|| format!("failed to parse ABI file {}", abi_path.display()))?;
        Self::resolve(&abi, event_name)
    }

    /// Find `event_name` in the ABI and split its inputs into indexed and
    /// non-indexed parameter lists. Picks the first declaration on overloads.
    pub fn resolve(abi: &JsonAbi, event_name: &str) -> anyhow::Result<Self> {
        let event: &Event = abi
            .events()
            .find(|e| e.name == event_name)
            .ok_or_else(|| anyhow::anyhow!("event '{}' not found in ABI", event_name))?;

        let (indexed, body): (Vec<_>, Vec<_>) =
            event.inputs.iter().cloned().partition(|p| p.indexed);

        Ok(Self {
            name: event.name.clone(),
            selector: event.selector(),
            indexed,
            body,
        })
    }
}
