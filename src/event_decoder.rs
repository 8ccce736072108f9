use alloy::primitives::B256;
use alloy::rpc::types::Log;
use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_json_abi::EventParam;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::abi::TargetEvent;
use crate::error::ScanError;
use crate::types::DecodedEvent;

/// Decodes raw logs against the single watched event.
///
/// Logs carrying a different event signature are skipped, not errors: the
/// node returns every log emitted by the contract and only the watched
/// event is relayed.
pub struct EventDecoder {
    target: TargetEvent,
}

impl EventDecoder {
    pub fn new(target: TargetEvent) -> Self {
        Self { target }
    }

    pub fn event_name(&self) -> &str {
        &self.target.name
    }

    /// Decode a log into a [`DecodedEvent`], or `None` if the log does not
    /// carry the watched event's signature.
    pub fn decode(&self, log: &Log) -> Result<Option<DecodedEvent>, ScanError> {
        let topics = log.inner.topics();
        let Some(topic0) = topics.first() else {
            return Ok(None);
        };
        if *topic0 != self.target.selector {
            return Ok(None);
        }

        // One topic per indexed parameter, positionally. Anything else means
        // the ABI and the log disagree and the cycle must not advance past it.
        let indexed_topics = &topics[1..];
        if indexed_topics.len() != self.target.indexed.len() {
            return Err(ScanError::Decode(format!(
                "event {}: log carries {} indexed topics but ABI declares {} indexed parameters",
                self.target.name,
                indexed_topics.len(),
                self.target.indexed.len(),
            )));
        }

        let mut fields = BTreeMap::new();

        for (param, topic) in self.target.indexed.iter().zip(indexed_topics) {
            let value = decode_topic(param, *topic)?;
            fields.insert(param.name.clone(), value_to_json(&value));
        }

        for (param, value) in self
            .target
            .body
            .iter()
            .zip(decode_body(&self.target.body, log.inner.data.data.as_ref())?)
        {
            fields.insert(param.name.clone(), value_to_json(&value));
        }

        Ok(Some(DecodedEvent {
            event: self.target.name.clone(),
            tx_hash: log.transaction_hash.unwrap_or_default(),
            log_index: log.log_index.unwrap_or_default(),
            fields,
        }))
    }
}

/// Decode an indexed parameter from its topic.
fn decode_topic(param: &EventParam, topic: B256) -> Result<DynSolValue, ScanError> {
    let sol_type = DynSolType::parse(&param.ty).map_err(|e| {
        ScanError::Decode(format!(
            "indexed parameter {} of type {}: {}",
            param.name, param.ty, e
        ))
    })?;

    match &sol_type {
        // Dynamic types are stored in topics as their keccak256 hash; the
        // original value is unrecoverable, so surface the hash itself.
        DynSolType::String | DynSolType::Bytes | DynSolType::Array(_) => {
            Ok(DynSolValue::FixedBytes(topic.0.into(), 32))
        }
        _ => sol_type
            .abi_decode_params(topic.as_slice())
            .map_err(|e| ScanError::Decode(format!("indexed parameter {}: {}", param.name, e))),
    }
}

/// Decode the non-indexed parameters from the log data, as a tuple in
/// declared order.
fn decode_body(params: &[EventParam], data: &[u8]) -> Result<Vec<DynSolValue>, ScanError> {
    if params.is_empty() {
        return Ok(Vec::new());
    }

    let param_types = params
        .iter()
        .map(|p| {
            DynSolType::parse(&p.ty).map_err(|e| {
                ScanError::Decode(format!("parameter {} of type {}: {}", p.name, p.ty, e))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let tuple_type = DynSolType::Tuple(param_types);
    let decoded = tuple_type
        .abi_decode_params(data)
        .map_err(|e| ScanError::Decode(format!("log data: {}", e)))?;

    match decoded {
        DynSolValue::Tuple(values) => Ok(values),
        _ => Err(ScanError::Decode("expected tuple from log data".to_string())),
    }
}

/// Convert a decoded value into its JSON representation: integers as decimal
/// strings (they routinely exceed 2^53), addresses and byte values as
/// lowercase 0x-prefixed hex.
fn value_to_json(value: &DynSolValue) -> Value {
    match value {
        DynSolValue::Bool(b) => Value::Bool(*b),
        DynSolValue::Int(i, _) => Value::String(i.to_string()),
        DynSolValue::Uint(u, _) => Value::String(u.to_string()),
        DynSolValue::Address(addr) => Value::String(format!("{addr:#x}")),
        DynSolValue::FixedBytes(bytes, size) => {
            Value::String(format!("0x{}", hex::encode(&bytes.as_slice()[..*size])))
        }
        DynSolValue::Bytes(bytes) => Value::String(format!("0x{}", hex::encode(bytes))),
        DynSolValue::String(s) => Value::String(s.clone()),
        DynSolValue::Array(values) | DynSolValue::Tuple(values) => {
            Value::Array(values.iter().map(value_to_json).collect())
        }
        other => Value::String(format!("{other:?}")),
    }
}
