//! Raw contract event as it arrives from the event queue.

use crate::decode::DecodeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One contract log, as published by the node's event plugin.
///
/// Only `contractAddress` and `eventName` are needed to classify the message.
/// Event arguments live in `dataMap` (non-indexed) and `topicMap` (indexed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractEventMessage {
    pub contract_address: String,
    pub event_name: String,
    #[serde(default)]
    pub topic_map: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub data_map: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

impl ContractEventMessage {
    pub fn from_json(raw: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Look up an event argument, preferring `dataMap` over `topicMap`.
    ///
    /// Numbers are rendered in decimal; any other non-string value counts as
    /// missing.
    pub fn field(&self, name: &'static str) -> Result<String, DecodeError> {
        let value = self
            .data_map
            .get(name)
            .or_else(|| self.topic_map.get(name))
            .ok_or(DecodeError::MissingField { field: name })?;
        match value {
            serde_json::Value::String(s) => Ok(s.clone()),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            _ => Err(DecodeError::MissingField { field: name }),
        }
    }
}
