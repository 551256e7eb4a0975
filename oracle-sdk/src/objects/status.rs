//! Per-nonce processing state as persisted by the oracle.

use super::envelope::EventEnvelope;
use serde::{Deserialize, Serialize};

/// Lifecycle of a dedup key.
///
/// `Processing` is written by the event loop; `Success` and `Fail` are written
/// by the transaction worker once the chain outcome is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NonceStatus {
    Processing,
    Success,
    Fail,
}

impl std::fmt::Display for NonceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NonceStatus::Processing => write!(f, "PROCESSING"),
            NonceStatus::Success => write!(f, "SUCCESS"),
            NonceStatus::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceStatusRecord {
    pub status: NonceStatus,
    /// Epoch seconds from which a `Processing` record may be retried.
    pub next_process_timestamp: i64,
    /// The event that produced this record, kept for audit and replay.
    pub envelope: EventEnvelope,
}

impl NonceStatusRecord {
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Whether the retry window has elapsed at `now` (epoch seconds).
    pub fn is_due(&self, now: i64) -> bool {
        now >= self.next_process_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::events::EventType;

    fn record(status: NonceStatus, next: i64) -> NonceStatusRecord {
        NonceStatusRecord {
            status,
            next_process_timestamp: next,
            envelope: EventEnvelope {
                event_type: EventType::DepositTrx,
                parameter: serde_json::json!({}),
            },
        }
    }

    #[test]
    fn test_status_wire_names() {
        let bytes = record(NonceStatus::Processing, 10).to_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "PROCESSING");
        assert_eq!(json["next_process_timestamp"], 10);
        assert_eq!(json["envelope"]["type"], "DEPOSIT_TRX_EVENT");
    }

    #[test]
    fn test_is_due_boundary() {
        let r = record(NonceStatus::Processing, 100);
        assert!(!r.is_due(99));
        assert!(r.is_due(100));
        assert!(r.is_due(101));
    }

    #[test]
    fn test_corrupt_bytes_fail_to_parse() {
        assert!(NonceStatusRecord::from_bytes(b"\x08\x01garbage").is_err());
        assert!(NonceStatusRecord::from_bytes(br#"{"status":"DONE"}"#).is_err());
    }
}
