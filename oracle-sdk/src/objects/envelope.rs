//! Generic tagged container for any gateway event.
//!
//! The envelope is what gets persisted next to a nonce status and what is
//! re-published when an event has to be replayed:
//!
//! ```json
//! {"type": "DEPOSIT_TRX_EVENT", "parameter": {"from": "41..", "value": "100", "nonce": "01"}}
//! ```

use super::events::{EventRecord, EventType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("envelope carries {found}, expected {expected}")]
    TypeMismatch {
        expected: EventType,
        found: EventType,
    },

    #[error("envelope payload does not match its type: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub parameter: serde_json::Value,
}

impl EventEnvelope {
    /// Pack a record under its own type tag.
    pub fn pack<E: EventRecord>(event: &E) -> Result<Self, EnvelopeError> {
        Ok(Self {
            event_type: E::TYPE,
            parameter: serde_json::to_value(event)?,
        })
    }

    /// Unpack the payload as `E`, failing if the tag or the payload shape
    /// does not match.
    pub fn unpack<E: EventRecord>(&self) -> Result<E, EnvelopeError> {
        if self.event_type != E::TYPE {
            return Err(EnvelopeError::TypeMismatch {
                expected: E::TYPE,
                found: self.event_type,
            });
        }
        Ok(E::deserialize(&self.parameter)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EnvelopeError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::events::{DepositTrxEvent, WithdrawTrxEvent};

    const FROM: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

    #[test]
    fn test_pack_layout() {
        let event = DepositTrxEvent::decode(FROM, "100", "0x1").unwrap();
        let envelope = EventEnvelope::pack(&event).unwrap();
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["type"], "DEPOSIT_TRX_EVENT");
        assert_eq!(json["parameter"]["nonce"], "01");
        assert_eq!(json["parameter"]["value"], "100");
        assert_eq!(
            json["parameter"]["from"],
            "41a614f803b6fd780986a42c78ec9c7f77e6ded13c"
        );
    }

    #[test]
    fn test_unpack_rejects_other_type() {
        let event = DepositTrxEvent::decode(FROM, "100", "0x1").unwrap();
        let envelope = EventEnvelope::pack(&event).unwrap();
        let err = envelope.unpack::<WithdrawTrxEvent>().unwrap_err();
        assert!(matches!(
            err,
            EnvelopeError::TypeMismatch {
                expected: EventType::WithdrawTrx,
                found: EventType::DepositTrx
            }
        ));
    }

    #[test]
    fn test_unpack_rejects_mislabeled_payload() {
        // Tag says deposit, payload is a withdrawal.
        let withdraw = WithdrawTrxEvent::decode("3", FROM, "5", "beef").unwrap();
        let envelope = EventEnvelope {
            event_type: EventType::DepositTrx,
            parameter: serde_json::to_value(&withdraw).unwrap(),
        };
        assert!(matches!(
            envelope.unpack::<DepositTrxEvent>(),
            Err(EnvelopeError::Payload(_))
        ));
    }

    #[test]
    fn test_bytes_preserve_envelope() {
        let event = DepositTrxEvent::decode(FROM, "42", "0xff").unwrap();
        let envelope = EventEnvelope::pack(&event).unwrap();
        let bytes = envelope.to_bytes().unwrap();
        assert_eq!(EventEnvelope::from_bytes(&bytes).unwrap(), envelope);
        assert_eq!(
            envelope.unpack::<DepositTrxEvent>().unwrap(),
            event
        );
    }
}
