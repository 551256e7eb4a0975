//! Classification of raw contract events into actuators.

use crate::actuators::{
    Actuator, ActuatorError, DepositTrc10Actuator, DepositTrc20Actuator, DepositTrc721Actuator,
    DepositTrxActuator, WithdrawTrc10Actuator, WithdrawTrc20Actuator, WithdrawTrc721Actuator,
    WithdrawTrxActuator,
};
use oracle_sdk::address::TronAddress;
use oracle_sdk::objects::ContractEventMessage;
use tracing::trace;

/// Maps contract events emitted by the two bridge gateways to actuators.
///
/// Anything emitted by another contract, or an event the gateways emit but
/// the bridge does not relay, is "not applicable" and yields `Ok(None)`.
#[derive(Debug, Clone)]
pub struct ActuatorFactory {
    main_gateway: TronAddress,
    side_gateway: TronAddress,
}

impl ActuatorFactory {
    pub fn new(main_gateway: TronAddress, side_gateway: TronAddress) -> Self {
        Self {
            main_gateway,
            side_gateway,
        }
    }

    /// Parse and classify one queue value.
    pub fn create_from_json(&self, raw: &str) -> Result<Option<Box<dyn Actuator>>, ActuatorError> {
        let message = ContractEventMessage::from_json(raw)?;
        self.create(&message)
    }

    pub fn create(
        &self,
        message: &ContractEventMessage,
    ) -> Result<Option<Box<dyn Actuator>>, ActuatorError> {
        let Ok(contract) = TronAddress::from_base58check(&message.contract_address) else {
            trace!(contract = %message.contract_address, "Unparseable contract address");
            return Ok(None);
        };

        if contract == self.main_gateway {
            self.create_deposit(message)
        } else if contract == self.side_gateway {
            self.create_withdrawal(message)
        } else {
            Ok(None)
        }
    }

    fn create_deposit(
        &self,
        m: &ContractEventMessage,
    ) -> Result<Option<Box<dyn Actuator>>, ActuatorError> {
        let actuator: Box<dyn Actuator> = match m.event_name.as_str() {
            "TRXReceived" => Box::new(DepositTrxActuator::new(
                &m.field("from")?,
                &m.field("value")?,
                &m.field("nonce")?,
            )?),
            "TRC10Received" => Box::new(DepositTrc10Actuator::new(
                &m.field("from")?,
                &m.field("tokenId")?,
                &m.field("tokenValue")?,
                &m.field("nonce")?,
            )?),
            "TRC20Received" => Box::new(DepositTrc20Actuator::new(
                &m.field("from")?,
                &m.field("contractAddress")?,
                &m.field("value")?,
                &m.field("nonce")?,
            )?),
            "TRC721Received" => Box::new(DepositTrc721Actuator::new(
                &m.field("from")?,
                &m.field("contractAddress")?,
                &m.field("uid")?,
                &m.field("nonce")?,
            )?),
            _ => return Ok(None),
        };
        Ok(Some(actuator))
    }

    fn create_withdrawal(
        &self,
        m: &ContractEventMessage,
    ) -> Result<Option<Box<dyn Actuator>>, ActuatorError> {
        let actuator: Box<dyn Actuator> = match m.event_name.as_str() {
            "WithdrawTRX" => Box::new(WithdrawTrxActuator::new(
                &m.field("nonce")?,
                &m.field("from")?,
                &m.field("value")?,
                &m.field("userSign")?,
            )?),
            "WithdrawTRC10" => Box::new(WithdrawTrc10Actuator::new(
                &m.field("nonce")?,
                &m.field("from")?,
                &m.field("tokenId")?,
                &m.field("tokenValue")?,
                &m.field("userSign")?,
            )?),
            "WithdrawTRC20" => Box::new(WithdrawTrc20Actuator::new(
                &m.field("nonce")?,
                &m.field("from")?,
                &m.field("value")?,
                &m.field("mainChainAddress")?,
                &m.field("userSign")?,
            )?),
            "WithdrawTRC721" => Box::new(WithdrawTrc721Actuator::new(
                &m.field("nonce")?,
                &m.field("from")?,
                &m.field("tokenId")?,
                &m.field("mainChainAddress")?,
                &m.field("userSign")?,
            )?),
            _ => return Ok(None),
        };
        Ok(Some(actuator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::address;
    use oracle_sdk::decode::DecodeError;
    use oracle_sdk::objects::EventType;
    use serde_json::json;

    fn factory() -> ActuatorFactory {
        ActuatorFactory::new(
            TronAddress::from_base58check(&address(10)).unwrap(),
            TronAddress::from_base58check(&address(20)).unwrap(),
        )
    }

    fn message(contract: &str, event: &str, data: serde_json::Value) -> String {
        json!({
            "contractAddress": contract,
            "eventName": event,
            "dataMap": data,
        })
        .to_string()
    }

    #[test]
    fn test_classifies_deposit() {
        let raw = message(
            &address(10),
            "TRXReceived",
            json!({ "from": address(1), "value": "100", "nonce": "0x1" }),
        );
        let actuator = factory().create_from_json(&raw).unwrap().unwrap();
        assert_eq!(actuator.event_type(), EventType::DepositTrx);
        assert_eq!(actuator.key(), &[0x01]);
    }

    #[test]
    fn test_classifies_withdrawal() {
        let raw = message(
            &address(20),
            "WithdrawTRC20",
            json!({
                "from": address(1),
                "value": 5,
                "mainChainAddress": address(2),
                "nonce": "9",
                "userSign": "beef",
            }),
        );
        let actuator = factory().create_from_json(&raw).unwrap().unwrap();
        assert_eq!(actuator.event_type(), EventType::WithdrawTrc20);
        assert_eq!(actuator.nonce().as_deref(), Some("9"));
    }

    #[test]
    fn test_untracked_contract_or_event_is_not_applicable() {
        let f = factory();
        let other = message(&address(30), "TRXReceived", json!({}));
        assert!(f.create_from_json(&other).unwrap().is_none());

        let transfer = message(&address(10), "Transfer", json!({}));
        assert!(f.create_from_json(&transfer).unwrap().is_none());

        // Deposit event name on the withdrawal gateway.
        let crossed = message(&address(20), "TRXReceived", json!({}));
        assert!(f.create_from_json(&crossed).unwrap().is_none());

        let garbage_contract = message("not-an-address", "TRXReceived", json!({}));
        assert!(f.create_from_json(&garbage_contract).unwrap().is_none());
    }

    #[test]
    fn test_recognized_event_with_missing_field_is_decode_error() {
        let raw = message(
            &address(20),
            "WithdrawTRX",
            json!({ "from": address(1), "value": "1", "nonce": "3" }),
        );
        let err = factory().create_from_json(&raw).unwrap_err();
        assert!(matches!(
            err,
            ActuatorError::Decode(DecodeError::MissingField { field: "userSign" })
        ));
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let err = factory().create_from_json("{").unwrap_err();
        assert!(matches!(err, ActuatorError::Decode(DecodeError::Json(_))));
    }
}
