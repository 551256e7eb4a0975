//! Decoded gateway events.
//!
//! Main-chain gateway events are deposits into the bridge; side-chain gateway
//! events are withdrawals out of it. Each record is immutable once built and
//! can be produced either from explicit string arguments (`decode`) or from an
//! [`EventEnvelope`](super::envelope::EventEnvelope).

use crate::address::TronAddress;
use crate::decode::{self, DecodeError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Type tag carried by every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "DEPOSIT_TRX_EVENT")]
    DepositTrx,
    #[serde(rename = "DEPOSIT_TRC10_EVENT")]
    DepositTrc10,
    #[serde(rename = "DEPOSIT_TRC20_EVENT")]
    DepositTrc20,
    #[serde(rename = "DEPOSIT_TRC721_EVENT")]
    DepositTrc721,
    #[serde(rename = "WITHDRAW_TRX_EVENT")]
    WithdrawTrx,
    #[serde(rename = "WITHDRAW_TRC10_EVENT")]
    WithdrawTrc10,
    #[serde(rename = "WITHDRAW_TRC20_EVENT")]
    WithdrawTrc20,
    #[serde(rename = "WITHDRAW_TRC721_EVENT")]
    WithdrawTrc721,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::DepositTrx => "DEPOSIT_TRX_EVENT",
            EventType::DepositTrc10 => "DEPOSIT_TRC10_EVENT",
            EventType::DepositTrc20 => "DEPOSIT_TRC20_EVENT",
            EventType::DepositTrc721 => "DEPOSIT_TRC721_EVENT",
            EventType::WithdrawTrx => "WITHDRAW_TRX_EVENT",
            EventType::WithdrawTrc10 => "WITHDRAW_TRC10_EVENT",
            EventType::WithdrawTrc20 => "WITHDRAW_TRC20_EVENT",
            EventType::WithdrawTrc721 => "WITHDRAW_TRC721_EVENT",
        }
    }

    /// Whether the event is emitted by the main-chain gateway.
    pub fn is_deposit(&self) -> bool {
        matches!(
            self,
            EventType::DepositTrx
                | EventType::DepositTrc10
                | EventType::DepositTrc20
                | EventType::DepositTrc721
        )
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete event record that can travel inside an envelope.
pub trait EventRecord: Serialize + DeserializeOwned {
    const TYPE: EventType;
}

// ---------------------------------------------------------------------------
// Main-chain deposits
// ---------------------------------------------------------------------------

/// `TRXReceived(address from, uint256 value, uint256 nonce)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepositTrxEvent {
    pub from: TronAddress,
    pub value: String,
    #[serde(with = "hex::serde")]
    pub nonce: Vec<u8>,
}

impl DepositTrxEvent {
    pub fn decode(from: &str, value: &str, nonce: &str) -> Result<Self, DecodeError> {
        Ok(Self {
            from: decode::address("from", from)?,
            value: decode::decimal("value", value)?,
            nonce: decode::hex_bytes("nonce", nonce)?,
        })
    }
}

impl EventRecord for DepositTrxEvent {
    const TYPE: EventType = EventType::DepositTrx;
}

/// `TRC10Received(address from, uint256 tokenId, uint256 tokenValue, uint256 nonce)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepositTrc10Event {
    pub from: TronAddress,
    pub token_id: String,
    pub token_value: String,
    #[serde(with = "hex::serde")]
    pub nonce: Vec<u8>,
}

impl DepositTrc10Event {
    pub fn decode(
        from: &str,
        token_id: &str,
        token_value: &str,
        nonce: &str,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            from: decode::address("from", from)?,
            token_id: decode::decimal("tokenId", token_id)?,
            token_value: decode::decimal("tokenValue", token_value)?,
            nonce: decode::hex_bytes("nonce", nonce)?,
        })
    }
}

impl EventRecord for DepositTrc10Event {
    const TYPE: EventType = EventType::DepositTrc10;
}

/// `TRC20Received(address from, address contractAddress, uint256 value, uint256 nonce)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepositTrc20Event {
    pub from: TronAddress,
    pub contract_address: TronAddress,
    pub value: String,
    #[serde(with = "hex::serde")]
    pub nonce: Vec<u8>,
}

impl DepositTrc20Event {
    pub fn decode(
        from: &str,
        contract_address: &str,
        value: &str,
        nonce: &str,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            from: decode::address("from", from)?,
            contract_address: decode::address("contractAddress", contract_address)?,
            value: decode::decimal("value", value)?,
            nonce: decode::hex_bytes("nonce", nonce)?,
        })
    }
}

impl EventRecord for DepositTrc20Event {
    const TYPE: EventType = EventType::DepositTrc20;
}

/// `TRC721Received(address from, address contractAddress, uint256 uid, uint256 nonce)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepositTrc721Event {
    pub from: TronAddress,
    pub contract_address: TronAddress,
    pub uid: String,
    #[serde(with = "hex::serde")]
    pub nonce: Vec<u8>,
}

impl DepositTrc721Event {
    pub fn decode(
        from: &str,
        contract_address: &str,
        uid: &str,
        nonce: &str,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            from: decode::address("from", from)?,
            contract_address: decode::address("contractAddress", contract_address)?,
            uid: decode::decimal("uid", uid)?,
            nonce: decode::hex_bytes("nonce", nonce)?,
        })
    }
}

impl EventRecord for DepositTrc721Event {
    const TYPE: EventType = EventType::DepositTrc721;
}

// ---------------------------------------------------------------------------
// Side-chain withdrawals
// ---------------------------------------------------------------------------
//
// Withdrawal nonces are decimal counters kept as text; the dedup key is their
// UTF-8 bytes.

/// `WithdrawTRX(address from, uint256 value, uint256 nonce, bytes userSign)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WithdrawTrxEvent {
    pub nonce: String,
    pub from: TronAddress,
    pub value: String,
    #[serde(with = "hex::serde")]
    pub user_sign: Vec<u8>,
}

impl WithdrawTrxEvent {
    pub fn decode(
        nonce: &str,
        from: &str,
        value: &str,
        user_sign: &str,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            nonce: decode::decimal("nonce", nonce)?,
            from: decode::address("from", from)?,
            value: decode::decimal("value", value)?,
            user_sign: decode::hex_bytes("userSign", user_sign)?,
        })
    }
}

impl EventRecord for WithdrawTrxEvent {
    const TYPE: EventType = EventType::WithdrawTrx;
}

/// `WithdrawTRC10(address from, uint256 tokenId, uint256 tokenValue, uint256 nonce, bytes userSign)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WithdrawTrc10Event {
    pub nonce: String,
    pub from: TronAddress,
    pub token_id: String,
    pub token_value: String,
    #[serde(with = "hex::serde")]
    pub user_sign: Vec<u8>,
}

impl WithdrawTrc10Event {
    pub fn decode(
        nonce: &str,
        from: &str,
        token_id: &str,
        token_value: &str,
        user_sign: &str,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            nonce: decode::decimal("nonce", nonce)?,
            from: decode::address("from", from)?,
            token_id: decode::decimal("tokenId", token_id)?,
            token_value: decode::decimal("tokenValue", token_value)?,
            user_sign: decode::hex_bytes("userSign", user_sign)?,
        })
    }
}

impl EventRecord for WithdrawTrc10Event {
    const TYPE: EventType = EventType::WithdrawTrc10;
}

/// `WithdrawTRC20(address from, uint256 value, address mainChainAddress, uint256 nonce, bytes userSign)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WithdrawTrc20Event {
    pub nonce: String,
    pub from: TronAddress,
    pub value: String,
    pub main_chain_address: TronAddress,
    #[serde(with = "hex::serde")]
    pub user_sign: Vec<u8>,
}

impl WithdrawTrc20Event {
    pub fn decode(
        nonce: &str,
        from: &str,
        value: &str,
        main_chain_address: &str,
        user_sign: &str,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            nonce: decode::decimal("nonce", nonce)?,
            from: decode::address("from", from)?,
            value: decode::decimal("value", value)?,
            main_chain_address: decode::address("mainChainAddress", main_chain_address)?,
            user_sign: decode::hex_bytes("userSign", user_sign)?,
        })
    }
}

impl EventRecord for WithdrawTrc20Event {
    const TYPE: EventType = EventType::WithdrawTrc20;
}

/// `WithdrawTRC721(address from, uint256 tokenId, address mainChainAddress, uint256 nonce, bytes userSign)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WithdrawTrc721Event {
    pub nonce: String,
    pub from: TronAddress,
    pub token_id: String,
    pub main_chain_address: TronAddress,
    #[serde(with = "hex::serde")]
    pub user_sign: Vec<u8>,
}

impl WithdrawTrc721Event {
    pub fn decode(
        nonce: &str,
        from: &str,
        token_id: &str,
        main_chain_address: &str,
        user_sign: &str,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            nonce: decode::decimal("nonce", nonce)?,
            from: decode::address("from", from)?,
            token_id: decode::decimal("tokenId", token_id)?,
            main_chain_address: decode::address("mainChainAddress", main_chain_address)?,
            user_sign: decode::hex_bytes("userSign", user_sign)?,
        })
    }
}

impl EventRecord for WithdrawTrc721Event {
    const TYPE: EventType = EventType::WithdrawTrc721;
}
