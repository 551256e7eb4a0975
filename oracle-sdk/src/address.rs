//! Tron account addresses.
//!
//! A Tron address is a 21-byte payload (`0x41` followed by the 20-byte account
//! hash). Its human-readable form is base58check: the payload followed by the
//! first four bytes of `SHA256(SHA256(payload))`, base58 encoded.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix byte shared by all main-net and side-chain Tron addresses.
pub const ADDRESS_PREFIX: u8 = 0x41;

/// Length of the raw address payload.
pub const ADDRESS_LEN: usize = 21;

const CHECKSUM_LEN: usize = 4;

/// Errors produced while decoding an address.
#[derive(Debug, Error, PartialEq)]
pub enum AddressError {
    #[error("invalid base58: {0}")]
    Base58(#[from] bs58::decode::Error),

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("expected 21 bytes, got {0}")]
    Length(usize),

    #[error("unexpected prefix byte {0:#04x}")]
    Prefix(u8),

    #[error("checksum mismatch")]
    Checksum,
}

/// A decoded Tron address.
///
/// Serialized as the lowercase hex of its 21-byte payload, displayed as
/// base58check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TronAddress([u8; ADDRESS_LEN]);

impl TronAddress {
    /// Build an address from its raw payload.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        let payload: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| AddressError::Length(bytes.len()))?;
        if payload[0] != ADDRESS_PREFIX {
            return Err(AddressError::Prefix(payload[0]));
        }
        Ok(Self(payload))
    }

    /// Decode a base58check address such as `TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t`.
    pub fn from_base58check(encoded: &str) -> Result<Self, AddressError> {
        let raw = bs58::decode(encoded.trim()).into_vec()?;
        if raw.len() != ADDRESS_LEN + CHECKSUM_LEN {
            return Err(AddressError::Length(raw.len().saturating_sub(CHECKSUM_LEN)));
        }
        let (payload, check) = raw.split_at(ADDRESS_LEN);
        if checksum(payload).as_slice() != check {
            return Err(AddressError::Checksum);
        }
        Self::from_bytes(payload)
    }

    /// Decode the hex form of the payload, with or without a `0x` prefix.
    pub fn from_hex(encoded: &str) -> Result<Self, AddressError> {
        let trimmed = encoded.trim_start_matches("0x");
        let bytes = hex::decode(trimmed)?;
        Self::from_bytes(&bytes)
    }

    pub fn to_base58check(&self) -> String {
        let mut raw = Vec::with_capacity(ADDRESS_LEN + CHECKSUM_LEN);
        raw.extend_from_slice(&self.0);
        raw.extend_from_slice(&checksum(&self.0));
        bs58::encode(raw).into_string()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for TronAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_base58check())
    }
}

impl std::str::FromStr for TronAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58check(s)
    }
}

impl TryFrom<String> for TronAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<TronAddress> for String {
    fn from(value: TronAddress) -> Self {
        value.to_hex()
    }
}

/// First four bytes of `SHA256(SHA256(payload))`.
fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let first = ring::digest::digest(&ring::digest::SHA256, payload);
    let second = ring::digest::digest(&ring::digest::SHA256, first.as_ref());
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&second.as_ref()[..CHECKSUM_LEN]);
    out
}
