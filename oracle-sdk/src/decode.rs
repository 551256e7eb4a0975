//! Field decoding for explicitly supplied event arguments.
//!
//! Every helper names the field it is decoding so that a malformed event can
//! be reported precisely.

use crate::address::{AddressError, TronAddress};
use thiserror::Error;

/// A field of an event could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid address in `{field}`: {source}")]
    Address {
        field: &'static str,
        #[source]
        source: AddressError,
    },

    #[error("invalid hex in `{field}`: {source}")]
    Hex {
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    #[error("`{field}` is not a decimal number: {value:?}")]
    Decimal { field: &'static str, value: String },

    #[error("`{field}` is empty")]
    Empty { field: &'static str },

    #[error("missing field `{field}`")]
    MissingField { field: &'static str },

    #[error("invalid event json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode a base58check address.
pub fn address(field: &'static str, value: &str) -> Result<TronAddress, DecodeError> {
    TronAddress::from_base58check(value).map_err(|source| DecodeError::Address { field, source })
}

/// Validate a non-negative decimal integer and return it as written.
///
/// Amounts are uint256 on chain, so they are kept as strings rather than
/// narrowed into a machine integer.
pub fn decimal(field: &'static str, value: &str) -> Result<String, DecodeError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DecodeError::Empty { field });
    }
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::Decimal {
            field,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Decode hex bytes, accepting an optional `0x` prefix and an odd number of
/// digits (left-padded with `0`, so `0x1` becomes `[0x01]`).
pub fn hex_bytes(field: &'static str, value: &str) -> Result<Vec<u8>, DecodeError> {
    let digits = value.trim();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    if digits.is_empty() {
        return Err(DecodeError::Empty { field });
    }
    let padded;
    let digits = if digits.len() % 2 == 1 {
        padded = format!("0{digits}");
        padded.as_str()
    } else {
        digits
    };
    hex::decode(digits).map_err(|source| DecodeError::Hex { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_bytes_pads_odd_length() {
        assert_eq!(hex_bytes("nonce", "0x1").unwrap(), vec![0x01]);
        assert_eq!(hex_bytes("nonce", "0X0a0b").unwrap(), vec![0x0a, 0x0b]);
        assert_eq!(hex_bytes("nonce", "abc").unwrap(), vec![0x0a, 0xbc]);
    }

    #[test]
    fn test_hex_bytes_rejects_garbage() {
        assert!(matches!(
            hex_bytes("nonce", "0x"),
            Err(DecodeError::Empty { field: "nonce" })
        ));
        assert!(matches!(
            hex_bytes("userSign", "zz"),
            Err(DecodeError::Hex { field: "userSign", .. })
        ));
    }

    #[test]
    fn test_decimal() {
        assert_eq!(decimal("value", " 100 ").unwrap(), "100");
        assert!(matches!(
            decimal("value", "-5"),
            Err(DecodeError::Decimal { field: "value", .. })
        ));
        assert!(matches!(
            decimal("value", "1e3"),
            Err(DecodeError::Decimal { .. })
        ));
        assert!(matches!(decimal("value", ""), Err(DecodeError::Empty { .. })));
    }
}
