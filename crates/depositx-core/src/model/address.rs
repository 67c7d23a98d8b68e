use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::errors::{DepositError, Result};

/// 20-byte ledger account or contract address
///
/// Stored lower-cased so that ownership comparisons are insensitive to
/// checksum casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Address(String);

impl Address {
    /// Parse a `0x`-prefixed, 40 hex digit address
    ///
    /// # Errors
    /// `InvalidAddress` if the prefix, length or digits are wrong.
    pub fn parse(input: &str) -> Result<Self> {
        if !Self::is_valid(input) {
            return Err(DepositError::InvalidAddress {
                input: input.to_string(),
            });
        }
        Ok(Self(input.to_ascii_lowercase()))
    }

    pub fn is_valid(input: &str) -> bool {
        let digits = match input
            .strip_prefix("0x")
            .or_else(|| input.strip_prefix("0X"))
        {
            Some(d) => d,
            None => return false,
        };
        digits.len() == 40 && digits.bytes().all(|b| b.is_ascii_hexdigit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Deserialized addresses go through the same validation as parsed ones.
impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Address::parse(&raw).map_err(serde::de::Error::custom)
    }
}

impl std::str::FromStr for Address {
    type Err = DepositError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x9A8f92a830A5cB89a3816e3D267CB7791c16b04D";

    #[test]
    fn test_parse_valid_address_lowercases() {
        let addr = Address::parse(ADDR).unwrap();
        assert_eq!(addr.as_str(), ADDR.to_ascii_lowercase());
    }

    #[test]
    fn test_checksum_casing_is_irrelevant_for_equality() {
        let a = Address::parse(ADDR).unwrap();
        let b = Address::parse(&ADDR.to_ascii_lowercase()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_bad_addresses() {
        for bad in [
            "",
            "0x",
            "9A8f92a830A5cB89a3816e3D267CB7791c16b04D",
            "0x9A8f92a830A5cB89a3816e3D267CB7791c16b04",
            "0x9A8f92a830A5cB89a3816e3D267CB7791c16b04DD",
            "0xZZ8f92a830A5cB89a3816e3D267CB7791c16b04D",
            "new",
        ] {
            assert!(Address::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_invalid_address_error_carries_input() {
        let err = Address::parse("0x123").unwrap_err();
        assert_eq!(
            err,
            DepositError::InvalidAddress {
                input: "0x123".to_string()
            }
        );
    }
}
