use std::{fmt::Display, str::FromStr};

use alloy_primitives::{U256, ruint::ParseError};
use serde::{Deserialize, Serialize};

/// An amount in the smallest unit of an asset (wei for native ETH).
///
/// Serialized as a decimal string so that values above `2^53` survive JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AmountValue(pub U256);

impl AmountValue {
    pub const ZERO: AmountValue = AmountValue(U256::ZERO);

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<u8> for AmountValue {
    fn from(value: u8) -> Self {
        AmountValue(U256::from(value))
    }
}

impl From<u16> for AmountValue {
    fn from(value: u16) -> Self {
        AmountValue(U256::from(value))
    }
}

impl From<u32> for AmountValue {
    fn from(value: u32) -> Self {
        AmountValue(U256::from(value))
    }
}

impl From<u64> for AmountValue {
    fn from(value: u64) -> Self {
        AmountValue(U256::from(value))
    }
}

impl From<u128> for AmountValue {
    fn from(value: u128) -> Self {
        AmountValue(U256::from(value))
    }
}

impl From<U256> for AmountValue {
    fn from(value: U256) -> Self {
        AmountValue(value)
    }
}

impl From<AmountValue> for U256 {
    fn from(value: AmountValue) -> Self {
        value.0
    }
}

impl FromStr for AmountValue {
    type Err = ParseError;

    /// Parses a base-10 integer string. Hex and fractional notations are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        U256::from_str_radix(s.trim(), 10).map(AmountValue)
    }
}

impl Display for AmountValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for AmountValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AmountValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AmountValue::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_amount() {
        let amount: AmountValue = "100000000000000000".parse().unwrap();
        assert_eq!(amount, AmountValue::from(100_000_000_000_000_000u64));
    }

    #[test]
    fn test_reject_non_numeric_amount() {
        assert!("0.1".parse::<AmountValue>().is_err());
        assert!("ten".parse::<AmountValue>().is_err());
        assert!("-5".parse::<AmountValue>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let amount = AmountValue::from(u128::MAX);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, format!("\"{}\"", u128::MAX));

        let back: AmountValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }
}
