//! Commitment derivation.
//!
//! `commitment = keccak256(bytes32 secret || address recipient || uint256 amount)`
//! using Solidity's tightly packed encoding. Every field has a fixed width
//! (32, 20 and 32 bytes), so two distinct triples can never share an encoding.

use alloy_core::sol_types::SolValue;
use alloy_primitives::{Address, B256, U256, keccak256};
use serde::{Deserialize, Serialize};

use crate::types::{AmountValue, Secret};

/// Binding and hiding digest of a `(secret, recipient, amount)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(pub B256);

impl Commitment {
    /// Derive the commitment for a payment.
    pub fn derive(secret: &Secret, recipient: Address, amount: AmountValue) -> Self {
        let packed = (*secret.expose(), recipient, amount.0).abi_encode_packed();
        Commitment(keccak256(packed))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0.0
    }

    /// The commitment as a field-sized integer, the form public signals use.
    pub fn to_u256(&self) -> U256 {
        U256::from_be_bytes(self.0.0)
    }
}

impl From<B256> for Commitment {
    fn from(value: B256) -> Self {
        Self(value)
    }
}

impl From<Commitment> for B256 {
    fn from(value: Commitment) -> Self {
        value.0
    }
}

/// Hash of the recipient alone, kept as a separate public circuit input.
pub fn recipient_hash(recipient: Address) -> B256 {
    keccak256(recipient.abi_encode_packed())
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    const RECIPIENT: Address = address!("0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb0");

    #[test]
    fn test_commitment_deterministic() {
        let secret = Secret::from_bytes([0x42; 32]);

        let c1 = Commitment::derive(&secret, RECIPIENT, AmountValue::from(1000u64));
        let c2 = Commitment::derive(&secret, RECIPIENT, AmountValue::from(1000u64));

        assert_eq!(c1, c2);
    }

    #[test]
    fn test_commitment_uses_packed_layout() {
        let secret = Secret::from_bytes([0x01; 32]);
        let amount = AmountValue::from(7u64);

        let mut expected = Vec::with_capacity(84);
        expected.extend_from_slice(&[0x01; 32]);
        expected.extend_from_slice(RECIPIENT.as_slice());
        expected.extend_from_slice(&U256::from(7u64).to_be_bytes::<32>());

        assert_eq!(
            Commitment::derive(&secret, RECIPIENT, amount).0,
            keccak256(&expected)
        );
    }

    #[test]
    fn test_commitment_binds_every_field() {
        let base = Commitment::derive(
            &Secret::from_bytes([0x01; 32]),
            RECIPIENT,
            AmountValue::from(100u64),
        );

        let other_secret = Commitment::derive(
            &Secret::from_bytes([0x02; 32]),
            RECIPIENT,
            AmountValue::from(100u64),
        );
        let other_recipient = Commitment::derive(
            &Secret::from_bytes([0x01; 32]),
            address!("0x3CB9B3bBfde8501f411bB69Ad3DC07908ED0dE20"),
            AmountValue::from(100u64),
        );
        let other_amount = Commitment::derive(
            &Secret::from_bytes([0x01; 32]),
            RECIPIENT,
            AmountValue::from(101u64),
        );

        assert_ne!(base, other_secret);
        assert_ne!(base, other_recipient);
        assert_ne!(base, other_amount);
    }

    #[test]
    fn test_recipient_hash_is_hash_of_address_bytes() {
        assert_eq!(recipient_hash(RECIPIENT), keccak256(RECIPIENT.as_slice()));
    }
}
