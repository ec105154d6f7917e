//! Replay-protection nonce shared by every sub-payment of one logical payment.

use std::time::{SystemTime, SystemTimeError};

use alloy_core::sol_types::SolValue;
use alloy_primitives::{Address, B256, U256, keccak256};
use serde::{Deserialize, Serialize};

use crate::types::ChainId;

/// `keccak256(uint256 primaryChainId || address payer || uint256 salt)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nonce(pub B256);

impl Nonce {
    pub fn derive(primary_chain_id: ChainId, payer: Address, salt: U256) -> Self {
        let packed = (U256::from(primary_chain_id), payer, salt).abi_encode_packed();
        Nonce(keccak256(packed))
    }

    /// The nonce as the contract's `uint256` argument.
    pub fn to_u256(&self) -> U256 {
        U256::from_be_bytes(self.0.0)
    }
}

/// Salt for a new payment: milliseconds since the Unix epoch in the upper
/// bits, 64 random bits below.
///
/// The random half keeps payments started in the same millisecond by the
/// same payer from sharing a nonce.
pub fn payment_salt() -> Result<U256, SystemTimeError> {
    let millis = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)?
        .as_millis();
    Ok((U256::from(millis) << 64usize) | U256::from(rand::random::<u64>()))
}
