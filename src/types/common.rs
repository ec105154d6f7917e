use alloy_primitives::B256;

/// EIP-155 chain identifier.
pub type ChainId = u64;

/// Hash of a submitted transaction.
pub type TxHash = B256;
