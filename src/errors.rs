use crate::{orchestrator::ChainTransaction, types::ChainId};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed recipient, amount, token, secret or chain list. Raised before
    /// any external call is made.
    #[error("Invalid input: {0}")]
    InputValidation(String),

    #[error("Proof generation failed: {0}")]
    ProofGeneration(#[from] ProverError),

    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    #[error(transparent)]
    ChainExecution(#[from] ChainExecutionError),

    /// Some chains were paid before one failed. Completed transactions are not
    /// rolled back.
    #[error(
        "Payment partially executed, {} chain(s) completed before: {source}",
        .completed.len()
    )]
    PartialPayment {
        completed: Vec<ChainTransaction>,
        source: ChainExecutionError,
    },

    #[error("Recipient resolution failed: {0}")]
    Resolution(#[from] ResolverError),

    #[error("System time error: {0}")]
    SystemTime(#[from] std::time::SystemTimeError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A sub-payment on one chain failed.
#[derive(Debug, thiserror::Error)]
#[error("Execution on chain {chain_id} failed: {cause}")]
pub struct ChainExecutionError {
    pub chain_id: ChainId,
    #[source]
    pub cause: ExecutorError,
}

/// Errors raised by a proving backend or while normalizing its output.
#[derive(Debug, thiserror::Error)]
pub enum ProverError {
    #[error("Proving backend failed: {0}")]
    Backend(String),

    #[error("Circuit rejected inputs: {0}")]
    Rejected(String),

    #[error("Malformed proof: {0}")]
    MalformedProof(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while submitting a sub-payment to a chain.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("No endpoint configured for chain {0}")]
    UnknownChain(ChainId),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transaction reverted: {0}")]
    Reverted(String),

    #[error("Signer error: {0}")]
    Signer(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    #[cfg(feature = "x402-resolver")]
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Raised by resolvers that do not go through reqwest.
    #[error("Transport error: {0}")]
    Transport(String),
}
