//! Capabilities the payment engine depends on.
//!
//! Each external collaborator (proving backend, chain RPC, x402 endpoint) sits
//! behind one of these traits so that alternative backends or test doubles can
//! be injected without touching the orchestration logic.

use alloy_primitives::Address;
use url::Url;

use crate::{
    commitment::Commitment,
    errors::{ExecutorError, ProverError, ResolverError},
    networks::evm::Token,
    nonce::Nonce,
    proof::{Proof, ProverInput, RawProof},
    types::{AmountValue, ChainId, TxHash},
};

/// A zero-knowledge proving backend.
pub trait Prover: Send + Sync {
    /// Prove knowledge of the secret behind `input.commitment`.
    ///
    /// Returns the backend's own encoding; normalization happens in
    /// [`ProofRequester`](crate::proof::ProofRequester).
    fn prove(
        &self,
        input: &ProverInput,
    ) -> impl Future<Output = Result<RawProof, ProverError>> + Send;
}

/// Everything a payment contract call needs for one chain.
#[derive(Debug, Clone, Copy)]
pub struct ChainPayment<'a> {
    pub chain_id: ChainId,
    pub proof: &'a Proof,
    pub commitment: &'a Commitment,
    pub recipient: Address,
    pub amount: AmountValue,
    pub token: Token,
    pub nonce: &'a Nonce,
}

/// Submits sub-payments to the payment contract of a chain.
pub trait ChainExecutor: Send + Sync {
    /// The account paying, used to derive the payment nonce.
    fn payer(&self) -> Address;

    /// Submit one sub-payment and return its transaction hash.
    ///
    /// Not idempotent: a retry after partial on-chain acceptance is only
    /// rejected because the contract has already consumed the nonce.
    fn execute(
        &self,
        payment: ChainPayment<'_>,
    ) -> impl Future<Output = Result<TxHash, ExecutorError>> + Send;
}

/// Resolves an x402 payment request URL into the address to pay.
pub trait RecipientResolver: Send + Sync {
    /// Returns [`NO_RECIPIENT`] when the endpoint does not name a usable
    /// recipient.
    fn resolve(&self, url: &Url) -> impl Future<Output = Result<Address, ResolverError>> + Send;
}

/// Sentinel returned by a [`RecipientResolver`] that found no recipient.
pub const NO_RECIPIENT: Address = Address::ZERO;
