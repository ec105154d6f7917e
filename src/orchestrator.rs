//! End-to-end payment execution.
//!
//! A payment runs as a fixed sequence of awaited steps:
//!
//! 1. Validate the request
//! 2. Prove: derive the commitment and obtain one proof for all chains
//! 3. Split the amount into a per-chain plan
//! 4. Derive one nonce shared by every chain
//! 5. Execute each plan entry in order, stopping at the first failure
//!
//! Chain submissions are never concurrent: they share the proof and the nonce,
//! and fail-fast needs each outcome before the next chain is attempted.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{
    commitment::Commitment,
    concepts::{ChainExecutor, ChainPayment, NO_RECIPIENT, Prover, RecipientResolver},
    config::{OrchestratorConfig, PaymentConfig, X402PaymentConfig},
    errors::{ChainExecutionError, Error, Result},
    nonce::{Nonce, payment_salt},
    proof::ProofRequester,
    request::{PaymentRequest, parse_amount, parse_secret, parse_token},
    split::PaymentPlan,
    types::{AmountValue, ChainId, Secret, TxHash},
};

/// A sub-payment that was accepted by its chain's RPC endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainTransaction {
    pub chain_id: ChainId,
    pub amount: AmountValue,
    pub tx_hash: TxHash,
}

/// Outcome of one logical payment.
///
/// When a failure is recorded the payment is partial: [`transactions`] lists
/// the chains paid before the failing one, which are not rolled back.
/// Without a failure every plan entry has a transaction.
///
/// Only [`PaymentOrchestrator::execute`] builds this value, which keeps both
/// properties above.
///
/// [`transactions`]: PaymentResult::transactions
#[derive(Debug)]
pub struct PaymentResult {
    commitment: Commitment,
    nonce: Nonce,
    plan: PaymentPlan,
    transactions: Vec<ChainTransaction>,
    failure: Option<ChainExecutionError>,
}

impl PaymentResult {
    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    pub fn nonce(&self) -> Nonce {
        self.nonce
    }

    pub fn plan(&self) -> &PaymentPlan {
        &self.plan
    }

    /// Sub-payments accepted so far, in plan order.
    pub fn transactions(&self) -> &[ChainTransaction] {
        &self.transactions
    }

    pub fn failure(&self) -> Option<&ChainExecutionError> {
        self.failure.as_ref()
    }

    /// The transaction identifying this payment: the first chain's.
    pub fn canonical_tx_hash(&self) -> Option<TxHash> {
        self.transactions.first().map(|tx| tx.tx_hash)
    }

    pub fn is_partial(&self) -> bool {
        self.failure.is_some()
    }

    /// Chains in the plan that were never submitted to, failed chain excluded.
    pub fn unattempted_chains(&self) -> Vec<ChainId> {
        let skip = self.transactions.len() + usize::from(self.failure.is_some());
        self.plan.chain_ids().skip(skip).collect()
    }

    /// The canonical transaction hash, or an error carrying whatever did complete.
    pub fn into_tx_hash(self) -> Result<TxHash> {
        match self.failure {
            Some(source) if self.transactions.is_empty() => Err(Error::ChainExecution(source)),
            Some(source) => Err(Error::PartialPayment {
                completed: self.transactions,
                source,
            }),
            // No failure means one transaction per plan entry, so this is only
            // empty for an empty plan, which `PaymentPlan::split` never builds.
            None => self
                .transactions
                .first()
                .map(|tx| tx.tx_hash)
                .ok_or_else(|| Error::InvalidSplit("payment plan has no entries".to_string())),
        }
    }
}

/// Result of an x402 payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X402Receipt {
    pub tx_hash: TxHash,
    pub commitment: Commitment,
}

/// Runs payments through a prover and a chain executor.
///
/// Holds no per-payment state, so one orchestrator can serve concurrent
/// payments; each call owns its secret, proof, plan and nonce.
#[derive(Debug, Clone)]
pub struct PaymentOrchestrator<P: Prover, E: ChainExecutor> {
    config: OrchestratorConfig,
    requester: ProofRequester<P>,
    executor: E,
}

impl<P: Prover, E: ChainExecutor> PaymentOrchestrator<P, E> {
    pub fn new(config: OrchestratorConfig, prover: P, executor: E) -> Self {
        PaymentOrchestrator {
            config,
            requester: ProofRequester::new(prover),
            executor,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn prover(&self) -> &P {
        self.requester.prover()
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Execute a payment.
    ///
    /// Returns `Err` when nothing was submitted (invalid input, proof failure).
    /// Once submission has started, chain failures are reported inside the
    /// returned [`PaymentResult`].
    pub async fn execute(&self, request: PaymentRequest) -> Result<PaymentResult> {
        request.validate()?;
        let PaymentRequest {
            recipient,
            amount,
            token,
            chain_ids,
            secret,
        } = request;

        let secret = secret.unwrap_or_else(Secret::random);
        let committed = self
            .requester
            .request_proof(&secret, recipient, amount)
            .await?;
        drop(secret);

        #[cfg(feature = "tracing")]
        tracing::debug!(commitment = %committed.commitment.0, "Payment proof generated");

        let plan = PaymentPlan::split(amount, &chain_ids)?;
        let nonce = Nonce::derive(chain_ids[0], self.executor.payer(), payment_salt()?);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            nonce = %nonce.0,
            chains = plan.len(),
            "Payment plan ready"
        );

        let onchain_commitment = committed.proof.public_commitment();
        let mut transactions = Vec::with_capacity(plan.len());
        let mut failure = None;

        for entry in plan.entries() {
            let payment = ChainPayment {
                chain_id: entry.chain_id,
                proof: &committed.proof,
                commitment: &onchain_commitment,
                recipient,
                amount: entry.amount,
                token,
                nonce: &nonce,
            };

            match self.executor.execute(payment).await {
                Ok(tx_hash) => {
                    #[cfg(feature = "tracing")]
                    tracing::info!(
                        chain = %crate::networks::evm::EvmNetwork::label(entry.chain_id),
                        amount = %entry.amount,
                        %tx_hash,
                        "Sub-payment submitted"
                    );

                    transactions.push(ChainTransaction {
                        chain_id: entry.chain_id,
                        amount: entry.amount,
                        tx_hash,
                    });
                }
                Err(cause) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        chain = %crate::networks::evm::EvmNetwork::label(entry.chain_id),
                        completed = transactions.len(),
                        "Sub-payment failed, skipping remaining chains: {cause}"
                    );

                    failure = Some(ChainExecutionError {
                        chain_id: entry.chain_id,
                        cause,
                    });
                    break;
                }
            }
        }

        Ok(PaymentResult {
            commitment: committed.commitment,
            nonce,
            plan,
            transactions,
            failure,
        })
    }

    /// Execute a payment described by caller-facing configuration and return
    /// its canonical transaction hash.
    pub async fn execute_payment(&self, config: &PaymentConfig) -> Result<TxHash> {
        let request = PaymentRequest::try_from(config)?;
        self.execute(request).await?.into_tx_hash()
    }

    /// Pay `amount` of the native asset to `recipient` with a fresh secret.
    pub async fn quick_payment(
        &self,
        recipient: Address,
        amount: AmountValue,
        chain_ids: Vec<ChainId>,
    ) -> Result<TxHash> {
        let request = PaymentRequest::builder()
            .recipient(recipient)
            .amount(amount)
            .chain_ids(chain_ids)
            .build();
        self.execute(request).await?.into_tx_hash()
    }

    /// Pay the recipient named by an x402 payment request URL.
    ///
    /// The amount and token are validated before the URL is fetched. A URL
    /// that names no recipient is rejected without proving anything.
    pub async fn x402_payment<R: RecipientResolver>(
        &self,
        resolver: &R,
        config: &X402PaymentConfig,
    ) -> Result<X402Receipt> {
        let amount = parse_amount(&config.amount)?;
        let token = parse_token(config.token.as_deref())?;
        let secret = parse_secret(config.secret.as_deref())?.unwrap_or_else(Secret::random);

        let recipient = resolver.resolve(&config.url).await?;
        if recipient == NO_RECIPIENT {
            return Err(Error::InputValidation(format!(
                "x402 endpoint {} did not name a recipient",
                config.url
            )));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(url = %config.url, %recipient, "Resolved x402 recipient");

        let chain_ids = config
            .chains
            .clone()
            .unwrap_or_else(|| vec![self.config.default_chain_id]);

        let request = PaymentRequest {
            recipient,
            amount,
            token,
            chain_ids,
            secret: Some(secret),
        };

        let result = self.execute(request).await?;
        let commitment = result.commitment();
        let tx_hash = result.into_tx_hash()?;

        Ok(X402Receipt {
            tx_hash,
            commitment,
        })
    }
}
