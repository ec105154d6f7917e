//! # Heka402
//!
//! Privacy-preserving payments over x402, split across several EVM chains.
//!
//! A payment is bound to a hiding commitment over a random secret, the
//! recipient and the total amount. One zero-knowledge proof of knowledge of
//! that secret authorizes every sub-payment, and one nonce shared by all
//! chains keeps the contracts from accepting the same payment twice.
//!
//! ## Core Components Overview
//!
//! - **[`commitment`]**: Commitment derivation.
//! - **[`proof`]**: Proof requests and normalization of backend proofs.
//! - **[`nonce`]**: Cross-chain nonce derivation.
//! - **[`split`]**: Splitting a total amount into a per-chain plan.
//! - **[`orchestrator`]**: End-to-end payment execution, including x402 payments.
//!
//! ## Pluggable Backends
//!
//! The orchestrator only depends on the traits in [`concepts`]:
//!
//! - [`Prover`](concepts::Prover): the snarkjs backend lives in [`proof::snarkjs`]
//!   behind the `snarkjs-prover` feature.
//! - [`ChainExecutor`](concepts::ChainExecutor): the alloy backend lives in
//!   [`executor::evm`] behind the `evm-executor` feature.
//! - [`RecipientResolver`](concepts::RecipientResolver): the HTTP backend lives in
//!   [`x402`] behind the `x402-resolver` feature.
//!
//! ## Example
//!
//! ```no_run
//! # #[cfg(all(feature = "evm-executor", feature = "snarkjs-prover"))]
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use heka402::{
//!     config::{OrchestratorConfig, PaymentConfig},
//!     executor::evm::{ChainEndpoint, EvmChainExecutor, EvmExecutorConfig},
//!     orchestrator::PaymentOrchestrator,
//!     proof::snarkjs::{CircuitArtifacts, SnarkjsProver, SnarkjsProverConfig},
//! };
//!
//! let artifacts = CircuitArtifacts::load("circuit.wasm", "circuit.zkey").await?;
//! let prover = SnarkjsProver::new(SnarkjsProverConfig::builder().build(), artifacts);
//! let executor = EvmChainExecutor::from_private_key(
//!     EvmExecutorConfig::builder()
//!         .endpoints(vec![
//!             ChainEndpoint::builder()
//!                 .chain_id(11155111)
//!                 .rpc_url("https://rpc.sepolia.org".parse()?)
//!                 .contract("0x5FbDB2315678afecb367f032d93F642f64180aa3".parse::<alloy_primitives::Address>()?)
//!                 .build(),
//!         ])
//!         .build(),
//!     &std::env::var("PRIVATE_KEY")?,
//! )?;
//!
//! let orchestrator = PaymentOrchestrator::new(
//!     OrchestratorConfig::builder().default_chain_id(11155111).build(),
//!     prover,
//!     executor,
//! );
//!
//! let tx_hash = orchestrator
//!     .execute_payment(
//!         &PaymentConfig::builder()
//!             .recipient("0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb0")
//!             .amount("100000000000000000")
//!             .chains(vec![11155111])
//!             .build(),
//!     )
//!     .await?;
//! println!("paid in {tx_hash}");
//! # Ok(())
//! # }
//! ```

pub mod commitment;
pub mod concepts;
pub mod config;
pub mod errors;
pub mod executor;
pub mod networks;
pub mod nonce;
pub mod orchestrator;
pub mod proof;
pub mod request;
pub mod split;
pub mod types;

#[cfg(feature = "x402-resolver")]
pub mod x402;
