//! Pay the recipient named by an x402 payment request URL.
//!
//! Required environment:
//! - `PRIVATE_KEY`, `CIRCUIT_WASM`, `CIRCUIT_ZKEY`
//! - `BASE_SEPOLIA_RPC_URL`, `BASE_SEPOLIA_CONTRACT`
//! - `X402_URL`, `AMOUNT` (smallest unit)

use std::env;

use alloy_primitives::Address;
use heka402::{
    config::{OrchestratorConfig, X402PaymentConfig},
    executor::evm::{ChainEndpoint, EvmChainExecutor, EvmExecutorConfig},
    networks::evm::{ExplicitEvmNetwork, networks::BaseSepolia},
    orchestrator::PaymentOrchestrator,
    proof::snarkjs::{CircuitArtifacts, SnarkjsProver, SnarkjsProverConfig},
    x402::HttpX402Resolver,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let chain_id = BaseSepolia::NETWORK.chain_id;
    let executor = EvmChainExecutor::from_private_key(
        EvmExecutorConfig::builder()
            .endpoints(vec![
                ChainEndpoint::builder()
                    .chain_id(chain_id)
                    .rpc_url(env::var("BASE_SEPOLIA_RPC_URL")?.parse()?)
                    .contract(env::var("BASE_SEPOLIA_CONTRACT")?.parse::<Address>()?)
                    .build(),
            ])
            .build(),
        &env::var("PRIVATE_KEY")?,
    )?;

    let artifacts =
        CircuitArtifacts::load(env::var("CIRCUIT_WASM")?, env::var("CIRCUIT_ZKEY")?).await?;

    let orchestrator = PaymentOrchestrator::new(
        OrchestratorConfig::builder().default_chain_id(chain_id).build(),
        SnarkjsProver::new(SnarkjsProverConfig::builder().build(), artifacts),
        executor,
    );

    let receipt = orchestrator
        .x402_payment(
            &HttpX402Resolver::new(),
            &X402PaymentConfig::builder()
                .url(env::var("X402_URL")?.parse()?)
                .amount(env::var("AMOUNT")?)
                .build(),
        )
        .await?;

    tracing::info!(
        tx_hash = %receipt.tx_hash,
        commitment = %receipt.commitment.0,
        "x402 payment complete"
    );

    Ok(())
}
