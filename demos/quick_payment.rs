//! Pay a recipient across Sepolia, Optimism Goerli and Arbitrum Goerli.
//!
//! Required environment:
//! - `PRIVATE_KEY`: hex key of the paying account
//! - `CIRCUIT_WASM`, `CIRCUIT_ZKEY`: compiled circuit and proving key
//! - `SEPOLIA_RPC_URL`, `OP_GOERLI_RPC_URL`, `ARB_GOERLI_RPC_URL`
//! - `SEPOLIA_CONTRACT`, `OP_GOERLI_CONTRACT`, `ARB_GOERLI_CONTRACT`
//! - `RECIPIENT`, `AMOUNT` (smallest unit)

use std::env;

use alloy_primitives::Address;
use heka402::{
    config::OrchestratorConfig,
    executor::evm::{ChainEndpoint, EvmChainExecutor, EvmExecutorConfig},
    networks::evm::{
        ExplicitEvmNetwork,
        networks::{ArbitrumGoerli, EthereumSepolia, OptimismGoerli},
    },
    orchestrator::PaymentOrchestrator,
    proof::snarkjs::{CircuitArtifacts, SnarkjsProver, SnarkjsProverConfig},
    types::{AmountValue, ChainId},
};

fn endpoint(
    chain_id: ChainId,
    prefix: &str,
) -> Result<ChainEndpoint, Box<dyn std::error::Error>> {
    Ok(ChainEndpoint::builder()
        .chain_id(chain_id)
        .rpc_url(env::var(format!("{prefix}_RPC_URL"))?.parse()?)
        .contract(env::var(format!("{prefix}_CONTRACT"))?.parse::<Address>()?)
        .build())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let chains = [
        EthereumSepolia::NETWORK.chain_id,
        OptimismGoerli::NETWORK.chain_id,
        ArbitrumGoerli::NETWORK.chain_id,
    ];

    let executor = EvmChainExecutor::from_private_key(
        EvmExecutorConfig::builder()
            .endpoints(vec![
                endpoint(chains[0], "SEPOLIA")?,
                endpoint(chains[1], "OP_GOERLI")?,
                endpoint(chains[2], "ARB_GOERLI")?,
            ])
            .required_confirmations(1)
            .build(),
        &env::var("PRIVATE_KEY")?,
    )?;

    let artifacts =
        CircuitArtifacts::load(env::var("CIRCUIT_WASM")?, env::var("CIRCUIT_ZKEY")?).await?;
    let prover = SnarkjsProver::new(SnarkjsProverConfig::builder().build(), artifacts);

    let orchestrator = PaymentOrchestrator::new(
        OrchestratorConfig::builder().default_chain_id(chains[0]).build(),
        prover,
        executor,
    );

    let recipient: Address = env::var("RECIPIENT")?.parse()?;
    let amount: AmountValue = env::var("AMOUNT")?.parse()?;

    let tx_hash = orchestrator
        .quick_payment(recipient, amount, chains.to_vec())
        .await?;
    tracing::info!(%tx_hash, "Payment complete");

    Ok(())
}
