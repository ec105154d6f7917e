use std::collections::HashMap;

use alloy::{
    network::EthereumWallet,
    primitives::{Address, U256},
    providers::{DynProvider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    sol,
};
use bon::Builder;
use url::Url;

use crate::{
    concepts::{ChainExecutor, ChainPayment},
    errors::ExecutorError,
    types::{ChainId, TxHash},
};

sol! {
    #[sol(rpc)]
    interface IPrivacyPaymentAccount {
        function executePayment(
            uint[2] a,
            uint[2][2] b,
            uint[2] c,
            bytes32 commitment,
            address recipient,
            uint256 amount,
            address token,
            uint256 nonce
        ) external payable;
    }
}

/// Where the payment contract lives on one chain.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct ChainEndpoint {
    pub chain_id: ChainId,
    pub rpc_url: Url,
    #[builder(into)]
    pub contract: Address,
}

#[derive(Builder, Debug, Clone)]
pub struct EvmExecutorConfig {
    pub endpoints: Vec<ChainEndpoint>,
    /// Wait for this many confirmations before reporting a sub-payment as
    /// submitted. `0` returns as soon as the node accepts the transaction.
    #[builder(default)]
    pub required_confirmations: u64,
}

struct Deployment {
    provider: DynProvider,
    contract: Address,
}

/// Submits sub-payments through alloy providers, one per configured chain,
/// all signing with the same local key.
pub struct EvmChainExecutor {
    deployments: HashMap<ChainId, Deployment>,
    payer: Address,
    required_confirmations: u64,
}

impl EvmChainExecutor {
    pub fn new(config: EvmExecutorConfig, signer: PrivateKeySigner) -> Self {
        let payer = signer.address();
        let wallet = EthereumWallet::from(signer);

        let deployments = config
            .endpoints
            .into_iter()
            .map(|endpoint| {
                let provider = DynProvider::new(
                    ProviderBuilder::new()
                        .wallet(wallet.clone())
                        .connect_http(endpoint.rpc_url),
                );
                (
                    endpoint.chain_id,
                    Deployment {
                        provider,
                        contract: endpoint.contract,
                    },
                )
            })
            .collect();

        EvmChainExecutor {
            deployments,
            payer,
            required_confirmations: config.required_confirmations,
        }
    }

    /// Build the executor from a hex private key.
    pub fn from_private_key(
        config: EvmExecutorConfig,
        private_key: &str,
    ) -> Result<Self, ExecutorError> {
        let signer: PrivateKeySigner = private_key
            .parse()
            .map_err(|e| ExecutorError::Signer(format!("Invalid private key: {e}")))?;
        Ok(Self::new(config, signer))
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = ChainId> + '_ {
        self.deployments.keys().copied()
    }
}

/// Encode a sub-payment as a contract call and the native value it carries.
///
/// Native payments attach `amount` as value; token payments attach nothing
/// and leave the transfer to the contract.
pub fn payment_call(
    payment: &ChainPayment<'_>,
) -> (IPrivacyPaymentAccount::executePaymentCall, U256) {
    let call = IPrivacyPaymentAccount::executePaymentCall {
        a: payment.proof.a,
        b: payment.proof.b,
        c: payment.proof.c,
        commitment: payment.commitment.0,
        recipient: payment.recipient,
        amount: payment.amount.0,
        token: payment.token.address(),
        nonce: payment.nonce.to_u256(),
    };
    let value = if payment.token.is_native() {
        payment.amount.0
    } else {
        U256::ZERO
    };
    (call, value)
}

impl ChainExecutor for EvmChainExecutor {
    fn payer(&self) -> Address {
        self.payer
    }

    async fn execute(&self, payment: ChainPayment<'_>) -> Result<TxHash, ExecutorError> {
        let deployment = self
            .deployments
            .get(&payment.chain_id)
            .ok_or(ExecutorError::UnknownChain(payment.chain_id))?;

        let (call, value) = payment_call(&payment);
        let account = IPrivacyPaymentAccount::new(deployment.contract, &deployment.provider);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            chain_id = payment.chain_id,
            contract = %deployment.contract,
            %value,
            "Submitting executePayment"
        );

        let pending = account
            .call_builder(&call)
            .value(value)
            .send()
            .await
            .map_err(|e| ExecutorError::Rpc(e.to_string()))?;
        let tx_hash = *pending.tx_hash();

        if self.required_confirmations > 0 {
            let receipt = pending
                .with_required_confirmations(self.required_confirmations)
                .get_receipt()
                .await
                .map_err(|e| ExecutorError::Rpc(e.to_string()))?;
            if !receipt.status() {
                return Err(ExecutorError::Reverted(format!(
                    "transaction {tx_hash} reverted in block {}",
                    receipt.block_number.unwrap_or_default()
                )));
            }
        }

        Ok(tx_hash)
    }
}
