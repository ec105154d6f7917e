use std::fmt::Debug;

use bon::Builder;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::ChainId;

/// Caller-facing description of a payment.
///
/// Mirrors the JSON shape used by web callers: addresses and the amount are
/// strings and are only validated when turned into a
/// [`PaymentRequest`](crate::request::PaymentRequest).
#[derive(Builder, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfig {
    /// Recipient address.
    #[builder(into)]
    pub recipient: String,
    /// Amount in the asset's smallest unit, base-10.
    #[builder(into)]
    pub amount: String,
    /// ERC-20 token address; native asset when absent.
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Chains to split the payment across. The first one receives any remainder.
    pub chains: Vec<ChainId>,
    /// 32-byte hex secret; generated when absent.
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("recipient", &self.recipient)
            .field("amount", &self.amount)
            .field("token", &self.token)
            .field("chains", &self.chains)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// An x402 payment: the recipient comes from the payment request URL.
#[derive(Builder, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X402PaymentConfig {
    pub url: Url,
    #[builder(into)]
    pub amount: String,
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Defaults to [`OrchestratorConfig::default_chain_id`] when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chains: Option<Vec<ChainId>>,
    /// 32-byte hex secret; generated when absent.
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl Debug for X402PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("X402PaymentConfig")
            .field("url", &self.url.as_str())
            .field("amount", &self.amount)
            .field("token", &self.token)
            .field("chains", &self.chains)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Settings shared by every payment an orchestrator executes.
#[derive(Builder, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Chain paid on when an x402 payment does not name any.
    pub default_chain_id: ChainId,
}
