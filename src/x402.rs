//! Recipient resolution for x402 payment request URLs.
//!
//! The resolver looks for the address to pay in this order:
//!
//! 1. A top-level `recipient` field in the JSON body
//! 2. The first usable `accepts[].payTo` of an x402 `PaymentRequired` body
//! 3. The same `PaymentRequired` JSON carried base64-encoded in the
//!    `PAYMENT-REQUIRED` response header
//!
//! Anything else resolves to [`NO_RECIPIENT`].

use alloy_primitives::Address;
use base64::{Engine, prelude::BASE64_STANDARD};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::{
    concepts::{NO_RECIPIENT, RecipientResolver},
    errors::ResolverError,
};

pub const PAYMENT_REQUIRED_HEADER: &str = "payment-required";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentRequestBody {
    #[serde(default)]
    recipient: Option<String>,
    #[serde(default)]
    accepts: Vec<AcceptedPayment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AcceptedPayment {
    #[serde(default)]
    pay_to: Option<String>,
}

impl PaymentRequestBody {
    fn recipient(&self) -> Option<Address> {
        self.recipient.as_deref().and_then(usable_address).or_else(|| {
            self.accepts
                .iter()
                .find_map(|accepted| accepted.pay_to.as_deref().and_then(usable_address))
        })
    }
}

fn usable_address(value: &str) -> Option<Address> {
    value
        .trim()
        .parse::<Address>()
        .ok()
        .filter(|address| *address != NO_RECIPIENT)
}

/// Extract the recipient from a response body.
///
/// Returns `None` for anything but a JSON object naming a usable address.
pub fn recipient_from_body(body: &[u8]) -> Option<Address> {
    let value = serde_json::from_slice::<Value>(body).ok()?;
    if !value.is_object() {
        return None;
    }
    serde_json::from_value::<PaymentRequestBody>(value)
        .ok()?
        .recipient()
}

/// Extract the recipient from a base64 `PAYMENT-REQUIRED` header value.
pub fn recipient_from_header(value: &str) -> Option<Address> {
    let decoded = BASE64_STANDARD.decode(value.trim()).ok()?;
    recipient_from_body(&decoded)
}

/// Resolves recipients with a plain HTTP GET.
///
/// Non-success statuses are not errors: an x402 endpoint answers `402 Payment
/// Required` with the payment details. Only transport failures are reported.
#[derive(Debug, Clone, Default)]
pub struct HttpX402Resolver {
    client: reqwest::Client,
}

impl HttpX402Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        HttpX402Resolver { client }
    }
}

impl RecipientResolver for HttpX402Resolver {
    async fn resolve(&self, url: &Url) -> Result<Address, ResolverError> {
        let response = self.client.get(url.clone()).send().await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(%url, status = %response.status(), "Fetched x402 payment request");

        let header = response
            .headers()
            .get(PAYMENT_REQUIRED_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?;

        let recipient = recipient_from_body(&body)
            .or_else(|| header.as_deref().and_then(recipient_from_header))
            .unwrap_or(NO_RECIPIENT);

        #[cfg(feature = "tracing")]
        if recipient == NO_RECIPIENT {
            tracing::warn!(%url, "x402 endpoint named no recipient");
        }

        Ok(recipient)
    }
}
