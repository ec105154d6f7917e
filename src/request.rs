use std::{collections::HashSet, str::FromStr};

use alloy_primitives::Address;
use bon::Builder;

use crate::{
    config::PaymentConfig,
    errors::{Error, Result},
    networks::evm::Token,
    types::{AmountValue, ChainId, Secret},
};

/// A validated payment intent.
#[derive(Builder, Debug)]
pub struct PaymentRequest {
    #[builder(into)]
    pub recipient: Address,
    #[builder(into)]
    pub amount: AmountValue,
    #[builder(into, default)]
    pub token: Token,
    #[builder(into)]
    pub chain_ids: Vec<ChainId>,
    /// Generated fresh when absent.
    pub secret: Option<Secret>,
}

impl PaymentRequest {
    /// Check the request invariants. Runs before any external call.
    pub fn validate(&self) -> Result<()> {
        if self.recipient == Address::ZERO {
            return Err(Error::InputValidation(
                "recipient must not be the zero address".to_string(),
            ));
        }
        if self.amount.is_zero() {
            return Err(Error::InputValidation(
                "amount must be greater than zero".to_string(),
            ));
        }
        if self.chain_ids.is_empty() {
            return Err(Error::InputValidation(
                "at least one chain is required".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.chain_ids.len());
        if let Some(duplicate) = self.chain_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(Error::InputValidation(format!(
                "chain {duplicate} is listed more than once"
            )));
        }

        Ok(())
    }
}

impl TryFrom<&PaymentConfig> for PaymentRequest {
    type Error = Error;

    fn try_from(config: &PaymentConfig) -> Result<Self> {
        let recipient = Address::from_str(&config.recipient).map_err(|err| {
            Error::InputValidation(format!("invalid recipient {:?}: {err}", config.recipient))
        })?;
        let amount = parse_amount(&config.amount)?;
        let token = parse_token(config.token.as_deref())?;
        let secret = parse_secret(config.secret.as_deref())?;

        let request = PaymentRequest {
            recipient,
            amount,
            token,
            chain_ids: config.chains.clone(),
            secret,
        };
        request.validate()?;
        Ok(request)
    }
}

pub(crate) fn parse_amount(amount: &str) -> Result<AmountValue> {
    AmountValue::from_str(amount)
        .map_err(|err| Error::InputValidation(format!("invalid amount {amount:?}: {err}")))
}

pub(crate) fn parse_token(token: Option<&str>) -> Result<Token> {
    token
        .map(Address::from_str)
        .transpose()
        .map(Token::from)
        .map_err(|err| Error::InputValidation(format!("invalid token address: {err}")))
}

pub(crate) fn parse_secret(secret: Option<&str>) -> Result<Option<Secret>> {
    secret
        .map(Secret::from_str)
        .transpose()
        .map_err(|err| Error::InputValidation(format!("invalid secret: {err}")))
}
