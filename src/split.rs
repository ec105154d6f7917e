//! Splitting one payment across several chains.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{Error, Result},
    types::{AmountValue, ChainId},
};

/// Amount paid on one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    pub chain_id: ChainId,
    pub amount: AmountValue,
}

/// Ordered per-chain breakdown of a payment. Entries always sum to the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPlan {
    entries: Vec<PlanEntry>,
}

impl PaymentPlan {
    /// Split `total` evenly over `chain_ids`.
    ///
    /// Every chain receives `total / n`; the first chain also receives the
    /// whole remainder `total % n`.
    pub fn split(total: AmountValue, chain_ids: &[ChainId]) -> Result<Self> {
        if chain_ids.is_empty() {
            return Err(Error::InvalidSplit("no chains to split across".to_string()));
        }

        let n = U256::from(chain_ids.len());
        let (base, remainder) = total.0.div_rem(n);

        let entries = chain_ids
            .iter()
            .enumerate()
            .map(|(index, &chain_id)| PlanEntry {
                chain_id,
                amount: AmountValue(if index == 0 { base + remainder } else { base }),
            })
            .collect();

        Ok(PaymentPlan { entries })
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> AmountValue {
        AmountValue(
            self.entries
                .iter()
                .fold(U256::ZERO, |sum, entry| sum + entry.amount.0),
        )
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = ChainId> + '_ {
        self.entries.iter().map(|entry| entry.chain_id)
    }
}
