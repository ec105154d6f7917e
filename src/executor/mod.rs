//! Chain executors.
//!
//! - **[`evm`]**: submits sub-payments to the payment contract through alloy providers.

#[cfg(feature = "evm-executor")]
pub mod evm;
