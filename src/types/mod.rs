//! Value types shared across the payment pipeline.

mod amount;
mod common;
mod secret;

pub use amount::*;
pub use common::*;
pub use secret::*;
