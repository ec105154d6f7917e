use std::{fmt::Debug, str::FromStr};

use alloy_primitives::{B256, hex::FromHexError};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The payer's blinding value for one payment.
///
/// Not `Clone`: a secret is moved into the proving step and dropped right
/// after, zeroing its bytes.
pub struct Secret(B256);

impl Secret {
    /// Generate a fresh 32-byte secret.
    pub fn random() -> Self {
        Secret(B256::from(rand::random::<[u8; 32]>()))
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Secret(B256::from(bytes))
    }

    /// Expose the raw value. Only the commitment and the prover input may read it.
    pub fn expose(&self) -> &B256 {
        &self.0
    }
}

impl FromStr for Secret {
    type Err = FromHexError;

    /// Parses a 0x-prefixed (or bare) 32-byte hex string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        B256::from_str(s).map(Secret)
    }
}

impl Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl Zeroize for Secret {
    fn zeroize(&mut self) {
        self.0.0.zeroize();
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for Secret {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_secrets_differ() {
        let a = Secret::random();
        let b = Secret::random();
        assert_ne!(a.expose(), b.expose());
    }

    #[test]
    fn test_parse_hex_secret() {
        let hex = format!("0x{}", "11".repeat(32));
        let secret: Secret = hex.parse().unwrap();
        assert_eq!(*secret.expose(), B256::repeat_byte(0x11));
    }

    #[test]
    fn test_reject_short_secret() {
        assert!("0x1234".parse::<Secret>().is_err());
    }

    #[test]
    fn test_debug_is_redacted() {
        let secret = Secret::from_bytes([0xab; 32]);
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("abab"));
    }

    #[test]
    fn test_zeroize_clears_bytes() {
        let mut secret = Secret::from_bytes([0x42; 32]);
        secret.zeroize();
        assert_eq!(*secret.expose(), B256::ZERO);
    }
}
