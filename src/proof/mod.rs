//! Groth16 payment proofs.
//!
//! A proving backend returns its own encoding ([`RawProof`], the snarkjs JSON
//! layout). [`ProofRequester`] derives the circuit inputs, calls the backend
//! and normalizes the result into the [`Proof`] the payment contract expects.

#[cfg(feature = "snarkjs-prover")]
pub mod snarkjs;

use std::{fmt::Debug, str::FromStr};

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    commitment::{Commitment, recipient_hash},
    concepts::Prover,
    errors::ProverError,
    types::{AmountValue, Secret},
};

/// Proof in the layout of the verifier contract:
/// `uint[2] a, uint[2][2] b, uint[2] c` plus public signals `[commitment, amount]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    pub a: [U256; 2],
    pub b: [[U256; 2]; 2],
    pub c: [U256; 2],
    pub public_signals: PublicSignals,
}

impl Proof {
    /// The commitment exactly as the verifier sees it, public signal 0.
    pub fn public_commitment(&self) -> Commitment {
        Commitment(B256::from(self.public_signals.commitment))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicSignals {
    pub commitment: U256,
    pub amount: U256,
}

/// A proof exactly as snarkjs writes it to `proof.json`.
///
/// Points are projective (`pi_a` and `pi_c` carry a third `1` coordinate) and
/// every element of `pi_b` is an Fp2 pair in `[c0, c1]` order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGroth16Proof {
    pub pi_a: Vec<String>,
    pub pi_b: Vec<Vec<String>>,
    pub pi_c: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<String>,
}

/// Backend output: the proof plus its public signals (`public.json`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProof {
    pub proof: RawGroth16Proof,
    pub public_signals: Vec<String>,
}

impl TryFrom<RawProof> for Proof {
    type Error = ProverError;

    /// Normalize the backend encoding.
    ///
    /// The EVM pairing precompile takes Fp2 elements as `[c1, c0]`, the reverse
    /// of what snarkjs emits, so each `pi_b` pair is swapped. Getting this wrong
    /// yields a proof the verifier rejects without further detail.
    fn try_from(raw: RawProof) -> Result<Self, Self::Error> {
        let RawProof {
            proof,
            public_signals,
        } = raw;

        let pi_b = |row: usize, col: usize| -> Result<U256, ProverError> {
            let element = proof
                .pi_b
                .get(row)
                .and_then(|pair| pair.get(col))
                .ok_or_else(|| ProverError::MalformedProof(format!("missing pi_b[{row}][{col}]")))?;
            parse_field(element, "pi_b")
        };

        Ok(Proof {
            a: [
                field_at(&proof.pi_a, 0, "pi_a")?,
                field_at(&proof.pi_a, 1, "pi_a")?,
            ],
            b: [[pi_b(0, 1)?, pi_b(0, 0)?], [pi_b(1, 1)?, pi_b(1, 0)?]],
            c: [
                field_at(&proof.pi_c, 0, "pi_c")?,
                field_at(&proof.pi_c, 1, "pi_c")?,
            ],
            public_signals: PublicSignals {
                commitment: field_at(&public_signals, 0, "publicSignals")?,
                amount: field_at(&public_signals, 1, "publicSignals")?,
            },
        })
    }
}

fn field_at(values: &[String], index: usize, name: &str) -> Result<U256, ProverError> {
    let value = values
        .get(index)
        .ok_or_else(|| ProverError::MalformedProof(format!("missing {name}[{index}]")))?;
    parse_field(value, name)
}

fn parse_field(value: &str, name: &str) -> Result<U256, ProverError> {
    U256::from_str(value)
        .map_err(|err| ProverError::MalformedProof(format!("invalid {name} element {value:?}: {err}")))
}

/// Named circuit inputs `{commitment, amount, secret, recipientHash}`.
///
/// Holds the secret in the clear, so it is zeroized on drop and redacted in
/// `Debug`.
#[derive(Serialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct ProverInput {
    commitment: String,
    amount: String,
    secret: String,
    recipient_hash: String,
}

impl ProverInput {
    pub fn new(secret: &Secret, recipient: Address, amount: AmountValue) -> Self {
        let commitment = Commitment::derive(secret, recipient, amount);
        ProverInput {
            commitment: commitment.0.to_string(),
            amount: amount.to_string(),
            secret: secret.expose().to_string(),
            recipient_hash: recipient_hash(recipient).to_string(),
        }
    }

    pub fn commitment(&self) -> &str {
        &self.commitment
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn recipient_hash(&self) -> &str {
        &self.recipient_hash
    }
}

impl Debug for ProverInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProverInput")
            .field("commitment", &self.commitment)
            .field("amount", &self.amount)
            .field("secret", &"<redacted>")
            .field("recipient_hash", &self.recipient_hash)
            .finish()
    }
}

/// A proof together with the commitment it was generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedProof {
    pub commitment: Commitment,
    pub proof: Proof,
}

/// Turns a payment's private values into a proof via an injected backend.
#[derive(Debug, Clone)]
pub struct ProofRequester<P: Prover> {
    prover: P,
}

impl<P: Prover> ProofRequester<P> {
    pub fn new(prover: P) -> Self {
        ProofRequester { prover }
    }

    pub fn prover(&self) -> &P {
        &self.prover
    }

    /// Derive the commitment and obtain a proof for it.
    ///
    /// Proving is CPU bound and may take seconds; the returned future only
    /// resolves once the backend is done.
    pub async fn request_proof(
        &self,
        secret: &Secret,
        recipient: Address,
        amount: AmountValue,
    ) -> Result<CommittedProof, ProverError> {
        let commitment = Commitment::derive(secret, recipient, amount);
        let input = ProverInput::new(secret, recipient, amount);

        #[cfg(feature = "tracing")]
        tracing::debug!(commitment = %commitment.0, %amount, "Requesting payment proof");

        let raw = self.prover.prove(&input).await?;
        drop(input);

        let proof = Proof::try_from(raw)?;
        if proof.public_signals.amount != amount.0 {
            return Err(ProverError::MalformedProof(format!(
                "public amount {} does not match requested amount {amount}",
                proof.public_signals.amount
            )));
        }

        Ok(CommittedProof { commitment, proof })
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    fn raw_proof(commitment: U256, amount: U256) -> RawProof {
        RawProof {
            proof: RawGroth16Proof {
                pi_a: vec!["1".into(), "2".into(), "1".into()],
                pi_b: vec![
                    vec!["3".into(), "4".into()],
                    vec!["5".into(), "6".into()],
                    vec!["1".into(), "0".into()],
                ],
                pi_c: vec!["7".into(), "8".into(), "1".into()],
                protocol: Some("groth16".into()),
                curve: Some("bn128".into()),
            },
            public_signals: vec![commitment.to_string(), amount.to_string()],
        }
    }

    struct FixedProver;

    impl Prover for FixedProver {
        async fn prove(&self, input: &ProverInput) -> Result<RawProof, ProverError> {
            let commitment = U256::from_str(input.commitment()).unwrap();
            let amount = U256::from_str(input.amount()).unwrap();
            Ok(raw_proof(commitment, amount))
        }
    }

    struct FailingProver;

    impl Prover for FailingProver {
        async fn prove(&self, _input: &ProverInput) -> Result<RawProof, ProverError> {
            Err(ProverError::Rejected("Assert Failed. line: 12".into()))
        }
    }

    #[test]
    fn test_translate_swaps_b_pairs() {
        let proof = Proof::try_from(raw_proof(U256::from(9u64), U256::from(10u64))).unwrap();

        assert_eq!(proof.a, [U256::from(1u64), U256::from(2u64)]);
        assert_eq!(
            proof.b,
            [
                [U256::from(4u64), U256::from(3u64)],
                [U256::from(6u64), U256::from(5u64)],
            ]
        );
        assert_eq!(proof.c, [U256::from(7u64), U256::from(8u64)]);
        assert_eq!(proof.public_signals.commitment, U256::from(9u64));
        assert_eq!(proof.public_signals.amount, U256::from(10u64));
    }

    #[test]
    fn test_translate_rejects_truncated_proof() {
        let mut raw = raw_proof(U256::from(9u64), U256::from(10u64));
        raw.proof.pi_b.truncate(1);
        assert!(matches!(
            Proof::try_from(raw),
            Err(ProverError::MalformedProof(_))
        ));
    }

    #[test]
    fn test_translate_rejects_missing_public_signal() {
        let mut raw = raw_proof(U256::from(9u64), U256::from(10u64));
        raw.public_signals.pop();
        assert!(matches!(
            Proof::try_from(raw),
            Err(ProverError::MalformedProof(_))
        ));
    }

    #[test]
    fn test_prover_input_json_shape() {
        let secret = Secret::from_bytes([0x11; 32]);
        let recipient = address!("0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb0");
        let input = ProverInput::new(&secret, recipient, AmountValue::from(500u64));

        let json = serde_json::to_value(&input).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 4);
        assert_eq!(object["amount"], "500");
        assert_eq!(object["secret"], format!("0x{}", "11".repeat(32)));
        assert_eq!(
            object["commitment"],
            Commitment::derive(&secret, recipient, AmountValue::from(500u64))
                .0
                .to_string()
        );
        assert_eq!(
            object["recipientHash"],
            recipient_hash(recipient).to_string()
        );
        assert!(!format!("{input:?}").contains(&"11".repeat(32)));
    }

    #[tokio::test]
    async fn test_request_proof_binds_commitment() {
        let requester = ProofRequester::new(FixedProver);
        let secret = Secret::from_bytes([0x22; 32]);
        let recipient = address!("0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb0");

        let committed = requester
            .request_proof(&secret, recipient, AmountValue::from(1000u64))
            .await
            .unwrap();

        assert_eq!(
            committed.commitment,
            Commitment::derive(&secret, recipient, AmountValue::from(1000u64))
        );
        assert_eq!(committed.proof.public_commitment(), committed.commitment);
    }

    #[tokio::test]
    async fn test_request_proof_surfaces_backend_error() {
        let requester = ProofRequester::new(FailingProver);
        let err = requester
            .request_proof(
                &Secret::random(),
                address!("0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb0"),
                AmountValue::from(1u64),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ProverError::Rejected(_)));
    }
}
