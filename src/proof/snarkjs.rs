use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use bon::Builder;
use tokio::{io::AsyncWriteExt, process::Command};
use zeroize::Zeroizing;

use crate::{
    concepts::Prover,
    errors::ProverError,
    proof::{ProverInput, RawGroth16Proof, RawProof},
};

const INPUT_FILE: &str = "input.json";
const WASM_FILE: &str = "circuit.wasm";
const ZKEY_FILE: &str = "circuit.zkey";
const PROOF_FILE: &str = "proof.json";
const PUBLIC_FILE: &str = "public.json";

/// Compiled circuit (`.wasm` witness generator) and Groth16 proving key (`.zkey`).
///
/// Both are opaque to this crate and only handed to the backend.
#[derive(Clone)]
pub struct CircuitArtifacts {
    pub wasm: Vec<u8>,
    pub zkey: Vec<u8>,
}

impl CircuitArtifacts {
    /// Read both artifacts from disk.
    pub async fn load(
        wasm_path: impl AsRef<Path>,
        zkey_path: impl AsRef<Path>,
    ) -> Result<Self, ProverError> {
        Ok(CircuitArtifacts {
            wasm: tokio::fs::read(wasm_path).await?,
            zkey: tokio::fs::read(zkey_path).await?,
        })
    }
}

impl std::fmt::Debug for CircuitArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitArtifacts")
            .field("wasm_len", &self.wasm.len())
            .field("zkey_len", &self.zkey.len())
            .finish()
    }
}

#[derive(Builder, Debug, Clone)]
pub struct SnarkjsProverConfig {
    /// The `snarkjs` executable.
    #[builder(into, default = PathBuf::from("snarkjs"))]
    pub binary: PathBuf,
    /// Parent directory for per-proof scratch directories.
    #[builder(into, default = std::env::temp_dir())]
    pub scratch_dir: PathBuf,
}

/// Generates proofs by shelling out to `snarkjs groth16 fullprove`.
///
/// Each proof runs in its own owner-only scratch directory:
/// 1. Writes the circuit inputs (mode `0600`) and both artifacts
/// 2. Runs `snarkjs groth16 fullprove`
/// 3. Reads `proof.json` and `public.json`
/// 4. Removes the directory, including the input file holding the secret
///
/// Dropping the `prove` future kills snarkjs and removes the directory too.
#[derive(Debug, Clone)]
pub struct SnarkjsProver {
    config: SnarkjsProverConfig,
    artifacts: Arc<CircuitArtifacts>,
}

impl SnarkjsProver {
    pub fn new(config: SnarkjsProverConfig, artifacts: CircuitArtifacts) -> Self {
        SnarkjsProver {
            config,
            artifacts: Arc::new(artifacts),
        }
    }

    async fn prove_in(&self, dir: &Path, input: &ProverInput) -> Result<RawProof, ProverError> {
        let input_json = Zeroizing::new(serde_json::to_vec(input)?);
        write_private(&dir.join(INPUT_FILE), &input_json).await?;
        drop(input_json);
        tokio::fs::write(dir.join(WASM_FILE), &self.artifacts.wasm).await?;
        tokio::fs::write(dir.join(ZKEY_FILE), &self.artifacts.zkey).await?;

        let output = Command::new(&self.config.binary)
            .args([
                "groth16",
                "fullprove",
                INPUT_FILE,
                WASM_FILE,
                ZKEY_FILE,
                PROOF_FILE,
                PUBLIC_FILE,
            ])
            .current_dir(dir)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| {
                ProverError::Backend(format!(
                    "failed to run {}: {err}",
                    self.config.binary.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(classify_failure(&format!("{stderr}{stdout}")));
        }

        let proof_json = tokio::fs::read(dir.join(PROOF_FILE)).await?;
        let public_json = tokio::fs::read(dir.join(PUBLIC_FILE)).await?;
        parse_output(&proof_json, &public_json)
    }
}

impl Prover for SnarkjsProver {
    async fn prove(&self, input: &ProverInput) -> Result<RawProof, ProverError> {
        let scratch = ScratchDir::create(&self.config.scratch_dir)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(dir = %scratch.path().display(), "Running snarkjs groth16 fullprove");

        self.prove_in(scratch.path(), input).await
    }
}

/// Per-proof working directory, owner-only, removed when dropped.
///
/// Removal happens in `Drop` so that a cancelled or timed out proof still
/// deletes `input.json` and the secret it holds.
#[derive(Debug)]
struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    fn create(parent: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(parent)?;
        let path = parent.join(format!("heka402-proof-{:016x}", rand::random::<u64>()));

        let mut builder = std::fs::DirBuilder::new();
        #[cfg(unix)]
        std::os::unix::fs::DirBuilderExt::mode(&mut builder, 0o700);
        builder.create(&path)?;

        Ok(ScratchDir { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(_err) = std::fs::remove_dir_all(&self.path) {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "Failed to remove proof scratch directory {}: {_err}",
                self.path.display()
            );
        }
    }
}

/// Write a new file readable by the owner only.
async fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(contents).await?;
    file.flush().await
}

/// Witness generation failures mean the circuit constraints rejected the inputs.
fn classify_failure(diagnostic: &str) -> ProverError {
    let diagnostic = diagnostic.trim().to_string();
    if diagnostic.contains("Assert Failed") || diagnostic.contains("Error in template") {
        ProverError::Rejected(diagnostic)
    } else {
        ProverError::Backend(diagnostic)
    }
}

fn parse_output(proof_json: &[u8], public_json: &[u8]) -> Result<RawProof, ProverError> {
    let proof: RawGroth16Proof = serde_json::from_slice(proof_json)?;
    let public_signals: Vec<String> = serde_json::from_slice(public_json)?;
    Ok(RawProof {
        proof,
        public_signals,
    })
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;

    use super::*;
    use crate::proof::Proof;

    const PROOF_JSON: &str = r#"{
        "pi_a": ["111", "112", "1"],
        "pi_b": [["121", "122"], ["123", "124"], ["1", "0"]],
        "pi_c": ["131", "132", "1"],
        "protocol": "groth16",
        "curve": "bn128"
    }"#;

    const PUBLIC_JSON: &str = r#"["987654321", "1000"]"#;

    #[test]
    fn test_parse_snarkjs_output() {
        let raw = parse_output(PROOF_JSON.as_bytes(), PUBLIC_JSON.as_bytes()).unwrap();
        assert_eq!(raw.proof.protocol.as_deref(), Some("groth16"));
        assert_eq!(raw.public_signals, vec!["987654321", "1000"]);

        let proof = Proof::try_from(raw).unwrap();
        assert_eq!(proof.b[0], [U256::from(122u64), U256::from(121u64)]);
        assert_eq!(proof.b[1], [U256::from(124u64), U256::from(123u64)]);
        assert_eq!(proof.public_signals.amount, U256::from(1000u64));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_output(b"not json", PUBLIC_JSON.as_bytes()).unwrap_err();
        assert!(matches!(err, ProverError::Serialization(_)));
    }

    #[test]
    fn test_classify_constraint_failure() {
        assert!(matches!(
            classify_failure("Error: Assert Failed.\nError in template Payment_12 line: 30"),
            ProverError::Rejected(_)
        ));
        assert!(matches!(
            classify_failure("ENOENT: no such file"),
            ProverError::Backend(_)
        ));
    }

    #[test]
    fn test_config_defaults() {
        let config = SnarkjsProverConfig::builder().build();
        assert_eq!(config.binary, PathBuf::from("snarkjs"));
        assert_eq!(config.scratch_dir, std::env::temp_dir());
    }

    fn scratch_parent() -> PathBuf {
        std::env::temp_dir().join(format!("heka402-test-{:016x}", rand::random::<u64>()))
    }

    fn input() -> ProverInput {
        ProverInput::new(
            &crate::types::Secret::from_bytes([0x01; 32]),
            alloy_primitives::Address::repeat_byte(0x02),
            crate::types::AmountValue::from(1u64),
        )
    }

    fn is_empty_dir(path: &Path) -> bool {
        std::fs::read_dir(path).unwrap().next().is_none()
    }

    #[test]
    fn test_scratch_dir_removed_on_drop() {
        let parent = scratch_parent();
        let scratch = ScratchDir::create(&parent).unwrap();
        let path = scratch.path().to_path_buf();
        std::fs::write(path.join(INPUT_FILE), b"{}").unwrap();
        assert!(path.exists());

        drop(scratch);

        assert!(!path.exists());
        std::fs::remove_dir(&parent).unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_scratch_files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let parent = scratch_parent();
        let scratch = ScratchDir::create(&parent).unwrap();
        let input_path = scratch.path().join(INPUT_FILE);
        write_private(&input_path, b"{\"secret\":\"0x01\"}").await.unwrap();

        let dir_mode = std::fs::metadata(scratch.path()).unwrap().permissions().mode();
        let file_mode = std::fs::metadata(&input_path).unwrap().permissions().mode();
        assert_eq!(dir_mode & 0o777, 0o700);
        assert_eq!(file_mode & 0o777, 0o600);

        drop(scratch);
        std::fs::remove_dir(&parent).unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cancelled_proof_leaves_no_files() {
        use std::os::unix::fs::PermissionsExt;

        let parent = scratch_parent();
        std::fs::create_dir_all(&parent).unwrap();
        let binary = parent.join("slow-snarkjs");
        std::fs::write(&binary, "#!/bin/sh\nsleep 5\n").unwrap();
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).unwrap();

        let scratch_dir = parent.join("scratch");
        let prover = SnarkjsProver::new(
            SnarkjsProverConfig::builder()
                .binary(binary)
                .scratch_dir(scratch_dir.clone())
                .build(),
            CircuitArtifacts {
                wasm: vec![0x00, 0x61, 0x73, 0x6d],
                zkey: vec![0x7a, 0x6b, 0x65, 0x79],
            },
        );

        let input = input();
        let outcome = tokio::time::timeout(
            std::time::Duration::from_millis(500),
            prover.prove(&input),
        )
        .await;

        assert!(outcome.is_err(), "proving should still be running");
        assert!(is_empty_dir(&scratch_dir));
        std::fs::remove_dir_all(&parent).unwrap();
    }

    #[tokio::test]
    async fn test_missing_binary_is_backend_error() {
        let prover = SnarkjsProver::new(
            SnarkjsProverConfig::builder()
                .binary("/nonexistent/heka402-snarkjs")
                .build(),
            CircuitArtifacts {
                wasm: vec![0x00, 0x61, 0x73, 0x6d],
                zkey: vec![0x7a, 0x6b, 0x65, 0x79],
            },
        );
        let err = prover.prove(&input()).await.unwrap_err();
        assert!(matches!(err, ProverError::Backend(_)));
    }
}
