//! VRF (Verifiable Random Function) implementation using Ed25519.
//!
//! This is a simplified VRF implementation that uses Ed25519 signatures
//! as the basis for verifiable randomness.

use crate::error::CryptoError;
use merklith_types::{Ed25519PublicKey, Ed25519Signature, Hash};

/// VRF output and proof.
/// Used for committee selection — generates verifiable randomness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VRFOutput {
    /// The random output (32 bytes, uniformly distributed)
    pub output: Hash,
    /// Proof that the output was correctly generated (the signature)
    pub proof: Ed25519Signature,
}

impl VRFOutput {
    /// Create a new VRF output
    pub fn new(output: Hash, proof: Ed25519Signature) -> Self {
        Self { output, proof }
    }
}

/// Generate a VRF output.
///
/// Given a secret key and a message (typically block hash as seed),
/// produces a deterministic random output with a proof that anyone
/// can verify using the corresponding public key.
pub fn vrf_prove(
    secret_key: &crate::ed25519::Keypair,
    message: &[u8],
) -> VRFOutput {
    // Sign the message
    let signature = secret_key.sign(message);

    // Hash the signature to get the output
    let output = Hash::compute(signature.as_bytes());

    VRFOutput::new(output, signature)
}

/// Verify a VRF output.
pub fn vrf_verify(
    public_key: &Ed25519PublicKey,
    message: &[u8],
    output: &VRFOutput,
) -> Result<(), CryptoError> {
    // Verify the signature
    crate::ed25519::verify(public_key, message, &output.proof)?;

    // Verify the output matches the signature hash
    let expected_output = Hash::compute(output.proof.as_bytes());
    if expected_output != output.output {
        return Err(CryptoError::VRFProofInvalid);
    }

    Ok(())
}

/// Convert VRF output to a number in range [0, max).
/// Used for weighted committee selection.
pub fn vrf_output_to_index(output: &Hash, max: u64) -> u64 {
    let bytes = output.as_bytes();
    // Use first 8 bytes as u64
    let num = u64::from_le_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ]);
    num % max
}

/// Generate deterministic randomness from VRF output
pub fn vrf_to_randomness(output: &Hash) -> [u8; 32] {
    *output.as_bytes()
}
