//! Interchain Security Module verifier.
//!
//! Verifies that a message was included in the AppLayer's mailbox by
//! reconstructing the mailbox's incremental Merkle tree root from a 32-deep
//! inclusion proof and comparing it against the latest finalized mailbox
//! root. Grounded in `merklith_crypto::merkle`'s `hash_pair`/`MerkleProof`
//! bit-indexed fold, generalized here to the fixed 32-level depth Hyperlane's
//! mailbox tree always uses (`2^32` leaves of headroom, never a partial
//! tree shape to infer).

use merklith_crypto::hash::hash_pair;
use merklith_types::Hash;

use crate::error::BridgeError;
use crate::events::{BridgeEvent, EventSink, IsmPaused, IsmUnpaused};
use crate::state::BridgeStore;

/// Concatenation of the ASCII tag `"router_ism"`, zero padding up to byte 23,
/// a one-byte type `0xFF` at index 23, and zero padding out to 32 bytes.
/// Matches `hyperlaneutil.DecodeHexAddress` of
/// `0x726f757465725f69736d00000000000000000000000000ff0000000000000000`.
pub const EXPECTED_ISM_ID: [u8; 32] = {
    let mut bytes = [0u8; 32];
    let tag = b"router_ism";
    let mut i = 0;
    while i < tag.len() {
        bytes[i] = tag[i];
        i += 1;
    }
    bytes[23] = 0xFF;
    bytes
};

pub const PROOF_DEPTH: usize = 32;
const METADATA_LEN: usize = 4 + PROOF_DEPTH * 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsmMetadata {
    pub index: u32,
    pub proof: [Hash; PROOF_DEPTH],
}

impl IsmMetadata {
    /// Parse the fixed 1028-byte wire format: a 4-byte big-endian index
    /// followed by 32 consecutive 32-byte sibling hashes.
    pub fn parse(bytes: &[u8]) -> Result<Self, BridgeError> {
        if bytes.len() != METADATA_LEN {
            return Err(BridgeError::InvalidMetadata(format!(
                "must be {METADATA_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        let index = u32::from_be_bytes(bytes[0..4].try_into().unwrap());

        let mut proof = [Hash::ZERO; PROOF_DEPTH];
        for (i, slot) in proof.iter_mut().enumerate() {
            let start = 4 + i * 32;
            let mut buf = [0u8; 32];
            buf.copy_from_slice(&bytes[start..start + 32]);
            *slot = Hash::from_bytes(buf);
        }

        Ok(Self { index, proof })
    }

    /// Encode back to the fixed 1028-byte wire format, the inverse of
    /// `parse`. Always produces exactly `METADATA_LEN` bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(METADATA_LEN);
        out.extend_from_slice(&self.index.to_be_bytes());
        for sibling in &self.proof {
            out.extend_from_slice(sibling.as_bytes());
        }
        out
    }
}

/// Reconstruct the mailbox tree root from a message id, its 32-sibling
/// proof, and its leaf index, folding one level per bit of `index` from the
/// leaf upward. This is the standard Hyperlane/Merkle incremental-tree
/// branch reconstruction, not `merklith_crypto::MerkleProof::compute_root`
/// (that type carries a variable-depth proof derived from a concrete tree;
/// this one always walks the full 32 levels regardless of how many leaves
/// actually exist).
pub fn branch_root(message_id: Hash, proof: &[Hash; PROOF_DEPTH], index: u32) -> Hash {
    let mut current = message_id;
    for (i, sibling) in proof.iter().enumerate() {
        if (index >> i) & 1 == 1 {
            current = hash_pair(sibling, &current);
        } else {
            current = hash_pair(&current, sibling);
        }
    }
    current
}

/// `exists(ismId)`: true iff `ism_id` equals the fixed expected constant.
pub fn exists(ism_id: &[u8; 32]) -> bool {
    *ism_id == EXPECTED_ISM_ID
}

/// `verify(metadataBytes, message)`.
pub fn verify(store: &BridgeStore, metadata_bytes: &[u8], message_id: Hash) -> Result<bool, BridgeError> {
    if store.ism_paused() {
        return Err(BridgeError::UnableToVerify("paused".to_string()));
    }

    let metadata = IsmMetadata::parse(metadata_bytes)?;
    let computed = branch_root(message_id, &metadata.proof, metadata.index);

    let stored = store
        .latest_mailbox_root()
        .map_err(|_| BridgeError::UnableToVerify("no finalized mailbox root".to_string()))?;

    Ok(computed == stored)
}

/// Authority-gated `pause`. Rejects a redundant pause-while-paused.
pub fn pause(store: &BridgeStore, sink: &dyn EventSink) -> Result<(), BridgeError> {
    let was_paused = store.set_ism_paused(true)?;
    if was_paused {
        return Err(BridgeError::InvalidRequest("already paused".to_string()));
    }
    sink.emit(BridgeEvent::IsmPaused(IsmPaused));
    Ok(())
}

/// Authority-gated `unpause`. Rejects a redundant unpause-while-unpaused.
pub fn unpause(store: &BridgeStore, sink: &dyn EventSink) -> Result<(), BridgeError> {
    let was_paused = store.set_ism_paused(false)?;
    if !was_paused {
        return Err(BridgeError::InvalidRequest("already unpaused".to_string()));
    }
    sink.emit(BridgeEvent::IsmUnpaused(IsmUnpaused));
    Ok(())
}
