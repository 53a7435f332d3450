//! Canonical vote-extension encoding.
//!
//! The tally engine buckets votes by the raw bytes of their encoded
//! extension, so the encoder must be pinned byte-exactly: field order,
//! hex casing, and absence of whitespace all matter. Any drift here
//! silently fragments tallies across replicas and stalls finalization.

use std::time::Duration;

use merklith_types::Hash;

use crate::error::BridgeError;
use crate::observer::{self, AppLayerClient};
use crate::types::{AppLayerAddress, Epoch, Observation};

/// A validator's observation of the AppLayer at a pending epoch's end
/// height, piggy-backed on a BFT precommit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteExtension {
    pub epoch_number: u64,
    pub state_root: Hash,
    pub mailbox_root: Hash,
}

impl VoteExtension {
    /// Encode as the canonical JSON wire form:
    /// `{"nova":{"epoch_number":N,"state_root":"0x...","mailbox_root":"0x..."}}`
    pub fn encode(&self) -> Vec<u8> {
        format!(
            r#"{{"nova":{{"epoch_number":{},"state_root":"0x{}","mailbox_root":"0x{}"}}}}"#,
            self.epoch_number,
            hex::encode(self.state_root.as_bytes()),
            hex::encode(self.mailbox_root.as_bytes()),
        )
        .into_bytes()
    }

    /// Decode a previously-encoded extension. Tolerant only of exactly the
    /// shape `encode` produces; this is not a general JSON parser.
    pub fn decode(bytes: &[u8]) -> Result<Self, BridgeError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| BridgeError::InvalidRequest(format!("malformed vote extension: {e}")))?;

        let nova = value
            .get("nova")
            .ok_or_else(|| BridgeError::InvalidRequest("missing nova field".to_string()))?;

        let epoch_number = nova
            .get("epoch_number")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| BridgeError::InvalidRequest("missing epoch_number".to_string()))?;

        let state_root = parse_hex_hash(nova, "state_root")?;
        let mailbox_root = parse_hex_hash(nova, "mailbox_root")?;

        Ok(Self {
            epoch_number,
            state_root,
            mailbox_root,
        })
    }
}

/// `ExtendVote` handler. `current_block_txs` is the block currently being
/// built; `already_injected` should be `crate::injection::parse_injection`
/// (taken as a function pointer to keep this module's own tests free of the
/// injection module's tx-decoding machinery).
///
/// Returns an empty vec for "extend with nothing" — that's always a safe
/// vote, so every early-return here is `Ok(vec![])` rather than an error.
pub async fn produce_vote_extension(
    pending: Epoch,
    current_block_txs: &[Vec<u8>],
    already_injected: impl Fn(&[u8]) -> Option<u64>,
    client: &dyn AppLayerClient,
    hook_address: AppLayerAddress,
    timeout: Duration,
) -> Result<Vec<u8>, BridgeError> {
    let already_finalizing_this_block = current_block_txs
        .iter()
        .any(|tx| already_injected(tx) == Some(pending.number));
    if already_finalizing_this_block {
        return Ok(Vec::new());
    }

    let observation = observer::observe(client, pending.end_height, hook_address, timeout).await?;

    let (state_root, mailbox_root) = match observation {
        Observation::NotReady => return Ok(Vec::new()),
        Observation::Ready { state_root, mailbox_root } => (state_root, mailbox_root),
    };

    Ok(VoteExtension { epoch_number: pending.number, state_root, mailbox_root }.encode())
}

fn parse_hex_hash(value: &serde_json::Value, field: &str) -> Result<Hash, BridgeError> {
    let raw = value
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| BridgeError::InvalidRequest(format!("missing {field}")))?;
    raw.parse()
        .map_err(|e| BridgeError::InvalidRequest(format!("invalid {field}: {e}")))
}
