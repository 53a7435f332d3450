//! Proposal injection and validation.
//!
//! A winning tally is carried into the next block as a prepended
//! transaction so every replica can re-derive and cross-check it during
//! `ProcessProposal`, without re-running the vote-extension tally against
//! live network state.

use crate::error::BridgeError;
use crate::tally::{self, EnrolledValidators, TallyOutcome};
use crate::types::ExtendedCommitInfo;

/// Narrow collaborator validating an extended commit's vote-extension
/// signatures before this module trusts it enough to tally, mirroring
/// `baseapp.ValidateVoteExtensions` in `keeper/abci.go`'s
/// `PrepareProposalHandler`/`ProcessProposalHandler`. Kept as an injected
/// trait (same shape as `AppLayerClient`) rather than a concrete consensus
/// engine type so this module doesn't depend on the host's full ABCI stack.
pub trait ConsensusHost: Send + Sync {
    fn validate_vote_extensions(&self, commit_info: &ExtendedCommitInfo) -> Result<(), BridgeError>;
}

/// Injections only ever appear in the first two transactions of a block —
/// a sibling module may inject its own message ahead of this one.
const INJECTION_SEARCH_DEPTH: usize = 2;

/// Tag byte distinguishing an injection transaction from anything else a
/// block might carry in its first couple of slots. Borsh has no self-describing
/// framing, so `parse_injection` needs this to fail closed on foreign bytes
/// instead of misinterpreting them.
const INJECTION_TAG: u8 = 0xF0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    pub epoch_number: u64,
    pub state_root: merklith_types::Hash,
    pub mailbox_root: merklith_types::Hash,
    pub commit_info: ExtendedCommitInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
struct InjectionWire {
    epoch_number: u64,
    state_root: [u8; 32],
    mailbox_root: [u8; 32],
    commit_info: ExtendedCommitInfo,
}

impl Injection {
    pub fn encode(&self) -> Vec<u8> {
        let wire = InjectionWire {
            epoch_number: self.epoch_number,
            state_root: *self.state_root.as_bytes(),
            mailbox_root: *self.mailbox_root.as_bytes(),
            commit_info: self.commit_info.clone(),
        };
        let mut out = vec![INJECTION_TAG];
        out.extend(borsh::to_vec(&wire).expect("injection wire encoding is infallible"));
        out
    }
}

/// Parse `tx` as an injection. Never errors: anything that isn't exactly an
/// injection-tagged, cleanly-decoding message returns `None`, matching
/// `ProcessProposal`'s requirement to silently skip unrelated transactions.
pub fn parse_injection(tx: &[u8]) -> Option<Injection> {
    let (tag, body) = tx.split_first()?;
    if *tag != INJECTION_TAG {
        return None;
    }
    let wire: InjectionWire = borsh::from_slice(body).ok()?;
    Some(Injection {
        epoch_number: wire.epoch_number,
        state_root: merklith_types::Hash::from_bytes(wire.state_root),
        mailbox_root: merklith_types::Hash::from_bytes(wire.mailbox_root),
        commit_info: wire.commit_info,
    })
}

/// Scan the first `INJECTION_SEARCH_DEPTH` transactions of a proposal for an
/// injection belonging to this module.
fn find_injection(txs: &[Vec<u8>]) -> Option<Injection> {
    txs.iter().take(INJECTION_SEARCH_DEPTH).find_map(|tx| parse_injection(tx))
}

/// **PrepareProposal** (proposer only). `vote_extensions_enabled` mirrors
/// CometBFT's height-gated enablement: extensions (and therefore injection)
/// don't exist before the activation height. `host` validates
/// `previous_commit` the same way `baseapp.ValidateVoteExtensions` does
/// before the commit is trusted enough to tally; a commit that fails
/// validation is treated like one with no winner — no injection, proposal
/// passed through unchanged.
pub fn prepare_proposal(
    host: &dyn ConsensusHost,
    previous_commit: &ExtendedCommitInfo,
    enrolled: &EnrolledValidators,
    vote_extensions_enabled: bool,
    mut txs: Vec<Vec<u8>>,
) -> Vec<Vec<u8>> {
    if !vote_extensions_enabled {
        return txs;
    }

    if host.validate_vote_extensions(previous_commit).is_err() {
        return txs;
    }

    let votes = previous_commit.votes();
    if let TallyOutcome::Winner(winner) = tally::tally(&votes, enrolled) {
        let injection = Injection {
            epoch_number: winner.epoch_number,
            state_root: winner.state_root,
            mailbox_root: winner.mailbox_root,
            commit_info: previous_commit.clone(),
        };
        txs.insert(0, injection.encode());
    }

    txs
}

/// **ProcessProposal** (every replica). `Ok(())` accepts the proposal;
/// `Err` rejects it. A block with no injection among its first transactions
/// is always accepted — absence is not evidence of a problem, it just means
/// no epoch finalized this block. The embedded commit is run back through
/// `host.validate_vote_extensions` before re-tallying, exactly like
/// `ProcessProposalHandler` does, so a proposal can't smuggle in an
/// injection built from signatures that were never valid in the first
/// place.
pub fn process_proposal(host: &dyn ConsensusHost, txs: &[Vec<u8>], enrolled: &EnrolledValidators) -> Result<(), BridgeError> {
    let Some(injection) = find_injection(txs) else {
        return Ok(());
    };

    host.validate_vote_extensions(&injection.commit_info)?;

    let votes = injection.commit_info.votes();
    let outcome = tally::tally(&votes, enrolled);

    match outcome {
        TallyOutcome::Winner(winner) => {
            if winner.epoch_number == injection.epoch_number
                && winner.state_root == injection.state_root
                && winner.mailbox_root == injection.mailbox_root
            {
                Ok(())
            } else {
                Err(BridgeError::InvalidRequest(
                    "injected epoch/roots do not match the re-derived tally winner".to_string(),
                ))
            }
        }
        TallyOutcome::NoConsensus => Err(BridgeError::InvalidRequest(
            "injection present but embedded commit yields no tally winner".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockIdFlag, VoteInfo};
    use crate::vote_extension::VoteExtension;
    use merklith_types::{Address, Hash};

    struct AcceptAllHost;
    impl ConsensusHost for AcceptAllHost {
        fn validate_vote_extensions(&self, _commit_info: &ExtendedCommitInfo) -> Result<(), BridgeError> {
            Ok(())
        }
    }

    struct RejectAllHost;
    impl ConsensusHost for RejectAllHost {
        fn validate_vote_extensions(&self, _commit_info: &ExtendedCommitInfo) -> Result<(), BridgeError> {
            Err(BridgeError::InvalidRequest("bad vote extension signatures".to_string()))
        }
    }

    fn winning_commit(ext: &VoteExtension) -> ExtendedCommitInfo {
        ExtendedCommitInfo::from_votes(&[
            VoteInfo {
                validator: Address::from_bytes([1; 20]),
                power: 70,
                block_id_flag: BlockIdFlag::Commit,
                vote_extension: ext.encode(),
            },
            VoteInfo {
                validator: Address::from_bytes([2; 20]),
                power: 30,
                block_id_flag: BlockIdFlag::Commit,
                vote_extension: ext.encode(),
            },
        ])
    }

    #[test]
    fn test_non_injection_bytes_parse_to_none() {
        assert!(parse_injection(b"whatever a sibling module sends").is_none());
        assert!(parse_injection(&[]).is_none());
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let ext = VoteExtension { epoch_number: 4, state_root: Hash::compute(b"s"), mailbox_root: Hash::compute(b"m") };
        let injection = Injection {
            epoch_number: 4,
            state_root: ext.state_root,
            mailbox_root: ext.mailbox_root,
            commit_info: winning_commit(&ext),
        };
        let decoded = parse_injection(&injection.encode()).unwrap();
        assert_eq!(decoded, injection);
    }

    #[test]
    fn test_prepare_proposal_disabled_passes_through() {
        let ext = VoteExtension { epoch_number: 0, state_root: Hash::compute(b"s"), mailbox_root: Hash::compute(b"m") };
        let commit = winning_commit(&ext);
        let txs = vec![b"tx1".to_vec()];
        let out = prepare_proposal(&AcceptAllHost, &commit, &EnrolledValidators::default(), false, txs.clone());
        assert_eq!(out, txs);
    }

    #[test]
    fn test_prepare_proposal_prepends_injection_on_winner() {
        let ext = VoteExtension { epoch_number: 0, state_root: Hash::compute(b"s"), mailbox_root: Hash::compute(b"m") };
        let commit = winning_commit(&ext);
        let txs = vec![b"tx1".to_vec()];
        let out = prepare_proposal(&AcceptAllHost, &commit, &EnrolledValidators::default(), true, txs);
        assert_eq!(out.len(), 2);
        let injection = parse_injection(&out[0]).unwrap();
        assert_eq!(injection.epoch_number, 0);
        assert_eq!(out[1], b"tx1".to_vec());
    }

    #[test]
    fn test_prepare_proposal_no_winner_no_injection() {
        let a = VoteExtension { epoch_number: 0, state_root: Hash::from_bytes([1; 32]), mailbox_root: Hash::ZERO };
        let b = VoteExtension { epoch_number: 0, state_root: Hash::from_bytes([2; 32]), mailbox_root: Hash::ZERO };
        let commit = ExtendedCommitInfo::from_votes(&[
            VoteInfo { validator: Address::from_bytes([1; 20]), power: 50, block_id_flag: BlockIdFlag::Commit, vote_extension: a.encode() },
            VoteInfo { validator: Address::from_bytes([2; 20]), power: 50, block_id_flag: BlockIdFlag::Commit, vote_extension: b.encode() },
        ]);
        let out = prepare_proposal(&AcceptAllHost, &commit, &EnrolledValidators::default(), true, vec![b"tx1".to_vec()]);
        assert_eq!(out, vec![b"tx1".to_vec()]);
    }

    #[test]
    fn test_process_proposal_accepts_block_without_injection() {
        let txs = vec![b"unrelated".to_vec()];
        assert!(process_proposal(&AcceptAllHost, &txs, &EnrolledValidators::default()).is_ok());
    }

    #[test]
    fn test_process_proposal_accepts_valid_injection() {
        let ext = VoteExtension { epoch_number: 7, state_root: Hash::compute(b"s"), mailbox_root: Hash::compute(b"m") };
        let injection = Injection {
            epoch_number: 7,
            state_root: ext.state_root,
            mailbox_root: ext.mailbox_root,
            commit_info: winning_commit(&ext),
        };
        let txs = vec![injection.encode()];
        assert!(process_proposal(&AcceptAllHost, &txs, &EnrolledValidators::default()).is_ok());
    }

    #[test]
    fn test_process_proposal_rejects_tampered_root() {
        let ext = VoteExtension { epoch_number: 7, state_root: Hash::compute(b"s"), mailbox_root: Hash::compute(b"m") };
        let injection = Injection {
            epoch_number: 7,
            state_root: Hash::compute(b"tampered"),
            mailbox_root: ext.mailbox_root,
            commit_info: winning_commit(&ext),
        };
        let txs = vec![injection.encode()];
        assert!(process_proposal(&AcceptAllHost, &txs, &EnrolledValidators::default()).is_err());
    }

    #[test]
    fn test_process_proposal_rejects_when_embedded_commit_has_no_winner() {
        let a = VoteExtension { epoch_number: 0, state_root: Hash::from_bytes([1; 32]), mailbox_root: Hash::ZERO };
        let b = VoteExtension { epoch_number: 0, state_root: Hash::from_bytes([2; 32]), mailbox_root: Hash::ZERO };
        let commit = ExtendedCommitInfo::from_votes(&[
            VoteInfo { validator: Address::from_bytes([1; 20]), power: 50, block_id_flag: BlockIdFlag::Commit, vote_extension: a.encode() },
            VoteInfo { validator: Address::from_bytes([2; 20]), power: 50, block_id_flag: BlockIdFlag::Commit, vote_extension: b.encode() },
        ]);
        let injection = Injection { epoch_number: 0, state_root: a.state_root, mailbox_root: a.mailbox_root, commit_info: commit };
        let txs = vec![injection.encode()];
        assert!(process_proposal(&AcceptAllHost, &txs, &EnrolledValidators::default()).is_err());
    }

    #[test]
    fn test_injection_found_at_second_slot() {
        let ext = VoteExtension { epoch_number: 1, state_root: Hash::compute(b"s"), mailbox_root: Hash::compute(b"m") };
        let injection = Injection { epoch_number: 1, state_root: ext.state_root, mailbox_root: ext.mailbox_root, commit_info: winning_commit(&ext) };
        let txs = vec![b"sibling module injection".to_vec(), injection.encode()];
        assert!(process_proposal(&AcceptAllHost, &txs, &EnrolledValidators::default()).is_ok());
    }

    #[test]
    fn test_injection_beyond_search_depth_is_ignored() {
        let ext = VoteExtension { epoch_number: 1, state_root: Hash::compute(b"s"), mailbox_root: Hash::compute(b"m") };
        let injection = Injection { epoch_number: 1, state_root: ext.state_root, mailbox_root: ext.mailbox_root, commit_info: winning_commit(&ext) };
        let txs = vec![b"a".to_vec(), b"b".to_vec(), injection.encode()];
        // Beyond the search depth, so treated as "no injection" -> accepted.
        assert!(process_proposal(&AcceptAllHost, &txs, &EnrolledValidators::default()).is_ok());
    }

    #[test]
    fn test_prepare_proposal_skips_injection_when_host_rejects_commit() {
        let ext = VoteExtension { epoch_number: 0, state_root: Hash::compute(b"s"), mailbox_root: Hash::compute(b"m") };
        let commit = winning_commit(&ext);
        let txs = vec![b"tx1".to_vec()];
        let out = prepare_proposal(&RejectAllHost, &commit, &EnrolledValidators::default(), true, txs.clone());
        assert_eq!(out, txs);
    }

    #[test]
    fn test_process_proposal_rejects_when_host_rejects_commit() {
        let ext = VoteExtension { epoch_number: 7, state_root: Hash::compute(b"s"), mailbox_root: Hash::compute(b"m") };
        let injection = Injection {
            epoch_number: 7,
            state_root: ext.state_root,
            mailbox_root: ext.mailbox_root,
            commit_info: winning_commit(&ext),
        };
        let txs = vec![injection.encode()];
        assert!(process_proposal(&RejectAllHost, &txs, &EnrolledValidators::default()).is_err());
    }
}
