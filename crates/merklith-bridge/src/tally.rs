//! Tally engine: aggregates extended-commit votes into the winning vote
//! extension, if any reaches the strict two-thirds supermajority.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::types::{BlockIdFlag, ValidatorAddress, VoteInfo};
use crate::vote_extension::VoteExtension;

/// The set of validators whose empty vote extensions still count toward the
/// tally. An empty set is interpreted as "all validators enrolled".
#[derive(Debug, Clone, Default)]
pub struct EnrolledValidators(HashSet<ValidatorAddress>);

impl EnrolledValidators {
    pub fn new(addresses: impl IntoIterator<Item = ValidatorAddress>) -> Self {
        Self(addresses.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, address: &ValidatorAddress) -> bool {
        self.0.contains(address)
    }
}

/// Outcome of tallying a commit's votes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TallyOutcome {
    /// No extension reached strict two-thirds of total contributing power.
    NoConsensus,
    Winner(VoteExtension),
}

/// Tally `votes`, restricted to `COMMIT`-flagged votes, applying the
/// enrollment filter to empty extensions, and testing the strict 2/3
/// threshold. Pure and deterministic: the only thing that affects the
/// result is the order and content of `votes` itself, never map iteration
/// order (bucketing uses a hash map, but the winner is tracked incrementally
/// as votes are processed in their given order, so ties break in favor of
/// whichever extension's power first exceeded all others so far).
pub fn tally(votes: &[VoteInfo], enrolled: &EnrolledValidators) -> TallyOutcome {
    let mut tallies: HashMap<Vec<u8>, i64> = HashMap::new();
    let mut total_power: i64 = 0;
    let mut winner: Option<Vec<u8>> = None;
    let mut winner_power: i64 = 0;

    for vote in votes {
        if vote.block_id_flag != BlockIdFlag::Commit {
            continue;
        }

        if vote.vote_extension.is_empty() && !enrolled.is_empty() && !enrolled.contains(&vote.validator) {
            continue;
        }

        total_power += vote.power;

        let bucket = tallies.entry(vote.vote_extension.clone()).or_insert(0);
        *bucket += vote.power;
        let new_power = *bucket;

        if new_power > winner_power {
            winner = Some(vote.vote_extension.clone());
            winner_power = new_power;
        }
    }

    if tallies.is_empty() {
        return TallyOutcome::NoConsensus;
    }

    // winner_power * 3 > total_power * 2  <=>  winner_power / total_power > 2/3
    if winner_power * 3 > total_power * 2 {
        let winner = winner.expect("non-empty tallies imply a winner bucket exists");
        match VoteExtension::decode(&winner) {
            Ok(extension) => TallyOutcome::Winner(extension),
            Err(_) => TallyOutcome::NoConsensus,
        }
    } else {
        TallyOutcome::NoConsensus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use merklith_types::{Address, Hash};

    fn vote(addr: u8, power: i64, ext: &VoteExtension) -> VoteInfo {
        VoteInfo {
            validator: Address::from_bytes([addr; 20]),
            power,
            block_id_flag: BlockIdFlag::Commit,
            vote_extension: ext.encode(),
        }
    }

    fn empty_vote(addr: u8, power: i64) -> VoteInfo {
        VoteInfo {
            validator: Address::from_bytes([addr; 20]),
            power,
            block_id_flag: BlockIdFlag::Commit,
            vote_extension: vec![],
        }
    }

    #[test]
    fn test_happy_path_supermajority() {
        let ext = VoteExtension {
            epoch_number: 0,
            state_root: Hash::from_bytes([0xAA; 32]),
            mailbox_root: Hash::from_bytes([0xBB; 32]),
        };
        let votes = vec![vote(1, 70, &ext), vote(2, 30, &ext)];
        let outcome = tally(&votes, &EnrolledValidators::default());
        assert_eq!(outcome, TallyOutcome::Winner(ext));
    }

    #[test]
    fn test_sub_threshold_disagreement() {
        let a = VoteExtension {
            epoch_number: 0,
            state_root: Hash::from_bytes([0xAA; 32]),
            mailbox_root: Hash::ZERO,
        };
        let b = VoteExtension {
            epoch_number: 0,
            state_root: Hash::from_bytes([0xBB; 32]),
            mailbox_root: Hash::ZERO,
        };
        let votes = vec![vote(1, 50, &a), vote(2, 50, &b)];
        let outcome = tally(&votes, &EnrolledValidators::default());
        assert_eq!(outcome, TallyOutcome::NoConsensus);
    }

    #[test]
    fn test_empty_extensions_only_is_no_consensus() {
        let votes = vec![empty_vote(1, 100)];
        let outcome = tally(&votes, &EnrolledValidators::default());
        assert_eq!(outcome, TallyOutcome::NoConsensus);
    }

    #[test]
    fn test_non_commit_votes_are_skipped() {
        let ext = VoteExtension {
            epoch_number: 0,
            state_root: Hash::compute(b"a"),
            mailbox_root: Hash::compute(b"b"),
        };
        let mut absent = vote(1, 1000, &ext);
        absent.block_id_flag = BlockIdFlag::Absent;
        let votes = vec![absent, vote(2, 10, &ext)];
        let outcome = tally(&votes, &EnrolledValidators::default());
        // Only validator 2's power (10) counts; needs >2/3 of 10 -> winner.
        assert_eq!(outcome, TallyOutcome::Winner(ext));
    }

    #[test]
    fn test_enrollment_filter_drops_empty_from_non_enrolled() {
        let enrolled = EnrolledValidators::new([Address::from_bytes([1; 20])]);
        // V1 (enrolled) votes empty; V2 (not enrolled) votes non-empty.
        let ext = VoteExtension {
            epoch_number: 3,
            state_root: Hash::compute(b"s"),
            mailbox_root: Hash::compute(b"m"),
        };
        let votes = vec![empty_vote(1, 40), vote(2, 60, &ext)];
        let outcome = tally(&votes, &enrolled);

        // V1's empty vote is dropped by the filter; only V2's 60 counts as
        // total power, and 60 alone is > 2/3 of 60.
        assert_eq!(outcome, TallyOutcome::Winner(ext));
    }

    #[test]
    fn test_enrollment_filter_keeps_non_empty_from_non_enrolled() {
        // This pins the deliberate asymmetry: a non-empty vote from a
        // validator outside the enrolled set still counts in full.
        let enrolled = EnrolledValidators::new([Address::from_bytes([9; 20])]);
        let ext = VoteExtension {
            epoch_number: 1,
            state_root: Hash::compute(b"s"),
            mailbox_root: Hash::compute(b"m"),
        };
        let votes = vec![vote(1, 100, &ext)];
        let outcome = tally(&votes, &enrolled);
        assert_eq!(outcome, TallyOutcome::Winner(ext));
    }

    #[test]
    fn test_ties_break_by_first_to_reach_power() {
        let a = VoteExtension {
            epoch_number: 0,
            state_root: Hash::from_bytes([1; 32]),
            mailbox_root: Hash::ZERO,
        };
        let b = VoteExtension {
            epoch_number: 0,
            state_root: Hash::from_bytes([2; 32]),
            mailbox_root: Hash::ZERO,
        };
        // a reaches 50 first; b reaches 50 after. Neither exceeds the other,
        // so a should remain the running winner, but with only 100 total
        // power split evenly neither wins two-thirds.
        let votes = vec![vote(1, 50, &a), vote(2, 50, &b)];
        let outcome = tally(&votes, &EnrolledValidators::default());
        assert_eq!(outcome, TallyOutcome::NoConsensus);
    }

    #[test]
    fn test_deterministic_same_input_same_output() {
        let ext = VoteExtension {
            epoch_number: 5,
            state_root: Hash::compute(b"x"),
            mailbox_root: Hash::compute(b"y"),
        };
        let votes = vec![vote(1, 80, &ext), vote(2, 20, &ext)];
        let enrolled = EnrolledValidators::default();
        let first = tally(&votes, &enrolled);
        let second = tally(&votes, &enrolled);
        assert_eq!(first, second);
    }
}
