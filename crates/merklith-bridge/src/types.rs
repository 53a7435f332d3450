//! Shared data types for the AppLayer bridge.

use std::fmt;
use std::str::FromStr;

use merklith_types::{Address, Hash, TypesError};

/// A window of consensus-chain block heights over which a single
/// `(state_root, mailbox_root)` pair is agreed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Epoch {
    pub number: u64,
    pub start_height: u64,
    pub end_height: u64,
}

impl Epoch {
    pub fn genesis(epoch_length: u64) -> Self {
        Self {
            number: 0,
            start_height: 0,
            end_height: epoch_length,
        }
    }

    /// The epoch that follows this one once it finalizes.
    pub fn next(&self, epoch_length: u64) -> Self {
        Self {
            number: self.number + 1,
            start_height: self.end_height,
            end_height: self.end_height + epoch_length,
        }
    }
}

/// 20-byte AppLayer contract address (the mailbox Merkle-tree hook).
///
/// Distinct from `merklith_types::Address`, which is MERKLITH's own
/// bech32m-encoded validator/account address: the hook lives on the
/// external execution chain and is conventionally displayed as `0x`-hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AppLayerAddress([u8; 20]);

impl AppLayerAddress {
    pub const ZERO: Self = Self([0u8; 20]);

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for AppLayerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for AppLayerAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        if bytes.len() != 20 {
            return Err(TypesError::InvalidAddressLength(bytes.len()));
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

/// Validator consensus address, as carried in `ExtendedCommitInfo`.
pub type ValidatorAddress = Address;

/// Mirrors CometBFT's `BlockIDFlag`: only `Commit` votes count toward the
/// tally (absent and nil votes are skipped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockIdFlag {
    Absent,
    Commit,
    Nil,
}

/// A single validator's vote and extension within a commit.
#[derive(Debug, Clone)]
pub struct VoteInfo {
    pub validator: ValidatorAddress,
    pub power: i64,
    pub block_id_flag: BlockIdFlag,
    pub vote_extension: Vec<u8>,
}

/// The previous block's extended commit, as handed to `ExtendVote`'s
/// successor block and re-verified by every replica in `ProcessProposal`.
#[derive(Debug, Clone, Default, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct ExtendedCommitInfo {
    pub votes: Vec<BorshVoteInfo>,
}

/// Borsh-friendly mirror of `VoteInfo` (the wire-encoded form embedded in an
/// `Injection`). Kept separate from `VoteInfo` so the in-memory tally type
/// can use richer enums without fighting a derive macro.
#[derive(Debug, Clone, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct BorshVoteInfo {
    pub validator: [u8; 20],
    pub power: i64,
    pub block_id_flag: u8,
    pub vote_extension: Vec<u8>,
}

impl From<&VoteInfo> for BorshVoteInfo {
    fn from(v: &VoteInfo) -> Self {
        Self {
            validator: *v.validator.as_bytes(),
            power: v.power,
            block_id_flag: match v.block_id_flag {
                BlockIdFlag::Absent => 0,
                BlockIdFlag::Commit => 1,
                BlockIdFlag::Nil => 2,
            },
            vote_extension: v.vote_extension.clone(),
        }
    }
}

impl From<&BorshVoteInfo> for VoteInfo {
    fn from(v: &BorshVoteInfo) -> Self {
        Self {
            validator: Address::from_bytes(v.validator),
            power: v.power,
            block_id_flag: match v.block_id_flag {
                1 => BlockIdFlag::Commit,
                2 => BlockIdFlag::Nil,
                _ => BlockIdFlag::Absent,
            },
            vote_extension: v.vote_extension.clone(),
        }
    }
}

impl ExtendedCommitInfo {
    pub fn from_votes(votes: &[VoteInfo]) -> Self {
        Self {
            votes: votes.iter().map(BorshVoteInfo::from).collect(),
        }
    }

    pub fn votes(&self) -> Vec<VoteInfo> {
        self.votes.iter().map(VoteInfo::from).collect()
    }
}

/// Result of observing the AppLayer at a given height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// The AppLayer hasn't produced a block at the requested height yet.
    NotReady,
    Ready { state_root: Hash, mailbox_root: Hash },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_next() {
        let genesis = Epoch::genesis(10);
        assert_eq!(genesis, Epoch { number: 0, start_height: 0, end_height: 10 });

        let next = genesis.next(10);
        assert_eq!(next, Epoch { number: 1, start_height: 10, end_height: 20 });
    }

    #[test]
    fn test_applayer_address_hex_roundtrip() {
        let addr = AppLayerAddress::from_bytes([0xAB; 20]);
        let s = addr.to_string();
        assert!(s.starts_with("0x"));
        let parsed: AppLayerAddress = s.parse().unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn test_applayer_address_zero() {
        assert!(AppLayerAddress::ZERO.is_zero());
        assert!(!AppLayerAddress::from_bytes([1; 20]).is_zero());
    }

    #[test]
    fn test_extended_commit_info_roundtrip() {
        let votes = vec![VoteInfo {
            validator: Address::from_bytes([1; 20]),
            power: 100,
            block_id_flag: BlockIdFlag::Commit,
            vote_extension: vec![1, 2, 3],
        }];
        let info = ExtendedCommitInfo::from_votes(&votes);
        let encoded = borsh::to_vec(&info).unwrap();
        let decoded: ExtendedCommitInfo = borsh::from_slice(&encoded).unwrap();
        assert_eq!(decoded.votes().len(), 1);
        assert_eq!(decoded.votes()[0].power, 100);
    }
}
