//! Proposal types and vote records

use serde::{Deserialize, Serialize};
use wellness_core::AccountId;

/// Parameters a parameter-change proposal may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamKey {
    VotingThreshold,
    QuorumPercentage,
    ProposalDuration,
    RewardRate,
}

impl ParamKey {
    /// Resolve a stored parameter key. Payload keys stay free-form
    /// strings until execution, so an unrecognized key fails the execute
    /// call, not the create.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "voting-threshold" => Some(Self::VotingThreshold),
            "quorum-percentage" => Some(Self::QuorumPercentage),
            "proposal-duration" => Some(Self::ProposalDuration),
            "reward-rate" => Some(Self::RewardRate),
            _ => None,
        }
    }

    pub fn as_key(&self) -> &'static str {
        match self {
            Self::VotingThreshold => "voting-threshold",
            Self::QuorumPercentage => "quorum-percentage",
            Self::ProposalDuration => "proposal-duration",
            Self::RewardRate => "reward-rate",
        }
    }
}

/// What executing a proposal does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalAction {
    /// Rewire a named registry entry to a new contract address.
    Upgrade {
        target: String,
        new_address: AccountId,
    },
    /// Change one DAO voting parameter.
    ParamChange { key: String, value: u64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub proposer: AccountId,
    pub description: String,
    pub action: ProposalAction,
    pub start_block: u64,
    pub end_block: u64,
    pub yes_votes: u64,
    pub no_votes: u64,
    pub executed: bool,
}

impl Proposal {
    /// Votes are accepted while `start_block <= height < end_block`.
    pub fn is_open(&self, height: u64) -> bool {
        height >= self.start_block && height < self.end_block
    }

    pub fn total_votes(&self) -> u64 {
        self.yes_votes.saturating_add(self.no_votes)
    }
}

/// Composite ballot key: at most one record per (proposal, voter), and a
/// record never changes once written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoteKey {
    pub proposal: u64,
    pub voter: AccountId,
}

impl VoteKey {
    pub fn new(proposal: u64, voter: &AccountId) -> Self {
        Self {
            proposal,
            voter: voter.clone(),
        }
    }
}
