//! DAO-wide configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use wellness_core::AccountId;

/// Strict-majority default threshold (51%)
pub const DEFAULT_VOTING_THRESHOLD: u64 = 51;

/// Default quorum as a percentage of total supply (20%)
pub const DEFAULT_QUORUM_PERCENTAGE: u64 = 20;

/// Default voting window, in blocks
pub const DEFAULT_PROPOSAL_DURATION: u64 = 1440;

/// Default proposer reward rate (5%)
pub const DEFAULT_REWARD_RATE: u64 = 5;

/// Governance proposal capacity
pub const DEFAULT_MAX_PROPOSALS: u64 = 100;

/// Minimum ledger balance required of a proposer
pub const MIN_PROPOSAL_BALANCE: u64 = 100;

/// Longest accepted proposal description, in bytes
pub const MAX_DESCRIPTION_LEN: usize = 256;

/// Shared voting parameters other controllers fetch live through the
/// directory capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingParams {
    pub voting_threshold: u64,
    pub quorum_percentage: u64,
    pub proposal_duration: u64,
}

/// Process-wide DAO configuration. Owned exclusively by the governance
/// controller; mutated only by the owner or by executed parameter
/// proposals, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaoConfig {
    pub owner: AccountId,
    pub voting_threshold: u64,
    pub quorum_percentage: u64,
    pub proposal_duration: u64,
    pub reward_rate: u64,
    pub paused: bool,
    /// Named registry of upgradeable contract addresses.
    pub contract_addresses: HashMap<String, AccountId>,
}

impl DaoConfig {
    pub fn new(owner: AccountId) -> Self {
        Self {
            owner,
            voting_threshold: DEFAULT_VOTING_THRESHOLD,
            quorum_percentage: DEFAULT_QUORUM_PERCENTAGE,
            proposal_duration: DEFAULT_PROPOSAL_DURATION,
            reward_rate: DEFAULT_REWARD_RATE,
            paused: false,
            contract_addresses: HashMap::new(),
        }
    }

    pub fn voting_params(&self) -> VotingParams {
        VotingParams {
            voting_threshold: self.voting_threshold,
            quorum_percentage: self.quorum_percentage,
            proposal_duration: self.proposal_duration,
        }
    }
}
