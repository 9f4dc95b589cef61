//! Budget proposal type

use serde::{Deserialize, Serialize};
use wellness_core::AccountId;

/// A request to spend treasury funds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetProposal {
    pub proposer: AccountId,
    pub description: String,
    /// Amount the treasury disburses once the proposal has executed.
    pub budget: u64,
    /// Requested program length, informational only; the voting window
    /// comes from the governance proposal duration.
    pub duration: u64,
    pub start_block: u64,
    pub end_block: u64,
    pub yes_votes: u64,
    pub no_votes: u64,
    pub executed: bool,
}

impl BudgetProposal {
    /// Votes are accepted while `start_block <= height < end_block`.
    pub fn is_open(&self, height: u64) -> bool {
        height >= self.start_block && height < self.end_block
    }

    pub fn total_votes(&self) -> u64 {
        self.yes_votes.saturating_add(self.no_votes)
    }
}
