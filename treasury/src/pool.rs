//! Treasury pool
//!
//! A custodial wrapper over the token ledger: principals contribute
//! into the pool under a withdrawal time lock, and the DAO owner
//! disburses pooled funds against budget proposals the voting
//! controller reports as executed. `total_funds` always equals the sum
//! of live contributions minus disbursements.

use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use governance::{DaoDirectory, DirectoryRef};
use voting::{BudgetProposals, BudgetProposalsRef};
use wellness_core::{AccountId, BlockClock, SharedLedger, TokenLedger};

use crate::error::{Result, TreasuryError};

/// Blocks a fresh contribution stays locked for withdrawal.
pub const DEFAULT_LOCK_PERIOD: u64 = 1440;

/// One principal's stake in the pool. `locked_until` is overwritten on
/// every new contribution, not extended additively, and withdrawals
/// leave it unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub amount: u64,
    pub locked_until: u64,
}

pub struct Treasury {
    contract_id: AccountId,
    governance: DirectoryRef,
    voting: BudgetProposalsRef,
    token: SharedLedger,
    clock: BlockClock,
    paused: bool,
    total_funds: u64,
    lock_period: u64,
    contributions: HashMap<AccountId, Contribution>,
}

impl Treasury {
    /// `contract_id` is the principal the pooled funds sit under in the
    /// ledger.
    pub fn new(
        contract_id: AccountId,
        governance: DirectoryRef,
        voting: BudgetProposalsRef,
        token: SharedLedger,
        clock: BlockClock,
    ) -> Self {
        Self {
            contract_id,
            governance,
            voting,
            token,
            clock,
            paused: false,
            total_funds: 0,
            lock_period: DEFAULT_LOCK_PERIOD,
            contributions: HashMap::new(),
        }
    }

    /// Override the withdrawal lock period.
    pub fn with_lock_period(mut self, blocks: u64) -> Self {
        self.lock_period = blocks;
        self
    }

    pub fn contract_id(&self) -> &AccountId {
        &self.contract_id
    }

    pub fn total_funds(&self) -> u64 {
        self.total_funds
    }

    pub fn contribution(&self, contributor: &AccountId) -> Option<Contribution> {
        self.contributions.get(contributor).copied()
    }

    pub fn governance_contract(&self) -> &AccountId {
        self.governance.address()
    }

    pub fn voting_contract(&self) -> &AccountId {
        self.voting.address()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn lock_period(&self) -> u64 {
        self.lock_period
    }

    fn require_owner(&self, caller: &AccountId) -> Result<()> {
        if *caller != self.governance.handle().dao_owner() {
            return Err(TreasuryError::NotAuthorized);
        }
        Ok(())
    }

    /// Repoint the governance capability.
    pub fn set_governance_contract(&mut self, caller: &AccountId, governance: DirectoryRef) -> Result<()> {
        self.require_owner(caller)?;
        if governance.address().is_null() {
            return Err(TreasuryError::InvalidRecipient);
        }
        info!("governance contract repointed to {}", governance.address());
        self.governance = governance;
        Ok(())
    }

    /// Repoint the voting capability.
    pub fn set_voting_contract(&mut self, caller: &AccountId, voting: BudgetProposalsRef) -> Result<()> {
        self.require_owner(caller)?;
        if voting.address().is_null() {
            return Err(TreasuryError::InvalidRecipient);
        }
        info!("voting contract repointed to {}", voting.address());
        self.voting = voting;
        Ok(())
    }

    pub fn pause(&mut self, caller: &AccountId) -> Result<()> {
        self.require_owner(caller)?;
        if self.paused {
            return Err(TreasuryError::AlreadyPaused);
        }
        self.paused = true;
        info!("treasury paused");
        Ok(())
    }

    pub fn unpause(&mut self, caller: &AccountId) -> Result<()> {
        self.require_owner(caller)?;
        if !self.paused {
            return Err(TreasuryError::NotPaused);
        }
        self.paused = false;
        info!("treasury unpaused");
        Ok(())
    }

    /// Move `amount` from the caller into the pool. The caller's lock
    /// restarts at `current block + lock_period`; a ledger failure
    /// propagates unchanged and records nothing.
    pub fn contribute(&mut self, caller: &AccountId, amount: u64) -> Result<()> {
        if self.paused {
            return Err(TreasuryError::AlreadyPaused);
        }
        if amount == 0 {
            return Err(TreasuryError::InvalidAmount);
        }
        self.token
            .write()
            .unwrap()
            .transfer(amount, caller, &self.contract_id)?;

        let locked_until = self.clock.height().saturating_add(self.lock_period);
        let entry = self
            .contributions
            .entry(caller.clone())
            .or_insert(Contribution {
                amount: 0,
                locked_until,
            });
        entry.amount = entry.amount.saturating_add(amount);
        entry.locked_until = locked_until;
        self.total_funds = self.total_funds.saturating_add(amount);
        info!("contribution of {amount} from {caller}, locked until block {locked_until}");
        Ok(())
    }

    /// Return `amount` of the caller's contribution once the lock has
    /// expired. The lock itself is not refreshed by withdrawing.
    pub fn withdraw_contribution(&mut self, caller: &AccountId, amount: u64) -> Result<()> {
        if self.paused {
            return Err(TreasuryError::AlreadyPaused);
        }
        if amount == 0 {
            return Err(TreasuryError::InvalidAmount);
        }
        let contribution = self
            .contributions
            .get(caller)
            .copied()
            .ok_or(TreasuryError::InvalidContribution)?;
        let height = self.clock.height();
        if height < contribution.locked_until {
            return Err(TreasuryError::ContributionLocked {
                unlocks_at: contribution.locked_until,
                height,
            });
        }
        if contribution.amount < amount {
            return Err(TreasuryError::InsufficientFunds {
                requested: amount,
                available: contribution.amount,
            });
        }
        self.token
            .write()
            .unwrap()
            .transfer(amount, &self.contract_id, caller)?;

        self.contributions.insert(
            caller.clone(),
            Contribution {
                amount: contribution.amount - amount,
                locked_until: contribution.locked_until,
            },
        );
        self.total_funds = self.total_funds.saturating_sub(amount);
        debug!("withdrawal of {amount} by {caller}");
        Ok(())
    }

    /// Pay out an executed budget proposal. Owner-only; transfers
    /// exactly the proposal's budget to `recipient`. This is the only
    /// path by which approved budget funds leave the pool.
    pub fn disburse_proposal_funds(
        &mut self,
        caller: &AccountId,
        proposal_id: u64,
        recipient: &AccountId,
    ) -> Result<()> {
        self.require_owner(caller)?;
        if self.paused {
            return Err(TreasuryError::AlreadyPaused);
        }
        let funding = self
            .voting
            .handle()
            .proposal_funding(proposal_id)
            .ok_or(TreasuryError::ProposalNotFound(proposal_id))?;
        if !funding.executed {
            return Err(TreasuryError::ProposalNotExecuted(proposal_id));
        }
        if recipient.is_null() {
            return Err(TreasuryError::InvalidRecipient);
        }
        if self.total_funds < funding.budget {
            return Err(TreasuryError::InsufficientFunds {
                requested: funding.budget,
                available: self.total_funds,
            });
        }
        self.token
            .write()
            .unwrap()
            .transfer(funding.budget, &self.contract_id, recipient)?;
        self.total_funds -= funding.budget;
        info!(
            "disbursed {} for proposal {proposal_id} to {recipient}",
            funding.budget
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contribution_is_serializable() {
        let contribution = Contribution {
            amount: 500,
            locked_until: 1440,
        };
        let json = serde_json::to_string(&contribution).unwrap();
        let restored: Contribution = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, contribution);
    }
}
