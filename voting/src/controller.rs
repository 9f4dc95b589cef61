//! Budget-proposal controller

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use governance::config::{MAX_DESCRIPTION_LEN, MIN_PROPOSAL_BALANCE};
use governance::tally::{self, TallyVerdict};
use governance::{DaoDirectory, DirectoryRef, VoteKey};
use wellness_core::{AccountId, BlockClock, ContractRef, SharedLedger, TokenLedger};

use crate::error::{Result, VotingError};
use crate::proposal::BudgetProposal;
use crate::DEFAULT_MAX_PROPOSALS;

/// Funding summary the treasury reads before disbursing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalFunding {
    pub executed: bool,
    pub budget: u64,
}

/// Read-only view of budget proposals, consumed by the treasury.
pub trait BudgetProposals: Send + Sync {
    fn proposal_funding(&self, id: u64) -> Option<ProposalFunding>;
}

/// Budget-proposal handle under its published principal.
pub type BudgetProposalsRef = ContractRef<dyn BudgetProposals>;

pub struct Voting {
    governance: DirectoryRef,
    token: SharedLedger,
    clock: BlockClock,
    proposals: BTreeMap<u64, BudgetProposal>,
    votes: HashMap<VoteKey, bool>,
    next_proposal_id: u64,
    max_proposals: u64,
}

impl Voting {
    pub fn new(governance: DirectoryRef, token: SharedLedger, clock: BlockClock) -> Self {
        Self {
            governance,
            token,
            clock,
            proposals: BTreeMap::new(),
            votes: HashMap::new(),
            next_proposal_id: 0,
            max_proposals: DEFAULT_MAX_PROPOSALS,
        }
    }

    /// Override the proposal capacity.
    pub fn with_max_proposals(mut self, max: u64) -> Self {
        self.max_proposals = max;
        self
    }

    pub fn governance_contract(&self) -> &AccountId {
        self.governance.address()
    }

    pub fn proposal(&self, id: u64) -> Option<&BudgetProposal> {
        self.proposals.get(&id)
    }

    pub fn vote(&self, id: u64, voter: &AccountId) -> Option<bool> {
        self.votes.get(&VoteKey::new(id, voter)).copied()
    }

    /// Number of proposals ever created; ids are dense from 0.
    pub fn proposal_count(&self) -> u64 {
        self.next_proposal_id
    }

    /// Repoint the governance capability. Only the current DAO owner may
    /// rewire it.
    pub fn set_governance_contract(&mut self, caller: &AccountId, governance: DirectoryRef) -> Result<()> {
        if *caller != self.governance.handle().dao_owner() {
            return Err(VotingError::NotAuthorized);
        }
        info!("governance contract repointed to {}", governance.address());
        self.governance = governance;
        Ok(())
    }

    /// Open a budget proposal. The voting window comes from governance's
    /// current proposal duration, read live here.
    pub fn create_proposal(
        &mut self,
        caller: &AccountId,
        description: impl Into<String>,
        budget: u64,
        duration: u64,
    ) -> Result<u64> {
        let description = description.into();
        // Pause state is reported as an authorization failure on this
        // path; only the owner surface distinguishes the two.
        if self.governance.handle().is_paused() {
            return Err(VotingError::NotAuthorized);
        }
        if self.next_proposal_id >= self.max_proposals {
            return Err(VotingError::MaxProposalsExceeded);
        }
        let balance = self.token.read().unwrap().balance_of(caller);
        if balance < MIN_PROPOSAL_BALANCE {
            return Err(VotingError::InsufficientBalance {
                balance,
                required: MIN_PROPOSAL_BALANCE,
            });
        }
        if description.is_empty() || description.len() > MAX_DESCRIPTION_LEN {
            return Err(VotingError::InvalidDescription);
        }
        if budget == 0 {
            return Err(VotingError::InvalidBudget);
        }
        if duration == 0 {
            return Err(VotingError::InvalidDuration);
        }

        let params = self.governance.handle().voting_params();
        let id = self.next_proposal_id;
        let start_block = self.clock.height();
        let end_block = start_block.saturating_add(params.proposal_duration);
        self.proposals.insert(
            id,
            BudgetProposal {
                proposer: caller.clone(),
                description,
                budget,
                duration,
                start_block,
                end_block,
                yes_votes: 0,
                no_votes: 0,
                executed: false,
            },
        );
        self.next_proposal_id += 1;
        info!("budget proposal {id} opened by {caller} for {budget}, window [{start_block}, {end_block})");
        Ok(id)
    }

    /// Cast the caller's vote, weighted by their ledger balance at this
    /// moment.
    pub fn vote_on_proposal(&mut self, caller: &AccountId, id: u64, support: bool) -> Result<()> {
        let height = self.clock.height();
        let proposal = match self.proposals.get(&id) {
            Some(p) => p,
            None => return Err(VotingError::ProposalNotFound(id)),
        };
        if height < proposal.start_block {
            return Err(VotingError::VotingNotStarted(id));
        }
        if height >= proposal.end_block {
            return Err(VotingError::VotingEnded(id));
        }
        let key = VoteKey::new(id, caller);
        if self.votes.contains_key(&key) {
            return Err(VotingError::AlreadyVoted(id));
        }
        let weight = self.token.read().unwrap().balance_of(caller);

        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(VotingError::ProposalNotFound(id))?;
        if support {
            proposal.yes_votes = proposal.yes_votes.saturating_add(weight);
        } else {
            proposal.no_votes = proposal.no_votes.saturating_add(weight);
        }
        self.votes.insert(key, support);
        debug!("vote on budget proposal {id}: support={support} weight={weight} from {caller}");
        Ok(())
    }

    /// Tally a closed budget proposal against governance's current
    /// quorum. Owner-only. Success only marks the proposal executed; the
    /// treasury disburses the budget separately.
    pub fn execute_proposal(&mut self, caller: &AccountId, id: u64) -> Result<()> {
        let height = self.clock.height();
        let proposal = match self.proposals.get(&id) {
            Some(p) => p,
            None => return Err(VotingError::ProposalNotFound(id)),
        };
        if *caller != self.governance.handle().dao_owner() {
            return Err(VotingError::NotAuthorized);
        }
        if height < proposal.end_block {
            return Err(VotingError::ProposalActive(id));
        }
        if proposal.executed {
            return Err(VotingError::AlreadyExecuted(id));
        }

        let params = self.governance.handle().voting_params();
        let total_supply = self.token.read().unwrap().total_supply();
        match tally::evaluate(
            proposal.yes_votes,
            proposal.no_votes,
            total_supply,
            params.quorum_percentage,
        ) {
            TallyVerdict::Passed => {}
            TallyVerdict::QuorumNotMet {
                total_votes,
                required,
            } => {
                return Err(VotingError::QuorumNotMet {
                    total_votes,
                    required,
                })
            }
            TallyVerdict::ThresholdNotMet { yes, no } => {
                return Err(VotingError::ThresholdNotMet { yes, no })
            }
        }

        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(VotingError::ProposalNotFound(id))?;
        proposal.executed = true;
        info!("budget proposal {id} executed, {} earmarked", proposal.budget);
        Ok(())
    }
}

impl BudgetProposals for RwLock<Voting> {
    fn proposal_funding(&self, id: u64) -> Option<ProposalFunding> {
        self.read().unwrap().proposal(id).map(|p| ProposalFunding {
            executed: p.executed,
            budget: p.budget,
        })
    }
}
