//! Governance controller
//!
//! The state machine behind upgrade and parameter-change proposals:
//! `create -> vote (while the window is open) -> execute (owner, after
//! the window closes)`. Execution tallies quorum and majority against
//! the token ledger, applies the payload, and mints the proposer reward.
//!
//! Every public operation either commits completely or fails without
//! touching state: fallible ledger calls run before any local mutation.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use log::{debug, info};
use wellness_core::{AccountId, BlockClock, ContractRef, TokenLedger, TokenRef};

use crate::config::{DaoConfig, VotingParams, DEFAULT_MAX_PROPOSALS, MAX_DESCRIPTION_LEN, MIN_PROPOSAL_BALANCE};
use crate::error::{GovernanceError, Result};
use crate::proposal::{ParamKey, Proposal, ProposalAction, VoteKey};
use crate::tally::{self, TallyVerdict};

/// Read-only configuration surface the voting and treasury controllers
/// resolve at construction time.
pub trait DaoDirectory: Send + Sync {
    fn dao_owner(&self) -> AccountId;

    fn is_paused(&self) -> bool;

    fn voting_params(&self) -> VotingParams;
}

/// Directory handle under its published principal.
pub type DirectoryRef = ContractRef<dyn DaoDirectory>;

pub struct Governance {
    contract_id: AccountId,
    config: DaoConfig,
    token: TokenRef,
    clock: BlockClock,
    proposals: BTreeMap<u64, Proposal>,
    votes: HashMap<VoteKey, bool>,
    next_proposal_id: u64,
    max_proposals: u64,
}

impl Governance {
    /// `contract_id` is the principal the DAO's own funds sit under in
    /// the ledger; `owner` is the deploying administrator.
    pub fn new(contract_id: AccountId, owner: AccountId, token: TokenRef, clock: BlockClock) -> Self {
        Self {
            contract_id,
            config: DaoConfig::new(owner),
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

    pub fn contract_id(&self) -> &AccountId {
        &self.contract_id
    }

    pub fn dao_owner(&self) -> &AccountId {
        &self.config.owner
    }

    pub fn voting_threshold(&self) -> u64 {
        self.config.voting_threshold
    }

    pub fn quorum_percentage(&self) -> u64 {
        self.config.quorum_percentage
    }

    pub fn proposal_duration(&self) -> u64 {
        self.config.proposal_duration
    }

    pub fn reward_rate(&self) -> u64 {
        self.config.reward_rate
    }

    pub fn is_paused(&self) -> bool {
        self.config.paused
    }

    pub fn token_contract(&self) -> &AccountId {
        self.token.address()
    }

    pub fn contract_address(&self, name: &str) -> Option<&AccountId> {
        self.config.contract_addresses.get(name)
    }

    pub fn proposal(&self, id: u64) -> Option<&Proposal> {
        self.proposals.get(&id)
    }

    pub fn vote(&self, id: u64, voter: &AccountId) -> Option<bool> {
        self.votes.get(&VoteKey::new(id, voter)).copied()
    }

    /// Number of proposals ever created; ids are dense from 0.
    pub fn proposal_count(&self) -> u64 {
        self.next_proposal_id
    }

    pub fn voting_params(&self) -> VotingParams {
        self.config.voting_params()
    }

    fn require_owner(&self, caller: &AccountId) -> Result<()> {
        if caller != &self.config.owner {
            return Err(GovernanceError::NotAuthorized);
        }
        Ok(())
    }

    pub fn set_dao_owner(&mut self, caller: &AccountId, new_owner: AccountId) -> Result<()> {
        self.require_owner(caller)?;
        if new_owner.is_null() {
            return Err(GovernanceError::InvalidContractPrincipal);
        }
        info!("dao owner changed: {} -> {}", self.config.owner, new_owner);
        self.config.owner = new_owner;
        Ok(())
    }

    pub fn set_voting_threshold(&mut self, caller: &AccountId, new_threshold: u64) -> Result<()> {
        self.require_owner(caller)?;
        if !(51..=100).contains(&new_threshold) {
            return Err(GovernanceError::InvalidVotingThreshold(new_threshold));
        }
        self.config.voting_threshold = new_threshold;
        Ok(())
    }

    pub fn set_quorum_percentage(&mut self, caller: &AccountId, new_quorum: u64) -> Result<()> {
        self.require_owner(caller)?;
        if !(1..=100).contains(&new_quorum) {
            return Err(GovernanceError::InvalidQuorum(new_quorum));
        }
        self.config.quorum_percentage = new_quorum;
        Ok(())
    }

    pub fn set_proposal_duration(&mut self, caller: &AccountId, new_duration: u64) -> Result<()> {
        self.require_owner(caller)?;
        if new_duration == 0 {
            return Err(GovernanceError::InvalidProposalDuration);
        }
        self.config.proposal_duration = new_duration;
        Ok(())
    }

    pub fn set_reward_rate(&mut self, caller: &AccountId, new_rate: u64) -> Result<()> {
        self.require_owner(caller)?;
        if !(1..=10).contains(&new_rate) {
            return Err(GovernanceError::InvalidRewardRate(new_rate));
        }
        self.config.reward_rate = new_rate;
        Ok(())
    }

    /// Repoint the token-ledger capability.
    pub fn set_token_contract(&mut self, caller: &AccountId, token: TokenRef) -> Result<()> {
        self.require_owner(caller)?;
        if token.address().is_null() {
            return Err(GovernanceError::InvalidContractPrincipal);
        }
        info!("token contract repointed to {}", token.address());
        self.token = token;
        Ok(())
    }

    pub fn pause(&mut self, caller: &AccountId) -> Result<()> {
        self.require_owner(caller)?;
        if self.config.paused {
            return Err(GovernanceError::AlreadyPaused);
        }
        self.config.paused = true;
        info!("dao paused");
        Ok(())
    }

    pub fn unpause(&mut self, caller: &AccountId) -> Result<()> {
        self.require_owner(caller)?;
        if !self.config.paused {
            return Err(GovernanceError::NotPaused);
        }
        self.config.paused = false;
        info!("dao unpaused");
        Ok(())
    }

    fn check_can_propose(&self, caller: &AccountId, description: &str) -> Result<()> {
        if self.config.paused {
            return Err(GovernanceError::AlreadyPaused);
        }
        if self.next_proposal_id >= self.max_proposals {
            return Err(GovernanceError::MaxProposalsExceeded);
        }
        let balance = self.token.handle().read().unwrap().balance_of(caller);
        if balance < MIN_PROPOSAL_BALANCE {
            return Err(GovernanceError::InsufficientBalance {
                balance,
                required: MIN_PROPOSAL_BALANCE,
            });
        }
        if description.is_empty() || description.len() > MAX_DESCRIPTION_LEN {
            return Err(GovernanceError::InvalidDescription);
        }
        Ok(())
    }

    fn insert_proposal(&mut self, proposer: &AccountId, description: String, action: ProposalAction) -> u64 {
        let id = self.next_proposal_id;
        let start_block = self.clock.height();
        // Duration is snapshotted here; later config changes leave the
        // window untouched.
        let end_block = start_block.saturating_add(self.config.proposal_duration);
        self.proposals.insert(
            id,
            Proposal {
                proposer: proposer.clone(),
                description,
                action,
                start_block,
                end_block,
                yes_votes: 0,
                no_votes: 0,
                executed: false,
            },
        );
        self.next_proposal_id += 1;
        info!("proposal {id} opened by {proposer}, window [{start_block}, {end_block})");
        id
    }

    /// Open a proposal to rewire `target` in the contract registry.
    pub fn create_upgrade_proposal(
        &mut self,
        caller: &AccountId,
        description: impl Into<String>,
        target: impl Into<String>,
        new_address: AccountId,
    ) -> Result<u64> {
        let description = description.into();
        self.check_can_propose(caller, &description)?;
        if new_address.is_null() {
            return Err(GovernanceError::InvalidContractPrincipal);
        }
        Ok(self.insert_proposal(
            caller,
            description,
            ProposalAction::Upgrade {
                target: target.into(),
                new_address,
            },
        ))
    }

    /// Open a proposal to change one voting parameter. The key is kept
    /// verbatim and resolved at execution.
    pub fn create_param_proposal(
        &mut self,
        caller: &AccountId,
        description: impl Into<String>,
        key: impl Into<String>,
        value: u64,
    ) -> Result<u64> {
        let description = description.into();
        self.check_can_propose(caller, &description)?;
        Ok(self.insert_proposal(
            caller,
            description,
            ProposalAction::ParamChange {
                key: key.into(),
                value,
            },
        ))
    }

    /// Cast the caller's vote, weighted by their ledger balance at this
    /// moment (not at proposal creation).
    pub fn vote_on_proposal(&mut self, caller: &AccountId, id: u64, support: bool) -> Result<()> {
        let height = self.clock.height();
        let proposal = match self.proposals.get(&id) {
            Some(p) => p,
            None => return Err(GovernanceError::ProposalNotFound(id)),
        };
        if self.config.paused {
            return Err(GovernanceError::AlreadyPaused);
        }
        if height < proposal.start_block {
            return Err(GovernanceError::VotingNotStarted(id));
        }
        if height >= proposal.end_block {
            return Err(GovernanceError::VotingEnded(id));
        }
        let key = VoteKey::new(id, caller);
        if self.votes.contains_key(&key) {
            return Err(GovernanceError::AlreadyVoted(id));
        }
        let weight = self.token.handle().read().unwrap().balance_of(caller);

        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))?;
        if support {
            proposal.yes_votes = proposal.yes_votes.saturating_add(weight);
        } else {
            proposal.no_votes = proposal.no_votes.saturating_add(weight);
        }
        self.votes.insert(key, support);
        debug!("vote on proposal {id}: support={support} weight={weight} from {caller}");
        Ok(())
    }

    /// Tally a closed proposal and apply its payload. Owner-only. On
    /// success the registry or parameter is updated, the proposal is
    /// marked executed, and `yes_votes * reward_rate / 100` is minted to
    /// the proposer. A reward-rate change pays out at its own new rate.
    pub fn execute_proposal(&mut self, caller: &AccountId, id: u64) -> Result<()> {
        enum Effect {
            Rewire { target: String, new_address: AccountId },
            SetParam { key: ParamKey, value: u64 },
        }

        let height = self.clock.height();
        let proposal = match self.proposals.get(&id) {
            Some(p) => p,
            None => return Err(GovernanceError::ProposalNotFound(id)),
        };
        self.require_owner(caller)?;
        if height < proposal.end_block {
            return Err(GovernanceError::ProposalActive(id));
        }
        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted(id));
        }

        let total_supply = self.token.handle().read().unwrap().total_supply();
        match tally::evaluate(
            proposal.yes_votes,
            proposal.no_votes,
            total_supply,
            self.config.quorum_percentage,
        ) {
            TallyVerdict::Passed => {}
            TallyVerdict::QuorumNotMet {
                total_votes,
                required,
            } => {
                return Err(GovernanceError::QuorumNotMet {
                    total_votes,
                    required,
                })
            }
            TallyVerdict::ThresholdNotMet { yes, no } => {
                return Err(GovernanceError::ThresholdNotMet { yes, no })
            }
        }

        let yes_votes = proposal.yes_votes;
        let proposer = proposal.proposer.clone();
        let effect = match proposal.action.clone() {
            ProposalAction::Upgrade {
                target,
                new_address,
            } => Effect::Rewire {
                target,
                new_address,
            },
            ProposalAction::ParamChange { key, value } => Effect::SetParam {
                key: ParamKey::from_key(&key).ok_or(GovernanceError::InvalidParam(key))?,
                value,
            },
        };

        let reward_rate = match &effect {
            Effect::SetParam {
                key: ParamKey::RewardRate,
                value,
            } => *value,
            _ => self.config.reward_rate,
        };
        let reward = ((yes_votes as u128 * reward_rate as u128) / 100) as u64;

        // Mint is the only fallible step left; the mutations after it
        // cannot fail, so the operation stays all-or-nothing.
        self.token
            .handle()
            .write()
            .unwrap()
            .mint(reward, &proposer)?;

        match effect {
            Effect::Rewire {
                target,
                new_address,
            } => {
                info!("proposal {id} executed: registry '{target}' -> {new_address}");
                self.config.contract_addresses.insert(target, new_address);
            }
            Effect::SetParam { key, value } => {
                info!("proposal {id} executed: {} = {value}", key.as_key());
                match key {
                    ParamKey::VotingThreshold => self.config.voting_threshold = value,
                    ParamKey::QuorumPercentage => self.config.quorum_percentage = value,
                    ParamKey::ProposalDuration => self.config.proposal_duration = value,
                    ParamKey::RewardRate => self.config.reward_rate = value,
                }
            }
        }
        if let Some(proposal) = self.proposals.get_mut(&id) {
            proposal.executed = true;
        }
        debug!("minted {reward} to proposer {proposer}");
        Ok(())
    }

    /// Drain DAO-held funds while paused. Owner-only.
    pub fn emergency_withdraw(&mut self, caller: &AccountId, amount: u64, recipient: &AccountId) -> Result<()> {
        self.require_owner(caller)?;
        if !self.config.paused {
            return Err(GovernanceError::NotPaused);
        }
        self.token
            .handle()
            .write()
            .unwrap()
            .transfer(amount, &self.contract_id, recipient)?;
        info!("emergency withdrawal of {amount} to {recipient}");
        Ok(())
    }
}

impl DaoDirectory for RwLock<Governance> {
    fn dao_owner(&self) -> AccountId {
        self.read().unwrap().dao_owner().clone()
    }

    fn is_paused(&self) -> bool {
        self.read().unwrap().is_paused()
    }

    fn voting_params(&self) -> VotingParams {
        self.read().unwrap().voting_params()
    }
}
