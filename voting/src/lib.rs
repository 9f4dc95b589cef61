//! Wellness DAO Voting Module
//!
//! Budget-allocation proposals over the shared treasury. The lifecycle
//! mirrors governance proposals, but the voting parameters (quorum,
//! window length) are fetched live from the governance controller at
//! creation and execution time, never cached. Executing a budget
//! proposal only marks it executed; the treasury moves the funds.

pub mod controller;
pub mod error;
pub mod proposal;

pub use controller::{BudgetProposals, BudgetProposalsRef, ProposalFunding, Voting};
pub use error::{Result, VotingError};
pub use proposal::BudgetProposal;

/// Budget-proposal capacity
pub const DEFAULT_MAX_PROPOSALS: u64 = 500;
