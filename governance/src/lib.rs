//! Wellness DAO Governance Module
//!
//! Owns the DAO-wide configuration (owner, voting parameters, reward
//! rate, pause flag, contract-address registry) and the proposal store
//! for contract-upgrade and parameter-change proposals. Token holders
//! vote weighted by ledger balance; the owner executes closed proposals,
//! which tallies quorum and majority and applies the payload.
//!
//! Other controllers read configuration through the [`DaoDirectory`]
//! capability rather than touching governance state directly.

pub mod config;
pub mod dao;
pub mod error;
pub mod proposal;
pub mod tally;

pub use config::{DaoConfig, VotingParams};
pub use dao::{DaoDirectory, DirectoryRef, Governance};
pub use error::{GovernanceError, Result};
pub use proposal::{ParamKey, Proposal, ProposalAction, VoteKey};
pub use tally::TallyVerdict;
