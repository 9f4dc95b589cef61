//! Voting error types

use thiserror::Error;

/// Failures raised by the voting controller. Every failure leaves
/// controller state exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VotingError {
    #[error("caller is not authorized")]
    NotAuthorized,

    #[error("threshold not met: {yes} yes vs {no} no")]
    ThresholdNotMet { yes: u64, no: u64 },

    #[error("proposal not found: {0}")]
    ProposalNotFound(u64),

    #[error("voting ended for proposal {0}")]
    VotingEnded(u64),

    #[error("voting not started for proposal {0}")]
    VotingNotStarted(u64),

    #[error("already voted on proposal {0}")]
    AlreadyVoted(u64),

    #[error("balance {balance} below proposal minimum {required}")]
    InsufficientBalance { balance: u64, required: u64 },

    #[error("description must be 1-256 bytes")]
    InvalidDescription,

    #[error("budget must be positive")]
    InvalidBudget,

    #[error("duration must be positive")]
    InvalidDuration,

    #[error("proposal {0} is still in its voting window")]
    ProposalActive(u64),

    #[error("quorum not met: {total_votes} votes of {required} required")]
    QuorumNotMet { total_votes: u64, required: u64 },

    #[error("proposal capacity reached")]
    MaxProposalsExceeded,

    #[error("proposal {0} already executed")]
    AlreadyExecuted(u64),
}

impl VotingError {
    /// Stable numeric identifier (2xx family).
    pub fn code(&self) -> u32 {
        match self {
            VotingError::NotAuthorized => 200,
            VotingError::ThresholdNotMet { .. } => 201,
            VotingError::ProposalNotFound(_) => 203,
            VotingError::VotingEnded(_) => 204,
            VotingError::VotingNotStarted(_) => 205,
            VotingError::AlreadyVoted(_) => 206,
            VotingError::InsufficientBalance { .. } => 207,
            VotingError::InvalidDescription => 208,
            VotingError::InvalidBudget => 209,
            VotingError::InvalidDuration => 210,
            VotingError::ProposalActive(_) => 211,
            VotingError::QuorumNotMet { .. } => 212,
            VotingError::MaxProposalsExceeded => 213,
            VotingError::AlreadyExecuted(_) => 215,
        }
    }
}

pub type Result<T> = std::result::Result<T, VotingError>;
