//! Governance error types

use thiserror::Error;
use wellness_core::LedgerError;

/// Failures raised by the governance controller. Every failure leaves
/// controller state exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("caller is not the DAO owner")]
    NotAuthorized,

    #[error("voting threshold must be 51-100, got {0}")]
    InvalidVotingThreshold(u64),

    #[error("quorum percentage must be 1-100, got {0}")]
    InvalidQuorum(u64),

    #[error("proposal duration must be positive")]
    InvalidProposalDuration,

    #[error("DAO is paused")]
    AlreadyPaused,

    #[error("DAO is not paused")]
    NotPaused,

    #[error("unknown parameter key: {0}")]
    InvalidParam(String),

    #[error("proposal {0} is still in its voting window")]
    ProposalActive(u64),

    #[error("proposal not found: {0}")]
    ProposalNotFound(u64),

    #[error("balance {balance} below proposal minimum {required}")]
    InsufficientBalance { balance: u64, required: u64 },

    #[error("already voted on proposal {0}")]
    AlreadyVoted(u64),

    #[error("voting ended for proposal {0}")]
    VotingEnded(u64),

    #[error("voting not started for proposal {0}")]
    VotingNotStarted(u64),

    #[error("invalid contract principal")]
    InvalidContractPrincipal,

    #[error("proposal capacity reached")]
    MaxProposalsExceeded,

    #[error("description must be 1-256 bytes")]
    InvalidDescription,

    #[error("reward rate must be 1-10, got {0}")]
    InvalidRewardRate(u64),

    #[error("quorum not met: {total_votes} votes of {required} required")]
    QuorumNotMet { total_votes: u64, required: u64 },

    #[error("threshold not met: {yes} yes vs {no} no")]
    ThresholdNotMet { yes: u64, no: u64 },

    #[error("proposal {0} already executed")]
    AlreadyExecuted(u64),

    #[error(transparent)]
    Token(#[from] LedgerError),
}

impl GovernanceError {
    /// Stable numeric identifier (1xx family). Codes are wire-stable:
    /// quorum and majority failures report the parameter-validation
    /// codes, and an already-executed proposal reports the paused code.
    pub fn code(&self) -> u32 {
        match self {
            GovernanceError::NotAuthorized => 100,
            GovernanceError::InvalidVotingThreshold(_) => 101,
            GovernanceError::InvalidQuorum(_) => 102,
            GovernanceError::InvalidProposalDuration => 103,
            GovernanceError::AlreadyPaused => 106,
            GovernanceError::NotPaused => 107,
            GovernanceError::InvalidParam(_) => 108,
            GovernanceError::ProposalActive(_) => 109,
            GovernanceError::ProposalNotFound(_) => 110,
            GovernanceError::InsufficientBalance { .. } => 111,
            GovernanceError::AlreadyVoted(_) => 112,
            GovernanceError::VotingEnded(_) => 113,
            GovernanceError::VotingNotStarted(_) => 114,
            GovernanceError::InvalidContractPrincipal => 115,
            GovernanceError::MaxProposalsExceeded => 116,
            GovernanceError::InvalidDescription => 117,
            GovernanceError::InvalidRewardRate(_) => 120,
            GovernanceError::QuorumNotMet { .. } => 102,
            GovernanceError::ThresholdNotMet { .. } => 101,
            GovernanceError::AlreadyExecuted(_) => 106,
            GovernanceError::Token(e) => e.code(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GovernanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_family() {
        assert_eq!(GovernanceError::NotAuthorized.code(), 100);
        assert_eq!(GovernanceError::MaxProposalsExceeded.code(), 116);
        assert_eq!(GovernanceError::AlreadyExecuted(3).code(), 106);
        assert_eq!(
            GovernanceError::QuorumNotMet {
                total_votes: 10,
                required: 100
            }
            .code(),
            102
        );
    }

    #[test]
    fn test_ledger_code_passes_through() {
        let err = GovernanceError::Token(LedgerError::InsufficientBalance {
            requested: 10,
            available: 0,
        });
        assert_eq!(err.code(), 1);
    }
}
