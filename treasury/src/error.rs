//! Treasury error types

use thiserror::Error;
use wellness_core::LedgerError;

/// Failures raised by the treasury. Every failure leaves treasury state
/// exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreasuryError {
    #[error("caller is not the DAO owner")]
    NotAuthorized,

    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: u64, available: u64 },

    #[error("amount must be positive")]
    InvalidAmount,

    #[error("proposal not found: {0}")]
    ProposalNotFound(u64),

    #[error("proposal {0} has not executed")]
    ProposalNotExecuted(u64),

    #[error("treasury is paused")]
    AlreadyPaused,

    #[error("treasury is not paused")]
    NotPaused,

    #[error("invalid recipient")]
    InvalidRecipient,

    #[error("contribution locked until block {unlocks_at}, current {height}")]
    ContributionLocked { unlocks_at: u64, height: u64 },

    #[error("no contribution on record")]
    InvalidContribution,

    #[error(transparent)]
    Token(#[from] LedgerError),
}

impl TreasuryError {
    /// Stable numeric identifier (3xx family). Ledger failures pass the
    /// ledger's own code through unchanged.
    pub fn code(&self) -> u32 {
        match self {
            TreasuryError::NotAuthorized => 300,
            TreasuryError::InsufficientFunds { .. } => 301,
            TreasuryError::InvalidAmount => 302,
            TreasuryError::ProposalNotFound(_) => 303,
            TreasuryError::ProposalNotExecuted(_) => 304,
            TreasuryError::AlreadyPaused => 305,
            TreasuryError::NotPaused => 306,
            TreasuryError::InvalidRecipient => 307,
            TreasuryError::ContributionLocked { .. } => 311,
            TreasuryError::InvalidContribution => 312,
            TreasuryError::Token(e) => e.code(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TreasuryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_family() {
        assert_eq!(TreasuryError::NotAuthorized.code(), 300);
        assert_eq!(TreasuryError::InvalidContribution.code(), 312);
        assert_eq!(
            TreasuryError::ContributionLocked {
                unlocks_at: 1440,
                height: 100
            }
            .code(),
            311
        );
    }

    #[test]
    fn test_ledger_code_passes_through() {
        let err = TreasuryError::Token(LedgerError::InsufficientBalance {
            requested: 500,
            available: 100,
        });
        assert_eq!(err.code(), 1);
    }
}
