//! Token ledger capability
//!
//! The governance stack consumes the token ledger (balances, total
//! supply, mint, transfer) as an external capability. [`InMemoryLedger`]
//! is a plain account-map implementation for tests and local wiring;
//! production deployments hand in whatever ledger the chain provides.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

use crate::principal::AccountId;
use crate::reference::ContractRef;

/// Ledger failures surface to callers unchanged, carrying the ledger's
/// own stable code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u64, available: u64 },

    #[error("total supply overflow")]
    SupplyOverflow,
}

impl LedgerError {
    pub fn code(&self) -> u32 {
        match self {
            LedgerError::InsufficientBalance { .. } => 1,
            LedgerError::SupplyOverflow => 2,
        }
    }
}

/// Interface to the token ledger.
pub trait TokenLedger: Send + Sync {
    fn balance_of(&self, account: &AccountId) -> u64;

    fn total_supply(&self) -> u64;

    fn mint(&mut self, amount: u64, recipient: &AccountId) -> Result<(), LedgerError>;

    fn transfer(&mut self, amount: u64, from: &AccountId, to: &AccountId)
        -> Result<(), LedgerError>;
}

/// Shared handle to a ledger implementation.
pub type SharedLedger = Arc<RwLock<dyn TokenLedger>>;

/// Ledger handle under its published principal.
pub type TokenRef = ContractRef<RwLock<dyn TokenLedger>>;

/// Simple in-memory account map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryLedger {
    balances: HashMap<AccountId, u64>,
    total_supply: u64,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap into the shared handle the controllers expect.
    pub fn into_shared(self) -> SharedLedger {
        Arc::new(RwLock::new(self))
    }
}

impl TokenLedger for InMemoryLedger {
    fn balance_of(&self, account: &AccountId) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> u64 {
        self.total_supply
    }

    fn mint(&mut self, amount: u64, recipient: &AccountId) -> Result<(), LedgerError> {
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow)?;
        *self.balances.entry(recipient.clone()).or_insert(0) += amount;
        self.total_supply = new_supply;
        Ok(())
    }

    fn transfer(
        &mut self,
        amount: u64,
        from: &AccountId,
        to: &AccountId,
    ) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available,
            });
        }
        self.balances.insert(from.clone(), available - amount);
        *self.balances.entry(to.clone()).or_insert(0) += amount;
        Ok(())
    }
}
