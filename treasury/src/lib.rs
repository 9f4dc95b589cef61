//! Wellness DAO Treasury Module
//!
//! Custodies contributed funds and disburses them against budget
//! proposals the voting controller reports as executed. Contributions
//! are time-locked; the lock resets on every new contribution and
//! withdrawals never exceed the caller's recorded amount.

pub mod error;
pub mod pool;

pub use error::{Result, TreasuryError};
pub use pool::{Contribution, Treasury, DEFAULT_LOCK_PERIOD};
