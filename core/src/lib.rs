//! Wellness DAO shared kernel
//!
//! Types every controller in the stack depends on: opaque principal
//! identities, the token-ledger capability the DAO consumes (it never
//! implements the token itself), the externally driven block clock, and
//! the named capability references used to wire controllers together.

pub mod clock;
pub mod ledger;
pub mod principal;
pub mod reference;

pub use clock::BlockClock;
pub use ledger::{InMemoryLedger, LedgerError, SharedLedger, TokenLedger, TokenRef};
pub use principal::{AccountId, NULL_PRINCIPAL};
pub use reference::ContractRef;
