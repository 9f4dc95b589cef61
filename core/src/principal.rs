//! Principal identities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved null/burn principal. Never accepted as a new owner, a new
/// contract address, or a disbursement recipient.
pub const NULL_PRINCIPAL: &str = "SP000000000000000000002Q6VF78";

/// Opaque identity of an account or contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The reserved null/burn principal.
    pub fn null() -> Self {
        Self(NULL_PRINCIPAL.to_string())
    }

    pub fn is_null(&self) -> bool {
        self.0 == NULL_PRINCIPAL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_principal() {
        assert!(AccountId::null().is_null());
        assert!(!AccountId::from("ST1OWNER").is_null());
        assert_eq!(AccountId::null().as_str(), NULL_PRINCIPAL);
    }

    #[test]
    fn test_display_round_trip() {
        let id = AccountId::from("ST2RECIPIENT");
        assert_eq!(id.to_string(), "ST2RECIPIENT");
        assert_eq!(AccountId::new(id.to_string()), id);
    }
}
