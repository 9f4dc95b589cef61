//! Named capability references

use std::fmt;
use std::sync::Arc;

use crate::principal::AccountId;

/// A reference to another contract: the principal it is published under
/// plus a live handle for queries against it. Controllers receive these
/// at construction time and owners may swap them; there is no ambient
/// registry lookup.
pub struct ContractRef<T: ?Sized> {
    address: AccountId,
    handle: Arc<T>,
}

impl<T: ?Sized> ContractRef<T> {
    pub fn new(address: AccountId, handle: Arc<T>) -> Self {
        Self { address, handle }
    }

    /// The principal this contract is published under.
    pub fn address(&self) -> &AccountId {
        &self.address
    }

    pub fn handle(&self) -> &T {
        &self.handle
    }
}

impl<T: ?Sized> Clone for ContractRef<T> {
    fn clone(&self) -> Self {
        Self {
            address: self.address.clone(),
            handle: Arc::clone(&self.handle),
        }
    }
}

impl<T: ?Sized> fmt::Debug for ContractRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContractRef").field(&self.address).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_handle() {
        let shared = Arc::new(42u64);
        let r = ContractRef::new(AccountId::from(".governance"), shared);
        let r2 = r.clone();
        assert_eq!(r2.address(), &AccountId::from(".governance"));
        assert_eq!(*r2.handle(), 42);
    }
}
