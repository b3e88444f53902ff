//! Administrative capability gate

use std::collections::HashSet;

use crate::types::Address;

/// Decides which callers may run admin operations
pub trait AccessControl: Send + Sync {
    fn is_admin(&self, caller: &Address) -> bool;
}

/// Fixed set of administrator addresses
#[derive(Clone, Debug, Default)]
pub struct AdminList {
    admins: HashSet<Address>,
}

impl AdminList {
    pub fn new(admins: impl IntoIterator<Item = Address>) -> Self {
        Self {
            admins: admins.into_iter().filter(|a| !a.is_null()).collect(),
        }
    }

    pub fn single(admin: Address) -> Self {
        Self::new([admin])
    }

    pub fn len(&self) -> usize {
        self.admins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.admins.is_empty()
    }
}

impl AccessControl for AdminList {
    fn is_admin(&self, caller: &Address) -> bool {
        self.admins.contains(caller)
    }
}
