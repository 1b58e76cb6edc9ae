//! Account and bank identifiers
//!
//! Banks and accounts live in arenas and are referenced by stable indices
//! rather than by object identity, which keeps handles `Copy`, hashable,
//! and serializable. An `AccountHandle` is the capability an economic agent
//! holds: it can only be produced by registering with a bank, so possession
//! of a handle proves the account exists.

use serde::{Deserialize, Serialize};

/// Stable index of a bank within the central bank's registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BankId(pub(crate) u32);

impl BankId {
    /// Arena index of this bank.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Stable index of an account within its bank's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub(crate) u32);

impl AccountId {
    /// Arena index of this account within its bank.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Capability binding one economic agent to one bank
///
/// Created once per agent at registration and never re-bound to a different
/// bank; re-banking is unsupported. All settlement an agent performs flows
/// through its handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountHandle {
    bank: BankId,
    account: AccountId,
}

impl AccountHandle {
    pub(crate) fn new(bank: BankId, account: AccountId) -> Self {
        Self { bank, account }
    }

    /// The bank this account lives at.
    pub fn bank(&self) -> BankId {
        self.bank
    }

    /// The account's index within its bank.
    pub fn account(&self) -> AccountId {
        self.account
    }
}
