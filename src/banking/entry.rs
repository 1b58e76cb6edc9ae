//! Immutable ledger records
//!
//! Every settlement operation appends exactly one record: a deposit, a
//! withdrawal, or a loan. Records are never modified or deleted after
//! creation; balances are derived from them. Entry ids are UUID strings,
//! unique across all entry types of an account.

use crate::banking::account::{AccountHandle, BankId};
use serde::{Deserialize, Serialize};

/// Generate a fresh ledger entry id.
pub(crate) fn new_entry_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Record of funds credited to an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositEntry {
    id: String,
    amount: f64,
    /// Recipient account (its handle names the receiving bank)
    account: AccountHandle,
}

impl DepositEntry {
    pub(crate) fn new(amount: f64, account: AccountHandle) -> Self {
        Self {
            id: new_entry_id(),
            amount,
            account,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn account(&self) -> AccountHandle {
        self.account
    }
}

/// Record of funds debited from an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawEntry {
    id: String,
    amount: f64,
    /// Source account (its handle names the source bank)
    account: AccountHandle,
}

impl WithdrawEntry {
    pub(crate) fn new(amount: f64, account: AccountHandle) -> Self {
        Self {
            id: new_entry_id(),
            amount,
            account,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn account(&self) -> AccountHandle {
        self.account
    }
}

/// Record of borrowed funds credited to an account
///
/// A loan is not a deposit: the distinct record type keeps earned and
/// borrowed funds apart in the history. The interest rate is stored with
/// the record; accrual itself is not modeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    id: String,
    principal: f64,
    issued_by: BankId,
    issued_to: AccountHandle,
    interest_rate: f64,
}

impl Loan {
    pub(crate) fn new(
        principal: f64,
        issued_by: BankId,
        issued_to: AccountHandle,
        interest_rate: f64,
    ) -> Self {
        Self {
            id: new_entry_id(),
            principal,
            issued_by,
            issued_to,
            interest_rate,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn issued_by(&self) -> BankId {
        self.issued_by
    }

    pub fn issued_to(&self) -> AccountHandle {
        self.issued_to
    }

    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }
}

/// Borrowed view of a deposit or withdrawal found by id lookup
///
/// Loans are queried separately and never returned by entry lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LedgerEntry<'a> {
    Deposit(&'a DepositEntry),
    Withdraw(&'a WithdrawEntry),
}

impl<'a> LedgerEntry<'a> {
    pub fn id(&self) -> &str {
        match self {
            LedgerEntry::Deposit(entry) => entry.id(),
            LedgerEntry::Withdraw(entry) => entry.id(),
        }
    }

    pub fn amount(&self) -> f64 {
        match self {
            LedgerEntry::Deposit(entry) => entry.amount(),
            LedgerEntry::Withdraw(entry) => entry.amount(),
        }
    }

    pub fn is_deposit(&self) -> bool {
        matches!(self, LedgerEntry::Deposit(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banking::account::AccountId;

    fn handle() -> AccountHandle {
        AccountHandle::new(BankId(0), AccountId(0))
    }

    #[test]
    fn test_entry_ids_are_unique() {
        let a = DepositEntry::new(10.0, handle());
        let b = DepositEntry::new(10.0, handle());
        let c = WithdrawEntry::new(10.0, handle());

        assert_ne!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn test_ledger_entry_view_accessors() {
        let deposit = DepositEntry::new(25.0, handle());
        let view = LedgerEntry::Deposit(&deposit);

        assert!(view.is_deposit());
        assert_eq!(view.amount(), 25.0);
        assert_eq!(view.id(), deposit.id());
    }
}
