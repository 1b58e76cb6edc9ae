//! Bank: per-account ledgers and settlement operations
//!
//! The bank is the only mutator of balances and the sole writer of reserve
//! deltas. Each account holds append-only deposit, withdraw, and loan
//! histories; the balance is derived from those histories, with a cached
//! scalar updated atomically alongside every entry insertion. Withdrawals
//! recompute the balance from the entries at call time, so the check can
//! never act on a stale cache.

use crate::banking::account::{AccountHandle, AccountId, BankId};
use crate::banking::central_bank::CentralBank;
use crate::banking::credit;
use crate::banking::entry::{DepositEntry, LedgerEntry, Loan, WithdrawEntry};
use crate::finance::{CorpStats, FinanceError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Interest rate attached to issued loans (accrual itself is not modeled).
pub const DEFAULT_LOAN_INTEREST_RATE: f64 = 0.05;

/// Errors from bank operations
///
/// Credit denial is not in this taxonomy: a denied loan is an expected
/// business outcome and surfaces as `Ok(None)`, never as an error.
#[derive(Debug, Error, PartialEq)]
pub enum BankError {
    #[error("invalid amount: {amount}")]
    InvalidAmount { amount: f64 },

    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: f64, available: f64 },

    #[error("no entry with id {entry_id} on this account")]
    NotFound { entry_id: String },

    #[error("entry id must be a non-empty string")]
    InvalidEntryId,

    #[error("owner {owner} already holds an account at this bank")]
    DuplicateRegistration { owner: String },

    #[error("account is not registered with this bank")]
    UnknownAccount,

    #[error("finance error: {0}")]
    Finance(#[from] FinanceError),
}

/// One account's ledgers plus the cached balance accelerator
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccountRecord {
    owner: String,
    deposits: Vec<DepositEntry>,
    withdraws: Vec<WithdrawEntry>,
    loans: Vec<Loan>,
    /// Cache of `derived_balance`; updated atomically with entry insertion
    balance: f64,
}

impl AccountRecord {
    fn new(owner: String) -> Self {
        Self {
            owner,
            deposits: Vec::new(),
            withdraws: Vec::new(),
            loans: Vec::new(),
            balance: 0.0,
        }
    }

    /// Balance recomputed purely from the entry history.
    ///
    /// Loan principal counts toward the balance: borrowed funds are
    /// spendable, they are just recorded apart from earned deposits.
    fn derived_balance(&self) -> f64 {
        let deposited: f64 = self.deposits.iter().map(|d| d.amount()).sum();
        let withdrawn: f64 = self.withdraws.iter().map(|w| w.amount()).sum();
        let borrowed: f64 = self.loans.iter().map(|l| l.principal()).sum();
        deposited - withdrawn + borrowed
    }
}

/// A commercial bank participating in the settlement system
///
/// # Example
/// ```
/// use econ_simulator_core_rs::{Bank, CentralBank};
///
/// let mut central = CentralBank::new();
/// let mut bank = Bank::new(&mut central);
///
/// let account = bank.register("Corp-1").unwrap();
/// bank.deposit(&mut central, 100.0, account).unwrap();
///
/// assert_eq!(bank.balance(account).unwrap(), 100.0);
/// assert_eq!(central.reserve(bank.id()), 100.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bank {
    id: BankId,
    accounts: Vec<AccountRecord>,
    owners: HashMap<String, AccountId>,
    loan_interest_rate: f64,
}

impl Bank {
    /// Create a bank registered with the given central bank.
    pub fn new(central: &mut CentralBank) -> Self {
        Self {
            id: central.register_bank(),
            accounts: Vec::new(),
            owners: HashMap::new(),
            loan_interest_rate: DEFAULT_LOAN_INTEREST_RATE,
        }
    }

    pub fn id(&self) -> BankId {
        self.id
    }

    pub fn num_accounts(&self) -> usize {
        self.accounts.len()
    }

    /// Open an account for `owner`, creating its empty entry histories.
    ///
    /// Must precede any other operation on the account; the returned handle
    /// is the only way to reference it. Registering the same owner twice
    /// fails with `DuplicateRegistration`.
    pub fn register(&mut self, owner: &str) -> Result<AccountHandle, BankError> {
        if self.owners.contains_key(owner) {
            return Err(BankError::DuplicateRegistration {
                owner: owner.to_string(),
            });
        }

        let account = AccountId(self.accounts.len() as u32);
        self.accounts.push(AccountRecord::new(owner.to_string()));
        self.owners.insert(owner.to_string(), account);
        Ok(AccountHandle::new(self.id, account))
    }

    /// Whether the handle names an account registered at this bank.
    pub fn is_registered(&self, handle: AccountHandle) -> bool {
        self.record(handle).is_ok()
    }

    /// Credit `amount` to the account and mirror it into the reserve.
    ///
    /// Zero is a legal deposit; a negative or non-finite amount fails with
    /// `InvalidAmount`.
    pub fn deposit(
        &mut self,
        central: &mut CentralBank,
        amount: f64,
        handle: AccountHandle,
    ) -> Result<String, BankError> {
        validate_amount(amount)?;
        let bank_id = self.id;

        let record = self.record_mut(handle)?;
        let entry = DepositEntry::new(amount, handle);
        let id = entry.id().to_string();
        record.deposits.push(entry);
        record.balance += amount;

        central.add_reserve(amount, bank_id);
        Ok(id)
    }

    /// Debit `amount` from the account and mirror it out of the reserve.
    ///
    /// The available balance is recomputed from the entry history at call
    /// time; `InsufficientFunds` leaves account and reserve untouched.
    pub fn withdraw(
        &mut self,
        central: &mut CentralBank,
        amount: f64,
        handle: AccountHandle,
    ) -> Result<String, BankError> {
        validate_amount(amount)?;
        let bank_id = self.id;

        let record = self.record_mut(handle)?;
        let available = record.derived_balance();
        debug_assert!(
            (available - record.balance).abs() < 1e-6,
            "cached balance diverged from entry history"
        );
        if amount > available {
            return Err(BankError::InsufficientFunds {
                requested: amount,
                available,
            });
        }

        let entry = WithdrawEntry::new(amount, handle);
        let id = entry.id().to_string();
        record.withdraws.push(entry);
        record.balance -= amount;

        central.remove_reserve(amount, bank_id);
        Ok(id)
    }

    /// Underwrite and, on approval, issue a loan against this account.
    ///
    /// Risk scoring is delegated to [`credit::assess`], which re-derives
    /// the borrower's forecast and revenue trend from its own series.
    /// Denial is `Ok(None)`. Approval appends a `Loan` record (not a
    /// deposit) and credits the balance; the reserve is untouched because
    /// loan principal is not settlement flow.
    pub fn issue_loan(
        &mut self,
        amount_requested: f64,
        borrower: &CorpStats,
        current_tick: usize,
        handle: AccountHandle,
    ) -> Result<Option<Loan>, BankError> {
        validate_amount(amount_requested)?;

        let balance = self.balance(handle)?;
        let offer = credit::assess(amount_requested, borrower, balance, current_tick)?;
        if offer <= 0.0 {
            return Ok(None);
        }

        let loan = Loan::new(offer, self.id, handle, self.loan_interest_rate);
        let record = self.record_mut(handle)?;
        record.loans.push(loan.clone());
        record.balance += loan.principal();
        Ok(Some(loan))
    }

    /// Look up a deposit or withdrawal by entry id.
    ///
    /// Searches this account's deposit and withdraw histories only; loans
    /// are queried separately via [`Bank::loans`].
    pub fn find_entry(
        &self,
        entry_id: &str,
        handle: AccountHandle,
    ) -> Result<LedgerEntry<'_>, BankError> {
        if entry_id.is_empty() {
            return Err(BankError::InvalidEntryId);
        }
        let record = self.record(handle)?;

        if let Some(deposit) = record.deposits.iter().find(|d| d.id() == entry_id) {
            return Ok(LedgerEntry::Deposit(deposit));
        }
        if let Some(withdraw) = record.withdraws.iter().find(|w| w.id() == entry_id) {
            return Ok(LedgerEntry::Withdraw(withdraw));
        }
        Err(BankError::NotFound {
            entry_id: entry_id.to_string(),
        })
    }

    /// Current balance (cached accelerator, consistent with the entries).
    pub fn balance(&self, handle: AccountHandle) -> Result<f64, BankError> {
        Ok(self.record(handle)?.balance)
    }

    /// Balance recomputed from the entry history, bypassing the cache.
    pub fn balance_from_entries(&self, handle: AccountHandle) -> Result<f64, BankError> {
        Ok(self.record(handle)?.derived_balance())
    }

    /// Loans issued against this account, in issuance order.
    pub fn loans(&self, handle: AccountHandle) -> Result<&[Loan], BankError> {
        Ok(self.record(handle)?.loans.as_slice())
    }

    /// Number of deposit and withdraw entries recorded for this account.
    pub fn entry_count(&self, handle: AccountHandle) -> Result<usize, BankError> {
        let record = self.record(handle)?;
        Ok(record.deposits.len() + record.withdraws.len())
    }

    /// Sum of all account balances at this bank.
    pub fn total_balance(&self) -> f64 {
        self.accounts.iter().map(|record| record.balance).sum()
    }

    fn record(&self, handle: AccountHandle) -> Result<&AccountRecord, BankError> {
        if handle.bank() != self.id {
            return Err(BankError::UnknownAccount);
        }
        self.accounts
            .get(handle.account().index())
            .ok_or(BankError::UnknownAccount)
    }

    fn record_mut(&mut self, handle: AccountHandle) -> Result<&mut AccountRecord, BankError> {
        if handle.bank() != self.id {
            return Err(BankError::UnknownAccount);
        }
        self.accounts
            .get_mut(handle.account().index())
            .ok_or(BankError::UnknownAccount)
    }
}

fn validate_amount(amount: f64) -> Result<(), BankError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(BankError::InvalidAmount { amount });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (CentralBank, Bank) {
        let mut central = CentralBank::new();
        let bank = Bank::new(&mut central);
        (central, bank)
    }

    #[test]
    fn test_register_twice_fails() {
        let (_, mut bank) = setup();
        bank.register("Corp-1").unwrap();

        assert_eq!(
            bank.register("Corp-1"),
            Err(BankError::DuplicateRegistration {
                owner: "Corp-1".to_string()
            })
        );
    }

    #[test]
    fn test_zero_deposit_is_legal() {
        let (mut central, mut bank) = setup();
        let account = bank.register("Person-1").unwrap();

        assert!(bank.deposit(&mut central, 0.0, account).is_ok());
        assert_eq!(bank.balance(account).unwrap(), 0.0);
    }

    #[test]
    fn test_negative_deposit_rejected() {
        let (mut central, mut bank) = setup();
        let account = bank.register("Person-1").unwrap();

        let err = bank.deposit(&mut central, -5.0, account).unwrap_err();
        assert_eq!(err, BankError::InvalidAmount { amount: -5.0 });
    }

    #[test]
    fn test_nan_amount_rejected() {
        let (mut central, mut bank) = setup();
        let account = bank.register("Person-1").unwrap();

        assert!(matches!(
            bank.deposit(&mut central, f64::NAN, account),
            Err(BankError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_overdraft_rejected_and_state_unchanged() {
        let (mut central, mut bank) = setup();
        let account = bank.register("Person-1").unwrap();
        bank.deposit(&mut central, 30.0, account).unwrap();

        let err = bank.withdraw(&mut central, 31.0, account).unwrap_err();
        assert_eq!(
            err,
            BankError::InsufficientFunds {
                requested: 31.0,
                available: 30.0
            }
        );
        assert_eq!(bank.balance(account).unwrap(), 30.0);
        assert_eq!(central.reserve(bank.id()), 30.0);
    }

    #[test]
    fn test_foreign_handle_rejected() {
        let mut central = CentralBank::new();
        let mut bank_a = Bank::new(&mut central);
        let mut bank_b = Bank::new(&mut central);
        let foreign = bank_b.register("Corp-1").unwrap();

        assert_eq!(
            bank_a.deposit(&mut central, 10.0, foreign),
            Err(BankError::UnknownAccount)
        );
    }

    #[test]
    fn test_find_entry_rejects_empty_id() {
        let (_, mut bank) = setup();
        let account = bank.register("Person-1").unwrap();

        assert_eq!(bank.find_entry("", account), Err(BankError::InvalidEntryId));
    }

    #[test]
    fn test_cached_balance_matches_entry_history() {
        let (mut central, mut bank) = setup();
        let account = bank.register("Corp-1").unwrap();

        bank.deposit(&mut central, 120.0, account).unwrap();
        bank.withdraw(&mut central, 45.5, account).unwrap();
        bank.deposit(&mut central, 10.0, account).unwrap();

        assert_eq!(
            bank.balance(account).unwrap(),
            bank.balance_from_entries(account).unwrap()
        );
    }
}
