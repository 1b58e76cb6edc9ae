//! Banking system coordinator
//!
//! Owns the central bank and every commercial bank, and routes operations
//! to the bank named by an account handle. Transfers are the reason this
//! layer exists: the deposit leg is always routed through the recipient's
//! own bank, so an inter-bank transfer correctly moves reserve from one
//! bank to another.

use crate::banking::account::{AccountHandle, BankId};
use crate::banking::bank::{Bank, BankError};
use crate::banking::central_bank::CentralBank;
use crate::banking::entry::{LedgerEntry, Loan};
use crate::finance::CorpStats;
use serde::{Deserialize, Serialize};

/// All banks plus the central bank, as a single settlement system
///
/// # Example
/// ```
/// use econ_simulator_core_rs::Banking;
///
/// let mut banking = Banking::new();
/// let bank1 = banking.add_bank();
/// let bank2 = banking.add_bank();
///
/// let a = banking.register(bank1, "Corp-A").unwrap();
/// let b = banking.register(bank2, "Person-B").unwrap();
///
/// banking.deposit(100.0, a).unwrap();
/// banking.transfer(50.0, a, b).unwrap();
///
/// assert_eq!(banking.balance(a).unwrap(), 50.0);
/// assert_eq!(banking.balance(b).unwrap(), 50.0);
/// assert_eq!(banking.reserve(bank1), 50.0);
/// assert_eq!(banking.reserve(bank2), 50.0);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Banking {
    central: CentralBank,
    banks: Vec<Bank>,
}

impl Banking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a new bank.
    pub fn add_bank(&mut self) -> BankId {
        let bank = Bank::new(&mut self.central);
        let id = bank.id();
        debug_assert_eq!(id.index(), self.banks.len());
        self.banks.push(bank);
        id
    }

    /// Open an account for `owner` at the given bank.
    pub fn register(&mut self, bank: BankId, owner: &str) -> Result<AccountHandle, BankError> {
        self.banks[bank.index()].register(owner)
    }

    /// Credit `amount` to the account at its own bank.
    pub fn deposit(&mut self, amount: f64, handle: AccountHandle) -> Result<String, BankError> {
        let Self { central, banks } = self;
        banks[handle.bank().index()].deposit(central, amount, handle)
    }

    /// Debit `amount` from the account at its own bank.
    pub fn withdraw(&mut self, amount: f64, handle: AccountHandle) -> Result<String, BankError> {
        let Self { central, banks } = self;
        banks[handle.bank().index()].withdraw(central, amount, handle)
    }

    /// Move `amount` from one account to another.
    ///
    /// Withdraws from `from` first, then deposits into `to` via `to`'s own
    /// bank. The recipient is validated before any money moves, so a failed
    /// withdrawal (or an unknown recipient) leaves no partial state behind.
    /// A transfer to self is legal: a net no-op on the balance that still
    /// appends both entries.
    pub fn transfer(
        &mut self,
        amount: f64,
        from: AccountHandle,
        to: AccountHandle,
    ) -> Result<(String, String), BankError> {
        if !self.banks[to.bank().index()].is_registered(to) {
            return Err(BankError::UnknownAccount);
        }

        let withdraw_id = self.withdraw(amount, from)?;
        let deposit_id = self.deposit(amount, to)?;
        Ok((withdraw_id, deposit_id))
    }

    /// Request a loan for the account, underwritten by its own bank.
    ///
    /// `Ok(None)` is a denial; see [`crate::banking::credit::assess`].
    pub fn issue_loan(
        &mut self,
        amount_requested: f64,
        borrower: &CorpStats,
        current_tick: usize,
        handle: AccountHandle,
    ) -> Result<Option<Loan>, BankError> {
        self.banks[handle.bank().index()].issue_loan(
            amount_requested,
            borrower,
            current_tick,
            handle,
        )
    }

    /// Look up a deposit or withdrawal by id on the account's own bank.
    pub fn find_entry(
        &self,
        entry_id: &str,
        handle: AccountHandle,
    ) -> Result<LedgerEntry<'_>, BankError> {
        self.banks[handle.bank().index()].find_entry(entry_id, handle)
    }

    /// Current balance of the account.
    pub fn balance(&self, handle: AccountHandle) -> Result<f64, BankError> {
        self.banks[handle.bank().index()].balance(handle)
    }

    /// Loans issued against the account, in issuance order.
    pub fn loans(&self, handle: AccountHandle) -> Result<&[Loan], BankError> {
        self.banks[handle.bank().index()].loans(handle)
    }

    /// Current central-bank reserve for one bank.
    pub fn reserve(&self, bank: BankId) -> f64 {
        self.central.reserve(bank)
    }

    pub fn central(&self) -> &CentralBank {
        &self.central
    }

    pub fn bank(&self, id: BankId) -> &Bank {
        &self.banks[id.index()]
    }

    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    pub fn num_banks(&self) -> usize {
        self.banks.len()
    }

    /// Sum of every account balance across all banks.
    pub fn total_balances(&self) -> f64 {
        self.banks.iter().map(|bank| bank.total_balance()).sum()
    }
}
