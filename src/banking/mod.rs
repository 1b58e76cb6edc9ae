//! Double-entry settlement core
//!
//! - **account**: arena ids and the opaque account handle (capability object)
//! - **entry**: immutable ledger records (deposits, withdrawals, loans)
//! - **bank**: per-account histories, balances, and the settlement operations
//! - **central_bank**: per-bank aggregate reserve tracking
//! - **credit**: the bank-side underwriting check for loan requests
//! - **system**: the coordinator owning all banks and the central bank,
//!   through which inter-bank transfers are routed
//!
//! # Critical Invariants
//!
//! 1. A balance is always recomputable from the entry history alone
//! 2. A bank's central-bank reserve mirrors its net deposit/withdraw flow
//! 3. A failed withdrawal leaves every account and reserve untouched

pub mod account;
pub mod bank;
pub mod central_bank;
pub mod credit;
pub mod entry;
pub mod system;

pub use account::{AccountHandle, AccountId, BankId};
pub use bank::{Bank, BankError};
pub use central_bank::CentralBank;
pub use entry::{DepositEntry, LedgerEntry, Loan, WithdrawEntry};
pub use system::Banking;
