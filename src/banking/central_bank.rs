//! Central bank reserve tracking
//!
//! The central bank keeps one aggregate reserve scalar per registered bank
//! and no agent-level detail. Reserves move only as a side effect of a
//! bank's deposit and withdraw operations; the central bank itself never
//! validates the delta. A negative reserve is possible only when a bank's
//! own balance invariant was already violated, which makes it a detectable
//! bug signal rather than a normal state.

use crate::banking::account::BankId;
use serde::{Deserialize, Serialize};

/// Per-bank aggregate liquidity mirror
///
/// # Example
/// ```
/// use econ_simulator_core_rs::CentralBank;
///
/// let mut central = CentralBank::new();
/// let bank = central.register_bank();
///
/// central.add_reserve(100.0, bank);
/// central.remove_reserve(40.0, bank);
/// assert_eq!(central.reserve(bank), 60.0);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CentralBank {
    reserves: Vec<f64>,
}

impl CentralBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bank, initializing its reserve to zero.
    pub fn register_bank(&mut self) -> BankId {
        let id = BankId(self.reserves.len() as u32);
        self.reserves.push(0.0);
        id
    }

    /// Unconditionally increase a bank's reserve.
    pub fn add_reserve(&mut self, amount: f64, bank: BankId) {
        self.reserves[bank.index()] += amount;
    }

    /// Unconditionally decrease a bank's reserve.
    pub fn remove_reserve(&mut self, amount: f64, bank: BankId) {
        self.reserves[bank.index()] -= amount;
    }

    /// Current reserve for one bank.
    pub fn reserve(&self, bank: BankId) -> f64 {
        self.reserves[bank.index()]
    }

    /// Sum of reserves across all registered banks.
    pub fn total_reserve(&self) -> f64 {
        self.reserves.iter().sum()
    }

    /// Number of registered banks.
    pub fn num_banks(&self) -> usize {
        self.reserves.len()
    }
}
