//! Economic Simulator Core - Settlement Engine
//!
//! Agent-based economic simulator built around a double-entry settlement
//! core with deterministic execution.
//!
//! # Architecture
//!
//! - **banking**: ledger entries, banks, central-bank reserves, credit
//! - **finance**: time series and the financial-health engine
//! - **agents**: corporation and person agents
//! - **orchestrator**: configuration and the tick loop
//! - **stats**: economy-wide aggregate series
//! - **events**: structured event log of every state change
//! - **rng**: deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. Balances are derivable from the append-only entry history alone
//! 2. A bank's reserve at the central bank mirrors its net deposit/withdraw flow
//! 3. All randomness is deterministic (seeded RNG)
//! 4. Agents act strictly sequentially within a tick; financial reviews
//!    only ever read completed prior ticks

// Module declarations
pub mod agents;
pub mod banking;
pub mod events;
pub mod finance;
pub mod orchestrator;
pub mod rng;
pub mod stats;

// Re-exports for convenience
pub use agents::{Corporation, Good, Person, PersonId};
pub use banking::{
    AccountHandle, AccountId, Bank, BankError, BankId, Banking, CentralBank, DepositEntry,
    LedgerEntry, Loan, WithdrawEntry,
};
pub use events::{Event, EventLog};
pub use finance::{
    trend, CorpStats, FinanceAction, FinanceError, FinancialHealth, Forecast, TimeSeries,
};
pub use orchestrator::{
    CorporationSeed, PersonSeed, Simulation, SimulationConfig, SimulationError, TickResult,
};
pub use rng::RngManager;
pub use stats::SimStats;
