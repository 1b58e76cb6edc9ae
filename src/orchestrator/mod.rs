//! Simulation orchestration
//!
//! Configuration types and the tick loop driving all agents in strict
//! per-tick order.

pub mod engine;

pub use engine::{
    CorporationSeed, PersonSeed, Simulation, SimulationConfig, SimulationError, TickResult,
};
