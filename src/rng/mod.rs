//! Deterministic random number generation
//!
//! All randomness in the simulation (bank assignment, purchase choices,
//! labor market ordering) flows through a single seeded generator so that
//! identical seeds reproduce identical runs.

mod xorshift;

pub use xorshift::RngManager;
