//! Economic agents
//!
//! Corporations produce, hire, and sell; people earn, spend, and buy.
//! Agents never touch a bank directly: each holds an account handle and
//! all settlement flows through it.

pub mod corporation;
pub mod person;

pub use corporation::{Corporation, Good};
pub use person::Person;

use serde::{Deserialize, Serialize};

/// Stable index of a person within the simulation's population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonId(usize);

impl PersonId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}
