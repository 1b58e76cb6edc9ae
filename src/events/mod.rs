//! Event logging for simulation replay and auditing
//!
//! Every significant state change is appended to the event log in the
//! order it happened within its tick. The log is the crate's audit
//! surface: two runs with the same seed and configuration produce the
//! same sequence of events (entry identifiers aside, which are freshly
//! generated UUIDs), and a settlement dispute can be replayed entry by
//! entry.

use crate::finance::FinanceAction;

/// A significant state change, stamped with the tick it occurred in
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// An account was opened at a bank
    AccountRegistered {
        tick: usize,
        owner: String,
    },

    /// Funds credited to an account
    Deposited {
        tick: usize,
        entry_id: String,
        owner: String,
        amount: f64,
    },

    /// Funds moved between two accounts (possibly at different banks)
    TransferSettled {
        tick: usize,
        withdraw_id: String,
        deposit_id: String,
        from_owner: String,
        to_owner: String,
        amount: f64,
    },

    /// A loan was underwritten and credited
    LoanIssued {
        tick: usize,
        loan_id: String,
        owner: String,
        principal: f64,
        interest_rate: f64,
    },

    /// A loan request was declined by the bank's credit check
    LoanDenied {
        tick: usize,
        owner: String,
        requested: f64,
    },

    /// A corporation ran its salary payroll
    SalariesPaid {
        tick: usize,
        corporation: String,
        total: f64,
        employees_paid: usize,
    },

    /// A good changed hands
    GoodSold {
        tick: usize,
        corporation: String,
        buyer: String,
        price: f64,
    },

    /// A person joined a corporation's roster
    EmployeeHired {
        tick: usize,
        corporation: String,
        person: String,
    },

    /// A corporation cut headcount
    EmployeesDismissed {
        tick: usize,
        corporation: String,
        count: usize,
    },

    /// A corporation adjusted its price level
    PriceAdjusted {
        tick: usize,
        corporation: String,
        old_price: f64,
        new_price: f64,
    },

    /// A corporation adjusted its salary level
    SalaryAdjusted {
        tick: usize,
        corporation: String,
        old_salary: f64,
        new_salary: f64,
    },

    /// Outcome of a corporation's finance review
    FinanceReviewed {
        tick: usize,
        corporation: String,
        action: FinanceAction,
    },

    /// Government benefit deposited to an unemployed person
    BenefitPaid {
        tick: usize,
        person: String,
        amount: f64,
    },
}

impl Event {
    /// Tick this event occurred in.
    pub fn tick(&self) -> usize {
        match self {
            Event::AccountRegistered { tick, .. }
            | Event::Deposited { tick, .. }
            | Event::TransferSettled { tick, .. }
            | Event::LoanIssued { tick, .. }
            | Event::LoanDenied { tick, .. }
            | Event::SalariesPaid { tick, .. }
            | Event::GoodSold { tick, .. }
            | Event::EmployeeHired { tick, .. }
            | Event::EmployeesDismissed { tick, .. }
            | Event::PriceAdjusted { tick, .. }
            | Event::SalaryAdjusted { tick, .. }
            | Event::FinanceReviewed { tick, .. }
            | Event::BenefitPaid { tick, .. } => *tick,
        }
    }
}

/// Append-only log of simulation events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// All events in insertion order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events that occurred in one tick, in insertion order.
    pub fn tick_events(&self, tick: usize) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.tick() == tick)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_filter() {
        let mut log = EventLog::new();
        log.log(Event::AccountRegistered {
            tick: 1,
            owner: "Corp-1".to_string(),
        });
        log.log(Event::Deposited {
            tick: 2,
            entry_id: "e1".to_string(),
            owner: "Corp-1".to_string(),
            amount: 10.0,
        });
        log.log(Event::BenefitPaid {
            tick: 2,
            person: "Person-1".to_string(),
            amount: 6.0,
        });

        assert_eq!(log.len(), 3);
        assert_eq!(log.tick_events(2).count(), 2);
        assert_eq!(log.tick_events(3).count(), 0);
    }
}
