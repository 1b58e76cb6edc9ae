//! Person agent
//!
//! A person earns a salary (or a government benefit), keeps it at a bank,
//! and each tick spends a fixed share of the latest pay on goods. The
//! spending budget is anchored to the actual salary deposit, looked up by
//! entry id through the bank, rather than to any remembered amount.

use crate::agents::corporation::{Corporation, Good};
use crate::banking::{AccountHandle, BankError, Banking};
use crate::events::{Event, EventLog};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

/// A consuming, possibly employed household
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    name: String,
    account: AccountHandle,
    /// Marginal propensity to consume: share of the latest pay spent per tick
    mpc: f64,
    employed: bool,
    /// Entry id of the most recent salary or benefit deposit
    latest_salary_id: Option<String>,
    goods_owned: Vec<Good>,
    latest_spending: f64,
    tick: usize,
}

impl Person {
    pub fn new(name: String, account: AccountHandle, mpc: f64) -> Self {
        Self {
            name,
            account,
            mpc,
            employed: false,
            latest_salary_id: None,
            goods_owned: Vec::new(),
            latest_spending: 0.0,
            tick: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn account(&self) -> AccountHandle {
        self.account
    }

    pub fn mpc(&self) -> f64 {
        self.mpc
    }

    pub fn employed(&self) -> bool {
        self.employed
    }

    pub fn set_employed(&mut self, employed: bool) {
        self.employed = employed;
    }

    pub fn latest_salary_id(&self) -> Option<&str> {
        self.latest_salary_id.as_deref()
    }

    pub fn set_latest_salary_id(&mut self, entry_id: String) {
        self.latest_salary_id = Some(entry_id);
    }

    pub fn goods_owned(&self) -> usize {
        self.goods_owned.len()
    }

    pub fn latest_spending(&self) -> f64 {
        self.latest_spending
    }

    pub fn begin_tick(&mut self, tick: usize) {
        self.tick = tick;
        self.latest_spending = 0.0;
    }

    /// Spending budget for this tick: `mpc` times the latest pay deposit.
    ///
    /// A person who was never paid has no budget.
    pub fn budget(&self, banking: &Banking) -> Result<f64, BankError> {
        let Some(entry_id) = self.latest_salary_id.as_deref() else {
            return Ok(0.0);
        };
        let entry = banking.find_entry(entry_id, self.account)?;
        Ok(entry.amount() * self.mpc)
    }

    /// Spend this tick's budget on goods.
    ///
    /// First builds a purchase queue (repeatedly picking a corporation
    /// weighted by inverse price while the remaining budget covers its
    /// price, registering one unit of demand per pick), then buys from the
    /// queue. A pick whose corporation is out of stock still counts as
    /// registered demand, which is exactly the signal production needs
    /// next tick. Returns the amount actually spent.
    pub fn spend(
        &mut self,
        banking: &mut Banking,
        corporations: &mut [Corporation],
        rng: &mut RngManager,
        events: &mut EventLog,
    ) -> Result<f64, BankError> {
        let balance = banking.balance(self.account)?;
        if balance <= 0.0 {
            return Ok(0.0);
        }
        let budget = self.budget(banking)?.min(balance);

        let queue = build_purchase_queue(corporations, budget, rng);

        let mut spent = 0.0;
        for corp_index in queue {
            let corporation = &mut corporations[corp_index];
            let price = corporation.price();
            match corporation.sell_good(banking, self.account) {
                Ok(Some(good)) => {
                    self.goods_owned.push(good);
                    spent += price;
                    events.log(Event::GoodSold {
                        tick: self.tick,
                        corporation: corporation.name().to_string(),
                        buyer: self.name.clone(),
                        price,
                    });
                }
                Ok(None) => {} // out of stock; demand stays registered
                Err(BankError::InsufficientFunds { .. }) => break,
                Err(err) => return Err(err),
            }
        }

        self.latest_spending = spent;
        Ok(spent)
    }
}

/// Pick corporations to buy from until the budget runs out.
///
/// Cheaper corporations are proportionally more likely to be picked
/// (weight `1 / price`); every pick registers one unit of demand.
fn build_purchase_queue(
    corporations: &mut [Corporation],
    mut budget: f64,
    rng: &mut RngManager,
) -> Vec<usize> {
    let mut queue = Vec::new();

    loop {
        let weights: Vec<f64> = corporations
            .iter()
            .map(|corp| {
                let price = corp.price();
                if price > 0.0 && price <= budget {
                    1.0 / price
                } else {
                    0.0
                }
            })
            .collect();

        if !weights.iter().any(|w| *w > 0.0) {
            break;
        }

        let pick = rng.weighted_index(&weights);
        budget -= corporations[pick].price();
        corporations[pick].register_demand(1.0);
        queue.push(pick);
    }

    queue
}
