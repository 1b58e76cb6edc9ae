//! Corporation agent
//!
//! A corporation produces goods against registered demand, pays salaries,
//! reviews price and salary levels against its own recorded series, and,
//! once enough history exists, runs the finance review that may borrow,
//! cut costs, or tune prices. Every scalar like "current price" is derived
//! from the last key of its series; no latest-value field exists to drift
//! out of sync with the history.

use crate::agents::person::Person;
use crate::agents::PersonId;
use crate::banking::{AccountHandle, BankError, Banking, Loan};
use crate::events::{Event, EventLog};
use crate::finance::{CorpStats, FinanceAction, FinancialHealth, DEFAULT_TARGET_RUNWAY};
use serde::{Deserialize, Serialize};

/// Relative step applied by the finance review's price actions.
pub const PRICE_STEP: f64 = 0.05;

/// Relative trim applied by the finance review's salary action.
pub const SALARY_TRIM: f64 = 0.05;

/// Sales values the salary review averages over.
pub const SALARY_REVIEW_WINDOW: usize = 6;

/// A unit of product, stamped with the price level it was produced at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Good {
    price: f64,
}

impl Good {
    pub fn price(&self) -> f64 {
        self.price
    }
}

/// A producing, hiring, selling corporation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corporation {
    name: String,
    account: AccountHandle,
    employees: Vec<PersonId>,
    stats: CorpStats,
    goods: Vec<Good>,
    loans: Vec<Loan>,
    /// Demand registered since the last production run
    outstanding_demand: f64,
    hiring: bool,
    /// Units each employee can produce per tick
    ppe: u32,
    tick: usize,
}

impl Corporation {
    pub fn new(
        name: String,
        account: AccountHandle,
        price: f64,
        salary: f64,
        initial_demand: f64,
        ppe: u32,
    ) -> Self {
        let mut stats = CorpStats::new();
        stats.price.record(0, price);
        stats.salary.record(0, salary);
        stats.demand.record(0, initial_demand);

        Self {
            name,
            account,
            employees: Vec::new(),
            stats,
            goods: Vec::new(),
            loans: Vec::new(),
            outstanding_demand: initial_demand,
            hiring: true,
            ppe,
            tick: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn account(&self) -> AccountHandle {
        self.account
    }

    pub fn stats(&self) -> &CorpStats {
        &self.stats
    }

    pub fn num_employees(&self) -> usize {
        self.employees.len()
    }

    pub fn goods_in_stock(&self) -> usize {
        self.goods.len()
    }

    pub fn hiring(&self) -> bool {
        self.hiring
    }

    /// Current price level (last recorded value of the price series).
    pub fn price(&self) -> f64 {
        self.stats.latest_price()
    }

    /// Current salary level (last recorded value of the salary series).
    pub fn salary(&self) -> f64 {
        self.stats.latest_salary()
    }

    /// Loans taken out, in issuance order.
    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    /// Total outstanding loan principal.
    pub fn total_debt(&self) -> f64 {
        self.loans.iter().map(|loan| loan.principal()).sum()
    }

    /// Enter a new tick: seed every stat series with its default.
    pub fn begin_tick(&mut self, tick: usize) {
        self.tick = tick;
        self.stats.begin_tick(tick);
    }

    /// Produce goods against outstanding demand, bounded by capacity.
    ///
    /// Returns the number of units produced. Outstanding demand resets;
    /// unmet demand shows up again through future purchase attempts.
    pub fn produce_goods(&mut self) -> usize {
        let wanted = (self.outstanding_demand.ceil().max(0.0) as usize)
            .saturating_sub(self.goods.len());
        let capacity = self.ppe as usize * self.employees.len();
        let produced = wanted.min(capacity);

        let price = self.price();
        for _ in 0..produced {
            self.goods.push(Good { price });
        }

        self.stats.production.record(self.tick, produced as f64);
        self.outstanding_demand = 0.0;
        produced
    }

    /// Note purchase intent for this tick.
    pub fn register_demand(&mut self, units: f64) {
        self.outstanding_demand += units;
        self.stats.demand.add(self.tick, units);
    }

    /// Sell one good to `buyer` at the current price.
    ///
    /// `Ok(None)` when out of stock (demand was still registered by the
    /// caller). The buyer pays through the banking system; an overdraft
    /// fails the sale and leaves inventory untouched.
    pub fn sell_good(
        &mut self,
        banking: &mut Banking,
        buyer: AccountHandle,
    ) -> Result<Option<Good>, BankError> {
        if self.goods.is_empty() {
            return Ok(None);
        }

        let price = self.price();
        banking.transfer(price, buyer, self.account)?;

        let good = self.goods.remove(0);
        self.stats.sales.add(self.tick, 1.0);
        self.stats.revenue.add(self.tick, price);
        Ok(Some(good))
    }

    /// Pay this tick's salary to every employee.
    ///
    /// Salaries transfer one by one; the first overdraft stops the run and
    /// leaves the remaining employees unpaid this tick. What was actually
    /// paid is recorded as costs.
    pub fn pay_salaries(
        &mut self,
        banking: &mut Banking,
        people: &mut [Person],
        events: &mut EventLog,
    ) -> Result<(), BankError> {
        let salary = self.salary();
        let mut total = 0.0;
        let mut paid = 0usize;

        if salary > 0.0 {
            for person_id in &self.employees {
                let person = &mut people[person_id.index()];
                match banking.transfer(salary, self.account, person.account()) {
                    Ok((_, deposit_id)) => {
                        person.set_latest_salary_id(deposit_id);
                        total += salary;
                        paid += 1;
                    }
                    Err(BankError::InsufficientFunds { .. }) => break,
                    Err(err) => return Err(err),
                }
            }
        }

        self.stats.costs.add(self.tick, total);
        events.log(Event::SalariesPaid {
            tick: self.tick,
            corporation: self.name.clone(),
            total,
            employees_paid: paid,
        });
        Ok(())
    }

    /// Re-price against the previous tick's demand/sales gap.
    ///
    /// Price moves by `(demand - sales) / sales` of the last completed
    /// tick; a tick without sales or without demand gives no signal and
    /// leaves the price alone.
    pub fn review_price(&mut self, events: &mut EventLog) {
        let prev = self.tick.saturating_sub(1);
        let sales = self.stats.sales.get(prev).unwrap_or(0.0);
        let demand = self.stats.demand.get(prev).unwrap_or(0.0);
        if sales == 0.0 || demand == 0.0 {
            return;
        }

        let old_price = self.price();
        let change = (demand - sales) / sales;
        let new_price = old_price + change * old_price;
        self.stats.price.record(self.tick, new_price);

        events.log(Event::PriceAdjusted {
            tick: self.tick,
            corporation: self.name.clone(),
            old_price,
            new_price,
        });
    }

    /// Drift salary by the average change across recent sales.
    ///
    /// Uses up to [`SALARY_REVIEW_WINDOW`] completed ticks of sales and
    /// needs at least two data points to compute a change.
    pub fn review_salary(&mut self, events: &mut EventLog) {
        let window = self
            .stats
            .sales
            .recent_before(self.tick, SALARY_REVIEW_WINDOW);
        if window.len() < 2 {
            return;
        }

        let average_change = window
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .sum::<f64>()
            / (window.len() - 1) as f64;

        let old_salary = self.salary();
        let new_salary = (old_salary + average_change).max(0.0);
        self.stats.salary.record(self.tick, new_salary);

        if new_salary != old_salary {
            events.log(Event::SalaryAdjusted {
                tick: self.tick,
                corporation: self.name.clone(),
                old_salary,
                new_salary,
            });
        }
    }

    /// Re-evaluate whether capacity still trails demand.
    pub fn review_hiring(&mut self) {
        let capacity = (self.ppe as usize * self.employees.len()) as f64;
        let demand = self
            .stats
            .demand
            .get(self.tick.saturating_sub(1))
            .unwrap_or(self.outstanding_demand);
        self.hiring = capacity < demand;
    }

    /// Add a person to the roster.
    pub fn add_employee(
        &mut self,
        person_id: PersonId,
        person: &mut Person,
        events: &mut EventLog,
    ) {
        person.set_employed(true);
        self.employees.push(person_id);
        self.review_hiring();

        events.log(Event::EmployeeHired {
            tick: self.tick,
            corporation: self.name.clone(),
            person: person.name().to_string(),
        });
    }

    /// Dismiss up to `count` employees from the end of the roster.
    pub fn dismiss_employees(
        &mut self,
        count: usize,
        people: &mut [Person],
        events: &mut EventLog,
    ) -> usize {
        let mut dismissed = 0;
        while dismissed < count {
            let Some(person_id) = self.employees.pop() else {
                break;
            };
            people[person_id.index()].set_employed(false);
            dismissed += 1;
        }

        if dismissed > 0 {
            events.log(Event::EmployeesDismissed {
                tick: self.tick,
                corporation: self.name.clone(),
                count: dismissed,
            });
        }
        self.review_hiring();
        dismissed
    }

    /// Run the finance review and apply the recommended action.
    ///
    /// A denied loan is not an error: the fallback is to re-run the
    /// recommendation with borrowing disallowed and apply that action
    /// instead. Returns the action actually applied.
    pub fn review_finance(
        &mut self,
        banking: &mut Banking,
        people: &mut [Person],
        events: &mut EventLog,
    ) -> Result<FinanceAction, BankError> {
        let balance = banking.balance(self.account)?;
        let action = FinancialHealth::new(&self.stats, balance, self.tick)
            .recommend(DEFAULT_TARGET_RUNWAY, true)?;

        let applied = self.apply_finance_action(action, banking, people, events)?;
        events.log(Event::FinanceReviewed {
            tick: self.tick,
            corporation: self.name.clone(),
            action: applied.clone(),
        });
        Ok(applied)
    }

    fn apply_finance_action(
        &mut self,
        action: FinanceAction,
        banking: &mut Banking,
        people: &mut [Person],
        events: &mut EventLog,
    ) -> Result<FinanceAction, BankError> {
        match action {
            FinanceAction::BorrowFunds { amount } => {
                match banking.issue_loan(amount, &self.stats, self.tick, self.account)? {
                    Some(loan) => {
                        events.log(Event::LoanIssued {
                            tick: self.tick,
                            loan_id: loan.id().to_string(),
                            owner: self.name.clone(),
                            principal: loan.principal(),
                            interest_rate: loan.interest_rate(),
                        });
                        self.loans.push(loan);
                        Ok(action)
                    }
                    None => {
                        events.log(Event::LoanDenied {
                            tick: self.tick,
                            owner: self.name.clone(),
                            requested: amount,
                        });
                        let balance = banking.balance(self.account)?;
                        let fallback = FinancialHealth::new(&self.stats, balance, self.tick)
                            .recommend(DEFAULT_TARGET_RUNWAY, false)?;
                        self.apply_finance_action(fallback, banking, people, events)
                    }
                }
            }
            FinanceAction::FireEmployees { amount } => {
                let salary = self.salary();
                if salary > 0.0 {
                    // Each dismissal saves one salary per tick over the
                    // target-runway horizon.
                    let per_head = salary * DEFAULT_TARGET_RUNWAY;
                    let count = (amount / per_head).ceil().max(1.0) as usize;
                    self.dismiss_employees(count, people, events);
                }
                Ok(action)
            }
            FinanceAction::LowerSalary => {
                let old_salary = self.salary();
                let new_salary = old_salary * (1.0 - SALARY_TRIM);
                self.stats.salary.record(self.tick, new_salary);
                events.log(Event::SalaryAdjusted {
                    tick: self.tick,
                    corporation: self.name.clone(),
                    old_salary,
                    new_salary,
                });
                Ok(action)
            }
            FinanceAction::IncreasePrice => {
                self.step_price(1.0 + PRICE_STEP, events);
                Ok(action)
            }
            FinanceAction::LowerPrice => {
                self.step_price(1.0 - PRICE_STEP, events);
                Ok(action)
            }
            FinanceAction::Monitor => Ok(action),
        }
    }

    fn step_price(&mut self, factor: f64, events: &mut EventLog) {
        let old_price = self.price();
        let new_price = old_price * factor;
        self.stats.price.record(self.tick, new_price);
        events.log(Event::PriceAdjusted {
            tick: self.tick,
            corporation: self.name.clone(),
            old_price,
            new_price,
        });
    }

    /// Close out the tick: whatever is still on the shelf is overstock.
    pub fn end_tick(&mut self) {
        self.stats
            .overstock
            .record(self.tick, self.goods.len() as f64);
    }
}
