//! Simulation engine
//!
//! The tick loop sequencing all agent updates:
//!
//! ```text
//! For each tick t:
//! 1. Enter tick (seed every corporation's stat series with defaults)
//! 2. Corporations produce against registered demand
//! 3. Corporations pay salaries
//! 4. Corporations review price and salary      (t > 1)
//! 5. Corporations run the finance review        (t > 4)
//! 6. People spend their budgets
//! 7. Government pays benefits to the unemployed
//! 8. Corporations close the tick (overstock)
//! 9. Aggregate statistics are recorded
//! ```
//!
//! The ordering is a correctness requirement, not a convenience: the
//! finance review must run after prior ticks' sales, revenue, and costs
//! are final but before the current tick's are, so trend and forecast
//! windows never see a half-written tick.

use crate::agents::{Corporation, Person, PersonId};
use crate::banking::{BankError, BankId, Banking};
use crate::events::{Event, EventLog};
use crate::finance::FinanceError;
use crate::rng::RngManager;
use crate::stats::SimStats;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Share of the last pay an unemployed person receives as benefit.
pub const BENEFIT_REPLACEMENT_RATE: f64 = 0.6;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete simulation configuration
///
/// Loadable from JSON; every field has a default so partial configs work.
///
/// # Example
/// ```
/// use econ_simulator_core_rs::SimulationConfig;
///
/// let config = SimulationConfig::from_json(r#"{ "ticks": 20, "rng_seed": 7 }"#).unwrap();
/// assert_eq!(config.ticks, 20);
/// assert_eq!(config.rng_seed, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of ticks to simulate
    pub ticks: usize,

    /// Number of commercial banks
    pub num_banks: usize,

    /// Number of corporations
    pub num_corporations: usize,

    /// Number of people
    pub num_people: usize,

    /// Seed for the deterministic RNG
    pub rng_seed: u64,

    /// Initial values applied to every corporation
    pub corporation_seed: CorporationSeed,

    /// Initial values applied to every person
    pub person_seed: PersonSeed,

    /// Benefit paid to a person who has never earned a salary
    pub benefit: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 50,
            num_banks: 2,
            num_corporations: 5,
            num_people: 50,
            rng_seed: 42,
            corporation_seed: CorporationSeed::default(),
            person_seed: PersonSeed::default(),
            benefit: 10.0,
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sanity-check seed values against each other.
    ///
    /// Returns human-readable warnings; an imbalanced economy is still a
    /// runnable one, so nothing here fails.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let seed = &self.corporation_seed;

        if seed.ppe == 0 {
            warnings.push("corporations have zero productivity (ppe = 0)".to_string());
            return warnings;
        }

        let employees_per_corp = (seed.demand / seed.ppe as f64).ceil() as usize;
        let employees_needed = employees_per_corp * self.num_corporations;
        if employees_needed > self.num_people {
            warnings.push(format!(
                "not enough people to meet demand: need {}, have {}",
                employees_needed, self.num_people
            ));
        }

        let unit_cost = seed.salary / seed.ppe as f64;
        if unit_cost > seed.price {
            warnings.push(format!(
                "unit cost {:.2} exceeds price {:.2}",
                unit_cost, seed.price
            ));
        }

        let total_salary = seed.salary * employees_needed as f64;
        let possible_revenue = total_salary * self.person_seed.mpc;
        if possible_revenue < total_salary {
            warnings.push(format!(
                "household spending {:.2} cannot cover salaries {:.2}",
                possible_revenue, total_salary
            ));
        }

        warnings
    }
}

/// Seed values applied to every corporation at spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorporationSeed {
    pub price: f64,
    pub demand: f64,
    pub salary: f64,
    /// Units each employee produces per tick
    pub ppe: u32,
    pub opening_balance: f64,
}

impl Default for CorporationSeed {
    fn default() -> Self {
        Self {
            price: 10.0,
            demand: 20.0,
            salary: 25.0,
            ppe: 4,
            opening_balance: 1_000.0,
        }
    }
}

/// Seed values applied to every person at spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonSeed {
    /// Marginal propensity to consume
    pub mpc: f64,
}

impl Default for PersonSeed {
    fn default() -> Self {
        Self { mpc: 0.5 }
    }
}

/// Errors from simulation construction or a tick
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("bank error: {0}")]
    Bank(#[from] BankError),

    #[error("finance error: {0}")]
    Finance(#[from] FinanceError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Summary of one executed tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    pub tick: usize,
    pub goods_produced: f64,
    pub goods_sold: f64,
    pub goods_demanded: f64,
    pub loans_issued: usize,
    pub total_reserve: f64,
}

// ============================================================================
// Simulation
// ============================================================================

/// The running economy: banks, corporations, people, and their history
///
/// # Example
/// ```
/// use econ_simulator_core_rs::{Simulation, SimulationConfig};
///
/// let config = SimulationConfig {
///     ticks: 10,
///     ..SimulationConfig::default()
/// };
/// let mut simulation = Simulation::new(config).unwrap();
/// let results = simulation.run().unwrap();
///
/// assert_eq!(results.len(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    banking: Banking,
    corporations: Vec<Corporation>,
    people: Vec<Person>,
    current_tick: usize,
    rng: RngManager,
    stats: SimStats,
    events: EventLog,
}

impl Simulation {
    /// Build the economy: banks, seeded corporations with their opening
    /// deposits, people, and an initial labor-market round.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        if config.num_banks == 0 {
            return Err(SimulationError::InvalidConfig(
                "at least one bank is required".to_string(),
            ));
        }
        if config.num_corporations == 0 || config.num_people == 0 {
            return Err(SimulationError::InvalidConfig(
                "at least one corporation and one person are required".to_string(),
            ));
        }

        let mut rng = RngManager::new(config.rng_seed);
        let mut banking = Banking::new();
        let mut events = EventLog::new();

        let bank_ids: Vec<BankId> = (0..config.num_banks).map(|_| banking.add_bank()).collect();
        let pick_bank = |rng: &mut RngManager| {
            let index = (rng.next_u64() % bank_ids.len() as u64) as usize;
            bank_ids[index]
        };

        let seed = &config.corporation_seed;
        let mut corporations = Vec::with_capacity(config.num_corporations);
        for i in 0..config.num_corporations {
            let name = format!("Corp-{}", i + 1);
            let bank = pick_bank(&mut rng);
            let account = banking.register(bank, &name)?;
            events.log(Event::AccountRegistered {
                tick: 0,
                owner: name.clone(),
            });
            banking.deposit(seed.opening_balance, account)?;

            corporations.push(Corporation::new(
                name,
                account,
                seed.price,
                seed.salary,
                seed.demand,
                seed.ppe,
            ));
        }

        let mut people = Vec::with_capacity(config.num_people);
        for i in 0..config.num_people {
            let name = format!("Person-{}", i + 1);
            let bank = pick_bank(&mut rng);
            let account = banking.register(bank, &name)?;
            events.log(Event::AccountRegistered {
                tick: 0,
                owner: name.clone(),
            });

            people.push(Person::new(name, account, config.person_seed.mpc));
        }

        let mut simulation = Self {
            config,
            banking,
            corporations,
            people,
            current_tick: 0,
            rng,
            stats: SimStats::new(),
            events,
        };
        simulation.labor_market();
        Ok(simulation)
    }

    /// Execute one tick in the strict agent order.
    pub fn tick(&mut self) -> Result<TickResult, SimulationError> {
        self.current_tick += 1;
        let tick = self.current_tick;

        for corporation in &mut self.corporations {
            corporation.begin_tick(tick);
        }
        for person in &mut self.people {
            person.begin_tick(tick);
        }

        for corporation in &mut self.corporations {
            corporation.produce_goods();
        }

        for index in 0..self.corporations.len() {
            let corporation = &mut self.corporations[index];
            corporation.pay_salaries(&mut self.banking, &mut self.people, &mut self.events)?;
        }

        if tick > 1 {
            for corporation in &mut self.corporations {
                corporation.review_price(&mut self.events);
                corporation.review_salary(&mut self.events);
                corporation.review_hiring();
            }
        }

        if tick > 4 {
            for index in 0..self.corporations.len() {
                let corporation = &mut self.corporations[index];
                corporation.review_finance(
                    &mut self.banking,
                    &mut self.people,
                    &mut self.events,
                )?;
            }
        }

        for index in 0..self.people.len() {
            let person = &mut self.people[index];
            person.spend(
                &mut self.banking,
                &mut self.corporations,
                &mut self.rng,
                &mut self.events,
            )?;
        }

        self.government_tick()?;

        for corporation in &mut self.corporations {
            corporation.end_tick();
        }

        self.collect_stats()?;

        let loans_issued = self
            .events
            .tick_events(tick)
            .filter(|event| matches!(event, Event::LoanIssued { .. }))
            .count();

        Ok(TickResult {
            tick,
            goods_produced: self.stats.goods_produced.get(tick).unwrap_or(0.0),
            goods_sold: self.stats.goods_sold.get(tick).unwrap_or(0.0),
            goods_demanded: self.stats.goods_demanded.get(tick).unwrap_or(0.0),
            loans_issued,
            total_reserve: self.banking.central().total_reserve(),
        })
    }

    /// Run the configured number of ticks.
    pub fn run(&mut self) -> Result<Vec<TickResult>, SimulationError> {
        let mut results = Vec::with_capacity(self.config.ticks);
        for _ in 0..self.config.ticks {
            results.push(self.tick()?);
        }
        Ok(results)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn current_tick(&self) -> usize {
        self.current_tick
    }

    pub fn banking(&self) -> &Banking {
        &self.banking
    }

    pub fn corporations(&self) -> &[Corporation] {
        &self.corporations
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Match unemployed people to hiring corporations.
    ///
    /// Unemployed people are shuffled, then each picks a hiring
    /// corporation weighted by salary; stops when no corporation is
    /// hiring.
    fn labor_market(&mut self) -> usize {
        let mut unemployed: Vec<usize> = (0..self.people.len())
            .filter(|i| !self.people[*i].employed())
            .collect();
        self.rng.shuffle(&mut unemployed);

        let mut hired = 0;
        for person_index in unemployed {
            let weights: Vec<f64> = self
                .corporations
                .iter()
                .map(|corp| {
                    if corp.hiring() && corp.salary() > 0.0 {
                        corp.salary()
                    } else {
                        0.0
                    }
                })
                .collect();
            if !weights.iter().any(|w| *w > 0.0) {
                break;
            }

            let corp_index = self.rng.weighted_index(&weights);
            let corporation = &mut self.corporations[corp_index];
            let person = &mut self.people[person_index];
            corporation.add_employee(PersonId::new(person_index), person, &mut self.events);
            hired += 1;
        }
        hired
    }

    /// Deposit benefits for the unemployed.
    ///
    /// The benefit replaces [`BENEFIT_REPLACEMENT_RATE`] of the last pay,
    /// falling back to the configured flat benefit for people who have
    /// never been paid. The deposit becomes the person's new budget
    /// anchor.
    fn government_tick(&mut self) -> Result<(), SimulationError> {
        for index in 0..self.people.len() {
            if self.people[index].employed() {
                continue;
            }

            let account = self.people[index].account();
            let reference = match self.people[index].latest_salary_id() {
                Some(entry_id) => self.banking.find_entry(entry_id, account)?.amount(),
                None => self.config.benefit,
            };
            let amount = reference * BENEFIT_REPLACEMENT_RATE;

            let deposit_id = self.banking.deposit(amount, account)?;
            self.people[index].set_latest_salary_id(deposit_id);
            self.events.log(Event::BenefitPaid {
                tick: self.current_tick,
                person: self.people[index].name().to_string(),
                amount,
            });
        }
        Ok(())
    }

    /// Record this tick's economy-wide aggregates.
    fn collect_stats(&mut self) -> Result<(), SimulationError> {
        let tick = self.current_tick;

        let employed = self.people.iter().filter(|p| p.employed()).count() as f64;

        let corp_series_sum = |pick: fn(&Corporation) -> &crate::finance::TimeSeries| -> f64 {
            self.corporations
                .iter()
                .map(|corp| pick(corp).get(tick).unwrap_or(0.0))
                .sum()
        };
        let produced = corp_series_sum(|c| &c.stats().production);
        let sold = corp_series_sum(|c| &c.stats().sales);
        let demanded = corp_series_sum(|c| &c.stats().demand);
        let overstock = corp_series_sum(|c| &c.stats().overstock);
        let revenue = corp_series_sum(|c| &c.stats().revenue);
        let costs = corp_series_sum(|c| &c.stats().costs);

        let num_corps = self.corporations.len() as f64;
        let prices: Vec<f64> = self.corporations.iter().map(|c| c.price()).collect();
        let avg_price = prices.iter().sum::<f64>() / num_corps;
        let min_price = prices.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_price = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let mut corporate_funds = 0.0;
        for corporation in &self.corporations {
            corporate_funds += self.banking.balance(corporation.account())?;
        }
        let mut household_funds = 0.0;
        for person in &self.people {
            household_funds += self.banking.balance(person.account())?;
        }

        let loan_principal: f64 = self.corporations.iter().map(|c| c.total_debt()).sum();
        let avg_salary = self.corporations.iter().map(|c| c.salary()).sum::<f64>() / num_corps;

        self.stats.persons_employed.record(tick, employed);
        self.stats.goods_produced.record(tick, produced);
        self.stats.goods_sold.record(tick, sold);
        self.stats.goods_demanded.record(tick, demanded);
        self.stats.goods_overstock.record(tick, overstock);
        self.stats.avg_price.record(tick, avg_price);
        self.stats.min_price.record(tick, min_price);
        self.stats.max_price.record(tick, max_price);
        self.stats.corporate_funds.record(tick, corporate_funds);
        self.stats.household_funds.record(tick, household_funds);
        self.stats.total_revenue.record(tick, revenue);
        self.stats.avg_costs.record(tick, costs / num_corps);
        self.stats
            .avg_profit
            .record(tick, (revenue - costs) / num_corps);
        self.stats
            .outstanding_loan_principal
            .record(tick, loan_principal);
        self.stats.avg_salary.record(tick, avg_salary);

        Ok(())
    }
}
