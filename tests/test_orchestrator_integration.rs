//! Orchestrator integration tests
//!
//! Whole-economy runs: determinism under a fixed seed, the settlement
//! conservation invariant at every tick, and the coupling between the
//! finance review and the banking system.

use econ_simulator_core_rs::{Event, Simulation, SimulationConfig};

fn config(seed: u64, ticks: usize) -> SimulationConfig {
    SimulationConfig {
        ticks,
        num_banks: 2,
        num_corporations: 3,
        num_people: 12,
        rng_seed: seed,
        ..SimulationConfig::default()
    }
}

#[test]
fn test_same_seed_reproduces_the_run() {
    let mut first = Simulation::new(config(2024, 15)).unwrap();
    let mut second = Simulation::new(config(2024, 15)).unwrap();

    first.run().unwrap();
    second.run().unwrap();

    // Entry ids are fresh UUIDs, but every economic quantity must agree.
    assert_eq!(first.stats(), second.stats());
    assert_eq!(first.events().len(), second.events().len());
}

#[test]
fn test_different_seeds_diverge() {
    let mut first = Simulation::new(config(1, 15)).unwrap();
    let mut second = Simulation::new(config(2, 15)).unwrap();

    first.run().unwrap();
    second.run().unwrap();

    // Aggregates can coincide by symmetry; the per-corporation demand
    // series record every weighted purchase pick and cannot.
    fn demand_series(sim: &Simulation) -> Vec<econ_simulator_core_rs::TimeSeries> {
        sim.corporations()
            .iter()
            .map(|corp| corp.stats().demand.clone())
            .collect()
    }
    assert_ne!(demand_series(&first), demand_series(&second));
}

#[test]
fn test_reserves_track_balances_minus_loans_every_tick() {
    let mut simulation = Simulation::new(config(7, 20)).unwrap();

    for _ in 0..20 {
        simulation.tick().unwrap();

        let total_balances = simulation.banking().total_balances();
        let total_reserve = simulation.banking().central().total_reserve();
        let loan_principal: f64 = simulation
            .corporations()
            .iter()
            .map(|corp| corp.total_debt())
            .sum();

        // Reserves mirror settlement flow only; loan principal is credited
        // to balances out of band.
        assert!(
            (total_balances - (total_reserve + loan_principal)).abs() < 1e-6,
            "balances {} != reserve {} + loans {}",
            total_balances,
            total_reserve,
            loan_principal
        );
    }
}

#[test]
fn test_rosters_agree_with_employment_flags() {
    let mut simulation = Simulation::new(config(99, 12)).unwrap();
    simulation.run().unwrap();

    let on_rosters: usize = simulation
        .corporations()
        .iter()
        .map(|corp| corp.num_employees())
        .sum();
    let flagged: usize = simulation
        .people()
        .iter()
        .filter(|person| person.employed())
        .count();

    assert_eq!(on_rosters, flagged);
}

#[test]
fn test_issued_loans_reach_the_borrowers_loan_list() {
    let mut simulation = Simulation::new(config(123, 25)).unwrap();
    simulation.run().unwrap();

    let issued_events = simulation
        .events()
        .events()
        .iter()
        .filter(|event| matches!(event, Event::LoanIssued { .. }))
        .count();
    let held_loans: usize = simulation
        .corporations()
        .iter()
        .map(|corp| corp.loans().len())
        .sum();

    assert_eq!(issued_events, held_loans);
}

#[test]
fn test_stats_recorded_for_every_tick() {
    let mut simulation = Simulation::new(config(5, 10)).unwrap();
    simulation.run().unwrap();

    for tick in 1..=10 {
        assert!(simulation.stats().goods_produced.get(tick).is_some());
        assert!(simulation.stats().avg_price.get(tick).is_some());
        assert!(simulation.stats().corporate_funds.get(tick).is_some());
    }
    // Tick 0 is construction time, not a simulated tick.
    assert!(simulation.stats().goods_produced.get(0).is_none());
}

#[test]
fn test_finance_review_only_runs_with_enough_history() {
    let mut simulation = Simulation::new(config(11, 5)).unwrap();

    for _ in 0..4 {
        simulation.tick().unwrap();
    }
    let reviews_before: usize = simulation
        .events()
        .events()
        .iter()
        .filter(|event| matches!(event, Event::FinanceReviewed { .. }))
        .count();
    assert_eq!(reviews_before, 0, "no review may run before tick 5");

    simulation.tick().unwrap();
    let reviews_after: usize = simulation
        .events()
        .events()
        .iter()
        .filter(|event| matches!(event, Event::FinanceReviewed { .. }))
        .count();
    assert_eq!(reviews_after, simulation.corporations().len());
}
