//! Central bank reserve tests
//!
//! The reserve conservation property: every bank's reserve mirrors the net
//! deposit/withdraw flow through it, at every observation point, for any
//! sequence of operations.

use econ_simulator_core_rs::{AccountHandle, Banking};
use proptest::prelude::*;

#[test]
fn test_interbank_transfer_moves_reserve_between_banks() {
    let mut banking = Banking::new();
    let bank1 = banking.add_bank();
    let bank2 = banking.add_bank();
    let a = banking.register(bank1, "A").unwrap();
    let b = banking.register(bank2, "B").unwrap();

    banking.deposit(100.0, a).unwrap();
    banking.deposit(20.0, b).unwrap();
    let total_before = banking.central().total_reserve();

    banking.transfer(50.0, a, b).unwrap();

    assert_eq!(banking.reserve(bank1), 50.0);
    assert_eq!(banking.reserve(bank2), 70.0);
    assert_eq!(banking.central().total_reserve(), total_before);
}

#[test]
fn test_intrabank_transfer_leaves_reserve_unchanged() {
    let mut banking = Banking::new();
    let bank = banking.add_bank();
    let a = banking.register(bank, "A").unwrap();
    let b = banking.register(bank, "B").unwrap();

    banking.deposit(100.0, a).unwrap();
    banking.transfer(60.0, a, b).unwrap();

    assert_eq!(banking.balance(a).unwrap(), 40.0);
    assert_eq!(banking.balance(b).unwrap(), 60.0);
    assert_eq!(banking.reserve(bank), 100.0);
}

/// One randomly generated settlement operation
#[derive(Debug, Clone)]
enum Op {
    Deposit { account: usize, amount: f64 },
    Withdraw { account: usize, amount: f64 },
    Transfer { from: usize, to: usize, amount: f64 },
}

fn op_strategy(num_accounts: usize) -> impl Strategy<Value = Op> {
    let accounts = 0..num_accounts;
    let amounts = 0.0f64..500.0;
    prop_oneof![
        (accounts.clone(), amounts.clone())
            .prop_map(|(account, amount)| Op::Deposit { account, amount }),
        (accounts.clone(), amounts.clone())
            .prop_map(|(account, amount)| Op::Withdraw { account, amount }),
        (accounts.clone(), accounts, amounts)
            .prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
    ]
}

proptest! {
    /// After every single operation, each bank's reserve equals the sum of
    /// its account balances, and the system-wide totals agree.
    #[test]
    fn conservation_holds_under_random_operations(
        ops in prop::collection::vec(op_strategy(4), 1..60)
    ) {
        let mut banking = Banking::new();
        let bank1 = banking.add_bank();
        let bank2 = banking.add_bank();

        let accounts: Vec<AccountHandle> = vec![
            banking.register(bank1, "A").unwrap(),
            banking.register(bank1, "B").unwrap(),
            banking.register(bank2, "C").unwrap(),
            banking.register(bank2, "D").unwrap(),
        ];

        for op in ops {
            // Overdrafts are expected outcomes here, not test failures.
            match op {
                Op::Deposit { account, amount } => {
                    banking.deposit(amount, accounts[account]).unwrap();
                }
                Op::Withdraw { account, amount } => {
                    let _ = banking.withdraw(amount, accounts[account]);
                }
                Op::Transfer { from, to, amount } => {
                    let _ = banking.transfer(amount, accounts[from], accounts[to]);
                }
            }

            for bank_id in [bank1, bank2] {
                let bank = banking.bank(bank_id);
                prop_assert!(
                    (banking.reserve(bank_id) - bank.total_balance()).abs() < 1e-6,
                    "reserve diverged from account balances for a bank"
                );
            }
            prop_assert!(
                (banking.central().total_reserve() - banking.total_balances()).abs() < 1e-6,
                "system-wide reserve diverged from system-wide balances"
            );
        }
    }
}
