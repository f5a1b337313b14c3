//! Property-based tests for netting invariants
//!
//! These tests use proptest to verify:
//! - Conservation: Σ(balances) == 0
//! - Balance preservation: settlements carry exactly the net positions
//! - Determinism: same input → same settlements
//! - Bound: at most n - 1 settlements for n parties

use netting::{BalanceAggregator, BalanceMap, SettlementPlanner, Transaction};
use proptest::prelude::*;

/// Strategy for party names from a small pool, so parties repeat
fn party_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Mark".to_string()),
        Just("Jessica".to_string()),
        Just("Manny".to_string()),
        Just("Ann".to_string()),
        Just("Bob".to_string()),
        "[A-Z][a-z]{2,6}",
    ]
}

/// Strategy for valid transactions
fn transaction_strategy() -> impl Strategy<Value = Transaction> {
    (party_strategy(), party_strategy(), 1i64..1_000_000i64)
        .prop_map(|(payer, payee, amount)| Transaction::new(payer, payee, amount))
}

fn transactions_strategy() -> impl Strategy<Value = Vec<Transaction>> {
    prop::collection::vec(transaction_strategy(), 0..40)
}

fn aggregate(transactions: &[Transaction]) -> BalanceMap {
    BalanceAggregator::default().aggregate(transactions).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: Money is conserved by aggregation
    #[test]
    fn prop_balances_sum_to_zero(transactions in transactions_strategy()) {
        prop_assert_eq!(aggregate(&transactions).total(), 0);
    }

    /// Property: Settlements carry exactly the original net positions
    #[test]
    fn prop_settlement_preserves_balances(transactions in transactions_strategy()) {
        let balances = aggregate(&transactions);
        let settlements = SettlementPlanner::new().plan(&balances);

        // Paying a settlement credits the payer, so the replay mirrors the input
        let replayed = aggregate(&settlements);
        let mirrored: BalanceMap = balances
            .without_settled()
            .iter()
            .map(|(party, balance)| (party.clone(), -balance))
            .collect();
        prop_assert_eq!(replayed.without_settled(), mirrored);

        let mut combined = transactions.clone();
        combined.extend(settlements);
        prop_assert!(aggregate(&combined).without_settled().is_empty());
    }

    /// Property: Conserving balances are always fully settled
    #[test]
    fn prop_no_residual_for_conserving_balances(transactions in transactions_strategy()) {
        let plan = SettlementPlanner::new().plan_detailed(&aggregate(&transactions));
        prop_assert!(plan.residual.is_empty());
    }

    /// Property: Same input produces identical settlements
    #[test]
    fn prop_deterministic(transactions in transactions_strategy()) {
        let planner = SettlementPlanner::new();

        let first = planner.plan(&aggregate(&transactions));
        let second = planner.plan(&aggregate(&transactions));

        prop_assert_eq!(first, second);
    }

    /// Property: At most one settlement per party, never more than n - 1
    #[test]
    fn prop_settlement_count_bounded(transactions in transactions_strategy()) {
        let balances = aggregate(&transactions);
        let settlements = SettlementPlanner::new().plan(&balances);

        prop_assert!(settlements.len() <= balances.len().saturating_sub(1));
    }

    /// Property: Settlements are positive and never self-directed
    #[test]
    fn prop_settlements_well_formed(transactions in transactions_strategy()) {
        let settlements = SettlementPlanner::new().plan(&aggregate(&transactions));

        for tx in &settlements {
            prop_assert!(tx.amount > 0);
            prop_assert!(!tx.is_self_transaction());
        }
    }

    /// Property: Planning leaves the caller's map untouched
    #[test]
    fn prop_planner_does_not_mutate_input(transactions in transactions_strategy()) {
        let balances = aggregate(&transactions);
        let snapshot: Vec<(String, i64)> =
            balances.iter().map(|(p, b)| (p.to_string(), b)).collect();

        let _ = SettlementPlanner::new().plan(&balances);

        let after: Vec<(String, i64)> =
            balances.iter().map(|(p, b)| (p.to_string(), b)).collect();
        prop_assert_eq!(snapshot, after);
    }

    /// Property: Parties appear in order of first mention
    #[test]
    fn prop_first_mention_order(transactions in transactions_strategy()) {
        let mut expected: Vec<String> = Vec::new();
        for tx in &transactions {
            for party in [tx.payer.as_str(), tx.payee.as_str()] {
                if !expected.iter().any(|p| p == party) {
                    expected.push(party.to_string());
                }
            }
        }

        let parties: Vec<String> =
            aggregate(&transactions).parties().map(|p| p.to_string()).collect();

        prop_assert_eq!(parties, expected);
    }
}

#[test]
fn empty_input_produces_nothing() {
    let balances = aggregate(&[]);
    assert!(balances.is_empty());
    assert!(SettlementPlanner::new().plan(&balances).is_empty());
}
