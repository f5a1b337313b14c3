//! Settlement planning
//!
//! Greedy single-pass matching of net debtors with net creditors.
//!
//! # Algorithm
//!
//! 1. Enumerate parties in the balance map's insertion order
//! 2. For each party A, find the first later party B with an opposite sign
//! 3. Emit one settlement for `abs(A)` between A and B (the more negative
//!    side pays)
//! 4. Fold A's balance into B and move on; A is never revisited
//!
//! # Example
//!
//! ```text
//! Net positions:
//!   Mark:    -18
//!   Jessica: +200
//!   Manny:   -182
//!
//! Settlements:
//!   Mark pays Jessica 18     (Jessica: +200 → +182)
//!   Manny pays Jessica 182   (Jessica: +182 → 0)
//! ```
//!
//! This is a heuristic: the result is not guaranteed to contain the fewest
//! possible transfers. It produces at most one settlement per party and at
//! most `n - 1` settlements for `n` parties.

use crate::{balance::BalanceMap, types::*};

/// Planner output with the balances left unmatched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettlementPlan {
    /// Settlement transactions in emission order
    pub settlements: Vec<Transaction>,

    /// Parties with a non-zero balance after the scan
    pub residual: BalanceMap,
}

/// Settlement planner
#[derive(Debug, Clone, Default)]
pub struct SettlementPlanner;

impl SettlementPlanner {
    /// Create new planner
    pub fn new() -> Self {
        Self
    }

    /// Compute settlement transactions for `balances`
    pub fn plan(&self, balances: &BalanceMap) -> Vec<Transaction> {
        self.plan_detailed(balances).settlements
    }

    /// Compute settlement transactions and report unmatched balances
    ///
    /// Works on a private copy; `balances` is left untouched.
    pub fn plan_detailed(&self, balances: &BalanceMap) -> SettlementPlan {
        let mut working: Vec<(PartyId, i64)> = balances
            .iter()
            .map(|(party, balance)| (party.clone(), balance))
            .collect();
        let mut settlements = Vec::new();

        for i in 0..working.len() {
            let balance_a = working[i].1;
            if balance_a == 0 {
                continue;
            }
            // i64::MIN has no absolute value; it stays residual
            let Some(amount) = balance_a.checked_abs() else {
                continue;
            };

            for j in (i + 1)..working.len() {
                let balance_b = working[j].1;
                if !opposite_signs(balance_a, balance_b) {
                    continue;
                }

                let (payer, payee) = if balance_a < balance_b { (i, j) } else { (j, i) };
                let settlement = Transaction {
                    payer: working[payer].0.clone(),
                    payee: working[payee].0.clone(),
                    amount,
                };

                tracing::debug!(
                    payer = %settlement.payer,
                    payee = %settlement.payee,
                    amount = settlement.amount,
                    "Matched settlement"
                );

                // Opposite signs, cannot overflow
                working[j].1 = balance_b + balance_a;
                working[i].1 = 0;
                settlements.push(settlement);
                break;
            }
        }

        let residual: BalanceMap = working
            .into_iter()
            .filter(|(_, balance)| *balance != 0)
            .collect();

        for (party, balance) in residual.iter() {
            tracing::warn!(party = %party, balance, "Unmatched balance after settlement");
        }

        SettlementPlan {
            settlements,
            residual,
        }
    }
}

fn opposite_signs(a: i64, b: i64) -> bool {
    a.signum() * b.signum() < 0
}
