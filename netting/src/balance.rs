//! Net balance aggregation
//!
//! Reduces a sequence of bilateral transactions to one signed net balance
//! per party.
//!
//! # Sign convention
//!
//! ```text
//! Mark pays Jessica 12   →   Mark: +12, Jessica: -12
//! ```
//!
//! Positive = net creditor (is owed money), negative = net debtor.
//! Parties keep the order in which they were first mentioned; the planner
//! enumerates them in that order.

use crate::{config::AggregationConfig, types::*, Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping from party to signed net balance
///
/// Iteration follows insertion order. `i64::MIN` is never a valid balance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceMap {
    balances: IndexMap<PartyId, i64>,
}

impl BalanceMap {
    /// Create empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of parties
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// No parties
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Balance of a party, if present
    pub fn get(&self, party: &str) -> Option<i64> {
        self.balances.get(party).copied()
    }

    /// Balance of a party, initializing it to zero on first mention
    pub fn get_or_zero(&mut self, party: &PartyId) -> &mut i64 {
        self.balances.entry(party.clone()).or_insert(0)
    }

    /// Set a balance, keeping the party's original position if present
    pub fn insert(&mut self, party: impl Into<PartyId>, balance: i64) -> Option<i64> {
        self.balances.insert(party.into(), balance)
    }

    /// Add `delta` to a party's balance with overflow checking
    pub fn adjust(&mut self, party: &PartyId, delta: i64) -> Result<()> {
        let balance = self.get_or_zero(party);
        *balance = balance
            .checked_add(delta)
            .filter(|b| *b != i64::MIN)
            .ok_or_else(|| Error::BalanceOverflow {
                party: party.to_string(),
            })?;
        Ok(())
    }

    /// Iterate over `(party, balance)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&PartyId, i64)> + '_ {
        self.balances.iter().map(|(party, balance)| (party, *balance))
    }

    /// Parties in insertion order
    pub fn parties(&self) -> impl Iterator<Item = &PartyId> + '_ {
        self.balances.keys()
    }

    /// Sum of all balances
    pub fn total(&self) -> i128 {
        self.balances.values().map(|b| i128::from(*b)).sum()
    }

    /// Copy of the map without settled (zero) parties
    pub fn without_settled(&self) -> BalanceMap {
        self.iter()
            .filter(|(_, balance)| *balance != 0)
            .map(|(party, balance)| (party.clone(), balance))
            .collect()
    }
}

impl<P: Into<PartyId>> FromIterator<(P, i64)> for BalanceMap {
    fn from_iter<I: IntoIterator<Item = (P, i64)>>(iter: I) -> Self {
        Self {
            balances: iter
                .into_iter()
                .map(|(party, balance)| (party.into(), balance))
                .collect(),
        }
    }
}

/// Balance aggregator
#[derive(Debug, Clone)]
pub struct BalanceAggregator {
    /// Reject zero and negative amounts
    reject_non_positive_amounts: bool,

    /// Reject payer == payee
    reject_self_transactions: bool,
}

impl Default for BalanceAggregator {
    fn default() -> Self {
        Self::new(&AggregationConfig::default())
    }
}

impl BalanceAggregator {
    /// Create new aggregator
    pub fn new(config: &AggregationConfig) -> Self {
        Self {
            reject_non_positive_amounts: config.reject_non_positive_amounts,
            reject_self_transactions: config.reject_self_transactions,
        }
    }

    /// Compute net balance per party
    ///
    /// Each call starts from an empty map. The payer is credited with the
    /// amount and the payee debited, payer first, so a party's position in
    /// the result is its first mention in `transactions`.
    pub fn aggregate(&self, transactions: &[Transaction]) -> Result<BalanceMap> {
        let mut balances = BalanceMap::new();

        for (index, tx) in transactions.iter().enumerate() {
            self.validate(index, tx)?;

            balances.adjust(&tx.payer, tx.amount)?;
            let payee_delta = tx.amount.checked_neg().ok_or_else(|| Error::BalanceOverflow {
                party: tx.payee.to_string(),
            })?;
            balances.adjust(&tx.payee, payee_delta)?;
        }

        tracing::debug!(
            transactions = transactions.len(),
            parties = balances.len(),
            "Aggregated balances"
        );

        Ok(balances)
    }

    fn validate(&self, index: usize, tx: &Transaction) -> Result<()> {
        if self.reject_non_positive_amounts && tx.amount <= 0 {
            return Err(Error::NonPositiveAmount {
                index,
                payer: tx.payer.to_string(),
                payee: tx.payee.to_string(),
                amount: tx.amount,
            });
        }

        if self.reject_self_transactions && tx.is_self_transaction() {
            return Err(Error::SelfTransaction {
                index,
                party: tx.payer.to_string(),
            });
        }

        Ok(())
    }
}
