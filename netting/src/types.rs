//! Core types for the netting engine

use crate::balance::BalanceMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use uuid::Uuid;

/// Party identifier, treated as an opaque name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyId(String);

impl PartyId {
    /// Create new party ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PartyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PartyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PartyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for PartyId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One money movement from `payer` to `payee`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    /// Party who pays
    pub payer: PartyId,

    /// Party who receives
    pub payee: PartyId,

    /// Amount in integer currency units
    pub amount: i64,
}

impl Transaction {
    /// Create new transaction
    pub fn new(payer: impl Into<PartyId>, payee: impl Into<PartyId>, amount: i64) -> Self {
        Self {
            payer: payer.into(),
            payee: payee.into(),
            amount,
        }
    }

    /// Payer and payee are the same party
    pub fn is_self_transaction(&self) -> bool {
        self.payer == self.payee
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {} - {}", self.payer, self.payee, self.amount)
    }
}

/// Netting statistics for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NettingStats {
    /// Number of parties seen in the input
    pub party_count: usize,

    /// Number of input transactions
    pub gross_transaction_count: usize,

    /// Number of settlement transactions
    pub net_transaction_count: usize,

    /// Sum of input amounts
    pub total_gross: i128,

    /// Sum of settlement amounts
    pub total_net: i128,

    /// Amount no longer moved after netting
    pub amount_saved: i128,

    /// Number of transactions eliminated
    pub transactions_eliminated: usize,

    /// Netting efficiency (0.0 - 1.0)
    /// Higher = more netting
    pub efficiency: f64,
}

impl NettingStats {
    /// Compute statistics from the gross input and the net output
    pub fn compute(party_count: usize, gross: &[Transaction], net: &[Transaction]) -> Self {
        let total_gross: i128 = gross.iter().map(|t| i128::from(t.amount)).sum();
        let total_net: i128 = net.iter().map(|t| i128::from(t.amount)).sum();

        let efficiency = if total_gross > 0 {
            (total_gross - total_net) as f64 / total_gross as f64
        } else {
            0.0
        };

        Self {
            party_count,
            gross_transaction_count: gross.len(),
            net_transaction_count: net.len(),
            total_gross,
            total_net,
            amount_saved: total_gross - total_net,
            transactions_eliminated: gross.len().saturating_sub(net.len()),
            efficiency,
        }
    }
}

/// Result of one netting run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReport {
    /// Run ID
    pub batch_id: Uuid,

    /// Net balance per party, in first-mention order
    pub balances: BalanceMap,

    /// Settlement transactions to execute
    pub settlements: Vec<Transaction>,

    /// Balances the planner could not match
    pub residual: BalanceMap,

    /// Statistics
    pub stats: NettingStats,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl SettlementReport {
    /// Every party was settled
    pub fn is_fully_settled(&self) -> bool {
        self.residual.is_empty()
    }
}
