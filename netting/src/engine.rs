//! Main netting engine
//!
//! Orchestrates aggregation, settlement planning, and run statistics.

use crate::{
    balance::BalanceAggregator,
    config::Config,
    planner::SettlementPlanner,
    records::{self, RecordBatch},
    types::*,
    Result,
};
use std::io::{Read, Write};
use uuid::Uuid;

/// Netting engine
#[derive(Debug, Clone)]
pub struct NettingEngine {
    /// Balance aggregator
    aggregator: BalanceAggregator,

    /// Settlement planner
    planner: SettlementPlanner,

    /// Configuration
    config: Config,
}

impl Default for NettingEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl NettingEngine {
    /// Create new netting engine
    pub fn new(config: Config) -> Self {
        Self {
            aggregator: BalanceAggregator::new(&config.aggregation),
            planner: SettlementPlanner::new(),
            config,
        }
    }

    /// Engine configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Net `transactions` into a settlement report
    pub fn run(&self, transactions: &[Transaction]) -> Result<SettlementReport> {
        let batch_id = Uuid::new_v4();
        let span = tracing::info_span!("netting_run", %batch_id);
        let _guard = span.enter();

        // Step 1: Aggregate net balances
        let balances = self.aggregator.aggregate(transactions)?;

        // Step 2: Plan settlements
        let plan = self.planner.plan_detailed(&balances);

        let stats = NettingStats::compute(balances.len(), transactions, &plan.settlements);

        tracing::info!(
            parties = stats.party_count,
            gross = stats.gross_transaction_count,
            net = stats.net_transaction_count,
            "Netting complete: {} gross → {} net ({:.1}% efficiency)",
            stats.total_gross,
            stats.total_net,
            stats.efficiency * 100.0
        );

        Ok(SettlementReport {
            batch_id,
            balances,
            settlements: plan.settlements,
            residual: plan.residual,
            stats,
            created_at: chrono::Utc::now(),
        })
    }

    /// Read records from `input`, net them, and write settlements to `output`
    pub fn run_records<R: Read, W: Write>(&self, input: R, output: W) -> Result<SettlementReport> {
        let RecordBatch {
            transactions,
            skipped,
        } = records::read_transactions(input, &self.config.records)?;

        if skipped > 0 {
            tracing::warn!(skipped, "Malformed records were skipped");
        }

        let report = self.run(&transactions)?;
        records::write_transactions(output, &report.settlements, &self.config.records)?;

        Ok(report)
    }
}
