//! Netting Engine
//!
//! Reduces a list of bilateral IOUs to a smaller set of settlement payments
//! that leaves every party's net position unchanged.
//!
//! # Pipeline
//!
//! 1. **Aggregation**: Reduce transactions to one net balance per party
//! 2. **Planning**: Greedily match net debtors with net creditors
//! 3. **Reporting**: Summarize gross vs. net amounts
//!
//! Netting is a deterministic heuristic: the same input always produces the
//! same settlements, but not necessarily the fewest possible.
//!
//! # Example
//!
//! ```
//! use netting::{NettingEngine, Transaction};
//!
//! let transactions = vec![
//!     Transaction::new("Mark", "Jessica", 12),
//!     Transaction::new("Manny", "Jessica", 18),
//!     Transaction::new("Mark", "Manny", 200),
//!     Transaction::new("Jessica", "Mark", 230),
//! ];
//!
//! let report = NettingEngine::default().run(&transactions)?;
//! assert_eq!(
//!     report.settlements,
//!     vec![
//!         Transaction::new("Mark", "Jessica", 18),
//!         Transaction::new("Manny", "Jessica", 182),
//!     ]
//! );
//! # Ok::<(), netting::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod balance;
pub mod planner;
pub mod records;
pub mod error;
pub mod config;
pub mod engine;

// Re-exports
pub use error::{Error, Result};
pub use types::*;
pub use balance::{BalanceAggregator, BalanceMap};
pub use planner::{SettlementPlan, SettlementPlanner};
pub use config::Config;
pub use engine::NettingEngine;
