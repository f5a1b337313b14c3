//! Error types for the netting engine

use thiserror::Error;

/// Result type for netting operations
pub type Result<T> = std::result::Result<T, Error>;

/// Netting errors
#[derive(Error, Debug)]
pub enum Error {
    /// Transaction amount is zero or negative
    #[error("Non-positive amount {amount} in transaction #{index} ({payer} -> {payee})")]
    NonPositiveAmount {
        /// Position of the transaction in the input sequence
        index: usize,
        /// Paying party
        payer: String,
        /// Receiving party
        payee: String,
        /// Offending amount
        amount: i64,
    },

    /// Payer and payee are the same party
    #[error("Self transaction #{index} for party {party}")]
    SelfTransaction {
        /// Position of the transaction in the input sequence
        index: usize,
        /// Party on both sides
        party: String,
    },

    /// Net balance left the representable range
    #[error("Balance overflow for party {party}")]
    BalanceOverflow {
        /// Party whose balance overflowed
        party: String,
    },

    /// Record could not be turned into a transaction
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number in the input
        line: u64,
        /// What was wrong with the record
        reason: String,
    },

    /// CSV reader/writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
