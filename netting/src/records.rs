//! Transaction records
//!
//! Three-column delimited text, one transaction per line:
//!
//! ```text
//! Mark,Jessica,12
//! Manny,Jessica,18
//! ```
//!
//! Columns are `payer,payee,amount` with the amount as a decimal integer.
//! Fields are trimmed. Settlement output uses the same layout.

use crate::{
    config::{MalformedRowPolicy, RecordConfig},
    types::*,
    Error, Result,
};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

const HEADER: [&str; 3] = ["payer", "payee", "amount"];

/// Transactions read from one input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordBatch {
    /// Parsed transactions in input order
    pub transactions: Vec<Transaction>,

    /// Number of malformed records dropped
    pub skipped: usize,
}

/// Read transactions from `reader`
pub fn read_transactions<R: Read>(reader: R, config: &RecordConfig) -> Result<RecordBatch> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(config.has_headers)
        .delimiter(config.delimiter_byte()?)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut batch = RecordBatch::default();

    for result in rdr.records() {
        let (line, parsed) = match result {
            Ok(record) => (record_line(&record), parse_record(&record)),
            Err(e) if matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                (line, Err("record is not valid UTF-8".to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        match parsed {
            Ok(tx) => batch.transactions.push(tx),
            Err(reason) => match config.malformed_rows {
                MalformedRowPolicy::Skip => {
                    tracing::warn!(line, %reason, "Skipping malformed record");
                    batch.skipped += 1;
                }
                MalformedRowPolicy::Fail => return Err(Error::MalformedRecord { line, reason }),
            },
        }
    }

    tracing::debug!(
        transactions = batch.transactions.len(),
        skipped = batch.skipped,
        "Read transaction records"
    );

    Ok(batch)
}

/// Write transactions to `writer`, one record per line
pub fn write_transactions<W: Write>(
    writer: W,
    transactions: &[Transaction],
    config: &RecordConfig,
) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(config.delimiter_byte()?)
        .from_writer(writer);

    if config.has_headers {
        wtr.write_record(HEADER)?;
    }

    for tx in transactions {
        let amount = tx.amount.to_string();
        wtr.write_record([tx.payer.as_str(), tx.payee.as_str(), amount.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Read transactions from a file
pub fn read_transactions_from_path(
    path: impl AsRef<Path>,
    config: &RecordConfig,
) -> Result<RecordBatch> {
    let file = File::open(path)?;
    read_transactions(BufReader::new(file), config)
}

/// Write transactions to a file, replacing its contents
pub fn write_transactions_to_path(
    path: impl AsRef<Path>,
    transactions: &[Transaction],
    config: &RecordConfig,
) -> Result<()> {
    let file = File::create(path)?;
    write_transactions(BufWriter::new(file), transactions, config)
}

fn record_line(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or_default()
}

fn parse_record(record: &StringRecord) -> std::result::Result<Transaction, String> {
    if record.len() != HEADER.len() {
        return Err(format!("expected 3 fields, got {}", record.len()));
    }

    let payer = &record[0];
    let payee = &record[1];
    if payer.is_empty() || payee.is_empty() {
        return Err("empty party name".to_string());
    }

    let amount: i64 = record[2]
        .parse()
        .map_err(|e| format!("invalid amount {:?}: {}", &record[2], e))?;

    Ok(Transaction::new(payer, payee, amount))
}
