//! CSV file holding the append-only transaction ledger.
//!
//! ```csv
//! id,group_id,from_user_id,to_user_id,amount,round,type,status,created_at
//! txn-002,group-001,user-001,system,5000,1,contribution,completed,2024-11-01T00:00:00+00:00
//! ```
//!
//! Dates are parsed here; no date strings leave this module.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use csv::{Reader, StringRecord, Writer};
use log::debug;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::domain::models::transaction::{LedgerParty, Transaction};

const HEADER: [&str; 9] = [
    "id",
    "group_id",
    "from_user_id",
    "to_user_id",
    "amount",
    "round",
    "type",
    "status",
    "created_at",
];

pub fn load(path: &Path) -> Result<Vec<Transaction>> {
    if !path.exists() {
        debug!("No ledger file at {:?}, starting empty", path);
        return Ok(Vec::new());
    }

    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let mut csv_reader = Reader::from_reader(BufReader::new(file));

    let mut transactions = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        let record = result?;
        // +2: one for the header, one for 1-based line numbers
        let transaction = parse_record(&record)
            .with_context(|| format!("Bad ledger row at {:?} line {}", path, index + 2))?;
        transactions.push(transaction);
    }
    debug!("Loaded {} transaction(s) from {:?}", transactions.len(), path);
    Ok(transactions)
}

fn field<'r>(record: &'r StringRecord, index: usize) -> Result<&'r str> {
    record
        .get(index)
        .ok_or_else(|| anyhow!("missing column '{}'", HEADER[index]))
}

fn parse_record(record: &StringRecord) -> Result<Transaction> {
    let raw_amount = field(record, 4)?;
    let raw_round = field(record, 5)?;
    let raw_created_at = field(record, 8)?;

    Ok(Transaction {
        id: field(record, 0)?.to_string(),
        group_id: field(record, 1)?.to_string(),
        from: LedgerParty::from(field(record, 2)?.to_string()),
        to: LedgerParty::from(field(record, 3)?.to_string()),
        amount: raw_amount
            .parse()
            .with_context(|| format!("invalid amount '{}'", raw_amount))?,
        round: raw_round
            .parse()
            .with_context(|| format!("invalid round '{}'", raw_round))?,
        transaction_type: field(record, 6)?.parse().map_err(|e: String| anyhow!(e))?,
        status: field(record, 7)?.parse().map_err(|e: String| anyhow!(e))?,
        created_at: DateTime::parse_from_rfc3339(raw_created_at)
            .with_context(|| format!("invalid created_at '{}'", raw_created_at))?
            .with_timezone(&Utc),
    })
}

/// Write the full ledger next to `path` and return the temp file's location.
pub fn write_temp(path: &Path, transactions: &[Transaction]) -> Result<PathBuf> {
    let temp_path = path.with_extension("tmp");
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .with_context(|| format!("Failed to create {:?}", temp_path))?;

    let mut csv_writer = Writer::from_writer(BufWriter::new(file));
    csv_writer.write_record(HEADER)?;
    for transaction in transactions {
        let from = transaction.from.to_string();
        let to = transaction.to.to_string();
        let amount = transaction.amount.to_string();
        let round = transaction.round.to_string();
        let created_at = transaction.created_at.to_rfc3339();
        let row: [&str; 9] = [
            &transaction.id,
            &transaction.group_id,
            &from,
            &to,
            &amount,
            &round,
            transaction.transaction_type.as_str(),
            transaction.status.as_str(),
            &created_at,
        ];
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(temp_path)
}
