use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::application::{AppResult, TransactionManager, parse_transaction};
use crate::domain::NewTransaction;

/// One row of the transaction CSV format, before validation.
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    amount: String,
    category: String,
    #[serde(rename = "type")]
    kind: String,
}

/// A row that could not be read or failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportError {
    pub line: u64,
    pub error: String,
}

/// Valid rows and per-line errors from a CSV file.
#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    pub transactions: Vec<NewTransaction>,
    pub errors: Vec<ImportError>,
}

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// Read transactions in the export format. Bad rows are collected, not fatal.
pub fn read_transactions_csv<R: Read>(reader: R) -> Result<ParsedCsv, csv::Error> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut parsed = ParsedCsv::default();
    let mut record = csv::StringRecord::new();

    loop {
        match csv_reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e),
            Err(e) => {
                parsed.errors.push(ImportError {
                    line: e.position().map(|p| p.line()).unwrap_or(0),
                    error: format!("CSV parse error: {}", e),
                });
                continue;
            }
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: CsvRow = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                parsed.errors.push(ImportError {
                    line,
                    error: format!("CSV parse error: {}", e),
                });
                continue;
            }
        };

        match parse_transaction(&row.date, &row.amount, &row.category, &row.kind) {
            Ok(transaction) => parsed.transactions.push(transaction),
            Err(e) => parsed.errors.push(ImportError {
                line,
                error: e.to_string(),
            }),
        }
    }

    Ok(parsed)
}

/// Loads CSV files through the transaction manager, so every row is validated.
pub struct Importer<'a> {
    transactions: &'a TransactionManager,
}

impl<'a> Importer<'a> {
    pub fn new(transactions: &'a TransactionManager) -> Self {
        Self { transactions }
    }

    /// Import a CSV file. With `dry_run` nothing is written.
    pub async fn import_file(&self, path: &Path, dry_run: bool) -> AppResult<ImportResult> {
        let file = File::open(path)?;
        self.import(file, dry_run).await
    }

    pub async fn import<R: Read>(&self, reader: R, dry_run: bool) -> AppResult<ImportResult> {
        let parsed = read_transactions_csv(reader)?;
        for error in &parsed.errors {
            warn!(line = error.line, error = %error.error, "skipping CSV row");
        }

        let mut imported = 0;
        if dry_run {
            imported = parsed.transactions.len();
        } else {
            for transaction in parsed.transactions {
                self.transactions.add(transaction).await?;
                imported += 1;
            }
        }

        info!(imported, skipped = parsed.errors.len(), dry_run, "import finished");
        Ok(ImportResult {
            imported,
            errors: parsed.errors,
        })
    }
}
