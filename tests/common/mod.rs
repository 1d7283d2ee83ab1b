// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use pbudget::application::Tracker;
use pbudget::domain::{Cents, NewTransaction, Transaction, TransactionType, YearMonth};
use tempfile::TempDir;

/// Helper to create a tracker backed by a temporary database file
pub async fn test_tracker() -> Result<(Tracker, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let tracker = Tracker::open(&db_path).await?;
    Ok((tracker, temp_dir))
}

/// Helper to parse a date string
pub fn date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

pub fn month(month_str: &str) -> YearMonth {
    month_str.parse().unwrap()
}

pub fn income(date_str: &str, amount: Cents, category: &str) -> NewTransaction {
    NewTransaction {
        date: date(date_str),
        amount_cents: amount,
        category: category.to_string(),
        kind: TransactionType::Income,
    }
}

pub fn expense(date_str: &str, amount: Cents, category: &str) -> NewTransaction {
    NewTransaction {
        date: date(date_str),
        amount_cents: amount,
        category: category.to_string(),
        kind: TransactionType::Expense,
    }
}

/// Test fixture: January 2024 with a salary, rent and two food purchases
pub struct January;

impl January {
    pub async fn record(tracker: &Tracker) -> Result<Vec<Transaction>> {
        let mut stored = Vec::new();
        for tx in [
            income("2024-01-05", 500000, "salary"),
            expense("2024-01-10", 120000, "rent"),
            expense("2024-01-15", 20000, "food"),
            expense("2024-01-20", 10000, "food"),
        ] {
            stored.push(tracker.transactions.add(tx).await?);
        }
        Ok(stored)
    }
}
