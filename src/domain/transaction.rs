use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Cents, YearMonth};

pub type TransactionId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid type '{0}', expected 'income' or 'expense'")]
pub struct ParseTypeError(pub String);

impl FromStr for TransactionType {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(ParseTypeError(s.trim().to_string())),
        }
    }
}

/// A single recorded income or expense event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    /// Always positive; the direction comes from `kind`.
    pub amount_cents: Cents,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

impl Transaction {
    /// The same record without its storage id.
    pub fn to_new(&self) -> NewTransaction {
        NewTransaction {
            date: self.date,
            amount_cents: self.amount_cents,
            category: self.category.clone(),
            kind: self.kind,
        }
    }
}

/// A transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount_cents: Cents,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

/// Fields to change on an existing transaction. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub amount_cents: Option<Cents>,
    pub category: Option<String>,
    pub kind: Option<TransactionType>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.amount_cents.is_none()
            && self.category.is_none()
            && self.kind.is_none()
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_amount(mut self, amount_cents: Cents) -> Self {
        self.amount_cents = Some(amount_cents);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Query filter for listing transactions. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub month: Option<YearMonth>,
    pub category: Option<String>,
    pub kind: Option<TransactionType>,
}

impl TransactionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn month(month: YearMonth) -> Self {
        Self {
            month: Some(month),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidTransaction {
    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    #[error("category cannot be empty")]
    EmptyCategory,

    #[error("date {0} is outside the years 0000-9999")]
    DateOutOfRange(NaiveDate),
}

/// Check a date for a stored transaction. Every stored date must belong to a `YearMonth`.
pub fn validate_date(date: NaiveDate) -> Result<NaiveDate, InvalidTransaction> {
    YearMonth::of(date)
        .map(|_| date)
        .ok_or(InvalidTransaction::DateOutOfRange(date))
}

/// Check an amount for a stored transaction.
pub fn validate_amount(amount_cents: Cents) -> Result<Cents, InvalidTransaction> {
    if amount_cents <= 0 {
        return Err(InvalidTransaction::NonPositiveAmount);
    }
    Ok(amount_cents)
}

/// Trim a category label and reject blank ones.
pub fn normalize_category(category: &str) -> Result<String, InvalidTransaction> {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        return Err(InvalidTransaction::EmptyCategory);
    }
    Ok(trimmed.to_string())
}
