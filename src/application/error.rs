use thiserror::Error;

use crate::domain::{
    InvalidTransaction, ParseCentsError, ParseDateError, ParseMonthError, ParseTypeError,
    TransactionId,
};
use crate::storage::CorruptRecord;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0:#}")]
    Storage(anyhow::Error),

    #[error("Database is corrupt: {0}")]
    Corrupt(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// Only corruption ends the program; everything else is reported and the user carries on.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Corrupt(_))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<CorruptRecord>() {
            Some(corrupt) => AppError::Corrupt(corrupt.to_string()),
            None => AppError::Storage(err),
        }
    }
}

macro_rules! validation_from {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for AppError {
                fn from(err: $source) -> Self {
                    AppError::Validation(err.to_string())
                }
            }
        )*
    };
}

validation_from!(
    ParseCentsError,
    ParseDateError,
    ParseMonthError,
    ParseTypeError,
    InvalidTransaction,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_record_is_fatal() {
        let err: AppError = anyhow::Error::new(CorruptRecord {
            table: "transactions",
            key: "7".to_string(),
            reason: "bad date".to_string(),
        })
        .context("Failed to list transactions")
        .into();

        assert!(matches!(err, AppError::Corrupt(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_other_storage_errors_are_recoverable() {
        let err: AppError = anyhow::anyhow!("disk full").into();
        assert!(matches!(err, AppError::Storage(_)));
        assert!(!err.is_fatal());
        assert!(!AppError::NotFound(3).is_fatal());
        assert!(!AppError::validation("bad").is_fatal());
    }

    #[test]
    fn test_parse_errors_become_validation() {
        let err: AppError = ParseCentsError::Empty.into();
        assert_eq!(err.to_string(), "Invalid input: amount is empty");
    }
}
