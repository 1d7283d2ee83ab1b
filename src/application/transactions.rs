use tracing::{debug, info};

use crate::domain::{
    NewTransaction, Transaction, TransactionFilter, TransactionId, TransactionPatch,
    TransactionType, YearMonth, normalize_category, parse_cents, parse_date, validate_amount,
    validate_date,
};
use crate::storage::Repository;

use super::{AppError, AppResult};

/// Validates and mutates transaction records.
#[derive(Debug, Clone)]
pub struct TransactionManager {
    repo: Repository,
}

/// Build a transaction from raw text fields, as typed by a user or read from a file.
pub fn parse_transaction(
    date: &str,
    amount: &str,
    category: &str,
    kind: &str,
) -> AppResult<NewTransaction> {
    Ok(NewTransaction {
        date: parse_date(date)?,
        amount_cents: validate_amount(parse_cents(amount)?)?,
        category: normalize_category(category)?,
        kind: kind.parse::<TransactionType>()?,
    })
}

impl TransactionManager {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Record a new transaction.
    pub async fn add(&self, transaction: NewTransaction) -> AppResult<Transaction> {
        let transaction = NewTransaction {
            date: validate_date(transaction.date)?,
            amount_cents: validate_amount(transaction.amount_cents)?,
            category: normalize_category(&transaction.category)?,
            ..transaction
        };

        let id = self.repo.insert_transaction(&transaction).await?;
        info!(id, kind = %transaction.kind, amount_cents = transaction.amount_cents, "transaction added");

        Ok(Transaction {
            id,
            date: transaction.date,
            amount_cents: transaction.amount_cents,
            category: transaction.category,
            kind: transaction.kind,
        })
    }

    /// Change some fields of an existing transaction.
    pub async fn edit(&self, id: TransactionId, patch: TransactionPatch) -> AppResult<Transaction> {
        if patch.is_empty() {
            return Err(AppError::validation("nothing to update"));
        }

        let patch = TransactionPatch {
            date: patch.date.map(validate_date).transpose()?,
            amount_cents: patch.amount_cents.map(validate_amount).transpose()?,
            category: patch
                .category
                .as_deref()
                .map(normalize_category)
                .transpose()?,
            ..patch
        };

        let updated = self
            .repo
            .update_transaction(id, &patch)
            .await?
            .ok_or(AppError::NotFound(id))?;
        info!(id, "transaction updated");
        Ok(updated)
    }

    /// Delete a transaction.
    pub async fn remove(&self, id: TransactionId) -> AppResult<()> {
        if !self.repo.delete_transaction(id).await? {
            return Err(AppError::NotFound(id));
        }
        info!(id, "transaction deleted");
        Ok(())
    }

    pub async fn get(&self, id: TransactionId) -> AppResult<Transaction> {
        self.repo
            .get_transaction(id)
            .await?
            .ok_or(AppError::NotFound(id))
    }

    /// Transactions for a month, or all of them.
    pub async fn list(&self, month: Option<YearMonth>) -> AppResult<Vec<Transaction>> {
        let filter = TransactionFilter {
            month,
            ..TransactionFilter::default()
        };
        self.query(&filter).await
    }

    pub async fn query(&self, filter: &TransactionFilter) -> AppResult<Vec<Transaction>> {
        let transactions = self.repo.list_transactions(filter).await?;
        debug!(?filter, count = transactions.len(), "listed transactions");
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transaction() {
        let tx = parse_transaction("2024-01-10", "1200", " rent ", "Expense").unwrap();
        assert_eq!(tx.amount_cents, 120000);
        assert_eq!(tx.category, "rent");
        assert_eq!(tx.kind, TransactionType::Expense);
    }

    #[test]
    fn test_parse_transaction_rejects_each_bad_field() {
        let cases = [
            ("2024-13-01", "10", "food", "expense"),
            ("-0001-01-01", "10", "food", "expense"),
            ("+12345-01-01", "10", "food", "expense"),
            ("2024-01-10", "0", "food", "expense"),
            ("2024-01-10", "-3", "food", "expense"),
            ("2024-01-10", "ten", "food", "expense"),
            ("2024-01-10", "10", "  ", "expense"),
            ("2024-01-10", "10", "food", "refund"),
        ];
        for (date, amount, category, kind) in cases {
            let result = parse_transaction(date, amount, category, kind);
            assert!(
                matches!(result, Err(AppError::Validation(_))),
                "accepted {date} {amount} {category:?} {kind}"
            );
        }
    }
}
