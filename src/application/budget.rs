use tracing::{info, warn};

use crate::domain::{Budget, BudgetCheck, Cents, YearMonth};
use crate::storage::Repository;

use super::{AppError, AppResult, ReportEngine};

/// Keeps one spending limit per month and compares it with actual spend.
#[derive(Debug, Clone)]
pub struct BudgetManager {
    repo: Repository,
    reports: ReportEngine,
}

impl BudgetManager {
    pub fn new(repo: Repository, reports: ReportEngine) -> Self {
        Self { repo, reports }
    }

    /// Set the limit for a month, replacing any previous one.
    pub async fn set_budget(&self, month: YearMonth, limit_cents: Cents) -> AppResult<Budget> {
        if limit_cents < 0 {
            return Err(AppError::validation("budget limit cannot be negative"));
        }

        let budget = Budget::new(month, limit_cents);
        self.repo.upsert_budget(&budget).await?;
        info!(%month, limit_cents, "budget set");
        Ok(budget)
    }

    pub async fn get_budget(&self, month: YearMonth) -> AppResult<Option<Budget>> {
        Ok(self.repo.get_budget(month).await?)
    }

    pub async fn list_budgets(&self) -> AppResult<Vec<Budget>> {
        Ok(self.repo.list_budgets().await?)
    }

    /// Compare the month's expenses with its budget. `None` when no budget is set.
    pub async fn check_exceeded(&self, month: YearMonth) -> AppResult<Option<BudgetCheck>> {
        let Some(budget) = self.get_budget(month).await? else {
            return Ok(None);
        };

        let summary = self.reports.monthly_summary(month).await?;
        let check = budget.check(summary.expense);
        if check.exceeded {
            warn!(%month, overage = check.overage, "budget exceeded");
        }
        Ok(Some(check))
    }
}
