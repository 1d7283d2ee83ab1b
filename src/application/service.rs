use std::path::Path;

use crate::storage::Repository;

use super::{AppResult, BudgetManager, ReportEngine, TransactionManager};

/// Wires the managers to one shared repository.
/// This is the entry point for any client (menu, subcommands, tests).
#[derive(Debug, Clone)]
pub struct Tracker {
    pub transactions: TransactionManager,
    pub budgets: BudgetManager,
    pub reports: ReportEngine,
    repo: Repository,
}

impl Tracker {
    pub fn new(repo: Repository) -> Self {
        let reports = ReportEngine::new(repo.clone());
        Self {
            transactions: TransactionManager::new(repo.clone()),
            budgets: BudgetManager::new(repo.clone(), reports.clone()),
            reports,
            repo,
        }
    }

    /// Open (or create) the database file at `path`.
    pub async fn open(path: &Path) -> AppResult<Self> {
        let repo = Repository::open(path).await?;
        Ok(Self::new(repo))
    }

    pub async fn close(&self) {
        self.repo.close().await;
    }
}
