use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{Cents, TransactionFilter, YearMonth};
use crate::io::{Chart, write_transactions_csv};
use crate::storage::Repository;

use super::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: YearMonth,
    pub income: Cents,
    pub expense: Cents,
    /// `income - expense`
    pub balance: Cents,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub month: YearMonth,
    /// Largest first.
    pub categories: Vec<CategorySummary>,
    pub total: Cents,
}

impl CategoryBreakdown {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// `(category, total)` pairs in report order.
    pub fn totals(&self) -> Vec<(&str, Cents)> {
        self.categories
            .iter()
            .map(|c| (c.category.as_str(), c.total))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Cents,
    pub count: i64,
    pub percentage: f64,
}

/// Aggregates transactions into summaries, breakdowns, exports and charts.
#[derive(Debug, Clone)]
pub struct ReportEngine {
    repo: Repository,
}

impl ReportEngine {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Income, expense and balance for one month.
    pub async fn monthly_summary(&self, month: YearMonth) -> AppResult<MonthlySummary> {
        let totals = self.repo.month_totals(month).await?;
        debug!(%month, income = totals.income, expense = totals.expense, "monthly summary");

        Ok(MonthlySummary {
            month,
            income: totals.income,
            expense: totals.expense,
            balance: totals.income - totals.expense,
            count: totals.count,
        })
    }

    /// Expense totals per category for one month.
    pub async fn category_breakdown(&self, month: YearMonth) -> AppResult<CategoryBreakdown> {
        let aggregates = self.repo.expense_by_category(month).await?;
        let total: Cents = aggregates.iter().map(|a| a.total).sum();

        let categories = aggregates
            .into_iter()
            .map(|a| CategorySummary {
                percentage: if total > 0 {
                    a.total as f64 / total as f64 * 100.0
                } else {
                    0.0
                },
                category: a.category,
                total: a.total,
                count: a.count,
            })
            .collect();

        Ok(CategoryBreakdown {
            month,
            categories,
            total,
        })
    }

    /// Write the matching transactions to a CSV file. Returns the number of rows.
    pub async fn export_csv(&self, path: &Path, filter: &TransactionFilter) -> AppResult<usize> {
        let transactions = self.repo.list_transactions(filter).await?;
        let file = File::create(path)?;
        let count = write_transactions_csv(BufWriter::new(file), &transactions)?;
        info!(path = %path.display(), count, "exported transactions");
        Ok(count)
    }

    pub fn render_chart(&self, breakdown: &CategoryBreakdown) -> Chart {
        Chart::from_breakdown(breakdown)
    }

    /// Render the breakdown and save it as an SVG file.
    pub fn save_chart(&self, breakdown: &CategoryBreakdown, path: &Path) -> AppResult<Chart> {
        let chart = self.render_chart(breakdown);
        std::fs::write(path, chart.render_svg())?;
        info!(path = %path.display(), bars = chart.bars.len(), "saved chart");
        Ok(chart)
    }
}
