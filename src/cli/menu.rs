use anyhow::{Context, Result};

use crate::application::{AppResult, Tracker};
use crate::config::Config;
use crate::domain::{NewTransaction, TransactionFilter, TransactionPatch, format_cents};

use super::display::{
    print_breakdown, print_budget_check, print_chart, print_error, print_no_chart_data,
    print_success, print_summary, print_transaction, print_transactions,
};
use super::prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    Edit,
    Delete,
    List,
    SetBudget,
    Summary,
    Breakdown,
    Export,
    Chart,
    Exit,
}

impl MenuChoice {
    /// Display order.
    pub const ALL: [MenuChoice; 10] = [
        MenuChoice::Add,
        MenuChoice::Edit,
        MenuChoice::Delete,
        MenuChoice::List,
        MenuChoice::SetBudget,
        MenuChoice::Summary,
        MenuChoice::Breakdown,
        MenuChoice::Export,
        MenuChoice::Chart,
        MenuChoice::Exit,
    ];

    pub fn key(&self) -> u8 {
        match self {
            MenuChoice::Add => 1,
            MenuChoice::Edit => 2,
            MenuChoice::Delete => 3,
            MenuChoice::List => 4,
            MenuChoice::SetBudget => 5,
            MenuChoice::Summary => 6,
            MenuChoice::Breakdown => 7,
            MenuChoice::Export => 8,
            MenuChoice::Chart => 9,
            MenuChoice::Exit => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::Add => "Add transaction",
            MenuChoice::Edit => "Edit transaction",
            MenuChoice::Delete => "Delete transaction",
            MenuChoice::List => "List transactions",
            MenuChoice::SetBudget => "Set monthly budget",
            MenuChoice::Summary => "Monthly summary",
            MenuChoice::Breakdown => "Category breakdown",
            MenuChoice::Export => "Export CSV",
            MenuChoice::Chart => "Category chart",
            MenuChoice::Exit => "Exit",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let key: u8 = input.trim().parse().ok()?;
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

/// The interactive request/response loop.
pub struct Menu<'a> {
    tracker: &'a Tracker,
    config: &'a Config,
}

impl<'a> Menu<'a> {
    pub fn new(tracker: &'a Tracker, config: &'a Config) -> Self {
        Self { tracker, config }
    }

    /// Loop until Exit is chosen. Only fatal errors end the loop early.
    pub async fn run(&self) -> Result<()> {
        println!("Personal Budget Analyzer");
        println!("Database: {}", self.config.database.display());

        loop {
            println!();
            println!("Main Menu:");
            for choice in MenuChoice::ALL {
                println!("  {}) {}", choice.key(), choice.label());
            }

            let input = prompt::read_choice().context("Failed to read menu choice")?;
            let Some(choice) = MenuChoice::parse(&input) else {
                print_error("Invalid option. Please choose 0-9.");
                continue;
            };

            if choice == MenuChoice::Exit {
                println!("Goodbye!");
                return Ok(());
            }

            if let Err(e) = self.dispatch(choice).await {
                if e.is_fatal() {
                    return Err(e.into());
                }
                print_error(&e.to_string());
            }
        }
    }

    async fn dispatch(&self, choice: MenuChoice) -> AppResult<()> {
        match choice {
            MenuChoice::Add => self.add().await,
            MenuChoice::Edit => self.edit().await,
            MenuChoice::Delete => self.delete().await,
            MenuChoice::List => self.list().await,
            MenuChoice::SetBudget => self.set_budget().await,
            MenuChoice::Summary => self.summary().await,
            MenuChoice::Breakdown => self.breakdown().await,
            MenuChoice::Export => self.export().await,
            MenuChoice::Chart => self.chart().await,
            MenuChoice::Exit => Ok(()),
        }
    }

    async fn add(&self) -> AppResult<()> {
        let date = prompt::date("Date")?;
        let kind = prompt::kind("Type", None)?;
        let amount_cents = prompt::amount("Amount")?;
        let category = prompt::category("Category (e.g. food, travel, rent)")?;

        let transaction = self
            .tracker
            .transactions
            .add(NewTransaction {
                date,
                amount_cents,
                category,
                kind,
            })
            .await?;
        print_success(&format!("Transaction added with id {}.", transaction.id));
        Ok(())
    }

    /// Show transactions to pick from. Returns false when there is nothing to pick.
    async fn show_candidates(&self) -> AppResult<bool> {
        let month = prompt::month_or_all("Month to list (YYYY-MM, blank for all)")?;
        let transactions = self.tracker.transactions.list(month).await?;
        print_transactions(&transactions);
        Ok(!transactions.is_empty())
    }

    async fn edit(&self) -> AppResult<()> {
        if !self.show_candidates().await? {
            return Ok(());
        }

        let id = prompt::transaction_id("ID of transaction to edit")?;
        let current = self.tracker.transactions.get(id).await?;

        println!("Leave a field blank to keep its current value.");
        let mut patch = TransactionPatch {
            date: prompt::edit_date(current.date)?,
            amount_cents: prompt::edit_amount(current.amount_cents)?,
            category: prompt::edit_category(&current.category)?,
            kind: None,
        };
        let kind = prompt::kind("Type", Some(current.kind))?;
        if kind != current.kind {
            patch.kind = Some(kind);
        }

        if patch.is_empty() {
            println!("Nothing changed.");
            return Ok(());
        }

        let updated = self.tracker.transactions.edit(id, patch).await?;
        print_success("Transaction updated.");
        print_transaction(&updated);
        Ok(())
    }

    async fn delete(&self) -> AppResult<()> {
        if !self.show_candidates().await? {
            return Ok(());
        }

        let id = prompt::transaction_id("ID of transaction to delete")?;
        if !prompt::confirm(&format!("Delete transaction {id}?"))? {
            println!("Cancelled.");
            return Ok(());
        }

        self.tracker.transactions.remove(id).await?;
        print_success("Transaction deleted.");
        Ok(())
    }

    async fn list(&self) -> AppResult<()> {
        let month = prompt::month("Month")?;
        let transactions = self.tracker.transactions.list(Some(month)).await?;
        println!();
        println!("Transactions for {}:", month);
        print_transactions(&transactions);
        Ok(())
    }

    async fn set_budget(&self) -> AppResult<()> {
        let month = prompt::month("Month")?;

        match self.tracker.budgets.get_budget(month).await? {
            Some(existing) => {
                println!(
                    "Budget for {}: limit {}",
                    month,
                    format_cents(existing.limit_cents)
                );
                if !prompt::confirm("Update it?")? {
                    return Ok(());
                }
            }
            None => println!("No budget set for {}.", month),
        }

        let limit = prompt::limit("Monthly limit")?;
        self.tracker.budgets.set_budget(month, limit).await?;
        print_success(&format!("Budget for {} set to {}.", month, format_cents(limit)));
        Ok(())
    }

    async fn summary(&self) -> AppResult<()> {
        let month = prompt::month("Month")?;
        let summary = self.tracker.reports.monthly_summary(month).await?;
        let check = self.tracker.budgets.check_exceeded(month).await?;

        println!();
        print_summary(&summary);
        print_budget_check(check.as_ref());
        Ok(())
    }

    async fn breakdown(&self) -> AppResult<()> {
        let month = prompt::month("Month")?;
        let breakdown = self.tracker.reports.category_breakdown(month).await?;
        println!();
        print_breakdown(&breakdown);
        Ok(())
    }

    async fn export(&self) -> AppResult<()> {
        let month = prompt::month_or_all("Month to export (YYYY-MM, blank for all)")?;
        let path = prompt::path("CSV file", &self.config.default_export_path())?;

        let filter = TransactionFilter {
            month,
            ..TransactionFilter::default()
        };
        let count = self.tracker.reports.export_csv(&path, &filter).await?;
        print_success(&format!(
            "Exported {} transactions to {}",
            count,
            path.display()
        ));
        Ok(())
    }

    async fn chart(&self) -> AppResult<()> {
        let month = prompt::month("Month")?;
        let breakdown = self.tracker.reports.category_breakdown(month).await?;
        if breakdown.is_empty() {
            print_no_chart_data(month);
            return Ok(());
        }

        println!();
        print_chart(&self.tracker.reports.render_chart(&breakdown));
        println!();

        let path = prompt::path("Save chart to", &self.config.default_chart_path(month))?;
        self.tracker.reports.save_chart(&breakdown, &path)?;
        print_success(&format!("Saved chart to {}", path.display()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::Add));
        assert_eq!(MenuChoice::parse(" 9 "), Some(MenuChoice::Chart));
        assert_eq!(MenuChoice::parse("0"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("10"), None);
        assert_eq!(MenuChoice::parse("add"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<_> = MenuChoice::ALL.iter().map(|c| c.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys, (0..=9).collect::<Vec<_>>());
    }
}
