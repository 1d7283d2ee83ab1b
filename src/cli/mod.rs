mod display;
mod menu;
mod prompt;

pub use menu::{Menu, MenuChoice};

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;

use crate::application::{MonthlySummary, Tracker, parse_transaction};
use crate::config::Config;
use crate::domain::{
    BudgetCheck, Cents, TransactionFilter, TransactionPatch, TransactionType, YearMonth,
    format_cents, format_date, normalize_category, parse_cents, parse_date, today,
    validate_amount,
};
use crate::io::{Importer, write_breakdown_csv, write_summary_csv};

use display::{
    print_breakdown, print_budget_check, print_budgets, print_chart, print_no_chart_data,
    print_success, print_summary, print_transaction, print_transactions,
};

/// pbudget - Personal Budget Analyzer
#[derive(Parser)]
#[command(name = "pbudget")]
#[command(about = "Track income and expenses, set monthly budgets and see where the money goes")]
#[command(version)]
pub struct Cli {
    /// Database file path (defaults to pbudget.db in the data directory)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Directory for the database, exports and charts
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Omit to start the interactive menu
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive menu
    Menu,

    /// Record an income or expense
    Add {
        /// Amount (e.g. "50.00" or "50")
        amount: String,

        /// Category (e.g. "food", "rent", "salary")
        #[arg(short, long)]
        category: String,

        /// Transaction type: income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Change fields of a transaction
    Edit {
        /// Transaction ID
        id: i64,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// New amount
        #[arg(short, long)]
        amount: Option<String>,

        /// New category
        #[arg(short, long)]
        category: Option<String>,

        /// New type: income or expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: i64,
    },

    /// List transactions
    List {
        /// Only this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// Only this category
        #[arg(short, long)]
        category: Option<String>,

        /// Only this type: income or expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },

    /// Monthly budget commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Income, expense and balance for a month
    Summary {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Expenses per category for a month
    Breakdown {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Export transactions to CSV
    Export {
        /// Output file (defaults to transactions_export.csv in the data directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// Only this category
        #[arg(short, long)]
        category: Option<String>,

        /// Only this type: income or expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },

    /// Import transactions from a CSV file in the export format
    Import {
        /// Input file
        input: PathBuf,

        /// Validate without importing
        #[arg(long)]
        dry_run: bool,
    },

    /// Draw the category breakdown and save it as SVG
    Chart {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Output file (defaults to category_breakdown_<month>.svg in the data directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the spending limit for a month (replaces any previous limit)
    Set {
        /// Limit amount (e.g. "1000" or "1000.00")
        limit: String,

        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Show the limit and spending for a month
    Show {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// List all budgets
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Serialize)]
struct SummaryOutput<'a> {
    #[serde(flatten)]
    summary: &'a MonthlySummary,
    budget: Option<&'a BudgetCheck>,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config::resolve(self.data_dir.clone(), self.database.clone())
    }

    pub async fn run(self) -> Result<()> {
        let config = self.config();
        config.ensure_directories()?;
        debug!(database = %config.database.display(), "opening database");

        let tracker = Tracker::open(config.database()).await?;
        let result = match self.command {
            None | Some(Commands::Menu) => Menu::new(&tracker, &config).run().await,
            Some(command) => run_command(&tracker, &config, command).await,
        };
        tracker.close().await;
        result
    }
}

async fn run_command(tracker: &Tracker, config: &Config, command: Commands) -> Result<()> {
    match command {
        Commands::Menu => Menu::new(tracker, config).run().await?,

        Commands::Add {
            amount,
            category,
            kind,
            date,
        } => {
            let date = date.unwrap_or_else(|| format_date(today()));
            let transaction = parse_transaction(&date, &amount, &category, &kind)?;
            let stored = tracker.transactions.add(transaction).await?;
            print_success(&format!("Transaction added with id {}.", stored.id));
        }

        Commands::Edit {
            id,
            date,
            amount,
            category,
            kind,
        } => {
            let patch = TransactionPatch {
                date: date.as_deref().map(parse_date).transpose()?,
                amount_cents: amount.as_deref().map(parse_amount).transpose()?,
                category: category.as_deref().map(normalize_category).transpose()?,
                kind: parse_kind(kind.as_deref())?,
            };
            let updated = tracker.transactions.edit(id, patch).await?;
            print_success("Transaction updated.");
            print_transaction(&updated);
        }

        Commands::Delete { id } => {
            tracker.transactions.remove(id).await?;
            print_success(&format!("Deleted transaction {}.", id));
        }

        Commands::List {
            month,
            category,
            kind,
        } => {
            let filter = TransactionFilter {
                month: parse_month(month.as_deref())?,
                category: category.map(|c| c.trim().to_string()),
                kind: parse_kind(kind.as_deref())?,
            };
            let transactions = tracker.transactions.query(&filter).await?;
            print_transactions(&transactions);
        }

        Commands::Budget(budget_cmd) => run_budget_command(tracker, budget_cmd).await?,

        Commands::Summary { month, format } => {
            let month = month_or_current(month.as_deref())?;
            let summary = tracker.reports.monthly_summary(month).await?;
            let check = tracker.budgets.check_exceeded(month).await?;

            match format {
                OutputFormat::Json => {
                    let output = SummaryOutput {
                        summary: &summary,
                        budget: check.as_ref(),
                    };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Csv => write_summary_csv(std::io::stdout(), &summary)?,
                OutputFormat::Table => {
                    print_summary(&summary);
                    print_budget_check(check.as_ref());
                }
            }
        }

        Commands::Breakdown { month, format } => {
            let month = month_or_current(month.as_deref())?;
            let breakdown = tracker.reports.category_breakdown(month).await?;

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&breakdown)?);
                }
                OutputFormat::Csv => write_breakdown_csv(std::io::stdout(), &breakdown)?,
                OutputFormat::Table => print_breakdown(&breakdown),
            }
        }

        Commands::Export {
            output,
            month,
            category,
            kind,
        } => {
            let path = output.unwrap_or_else(|| config.default_export_path());
            let filter = TransactionFilter {
                month: parse_month(month.as_deref())?,
                category: category.map(|c| c.trim().to_string()),
                kind: parse_kind(kind.as_deref())?,
            };
            let count = tracker.reports.export_csv(&path, &filter).await?;
            print_success(&format!(
                "Exported {} transactions to {}",
                count,
                path.display()
            ));
        }

        Commands::Import { input, dry_run } => {
            let importer = Importer::new(&tracker.transactions);
            let result = importer
                .import_file(&input, dry_run)
                .await
                .with_context(|| format!("Failed to import {}", input.display()))?;

            if dry_run {
                println!("Validation finished");
            } else {
                println!("Import complete");
            }
            println!("  Imported: {}", result.imported);
            println!("  Errors:   {}", result.errors.len());

            if !result.errors.is_empty() {
                println!("\nErrors:");
                for error in result.errors.iter().take(10) {
                    println!("  Line {}: {}", error.line, error.error);
                }
                if result.errors.len() > 10 {
                    println!("  ... and {} more errors", result.errors.len() - 10);
                }
            }
        }

        Commands::Chart { month, output } => {
            let month = month_or_current(month.as_deref())?;
            let breakdown = tracker.reports.category_breakdown(month).await?;
            if breakdown.is_empty() {
                print_no_chart_data(month);
                return Ok(());
            }

            let path = output.unwrap_or_else(|| config.default_chart_path(month));
            let chart = tracker.reports.save_chart(&breakdown, &path)?;
            print_chart(&chart);
            println!();
            print_success(&format!("Saved chart to {}", path.display()));
        }
    }

    Ok(())
}

async fn run_budget_command(tracker: &Tracker, cmd: BudgetCommands) -> Result<()> {
    match cmd {
        BudgetCommands::Set { limit, month } => {
            let month = month_or_current(month.as_deref())?;
            let limit_cents = parse_cents(&limit).context("Invalid limit format. Use '1000.00' or '1000'")?;
            let budget = tracker.budgets.set_budget(month, limit_cents).await?;
            print_success(&format!(
                "Budget for {} set to {}.",
                budget.month,
                format_cents(budget.limit_cents)
            ));
        }

        BudgetCommands::Show { month } => {
            let month = month_or_current(month.as_deref())?;
            let summary = tracker.reports.monthly_summary(month).await?;
            let check = tracker.budgets.check_exceeded(month).await?;
            println!("Budget ({})", month);
            println!("Spent:          {:>15}", format_cents(summary.expense));
            print_budget_check(check.as_ref());
        }

        BudgetCommands::List => {
            let budgets = tracker.budgets.list_budgets().await?;
            print_budgets(&budgets);
        }
    }
    Ok(())
}

fn parse_month(month: Option<&str>) -> Result<Option<YearMonth>> {
    month
        .map(|m| m.parse::<YearMonth>())
        .transpose()
        .context("Invalid month")
}

fn month_or_current(month: Option<&str>) -> Result<YearMonth> {
    Ok(parse_month(month)?.unwrap_or_else(YearMonth::current))
}

fn parse_amount(amount: &str) -> Result<Cents> {
    let cents = parse_cents(amount).context("Invalid amount format. Use '50.00' or '50'")?;
    Ok(validate_amount(cents)?)
}

fn parse_kind(kind: Option<&str>) -> Result<Option<TransactionType>> {
    kind.map(|k| k.parse::<TransactionType>())
        .transpose()
        .context("Invalid transaction type")
}
