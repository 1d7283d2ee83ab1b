use colored::Colorize;

use crate::application::{CategoryBreakdown, MonthlySummary};
use crate::domain::{Budget, BudgetCheck, Transaction, YearMonth, format_cents, format_date};
use crate::io::Chart;

/// Width of the terminal bar chart, in cells.
pub const CHART_WIDTH: usize = 40;

pub fn print_success(message: &str) {
    println!("{}", message.green());
}

pub fn print_warning(message: &str) {
    eprintln!("{}", message.yellow());
}

pub fn print_error(message: &str) {
    eprintln!("{}", message.red());
}

pub fn print_transactions(transactions: &[Transaction]) {
    if transactions.is_empty() {
        println!("No transactions found.");
        return;
    }

    println!(
        "{:>5}  {:<10}  {:<7}  {:<20} {:>12}",
        "ID", "DATE", "TYPE", "CATEGORY", "AMOUNT"
    );
    println!("{}", "-".repeat(60));
    for t in transactions {
        println!(
            "{:>5}  {:<10}  {:<7}  {:<20} {:>12}",
            t.id,
            format_date(t.date),
            t.kind.as_str(),
            truncate(&t.category, 20),
            format_cents(t.amount_cents)
        );
    }
}

pub fn print_transaction(t: &Transaction) {
    println!(
        "#{} {} {} {} {}",
        t.id,
        format_date(t.date),
        t.kind,
        t.category,
        format_cents(t.amount_cents)
    );
}

pub fn print_summary(summary: &MonthlySummary) {
    println!("Monthly Summary ({})", summary.month);
    println!();
    println!("Total Income:   {:>15}", format_cents(summary.income));
    println!("Total Expense:  {:>15}", format_cents(summary.expense));
    println!("{}", "-".repeat(31));
    println!("Balance:        {:>15}", format_cents(summary.balance));
    println!("Transactions:   {:>15}", summary.count);
}

pub fn print_budget_check(check: Option<&BudgetCheck>) {
    let Some(check) = check else {
        println!("No budget set for this month.");
        return;
    };

    println!("Budget Limit:   {:>15}", format_cents(check.limit_cents));
    if check.exceeded {
        print_warning(&format!(
            "ALERT: budget for {} exceeded by {}",
            check.month,
            format_cents(check.overage)
        ));
    } else {
        print_success(&format!(
            "Within budget, {} remaining.",
            format_cents(check.remaining)
        ));
    }
}

pub fn print_budgets(budgets: &[Budget]) {
    if budgets.is_empty() {
        println!("No budgets found.");
        return;
    }

    println!("{:<10} {:>12}", "MONTH", "LIMIT");
    println!("{}", "-".repeat(23));
    for budget in budgets {
        println!(
            "{:<10} {:>12}",
            budget.month.to_string(),
            format_cents(budget.limit_cents)
        );
    }
}

pub fn print_breakdown(breakdown: &CategoryBreakdown) {
    println!("Category Spending ({})", breakdown.month);
    println!();

    if breakdown.is_empty() {
        println!("  No expense data.");
        return;
    }

    println!(
        "{:<20} {:>12} {:>8} {:>10}",
        "CATEGORY", "TOTAL", "COUNT", "% OF TOTAL"
    );
    println!("{}", "-".repeat(53));
    for cat in &breakdown.categories {
        println!(
            "{:<20} {:>12} {:>8} {:>9.1}%",
            truncate(&cat.category, 20),
            format_cents(cat.total),
            cat.count,
            cat.percentage
        );
    }
    println!("{}", "-".repeat(53));
    println!("{:<20} {:>12}", "TOTAL", format_cents(breakdown.total));
}

pub fn print_chart(chart: &Chart) {
    println!("{}", chart.title.bold());
    println!();
    for row in chart.render_text(CHART_WIDTH, '█') {
        println!("{}", row.cyan());
    }
}

fn no_chart_data(month: YearMonth) -> String {
    format!("No expense data to plot for {}.", month)
}

pub fn print_no_chart_data(month: YearMonth) {
    print_warning(&no_chart_data(month));
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
