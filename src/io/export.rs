use std::io::Write;

use crate::application::{CategoryBreakdown, MonthlySummary};
use crate::domain::{Transaction, format_cents, format_date};

/// Column order of the transaction CSV format.
pub const CSV_HEADER: [&str; 4] = ["date", "amount", "category", "type"];

/// Write transactions as CSV with a header row. Returns the number of data rows.
/// Fields containing commas, quotes or newlines are quoted by the writer.
pub fn write_transactions_csv<W: Write>(
    writer: W,
    transactions: &[Transaction],
) -> Result<usize, csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(CSV_HEADER)?;

    for transaction in transactions {
        csv_writer.write_record([
            format_date(transaction.date).as_str(),
            format_cents(transaction.amount_cents).as_str(),
            transaction.category.as_str(),
            transaction.kind.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(transactions.len())
}

/// Write a monthly summary as a one-row CSV report.
pub fn write_summary_csv<W: Write>(writer: W, summary: &MonthlySummary) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["month", "income", "expense", "balance"])?;
    csv_writer.write_record([
        summary.month.to_string(),
        format_cents(summary.income),
        format_cents(summary.expense),
        format_cents(summary.balance),
    ])?;
    csv_writer.flush()?;
    Ok(())
}

/// Write a category breakdown as CSV, one row per category in report order.
pub fn write_breakdown_csv<W: Write>(
    writer: W,
    breakdown: &CategoryBreakdown,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["category", "total", "count", "percentage"])?;
    for cat in &breakdown.categories {
        csv_writer.write_record([
            cat.category.clone(),
            format_cents(cat.total),
            cat.count.to_string(),
            format!("{:.2}", cat.percentage),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}
