mod common;

use std::collections::HashMap;

use anyhow::Result;
use common::{January, expense, income, month, test_tracker};
use pbudget::application::AppError;
use pbudget::domain::{Cents, TransactionFilter, TransactionType};

#[tokio::test]
async fn test_monthly_summary() -> Result<()> {
    let (tracker, _temp) = test_tracker().await?;
    January::record(&tracker).await?;

    let summary = tracker.reports.monthly_summary(month("2024-01")).await?;
    assert_eq!(summary.income, 500000);
    assert_eq!(summary.expense, 150000);
    assert_eq!(summary.balance, 350000);
    assert_eq!(summary.count, 4);

    Ok(())
}

#[tokio::test]
async fn test_empty_month_summary() -> Result<()> {
    let (tracker, _temp) = test_tracker().await?;
    January::record(&tracker).await?;

    let summary = tracker.reports.monthly_summary(month("2024-02")).await?;
    assert_eq!(summary.income, 0);
    assert_eq!(summary.expense, 0);
    assert_eq!(summary.balance, 0);
    assert_eq!(summary.count, 0);

    Ok(())
}

#[tokio::test]
async fn test_balance_can_go_negative() -> Result<()> {
    let (tracker, _temp) = test_tracker().await?;
    tracker
        .transactions
        .add(income("2024-05-01", 10000, "gift"))
        .await?;
    tracker
        .transactions
        .add(expense("2024-05-02", 25000, "travel"))
        .await?;

    let summary = tracker.reports.monthly_summary(month("2024-05")).await?;
    assert_eq!(summary.balance, -15000);

    Ok(())
}

#[tokio::test]
async fn test_category_breakdown_sorted_descending() -> Result<()> {
    let (tracker, _temp) = test_tracker().await?;
    January::record(&tracker).await?;

    let breakdown = tracker.reports.category_breakdown(month("2024-01")).await?;
    assert_eq!(breakdown.totals(), vec![("rent", 120000), ("food", 30000)]);
    assert_eq!(breakdown.total, 150000);

    let food = &breakdown.categories[1];
    assert_eq!(food.count, 2);
    assert!((food.percentage - 20.0).abs() < 1e-9);

    // Income never shows up in the breakdown
    assert!(breakdown.categories.iter().all(|c| c.category != "salary"));

    Ok(())
}

#[tokio::test]
async fn test_breakdown_ties_ordered_by_name() -> Result<()> {
    let (tracker, _temp) = test_tracker().await?;
    for category in ["zoo", "books", "music"] {
        tracker
            .transactions
            .add(expense("2024-06-10", 5000, category))
            .await?;
    }

    let breakdown = tracker.reports.category_breakdown(month("2024-06")).await?;
    let names: Vec<&str> = breakdown.totals().into_iter().map(|(c, _)| c).collect();
    assert_eq!(names, vec!["books", "music", "zoo"]);

    Ok(())
}

#[tokio::test]
async fn test_breakdown_of_month_without_expenses() -> Result<()> {
    let (tracker, _temp) = test_tracker().await?;
    tracker
        .transactions
        .add(income("2024-07-01", 500000, "salary"))
        .await?;

    let breakdown = tracker.reports.category_breakdown(month("2024-07")).await?;
    assert!(breakdown.is_empty());
    assert_eq!(breakdown.total, 0);

    Ok(())
}

/// Breakdown totals add up to the summary's expense, and per-category sums match
/// the individual transactions.
#[tokio::test]
async fn test_breakdown_partitions_expenses() -> Result<()> {
    let (tracker, _temp) = test_tracker().await?;
    January::record(&tracker).await?;
    for (day, amount, category) in [
        ("2024-01-03", 999, "coffee"),
        ("2024-01-04", 4550, "books"),
        ("2024-01-21", 1, "coffee"),
        ("2024-01-28", 30000, "travel"),
    ] {
        tracker
            .transactions
            .add(expense(day, amount, category))
            .await?;
    }
    tracker
        .transactions
        .add(expense("2024-02-01", 70000, "travel"))
        .await?;

    let jan = month("2024-01");
    let summary = tracker.reports.monthly_summary(jan).await?;
    let breakdown = tracker.reports.category_breakdown(jan).await?;

    let breakdown_sum: Cents = breakdown.categories.iter().map(|c| c.total).sum();
    assert_eq!(breakdown_sum, summary.expense);

    let mut expected: HashMap<String, Cents> = HashMap::new();
    for t in tracker.transactions.list(Some(jan)).await? {
        if t.kind == TransactionType::Expense {
            *expected.entry(t.category).or_default() += t.amount_cents;
        }
    }
    let actual: HashMap<String, Cents> = breakdown
        .categories
        .iter()
        .map(|c| (c.category.clone(), c.total))
        .collect();
    assert_eq!(actual, expected);

    let percent: f64 = breakdown.categories.iter().map(|c| c.percentage).sum();
    assert!((percent - 100.0).abs() < 1e-6);

    Ok(())
}

#[tokio::test]
async fn test_balance_matches_transactions() -> Result<()> {
    let (tracker, _temp) = test_tracker().await?;
    January::record(&tracker).await?;

    let jan = month("2024-01");
    let summary = tracker.reports.monthly_summary(jan).await?;
    let signed: Cents = tracker
        .transactions
        .list(Some(jan))
        .await?
        .iter()
        .map(|t| match t.kind {
            TransactionType::Income => t.amount_cents,
            TransactionType::Expense => -t.amount_cents,
        })
        .sum();
    assert_eq!(summary.balance, signed);

    Ok(())
}

#[tokio::test]
async fn test_chart_saved_as_svg() -> Result<()> {
    let (tracker, temp) = test_tracker().await?;
    January::record(&tracker).await?;

    let breakdown = tracker.reports.category_breakdown(month("2024-01")).await?;
    let path = temp.path().join("category_breakdown_2024-01.svg");
    let chart = tracker.reports.save_chart(&breakdown, &path)?;

    assert_eq!(chart.bars.len(), 2);
    assert_eq!(chart.bars[0].label, "rent");
    assert_eq!(chart.bars[0].ratio, 1.0);

    let svg = std::fs::read_to_string(&path)?;
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("2024-01"));
    assert!(svg.contains(">rent<"));
    assert!(svg.contains(">food<"));

    Ok(())
}

#[tokio::test]
async fn test_report_filters_by_type_for_export() -> Result<()> {
    let (tracker, temp) = test_tracker().await?;
    January::record(&tracker).await?;

    let path = temp.path().join("expenses.csv");
    let filter = TransactionFilter::month(month("2024-01")).with_kind(TransactionType::Expense);
    let count = tracker.reports.export_csv(&path, &filter).await?;
    assert_eq!(count, 3);

    let content = std::fs::read_to_string(&path)?;
    assert!(!content.contains("salary"));

    Ok(())
}

#[tokio::test]
async fn test_failed_writes_are_reported_and_recoverable() -> Result<()> {
    let (tracker, temp) = test_tracker().await?;
    January::record(&tracker).await?;
    let missing_dir = temp.path().join("no-such-dir");

    let export = tracker
        .reports
        .export_csv(&missing_dir.join("out.csv"), &TransactionFilter::all())
        .await;
    match export {
        Err(err @ AppError::Io(_)) => assert!(!err.is_fatal()),
        other => panic!("expected an I/O error, got {other:?}"),
    }

    let breakdown = tracker.reports.category_breakdown(month("2024-01")).await?;
    let chart = tracker
        .reports
        .save_chart(&breakdown, &missing_dir.join("chart.svg"));
    match chart {
        Err(err @ AppError::Io(_)) => assert!(!err.is_fatal()),
        other => panic!("expected an I/O error, got {other:?}"),
    }
    assert!(!missing_dir.exists());

    // The tracker keeps working after the failures
    tracker
        .transactions
        .add(expense("2024-01-30", 500, "coffee"))
        .await?;
    let summary = tracker.reports.monthly_summary(month("2024-01")).await?;
    assert_eq!(summary.expense, 150500);

    let path = temp.path().join("out.csv");
    let count = tracker
        .reports
        .export_csv(&path, &TransactionFilter::all())
        .await?;
    assert_eq!(count, 5);

    Ok(())
}
