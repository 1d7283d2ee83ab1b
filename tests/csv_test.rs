mod common;

use std::fs::File;

use anyhow::Result;
use common::{January, expense, month, test_tracker};
use pbudget::domain::{NewTransaction, TransactionFilter};
use pbudget::io::{Importer, read_transactions_csv};

#[tokio::test]
async fn test_export_round_trip() -> Result<()> {
    let (tracker, temp) = test_tracker().await?;
    let mut stored = January::record(&tracker).await?;
    stored.push(
        tracker
            .transactions
            .add(expense("2024-01-25", 1999, "food, \"fancy\" drinks"))
            .await?,
    );

    let path = temp.path().join("transactions_export.csv");
    let count = tracker
        .reports
        .export_csv(&path, &TransactionFilter::all())
        .await?;
    assert_eq!(count, 5);

    let parsed = read_transactions_csv(File::open(&path)?)?;
    assert!(parsed.errors.is_empty());

    let mut exported = parsed.transactions;
    let mut expected: Vec<NewTransaction> = stored.iter().map(|t| t.to_new()).collect();
    exported.sort();
    expected.sort();
    assert_eq!(exported, expected);

    Ok(())
}

#[tokio::test]
async fn test_export_header_only_when_empty() -> Result<()> {
    let (tracker, temp) = test_tracker().await?;

    let path = temp.path().join("empty.csv");
    let count = tracker
        .reports
        .export_csv(&path, &TransactionFilter::all())
        .await?;
    assert_eq!(count, 0);
    assert_eq!(std::fs::read_to_string(&path)?, "date,amount,category,type\n");

    Ok(())
}

#[tokio::test]
async fn test_export_single_month() -> Result<()> {
    let (tracker, temp) = test_tracker().await?;
    January::record(&tracker).await?;
    tracker
        .transactions
        .add(expense("2024-02-01", 120000, "rent"))
        .await?;

    let path = temp.path().join("feb.csv");
    let count = tracker
        .reports
        .export_csv(&path, &TransactionFilter::month(month("2024-02")))
        .await?;
    assert_eq!(count, 1);

    let content = std::fs::read_to_string(&path)?;
    assert_eq!(
        content,
        "date,amount,category,type\n2024-02-01,1200.00,rent,expense\n"
    );

    Ok(())
}

#[tokio::test]
async fn test_import_into_fresh_database() -> Result<()> {
    let (source, source_temp) = test_tracker().await?;
    let stored = January::record(&source).await?;
    let path = source_temp.path().join("backup.csv");
    source
        .reports
        .export_csv(&path, &TransactionFilter::all())
        .await?;

    let (target, _target_temp) = test_tracker().await?;
    let result = Importer::new(&target.transactions)
        .import_file(&path, false)
        .await?;
    assert_eq!(result.imported, 4);
    assert!(result.errors.is_empty());

    let imported: Vec<NewTransaction> = target
        .transactions
        .list(None)
        .await?
        .iter()
        .map(|t| t.to_new())
        .collect();
    let expected: Vec<NewTransaction> = stored.iter().map(|t| t.to_new()).collect();
    assert_eq!(imported, expected);

    // The summary is the same on both sides
    assert_eq!(
        target.reports.monthly_summary(month("2024-01")).await?.balance,
        source.reports.monthly_summary(month("2024-01")).await?.balance
    );

    Ok(())
}

#[tokio::test]
async fn test_import_skips_bad_rows() -> Result<()> {
    let (tracker, temp) = test_tracker().await?;
    let path = temp.path().join("mixed.csv");
    std::fs::write(
        &path,
        "date,amount,category,type\n\
         2024-01-05,5000.00,salary,income\n\
         2024-13-01,10.00,food,expense\n\
         2024-01-06,-3.00,food,expense\n\
         2024-01-07,12.00,food,transfer\n\
         2024-01-08,12.00,food,expense\n",
    )?;

    let result = Importer::new(&tracker.transactions)
        .import_file(&path, false)
        .await?;
    assert_eq!(result.imported, 2);
    let lines: Vec<u64> = result.errors.iter().map(|e| e.line).collect();
    assert_eq!(lines, vec![3, 4, 5]);
    assert_eq!(tracker.transactions.list(None).await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_import_dry_run_writes_nothing() -> Result<()> {
    let (tracker, temp) = test_tracker().await?;
    let path = temp.path().join("dry.csv");
    std::fs::write(
        &path,
        "date,amount,category,type\n2024-01-05,5000.00,salary,income\n",
    )?;

    let result = Importer::new(&tracker.transactions)
        .import_file(&path, true)
        .await?;
    assert_eq!(result.imported, 1);
    assert!(tracker.transactions.list(None).await?.is_empty());

    Ok(())
}
