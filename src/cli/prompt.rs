//! Interactive prompts. Inputs are validated inline, so a bad value re-prompts
//! instead of failing the menu action.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use dialoguer::{Confirm, Input, Select};

use crate::application::{AppError, AppResult};
use crate::domain::{
    Cents, TransactionId, TransactionType, YearMonth, format_cents, format_date,
    normalize_category, parse_cents, parse_date, today, validate_amount,
};

fn prompt_failed(err: dialoguer::Error) -> AppError {
    AppError::Io(std::io::Error::other(err))
}

fn read_text<V>(prompt: &str, validator: V) -> AppResult<String>
where
    V: FnMut(&String) -> Result<(), String>,
{
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .validate_with(validator)
        .interact_text()
        .map(|s| s.trim().to_string())
        .map_err(prompt_failed)
}

fn positive_amount(input: &str) -> Result<Cents, String> {
    let cents = parse_cents(input).map_err(|e| e.to_string())?;
    validate_amount(cents).map_err(|e| e.to_string())
}

fn non_negative_amount(input: &str) -> Result<Cents, String> {
    let cents = parse_cents(input).map_err(|e| e.to_string())?;
    if cents < 0 {
        return Err("amount cannot be negative".to_string());
    }
    Ok(cents)
}

pub fn read_choice() -> AppResult<String> {
    read_text("Choose an option (0-9)", |_: &String| Ok(()))
}

/// Date, blank for today.
pub fn date(prompt: &str) -> AppResult<NaiveDate> {
    let input = read_text(&format!("{prompt} (YYYY-MM-DD, blank for today)"), |s: &String| {
        if s.trim().is_empty() {
            return Ok(());
        }
        parse_date(s).map(|_| ()).map_err(|e| e.to_string())
    })?;

    if input.is_empty() {
        Ok(today())
    } else {
        Ok(parse_date(&input)?)
    }
}

/// Month, blank for the current one.
pub fn month(prompt: &str) -> AppResult<YearMonth> {
    Ok(month_or_all(&format!("{prompt} (YYYY-MM, blank for current month)"))?
        .unwrap_or_else(YearMonth::current))
}

/// Month, blank for no month at all.
pub fn month_or_all(prompt: &str) -> AppResult<Option<YearMonth>> {
    let input = read_text(prompt, |s: &String| {
        if s.trim().is_empty() {
            return Ok(());
        }
        s.parse::<YearMonth>().map(|_| ()).map_err(|e| e.to_string())
    })?;

    if input.is_empty() {
        Ok(None)
    } else {
        Ok(Some(input.parse()?))
    }
}

pub fn amount(prompt: &str) -> AppResult<Cents> {
    let input = read_text(prompt, |s: &String| positive_amount(s).map(|_| ()))?;
    positive_amount(&input).map_err(AppError::Validation)
}

pub fn limit(prompt: &str) -> AppResult<Cents> {
    let input = read_text(prompt, |s: &String| non_negative_amount(s).map(|_| ()))?;
    non_negative_amount(&input).map_err(AppError::Validation)
}

pub fn category(prompt: &str) -> AppResult<String> {
    let input = read_text(prompt, |s: &String| {
        normalize_category(s).map(|_| ()).map_err(|e| e.to_string())
    })?;
    Ok(normalize_category(&input)?)
}

pub fn kind(prompt: &str, current: Option<TransactionType>) -> AppResult<TransactionType> {
    const KINDS: [TransactionType; 2] = [TransactionType::Income, TransactionType::Expense];
    let default = match current {
        Some(TransactionType::Income) => 0,
        _ => 1,
    };

    let index = Select::new()
        .with_prompt(prompt)
        .items(&KINDS.map(|k| k.as_str()))
        .default(default)
        .interact()
        .map_err(prompt_failed)?;
    Ok(KINDS[index])
}

pub fn transaction_id(prompt: &str) -> AppResult<TransactionId> {
    let input = read_text(prompt, |s: &String| {
        s.trim()
            .parse::<TransactionId>()
            .map(|_| ())
            .map_err(|_| "enter a numeric id".to_string())
    })?;
    input
        .parse()
        .map_err(|_| AppError::validation(format!("invalid id '{input}'")))
}

/// Replacement date, `None` when left blank.
pub fn edit_date(current: NaiveDate) -> AppResult<Option<NaiveDate>> {
    let input = read_text(&format!("Date [{}]", format_date(current)), |s: &String| {
        if s.trim().is_empty() {
            return Ok(());
        }
        parse_date(s).map(|_| ()).map_err(|e| e.to_string())
    })?;

    if input.is_empty() {
        return Ok(None);
    }
    Ok(Some(parse_date(&input)?).filter(|d| *d != current))
}

/// Replacement amount, `None` when left blank.
pub fn edit_amount(current: Cents) -> AppResult<Option<Cents>> {
    let input = read_text(&format!("Amount [{}]", format_cents(current)), |s: &String| {
        if s.trim().is_empty() {
            return Ok(());
        }
        positive_amount(s).map(|_| ())
    })?;

    if input.is_empty() {
        return Ok(None);
    }
    let cents = positive_amount(&input).map_err(AppError::Validation)?;
    Ok(Some(cents).filter(|c| *c != current))
}

/// Replacement category, `None` when left blank.
pub fn edit_category(current: &str) -> AppResult<Option<String>> {
    let input = read_text(&format!("Category [{current}]"), |_: &String| Ok(()))?;
    if input.is_empty() || input == current {
        return Ok(None);
    }
    Ok(Some(normalize_category(&input)?))
}

pub fn confirm(prompt: &str) -> AppResult<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(prompt_failed)
}

/// File path, blank for `default`.
pub fn path(prompt: &str, default: &Path) -> AppResult<PathBuf> {
    let input = read_text(
        &format!("{prompt} (blank for {})", default.display()),
        |_: &String| Ok(()),
    )?;

    if input.is_empty() {
        Ok(default.to_path_buf())
    } else {
        Ok(PathBuf::from(input))
    }
}
