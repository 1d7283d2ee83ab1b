use serde::{Deserialize, Serialize};

use super::{Cents, YearMonth};

/// Spending ceiling for one month. At most one per month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub month: YearMonth,
    pub limit_cents: Cents,
}

impl Budget {
    pub fn new(month: YearMonth, limit_cents: Cents) -> Self {
        Self { month, limit_cents }
    }

    /// Compare the month's total expense against the limit.
    pub fn check(&self, spent: Cents) -> BudgetCheck {
        let exceeded = spent > self.limit_cents;
        BudgetCheck {
            month: self.month,
            limit_cents: self.limit_cents,
            spent,
            exceeded,
            overage: if exceeded { spent - self.limit_cents } else { 0 },
            remaining: (self.limit_cents - spent).max(0),
        }
    }
}

/// Outcome of comparing a month's spending with its budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetCheck {
    pub month: YearMonth,
    pub limit_cents: Cents,
    pub spent: Cents,
    pub exceeded: bool,
    /// How far spending went past the limit; zero when within budget.
    pub overage: Cents,
    /// Headroom left; zero once the limit is reached.
    pub remaining: Cents,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn january() -> YearMonth {
        "2024-01".parse().unwrap()
    }

    #[test]
    fn test_check_exceeded() {
        let check = Budget::new(january(), 100000).check(150000);
        assert!(check.exceeded);
        assert_eq!(check.overage, 50000);
        assert_eq!(check.remaining, 0);
    }

    #[test]
    fn test_check_within_budget() {
        let check = Budget::new(january(), 100000).check(40000);
        assert!(!check.exceeded);
        assert_eq!(check.overage, 0);
        assert_eq!(check.remaining, 60000);
    }

    #[test]
    fn test_spending_exactly_the_limit_is_not_exceeded() {
        let check = Budget::new(january(), 100000).check(100000);
        assert!(!check.exceeded);
        assert_eq!(check.overage, 0);
        assert_eq!(check.remaining, 0);
    }

    #[test]
    fn test_zero_limit() {
        let check = Budget::new(january(), 0).check(1);
        assert!(check.exceeded);
        assert_eq!(check.overage, 1);
    }
}
