//! Cash-flow data types.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::FlowError;

/// Month names used in API responses.
const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Sign classification of a balance or a gap.
///
/// The same vocabulary backs two different fields of [`BudgetEntry`]: `status` (sign of
/// the planned balance) and `gap_status` (sign of realized minus planned).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStatus {
    /// Value is below zero.
    Deficit,
    /// Value is above zero.
    Surplus,
    /// Value is exactly zero.
    Neutral,
}

impl FlowStatus {
    /// Classifies a value by its sign.
    #[must_use]
    pub fn from_sign(value: Decimal) -> Self {
        match value.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Less => Self::Deficit,
            std::cmp::Ordering::Greater => Self::Surplus,
            std::cmp::Ordering::Equal => Self::Neutral,
        }
    }

    /// Returns the lowercase name stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deficit => "deficit",
            Self::Surplus => "surplus",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deficit" => Ok(Self::Deficit),
            "surplus" => Ok(Self::Surplus),
            "neutral" => Ok(Self::Neutral),
            other => Err(format!("unknown flow status: {other}")),
        }
    }
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthRef {
    /// Calendar year.
    pub year: i32,
    /// Month number, 1 through 12.
    pub month: u32,
}

impl MonthRef {
    /// Creates a month reference.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidMonth` if `month` is outside 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self, FlowError> {
        if (1..=12).contains(&month) {
            Ok(Self { year, month })
        } else {
            Err(FlowError::InvalidMonth(month))
        }
    }

    /// Returns the display name of the month.
    #[must_use]
    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }
}

/// Returns the display name for a month number, or an empty string when out of range.
#[must_use]
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index as usize))
        .copied()
        .unwrap_or("")
}

/// One month of a user's cash flow.
///
/// Exactly one entry exists per `(user_id, month, year)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetEntry {
    /// Row ID.
    pub id: i32,
    /// Owner.
    pub user_id: i32,
    /// Month number, 1 through 12.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Planned income; missing is treated as zero.
    pub planned_income: Option<Decimal>,
    /// Planned expense; missing is treated as zero.
    pub planned_expense: Option<Decimal>,
    /// Running planned balance as of this month.
    pub planned_balance: Decimal,
    /// Externally recorded actual balance.
    pub realized_balance: Option<Decimal>,
    /// Sign of `planned_balance`.
    pub status: FlowStatus,
    /// `realized_balance - planned_balance`, once compared.
    pub gap_amount: Option<Decimal>,
    /// `gap_amount / |planned_balance|` as a raw ratio, once compared.
    pub gap_percentage: Option<Decimal>,
    /// Sign of `gap_amount`, once compared.
    pub gap_status: Option<FlowStatus>,
}

impl BudgetEntry {
    /// Planned income, zero when missing.
    #[must_use]
    pub fn income(&self) -> Decimal {
        self.planned_income.unwrap_or(Decimal::ZERO)
    }

    /// Planned expense, zero when missing.
    #[must_use]
    pub fn expense(&self) -> Decimal {
        self.planned_expense.unwrap_or(Decimal::ZERO)
    }

    /// Realized balance, zero when missing.
    #[must_use]
    pub fn realized(&self) -> Decimal {
        self.realized_balance.unwrap_or(Decimal::ZERO)
    }

    /// The month this entry belongs to.
    #[must_use]
    pub const fn period(&self) -> MonthRef {
        MonthRef {
            year: self.year,
            month: self.month,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(-0.01), FlowStatus::Deficit)]
    #[case(dec!(-1500), FlowStatus::Deficit)]
    #[case(dec!(0), FlowStatus::Neutral)]
    #[case(dec!(0.00), FlowStatus::Neutral)]
    #[case(dec!(0.01), FlowStatus::Surplus)]
    #[case(dec!(2000), FlowStatus::Surplus)]
    fn test_status_from_sign(#[case] value: Decimal, #[case] expected: FlowStatus) {
        assert_eq!(FlowStatus::from_sign(value), expected);
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in [FlowStatus::Deficit, FlowStatus::Surplus, FlowStatus::Neutral] {
            assert_eq!(status.as_str().parse::<FlowStatus>().unwrap(), status);
        }
        assert!("positive".parse::<FlowStatus>().is_err());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(FlowStatus::Surplus.to_string(), "surplus");
        assert_eq!(FlowStatus::Deficit.to_string(), "deficit");
    }

    #[rstest]
    #[case(1, "Janeiro")]
    #[case(3, "Março")]
    #[case(12, "Dezembro")]
    #[case(0, "")]
    #[case(13, "")]
    fn test_month_name(#[case] month: u32, #[case] expected: &str) {
        assert_eq!(month_name(month), expected);
    }

    #[test]
    fn test_month_ref_rejects_out_of_range() {
        assert!(MonthRef::new(2025, 0).is_err());
        assert!(MonthRef::new(2025, 13).is_err());
        assert_eq!(MonthRef::new(2025, 10).unwrap().month_name(), "Outubro");
    }

    #[test]
    fn test_missing_amounts_default_to_zero() {
        let entry = BudgetEntry {
            id: 1,
            user_id: 1,
            month: 5,
            year: 2025,
            planned_income: None,
            planned_expense: Some(dec!(10)),
            planned_balance: Decimal::ZERO,
            realized_balance: None,
            status: FlowStatus::Neutral,
            gap_amount: None,
            gap_percentage: None,
            gap_status: None,
        };

        assert_eq!(entry.income(), Decimal::ZERO);
        assert_eq!(entry.expense(), dec!(10));
        assert_eq!(entry.realized(), Decimal::ZERO);
        assert_eq!(entry.period(), MonthRef { year: 2025, month: 5 });
    }
}
