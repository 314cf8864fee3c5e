//! Category sets and the custom-category escape hatch.
//!
//! Expense and income transactions draw from separate fixed category sets. Data entry
//! may also supply a free-form custom label. [`CategoryInput::resolve`] validates the
//! choice against the transaction type and turns it into the plain string that is
//! stored and later grouped on by the progress engine.

use crate::{
    entities::TransactionType,
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Known expense categories
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    /// Groceries and eating out
    Food,
    /// Fuel, transit, rides
    Transportation,
    /// Rent or mortgage
    Housing,
    /// Power, water, internet
    Utilities,
    /// Leisure
    Entertainment,
    /// Medical costs
    Healthcare,
    /// General purchases
    Shopping,
    /// Tuition, courses, books
    Education,
    /// Anything else
    Other,
}

impl ExpenseCategory {
    /// Every expense category, in display order.
    pub const ALL: [Self; 9] = [
        Self::Food,
        Self::Transportation,
        Self::Housing,
        Self::Utilities,
        Self::Entertainment,
        Self::Healthcare,
        Self::Shopping,
        Self::Education,
        Self::Other,
    ];

    /// Stored name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "FOOD",
            Self::Transportation => "TRANSPORTATION",
            Self::Housing => "HOUSING",
            Self::Utilities => "UTILITIES",
            Self::Entertainment => "ENTERTAINMENT",
            Self::Healthcare => "HEALTHCARE",
            Self::Shopping => "SHOPPING",
            Self::Education => "EDUCATION",
            Self::Other => "OTHER",
        }
    }
}

impl FromStr for ExpenseCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidCategory {
                category: s.to_string(),
                kind: TransactionType::Expense.to_string(),
            })
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known income categories
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncomeCategory {
    /// Regular pay
    Salary,
    /// Contract work
    Freelance,
    /// Dividends, interest, gains
    Investment,
    /// Money received as a gift
    Gift,
    /// Anything else
    Other,
}

impl IncomeCategory {
    /// Every income category, in display order.
    pub const ALL: [Self; 5] = [
        Self::Salary,
        Self::Freelance,
        Self::Investment,
        Self::Gift,
        Self::Other,
    ];

    /// Stored name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Salary => "SALARY",
            Self::Freelance => "FREELANCE",
            Self::Investment => "INVESTMENT",
            Self::Gift => "GIFT",
            Self::Other => "OTHER",
        }
    }
}

impl FromStr for IncomeCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidCategory {
                category: s.to_string(),
                kind: TransactionType::Income.to_string(),
            })
    }
}

impl fmt::Display for IncomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category as chosen at data entry: a known category or a custom label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryInput {
    /// One of the fixed expense categories
    Expense(ExpenseCategory),
    /// One of the fixed income categories
    Income(IncomeCategory),
    /// User-supplied label
    Custom(String),
}

impl CategoryInput {
    /// Maps a raw string to a known category of `kind` when it names one,
    /// otherwise keeps it as a custom label.
    #[must_use]
    pub fn parse(kind: TransactionType, raw: &str) -> Self {
        match kind {
            TransactionType::Expense => raw
                .parse::<ExpenseCategory>()
                .map_or_else(|_| Self::Custom(raw.to_string()), Self::Expense),
            TransactionType::Income => raw
                .parse::<IncomeCategory>()
                .map_or_else(|_| Self::Custom(raw.to_string()), Self::Income),
        }
    }

    /// Validates the category against `kind` and returns the string to store.
    ///
    /// # Errors
    /// Returns [`Error::InvalidCategory`] when a known category belongs to the other
    /// transaction type or a custom label is blank.
    pub fn resolve(self, kind: TransactionType) -> Result<String> {
        match (self, kind) {
            (Self::Expense(c), TransactionType::Expense) => Ok(c.as_str().to_string()),
            (Self::Income(c), TransactionType::Income) => Ok(c.as_str().to_string()),
            (Self::Custom(label), _) => {
                let trimmed = label.trim();
                if trimmed.is_empty() {
                    Err(Error::InvalidCategory {
                        category: label,
                        kind: kind.to_string(),
                    })
                } else {
                    Ok(trimmed.to_string())
                }
            }
            (Self::Expense(c), TransactionType::Income) => Err(Error::InvalidCategory {
                category: c.to_string(),
                kind: kind.to_string(),
            }),
            (Self::Income(c), TransactionType::Expense) => Err(Error::InvalidCategory {
                category: c.to_string(),
                kind: kind.to_string(),
            }),
        }
    }
}

impl From<ExpenseCategory> for CategoryInput {
    fn from(value: ExpenseCategory) -> Self {
        Self::Expense(value)
    }
}

impl From<IncomeCategory> for CategoryInput {
    fn from(value: IncomeCategory) -> Self {
        Self::Income(value)
    }
}
