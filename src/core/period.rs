//! Target period handling - the `(month, year)` pair budgets and reports are scoped to.

use crate::errors::{Error, Result};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month of a given year. `month` is 1-indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    /// Year of the period
    pub year: i32,
    /// Month of the period (1-12)
    pub month: u32,
}

impl Period {
    /// Builds a period, rejecting months outside 1-12.
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if (1..=12).contains(&month) {
            Ok(Self { year, month })
        } else {
            Err(Error::InvalidPeriod {
                month: i64::from(month),
                year,
            })
        }
    }

    /// The period containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The period containing today's local date.
    #[must_use]
    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    /// Fills each missing half from the current local date.
    #[must_use]
    pub fn resolve(month: Option<u32>, year: Option<i32>) -> Self {
        let now = Self::current();
        Self {
            year: year.unwrap_or(now.year),
            month: month.unwrap_or(now.month),
        }
    }

    /// Whether `date` falls within this calendar month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Whether a stored `(month, year)` pair names this period.
    #[must_use]
    pub fn matches(self, month: i32, year: i32) -> bool {
        year == self.year && u32::try_from(month).is_ok_and(|m| m == self.month)
    }

    /// Month as stored in the database.
    #[must_use]
    pub fn month_i32(self) -> i32 {
        // Cast safety: month is always 1-12
        #[allow(clippy::cast_possible_wrap)]
        let month = self.month as i32;
        month
    }

    /// The month before this one.
    #[must_use]
    pub const fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The month after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
