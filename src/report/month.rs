use std::fmt::Display;

use serde::Serialize;
use time::{Date, Month};

use crate::Error;

/// A calendar month of a particular year, e.g. March 2025.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    /// The month number from 1 (January) to 12 (December).
    pub month: u8,
}

impl YearMonth {
    /// Create a year-month.
    ///
    /// # Errors
    /// Returns an [Error::InvalidMonth] if `month` is not in the range 1 to 12,
    /// or an [Error::InvalidYear] if `year` is outside the years a [Date] can
    /// represent.
    pub fn new(year: i32, month: i64) -> Result<Self, Error> {
        if !(Date::MIN.year()..=Date::MAX.year()).contains(&year) {
            return Err(Error::InvalidYear(year));
        }

        match u8::try_from(month) {
            Ok(month @ 1..=12) => Ok(Self { year, month }),
            _ => Err(Error::InvalidMonth(month)),
        }
    }

    /// The month containing `date`.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }

    /// The month immediately before this one. The month before January is
    /// December of the previous year.
    pub fn previous(&self) -> Self {
        match self.month {
            1 => Self {
                year: self.year - 1,
                month: 12,
            },
            month => Self {
                year: self.year,
                month: month - 1,
            },
        }
    }

    /// Whether `date` falls in this month.
    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year && u8::from(date.month()) == self.month
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = Month::try_from(self.month)
            .map(|month| month.to_string())
            .unwrap_or_else(|_| self.month.to_string());

        write!(f, "{name} {}", self.year)
    }
}
