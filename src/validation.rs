//! Validated value types shared by the record kinds.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Error;

/// A validated, non-empty name, e.g. for a category, goal or recurring transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Name(String);

impl Name {
    /// Create a name, trimming surrounding whitespace.
    ///
    /// `field` names the thing being named and is used in the error message.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyName] if `name` is empty or only whitespace.
    pub fn new(name: &str, field: &'static str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyName(field))
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty
    /// invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A positive, finite amount of money.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
pub struct Amount(f64);

impl Amount {
    /// Create an amount.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidAmount] if `amount` is not finite or not greater than zero.
    pub fn new(amount: f64) -> Result<Self, Error> {
        if amount.is_finite() && amount > 0.0 {
            Ok(Self(amount))
        } else {
            Err(Error::InvalidAmount(amount))
        }
    }

    /// The amount as a float.
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Amount {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

/// The day of the month a recurring transaction is due on, from 1 to 31.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DayOfMonth(u8);

impl DayOfMonth {
    /// Create a day of the month.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidDayOfMonth] if `day` is not in the range 1 to 31.
    pub fn new(day: i64) -> Result<Self, Error> {
        match u8::try_from(day) {
            Ok(day @ 1..=31) => Ok(Self(day)),
            _ => Err(Error::InvalidDayOfMonth(day)),
        }
    }

    /// The day as an integer.
    pub fn get(&self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod name_tests {
    use crate::{Error, validation::Name};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(Name::new("", "category name"), Err(Error::EmptyName("category name")));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(Name::new("\n\t \r", "goal name"), Err(Error::EmptyName("goal name")));
    }

    #[test]
    fn new_trims_whitespace() {
        let name = Name::new("  Rent ", "name").unwrap();

        assert_eq!(name.as_ref(), "Rent");
    }
}
