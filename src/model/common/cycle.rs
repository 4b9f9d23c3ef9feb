use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Datelike, Utc};
use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Years accepted when parsing a cycle.
const YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCycle {
    #[error("not a year: {0}")]
    NotANumber(#[from] std::num::ParseIntError),
    #[error("year {0} is out of range (1 to 9999)")]
    OutOfRange(i32),
}

/// One run of the draw, identified by its year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cycle(i32);

impl Cycle {
    pub fn new(year: i32) -> Self {
        Self(year)
    }

    /// The cycle for the current UTC year.
    pub fn current() -> Self {
        Self(Utc::now().year())
    }

    /// The cycle immediately before this one. Saturates at `i32::MIN`.
    pub fn previous(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    pub fn year(self) -> i32 {
        self.0
    }
}

impl Display for Cycle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Cycle {
    type Err = InvalidCycle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let year = s.trim().parse()?;
        if YEARS.contains(&year) {
            Ok(Self(year))
        } else {
            Err(InvalidCycle::OutOfRange(year))
        }
    }
}

impl From<Cycle> for Bson {
    fn from(cycle: Cycle) -> Self {
        Bson::Int32(cycle.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previous_is_last_year() {
        assert_eq!(Cycle::new(2025).previous(), Cycle::new(2024));
    }

    #[test]
    fn parses_year() {
        assert_eq!("2024".parse::<Cycle>().unwrap(), Cycle::new(2024));
        assert!(matches!(
            "last year".parse::<Cycle>(),
            Err(InvalidCycle::NotANumber(_))
        ));
    }

    #[test]
    fn rejects_years_out_of_range() {
        assert_eq!(
            "-2147483648".parse::<Cycle>(),
            Err(InvalidCycle::OutOfRange(i32::MIN))
        );
        assert_eq!("0".parse::<Cycle>(), Err(InvalidCycle::OutOfRange(0)));
        assert_eq!("9999".parse::<Cycle>(), Ok(Cycle::new(9999)));
        assert_eq!(Cycle::new(i32::MIN).previous(), Cycle::new(i32::MIN));
    }

    #[test]
    fn current_matches_clock() {
        assert_eq!(Cycle::current().year(), Utc::now().year());
    }
}
