//! Date bucket formats for date-range sharding.
//!
//! A bucket format is a strftime pattern restricted to calendar components.
//! Its finest component decides the iteration step: `%Y` steps by year,
//! `%Y%m` by month, anything with a day, weekday, week number, ISO year or
//! day-of-year by day.

use chrono::format::{Fixed, Item, Numeric, StrftimeItems};
use chrono::{Datelike, Months, NaiveDate};
use std::fmt::{self, Write};

use crate::error::{Result, ShardingError};

/// Calendar step implied by a bucket format. Ordered coarse to fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Granularity {
    Year,
    Month,
    Day,
}

impl Granularity {
    /// First day of the bucket containing `date`.
    pub fn truncate(self, date: NaiveDate) -> NaiveDate {
        let truncated = match self {
            Granularity::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
            Granularity::Month => date.with_day(1),
            Granularity::Day => Some(date),
        };
        truncated.unwrap_or(date)
    }

    /// First day of the following bucket, `None` past the calendar's end.
    pub fn step(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Year => date.checked_add_months(Months::new(12)),
            Granularity::Month => date.checked_add_months(Months::new(1)),
            Granularity::Day => date.succ_opt(),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Year => write!(f, "year"),
            Granularity::Month => write!(f, "month"),
            Granularity::Day => write!(f, "day"),
        }
    }
}

fn numeric_granularity(numeric: &Numeric) -> Option<Granularity> {
    match numeric {
        Numeric::Year | Numeric::YearDiv100 | Numeric::YearMod100 => Some(Granularity::Year),
        Numeric::Month => Some(Granularity::Month),
        Numeric::Day
        | Numeric::Ordinal
        | Numeric::WeekFromSun
        | Numeric::WeekFromMon
        | Numeric::IsoWeek
        | Numeric::NumDaysFromSun
        | Numeric::WeekdayFromMon
        // ISO week-based years do not start on 1 January
        | Numeric::IsoYear
        | Numeric::IsoYearDiv100
        | Numeric::IsoYearMod100 => Some(Granularity::Day),
        _ => None,
    }
}

fn fixed_granularity(fixed: &Fixed) -> Option<Granularity> {
    match fixed {
        Fixed::ShortMonthName | Fixed::LongMonthName => Some(Granularity::Month),
        Fixed::ShortWeekdayName | Fixed::LongWeekdayName => Some(Granularity::Day),
        _ => None,
    }
}

/// Validated strftime pattern used to render shard keys from dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketFormat {
    pattern: String,
    granularity: Granularity,
}

impl BucketFormat {
    pub fn parse(pattern: &str) -> Result<Self> {
        let mut finest: Option<Granularity> = None;

        for item in StrftimeItems::new(pattern) {
            let component = match item {
                Item::Literal(_) | Item::Space(_) => continue,
                Item::Numeric(numeric, _) => numeric_granularity(&numeric),
                Item::Fixed(fixed) => fixed_granularity(&fixed),
                Item::Error => {
                    return Err(ShardingError::invalid_policy(format!(
                        "malformed date format '{}'",
                        pattern
                    )))
                }
                _ => None,
            };

            let granularity = component.ok_or_else(|| {
                ShardingError::invalid_policy(format!(
                    "date format '{}' may only contain calendar date components",
                    pattern
                ))
            })?;
            finest = Some(finest.map_or(granularity, |current| current.max(granularity)));
        }

        let granularity = finest.ok_or_else(|| {
            ShardingError::invalid_policy(format!("date format '{}' has no date component", pattern))
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            granularity,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Render the bucket key of `date`.
    pub fn render(&self, date: NaiveDate) -> Result<String> {
        let mut out = String::new();
        write!(out, "{}", date.format(&self.pattern)).map_err(|_| {
            ShardingError::invalid_policy(format!(
                "date format '{}' cannot render {}",
                self.pattern, date
            ))
        })?;
        Ok(out)
    }
}
