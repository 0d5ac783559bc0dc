//! Calendar-day identity for the pill tracker.
//!
//! Every date that crosses the wire or participates in a log identity check
//! goes through [`DateKey`], so there is exactly one place that decides what
//! "the same day" means. The key is a pure (year, month, day) value with no
//! time-of-day and no time zone attached; building one never round-trips
//! through UTC, which keeps the calendar day stable near local midnight.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Canonical, timezone-independent calendar-day identifier.
///
/// Two keys are equal iff they name the same (year, month, day). The canonical
/// string form is always `YYYY-MM-DD` and is identical no matter which
/// constructor produced the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Build a key directly from calendar fields. Returns `None` for days
    /// that do not exist (Feb 30, month 13, ...).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Build a key from the calendar fields of an already-resolved date.
    ///
    /// The fields are taken exactly as the date displays them; there is no
    /// projection through UTC.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today according to the local clock's calendar fields.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

/// Error produced when a string does not name a calendar day or month.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid calendar date: {input:?}")]
pub struct DateParseError {
    input: String,
}

impl FromStr for DateKey {
    type Err = DateParseError;

    /// Parses the canonical `YYYY-MM-DD` form. A trailing `T...` time part is
    /// tolerated and ignored, since stores have been observed returning full
    /// timestamps in date fields.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date_part = s.split('T').next().unwrap_or(s);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DateParseError {
                input: s.to_string(),
            })
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// A calendar month, the unit of navigation for the tracker.
///
/// The month number is validated on every construction path, so day-of-month
/// lookups inside the type cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Returns `None` unless `month` is in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month containing today, per the local clock.
    pub fn current() -> Self {
        Self::of(DateKey::today())
    }

    /// The month containing `date`.
    pub fn of(date: DateKey) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn prev(&self) -> Self {
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

    pub fn next(&self) -> Self {
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

    /// Number of days in this month, leap years included.
    pub fn days(&self) -> u32 {
        match self.month {
            2 => {
                if is_leap_year(self.year) {
                    29
                } else {
                    28
                }
            }
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// The key for `day` of this month, or `None` when the day is out of
    /// range.
    pub fn day(&self, day: u32) -> Option<DateKey> {
        DateKey::from_ymd(self.year, self.month, day)
    }

    pub fn first_day(&self) -> DateKey {
        DateKey(first_of(self.year, self.month))
    }

    pub fn last_day(&self) -> DateKey {
        DateKey(first_of(self.year, self.month) + chrono::Days::new(u64::from(self.days() - 1)))
    }

    /// Inclusive first-to-last-day range, the bounds sent to the store when
    /// loading this month's logs.
    pub fn range(&self) -> MonthRange {
        MonthRange {
            start: self.first_day(),
            end: self.last_day(),
        }
    }

    pub fn contains(&self, date: DateKey) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn name(&self) -> &'static str {
        match self.month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            _ => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}

impl FromStr for Month {
    type Err = DateParseError;

    /// Parses the `YYYY-MM` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DateParseError {
            input: s.to_string(),
        };
        let (year, month) = s.split_once('-').ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        Month::new(year, month).ok_or_else(err)
    }
}

/// Inclusive calendar-day range covering one displayed month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub start: DateKey,
    pub end: DateKey,
}

impl MonthRange {
    pub fn contains(&self, date: DateKey) -> bool {
        self.start <= date && date <= self.end
    }
}

fn first_of(year: i32, month: u32) -> NaiveDate {
    // month is in 1..=12 on every Month construction path, so day 1 exists
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default()
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}
