//! Calendar month keys.
//!
//! A [`MonthKey`] names one calendar month. Series are indexed by month, and the
//! content-event calendar is keyed by it. On the wire it is written `YYYY-MM`.

use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A (year, month) pair. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a month key. `month` is 1-based.
    pub fn new(year: i32, month: u32) -> Result<Self, Error> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(Error::InvalidMonth {
                value: format!("{year}-{month:02}"),
            });
        }
        Ok(MonthKey { year, month })
    }

    /// Month key from literal values, for static parameter tables.
    ///
    /// Panics if `month` is outside 1..=12.
    pub const fn from_literal(year: i32, month: u32) -> Self {
        assert!(month >= 1 && month <= 12, "month out of range");
        MonthKey { year, month }
    }

    /// Month containing the given date.
    pub fn from_date(date: NaiveDate) -> Self {
        MonthKey {
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

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        // Constructors only admit keys whose first day exists.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The following month.
    pub fn succ(&self) -> MonthKey {
        if self.month == 12 {
            MonthKey {
                year: self.year + 1,
                month: 1,
            }
        } else {
            MonthKey {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Months elapsed since `earlier` (negative if `earlier` is later).
    pub fn months_since(&self, earlier: &MonthKey) -> i64 {
        (self.year as i64 - earlier.year as i64) * 12 + (self.month as i64 - earlier.month as i64)
    }

    /// Inclusive iterator over `[self, end]`. Empty when `end < self`.
    pub fn range_inclusive(&self, end: MonthKey) -> MonthRange {
        MonthRange {
            next: Some(*self),
            end,
        }
    }

    /// Number of months in `[self, end]`, zero when `end < self`.
    pub fn span_len(&self, end: &MonthKey) -> usize {
        let diff = end.months_since(self);
        if diff < 0 {
            0
        } else {
            diff as usize + 1
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonth {
            value: s.to_string(),
        };
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        MonthKey::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for MonthKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

impl JsonSchema for MonthKey {
    fn schema_name() -> Cow<'static, str> {
        "MonthKey".into()
    }

    fn json_schema(_generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "type": "string",
            "pattern": "^[0-9]{4}-(0[1-9]|1[0-2])$",
            "description": "Calendar month written as YYYY-MM"
        })
    }
}

/// Inclusive month iterator returned by [`MonthKey::range_inclusive`].
#[derive(Debug, Clone)]
pub struct MonthRange {
    next: Option<MonthKey>,
    end: MonthKey,
}

impl Iterator for MonthRange {
    type Item = MonthKey;

    fn next(&mut self) -> Option<MonthKey> {
        let current = self.next?;
        if current > self.end {
            self.next = None;
            return None;
        }
        self.next = if current == self.end {
            None
        } else {
            Some(current.succ())
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let k = key("2022-03");
        assert_eq!(k.year(), 2022);
        assert_eq!(k.month(), 3);
        assert_eq!(k.to_string(), "2022-03");
        assert!("2022-13".parse::<MonthKey>().is_err());
        assert!("2022".parse::<MonthKey>().is_err());
        assert!("abcd-01".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_succ_wraps_year() {
        assert_eq!(key("2021-12").succ(), key("2022-01"));
        assert_eq!(key("2021-05").succ(), key("2021-06"));
    }

    #[test]
    fn test_range_inclusive_full_year() {
        let months: Vec<_> = key("2022-01").range_inclusive(key("2022-12")).collect();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], key("2022-01"));
        assert_eq!(months[11], key("2022-12"));
        assert_eq!(key("2022-01").span_len(&key("2022-12")), 12);
    }

    #[test]
    fn test_range_empty_when_reversed() {
        assert_eq!(key("2022-05").range_inclusive(key("2022-04")).count(), 0);
        assert_eq!(key("2022-05").span_len(&key("2022-04")), 0);
    }

    #[test]
    fn test_range_single_month() {
        let months: Vec<_> = key("2020-02").range_inclusive(key("2020-02")).collect();
        assert_eq!(months, vec![key("2020-02")]);
    }

    #[test]
    fn test_months_since_across_years() {
        assert_eq!(key("2023-02").months_since(&key("2021-11")), 15);
        assert_eq!(key("2021-11").months_since(&key("2023-02")), -15);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&key("2025-11")).unwrap();
        assert_eq!(json, "\"2025-11\"");
        let back: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key("2025-11"));
        assert!(serde_json::from_str::<MonthKey>("\"2025-00\"").is_err());
    }

    #[test]
    fn test_first_day_and_from_date() {
        let k = key("2024-02");
        let d = k.first_day();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(MonthKey::from_date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()), k);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn range_len_matches_span(
                year in 1900i32..2100,
                month in 1u32..=12,
                span in 0usize..240,
            ) {
                let start = MonthKey::new(year, month).unwrap();
                let mut end = start;
                for _ in 0..span {
                    end = end.succ();
                }
                prop_assert_eq!(start.span_len(&end), span + 1);
                prop_assert_eq!(end.months_since(&start), span as i64);
                prop_assert_eq!(start.range_inclusive(end).count(), span + 1);
                prop_assert_eq!(end.span_len(&start), if span == 0 { 1 } else { 0 });
            }

            #[test]
            fn display_parses_back(year in 0i32..10000, month in 1u32..=12) {
                let k = MonthKey::new(year, month).unwrap();
                prop_assert_eq!(k.to_string().parse::<MonthKey>().unwrap(), k);
            }
        }
    }
}
