use crate::entities::Granularity;
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::ops::RangeInclusive;

/// Years a canonical token can carry: exactly four digits.
pub const YEARS: RangeInclusive<i32> = 0..=9999;

/// A naive calendar position at year, month or day precision.
///
/// The canonical text form is `YYYY`, `YYYY-MM` or `YYYY-MM-DD`. Tokens order
/// chronologically when they share a precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateToken {
    year: i32,
    month: Option<u32>,
    day: Option<u32>,
}

impl DateToken {
    pub fn from_year(year: i32) -> Option<Self> {
        if !YEARS.contains(&year) {
            return None;
        }
        Some(Self {
            year,
            month: None,
            day: None,
        })
    }

    pub fn from_year_month(year: i32, month: u32) -> Option<Self> {
        if !YEARS.contains(&year) || !(1..=12).contains(&month) {
            return None;
        }
        Some(Self {
            year,
            month: Some(month),
            day: None,
        })
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        if !YEARS.contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, day)?;
        Some(Self {
            year,
            month: Some(month),
            day: Some(day),
        })
    }

    /// The token for `date` at the given precision.
    pub fn from_naive(date: NaiveDate, granularity: Granularity) -> Self {
        let full = Self {
            year: date.year(),
            month: Some(date.month()),
            day: Some(date.day()),
        };
        full.with_granularity(granularity)
    }

    /// Parses `raw` at `granularity`. Finer input is truncated, coarser or
    /// malformed input yields `None`.
    pub fn parse(raw: Option<&str>, granularity: Granularity) -> Option<Self> {
        let token = Self::parse_str(raw?)?;
        token.truncate(granularity)
    }

    /// Parses `raw` only when its precision is exactly `granularity`.
    pub fn parse_exact(raw: &str, granularity: Granularity) -> Option<Self> {
        Self::parse_str(raw).filter(|token| token.granularity() == granularity)
    }

    fn parse_str(raw: &str) -> Option<Self> {
        let parts: Vec<&str> = raw.split('-').collect();
        let year = parse_field(parts.first()?, 4, 4)? as i32;

        match parts.as_slice() {
            [_] => Self::from_year(year),
            [_, month] => Self::from_year_month(year, parse_field(month, 1, 2)?),
            [_, month, day] => Self::from_ymd(year, parse_field(month, 1, 2)?, parse_field(day, 1, 2)?),
            _ => None,
        }
    }

    pub fn granularity(&self) -> Granularity {
        match (self.month, self.day) {
            (None, _) => Granularity::Year,
            (Some(_), None) => Granularity::Month,
            (Some(_), Some(_)) => Granularity::Date,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    /// Drops fields finer than `granularity`. `None` when the token is coarser.
    pub fn truncate(self, granularity: Granularity) -> Option<Self> {
        if self.granularity() < granularity {
            return None;
        }
        Some(self.with_granularity(granularity))
    }

    /// Coarsens by truncation, refines by appending January or the 1st.
    pub fn with_granularity(self, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Year => Self {
                year: self.year,
                month: None,
                day: None,
            },
            Granularity::Month => Self {
                year: self.year,
                month: Some(self.month.unwrap_or(1)),
                day: None,
            },
            Granularity::Date => Self {
                year: self.year,
                month: Some(self.month.unwrap_or(1)),
                day: Some(self.day.unwrap_or(1)),
            },
        }
    }

    /// Like [`with_granularity`](Self::with_granularity), but refines to the
    /// last month or day, so an upper bound keeps covering its whole period.
    pub fn with_granularity_at_end(self, granularity: Granularity) -> Self {
        let month = self.month.unwrap_or(12);
        match granularity {
            Granularity::Year => self.with_granularity(Granularity::Year),
            Granularity::Month => Self {
                year: self.year,
                month: Some(month),
                day: None,
            },
            Granularity::Date => Self {
                year: self.year,
                month: Some(month),
                day: Some(self.day.unwrap_or_else(|| days_in_month(self.year, month))),
            },
        }
    }

    /// The same month and day in `year`. The day is clamped to the length of
    /// the target month (Feb 29 becomes Feb 28 outside leap years). `None`
    /// when `year` has no four-digit form.
    pub fn with_year(self, year: i32) -> Option<Self> {
        if !YEARS.contains(&year) {
            return None;
        }
        let day = match (self.month, self.day) {
            (Some(month), Some(day)) => Some(day.min(days_in_month(year, month))),
            _ => None,
        };
        Some(Self {
            year,
            month: self.month,
            day,
        })
    }

    pub fn to_naive_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month.unwrap_or(1), self.day.unwrap_or(1))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for DateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "-{:02}", month)?;
        }
        if let Some(day) = self.day {
            write!(f, "-{:02}", day)?;
        }
        Ok(())
    }
}

fn parse_field(raw: &str, min_len: usize, max_len: usize) -> Option<u32> {
    if raw.len() < min_len || raw.len() > max_len || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Number of days in `month` of `year`, or 0 for a month outside 1..=12.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };

    next.and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(raw: &str) -> Option<DateToken> {
        DateToken::parse(Some(raw), Granularity::Month)
    }

    #[test]
    fn test_canonical_strings_survive_parse_and_format() {
        let cases = [
            ("1999", Granularity::Year),
            ("2013-05", Granularity::Month),
            ("2024-02-29", Granularity::Date),
            ("0001-12-31", Granularity::Date),
        ];
        for (raw, granularity) in cases {
            let token = DateToken::parse(Some(raw), granularity).unwrap();
            assert_eq!(token.to_string(), raw);
        }
    }

    #[test]
    fn test_parse_fails_softly() {
        assert_eq!(DateToken::parse(None, Granularity::Month), None);
        assert_eq!(month(""), None);
        assert_eq!(month("invalid month"), None);
        assert_eq!(month("2013-13"), None);
        assert_eq!(month("2013-00"), None);
        assert_eq!(month("13-05"), None);
        assert_eq!(month("2013-05-07-01"), None);
        assert_eq!(month("2013-+5"), None);
        assert_eq!(DateToken::parse(Some("2023-02-29"), Granularity::Date), None);
    }

    #[test]
    fn test_parse_truncates_finer_input() {
        assert_eq!(month("2013-05-07").unwrap().to_string(), "2013-05");
        assert_eq!(
            DateToken::parse(Some("2005-11-01"), Granularity::Year).unwrap().to_string(),
            "2005"
        );
    }

    #[test]
    fn test_parse_rejects_coarser_input() {
        assert_eq!(month("2013"), None);
        assert_eq!(DateToken::parse(Some("2013-05"), Granularity::Date), None);
    }

    #[test]
    fn test_parse_accepts_unpadded_month() {
        let token = month("2013-5").unwrap();
        assert_eq!(token.month(), Some(5));
        assert_eq!(token.to_string(), "2013-05");
    }

    #[test]
    fn test_parse_exact_requires_matching_precision() {
        assert!(DateToken::parse_exact("2013-05", Granularity::Month).is_some());
        assert!(DateToken::parse_exact("2013-05-07", Granularity::Month).is_none());
        assert!(DateToken::parse_exact("2013", Granularity::Month).is_none());
    }

    #[test]
    fn test_with_year_clamps_leap_day() {
        let leap = DateToken::from_ymd(2024, 2, 29).unwrap();
        assert_eq!(leap.with_year(2023).unwrap().to_string(), "2023-02-28");
        assert_eq!(leap.with_year(2028).unwrap().to_string(), "2028-02-29");
        assert_eq!(month("2013-05").unwrap().with_year(2012).unwrap().to_string(), "2012-05");
    }

    #[test]
    fn test_with_granularity() {
        let token = DateToken::from_ymd(2013, 5, 7).unwrap();
        assert_eq!(token.with_granularity(Granularity::Month).to_string(), "2013-05");
        assert_eq!(
            DateToken::from_year(2013).unwrap().with_granularity(Granularity::Date).to_string(),
            "2013-01-01"
        );
    }

    #[test]
    fn test_with_granularity_at_end() {
        let month = month("2013-08").unwrap();
        assert_eq!(month.with_granularity_at_end(Granularity::Date).to_string(), "2013-08-31");

        let leap_year = DateToken::from_year(2024).unwrap();
        assert_eq!(leap_year.with_granularity_at_end(Granularity::Month).to_string(), "2024-12");
        assert_eq!(leap_year.with_granularity_at_end(Granularity::Date).to_string(), "2024-12-31");

        let date = DateToken::from_ymd(2013, 8, 20).unwrap();
        assert_eq!(date.with_granularity_at_end(Granularity::Month).to_string(), "2013-08");
    }

    #[test]
    fn test_years_outside_four_digits_are_rejected() {
        assert_eq!(DateToken::from_year(10000), None);
        assert_eq!(DateToken::from_year(-1), None);
        assert_eq!(DateToken::from_year_month(10000, 1), None);
        assert_eq!(DateToken::from_ymd(-1, 12, 31), None);
        assert!(DateToken::from_year(0).is_some());
        assert!(DateToken::from_ymd(9999, 12, 31).is_some());

        let may = month("9999-05").unwrap();
        assert_eq!(may.with_year(10000), None);
    }

    #[test]
    fn test_ordering_is_chronological() {
        let mut tokens = vec![month("2013-07").unwrap(), month("2012-12").unwrap(), month("2013-01").unwrap()];
        tokens.sort();
        let sorted: Vec<String> = tokens.iter().map(ToString::to_string).collect();
        assert_eq!(sorted, ["2012-12", "2013-01", "2013-07"]);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 12), 31);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 13), 0);
    }
}
