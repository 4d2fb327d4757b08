//! Calendar-day formatting and day arithmetic.
//!
//! Streak dates are stored in the en-US short form `M/D/YYYY` without zero
//! padding (`12/12/2021`, `1/5/2022`).

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

const US_FORMAT_OUT: &str = "%-m/%-d/%Y";
const US_FORMAT_IN: &str = "%m/%d/%Y";
const ISO_FORMAT: &str = "%Y-%m-%d";

/// Format a calendar day as `M/D/YYYY`.
pub fn formatted_date(date: NaiveDate) -> String {
    date.format(US_FORMAT_OUT).to_string()
}

/// Parse a stored calendar day.
///
/// Accepts `M/D/YYYY` with or without zero padding, and ISO `YYYY-MM-DD`.
pub fn parse_formatted_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, US_FORMAT_IN)
        .or_else(|_| NaiveDate::parse_from_str(s, ISO_FORMAT))
        .ok()
}

/// Whole days between two instants, rounded up: `ceil(|left - right| / 1 day)`.
///
/// Any nonzero gap shorter than a day counts as one day.
pub fn difference_in_days(left: NaiveDateTime, right: NaiveDateTime) -> i64 {
    let diff = (left - right).abs();
    let whole = diff.num_days();
    if diff > Duration::days(whole) {
        whole + 1
    } else {
        whole
    }
}

/// Absolute difference in calendar days, ignoring time of day.
pub fn calendar_days_between(left: NaiveDate, right: NaiveDate) -> i64 {
    (left - right).num_days().abs()
}

/// The first instant of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Serde adapter storing a [`NaiveDate`] as `M/D/YYYY`.
pub mod us_format {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::formatted_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_formatted_date(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid calendar date: {raw:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        day(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn formats_without_zero_padding() {
        assert_eq!(formatted_date(day(2021, 12, 12)), "12/12/2021");
        assert_eq!(formatted_date(day(2022, 1, 5)), "1/5/2022");
    }

    #[test]
    fn parses_padded_unpadded_and_iso() {
        assert_eq!(parse_formatted_date("12/12/2021"), Some(day(2021, 12, 12)));
        assert_eq!(parse_formatted_date("1/5/2022"), Some(day(2022, 1, 5)));
        assert_eq!(parse_formatted_date("01/05/2022"), Some(day(2022, 1, 5)));
        assert_eq!(parse_formatted_date("2022-01-05"), Some(day(2022, 1, 5)));
    }

    #[test]
    fn rejects_garbage_dates() {
        assert_eq!(parse_formatted_date(""), None);
        assert_eq!(parse_formatted_date("yesterday"), None);
        assert_eq!(parse_formatted_date("13/40/2021"), None);
    }

    #[test]
    fn difference_rounds_partial_days_up() {
        let base = at(2021, 12, 12, 0, 0);
        assert_eq!(difference_in_days(base, base), 0);
        assert_eq!(difference_in_days(at(2021, 12, 12, 0, 1), base), 1);
        assert_eq!(difference_in_days(at(2021, 12, 13, 0, 0), base), 1);
        assert_eq!(difference_in_days(at(2021, 12, 13, 1, 0), base), 2);
    }

    #[test]
    fn difference_is_symmetric() {
        let a = at(2021, 12, 12, 0, 0);
        let b = at(2021, 12, 15, 0, 0);
        assert_eq!(difference_in_days(a, b), 3);
        assert_eq!(difference_in_days(b, a), 3);
    }

    #[test]
    fn calendar_difference_ignores_time_of_day() {
        assert_eq!(calendar_days_between(day(2021, 12, 13), day(2021, 12, 12)), 1);
        assert_eq!(calendar_days_between(day(2021, 12, 12), day(2021, 12, 15)), 3);
        assert_eq!(calendar_days_between(day(2021, 12, 31), day(2022, 1, 1)), 1);
    }
}
