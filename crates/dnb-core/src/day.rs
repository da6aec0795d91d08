//! Day-file naming and the rollover date header.
//!
//! Every day of a notebook lives in one file named after its date:
//! ```text
//! <root>/2024/03/20240305.txt
//! ```
//! Only names made of exactly eight digits plus the `.txt` extension are
//! recognised, and the digits must form a real calendar date.

use chrono::{Datelike, NaiveDate};

/// Extension shared by every daily file.
pub const EXTENSION: &str = "txt";

/// `YYYYMMDD` stem for the given date.
#[must_use]
pub fn file_stem(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Full file name (`YYYYMMDD.txt`) for the given date.
#[must_use]
pub fn file_name(date: NaiveDate) -> String {
    format!("{}.{EXTENSION}", file_stem(date))
}

/// Year and month directory segments (`YYYY`, `MM`) for the given date.
#[must_use]
pub fn dir_segments(date: NaiveDate) -> (String, String) {
    (format!("{:04}", date.year()), format!("{:02}", date.month()))
}

/// Parse a daily file name back into its date.
///
/// Returns `None` unless the whole name is eight ASCII digits followed by
/// `.txt` and those digits form a valid calendar date.
#[must_use]
pub fn parse_file_name(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_suffix(EXTENSION)?.strip_suffix('.')?;
    if stem.len() != 8 || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = stem[..4].parse().ok()?;
    let month: u32 = stem[4..6].parse().ok()?;
    let day: u32 = stem[6..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Header line prepended to a rolled-over file, e.g. `"Tuesday, March 5, 2024 \n"`.
///
/// The trailing space before the newline is part of the on-disk format.
#[must_use]
pub fn header_line(date: NaiveDate) -> String {
    format!("{} \n", date.format("%A, %B %-d, %Y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn file_name_is_zero_padded() {
        assert_eq!(file_name(date(2024, 3, 5)), "20240305.txt");
        assert_eq!(
            dir_segments(date(2024, 3, 5)),
            ("2024".to_string(), "03".to_string())
        );
    }

    #[test]
    fn parse_accepts_valid_day_file() {
        assert_eq!(parse_file_name("20240120.txt"), Some(date(2024, 1, 20)));
        assert_eq!(parse_file_name("20240229.txt"), Some(date(2024, 2, 29)));
    }

    #[test]
    fn parse_rejects_impossible_dates() {
        assert_eq!(parse_file_name("20241301.txt"), None);
        assert_eq!(parse_file_name("20230229.txt"), None);
        assert_eq!(parse_file_name("20240100.txt"), None);
    }

    #[test]
    fn parse_rejects_wrong_shapes() {
        assert_eq!(parse_file_name("9999999.txt"), None);
        assert_eq!(parse_file_name("202401011.txt"), None);
        assert_eq!(parse_file_name("x20240101.txt"), None);
        assert_eq!(parse_file_name("20240101.md"), None);
        assert_eq!(parse_file_name("20240101txt"), None);
        assert_eq!(parse_file_name("2024-1-01.txt"), None);
        assert_eq!(parse_file_name("20240101.txt.bak"), None);
    }

    #[test]
    fn header_uses_full_weekday_and_month() {
        assert_eq!(header_line(date(2024, 3, 5)), "Tuesday, March 5, 2024 \n");
        assert_eq!(
            header_line(date(2023, 12, 31)),
            "Sunday, December 31, 2023 \n"
        );
    }

    proptest! {
        #[test]
        fn eight_digit_names_parse_iff_calendar_date(
            y in 0i32..10000,
            m in 0u32..100,
            d in 0u32..100,
        ) {
            let name = format!("{y:04}{m:02}{d:02}.txt");
            prop_assert_eq!(parse_file_name(&name), NaiveDate::from_ymd_opt(y, m, d));
        }

        #[test]
        fn other_digit_counts_never_parse(stem in "[0-9]{1,7}|[0-9]{9,14}") {
            let name = format!("{stem}.txt");
            prop_assert_eq!(parse_file_name(&name), None);
        }
    }
}
