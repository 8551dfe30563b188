use crate::grid::Cell;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};

/// Serial dates decoding outside this year range are rejected.
pub const MIN_SERIAL_YEAR: i32 = 1901;
pub const MAX_SERIAL_YEAR: i32 = 2099;

const TEXT_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y年%m月%d日", "%m/%d/%Y"];

pub fn decode_cell(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Empty => None,
        Cell::Number(serial) => decode_serial(*serial),
        Cell::Text(text) => parse_date_text(text),
    }
}

pub fn parse_date_text(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    for format in TEXT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Some(date);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

/// Decodes a 1900-system spreadsheet serial (serial 1 = 1900-01-01).
///
/// Serial 60 is the phantom 1900-02-29 the format inherited; serials above it
/// are offset by one day to compensate. The time-of-day fraction is dropped.
pub fn decode_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let days = Duration::try_days(serial.trunc() as i64)?;
    let date = if days.num_days() < 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?.checked_add_signed(days)?
    } else if days.num_days() == 60 {
        // 1900-02-29 does not exist; the year is out of range anyway.
        return None;
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_signed(days)?
    };
    if (MIN_SERIAL_YEAR..=MAX_SERIAL_YEAR).contains(&date.year()) {
        Some(date)
    } else {
        None
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Builds `year-month-day`, clamping the day to the month's last day.
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last_day = next_month.pred_opt()?.day();
    first.with_day(day.clamp(1, last_day))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn serial_dates_decode_in_the_1900_system() {
        assert_eq!(decode_serial(45658.0), Some(d(2025, 1, 1)));
        assert_eq!(decode_serial(45726.75), Some(d(2025, 3, 10)));
        assert_eq!(decode_serial(367.0), Some(d(1901, 1, 1)));
        assert_eq!(decode_serial(73050.0), Some(d(2099, 12, 31)));
    }

    #[test]
    fn serial_dates_outside_year_range_are_rejected() {
        assert_eq!(decode_serial(73051.0), None);
        assert_eq!(decode_serial(366.0), None);
        assert_eq!(decode_serial(-18260.0), None);
        assert_eq!(decode_serial(f64::NAN), None);
    }

    #[test]
    fn huge_serials_are_rejected_without_overflow() {
        assert_eq!(decode_serial(2_958_466.0), None);
        assert_eq!(decode_serial(1e14), None);
        assert_eq!(decode_serial(1e15), None);
        assert_eq!(decode_serial(f64::MAX), None);
    }

    #[test]
    fn text_dates_accept_common_formats() {
        assert_eq!(parse_date_text("2025-01-10"), Some(d(2025, 1, 10)));
        assert_eq!(parse_date_text("2025/1/10"), Some(d(2025, 1, 10)));
        assert_eq!(parse_date_text("2025年1月10日"), Some(d(2025, 1, 10)));
        assert_eq!(parse_date_text("01/10/2025"), Some(d(2025, 1, 10)));
        assert_eq!(parse_date_text("2025-01-10T09:30:00+09:00"), Some(d(2025, 1, 10)));
        assert_eq!(parse_date_text("2025-01-10 09:30:00"), Some(d(2025, 1, 10)));
        assert_eq!(parse_date_text("soon"), None);
        assert_eq!(parse_date_text("2025-02-30"), None);
    }

    #[test]
    fn clamped_date_caps_day_of_month() {
        assert_eq!(clamped_date(2025, 2, 31), Some(d(2025, 2, 28)));
        assert_eq!(clamped_date(2024, 2, 29), Some(d(2024, 2, 29)));
        assert_eq!(clamped_date(2025, 12, 31), Some(d(2025, 12, 31)));
    }
}
