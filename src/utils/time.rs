use chrono::{DateTime, Datelike, Local, NaiveDate, Timelike};

/// Week bucket of a date within its month, counted from 1. The day of
/// month is offset by the weekday of the 1st (Monday = 0) so that every
/// bucket covers one calendar week row, Monday through Sunday.
pub fn week_of_month(date: NaiveDate) -> u32 {
    let first_weekday = date
        .with_day(1)
        .unwrap()
        .weekday()
        .num_days_from_monday();
    (date.day() + first_weekday).div_ceil(7)
}

/// Seconds elapsed since local midnight of the same day.
pub fn seconds_since_midnight(moment: DateTime<Local>) -> u32 {
    moment.time().num_seconds_from_midnight()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_week_of_month_matrix() {
        // May 2023 starts on a Monday, so weeks line up with day / 7.
        assert_eq!(week_of_month(date(2023, 5, 1)), 1);
        assert_eq!(week_of_month(date(2023, 5, 7)), 1);
        assert_eq!(week_of_month(date(2023, 5, 8)), 2);
        assert_eq!(week_of_month(date(2023, 5, 28)), 4);
        assert_eq!(week_of_month(date(2023, 5, 31)), 5);

        // March 2026 starts on a Sunday, the worst-case offset.
        assert_eq!(week_of_month(date(2026, 3, 1)), 1);
        assert_eq!(week_of_month(date(2026, 3, 2)), 2);

        // Leap day.
        assert_eq!(week_of_month(date(2024, 2, 1)), 1);
        assert_eq!(week_of_month(date(2024, 2, 29)), 5);
    }

    #[test]
    fn test_seconds_since_midnight() {
        let moment = chrono::Local
            .with_ymd_and_hms(2023, 5, 28, 9, 0, 0)
            .unwrap();
        assert_eq!(seconds_since_midnight(moment), 9 * 3600);

        let midnight = chrono::Local
            .with_ymd_and_hms(2023, 5, 28, 0, 0, 0)
            .unwrap();
        assert_eq!(seconds_since_midnight(midnight), 0);
    }
}
