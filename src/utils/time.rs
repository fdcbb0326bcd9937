use chrono::{Datelike, NaiveDate, Weekday};

/// Monday of the calendar week the date falls into. Weekly series buckets
/// key on this.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

/// First day of the date's month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("every month has a first day")
}

/// This is the standard way of labeling a monthly bucket in daylog.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::{month_key, month_start, week_start};

    #[test]
    fn test_week_start_is_monday() {
        // 2024-04-05 is a Friday.
        assert_eq!(
            week_start("2024-04-05".parse().unwrap()),
            "2024-04-01".parse::<chrono::NaiveDate>().unwrap()
        );
        // Mondays map to themselves.
        assert_eq!(
            week_start("2024-04-01".parse().unwrap()),
            "2024-04-01".parse::<chrono::NaiveDate>().unwrap()
        );
        // Sundays still belong to the week started the previous Monday.
        assert_eq!(
            week_start("2024-04-07".parse().unwrap()),
            "2024-04-01".parse::<chrono::NaiveDate>().unwrap()
        );
    }

    #[test]
    fn test_month_helpers() {
        let date: chrono::NaiveDate = "2024-02-29".parse().unwrap();
        assert_eq!(month_start(date), "2024-02-01".parse::<chrono::NaiveDate>().unwrap());
        assert_eq!(month_key(date), "2024-02");
    }
}
