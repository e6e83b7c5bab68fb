use chrono::{Datelike, NaiveDate, Weekday};

/// Current UTC calendar day, the same day history entries are keyed by.
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Single-letter weekday label used by the weekly history view.
pub fn weekday_initial(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "M",
        Weekday::Tue => "T",
        Weekday::Wed => "W",
        Weekday::Thu => "T",
        Weekday::Fri => "F",
        Weekday::Sat => "S",
        Weekday::Sun => "S",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_initial() {
        // 2023-10-24 was a Tuesday
        let d = NaiveDate::from_ymd_opt(2023, 10, 24).unwrap();
        assert_eq!(weekday_initial(d), "T");
        assert_eq!(weekday_initial(d.succ_opt().unwrap()), "W");
    }
}
