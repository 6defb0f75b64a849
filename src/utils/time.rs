use chrono::{DateTime, Local, NaiveDate};

/// This is the standard way of converting a date to a string in goalstep.
pub fn date_to_label(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Returns the calendar day after `date`.
pub fn next_date(date: NaiveDate) -> NaiveDate {
    date.succ_opt().expect("End of time should never happen")
}

pub fn today(now: DateTime<Local>) -> NaiveDate {
    now.date_naive()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{date_to_label, next_date};

    #[test]
    fn test_next_date_crosses_month() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(next_date(date), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_date_label() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(date_to_label(date), "2025-01-05");
    }
}
