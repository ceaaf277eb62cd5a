use chrono::{Days, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::models::{BodyMeasurement, HistoryPRExercise};

/// Anything that sits on a calendar day.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for HistoryPRExercise {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for BodyMeasurement {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateWindow {
    Week,
    Month,
    ThreeMonths,
    SixMonths,
    Year,
    #[default]
    All,
}

impl DateWindow {
    pub fn days(self) -> Option<u64> {
        match self {
            DateWindow::Week => Some(7),
            DateWindow::Month => Some(30),
            DateWindow::ThreeMonths => Some(90),
            DateWindow::SixMonths => Some(180),
            DateWindow::Year => Some(365),
            DateWindow::All => None,
        }
    }

    /// First day inside the window, or `None` when nothing is cut off.
    pub fn start(self, today: NaiveDate) -> Option<NaiveDate> {
        self.days()
            .map(|d| today.checked_sub_days(Days::new(d)).unwrap_or(NaiveDate::MIN))
    }

    pub fn contains(self, today: NaiveDate, day: NaiveDate) -> bool {
        self.start(today).is_none_or(|start| day >= start)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DateWindow::Week => "week",
            DateWindow::Month => "month",
            DateWindow::ThreeMonths => "3months",
            DateWindow::SixMonths => "6months",
            DateWindow::Year => "year",
            DateWindow::All => "all",
        }
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" | "7d" => Ok(DateWindow::Week),
            "month" | "30d" => Ok(DateWindow::Month),
            "3months" | "three_months" | "90d" => Ok(DateWindow::ThreeMonths),
            "6months" | "six_months" | "180d" => Ok(DateWindow::SixMonths),
            "year" | "365d" => Ok(DateWindow::Year),
            "all" => Ok(DateWindow::All),
            other => Err(format!("unknown date window: {}", other)),
        }
    }
}

pub fn filter_window<T: Dated>(items: &[T], window: DateWindow, today: NaiveDate) -> Vec<&T> {
    items
        .iter()
        .filter(|item| window.contains(today, item.date()))
        .collect()
}

/// The `n` most recent items, newest first.
pub fn last_n<T: Dated>(items: &[T], n: usize) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| std::cmp::Reverse(item.date()));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct Day(NaiveDate);

    impl Dated for Day {
        fn date(&self) -> NaiveDate {
            self.0
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn days_ago(n: u64) -> NaiveDate {
        today().checked_sub_days(Days::new(n)).unwrap()
    }

    #[rstest]
    #[case(DateWindow::Week, 6, true)]
    #[case(DateWindow::Week, 8, false)]
    #[case(DateWindow::Week, 7, true)]
    #[case(DateWindow::Month, 29, true)]
    #[case(DateWindow::Month, 31, false)]
    #[case(DateWindow::Year, 400, false)]
    #[case(DateWindow::All, 4000, true)]
    fn window_membership(#[case] window: DateWindow, #[case] age: u64, #[case] inside: bool) {
        assert_eq!(window.contains(today(), days_ago(age)), inside);
    }

    #[test]
    fn filter_keeps_recent_records() {
        let records = vec![Day(days_ago(8)), Day(days_ago(6)), Day(days_ago(0))];
        let kept = filter_window(&records, DateWindow::Week, today());
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|d| d.0 >= days_ago(7)));
    }

    #[test]
    fn last_n_sorts_newest_first() {
        let records = vec![Day(days_ago(3)), Day(days_ago(1)), Day(days_ago(9)), Day(days_ago(2))];
        let last: Vec<_> = last_n(&records, 2).into_iter().map(|d| d.0).collect();
        assert_eq!(last, vec![days_ago(1), days_ago(2)]);
        assert_eq!(last_n(&records, 10).len(), 4);
    }

    #[test]
    fn parses_window_names() {
        assert_eq!("week".parse::<DateWindow>().unwrap(), DateWindow::Week);
        assert_eq!("3months".parse::<DateWindow>().unwrap(), DateWindow::ThreeMonths);
        assert!("fortnight".parse::<DateWindow>().is_err());
    }
}
