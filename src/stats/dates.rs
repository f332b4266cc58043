// Publication-date breakdowns: day of week, month, hour, and counts over time.
//
// Records without a parseable timestamp are left out of every breakdown and
// reported as `undated`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate, Timelike};
use serde::Serialize;

use crate::news::records::Record;

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateBreakdown {
    /// Monday first
    pub by_weekday: [usize; 7],
    /// January first
    pub by_month: [usize; 12],
    /// Hour 0 first
    pub by_hour: [usize; 24],
    pub dated: usize,
    pub undated: usize,
}

/// Tally publication times by weekday, month and hour.
pub fn breakdown(records: &[Record]) -> DateBreakdown {
    let mut result = DateBreakdown {
        by_weekday: [0; 7],
        by_month: [0; 12],
        by_hour: [0; 24],
        dated: 0,
        undated: 0,
    };

    for record in records {
        match record.published {
            Some(ts) => {
                result.by_weekday[ts.weekday().num_days_from_monday() as usize] += 1;
                result.by_month[ts.month0() as usize] += 1;
                result.by_hour[ts.hour() as usize] += 1;
                result.dated += 1;
            }
            None => result.undated += 1,
        }
    }

    result
}

/// Resampling frequency for `articles_over_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    /// Weeks ending on Sunday
    Weekly,
    /// Calendar months, labelled by their last day
    Monthly,
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "d" | "daily" => Ok(Frequency::Daily),
            "w" | "weekly" => Ok(Frequency::Weekly),
            "m" | "monthly" => Ok(Frequency::Monthly),
            other => Err(format!(
                "unknown frequency '{other}' (expected daily, weekly or monthly)"
            )),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        })
    }
}

impl Frequency {
    /// The label of the bin containing `date`.
    fn bin(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Frequency::Daily => Some(date),
            Frequency::Weekly => {
                let to_sunday = 6 - date.weekday().num_days_from_monday();
                date.checked_add_days(Days::new(to_sunday as u64))
            }
            Frequency::Monthly => month_end(date),
        }
    }

    /// The label of the bin following `label`.
    fn next(self, label: NaiveDate) -> Option<NaiveDate> {
        match self {
            Frequency::Daily => label.checked_add_days(Days::new(1)),
            Frequency::Weekly => label.checked_add_days(Days::new(7)),
            Frequency::Monthly => label.checked_add_days(Days::new(1)).and_then(month_end),
        }
    }
}

fn month_end(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Article counts per bin, from the earliest to the latest dated record.
/// Bins with no articles are included with a zero count.
pub fn articles_over_time(records: &[Record], frequency: Frequency) -> Vec<(NaiveDate, usize)> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for ts in records.iter().filter_map(|r| r.published) {
        if let Some(label) = frequency.bin(ts.date()) {
            *counts.entry(label).or_insert(0) += 1;
        }
    }

    let (Some(&first), Some(&last)) = (counts.keys().next(), counts.keys().next_back()) else {
        return Vec::new();
    };

    let mut series = Vec::new();
    let mut label = Some(first);
    while let Some(current) = label {
        if current > last {
            break;
        }
        series.push((current, counts.get(&current).copied().unwrap_or(0)));
        label = frequency.next(current);
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::records::parse_timestamp;

    fn dated(ts: &str) -> Record {
        Record {
            headline: Some("x".to_string()),
            ticker: "A".to_string(),
            published: parse_timestamp(ts),
            publisher: None,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_breakdown() {
        let records = vec![
            dated("2020-06-05 10:30:54-04:00"), // Friday
            dated("2020-06-08 09:00:00"),       // Monday
            dated("not a date"),
        ];
        let b = breakdown(&records);
        assert_eq!(b.by_weekday[4], 1);
        assert_eq!(b.by_weekday[0], 1);
        assert_eq!(b.by_month[5], 2);
        assert_eq!(b.by_hour[10], 1);
        assert_eq!(b.by_hour[9], 1);
        assert_eq!(b.dated, 2);
        assert_eq!(b.undated, 1);
    }

    #[test]
    fn test_daily_fills_gaps() {
        let records = vec![dated("2020-06-01"), dated("2020-06-03"), dated("2020-06-03")];
        let series = articles_over_time(&records, Frequency::Daily);
        assert_eq!(
            series,
            vec![(ymd(2020, 6, 1), 1), (ymd(2020, 6, 2), 0), (ymd(2020, 6, 3), 2)]
        );
    }

    #[test]
    fn test_weekly_labels_are_sundays() {
        // 2020-06-01 is a Monday; 2020-06-07 a Sunday; 2020-06-08 a Monday.
        let records = vec![dated("2020-06-01"), dated("2020-06-07"), dated("2020-06-08")];
        let series = articles_over_time(&records, Frequency::Weekly);
        assert_eq!(series, vec![(ymd(2020, 6, 7), 2), (ymd(2020, 6, 14), 1)]);
    }

    #[test]
    fn test_monthly_labels_are_month_ends() {
        let records = vec![dated("2020-01-15"), dated("2020-03-02")];
        let series = articles_over_time(&records, Frequency::Monthly);
        assert_eq!(
            series,
            vec![(ymd(2020, 1, 31), 1), (ymd(2020, 2, 29), 0), (ymd(2020, 3, 31), 1)]
        );
    }

    #[test]
    fn test_frequency_from_str() {
        assert_eq!("W".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!("monthly".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert!("hourly".parse::<Frequency>().is_err());
    }
}
