// Unit tests for the exploratory headline statistics.
//
// Loads a small CSV through the record source, then checks headline
// lengths, publisher counts, and the date breakdowns built from it.

use std::io::Write;

use chrono::NaiveDate;

use newslens::news::records::load_records;
use newslens::stats::dates::{articles_over_time, breakdown, Frequency};
use newslens::stats::headlines::{describe, headline_lengths};
use newslens::stats::publishers::articles_per_publisher;

fn fixture() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        b",headline,url,publisher,date,stock\n\
          0,Stocks That Hit 52-Week Highs On Friday,https://a,Benzinga Insights,2020-06-05 10:30:54-04:00,A\n\
          1,Apple beats estimates,https://b,Lisa Levin,2020-06-03 10:45:20-04:00,AAPL\n\
          2,Nvidia raises guidance,https://c,Benzinga Insights,2020-05-22 00:00:00-04:00,NVDA\n\
          3,Amazon price target raised,https://d,Lisa Levin,2020-04-01 16:00:00-04:00,AMZN\n\
          4,Google faces inquiry,https://e,Benzinga Insights,garbage,GOOG\n",
    )
    .unwrap();
    file
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================
// Headline lengths
// ============================================================

#[test]
fn headline_length_summary_from_csv() {
    let records = load_records(fixture().path()).unwrap();
    let lengths: Vec<f64> = headline_lengths(&records)
        .into_iter()
        .map(|n| n as f64)
        .collect();
    assert_eq!(lengths, vec![7.0, 3.0, 3.0, 4.0, 3.0]);

    let s = describe(&lengths).unwrap();
    assert_eq!(s.count, 5);
    assert!((s.mean - 4.0).abs() < 1e-12);
    assert_eq!(s.min, 3.0);
    assert_eq!(s.median, 3.0);
    assert_eq!(s.q75, 4.0);
    assert_eq!(s.max, 7.0);
    // sample variance = (9 + 1 + 1 + 0 + 1) / 4 = 3
    assert!((s.std.unwrap() - 3.0_f64.sqrt()).abs() < 1e-12);
}

#[test]
fn describe_single_value_has_no_std() {
    let s = describe(&[5.0]).unwrap();
    assert_eq!(s.std, None);
    assert_eq!(s.q25, 5.0);
    assert!(describe(&[]).is_none());
}

// ============================================================
// Publishers
// ============================================================

#[test]
fn publishers_ranked_by_article_count() {
    let records = load_records(fixture().path()).unwrap();
    let counts = articles_per_publisher(&records);
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[0].publisher, "Benzinga Insights");
    assert_eq!(counts[0].articles, 3);
    assert_eq!(counts[1].publisher, "Lisa Levin");
    assert_eq!(counts[1].articles, 2);
}

// ============================================================
// Publication dates
// ============================================================

#[test]
fn breakdown_skips_unparseable_dates() {
    let records = load_records(fixture().path()).unwrap();
    let b = breakdown(&records);
    assert_eq!(b.dated, 4);
    assert_eq!(b.undated, 1);
    assert_eq!(b.by_weekday.iter().sum::<usize>(), 4);
    // 2020-06-05 and 2020-05-22 are Fridays, 2020-06-03 and 2020-04-01 are Wednesdays
    assert_eq!(b.by_weekday[4], 2);
    assert_eq!(b.by_weekday[2], 2);
    assert_eq!(b.by_month[5], 2);
    assert_eq!(b.by_month[4], 1);
    assert_eq!(b.by_month[3], 1);
    // Local wall-clock hours are kept
    assert_eq!(b.by_hour[10], 2);
    assert_eq!(b.by_hour[16], 1);
    assert_eq!(b.by_hour[0], 1);
}

#[test]
fn monthly_series_is_zero_filled_and_month_end_labelled() {
    let records = load_records(fixture().path()).unwrap();
    let series = articles_over_time(&records, Frequency::Monthly);
    assert_eq!(
        series,
        vec![
            (ymd(2020, 4, 30), 1),
            (ymd(2020, 5, 31), 1),
            (ymd(2020, 6, 30), 2),
        ]
    );
}

#[test]
fn weekly_series_is_labelled_by_sunday() {
    let records = load_records(fixture().path()).unwrap();
    let series = articles_over_time(&records, Frequency::Weekly);

    assert_eq!(series.first(), Some(&(ymd(2020, 4, 5), 1)));
    assert_eq!(series.last(), Some(&(ymd(2020, 6, 7), 2)));
    assert!(series.windows(2).all(|w| (w[1].0 - w[0].0).num_days() == 7));
    assert_eq!(series.iter().map(|(_, n)| n).sum::<usize>(), 4);
}

#[test]
fn frequency_parses_from_cli_strings() {
    assert_eq!("weekly".parse::<Frequency>(), Ok(Frequency::Weekly));
    assert_eq!("M".parse::<Frequency>(), Ok(Frequency::Monthly));
    assert!("hourly".parse::<Frequency>().is_err());
    assert_eq!(Frequency::Daily.to_string(), "daily");
}
