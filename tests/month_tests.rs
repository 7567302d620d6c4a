// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use lifeclip::month::MonthKey;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn parse_display_round_trip() {
    let key: MonthKey = "2025-08".parse().unwrap();
    assert_eq!(key.year(), 2025);
    assert_eq!(key.month(), 8);
    assert_eq!(key.to_string(), "2025-08");
}

#[test]
fn parse_rejects_malformed_keys() {
    assert!("2025".parse::<MonthKey>().is_err());
    assert!("2025-00".parse::<MonthKey>().is_err());
    assert!("2025-13".parse::<MonthKey>().is_err());
    assert!("202508".parse::<MonthKey>().is_err());
    assert!("2025-8x".parse::<MonthKey>().is_err());
}

#[test]
fn prev_and_next_roll_over_year_boundaries() {
    let jan: MonthKey = "2025-01".parse().unwrap();
    assert_eq!(jan.prev().to_string(), "2024-12");
    let dec: MonthKey = "2024-12".parse().unwrap();
    assert_eq!(dec.next().to_string(), "2025-01");
}

#[test]
fn month_lengths_are_leap_aware() {
    assert_eq!("2024-02".parse::<MonthKey>().unwrap().days_in_month(), 29);
    assert_eq!("2025-02".parse::<MonthKey>().unwrap().days_in_month(), 28);
    assert_eq!("2025-04".parse::<MonthKey>().unwrap().days_in_month(), 30);
    assert_eq!("2025-01".parse::<MonthKey>().unwrap().days_in_month(), 31);
}

#[test]
fn clamp_day_caps_at_last_day() {
    let feb25: MonthKey = "2025-02".parse().unwrap();
    assert_eq!(feb25.clamp_day(31), date("2025-02-28"));
    let feb24: MonthKey = "2024-02".parse().unwrap();
    assert_eq!(feb24.clamp_day(31), date("2024-02-29"));
    assert_eq!(feb24.clamp_day(15), date("2024-02-15"));
}

#[test]
fn from_date_is_one_based() {
    let key = MonthKey::from_date(date("2025-01-31"));
    assert_eq!(key.to_string(), "2025-01");
    assert!(key.contains(date("2025-01-01")));
    assert!(!key.contains(date("2025-02-01")));
}
