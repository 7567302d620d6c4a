// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;

use lifeclip::cycle::{compute_cycle_stats, cycle_variance, observed_cycle_lengths, period_starts};
use lifeclip::models::{CycleRecord, CycleSettings, Flow};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn settings(start: &str, cycle: u32) -> CycleSettings {
    CycleSettings {
        last_period_start: date(start),
        cycle_length: cycle,
        period_length: 5,
        luteal_length: 14,
    }
}

fn record(day: &str, flow: Flow, symptoms: &[&str]) -> CycleRecord {
    CycleRecord {
        date: date(day),
        flow,
        symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        notes: None,
    }
}

#[test]
fn cycle_day_arithmetic_matches_the_reference_case() {
    let s = settings("2024-01-01", 28);
    let stats = compute_cycle_stats(&s, &[], date("2024-01-15"));
    assert_eq!(stats.cycle_day, 15);
    assert_eq!(stats.days_until_next_period, 13);
    assert_eq!(stats.overdue_days, 0);
    assert_eq!(stats.ovulation_day, 14);
    assert_eq!(stats.fertile_window_start, 9);
    assert_eq!(stats.fertile_window_end, 15);
}

#[test]
fn overdue_period_is_surfaced_not_clamped_negative() {
    let s = settings("2024-01-01", 28);
    let stats = compute_cycle_stats(&s, &[], date("2024-01-29"));
    // the day counter wraps into a presumed new cycle
    assert_eq!(stats.cycle_day, 1);
    assert_eq!(stats.overdue_days, 1);

    let later = compute_cycle_stats(&s, &[], date("2024-02-03"));
    assert_eq!(later.overdue_days, 6);
}

#[test]
fn period_starts_require_a_gap_before_a_bleeding_day() {
    let records = vec![
        record("2024-01-01", Flow::Moderate, &[]),
        record("2024-01-02", Flow::Heavy, &[]),
        record("2024-01-03", Flow::Light, &[]),
        record("2024-01-10", Flow::None, &["cramps"]),
        record("2024-01-29", Flow::Light, &[]),
        record("2024-01-30", Flow::Moderate, &[]),
    ];
    let starts = period_starts(&records);
    assert_eq!(starts, vec![date("2024-01-01"), date("2024-01-29")]);
    assert_eq!(observed_cycle_lengths(&records), vec![28]);
}

#[test]
fn variance_needs_at_least_two_observed_lengths() {
    assert_eq!(cycle_variance(&[]), None);
    assert_eq!(cycle_variance(&[28]), None);
    let v = cycle_variance(&[28, 28, 28]).unwrap();
    assert!(v.abs() < 1e-9);
}

#[test]
fn regularity_threshold_splits_stable_and_erratic_histories() {
    let stable = vec![
        record("2024-01-01", Flow::Light, &[]),
        record("2024-01-29", Flow::Light, &[]),
        record("2024-02-26", Flow::Light, &[]),
    ];
    let s = settings("2024-02-26", 28);
    let stats = compute_cycle_stats(&s, &stable, date("2024-03-05"));
    assert!(stats.is_regular);
    assert!(stats.variance.unwrap() < 4.0);

    let erratic = vec![
        record("2024-01-01", Flow::Light, &[]),
        record("2024-01-21", Flow::Light, &[]),
        record("2024-02-20", Flow::Light, &[]),
    ];
    let stats = compute_cycle_stats(&s, &erratic, date("2024-03-05"));
    assert!(!stats.is_regular);
    assert!(stats.variance.unwrap() > 4.0);
}

#[test]
fn top_symptoms_rank_by_frequency_then_first_occurrence() {
    let records = vec![
        record("2024-03-01", Flow::Light, &["cramps", "headache"]),
        record("2024-03-02", Flow::Light, &["cramps"]),
        record("2024-03-03", Flow::None, &["fatigue"]),
    ];
    let s = settings("2024-03-01", 28);
    let stats = compute_cycle_stats(&s, &records, date("2024-03-10"));
    let names: Vec<&str> = stats
        .top_symptoms
        .iter()
        .map(|(tag, _)| tag.as_str())
        .collect();
    assert_eq!(names, vec!["cramps", "headache", "fatigue"]);
    assert_eq!(stats.top_symptoms[0].1, 2);
}

#[test]
fn symptoms_outside_the_lookback_window_are_ignored() {
    let records = vec![
        record("2023-01-01", Flow::Light, &["ancient"]),
        record("2024-03-01", Flow::Light, &["cramps"]),
    ];
    let s = settings("2024-03-01", 28);
    let stats = compute_cycle_stats(&s, &records, date("2024-03-10"));
    assert_eq!(stats.top_symptoms.len(), 1);
    assert_eq!(stats.top_symptoms[0].0, "cramps");
}
