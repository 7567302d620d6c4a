// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;

use lifeclip::habits::{compute_habit_metrics, WeekPolicy};
use lifeclip::models::{Frequency, Habit};
use lifeclip::month::MonthKey;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dates(days: &[&str]) -> Vec<NaiveDate> {
    days.iter().map(|d| date(d)).collect()
}

fn habit(frequency: &str) -> Habit {
    Habit {
        id: 1,
        name: "test".to_string(),
        frequency: frequency.parse::<Frequency>().unwrap(),
    }
}

fn month(s: &str) -> MonthKey {
    s.parse().unwrap()
}

#[test]
fn daily_gap_resets_current_but_not_best() {
    // days 1-3 done, gap on day 4, today is day 5
    let done = dates(&["2025-03-01", "2025-03-02", "2025-03-03"]);
    let m = compute_habit_metrics(
        &habit("daily"),
        &done,
        month("2025-03"),
        date("2025-03-05"),
        WeekPolicy::Lenient,
    );
    assert_eq!(m.current_streak, 0);
    assert_eq!(m.best_streak, 3);
    // 3 of 5 elapsed days completed
    assert_eq!(m.progress, 60);
}

#[test]
fn uncompleted_today_does_not_break_the_run() {
    let done = dates(&["2025-03-03", "2025-03-04"]);
    let m = compute_habit_metrics(
        &habit("daily"),
        &done,
        month("2025-03"),
        date("2025-03-05"),
        WeekPolicy::Lenient,
    );
    assert_eq!(m.current_streak, 2);
}

#[test]
fn no_completions_means_zero_everything() {
    let m = compute_habit_metrics(
        &habit("daily"),
        &[],
        month("2025-03"),
        date("2025-03-10"),
        WeekPolicy::Lenient,
    );
    assert_eq!(m.current_streak, 0);
    assert_eq!(m.best_streak, 0);
    assert_eq!(m.progress, 0);
}

#[test]
fn weekday_habits_skip_off_days() {
    // 2025-03-03 is a Monday
    let done = dates(&["2025-03-03", "2025-03-05", "2025-03-07"]);
    let m = compute_habit_metrics(
        &habit("weekdays:mon,wed,fri"),
        &done,
        month("2025-03"),
        date("2025-03-08"),
        WeekPolicy::Lenient,
    );
    assert_eq!(m.current_streak, 3);
    assert_eq!(m.best_streak, 3);
    assert_eq!(m.progress, 100);
}

#[test]
fn missed_weekday_breaks_the_run() {
    // Wednesday 2025-03-05 missed
    let done = dates(&["2025-03-03", "2025-03-07"]);
    let m = compute_habit_metrics(
        &habit("weekdays:mon,wed,fri"),
        &done,
        month("2025-03"),
        date("2025-03-08"),
        WeekPolicy::Lenient,
    );
    assert_eq!(m.current_streak, 1);
    assert_eq!(m.best_streak, 1);
    assert_eq!(m.progress, 67);
}

#[test]
fn weekly_quota_weeks_chain_under_the_lenient_policy() {
    // two consecutive weeks, quota of 3 met early in each
    let done = dates(&[
        "2025-02-24",
        "2025-02-25",
        "2025-02-26",
        "2025-03-03",
        "2025-03-04",
        "2025-03-05",
    ]);
    let m = compute_habit_metrics(
        &habit("weekly:3"),
        &done,
        month("2025-03"),
        date("2025-03-09"),
        WeekPolicy::Lenient,
    );
    assert_eq!(m.current_streak, 6);
    assert_eq!(m.best_streak, 6);
}

#[test]
fn eager_policy_expects_every_day_until_the_quota_is_met() {
    // week 1: Mon, Tue, Sat; week 2: Mon, Tue; today Tue of week 2.
    // Lenient forgives the Wed-Fri gap (week met its quota); eager breaks
    // at Friday, where the quota was still 2 of 3.
    let done = dates(&[
        "2025-03-03",
        "2025-03-04",
        "2025-03-08",
        "2025-03-10",
        "2025-03-11",
    ]);
    let lenient = compute_habit_metrics(
        &habit("weekly:3"),
        &done,
        month("2025-03"),
        date("2025-03-11"),
        WeekPolicy::Lenient,
    );
    let eager = compute_habit_metrics(
        &habit("weekly:3"),
        &done,
        month("2025-03"),
        date("2025-03-11"),
        WeekPolicy::Eager,
    );
    assert_eq!(lenient.current_streak, 5);
    assert_eq!(eager.current_streak, 3);
}

#[test]
fn weekly_progress_caps_completions_per_week() {
    let done = dates(&["2025-03-03", "2025-03-04", "2025-03-05"]);
    let m = compute_habit_metrics(
        &habit("weekly:3"),
        &done,
        month("2025-03"),
        date("2025-03-09"),
        WeekPolicy::Lenient,
    );
    // 2 slots in the partial first week + 3 in the second, 3 completed
    assert_eq!(m.progress, 60);
}

#[test]
fn progress_is_zero_before_the_month_starts() {
    let done = dates(&["2025-03-03"]);
    let m = compute_habit_metrics(
        &habit("daily"),
        &done,
        month("2025-04"),
        date("2025-03-15"),
        WeekPolicy::Lenient,
    );
    assert_eq!(m.progress, 0);
}
