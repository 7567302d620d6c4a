// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::models::{Frequency, Habit};
use crate::month::MonthKey;

/// How `weekly:N` habits treat days without a completion.
///
/// `Eager` is the strict calendar reading: every day of a week is expected
/// until that week has accumulated N completions, and a missed expected day
/// breaks a streak. `Lenient` (the default) only requires the weekly count:
/// a day without a completion is forgiven once its week met the quota, or
/// while the current week is still in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekPolicy {
    Eager,
    #[default]
    Lenient,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HabitMetrics {
    pub progress: u32,
    pub current_streak: u32,
    pub best_streak: u32,
}

pub fn compute_habit_metrics(
    habit: &Habit,
    completions: &[NaiveDate],
    month: MonthKey,
    today: NaiveDate,
    policy: WeekPolicy,
) -> HabitMetrics {
    let done: BTreeSet<NaiveDate> = completions.iter().copied().collect();
    HabitMetrics {
        progress: progress(&habit.frequency, &done, month, today),
        current_streak: current_streak(&habit.frequency, &done, today, policy),
        best_streak: best_streak(&habit.frequency, &done, today, policy),
    }
}

/// True when the cadence rule permits a completion on this weekday to count.
pub fn matches_weekday(frequency: &Frequency, date: NaiveDate) -> bool {
    match frequency {
        Frequency::Daily | Frequency::TimesPerWeek(_) => true,
        Frequency::Weekdays(days) => days.contains(&date.weekday()),
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Percentage of expected days completed within the month, counting only
/// days up to `today`. Rounded to an integer; 0 when nothing is expected
/// yet.
pub fn progress(
    frequency: &Frequency,
    done: &BTreeSet<NaiveDate>,
    month: MonthKey,
    today: NaiveDate,
) -> u32 {
    let start = month.first_day();
    let end = month.last_day().min(today);
    if end < start {
        return 0;
    }

    let (expected, completed) = match frequency {
        Frequency::Daily => {
            let expected = (end - start).num_days() as u32 + 1;
            let completed = done.range(start..=end).count() as u32;
            (expected, completed)
        }
        Frequency::Weekdays(days) => {
            let mut expected = 0;
            let mut completed = 0;
            let mut d = start;
            while d <= end {
                if days.contains(&d.weekday()) {
                    expected += 1;
                    if done.contains(&d) {
                        completed += 1;
                    }
                }
                d = d + Duration::days(1);
            }
            (expected, completed)
        }
        Frequency::TimesPerWeek(n) => {
            // Per week: min(n, days of the week inside the window) slots,
            // completions capped at n.
            let mut week_days: HashMap<NaiveDate, (u32, u32)> = HashMap::new();
            let mut d = start;
            while d <= end {
                let entry = week_days.entry(week_start(d)).or_insert((0, 0));
                entry.0 += 1;
                if done.contains(&d) {
                    entry.1 += 1;
                }
                d = d + Duration::days(1);
            }
            let mut expected = 0;
            let mut completed = 0;
            for (days_in_week, done_in_week) in week_days.values() {
                expected += (*n).min(*days_in_week);
                completed += (*n).min(*done_in_week);
            }
            (expected, completed)
        }
    };

    if expected == 0 {
        0
    } else {
        (f64::from(completed) / f64::from(expected) * 100.0).round() as u32
    }
}

/// Consecutive completed expected days ending at `today`. Days the cadence
/// does not expect are skipped; an uncompleted `today` does not break the
/// run (the day is not over), any earlier gap does.
pub fn current_streak(
    frequency: &Frequency,
    done: &BTreeSet<NaiveDate>,
    today: NaiveDate,
    policy: WeekPolicy,
) -> u32 {
    let Some(earliest) = done.iter().next().copied() else {
        return 0;
    };
    let week_counts = per_week_counts(done);
    let floor = week_start(earliest);

    let mut streak = 0;
    let mut d = today;
    while d >= floor {
        if done.contains(&d) {
            streak += 1;
        } else if !forgiven(frequency, done, &week_counts, d, today, policy) {
            break;
        }
        d = d - Duration::days(1);
    }
    streak
}

/// Longest run of consecutive completed expected days anywhere in history.
pub fn best_streak(
    frequency: &Frequency,
    done: &BTreeSet<NaiveDate>,
    today: NaiveDate,
    policy: WeekPolicy,
) -> u32 {
    let Some(earliest) = done.iter().next().copied() else {
        return 0;
    };
    let week_counts = per_week_counts(done);

    let mut best = 0;
    let mut run = 0;
    let mut d = earliest;
    while d <= today {
        if done.contains(&d) {
            run += 1;
            best = best.max(run);
        } else if !forgiven(frequency, done, &week_counts, d, today, policy) {
            run = 0;
        }
        d = d + Duration::days(1);
    }
    best
}

fn per_week_counts(done: &BTreeSet<NaiveDate>) -> HashMap<NaiveDate, u32> {
    let mut counts: HashMap<NaiveDate, u32> = HashMap::new();
    for d in done {
        *counts.entry(week_start(*d)).or_insert(0) += 1;
    }
    counts
}

// Whether an uncompleted day leaves a streak intact.
fn forgiven(
    frequency: &Frequency,
    done: &BTreeSet<NaiveDate>,
    week_counts: &HashMap<NaiveDate, u32>,
    day: NaiveDate,
    today: NaiveDate,
    policy: WeekPolicy,
) -> bool {
    if day == today {
        return true;
    }
    match frequency {
        Frequency::Daily => false,
        Frequency::Weekdays(days) => !days.contains(&day.weekday()),
        Frequency::TimesPerWeek(n) => match policy {
            WeekPolicy::Lenient => {
                week_start(day) == week_start(today)
                    || week_counts.get(&week_start(day)).copied().unwrap_or(0) >= *n
            }
            WeekPolicy::Eager => {
                // Expected until the week has seen its Nth completion.
                let before = done.range(week_start(day)..day).count() as u32;
                before >= *n
            }
        },
    }
}
