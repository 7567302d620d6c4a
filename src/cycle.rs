// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::{CycleRecord, CycleSettings};
use crate::utils::rank_tags;

const CYCLE_LOOKBACK: usize = 6;
const SYMPTOM_LOOKBACK_DAYS: i64 = 90;
const TOP_SYMPTOMS: usize = 5;
const REGULARITY_THRESHOLD: f64 = 4.0;

#[derive(Debug, Clone, Serialize)]
pub struct CycleStats {
    pub cycle_day: u32,
    pub days_until_next_period: u32,
    pub overdue_days: u32,
    pub ovulation_day: u32,
    pub fertile_window_start: u32,
    pub fertile_window_end: u32,
    pub variance: Option<f64>,
    pub is_regular: bool,
    pub top_symptoms: Vec<(String, usize)>,
}

/// Derive cycle statistics from the settings and the record history.
///
/// The cycle day always wraps (1-indexed, mod cycle length); an expected
/// period that has passed is surfaced through `overdue_days` instead of a
/// negative countdown.
pub fn compute_cycle_stats(
    settings: &CycleSettings,
    records: &[CycleRecord],
    today: NaiveDate,
) -> CycleStats {
    let c = i64::from(settings.cycle_length.max(1));
    let elapsed = (today - settings.last_period_start).num_days().max(0);

    let cycle_day = (elapsed % c + 1) as u32;
    let days_until_next_period = (c - i64::from(cycle_day)).max(0) as u32;
    let overdue_days = (elapsed + 1 - c).max(0) as u32;

    let ovulation_day = settings
        .cycle_length
        .saturating_sub(settings.luteal_length)
        .max(1);
    let fertile_window_start = ovulation_day.saturating_sub(5).max(1);
    let fertile_window_end = ovulation_day + 1;

    let lengths = observed_cycle_lengths(records);
    let variance = cycle_variance(&lengths);
    let is_regular = variance.map(|v| v <= REGULARITY_THRESHOLD).unwrap_or(true);

    CycleStats {
        cycle_day,
        days_until_next_period,
        overdue_days,
        ovulation_day,
        fertile_window_start,
        fertile_window_end,
        variance,
        is_regular,
        top_symptoms: top_symptoms(records, today),
    }
}

/// A period start is a bleeding day whose previous calendar day has no
/// bleeding record.
pub fn period_starts(records: &[CycleRecord]) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = records
        .iter()
        .filter(|r| r.flow.is_bleeding())
        .map(|r| r.date)
        .collect();
    days.sort();
    days.dedup();

    let all: HashSet<NaiveDate> = days.iter().copied().collect();
    days.into_iter()
        .filter(|d| !all.contains(&(*d - Duration::days(1))))
        .collect()
}

/// Gaps between consecutive observed period starts, capped to the last
/// few cycles.
pub fn observed_cycle_lengths(records: &[CycleRecord]) -> Vec<i64> {
    let starts = period_starts(records);
    let mut lengths: Vec<i64> = starts
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days())
        .collect();
    if lengths.len() > CYCLE_LOOKBACK {
        lengths = lengths.split_off(lengths.len() - CYCLE_LOOKBACK);
    }
    lengths
}

/// Sample standard deviation of observed cycle lengths; absent with fewer
/// than two observations.
pub fn cycle_variance(lengths: &[i64]) -> Option<f64> {
    if lengths.len() < 2 {
        return None;
    }
    let n = lengths.len() as f64;
    let mean = lengths.iter().sum::<i64>() as f64 / n;
    let sum_sq: f64 = lengths
        .iter()
        .map(|&l| {
            let d = l as f64 - mean;
            d * d
        })
        .sum();
    Some((sum_sq / (n - 1.0)).sqrt())
}

fn top_symptoms(records: &[CycleRecord], today: NaiveDate) -> Vec<(String, usize)> {
    let cutoff = today - Duration::days(SYMPTOM_LOOKBACK_DAYS);
    let mut recent: Vec<&CycleRecord> = records
        .iter()
        .filter(|r| r.date >= cutoff && r.date <= today)
        .collect();
    recent.sort_by_key(|r| r.date);

    let occurrences = recent
        .iter()
        .flat_map(|r| r.symptoms.iter().map(|s| s.as_str()));
    let mut ranked = rank_tags(occurrences);
    ranked.truncate(TOP_SYMPTOMS);
    ranked
}
