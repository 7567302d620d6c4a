// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Datelike;

use crate::models::Transaction;
use crate::month::MonthKey;
use crate::summary::filter_month;

/// Plan the carry-forward of the month preceding `target` into `target`.
///
/// Returns an empty plan when the target month already holds any
/// transaction: duplication never merges with existing data. Copies keep
/// every field except the identifier (cleared for the store to assign),
/// the dates (shifted to the target month, day-of-month preserved and
/// clamped to the target's last day) and the competence key.
pub fn plan_carry_forward(transactions: &[Transaction], target: MonthKey) -> Vec<Transaction> {
    if transactions.iter().any(|t| target.contains(t.due_date)) {
        return Vec::new();
    }

    let source = target.prev();
    filter_month(transactions, source)
        .into_iter()
        .map(|t| {
            let mut copy = t.clone();
            copy.id = 0;
            copy.due_date = target.clamp_day(t.due_date.day());
            copy.effective_date = t.effective_date.map(|d| target.clamp_day(d.day()));
            copy.competence = target;
            copy
        })
        .collect()
}
