// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Category, Transaction, TxKind};
use crate::month::MonthKey;

pub const UNCATEGORIZED: &str = "(uncategorized)";

/// Stable month projection: keeps input order, drops nothing else.
pub fn filter_month(transactions: &[Transaction], month: MonthKey) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|t| month.contains(t.due_date))
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MonthSummary {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
    pub estimated_income: Decimal,
    pub estimated_expense: Decimal,
    pub estimated_balance: Decimal,
}

pub fn aggregate_month(transactions: &[Transaction], month: MonthKey) -> MonthSummary {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    let mut estimated_income = Decimal::ZERO;
    let mut estimated_expense = Decimal::ZERO;

    for t in filter_month(transactions, month) {
        let estimate = t.estimated_amount.unwrap_or(Decimal::ZERO);
        match t.kind {
            TxKind::Income => {
                income += t.amount;
                estimated_income += estimate;
            }
            TxKind::Expense => {
                expense += t.amount;
                estimated_expense += estimate;
            }
        }
    }

    MonthSummary {
        income,
        expense,
        balance: income - expense,
        estimated_income,
        estimated_expense,
        estimated_balance: estimated_income - estimated_expense,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySlice {
    pub category: String,
    pub total: Decimal,
    pub share: f64,
}

/// Expense distribution by category, descending by total. Shares are
/// percentages of the month's expense total; a zero total yields 0 for
/// every slice.
pub fn expense_breakdown(
    transactions: &[Transaction],
    month: MonthKey,
    categories: &[Category],
) -> Vec<CategorySlice> {
    let names: HashMap<i64, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, Decimal> = HashMap::new();
    for t in filter_month(transactions, month) {
        if t.kind != TxKind::Expense {
            continue;
        }
        let name = t
            .category_id
            .and_then(|id| names.get(&id).copied())
            .unwrap_or(UNCATEGORIZED)
            .to_string();
        if !totals.contains_key(&name) {
            order.push(name.clone());
        }
        *totals.entry(name).or_insert(Decimal::ZERO) += t.amount;
    }

    let grand: Decimal = totals.values().sum();
    let mut slices: Vec<CategorySlice> = order
        .into_iter()
        .map(|category| {
            let total = totals[&category];
            let share = if grand.is_zero() {
                0.0
            } else {
                (total / grand * Decimal::from(100))
                    .round_dp(1)
                    .to_f64()
                    .unwrap_or(0.0)
            };
            CategorySlice {
                category,
                total,
                share,
            }
        })
        .collect();
    slices.sort_by(|a, b| b.total.cmp(&a.total));
    slices
}
