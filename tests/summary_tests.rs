// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use lifeclip::models::{Category, Transaction, TxKind, TxStatus};
use lifeclip::month::MonthKey;
use lifeclip::summary::{aggregate_month, expense_breakdown, filter_month, UNCATEGORIZED};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn tx(
    id: i64,
    kind: TxKind,
    amount: &str,
    due: &str,
    category_id: Option<i64>,
    estimate: Option<&str>,
) -> Transaction {
    Transaction {
        id,
        kind,
        name: format!("tx-{}", id),
        amount: dec(amount),
        estimated_amount: estimate.map(dec),
        category_id,
        card_id: None,
        due_date: date(due),
        effective_date: None,
        competence: MonthKey::from_date(date(due)),
        status: TxStatus::Planned,
        installment_index: None,
        installment_total: None,
    }
}

fn cat(id: i64, name: &str) -> Category {
    Category {
        id,
        name: name.to_string(),
        parent_id: None,
        is_income: false,
    }
}

#[test]
fn aggregate_sums_by_kind_within_the_month() {
    let txs = vec![
        tx(1, TxKind::Income, "1000", "2025-08-01", None, Some("1000")),
        tx(2, TxKind::Expense, "300", "2025-08-10", None, Some("250")),
        tx(3, TxKind::Expense, "50", "2025-08-31", None, None),
        // outside the month, must not count
        tx(4, TxKind::Expense, "999", "2025-07-31", None, None),
        tx(5, TxKind::Income, "999", "2025-09-01", None, None),
    ];
    let month: MonthKey = "2025-08".parse().unwrap();
    let s = aggregate_month(&txs, month);
    assert_eq!(s.income, dec("1000"));
    assert_eq!(s.expense, dec("350"));
    assert_eq!(s.balance, dec("650"));
    // estimates default to zero when absent
    assert_eq!(s.estimated_income, dec("1000"));
    assert_eq!(s.estimated_expense, dec("250"));
    assert_eq!(s.estimated_balance, dec("750"));
    assert!(s.expense >= Decimal::ZERO);
}

#[test]
fn filter_is_pure_and_keeps_input_order() {
    let txs = vec![
        tx(3, TxKind::Expense, "1", "2025-08-20", None, None),
        tx(1, TxKind::Expense, "1", "2025-08-05", None, None),
        tx(2, TxKind::Expense, "1", "2025-07-05", None, None),
    ];
    let month: MonthKey = "2025-08".parse().unwrap();
    let first: Vec<i64> = filter_month(&txs, month).iter().map(|t| t.id).collect();
    let second: Vec<i64> = filter_month(&txs, month).iter().map(|t| t.id).collect();
    assert_eq!(first, vec![3, 1]);
    assert_eq!(first, second);
}

#[test]
fn breakdown_is_sorted_descending_by_total() {
    let cats = vec![cat(1, "A"), cat(2, "B"), cat(3, "C")];
    let txs = vec![
        tx(1, TxKind::Expense, "10", "2025-08-01", Some(1), None),
        tx(2, TxKind::Expense, "30", "2025-08-02", Some(2), None),
        tx(3, TxKind::Expense, "20", "2025-08-03", Some(3), None),
        // income never shows up in the expense distribution
        tx(4, TxKind::Income, "500", "2025-08-04", Some(2), None),
    ];
    let month: MonthKey = "2025-08".parse().unwrap();
    let slices = expense_breakdown(&txs, month, &cats);
    let names: Vec<&str> = slices.iter().map(|s| s.category.as_str()).collect();
    assert_eq!(names, vec!["B", "C", "A"]);
    assert_eq!(slices[0].total, dec("30"));
    assert!((slices[0].share - 50.0).abs() < 1e-9);
}

#[test]
fn zero_total_yields_zero_shares() {
    let cats = vec![cat(1, "A"), cat(2, "B")];
    let txs = vec![
        tx(1, TxKind::Expense, "0", "2025-08-01", Some(1), None),
        tx(2, TxKind::Expense, "0", "2025-08-02", Some(2), None),
    ];
    let month: MonthKey = "2025-08".parse().unwrap();
    let slices = expense_breakdown(&txs, month, &cats);
    assert_eq!(slices.len(), 2);
    for s in &slices {
        assert_eq!(s.share, 0.0);
        assert!(s.share.is_finite());
    }
}

#[test]
fn unknown_category_groups_under_placeholder() {
    let txs = vec![tx(1, TxKind::Expense, "5", "2025-08-01", None, None)];
    let month: MonthKey = "2025-08".parse().unwrap();
    let slices = expense_breakdown(&txs, month, &[]);
    assert_eq!(slices.len(), 1);
    assert_eq!(slices[0].category, UNCATEGORIZED);
    assert!((slices[0].share - 100.0).abs() < 1e-9);
}
