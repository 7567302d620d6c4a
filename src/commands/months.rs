// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::commands::{categories, transactions};
use crate::recurrence::plan_carry_forward;
use crate::summary::{aggregate_month, expense_breakdown, CategorySlice, MonthSummary};
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("open", sub)) => open(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct MonthReport {
    month: String,
    summary: MonthSummary,
    breakdown: Vec<CategorySlice>,
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;

    let txs = transactions::transactions_in_month(conn, month)?;
    let cats = categories::load_categories(conn)?;
    let report = MonthReport {
        month: month.to_string(),
        summary: aggregate_month(&txs, month),
        breakdown: expense_breakdown(&txs, month, &cats),
    };

    if maybe_print_json(json_flag, jsonl_flag, &report)? {
        return Ok(());
    }

    let s = &report.summary;
    let totals = vec![
        vec![
            "Income".to_string(),
            fmt_money(&s.income),
            fmt_money(&s.estimated_income),
        ],
        vec![
            "Expense".to_string(),
            fmt_money(&s.expense),
            fmt_money(&s.estimated_expense),
        ],
        vec![
            "Balance".to_string(),
            fmt_money(&s.balance),
            fmt_money(&s.estimated_balance),
        ],
    ];
    println!("{}", pretty_table(&["", "Actual", "Estimated"], totals));

    let dist: Vec<Vec<String>> = report
        .breakdown
        .iter()
        .map(|b| {
            vec![
                b.category.clone(),
                fmt_money(&b.total),
                format!("{:.1}%", b.share),
            ]
        })
        .collect();
    if !dist.is_empty() {
        println!("{}", pretty_table(&["Category", "Spent", "Share"], dist));
    }
    Ok(())
}

/// Ensure a month has data: when the target month is empty, copy the
/// previous month's transactions into it. The whole batch runs in one
/// SQL transaction that re-checks emptiness immediately before inserting,
/// so a racing second invocation cannot double-fill the month.
fn open(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let target = parse_month(sub.get_one::<String>("month").unwrap())?;
    let source = target.prev();

    let existing = transactions::transactions_in_month(conn, target)?;
    if !existing.is_empty() {
        println!(
            "Month {} already has {} transaction(s), nothing to do",
            target,
            existing.len()
        );
        return Ok(());
    }
    let pool = transactions::transactions_in_month(conn, source)?;

    let plan = plan_carry_forward(&pool, target);
    if plan.is_empty() {
        println!("Month {} has nothing to carry forward", source);
        return Ok(());
    }

    let tx = conn.transaction()?;
    let count: i64 = tx.query_row(
        "SELECT COUNT(*) FROM transactions WHERE substr(due_date,1,7)=?1",
        params![target.to_string()],
        |r| r.get(0),
    )?;
    if count > 0 {
        // Someone filled the month since we planned; drop the batch.
        println!("Month {} is no longer empty, aborting carry-forward", target);
        return Ok(());
    }
    for t in &plan {
        tx.execute(
            "INSERT INTO transactions(kind, name, amount, estimated_amount, category_id, card_id,
                                      due_date, effective_date, competence, status,
                                      installment_index, installment_total)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
            params![
                t.kind.as_str(),
                t.name,
                t.amount.to_string(),
                t.estimated_amount.map(|d| d.to_string()),
                t.category_id,
                t.card_id,
                t.due_date.to_string(),
                t.effective_date.map(|d| d.to_string()),
                t.competence.to_string(),
                t.status.as_str(),
                t.installment_index,
                t.installment_total,
            ],
        )?;
    }
    tx.commit()?;
    println!(
        "Carried {} transaction(s) from {} into {}",
        plan.len(),
        source,
        target
    );
    Ok(())
}
