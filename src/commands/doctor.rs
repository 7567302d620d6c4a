// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::habits::matches_weekday;
use crate::models::Frequency;
use crate::utils::{parse_date, pretty_table};

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Category kind does not match the transactions assigned to it
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, t.kind, c.name FROM transactions t
         JOIN categories c ON t.category_id=c.id
         WHERE (t.kind='expense' AND c.is_income=1)
            OR (t.kind='income' AND c.is_income=0)",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let name: String = r.get(1)?;
        let kind: String = r.get(2)?;
        let cat: String = r.get(3)?;
        rows.push(vec![
            "category_kind_mismatch".into(),
            format!("tx {} '{}' is {} but category '{}' is not", id, name, kind, cat),
        ]);
    }

    // 2) Settled transactions without an effective date
    let mut stmt2 = conn.prepare(
        "SELECT id, name FROM transactions WHERE status='settled' AND effective_date IS NULL",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let name: String = r.get(1)?;
        rows.push(vec![
            "settled_without_effective_date".into(),
            format!("tx {} '{}'", id, name),
        ]);
    }

    // 3) Cycle records logged but settings never configured
    let records: i64 = conn.query_row("SELECT COUNT(*) FROM cycle_records", [], |r| r.get(0))?;
    let settings: i64 = conn.query_row("SELECT COUNT(*) FROM cycle_settings", [], |r| r.get(0))?;
    if records > 0 && settings == 0 {
        rows.push(vec![
            "cycle_settings_missing".into(),
            format!("{} record(s) but no settings", records),
        ]);
    }

    // 4) Completions on weekdays the habit's cadence never expects
    let mut stmt3 = conn.prepare(
        "SELECT h.name, h.frequency, c.date FROM habit_completions c
         JOIN habits h ON c.habit_id=h.id ORDER BY h.name, c.date",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let name: String = r.get(0)?;
        let frequency_s: String = r.get(1)?;
        let date_s: String = r.get(2)?;
        let frequency: Frequency = frequency_s.parse()?;
        let date = parse_date(&date_s)?;
        if !matches_weekday(&frequency, date) {
            rows.push(vec![
                "unexpected_completion".into(),
                format!("habit '{}' marked on {} ({})", name, date, date.format("%a")),
            ]);
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
