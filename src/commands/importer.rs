// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::{params, Connection};
use std::collections::{hash_map::Entry, HashMap};

use crate::models::{TxKind, TxStatus};
use crate::month::MonthKey;
use crate::utils::{parse_amount, parse_date, parse_month};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

// Columns: date,type,name,amount,category,card,status,estimate,competence,effective
fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut category_cache: HashMap<String, i64> = HashMap::new();
    let mut card_cache: HashMap<String, i64> = HashMap::new();
    let mut imported = 0usize;

    for result in rdr.records() {
        let rec = result?;
        let line = rec.position().map(|p| p.line()).unwrap_or(0);
        let field = |i: usize| rec.get(i).unwrap_or("").trim().to_string();

        let date_raw = field(0);
        let kind_raw = field(1);
        let name = field(2);
        let amount_raw = field(3);
        let category = field(4);
        let card = field(5);
        let status_raw = field(6);
        let estimate_raw = field(7);
        let competence_raw = field(8);
        let effective_raw = field(9);

        let date = parse_date(&date_raw).with_context(|| format!("Row {}: bad date", line))?;
        let kind: TxKind = kind_raw
            .parse()
            .with_context(|| format!("Row {}: bad type", line))?;
        if name.is_empty() {
            anyhow::bail!("Row {}: name missing", line);
        }
        let amount = parse_amount(&amount_raw)
            .with_context(|| format!("Row {}: bad amount for '{}'", line, name))?;
        let status: TxStatus = if status_raw.is_empty() {
            TxStatus::Planned
        } else {
            status_raw
                .parse()
                .with_context(|| format!("Row {}: bad status", line))?
        };
        let estimate = if estimate_raw.is_empty() {
            None
        } else {
            Some(
                parse_amount(&estimate_raw)
                    .with_context(|| format!("Row {}: bad estimate", line))?,
            )
        };
        let competence = if competence_raw.is_empty() {
            MonthKey::from_date(date)
        } else {
            parse_month(&competence_raw).with_context(|| format!("Row {}: bad competence", line))?
        };
        let effective = if effective_raw.is_empty() {
            None
        } else {
            Some(parse_date(&effective_raw).with_context(|| format!("Row {}: bad effective", line))?)
        };

        let category_id = if category.is_empty() {
            None
        } else {
            Some(match category_cache.entry(category.clone()) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let fetched: i64 = tx
                        .query_row(
                            "SELECT id FROM categories WHERE name=?1",
                            params![&category],
                            |r| r.get(0),
                        )
                        .with_context(|| format!("Row {}: category '{}' not found", line, category))?;
                    *entry.insert(fetched)
                }
            })
        };
        let card_id = if card.is_empty() {
            None
        } else {
            Some(match card_cache.entry(card.clone()) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let fetched: i64 = tx
                        .query_row("SELECT id FROM cards WHERE name=?1", params![&card], |r| {
                            r.get(0)
                        })
                        .with_context(|| format!("Row {}: card '{}' not found", line, card))?;
                    *entry.insert(fetched)
                }
            })
        };

        tx.execute(
            "INSERT INTO transactions(kind, name, amount, estimated_amount, category_id, card_id,
                                      due_date, effective_date, competence, status)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
            params![
                kind.as_str(),
                name,
                amount.to_string(),
                estimate.map(|d| d.to_string()),
                category_id,
                card_id,
                date.to_string(),
                effective.map(|d| d.to_string()),
                competence.to_string(),
                status.as_str(),
            ],
        )?;
        imported += 1;
    }
    tx.commit()?;
    println!("Imported {} transaction(s) from {}", imported, path);
    Ok(())
}
