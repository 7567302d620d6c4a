// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let account = sub.get_one::<String>("account");
            conn.execute(
                "INSERT INTO cards(name, account) VALUES (?1, ?2)",
                params![name, account],
            )?;
            println!("Added card '{}'", name);
        }
        Some(("list", _)) => {
            let mut stmt =
                conn.prepare("SELECT name, account, created_at FROM cards ORDER BY name")?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, Option<String>>(1)?,
                    r.get::<_, String>(2)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (name, account, created) = row?;
                data.push(vec![name, account.unwrap_or_default(), created]);
            }
            println!("{}", pretty_table(&["Card", "Account", "Created"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute("DELETE FROM cards WHERE name=?1", params![name])?;
            println!("Removed card '{}'", name);
        }
        Some(("summary", sub)) => summary(conn, sub)?,
        _ => {}
    }
    Ok(())
}

// Per-month expense totals per card, derived on demand.
fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);

    let mut stmt = conn.prepare(
        "SELECT k.name, substr(t.due_date,1,7) AS month, t.amount
         FROM transactions t JOIN cards k ON t.card_id=k.id
         WHERE t.kind='expense'
         ORDER BY month DESC, k.name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;

    let mut map: BTreeMap<(String, String), Decimal> = BTreeMap::new();
    for row in rows {
        let (card, month, amount_s) = row?;
        let amount = amount_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' on card {}", amount_s, card))?;
        *map.entry((month, card)).or_insert(Decimal::ZERO) += amount;
    }

    let recent: Vec<String> = {
        let mut m: Vec<String> = map.keys().map(|(month, _)| month.clone()).collect();
        m.dedup();
        m.into_iter().rev().take(months).collect()
    };

    let mut data = Vec::new();
    for (month, card) in map.keys().rev() {
        if !recent.contains(month) {
            continue;
        }
        data.push(vec![
            month.clone(),
            card.clone(),
            fmt_money(&map[&(month.clone(), card.clone())]),
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Month", "Card", "Spent"], data));
    }
    Ok(())
}
