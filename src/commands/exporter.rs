// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT t.due_date, t.kind, t.name, t.amount, c.name AS category, k.name AS card,
                t.status, t.estimated_amount, t.competence, t.effective_date
         FROM transactions t
         LEFT JOIN categories c ON t.category_id=c.id
         LEFT JOIN cards k ON t.card_id=k.id
         ORDER BY t.due_date, t.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, Option<String>>(7)?,
            r.get::<_, String>(8)?,
            r.get::<_, Option<String>>(9)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "type",
                "name",
                "amount",
                "category",
                "card",
                "status",
                "estimate",
                "competence",
                "effective",
            ])?;
            for row in rows {
                let (d, kind, name, amount, cat, card, status, est, competence, eff) = row?;
                wtr.write_record([
                    d,
                    kind,
                    name,
                    amount,
                    cat.unwrap_or_default(),
                    card.unwrap_or_default(),
                    status,
                    est.unwrap_or_default(),
                    competence,
                    eff.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, kind, name, amount, cat, card, status, est, competence, eff) = row?;
                items.push(json!({
                    "date": d, "type": kind, "name": name, "amount": amount,
                    "category": cat, "card": card, "status": status,
                    "estimate": est, "competence": competence, "effective": eff
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
