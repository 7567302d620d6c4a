// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use rusqlite::{params, Connection};

use crate::utils::pretty_table;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let qty = *sub.get_one::<u32>("qty").unwrap();
            conn.execute(
                "INSERT INTO shopping_items(name, quantity) VALUES (?1, ?2)",
                params![name, qty],
            )?;
            println!("Added {} x '{}'", qty, name);
        }
        Some(("list", sub)) => {
            let all = sub.get_flag("all");
            let sql = if all {
                "SELECT id, name, quantity, checked FROM shopping_items ORDER BY id"
            } else {
                "SELECT id, name, quantity, checked FROM shopping_items WHERE checked=0 ORDER BY id"
            };
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, i64>(2)?,
                    r.get::<_, bool>(3)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (id, name, qty, checked) = row?;
                data.push(vec![
                    id.to_string(),
                    name,
                    qty.to_string(),
                    if checked { "x" } else { "" }.to_string(),
                ]);
            }
            println!("{}", pretty_table(&["Id", "Item", "Qty", "Done"], data));
        }
        Some(("check", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute(
                "UPDATE shopping_items SET checked=1 WHERE id=?1",
                params![id],
            )?;
            if n == 0 {
                bail!("Shopping item {} not found", id);
            }
            println!("Checked item {}", id);
        }
        Some(("clear", _)) => {
            let n = conn.execute("DELETE FROM shopping_items WHERE checked=1", [])?;
            println!("Removed {} checked item(s)", n);
        }
        _ => {}
    }
    Ok(())
}
