// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use rusqlite::{params, Connection};

use crate::utils::{parse_amount, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let price = sub
                .get_one::<String>("price")
                .map(|s| parse_amount(s))
                .transpose()?;
            let priority = *sub.get_one::<u32>("priority").unwrap();
            let url = sub.get_one::<String>("url");
            let notes = sub.get_one::<String>("notes");
            conn.execute(
                "INSERT INTO wishlist_items(name, price, priority, url, notes) VALUES (?1,?2,?3,?4,?5)",
                params![name, price.map(|d| d.to_string()), priority, url, notes],
            )?;
            println!("Added '{}' to the wishlist", name);
        }
        Some(("list", sub)) => {
            let all = sub.get_flag("all");
            let sql = if all {
                "SELECT id, name, price, priority, url, purchased FROM wishlist_items
                 ORDER BY priority DESC, id"
            } else {
                "SELECT id, name, price, priority, url, purchased FROM wishlist_items
                 WHERE purchased=0 ORDER BY priority DESC, id"
            };
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, Option<String>>(2)?,
                    r.get::<_, i64>(3)?,
                    r.get::<_, Option<String>>(4)?,
                    r.get::<_, bool>(5)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (id, name, price, priority, url, purchased) = row?;
                data.push(vec![
                    id.to_string(),
                    name,
                    price.unwrap_or_default(),
                    priority.to_string(),
                    url.unwrap_or_default(),
                    if purchased { "yes" } else { "" }.to_string(),
                ]);
            }
            println!(
                "{}",
                pretty_table(&["Id", "Item", "Price", "Priority", "Url", "Bought"], data)
            );
        }
        Some(("bought", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute(
                "UPDATE wishlist_items SET purchased=1 WHERE id=?1",
                params![id],
            )?;
            if n == 0 {
                bail!("Wishlist item {} not found", id);
            }
            println!("Marked item {} as bought", id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute("DELETE FROM wishlist_items WHERE id=?1", params![id])?;
            if n == 0 {
                bail!("Wishlist item {} not found", id);
            }
            println!("Removed item {}", id);
        }
        _ => {}
    }
    Ok(())
}
