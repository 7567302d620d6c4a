// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::{params, Connection};

use crate::models::Category;
use crate::utils::{id_for_category, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let is_income = sub.get_flag("income");
            let parent_id = sub
                .get_one::<String>("parent")
                .map(|p| id_for_category(conn, p))
                .transpose()?;
            conn.execute(
                "INSERT INTO categories(name, parent_id, is_income) VALUES (?1, ?2, ?3)",
                params![name, parent_id, is_income],
            )?;
            println!(
                "Added {} category '{}'",
                if is_income { "income" } else { "expense" },
                name
            );
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare(
                "SELECT c.name, p.name, c.is_income
                 FROM categories c LEFT JOIN categories p ON c.parent_id=p.id
                 ORDER BY c.name",
            )?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, Option<String>>(1)?,
                    r.get::<_, bool>(2)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (name, parent, is_income) = row?;
                data.push(vec![
                    name,
                    parent.unwrap_or_default(),
                    if is_income { "income" } else { "expense" }.to_string(),
                ]);
            }
            println!("{}", pretty_table(&["Category", "Parent", "Kind"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute("DELETE FROM categories WHERE name=?1", params![name])?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

pub fn load_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt =
        conn.prepare("SELECT id, name, parent_id, is_income FROM categories ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            parent_id: r.get(2)?,
            is_income: r.get(3)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
