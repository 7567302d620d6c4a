// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use rusqlite::{params, Connection};

use crate::utils::{join_tags, pretty_table, split_tags};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let title = sub.get_one::<String>("title").unwrap();
            let path = sub.get_one::<String>("path").unwrap();
            let tags = sub
                .get_one::<String>("tags")
                .map(|s| split_tags(s))
                .unwrap_or_default();
            conn.execute(
                "INSERT INTO documents(title, path, tags) VALUES (?1,?2,?3)",
                params![title, path, join_tags(&tags)],
            )?;
            println!("Registered document '{}'", title);
        }
        Some(("list", sub)) => {
            let tag = sub.get_one::<String>("tag");
            let mut stmt = conn
                .prepare("SELECT id, title, path, tags, added_at FROM documents ORDER BY title")?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, Option<String>>(3)?,
                    r.get::<_, String>(4)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (id, title, path, tags, added) = row?;
                let tag_list = tags.map(|t| split_tags(&t)).unwrap_or_default();
                if let Some(wanted) = tag {
                    if !tag_list.iter().any(|t| t == wanted) {
                        continue;
                    }
                }
                data.push(vec![id.to_string(), title, path, tag_list.join(","), added]);
            }
            println!(
                "{}",
                pretty_table(&["Id", "Title", "Path", "Tags", "Added"], data)
            );
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute("DELETE FROM documents WHERE id=?1", params![id])?;
            if n == 0 {
                bail!("Document {} not found", id);
            }
            println!("Removed document {}", id);
        }
        _ => {}
    }
    Ok(())
}
