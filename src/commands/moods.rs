// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::utils::{join_tags, maybe_print_json, parse_date, parse_month, pretty_table, rank_tags, split_tags};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("log", sub)) => log(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("summary", sub)) => summary(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn log(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let rating = *sub.get_one::<u8>("rating").unwrap();
    if rating > 5 {
        bail!("Rating {} out of range, expected 0-5", rating);
    }
    let emotions = sub
        .get_one::<String>("emotions")
        .map(|s| split_tags(s))
        .unwrap_or_default();

    // One entry per date: logging the same day again replaces it.
    conn.execute(
        "INSERT INTO moods(date, rating, emotions) VALUES (?1,?2,?3)
         ON CONFLICT(date) DO UPDATE SET rating=excluded.rating, emotions=excluded.emotions",
        params![date.to_string(), rating, join_tags(&emotions)],
    )?;
    println!("Logged mood {} for {}", rating, date);
    Ok(())
}

#[derive(Serialize)]
pub struct MoodRow {
    pub date: String,
    pub rating: u8,
    pub emotions: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let mut sql = String::from("SELECT date, rating, emotions FROM moods WHERE 1=1");
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(month) = sub.get_one::<String>("month") {
        parse_month(month)?;
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(month.into());
    }
    sql.push_str(" ORDER BY date DESC");

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let emotions: Option<String> = r.get(2)?;
        data.push(MoodRow {
            date: r.get(0)?,
            rating: r.get(1)?,
            emotions: emotions.unwrap_or_default(),
        });
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|m| vec![m.date, m.rating.to_string(), m.emotions])
            .collect();
        println!("{}", pretty_table(&["Date", "Rating", "Emotions"], rows));
    }
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let mut stmt = conn.prepare(
        "SELECT rating, emotions FROM moods WHERE substr(date,1,7)=?1 ORDER BY date",
    )?;
    let rows = stmt.query_map(params![month.to_string()], |r| {
        Ok((r.get::<_, i64>(0)?, r.get::<_, Option<String>>(1)?))
    })?;

    let mut ratings = Vec::new();
    let mut tags: Vec<String> = Vec::new();
    for row in rows {
        let (rating, emotions) = row?;
        ratings.push(rating);
        if let Some(e) = emotions {
            tags.extend(split_tags(&e));
        }
    }
    if ratings.is_empty() {
        println!("No moods logged in {}", month);
        return Ok(());
    }

    let avg = ratings.iter().sum::<i64>() as f64 / ratings.len() as f64;
    let ranked = rank_tags(tags.iter().map(|t| t.as_str()));
    let top = ranked
        .iter()
        .take(5)
        .map(|(tag, n)| format!("{} ({})", tag, n))
        .collect::<Vec<_>>()
        .join(", ");
    let rows = vec![
        vec!["Days logged".to_string(), ratings.len().to_string()],
        vec!["Average rating".to_string(), format!("{:.1}", avg)],
        vec![
            "Top emotions".to_string(),
            if top.is_empty() { "-".to_string() } else { top },
        ],
    ];
    println!("{}", pretty_table(&["Mood", "Value"], rows));
    Ok(())
}
