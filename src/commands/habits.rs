// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::habits::{compute_habit_metrics, WeekPolicy};
use crate::models::{Frequency, Habit};
use crate::month::MonthKey;
use crate::utils::{
    get_week_policy, id_for_habit, maybe_print_json, parse_date, parse_month, pretty_table,
    set_week_policy,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", _)) => list(conn)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("done", sub)) => mark(conn, sub, true)?,
        Some(("undo", sub)) => mark(conn, sub, false)?,
        Some(("stats", sub)) => stats(conn, sub)?,
        Some(("policy", sub)) => policy(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn policy(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    match sub.get_one::<String>("set").map(|s| s.as_str()) {
        Some("eager") => {
            set_week_policy(conn, WeekPolicy::Eager)?;
            println!("Weekly-quota policy set to eager");
        }
        Some("lenient") => {
            set_week_policy(conn, WeekPolicy::Lenient)?;
            println!("Weekly-quota policy set to lenient");
        }
        Some(other) => bail!("Invalid policy '{}', expected eager|lenient", other),
        None => {
            let current = match get_week_policy(conn)? {
                WeekPolicy::Eager => "eager",
                WeekPolicy::Lenient => "lenient",
            };
            println!("Weekly-quota policy: {}", current);
        }
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    if name.is_empty() {
        bail!("Habit name must not be empty");
    }
    let frequency: Frequency = sub.get_one::<String>("frequency").unwrap().parse()?;
    conn.execute(
        "INSERT INTO habits(name, frequency) VALUES (?1, ?2)",
        params![name, frequency.to_string()],
    )?;
    println!("Added habit '{}' ({})", name, frequency);
    Ok(())
}

fn list(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(
        "SELECT h.name, h.frequency, COUNT(c.id), MAX(c.date)
         FROM habits h LEFT JOIN habit_completions c ON c.habit_id=h.id
         GROUP BY h.id ORDER BY h.name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, i64>(2)?,
            r.get::<_, Option<String>>(3)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (name, frequency, count, last) = row?;
        data.push(vec![
            name,
            frequency,
            count.to_string(),
            last.unwrap_or_default(),
        ]);
    }
    println!(
        "{}",
        pretty_table(&["Habit", "Frequency", "Done", "Last"], data)
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let n = conn.execute("DELETE FROM habits WHERE name=?1", params![name])?;
    if n == 0 {
        bail!("Habit '{}' not found", name);
    }
    println!("Removed habit '{}'", name);
    Ok(())
}

fn mark(conn: &Connection, sub: &clap::ArgMatches, done: bool) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let habit_id = id_for_habit(conn, name)?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };
    if done {
        let n = conn.execute(
            "INSERT OR IGNORE INTO habit_completions(habit_id, date) VALUES (?1, ?2)",
            params![habit_id, date.to_string()],
        )?;
        if n == 0 {
            println!("'{}' was already marked for {}", name, date);
        } else {
            println!("Marked '{}' done for {}", name, date);
        }
    } else {
        let n = conn.execute(
            "DELETE FROM habit_completions WHERE habit_id=?1 AND date=?2",
            params![habit_id, date.to_string()],
        )?;
        if n == 0 {
            println!("'{}' had no mark for {}", name, date);
        } else {
            println!("Unmarked '{}' for {}", name, date);
        }
    }
    Ok(())
}

pub fn load_habit(conn: &Connection, name: &str) -> Result<Habit> {
    let (id, frequency_s): (i64, String) = conn
        .query_row(
            "SELECT id, frequency FROM habits WHERE name=?1",
            params![name],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .with_context(|| format!("Habit '{}' not found", name))?;
    Ok(Habit {
        id,
        name: name.to_string(),
        frequency: frequency_s.parse()?,
    })
}

pub fn load_completions(conn: &Connection, habit_id: i64) -> Result<Vec<NaiveDate>> {
    let mut stmt =
        conn.prepare("SELECT date FROM habit_completions WHERE habit_id=?1 ORDER BY date")?;
    let mut rows = stmt.query(params![habit_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(0)?;
        out.push(parse_date(&date)?);
    }
    Ok(out)
}

#[derive(Serialize)]
struct HabitReport {
    habit: String,
    month: String,
    progress: u32,
    current_streak: u32,
    best_streak: u32,
}

fn stats(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let name = sub.get_one::<String>("name").unwrap();
    let habit = load_habit(conn, name)?;
    let completions = load_completions(conn, habit.id)?;

    let today = match sub.get_one::<String>("today") {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };
    let month = match sub.get_one::<String>("month") {
        Some(s) => parse_month(s)?,
        None => MonthKey::from_date(today),
    };
    let policy = match sub.get_one::<String>("policy").map(|s| s.as_str()) {
        Some("eager") => WeekPolicy::Eager,
        Some("lenient") => WeekPolicy::Lenient,
        Some(other) => bail!("Invalid policy '{}', expected eager|lenient", other),
        None => get_week_policy(conn)?,
    };

    let metrics = compute_habit_metrics(&habit, &completions, month, today, policy);
    let report = HabitReport {
        habit: habit.name.clone(),
        month: month.to_string(),
        progress: metrics.progress,
        current_streak: metrics.current_streak,
        best_streak: metrics.best_streak,
    };
    if maybe_print_json(json_flag, false, &report)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Habit".to_string(), habit.name],
        vec!["Month".to_string(), month.to_string()],
        vec!["Progress".to_string(), format!("{}%", metrics.progress)],
        vec![
            "Current streak".to_string(),
            metrics.current_streak.to_string(),
        ],
        vec!["Best streak".to_string(), metrics.best_streak.to_string()],
    ];
    println!("{}", pretty_table(&["Habit", "Value"], rows));
    Ok(())
}
