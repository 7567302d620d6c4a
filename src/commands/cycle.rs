// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::cycle::compute_cycle_stats;
use crate::models::{CycleRecord, CycleSettings, Flow};
use crate::utils::{join_tags, maybe_print_json, parse_date, pretty_table, split_tags};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("settings", sub)) => settings(conn, sub)?,
        Some(("log", sub)) => log(conn, sub)?,
        Some(("stats", sub)) => stats(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn load_settings(conn: &Connection) -> Result<Option<CycleSettings>> {
    let row = conn
        .query_row(
            "SELECT last_period_start, cycle_length, period_length, luteal_length
             FROM cycle_settings WHERE id=1",
            [],
            |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, u32>(1)?,
                    r.get::<_, u32>(2)?,
                    r.get::<_, u32>(3)?,
                ))
            },
        )
        .optional()?;
    match row {
        Some((start, cycle, period, luteal)) => Ok(Some(CycleSettings {
            last_period_start: parse_date(&start)?,
            cycle_length: cycle,
            period_length: period,
            luteal_length: luteal,
        })),
        None => Ok(None),
    }
}

pub fn load_records(conn: &Connection) -> Result<Vec<CycleRecord>> {
    let mut stmt =
        conn.prepare("SELECT date, flow, symptoms, notes FROM cycle_records ORDER BY date")?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(0)?;
        let flow: String = r.get(1)?;
        let symptoms: Option<String> = r.get(2)?;
        out.push(CycleRecord {
            date: parse_date(&date)?,
            flow: flow.parse::<Flow>()?,
            symptoms: symptoms.map(|s| split_tags(&s)).unwrap_or_default(),
            notes: r.get(3)?,
        });
    }
    Ok(out)
}

fn settings(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let last_period = sub
        .get_one::<String>("last-period")
        .map(|s| parse_date(s))
        .transpose()?;
    let cycle_length = sub.get_one::<u32>("cycle-length").copied();
    let period_length = sub.get_one::<u32>("period-length").copied();
    let luteal_length = sub.get_one::<u32>("luteal-length").copied();

    let existing = load_settings(conn)?;
    let changing = last_period.is_some()
        || cycle_length.is_some()
        || period_length.is_some()
        || luteal_length.is_some();

    if changing {
        let base = match (existing, last_period) {
            (Some(s), _) => CycleSettings {
                last_period_start: last_period.unwrap_or(s.last_period_start),
                ..s
            },
            (None, Some(start)) => CycleSettings {
                last_period_start: start,
                cycle_length: 28,
                period_length: 5,
                luteal_length: 14,
            },
            (None, None) => bail!("No cycle settings yet, set --last-period first"),
        };
        let merged = CycleSettings {
            cycle_length: cycle_length.unwrap_or(base.cycle_length),
            period_length: period_length.unwrap_or(base.period_length),
            luteal_length: luteal_length.unwrap_or(base.luteal_length),
            ..base
        };
        if merged.cycle_length == 0 || merged.luteal_length >= merged.cycle_length {
            bail!("Luteal length must be shorter than the cycle length");
        }
        conn.execute(
            "INSERT INTO cycle_settings(id, last_period_start, cycle_length, period_length, luteal_length)
             VALUES (1, ?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                last_period_start=excluded.last_period_start,
                cycle_length=excluded.cycle_length,
                period_length=excluded.period_length,
                luteal_length=excluded.luteal_length",
            params![
                merged.last_period_start.to_string(),
                merged.cycle_length,
                merged.period_length,
                merged.luteal_length
            ],
        )?;
        println!("Cycle settings updated");
        return Ok(());
    }

    match existing {
        Some(s) => {
            let rows = vec![
                vec!["Last period start".to_string(), s.last_period_start.to_string()],
                vec!["Cycle length".to_string(), s.cycle_length.to_string()],
                vec!["Period length".to_string(), s.period_length.to_string()],
                vec!["Luteal length".to_string(), s.luteal_length.to_string()],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        None => println!("No cycle settings yet, set --last-period first"),
    }
    Ok(())
}

fn log(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let flow: Flow = sub.get_one::<String>("flow").unwrap().parse()?;
    let symptoms = sub
        .get_one::<String>("symptoms")
        .map(|s| split_tags(s))
        .unwrap_or_default();
    let notes = sub.get_one::<String>("notes").map(|s| s.to_string());

    // One record per date: logging the same day again replaces it.
    conn.execute(
        "INSERT INTO cycle_records(date, flow, symptoms, notes) VALUES (?1,?2,?3,?4)
         ON CONFLICT(date) DO UPDATE SET
            flow=excluded.flow, symptoms=excluded.symptoms, notes=excluded.notes",
        params![date.to_string(), flow.as_str(), join_tags(&symptoms), notes],
    )?;
    println!("Logged {} ({})", date, flow);
    Ok(())
}

fn stats(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let Some(settings) = load_settings(conn)? else {
        bail!("No cycle settings yet, set --last-period first");
    };
    let today = match sub.get_one::<String>("today") {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };
    let records = load_records(conn)?;
    let stats = compute_cycle_stats(&settings, &records, today);

    if maybe_print_json(json_flag, false, &stats)? {
        return Ok(());
    }

    let regularity = match stats.variance {
        Some(v) => format!(
            "{} (sd {:.1} d)",
            if stats.is_regular { "regular" } else { "irregular" },
            v
        ),
        None => "regular (not enough history)".to_string(),
    };
    let symptoms = if stats.top_symptoms.is_empty() {
        "-".to_string()
    } else {
        stats
            .top_symptoms
            .iter()
            .map(|(tag, n)| format!("{} ({})", tag, n))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let rows = vec![
        vec!["Cycle day".to_string(), stats.cycle_day.to_string()],
        vec![
            "Days until next period".to_string(),
            stats.days_until_next_period.to_string(),
        ],
        vec!["Overdue by".to_string(), format!("{} d", stats.overdue_days)],
        vec!["Ovulation day".to_string(), stats.ovulation_day.to_string()],
        vec![
            "Fertile window".to_string(),
            format!(
                "day {} - {}",
                stats.fertile_window_start, stats.fertile_window_end
            ),
        ],
        vec!["Regularity".to_string(), regularity],
        vec!["Top symptoms".to_string(), symptoms],
    ];
    println!("{}", pretty_table(&["Cycle", "Value"], rows));
    Ok(())
}
