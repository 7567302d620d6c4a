// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::models::{Transaction, TxKind, TxStatus};
use crate::month::MonthKey;
use crate::utils::{
    fmt_money, id_for_card, id_for_category, maybe_print_json, parse_amount, parse_date,
    parse_month, pretty_table,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("settle", sub)) => settle(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("rm-month", sub)) => rm_month(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_installment(s: &str) -> Result<(u32, u32)> {
    let err = || anyhow::anyhow!("Invalid installment '{}', expected INDEX/TOTAL", s);
    let (i, t) = s.split_once('/').ok_or_else(err)?;
    let index: u32 = i.trim().parse().map_err(|_| err())?;
    let total: u32 = t.trim().parse().map_err(|_| err())?;
    if index == 0 || total == 0 || index > total {
        return Err(err());
    }
    Ok((index, total))
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let due = parse_date(sub.get_one::<String>("date").unwrap())?;
    let kind: TxKind = sub.get_one::<String>("type").unwrap().parse()?;
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    if name.is_empty() {
        bail!("Transaction name must not be empty");
    }
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let status: TxStatus = sub.get_one::<String>("status").unwrap().parse()?;
    let estimate = sub
        .get_one::<String>("estimate")
        .map(|s| parse_amount(s))
        .transpose()?;
    let effective = sub
        .get_one::<String>("effective")
        .map(|s| parse_date(s))
        .transpose()?;
    let competence = sub
        .get_one::<String>("competence")
        .map(|s| parse_month(s))
        .transpose()?
        .unwrap_or_else(|| MonthKey::from_date(due));
    let installment = sub
        .get_one::<String>("installment")
        .map(|s| parse_installment(s))
        .transpose()?;

    let category_id = sub
        .get_one::<String>("category")
        .map(|c| id_for_category(conn, c))
        .transpose()?;
    let card_id = sub
        .get_one::<String>("card")
        .map(|c| id_for_card(conn, c))
        .transpose()?;

    conn.execute(
        "INSERT INTO transactions(kind, name, amount, estimated_amount, category_id, card_id,
                                  due_date, effective_date, competence, status,
                                  installment_index, installment_total)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
        params![
            kind.as_str(),
            name,
            amount.to_string(),
            estimate.map(|d| d.to_string()),
            category_id,
            card_id,
            due.to_string(),
            effective.map(|d| d.to_string()),
            competence.to_string(),
            status.as_str(),
            installment.map(|(i, _)| i),
            installment.map(|(_, t)| t),
        ],
    )?;
    println!("Recorded {} {} '{}' due {}", kind, fmt_money(&amount), name, due);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.due_date.clone(),
                    r.kind.clone(),
                    r.name.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.card.clone(),
                    r.status.clone(),
                    r.competence.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Due", "Type", "Name", "Amount", "Category", "Card", "Status", "Month"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub due_date: String,
    pub kind: String,
    pub name: String,
    pub amount: String,
    pub estimated_amount: String,
    pub category: String,
    pub card: String,
    pub status: String,
    pub competence: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.id, t.due_date, t.kind, t.name, t.amount, t.estimated_amount,
                c.name, k.name, t.status, t.competence
         FROM transactions t
         LEFT JOIN categories c ON t.category_id=c.id
         LEFT JOIN cards k ON t.card_id=k.id
         WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        parse_month(month)?;
        sql.push_str(" AND substr(t.due_date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND c.name=?");
        params_vec.push(cat.into());
    }
    if let Some(card) = sub.get_one::<String>("card") {
        sql.push_str(" AND k.name=?");
        params_vec.push(card.into());
    }
    if let Some(status) = sub.get_one::<String>("status") {
        status.parse::<TxStatus>()?;
        sql.push_str(" AND t.status=?");
        params_vec.push(status.into());
    }
    sql.push_str(" ORDER BY t.due_date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

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
        let category: Option<String> = r.get(6)?;
        let card: Option<String> = r.get(7)?;
        let estimated: Option<String> = r.get(5)?;
        data.push(TransactionRow {
            id: r.get(0)?,
            due_date: r.get(1)?,
            kind: r.get(2)?,
            name: r.get(3)?,
            amount: r.get(4)?,
            estimated_amount: estimated.unwrap_or_default(),
            category: category.unwrap_or_default(),
            card: card.unwrap_or_default(),
            status: r.get(8)?,
            competence: r.get(9)?,
        });
    }
    Ok(data)
}

/// Load the transactions whose due date falls in `month`, in due-date
/// order, as domain models.
pub fn transactions_in_month(conn: &Connection, month: MonthKey) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, name, amount, estimated_amount, category_id, card_id,
                due_date, effective_date, competence, status,
                installment_index, installment_total
         FROM transactions WHERE substr(due_date,1,7)=?1
         ORDER BY due_date, id",
    )?;
    let mut rows = stmt.query(params![month.to_string()])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let kind_s: String = r.get(1)?;
        let amount_s: String = r.get(3)?;
        let estimate_s: Option<String> = r.get(4)?;
        let due_s: String = r.get(7)?;
        let effective_s: Option<String> = r.get(8)?;
        let competence_s: String = r.get(9)?;
        let status_s: String = r.get(10)?;
        out.push(Transaction {
            id: r.get(0)?,
            kind: kind_s.parse()?,
            name: r.get(2)?,
            amount: amount_s
                .parse()
                .with_context(|| format!("Invalid amount '{}' in transactions", amount_s))?,
            estimated_amount: estimate_s
                .map(|s| {
                    s.parse().with_context(|| {
                        format!("Invalid estimated amount '{}' in transactions", s)
                    })
                })
                .transpose()?,
            category_id: r.get(5)?,
            card_id: r.get(6)?,
            due_date: parse_date(&due_s)?,
            effective_date: effective_s.map(|s| parse_date(&s)).transpose()?,
            competence: competence_s
                .parse()
                .with_context(|| format!("Invalid competence '{}' in transactions", competence_s))?,
            status: status_s.parse()?,
            installment_index: r.get(11)?,
            installment_total: r.get(12)?,
        });
    }
    Ok(out)
}

fn require_tx(conn: &Connection, id: i64) -> Result<()> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE id=?1",
        params![id],
        |r| r.get(0),
    )?;
    if n == 0 {
        bail!("Transaction {} not found", id);
    }
    Ok(())
}

// Field-level edits: one UPDATE per provided flag.
fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    require_tx(conn, id)?;

    let mut touched = 0;
    if let Some(name) = sub.get_one::<String>("name") {
        let name = name.trim();
        if name.is_empty() {
            bail!("Transaction name must not be empty");
        }
        conn.execute(
            "UPDATE transactions SET name=?1 WHERE id=?2",
            params![name, id],
        )?;
        touched += 1;
    }
    if let Some(amount) = sub.get_one::<String>("amount") {
        let amount = parse_amount(amount)?;
        conn.execute(
            "UPDATE transactions SET amount=?1 WHERE id=?2",
            params![amount.to_string(), id],
        )?;
        touched += 1;
    }
    if let Some(estimate) = sub.get_one::<String>("estimate") {
        let estimate = parse_amount(estimate)?;
        conn.execute(
            "UPDATE transactions SET estimated_amount=?1 WHERE id=?2",
            params![estimate.to_string(), id],
        )?;
        touched += 1;
    }
    if let Some(date) = sub.get_one::<String>("date") {
        let date = parse_date(date)?;
        conn.execute(
            "UPDATE transactions SET due_date=?1 WHERE id=?2",
            params![date.to_string(), id],
        )?;
        touched += 1;
    }
    if let Some(date) = sub.get_one::<String>("effective") {
        let date = parse_date(date)?;
        conn.execute(
            "UPDATE transactions SET effective_date=?1 WHERE id=?2",
            params![date.to_string(), id],
        )?;
        touched += 1;
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        let cat_id = id_for_category(conn, cat)?;
        conn.execute(
            "UPDATE transactions SET category_id=?1 WHERE id=?2",
            params![cat_id, id],
        )?;
        touched += 1;
    }
    if let Some(card) = sub.get_one::<String>("card") {
        let card_id = id_for_card(conn, card)?;
        conn.execute(
            "UPDATE transactions SET card_id=?1 WHERE id=?2",
            params![card_id, id],
        )?;
        touched += 1;
    }
    if let Some(status) = sub.get_one::<String>("status") {
        let status: TxStatus = status.parse()?;
        conn.execute(
            "UPDATE transactions SET status=?1 WHERE id=?2",
            params![status.as_str(), id],
        )?;
        touched += 1;
    }
    if let Some(month) = sub.get_one::<String>("competence") {
        let competence = parse_month(month)?;
        conn.execute(
            "UPDATE transactions SET competence=?1 WHERE id=?2",
            params![competence.to_string(), id],
        )?;
        touched += 1;
    }

    if touched == 0 {
        println!("Nothing to change for transaction {}", id);
    } else {
        println!("Updated {} field(s) of transaction {}", touched, id);
    }
    Ok(())
}

fn settle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    require_tx(conn, id)?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };
    conn.execute(
        "UPDATE transactions SET status='settled', effective_date=?1 WHERE id=?2",
        params![date.to_string(), id],
    )?;
    println!("Settled transaction {} on {}", id, date);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        bail!("Transaction {} not found", id);
    }
    println!("Removed transaction {}", id);
    Ok(())
}

fn rm_month(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let n = conn.execute(
        "DELETE FROM transactions WHERE substr(due_date,1,7)=?1",
        params![month.to_string()],
    )?;
    println!("Removed {} transaction(s) from {}", n, month);
    Ok(())
}
