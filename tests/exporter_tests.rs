// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use std::fs;

use lifeclip::{cli, commands, db};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO categories(name) VALUES ('Rent')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO transactions(kind, name, amount, category_id, due_date, competence, status)
         VALUES ('expense', 'August rent', '1200',
                 (SELECT id FROM categories WHERE name='Rent'),
                 '2025-08-01', '2025-08', 'settled')",
        [],
    )
    .unwrap();
    conn
}

fn export(conn: &Connection, fmt: &str, out: &str) {
    let matches = cli::build_cli().get_matches_from([
        "lifeclip",
        "export",
        "transactions",
        "--format",
        fmt,
        "--out",
        out,
    ]);
    if let Some(("export", m)) = matches.subcommand() {
        commands::exporter::handle(conn, m).unwrap();
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn csv_export_round_trips_through_the_importer() {
    let conn = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    export(&conn, "csv", path.to_str().unwrap());

    let body = fs::read_to_string(&path).unwrap();
    assert!(body.starts_with("date,type,name,amount,category,card,status,estimate,competence"));
    assert!(body.contains("2025-08-01,expense,August rent,1200,Rent,,settled,,2025-08,"));

    // a fresh database accepts the exported file as-is
    let mut fresh = Connection::open_in_memory().unwrap();
    db::init_schema(&mut fresh).unwrap();
    fresh
        .execute("INSERT INTO categories(name) VALUES ('Rent')", [])
        .unwrap();
    let matches = cli::build_cli().get_matches_from([
        "lifeclip",
        "import",
        "transactions",
        "--path",
        path.to_str().unwrap(),
    ]);
    if let Some(("import", m)) = matches.subcommand() {
        commands::importer::handle(&mut fresh, m).unwrap();
    }
    let count: i64 = fresh
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn json_export_is_valid_json() {
    let conn = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    export(&conn, "json", path.to_str().unwrap());

    let body = fs::read_to_string(&path).unwrap();
    let items: serde_json::Value = serde_json::from_str(&body).unwrap();
    let arr = items.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["name"], "August rent");
    assert_eq!(arr[0]["amount"], "1200");
}
