// Copyright (c) 2025 Soumyadip Sarkar.
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
    conn.execute("INSERT INTO categories(name) VALUES ('Groceries')", [])
        .unwrap();
    conn.execute("INSERT INTO cards(name) VALUES ('Visa')", [])
        .unwrap();
    conn
}

fn import(conn: &mut Connection, path: &str) -> anyhow::Result<()> {
    let matches =
        cli::build_cli().get_matches_from(["lifeclip", "import", "transactions", "--path", path]);
    if let Some(("import", m)) = matches.subcommand() {
        commands::importer::handle(conn, m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn imports_rows_with_defaults_filled_in() {
    let mut conn = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tx.csv");
    fs::write(
        &path,
        "date,type,name,amount,category,card,status,estimate,competence,effective\n\
         2025-08-01,income,Salary,3000,,,settled,,,2025-08-01\n\
         2025-08-10,expense,Food,120.50,Groceries,Visa,,100,2025-09,\n",
    )
    .unwrap();

    import(&mut conn, path.to_str().unwrap()).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 2);

    // status defaults to planned, competence defaults to the due month
    let (status, competence): (String, String) = conn
        .query_row(
            "SELECT status, competence FROM transactions WHERE name='Food'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(status, "planned");
    assert_eq!(competence, "2025-09");

    let salary_comp: String = conn
        .query_row(
            "SELECT competence FROM transactions WHERE name='Salary'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(salary_comp, "2025-08");
}

#[test]
fn a_bad_row_rolls_back_the_whole_batch() {
    let mut conn = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tx.csv");
    fs::write(
        &path,
        "date,type,name,amount,category,card,status,estimate,competence,effective\n\
         2025-08-01,income,Salary,3000,,,,,,\n\
         2025-08-10,expense,Food,not-a-number,,,,,,\n",
    )
    .unwrap();

    assert!(import(&mut conn, path.to_str().unwrap()).is_err());
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn unknown_category_fails_fast() {
    let mut conn = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tx.csv");
    fs::write(
        &path,
        "date,type,name,amount,category,card,status,estimate,competence,effective\n\
         2025-08-10,expense,Food,12,NoSuchCategory,,,,,\n",
    )
    .unwrap();

    assert!(import(&mut conn, path.to_str().unwrap()).is_err());
}

#[test]
fn negative_amounts_are_rejected() {
    let mut conn = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tx.csv");
    fs::write(
        &path,
        "date,type,name,amount,category,card,status,estimate,competence,effective\n\
         2025-08-10,expense,Food,-12,,,,,,\n",
    )
    .unwrap();

    assert!(import(&mut conn, path.to_str().unwrap()).is_err());
}
