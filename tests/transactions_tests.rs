// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection};
use rust_decimal::Decimal;

use lifeclip::models::{TxKind, TxStatus};
use lifeclip::{cli, commands::transactions, db};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO categories(name) VALUES ('Cat1')", [])
        .unwrap();
    for i in 1..=3 {
        conn.execute(
            "INSERT INTO transactions(kind, name, amount, category_id, due_date, competence, status)
             VALUES ('expense', 'P', '10', 1, ?1, '2025-01', 'planned')",
            params![format!("2025-01-0{}", i)],
        )
        .unwrap();
    }
    conn
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["lifeclip", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].due_date, "2025-01-03");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_filters_by_month() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(kind, name, amount, due_date, competence, status)
         VALUES ('expense', 'Other', '5', '2025-02-01', '2025-02', 'planned')",
        [],
    )
    .unwrap();
    let matches =
        cli::build_cli().get_matches_from(["lifeclip", "tx", "list", "--month", "2025-01"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 3);
            assert!(rows.iter().all(|r| r.due_date.starts_with("2025-01")));
        }
    }
}

#[test]
fn month_loader_yields_typed_models() {
    let conn = setup();
    let month = "2025-01".parse().unwrap();
    let txs = transactions::transactions_in_month(&conn, month).unwrap();
    assert_eq!(txs.len(), 3);
    let t = &txs[0];
    assert_eq!(t.kind, TxKind::Expense);
    assert_eq!(t.status, TxStatus::Planned);
    assert_eq!(t.amount, Decimal::from(10));
    assert_eq!(t.competence.to_string(), "2025-01");
    assert_eq!(t.category_id, Some(1));
}

#[test]
fn malformed_stored_kind_is_a_typed_error() {
    let conn = setup();
    // bypass the CHECK to simulate a corrupted row
    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "INSERT INTO transactions(kind, name, amount, due_date, competence, status)
         VALUES ('transfer', 'Bad', '1', '2025-01-09', '2025-01', 'planned')",
        [],
    )
    .unwrap();
    let month = "2025-01".parse().unwrap();
    let err = transactions::transactions_in_month(&conn, month).unwrap_err();
    assert!(err.to_string().contains("transfer"));
}
