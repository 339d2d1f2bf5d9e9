// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use monthwise::{cli, commands::transactions, db, effective_actual_cost};
use rusqlite::{Connection, OptionalExtension};
use rust_decimal::Decimal;

const USER: &str = "alice";

fn setup() -> Connection {
    let conn = db::open_in_memory().unwrap();
    run(&conn, &["tx", "add", "-c", "Category", "-i", "Subcategory1", "-d", "Groceries", "-a", "50", "--date", "2025-01-03"]).unwrap();
    run(&conn, &["tx", "add", "-c", "category", "-i", "subcategory1", "-d", "Market", "-a", "30", "--date", "2025-01-09"]).unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["monthwise"];
    argv.extend_from_slice(args);
    argv.extend_from_slice(&["--year", "2025", "--month", "1"]);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(conn, USER, tx_m)
    } else {
        panic!("no tx subcommand");
    }
}

fn rows(conn: &Connection) -> Vec<transactions::TxRow> {
    let matches = cli::build_cli().get_matches_from(["monthwise", "tx", "list", "-y", "2025", "-m", "1"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            return transactions::query_rows(conn, USER, list_m).unwrap();
        }
    }
    panic!("no tx list subcommand");
}

fn stored_body(conn: &Connection, month: u32) -> Option<String> {
    conn.query_row(
        "SELECT body FROM documents WHERE user_id=?1 AND collection=?2 AND year=2025 AND month=?3",
        rusqlite::params![USER, db::MONTHLY_BUDGETS, month],
        |r| r.get(0),
    )
    .optional()
    .unwrap()
}

#[test]
fn removing_from_an_unsaved_month_writes_nothing() {
    let conn = db::open_in_memory().unwrap();
    let matches = cli::build_cli().get_matches_from([
        "monthwise", "tx", "rm", "-y", "2025", "-m", "8", "-c", "Category", "-i", "Subcategory1", "trans_nope",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(&conn, USER, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }
    assert_eq!(stored_body(&conn, 8), None);
    assert!(db::fetch_monthly_budgets(&conn, USER, None).unwrap().is_empty());
}

#[test]
fn list_is_newest_first() {
    let conn = setup();
    let rows = rows(&conn);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].description, "Market");
    assert_eq!(rows[1].date, "2025-01-03");
    assert!(rows.iter().all(|r| r.id.starts_with("trans_")));
}

#[test]
fn manual_cost_and_transactions_take_the_max() {
    let conn = setup();
    let mut b = db::fetch_monthly_budget(&conn, USER, 2025, 1).unwrap();
    assert_eq!(b.total_actual_cost, Decimal::from(80));

    let item = b.actual_expenses[0].item("Subcategory1").unwrap();
    assert_eq!(effective_actual_cost(item), Decimal::from(80));

    monthwise::editing::set_actual_cost(&mut b, "Category", "Subcategory1", Decimal::from(100)).unwrap();
    db::upsert_monthly_budget(&conn, USER, &mut b).unwrap();
    let b = db::fetch_monthly_budget(&conn, USER, 2025, 1).unwrap();
    assert_eq!(b.total_actual_cost, Decimal::from(100));
}

#[test]
fn invalid_transaction_leaves_budget_untouched() {
    let conn = setup();
    let before = db::fetch_monthly_budget(&conn, USER, 2025, 1).unwrap();
    let bad_amount = run(&conn, &["tx", "add", "-c", "Category", "-i", "Subcategory1", "-d", "Refund", "--amount=-5", "--date", "2025-01-10"]);
    assert!(bad_amount.is_err());
    let blank = run(&conn, &["tx", "add", "-c", "Category", "-i", "Subcategory1", "-d", "  ", "-a", "5", "--date", "2025-01-10"]);
    assert!(blank.is_err());
    let bad_date = run(&conn, &["tx", "add", "-c", "Category", "-i", "Subcategory1", "-d", "X", "-a", "5", "--date", "2025-02-30"]);
    assert!(bad_date.is_err());
    let huge = run(&conn, &["tx", "add", "-c", "Category", "-i", "Subcategory1", "-d", "X", "-a", "79228162514264337593543950335", "--date", "2025-01-10"]);
    assert!(huge.is_err());
    let after = db::fetch_monthly_budget(&conn, USER, 2025, 1).unwrap();
    assert_eq!(before, after);
}

#[test]
fn remove_by_id_and_unknown_id() {
    let conn = setup();
    let id = rows(&conn)[0].id.clone();
    run(&conn, &["tx", "rm", "-c", "Category", "-i", "Subcategory1", id.as_str()]).unwrap();
    let left = rows(&conn);
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].description, "Groceries");

    let b = db::fetch_monthly_budget(&conn, USER, 2025, 1).unwrap();
    assert_eq!(b.total_actual_cost, Decimal::from(50));

    let body_before = stored_body(&conn, 1);
    run(&conn, &["tx", "rm", "-c", "Category", "-i", "Subcategory1", "trans_missing"]).unwrap();
    assert_eq!(stored_body(&conn, 1), body_before);
    assert_eq!(rows(&conn).len(), 1);
}
