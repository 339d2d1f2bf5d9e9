// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use monthwise::models::{MonthlyBudget, CURRENT_SCHEMA_VERSION};
use monthwise::month::Month;
use monthwise::{cli, commands::doctor, db, editing, reconcile::TransactionDraft};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use tempfile::tempdir;

const USER: &str = "alice";

fn insert_raw(conn: &Connection, collection: &str, id: &str, year: Option<i32>, month: Option<u32>, body: &str) {
    conn.execute(
        "INSERT INTO documents(user_id, collection, doc_id, year, month, body) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![USER, collection, id, year, month, body],
    )
    .unwrap();
}

#[test]
fn budget_round_trips_through_a_file_database() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("monthwise.sqlite");
    let mut b = MonthlyBudget::new(2025, Month::July);
    let tx_id = {
        let conn = db::open_or_init(Some(path.as_path())).unwrap();
        let draft = TransactionDraft::new("Ferry", Decimal::new(1250, 2), "2025-07-04");
        let id = editing::record_transaction(&mut b, "Category", "Subcategory3", &draft).unwrap();
        db::upsert_monthly_budget(&conn, USER, &mut b).unwrap();
        id
    };

    let conn = db::open_or_init(Some(path.as_path())).unwrap();
    let loaded = db::fetch_monthly_budget(&conn, USER, 2025, 7).unwrap();
    assert_eq!(loaded, b);
    let item = loaded.actual_expenses[0].item("Subcategory3").unwrap();
    assert_eq!(item.transactions[0].id, tx_id);
    assert_eq!(loaded.total_actual_cost.to_string(), "12.50");
}

#[test]
fn legacy_documents_load_with_defaults() {
    let conn = db::open_in_memory().unwrap();
    insert_raw(
        &conn,
        db::MONTHLY_BUDGETS,
        "legacy-feb",
        Some(2024),
        Some(2),
        r#"{"year":2024,"month":2,
            "actualIncome":{"regular":1800},
            "projectedExpenses":[{"name":"Food","items":[{"subCategory":"Groceries","projectedCost":300}]}],
            "actualExpenses":[{"name":"Food","items":[{"subCategory":"Groceries","actualCost":320}]}]}"#,
    );
    insert_raw(&conn, db::ACCOUNTS, "acc-1", None, None, r#"{"name":"Pension"}"#);

    let budgets = db::fetch_monthly_budgets(&conn, USER, Some(2024)).unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].id, "legacy-feb");
    assert_eq!(budgets[0].schema_version, 0);
    assert!(budgets[0].actual_expenses[0].items[0].transactions.is_empty());

    let accounts = db::fetch_accounts_for_year(&conn, USER, 2024).unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].id, "acc-1");
    assert_eq!(accounts[0].current_value, Decimal::ZERO);

    let summary = monthwise::pipeline::refresh_yearly_summary(&conn, USER, 2024).unwrap();
    assert_eq!(summary.monthly_income[Month::February], Decimal::from(1800));
    assert_eq!(summary.monthly_expenses[Month::February], Decimal::from(320));
    assert_eq!(summary.monthly_projected_expenses[Month::February], Decimal::from(300));

    let mut b = budgets.into_iter().next().unwrap();
    db::upsert_monthly_budget(&conn, USER, &mut b).unwrap();
    let b = db::fetch_monthly_budget(&conn, USER, 2024, 2).unwrap();
    assert_eq!(b.schema_version, CURRENT_SCHEMA_VERSION);
    assert_eq!(b.actual_income.total, Decimal::from(1800));
}

#[test]
fn budgets_come_back_in_calendar_order() {
    let conn = db::open_in_memory().unwrap();
    for month in [Month::November, Month::February, Month::June] {
        let mut b = MonthlyBudget::new(2025, month);
        db::upsert_monthly_budget(&conn, USER, &mut b).unwrap();
    }
    let months: Vec<u32> = db::fetch_monthly_budgets(&conn, USER, None)
        .unwrap()
        .iter()
        .map(|b| b.month)
        .collect();
    assert_eq!(months, [2, 6, 11]);
}

#[test]
fn doctor_reports_diverged_trees() {
    let conn = db::open_in_memory().unwrap();
    let mut clean = MonthlyBudget::new(2025, Month::January);
    db::upsert_monthly_budget(&conn, USER, &mut clean).unwrap();
    insert_raw(
        &conn,
        db::MONTHLY_BUDGETS,
        "drift",
        Some(2025),
        Some(3),
        r#"{"year":2025,"month":3,"schemaVersion":2,
            "projectedExpenses":[{"name":"Car","items":[{"subCategory":"Fuel"}]}],
            "actualExpenses":[{"name":"Car","items":[]}]}"#,
    );

    let matches = cli::build_cli().get_matches_from(["monthwise", "doctor", "--year", "2025"]);
    if let Some(("doctor", m)) = matches.subcommand() {
        assert_eq!(doctor::handle(&conn, USER, m).unwrap(), 1);
    } else {
        panic!("no doctor subcommand");
    }
}
