// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use monthwise::{cli, commands::budgets, commands::templates, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

const USER: &str = "alice";

fn setup() -> Connection {
    db::open_in_memory().unwrap()
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["monthwise"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("budget", m)) => budgets::handle(conn, USER, m),
        Some(("template", m)) => templates::handle(conn, USER, m),
        other => panic!("unexpected subcommand {:?}", other.map(|(n, _)| n)),
    }
}

/// Runs a command against one month of 2025.
fn run_month(conn: &Connection, month: &str, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = args.to_vec();
    argv.extend_from_slice(&["--year", "2025", "--month", month]);
    run(conn, &argv)
}

fn d(v: i64) -> Decimal {
    Decimal::from(v)
}

#[test]
fn first_show_persists_default_skeleton() {
    let conn = setup();
    run(&conn, &["budget", "show", "--year", "2025", "--month", "3"]).unwrap();
    let b = db::fetch_monthly_budget(&conn, USER, 2025, 3).unwrap();
    assert_eq!(b.projected_expenses.len(), 1);
    assert_eq!(b.actual_expenses[0].name, "Category");
    let names: Vec<_> = b.actual_expenses[0]
        .items
        .iter()
        .map(|i| i.sub_category.as_str())
        .collect();
    assert_eq!(
        names,
        ["Subcategory1", "Subcategory2", "Subcategory3", "Subcategory4", "Subcategory5"]
    );
}

#[test]
fn balance_example_through_commands() {
    let conn = setup();
    run_month(&conn, "jan", &["budget", "income", "--side", "projected", "--regular", "1000"]).unwrap();
    run_month(&conn, "jan", &["budget", "income", "--side", "actual", "--regular", "900", "--extra", "100"]).unwrap();
    run_month(&conn, "jan", &["budget", "add-category", "Home"]).unwrap();
    run_month(&conn, "jan", &["budget", "add-item", "--category", "home", "Rent"]).unwrap();
    run_month(&conn, "jan", &["budget", "set-cost", "-c", "Home", "-i", "rent", "--side", "projected", "800"]).unwrap();
    run_month(&conn, "jan", &["budget", "set-cost", "-c", "Home", "-i", "Rent", "--side", "actual", "700"]).unwrap();

    let b = db::fetch_monthly_budget(&conn, USER, 2025, 1).unwrap();
    assert_eq!(b.projected_balance, d(200));
    assert_eq!(b.actual_balance, d(300));
    assert_eq!(b.difference, d(100));
    assert_eq!(b.total_difference, d(-100));
    let rent = b.projected_expenses[1].item("Rent").unwrap();
    assert_eq!(rent.projected_cost, d(800));
    assert_eq!(rent.actual_cost, Decimal::ZERO);
}

#[test]
fn duplicate_category_is_rejected_case_insensitively() {
    let conn = setup();
    run_month(&conn, "2", &["budget", "add-category", "Food"]).unwrap();
    let err = run_month(&conn, "2", &["budget", "add-category", "FOOD"]).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    let b = db::fetch_monthly_budget(&conn, USER, 2025, 2).unwrap();
    assert_eq!(b.actual_expenses.len(), 2);
}

#[test]
fn removing_unknown_item_fails() {
    let conn = setup();
    let err = run(
        &conn,
        &["budget", "rm-item", "--year", "2025", "--month", "4", "--category", "Category", "Nope"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn template_apply_overwrites_both_trees_and_clears_actuals() {
    let conn = setup();
    run(&conn, &["budget", "income", "--year", "2025", "--month", "5", "--side", "projected", "--regular", "2500"]).unwrap();
    run(&conn, &["budget", "set-cost", "--year", "2025", "--month", "5", "-c", "Category", "-i", "Subcategory1", "--side", "projected", "120"]).unwrap();
    run(&conn, &["template", "save", "--year", "2025", "--month", "5", "--name", "Baseline"]).unwrap();

    run(&conn, &["budget", "add-category", "--year", "2025", "--month", "6", "Travel"]).unwrap();
    run(&conn, &["budget", "set-cost", "--year", "2025", "--month", "6", "-c", "Category", "-i", "Subcategory2", "--side", "actual", "75"]).unwrap();
    run(&conn, &["template", "apply", "baseline", "--year", "2025", "--month", "6"]).unwrap();

    let b = db::fetch_monthly_budget(&conn, USER, 2025, 6).unwrap();
    assert_eq!(b.projected_income.total, d(2500));
    assert_eq!(b.projected_expenses, b.actual_expenses);
    assert_eq!(b.actual_expenses.len(), 1);
    assert_eq!(b.total_projected_cost, d(120));
    assert_eq!(b.total_actual_cost, Decimal::ZERO);

    let dup = run(&conn, &["template", "save", "--year", "2025", "--month", "6", "--name", "BASELINE"]);
    assert!(dup.is_err());
    assert_eq!(db::fetch_templates(&conn, USER).unwrap().len(), 1);

    run(&conn, &["template", "rm", "Baseline"]).unwrap();
    assert!(db::fetch_templates(&conn, USER).unwrap().is_empty());
}
