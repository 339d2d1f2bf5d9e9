// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use monthwise::editing;
use monthwise::models::{AccountValue, MonthlyBudget, Side};
use monthwise::month::Month;
use monthwise::{cli, commands::accounts, db, pipeline};
use rusqlite::Connection;
use rust_decimal::Decimal;

const USER: &str = "alice";

fn d(v: i64) -> Decimal {
    Decimal::from(v)
}

fn save_month(conn: &Connection, month: Month, income: i64, spent: i64) {
    let mut b = MonthlyBudget::new(2025, month);
    editing::set_income(&mut b, Side::Actual, d(income), d(0));
    editing::set_actual_cost(&mut b, "Category", "Subcategory1", d(spent)).unwrap();
    db::upsert_monthly_budget(conn, USER, &mut b).unwrap();
}

fn run_account(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["monthwise", "account"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("account", m)) = matches.subcommand() {
        accounts::handle(conn, USER, m)
    } else {
        panic!("no account subcommand");
    }
}

#[test]
fn refresh_stores_a_sparse_year() {
    let conn = db::open_in_memory().unwrap();
    save_month(&conn, Month::January, 1000, 400);
    save_month(&conn, Month::March, 1200, 500);

    let summary = pipeline::refresh_yearly_summary(&conn, USER, 2025).unwrap();
    assert_eq!(summary.yearly_income_total, d(2200));
    assert_eq!(summary.yearly_average_income, d(2200) / d(12));
    assert_eq!(summary.monthly_income[Month::February], Decimal::ZERO);
    assert_eq!(summary.monthly_savings[Month::March], d(700));

    let stored = db::fetch_yearly_summary(&conn, USER, 2025).unwrap();
    assert_eq!(stored.id, "2025");
    assert_eq!(stored.monthly_expenses, summary.monthly_expenses);
    assert_eq!(stored.net_worth_summary, summary.net_worth_summary);
}

#[test]
fn net_worth_adds_cumulative_account_contributions() {
    let conn = db::open_in_memory().unwrap();
    for month in Month::ALL {
        save_month(&conn, month, 150, 100);
    }
    run_account(&conn, &["add", "Savings", "--year", "2025"]).unwrap();
    for m in ["1", "2", "3"] {
        run_account(&conn, &["set", "savings", "--month", m, "100"]).unwrap();
    }
    run_account(&conn, &["add", "Legacy"]).unwrap();
    run_account(&conn, &["set", "Legacy", "--month", "dec", "10"]).unwrap();
    run_account(&conn, &["add", "Last year", "--year", "2024"]).unwrap();
    run_account(&conn, &["set", "Last year", "--month", "1", "9999"]).unwrap();

    let stored = db::find_account(&conn, USER, "Savings", None).unwrap();
    assert_eq!(stored.current_value, d(300));

    let s = pipeline::refresh_yearly_summary(&conn, USER, 2025).unwrap();
    let nw = &s.net_worth_summary.monthly_net_worth;
    assert_eq!(nw[Month::January], d(150));
    assert_eq!(nw[Month::February], d(300));
    assert_eq!(nw[Month::March], d(450));
    assert_eq!(nw[Month::April], d(500));
    assert_eq!(nw[Month::December], d(910));
    assert_eq!(s.net_worth_summary.yearly_high, d(910));
    assert_eq!(s.account_values.len(), 2);
}

#[test]
fn duplicate_account_names_are_rejected() {
    let conn = db::open_in_memory().unwrap();
    run_account(&conn, &["add", "Brokerage"]).unwrap();
    assert!(run_account(&conn, &["add", "brokerage"]).is_err());
    assert_eq!(db::fetch_accounts(&conn, USER).unwrap().len(), 1);

    let mut other_user = AccountValue::new("Brokerage", None);
    db::upsert_account(&conn, "bob", &mut other_user).unwrap();

    run_account(&conn, &["rm", "BROKERAGE"]).unwrap();
    assert!(db::fetch_accounts(&conn, USER).unwrap().is_empty());
    assert_eq!(db::fetch_accounts(&conn, "bob").unwrap().len(), 1);
}

#[test]
fn account_names_repeat_across_years() {
    let conn = db::open_in_memory().unwrap();
    run_account(&conn, &["add", "Savings", "--year", "2025"]).unwrap();
    run_account(&conn, &["add", "Savings", "--year", "2026"]).unwrap();
    assert!(run_account(&conn, &["add", "SAVINGS", "--year", "2025"]).is_err());
    assert!(run_account(&conn, &["add", "savings"]).is_err());
    assert_eq!(db::fetch_accounts(&conn, USER).unwrap().len(), 2);

    run_account(&conn, &["set", "Savings", "--year", "2026", "--month", "1", "70"]).unwrap();
    let later = db::find_account(&conn, USER, "Savings", Some(2026)).unwrap();
    assert_eq!(later.year, Some(2026));
    assert_eq!(later.current_value, d(70));
    let earlier = db::find_account(&conn, USER, "Savings", Some(2025)).unwrap();
    assert_eq!(earlier.current_value, Decimal::ZERO);

    run_account(&conn, &["rm", "Savings", "-y", "2025"]).unwrap();
    let left = db::fetch_accounts(&conn, USER).unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].year, Some(2026));
}

#[test]
fn show_before_refresh_is_not_found() {
    let conn = db::open_in_memory().unwrap();
    assert!(db::fetch_yearly_summary(&conn, USER, 2025).unwrap_err().is_not_found());
}
