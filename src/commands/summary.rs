// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::models::YearlySummary;
use crate::pipeline;
use crate::utils::{arg, fmt_money, maybe_print_json, parse_year, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, user: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("refresh", sub)) => {
            let year = parse_year(arg(sub, "year")?)?;
            let summary = pipeline::refresh_yearly_summary(conn, user, year)?;
            if !maybe_print_json(sub.get_flag("json"), &summary)? {
                print_summary(&summary);
            }
        }
        Some(("show", sub)) => {
            let year = parse_year(arg(sub, "year")?)?;
            let summary = db::fetch_yearly_summary(conn, user, year)
                .with_context(|| format!("Run `monthwise summary refresh --year {}` first", year))?;
            if !maybe_print_json(sub.get_flag("json"), &summary)? {
                print_summary(&summary);
            }
        }
        _ => {}
    }
    Ok(())
}

fn print_summary(s: &YearlySummary) {
    let nw = &s.net_worth_summary.monthly_net_worth;
    let data = s
        .monthly_income
        .iter()
        .map(|(month, income)| {
            vec![
                month.to_string(),
                fmt_money(&income),
                fmt_money(&s.monthly_expenses[month]),
                fmt_money(&s.monthly_savings[month]),
                fmt_money(&s.monthly_projected_income[month]),
                fmt_money(&s.monthly_projected_expenses[month]),
                fmt_money(&nw[month]),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Month", "Income", "Expenses", "Savings", "Planned income", "Planned expenses", "Net worth"],
            data
        )
    );
    let totals = vec![
        vec![
            "Total".to_string(),
            fmt_money(&s.yearly_income_total),
            fmt_money(&s.yearly_expenses_total),
            fmt_money(&s.yearly_savings_total),
        ],
        vec![
            "Average".to_string(),
            fmt_money(&s.yearly_average_income),
            fmt_money(&s.yearly_average_expense),
            fmt_money(&s.yearly_average_savings),
        ],
    ];
    let label = s.year.to_string();
    println!("{}", pretty_table(&[label.as_str(), "Income", "Expenses", "Savings"], totals));
    println!(
        "Net worth high {}; accounts {}",
        fmt_money(&s.net_worth_summary.yearly_high),
        s.account_values.len()
    );
}
