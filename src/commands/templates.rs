// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::budgets::{edit, load_or_new, period};
use crate::db;
use crate::editing;
use crate::utils::{arg, fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, user: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("save", sub)) => {
            let (year, month) = period(sub)?;
            let budget = load_or_new(conn, user, year, month)?;
            let existing = db::fetch_templates(conn, user)?;
            let mut template = editing::capture_template(
                &budget,
                arg(sub, "name")?,
                sub.get_one::<String>("description").map(|s| s.as_str()),
                &existing,
            )?;
            db::upsert_template(conn, user, &mut template)?;
            println!("Saved template '{}' from {}-{:02}", template.name, year, month.number());
        }
        Some(("list", sub)) => {
            let templates = db::fetch_templates(conn, user)?;
            if maybe_print_json(sub.get_flag("json"), &templates)? {
                return Ok(());
            }
            let data = templates
                .iter()
                .map(|t| {
                    let planned: rust_decimal::Decimal = t
                        .expense_categories
                        .iter()
                        .flat_map(|c| c.items.iter())
                        .map(|i| i.projected_cost)
                        .sum();
                    vec![
                        t.name.clone(),
                        t.description.clone().unwrap_or_default(),
                        fmt_money(&t.projected_income.total),
                        fmt_money(&planned),
                        t.expense_categories.len().to_string(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Name", "Description", "Income", "Planned", "Categories"], data)
            );
        }
        Some(("apply", sub)) => {
            let template = db::find_template(conn, user, arg(sub, "template")?)?;
            let (budget, _) = edit(conn, user, sub, |b| {
                editing::apply_template(b, &template);
                Ok(())
            })?;
            println!(
                "Applied '{}' to {}-{:02}; planned costs {}",
                template.name,
                budget.year,
                budget.month,
                fmt_money(&budget.total_projected_cost)
            );
        }
        Some(("rm", sub)) => {
            let template = db::find_template(conn, user, arg(sub, "template")?)?;
            db::delete_template(conn, user, &template.id)?;
            println!("Removed template '{}'", template.name);
        }
        _ => {}
    }
    Ok(())
}
