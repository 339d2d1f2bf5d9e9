// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::budgets::{edit, load_or_new, period};
use crate::db;
use crate::editing;
use crate::reconcile::TransactionDraft;
use crate::utils::{arg, fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRow {
    pub id: String,
    pub category: String,
    pub sub_category: String,
    pub date: String,
    pub description: String,
    pub amount: rust_decimal::Decimal,
}

pub fn handle(conn: &Connection, user: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let cat = arg(sub, "category")?;
            let item = arg(sub, "item")?;
            let amount = parse_decimal(arg(sub, "amount")?)?;
            let draft = TransactionDraft::new(arg(sub, "description")?.as_str(), amount, arg(sub, "date")?.as_str());
            let (budget, id) = edit(conn, user, sub, |b| editing::record_transaction(b, cat, item, &draft))?;
            println!(
                "Recorded {} on {} / {} ({}); month actual {}",
                fmt_money(&amount),
                cat,
                item,
                id,
                fmt_money(&budget.total_actual_cost)
            );
        }
        Some(("rm", sub)) => {
            let cat = arg(sub, "category")?;
            let item = arg(sub, "item")?;
            let id = arg(sub, "id")?;
            let (year, month) = period(sub)?;
            let mut budget = load_or_new(conn, user, year, month)?;
            // Unknown ids are a no-op; nothing is written.
            if editing::delete_transaction(&mut budget, cat, item, id)? {
                db::upsert_monthly_budget(conn, user, &mut budget)?;
                println!("Removed transaction {}", id);
            } else {
                println!("No transaction '{}' under {} / {}; nothing removed", id, cat, item);
            }
        }
        Some(("list", sub)) => list(conn, user, sub)?,
        _ => {}
    }
    Ok(())
}

/// Transactions of the month's actual tree, newest first within each item.
pub fn query_rows(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<Vec<TxRow>> {
    let (year, month) = period(sub)?;
    let budget = load_or_new(conn, user, year, month)?;
    let cat_filter = sub.get_one::<String>("category");
    let item_filter = sub.get_one::<String>("item");

    let mut rows = Vec::new();
    for cat in &budget.actual_expenses {
        if cat_filter.is_some_and(|f| !cat.name.eq_ignore_ascii_case(f)) {
            continue;
        }
        for item in &cat.items {
            if item_filter.is_some_and(|f| !item.sub_category.eq_ignore_ascii_case(f)) {
                continue;
            }
            for t in &item.transactions {
                rows.push(TxRow {
                    id: t.id.clone(),
                    category: cat.name.clone(),
                    sub_category: item.sub_category.clone(),
                    date: t.date.to_string(),
                    description: t.description.clone(),
                    amount: t.amount,
                });
            }
        }
    }
    Ok(rows)
}

fn list(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let rows = query_rows(conn, user, sub)?;
    if maybe_print_json(sub.get_flag("json"), &rows)? {
        return Ok(());
    }
    let data = rows
        .into_iter()
        .map(|r| vec![r.date, r.category, r.sub_category, r.description, fmt_money(&r.amount), r.id])
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Category", "Subcategory", "Description", "Amount", "ID"], data)
    );
    Ok(())
}
