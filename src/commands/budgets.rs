// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::editing;
use crate::models::{find_category, MonthlyBudget, Side};
use crate::month::Month;
use crate::reconcile::effective_actual_cost;
use crate::utils::{arg, fmt_money, maybe_print_json, parse_decimal, parse_month, parse_year, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, user: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, user, sub)?,
        Some(("list", sub)) => list(conn, user, sub)?,
        Some(("income", sub)) => income(conn, user, sub)?,
        Some(("add-category", sub)) => {
            let name = arg(sub, "name")?;
            edit(conn, user, sub, |b| editing::add_category(b, name))?;
            println!("Added category '{}'", name.trim());
        }
        Some(("rm-category", sub)) => {
            let name = arg(sub, "name")?;
            edit(conn, user, sub, |b| editing::remove_category(b, name))?;
            println!("Removed category '{}'", name);
        }
        Some(("add-item", sub)) => {
            let cat = arg(sub, "category")?;
            let name = arg(sub, "name")?;
            edit(conn, user, sub, |b| editing::add_item(b, cat, name))?;
            println!("Added '{}' under '{}'", name.trim(), cat);
        }
        Some(("rm-item", sub)) => {
            let cat = arg(sub, "category")?;
            let name = arg(sub, "name")?;
            edit(conn, user, sub, |b| editing::remove_item(b, cat, name))?;
            println!("Removed '{}' from '{}'", name, cat);
        }
        Some(("set-cost", sub)) => set_cost(conn, user, sub)?,
        _ => {}
    }
    Ok(())
}

pub(crate) fn period(sub: &clap::ArgMatches) -> Result<(i32, Month)> {
    let year = parse_year(arg(sub, "year")?)?;
    let month = parse_month(arg(sub, "month")?)?;
    Ok((year, month))
}

/// Stored budget for the month, or the default skeleton when none exists yet.
pub(crate) fn load_or_new(conn: &Connection, user: &str, year: i32, month: Month) -> Result<MonthlyBudget> {
    match db::fetch_monthly_budget(conn, user, year, month.number()) {
        Ok(b) => Ok(b),
        Err(e) if e.is_not_found() => {
            tracing::debug!(user, year, month = month.number(), "creating budget from skeleton");
            Ok(MonthlyBudget::new(year, month))
        }
        Err(e) => Err(e.into()),
    }
}

/// Load, mutate, persist.
pub(crate) fn edit<T>(
    conn: &Connection,
    user: &str,
    sub: &clap::ArgMatches,
    f: impl FnOnce(&mut MonthlyBudget) -> crate::error::BudgetResult<T>,
) -> Result<(MonthlyBudget, T)> {
    let (year, month) = period(sub)?;
    let mut budget = load_or_new(conn, user, year, month)?;
    let out = f(&mut budget)?;
    db::upsert_monthly_budget(conn, user, &mut budget)?;
    Ok((budget, out))
}

fn show(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = period(sub)?;
    let budget = match db::fetch_monthly_budget(conn, user, year, month.number()) {
        Ok(b) => crate::totals::calculate_totals(b),
        Err(e) if e.is_not_found() => {
            let mut b = MonthlyBudget::new(year, month);
            db::upsert_monthly_budget(conn, user, &mut b)?;
            b
        }
        Err(e) => return Err(e.into()),
    };
    if maybe_print_json(sub.get_flag("json"), &budget)? {
        return Ok(());
    }
    print_budget(&budget);
    Ok(())
}

fn print_budget(b: &MonthlyBudget) {
    println!("{} {}", Month::from_number(b.month).map(|m| format!("{:?}", m)).unwrap_or_default(), b.year);
    let income = vec![
        vec![
            "Projected".to_string(),
            fmt_money(&b.projected_income.regular),
            fmt_money(&b.projected_income.extra),
            fmt_money(&b.projected_income.total),
        ],
        vec![
            "Actual".to_string(),
            fmt_money(&b.actual_income.regular),
            fmt_money(&b.actual_income.extra),
            fmt_money(&b.actual_income.total),
        ],
    ];
    println!("{}", pretty_table(&["Income", "Regular", "Extra", "Total"], income));

    let mut rows = Vec::new();
    for cat in &b.actual_expenses {
        let planned = find_category(&b.projected_expenses, &cat.name);
        for item in &cat.items {
            let projected = planned
                .and_then(|p| p.item(&item.sub_category))
                .map(|p| p.projected_cost)
                .unwrap_or(item.projected_cost);
            rows.push(vec![
                cat.name.clone(),
                item.sub_category.clone(),
                fmt_money(&projected),
                fmt_money(&effective_actual_cost(item)),
                item.transactions.len().to_string(),
            ]);
        }
        rows.push(vec![
            format!("{} subtotal", cat.name),
            String::new(),
            fmt_money(&cat.subtotal.projected),
            fmt_money(&cat.subtotal.actual),
            String::new(),
        ]);
    }
    println!(
        "{}",
        pretty_table(&["Category", "Subcategory", "Projected", "Actual", "Txns"], rows)
    );

    let totals = vec![
        vec![
            "Costs".to_string(),
            fmt_money(&b.total_projected_cost),
            fmt_money(&b.total_actual_cost),
            fmt_money(&b.total_difference),
        ],
        vec![
            "Balance".to_string(),
            fmt_money(&b.projected_balance),
            fmt_money(&b.actual_balance),
            fmt_money(&b.difference),
        ],
    ];
    println!("{}", pretty_table(&["", "Projected", "Actual", "Difference"], totals));
}

fn list(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let year = sub.get_one::<String>("year").map(|y| parse_year(y)).transpose()?;
    let budgets: Vec<MonthlyBudget> = db::fetch_monthly_budgets(conn, user, year)?
        .into_iter()
        .map(crate::totals::calculate_totals)
        .collect();
    if maybe_print_json(sub.get_flag("json"), &budgets)? {
        return Ok(());
    }
    let data = budgets
        .iter()
        .map(|b| {
            vec![
                format!("{}-{:02}", b.year, b.month),
                fmt_money(&b.actual_income.total),
                fmt_money(&b.total_actual_cost),
                fmt_money(&b.actual_balance),
                fmt_money(&b.projected_balance),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Spent", "Balance", "Planned balance"], data)
    );
    Ok(())
}

fn income(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let side: Side = arg(sub, "side")?.parse()?;
    let regular = parse_decimal(arg(sub, "regular")?)?;
    let extra = parse_decimal(arg(sub, "extra")?)?;
    let (budget, _) = edit(conn, user, sub, |b| {
        editing::set_income(b, side, regular, extra);
        Ok(())
    })?;
    println!(
        "{} income for {}-{:02} = {}",
        side,
        budget.year,
        budget.month,
        fmt_money(&budget.income(side).total)
    );
    Ok(())
}

fn set_cost(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let side: Side = arg(sub, "side")?.parse()?;
    let cat = arg(sub, "category")?;
    let item = arg(sub, "item")?;
    let amount = parse_decimal(arg(sub, "amount")?)?;
    let (budget, _) = edit(conn, user, sub, |b| match side {
        Side::Projected => editing::set_projected_cost(b, cat, item, amount),
        Side::Actual => editing::set_actual_cost(b, cat, item, amount),
    })?;
    println!(
        "Set {} cost of {} / {} to {}; month total {}",
        side,
        cat,
        item,
        fmt_money(&amount),
        fmt_money(&budget.total_actual_cost)
    );
    Ok(())
}
