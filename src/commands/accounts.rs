// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::models::AccountValue;
use crate::month::Month;
use crate::utils::{arg, fmt_money, maybe_print_json, parse_decimal, parse_month, parse_year, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, user: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = arg(sub, "name")?;
            let year = sub.get_one::<String>("year").map(|y| parse_year(y)).transpose()?;
            let mut account = AccountValue::new(name.as_str(), year);
            db::upsert_account(conn, user, &mut account)?;
            println!("Added account '{}' ({})", account.name, account.id);
        }
        Some(("list", sub)) => {
            let year = sub.get_one::<String>("year").map(|y| parse_year(y)).transpose()?;
            let accounts = match year {
                Some(y) => db::fetch_accounts_for_year(conn, user, y)?,
                None => db::fetch_accounts(conn, user)?,
            };
            if maybe_print_json(sub.get_flag("json"), &accounts)? {
                return Ok(());
            }
            let mut headers = vec!["Name", "Year"];
            headers.extend(Month::ALL.iter().map(|m| m.abbrev()));
            headers.push("Total");
            let data = accounts
                .iter()
                .map(|a| {
                    let mut row = vec![
                        a.name.clone(),
                        a.year.map(|y| y.to_string()).unwrap_or_else(|| "all".into()),
                    ];
                    row.extend(a.monthly_values.iter().map(|(_, v)| fmt_money(&v)));
                    row.push(fmt_money(&a.current_value));
                    row
                })
                .collect();
            println!("{}", pretty_table(&headers, data));
        }
        Some(("set", sub)) => {
            let year = sub.get_one::<String>("year").map(|y| parse_year(y)).transpose()?;
            let mut account = db::find_account(conn, user, arg(sub, "account")?, year)?;
            let month = parse_month(arg(sub, "month")?)?;
            let value = parse_decimal(arg(sub, "value")?)?;
            account.set_month_value(month, value);
            db::upsert_account(conn, user, &mut account)?;
            println!(
                "{} {} = {}; total {}",
                account.name,
                month,
                fmt_money(&value),
                fmt_money(&account.current_value)
            );
        }
        Some(("rm", sub)) => {
            let year = sub.get_one::<String>("year").map(|y| parse_year(y)).transpose()?;
            let account = db::find_account(conn, user, arg(sub, "account")?, year)?;
            db::delete_account(conn, user, &account.id)?;
            println!("Removed account '{}'", account.name);
        }
        _ => {}
    }
    Ok(())
}
