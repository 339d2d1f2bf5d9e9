// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::month::Month;

pub const DEFAULT_USER: &str = "local";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Accepts `1`..`12` or a month name/abbreviation (`mar`, `March`).
pub fn parse_month(s: &str) -> Result<Month> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u32>() {
        return Month::from_number(n).map_err(|e| anyhow!(e));
    }
    let lower = s.to_lowercase();
    Month::ALL
        .into_iter()
        .find(|m| {
            let abbrev = m.abbrev().to_lowercase();
            lower == abbrev || (lower.len() >= 3 && format!("{:?}", m).to_lowercase().starts_with(&lower))
        })
        .ok_or_else(|| anyhow!("Invalid month '{}', expected 1-12 or a month name", s))
}

pub fn parse_year(s: &str) -> Result<i32> {
    let y: i32 = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid year '{}'", s))?;
    if !(1900..=9999).contains(&y) {
        return Err(anyhow!("Year {} out of range", y));
    }
    Ok(y)
}

/// Largest magnitude accepted for an amount. Keeps every sum a year of
/// budgets can build far below `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    let d = s
        .trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))?;
    if d.abs() > MAX_AMOUNT {
        return Err(anyhow!("Amount {} out of range (limit {})", d, MAX_AMOUNT));
    }
    Ok(d)
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}

/// Required argument lookup; clap enforces presence, this keeps handlers
/// free of unwraps.
pub fn arg<'a>(m: &'a clap::ArgMatches, id: &str) -> Result<&'a String> {
    m.get_one::<String>(id)
        .ok_or_else(|| anyhow!("Missing argument '{}'", id))
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// `--user` (or `MONTHWISE_USER`), then the stored default, then `local`.
pub fn resolve_user(conn: &Connection, flag: Option<&String>) -> Result<String> {
    if let Some(u) = flag.map(|u| u.trim()).filter(|u| !u.is_empty()) {
        return Ok(u.to_string());
    }
    Ok(get_setting(conn, "default_user")?.unwrap_or_else(|| DEFAULT_USER.to_string()))
}
