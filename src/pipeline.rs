// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Gateway-to-core wiring for the year-level outputs.

use rusqlite::Connection;

use crate::aggregate::aggregate_year;
use crate::db;
use crate::error::BudgetResult;
use crate::export::{archive_name, bundle_archive, export_year, ExportBundle};
use crate::models::YearlySummary;

/// Rebuilds and stores the yearly summary from the stored budgets and accounts.
pub fn refresh_yearly_summary(conn: &Connection, user: &str, year: i32) -> BudgetResult<YearlySummary> {
    let budgets = db::fetch_monthly_budgets(conn, user, Some(year))?;
    let accounts = db::fetch_accounts_for_year(conn, user, year)?;
    let mut summary = aggregate_year(year, &budgets, &accounts);
    db::upsert_yearly_summary(conn, user, &mut summary)?;
    Ok(summary)
}

pub fn export_bundle(conn: &Connection, user: &str, year: i32) -> BudgetResult<ExportBundle> {
    let budgets = db::fetch_monthly_budgets(conn, user, Some(year))?;
    let accounts = db::fetch_accounts_for_year(conn, user, year)?;
    export_year(year, &budgets, &accounts)
}

/// Returns the archive file name and its bytes.
pub fn export_archive(conn: &Connection, user: &str, year: i32) -> BudgetResult<(String, Vec<u8>)> {
    let bundle = export_bundle(conn, user, year)?;
    let bytes = bundle_archive(&bundle)?;
    tracing::info!(user, year, bytes = bytes.len(), "export archive built");
    Ok((archive_name(year), bytes))
}
