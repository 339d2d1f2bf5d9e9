// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SQLite-backed document store.
//!
//! Every record is a JSON document keyed by (user, collection, id). Budgets
//! and summaries also index their year/month so per-period queries stay
//! cheap. Writes are last-write-wins; nothing here spans documents
//! atomically.

use anyhow::{Context, Result};
use chrono::Utc;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    AccountValue, BudgetTemplate, MonthlyBudget, YearlySummary, CURRENT_SCHEMA_VERSION,
};
use crate::totals::recalculate;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Monthwise", "monthwise"));

pub const MONTHLY_BUDGETS: &str = "monthlyBudgets";
pub const ACCOUNTS: &str = "accounts";
pub const TEMPLATES: &str = "templates";
pub const YEARLY_SUMMARIES: &str = "yearlySummaries";

/// Explicit path if given, otherwise the platform data dir.
pub fn db_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("monthwise.sqlite"))
}

pub fn open_or_init(explicit: Option<&Path>) -> Result<Connection> {
    let path = db_path(explicit)?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn open_in_memory() -> BudgetResult<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> BudgetResult<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS documents(
        user_id TEXT NOT NULL,
        collection TEXT NOT NULL,
        doc_id TEXT NOT NULL,
        year INTEGER,
        month INTEGER,
        body TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now')),
        PRIMARY KEY(user_id, collection, doc_id)
    );
    CREATE INDEX IF NOT EXISTS idx_documents_period
        ON documents(user_id, collection, year, month);
    "#,
    )?;
    Ok(())
}

fn put_document<T: Serialize>(
    conn: &Connection,
    user: &str,
    collection: &str,
    doc_id: &str,
    period: (Option<i32>, Option<u32>),
    doc: &T,
) -> BudgetResult<()> {
    let body = serde_json::to_string(doc)?;
    conn.execute(
        "INSERT INTO documents(user_id, collection, doc_id, year, month, body, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, datetime('now'))
         ON CONFLICT(user_id, collection, doc_id) DO UPDATE SET
            year=excluded.year, month=excluded.month,
            body=excluded.body, updated_at=excluded.updated_at",
        params![user, collection, doc_id, period.0, period.1, body],
    )?;
    tracing::info!(user, collection, doc_id, "document saved");
    Ok(())
}

/// Loads (doc_id, document) pairs. Rows come back in insertion order unless
/// `order` says otherwise.
fn query_documents<T: DeserializeOwned>(
    conn: &Connection,
    user: &str,
    collection: &str,
    year: Option<i32>,
    order: &str,
) -> BudgetResult<Vec<(String, T)>> {
    let sql = format!(
        "SELECT doc_id, body FROM documents
         WHERE user_id=?1 AND collection=?2 AND (?3 IS NULL OR year=?3)
         ORDER BY {}",
        order
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user, collection, year], |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, body) = row?;
        let doc: T = serde_json::from_str(&body)
            .map_err(|e| BudgetError::Json(format!("{}/{}: {}", collection, id, e)))?;
        out.push((id, doc));
    }
    Ok(out)
}

fn delete_document(conn: &Connection, user: &str, collection: &str, doc_id: &str) -> BudgetResult<bool> {
    let n = conn.execute(
        "DELETE FROM documents WHERE user_id=?1 AND collection=?2 AND doc_id=?3",
        params![user, collection, doc_id],
    )?;
    if n > 0 {
        tracing::info!(user, collection, doc_id, "document deleted");
    }
    Ok(n > 0)
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

// ---- monthly budgets ----

/// Budgets for one year (or all years), ordered by year then month.
pub fn fetch_monthly_budgets(
    conn: &Connection,
    user: &str,
    year: Option<i32>,
) -> BudgetResult<Vec<MonthlyBudget>> {
    let docs = query_documents::<MonthlyBudget>(conn, user, MONTHLY_BUDGETS, year, "year, month, rowid")?;
    Ok(docs
        .into_iter()
        .map(|(id, mut b)| {
            b.id = id;
            b
        })
        .collect())
}

pub fn fetch_monthly_budget(
    conn: &Connection,
    user: &str,
    year: i32,
    month: u32,
) -> BudgetResult<MonthlyBudget> {
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT doc_id, body FROM documents
             WHERE user_id=?1 AND collection=?2 AND year=?3 AND month=?4
             ORDER BY rowid LIMIT 1",
            params![user, MONTHLY_BUDGETS, year, month],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    let (id, body) = row.ok_or_else(|| BudgetError::budget_not_found(year, month))?;
    let mut budget: MonthlyBudget = serde_json::from_str(&body)?;
    budget.id = id;
    Ok(budget)
}

/// Saves a budget, reusing the stored id for its (year, month) when the
/// budget has none yet. Derived fields are recomputed and the timestamps and
/// schema version stamped before writing.
pub fn upsert_monthly_budget(conn: &Connection, user: &str, budget: &mut MonthlyBudget) -> BudgetResult<()> {
    budget.calendar_month()?;
    recalculate(budget);
    if budget.id.is_empty() {
        budget.id = match fetch_monthly_budget(conn, user, budget.year, budget.month) {
            Ok(existing) => {
                budget.created_at = budget.created_at.or(existing.created_at);
                existing.id
            }
            Err(e) if e.is_not_found() => new_id(),
            Err(e) => return Err(e),
        };
    }
    let now = Utc::now();
    budget.created_at.get_or_insert(now);
    budget.updated_at = Some(now);
    budget.schema_version = CURRENT_SCHEMA_VERSION;
    put_document(
        conn,
        user,
        MONTHLY_BUDGETS,
        &budget.id,
        (Some(budget.year), Some(budget.month)),
        budget,
    )
}

// ---- accounts ----

pub fn fetch_accounts(conn: &Connection, user: &str) -> BudgetResult<Vec<AccountValue>> {
    let docs = query_documents::<AccountValue>(conn, user, ACCOUNTS, None, "rowid")?;
    Ok(docs
        .into_iter()
        .map(|(id, mut a)| {
            a.id = id;
            a
        })
        .collect())
}

/// Accounts whose values count toward `year` (year-scoped or legacy unscoped).
pub fn fetch_accounts_for_year(conn: &Connection, user: &str, year: i32) -> BudgetResult<Vec<AccountValue>> {
    Ok(fetch_accounts(conn, user)?
        .into_iter()
        .filter(|a| a.applies_to(year))
        .collect())
}

/// Looks an account up by id, then by name (case-insensitive). With `year`,
/// name matches are limited to accounts scoped to that year or unscoped.
pub fn find_account(
    conn: &Connection,
    user: &str,
    key: &str,
    year: Option<i32>,
) -> BudgetResult<AccountValue> {
    let accounts = fetch_accounts(conn, user)?;
    let key = key.trim();
    accounts
        .iter()
        .find(|a| a.id == key)
        .or_else(|| {
            accounts
                .iter()
                .find(|a| a.name.eq_ignore_ascii_case(key) && year.is_none_or(|y| a.applies_to(y)))
        })
        .cloned()
        .ok_or_else(|| BudgetError::account_not_found(key))
}

pub fn upsert_account(conn: &Connection, user: &str, account: &mut AccountValue) -> BudgetResult<()> {
    let name = account.name.trim().to_string();
    if name.is_empty() {
        return Err(BudgetError::Validation("Account name is required".into()));
    }
    // Names are unique per year; an unscoped account overlaps every year.
    let clash = fetch_accounts(conn, user)?.into_iter().any(|a| {
        a.id != account.id
            && a.name.eq_ignore_ascii_case(&name)
            && (a.year.is_none() || account.year.is_none() || a.year == account.year)
    });
    if clash {
        return Err(BudgetError::Duplicate {
            entity_type: "Account",
            identifier: name,
        });
    }
    account.name = name;
    if account.id.is_empty() {
        account.id = new_id();
    }
    account.recompute();
    let now = Utc::now();
    account.created_at.get_or_insert(now);
    account.updated_at = Some(now);
    put_document(conn, user, ACCOUNTS, &account.id, (account.year, None), account)
}

pub fn delete_account(conn: &Connection, user: &str, id: &str) -> BudgetResult<()> {
    if delete_document(conn, user, ACCOUNTS, id)? {
        Ok(())
    } else {
        Err(BudgetError::account_not_found(id))
    }
}

// ---- templates ----

pub fn fetch_templates(conn: &Connection, user: &str) -> BudgetResult<Vec<BudgetTemplate>> {
    let docs = query_documents::<BudgetTemplate>(conn, user, TEMPLATES, None, "rowid")?;
    Ok(docs
        .into_iter()
        .map(|(id, mut t)| {
            t.id = id;
            t
        })
        .collect())
}

/// Looks a template up by id, then by name (case-insensitive).
pub fn find_template(conn: &Connection, user: &str, key: &str) -> BudgetResult<BudgetTemplate> {
    let templates = fetch_templates(conn, user)?;
    let key = key.trim();
    templates
        .iter()
        .find(|t| t.id == key)
        .or_else(|| templates.iter().find(|t| t.name.eq_ignore_ascii_case(key)))
        .cloned()
        .ok_or_else(|| BudgetError::template_not_found(key))
}

pub fn upsert_template(conn: &Connection, user: &str, template: &mut BudgetTemplate) -> BudgetResult<()> {
    let clash = fetch_templates(conn, user)?
        .into_iter()
        .any(|t| t.id != template.id && t.name.eq_ignore_ascii_case(&template.name));
    if clash {
        return Err(BudgetError::Duplicate {
            entity_type: "Template",
            identifier: template.name.clone(),
        });
    }
    if template.id.is_empty() {
        template.id = new_id();
    }
    let now = Utc::now();
    template.created_at.get_or_insert(now);
    template.updated_at = Some(now);
    put_document(conn, user, TEMPLATES, &template.id, (None, None), template)
}

pub fn delete_template(conn: &Connection, user: &str, id: &str) -> BudgetResult<()> {
    if delete_document(conn, user, TEMPLATES, id)? {
        Ok(())
    } else {
        Err(BudgetError::template_not_found(id))
    }
}

// ---- yearly summaries ----

pub fn fetch_yearly_summary(conn: &Connection, user: &str, year: i32) -> BudgetResult<YearlySummary> {
    query_documents::<YearlySummary>(conn, user, YEARLY_SUMMARIES, Some(year), "rowid")?
        .into_iter()
        .next()
        .map(|(id, mut s)| {
            s.id = id;
            s
        })
        .ok_or_else(|| BudgetError::summary_not_found(year))
}

/// One summary document per year; the year is the document id.
pub fn upsert_yearly_summary(conn: &Connection, user: &str, summary: &mut YearlySummary) -> BudgetResult<()> {
    summary.id = summary.year.to_string();
    summary.updated_at = Some(Utc::now());
    put_document(
        conn,
        user,
        YEARLY_SUMMARIES,
        &summary.id,
        (Some(summary.year), None),
        summary,
    )
}
