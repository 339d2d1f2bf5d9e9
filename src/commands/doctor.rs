// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::integrity::{check_budget, IntegrityWarning};
use crate::models::CURRENT_SCHEMA_VERSION;
use crate::utils::{maybe_print_json, parse_year, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Serialize)]
struct Finding {
    period: String,
    #[serde(flatten)]
    warning: Issue,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Issue {
    Integrity(IntegrityWarning),
    Stale { kind: &'static str, detail: String },
}

/// Returns the number of findings.
pub fn handle(conn: &Connection, user: &str, m: &clap::ArgMatches) -> Result<usize> {
    let year = m.get_one::<String>("year").map(|y| parse_year(y)).transpose()?;
    let mut findings = Vec::new();

    for budget in db::fetch_monthly_budgets(conn, user, year)? {
        let period = format!("{}-{:02}", budget.year, budget.month);
        if let Err(e) = budget.calendar_month() {
            findings.push(Finding {
                period,
                warning: Issue::Stale {
                    kind: "invalidMonth",
                    detail: e.to_string(),
                },
            });
            continue;
        }
        if budget.schema_version < CURRENT_SCHEMA_VERSION {
            findings.push(Finding {
                period: period.clone(),
                warning: Issue::Stale {
                    kind: "legacySchema",
                    detail: format!(
                        "schema v{} (current v{}); re-saved on next edit",
                        budget.schema_version, CURRENT_SCHEMA_VERSION
                    ),
                },
            });
        }
        for w in check_budget(&budget) {
            findings.push(Finding {
                period: period.clone(),
                warning: Issue::Integrity(w),
            });
        }
    }

    let count = findings.len();
    if maybe_print_json(m.get_flag("json"), &findings)? {
        return Ok(count);
    }
    if findings.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = findings
            .into_iter()
            .map(|f| {
                let detail = match f.warning {
                    Issue::Integrity(w) => w.to_string(),
                    Issue::Stale { detail, .. } => detail,
                };
                vec![f.period, detail]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Issue"], rows));
    }
    Ok(count)
}
