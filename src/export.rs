// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Star-schema export of one year of budgets and accounts.
//!
//! Produces seven CSV files (four dimensions, three facts) that analysis
//! tools join on surrogate integer keys. Section keys are handed out in
//! first-seen order: budgets in the order given, and within each budget the
//! actual tree before the projected tree. That order makes repeated exports of
//! the same data byte-identical.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::io::{Cursor, Write};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use rust_decimal::Decimal;
use serde::Serialize;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{find_category, AccountValue, MonthlyBudget, Side};
use crate::month::{month_year_key, Month};
use crate::reconcile::effective_actual_cost;

pub const DIM_DATES: &str = "DimDates.csv";
pub const DIM_PARENT_SECTIONS: &str = "DimParentSections.csv";
pub const DIM_SUB_SECTIONS: &str = "DimSubSections.csv";
pub const DIM_INCOME_TYPES: &str = "DimIncomeTypes.csv";
pub const FCT_ACCOUNT_TOTALS: &str = "FctAccountTotals.csv";
pub const FCT_MONTHLY_INCOMES: &str = "FctMonthlyIncomes.csv";
pub const FCT_BUDGET_TRANSACTIONS: &str = "FctBudgetTransactions.csv";

const ACTUAL_INCOME_TYPE: u32 = 1;
const PROJECTED_INCOME_TYPE: u32 = 2;

/// File name -> CSV text.
pub type ExportBundle = BTreeMap<&'static str, String>;

pub fn archive_name(year: i32) -> String {
    format!("ExportedFinancialData{}.zip", year)
}

#[derive(Serialize)]
struct DateRow {
    month_year_key: String,
}

#[derive(Serialize)]
struct NamedRow {
    id: u32,
    name: String,
}

#[derive(Serialize)]
struct SubSectionRow {
    id: u32,
    name: String,
    parent_section_id: u32,
}

#[derive(Serialize)]
struct AccountTotalRow {
    id: u32,
    name: String,
    month_year: String,
    actual_value: Decimal,
}

#[derive(Serialize)]
struct MonthlyIncomeRow {
    id: u32,
    name: &'static str,
    value: Decimal,
    month_year: String,
    income_type_id: u32,
}

#[derive(Serialize)]
struct BudgetTransactionRow {
    id: u32,
    month_year: String,
    parent_section_id: u32,
    sub_section_id: u32,
    projected_cost: Decimal,
    actual_cost: Decimal,
}

/// Hands out 1-based surrogate keys in first-seen order.
struct SurrogateKeys<K> {
    order: Vec<K>,
    ids: HashMap<K, u32>,
}

impl<K: Clone + Eq + Hash> SurrogateKeys<K> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            ids: HashMap::new(),
        }
    }

    fn intern(&mut self, key: K) -> u32 {
        if let Some(id) = self.ids.get(&key) {
            return *id;
        }
        let id = self.order.len() as u32 + 1;
        self.order.push(key.clone());
        self.ids.insert(key, id);
        id
    }

    fn id(&self, key: &K) -> u32 {
        self.ids.get(key).copied().unwrap_or(0)
    }

    fn iter(&self) -> impl Iterator<Item = (u32, &K)> {
        self.order.iter().enumerate().map(|(i, k)| (i as u32 + 1, k))
    }
}

pub fn export_year(
    year: i32,
    budgets: &[MonthlyBudget],
    accounts: &[AccountValue],
) -> BudgetResult<ExportBundle> {
    let budgets: Vec<(Month, &MonthlyBudget)> = budgets
        .iter()
        .filter(|b| b.year == year)
        .filter_map(|b| b.calendar_month().ok().map(|m| (m, b)))
        .collect();

    let mut parents: SurrogateKeys<String> = SurrogateKeys::new();
    let mut subs: SurrogateKeys<(String, String)> = SurrogateKeys::new();
    for (_, budget) in &budgets {
        for side in [Side::Actual, Side::Projected] {
            for category in budget.tree(side) {
                parents.intern(category.name.clone());
            }
        }
    }
    for (_, budget) in &budgets {
        for side in [Side::Actual, Side::Projected] {
            for category in budget.tree(side) {
                for item in &category.items {
                    subs.intern((category.name.clone(), item.sub_category.clone()));
                }
            }
        }
    }

    let dates: Vec<DateRow> = Month::ALL
        .iter()
        .map(|m| DateRow {
            month_year_key: month_year_key(year, *m),
        })
        .collect();

    let income_types = vec![
        NamedRow {
            id: ACTUAL_INCOME_TYPE,
            name: "Actual Income".into(),
        },
        NamedRow {
            id: PROJECTED_INCOME_TYPE,
            name: "Projected Income".into(),
        },
    ];

    let parent_rows: Vec<NamedRow> = parents
        .iter()
        .map(|(id, name)| NamedRow {
            id,
            name: name.clone(),
        })
        .collect();

    let sub_rows: Vec<SubSectionRow> = subs
        .iter()
        .map(|(id, (parent, name))| SubSectionRow {
            id,
            name: name.clone(),
            parent_section_id: parents.id(parent),
        })
        .collect();

    let mut incomes: Vec<MonthlyIncomeRow> = Vec::new();
    let mut lines: Vec<BudgetTransactionRow> = Vec::new();
    for (month, budget) in &budgets {
        let key = month_year_key(budget.year, *month);

        let candidates = [
            ("Actual Regular Income", budget.actual_income.regular, ACTUAL_INCOME_TYPE),
            ("Actual Extra Income", budget.actual_income.extra, ACTUAL_INCOME_TYPE),
            ("Projected Regular Income", budget.projected_income.regular, PROJECTED_INCOME_TYPE),
            ("Projected Extra Income", budget.projected_income.extra, PROJECTED_INCOME_TYPE),
        ];
        for (name, value, income_type_id) in candidates {
            if value > Decimal::ZERO {
                incomes.push(MonthlyIncomeRow {
                    id: incomes.len() as u32 + 1,
                    name,
                    value: value.normalize(),
                    month_year: key.clone(),
                    income_type_id,
                });
            }
        }

        for category in &budget.actual_expenses {
            let planned = find_category(&budget.projected_expenses, &category.name);
            for item in &category.items {
                let projected_cost = planned
                    .and_then(|c| c.item(&item.sub_category))
                    .map(|i| i.projected_cost)
                    .unwrap_or(Decimal::ZERO);
                lines.push(BudgetTransactionRow {
                    id: lines.len() as u32 + 1,
                    month_year: key.clone(),
                    parent_section_id: parents.id(&category.name),
                    sub_section_id: subs.id(&(category.name.clone(), item.sub_category.clone())),
                    projected_cost: projected_cost.normalize(),
                    actual_cost: effective_actual_cost(item).normalize(),
                });
            }
        }

        // Projected-only lines; paired lines were emitted above.
        for category in &budget.projected_expenses {
            let realised = find_category(&budget.actual_expenses, &category.name);
            for item in &category.items {
                if realised.and_then(|c| c.item(&item.sub_category)).is_some() {
                    continue;
                }
                lines.push(BudgetTransactionRow {
                    id: lines.len() as u32 + 1,
                    month_year: key.clone(),
                    parent_section_id: parents.id(&category.name),
                    sub_section_id: subs.id(&(category.name.clone(), item.sub_category.clone())),
                    projected_cost: item.projected_cost.normalize(),
                    actual_cost: Decimal::ZERO,
                });
            }
        }
    }

    let mut account_rows: Vec<AccountTotalRow> = Vec::new();
    for account in accounts {
        for month in Month::ALL {
            account_rows.push(AccountTotalRow {
                id: account_rows.len() as u32 + 1,
                name: account.name.clone(),
                month_year: month_year_key(year, month),
                actual_value: account.monthly_values.get(month.index()).normalize(),
            });
        }
    }

    let mut bundle = ExportBundle::new();
    bundle.insert(DIM_DATES, to_csv(&["MonthYearKey"], &dates)?);
    bundle.insert(DIM_PARENT_SECTIONS, to_csv(&["ID", "Name"], &parent_rows)?);
    bundle.insert(
        DIM_SUB_SECTIONS,
        to_csv(&["ID", "Name", "ParentSectionID"], &sub_rows)?,
    );
    bundle.insert(DIM_INCOME_TYPES, to_csv(&["ID", "Name"], &income_types)?);
    bundle.insert(
        FCT_ACCOUNT_TOTALS,
        to_csv(&["ID", "Name", "MonthYear", "ActualValue"], &account_rows)?,
    );
    bundle.insert(
        FCT_MONTHLY_INCOMES,
        to_csv(&["ID", "Name", "Value", "MonthYear", "IncomeTypeID"], &incomes)?,
    );
    bundle.insert(
        FCT_BUDGET_TRANSACTIONS,
        to_csv(
            &[
                "ID",
                "MonthYear",
                "ParentSectionID",
                "SubSectionID",
                "ProjectedCost",
                "ActualCost",
            ],
            &lines,
        )?,
    );

    tracing::debug!(
        year,
        parent_sections = parent_rows.len(),
        sub_sections = sub_rows.len(),
        budget_lines = lines.len(),
        "built export bundle"
    );
    Ok(bundle)
}

/// Header line first, `\n` between lines. Fields holding a comma or a quote
/// are quoted with inner quotes doubled. A table with no rows is its header
/// plus a newline; otherwise there is no trailing newline.
fn to_csv<R: Serialize>(headers: &[&str], rows: &[R]) -> BudgetResult<String> {
    // `Necessary` also quotes fields holding `\r` or `\n`, so a line break in a
    // name stays inside one record.
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    wtr.write_record(headers)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| BudgetError::Csv(e.to_string()))?;
    let mut text = String::from_utf8(bytes).map_err(|e| BudgetError::Csv(e.to_string()))?;
    if !rows.is_empty() && text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Zips the bundle (deflate) into a single archive.
pub fn bundle_archive(bundle: &ExportBundle) -> BudgetResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, content) in bundle {
        zip.start_file(*name, options)?;
        zip.write_all(content.as_bytes())?;
    }
    Ok(zip.finish()?.into_inner())
}
