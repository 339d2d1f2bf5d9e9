// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{BudgetError, BudgetResult};
use crate::month::{Month, PerMonth};

/// Bumped whenever a stored document gains a field. Documents written before
/// a bump load through serde defaults and are re-stamped on their next save.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Which half of a budget a figure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Projected,
    Actual,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Projected => f.write_str("projected"),
            Side::Actual => f.write_str("actual"),
        }
    }
}

impl FromStr for Side {
    type Err = BudgetError;

    fn from_str(s: &str) -> BudgetResult<Side> {
        match s.trim().to_ascii_lowercase().as_str() {
            "projected" => Ok(Side::Projected),
            "actual" => Ok(Side::Actual),
            other => Err(BudgetError::Validation(format!(
                "Unknown side '{}', expected projected|actual",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    #[serde(default)]
    pub regular: Decimal,
    #[serde(default)]
    pub extra: Decimal,
    #[serde(default)]
    pub total: Decimal, // derived: regular + extra
}

impl Income {
    pub fn new(regular: Decimal, extra: Decimal) -> Self {
        Self {
            regular,
            extra,
            total: regular + extra,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseTransaction {
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseItem {
    pub sub_category: String,
    #[serde(default)]
    pub projected_cost: Decimal,
    #[serde(default)]
    pub actual_cost: Decimal,
    #[serde(default)]
    pub difference: Decimal,
    /// Newest first. Absent on documents saved before itemised spending existed.
    #[serde(default)]
    pub transactions: Vec<ExpenseTransaction>,
}

impl ExpenseItem {
    pub fn new(sub_category: impl Into<String>) -> Self {
        Self {
            sub_category: sub_category.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtotal {
    #[serde(default)]
    pub projected: Decimal,
    #[serde(default)]
    pub actual: Decimal,
    #[serde(default)]
    pub difference: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategory {
    pub name: String,
    #[serde(default)]
    pub items: Vec<ExpenseItem>,
    #[serde(default)]
    pub subtotal: Subtotal,
}

impl ExpenseCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Exact-name lookup used when pairing the projected and actual trees.
    pub fn item(&self, sub_category: &str) -> Option<&ExpenseItem> {
        self.items.iter().find(|i| i.sub_category == sub_category)
    }

    pub fn item_mut(&mut self, sub_category: &str) -> Option<&mut ExpenseItem> {
        self.items.iter_mut().find(|i| i.sub_category == sub_category)
    }

    pub fn has_item_ignore_case(&self, sub_category: &str) -> bool {
        self.items
            .iter()
            .any(|i| i.sub_category.eq_ignore_ascii_case(sub_category))
    }
}

pub fn find_category<'a>(tree: &'a [ExpenseCategory], name: &str) -> Option<&'a ExpenseCategory> {
    tree.iter().find(|c| c.name == name)
}

pub fn find_category_mut<'a>(
    tree: &'a mut [ExpenseCategory],
    name: &str,
) -> Option<&'a mut ExpenseCategory> {
    tree.iter_mut().find(|c| c.name == name)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBudget {
    #[serde(default)]
    pub id: String,
    pub year: i32,
    pub month: u32, // 1-12
    #[serde(default)]
    pub projected_income: Income,
    #[serde(default)]
    pub actual_income: Income,
    #[serde(default)]
    pub projected_expenses: Vec<ExpenseCategory>,
    #[serde(default)]
    pub actual_expenses: Vec<ExpenseCategory>,
    #[serde(default)]
    pub projected_balance: Decimal,
    #[serde(default)]
    pub actual_balance: Decimal,
    #[serde(default)]
    pub difference: Decimal,
    #[serde(default)]
    pub total_projected_cost: Decimal,
    #[serde(default)]
    pub total_actual_cost: Decimal,
    #[serde(default)]
    pub total_difference: Decimal,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub schema_version: u32,
}

impl MonthlyBudget {
    /// Blank budget with the starter skeleton mirrored into both trees.
    pub fn new(year: i32, month: Month) -> Self {
        let skeleton = ExpenseCategory {
            name: "Category".to_string(),
            items: (1..=5)
                .map(|n| ExpenseItem::new(format!("Subcategory{}", n)))
                .collect(),
            subtotal: Subtotal::default(),
        };
        Self::empty(year, month, vec![skeleton])
    }

    /// Blank budget with the given categories in both trees.
    pub fn empty(year: i32, month: Month, categories: Vec<ExpenseCategory>) -> Self {
        Self {
            id: String::new(),
            year,
            month: month.number(),
            projected_income: Income::default(),
            actual_income: Income::default(),
            projected_expenses: categories.clone(),
            actual_expenses: categories,
            projected_balance: Decimal::ZERO,
            actual_balance: Decimal::ZERO,
            difference: Decimal::ZERO,
            total_projected_cost: Decimal::ZERO,
            total_actual_cost: Decimal::ZERO,
            total_difference: Decimal::ZERO,
            created_at: None,
            updated_at: None,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn calendar_month(&self) -> BudgetResult<Month> {
        Month::from_number(self.month)
    }

    pub fn income(&self, side: Side) -> &Income {
        match side {
            Side::Projected => &self.projected_income,
            Side::Actual => &self.actual_income,
        }
    }

    pub fn income_mut(&mut self, side: Side) -> &mut Income {
        match side {
            Side::Projected => &mut self.projected_income,
            Side::Actual => &mut self.actual_income,
        }
    }

    pub fn tree(&self, side: Side) -> &[ExpenseCategory] {
        match side {
            Side::Projected => &self.projected_expenses,
            Side::Actual => &self.actual_expenses,
        }
    }

    pub fn tree_mut(&mut self, side: Side) -> &mut Vec<ExpenseCategory> {
        match side {
            Side::Projected => &mut self.projected_expenses,
            Side::Actual => &mut self.actual_expenses,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountValue {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Year the monthly values belong to. `None` on legacy records, which
    /// count toward every year.
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub monthly_values: PerMonth,
    #[serde(default)]
    pub current_value: Decimal, // derived: sum of monthly_values
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AccountValue {
    pub fn new(name: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            year,
            monthly_values: PerMonth::zeros(),
            current_value: Decimal::ZERO,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn set_month_value(&mut self, month: Month, value: Decimal) {
        self.monthly_values[month] = value;
        self.recompute();
    }

    pub fn recompute(&mut self) {
        self.current_value = self.monthly_values.total();
    }

    pub fn applies_to(&self, year: i32) -> bool {
        self.year.is_none_or(|y| y == year)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthSummary {
    #[serde(default)]
    pub monthly_net_worth: PerMonth,
    #[serde(default)]
    pub yearly_high: Decimal,
    #[serde(default)]
    pub yearly_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySummary {
    #[serde(default)]
    pub id: String,
    pub year: i32,
    #[serde(default)]
    pub monthly_income: PerMonth,
    #[serde(default)]
    pub monthly_expenses: PerMonth,
    #[serde(default)]
    pub monthly_savings: PerMonth,
    #[serde(default)]
    pub monthly_projected_income: PerMonth,
    #[serde(default)]
    pub monthly_projected_expenses: PerMonth,
    #[serde(default)]
    pub yearly_income_total: Decimal,
    #[serde(default)]
    pub yearly_average_income: Decimal,
    #[serde(default)]
    pub yearly_expenses_total: Decimal,
    #[serde(default)]
    pub yearly_average_expense: Decimal,
    #[serde(default)]
    pub yearly_savings_total: Decimal,
    #[serde(default)]
    pub yearly_average_savings: Decimal,
    #[serde(default)]
    pub yearly_projected_income_total: Decimal,
    #[serde(default)]
    pub yearly_projected_expenses_total: Decimal,
    #[serde(default)]
    pub net_worth_summary: NetWorthSummary,
    /// Accounts the summary was computed from.
    #[serde(default)]
    pub account_values: Vec<AccountValue>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTemplate {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub projected_income: Income,
    #[serde(default)]
    pub expense_categories: Vec<ExpenseCategory>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_budget_without_transactions_loads() {
        let raw = r#"{
            "year": 2024,
            "month": 6,
            "projectedIncome": {"regular": 1000, "extra": 0, "total": 1000},
            "actualExpenses": [
                {"name": "Home", "items": [
                    {"subCategory": "Rent", "projectedCost": 800, "actualCost": 800, "difference": 0}
                ], "subtotal": {"projected": 800, "actual": 800, "difference": 0}}
            ],
            "totalActualCost": 800
        }"#;
        let budget: MonthlyBudget = serde_json::from_str(raw).unwrap();
        assert_eq!(budget.schema_version, 0);
        assert!(budget.projected_expenses.is_empty());
        let rent = &budget.actual_expenses[0].items[0];
        assert!(rent.transactions.is_empty());
        assert_eq!(rent.actual_cost, Decimal::from(800));
        assert_eq!(budget.calendar_month().unwrap(), Month::June);
    }

    #[test]
    fn legacy_account_without_values_defaults_to_zero() {
        let acct: AccountValue = serde_json::from_str(r#"{"name": "Savings"}"#).unwrap();
        assert_eq!(acct.monthly_values, PerMonth::zeros());
        assert_eq!(acct.year, None);
        assert!(acct.applies_to(1999));
        assert!(acct.applies_to(2030));
    }

    #[test]
    fn account_month_value_keeps_current_value_in_sync() {
        let mut acct = AccountValue::new("Brokerage", Some(2025));
        acct.set_month_value(Month::January, Decimal::from(100));
        acct.set_month_value(Month::July, Decimal::from(250));
        acct.set_month_value(Month::January, Decimal::from(40));
        assert_eq!(acct.current_value, Decimal::from(290));
        assert!(acct.applies_to(2025));
        assert!(!acct.applies_to(2024));
    }

    #[test]
    fn new_budget_mirrors_skeleton() {
        let b = MonthlyBudget::new(2025, Month::February);
        assert_eq!(b.month, 2);
        assert_eq!(b.projected_expenses, b.actual_expenses);
        assert_eq!(b.projected_expenses[0].items.len(), 5);
        assert_eq!(b.projected_expenses[0].items[4].sub_category, "Subcategory5");
    }

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!("Actual".parse::<Side>().unwrap(), Side::Actual);
        assert!("planned".parse::<Side>().unwrap_err().is_validation());
    }
}
