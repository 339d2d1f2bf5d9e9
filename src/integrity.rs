// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Detects drift between a budget's projected and actual trees.
//!
//! Drift is never fatal. Totals, aggregation and export all treat an
//! unmatched side as zero; these warnings only make the drift visible.

use serde::Serialize;
use std::fmt;

use crate::models::{find_category, MonthlyBudget, Side};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IntegrityWarning {
    CategoryMissing {
        category: String,
        missing_from: Side,
    },
    ItemMissing {
        category: String,
        sub_category: String,
        missing_from: Side,
    },
    OrderMismatch {
        position: usize,
        projected: String,
        actual: String,
    },
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CategoryMissing { category, missing_from } => {
                write!(f, "category '{}' missing from {} expenses", category, missing_from)
            }
            Self::ItemMissing { category, sub_category, missing_from } => write!(
                f,
                "subcategory '{} / {}' missing from {} expenses",
                category, sub_category, missing_from
            ),
            Self::OrderMismatch { position, projected, actual } => write!(
                f,
                "category #{} differs: projected '{}' vs actual '{}'",
                position + 1,
                projected,
                actual
            ),
        }
    }
}

pub fn check_budget(budget: &MonthlyBudget) -> Vec<IntegrityWarning> {
    let mut out = Vec::new();
    let projected = &budget.projected_expenses;
    let actual = &budget.actual_expenses;

    for (position, (p, a)) in projected.iter().zip(actual.iter()).enumerate() {
        if p.name != a.name {
            out.push(IntegrityWarning::OrderMismatch {
                position,
                projected: p.name.clone(),
                actual: a.name.clone(),
            });
        }
    }

    for (side, this, other) in [
        (Side::Actual, projected, actual),
        (Side::Projected, actual, projected),
    ] {
        for category in this {
            let Some(counterpart) = find_category(other, &category.name) else {
                out.push(IntegrityWarning::CategoryMissing {
                    category: category.name.clone(),
                    missing_from: side,
                });
                continue;
            };
            for item in &category.items {
                if counterpart.item(&item.sub_category).is_none() {
                    out.push(IntegrityWarning::ItemMissing {
                        category: category.name.clone(),
                        sub_category: item.sub_category.clone(),
                        missing_from: side,
                    });
                }
            }
        }
    }

    for w in &out {
        tracing::warn!(year = budget.year, month = budget.month, "{}", w);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseCategory, ExpenseItem};
    use crate::month::Month;

    fn cat(name: &str, items: &[&str]) -> ExpenseCategory {
        ExpenseCategory {
            name: name.into(),
            items: items.iter().map(|i| ExpenseItem::new(*i)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn aligned_trees_are_clean() {
        let b = MonthlyBudget::new(2025, Month::March);
        assert!(check_budget(&b).is_empty());
    }

    #[test]
    fn reports_each_kind_of_drift() {
        let mut b = MonthlyBudget::empty(2025, Month::March, vec![]);
        b.projected_expenses = vec![cat("Home", &["Rent", "Power"]), cat("Fun", &[])];
        b.actual_expenses = vec![cat("Fun", &[]), cat("Home", &["Rent", "Water"])];
        let warnings = check_budget(&b);
        assert!(warnings.contains(&IntegrityWarning::OrderMismatch {
            position: 0,
            projected: "Home".into(),
            actual: "Fun".into(),
        }));
        assert!(warnings.contains(&IntegrityWarning::ItemMissing {
            category: "Home".into(),
            sub_category: "Power".into(),
            missing_from: Side::Actual,
        }));
        assert!(warnings.contains(&IntegrityWarning::ItemMissing {
            category: "Home".into(),
            sub_category: "Water".into(),
            missing_from: Side::Projected,
        }));
        assert_eq!(warnings.len(), 4);
    }

    #[test]
    fn missing_category_message() {
        let mut b = MonthlyBudget::empty(2025, Month::March, vec![]);
        b.projected_expenses = vec![cat("Travel", &["Flights"])];
        let warnings = check_budget(&b);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].to_string(),
            "category 'Travel' missing from actual expenses"
        );
    }
}
