// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Edits applied to a monthly budget.
//!
//! Structural edits touch the projected and actual trees together, matched by
//! category / sub-category name, so the two trees keep the same shape. Every
//! edit finishes with a totals pass.

use rust_decimal::Decimal;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    find_category, find_category_mut, BudgetTemplate, ExpenseCategory, ExpenseItem, Income,
    MonthlyBudget, Side,
};
use crate::reconcile::{self, TransactionDraft};
use crate::totals::recalculate;

const SIDES: [Side; 2] = [Side::Projected, Side::Actual];

fn clean_name(raw: &str, what: &str) -> BudgetResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(BudgetError::Validation(format!("{} name is required", what)));
    }
    Ok(name.to_string())
}

/// Canonical spelling of a category as stored, matched case-insensitively.
pub fn resolve_category(budget: &MonthlyBudget, name: &str) -> BudgetResult<String> {
    let wanted = name.trim();
    SIDES
        .iter()
        .flat_map(|s| budget.tree(*s))
        .find(|c| c.name.eq_ignore_ascii_case(wanted))
        .map(|c| c.name.clone())
        .ok_or_else(|| BudgetError::category_not_found(wanted))
}

/// Canonical spelling of a sub-category within a canonical category.
pub fn resolve_item(budget: &MonthlyBudget, category: &str, name: &str) -> BudgetResult<String> {
    let wanted = name.trim();
    SIDES
        .iter()
        .filter_map(|s| find_category(budget.tree(*s), category))
        .flat_map(|c| c.items.iter())
        .find(|i| i.sub_category.eq_ignore_ascii_case(wanted))
        .map(|i| i.sub_category.clone())
        .ok_or_else(|| BudgetError::item_not_found(format!("{} / {}", category, wanted)))
}

pub fn set_income(budget: &mut MonthlyBudget, side: Side, regular: Decimal, extra: Decimal) {
    *budget.income_mut(side) = Income::new(regular, extra);
    recalculate(budget);
}

pub fn add_category(budget: &mut MonthlyBudget, name: &str) -> BudgetResult<()> {
    let name = clean_name(name, "Category")?;
    if resolve_category(budget, &name).is_ok() {
        return Err(BudgetError::Duplicate {
            entity_type: "Category",
            identifier: name,
        });
    }
    for side in SIDES {
        budget.tree_mut(side).push(ExpenseCategory::new(name.clone()));
    }
    recalculate(budget);
    Ok(())
}

pub fn remove_category(budget: &mut MonthlyBudget, name: &str) -> BudgetResult<()> {
    let name = resolve_category(budget, name)?;
    for side in SIDES {
        budget.tree_mut(side).retain(|c| c.name != name);
    }
    recalculate(budget);
    Ok(())
}

pub fn add_item(budget: &mut MonthlyBudget, category: &str, sub_category: &str) -> BudgetResult<()> {
    let category = resolve_category(budget, category)?;
    let sub_category = clean_name(sub_category, "Subcategory")?;
    let taken = SIDES
        .iter()
        .filter_map(|s| find_category(budget.tree(*s), &category))
        .any(|c| c.has_item_ignore_case(&sub_category));
    if taken {
        return Err(BudgetError::Duplicate {
            entity_type: "Subcategory",
            identifier: format!("{} / {}", category, sub_category),
        });
    }
    for side in SIDES {
        let tree = budget.tree_mut(side);
        if find_category(tree, &category).is_none() {
            tree.push(ExpenseCategory::new(category.clone()));
        }
        if let Some(cat) = find_category_mut(tree, &category) {
            cat.items.push(ExpenseItem::new(sub_category.clone()));
        }
    }
    recalculate(budget);
    Ok(())
}

pub fn remove_item(budget: &mut MonthlyBudget, category: &str, sub_category: &str) -> BudgetResult<()> {
    let category = resolve_category(budget, category)?;
    let sub_category = resolve_item(budget, &category, sub_category)?;
    for side in SIDES {
        if let Some(cat) = find_category_mut(budget.tree_mut(side), &category) {
            cat.items.retain(|i| i.sub_category != sub_category);
        }
    }
    recalculate(budget);
    Ok(())
}

fn item_mut<'a>(
    budget: &'a mut MonthlyBudget,
    side: Side,
    category: &str,
    sub_category: &str,
) -> Option<&'a mut ExpenseItem> {
    find_category_mut(budget.tree_mut(side), category).and_then(|c| c.item_mut(sub_category))
}

/// Sets the planned cost on both trees.
pub fn set_projected_cost(
    budget: &mut MonthlyBudget,
    category: &str,
    sub_category: &str,
    value: Decimal,
) -> BudgetResult<()> {
    let category = resolve_category(budget, category)?;
    let sub_category = resolve_item(budget, &category, sub_category)?;
    for side in SIDES {
        if let Some(item) = item_mut(budget, side, &category, &sub_category) {
            item.projected_cost = value;
        }
    }
    recalculate(budget);
    Ok(())
}

/// Sets the manual actual cost on the actual tree.
pub fn set_actual_cost(
    budget: &mut MonthlyBudget,
    category: &str,
    sub_category: &str,
    value: Decimal,
) -> BudgetResult<()> {
    let category = resolve_category(budget, category)?;
    let sub_category = resolve_item(budget, &category, sub_category)?;
    let item = item_mut(budget, Side::Actual, &category, &sub_category)
        .ok_or_else(|| BudgetError::item_not_found(format!("{} / {}", category, sub_category)))?;
    item.actual_cost = value;
    recalculate(budget);
    Ok(())
}

pub fn record_transaction(
    budget: &mut MonthlyBudget,
    category: &str,
    sub_category: &str,
    draft: &TransactionDraft,
) -> BudgetResult<String> {
    let category = resolve_category(budget, category)?;
    let sub_category = resolve_item(budget, &category, sub_category)?;
    let item = item_mut(budget, Side::Actual, &category, &sub_category)
        .ok_or_else(|| BudgetError::item_not_found(format!("{} / {}", category, sub_category)))?;
    let id = reconcile::add_transaction(item, draft)?;
    recalculate(budget);
    Ok(id)
}

/// Deletes a transaction from the actual tree. Unknown ids leave the budget
/// unchanged and return `false`.
pub fn delete_transaction(
    budget: &mut MonthlyBudget,
    category: &str,
    sub_category: &str,
    id: &str,
) -> BudgetResult<bool> {
    let category = resolve_category(budget, category)?;
    let sub_category = resolve_item(budget, &category, sub_category)?;
    let removed = item_mut(budget, Side::Actual, &category, &sub_category)
        .map(|item| reconcile::remove_transaction(item, id))
        .unwrap_or(false);
    recalculate(budget);
    Ok(removed)
}

/// Captures the projected side of a budget as a reusable template.
pub fn capture_template(
    budget: &MonthlyBudget,
    name: &str,
    description: Option<&str>,
    existing: &[BudgetTemplate],
) -> BudgetResult<BudgetTemplate> {
    let name = clean_name(name, "Template")?;
    if existing.iter().any(|t| t.name.eq_ignore_ascii_case(&name)) {
        return Err(BudgetError::Duplicate {
            entity_type: "Template",
            identifier: name,
        });
    }
    let income = &budget.projected_income;
    Ok(BudgetTemplate {
        id: String::new(),
        name,
        description: description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        projected_income: Income::new(income.regular, income.extra),
        expense_categories: budget.projected_expenses.iter().map(skeleton_of).collect(),
        created_at: None,
        updated_at: None,
    })
}

fn skeleton_of(category: &ExpenseCategory) -> ExpenseCategory {
    ExpenseCategory {
        name: category.name.clone(),
        items: category
            .items
            .iter()
            .map(|i| ExpenseItem {
                sub_category: i.sub_category.clone(),
                projected_cost: i.projected_cost,
                ..Default::default()
            })
            .collect(),
        subtotal: Default::default(),
    }
}

/// Replaces projected income and both expense trees with the template's
/// skeleton. Actual costs and transactions of the month are discarded.
pub fn apply_template(budget: &mut MonthlyBudget, template: &BudgetTemplate) {
    let income = &template.projected_income;
    budget.projected_income = Income::new(income.regular, income.extra);
    budget.projected_expenses = template.expense_categories.iter().map(skeleton_of).collect();
    budget.actual_expenses = budget.projected_expenses.clone();
    recalculate(budget);
}
