// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Recomputes every derived field of a monthly budget, bottom-up.
//!
//! Derived fields are never set directly. Any edit to income, costs,
//! categories or transactions must be followed by [`recalculate`] before the
//! budget is shown or saved.

use rust_decimal::Decimal;

use crate::models::{ExpenseCategory, MonthlyBudget, Side};
use crate::reconcile::effective_actual_cost;

pub fn calculate_totals(mut budget: MonthlyBudget) -> MonthlyBudget {
    recalculate(&mut budget);
    budget
}

pub fn recalculate(budget: &mut MonthlyBudget) {
    for income in [&mut budget.projected_income, &mut budget.actual_income] {
        income.total = income.regular + income.extra;
    }

    for category in budget.projected_expenses.iter_mut() {
        settle_category(category, Side::Projected);
    }
    for category in budget.actual_expenses.iter_mut() {
        settle_category(category, Side::Actual);
    }

    budget.total_projected_cost = budget
        .projected_expenses
        .iter()
        .map(|c| c.subtotal.projected)
        .sum();
    budget.total_actual_cost = budget
        .actual_expenses
        .iter()
        .map(|c| c.subtotal.actual)
        .sum();
    budget.total_difference = budget.total_actual_cost - budget.total_projected_cost;

    budget.projected_balance = budget.projected_income.total - budget.total_projected_cost;
    budget.actual_balance = budget.actual_income.total - budget.total_actual_cost;
    budget.difference = budget.actual_balance - budget.projected_balance;
}

// Only the actual tree reconciles transactions; the projected tree takes the
// manual figure as-is.
fn settle_category(category: &mut ExpenseCategory, side: Side) {
    let mut projected = Decimal::ZERO;
    let mut actual = Decimal::ZERO;
    for item in category.items.iter_mut() {
        let item_actual = match side {
            Side::Projected => item.actual_cost,
            Side::Actual => effective_actual_cost(item),
        };
        item.difference = item_actual - item.projected_cost;
        projected += item.projected_cost;
        actual += item_actual;
    }
    category.subtotal.projected = projected;
    category.subtotal.actual = actual;
    category.subtotal.difference = actual - projected;
}
