// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Folds a year of monthly budgets and account values into a yearly summary.

use rust_decimal::Decimal;

use crate::models::{AccountValue, MonthlyBudget, NetWorthSummary, YearlySummary};
use crate::month::{Month, PerMonth};
use crate::totals::calculate_totals;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Builds the summary for `year`.
///
/// Months without a budget stay zero and still count in the averages, which
/// always divide by twelve. Budgets from other years, or with a month number
/// outside 1-12, are skipped. Net worth for month `i` is savings accumulated
/// through `i` plus every account's contributions accumulated through `i`.
pub fn aggregate_year(
    year: i32,
    budgets: &[MonthlyBudget],
    accounts: &[AccountValue],
) -> YearlySummary {
    let mut income = PerMonth::zeros();
    let mut expenses = PerMonth::zeros();
    let mut savings = PerMonth::zeros();
    let mut projected_income = PerMonth::zeros();
    let mut projected_expenses = PerMonth::zeros();

    for raw in budgets {
        if raw.year != year {
            tracing::debug!(budget_year = raw.year, year, "skipping budget from another year");
            continue;
        }
        let month = match raw.calendar_month() {
            Ok(m) => m,
            Err(err) => {
                tracing::warn!(id = %raw.id, "skipping budget: {}", err);
                continue;
            }
        };
        // Stored derived fields may be stale.
        let budget = calculate_totals(raw.clone());
        income[month] = budget.actual_income.total;
        expenses[month] = budget.total_actual_cost;
        savings[month] = budget.actual_income.total - budget.total_actual_cost;
        projected_income[month] = budget.projected_income.total;
        projected_expenses[month] = budget.total_projected_cost;
    }

    let monthly_net_worth = net_worth(&savings, accounts);

    let yearly_income_total = income.total();
    let yearly_expenses_total = expenses.total();
    let yearly_savings_total = savings.total();

    tracing::debug!(year, budgets = budgets.len(), accounts = accounts.len(), "aggregated year");

    YearlySummary {
        id: String::new(),
        year,
        monthly_income: income,
        monthly_expenses: expenses,
        monthly_savings: savings,
        monthly_projected_income: projected_income,
        monthly_projected_expenses: projected_expenses,
        yearly_income_total,
        yearly_average_income: yearly_income_total / MONTHS_PER_YEAR,
        yearly_expenses_total,
        yearly_average_expense: yearly_expenses_total / MONTHS_PER_YEAR,
        yearly_savings_total,
        yearly_average_savings: yearly_savings_total / MONTHS_PER_YEAR,
        yearly_projected_income_total: projected_income.total(),
        yearly_projected_expenses_total: projected_expenses.total(),
        net_worth_summary: NetWorthSummary {
            yearly_high: monthly_net_worth.max(),
            yearly_total: yearly_savings_total,
            monthly_net_worth,
        },
        account_values: accounts.to_vec(),
        updated_at: None,
    }
}

fn net_worth(savings: &PerMonth, accounts: &[AccountValue]) -> PerMonth {
    let mut contributions = PerMonth::zeros();
    for account in accounts {
        for month in Month::ALL {
            contributions[month] += account.monthly_values[month];
        }
    }
    let cumulative_savings = savings.running_totals();
    let cumulative_contributions = contributions.running_totals();

    let mut out = PerMonth::zeros();
    for month in Month::ALL {
        out[month] = cumulative_savings[month] + cumulative_contributions[month];
    }
    out
}
