// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reconciles an item's manually entered actual cost with its itemised
//! transactions.
//!
//! The manual `actual_cost` predates transaction tracking. The two are never
//! added together: whichever is larger is the item's effective actual cost.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{ExpenseItem, ExpenseTransaction};

pub fn transactions_total(item: &ExpenseItem) -> Decimal {
    item.transactions.iter().map(|t| t.amount).sum()
}

pub fn effective_actual_cost(item: &ExpenseItem) -> Decimal {
    item.actual_cost.max(transactions_total(item))
}

/// Unvalidated transaction input as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: Decimal,
    pub date: String, // YYYY-MM-DD
}

impl TransactionDraft {
    pub fn new(description: impl Into<String>, amount: Decimal, date: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            amount,
            date: date.into(),
        }
    }

    fn validate(&self) -> BudgetResult<(String, NaiveDate)> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(BudgetError::Validation(
                "Transaction description is required".into(),
            ));
        }
        if self.amount <= Decimal::ZERO {
            return Err(BudgetError::Validation(format!(
                "Transaction amount must be positive, got {}",
                self.amount
            )));
        }
        let raw_date = self.date.trim();
        if raw_date.is_empty() {
            return Err(BudgetError::Validation("Transaction date is required".into()));
        }
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|_| {
            BudgetError::Validation(format!(
                "Invalid transaction date '{}', expected YYYY-MM-DD",
                raw_date
            ))
        })?;
        Ok((description.to_string(), date))
    }
}

/// Validates the draft and records it at the front of the item's list.
/// A rejected draft leaves the item untouched.
pub fn add_transaction(item: &mut ExpenseItem, draft: &TransactionDraft) -> BudgetResult<String> {
    let (description, date) = draft.validate()?;
    let tx = ExpenseTransaction {
        id: format!("trans_{}", Uuid::new_v4().simple()),
        description,
        amount: draft.amount,
        date,
        created_at: Utc::now(),
    };
    let id = tx.id.clone();
    item.transactions.insert(0, tx);
    tracing::debug!(sub_category = %item.sub_category, %id, "transaction added");
    Ok(id)
}

/// Removes one transaction by id. Returns `false` when nothing matched.
pub fn remove_transaction(item: &mut ExpenseItem, id: &str) -> bool {
    match item.transactions.iter().position(|t| t.id == id) {
        Some(pos) => {
            item.transactions.remove(pos);
            true
        }
        None => false,
    }
}
