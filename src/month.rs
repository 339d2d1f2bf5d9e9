// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar months and twelve-slot per-month value arrays.
//!
//! Stored documents use 1-based month numbers while every yearly array is
//! 0-based. [`Month`] is the only place the two are converted.

use std::fmt;
use std::ops::{Index, IndexMut};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{BudgetError, BudgetResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    const ABBREVIATIONS: [&'static str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    /// Converts a stored 1-based month number.
    pub fn from_number(n: u32) -> BudgetResult<Month> {
        n.checked_sub(1)
            .and_then(|i| Month::from_index(i as usize))
            .ok_or_else(|| BudgetError::Validation(format!("Invalid month number {}", n)))
    }

    pub fn from_index(i: usize) -> Option<Month> {
        Month::ALL.get(i).copied()
    }

    /// 1-based calendar number.
    pub fn number(self) -> u32 {
        self.index() as u32 + 1
    }

    /// 0-based array position.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn abbrev(self) -> &'static str {
        Self::ABBREVIATIONS[self.index()]
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

/// `YY-Mon` key used by the date dimension, e.g. `25-Mar`.
pub fn month_year_key(year: i32, month: Month) -> String {
    format!("{:02}-{}", year.rem_euclid(100), month.abbrev())
}

/// One decimal per calendar month, January first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerMonth(pub [Decimal; 12]);

impl PerMonth {
    pub fn zeros() -> Self {
        Self([Decimal::ZERO; 12])
    }

    pub fn total(&self) -> Decimal {
        self.0.iter().copied().sum()
    }

    pub fn max(&self) -> Decimal {
        self.0.iter().copied().max().unwrap_or(Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Month, Decimal)> + '_ {
        Month::ALL.iter().map(move |m| (*m, self[*m]))
    }

    /// Running totals: slot `i` holds the sum of slots `0..=i`.
    pub fn running_totals(&self) -> PerMonth {
        let mut out = PerMonth::zeros();
        let mut acc = Decimal::ZERO;
        for (i, v) in self.0.iter().enumerate() {
            acc += *v;
            out.0[i] = acc;
        }
        out
    }

    /// Value at a 0-based position, zero past the end.
    pub fn get(&self, i: usize) -> Decimal {
        self.0.get(i).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn to_vec(&self) -> Vec<Decimal> {
        self.0.to_vec()
    }

    /// Builds from a slice of any length: short input is zero-padded, extra
    /// values are dropped.
    pub fn from_slice(values: &[Decimal]) -> Self {
        let mut out = PerMonth::zeros();
        for (slot, v) in out.0.iter_mut().zip(values) {
            *slot = *v;
        }
        out
    }
}

impl Index<Month> for PerMonth {
    type Output = Decimal;

    fn index(&self, m: Month) -> &Decimal {
        &self.0[m.index()]
    }
}

impl IndexMut<Month> for PerMonth {
    fn index_mut(&mut self, m: Month) -> &mut Decimal {
        &mut self.0[m.index()]
    }
}

impl Serialize for PerMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PerMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values: Option<Vec<Decimal>> = Option::deserialize(deserializer)?;
        Ok(PerMonth::from_slice(values.as_deref().unwrap_or_default()))
    }
}
