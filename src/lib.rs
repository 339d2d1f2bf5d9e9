// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod db;
pub mod editing;
pub mod error;
pub mod export;
pub mod integrity;
pub mod models;
pub mod month;
pub mod pipeline;
pub mod reconcile;
pub mod totals;
pub mod utils;

pub use aggregate::aggregate_year;
pub use error::{BudgetError, BudgetResult};
pub use export::{bundle_archive, export_year};
pub use reconcile::effective_actual_cost;
pub use totals::calculate_totals;
