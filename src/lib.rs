#![doc(test(attr(deny(warnings))))]

//! Budget Ledger tracks a single monthly budget: income, spending categories with their
//! expenses, and a history of closed periods, persisted to a local cache with an optional
//! remote durable copy.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::BudgetManager;
pub use errors::{BudgetError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Ledger tracing initialized.");
    });
}
