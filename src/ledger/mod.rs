//! Ledger domain models, persistence-friendly types, and helpers.

pub mod amount;
pub mod category;
pub mod expense;
pub mod history;
#[allow(clippy::module_inception)]
pub mod ledger;

pub use amount::{amount_or_zero, parse_amount_lenient};
pub use category::Category;
pub use expense::Expense;
pub use history::HistoryEntry;
pub use ledger::Ledger;
