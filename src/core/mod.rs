pub mod budget_manager;
pub mod services;
pub mod utils;

pub use budget_manager::BudgetManager;
