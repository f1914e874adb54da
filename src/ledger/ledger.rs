use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{
    amount::{amount_or_zero, parse_amount_lenient},
    category::Category,
    expense::Expense,
    history::HistoryEntry,
};
use crate::errors::{BudgetError, Result};

/// Root aggregate: monthly income, named categories, and closed-period history.
///
/// The serialized form keeps the `revenu` key used by existing cache files.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    #[serde(rename = "revenu", alias = "income", default)]
    pub income: f64,
    #[serde(default)]
    pub categories: BTreeMap<String, Category>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates income from raw input. Unparseable input leaves income untouched and
    /// returns `false`.
    pub fn set_income(&mut self, raw: &str) -> bool {
        match parse_amount_lenient(raw) {
            Some(value) => {
                self.income = value;
                true
            }
            None => {
                debug!("ignoring unparseable income input");
                false
            }
        }
    }

    /// Creates or replaces the category `name`. A non-numeric budget becomes `0`.
    pub fn add_category(&mut self, name: &str, raw_budget: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BudgetError::InvalidInput(
                "category name must not be empty".into(),
            ));
        }
        let budget = amount_or_zero(raw_budget);
        if self
            .categories
            .insert(name.to_string(), Category::new(budget))
            .is_some()
        {
            debug!(category = name, "replaced existing category");
        }
        Ok(())
    }

    /// Removes a category and every expense it holds. Absent names are ignored.
    pub fn delete_category(&mut self, name: &str) -> Option<Category> {
        self.categories.remove(name)
    }

    /// Appends an expense to `category`, returning its stable id.
    pub fn add_expense(&mut self, category: &str, label: &str, raw_amount: &str) -> Result<Uuid> {
        let target = self
            .categories
            .get_mut(category)
            .ok_or_else(|| BudgetError::CategoryNotFound(category.to_string()))?;
        let expense = Expense::new(label.trim(), amount_or_zero(raw_amount));
        Ok(target.push_expense(expense))
    }

    /// Removes the expense at `index`. Unknown categories and out-of-range indices are no-ops.
    pub fn delete_expense(&mut self, category: &str, index: usize) -> Option<Expense> {
        self.categories.get_mut(category)?.remove_at(index)
    }

    pub fn delete_expense_by_id(&mut self, category: &str, id: Uuid) -> Option<Expense> {
        self.categories.get_mut(category)?.remove_by_id(id)
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    pub fn total_spent(&self) -> f64 {
        self.categories.values().map(Category::spent).sum()
    }

    /// Gives every expense without an id (nil) a fresh one. Returns how many were assigned.
    pub fn assign_missing_ids(&mut self) -> usize {
        let mut assigned = 0;
        for expense in self
            .categories
            .values_mut()
            .flat_map(|category| category.expenses.iter_mut())
            .filter(|expense| expense.id.is_nil())
        {
            expense.id = Uuid::new_v4();
            assigned += 1;
        }
        assigned
    }
}
