use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::expense::Expense;

/// A named budget bucket. The name lives in the owning map key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub budget: f64,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Category {
    pub fn new(budget: f64) -> Self {
        Self {
            budget,
            expenses: Vec::new(),
        }
    }

    /// Sum of every expense amount currently recorded.
    pub fn spent(&self) -> f64 {
        self.expenses.iter().map(|expense| expense.amount).sum()
    }

    /// Budget left over; negative once the category is overspent.
    pub fn remaining(&self) -> f64 {
        self.budget - self.spent()
    }

    pub fn push_expense(&mut self, expense: Expense) -> Uuid {
        let id = expense.id;
        self.expenses.push(expense);
        id
    }

    /// Removes the expense at `index`, shifting later expenses down by one.
    pub fn remove_at(&mut self, index: usize) -> Option<Expense> {
        if index < self.expenses.len() {
            Some(self.expenses.remove(index))
        } else {
            None
        }
    }

    pub fn remove_by_id(&mut self, id: Uuid) -> Option<Expense> {
        let index = self.expenses.iter().position(|expense| expense.id == id)?;
        Some(self.expenses.remove(index))
    }

    pub fn clear_expenses(&mut self) {
        self.expenses.clear();
    }
}
