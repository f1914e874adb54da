use crate::domain::{CategoryDetail, CategoryView, ExpenseView, LedgerView, StatusColor};
use crate::errors::{BudgetError, Result};
use crate::ledger::{Category, Ledger};

/// Stateless derivations over [`Ledger`] snapshots.
pub struct SummaryService;

impl SummaryService {
    pub fn spent(category: &Category) -> f64 {
        category.spent()
    }

    pub fn remaining(category: &Category) -> f64 {
        category.remaining()
    }

    /// Share of the budget consumed, in percent. `0` when the budget is not positive.
    pub fn percent_used(category: &Category) -> f64 {
        if category.budget > 0.0 {
            category.spent() * 100.0 / category.budget
        } else {
            0.0
        }
    }

    pub fn status_color(category: &Category) -> StatusColor {
        StatusColor::classify(category.budget, category.remaining())
    }

    pub fn total_spent(ledger: &Ledger) -> f64 {
        ledger.total_spent()
    }

    /// Income minus everything spent. Not clamped.
    pub fn global_remaining(ledger: &Ledger) -> f64 {
        ledger.income - Self::total_spent(ledger)
    }

    pub fn category_view(name: &str, category: &Category) -> CategoryView {
        CategoryView {
            name: name.to_string(),
            budget: category.budget,
            spent: Self::spent(category),
            remaining: Self::remaining(category),
            percent: Self::percent_used(category),
            status_color: Self::status_color(category),
        }
    }

    /// Builds the overview consumed by the presentation layer, categories sorted by name.
    pub fn ledger_view(ledger: &Ledger) -> LedgerView {
        let categories = ledger
            .categories
            .iter()
            .map(|(name, category)| Self::category_view(name, category))
            .collect();
        LedgerView {
            income: ledger.income,
            categories,
            total_spent: Self::total_spent(ledger),
            global_remaining: Self::global_remaining(ledger),
            history: ledger.history.clone(),
        }
    }

    pub fn category_detail(ledger: &Ledger, name: &str) -> Result<CategoryDetail> {
        let category = ledger
            .category(name)
            .ok_or_else(|| BudgetError::CategoryNotFound(name.to_string()))?;
        let expenses = category
            .expenses
            .iter()
            .enumerate()
            .map(|(index, expense)| ExpenseView {
                index,
                id: expense.id,
                label: expense.label.clone(),
                amount: expense.amount,
            })
            .collect();
        Ok(CategoryDetail {
            summary: Self::category_view(name, category),
            expenses,
        })
    }
}
