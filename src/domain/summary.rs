//! Presentation-ready snapshots derived from a [`Ledger`](crate::ledger::Ledger).

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::HistoryEntry;

/// Ratio of remaining budget below which a category is critical.
pub const CRITICAL_RATIO: f64 = 0.2;
/// Ratio of remaining budget below which a category needs attention.
pub const WARNING_RATIO: f64 = 0.5;

/// Three-tier health indicator driven by `remaining / budget`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Healthy,
    Warning,
    Critical,
}

impl StatusColor {
    /// Classifies a category. A zero or negative budget is always critical.
    pub fn classify(budget: f64, remaining: f64) -> Self {
        if budget <= 0.0 {
            return StatusColor::Critical;
        }
        let ratio = remaining / budget;
        if ratio < CRITICAL_RATIO {
            StatusColor::Critical
        } else if ratio < WARNING_RATIO {
            StatusColor::Warning
        } else {
            StatusColor::Healthy
        }
    }
}

impl fmt::Display for StatusColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatusColor::Healthy => "healthy",
            StatusColor::Warning => "warning",
            StatusColor::Critical => "critical",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryView {
    pub name: String,
    pub budget: f64,
    pub spent: f64,
    pub remaining: f64,
    pub percent: f64,
    pub status_color: StatusColor,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerView {
    pub income: f64,
    pub categories: Vec<CategoryView>,
    pub total_spent: f64,
    pub global_remaining: f64,
    pub history: Vec<HistoryEntry>,
}

impl LedgerView {
    pub fn category(&self, name: &str) -> Option<&CategoryView> {
        self.categories.iter().find(|view| view.name == name)
    }
}

/// One expense row as shown on a category page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseView {
    pub index: usize,
    pub id: Uuid,
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub summary: CategoryView,
    pub expenses: Vec<ExpenseView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_uses_ratio_thresholds() {
        assert_eq!(StatusColor::classify(100.0, 15.0), StatusColor::Critical);
        assert_eq!(StatusColor::classify(100.0, 20.0), StatusColor::Warning);
        assert_eq!(StatusColor::classify(100.0, 49.0), StatusColor::Warning);
        assert_eq!(StatusColor::classify(100.0, 50.0), StatusColor::Healthy);
        assert_eq!(StatusColor::classify(100.0, -10.0), StatusColor::Critical);
    }

    #[test]
    fn classify_scales_with_budget_size() {
        assert_eq!(
            StatusColor::classify(10_000.0, 1_900.0),
            StatusColor::classify(10.0, 1.9)
        );
    }

    #[test]
    fn zero_budget_is_critical() {
        assert_eq!(StatusColor::classify(0.0, 0.0), StatusColor::Critical);
        assert_eq!(StatusColor::classify(-5.0, 0.0), StatusColor::Critical);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&StatusColor::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
