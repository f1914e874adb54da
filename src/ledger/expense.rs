use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single spending line inside a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    #[serde(rename = "name")]
    pub label: String,
    pub amount: f64,
    /// Stable identifier. Snapshots written before ids existed deserialize as nil; see
    /// [`Ledger::assign_missing_ids`](super::Ledger::assign_missing_ids).
    #[serde(default)]
    pub id: Uuid,
}

impl Expense {
    pub fn new(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            amount,
            id: Uuid::new_v4(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_expense_without_id_is_nil() {
        let expense: Expense =
            serde_json::from_str(r#"{ "name": "Bread", "amount": 2.5 }"#).expect("parse");
        assert_eq!(expense.label, "Bread");
        assert_eq!(expense.amount, 2.5);
        assert!(expense.id.is_nil());
    }

    #[test]
    fn label_is_persisted_under_name_key() {
        let json = serde_json::to_value(Expense::new("Cinema", 12.0)).expect("serialize");
        assert_eq!(json["name"], "Cinema");
        assert_eq!(json["amount"], 12.0);
    }
}
