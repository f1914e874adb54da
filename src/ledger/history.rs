use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Archived spend for one closed period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub total: f64,
}

impl HistoryEntry {
    pub fn new(date: NaiveDate, total: f64) -> Self {
        Self { date, total }
    }
}
