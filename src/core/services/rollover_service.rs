use chrono::NaiveDate;
use tracing::info;

use crate::ledger::{HistoryEntry, Ledger};

use super::SummaryService;

/// Closes budgeting periods by archiving their spend into the ledger history.
pub struct RolloverService;

impl RolloverService {
    /// Archives the current total spend under `today` and empties every category.
    ///
    /// Income and budgets are left as they are. Calling this twice on the same day appends
    /// two entries; there is no guard.
    pub fn close_period(ledger: &mut Ledger, today: NaiveDate) -> HistoryEntry {
        let entry = HistoryEntry::new(today, SummaryService::total_spent(ledger));
        ledger.history.push(entry);
        for category in ledger.categories.values_mut() {
            category.clear_expenses();
        }
        info!(date = %entry.date, total = entry.total, "closed budget period");
        entry
    }

    /// Returns `true` when the history already holds an entry for `date`.
    pub fn closed_on(ledger: &Ledger, date: NaiveDate) -> bool {
        ledger.history.iter().any(|entry| entry.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn populated() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.set_income("2000");
        ledger.add_category("Food", "400").unwrap();
        ledger.add_category("Transport", "90").unwrap();
        ledger.add_expense("Food", "Market", "60").unwrap();
        ledger.add_expense("Transport", "Pass", "75").unwrap();
        ledger
    }

    #[test]
    fn close_period_archives_total_and_resets_expenses() {
        let mut ledger = populated();
        let entry = RolloverService::close_period(&mut ledger, day(31));

        assert_eq!(entry.total, 135.0);
        assert_eq!(ledger.history, vec![HistoryEntry::new(day(31), 135.0)]);
        assert_eq!(ledger.income, 2000.0);
        assert_eq!(ledger.category("Food").unwrap().budget, 400.0);
        assert!(ledger.categories.values().all(|c| c.expenses.is_empty()));
    }

    #[test]
    fn close_period_is_not_idempotent() {
        let mut ledger = populated();
        RolloverService::close_period(&mut ledger, day(31));
        let second = RolloverService::close_period(&mut ledger, day(31));

        assert_eq!(second.total, 0.0);
        assert_eq!(ledger.history.len(), 2);
        assert!(RolloverService::closed_on(&ledger, day(31)));
        assert!(!RolloverService::closed_on(&ledger, day(30)));
    }
}
