use std::{
    path::Path,
    sync::{Mutex, MutexGuard, PoisonError},
};

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    config::Config,
    core::services::{RolloverService, SummaryService},
    domain::{CategoryDetail, LedgerView},
    errors::Result,
    ledger::Ledger,
    storage::{PersistenceGateway, RemoteSync},
};

/// Facade that serializes load → mutate → save cycles against the persistence gateway.
///
/// The ledger is never kept in memory between calls: every operation reads the local cache
/// at entry and writes it back at exit while holding the manager's lock.
pub struct BudgetManager {
    gateway: PersistenceGateway,
    lock: Mutex<()>,
}

impl BudgetManager {
    pub fn new(gateway: PersistenceGateway) -> Self {
        Self {
            gateway,
            lock: Mutex::new(()),
        }
    }

    /// Hydrates the local cache from the remote copy and returns a ready manager.
    pub fn open(gateway: PersistenceGateway) -> Result<Self> {
        let ledger = gateway.hydrate()?;
        info!(
            categories = ledger.categories.len(),
            history = ledger.history.len(),
            "budget ledger ready"
        );
        Ok(Self::new(gateway))
    }

    pub fn from_config(config: &Config, base: &Path) -> Result<Self> {
        Self::open(PersistenceGateway::from_config(config, base)?)
    }

    pub fn gateway(&self) -> &PersistenceGateway {
        &self.gateway
    }

    /// Current ledger snapshot as stored in the local cache.
    pub fn ledger(&self) -> Ledger {
        let _guard = self.acquire();
        self.gateway.load()
    }

    pub fn ledger_view(&self) -> LedgerView {
        SummaryService::ledger_view(&self.ledger())
    }

    pub fn category_detail(&self, name: &str) -> Result<CategoryDetail> {
        SummaryService::category_detail(&self.ledger(), name)
    }

    pub fn set_income(&self, raw: &str) -> Result<LedgerView> {
        self.mutate("set_income", |ledger| Ok(ledger.set_income(raw)))
    }

    pub fn add_category(&self, name: &str, raw_budget: &str) -> Result<LedgerView> {
        self.mutate("add_category", |ledger| {
            ledger.add_category(name, raw_budget)?;
            Ok(true)
        })
    }

    pub fn delete_category(&self, name: &str) -> Result<LedgerView> {
        self.mutate("delete_category", |ledger| {
            Ok(ledger.delete_category(name).is_some())
        })
    }

    pub fn add_expense(&self, category: &str, label: &str, raw_amount: &str) -> Result<LedgerView> {
        self.mutate("add_expense", |ledger| {
            ledger.add_expense(category, label, raw_amount)?;
            Ok(true)
        })
    }

    pub fn delete_expense(&self, category: &str, index: usize) -> Result<LedgerView> {
        self.mutate("delete_expense", |ledger| {
            Ok(ledger.delete_expense(category, index).is_some())
        })
    }

    pub fn delete_expense_by_id(&self, category: &str, id: Uuid) -> Result<LedgerView> {
        self.mutate("delete_expense_by_id", |ledger| {
            Ok(ledger.delete_expense_by_id(category, id).is_some())
        })
    }

    /// Closes the period using today's local date.
    pub fn close_period(&self) -> Result<LedgerView> {
        self.close_period_on(Local::now().date_naive())
    }

    pub fn close_period_on(&self, today: NaiveDate) -> Result<LedgerView> {
        self.mutate("close_period", |ledger| {
            if RolloverService::closed_on(ledger, today) {
                warn!(date = %today, "period already closed today; archiving again");
            }
            RolloverService::close_period(ledger, today);
            Ok(true)
        })
    }

    fn mutate<F>(&self, action: &str, op: F) -> Result<LedgerView>
    where
        F: FnOnce(&mut Ledger) -> Result<bool>,
    {
        let _guard = self.acquire();
        let mut ledger = self.gateway.load();
        if op(&mut ledger)? {
            let report = self.gateway.save(&ledger)?;
            if let RemoteSync::Failed(reason) = &report.remote {
                debug!(action, %reason, "mutation saved locally only");
            }
        } else {
            debug!(action, "no change; skipping save");
        }
        Ok(SummaryService::ledger_view(&ledger))
    }

    // The lock guards no data, so a poisoned mutex is still safe to reuse.
    fn acquire(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
