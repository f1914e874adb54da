pub mod summary;

pub use summary::{
    CategoryDetail, CategoryView, ExpenseView, LedgerView, StatusColor, CRITICAL_RATIO,
    WARNING_RATIO,
};
