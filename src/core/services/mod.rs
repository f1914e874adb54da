pub mod rollover_service;
pub mod summary_service;

pub use rollover_service::RolloverService;
pub use summary_service::SummaryService;
