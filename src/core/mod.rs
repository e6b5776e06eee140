pub mod audit;
pub mod backup;
pub mod event_log;
pub mod registry;
pub mod scan;
