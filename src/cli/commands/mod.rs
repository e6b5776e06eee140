pub mod audit;
pub mod backup;
pub mod config;
pub mod db;
pub mod export;
pub mod init;
pub mod log;
pub mod roster;
pub mod scan;
pub mod student;
