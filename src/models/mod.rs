pub mod attendance;
pub mod scan_mode;
pub mod student;
