pub mod config;
pub mod history;
pub mod init;
pub mod last;
pub mod log;
pub mod prune;
pub mod start;
