pub mod address;
pub mod config;
pub mod credential;
pub mod report;
