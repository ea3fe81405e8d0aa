//! ackpool library: application logic for the Ackermann driver.

pub mod app;
pub mod config;
pub mod errors;
pub mod version;
