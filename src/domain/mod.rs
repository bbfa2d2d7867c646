pub mod errors;
pub mod file_utils;
pub mod ingestion;
pub mod models;
pub mod ports;
pub mod preferences;
pub mod session;
