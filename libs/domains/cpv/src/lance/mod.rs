mod client;
mod config;

pub use client::LanceCatalog;
pub use config::{DEFAULT_DB_PATH, LanceConfig};
