//! Ledger configuration
//!
//! Option validation and loading from external RON files.

pub mod loader;
pub mod options;

pub use loader::{config_path, export_default_config, load_config, CONFIG_FILE};
pub use options::{ConfigReport, LedgerConfig, RejectedOption};
