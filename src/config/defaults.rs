//! Default configuration values
//!
//! Named constants for all tunable parameters

pub use crate::constants::storage::APP_DIR_NAME;

/// Default output format for place listings
pub const DEFAULT_FORMAT: &str = "text";

/// Default width of the address column in text listings
pub const DEFAULT_ADDRESS_WIDTH: usize = 40;

/// Default log level when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";
