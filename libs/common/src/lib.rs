//! Keypad tools basic library
//!
//! Provides the pieces shared by the keypad binaries:
//! - logging initialization
//! - layered configuration loading
//! - the common error type

pub mod config;
pub mod error;
pub mod logging;

pub use config::{load_config, KeypadConfig, LogSettings, ReplSettings};
pub use error::{Error, Result};
