//! Logging utilities.
//!
//! Centralizes logger initialization; the rest of the workspace logs through
//! the standard `log` facade.

mod init;

pub use init::{LoggingConfig, init_logging};
