//! Logging setup.
//!
//! Everything in the crate logs through the `log` facade; binaries call
//! [`init_logging`] early in `main` to install `env_logger`.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
