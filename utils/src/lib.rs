//! Shared utilities for the petition voting client.

pub mod logging;

pub use logging::{init_logging, init_tracing, LogFormat, LogFormatError};
