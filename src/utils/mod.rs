//! Shared utilities

pub mod logger;
pub mod timer;

#[cfg(test)]
pub mod mock_server;

pub use logger::{init_logger, LogLevel};
pub use timer::{Deadline, Timer};
