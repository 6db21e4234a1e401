//! Structured logging setup for parley binaries.

pub mod logger;

pub use logger::{build_filter, init_logger};
