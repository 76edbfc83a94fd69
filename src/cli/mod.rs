// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CLI module for the benchmark application.
//!
//! This module contains the command-line interface logic, including argument parsing,
//! console logging and the benchmark driver.

// Modules
/// CLI arguments.
pub mod args;

/// Benchmark driver and top-level error handling.
pub mod benchmark;

/// Console logging macros.
pub mod logging;
