// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Benchmark App
//!
//! Command-line harness that imports a serialized model into ONNX Runtime on
//! a chosen device and reports the model's input and output interface.
//!
//! ## Usage
//!
//! ```bash
//! benchmark_app -m model.onnx -d CPU -api sync
//! benchmark_app -m model.onnx -d MULTI:cuda,cpu -report_type detailed_counters -report_folder reports
//! benchmark_app -m model.ort -d openvino:NPU
//! benchmark_app -h
//! ```
//!
//! Flags use the gflags spelling (`-api sync`), the double-dash form
//! (`--api sync`) is accepted too.
//!
//! ## Exit codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | `0`  | Model imported and summarised, or help shown |
//! | `3`  | Invalid options, unreadable model, or engine failure |
//!
//! ## Library
//!
//! The driver is generic over [`InferenceEngine`], so it can run against
//! [`OrtEngine`] or any other engine:
//!
//! ```no_run
//! use benchmark_app::cli::benchmark;
//! use benchmark_app::OrtEngine;
//!
//! let code = benchmark::run(["benchmark_app", "-m", "model.onnx", "-d", "CPU"], &OrtEngine::new());
//! std::process::exit(code);
//! ```

// Modules
pub mod cli;
pub mod config;
pub mod device;
pub mod engine;
pub mod error;
pub mod inference;
pub mod metadata;
pub mod model;
pub mod report;

// Re-export main types for convenience
pub use config::{ApiMode, PerformanceHint, PrecisionOverrides, ReportType, RunConfiguration};
pub use device::{Device, DeviceTarget};
pub use engine::{CompiledModel, InferenceEngine};
pub use error::{BenchmarkError, Result};
pub use inference::EngineConfig;
pub use metadata::PortInfo;
pub use model::{OrtEngine, OrtModel};
pub use report::StatisticsReport;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "benchmark-app");
    }
}
