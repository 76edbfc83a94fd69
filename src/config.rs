// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Validated run configuration.
//!
//! [`RunConfiguration::validate`] turns raw [`BenchmarkArgs`] into an
//! immutable configuration. Checks run in a fixed order and the first
//! failing one is reported.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::cli::args::BenchmarkArgs;
use crate::error::BenchmarkError;
use crate::inference::EngineConfig;

/// Model file extensions that denote an already compiled model.
pub const COMPILED_MODEL_EXTENSIONS: &[&str] = &["blob", "ort"];

/// Substring of `-d` that selects the multi-device aggregator.
const MULTI_DEVICE_MARKER: &str = "MULTI";

/// Execution API used to drive inference requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMode {
    /// One request at a time, blocking.
    Sync,
    /// Requests queued asynchronously.
    Async,
}

impl FromStr for ApiMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sync" => Ok(Self::Sync),
            "async" => Ok(Self::Async),
            _ => Err("Incorrect API. Please set -api option to `sync` or `async` value.".to_string()),
        }
    }
}

impl fmt::Display for ApiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync => write!(f, "sync"),
            Self::Async => write!(f, "async"),
        }
    }
}

/// High-level performance hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceHint {
    /// Maximize throughput (`throughput` or `tput`).
    Throughput,
    /// Minimize latency.
    Latency,
    /// No hint, engine defaults.
    None,
}

impl FromStr for PerformanceHint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "throughput" | "tput" => Ok(Self::Throughput),
            "latency" => Ok(Self::Latency),
            "none" => Ok(Self::None),
            _ => Err(
                "Incorrect performance hint. Please set -hint option to `throughput`(tput), `latency` value or `none`."
                    .to_string(),
            ),
        }
    }
}

impl fmt::Display for PerformanceHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Throughput => write!(f, "throughput"),
            Self::Latency => write!(f, "latency"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Kind of statistics report to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    /// Parameters and results only.
    NoCounters,
    /// Counters averaged over all requests.
    AverageCounters,
    /// Counters for every request.
    DetailedCounters,
}

impl ReportType {
    /// All report types in command-line order.
    pub const ALL: [Self; 3] = [Self::NoCounters, Self::AverageCounters, Self::DetailedCounters];

    /// Literal used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoCounters => "no_counters",
            Self::AverageCounters => "average_counters",
            Self::DetailedCounters => "detailed_counters",
        }
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s).ok_or_else(|| {
            let names: Vec<&str> = Self::ALL.iter().map(|kind| kind.as_str()).collect();
            format!(
                "only {} report types are supported (invalid -report_type option value)",
                names.join("/")
            )
        })
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Precision overrides requested with `-ip`, `-op` and `-iop`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrecisionOverrides {
    /// Precision for all inputs.
    pub input: Option<String>,
    /// Precision for all outputs.
    pub output: Option<String>,
    /// Per-port precisions.
    pub input_output: Option<String>,
}

impl PrecisionOverrides {
    /// Whether any override was supplied.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.input.is_some() || self.output.is_some() || self.input_output.is_some()
    }
}

/// A rejected command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidOptions {
    /// Message reported to the user.
    pub message: String,
    /// Whether the usage text should be printed alongside the message.
    pub show_usage: bool,
}

impl InvalidOptions {
    fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), show_usage: false }
    }

    fn with_usage(message: impl Into<String>) -> Self {
        Self { message: message.into(), show_usage: true }
    }
}

impl From<InvalidOptions> for BenchmarkError {
    fn from(err: InvalidOptions) -> Self {
        Self::Validation(err.message)
    }
}

/// Validated options of one benchmark run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    /// Model file to import.
    pub model_path: PathBuf,
    /// Device target string, as given with `-d`.
    pub device: String,
    /// Execution API.
    pub api: ApiMode,
    /// Optional performance hint.
    pub hint: Option<PerformanceHint>,
    /// Optional statistics report type.
    pub report_type: Option<ReportType>,
    /// Folder the statistics report is written to.
    pub report_folder: PathBuf,
    /// Latency percentile in [1, 100].
    pub latency_percentile: u8,
    /// Precision overrides.
    pub precision: PrecisionOverrides,
    /// Intra-op thread count, `0` lets the engine decide.
    pub num_threads: usize,
    /// Verbose logging.
    pub verbose: bool,
}

impl RunConfiguration {
    /// Validate raw command-line options.
    ///
    /// The help flag is not handled here; callers check it first.
    ///
    /// # Errors
    ///
    /// Returns the first failing check as [`InvalidOptions`].
    pub fn validate(args: &BenchmarkArgs) -> Result<Self, InvalidOptions> {
        if args.model.is_empty() {
            return Err(InvalidOptions::with_usage(
                "Model is required but not set. Please set -m option.",
            ));
        }

        let latency_percentile = u8::try_from(args.latency_percentile)
            .ok()
            .filter(|p| (1..=100).contains(p))
            .ok_or_else(|| {
                InvalidOptions::with_usage(
                    "The percentile value is incorrect. The applicable values range is [1, 100].",
                )
            })?;

        let api = args.api.parse::<ApiMode>().map_err(InvalidOptions::new)?;

        let hint = non_empty(&args.hint)
            .map(str::parse::<PerformanceHint>)
            .transpose()
            .map_err(InvalidOptions::new)?;

        let report_type = non_empty(&args.report_type)
            .map(str::parse::<ReportType>)
            .transpose()
            .map_err(InvalidOptions::new)?;

        if report_type == Some(ReportType::AverageCounters)
            && args.device.contains(MULTI_DEVICE_MARKER)
        {
            return Err(InvalidOptions::new(format!(
                "only {} report type is supported for MULTI device",
                ReportType::DetailedCounters
            )));
        }

        let precision = PrecisionOverrides {
            input: non_empty(&args.input_precision).map(str::to_string),
            output: non_empty(&args.output_precision).map(str::to_string),
            input_output: non_empty(&args.io_precision).map(str::to_string),
        };

        let model_path = PathBuf::from(&args.model);
        if is_compiled_model(&model_path) && precision.is_set() {
            return Err(InvalidOptions::new(
                "Cannot set precision for a compiled network. Please re-compile your network with required precision.",
            ));
        }

        Ok(Self {
            model_path,
            device: args.device.clone(),
            api,
            hint,
            report_type,
            report_folder: PathBuf::from(&args.report_folder),
            latency_percentile,
            precision,
            num_threads: args.nthreads,
            verbose: args.verbose,
        })
    }

    /// Engine options derived from this configuration.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new()
            .with_threads(self.num_threads)
            .with_parallel_execution(self.hint == Some(PerformanceHint::Throughput))
    }

    /// Command-line parameters as `(name, value)` pairs, in report order.
    #[must_use]
    pub fn parameters(&self) -> Vec<(&'static str, String)> {
        let or_empty = |value: &Option<String>| value.clone().unwrap_or_default();
        vec![
            ("model path", self.model_path.display().to_string()),
            ("target device", self.device.clone()),
            ("API", self.api.to_string()),
            ("performance hint", self.hint.map(|h| h.to_string()).unwrap_or_default()),
            ("report type", self.report_type.map(|r| r.to_string()).unwrap_or_default()),
            ("latency percentile", self.latency_percentile.to_string()),
            ("input precision", or_empty(&self.precision.input)),
            ("output precision", or_empty(&self.precision.output)),
            ("input/output precision", or_empty(&self.precision.input_output)),
            ("number of threads", self.num_threads.to_string()),
        ]
    }
}

/// Whether the path names a precompiled model, judged by the text after the
/// last `.` of its file name (so a bare `.blob` counts too).
#[must_use]
pub fn is_compiled_model(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.rsplit_once('.'))
        .is_some_and(|(_, ext)| COMPILED_MODEL_EXTENSIONS.contains(&ext))
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}
