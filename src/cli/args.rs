// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use clap::{Command, CommandFactory, Parser};

/// Default device target.
pub const DEFAULT_DEVICE: &str = "CPU";

/// Default latency percentile reported in the statistics.
pub const DEFAULT_LATENCY_PERCENTILE: i64 = 50;

/// CLI arguments parser.
///
/// Options follow the gflags spelling of the original tool (`-api sync`,
/// `-report_type detailed_counters`); see [`normalize_flags`].
#[derive(Parser, Debug, Clone)]
#[command(name = "benchmark_app", author, version, about, long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
#[command(after_help = r"Examples:
    benchmark_app -m model.onnx -d CPU -api sync
    benchmark_app -m model.onnx -d MULTI:cuda,cpu -report_type detailed_counters
    benchmark_app -m model.ort -d openvino:NPU -hint latency")]
pub struct BenchmarkArgs {
    /// Print a usage message and the list of available devices
    #[arg(short = 'h', long = "help", default_value_t = false)]
    pub help: bool,

    /// Path to the model file (.onnx, or a precompiled .ort/.blob)
    #[arg(short = 'm', long = "m", default_value = "", allow_hyphen_values = true)]
    pub model: String,

    /// Target device: CPU, cuda:N, GPU[.N] (Intel GPU via OpenVINO), openvino[:TYPE], NPU,
    /// or MULTI:/AUTO:/HETERO: lists
    #[arg(short = 'd', long = "d", default_value = DEFAULT_DEVICE, allow_hyphen_values = true)]
    pub device: String,

    /// Execution API: sync or async
    #[arg(long = "api", default_value = "async", allow_hyphen_values = true)]
    pub api: String,

    /// Performance hint: throughput (tput), latency or none
    #[arg(long = "hint", default_value = "", allow_hyphen_values = true)]
    pub hint: String,

    /// Statistics report type: no_counters, average_counters or detailed_counters
    #[arg(long = "report_type", default_value = "", allow_hyphen_values = true)]
    pub report_type: String,

    /// Folder the statistics report is written to
    #[arg(long = "report_folder", default_value = ".", allow_hyphen_values = true)]
    pub report_folder: String,

    /// Latency percentile to report, in the range [1, 100]
    #[arg(long = "latency_percentile", default_value_t = DEFAULT_LATENCY_PERCENTILE, allow_negative_numbers = true)]
    pub latency_percentile: i64,

    /// Input precision override
    #[arg(long = "ip", default_value = "", allow_hyphen_values = true)]
    pub input_precision: String,

    /// Output precision override
    #[arg(long = "op", default_value = "", allow_hyphen_values = true)]
    pub output_precision: String,

    /// Per-layer precision overrides, e.g. "input:FP16,output:FP32"
    #[arg(long = "iop", default_value = "", allow_hyphen_values = true)]
    pub io_precision: String,

    /// Number of intra-op threads (0 lets the engine decide)
    #[arg(long = "nthreads", default_value_t = 0)]
    pub nthreads: usize,

    /// Show verbose output
    #[arg(short = 'v', long = "verbose", default_value_t = false)]
    pub verbose: bool,
}

/// Rewrite single-dash long flags (`-api`) into the double-dash form clap expects.
///
/// Only arguments in flag position are rewritten: the value following an
/// option that takes one (`-report_folder -out`) is passed through as is,
/// as are single-letter flags (`-m`), numbers (`-5`) and `--` arguments.
#[must_use]
pub fn normalize_flags<I, T>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let command = BenchmarkArgs::command();
    let mut value_pending = false;

    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if std::mem::take(&mut value_pending) {
                return arg;
            }
            let Some(name) = flag_name(&arg) else {
                return arg;
            };
            value_pending = !arg.contains('=') && takes_value(&command, name);
            if name.len() > 1 && !arg.starts_with("--") {
                format!("-{arg}")
            } else {
                arg
            }
        })
        .collect()
}

/// Name of the flag spelled by `arg`, without dashes or an inline `=value`.
fn flag_name(arg: &str) -> Option<&str> {
    let rest = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-'))?;
    let name = rest.split('=').next()?;
    name.starts_with(|c: char| c.is_ascii_alphabetic()).then_some(name)
}

/// Whether the option called `name` consumes the next argument.
fn takes_value(command: &Command, name: &str) -> bool {
    let mut chars = name.chars();
    let short = chars.next().filter(|_| chars.next().is_none());
    command.get_arguments().any(|arg| {
        (arg.get_long() == Some(name) || (short.is_some() && arg.get_short() == short))
            && arg.get_action().takes_values()
    })
}
