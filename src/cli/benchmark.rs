// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::fs::File;
use std::time::Instant;

use clap::{CommandFactory, Parser};

use crate::cli::args::{BenchmarkArgs, normalize_flags};
use crate::cli::logging::set_verbose;
use crate::config::RunConfiguration;
use crate::engine::{CompiledModel, InferenceEngine};
use crate::error::{BenchmarkError, Result};
use crate::metadata::{PortInfo, io_summary};
use crate::report::{Category, StatisticsReport};
use crate::{error, info, verbose, warn};

/// Result of command-line parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Options are valid, run the benchmark.
    Run(RunConfiguration),
    /// Help was printed, nothing else to do.
    Help,
}

/// What a successful run observed.
#[derive(Debug, Clone)]
pub struct BenchmarkSummary {
    /// Model inputs.
    pub inputs: Vec<PortInfo>,
    /// Model outputs.
    pub outputs: Vec<PortInfo>,
    /// Wall time of the import call, in milliseconds.
    pub import_ms: f64,
}

impl BenchmarkSummary {
    /// Execution results as `(name, value)` pairs.
    #[must_use]
    pub fn parameters(&self) -> Vec<(&'static str, String)> {
        vec![
            ("import model time (ms)", format!("{:.2}", self.import_ms)),
            ("number of inputs", self.inputs.len().to_string()),
            ("number of outputs", self.outputs.len().to_string()),
        ]
    }
}

/// Print the usage text.
pub fn show_usage() {
    println!("{}", BenchmarkArgs::command().render_help());
}

/// Print the devices the engine can use.
pub fn show_available_devices<E: InferenceEngine>(engine: &E) {
    println!();
    println!("Available target devices: {}", engine.available_devices().join("  "));
}

/// Parse and validate the command line.
///
/// # Errors
///
/// Returns [`BenchmarkError::Validation`] for malformed or inconsistent options.
pub fn parse_command_line<E, I, T>(args: I, engine: &E) -> Result<ParseOutcome>
where
    E: InferenceEngine,
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    info!("Parsing input parameters");
    let args = BenchmarkArgs::try_parse_from(normalize_flags(args))
        .map_err(|e| BenchmarkError::Validation(e.to_string().trim_end().to_string()))?;

    if args.help {
        show_usage();
        show_available_devices(engine);
        return Ok(ParseOutcome::Help);
    }

    match RunConfiguration::validate(&args) {
        Ok(config) => Ok(ParseOutcome::Run(config)),
        Err(invalid) => {
            if invalid.show_usage {
                show_usage();
            }
            Err(invalid.into())
        }
    }
}

/// Import the configured model and print its I/O summary.
///
/// # Errors
///
/// Returns [`BenchmarkError::Load`] if the model file cannot be opened and
/// passes engine failures through unchanged.
pub fn run_benchmark<E: InferenceEngine>(config: &RunConfiguration, engine: &E) -> Result<BenchmarkSummary> {
    verbose!("Engine configuration: {:?}", config.engine_config());

    let start = Instant::now();
    let model = {
        let mut stream = File::open(&config.model_path).map_err(|source| BenchmarkError::Load {
            path: config.model_path.clone(),
            source,
        })?;
        engine.import_model(&mut stream, &config.device, &config.engine_config())?
    };
    let import_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!("Import model took {import_ms:.2} ms on {}", config.device);

    let inputs = model.inputs();
    let outputs = model.outputs();
    info!("Original model I/O parameters:");
    print!("{}", io_summary(&inputs, &outputs));

    Ok(BenchmarkSummary {
        inputs,
        outputs,
        import_ms,
    })
}

/// Run the whole application and return the process exit code.
///
/// `0` on success or when help was shown, `3` on any error. When a report
/// type was requested, the statistics report is written in both cases.
pub fn run<E, I, T>(args: I, engine: &E) -> i32
where
    E: InferenceEngine,
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut statistics: Option<StatisticsReport> = None;

    match execute(args, engine, &mut statistics) {
        Ok(()) => 0,
        Err(err) => {
            error!("{err}");
            if let Some(report) = statistics.as_mut() {
                report.add_parameters(Category::ExecutionResults, [("error", err.to_string())]);
                dump_report(report);
            }
            err.exit_code()
        }
    }
}

fn execute<E, I, T>(args: I, engine: &E, statistics: &mut Option<StatisticsReport>) -> Result<()>
where
    E: InferenceEngine,
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let config = match parse_command_line(args, engine)? {
        ParseOutcome::Help => return Ok(()),
        ParseOutcome::Run(config) => config,
    };
    set_verbose(config.verbose);

    if config.report_type.is_some() {
        let mut report = StatisticsReport::new(&config.report_folder);
        report.add_parameters(Category::CommandLineParameters, config.parameters());
        *statistics = Some(report);
    }

    let summary = run_benchmark(&config, engine)?;

    if let Some(report) = statistics.as_mut() {
        report.add_parameters(Category::ExecutionResults, summary.parameters());
        dump_report(report);
    }
    Ok(())
}

fn dump_report(report: &StatisticsReport) {
    match report.dump() {
        Ok(path) => info!("Statistics report is stored to {}", path.display()),
        Err(e) => warn!("{e}"),
    }
}
