// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Integration tests for the benchmark driver, run against an in-memory engine.

use std::cell::{Cell, RefCell};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use benchmark_app::cli::benchmark::{self, ParseOutcome};
use benchmark_app::{
    ApiMode, BenchmarkError, CompiledModel, EngineConfig, InferenceEngine, PortInfo, ReportType,
};

struct StubModel;

impl CompiledModel for StubModel {
    fn inputs(&self) -> Vec<PortInfo> {
        vec![PortInfo::tensor("data", "f32", vec![1, 3, 224, 224])]
    }

    fn outputs(&self) -> Vec<PortInfo> {
        vec![PortInfo::tensor("prob", "f32", vec![1, 1000])]
    }
}

/// Records every import; optionally rejects the model like a real engine would.
#[derive(Default)]
struct RecordingEngine {
    imports: RefCell<Vec<(String, Vec<u8>)>>,
    device_queries: Cell<usize>,
    reject: bool,
}

impl InferenceEngine for RecordingEngine {
    type Model = StubModel;

    fn available_devices(&self) -> Vec<String> {
        self.device_queries.set(self.device_queries.get() + 1);
        vec!["CPU".to_string(), "CUDA".to_string()]
    }

    fn import_model(
        &self,
        model: &mut dyn Read,
        device: &str,
        _config: &EngineConfig,
    ) -> benchmark_app::Result<StubModel> {
        let mut bytes = Vec::new();
        model.read_to_end(&mut bytes)?;
        self.imports.borrow_mut().push((device.to_string(), bytes));
        if self.reject {
            return Err(BenchmarkError::Engine("unsupported model format".to_string()));
        }
        Ok(StubModel)
    }
}

/// Scratch directory removed on drop.
struct Scratch(PathBuf);

impl Scratch {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("benchmark_app_{name}_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    fn file(&self, name: &str, contents: &[u8]) -> String {
        let path = self.0.join(name);
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

#[test]
fn test_successful_run_imports_on_requested_device() {
    let scratch = Scratch::new("success");
    let model = scratch.file("model.xml", b"serialized-model");
    let engine = RecordingEngine::default();

    let code = benchmark::run(["benchmark_app", "-m", model.as_str(), "-d", "CPU", "-api", "sync"], &engine);

    assert_eq!(code, 0);
    let imports = engine.imports.borrow();
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].0, "CPU");
    assert_eq!(imports[0].1, b"serialized-model");
}

#[test]
fn test_help_exits_zero_without_file_io() {
    let engine = RecordingEngine::default();

    let code = benchmark::run(["benchmark_app", "-help"], &engine);

    assert_eq!(code, 0);
    assert!(engine.imports.borrow().is_empty());
    assert_eq!(engine.device_queries.get(), 1);
}

#[test]
fn test_missing_model_flag_exits_three() {
    let engine = RecordingEngine::default();
    assert_eq!(benchmark::run(["benchmark_app", "-d", "CPU"], &engine), 3);
    assert!(engine.imports.borrow().is_empty());
}

#[test]
fn test_nonexistent_model_is_load_error() {
    let scratch = Scratch::new("missing");
    let missing = scratch.0.join("absent.onnx");
    let engine = RecordingEngine::default();

    let outcome = benchmark::parse_command_line(
        ["benchmark_app".to_string(), "-m".to_string(), missing.to_string_lossy().into_owned()],
        &engine,
    )
    .unwrap();
    let ParseOutcome::Run(config) = outcome else {
        panic!("expected a runnable configuration");
    };

    let err = benchmark::run_benchmark(&config, &engine).unwrap_err();
    assert!(matches!(err, BenchmarkError::Load { ref path, .. } if *path == missing));
    assert_eq!(err.exit_code(), 3);
    assert!(engine.imports.borrow().is_empty());
}

#[test]
fn test_engine_failure_exits_three() {
    let scratch = Scratch::new("reject");
    let model = scratch.file("model.onnx", b"garbage");
    let engine = RecordingEngine {
        reject: true,
        ..RecordingEngine::default()
    };

    assert_eq!(benchmark::run(["benchmark_app", "-m", model.as_str()], &engine), 3);
    assert_eq!(engine.imports.borrow().len(), 1);
}

#[test]
fn test_validation_boundaries() {
    let engine = RecordingEngine::default();
    let parse = |args: &[&str]| {
        let mut argv = vec!["benchmark_app"];
        argv.extend_from_slice(args);
        benchmark::parse_command_line(argv, &engine)
    };

    for percentile in ["1", "100"] {
        assert!(parse(&["-m", "m.onnx", "-latency_percentile", percentile]).is_ok());
    }
    for percentile in ["0", "101"] {
        assert!(parse(&["-m", "m.onnx", "-latency_percentile", percentile]).is_err());
    }

    assert!(parse(&["-m", "m.onnx", "-d", "MULTI:CPU,cuda", "-report_type", "average_counters"]).is_err());
    assert!(parse(&["-m", "m.onnx", "-d", "CPU", "-report_type", "average_counters"]).is_ok());

    assert!(parse(&["-m", "m.blob", "-op", "FP32"]).is_err());
    assert!(parse(&["-m", "m.blob"]).is_ok());

    match parse(&["-m", "m.onnx", "-api", "sync"]).unwrap() {
        ParseOutcome::Run(config) => assert_eq!(config.api, ApiMode::Sync),
        ParseOutcome::Help => panic!("unexpected help"),
    }
}

#[test]
fn test_report_written_on_success() {
    let scratch = Scratch::new("report_ok");
    let model = scratch.file("model.onnx", b"bytes");
    let folder = scratch.0.join("reports");
    let engine = RecordingEngine::default();

    let code = benchmark::run(
        [
            "benchmark_app",
            "-m",
            model.as_str(),
            "-report_type",
            ReportType::NoCounters.as_str(),
            "-report_folder",
            folder.to_str().unwrap(),
        ],
        &engine,
    );

    assert_eq!(code, 0);
    let report = fs::read_to_string(folder.join("benchmark_report.csv")).unwrap();
    assert!(report.starts_with("Command line parameters\n"));
    assert!(report.contains("target device;CPU\n"));
    assert!(report.contains("report type;no_counters\n"));
    assert!(report.contains("Execution results\n"));
    assert!(report.contains("number of inputs;1\n"));
}

#[test]
fn test_report_records_error() {
    let scratch = Scratch::new("report_err");
    let folder = scratch.0.join("reports");
    let missing = scratch.0.join("absent.onnx");
    let engine = RecordingEngine::default();

    let code = benchmark::run(
        [
            "benchmark_app",
            "-m",
            missing.to_str().unwrap(),
            "-report_type",
            "detailed_counters",
            "-report_folder",
            folder.to_str().unwrap(),
        ],
        &engine,
    );

    assert_eq!(code, 3);
    let report = fs::read_to_string(folder.join("benchmark_report.csv")).unwrap();
    assert!(report.contains("error;Cannot open model file"));
}

#[test]
fn test_unwritable_report_keeps_exit_zero() {
    let scratch = Scratch::new("report_blocked");
    let model = scratch.file("model.onnx", b"bytes");
    let blocker = scratch.file("not_a_folder", b"occupied");
    let engine = RecordingEngine::default();

    let code = benchmark::run(
        [
            "benchmark_app",
            "-m",
            model.as_str(),
            "-report_type",
            "no_counters",
            "-report_folder",
            blocker.as_str(),
        ],
        &engine,
    );

    assert_eq!(code, 0);
    assert_eq!(engine.imports.borrow().len(), 1);
    assert_eq!(fs::read(&blocker).unwrap(), b"occupied");
}
