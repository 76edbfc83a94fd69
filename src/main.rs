// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::env;
use std::process;

use benchmark_app::OrtEngine;
use benchmark_app::cli::benchmark;

fn main() {
    process::exit(benchmark::run(env::args(), &OrtEngine::new()));
}
