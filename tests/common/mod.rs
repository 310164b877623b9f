//! Shared helpers for integration tests.

#![allow(dead_code)]

use waft::{ConsoleReporter, RunConfig, ResultStore, TestCase, TestRunner, WaftResult};

/// Install a test-friendly tracing subscriber, honouring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// Run `unit` with the report captured instead of printed.
pub fn run_captured<T: TestCase>(unit: &mut T, verbose: bool) -> (WaftResult<ResultStore>, String) {
    init_tracing();
    let config = RunConfig::new().with_verbose(verbose);
    let mut runner = TestRunner::new(config).with_reporter(ConsoleReporter::with_writer(Vec::new()));
    let result = runner.run(unit);
    let report = String::from_utf8(runner.into_reporter().into_inner()).expect("report is UTF-8");
    (result, report)
}
