//! Test reporting.
//!
//! ## TestReporter Trait
//!
//! The runner reports through the `TestReporter` trait so execution stays separate from presentation. The default
//! `ConsoleReporter` prints the per-test summary:
//!
//! ```text
//! <TestUnitName> Results:
//!   <TestName>:
//!     <P> pass(es), <F> failure(s), <X> expected failure(s)
//!     <record>*
//! ```
//!
//! Records are listed only for failures, or all of them in verbose mode.

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::config::RunConfig;
use crate::result::{ResultKind, ResultRecord};
use crate::store::{ResultStore, Tally};

// ============================================================================
// Test Reporter Trait
// ============================================================================

/// Trait for reporting test execution results.
///
/// Implement this trait to customize the output format.
///
/// Every `on_test_start` is paired with an `on_test_complete`. A run aborted by a failing hook gets neither for the
/// test whose `set_up` failed, and no `on_run_complete`.
pub trait TestReporter {
    /// Called once before the first test method runs
    fn on_run_start(&mut self, _unit: &str, _test_count: usize) {}

    /// Called once the test's set-up hook has succeeded
    fn on_test_start(&mut self, _test: &str) {}

    /// Called after a test's tear-down hook with everything the test recorded
    fn on_test_complete(&mut self, _test: &str, _records: &[ResultRecord]) {}

    /// Called when all tests have completed, with the runner's configuration
    fn on_run_complete(&mut self, unit: &str, results: &ResultStore, config: &RunConfig) -> io::Result<()>;
}

/// Default text reporter, writing to stdout unless given another sink.
#[derive(Debug)]
pub struct ConsoleReporter<W = io::Stdout> {
    out: W,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TestReporter for ConsoleReporter<W> {
    fn on_run_complete(&mut self, unit: &str, results: &ResultStore, config: &RunConfig) -> io::Result<()> {
        let report = render_report(unit, results, config.verbose);
        self.out.write_all(report.as_bytes())?;
        self.out.flush()
    }
}

/// Render the summary for `unit` as text.
pub fn render_report(unit: &str, results: &ResultStore, verbose: bool) -> String {
    let mut out = String::new();
    // Writing to String cannot fail.
    let _ = writeln!(out, "{unit} Results:");
    for (test, records) in results.iter() {
        let _ = writeln!(out, "  {test}:");
        let _ = writeln!(out, "    {}", summary_line(&Tally::of(records)));
        for record in records {
            if verbose || record.kind() == ResultKind::Fail {
                let _ = writeln!(out, "    {record}");
            }
        }
    }
    out
}

/// `<P> pass(es), <F> failure(s), <X> expected failure(s)`
pub fn summary_line(tally: &Tally) -> String {
    format!(
        "{} {}, {} {}, {} {}",
        tally.passed,
        pluralize(tally.passed, "pass", "passes"),
        tally.failed,
        pluralize(tally.failed, "failure", "failures"),
        tally.expected_failures,
        pluralize(tally.expected_failures, "expected failure", "expected failures"),
    )
}

fn pluralize(count: usize, singular: &'static str, plural: &'static str) -> &'static str {
    if count == 1 { singular } else { plural }
}
