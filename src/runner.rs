//! Test runner (xUnit-style)
//!
//! For each discovered test method the runner calls `set_up`, the method itself with a fresh [`Expectations`],
//! and `tear_down`, then merges what the test recorded into the run's [`ResultStore`]. Panics and errors escaping a
//! test body are recorded as failures and the run moves on; errors from the hooks abort it.

use std::any::type_name;
use std::borrow::Cow;

use crate::config::RunConfig;
use crate::discovery::{MethodDiscovery, TestMethod};
use crate::error::{Hook, WaftError, WaftResult};
use crate::expect::Expectations;
use crate::panic::{self, Escape};
use crate::raised::Raised;
use crate::report::{ConsoleReporter, TestReporter};
use crate::store::{ResultStore, Tally};

/// A test unit: a type whose test methods the runner can discover and run.
///
/// The hooks run around every test method and default to doing nothing.
pub trait TestCase: MethodDiscovery {
    /// Name printed in the report header.
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(type_name::<Self>())
    }

    /// Runs before each test.
    fn set_up(&mut self) -> Result<(), Raised> {
        Ok(())
    }

    /// Runs after each test, including tests that panicked or returned an error.
    fn tear_down(&mut self) -> Result<(), Raised> {
        Ok(())
    }
}

/// Runs the tests of a [`TestCase`] and reports the results.
pub struct TestRunner<R = ConsoleReporter> {
    config: RunConfig,
    reporter: R,
}

impl TestRunner {
    /// A runner printing to stdout.
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            reporter: ConsoleReporter::new(),
        }
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new(RunConfig::default())
    }
}

impl<R: TestReporter> TestRunner<R> {
    /// Replace the reporter.
    pub fn with_reporter<T: TestReporter>(self, reporter: T) -> TestRunner<T> {
        TestRunner {
            config: self.config,
            reporter,
        }
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Run every test method of `unit`, in discovery order.
    ///
    /// Returns the recorded results once the reporter has rendered them.
    #[tracing::instrument(skip_all, fields(unit = %unit.name()))]
    pub fn run<T: TestCase>(&mut self, unit: &mut T) -> WaftResult<ResultStore> {
        let name = unit.name();
        let methods = T::test_methods();
        tracing::debug!(test_count = methods.len(), "discovered test methods");
        self.reporter.on_run_start(&name, methods.len());

        let mut results = ResultStore::new();
        for method in &methods {
            self.run_one(unit, method, &mut results)?;
        }

        let tally = results.tally();
        tracing::debug!(
            passed = tally.passed,
            failed = tally.failed,
            expected_failures = tally.expected_failures,
            "test run complete"
        );
        self.reporter.on_run_complete(&name, &results, &self.config)?;
        Ok(results)
    }

    fn run_one<T: TestCase>(
        &mut self,
        unit: &mut T,
        method: &TestMethod<T>,
        results: &mut ResultStore,
    ) -> WaftResult<()> {
        let test = method.test_name();
        tracing::debug!(test, method = method.name(), "running test");

        unit.set_up().map_err(|raised| {
            tracing::warn!(test, error = %raised, "set_up failed, aborting run");
            WaftError::hook(Hook::SetUp, test, raised)
        })?;
        self.reporter.on_test_start(test);

        let mut expectations = Expectations::new(test);
        match panic::guarded(|| method.invoke(unit, &mut expectations)) {
            Ok(()) => {}
            Err(Escape::Raised(raised)) => expectations.record_unhandled(raised),
            Err(Escape::Ended) => tracing::debug!(test, "test body ended by an expected failure"),
        }

        let torn_down = unit.tear_down();

        let records = expectations.into_records();
        tracing::debug!(test, tally = ?Tally::of(&records), "test finished");
        self.reporter.on_test_complete(test, &records);
        results.extend(test, records);

        torn_down.map_err(|raised| {
            tracing::warn!(test, error = %raised, "tear_down failed, aborting run");
            WaftError::hook(Hook::TearDown, test, raised)
        })
    }
}

/// Run the tests of `unit`, printing the report to stdout.
///
/// With `verbose`, every record is printed; otherwise only failures are.
pub fn run_tests<T: TestCase>(unit: &mut T, verbose: bool) -> WaftResult<ResultStore> {
    TestRunner::new(RunConfig::new().with_verbose(verbose)).run(unit)
}
