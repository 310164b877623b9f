#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
//! Waft: a small xUnit-style testing framework.
//!
//! A test unit is a type whose `test_*` methods exercise application code and record expectations. Failed
//! expectations are recorded rather than thrown, so a test keeps going after its first failure and the run keeps
//! going after a failing test. At the end the runner prints a per-test summary.
//!
//! ## Example
//! ```
//! use waft::{Expectations, TestCase};
//!
//! #[derive(Default)]
//! struct CalculatorTests;
//!
//! #[waft::suite]
//! impl CalculatorTests {
//!     fn test_add(&mut self, t: &mut Expectations) {
//!         t.expect_equal(1 + 1, 2);
//!     }
//!
//!     fn test_parse(&mut self, t: &mut Expectations) -> Result<(), waft::Raised> {
//!         let n: i32 = "42".parse()?;
//!         t.expect_greater_than(n, 0);
//!         Ok(())
//!     }
//! }
//!
//! impl TestCase for CalculatorTests {}
//!
//! let results = waft::run_tests(&mut CalculatorTests, false).unwrap();
//! assert!(!results.has_failures());
//! ```
//!
//! ## Panic Policy
//!
//! Library code returns `Result` and never unwraps. Panics raised by *test* code are caught by the runner and
//! recorded as `Unhandled panic` failures; panics raised by `set_up`/`tear_down` propagate to the caller.

// Lets `#[waft::suite]` expansions resolve `::waft` inside this crate's own tests.
extern crate self as waft;

pub mod config;
pub mod discovery;
pub mod error;
pub mod expect;
mod panic;
pub mod raised;
pub mod report;
pub mod result;
pub mod runner;
pub mod store;

pub use waft_derive::suite;

pub use config::RunConfig;
pub use discovery::{DEFAULT_TEST_PREFIX, MethodDiscovery, TestFn, TestMethod};
pub use error::{Hook, WaftError, WaftResult};
pub use expect::{Expectations, IntoOutcome};
pub use raised::{ErrorKind, Origin, Panic, Raised};
pub use report::{ConsoleReporter, TestReporter, render_report, summary_line};
pub use result::{ResultKind, ResultRecord, SourceLocation};
pub use runner::{TestCase, TestRunner, run_tests};
pub use store::{ResultStore, Tally};
