//! Framework-level errors.
//!
//! These are distinct from test failures: a failed expectation or an error escaping a test body is recorded as a
//! result, while a `WaftError` stops the run itself.

use std::fmt;
use std::io;

use miette::Diagnostic;
use thiserror::Error;

use crate::raised::Raised;

/// The set-up/tear-down hook that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    SetUp,
    TearDown,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::SetUp => f.write_str("set_up"),
            Hook::TearDown => f.write_str("tear_down"),
        }
    }
}

/// Errors that abort a test run.
#[derive(Debug, Error, Diagnostic)]
pub enum WaftError {
    /// A hook returned an error. Hook errors are not converted into results.
    #[error("{hook} failed for test `{test}`: {raised}")]
    #[diagnostic(
        code(waft::hook_failed),
        help("errors from set_up/tear_down abort the run; handle them inside the hook to keep going")
    )]
    Hook { hook: Hook, test: String, raised: Raised },

    #[error("failed to write test report: {0}")]
    #[diagnostic(code(waft::report_io))]
    Report(#[from] io::Error),
}

impl WaftError {
    pub(crate) fn hook(hook: Hook, test: &str, raised: Raised) -> Self {
        WaftError::Hook {
            hook,
            test: test.to_string(),
            raised,
        }
    }
}

/// Result type for framework operations.
pub type WaftResult<T> = Result<T, WaftError>;
