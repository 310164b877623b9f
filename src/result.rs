//! Expectation outcomes: the kind of a result, where it happened, and the record tying them together.

use std::fmt;
use std::panic::Location;

/// Terminal classification of one expectation evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKind {
    Pass,
    Fail,
    /// A failure recorded inside an `expect_failure` block.
    ExpectedFail,
}

impl ResultKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultKind::Pass => "PASS",
            ResultKind::Fail => "FAIL",
            ResultKind::ExpectedFail => "XFAIL",
        }
    }

    /// `Pass` when the condition holds, otherwise the failure kind for the current mode.
    pub(crate) fn classify(condition: bool, expected_failure: bool) -> Self {
        if condition {
            ResultKind::Pass
        } else {
            ResultKind::failure(expected_failure)
        }
    }

    pub(crate) fn failure(expected_failure: bool) -> Self {
        if expected_failure {
            ResultKind::ExpectedFail
        } else {
            ResultKind::Fail
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Call site of an expectation (or origin of an unhandled error) inside a test method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    file: String,
    test_name: String,
    line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, test_name: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            test_name: test_name.into(),
            line,
        }
    }

    pub(crate) fn from_caller(location: &Location<'_>, test_name: &str) -> Self {
        Self::new(location.file(), test_name, location.line())
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

/// One recorded outcome. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    message: Option<String>,
    location: Option<SourceLocation>,
    kind: ResultKind,
}

impl ResultRecord {
    pub fn new(kind: ResultKind, message: Option<String>, location: Option<SourceLocation>) -> Self {
        Self {
            message,
            location,
            kind,
        }
    }

    pub fn kind(&self) -> ResultKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }
}

/// `KIND[: message][ (file, line N)]`
impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(location) = &self.location {
            write!(f, " ({}, line {})", location.file, location.line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> SourceLocation {
        SourceLocation::new("tests/calc.rs", "sub", 12)
    }

    #[test]
    fn test_kind_display_uses_short_names() {
        assert_eq!(ResultKind::Pass.to_string(), "PASS");
        assert_eq!(ResultKind::Fail.to_string(), "FAIL");
        assert_eq!(ResultKind::ExpectedFail.to_string(), "XFAIL");
    }

    #[test]
    fn test_classify_respects_expected_failure_mode() {
        assert_eq!(ResultKind::classify(true, false), ResultKind::Pass);
        assert_eq!(ResultKind::classify(true, true), ResultKind::Pass);
        assert_eq!(ResultKind::classify(false, false), ResultKind::Fail);
        assert_eq!(ResultKind::classify(false, true), ResultKind::ExpectedFail);
    }

    #[test]
    fn test_record_display_with_message_and_location() {
        let record = ResultRecord::new(ResultKind::Fail, Some("should be zero".into()), Some(location()));
        assert_eq!(record.to_string(), "FAIL: should be zero (tests/calc.rs, line 12)");
    }

    #[test]
    fn test_record_display_segments_are_independent() {
        let message_only = ResultRecord::new(ResultKind::Pass, Some("expect".into()), None);
        assert_eq!(message_only.to_string(), "PASS: expect");

        let location_only = ResultRecord::new(ResultKind::ExpectedFail, None, Some(location()));
        assert_eq!(location_only.to_string(), "XFAIL (tests/calc.rs, line 12)");

        let bare = ResultRecord::new(ResultKind::Fail, None, None);
        assert_eq!(bare.to_string(), "FAIL");
    }

    #[test]
    fn test_location_from_caller_keeps_test_name() {
        let caller = Location::caller();
        let location = SourceLocation::from_caller(caller, "add");
        assert_eq!(location.test_name(), "add");
        assert_eq!(location.file(), caller.file());
        assert_eq!(location.line(), caller.line());
    }
}
