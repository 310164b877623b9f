//! The expectation vocabulary available to test methods.
//!
//! Every test method receives a `&mut Expectations` for the test being run. Expectations never panic: each call
//! evaluates its condition and appends a [`ResultRecord`] attributed to the caller's file and line, so one broken
//! expectation does not stop the rest of the test.
//!
//! Each check comes in two forms, `expect_equal(a, b)` with a generated message and `expect_equal_msg(a, b, msg)`
//! with a caller-provided one.

use std::fmt::Debug;
use std::panic::Location;

use crate::panic::{self, Escape};
use crate::raised::{ErrorKind, Raised};
use crate::result::{ResultKind, ResultRecord, SourceLocation};

/// Conversion of whatever a test method (or a checked block) returns into an outcome.
pub trait IntoOutcome {
    fn into_outcome(self) -> Result<(), Raised>;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Result<(), Raised> {
        Ok(())
    }
}

/// Errors that are not yet a [`Raised`] take their origin from where the outcome is formed: the test method's name
/// for test bodies.
impl<T, E> IntoOutcome for Result<T, E>
where
    Raised: From<E>,
{
    #[track_caller]
    fn into_outcome(self) -> Result<(), Raised> {
        match self {
            Ok(_) => Ok(()),
            Err(err) => Err(Raised::from(err)),
        }
    }
}

/// Expectation context for a single test.
#[derive(Debug)]
pub struct Expectations {
    test_name: String,
    expected_failure: bool,
    records: Vec<ResultRecord>,
}

impl Expectations {
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            expected_failure: false,
            records: Vec::new(),
        }
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    /// Whether failures are currently recorded as expected failures.
    pub fn is_expecting_failure(&self) -> bool {
        self.expected_failure
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ResultRecord> {
        self.records
    }

    #[track_caller]
    pub fn expect(&mut self, condition: bool) {
        self.expect_msg(condition, "expect");
    }

    /// The base check every other expectation reduces to.
    #[track_caller]
    pub fn expect_msg(&mut self, condition: bool, message: impl Into<String>) {
        let kind = ResultKind::classify(condition, self.expected_failure);
        self.push(kind, message.into(), Location::caller());
    }

    /// Record a failure unconditionally.
    #[track_caller]
    pub fn fail(&mut self, message: impl Into<String>) {
        let kind = ResultKind::failure(self.expected_failure);
        self.push(kind, message.into(), Location::caller());
    }

    #[track_caller]
    pub fn expect_equal<T: PartialEq + Debug>(&mut self, a: T, b: T) {
        let message = format!("expect {a:?} == {b:?}");
        self.expect_equal_msg(a, b, message);
    }

    #[track_caller]
    pub fn expect_equal_msg<T: PartialEq>(&mut self, a: T, b: T, message: impl Into<String>) {
        self.expect_msg(a == b, message);
    }

    #[track_caller]
    pub fn expect_not_equal<T: PartialEq + Debug>(&mut self, a: T, b: T) {
        let message = format!("expect {a:?} != {b:?}");
        self.expect_not_equal_msg(a, b, message);
    }

    #[track_caller]
    pub fn expect_not_equal_msg<T: PartialEq>(&mut self, a: T, b: T, message: impl Into<String>) {
        self.expect_msg(a != b, message);
    }

    #[track_caller]
    pub fn expect_less_than<T: PartialOrd + Debug>(&mut self, a: T, b: T) {
        let message = format!("expect {a:?} < {b:?}");
        self.expect_less_than_msg(a, b, message);
    }

    #[track_caller]
    pub fn expect_less_than_msg<T: PartialOrd>(&mut self, a: T, b: T, message: impl Into<String>) {
        self.expect_msg(a < b, message);
    }

    #[track_caller]
    pub fn expect_less_than_or_equal<T: PartialOrd + Debug>(&mut self, a: T, b: T) {
        let message = format!("expect {a:?} <= {b:?}");
        self.expect_less_than_or_equal_msg(a, b, message);
    }

    #[track_caller]
    pub fn expect_less_than_or_equal_msg<T: PartialOrd>(&mut self, a: T, b: T, message: impl Into<String>) {
        self.expect_msg(a <= b, message);
    }

    #[track_caller]
    pub fn expect_greater_than<T: PartialOrd + Debug>(&mut self, a: T, b: T) {
        let message = format!("expect {a:?} > {b:?}");
        self.expect_greater_than_msg(a, b, message);
    }

    #[track_caller]
    pub fn expect_greater_than_msg<T: PartialOrd>(&mut self, a: T, b: T, message: impl Into<String>) {
        self.expect_msg(a > b, message);
    }

    #[track_caller]
    pub fn expect_greater_than_or_equal<T: PartialOrd + Debug>(&mut self, a: T, b: T) {
        let message = format!("expect {a:?} >= {b:?}");
        self.expect_greater_than_or_equal_msg(a, b, message);
    }

    #[track_caller]
    pub fn expect_greater_than_or_equal_msg<T: PartialOrd>(&mut self, a: T, b: T, message: impl Into<String>) {
        self.expect_msg(a >= b, message);
    }

    /// Expect `block` to raise an error of exactly kind `E`.
    ///
    /// Panics inside the block count as the [`Panic`](crate::Panic) kind.
    #[track_caller]
    pub fn expect_throws<E: 'static, R: IntoOutcome>(&mut self, block: impl FnOnce() -> R) {
        let message = format!("expect throws {}", ErrorKind::of::<E>());
        self.expect_throws_msg::<E, R>(block, message);
    }

    #[track_caller]
    pub fn expect_throws_msg<E: 'static, R: IntoOutcome>(
        &mut self,
        block: impl FnOnce() -> R,
        message: impl Into<String>,
    ) {
        match panic::catch(|| block().into_outcome()) {
            Ok(()) => self.fail(message),
            Err(raised) => self.expect_msg(raised.kind() == ErrorKind::of::<E>(), message),
        }
    }

    /// Run `block` with failures recorded as expected failures.
    ///
    /// The previous mode is restored however the block exits. An error or panic escaping the block is recorded as
    /// an expected failure and ends the test body: nothing after the block runs. Outside a test run, that unwind
    /// reaches the caller.
    pub fn expect_failure<R: IntoOutcome>(&mut self, block: impl FnOnce(&mut Self) -> R) {
        let previous = std::mem::replace(&mut self.expected_failure, true);
        let ended = match panic::guarded(|| block(&mut *self).into_outcome()) {
            Ok(()) => false,
            Err(Escape::Raised(raised)) => {
                self.record_unhandled(raised);
                true
            }
            Err(Escape::Ended) => true,
        };
        self.expected_failure = previous;
        if ended {
            panic::end_body();
        }
    }

    /// Translate an error that escaped test code into a failure record.
    pub(crate) fn record_unhandled(&mut self, raised: Raised) {
        let mut message = format!("Unhandled {}", raised.kind());
        if let Some(detail) = raised.message() {
            message.push_str(": ");
            message.push_str(detail);
        }
        tracing::warn!(test = %self.test_name, error = %raised, "unhandled error in test");

        let location = raised
            .origin()
            .map(|origin| SourceLocation::new(origin.file(), self.test_name.as_str(), origin.line()));
        let kind = ResultKind::failure(self.expected_failure);
        self.records.push(ResultRecord::new(kind, Some(message), location));
    }

    fn push(&mut self, kind: ResultKind, message: String, caller: &Location<'_>) {
        let location = SourceLocation::from_caller(caller, &self.test_name);
        self.records.push(ResultRecord::new(kind, Some(message), Some(location)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raised::Panic;
    use std::num::ParseIntError;

    fn kinds(t: &Expectations) -> Vec<ResultKind> {
        t.records().iter().map(ResultRecord::kind).collect()
    }

    fn messages(t: &Expectations) -> Vec<&str> {
        t.records().iter().filter_map(ResultRecord::message).collect()
    }

    #[derive(Debug)]
    struct Overdrawn;

    impl std::fmt::Display for Overdrawn {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("balance below zero")
        }
    }

    impl std::error::Error for Overdrawn {}

    #[test]
    fn test_expect_records_pass_and_fail() {
        let mut t = Expectations::new("basics");
        t.expect(true);
        t.expect(false);
        assert_eq!(kinds(&t), [ResultKind::Pass, ResultKind::Fail]);
        assert_eq!(messages(&t), ["expect", "expect"]);
    }

    #[test]
    fn test_location_points_at_caller() {
        let mut t = Expectations::new("where");
        let line = line!() + 1;
        t.expect_equal(1, 2);

        let location = t.records()[0].location().expect("location recorded");
        assert_eq!(location.file(), file!());
        assert_eq!(location.line(), line);
        assert_eq!(location.test_name(), "where");
    }

    #[test]
    fn test_comparisons_and_default_messages() {
        let mut t = Expectations::new("compare");
        t.expect_equal(1 + 1, 2);
        t.expect_not_equal("a", "a");
        t.expect_less_than(1, 2);
        t.expect_less_than_or_equal(3, 2);
        t.expect_greater_than(2.5, 1.0);
        t.expect_greater_than_or_equal(2, 2);

        assert_eq!(
            kinds(&t),
            [
                ResultKind::Pass,
                ResultKind::Fail,
                ResultKind::Pass,
                ResultKind::Fail,
                ResultKind::Pass,
                ResultKind::Pass,
            ]
        );
        assert_eq!(
            messages(&t),
            [
                "expect 2 == 2",
                "expect \"a\" != \"a\"",
                "expect 1 < 2",
                "expect 3 <= 2",
                "expect 2.5 > 1.0",
                "expect 2 >= 2",
            ]
        );
    }

    #[test]
    fn test_custom_message_replaces_default() {
        let mut t = Expectations::new("sub");
        t.expect_equal_msg(2 - 1, 0, "should be zero");
        assert_eq!(kinds(&t), [ResultKind::Fail]);
        assert_eq!(messages(&t), ["should be zero"]);
    }

    #[test]
    fn test_nan_is_not_ordered() {
        let mut t = Expectations::new("nan");
        t.expect_less_than(f64::NAN, 1.0);
        t.expect_greater_than_or_equal(f64::NAN, 1.0);
        assert_eq!(kinds(&t), [ResultKind::Fail, ResultKind::Fail]);
    }

    #[test]
    fn test_fail_always_fails() {
        let mut t = Expectations::new("fail");
        t.fail("not implemented");
        assert_eq!(kinds(&t), [ResultKind::Fail]);
        assert_eq!(messages(&t), ["not implemented"]);
    }

    #[test]
    fn test_expect_failure_records_xfail_then_resets() {
        let mut t = Expectations::new("xfail");
        t.expect_failure(|t| t.expect(false));
        assert!(!t.is_expecting_failure());
        t.expect(false);
        assert_eq!(kinds(&t), [ResultKind::ExpectedFail, ResultKind::Fail]);
    }

    #[test]
    fn test_expect_failure_passes_still_pass() {
        let mut t = Expectations::new("xfail");
        t.expect_failure(|t| t.expect(true));
        assert_eq!(kinds(&t), [ResultKind::Pass]);
    }

    #[test]
    fn test_expect_failure_panic_is_xfail_and_ends_body() {
        let mut t = Expectations::new("xfail");
        let escape = panic::guarded(|| {
            t.expect_failure(|_| -> () { panic!("known bug") });
            t.expect(false);
            Ok(())
        })
        .unwrap_err();

        assert!(matches!(escape, Escape::Ended));
        assert!(!t.is_expecting_failure());
        assert_eq!(kinds(&t), [ResultKind::ExpectedFail]);
        assert_eq!(messages(&t), ["Unhandled panic: known bug"]);
    }

    #[test]
    fn test_expect_failure_returned_error_is_xfail_and_ends_body() {
        let mut t = Expectations::new("xfail");
        let escape = panic::guarded(|| {
            t.expect_failure(|_| Err::<(), _>(Overdrawn));
            t.expect(true);
            Ok(())
        })
        .unwrap_err();

        assert!(matches!(escape, Escape::Ended));
        assert_eq!(kinds(&t), [ResultKind::ExpectedFail]);
        assert!(messages(&t)[0].ends_with("Overdrawn: balance below zero"));
    }

    #[test]
    fn test_nested_expect_failure_escape_restores_every_mode() {
        let mut t = Expectations::new("nested");
        let _ = panic::guarded(|| {
            t.expect_failure(|t| {
                t.expect_failure(|_| Err::<(), _>(Overdrawn));
                t.expect(false);
            });
            Ok(())
        });

        assert!(!t.is_expecting_failure());
        assert_eq!(kinds(&t), [ResultKind::ExpectedFail]);
    }

    #[test]
    fn test_nested_expect_failure_restores_outer_mode() {
        let mut t = Expectations::new("nested");
        t.expect_failure(|t| {
            t.expect_failure(|t| t.expect(false));
            t.expect(false);
        });
        t.expect(false);
        assert_eq!(
            kinds(&t),
            [ResultKind::ExpectedFail, ResultKind::ExpectedFail, ResultKind::Fail]
        );
    }

    #[test]
    fn test_expect_throws_matching_kind_passes() {
        let mut t = Expectations::new("throws");
        t.expect_throws::<ParseIntError, _>(|| "x".parse::<i32>());
        assert_eq!(kinds(&t), [ResultKind::Pass]);
        assert!(messages(&t)[0].starts_with("expect throws "));
        assert!(messages(&t)[0].ends_with("ParseIntError"));
    }

    #[test]
    fn test_expect_throws_other_kind_fails() {
        let mut t = Expectations::new("throws");
        t.expect_throws::<Overdrawn, _>(|| "x".parse::<i32>());
        assert_eq!(kinds(&t), [ResultKind::Fail]);
    }

    #[test]
    fn test_expect_throws_nothing_raised_fails() {
        let mut t = Expectations::new("throws");
        t.expect_throws_msg::<Overdrawn, _>(|| {}, "should overdraw");
        assert_eq!(kinds(&t), [ResultKind::Fail]);
        assert_eq!(messages(&t), ["should overdraw"]);
    }

    #[test]
    fn test_expect_throws_panic_kind() {
        let mut t = Expectations::new("throws");
        t.expect_throws::<Panic, _>(|| -> () { panic!("divide by zero") });
        t.expect_throws::<Overdrawn, _>(|| -> () { panic!("divide by zero") });
        assert_eq!(kinds(&t), [ResultKind::Pass, ResultKind::Fail]);
        assert_eq!(messages(&t)[0], "expect throws panic");
    }

    #[test]
    fn test_expect_throws_inside_expect_failure_is_xfail() {
        let mut t = Expectations::new("throws");
        t.expect_failure(|t| t.expect_throws::<Overdrawn, _>(|| {}));
        assert_eq!(kinds(&t), [ResultKind::ExpectedFail]);
    }

    #[test]
    fn test_record_unhandled_formats_message() {
        let mut t = Expectations::new("unhandled");
        t.record_unhandled(Raised::custom::<Overdrawn>(""));
        t.record_unhandled(Raised::custom::<Overdrawn>("by 5"));

        let messages = messages(&t);
        assert_eq!(messages[0], format!("Unhandled {}", std::any::type_name::<Overdrawn>()));
        assert_eq!(messages[1], format!("Unhandled {}: by 5", std::any::type_name::<Overdrawn>()));
        assert_eq!(kinds(&t), [ResultKind::Fail, ResultKind::Fail]);

        let location = t.records()[0].location().expect("origin captured");
        assert_eq!(location.test_name(), "unhandled");
    }
}
