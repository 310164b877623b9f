//! Test discovery boundary.
//!
//! The runner never inspects a test unit itself; it asks [`MethodDiscovery`] for the ordered list of test methods.
//! Each [`TestMethod`] carries the prefix that marked it as a test, and the runner strips that same prefix to name
//! the test. `#[waft::suite]` generates the implementation from the `test_*` methods of an impl block
//! (`#[waft::suite(prefix = "check_")]` picks another prefix), and a hand-written implementation works just as well:
//!
//! ```
//! use waft::{Expectations, MethodDiscovery, TestMethod};
//!
//! struct Manual;
//!
//! impl Manual {
//!     fn check_sum(&mut self, t: &mut Expectations) {
//!         t.expect_equal(2 + 2, 4);
//!     }
//! }
//!
//! impl MethodDiscovery for Manual {
//!     fn test_methods() -> Vec<TestMethod<Self>> {
//!         vec![TestMethod::new("check_sum", |unit: &mut Manual, t: &mut Expectations| {
//!             unit.check_sum(t);
//!             Ok(())
//!         })
//!         .with_prefix("check_")]
//!     }
//! }
//!
//! let method = Manual::test_methods()[0];
//! assert_eq!(method.name(), "check_sum");
//! assert_eq!(method.test_name(), "sum");
//! ```

use std::fmt;

use crate::expect::Expectations;
use crate::raised::Raised;

/// Method-name prefix that marks a test method unless another one is given.
pub const DEFAULT_TEST_PREFIX: &str = "test_";

/// Invocation of one test method on a test unit.
pub type TestFn<S> = fn(&mut S, &mut Expectations) -> Result<(), Raised>;

/// A discovered test method: its declared name and how to call it.
pub struct TestMethod<S> {
    name: &'static str,
    prefix: &'static str,
    run: TestFn<S>,
}

impl<S> TestMethod<S> {
    /// A method discovered through [`DEFAULT_TEST_PREFIX`].
    pub fn new(name: &'static str, run: TestFn<S>) -> Self {
        Self {
            name,
            prefix: DEFAULT_TEST_PREFIX,
            run,
        }
    }

    /// Set the prefix the method was discovered through.
    pub fn with_prefix(mut self, prefix: &'static str) -> Self {
        self.prefix = prefix;
        self
    }

    /// The method name as declared, prefix included.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// The human-readable test name: the method name without its discovery prefix.
    ///
    /// Names that do not carry the prefix are returned unchanged.
    pub fn test_name(&self) -> &'static str {
        self.name.strip_prefix(self.prefix).unwrap_or(self.name)
    }

    pub fn invoke(&self, unit: &mut S, expectations: &mut Expectations) -> Result<(), Raised> {
        (self.run)(unit, expectations)
    }
}

impl<S> Clone for TestMethod<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for TestMethod<S> {}

impl<S> fmt::Debug for TestMethod<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestMethod")
            .field("name", &self.name)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

/// Enumerates the test methods of a test unit, in declaration order.
///
/// The order is whatever the implementation reports; callers must not rely on tests running in any particular
/// order.
pub trait MethodDiscovery: Sized {
    fn test_methods() -> Vec<TestMethod<Self>>;
}
