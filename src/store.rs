//! Per-run aggregation of result records, keyed by test name in first-insertion order.

use indexmap::IndexMap;

use crate::result::{ResultKind, ResultRecord};

/// Counts of each result kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
    pub expected_failures: usize,
}

impl Tally {
    pub fn of<'a>(records: impl IntoIterator<Item = &'a ResultRecord>) -> Self {
        let mut tally = Tally::default();
        for record in records {
            tally.add(record.kind());
        }
        tally
    }

    pub fn add(&mut self, kind: ResultKind) {
        match kind {
            ResultKind::Pass => self.passed += 1,
            ResultKind::Fail => self.failed += 1,
            ResultKind::ExpectedFail => self.expected_failures += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.expected_failures
    }
}

/// Mapping from test name to the records produced for it.
///
/// Append-only: a fresh store is built for every run, and a test name only appears once something was recorded
/// for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultStore {
    tests: IndexMap<String, Vec<ResultRecord>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, test: &str, record: ResultRecord) {
        self.extend(test, [record]);
    }

    /// Append `records` to `test`'s sequence. An empty batch leaves the store untouched.
    pub fn extend(&mut self, test: &str, records: impl IntoIterator<Item = ResultRecord>) {
        let mut records = records.into_iter().peekable();
        if records.peek().is_none() {
            return;
        }
        match self.tests.get_mut(test) {
            Some(existing) => existing.extend(records),
            None => {
                self.tests.insert(test.to_string(), records.collect());
            }
        }
    }

    pub fn get(&self, test: &str) -> Option<&[ResultRecord]> {
        self.tests.get(test).map(Vec::as_slice)
    }

    /// Tests in the order they first recorded something.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ResultRecord])> {
        self.tests.iter().map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    pub fn test_names(&self) -> impl Iterator<Item = &str> {
        self.tests.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Tally across every test.
    pub fn tally(&self) -> Tally {
        Tally::of(self.tests.values().flatten())
    }

    /// True when at least one unexpected failure was recorded.
    pub fn has_failures(&self) -> bool {
        self.tests
            .values()
            .flatten()
            .any(|record| record.kind() == ResultKind::Fail)
    }
}
