//! Runner configuration.

/// Configuration for a [`TestRunner`](crate::TestRunner).
///
/// Handed to the reporter at the end of a run, so an injected reporter sees the same settings as the runner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Print every record instead of failures only
    pub verbose: bool,
}

impl RunConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether every record is printed
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_lists_failures_only() {
        assert!(!RunConfig::default().verbose);
    }

    #[test]
    fn test_builder_sets_verbose() {
        assert!(RunConfig::new().with_verbose(true).verbose);
    }
}
