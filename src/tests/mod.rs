//! Crate-level tests: lifecycle properties, integration with the OS, stress.

mod helpers;
mod stress;

use std::time::Duration;

/// Shared knobs for the timing- and load-sensitive tests.
pub(crate) struct TestConfig {
    /// Threads started by the stress tests.
    pub(crate) stress_thread_count: usize,
    /// Observers joining the same thread concurrently.
    pub(crate) concurrent_joiners: usize,
    /// Upper bound on scheduling noise tolerated by timing assertions.
    pub(crate) slack: Duration,
}

pub(crate) const TEST_CONFIG: TestConfig = TestConfig {
    stress_thread_count: 64,
    concurrent_joiners: 16,
    slack: Duration::from_secs(2),
};
