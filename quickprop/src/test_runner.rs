//! Running heterogeneous lists of tests and formatting their outcomes.

use std::fmt::Write as _;

use rand::RngCore;
use tracing::info;

use crate::config::{ConfigError, GlobalConfig, SeedPolicy, TestConfig, load_global_config};
use crate::error::PropertyError;
use crate::execution::Test;
use crate::rng::{SeedSource, fork_rng};
use crate::statistics::Distribution;

/// A test with its payload type erased, so tests over different types can
/// share one list.
pub trait DynTest {
    fn name(&self) -> &str;

    fn config(&self) -> &TestConfig;

    /// Run against `rng`, attributing any failure to `seed`
    fn run_erased(&self, rng: &mut dyn RngCore, seed: u64) -> RunReport;
}

impl<T: 'static> DynTest for Test<T> {
    fn name(&self) -> &str {
        Test::name(self)
    }

    fn config(&self) -> &TestConfig {
        Test::config(self)
    }

    fn run_erased(&self, rng: &mut dyn RngCore, seed: u64) -> RunReport {
        let mut result = self.run(rng);
        result.seed = Some(seed);
        let count = result.count;
        let count_gen = result.count_gen;
        let distribution = std::mem::take(&mut result.distribution);

        RunReport {
            name: Test::name(self).to_string(),
            count,
            count_gen,
            distribution,
            failure: self.report(result).err(),
        }
    }
}

/// Status of one finished test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Passed,
    Failed,
    Errored,
}

/// Type-erased outcome of one test, with instances already printed
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub name: String,
    pub count: usize,
    pub count_gen: usize,
    pub distribution: Distribution,
    /// `None` when the law held for every checked input
    pub failure: Option<PropertyError>,
}

impl RunReport {
    pub fn status(&self) -> RunStatus {
        match &self.failure {
            None => RunStatus::Passed,
            Some(PropertyError::Falsified { .. }) => RunStatus::Failed,
            Some(PropertyError::Errored { .. }) => RunStatus::Errored,
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status() == RunStatus::Passed
    }
}

/// Aggregated outcome of a runner invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Master seed; supply it again to replay the whole run
    pub seed: u64,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub reports: Vec<RunReport>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    pub fn total(&self) -> usize {
        self.reports.len()
    }
}

/// Runs a list of tests from one master seed.
#[derive(Debug, Clone)]
pub struct TestRunner {
    seed: SeedSource,
    policy: SeedPolicy,
}

impl TestRunner {
    /// Runner configured from `global`, drawing a seed from entropy if unset
    pub fn new(global: &GlobalConfig) -> Self {
        Self {
            seed: SeedSource::resolve(global.seed),
            policy: global.seed_policy,
        }
    }

    /// Runner configured from this thread's global configuration, which is
    /// read from `QUICKPROP_SEED` on first use
    pub fn from_global() -> Result<Self, ConfigError> {
        Ok(Self::new(&load_global_config()?))
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: SeedSource::Explicit(seed),
            policy: SeedPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SeedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The master seed, explicit or drawn from entropy
    pub fn seed(&self) -> u64 {
        self.seed.seed()
    }

    pub fn policy(&self) -> SeedPolicy {
        self.policy
    }

    /// Run every test in order, calling `on_finish` once after each.
    ///
    /// With [`SeedPolicy::Chained`] one source is threaded through all tests,
    /// so a test's inputs depend on the tests before it. With
    /// [`SeedPolicy::ForkPerTest`] each test gets its own source forked from
    /// the master source.
    pub fn run_tests<F>(&self, tests: &[Box<dyn DynTest>], mut on_finish: F) -> RunSummary
    where
        F: FnMut(&str, &dyn DynTest, &RunReport),
    {
        let seed = self.seed();
        info!(
            seed,
            from_entropy = self.seed.is_entropy(),
            policy = ?self.policy,
            tests = tests.len(),
            "running property tests"
        );

        let mut master = self.seed.into_rng();
        let mut summary = RunSummary {
            seed,
            passed: 0,
            failed: 0,
            errored: 0,
            reports: Vec::with_capacity(tests.len()),
        };

        for test in tests {
            let report = match self.policy {
                SeedPolicy::Chained => test.run_erased(&mut master, seed),
                SeedPolicy::ForkPerTest => {
                    let mut rng = fork_rng(&mut master);
                    test.run_erased(&mut rng, seed)
                }
            };

            match report.status() {
                RunStatus::Passed => summary.passed += 1,
                RunStatus::Failed => summary.failed += 1,
                RunStatus::Errored => summary.errored += 1,
            }
            on_finish(test.name(), &**test, &report);
            summary.reports.push(report);
        }

        summary
    }
}

/// Trait for custom report formatting
pub trait ReportFormatter {
    /// Format one finished test
    fn format_report(&self, report: &RunReport) -> String;

    /// Format the closing line of a run
    fn format_summary(&self, summary: &RunSummary) -> String {
        format!(
            "test result: {}. {} passed; {} failed; {} errored (seed {})",
            if summary.is_success() { "ok" } else { "FAILED" },
            summary.passed,
            summary.failed,
            summary.errored,
            summary.seed
        )
    }
}

/// One line per test, in the style of `cargo test`
pub struct DefaultFormatter;

impl ReportFormatter for DefaultFormatter {
    fn format_report(&self, report: &RunReport) -> String {
        let status = match report.status() {
            RunStatus::Passed => "ok",
            RunStatus::Failed => "FAILED",
            RunStatus::Errored => "ERROR",
        };
        format!(
            "test {} ... {} ({} checks, {} generated)",
            report.name, status, report.count, report.count_gen
        )
    }
}

/// Adds the failure message and the classification tally
pub struct VerboseFormatter;

impl ReportFormatter for VerboseFormatter {
    fn format_report(&self, report: &RunReport) -> String {
        let mut output = DefaultFormatter.format_report(report);
        if let Some(failure) = &report.failure {
            let _ = write!(output, "\n{}", failure);
        }
        if !report.distribution.is_empty() {
            output.push_str("\ndistribution:");
            for line in report.distribution.report().lines() {
                let _ = write!(output, "\n  {}", line);
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary;

    fn sample_tests() -> Vec<Box<dyn DynTest>> {
        vec![
            Box::new(
                Test::new(arbitrary::int(), |x: &i64| x.wrapping_add(0) == *x).with_name("add_zero"),
            ),
            Box::new(
                Test::new(arbitrary::string(), |s: &String| s.len() < 3).with_name("short_strings"),
            ),
            Box::new(
                Test::new(arbitrary::bool(), |_: &bool| Err::<bool, _>("no backend"))
                    .with_name("needs_backend"),
            ),
        ]
    }

    #[test]
    fn test_runner_counts_outcomes() {
        let summary = TestRunner::with_seed(17).run_tests(&sample_tests(), |_, _, _| {});

        assert_eq!(summary.seed, 17);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errored, 1);
        assert!(!summary.is_success());
    }

    #[test]
    fn test_callback_sees_every_test_in_order() {
        let mut seen = Vec::new();
        TestRunner::with_seed(3).run_tests(&sample_tests(), |name, test, report| {
            assert_eq!(name, test.name());
            assert_eq!(name, report.name);
            seen.push((name.to_string(), report.status()));
        });

        assert_eq!(
            seen,
            vec![
                ("add_zero".to_string(), RunStatus::Passed),
                ("short_strings".to_string(), RunStatus::Failed),
                ("needs_backend".to_string(), RunStatus::Errored),
            ]
        );
    }

    #[test]
    fn test_failures_carry_master_seed() {
        let summary = TestRunner::with_seed(99)
            .with_policy(SeedPolicy::ForkPerTest)
            .run_tests(&sample_tests(), |_, _, _| {});
        for report in summary.reports.iter().filter(|r| !r.is_passed()) {
            assert_eq!(report.failure.as_ref().and_then(|f| f.seed()), Some(99));
        }
    }

    #[test]
    fn test_entropy_seed_is_surfaced() {
        let runner = TestRunner::new(&GlobalConfig::default());
        let summary = runner.run_tests(&[], |_, _, _| {});
        assert_eq!(summary.seed, runner.seed());
        assert!(summary.is_success());
    }

    #[test]
    fn test_default_formatter() {
        let report = RunReport {
            name: "sorted".to_string(),
            count: 100,
            count_gen: 120,
            distribution: Distribution::new(),
            failure: None,
        };
        assert_eq!(
            DefaultFormatter.format_report(&report),
            "test sorted ... ok (100 checks, 120 generated)"
        );
    }

    #[test]
    fn test_verbose_formatter_includes_distribution() {
        let mut distribution = Distribution::new();
        distribution.record("empty");
        let report = RunReport {
            name: "lists".to_string(),
            count: 1,
            count_gen: 1,
            distribution,
            failure: None,
        };
        assert_eq!(
            VerboseFormatter.format_report(&report),
            "test lists ... ok (1 checks, 1 generated)\ndistribution:\n  empty: 1 (100.0%)"
        );
    }

    #[test]
    fn test_summary_line() {
        let summary = RunSummary {
            seed: 5,
            passed: 2,
            failed: 1,
            errored: 0,
            reports: Vec::new(),
        };
        assert_eq!(
            DefaultFormatter.format_summary(&summary),
            "test result: FAILED. 2 passed; 1 failed; 0 errored (seed 5)"
        );
    }
}
