//! Test definition and the execution engine.
//!
//! A [`Test`] pairs an [`Arbitrary`] with a law and a set of bounds. Running
//! it draws inputs, evaluates the law, shrinks falsifying inputs greedily and
//! records what it found in a [`TestResult`].

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::RngCore;
use tracing::{debug, info, warn};

use crate::arbitrary::Arbitrary;
use crate::config::{ConfigError, GlobalConfig, TestConfig, get_global_config, load_global_config};
use crate::error::{FailureCause, PropertyError};
use crate::property::{IntoLawResult, LawResult, Outcome};
use crate::result::{CounterExample, TestResult, TestState};
use crate::rng::{SeedSource, create_seeded_rng};

static ANON_TESTS: AtomicUsize = AtomicUsize::new(0);

fn anonymous_name() -> String {
    format!("anon_test_{}", ANON_TESTS.fetch_add(1, Ordering::Relaxed) + 1)
}

/// A law over values of `T` together with how to generate them and the
/// bounds of a run.
pub struct Test<T> {
    name: String,
    arbitrary: Arbitrary<T>,
    law: Rc<dyn Fn(&T) -> LawResult>,
    config: TestConfig,
}

impl<T> Clone for Test<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            arbitrary: self.arbitrary.clone(),
            law: Rc::clone(&self.law),
            config: self.config.clone(),
        }
    }
}

impl<T> fmt::Debug for Test<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Test")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Remaining budgets of one run
#[derive(Debug)]
struct Budget {
    checks: usize,
    generations: usize,
    failures: usize,
}

impl Budget {
    fn new(config: &TestConfig) -> Self {
        Self {
            checks: config.count,
            generations: config.max_gen,
            failures: config.max_fail,
        }
    }

    fn exhausted(&self) -> bool {
        self.checks == 0 || self.generations == 0
    }
}

impl<T: 'static> Test<T> {
    /// Create a test with default bounds.
    ///
    /// The law may return anything implementing [`IntoLawResult`]: a `bool`,
    /// an [`Outcome`], or a `Result` whose error is an uncontrolled failure.
    pub fn new<F, R>(arbitrary: Arbitrary<T>, law: F) -> Self
    where
        F: Fn(&T) -> R + 'static,
        R: IntoLawResult,
    {
        Self {
            name: anonymous_name(),
            arbitrary,
            law: Rc::new(move |input: &T| law(input).into_law_result()),
            config: TestConfig::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the success target; see [`TestConfig::with_count`]
    pub fn with_count(mut self, count: usize) -> Self {
        self.config = self.config.with_count(count);
        self
    }

    pub fn with_max_gen(mut self, max_gen: usize) -> Self {
        self.config = self.config.with_max_gen(max_gen);
        self
    }

    pub fn with_max_fail(mut self, max_fail: usize) -> Self {
        self.config = self.config.with_max_fail(max_fail);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config = self.config.with_seed(seed);
        self
    }

    /// Replace the bounds; a generation ceiling below the success target is
    /// raised to it
    pub fn with_config(mut self, config: TestConfig) -> Self {
        if let Err(err) = config.validate() {
            warn!(test = %self.name, %err, "adjusting invalid test configuration");
        }
        let max_gen = config.max_gen;
        self.config = config.with_max_gen(max_gen);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    pub fn arbitrary(&self) -> &Arbitrary<T> {
        &self.arbitrary
    }

    /// Evaluate the law once, turning a panic into an uncontrolled failure
    pub fn evaluate(&self, input: &T) -> LawResult {
        match catch_unwind(AssertUnwindSafe(|| (self.law)(input))) {
            Ok(result) => result,
            Err(payload) => Err(FailureCause::from_panic(payload)),
        }
    }

    /// Run the test against `rng`.
    ///
    /// The seed of the returned result is left unset; use [`Test::run_seeded`]
    /// or [`Test::check`] to have it recorded.
    pub fn run(&self, rng: &mut dyn RngCore) -> TestResult<T> {
        let mut result = TestResult::new();
        let mut budget = Budget::new(&self.config);
        let size: Option<&dyn Fn(&T) -> usize> = self.arbitrary.size_metric().map(|m| &**m);

        while !budget.exhausted() {
            let input = self.arbitrary.generate(rng);
            budget.generations -= 1;
            result.count_gen += 1;
            if let Some(tag) = self.arbitrary.classify(&input) {
                result.distribution.record(tag);
            }

            match self.evaluate(&input) {
                Ok(Outcome::Holds) => {
                    result.count += 1;
                    budget.checks -= 1;
                }
                // out of the law's domain: costs a generation, never a check
                Ok(Outcome::Discard) => {}
                Ok(Outcome::Falsified) => {
                    debug!(
                        test = %self.name,
                        generation = result.count_gen,
                        "law falsified, shrinking"
                    );
                    let cex = self.shrink_search(input);
                    budget.checks -= 1;
                    budget.failures = budget.failures.saturating_sub(1);

                    let shrink_steps = cex.shrink_steps;
                    let retention = result.retain(cex, size);
                    debug!(test = %self.name, shrink_steps, ?retention, "counterexample recorded");

                    // with a size metric, keep looking for a smaller counterexample
                    if budget.failures == 0 && size.is_none() {
                        break;
                    }
                }
                Err(cause) => {
                    warn!(
                        test = %self.name,
                        instance = %self.arbitrary.print_instance(&input),
                        %cause,
                        "law failed in an uncontrolled way"
                    );
                    result.state = TestState::Error {
                        instance: input,
                        cause,
                    };
                    break;
                }
            }
        }

        result
    }

    /// Run from a fresh source seeded with `seed`, recording the seed
    pub fn run_seeded(&self, seed: u64) -> TestResult<T> {
        let mut rng = create_seeded_rng(seed);
        let mut result = self.run(&mut rng);
        result.seed = Some(seed);
        result
    }

    /// Run with the seed from this test's config, else the global config,
    /// else fresh entropy. The chosen seed is logged and recorded.
    pub fn check(&self) -> TestResult<T> {
        self.check_with_global(&get_global_config())
    }

    /// Like [`Test::check`], but a malformed `QUICKPROP_SEED` is an error
    /// instead of being ignored
    pub fn try_check(&self) -> Result<TestResult<T>, ConfigError> {
        Ok(self.check_with_global(&load_global_config()?))
    }

    fn check_with_global(&self, global: &GlobalConfig) -> TestResult<T> {
        let config = self.config.clone().merge_with_global(global);
        let source = SeedSource::resolve(config.seed);
        info!(
            test = %self.name,
            seed = source.seed(),
            from_entropy = source.is_entropy(),
            "running property test"
        );
        self.run_seeded(source.seed())
    }

    /// Greedy, first-improvement shrink search.
    ///
    /// Repeatedly moves to the first candidate on which the law is still
    /// falsified. Candidates that are discarded or fail in an uncontrolled way
    /// do not count as falsifying.
    pub fn shrink_search(&self, instance: T) -> CounterExample<T> {
        let mut current = instance;
        let mut steps = 0;

        while let Some(smaller) = self
            .arbitrary
            .shrink(&current)
            .find_first(|candidate| self.evaluate(candidate) == Ok(Outcome::Falsified))
        {
            steps += 1;
            debug!(test = %self.name, step = steps, "shrink step accepted");
            current = smaller;
        }

        CounterExample::new(current, steps)
    }

    /// Translate a finished result into success or a [`PropertyError`]
    pub fn report(&self, result: TestResult<T>) -> Result<TestResult<T>, PropertyError> {
        match &result.state {
            TestState::Success => Ok(result),
            TestState::Failed(_) => Err(PropertyError::falsified(
                self.name.clone(),
                result.seed,
                result.count,
                result.printed_counterexamples(|x| self.arbitrary.print_instance(x)),
            )),
            TestState::Error { instance, cause } => Err(PropertyError::errored(
                self.name.clone(),
                result.seed,
                self.arbitrary.print_instance(instance),
                cause.clone(),
            )),
        }
    }

    /// Run via [`Test::check`] and fail unless the law held throughout
    pub fn assert_success(&self) -> Result<TestResult<T>, PropertyError> {
        self.report(self.check())
    }
}

/// Check `law` over `arbitrary` with default bounds
pub fn check<T, F, R>(arbitrary: Arbitrary<T>, law: F) -> Result<TestResult<T>, PropertyError>
where
    T: 'static,
    F: Fn(&T) -> R + 'static,
    R: IntoLawResult,
{
    check_with_config(arbitrary, law, TestConfig::default())
}

/// Check `law` over `arbitrary` with custom bounds
pub fn check_with_config<T, F, R>(
    arbitrary: Arbitrary<T>,
    law: F,
    config: TestConfig,
) -> Result<TestResult<T>, PropertyError>
where
    T: 'static,
    F: Fn(&T) -> R + 'static,
    R: IntoLawResult,
{
    Test::new(arbitrary, law).with_config(config).assert_success()
}

/// Run `test` against a caller-owned random source and report the outcome
pub fn check_with_rng<T: 'static>(
    test: &Test<T>,
    rng: &mut dyn RngCore,
) -> Result<TestResult<T>, PropertyError> {
    test.report(test.run(rng))
}
