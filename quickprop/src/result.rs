//! Outcome record of one test run.

use crate::error::{FailureCause, PrintedCounterExample};
use crate::statistics::Distribution;

/// A retained falsifying instance.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterExample<T> {
    pub instance: T,
    /// Number of accepted shrink steps that produced `instance`
    pub shrink_steps: usize,
}

impl<T> CounterExample<T> {
    pub fn new(instance: T, shrink_steps: usize) -> Self {
        Self {
            instance,
            shrink_steps,
        }
    }
}

/// Terminal (or, while running, current) state of a test
#[derive(Debug, Clone, PartialEq)]
pub enum TestState<T> {
    Success,
    /// Retained counterexamples, in the order they were found
    Failed(Vec<CounterExample<T>>),
    /// The law failed in an uncontrolled way on `instance`
    Error { instance: T, cause: FailureCause },
}

/// What the retention policy did with a new counterexample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Strictly smaller than the retained set; the set now holds only it
    Replaced,
    /// Added to the retained set
    Appended,
    /// Strictly larger than the retained set; not kept
    Dropped,
}

/// Result of running one test.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult<T> {
    pub state: TestState<T>,
    /// Successful checks observed
    pub count: usize,
    /// Total generation attempts, including discarded inputs
    pub count_gen: usize,
    /// Classification tags of every generated input
    pub distribution: Distribution,
    /// Seed the run was started from, when known
    pub seed: Option<u64>,
}

impl<T> Default for TestResult<T> {
    fn default() -> Self {
        Self {
            state: TestState::Success,
            count: 0,
            count_gen: 0,
            distribution: Distribution::new(),
            seed: None,
        }
    }
}

impl<T> TestResult<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        matches!(self.state, TestState::Success)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, TestState::Failed(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self.state, TestState::Error { .. })
    }

    /// Retained counterexamples; empty unless the state is `Failed`
    pub fn counterexamples(&self) -> &[CounterExample<T>] {
        match &self.state {
            TestState::Failed(cexs) => cexs,
            _ => &[],
        }
    }

    /// Record a falsifying instance.
    ///
    /// With a size metric every retained counterexample has the same size:
    /// a strictly smaller one replaces the set, a strictly larger one is
    /// dropped, an equal one is appended. Without a metric the new
    /// counterexample is always appended.
    ///
    /// Has no effect once the state is `Error`.
    pub fn retain(
        &mut self,
        cex: CounterExample<T>,
        size: Option<&dyn Fn(&T) -> usize>,
    ) -> Retention {
        if self.is_success() {
            self.state = TestState::Failed(vec![cex]);
            return Retention::Appended;
        }
        match &mut self.state {
            TestState::Success | TestState::Error { .. } => Retention::Dropped,
            TestState::Failed(cexs) => {
                let (retained, candidate) = match (size, cexs.first()) {
                    (Some(size), Some(first)) => (size(&first.instance), size(&cex.instance)),
                    _ => {
                        cexs.push(cex);
                        return Retention::Appended;
                    }
                };
                if candidate < retained {
                    cexs.clear();
                    cexs.push(cex);
                    Retention::Replaced
                } else if candidate > retained {
                    Retention::Dropped
                } else {
                    cexs.push(cex);
                    Retention::Appended
                }
            }
        }
    }

    /// Render retained counterexamples with `print`
    pub fn printed_counterexamples<F>(&self, print: F) -> Vec<PrintedCounterExample>
    where
        F: Fn(&T) -> String,
    {
        self.counterexamples()
            .iter()
            .map(|cex| PrintedCounterExample {
                instance: print(&cex.instance),
                shrink_steps: cex.shrink_steps,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(x: &i64) -> usize {
        x.unsigned_abs() as usize
    }

    #[test]
    fn test_new_result_is_success() {
        let result: TestResult<i64> = TestResult::new();
        assert!(result.is_success());
        assert_eq!(result.count, 0);
        assert_eq!(result.count_gen, 0);
        assert!(result.counterexamples().is_empty());
    }

    #[test]
    fn test_first_failure_creates_failed_state() {
        let mut result = TestResult::new();
        let retention = result.retain(CounterExample::new(7i64, 2), Some(&identity));
        assert_eq!(retention, Retention::Appended);
        assert!(result.is_failed());
        assert_eq!(result.counterexamples(), &[CounterExample::new(7, 2)]);
    }

    #[test]
    fn test_size_retention() {
        let mut result = TestResult::new();
        result.retain(CounterExample::new(10i64, 0), Some(&identity));

        assert_eq!(
            result.retain(CounterExample::new(-10, 1), Some(&identity)),
            Retention::Appended
        );
        assert_eq!(
            result.retain(CounterExample::new(11, 1), Some(&identity)),
            Retention::Dropped
        );
        assert_eq!(result.counterexamples().len(), 2);

        assert_eq!(
            result.retain(CounterExample::new(3, 4), Some(&identity)),
            Retention::Replaced
        );
        assert_eq!(result.counterexamples(), &[CounterExample::new(3, 4)]);
    }

    #[test]
    fn test_retention_without_metric_appends() {
        let mut result = TestResult::new();
        for x in [5i64, 5, 100] {
            assert_eq!(result.retain(CounterExample::new(x, 0), None), Retention::Appended);
        }
        assert_eq!(result.counterexamples().len(), 3);
    }

    #[test]
    fn test_error_state_is_terminal() {
        let mut result: TestResult<i64> = TestResult::new();
        result.state = TestState::Error {
            instance: 0,
            cause: FailureCause::error("boom"),
        };
        assert_eq!(
            result.retain(CounterExample::new(1, 0), None),
            Retention::Dropped
        );
        assert!(result.is_error());
    }

    #[test]
    fn test_printed_counterexamples() {
        let mut result = TestResult::new();
        result.retain(CounterExample::new(500i64, 9), None);
        assert_eq!(
            result.printed_counterexamples(|x| format!("<{}>", x)),
            vec![PrintedCounterExample {
                instance: "<500>".to_string(),
                shrink_steps: 9,
            }]
        );
    }
}
