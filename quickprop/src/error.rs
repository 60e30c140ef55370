//! Error types surfaced by the engine and the assertion wrapper.

use std::any::Any;
use std::fmt::Write as _;

use thiserror::Error;

/// Why a law evaluation was an uncontrolled failure.
///
/// Distinct from falsification (the law returned `false`) and from a
/// discarded input. The cause is kept verbatim and never shrunk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureCause {
    /// The law panicked
    #[error("law panicked: {message}")]
    Panic { message: String },

    /// The law returned an error value
    #[error("law returned an error: {message}")]
    Error { message: String },
}

impl FailureCause {
    /// Build a cause from a panic payload caught with `catch_unwind`
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "<non-string panic payload>".to_string()
        };
        Self::Panic { message }
    }

    /// Build a cause from an error returned by the law
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Panic { message } | Self::Error { message } => message,
        }
    }
}

/// A counterexample rendered with the arbitrary's printer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintedCounterExample {
    pub instance: String,
    pub shrink_steps: usize,
}

/// Caller-facing failure of a property check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// The law does not hold; carries every retained counterexample
    #[error(
        "test `{name}` failed after {count} successful checks (seed {}):{}",
        render_seed(.seed),
        render_counterexamples(.counterexamples)
    )]
    Falsified {
        name: String,
        seed: Option<u64>,
        count: usize,
        counterexamples: Vec<PrintedCounterExample>,
    },

    /// The law failed in an uncontrolled way on `instance`
    #[error("test `{name}` errored on {instance} (seed {}): {cause}", render_seed(.seed))]
    Errored {
        name: String,
        seed: Option<u64>,
        instance: String,
        cause: FailureCause,
    },
}

impl PropertyError {
    /// Create a falsification error
    pub fn falsified(
        name: impl Into<String>,
        seed: Option<u64>,
        count: usize,
        counterexamples: Vec<PrintedCounterExample>,
    ) -> Self {
        Self::Falsified {
            name: name.into(),
            seed,
            count,
            counterexamples,
        }
    }

    /// Create an uncontrolled-failure error
    pub fn errored(
        name: impl Into<String>,
        seed: Option<u64>,
        instance: impl Into<String>,
        cause: FailureCause,
    ) -> Self {
        Self::Errored {
            name: name.into(),
            seed,
            instance: instance.into(),
            cause,
        }
    }

    /// Name of the failing test
    pub fn test_name(&self) -> &str {
        match self {
            Self::Falsified { name, .. } | Self::Errored { name, .. } => name,
        }
    }

    /// Seed that reproduces the failure, when the run was seeded
    pub fn seed(&self) -> Option<u64> {
        match self {
            Self::Falsified { seed, .. } | Self::Errored { seed, .. } => *seed,
        }
    }
}

fn render_seed(seed: &Option<u64>) -> String {
    match seed {
        Some(seed) => seed.to_string(),
        None => "unknown".to_string(),
    }
}

fn render_counterexamples(counterexamples: &[PrintedCounterExample]) -> String {
    let mut out = String::new();
    for cex in counterexamples {
        let _ = write!(
            out,
            "\n  counterexample: {} (after {} shrink steps)",
            cex.instance, cex.shrink_steps
        );
    }
    out
}
