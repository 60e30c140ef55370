#![allow(clippy::type_complexity)]

//! # Quickprop - Property-Based Testing for Rust
//!
//! Quickprop generates random inputs for a law, checks it, and when the law
//! is falsified shrinks the failing input to a minimal counterexample.
//!
//! ## Quick Start
//!
//! ```rust
//! use quickprop::{Test, arbitrary};
//!
//! let test = Test::new(arbitrary::small_list(arbitrary::int()), |xs: &Vec<i64>| {
//!     let mut twice = xs.clone();
//!     twice.reverse();
//!     twice.reverse();
//!     &twice == xs
//! })
//! .with_name("reverse_twice")
//! .with_seed(7);
//!
//! let result = test.assert_success().unwrap();
//! assert_eq!(result.count, 100);
//! ```
//!
//! Falsified laws are shrunk with the arbitrary's shrinker:
//!
//! ```rust
//! use quickprop::{Test, TestState, arbitrary};
//!
//! let result = Test::new(arbitrary::int_bound(1000), |x: &i64| *x < 500).run_seeded(1);
//! match result.state {
//!     TestState::Failed(cexs) => assert!(cexs.iter().all(|c| c.instance == 500)),
//!     _ => unreachable!(),
//! }
//! ```

// Public modules
pub mod arbitrary;
pub mod candidates;
pub mod config;
pub mod error;
pub mod execution;
pub mod generator;
pub mod property;
pub mod result;
pub mod rng;
pub mod shrink;
pub mod statistics;
pub mod test_runner;

// Re-export the main public API
pub use arbitrary::{Arbitrary, DefaultArbitrary};
pub use candidates::Candidates;
pub use config::{
    ConfigError, GlobalConfig, SEED_ENV_VAR, SeedPolicy, TestConfig, get_global_config,
    load_global_config, set_global_config,
};
pub use error::{FailureCause, PrintedCounterExample, PropertyError};
pub use execution::{Test, check, check_with_config, check_with_rng};
pub use generator::Gen;
pub use property::{Discard, IntoLawResult, LawResult, Outcome, assume, implies};
pub use result::{CounterExample, Retention, TestResult, TestState};
pub use rng::{RandomSource, SeedSource, create_seeded_rng, fork_rng, random_seed};
pub use shrink::Shrinker;
pub use statistics::Distribution;
pub use test_runner::{
    DefaultFormatter, DynTest, ReportFormatter, RunReport, RunStatus, RunSummary, TestRunner,
    VerboseFormatter,
};
