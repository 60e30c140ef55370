//! Configuration for test bounds and seeding.

use std::cell::RefCell;
use std::env::{self, VarError};

use thiserror::Error;
use tracing::warn;

/// Environment variable holding a decimal seed for reproducing a run
pub const SEED_ENV_VAR: &str = "QUICKPROP_SEED";

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The success target must be positive
    #[error("invalid count: {0} (must be > 0)")]
    InvalidCount(usize),

    /// The generation ceiling must cover the success target
    #[error("invalid max_gen: {max_gen} (must be >= count {count})")]
    InvalidMaxGen { max_gen: usize, count: usize },

    /// The failure ceiling must be positive
    #[error("invalid max_fail: {0} (must be > 0)")]
    InvalidMaxFail(usize),

    /// The seed could not be parsed
    #[error("invalid seed {value:?} in {source_name}: expected a non-negative integer")]
    InvalidSeed { value: String, source_name: String },
}

/// Bounds for one test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestConfig {
    /// Successful checks to accumulate
    pub count: usize,
    /// Ceiling on generation attempts, absorbs discarded inputs
    pub max_gen: usize,
    /// Ceiling on counterexamples collected before stopping early
    pub max_fail: usize,
    /// Optional seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            count: 100,
            max_gen: 300,
            max_fail: 1,
            seed: None,
        }
    }
}

impl TestConfig {
    /// Create a new test configuration with validation
    pub fn new(
        count: usize,
        max_gen: usize,
        max_fail: usize,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            count,
            max_gen,
            max_fail,
            seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the test configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::InvalidCount(self.count));
        }
        if self.max_gen < self.count {
            return Err(ConfigError::InvalidMaxGen {
                max_gen: self.max_gen,
                count: self.count,
            });
        }
        if self.max_fail == 0 {
            return Err(ConfigError::InvalidMaxFail(self.max_fail));
        }
        Ok(())
    }

    /// Set the success target, raising `max_gen` to `3 * count` if it falls short
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        if self.max_gen < count {
            self.max_gen = count.saturating_mul(3);
        }
        self
    }

    /// Set the generation ceiling, never below the success target
    pub fn with_max_gen(mut self, max_gen: usize) -> Self {
        self.max_gen = max_gen.max(self.count);
        self
    }

    pub fn with_max_fail(mut self, max_fail: usize) -> Self {
        self.max_fail = max_fail;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fill in the seed from the global configuration if none is set
    pub fn merge_with_global(mut self, global: &GlobalConfig) -> Self {
        self.seed = self.seed.or(global.seed);
        self
    }
}

/// How a runner threads randomness through a list of tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPolicy {
    /// One source drives every test in order; inputs are seed-chained
    #[default]
    Chained,
    /// Each test gets a source forked from the master source
    ForkPerTest,
}

/// Process-wide defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalConfig {
    /// Master seed; `None` means draw one from entropy
    pub seed: Option<u64>,
    /// Randomness policy for runs of many tests
    pub seed_policy: SeedPolicy,
}

impl GlobalConfig {
    /// Defaults, with the seed taken from `QUICKPROP_SEED` when set
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(SEED_ENV_VAR) {
            Ok(value) => Self::from_seed_var(Some(&value)),
            Err(VarError::NotPresent) => Self::from_seed_var(None),
            Err(VarError::NotUnicode(raw)) => Err(ConfigError::InvalidSeed {
                value: raw.to_string_lossy().into_owned(),
                source_name: SEED_ENV_VAR.to_string(),
            }),
        }
    }

    /// Defaults, with the seed parsed from the raw value of `QUICKPROP_SEED`
    pub fn from_seed_var(value: Option<&str>) -> Result<Self, ConfigError> {
        let seed = value
            .map(|value| parse_seed(value, SEED_ENV_VAR))
            .transpose()?;
        Ok(Self {
            seed,
            ..Self::default()
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_seed_policy(mut self, policy: SeedPolicy) -> Self {
        self.seed_policy = policy;
        self
    }
}

/// Parse a seed, naming where it came from in the error
pub fn parse_seed(value: &str, source_name: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidSeed {
            value: value.to_string(),
            source_name: source_name.to_string(),
        })
}

thread_local! {
    // `None` until first read, then loaded from the environment
    static GLOBAL_CONFIG: RefCell<Option<GlobalConfig>> = const { RefCell::new(None) };
}

/// Get the current global configuration, loading it from the environment on
/// first use in this thread
pub fn load_global_config() -> Result<GlobalConfig, ConfigError> {
    GLOBAL_CONFIG.with(|current| {
        let mut current = current.borrow_mut();
        if let Some(config) = current.as_ref() {
            return Ok(config.clone());
        }
        let config = GlobalConfig::from_env()?;
        *current = Some(config.clone());
        Ok(config)
    })
}

/// Get the current global configuration.
///
/// A malformed environment is logged and replaced by the defaults; use
/// [`load_global_config`] to see the error instead.
pub fn get_global_config() -> GlobalConfig {
    load_global_config().unwrap_or_else(|err| {
        warn!(%err, "ignoring malformed global configuration");
        GlobalConfig::default()
    })
}

/// Replace the current global configuration
pub fn set_global_config(config: GlobalConfig) {
    GLOBAL_CONFIG.with(|current| *current.borrow_mut() = Some(config));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TestConfig::default();
        assert_eq!(config.count, 100);
        assert_eq!(config.max_gen, 300);
        assert_eq!(config.max_fail, 1);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            TestConfig::new(0, 10, 1, None),
            Err(ConfigError::InvalidCount(0))
        );
        assert_eq!(
            TestConfig::new(10, 5, 1, None),
            Err(ConfigError::InvalidMaxGen {
                max_gen: 5,
                count: 10
            })
        );
        assert_eq!(
            TestConfig::new(10, 10, 0, None),
            Err(ConfigError::InvalidMaxFail(0))
        );
        assert!(TestConfig::new(10, 10, 1, Some(3)).is_ok());
    }

    #[test]
    fn test_with_count_keeps_max_gen_valid() {
        let config = TestConfig::default().with_count(1000);
        assert_eq!(config.max_gen, 3000);
        assert!(config.validate().is_ok());

        let config = TestConfig::default().with_count(10);
        assert_eq!(config.max_gen, 300);
    }

    #[test]
    fn test_with_max_gen_never_drops_below_count() {
        let config = TestConfig::default().with_count(50).with_max_gen(10);
        assert_eq!(config.max_gen, 50);
        assert!(config.validate().is_ok());

        let config = TestConfig::default().with_max_gen(500);
        assert_eq!(config.max_gen, 500);
    }

    #[test]
    fn test_seed_var_parsing() {
        assert_eq!(GlobalConfig::from_seed_var(None), Ok(GlobalConfig::default()));
        assert_eq!(
            GlobalConfig::from_seed_var(Some("42")),
            Ok(GlobalConfig::default().with_seed(42))
        );
        assert_eq!(
            GlobalConfig::from_seed_var(Some("forty-two")),
            Err(ConfigError::InvalidSeed {
                value: "forty-two".to_string(),
                source_name: SEED_ENV_VAR.to_string()
            })
        );
    }

    #[test]
    fn test_merge_with_global() {
        let global = GlobalConfig::default().with_seed(9);
        assert_eq!(TestConfig::default().merge_with_global(&global).seed, Some(9));
        assert_eq!(
            TestConfig::default()
                .with_seed(1)
                .merge_with_global(&global)
                .seed,
            Some(1)
        );
    }

    #[test]
    fn test_parse_seed() {
        assert_eq!(parse_seed(" 1234 ", "test"), Ok(1234));
        assert_eq!(
            parse_seed("-1", "test"),
            Err(ConfigError::InvalidSeed {
                value: "-1".to_string(),
                source_name: "test".to_string()
            })
        );
    }

    #[test]
    fn test_thread_local_global_config() {
        let original = get_global_config();
        set_global_config(
            GlobalConfig::default()
                .with_seed(77)
                .with_seed_policy(SeedPolicy::ForkPerTest),
        );
        let current = get_global_config();
        assert_eq!(current.seed, Some(77));
        assert_eq!(current.seed_policy, SeedPolicy::ForkPerTest);
        set_global_config(original);
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::InvalidMaxGen {
                max_gen: 1,
                count: 2
            }
            .to_string(),
            "invalid max_gen: 1 (must be >= count 2)"
        );
    }
}
