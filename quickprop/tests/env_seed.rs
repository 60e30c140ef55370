//! Seeding from `QUICKPROP_SEED`.
//!
//! Kept to a single test so no other test in this binary observes the
//! environment changes.

use std::thread;

use pretty_assertions::assert_eq;
use quickprop::{
    ConfigError, SEED_ENV_VAR, Test, TestRunner, arbitrary, get_global_config, load_global_config,
};

#[test]
fn test_seed_variable_replays_runs() {
    // SAFETY: this binary runs no other test that reads the environment
    unsafe { std::env::set_var(SEED_ENV_VAR, "42") };

    thread::spawn(|| {
        let test = Test::new(arbitrary::int_bound(1000), |x: &i64| *x < 500);
        let result = test.check();
        assert_eq!(result.seed, Some(42));
        assert_eq!(result, test.run_seeded(42));

        assert_eq!(TestRunner::from_global().map(|r| r.seed()), Ok(42));
        assert_eq!(get_global_config().seed, Some(42));
    })
    .join()
    .unwrap();

    unsafe { std::env::set_var(SEED_ENV_VAR, "not-a-seed") };

    thread::spawn(|| {
        let expected = ConfigError::InvalidSeed {
            value: "not-a-seed".to_string(),
            source_name: SEED_ENV_VAR.to_string(),
        };
        assert_eq!(load_global_config(), Err(expected.clone()));
        assert_eq!(TestRunner::from_global().map(|r| r.seed()), Err(expected.clone()));

        let test = Test::new(arbitrary::int(), |_: &i64| true);
        assert_eq!(test.try_check().map(|r| r.seed), Err(expected));
        // the infallible path falls back to an entropy seed and still records it
        assert!(test.check().seed.is_some());
    })
    .join()
    .unwrap();

    unsafe { std::env::remove_var(SEED_ENV_VAR) };
}
