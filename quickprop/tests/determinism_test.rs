//! Reproducibility: identical seeds give identical draws and identical results.

use pretty_assertions::assert_eq;
use quickprop::{
    DefaultArbitrary, Gen, SeedPolicy, SeedSource, Test, TestRunner, arbitrary, create_seeded_rng,
    fork_rng, generator,
};

fn nested() -> Gen<Vec<(Option<i64>, String)>> {
    generator::small_list(generator::pair(
        generator::option(generator::int()),
        generator::small_string(),
    ))
}

#[test]
fn test_same_seed_same_draws() {
    for seed in [0u64, 7, u64::MAX] {
        assert_eq!(nested().sample(seed, 50), nested().sample(seed, 50));
    }
}

#[test]
fn test_different_seeds_diverge() {
    assert!(generator::int().sample(1, 20) != generator::int().sample(2, 20));
}

#[test]
fn test_same_seed_same_result() {
    let make = || {
        Test::new(
            arbitrary::small_list(arbitrary::int_range(-50, 50)),
            |xs: &Vec<i64>| xs.iter().filter(|x| **x < 0).count() < 4,
        )
        .with_max_fail(2)
    };

    for seed in [3u64, 11, 2024] {
        let first = make().run_seeded(seed);
        let second = make().run_seeded(seed);
        assert_eq!(first, second);
    }
}

#[test]
fn test_cloned_source_replays() {
    let mut rng = create_seeded_rng(55);
    let mut replay = rng.clone();
    let arb = <(i64, String)>::arbitrary();
    assert_eq!(
        arb.generator().generate_n(&mut rng, 10),
        arb.generator().generate_n(&mut replay, 10)
    );
}

#[test]
fn test_fork_is_deterministic() {
    let mut a = create_seeded_rng(9);
    let mut b = create_seeded_rng(9);
    let mut child_a = fork_rng(&mut a);
    let mut child_b = fork_rng(&mut b);

    let draws_a = generator::int().generate_n(&mut child_a, 10);
    let draws_b = generator::int().generate_n(&mut child_b, 10);
    assert_eq!(draws_a, draws_b);

    // the parents advanced in lockstep as well
    assert_eq!(
        generator::int().generate_n(&mut a, 5),
        generator::int().generate_n(&mut b, 5)
    );
}

#[test]
fn test_explicit_seed_is_kept() {
    let source = SeedSource::resolve(Some(123));
    assert_eq!(source, SeedSource::Explicit(123));
    assert!(!source.is_entropy());

    let drawn = SeedSource::resolve(None);
    assert!(drawn.is_entropy());
    // an entropy seed replays like any other
    assert_eq!(
        generator::int().sample(drawn.seed(), 5),
        generator::int().sample(drawn.seed(), 5)
    );
}

#[test]
fn test_runner_is_deterministic_under_both_policies() {
    for policy in [SeedPolicy::Chained, SeedPolicy::ForkPerTest] {
        let run = || {
            let tests: Vec<Box<dyn quickprop::DynTest>> = vec![
                Box::new(Test::new(arbitrary::int_bound(100), |x: &i64| *x < 90)),
                Box::new(Test::new(arbitrary::small_string(), |s: &String| {
                    !s.contains('a')
                })),
            ];
            TestRunner::with_seed(31)
                .with_policy(policy)
                .run_tests(&tests, |_, _, _| {})
        };

        let first = run();
        let second = run();
        for (a, b) in first.reports.iter().zip(&second.reports) {
            assert_eq!(a.status(), b.status());
            assert_eq!(a.count, b.count);
            assert_eq!(a.count_gen, b.count_gen);
            assert_eq!(
                a.failure.as_ref().map(ToString::to_string).map(strip_names),
                b.failure.as_ref().map(ToString::to_string).map(strip_names)
            );
        }
    }
}

/// Drop the first line, which names auto-numbered tests
fn strip_names(message: String) -> String {
    message.lines().skip(1).collect::<Vec<_>>().join("\n")
}
