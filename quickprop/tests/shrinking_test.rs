//! Laws about the built-in shrinkers, checked with the engine itself.

use pretty_assertions::assert_eq;
use quickprop::{Test, arbitrary, shrink};

#[test]
fn test_integer_shrinking_is_logarithmic() {
    let test = Test::new(arbitrary::int(), |x: &i64| {
        let shrinker = shrink::int::<i64>();
        let mut current = *x;
        let mut steps = 0u32;
        while let Some(next) = shrinker.shrink(&current).next() {
            current = next;
            steps += 1;
        }
        current == 0 && steps <= 2 * (64 - x.unsigned_abs().leading_zeros()) + 2
    })
    .with_name("int_shrink_log_steps")
    .with_count(500)
    .with_seed(10);

    assert!(test.assert_success().is_ok());
}

#[test]
fn test_list_removals_cover_every_position() {
    let test = Test::new(
        arbitrary::small_list(arbitrary::int_bound(5)),
        |xs: &Vec<i64>| {
            let candidates: Vec<Vec<i64>> = shrink::list_spine().shrink(xs).collect();
            let expected: Vec<Vec<i64>> = (0..xs.len())
                .map(|i| {
                    let mut removed = xs.clone();
                    removed.remove(i);
                    removed
                })
                .collect();
            candidates == expected
        },
    )
    .with_seed(3);

    assert!(test.assert_success().is_ok());
}

#[test]
fn test_option_shrinks_to_none_first() {
    let shrinker = shrink::option(shrink::int::<i64>());
    let candidates: Vec<Option<i64>> = shrinker.shrink(&Some(10)).collect();
    assert_eq!(candidates, vec![None, Some(5), Some(9)]);
    assert_eq!(shrinker.shrink(&None).count(), 0);
}

#[test]
fn test_triple_varies_one_component_at_a_time() {
    let shrinker = shrink::triple(shrink::int::<i64>(), shrink::nil(), shrink::int::<i64>());
    let candidates: Vec<(i64, bool, i64)> = shrinker.shrink(&(4, true, -1)).collect();
    assert_eq!(candidates, vec![(2, true, -1), (3, true, -1), (4, true, 0)]);
}

#[test]
fn test_list_minimum_is_single_offending_element() {
    let result = Test::new(
        arbitrary::small_list(arbitrary::int_bound(1000)),
        |xs: &Vec<i64>| xs.iter().all(|x| *x < 700),
    )
    .with_count(300)
    .run_seeded(17);

    assert!(result.is_failed());
    for cex in result.counterexamples() {
        assert_eq!(cex.instance, vec![700]);
    }
}

#[test]
fn test_shrinking_skips_discarded_candidates() {
    // candidates below 100 are out of the law's domain and never accepted
    let result = Test::new(arbitrary::int_range(100, 1000), |x: &i64| {
        quickprop::implies(*x >= 100, || *x % 7 != 0)
    })
    .with_count(300)
    .run_seeded(23);

    assert!(result.is_failed());
    for cex in result.counterexamples() {
        assert!(cex.instance >= 100);
        assert_eq!(cex.instance % 7, 0);
    }
}
