//! Value generators and the combinator algebra over them.
//!
//! A [`Gen<T>`] is a pure function from a random source to a value. It has no
//! identity of its own; generators are composed with the combinators in this
//! module and only ever consume entropy from the source they are handed.

use std::fmt;
use std::rc::Rc;

use rand::{Rng, RngCore};

use crate::rng::create_seeded_rng;

/// A generator of values of type `T`.
pub struct Gen<T> {
    sample: Rc<dyn Fn(&mut dyn RngCore) -> T>,
}

impl<T> Clone for Gen<T> {
    fn clone(&self) -> Self {
        Self {
            sample: Rc::clone(&self.sample),
        }
    }
}

impl<T> fmt::Debug for Gen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gen")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: 'static> Gen<T> {
    /// Create a generator from a sampling function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut dyn RngCore) -> T + 'static,
    {
        Self { sample: Rc::new(f) }
    }

    /// Draw one value
    pub fn generate(&self, rng: &mut dyn RngCore) -> T {
        (self.sample)(rng)
    }

    /// Draw `n` values in sequence from the same source
    pub fn generate_n(&self, rng: &mut dyn RngCore, n: usize) -> Vec<T> {
        (0..n).map(|_| self.generate(rng)).collect()
    }

    /// Draw `n` values from a fresh source seeded with `seed`
    pub fn sample(&self, seed: u64, n: usize) -> Vec<T> {
        let mut rng = create_seeded_rng(seed);
        self.generate_n(&mut rng, n)
    }

    /// Transform every generated value
    pub fn map<U, F>(self, f: F) -> Gen<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        Gen::new(move |rng| f(self.generate(rng)))
    }

    /// Sequential composition: the second generator depends on the first value
    pub fn bind<U, F>(self, f: F) -> Gen<U>
    where
        U: 'static,
        F: Fn(T) -> Gen<U> + 'static,
    {
        Gen::new(move |rng| {
            let value = self.generate(rng);
            f(value).generate(rng)
        })
    }

    /// Draw from `self`, then from `other`, and pair the results
    pub fn zip<U: 'static>(self, other: Gen<U>) -> Gen<(T, U)> {
        Gen::new(move |rng| {
            let left = self.generate(rng);
            let right = other.generate(rng);
            (left, right)
        })
    }
}

/// Constant generator
pub fn just<T: Clone + 'static>(value: T) -> Gen<T> {
    Gen::new(move |_| value.clone())
}

/// Uniform choice among generators.
///
/// # Panics
///
/// Panics if `gens` is empty.
pub fn one_of<T: 'static>(gens: Vec<Gen<T>>) -> Gen<T> {
    if gens.is_empty() {
        panic!("one_of cannot be created from an empty list of generators");
    }
    Gen::new(move |rng| {
        let index = rng.gen_range(0..gens.len());
        gens[index].generate(rng)
    })
}

/// Uniform choice among fixed values.
///
/// # Panics
///
/// Panics if `values` is empty.
pub fn one_of_values<T: Clone + 'static>(values: Vec<T>) -> Gen<T> {
    if values.is_empty() {
        panic!("one_of_values cannot be created from an empty list of values");
    }
    Gen::new(move |rng| {
        let index = rng.gen_range(0..values.len());
        values[index].clone()
    })
}

/// Pick the bucket `draw` falls into, scanning cumulative weights.
///
/// `draw` must be below the sum of `weights`; the first bucket whose
/// cumulative weight exceeds it wins.
pub(crate) fn weighted_index(weights: &[u64], draw: u64) -> usize {
    let mut cumulative = 0u64;
    for (index, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if draw < cumulative {
            return index;
        }
    }
    weights.len() - 1
}

/// Choice proportional to positive weights.
///
/// Weights need not sum to any particular total.
///
/// # Panics
///
/// Panics if `choices` is empty or every weight is zero.
pub fn frequency<T: 'static>(choices: Vec<(u32, Gen<T>)>) -> Gen<T> {
    let weights: Vec<u64> = choices.iter().map(|(w, _)| u64::from(*w)).collect();
    let total: u64 = weights.iter().sum();
    if total == 0 {
        panic!("frequency requires at least one positive weight");
    }
    let gens: Vec<Gen<T>> = choices.into_iter().map(|(_, g)| g).collect();
    Gen::new(move |rng| {
        let draw = rng.gen_range(0..total);
        gens[weighted_index(&weights, draw)].generate(rng)
    })
}

/// Weighted choice among fixed values
pub fn frequency_values<T: Clone + 'static>(choices: Vec<(u32, T)>) -> Gen<T> {
    frequency(choices.into_iter().map(|(w, v)| (w, just(v))).collect())
}

/// Size-biased natural numbers.
///
/// Roughly half the mass lands in `[0, 10)`, a quarter in `[10, 100)`, a
/// fifth in `[100, 1000)` and the rest in `[1000, 10000)`. This is the
/// default driver for container lengths and recursion depth.
pub fn nat() -> Gen<usize> {
    Gen::new(sample_nat)
}

fn sample_nat(rng: &mut dyn RngCore) -> usize {
    let p: f64 = rng.r#gen();
    if p < 0.5 {
        rng.gen_range(0..10)
    } else if p < 0.75 {
        rng.gen_range(10..100)
    } else if p < 0.95 {
        rng.gen_range(100..1000)
    } else {
        rng.gen_range(1000..10000)
    }
}

/// Small natural numbers, uniform in `[0, 10]`
pub fn small_nat() -> Gen<usize> {
    Gen::new(|rng| rng.gen_range(0..=10))
}

/// Size-biased integers, same distribution as [`nat`]
pub fn small_int() -> Gen<i64> {
    Gen::new(|rng| sample_nat(rng) as i64)
}

/// Draw a size from [`nat`] and build a generator for it
pub fn sized<T, F>(f: F) -> Gen<T>
where
    T: 'static,
    F: Fn(usize) -> Gen<T> + 'static,
{
    sized_size(nat(), f)
}

/// Like [`sized`], but with a caller-supplied size generator
pub fn sized_size<T, F>(size: Gen<usize>, f: F) -> Gen<T>
where
    T: 'static,
    F: Fn(usize) -> Gen<T> + 'static,
{
    Gen::new(move |rng| {
        let n = size.generate(rng);
        f(n).generate(rng)
    })
}

/// Recursive handle for size-indexed generators built with [`fix`].
pub struct Recurse<T> {
    step: Rc<dyn Fn(&Recurse<T>, usize) -> Gen<T>>,
}

impl<T> Clone for Recurse<T> {
    fn clone(&self) -> Self {
        Self {
            step: Rc::clone(&self.step),
        }
    }
}

impl<T: 'static> Recurse<T> {
    /// The generator at `size`.
    ///
    /// Construction is deferred until a value is drawn, so only the branches
    /// that are actually sampled get built.
    pub fn at(&self, size: usize) -> Gen<T> {
        let this = self.clone();
        Gen::new(move |rng| (this.step)(&this, size).generate(rng))
    }
}

/// Tie the knot for a recursive, size-indexed generator.
///
/// Recursive calls through the handle must use a strictly smaller size;
/// the combinator does not check this.
pub fn fix<T, F>(f: F) -> Recurse<T>
where
    T: 'static,
    F: Fn(&Recurse<T>, usize) -> Gen<T> + 'static,
{
    Recurse { step: Rc::new(f) }
}

/// Uniform integer in `[0, n]`.
///
/// # Panics
///
/// Panics if `n` is negative.
pub fn int_bound(n: i64) -> Gen<i64> {
    if n < 0 {
        panic!("int_bound requires a non-negative bound, got {}", n);
    }
    Gen::new(move |rng| rng.gen_range(0..=n))
}

/// Uniform integer in `[low, high]`.
///
/// # Panics
///
/// Panics if `high < low`.
pub fn int_range(low: i64, high: i64) -> Gen<i64> {
    if high < low {
        panic!("int_range requires low <= high, got [{}, {}]", low, high);
    }
    Gen::new(move |rng| rng.gen_range(low..=high))
}

/// Integers over the whole `i64` range.
///
/// Two independent uniform bit groups give a 63-bit magnitude and the sign
/// is drawn separately; the negative branch maps `m` to `-m - 1`, so every
/// representable value is reachable with equal probability.
pub fn int() -> Gen<i64> {
    Gen::new(|rng| {
        let high = u64::from(rng.next_u32() & 0x7FFF_FFFF);
        let low = u64::from(rng.next_u32());
        let magnitude = ((high << 32) | low) as i64;
        if rng.r#gen::<bool>() {
            !magnitude
        } else {
            magnitude
        }
    })
}

/// Non-negative integers over the whole range
pub fn pos_int() -> Gen<i64> {
    int().map(|x| if x < 0 { !x } else { x })
}

/// Negative integers over the whole range
pub fn neg_int() -> Gen<i64> {
    int().map(|x| if x < 0 { x } else { !x })
}

/// Finite floats with a wide spread of magnitudes.
///
/// The magnitude is `exp(e)` with `e` uniform in `[0, 15)` and a random sign
/// on the exponent; the value's sign is drawn independently. Never produces
/// NaN or infinities.
pub fn float() -> Gen<f64> {
    Gen::new(|rng| {
        let exponent: f64 = rng.gen_range(0.0..15.0);
        let exponent = if rng.r#gen::<bool>() {
            -exponent
        } else {
            exponent
        };
        let magnitude = exponent.exp();
        if rng.r#gen::<bool>() {
            -magnitude
        } else {
            magnitude
        }
    })
}

/// Uniform float in `[low, high]`.
///
/// # Panics
///
/// Panics if the bounds are not finite or `high < low`.
pub fn float_range(low: f64, high: f64) -> Gen<f64> {
    if !low.is_finite() || !high.is_finite() || high < low {
        panic!("float_range requires finite low <= high, got [{}, {}]", low, high);
    }
    Gen::new(move |rng| rng.gen_range(low..=high))
}

/// Fair coin
pub fn bool() -> Gen<bool> {
    Gen::new(|rng| rng.r#gen())
}

/// Any character with a code point in `0..=255`
pub fn char() -> Gen<char> {
    Gen::new(|rng| char::from(rng.r#gen::<u8>()))
}

/// Printable ASCII characters plus newline
pub fn printable() -> Gen<char> {
    Gen::new(|rng| {
        // 95 printable code points, index 95 stands for '\n'
        let index: u8 = rng.gen_range(0..=95);
        if index == 95 {
            '\n'
        } else {
            char::from(b' ' + index)
        }
    })
}

/// Decimal digits
pub fn numeral() -> Gen<char> {
    Gen::new(|rng| char::from(b'0' + rng.gen_range(0..10u8)))
}

/// Strings whose length is drawn from `size`
pub fn string_size(size: Gen<usize>, chars: Gen<char>) -> Gen<String> {
    Gen::new(move |rng| {
        let len = size.generate(rng);
        (0..len).map(|_| chars.generate(rng)).collect()
    })
}

/// Strings with a [`nat`] length
pub fn string_of(chars: Gen<char>) -> Gen<String> {
    string_size(nat(), chars)
}

/// Strings of [`char`] with a [`nat`] length
pub fn string() -> Gen<String> {
    string_of(char())
}

/// Short strings of [`char`]
pub fn small_string() -> Gen<String> {
    string_size(small_nat(), char())
}

/// Lists whose length is drawn from `size`, elements drawn independently
pub fn list_of_size<T: 'static>(size: Gen<usize>, elem: Gen<T>) -> Gen<Vec<T>> {
    Gen::new(move |rng| {
        let len = size.generate(rng);
        elem.generate_n(rng, len)
    })
}

/// Lists with a [`nat`] length
pub fn list<T: 'static>(elem: Gen<T>) -> Gen<Vec<T>> {
    list_of_size(nat(), elem)
}

/// Short lists
pub fn small_list<T: 'static>(elem: Gen<T>) -> Gen<Vec<T>> {
    list_of_size(small_nat(), elem)
}

/// `None` with probability 0.15, otherwise `Some` of a drawn value
pub fn option<T: 'static>(inner: Gen<T>) -> Gen<Option<T>> {
    Gen::new(move |rng| {
        if rng.gen_bool(0.15) {
            None
        } else {
            Some(inner.generate(rng))
        }
    })
}

/// Independent pair
pub fn pair<A: 'static, B: 'static>(a: Gen<A>, b: Gen<B>) -> Gen<(A, B)> {
    a.zip(b)
}

/// Independent triple
pub fn triple<A: 'static, B: 'static, C: 'static>(
    a: Gen<A>,
    b: Gen<B>,
    c: Gen<C>,
) -> Gen<(A, B, C)> {
    Gen::new(move |rng| {
        let x = a.generate(rng);
        let y = b.generate(rng);
        let z = c.generate(rng);
        (x, y, z)
    })
}

/// Fisher-Yates shuffle, uniform over permutations
pub fn shuffle_in_place<T>(items: &mut [T], rng: &mut dyn RngCore) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Random permutations of a fixed list
pub fn shuffle<T: Clone + 'static>(items: Vec<T>) -> Gen<Vec<T>> {
    Gen::new(move |rng| {
        let mut permuted = items.clone();
        shuffle_in_place(&mut permuted, rng);
        permuted
    })
}
