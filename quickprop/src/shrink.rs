//! Shrinkers: deterministic maps from a value to a sequence of smaller ones.
//!
//! A shrinker never fails and never consumes randomness. Candidate order
//! matters, since the engine accepts the first candidate that still
//! falsifies the law.

use std::fmt;
use std::rc::Rc;

use num_traits::PrimInt;

use crate::candidates::Candidates;

/// A function from a value to its shrink candidates.
pub struct Shrinker<T> {
    shrink: Rc<dyn Fn(&T) -> Candidates<T>>,
}

impl<T> Clone for Shrinker<T> {
    fn clone(&self) -> Self {
        Self {
            shrink: Rc::clone(&self.shrink),
        }
    }
}

impl<T> fmt::Debug for Shrinker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shrinker")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: 'static> Shrinker<T> {
    /// Create a shrinker from a candidate function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&T) -> Candidates<T> + 'static,
    {
        Self { shrink: Rc::new(f) }
    }

    /// Candidates for `value`, rebuilt from scratch on each call
    pub fn shrink(&self, value: &T) -> Candidates<T> {
        (self.shrink)(value)
    }
}

/// The shrinker with no candidates
pub fn nil<T: 'static>() -> Shrinker<T> {
    Shrinker::new(|_| Candidates::empty())
}

/// Integer candidates for `x`.
///
/// `x / 2` (towards zero) when `|x| > 2`, then one step towards zero.
pub fn int_candidates<T: PrimInt + 'static>(x: T) -> Candidates<T> {
    let zero = T::zero();
    let one = T::one();
    let two = one + one;
    let mut candidates = Vec::with_capacity(2);

    // `zero - two` is only evaluated for negative, hence signed, values
    if x > two || (x < zero && x < zero - two) {
        candidates.push(x / two);
    }
    if x > zero {
        candidates.push(x - one);
    } else if x < zero {
        candidates.push(x + one);
    }
    Candidates::from_vec(candidates)
}

/// Integer shrinker, see [`int_candidates`]
pub fn int<T: PrimInt + 'static>() -> Shrinker<T> {
    Shrinker::new(|x: &T| int_candidates(*x))
}

/// `None` first, then every shrink of the payload
pub fn option<T: Clone + 'static>(inner: Shrinker<T>) -> Shrinker<Option<T>> {
    Shrinker::new(move |value: &Option<T>| match value {
        None => Candidates::empty(),
        Some(v) => Candidates::once(None).append(inner.shrink(v).map(Some)),
    })
}

/// Every one-element removal, scanning left to right
pub fn list_spine<T: Clone + 'static>() -> Shrinker<Vec<T>> {
    Shrinker::new(|value: &Vec<T>| removals(value))
}

fn removals<T: Clone + 'static>(value: &[T]) -> Candidates<Vec<T>> {
    let base = value.to_vec();
    Candidates::new((0..base.len()).map(move |i| {
        let mut shorter = base.clone();
        shorter.remove(i);
        shorter
    }))
}

/// Every element-level shrink substituted in place, index by index
pub fn list_elems<T: Clone + 'static>(elem: Shrinker<T>) -> Shrinker<Vec<T>> {
    Shrinker::new(move |value: &Vec<T>| substitutions(value, &elem))
}

fn substitutions<T: Clone + 'static>(value: &[T], elem: &Shrinker<T>) -> Candidates<Vec<T>> {
    let base = value.to_vec();
    let elem = elem.clone();
    Candidates::new((0..base.len()).flat_map(move |i| {
        let template = base.clone();
        elem.shrink(&base[i]).map(move |smaller| {
            let mut substituted = template.clone();
            substituted[i] = smaller;
            substituted
        })
    }))
}

/// Removals first, then element shrinks when `elem` is supplied
pub fn list<T: Clone + 'static>(elem: Option<Shrinker<T>>) -> Shrinker<Vec<T>> {
    Shrinker::new(move |value: &Vec<T>| match &elem {
        None => removals(value),
        Some(elem) => removals(value).append(substitutions(value, elem)),
    })
}

/// String shrinker over characters, same policy as [`list`]
pub fn string(chars: Option<Shrinker<char>>) -> Shrinker<String> {
    let inner = list(chars);
    Shrinker::new(move |value: &String| {
        let chars: Vec<char> = value.chars().collect();
        inner
            .shrink(&chars)
            .map(|shorter| shorter.into_iter().collect())
    })
}

/// Vary one component at a time, first component first
pub fn pair<A, B>(a: Shrinker<A>, b: Shrinker<B>) -> Shrinker<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    Shrinker::new(move |(x, y): &(A, B)| {
        let (y_fixed, x_fixed) = (y.clone(), x.clone());
        let firsts = a.shrink(x).map(move |x2| (x2, y_fixed.clone()));
        let seconds = b.shrink(y).map(move |y2| (x_fixed.clone(), y2));
        firsts.append(seconds)
    })
}

/// Vary one component at a time, in component order
pub fn triple<A, B, C>(a: Shrinker<A>, b: Shrinker<B>, c: Shrinker<C>) -> Shrinker<(A, B, C)>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    Shrinker::new(move |value: &(A, B, C)| {
        let (x, y, z) = value.clone();
        let (y1, z1) = (y.clone(), z.clone());
        let (x2, z2) = (x.clone(), z.clone());
        let (x3, y3) = (x.clone(), y.clone());
        Candidates::concat(vec![
            a.shrink(&x)
                .map(move |x| (x, y1.clone(), z1.clone())),
            b.shrink(&y)
                .map(move |y| (x2.clone(), y, z2.clone())),
            c.shrink(&z)
                .map(move |z| (x3.clone(), y3.clone(), z)),
        ])
    })
}
