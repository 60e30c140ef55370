//! Arbitrary values: a generator bundled with optional printer, size metric,
//! shrinker and classifier.
//!
//! An [`Arbitrary<T>`] is the unit of reuse for a type. It is immutable once
//! built and can be shared by any number of tests. Composite constructors
//! ([`pair`], [`list`], [`option`], ...) derive their capabilities from their
//! components: a composite printer or size metric exists only when every
//! component provides one, while composite shrinkers substitute [`nil`] for
//! missing component shrinkers so shrinking degrades instead of vanishing.
//!
//! [`nil`]: crate::shrink::nil

use std::fmt;
use std::rc::Rc;

use num_traits::PrimInt;
use rand::RngCore;

use crate::candidates::Candidates;
use crate::generator::{self, Gen};
use crate::shrink::{self, Shrinker};

/// Renders an instance for reports
pub type Printer<T> = Rc<dyn Fn(&T) -> String>;

/// Ranks instances: smaller is more minimal
pub type SizeMetric<T> = Rc<dyn Fn(&T) -> usize>;

/// Tags an instance for distribution statistics
pub type Classifier<T> = Rc<dyn Fn(&T) -> String>;

/// Generator plus optional printer, size metric, shrinker and classifier.
pub struct Arbitrary<T> {
    generator: Gen<T>,
    printer: Option<Printer<T>>,
    size: Option<SizeMetric<T>>,
    shrinker: Option<Shrinker<T>>,
    classifier: Option<Classifier<T>>,
}

impl<T> Clone for Arbitrary<T> {
    fn clone(&self) -> Self {
        Self {
            generator: self.generator.clone(),
            printer: self.printer.clone(),
            size: self.size.clone(),
            shrinker: self.shrinker.clone(),
            classifier: self.classifier.clone(),
        }
    }
}

impl<T> fmt::Debug for Arbitrary<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arbitrary")
            .field("type", &std::any::type_name::<T>())
            .field("printer", &self.printer.is_some())
            .field("size", &self.size.is_some())
            .field("shrinker", &self.shrinker.is_some())
            .field("classifier", &self.classifier.is_some())
            .finish()
    }
}

impl<T: 'static> Arbitrary<T> {
    /// A bare arbitrary with only a generator
    pub fn new(generator: Gen<T>) -> Self {
        Self {
            generator,
            printer: None,
            size: None,
            shrinker: None,
            classifier: None,
        }
    }

    /// Attach a printer
    pub fn with_printer<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> String + 'static,
    {
        self.printer = Some(Rc::new(f));
        self
    }

    /// Attach a size metric
    pub fn with_size<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> usize + 'static,
    {
        self.size = Some(Rc::new(f));
        self
    }

    /// Attach a shrinker
    pub fn with_shrinker(mut self, shrinker: Shrinker<T>) -> Self {
        self.shrinker = Some(shrinker);
        self
    }

    /// Attach a classifier
    pub fn with_classifier<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> String + 'static,
    {
        self.classifier = Some(Rc::new(f));
        self
    }

    /// Remove the shrinker
    pub fn without_shrinker(mut self) -> Self {
        self.shrinker = None;
        self
    }

    pub fn generator(&self) -> &Gen<T> {
        &self.generator
    }

    pub fn printer(&self) -> Option<&Printer<T>> {
        self.printer.as_ref()
    }

    pub fn size_metric(&self) -> Option<&SizeMetric<T>> {
        self.size.as_ref()
    }

    pub fn shrinker(&self) -> Option<&Shrinker<T>> {
        self.shrinker.as_ref()
    }

    pub fn classifier(&self) -> Option<&Classifier<T>> {
        self.classifier.as_ref()
    }

    /// Draw one instance
    pub fn generate(&self, rng: &mut dyn RngCore) -> T {
        self.generator.generate(rng)
    }

    /// Render an instance, or a placeholder without a printer
    pub fn print_instance(&self, value: &T) -> String {
        match &self.printer {
            Some(print) => print(value),
            None => "<no printer>".to_string(),
        }
    }

    /// Size of an instance, if a metric is attached
    pub fn size_of(&self, value: &T) -> Option<usize> {
        self.size.as_ref().map(|size| size(value))
    }

    /// Classification tag of an instance, if a classifier is attached
    pub fn classify(&self, value: &T) -> Option<String> {
        self.classifier.as_ref().map(|classify| classify(value))
    }

    /// Shrink candidates, empty without a shrinker
    pub fn shrink(&self, value: &T) -> Candidates<T> {
        match &self.shrinker {
            Some(shrinker) => shrinker.shrink(value),
            None => Candidates::empty(),
        }
    }

    /// Transform generated values, dropping every optional capability
    pub fn map<U, F>(self, f: F) -> Arbitrary<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        Arbitrary::new(self.generator.map(f))
    }

    /// Transform generated values, keeping capabilities through `inverse`.
    ///
    /// `inverse(f(x))` must give back `x` (or an equivalent value) for the
    /// printer, size, shrinker and classifier to keep their meaning.
    pub fn map_with_inverse<U, F, R>(self, f: F, inverse: R) -> Arbitrary<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
        R: Fn(&U) -> T + 'static,
    {
        let f = Rc::new(f);
        let inverse = Rc::new(inverse);

        let forward = Rc::clone(&f);
        let mut mapped = Arbitrary::new(self.generator.map(move |x| forward(x)));

        if let Some(print) = self.printer {
            let inverse = Rc::clone(&inverse);
            mapped = mapped.with_printer(move |u| print(&inverse(u)));
        }
        if let Some(size) = self.size {
            let inverse = Rc::clone(&inverse);
            mapped = mapped.with_size(move |u| size(&inverse(u)));
        }
        if let Some(classify) = self.classifier {
            let inverse = Rc::clone(&inverse);
            mapped = mapped.with_classifier(move |u| classify(&inverse(u)));
        }
        if let Some(shrinker) = self.shrinker {
            mapped = mapped.with_shrinker(Shrinker::new(move |u: &U| {
                let forward = Rc::clone(&f);
                shrinker.shrink(&inverse(u)).map(move |x| forward(x))
            }));
        }
        mapped
    }
}

/// Types with a canonical [`Arbitrary`].
///
/// Implemented for the common scalars and for containers and tuples of
/// implementing types.
pub trait DefaultArbitrary: Sized + 'static {
    fn arbitrary() -> Arbitrary<Self>;
}

fn debug_printer<T: fmt::Debug>(value: &T) -> String {
    format!("{:?}", value)
}

/// Scalar arbitrary: generator plus a `Debug` printer, no shrinker
pub fn make_scalar<T: fmt::Debug + 'static>(generator: Gen<T>) -> Arbitrary<T> {
    Arbitrary::new(generator).with_printer(debug_printer)
}

/// Integer arbitrary: integer shrinker and absolute value as size
pub fn make_int(generator: Gen<i64>) -> Arbitrary<i64> {
    make_prim_int(generator, |x: &i64| x.unsigned_abs() as usize)
}

fn make_prim_int<T, S>(generator: Gen<T>, size: S) -> Arbitrary<T>
where
    T: PrimInt + fmt::Display + 'static,
    S: Fn(&T) -> usize + 'static,
{
    Arbitrary::new(generator)
        .with_printer(|x: &T| x.to_string())
        .with_size(size)
        .with_shrinker(shrink::int())
}

/// Integers over the whole `i64` range
pub fn int() -> Arbitrary<i64> {
    make_int(generator::int())
}

/// Size-biased small integers
pub fn small_int() -> Arbitrary<i64> {
    make_int(generator::small_int())
}

/// Uniform integers in `[0, n]`
pub fn int_bound(n: i64) -> Arbitrary<i64> {
    make_int(generator::int_bound(n))
}

/// Uniform integers in `[low, high]`
pub fn int_range(low: i64, high: i64) -> Arbitrary<i64> {
    make_int(generator::int_range(low, high))
}

/// Non-negative integers
pub fn pos_int() -> Arbitrary<i64> {
    make_int(generator::pos_int())
}

/// Negative integers
pub fn neg_int() -> Arbitrary<i64> {
    make_int(generator::neg_int())
}

/// Finite floats
pub fn float() -> Arbitrary<f64> {
    make_scalar(generator::float())
}

pub fn bool() -> Arbitrary<bool> {
    make_scalar(generator::bool())
}

pub fn char() -> Arbitrary<char> {
    make_scalar(generator::char())
}

pub fn printable_char() -> Arbitrary<char> {
    make_scalar(generator::printable())
}

/// Uniform choice among fixed values
pub fn one_of_values<T: Clone + fmt::Debug + 'static>(values: Vec<T>) -> Arbitrary<T> {
    make_scalar(generator::one_of_values(values))
}

/// Strings built from `chars`, shrinking by character removal
pub fn string_of(chars: Gen<char>) -> Arbitrary<String> {
    string_gen(generator::string_of(chars))
}

fn string_gen(generator: Gen<String>) -> Arbitrary<String> {
    Arbitrary::new(generator)
        .with_printer(debug_printer)
        .with_size(|s: &String| s.chars().count())
        .with_shrinker(shrink::string(None))
}

pub fn string() -> Arbitrary<String> {
    string_gen(generator::string())
}

pub fn small_string() -> Arbitrary<String> {
    string_gen(generator::small_string())
}

pub fn printable_string() -> Arbitrary<String> {
    string_of(generator::printable())
}

/// Lists with a length drawn from `size`.
///
/// Size is the sum of element sizes, or the length when elements have no
/// metric. The shrinker removes elements and, when the element arbitrary has
/// one, shrinks elements in place.
pub fn list_of_size<T: Clone + 'static>(size: Gen<usize>, elem: Arbitrary<T>) -> Arbitrary<Vec<T>> {
    let mut arb = Arbitrary::new(generator::list_of_size(size, elem.generator.clone()))
        .with_shrinker(shrink::list(elem.shrinker.clone()));

    arb = match elem.size.clone() {
        Some(metric) => arb.with_size(move |l: &Vec<T>| {
            l.iter().fold(0usize, |total, x| total.saturating_add(metric(x)))
        }),
        None => arb.with_size(|l: &Vec<T>| l.len()),
    };
    if let Some(print) = elem.printer.clone() {
        arb = arb.with_printer(move |l: &Vec<T>| {
            let items: Vec<String> = l.iter().map(|x| print(x)).collect();
            format!("[{}]", items.join("; "))
        });
    }
    arb
}

/// Lists with a [`nat`](generator::nat) length
pub fn list<T: Clone + 'static>(elem: Arbitrary<T>) -> Arbitrary<Vec<T>> {
    list_of_size(generator::nat(), elem)
}

/// Short lists
pub fn small_list<T: Clone + 'static>(elem: Arbitrary<T>) -> Arbitrary<Vec<T>> {
    list_of_size(generator::small_nat(), elem)
}

/// Optional values; `None` is the smallest instance
pub fn option<T: Clone + 'static>(inner: Arbitrary<T>) -> Arbitrary<Option<T>> {
    let fallback = inner.shrinker.clone().unwrap_or_else(shrink::nil);
    let mut arb = Arbitrary::new(generator::option(inner.generator.clone()))
        .with_shrinker(shrink::option(fallback));

    arb = match inner.size.clone() {
        Some(metric) => arb.with_size(move |o: &Option<T>| {
            o.as_ref().map_or(0, |x| metric(x).saturating_add(1))
        }),
        None => arb.with_size(|o: &Option<T>| usize::from(o.is_some())),
    };
    if let Some(print) = inner.printer.clone() {
        arb = arb.with_printer(move |o: &Option<T>| match o {
            Some(x) => format!("Some({})", print(x)),
            None => "None".to_string(),
        });
    }
    arb
}

/// Independent pair
pub fn pair<A, B>(a: Arbitrary<A>, b: Arbitrary<B>) -> Arbitrary<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    let mut arb = Arbitrary::new(generator::pair(a.generator.clone(), b.generator.clone()));

    if let (Some(pa), Some(pb)) = (a.printer.clone(), b.printer.clone()) {
        arb = arb.with_printer(move |(x, y): &(A, B)| format!("({}, {})", pa(x), pb(y)));
    }
    if let (Some(sa), Some(sb)) = (a.size.clone(), b.size.clone()) {
        arb = arb.with_size(move |(x, y): &(A, B)| sa(x).saturating_add(sb(y)));
    }
    if a.shrinker.is_some() || b.shrinker.is_some() {
        arb = arb.with_shrinker(shrink::pair(
            a.shrinker.clone().unwrap_or_else(shrink::nil),
            b.shrinker.clone().unwrap_or_else(shrink::nil),
        ));
    }
    arb
}

/// Independent triple
pub fn triple<A, B, C>(a: Arbitrary<A>, b: Arbitrary<B>, c: Arbitrary<C>) -> Arbitrary<(A, B, C)>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    let mut arb = Arbitrary::new(generator::triple(
        a.generator.clone(),
        b.generator.clone(),
        c.generator.clone(),
    ));

    if let (Some(pa), Some(pb), Some(pc)) = (a.printer.clone(), b.printer.clone(), c.printer.clone()) {
        arb = arb.with_printer(move |(x, y, z): &(A, B, C)| {
            format!("({}, {}, {})", pa(x), pb(y), pc(z))
        });
    }
    if let (Some(sa), Some(sb), Some(sc)) = (a.size.clone(), b.size.clone(), c.size.clone()) {
        arb = arb.with_size(move |(x, y, z): &(A, B, C)| {
            sa(x).saturating_add(sb(y)).saturating_add(sc(z))
        });
    }
    if a.shrinker.is_some() || b.shrinker.is_some() || c.shrinker.is_some() {
        arb = arb.with_shrinker(shrink::triple(
            a.shrinker.clone().unwrap_or_else(shrink::nil),
            b.shrinker.clone().unwrap_or_else(shrink::nil),
            c.shrinker.clone().unwrap_or_else(shrink::nil),
        ));
    }
    arb
}

impl DefaultArbitrary for bool {
    fn arbitrary() -> Arbitrary<Self> {
        bool()
    }
}

impl DefaultArbitrary for char {
    fn arbitrary() -> Arbitrary<Self> {
        char()
    }
}

impl DefaultArbitrary for i64 {
    fn arbitrary() -> Arbitrary<Self> {
        int()
    }
}

impl DefaultArbitrary for i32 {
    fn arbitrary() -> Arbitrary<Self> {
        make_prim_int(
            Gen::new(|rng| rng.next_u32() as i32),
            |x: &i32| x.unsigned_abs() as usize,
        )
    }
}

impl DefaultArbitrary for u32 {
    fn arbitrary() -> Arbitrary<Self> {
        make_prim_int(Gen::new(|rng| rng.next_u32()), |x: &u32| *x as usize)
    }
}

impl DefaultArbitrary for usize {
    fn arbitrary() -> Arbitrary<Self> {
        make_prim_int(generator::nat(), |x: &usize| *x)
    }
}

impl DefaultArbitrary for f64 {
    fn arbitrary() -> Arbitrary<Self> {
        float()
    }
}

impl DefaultArbitrary for String {
    fn arbitrary() -> Arbitrary<Self> {
        string()
    }
}

impl<T: DefaultArbitrary + Clone> DefaultArbitrary for Vec<T> {
    fn arbitrary() -> Arbitrary<Self> {
        list(T::arbitrary())
    }
}

impl<T: DefaultArbitrary + Clone> DefaultArbitrary for Option<T> {
    fn arbitrary() -> Arbitrary<Self> {
        option(T::arbitrary())
    }
}

impl<A, B> DefaultArbitrary for (A, B)
where
    A: DefaultArbitrary + Clone,
    B: DefaultArbitrary + Clone,
{
    fn arbitrary() -> Arbitrary<Self> {
        pair(A::arbitrary(), B::arbitrary())
    }
}

impl<A, B, C> DefaultArbitrary for (A, B, C)
where
    A: DefaultArbitrary + Clone,
    B: DefaultArbitrary + Clone,
    C: DefaultArbitrary + Clone,
{
    fn arbitrary() -> Arbitrary<Self> {
        triple(A::arbitrary(), B::arbitrary(), C::arbitrary())
    }
}
