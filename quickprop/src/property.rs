//! Law outcomes: holds, falsified, or discarded.
//!
//! Discarding is a control signal, not a failure: it says the input lies
//! outside the law's domain. Keeping it as its own variant lets the engine
//! treat each case explicitly.

use std::fmt::Display;

use crate::error::FailureCause;

/// The three-way result of evaluating a law on one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The property holds for this input
    Holds,
    /// The property is false for this input
    Falsified,
    /// The input does not satisfy the law's precondition
    Discard,
}

impl From<bool> for Outcome {
    fn from(holds: bool) -> Self {
        if holds {
            Outcome::Holds
        } else {
            Outcome::Falsified
        }
    }
}

/// Marker returned by [`assume`] when a precondition does not hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discard;

/// Evaluation result as seen by the engine
pub type LawResult = Result<Outcome, FailureCause>;

/// Anything a law closure may return.
///
/// `bool` and [`Outcome`] are controlled results. `Result<_, E>` with a
/// displayable `E` turns `Err` into an uncontrolled failure, while
/// `Result<bool, Discard>` turns `Err` into a discard so that
/// `assume(..)?` works inside laws.
pub trait IntoLawResult {
    fn into_law_result(self) -> LawResult;
}

impl IntoLawResult for bool {
    fn into_law_result(self) -> LawResult {
        Ok(self.into())
    }
}

impl IntoLawResult for Outcome {
    fn into_law_result(self) -> LawResult {
        Ok(self)
    }
}

impl IntoLawResult for Result<bool, Discard> {
    fn into_law_result(self) -> LawResult {
        Ok(match self {
            Ok(holds) => holds.into(),
            Err(Discard) => Outcome::Discard,
        })
    }
}

impl<E: Display> IntoLawResult for Result<bool, E> {
    fn into_law_result(self) -> LawResult {
        self.map(Outcome::from)
            .map_err(|e| FailureCause::error(e.to_string()))
    }
}

impl<E: Display> IntoLawResult for Result<Outcome, E> {
    fn into_law_result(self) -> LawResult {
        self.map_err(|e| FailureCause::error(e.to_string()))
    }
}

/// Evaluate `body` only when `precondition` holds, discarding otherwise
pub fn implies<F>(precondition: bool, body: F) -> Outcome
where
    F: FnOnce() -> bool,
{
    if precondition {
        body().into()
    } else {
        Outcome::Discard
    }
}

/// Early-exit form of a precondition, for laws returning `Result<bool, Discard>`
pub fn assume(precondition: bool) -> Result<(), Discard> {
    if precondition { Ok(()) } else { Err(Discard) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_conversion() {
        assert_eq!(true.into_law_result(), Ok(Outcome::Holds));
        assert_eq!(false.into_law_result(), Ok(Outcome::Falsified));
    }

    #[test]
    fn test_implies() {
        assert_eq!(implies(false, || unreachable!()), Outcome::Discard);
        assert_eq!(implies(true, || true), Outcome::Holds);
        assert_eq!(implies(true, || false), Outcome::Falsified);
    }

    #[test]
    fn test_assume_in_law() {
        let law = |x: i64| -> Result<bool, Discard> {
            assume(x != 0)?;
            Ok(100 / x != 0 || x.abs() > 100)
        };
        assert_eq!(law(0).into_law_result(), Ok(Outcome::Discard));
        assert_eq!(law(5).into_law_result(), Ok(Outcome::Holds));
    }

    #[test]
    fn test_error_results_are_uncontrolled() {
        let result: Result<bool, String> = Err("io failure".to_string());
        assert_eq!(
            result.into_law_result(),
            Err(FailureCause::error("io failure"))
        );

        let ok: Result<Outcome, std::fmt::Error> = Ok(Outcome::Discard);
        assert_eq!(ok.into_law_result(), Ok(Outcome::Discard));
    }
}
