//! The ring of integers Z.

use dashu::integer::IBig;
use rand::Rng;

use crate::traits::{Ring, RingError, RingResult, Truth};

/// The ring of arbitrary precision integers.
///
/// An integral domain that is not a field: `inv` succeeds only on the units
/// `1` and `-1`, and `div` succeeds only when the quotient is exact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Integers;

impl Integers {
    /// Creates the ring context.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Ring for Integers {
    type Element = IBig;

    fn zero(&self) -> IBig {
        IBig::ZERO
    }

    fn one(&self) -> IBig {
        IBig::ONE
    }

    fn from_i64(&self, n: i64) -> IBig {
        IBig::from(n)
    }

    fn neg(&self, a: &IBig) -> IBig {
        -a
    }

    fn add(&self, a: &IBig, b: &IBig) -> IBig {
        a + b
    }

    fn sub(&self, a: &IBig, b: &IBig) -> IBig {
        a - b
    }

    fn mul(&self, a: &IBig, b: &IBig) -> IBig {
        a * b
    }

    fn inv(&self, a: &IBig) -> RingResult<IBig> {
        if *a == IBig::ZERO {
            Err(RingError::DivisionByZero)
        } else if *a == IBig::ONE || *a == IBig::NEG_ONE {
            Ok(a.clone())
        } else {
            Err(RingError::NotInvertible)
        }
    }

    fn div(&self, a: &IBig, b: &IBig) -> RingResult<IBig> {
        if *b == IBig::ZERO {
            return Err(RingError::DivisionByZero);
        }
        if a % b != IBig::ZERO {
            return Err(RingError::Inexact);
        }
        Ok(a / b)
    }

    fn equal(&self, a: &IBig, b: &IBig) -> Truth {
        Truth::from(a == b)
    }

    fn is_zero(&self, a: &IBig) -> Truth {
        Truth::from(*a == IBig::ZERO)
    }

    fn is_field(&self) -> bool {
        false
    }

    fn is_integral_domain(&self) -> bool {
        true
    }

    fn random<G: Rng + ?Sized>(&self, rng: &mut G) -> IBig {
        IBig::from(rng.gen_range(-100i64..=100))
    }

    fn random_nonzero<G: Rng + ?Sized>(&self, rng: &mut G) -> IBig {
        let magnitude = rng.gen_range(1i64..=100);
        if rng.gen_bool(0.5) {
            IBig::from(magnitude)
        } else {
            IBig::from(-magnitude)
        }
    }
}
