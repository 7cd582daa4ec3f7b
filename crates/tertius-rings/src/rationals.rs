//! The field of rational numbers Q.

use dashu::integer::IBig;
use dashu::rational::RBig;
use rand::Rng;

use crate::traits::{Ring, RingError, RingResult, Truth};

/// The field of arbitrary precision rationals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rationals;

impl Rationals {
    /// Creates the ring context.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Builds the element `num / den`.
    ///
    /// # Errors
    ///
    /// Returns [`RingError::DivisionByZero`] if `den` is zero.
    pub fn fraction(&self, num: i64, den: i64) -> RingResult<RBig> {
        self.div(&self.from_i64(num), &self.from_i64(den))
    }
}

impl Ring for Rationals {
    type Element = RBig;

    fn zero(&self) -> RBig {
        RBig::ZERO
    }

    fn one(&self) -> RBig {
        RBig::ONE
    }

    fn from_i64(&self, n: i64) -> RBig {
        RBig::from(IBig::from(n))
    }

    fn neg(&self, a: &RBig) -> RBig {
        -a
    }

    fn add(&self, a: &RBig, b: &RBig) -> RBig {
        a + b
    }

    fn sub(&self, a: &RBig, b: &RBig) -> RBig {
        a - b
    }

    fn mul(&self, a: &RBig, b: &RBig) -> RBig {
        a * b
    }

    fn inv(&self, a: &RBig) -> RingResult<RBig> {
        if *a == RBig::ZERO {
            return Err(RingError::DivisionByZero);
        }
        Ok(&RBig::ONE / a)
    }

    fn div(&self, a: &RBig, b: &RBig) -> RingResult<RBig> {
        if *b == RBig::ZERO {
            return Err(RingError::DivisionByZero);
        }
        Ok(a / b)
    }

    fn equal(&self, a: &RBig, b: &RBig) -> Truth {
        Truth::from(a == b)
    }

    fn is_zero(&self, a: &RBig) -> Truth {
        Truth::from(*a == RBig::ZERO)
    }

    fn is_field(&self) -> bool {
        true
    }

    fn random<G: Rng + ?Sized>(&self, rng: &mut G) -> RBig {
        let num = IBig::from(rng.gen_range(-50i64..=50));
        let den = IBig::from(rng.gen_range(1i64..=10));
        RBig::from(num) / RBig::from(den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rational_arithmetic() {
        let qq = Rationals;
        let half = qq.fraction(1, 2).unwrap();
        let third = qq.fraction(1, 3).unwrap();

        assert_eq!(qq.add(&half, &third), qq.fraction(5, 6).unwrap());
        assert_eq!(qq.mul(&half, &third), qq.fraction(1, 6).unwrap());
        assert_eq!(qq.sub(&third, &half), qq.fraction(-1, 6).unwrap());
    }

    #[test]
    fn test_rational_inverse() {
        let qq = Rationals;
        let a = qq.fraction(-3, 4).unwrap();
        let inv = qq.inv(&a).unwrap();
        assert!(qq.is_one(&qq.mul(&a, &inv)).is_true());
        assert_eq!(qq.inv(&RBig::ZERO), Err(RingError::DivisionByZero));
    }

    #[test]
    fn test_normalized_equality() {
        let qq = Rationals;
        assert!(qq
            .equal(&qq.fraction(2, 4).unwrap(), &qq.fraction(-1, -2).unwrap())
            .is_true());
    }
}
