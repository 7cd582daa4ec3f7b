//! Ring context traits.
//!
//! A ring context is a runtime descriptor of an algebraic structure: it owns
//! whatever parameters the structure needs (a modulus, a precision, ...) and
//! exposes the element operations. Containers built on top of a ring borrow
//! the context and never own it, so the context must outlive them.

use std::fmt::Debug;

use rand::Rng;
use thiserror::Error;

/// Result of a predicate that a ring may not be able to decide.
///
/// Some rings cannot decide equality exactly (for instance rings of
/// approximate values or lazily normalised expressions), so predicates
/// return one of three values instead of a plain `bool`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Truth {
    /// The predicate holds.
    True,
    /// The predicate does not hold.
    False,
    /// The ring cannot decide.
    Unknown,
}

impl Truth {
    /// Returns true only for [`Truth::True`].
    #[must_use]
    pub const fn is_true(self) -> bool {
        matches!(self, Self::True)
    }

    /// Returns true only for [`Truth::False`].
    #[must_use]
    pub const fn is_false(self) -> bool {
        matches!(self, Self::False)
    }

    /// Three-valued conjunction.
    #[must_use]
    pub const fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::False, _) | (_, Self::False) => Self::False,
            (Self::True, Self::True) => Self::True,
            _ => Self::Unknown,
        }
    }
}

impl std::ops::Not for Truth {
    type Output = Self;

    fn not(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Unknown => Self::Unknown,
        }
    }
}

impl From<bool> for Truth {
    fn from(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }
}

/// Failure of an individual ring operation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RingError {
    /// The element has no multiplicative inverse.
    #[error("element is not invertible")]
    NotInvertible,

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The quotient does not exist in the ring.
    #[error("division is not exact in this ring")]
    Inexact,

    /// The ring cannot decide the answer.
    #[error("ring cannot decide: {0}")]
    Undecidable(&'static str),
}

/// Result alias for ring operations.
pub type RingResult<T> = Result<T, RingError>;

/// A commutative ring with identity, described by a context object.
///
/// # Laws
///
/// - `add` is associative and commutative with identity `zero()`
/// - `mul` is associative with identity `one()`
/// - `mul` distributes over `add`
/// - every element has an additive inverse `neg`
///
/// Elements are plain values; all arithmetic goes through the context so
/// that rings with runtime parameters (such as `Z/pZ` for a runtime `p`)
/// need not store those parameters in every element.
pub trait Ring: Debug {
    /// The element type.
    type Element: Clone + Debug;

    /// Size in bytes of one element as stored inline.
    fn element_size(&self) -> usize {
        std::mem::size_of::<Self::Element>()
    }

    /// The additive identity.
    fn zero(&self) -> Self::Element;

    /// The multiplicative identity.
    fn one(&self) -> Self::Element;

    /// The image of an integer under the canonical map `Z -> R`.
    fn from_i64(&self, n: i64) -> Self::Element;

    /// Additive inverse.
    fn neg(&self, a: &Self::Element) -> Self::Element;

    /// Sum `a + b`.
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Difference `a - b`.
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.add(a, &self.neg(b))
    }

    /// Product `a * b`.
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Multiplicative inverse.
    ///
    /// # Errors
    ///
    /// Returns [`RingError::NotInvertible`] (or [`RingError::DivisionByZero`]
    /// for zero) when `a` is not a unit.
    fn inv(&self, a: &Self::Element) -> RingResult<Self::Element>;

    /// Quotient `a / b`, defined when some `q` with `q * b = a` exists.
    ///
    /// # Errors
    ///
    /// The default multiplies by the inverse of `b` and fails exactly when
    /// `inv` does.
    fn div(&self, a: &Self::Element, b: &Self::Element) -> RingResult<Self::Element> {
        Ok(self.mul(a, &self.inv(b)?))
    }

    /// Equality test.
    fn equal(&self, a: &Self::Element, b: &Self::Element) -> Truth;

    /// Zero test.
    fn is_zero(&self, a: &Self::Element) -> Truth {
        self.equal(a, &self.zero())
    }

    /// Identity test.
    fn is_one(&self, a: &Self::Element) -> Truth {
        self.equal(a, &self.one())
    }

    /// Whether every nonzero element is invertible.
    fn is_field(&self) -> bool;

    /// Whether the ring has no zero divisors.
    fn is_integral_domain(&self) -> bool {
        self.is_field()
    }

    /// A random element, suitable for tests and randomized algorithms.
    fn random<G: Rng + ?Sized>(&self, rng: &mut G) -> Self::Element;

    /// A random element that is known to be nonzero.
    fn random_nonzero<G: Rng + ?Sized>(&self, rng: &mut G) -> Self::Element {
        loop {
            let candidate = self.random(rng);
            if self.is_zero(&candidate).is_false() {
                return candidate;
            }
        }
    }

    /// Computes `acc + a * b` in place.
    fn addmul(&self, acc: &mut Self::Element, a: &Self::Element, b: &Self::Element) {
        *acc = self.add(acc, &self.mul(a, b));
    }

    /// Computes `acc - a * b` in place.
    fn submul(&self, acc: &mut Self::Element, a: &Self::Element, b: &Self::Element) {
        *acc = self.sub(acc, &self.mul(a, b));
    }

    /// Computes `a^n` by binary exponentiation.
    fn pow(&self, a: &Self::Element, mut n: u64) -> Self::Element {
        let mut result = self.one();
        let mut base = a.clone();

        while n > 0 {
            if n & 1 == 1 {
                result = self.mul(&result, &base);
            }
            base = self.mul(&base, &base);
            n >>= 1;
        }

        result
    }
}
