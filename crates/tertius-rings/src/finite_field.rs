//! Prime fields Z/pZ with a runtime modulus.

use rand::Rng;

use crate::traits::{Ring, RingError, RingResult, Truth};

/// The field Z/pZ for a prime `p` chosen at runtime.
///
/// Elements are stored as reduced `u64` residues in `[0, p)`. Products are
/// formed in `u128`, so any modulus below `2^63` is supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PrimeField {
    modulus: u64,
    prime: bool,
}

impl PrimeField {
    /// Creates the field of residues modulo `modulus`.
    ///
    /// # Panics
    ///
    /// Panics if `modulus < 2` or `modulus >= 2^63`. A composite modulus is
    /// accepted and gives the ring Z/nZ, whose `inv` fails on zero divisors.
    #[must_use]
    pub fn new(modulus: u64) -> Self {
        assert!(modulus >= 2, "modulus must be at least 2");
        assert!(modulus < 1 << 63, "modulus must be below 2^63");
        Self {
            modulus,
            prime: is_prime(modulus),
        }
    }

    /// Returns the modulus.
    #[must_use]
    pub const fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Reduces an arbitrary `u64` into the field.
    #[must_use]
    pub const fn reduce(&self, value: u64) -> u64 {
        value % self.modulus
    }

    /// Returns true if the modulus is prime.
    #[must_use]
    pub const fn has_prime_modulus(&self) -> bool {
        self.prime
    }
}

/// Trial division; moduli used here are word sized.
fn is_prime(p: u64) -> bool {
    if p < 4 {
        return p >= 2;
    }
    if p % 2 == 0 {
        return false;
    }
    let mut d = 3u64;
    while d.saturating_mul(d) <= p {
        if p % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

impl Ring for PrimeField {
    type Element = u64;

    fn zero(&self) -> u64 {
        0
    }

    fn one(&self) -> u64 {
        1
    }

    fn from_i64(&self, n: i64) -> u64 {
        let p = i128::from(self.modulus);
        // rem_euclid keeps the residue in [0, p)
        i128::from(n).rem_euclid(p) as u64
    }

    fn neg(&self, a: &u64) -> u64 {
        if *a == 0 {
            0
        } else {
            self.modulus - a
        }
    }

    fn add(&self, a: &u64, b: &u64) -> u64 {
        let sum = a + b;
        if sum >= self.modulus {
            sum - self.modulus
        } else {
            sum
        }
    }

    fn sub(&self, a: &u64, b: &u64) -> u64 {
        if a >= b {
            a - b
        } else {
            self.modulus - (b - a)
        }
    }

    fn mul(&self, a: &u64, b: &u64) -> u64 {
        ((u128::from(*a) * u128::from(*b)) % u128::from(self.modulus)) as u64
    }

    fn inv(&self, a: &u64) -> RingResult<u64> {
        if *a == 0 {
            return Err(RingError::DivisionByZero);
        }

        // Extended Euclidean algorithm
        let mut t = 0i128;
        let mut new_t = 1i128;
        let mut r = i128::from(self.modulus);
        let mut new_r = i128::from(*a);

        while new_r != 0 {
            let quotient = r / new_r;
            (t, new_t) = (new_t, t - quotient * new_t);
            (r, new_r) = (new_r, r - quotient * new_r);
        }

        if r > 1 {
            return Err(RingError::NotInvertible);
        }

        Ok(t.rem_euclid(i128::from(self.modulus)) as u64)
    }

    fn equal(&self, a: &u64, b: &u64) -> Truth {
        Truth::from(a == b)
    }

    fn is_zero(&self, a: &u64) -> Truth {
        Truth::from(*a == 0)
    }

    fn is_field(&self) -> bool {
        self.has_prime_modulus()
    }

    fn random<G: Rng + ?Sized>(&self, rng: &mut G) -> u64 {
        rng.gen_range(0..self.modulus)
    }

    fn random_nonzero<G: Rng + ?Sized>(&self, rng: &mut G) -> u64 {
        rng.gen_range(1..self.modulus)
    }

    fn pow(&self, a: &u64, mut exp: u64) -> u64 {
        let mut base = *a;
        let mut result = 1u64 % self.modulus;

        while exp > 0 {
            if exp & 1 == 1 {
                result = self.mul(&result, &base);
            }
            base = self.mul(&base, &base);
            exp >>= 1;
        }

        result
    }
}

/// GF(2), the field with two elements.
#[must_use]
pub fn gf2() -> PrimeField {
    PrimeField::new(2)
}
