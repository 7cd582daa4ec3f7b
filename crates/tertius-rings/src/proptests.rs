//! Property-based tests for the reference rings.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{Integers, PrimeField, Rationals, Ring};

    // Strategy for generating small integers
    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    // Strategy for generating non-zero integers
    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    // A few primes of different sizes
    fn prime() -> impl Strategy<Value = u64> {
        prop_oneof![Just(2u64), Just(5), Just(101), Just(1_000_003), Just(998_244_353)]
    }

    proptest! {
        #[test]
        fn prime_field_distributive(p in prime(), a in small_int(), b in small_int(), c in small_int()) {
            let f = PrimeField::new(p);
            let (a, b, c) = (f.from_i64(a), f.from_i64(b), f.from_i64(c));
            prop_assert_eq!(f.mul(&a, &f.add(&b, &c)), f.add(&f.mul(&a, &b), &f.mul(&a, &c)));
        }

        #[test]
        fn prime_field_inverse(p in prime(), a in non_zero_int()) {
            let f = PrimeField::new(p);
            let a = f.from_i64(a);
            prop_assume!(a != 0);
            let inv = f.inv(&a).unwrap();
            prop_assert_eq!(f.mul(&a, &inv), 1);
        }

        #[test]
        fn prime_field_sub_is_add_neg(p in prime(), a in small_int(), b in small_int()) {
            let f = PrimeField::new(p);
            let (a, b) = (f.from_i64(a), f.from_i64(b));
            prop_assert_eq!(f.sub(&a, &b), f.add(&a, &f.neg(&b)));
        }

        #[test]
        fn prime_field_from_i64_is_homomorphic(p in prime(), a in small_int(), b in small_int()) {
            let f = PrimeField::new(p);
            prop_assert_eq!(f.from_i64(a * b), f.mul(&f.from_i64(a), &f.from_i64(b)));
            prop_assert_eq!(f.from_i64(a + b), f.add(&f.from_i64(a), &f.from_i64(b)));
        }

        #[test]
        fn integer_exact_division(a in small_int(), b in non_zero_int()) {
            let zz = Integers;
            let product = zz.mul(&zz.from_i64(a), &zz.from_i64(b));
            prop_assert_eq!(zz.div(&product, &zz.from_i64(b)).unwrap(), zz.from_i64(a));
        }

        #[test]
        fn rational_div_mul_roundtrip(a in small_int(), b in non_zero_int()) {
            let qq = Rationals;
            let a = qq.from_i64(a);
            let b = qq.from_i64(b);
            let q = qq.div(&a, &b).unwrap();
            prop_assert!(qq.equal(&qq.mul(&q, &b), &a).is_true());
        }

        #[test]
        fn rational_addmul(a in small_int(), b in small_int(), c in small_int()) {
            let qq = Rationals;
            let (a, b, c) = (qq.from_i64(a), qq.from_i64(b), qq.from_i64(c));
            let mut acc = a.clone();
            qq.addmul(&mut acc, &b, &c);
            qq.submul(&mut acc, &b, &c);
            prop_assert!(qq.equal(&acc, &a).is_true());
        }
    }
}
