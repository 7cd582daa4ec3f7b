//! Property-based tests for the sparse formats and decompositions.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tertius_rings::{PrimeField, Ring};

    use crate::{CooMatrix, CsrMatrix, DenseMatrix, LilMatrix, SparseVector};

    const P: u64 = 101;

    fn entries(m: usize, n: usize) -> BoxedStrategy<Vec<(usize, usize, u64)>> {
        if m == 0 || n == 0 {
            Just(Vec::new()).boxed()
        } else {
            prop::collection::vec((0..m, 0..n, 0..P), 0..24).boxed()
        }
    }

    // Shape plus a triplet log that may repeat positions
    fn triplets() -> impl Strategy<Value = (usize, usize, Vec<(usize, usize, u64)>)> {
        (0usize..8, 0usize..8).prop_flat_map(|(m, n)| (Just(m), Just(n), entries(m, n)))
    }

    // Two triplet logs of one shape and a nonzero scalar
    type Pair = (usize, usize, Vec<(usize, usize, u64)>, Vec<(usize, usize, u64)>, u64);

    fn pair() -> impl Strategy<Value = Pair> {
        (0usize..8, 0usize..8).prop_flat_map(|(m, n)| {
            (Just(m), Just(n), entries(m, n), entries(m, n), 1..P)
        })
    }

    fn dense_vector(n: usize) -> impl Strategy<Value = Vec<u64>> {
        prop::collection::vec(0..P, n)
    }

    fn permutation_matrix<'a>(f: &'a PrimeField, perm: &[usize]) -> DenseMatrix<'a, PrimeField> {
        let mut p = DenseMatrix::zeros(f, perm.len(), perm.len());
        for (i, &j) in perm.iter().enumerate() {
            p[(j, i)] = 1;
        }
        p
    }

    fn coo_log<'a>(f: &'a PrimeField, m: usize, n: usize, log: &[(usize, usize, u64)]) -> CooMatrix<'a, PrimeField> {
        let mut coo = CooMatrix::new(f, m, n);
        for &(r, c, v) in log {
            coo.push_entry(r, c, v).unwrap();
        }
        coo
    }

    fn entrywise<'a>(
        a: &DenseMatrix<'a, PrimeField>,
        b: &DenseMatrix<'a, PrimeField>,
        op: impl Fn(&u64, &u64) -> u64,
    ) -> DenseMatrix<'a, PrimeField> {
        let mut out = a.clone();
        for r in 0..a.num_rows() {
            for c in 0..a.num_cols() {
                out[(r, c)] = op(&a[(r, c)], &b[(r, c)]);
            }
        }
        out
    }

    proptest! {
        #[test]
        fn coo_csr_lil_coo_roundtrip((m, n, entries) in triplets()) {
            let f = PrimeField::new(P);
            let mut coo = CooMatrix::new(&f, m, n);
            for (r, c, v) in entries {
                coo.push_entry(r, c, v).unwrap();
            }
            let back = coo.to_csr().to_lil().to_coo();
            prop_assert!(back.is_canonical());
            prop_assert!(back.equal(&coo).unwrap().is_true());
        }

        #[test]
        fn sparse_products_match_dense(((m, n, entries), x) in triplets().prop_flat_map(|t| {
            let n = t.1;
            (Just(t), dense_vector(n))
        })) {
            let f = PrimeField::new(P);
            let csr = CsrMatrix::from_triplets(&f, m, n, &entries).unwrap();
            let dense = csr.to_dense();
            let expected = dense.mv(&x).unwrap();
            prop_assert_eq!(csr.mul_vec(&x).unwrap(), expected.clone());
            prop_assert_eq!(csr.to_lil().mul_vec(&x).unwrap(), expected.clone());
            prop_assert_eq!(csr.to_coo().mul_vec(&x).unwrap(), expected);

            let y: Vec<u64> = (0..m as u64).collect();
            prop_assert_eq!(
                csr.mul_vec_transpose(&y).unwrap(),
                dense.transpose().mv(&y).unwrap()
            );
        }

        #[test]
        fn lu_reproduces_matrix((m, n, entries) in triplets()) {
            let f = PrimeField::new(P);
            let a = CsrMatrix::from_triplets(&f, m, n, &entries).unwrap().to_lil();
            let lu = a.lu().unwrap();
            prop_assert_eq!(lu.rank, a.to_dense().rank());

            let p = permutation_matrix(&f, &lu.row_perm);
            let q = permutation_matrix(&f, &lu.col_perm).transpose();
            let paq = p.mm(&a.to_dense()).unwrap().mm(&q).unwrap();
            let prod = lu.l.to_dense().mm(&lu.u.to_dense()).unwrap();
            prop_assert!(paq.equal(&prod).is_true());
        }

        #[test]
        fn rref_is_idempotent((m, n, entries) in triplets()) {
            let f = PrimeField::new(P);
            let a = CsrMatrix::from_triplets(&f, m, n, &entries).unwrap().to_lil();
            let once = a.rref().unwrap();
            let twice = once.matrix.rref().unwrap();
            prop_assert!(twice.matrix.equal(&once.matrix).unwrap().is_true());
            prop_assert_eq!(once.rank, a.to_dense().rank());

            let kernel = a.nullspace_rref().unwrap();
            prop_assert_eq!(kernel.num_cols(), n - once.rank);
            prop_assert!(a.to_dense().mm(&kernel).unwrap().is_zero());
        }

        #[test]
        fn transpose_is_involution((m, n, entries) in triplets()) {
            let f = PrimeField::new(P);
            let csr = CsrMatrix::from_triplets(&f, m, n, &entries).unwrap();
            prop_assert!(csr.transpose().transpose().equal(&csr).unwrap().is_true());
            let lil = LilMatrix::from_dense(&csr.to_dense());
            prop_assert!(lil.transpose().to_csr().equal(&csr.transpose()).unwrap().is_true());
        }

        #[test]
        fn sparse_vector_add_sub((a, b) in (0usize..16).prop_flat_map(|n| (dense_vector(n), dense_vector(n)))) {
            let f = PrimeField::new(P);
            let u = SparseVector::from_dense(&f, &a);
            let v = SparseVector::from_dense(&f, &b);
            let sum = u.add(&v).unwrap();
            prop_assert!(sum.sub(&v).unwrap().equal(&u).unwrap().is_true());
            prop_assert_eq!(u.dot(&v).unwrap(), crate::dense_vec::dot(&f, &a, &b).unwrap());
        }

        #[test]
        fn elementwise_ops_match_dense((m, n, left, right, c) in pair()) {
            let f = PrimeField::new(P);
            let da = CsrMatrix::from_triplets(&f, m, n, &left).unwrap().to_dense();
            let db = CsrMatrix::from_triplets(&f, m, n, &right).unwrap().to_dense();
            let c_inv = f.inv(&c).unwrap();
            let zero = DenseMatrix::zeros(&f, m, n);

            let sum = entrywise(&da, &db, |x, y| f.add(x, y));
            let diff = entrywise(&da, &db, |x, y| f.sub(x, y));
            let hadamard = entrywise(&da, &db, |x, y| f.mul(x, y));
            let neg = entrywise(&da, &zero, |x, _| f.neg(x));
            let scaled = entrywise(&da, &zero, |x, _| f.mul(x, &c));
            let divided = entrywise(&da, &zero, |x, _| f.mul(x, &c_inv));
            let addmul = entrywise(&da, &db, |x, y| f.add(x, &f.mul(y, &c)));
            let submul = entrywise(&da, &db, |x, y| f.sub(x, &f.mul(y, &c)));

            let (a, b) = (
                CsrMatrix::from_triplets(&f, m, n, &left).unwrap(),
                CsrMatrix::from_triplets(&f, m, n, &right).unwrap(),
            );
            prop_assert!(a.add(&b).unwrap().to_dense().equal(&sum).is_true());
            prop_assert!(a.sub(&b).unwrap().to_dense().equal(&diff).is_true());
            prop_assert!(a.mul(&b).unwrap().to_dense().equal(&hadamard).is_true());
            prop_assert!(a.neg().to_dense().equal(&neg).is_true());
            prop_assert!(a.mul_scalar(&c).to_dense().equal(&scaled).is_true());
            prop_assert!(a.div_scalar(&c).unwrap().to_dense().equal(&divided).is_true());
            prop_assert!(a.addmul_scalar(&b, &c).unwrap().to_dense().equal(&addmul).is_true());
            prop_assert!(a.submul_scalar(&b, &c).unwrap().to_dense().equal(&submul).is_true());

            let (a, b) = (a.to_lil(), b.to_lil());
            prop_assert!(a.add(&b).unwrap().to_dense().equal(&sum).is_true());
            prop_assert!(a.sub(&b).unwrap().to_dense().equal(&diff).is_true());
            prop_assert!(a.mul(&b).unwrap().to_dense().equal(&hadamard).is_true());
            prop_assert!(a.neg().to_dense().equal(&neg).is_true());
            prop_assert!(a.mul_scalar(&c).to_dense().equal(&scaled).is_true());
            prop_assert!(a.div_scalar(&c).unwrap().to_dense().equal(&divided).is_true());
            prop_assert!(a.addmul_scalar(&b, &c).unwrap().to_dense().equal(&addmul).is_true());
            prop_assert!(a.submul_scalar(&b, &c).unwrap().to_dense().equal(&submul).is_true());

            // raw logs, repeated positions included
            let (a, b) = (coo_log(&f, m, n, &left), coo_log(&f, m, n, &right));
            prop_assert!(a.add(&b).unwrap().to_dense().equal(&sum).is_true());
            prop_assert!(a.sub(&b).unwrap().to_dense().equal(&diff).is_true());
            prop_assert!(a.mul(&b).unwrap().to_dense().equal(&hadamard).is_true());
            prop_assert!(a.neg().to_dense().equal(&neg).is_true());
            prop_assert!(a.mul_scalar(&c).to_dense().equal(&scaled).is_true());
            prop_assert!(a.div_scalar(&c).unwrap().to_dense().equal(&divided).is_true());
            prop_assert!(a.addmul_scalar(&b, &c).unwrap().to_dense().equal(&addmul).is_true());
            prop_assert!(a.submul_scalar(&b, &c).unwrap().to_dense().equal(&submul).is_true());
        }

        #[test]
        fn dense_products_match_dense((m, n, entries) in triplets(), k in 0usize..4, seed in any::<u64>()) {
            let f = PrimeField::new(P);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let b = DenseMatrix::random(&f, n, k, &mut rng);
            let csr = CsrMatrix::from_triplets(&f, m, n, &entries).unwrap();
            let expected = csr.to_dense().mm(&b).unwrap();
            prop_assert!(csr.mul_dense(&b).unwrap().equal(&expected).is_true());
            prop_assert!(csr.to_lil().mul_dense(&b).unwrap().equal(&expected).is_true());
            let coo = coo_log(&f, m, n, &entries);
            prop_assert!(coo.mul_dense(&b).unwrap().equal(&expected).is_true());
        }
    }
}
