//! Randomized Krylov-subspace solvers.
//!
//! Every solver here only touches the matrix through products with vectors
//! or thin dense blocks, so the matrix is never filled in. The price is
//! randomness: a run can break down or return something that fails
//! verification. Such failures are reported as `Unable` errors and a fresh
//! run with new random choices usually succeeds.
//!
//! - [`Lanczos`] and [`BlockLanczos`] work on the symmetrized system
//!   `D·MᵀM·D`, so they accept rectangular matrices.
//! - [`Wiedemann`] and [`BlockWiedemann`] need a square matrix; solving
//!   goes through a kernel vector of the bordered matrix `[[M, b], [0, 0]]`.
//!
//! Kernel vectors of `M` itself always come from
//! [`KrylovSolver::nullvector`], which compares two solutions of the same
//! system.

mod block_lanczos;
mod block_wiedemann;
mod lanczos;
mod wiedemann;

pub use block_lanczos::{BlockLanczos, BlockLanczosConfig};
pub use block_wiedemann::{BlockWiedemann, BlockWiedemannConfig};
pub use lanczos::{Lanczos, LanczosConfig};
pub use wiedemann::{Wiedemann, WiedemannConfig};

use rand::Rng;
use tertius_rings::Ring;

use crate::csr::CsrMatrix;
use crate::dense_matrix::DenseMatrix;
use crate::dense_vec;
use crate::error::{LinalgError, Result};

/// A randomized solver for sparse linear systems.
pub trait KrylovSolver<R: Ring> {
    /// Finds `x` with `M x = b`. A returned solution has been checked by
    /// substitution.
    ///
    /// # Errors
    ///
    /// Returns a domain error for bad shapes and an `Unable` error if this
    /// run broke down or its answer failed the check.
    fn solve<G: Rng + ?Sized>(
        &self,
        m: &CsrMatrix<'_, R>,
        b: &[R::Element],
        rng: &mut G,
    ) -> Result<Vec<R::Element>>;

    /// Finds a nonzero `v` with `M v = 0`.
    ///
    /// The default draws a random `x`, solves `M x' = M x` and returns
    /// `x - x'`.
    ///
    /// # Errors
    ///
    /// Returns a `TestFail` error if the difference vanishes, which is what
    /// a trivial kernel looks like, and an `Unable` error if solving failed
    /// or the difference is not a kernel vector.
    fn nullvector<G: Rng + ?Sized>(
        &self,
        m: &CsrMatrix<'_, R>,
        rng: &mut G,
    ) -> Result<Vec<R::Element>> {
        let ring = m.ring();
        let x = dense_vec::random(ring, m.num_cols(), rng);
        let b = m.mul_vec(&x)?;
        let x_prime = self.solve(m, &b, rng)?;
        let v = dense_vec::sub(ring, &x, &x_prime)?;
        if dense_vec::is_zero(ring, &v) {
            return Err(LinalgError::VerificationFailed(
                "solver returned the sampled vector",
            ));
        }
        check_kernel(m, &v)?;
        Ok(v)
    }
}

/// Checks `M x = b`.
pub(crate) fn check_solution<R: Ring>(
    m: &CsrMatrix<'_, R>,
    x: &[R::Element],
    b: &[R::Element],
) -> Result<()> {
    if dense_vec::equal(m.ring(), &m.mul_vec(x)?, b)? {
        Ok(())
    } else {
        Err(LinalgError::Breakdown("solution failed verification"))
    }
}

/// Checks `M v = 0`.
pub(crate) fn check_kernel<R: Ring>(m: &CsrMatrix<'_, R>, v: &[R::Element]) -> Result<()> {
    if dense_vec::is_zero(m.ring(), &m.mul_vec(v)?) {
        Ok(())
    } else {
        Err(LinalgError::Breakdown("vector is not in the kernel"))
    }
}

pub(crate) fn require_square<R: Ring>(m: &CsrMatrix<'_, R>) -> Result<()> {
    if m.num_rows() == m.num_cols() {
        Ok(())
    } else {
        Err(LinalgError::NotSquare {
            rows: m.num_rows(),
            cols: m.num_cols(),
        })
    }
}

/// A square linear map known only through its action on vectors.
pub(crate) trait Operator<R: Ring> {
    fn ring(&self) -> &R;

    /// Dimension of the space the map acts on.
    fn dim(&self) -> usize;

    fn apply(&self, w: &[R::Element]) -> Result<Vec<R::Element>>;
}

impl<R: Ring> Operator<R> for CsrMatrix<'_, R> {
    fn ring(&self) -> &R {
        CsrMatrix::ring(self)
    }

    fn dim(&self) -> usize {
        self.num_cols()
    }

    fn apply(&self, w: &[R::Element]) -> Result<Vec<R::Element>> {
        self.mul_vec(w)
    }
}

/// The symmetrized operator `A = D·MᵀE·M·D` with random nonsingular
/// diagonals `D` and `E`.
///
/// `E` is the identity unless the operator is built with
/// [`NormalOperator::weighted`]. With both diagonals random, the kernel of
/// `A` is `D⁻¹ ker M` and meets the image of `A` only in zero, with high
/// probability over a large field.
pub(crate) struct NormalOperator<'m, 'a, R: Ring> {
    m: &'m CsrMatrix<'a, R>,
    mt: CsrMatrix<'a, R>,
    diag: Vec<R::Element>,
    weights: Option<Vec<R::Element>>,
}

impl<'m, 'a, R: Ring> NormalOperator<'m, 'a, R> {
    pub(crate) fn new<G: Rng + ?Sized>(m: &'m CsrMatrix<'a, R>, rng: &mut G) -> Self {
        let ring = m.ring();
        Self {
            m,
            mt: m.transpose(),
            diag: (0..m.num_cols()).map(|_| ring.random_nonzero(rng)).collect(),
            weights: None,
        }
    }

    /// Like [`NormalOperator::new`], with a random inner diagonal `E` too.
    pub(crate) fn weighted<G: Rng + ?Sized>(m: &'m CsrMatrix<'a, R>, rng: &mut G) -> Self {
        let ring = m.ring();
        let mut op = Self::new(m, rng);
        op.weights = Some((0..m.num_rows()).map(|_| ring.random_nonzero(rng)).collect());
        op
    }

    fn weigh(&self, v: Vec<R::Element>) -> Result<Vec<R::Element>> {
        match &self.weights {
            Some(e) => dense_vec::hadamard(self.m.ring(), e, &v),
            None => Ok(v),
        }
    }

    /// `A w`.
    pub(crate) fn apply(&self, w: &[R::Element]) -> Result<Vec<R::Element>> {
        let ring = self.m.ring();
        let dw = dense_vec::hadamard(ring, &self.diag, w)?;
        let mdw = self.weigh(self.m.mul_vec(&dw)?)?;
        let t = self.m.mul_vec_transpose(&mdw)?;
        dense_vec::hadamard(ring, &self.diag, &t)
    }

    /// `A V` for a block of column vectors.
    pub(crate) fn apply_block(&self, v: &DenseMatrix<'a, R>) -> Result<DenseMatrix<'a, R>> {
        let dv = scale_rows(v, &self.diag);
        let mut mdv = self.m.mul_dense(&dv)?;
        if let Some(e) = &self.weights {
            mdv = scale_rows(&mdv, e);
        }
        Ok(scale_rows(&self.mt.mul_dense(&mdv)?, &self.diag))
    }

    /// The transformed right-hand side `D·MᵀE b`.
    pub(crate) fn rhs(&self, b: &[R::Element]) -> Result<Vec<R::Element>> {
        let mtb = self.m.mul_vec_transpose(&self.weigh(b.to_vec())?)?;
        dense_vec::hadamard(self.m.ring(), &self.diag, &mtb)
    }

    /// Maps a solution `y` of `A y = D·MᵀE b` back to `x = D y`. Also maps
    /// kernel vectors of `A` into the kernel of `MᵀE·M`.
    pub(crate) fn unscale(&self, y: &[R::Element]) -> Result<Vec<R::Element>> {
        dense_vec::hadamard(self.m.ring(), &self.diag, y)
    }
}

impl<R: Ring> Operator<R> for NormalOperator<'_, '_, R> {
    fn ring(&self) -> &R {
        self.m.ring()
    }

    fn dim(&self) -> usize {
        self.m.num_cols()
    }

    fn apply(&self, w: &[R::Element]) -> Result<Vec<R::Element>> {
        NormalOperator::apply(self, w)
    }
}

fn scale_rows<'a, R: Ring>(v: &DenseMatrix<'a, R>, diag: &[R::Element]) -> DenseMatrix<'a, R> {
    let mut out = v.clone();
    for (i, d) in diag.iter().enumerate() {
        out.scale_row(i, d);
    }
    out
}

/// Evaluates `sum_i A^i c_i` by Horner's rule.
pub(crate) fn horner<R: Ring, A: Operator<R> + ?Sized>(
    a: &A,
    terms: &[Vec<R::Element>],
) -> Result<Vec<R::Element>> {
    let ring = a.ring();
    let mut terms = terms.iter().rev();
    let Some(top) = terms.next() else {
        return Ok(dense_vec::zeros(ring, a.dim()));
    };
    let mut w = top.clone();
    for c in terms {
        w = dense_vec::add(ring, &a.apply(&w)?, c)?;
    }
    Ok(w)
}

/// Given `w != 0` with `A^k w = 0` for some `k <= steps`, returns the last
/// nonzero vector of `w, A w, A² w, ...`.
pub(crate) fn settle_kernel<R: Ring, A: Operator<R> + ?Sized>(
    a: &A,
    mut w: Vec<R::Element>,
    steps: usize,
) -> Result<Vec<R::Element>> {
    let ring = a.ring();
    for _ in 0..=steps {
        let aw = a.apply(&w)?;
        if dense_vec::is_zero(ring, &aw) {
            return Ok(w);
        }
        w = aw;
    }
    Err(LinalgError::Breakdown("Krylov iterates did not reach the kernel"))
}

/// The bordered matrix `[[M, b], [0, 0]]` of size `(n + 1) × (n + 1)`.
pub(crate) fn bordered<'a, R: Ring>(m: &CsrMatrix<'a, R>, b: &[R::Element]) -> CsrMatrix<'a, R> {
    let ring = m.ring();
    let n = m.num_cols();
    let mut row_ptrs = Vec::with_capacity(m.num_rows() + 2);
    let mut col_indices = Vec::with_capacity(m.nnz() + b.len());
    let mut values = Vec::with_capacity(m.nnz() + b.len());
    row_ptrs.push(0);
    for (r, br) in b.iter().enumerate() {
        let (cols, vals) = m.row(r);
        col_indices.extend_from_slice(cols);
        values.extend_from_slice(vals);
        if !ring.is_zero(br).is_true() {
            col_indices.push(n);
            values.push(br.clone());
        }
        row_ptrs.push(values.len());
    }
    row_ptrs.push(values.len());
    CsrMatrix::from_raw_parts(ring, n + 1, row_ptrs, col_indices, values)
}

/// Turns a kernel vector `[x'; t]` of the bordered matrix into `x = -x'/t`.
pub(crate) fn unborder<R: Ring>(ring: &R, kernel: &[R::Element]) -> Result<Vec<R::Element>> {
    let Some((t, head)) = kernel.split_last() else {
        return Err(LinalgError::Breakdown("empty kernel vector"));
    };
    if ring.is_zero(t).is_true() {
        return Err(LinalgError::Breakdown("kernel vector misses the right-hand side"));
    }
    let scale = ring.neg(&ring.inv(t)?);
    Ok(dense_vec::scale(ring, &scale, head))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tertius_rings::PrimeField;

    #[test]
    fn test_normal_operator_matches_dense() {
        let f = PrimeField::new(101);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let m = CsrMatrix::from_triplets(&f, 3, 2, &[(0, 0, 1), (1, 1, 2), (2, 0, 3), (2, 1, 4)]).unwrap();
        let dense = m.to_dense();

        for op in [NormalOperator::new(&m, &mut rng), NormalOperator::weighted(&m, &mut rng)] {
            let mut d = DenseMatrix::zeros(&f, 2, 2);
            for (i, v) in op.diag.iter().enumerate() {
                d[(i, i)] = *v;
            }
            let mut e = DenseMatrix::identity(&f, 3);
            if let Some(weights) = &op.weights {
                for (i, v) in weights.iter().enumerate() {
                    e[(i, i)] = *v;
                }
            }
            let mte = d.mm(&dense.transpose()).unwrap().mm(&e).unwrap();
            let a = mte.mm(&dense).unwrap().mm(&d).unwrap();

            let w = vec![5, 9];
            assert_eq!(op.apply(&w).unwrap(), a.mv(&w).unwrap());
            assert_eq!(Operator::apply(&op, &w).unwrap(), a.mv(&w).unwrap());
            assert_eq!(op.rhs(&[1, 2, 3]).unwrap(), mte.mv(&[1, 2, 3]).unwrap());

            let block = DenseMatrix::from_rows(&f, vec![vec![1, 2], vec![3, 4]]).unwrap();
            assert!(op.apply_block(&block).unwrap().equal(&a.mm(&block).unwrap()).is_true());
        }
    }

    #[test]
    fn test_weighted_operator_kernel_is_scaled() {
        let f = PrimeField::new(1_000_003);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        // nilpotent shift: over the plain matrix e0 is both kernel and image
        let m = CsrMatrix::from_triplets(&f, 3, 3, &[(0, 1, 1), (1, 2, 1)]).unwrap();
        let op = NormalOperator::weighted(&m, &mut rng);
        let inv = f.inv(&op.diag[0]).unwrap();
        let mut z = vec![0, 0, 0];
        z[0] = inv;
        assert_eq!(op.apply(&z).unwrap(), vec![0, 0, 0]);
        assert_eq!(op.unscale(&z).unwrap(), vec![1, 0, 0]);
        // e0 is not in the image of the symmetrized map
        let image = op.apply(&[1, 1, 1]).unwrap();
        assert_eq!(image[0], 0);
    }

    #[test]
    fn test_bordered_roundtrip() {
        let f = PrimeField::new(7);
        let m = CsrMatrix::from_triplets(&f, 2, 2, &[(0, 0, 1), (1, 1, 2)]).unwrap();
        let b = vec![3, 0];
        let aug = bordered(&m, &b);
        assert_eq!(aug.num_rows(), 3);
        assert_eq!(aug.num_cols(), 3);
        assert_eq!(aug.get_entry(0, 2).unwrap(), 3);
        assert_eq!(aug.row(2).0.len(), 0);

        // x = [3, 0] solves M x = b, so [3, 0, -1] is a kernel vector
        let x = unborder(&f, &[3, 0, 6]).unwrap();
        assert_eq!(x, vec![3, 0]);
        assert!(unborder(&f, &[1, 1, 0]).is_err());
    }

    #[test]
    fn test_horner_and_settle() {
        let f = PrimeField::new(11);
        // nilpotent shift: e0 -> 0, e1 -> e0, e2 -> e1
        let a = CsrMatrix::from_triplets(&f, 3, 3, &[(0, 1, 1), (1, 2, 1)]).unwrap();
        let w = horner(&a, &[vec![1, 0, 0], vec![0, 0, 1]]).unwrap();
        assert_eq!(w, vec![1, 1, 0]);
        let k = settle_kernel(&a, vec![0, 0, 1], 3).unwrap();
        assert_eq!(k, vec![1, 0, 0]);
    }
}
