//! Block Wiedemann (Coppersmith) over an exact field.
//!
//! The scalar projections of [`Wiedemann`](super::Wiedemann) are replaced
//! by B×B blocks `Tₖ = (Xᵀ Aᵏ Y₁)ᵀ` with `Y₁ = A Y₀`. A row vector
//! polynomial `p(z)` with `p(z) T(z) ≡ q(z) mod z^σ` and `deg q < δ`
//! gives, reversed, coefficient vectors `f_l` with `Σ A^l Y₁ f_l`
//! orthogonal to many Krylov projections of `X`. Some power of `A` then
//! very likely kills `w = Σ A^l Y₀ f_l`, and the last nonzero iterate of
//! `w` is a kernel vector.
//!
//! The 2B rows `[p | q]` form a minimal approximant basis. At each order
//! the residual coefficients are cleared by elimination on
//! `[residual | I]`, choosing pivots among rows of smallest nominal
//! degree; pivot rows are multiplied by `z`.
//!
//! # References
//!
//! - Coppersmith, "Solving homogeneous linear equations over GF(2) via
//!   block Wiedemann algorithm" (1994)
//! - Kaltofen, "Analysis of Coppersmith's block Wiedemann algorithm for the
//!   parallel solution of sparse linear systems" (1995)

use rand::Rng;
use tertius_rings::Ring;
use tracing::{debug, instrument, trace};

use super::{bordered, check_solution, horner, require_square, settle_kernel, unborder, KrylovSolver};
use crate::csr::CsrMatrix;
use crate::dense_matrix::DenseMatrix;
use crate::dense_vec;
use crate::error::{check_shape, ErrorKind, LinalgError, Result};

/// Configuration for [`BlockWiedemann`].
#[derive(Clone, Debug)]
pub struct BlockWiedemannConfig {
    /// Block size (number of vectors processed together).
    pub block_size: usize,
    /// Upper bound on the length of the block sequence.
    pub max_iterations: usize,
}

impl Default for BlockWiedemannConfig {
    fn default() -> Self {
        Self {
            block_size: 4,
            max_iterations: 10_000,
        }
    }
}

/// Block Wiedemann solver. Square matrices only.
#[derive(Clone, Debug, Default)]
pub struct BlockWiedemann {
    /// Configuration.
    pub config: BlockWiedemannConfig,
}

/// Minimal approximant basis: `2B` rows `[p(z) | q(z)]`.
struct Approximant<'a, R: Ring> {
    /// `p[d]` holds the z^d coefficients of every row, `2B × B`.
    p: Vec<DenseMatrix<'a, R>>,
    /// Same layout for the `q` half.
    q: Vec<DenseMatrix<'a, R>>,
    /// Nominal degree of each row.
    degree: Vec<usize>,
}

impl<'a, R: Ring> Approximant<'a, R> {
    /// `p` rows start at degree 0, `q` rows at degree 1.
    fn new(ring: &'a R, nb: usize) -> Self {
        let mut p = DenseMatrix::zeros(ring, 2 * nb, nb);
        let mut q = DenseMatrix::zeros(ring, 2 * nb, nb);
        for i in 0..nb {
            p[(i, i)] = ring.one();
            q[(nb + i, i)] = ring.one();
        }
        let degree = (0..2 * nb).map(|r| usize::from(r >= nb)).collect();
        Self {
            p: vec![p],
            q: vec![q],
            degree,
        }
    }

    fn num_rows(&self) -> usize {
        self.degree.len()
    }

    /// Rows sorted by nominal degree, ties by index.
    fn rows_by_degree(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.num_rows()).collect();
        order.sort_by_key(|&r| (self.degree[r], r));
        order
    }

    /// Coefficient of `z^σ` in `p(z) T(z) - q(z)`.
    fn residual(&self, seq: &[DenseMatrix<'a, R>], sigma: usize) -> Result<DenseMatrix<'a, R>> {
        let mut res = match self.q.get(sigma) {
            Some(q) => q.neg(),
            None => DenseMatrix::zeros(seq[0].ring(), self.num_rows(), seq[0].num_cols()),
        };
        for (d, pd) in self.p.iter().enumerate().take(sigma + 1) {
            res = res.add(&pd.mm(&seq[sigma - d])?)?;
        }
        Ok(res)
    }

    /// Clears the residual at one order and returns the number of pivots.
    fn update(&mut self, residual: &DenseMatrix<'a, R>) -> Result<usize> {
        let ring = residual.ring();
        let rows = self.num_rows();
        let nb = residual.num_cols();

        let mut aug = DenseMatrix::zeros(ring, rows, nb + rows);
        for r in 0..rows {
            aug.row_mut(r)[..nb].clone_from_slice(residual.row(r));
            aug[(r, nb + r)] = ring.one();
        }

        let order = self.rows_by_degree();
        let mut is_pivot = vec![false; rows];
        for col in 0..nb {
            let nonzero = |m: &DenseMatrix<'a, R>, r: usize| !ring.is_zero(&m[(r, col)]).is_true();
            let Some(pivot) = order.iter().copied().find(|&r| !is_pivot[r] && nonzero(&aug, r)) else {
                continue;
            };
            is_pivot[pivot] = true;
            let inv = ring.inv(&aug[(pivot, col)])?;
            for &r in &order {
                if !is_pivot[r] && nonzero(&aug, r) {
                    let factor = ring.neg(&ring.mul(&aug[(r, col)], &inv));
                    aug.add_scaled_row(r, pivot, &factor);
                }
            }
        }

        let mut transform = DenseMatrix::zeros(ring, rows, rows);
        for r in 0..rows {
            transform.row_mut(r).clone_from_slice(&aug.row(r)[nb..]);
        }
        for pd in &mut self.p {
            *pd = transform.mm(pd)?;
        }
        for qd in &mut self.q {
            *qd = transform.mm(qd)?;
        }

        let pivots: Vec<usize> = (0..rows).filter(|&r| is_pivot[r]).collect();
        if !pivots.is_empty() {
            shift_rows(&mut self.p, &pivots);
            shift_rows(&mut self.q, &pivots);
            for &r in &pivots {
                self.degree[r] += 1;
            }
        }
        Ok(pivots.len())
    }

    /// Coefficient vectors of the `p` half of row `r`, reversed at its
    /// actual degree. Empty if that half is zero.
    fn reversed_row(&self, r: usize) -> Vec<Vec<R::Element>> {
        let top = self.degree[r].min(self.p.len() - 1);
        let ring = self.p[0].ring();
        let is_zero_row = |d: usize| self.p[d].row(r).iter().all(|x| ring.is_zero(x).is_true());
        let Some(d) = (0..=top).rev().find(|&d| !is_zero_row(d)) else {
            return Vec::new();
        };
        (0..=d).rev().map(|j| self.p[j].row(r).to_vec()).collect()
    }
}

/// Multiplies the given rows of a matrix polynomial by `z`.
fn shift_rows<R: Ring>(coeffs: &mut Vec<DenseMatrix<'_, R>>, rows: &[usize]) {
    let Some(last) = coeffs.last() else {
        return;
    };
    let top = DenseMatrix::zeros(last.ring(), last.num_rows(), last.num_cols());
    coeffs.push(top);
    for d in (1..coeffs.len()).rev() {
        for &r in rows {
            let below = coeffs[d - 1].row(r).to_vec();
            coeffs[d].row_mut(r).clone_from_slice(&below);
        }
    }
    let ring = coeffs[0].ring();
    for &r in rows {
        for v in coeffs[0].row_mut(r) {
            *v = ring.zero();
        }
    }
}

impl BlockWiedemann {
    /// Creates a solver with the given configuration.
    #[must_use]
    pub fn new(config: BlockWiedemannConfig) -> Self {
        Self { config }
    }

    /// Looks for a nonzero kernel vector of the square matrix `a`.
    #[instrument(skip_all, fields(n = a.num_rows(), nnz = a.nnz(), block = self.config.block_size))]
    fn kernel_vector<R: Ring, G: Rng + ?Sized>(
        &self,
        a: &CsrMatrix<'_, R>,
        rng: &mut G,
    ) -> Result<Vec<R::Element>> {
        let ring = a.ring();
        let n = a.num_cols();
        if n == 0 {
            return Err(LinalgError::VerificationFailed("no nonzero vector in dimension zero"));
        }
        let nb = self.config.block_size.clamp(1, n);

        let y0 = DenseMatrix::random(ring, n, nb, rng);
        let x = DenseMatrix::random(ring, n, nb, rng);
        let y1 = a.mul_dense(&y0)?;
        if y1.is_zero() {
            return (0..nb)
                .map(|j| y0.col(j))
                .find(|c| !dense_vec::is_zero(ring, c))
                .ok_or(LinalgError::Breakdown("zero starting block"));
        }

        let rounds = n.div_ceil(nb);
        let len = (2 * rounds + 10).min(self.config.max_iterations).max(1);
        let mut seq = Vec::with_capacity(len);
        let mut block = y1;
        for k in 0..len {
            seq.push(block.transpose().mm(&x)?);
            if k + 1 < len {
                block = a.mul_dense(&block)?;
            }
        }

        let mut basis = Approximant::new(ring, nb);
        let mut sigma = 0;
        let mut settled = false;
        while sigma < len {
            let residual = basis.residual(&seq, sigma)?;
            let pivots = basis.update(&residual)?;
            sigma += 1;
            trace!(sigma, pivots, "approximant step");

            let order = basis.rows_by_degree();
            let lo = basis.degree[order[0]];
            let hi = basis.degree[order[order.len() - 1]];
            let needed = rounds + 1 + (hi - lo);
            if order[..nb]
                .iter()
                .all(|&r| sigma.saturating_sub(basis.degree[r]) >= needed)
            {
                settled = true;
                break;
            }
        }
        if !settled {
            debug!(sigma, "block sequence exhausted before the generator settled");
        }

        let mut nonzero_candidate = false;
        for &r in &basis.rows_by_degree()[..nb] {
            let terms: Vec<Vec<R::Element>> = basis
                .reversed_row(r)
                .iter()
                .map(|f| y0.mv(f))
                .collect::<Result<_>>()?;
            let w = horner(a, &terms)?;
            if dense_vec::is_zero(ring, &w) {
                continue;
            }
            nonzero_candidate = true;
            match settle_kernel(a, w, basis.degree[r] + 1) {
                Ok(v) => {
                    debug!(sigma, degree = basis.degree[r], "block Wiedemann found a kernel vector");
                    return Ok(v);
                }
                Err(e) if e.is_retryable() => trace!(row = r, "generator row missed the kernel"),
                Err(e) => return Err(e),
            }
        }

        if nonzero_candidate {
            Err(LinalgError::Breakdown("no generator row reached the kernel"))
        } else {
            debug!("every generator row vanished on the starting block");
            Err(LinalgError::VerificationFailed("kernel appears trivial"))
        }
    }
}

impl<R: Ring> KrylovSolver<R> for BlockWiedemann {
    fn solve<G: Rng + ?Sized>(
        &self,
        m: &CsrMatrix<'_, R>,
        b: &[R::Element],
        rng: &mut G,
    ) -> Result<Vec<R::Element>> {
        require_square(m)?;
        check_shape((m.num_rows(), 1), (b.len(), 1))?;
        let ring = m.ring();
        if dense_vec::is_zero(ring, b) {
            return Ok(dense_vec::zeros(ring, m.num_cols()));
        }

        let aug = bordered(m, b);
        let kernel = self.kernel_vector(&aug, rng).map_err(|e| match e.kind() {
            ErrorKind::TestFail => LinalgError::Breakdown("bordered system has no kernel vector"),
            _ => e,
        })?;
        let x = unborder(ring, &kernel)?;
        check_solution(m, &x, b)?;
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tertius_rings::PrimeField;

    const P: u64 = 1_000_003;

    fn random_square<'a>(f: &'a PrimeField, n: usize, rng: &mut ChaCha8Rng) -> CsrMatrix<'a, PrimeField> {
        let mut triplets = Vec::new();
        for r in 0..n {
            triplets.push((r, r, f.random_nonzero(rng)));
            for _ in 0..2 {
                triplets.push((r, rng.gen_range(0..n), f.random_nonzero(rng)));
            }
        }
        CsrMatrix::from_triplets(f, n, n, &triplets).unwrap()
    }

    fn with_block(block_size: usize) -> BlockWiedemann {
        BlockWiedemann::new(BlockWiedemannConfig {
            block_size,
            ..BlockWiedemannConfig::default()
        })
    }

    #[test]
    fn test_approximant_clears_residuals() {
        let f = PrimeField::new(P);
        let mut rng = ChaCha8Rng::seed_from_u64(71);
        let seq: Vec<_> = (0..6).map(|_| DenseMatrix::random(&f, 2, 2, &mut rng)).collect();
        let mut basis = Approximant::new(&f, 2);
        for sigma in 0..seq.len() {
            let residual = basis.residual(&seq, sigma).unwrap();
            basis.update(&residual).unwrap();
            for s in 0..=sigma {
                assert!(basis.residual(&seq, s).unwrap().is_zero(), "order {s} after step {sigma}");
            }
        }
        // each step raises the total degree by the residual rank
        let total: usize = basis.degree.iter().sum();
        assert_eq!(total, 2 + 2 * seq.len());
    }

    #[test]
    fn test_solve_nonsingular() {
        let f = PrimeField::new(P);
        let mut rng = ChaCha8Rng::seed_from_u64(73);
        let m = random_square(&f, 12, &mut rng);
        let x0 = dense_vec::random(&f, 12, &mut rng);
        let b = m.mul_vec(&x0).unwrap();

        let solver = with_block(3);
        let x = (0..10)
            .find_map(|_| match solver.solve(&m, &b, &mut rng) {
                Ok(x) => Some(x),
                Err(e) => {
                    assert_eq!(e.kind(), ErrorKind::Unable);
                    None
                }
            })
            .expect("block Wiedemann failed ten times");
        assert_eq!(m.mul_vec(&x).unwrap(), b);
    }

    #[test]
    fn test_nullvector_singular() {
        let f = PrimeField::new(P);
        let mut rng = ChaCha8Rng::seed_from_u64(79);
        let base = random_square(&f, 9, &mut rng);
        // column 2 becomes column 0 minus column 1
        let dense = base.to_dense();
        let mut triplets = Vec::new();
        for r in 0..9 {
            for c in 0..9 {
                let v = if c == 2 {
                    f.sub(&dense[(r, 0)], &dense[(r, 1)])
                } else {
                    dense[(r, c)]
                };
                triplets.push((r, c, v));
            }
        }
        let m = CsrMatrix::from_triplets(&f, 9, 9, &triplets).unwrap();

        let solver = with_block(2);
        let v = (0..10)
            .find_map(|_| solver.nullvector(&m, &mut rng).ok())
            .expect("no nullvector in ten attempts");
        assert!(!dense_vec::is_zero(&f, &v));
        assert!(dense_vec::is_zero(&f, &m.mul_vec(&v).unwrap()));
    }

    #[test]
    fn test_zero_matrix_kernel() {
        let f = PrimeField::new(P);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let m = CsrMatrix::new(&f, 5, 5);
        let v = BlockWiedemann::default().nullvector(&m, &mut rng).unwrap();
        assert!(!dense_vec::is_zero(&f, &v));
    }

    #[test]
    fn test_identity_has_no_nullvector() {
        let f = PrimeField::new(P);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let m = CsrMatrix::identity(&f, 6);
        assert!(with_block(2).nullvector(&m, &mut rng).is_err());
    }

    #[test]
    fn test_rectangular_is_domain() {
        let f = PrimeField::new(P);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let m = CsrMatrix::new(&f, 4, 2);
        let err = BlockWiedemann::default()
            .solve(&m, &[1, 0, 0, 0], &mut rng)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
    }
}
