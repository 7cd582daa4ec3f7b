//! Scalar Wiedemann over an exact field.
//!
//! A random projection `uᵀ A^k y` of the Krylov sequence is fed to
//! Berlekamp-Massey. Writing the resulting annihilator as `f(x) = x^t g(x)`
//! with `g(0) != 0`, the vector `g(A) y₀` is killed by a power of `A`, and
//! the last nonzero iterate before that power is a kernel vector.
//!
//! Any iterate past `w` itself lies in the image of `A`. Solving needs a
//! kernel vector of the bordered matrix `B` that reaches the right-hand
//! side, and no image vector of `B` does, so the sequence is built on
//! `D·BᵀE·B·D` with random diagonals `D` and `E` instead. There zero is a
//! simple root of the minimal polynomial, `g(A) y₀` is the kernel part of
//! `y₀`, and `D` maps it back to a random kernel vector of `B`.
//!
//! # References
//!
//! - Wiedemann, "Solving sparse linear equations over finite fields" (1986)
//! - Eberly and Kaltofen, "On randomized Lanczos algorithms" (1997)

use rand::Rng;
use tertius_rings::Ring;
use tracing::{debug, instrument, trace};

use super::{
    bordered, check_solution, horner, require_square, settle_kernel, unborder, KrylovSolver,
    NormalOperator, Operator,
};
use crate::berlekamp_massey::berlekamp_massey;
use crate::csr::CsrMatrix;
use crate::dense_vec;
use crate::error::{check_shape, ErrorKind, LinalgError, Result};

/// Configuration for [`Wiedemann`].
#[derive(Clone, Debug)]
pub struct WiedemannConfig {
    /// Upper bound on the length of the projected sequence. Runs normally
    /// use `2n + 1` terms.
    pub max_iterations: usize,
}

impl Default for WiedemannConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
        }
    }
}

/// Scalar Wiedemann solver. Square matrices only.
#[derive(Clone, Debug, Default)]
pub struct Wiedemann {
    /// Configuration.
    pub config: WiedemannConfig,
}

impl Wiedemann {
    /// Creates a solver with the given configuration.
    #[must_use]
    pub fn new(config: WiedemannConfig) -> Self {
        Self { config }
    }

    /// Looks for a nonzero kernel vector of `a`.
    #[instrument(skip_all, fields(n = a.dim()))]
    fn kernel_vector<R, A, G>(&self, a: &A, rng: &mut G) -> Result<Vec<R::Element>>
    where
        R: Ring,
        A: Operator<R> + ?Sized,
        G: Rng + ?Sized,
    {
        let ring = a.ring();
        let n = a.dim();
        if n == 0 {
            return Err(LinalgError::VerificationFailed("no nonzero vector in dimension zero"));
        }

        let y0 = dense_vec::random(ring, n, rng);
        if dense_vec::is_zero(ring, &y0) {
            return Err(LinalgError::Breakdown("zero starting vector"));
        }
        let y1 = a.apply(&y0)?;
        if dense_vec::is_zero(ring, &y1) {
            return Ok(y0);
        }

        let len = (2 * n + 1).min(self.config.max_iterations);
        let projections = [dense_vec::random(ring, n, rng), dense_vec::random(ring, n, rng)];
        let mut sequences = [Vec::with_capacity(len), Vec::with_capacity(len)];
        let mut krylov = y1;
        for k in 0..len {
            for (seq, u) in sequences.iter_mut().zip(&projections) {
                seq.push(dense_vec::dot(ring, u, &krylov)?);
            }
            if k + 1 < len {
                krylov = a.apply(&krylov)?;
            }
        }

        let [first, second] = sequences;
        let bm_first = berlekamp_massey(ring, &first)?;
        let bm_second = berlekamp_massey(ring, &second)?;
        let bm = if bm_second.length > bm_first.length {
            bm_second
        } else {
            bm_first
        };
        trace!(length = bm.length, "minimal polynomial");
        if bm.length == 0 {
            return Err(LinalgError::Breakdown("projected sequence vanished"));
        }

        let f = bm.minimal_polynomial();
        let t = f.iter().take_while(|c| ring.is_zero(c).is_true()).count();
        let terms: Vec<Vec<R::Element>> = f[t..]
            .iter()
            .map(|c| dense_vec::scale(ring, c, &y0))
            .collect();
        let w = horner(a, &terms)?;
        if dense_vec::is_zero(ring, &w) {
            if t == 0 {
                // g(A) y0 = 0 with g(0) != 0: no kernel component in y0
                debug!("starting vector has no kernel component");
                return Err(LinalgError::VerificationFailed("kernel appears trivial"));
            }
            return Err(LinalgError::Breakdown("reconstructed vector vanished"));
        }

        let v = settle_kernel(a, w, t + 1)?;
        debug!(degree = bm.length, "Wiedemann found a kernel vector");
        Ok(v)
    }
}

impl<R: Ring> KrylovSolver<R> for Wiedemann {
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
        let op = NormalOperator::weighted(&aug, rng);
        let z = self.kernel_vector(&op, rng).map_err(|e| match e.kind() {
            ErrorKind::TestFail => LinalgError::Breakdown("bordered system has no kernel vector"),
            _ => e,
        })?;
        let x = unborder(ring, &op.unscale(&z)?)?;
        check_solution(m, &x, b)?;
        Ok(x)
    }
}
