//! Scalar Lanczos over an exact field.
//!
//! Runs the three-term recurrence on the symmetric operator
//! `A = D·MᵀM·D`, building an `A`-orthogonal basis `w_0, w_1, ...` of the
//! Krylov space of `D·Mᵀ b` and accumulating the solution along it.

use rand::Rng;
use tertius_rings::Ring;
use tracing::{debug, instrument, trace, warn};

use super::{check_solution, KrylovSolver, NormalOperator};
use crate::csr::CsrMatrix;
use crate::dense_vec;
use crate::error::{check_shape, LinalgError, Result};

/// Configuration for [`Lanczos`].
#[derive(Clone, Debug)]
pub struct LanczosConfig {
    /// Upper bound on recurrence steps. A run also stops after `n + 1`
    /// steps, where `n` is the number of columns.
    pub max_iterations: usize,
}

impl Default for LanczosConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
        }
    }
}

/// Scalar Lanczos solver.
#[derive(Clone, Debug, Default)]
pub struct Lanczos {
    /// Configuration.
    pub config: LanczosConfig,
}

impl Lanczos {
    /// Creates a solver with the given configuration.
    #[must_use]
    pub fn new(config: LanczosConfig) -> Self {
        Self { config }
    }
}

impl<R: Ring> KrylovSolver<R> for Lanczos {
    #[instrument(skip_all, fields(rows = m.num_rows(), cols = m.num_cols(), nnz = m.nnz()))]
    fn solve<G: Rng + ?Sized>(
        &self,
        m: &CsrMatrix<'_, R>,
        b: &[R::Element],
        rng: &mut G,
    ) -> Result<Vec<R::Element>> {
        let ring = m.ring();
        check_shape((m.num_rows(), 1), (b.len(), 1))?;
        let n = m.num_cols();
        if dense_vec::is_zero(ring, b) {
            return Ok(dense_vec::zeros(ring, n));
        }

        let op = NormalOperator::new(m, rng);
        let rhs = op.rhs(b)?;
        let limit = (n + 1).min(self.config.max_iterations);

        let mut y = dense_vec::zeros(ring, n);
        let mut w = rhs.clone();
        let mut w_prev = dense_vec::zeros(ring, n);
        let mut delta_prev = ring.one();
        let mut steps = 0;

        while !dense_vec::is_zero(ring, &w) {
            if steps == limit {
                warn!(steps, "Lanczos iteration limit reached");
                return Err(LinalgError::Breakdown("Lanczos iteration limit reached"));
            }

            let aw = op.apply(&w)?;
            let delta = dense_vec::dot(ring, &w, &aw)?;
            if ring.is_zero(&delta).is_true() {
                debug!(steps, "Lanczos breakdown on self-orthogonal vector");
                return Err(LinalgError::Breakdown("self-orthogonal Lanczos vector"));
            }

            let coeff = ring.div(&dense_vec::dot(ring, &w, &rhs)?, &delta)?;
            dense_vec::axpy(ring, &mut y, &coeff, &w)?;

            // w_next = A w - alpha w - beta w_prev
            let alpha = ring.div(&dense_vec::dot(ring, &aw, &aw)?, &delta)?;
            let mut next = aw;
            dense_vec::axpy(ring, &mut next, &ring.neg(&alpha), &w)?;
            if steps > 0 {
                let beta = ring.div(&delta, &delta_prev)?;
                dense_vec::axpy(ring, &mut next, &ring.neg(&beta), &w_prev)?;
            }

            w_prev = std::mem::replace(&mut w, next);
            delta_prev = delta;
            steps += 1;
            trace!(steps, "Lanczos step");
        }

        let x = op.unscale(&y)?;
        check_solution(m, &x, b)?;
        debug!(steps, "Lanczos converged");
        Ok(x)
    }
}
