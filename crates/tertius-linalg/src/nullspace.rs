//! Kernel basis assembly from randomized kernel vectors.
//!
//! Candidates come from [`KrylovSolver::nullvector`]. The accepted vectors
//! are kept fully reduced: each has a pivot (its highest nonzero index)
//! holding one, and every other accepted vector is zero there.

use rand::Rng;
use tertius_rings::Ring;
use tracing::{debug, instrument, trace};

use crate::csr::CsrMatrix;
use crate::dense_matrix::DenseMatrix;
use crate::error::{ErrorKind, Result};
use crate::krylov::KrylovSolver;

/// Configuration for [`nullspace`].
#[derive(Clone, Debug)]
pub struct NullspaceConfig {
    /// Number of candidate requests before giving up.
    pub max_iterations: usize,
}

impl Default for NullspaceConfig {
    fn default() -> Self {
        Self { max_iterations: 64 }
    }
}

/// Reduced kernel basis under construction.
struct Basis<E> {
    /// `(pivot, vector)` sorted by pivot.
    vectors: Vec<(usize, Vec<E>)>,
}

impl<E: Clone> Basis<E> {
    /// Clears every accepted pivot from `v`.
    fn reduce<R: Ring<Element = E>>(&self, ring: &R, v: &mut [E]) {
        for (p, b) in &self.vectors {
            if ring.is_zero(&v[*p]).is_true() {
                continue;
            }
            let c = v[*p].clone();
            for (vi, bi) in v.iter_mut().zip(b) {
                ring.submul(vi, &c, bi);
            }
        }
    }

    /// Adds a reduced, nonzero vector. Returns false if its pivot entry is
    /// not a unit.
    fn insert<R: Ring<Element = E>>(&mut self, ring: &R, mut v: Vec<E>, pivot: usize) -> bool {
        let Ok(inv) = ring.inv(&v[pivot]) else {
            return false;
        };
        for vi in &mut v {
            *vi = ring.mul(vi, &inv);
        }
        for (_, b) in &mut self.vectors {
            if ring.is_zero(&b[pivot]).is_true() {
                continue;
            }
            let c = b[pivot].clone();
            for (bi, vi) in b.iter_mut().zip(&v) {
                ring.submul(bi, &c, vi);
            }
        }
        let at = self.vectors.partition_point(|(p, _)| *p < pivot);
        self.vectors.insert(at, (pivot, v));
        true
    }
}

/// Assembles a basis of the right kernel of `m`, one column per vector.
///
/// Stops when a reduced candidate vanishes, when the solver reports that
/// the kernel looks trivial, when the basis spans the whole space, or after
/// `config.max_iterations` requests. Failed requests count toward that
/// limit.
///
/// # Errors
///
/// Returns a domain error if the solver rejects the matrix.
#[instrument(skip_all, fields(rows = m.num_rows(), cols = m.num_cols()))]
pub fn nullspace<'a, R, S, G>(
    m: &CsrMatrix<'a, R>,
    solver: &S,
    rng: &mut G,
    config: &NullspaceConfig,
) -> Result<DenseMatrix<'a, R>>
where
    R: Ring,
    S: KrylovSolver<R>,
    G: Rng + ?Sized,
{
    let ring = m.ring();
    let n = m.num_cols();
    let mut basis = Basis { vectors: Vec::new() };

    for attempt in 0..config.max_iterations {
        if basis.vectors.len() == n {
            break;
        }
        let mut v = match solver.nullvector(m, rng) {
            Ok(v) => v,
            Err(e) => match e.kind() {
                ErrorKind::Unable => {
                    trace!(attempt, error = %e, "candidate request failed");
                    continue;
                }
                ErrorKind::TestFail => {
                    debug!(attempt, "solver reports no further kernel vectors");
                    break;
                }
                ErrorKind::Domain => return Err(e),
            },
        };

        basis.reduce(ring, &mut v);
        let Some(pivot) = v.iter().rposition(|x| !ring.is_zero(x).is_true()) else {
            debug!(attempt, "candidate already spanned");
            break;
        };
        if basis.insert(ring, v, pivot) {
            trace!(attempt, pivot, dim = basis.vectors.len(), "accepted kernel vector");
        }
    }

    debug!(dim = basis.vectors.len(), "nullspace assembled");
    let cols: Vec<Vec<R::Element>> = basis.vectors.into_iter().map(|(_, v)| v).collect();
    DenseMatrix::from_cols(ring, n, &cols)
}
