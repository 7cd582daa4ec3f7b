//! Block Lanczos (Montgomery 1995) over an exact field.
//!
//! Works on `B` vectors at a time, held as n×B dense blocks, against the
//! symmetric operator `A = D·MᵀM·D`. Each iteration picks the columns of
//! `Vᵢ` that are `A`-invertible together with their inverse Gram matrix
//! `Wᵢ⁻¹`, then forms `Vᵢ₊₁` from the three previous blocks:
//!
//! ```text
//! Vᵢ₊₁ = A·Vᵢ·Sᵢ + Vᵢ·Dᵢ₊₁ + Vᵢ₋₁·Eᵢ₊₁ + Vᵢ₋₂·Fᵢ₊₁
//! ```
//!
//! # References
//!
//! - Montgomery, "A Block Lanczos Algorithm for Finding Dependencies over
//!   GF(2)" (1995)

use rand::Rng;
use tertius_rings::Ring;
use tracing::{debug, instrument, trace, warn};

use super::{check_solution, KrylovSolver, NormalOperator};
use crate::csr::CsrMatrix;
use crate::dense_matrix::DenseMatrix;
use crate::dense_vec;
use crate::error::{check_shape, LinalgError, Result};

/// Configuration for [`BlockLanczos`].
#[derive(Clone, Debug)]
pub struct BlockLanczosConfig {
    /// Number of vectors per block; clamped to the number of columns.
    pub block_size: usize,
    /// Upper bound on block iterations.
    pub max_iterations: usize,
}

impl Default for BlockLanczosConfig {
    fn default() -> Self {
        Self {
            block_size: 4,
            max_iterations: 10_000,
        }
    }
}

/// Block Lanczos solver.
#[derive(Clone, Debug, Default)]
pub struct BlockLanczos {
    /// Configuration.
    pub config: BlockLanczosConfig,
}

impl BlockLanczos {
    /// Creates a solver with the given configuration.
    #[must_use]
    pub fn new(config: BlockLanczosConfig) -> Self {
        Self { config }
    }
}

/// One finished iteration, kept for the next two recurrences.
struct Step<'a, R: Ring> {
    v: DenseMatrix<'a, R>,
    winv: DenseMatrix<'a, R>,
    vav: DenseMatrix<'a, R>,
    vaav: DenseMatrix<'a, R>,
    select: DenseMatrix<'a, R>,
}

/// Diagonal 0/1 matrix of the selected columns.
fn selection_matrix<'a, R: Ring>(ring: &'a R, mask: &[bool]) -> DenseMatrix<'a, R> {
    let mut s = DenseMatrix::zeros(ring, mask.len(), mask.len());
    for (i, &keep) in mask.iter().enumerate() {
        if keep {
            s[(i, i)] = ring.one();
        }
    }
    s
}

/// Chooses the columns of `T = VᵀAV` to keep and returns `(W⁻¹, mask)`.
///
/// Columns dropped last time are tried first so that every direction is
/// eventually used. Elimination runs on `[T | I]`; a column without a
/// pivot in `T` borrows one from the identity half and its row is cleared.
fn select_directions<'a, R: Ring>(
    vav: &DenseMatrix<'a, R>,
    prev_mask: &[bool],
) -> Result<(DenseMatrix<'a, R>, Vec<bool>)> {
    let ring = vav.ring();
    let nb = vav.num_rows();
    let order: Vec<usize> = (0..nb)
        .filter(|&j| !prev_mask[j])
        .chain((0..nb).filter(|&j| prev_mask[j]))
        .collect();

    let mut aug = DenseMatrix::zeros(ring, nb, 2 * nb);
    for (a, &oa) in order.iter().enumerate() {
        for (b, &ob) in order.iter().enumerate() {
            aug[(a, b)] = vav[(oa, ob)].clone();
        }
        aug[(a, nb + a)] = ring.one();
    }

    let nonzero = |m: &DenseMatrix<'a, R>, r: usize, c: usize| !ring.is_zero(&m[(r, c)]).is_true();
    let mut selected = vec![false; nb];

    for a in 0..nb {
        if let Some(r) = (a..nb).find(|&r| nonzero(&aug, r, a)) {
            aug.swap_rows(a, r);
        }

        let col = if nonzero(&aug, a, a) {
            selected[a] = true;
            a
        } else {
            let r = (a..nb)
                .find(|&r| nonzero(&aug, r, nb + a))
                .ok_or(LinalgError::Breakdown("block Lanczos lost rank in selection"))?;
            aug.swap_rows(a, r);
            nb + a
        };

        let inv = ring.inv(&aug[(a, col)])?;
        aug.scale_row(a, &inv);
        for r in 0..nb {
            if r != a && nonzero(&aug, r, col) {
                let factor = ring.neg(&aug[(r, col)]);
                aug.add_scaled_row(r, a, &factor);
            }
        }

        if !selected[a] {
            for v in aug.row_mut(a) {
                *v = ring.zero();
            }
        }
    }

    let mut winv = DenseMatrix::zeros(ring, nb, nb);
    let mut mask = vec![false; nb];
    for (a, &oa) in order.iter().enumerate() {
        mask[oa] = selected[a];
        for (b, &ob) in order.iter().enumerate() {
            winv[(oa, ob)] = aug[(a, nb + b)].clone();
        }
    }
    Ok((winv, mask))
}

impl<R: Ring> KrylovSolver<R> for BlockLanczos {
    #[instrument(skip_all, fields(rows = m.num_rows(), cols = m.num_cols(), block = self.config.block_size))]
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
        if n == 0 {
            return Err(LinalgError::Breakdown("nonzero right-hand side with no unknowns"));
        }

        let op = NormalOperator::new(m, rng);
        let rhs = op.rhs(b)?;
        if dense_vec::is_zero(ring, &rhs) {
            return Err(LinalgError::Breakdown("right-hand side is orthogonal to the range"));
        }

        let nb = self.config.block_size.clamp(1, n);
        let identity = DenseMatrix::identity(ring, nb);
        let mut v = DenseMatrix::random(ring, n, nb, rng);
        v.set_col(0, &rhs)?;

        let mut y = dense_vec::zeros(ring, n);
        let mut prev: Option<Step<'_, R>> = None;
        let mut prev2: Option<Step<'_, R>> = None;
        let mut prev_mask = vec![true; nb];
        let mut dim = 0;
        let mut iteration = 0;

        loop {
            if iteration == self.config.max_iterations {
                warn!(iteration, "block Lanczos iteration limit reached");
                return Err(LinalgError::Breakdown("block Lanczos iteration limit reached"));
            }

            let av = op.apply_block(&v)?;
            let vt = v.transpose();
            let vav = vt.mm(&av)?;
            if vav.is_zero() {
                if !v.is_zero() {
                    debug!(iteration, "block Lanczos ended on a self-orthogonal block");
                }
                break;
            }
            let vaav = av.transpose().mm(&av)?;

            let (winv, mask) = select_directions(&vav, &prev_mask)?;
            let chosen = mask.iter().filter(|&&s| s).count();
            if chosen == 0 {
                debug!(iteration, "block Lanczos selected no direction");
                break;
            }
            dim += chosen;
            if dim > n {
                debug!(iteration, dim, "block Lanczos exceeded the dimension");
                break;
            }
            trace!(iteration, chosen, dim, "block Lanczos step");

            // y += V W⁻¹ Vᵀ rhs
            let coeffs = winv.mv(&vt.mv(&rhs)?)?;
            y = dense_vec::add(ring, &y, &v.mv(&coeffs)?)?;

            let select = selection_matrix(ring, &mask);

            // D = I - W⁻¹ (VᵀA²V S + VᵀAV)
            let inner = vaav.mm(&select)?.add(&vav)?;
            let d = identity.sub(&winv.mm(&inner)?)?;
            let mut next = av.mm(&select)?.add(&v.mm(&d)?)?;

            if let Some(p1) = &prev {
                // E = -W⁻¹ᵢ₋₁ VᵀAV S
                let e = p1.winv.mm(&vav)?.mm(&select)?.neg();
                next = next.add(&p1.v.mm(&e)?)?;

                if let Some(p2) = &prev2 {
                    // F = -W⁻¹ᵢ₋₂ (I - VᵀAVᵢ₋₁ W⁻¹ᵢ₋₁) (VᵀA²Vᵢ₋₁ Sᵢ₋₁ + VᵀAVᵢ₋₁) S
                    let left = identity.sub(&p1.vav.mm(&p1.winv)?)?;
                    let right = p1.vaav.mm(&p1.select)?.add(&p1.vav)?;
                    let f = p2
                        .winv
                        .mm(&left)?
                        .mm(&right)?
                        .mm(&select)?
                        .neg();
                    next = next.add(&p2.v.mm(&f)?)?;
                }
            }

            prev2 = prev.take();
            prev = Some(Step {
                v: std::mem::replace(&mut v, next),
                winv,
                vav,
                vaav,
                select,
            });
            prev_mask = mask;
            iteration += 1;
        }

        let x = op.unscale(&y)?;
        check_solution(m, &x, b)?;
        debug!(iteration, dim, "block Lanczos converged");
        Ok(x)
    }
}
