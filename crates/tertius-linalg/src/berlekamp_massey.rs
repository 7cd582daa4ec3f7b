//! Berlekamp-Massey algorithm for finding minimal polynomials.
//!
//! Given a sequence s_0, s_1, ..., s_{n-1}, this algorithm finds the
//! shortest connection polynomial C(x) with C_0 = 1 such that:
//!   C_0 * s_j + C_1 * s_{j-1} + ... + C_L * s_{j-L} = 0
//! for all L <= j < n.
//!
//! The Wiedemann solver turns C into a minimal polynomial of the Krylov
//! sequence it projects.

use tertius_rings::Ring;

use crate::error::Result;

/// Result of the Berlekamp-Massey algorithm.
#[derive(Clone, Debug)]
pub struct BerlekampMasseyResult<E> {
    /// Connection polynomial C(x) = C_0 + C_1*x + ... + C_L*x^L, with
    /// C_0 = 1. Coefficients in ascending degree order, exactly `length + 1`
    /// of them.
    pub connection_poly: Vec<E>,
    /// Length of the linear recurrence.
    pub length: usize,
}

impl<E: Clone> BerlekampMasseyResult<E> {
    /// The reversed polynomial x^L * C(1/x), in ascending degree order.
    ///
    /// It is monic of degree `length` and annihilates the sequence:
    /// `sum_i f_i s_{k+i} = 0` for every window that fits.
    #[must_use]
    pub fn minimal_polynomial(&self) -> Vec<E> {
        self.connection_poly.iter().rev().cloned().collect()
    }
}

/// Computes the shortest linear recurrence satisfied by `sequence`.
///
/// # Errors
///
/// Returns an `Unable` error if a discrepancy is not invertible, which can
/// only happen outside fields.
pub fn berlekamp_massey<R: Ring>(
    ring: &R,
    sequence: &[R::Element],
) -> Result<BerlekampMasseyResult<R::Element>> {
    // Current connection polynomial C(x)
    let mut c = vec![ring.one()];
    // Connection polynomial before the last length change
    let mut b = vec![ring.one()];
    let mut l = 0usize;
    // Steps since the last length change
    let mut m = 1usize;
    let mut delta_prev = ring.one();

    for i in 0..sequence.len() {
        let delta = discrepancy(ring, &c, sequence, i);

        if ring.is_zero(&delta).is_true() {
            m += 1;
            continue;
        }

        let scale = ring.div(&delta, &delta_prev)?;
        if 2 * l <= i {
            let t = c.clone();
            sub_scaled_shift(ring, &mut c, &b, &scale, m);
            b = t;
            l = i + 1 - l;
            delta_prev = delta;
            m = 1;
        } else {
            sub_scaled_shift(ring, &mut c, &b, &scale, m);
            m += 1;
        }
    }

    // Coefficients above L vanish; pad or cut to exactly L + 1.
    c.resize(l + 1, ring.zero());
    Ok(BerlekampMasseyResult {
        connection_poly: c,
        length: l,
    })
}

/// Discrepancy at step n: sum_j C_j * s_{n-j}.
fn discrepancy<R: Ring>(ring: &R, c: &[R::Element], s: &[R::Element], n: usize) -> R::Element {
    let mut delta = ring.zero();
    for (j, cj) in c.iter().enumerate().take(n + 1) {
        ring.addmul(&mut delta, cj, &s[n - j]);
    }
    delta
}

/// A(x) -= scale * x^shift * B(x).
fn sub_scaled_shift<R: Ring>(
    ring: &R,
    a: &mut Vec<R::Element>,
    b: &[R::Element],
    scale: &R::Element,
    shift: usize,
) {
    if a.len() < b.len() + shift {
        a.resize(b.len() + shift, ring.zero());
    }
    for (i, bi) in b.iter().enumerate() {
        ring.submul(&mut a[i + shift], bi, scale);
    }
}
