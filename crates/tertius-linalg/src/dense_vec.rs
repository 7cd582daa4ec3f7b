//! Helpers for dense vectors stored as plain slices of ring elements.
//!
//! The iterative solvers keep their Krylov iterates dense; these functions
//! are the vector-level kernels they share.

use rand::Rng;

use tertius_rings::Ring;

use crate::error::{LinalgError, Result};

fn check_same_len(a: usize, b: usize) -> Result<()> {
    if a == b {
        Ok(())
    } else {
        Err(LinalgError::ShapeMismatch {
            expected: (a, 1),
            found: (b, 1),
        })
    }
}

/// The zero vector of length `n`.
#[must_use]
pub fn zeros<R: Ring>(ring: &R, n: usize) -> Vec<R::Element> {
    vec![ring.zero(); n]
}

/// A vector of `n` independent uniform random elements.
pub fn random<R: Ring, G: Rng + ?Sized>(ring: &R, n: usize, rng: &mut G) -> Vec<R::Element> {
    (0..n).map(|_| ring.random(rng)).collect()
}

/// Returns true if every entry is provably zero.
#[must_use]
pub fn is_zero<R: Ring>(ring: &R, v: &[R::Element]) -> bool {
    v.iter().all(|x| ring.is_zero(x).is_true())
}

/// Entrywise equality; `False` as soon as one entry differs.
///
/// # Errors
///
/// Returns a domain error if the lengths differ.
pub fn equal<R: Ring>(ring: &R, a: &[R::Element], b: &[R::Element]) -> Result<bool> {
    check_same_len(a.len(), b.len())?;
    Ok(a.iter().zip(b).all(|(x, y)| ring.equal(x, y).is_true()))
}

/// Inner product.
///
/// # Errors
///
/// Returns a domain error if the lengths differ.
pub fn dot<R: Ring>(ring: &R, a: &[R::Element], b: &[R::Element]) -> Result<R::Element> {
    check_same_len(a.len(), b.len())?;
    let mut acc = ring.zero();
    for (x, y) in a.iter().zip(b) {
        ring.addmul(&mut acc, x, y);
    }
    Ok(acc)
}

/// `y += c * x` in place.
///
/// # Errors
///
/// Returns a domain error if the lengths differ.
pub fn axpy<R: Ring>(ring: &R, y: &mut [R::Element], c: &R::Element, x: &[R::Element]) -> Result<()> {
    check_same_len(y.len(), x.len())?;
    for (yi, xi) in y.iter_mut().zip(x) {
        ring.addmul(yi, c, xi);
    }
    Ok(())
}

/// Entrywise `a - b`.
///
/// # Errors
///
/// Returns a domain error if the lengths differ.
pub fn sub<R: Ring>(ring: &R, a: &[R::Element], b: &[R::Element]) -> Result<Vec<R::Element>> {
    check_same_len(a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(x, y)| ring.sub(x, y)).collect())
}

/// Entrywise `a + b`.
///
/// # Errors
///
/// Returns a domain error if the lengths differ.
pub fn add<R: Ring>(ring: &R, a: &[R::Element], b: &[R::Element]) -> Result<Vec<R::Element>> {
    check_same_len(a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(x, y)| ring.add(x, y)).collect())
}

/// `c * v`.
#[must_use]
pub fn scale<R: Ring>(ring: &R, c: &R::Element, v: &[R::Element]) -> Vec<R::Element> {
    v.iter().map(|x| ring.mul(c, x)).collect()
}

/// Entrywise product `a[i] * b[i]`.
///
/// # Errors
///
/// Returns a domain error if the lengths differ.
pub fn hadamard<R: Ring>(ring: &R, a: &[R::Element], b: &[R::Element]) -> Result<Vec<R::Element>> {
    check_same_len(a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(x, y)| ring.mul(x, y)).collect())
}
