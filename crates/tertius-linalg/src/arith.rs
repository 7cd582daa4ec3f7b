//! Arithmetic kernel for the sparse formats.
//!
//! Products with dense operands are written once against [`RowMajor`], the
//! row access shared by CSR and LIL. Elementwise operations merge rows (or
//! canonical COO keys) through [`crate::merge`].
//!
//! Failures of ring operations surface as `Unable` errors and shape
//! mismatches as `Domain` errors; see [`crate::error::ErrorKind`].

use std::convert::Infallible;

use tertius_rings::Ring;

use crate::coo::CooMatrix;
use crate::csr::CsrMatrix;
use crate::dense_matrix::DenseMatrix;
use crate::error::{check_shape, LinalgError, Result};
use crate::lil::LilMatrix;
use crate::merge::merge_with;
use crate::sparse_vec::SparseVector;

/// Row-major access to a sparse matrix.
pub trait RowMajor<'a, R: Ring> {
    /// The ring context.
    fn ring(&self) -> &'a R;

    /// `(num_rows, num_cols)`.
    fn shape(&self) -> (usize, usize);

    /// Column indices and values of one row, indices strictly increasing.
    fn row_parts(&self, row: usize) -> (&[usize], &[R::Element]);
}

impl<'a, R: Ring> RowMajor<'a, R> for CsrMatrix<'a, R> {
    fn ring(&self) -> &'a R {
        CsrMatrix::ring(self)
    }

    fn shape(&self) -> (usize, usize) {
        (self.num_rows(), self.num_cols())
    }

    fn row_parts(&self, row: usize) -> (&[usize], &[R::Element]) {
        self.row(row)
    }
}

impl<'a, R: Ring> RowMajor<'a, R> for LilMatrix<'a, R> {
    fn ring(&self) -> &'a R {
        LilMatrix::ring(self)
    }

    fn shape(&self) -> (usize, usize) {
        (self.num_rows(), self.num_cols())
    }

    fn row_parts(&self, row: usize) -> (&[usize], &[R::Element]) {
        let row = self.row(row);
        (row.indices(), row.values())
    }
}

/// Matrix-vector product `y = M x`.
///
/// # Errors
///
/// Returns a domain error if `x` does not have one entry per column.
pub fn mul_vec<'a, R: Ring + 'a, M: RowMajor<'a, R> + ?Sized>(
    m: &M,
    x: &[R::Element],
) -> Result<Vec<R::Element>> {
    let (num_rows, num_cols) = m.shape();
    check_shape((num_cols, 1), (x.len(), 1))?;
    let ring = m.ring();

    Ok((0..num_rows)
        .map(|row| {
            let (cols, vals) = m.row_parts(row);
            let mut acc = ring.zero();
            for (&c, v) in cols.iter().zip(vals) {
                ring.addmul(&mut acc, v, &x[c]);
            }
            acc
        })
        .collect())
}

/// Product with a dense matrix, `C = M B`.
///
/// `B` is transposed once so that each of its columns is a contiguous
/// vector, then every column goes through [`mul_vec`].
///
/// # Errors
///
/// Returns a domain error if the inner dimensions differ.
pub fn mul_dense<'a, R: Ring, M: RowMajor<'a, R> + ?Sized>(
    m: &M,
    b: &DenseMatrix<'a, R>,
) -> Result<DenseMatrix<'a, R>> {
    let (num_rows, num_cols) = m.shape();
    if b.num_rows() != num_cols {
        return Err(LinalgError::ShapeMismatch {
            expected: (num_cols, b.num_cols()),
            found: (b.num_rows(), b.num_cols()),
        });
    }

    let bt = b.transpose();
    let mut out = DenseMatrix::zeros(m.ring(), num_rows, b.num_cols());
    for j in 0..bt.num_rows() {
        let col = mul_vec(m, bt.row(j))?;
        out.set_col(j, &col)?;
    }
    Ok(out)
}

fn nonzero<R: Ring>(ring: &R, value: R::Element) -> Option<R::Element> {
    if ring.is_zero(&value).is_true() {
        None
    } else {
        Some(value)
    }
}

fn infallible<T>(result: std::result::Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

fn require_integral_domain<R: Ring>(ring: &R) -> Result<()> {
    if ring.is_integral_domain() {
        Ok(())
    } else {
        Err(LinalgError::InvalidArgument(
            "exact division requires an integral domain",
        ))
    }
}

impl<'a, R: Ring> CsrMatrix<'a, R> {
    /// Matrix-vector product `y = A x`.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `x` does not have one entry per column.
    pub fn mul_vec(&self, x: &[R::Element]) -> Result<Vec<R::Element>> {
        mul_vec(self, x)
    }

    /// Transposed product `y = Aᵀ x`, without forming the transpose.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `x` does not have one entry per row.
    pub fn mul_vec_transpose(&self, x: &[R::Element]) -> Result<Vec<R::Element>> {
        check_shape((self.num_rows(), 1), (x.len(), 1))?;
        let ring = self.ring();
        let mut y = vec![ring.zero(); self.num_cols()];
        for (row, xi) in x.iter().enumerate() {
            if ring.is_zero(xi).is_true() {
                continue;
            }
            for (col, val) in self.row_iter(row) {
                ring.addmul(&mut y[col], val, xi);
            }
        }
        Ok(y)
    }

    /// Product with a dense matrix.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the inner dimensions differ.
    pub fn mul_dense(&self, b: &DenseMatrix<'a, R>) -> Result<DenseMatrix<'a, R>> {
        mul_dense(self, b)
    }

    fn zip_rows(
        &self,
        other: &Self,
        only_left: impl Fn(&R::Element) -> Option<R::Element>,
        only_right: impl Fn(&R::Element) -> Option<R::Element>,
        both: impl Fn(&R::Element, &R::Element) -> Option<R::Element>,
    ) -> Result<Self> {
        check_shape(
            (self.num_rows(), self.num_cols()),
            (other.num_rows(), other.num_cols()),
        )?;

        let mut values = Vec::with_capacity(self.nnz().max(other.nnz()));
        let mut col_indices = Vec::with_capacity(values.capacity());
        let mut row_ptrs = Vec::with_capacity(self.num_rows() + 1);
        row_ptrs.push(0);

        for row in 0..self.num_rows() {
            let (cols, vals) = merge_with(
                self.row(row),
                other.row(row),
                &only_left,
                &only_right,
                &both,
            );
            col_indices.extend(cols);
            values.extend(vals);
            row_ptrs.push(values.len());
        }

        Ok(Self::from_raw_parts(
            self.ring(),
            self.num_cols(),
            row_ptrs,
            col_indices,
            values,
        ))
    }

    fn try_map_values<E>(
        &self,
        mut f: impl FnMut(&R::Element) -> std::result::Result<R::Element, E>,
    ) -> std::result::Result<Self, E> {
        let ring = self.ring();
        let mut values = Vec::with_capacity(self.nnz());
        let mut col_indices = Vec::with_capacity(self.nnz());
        let mut row_ptrs = Vec::with_capacity(self.num_rows() + 1);
        row_ptrs.push(0);

        for row in 0..self.num_rows() {
            for (col, val) in self.row_iter(row) {
                if let Some(v) = nonzero(ring, f(val)?) {
                    values.push(v);
                    col_indices.push(col);
                }
            }
            row_ptrs.push(values.len());
        }

        Ok(Self::from_raw_parts(
            ring,
            self.num_cols(),
            row_ptrs,
            col_indices,
            values,
        ))
    }

    /// Entrywise sum.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn add(&self, other: &Self) -> Result<Self> {
        let ring = self.ring();
        self.zip_rows(
            other,
            |a| Some(a.clone()),
            |b| Some(b.clone()),
            |a, b| nonzero(ring, ring.add(a, b)),
        )
    }

    /// Entrywise difference.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        let ring = self.ring();
        self.zip_rows(
            other,
            |a| Some(a.clone()),
            |b| Some(ring.neg(b)),
            |a, b| nonzero(ring, ring.sub(a, b)),
        )
    }

    /// Entrywise (Hadamard) product.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        let ring = self.ring();
        self.zip_rows(other, |_| None, |_| None, |a, b| nonzero(ring, ring.mul(a, b)))
    }

    /// Computes `self + c * other`.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn addmul_scalar(&self, other: &Self, c: &R::Element) -> Result<Self> {
        let ring = self.ring();
        self.zip_rows(
            other,
            |a| Some(a.clone()),
            |b| nonzero(ring, ring.mul(b, c)),
            |a, b| {
                let mut acc = a.clone();
                ring.addmul(&mut acc, b, c);
                nonzero(ring, acc)
            },
        )
    }

    /// Computes `self - c * other`.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn submul_scalar(&self, other: &Self, c: &R::Element) -> Result<Self> {
        let ring = self.ring();
        self.zip_rows(
            other,
            |a| Some(a.clone()),
            |b| nonzero(ring, ring.neg(&ring.mul(b, c))),
            |a, b| {
                let mut acc = a.clone();
                ring.submul(&mut acc, b, c);
                nonzero(ring, acc)
            },
        )
    }

    /// Additive inverse.
    #[must_use]
    pub fn neg(&self) -> Self {
        let ring = self.ring();
        Self::from_raw_parts(
            ring,
            self.num_cols(),
            self.row_ptrs().to_vec(),
            self.col_indices().to_vec(),
            self.values().iter().map(|v| ring.neg(v)).collect(),
        )
    }

    /// Product with a scalar; entries that vanish are dropped.
    #[must_use]
    pub fn mul_scalar(&self, c: &R::Element) -> Self {
        let ring = self.ring();
        infallible(self.try_map_values(|v| Ok(ring.mul(v, c))))
    }

    /// Multiplies every entry by the inverse of `c`.
    ///
    /// # Errors
    ///
    /// Returns an `Unable` error if `c` is not a unit.
    pub fn div_scalar(&self, c: &R::Element) -> Result<Self> {
        let inv = self.ring().inv(c)?;
        Ok(self.mul_scalar(&inv))
    }

    /// Divides every entry exactly by `c`.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the ring is not an integral domain, and an
    /// `Unable` error if some entry is not divisible by `c`.
    pub fn divexact_scalar(&self, c: &R::Element) -> Result<Self> {
        let ring = self.ring();
        require_integral_domain(ring)?;
        self.try_map_values(|v| ring.div(v, c).map_err(LinalgError::from))
    }
}

impl<'a, R: Ring> LilMatrix<'a, R> {
    /// Matrix-vector product `y = A x`.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `x` does not have one entry per column.
    pub fn mul_vec(&self, x: &[R::Element]) -> Result<Vec<R::Element>> {
        mul_vec(self, x)
    }

    /// Product with a dense matrix.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the inner dimensions differ.
    pub fn mul_dense(&self, b: &DenseMatrix<'a, R>) -> Result<DenseMatrix<'a, R>> {
        mul_dense(self, b)
    }

    fn zip_rows(
        &self,
        other: &Self,
        mut f: impl FnMut(
            &SparseVector<'a, R>,
            &SparseVector<'a, R>,
        ) -> Result<SparseVector<'a, R>>,
    ) -> Result<Self> {
        check_shape(
            (self.num_rows(), self.num_cols()),
            (other.num_rows(), other.num_cols()),
        )?;
        let rows = self
            .rows()
            .iter()
            .zip(other.rows())
            .map(|(a, b)| f(a, b))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_rows_unchecked(self.ring(), self.num_cols(), rows))
    }

    fn try_map_rows(
        &self,
        f: impl FnMut(&SparseVector<'a, R>) -> Result<SparseVector<'a, R>>,
    ) -> Result<Self> {
        let rows = self.rows().iter().map(f).collect::<Result<Vec<_>>>()?;
        Ok(Self::from_rows_unchecked(self.ring(), self.num_cols(), rows))
    }

    /// Entrywise sum.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.zip_rows(other, |a, b| a.add(b))
    }

    /// Entrywise difference.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.zip_rows(other, |a, b| a.sub(b))
    }

    /// Entrywise (Hadamard) product.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        self.zip_rows(other, |a, b| a.mul(b))
    }

    /// Computes `self + c * other`.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn addmul_scalar(&self, other: &Self, c: &R::Element) -> Result<Self> {
        self.zip_rows(other, |a, b| a.addmul_scalar(b, c))
    }

    /// Computes `self - c * other`.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn submul_scalar(&self, other: &Self, c: &R::Element) -> Result<Self> {
        self.zip_rows(other, |a, b| a.submul_scalar(b, c))
    }

    /// Additive inverse.
    #[must_use]
    pub fn neg(&self) -> Self {
        let rows = self.rows().iter().map(SparseVector::neg).collect();
        Self::from_rows_unchecked(self.ring(), self.num_cols(), rows)
    }

    /// Product with a scalar; entries that vanish are dropped.
    #[must_use]
    pub fn mul_scalar(&self, c: &R::Element) -> Self {
        let rows = self.rows().iter().map(|row| row.mul_scalar(c)).collect();
        Self::from_rows_unchecked(self.ring(), self.num_cols(), rows)
    }

    /// Multiplies every entry by the inverse of `c`.
    ///
    /// # Errors
    ///
    /// Returns an `Unable` error if `c` is not a unit.
    pub fn div_scalar(&self, c: &R::Element) -> Result<Self> {
        let inv = self.ring().inv(c)?;
        Ok(self.mul_scalar(&inv))
    }

    /// Divides every entry exactly by `c`.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the ring is not an integral domain, and an
    /// `Unable` error if some entry is not divisible by `c`.
    pub fn divexact_scalar(&self, c: &R::Element) -> Result<Self> {
        require_integral_domain(self.ring())?;
        self.try_map_rows(|row| row.div_scalar(c))
    }
}

impl<'a, R: Ring> CooMatrix<'a, R> {
    /// Matrix-vector product `y = A x`; repeated positions add up.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `x` does not have one entry per column.
    pub fn mul_vec(&self, x: &[R::Element]) -> Result<Vec<R::Element>> {
        check_shape((self.num_cols(), 1), (x.len(), 1))?;
        let ring = self.ring();
        let mut y = vec![ring.zero(); self.num_rows()];
        for (r, c, v) in self.iter() {
            ring.addmul(&mut y[r], v, &x[c]);
        }
        Ok(y)
    }

    /// Product with a dense matrix, one column of `b` at a time.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the inner dimensions differ.
    pub fn mul_dense(&self, b: &DenseMatrix<'a, R>) -> Result<DenseMatrix<'a, R>> {
        if b.num_rows() != self.num_cols() {
            return Err(LinalgError::ShapeMismatch {
                expected: (self.num_cols(), b.num_cols()),
                found: (b.num_rows(), b.num_cols()),
            });
        }
        let bt = b.transpose();
        let mut out = DenseMatrix::zeros(self.ring(), self.num_rows(), b.num_cols());
        for j in 0..bt.num_rows() {
            out.set_col(j, &self.mul_vec(bt.row(j))?)?;
        }
        Ok(out)
    }

    fn concat(&self, other: &Self, negate: bool) -> Result<Self> {
        check_shape(
            (self.num_rows(), self.num_cols()),
            (other.num_rows(), other.num_cols()),
        )?;
        let ring = self.ring();
        let mut out = self.clone();
        for (r, c, v) in other.iter() {
            let v = if negate { ring.neg(v) } else { v.clone() };
            out.push_entry(r, c, v)?;
        }
        Ok(out)
    }

    /// Entrywise sum by concatenating the triplet logs; the result is not
    /// canonical.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.concat(other, false)
    }

    /// Entrywise difference by concatenating the triplet logs; the result
    /// is not canonical.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.concat(other, true)
    }

    /// Entrywise (Hadamard) product of the canonical forms.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        check_shape(
            (self.num_rows(), self.num_cols()),
            (other.num_rows(), other.num_cols()),
        )?;
        let ring = self.ring();
        let lhs = self.canonical();
        let rhs = other.canonical();
        let (lk, rk) = (lhs.keys(), rhs.keys());
        let (keys, values) = merge_with(
            (&lk[..], lhs.values()),
            (&rk[..], rhs.values()),
            |_| None,
            |_| None,
            |a, b| nonzero(ring, ring.mul(a, b)),
        );
        Ok(Self::from_canonical_parts(
            ring,
            self.num_rows(),
            self.num_cols(),
            keys,
            values,
        ))
    }

    /// Computes `self + c * other`; the result is not canonical.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn addmul_scalar(&self, other: &Self, c: &R::Element) -> Result<Self> {
        self.add(&other.mul_scalar(c))
    }

    /// Computes `self - c * other`; the result is not canonical.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn submul_scalar(&self, other: &Self, c: &R::Element) -> Result<Self> {
        self.sub(&other.mul_scalar(c))
    }

    /// Additive inverse; canonical if `self` is.
    #[must_use]
    pub fn neg(&self) -> Self {
        let ring = self.ring();
        infallible(self.try_map_values(|v| Ok(ring.neg(v))))
    }

    /// Product with a scalar; canonical if `self` is.
    #[must_use]
    pub fn mul_scalar(&self, c: &R::Element) -> Self {
        let ring = self.ring();
        infallible(self.try_map_values(|v| Ok(ring.mul(v, c))))
    }

    /// Multiplies every entry by the inverse of `c`.
    ///
    /// # Errors
    ///
    /// Returns an `Unable` error if `c` is not a unit.
    pub fn div_scalar(&self, c: &R::Element) -> Result<Self> {
        let inv = self.ring().inv(c)?;
        Ok(self.mul_scalar(&inv))
    }

    /// Divides every entry exactly by `c`.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the ring is not an integral domain, and an
    /// `Unable` error if some entry is not divisible by `c`.
    pub fn divexact_scalar(&self, c: &R::Element) -> Result<Self> {
        let ring = self.ring();
        require_integral_domain(ring)?;
        self.try_map_values(|v| ring.div(v, c).map_err(LinalgError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use dashu::integer::IBig;
    use tertius_rings::{Integers, PrimeField};

    #[test]
    fn test_mod5_matvec() {
        // [[1, 2], [3, 0]] * [1, 1] = [3, 3] mod 5
        let f5 = PrimeField::new(5);
        let m = CsrMatrix::from_triplets(&f5, 2, 2, &[(0, 0, 1), (0, 1, 2), (1, 0, 3)]).unwrap();
        assert_eq!(m.mul_vec(&[1, 1]).unwrap(), vec![3, 3]);
        assert_eq!(m.to_lil().mul_vec(&[1, 1]).unwrap(), vec![3, 3]);
        assert_eq!(m.to_coo().mul_vec(&[1, 1]).unwrap(), vec![3, 3]);
    }

    #[test]
    fn test_mul_vec_shape() {
        let f5 = PrimeField::new(5);
        let m = CsrMatrix::identity(&f5, 3);
        assert_eq!(m.mul_vec(&[1, 2]).unwrap_err().kind(), ErrorKind::Domain);
    }

    #[test]
    fn test_mul_vec_transpose() {
        let f = PrimeField::new(101);
        let m = CsrMatrix::from_triplets(&f, 2, 3, &[(0, 0, 1), (0, 2, 2), (1, 1, 3)]).unwrap();
        let x = [4, 5];
        assert_eq!(
            m.mul_vec_transpose(&x).unwrap(),
            m.transpose().mul_vec(&x).unwrap()
        );
    }

    #[test]
    fn test_mul_dense() {
        let f = PrimeField::new(101);
        let m = CsrMatrix::from_triplets(&f, 2, 2, &[(0, 0, 1), (0, 1, 2), (1, 1, 3)]).unwrap();
        let b = DenseMatrix::from_rows(&f, vec![vec![1, 0, 2], vec![0, 1, 1]]).unwrap();
        let c = m.mul_dense(&b).unwrap();
        let expected = m.to_dense().mm(&b).unwrap();
        assert!(c.equal(&expected).is_true());
        assert!(m.to_lil().mul_dense(&b).unwrap().equal(&expected).is_true());
    }

    #[test]
    fn test_csr_elementwise() {
        let f = PrimeField::new(7);
        let a = CsrMatrix::from_triplets(&f, 2, 2, &[(0, 0, 3), (1, 1, 2)]).unwrap();
        let b = CsrMatrix::from_triplets(&f, 2, 2, &[(0, 0, 4), (0, 1, 1)]).unwrap();

        let sum = a.add(&b).unwrap();
        // (0,0): 3 + 4 = 0 mod 7 cancels
        assert_eq!(sum.nnz(), 2);
        assert_eq!(sum.get_entry(0, 1).unwrap(), 1);

        let diff = a.sub(&a).unwrap();
        assert_eq!(diff.nnz(), 0);

        let prod = a.mul(&b).unwrap();
        assert_eq!(prod.nnz(), 1);
        assert_eq!(prod.get_entry(0, 0).unwrap(), 5);

        let am = a.addmul_scalar(&b, &2).unwrap();
        assert_eq!(am.get_entry(0, 0).unwrap(), 4);
        assert!(am.submul_scalar(&b, &2).unwrap().equal(&a).unwrap().is_true());
    }

    #[test]
    fn test_scalar_ops() {
        let f = PrimeField::new(7);
        let a = CsrMatrix::from_triplets(&f, 2, 2, &[(0, 0, 3), (1, 1, 2)]).unwrap();
        let scaled = a.mul_scalar(&3);
        assert_eq!(scaled.get_entry(0, 0).unwrap(), 2);
        assert!(scaled.div_scalar(&3).unwrap().equal(&a).unwrap().is_true());
        assert_eq!(a.mul_scalar(&0).nnz(), 0);
        assert_eq!(a.div_scalar(&0).unwrap_err().kind(), ErrorKind::Unable);
        assert_eq!(a.neg().get_entry(1, 1).unwrap(), 5);
    }

    #[test]
    fn test_divexact() {
        let zz = Integers;
        let z = |n: i64| IBig::from(n);
        let a = CsrMatrix::from_triplets(&zz, 1, 2, &[(0, 0, z(6)), (0, 1, z(-4))]).unwrap();
        let q = a.divexact_scalar(&z(2)).unwrap();
        assert_eq!(q.get_entry(0, 1).unwrap(), z(-2));
        assert_eq!(
            a.divexact_scalar(&z(4)).unwrap_err().kind(),
            ErrorKind::Unable
        );

        // Z/6 has zero divisors
        let z6 = PrimeField::new(6);
        let b = CsrMatrix::identity(&z6, 2);
        assert_eq!(b.divexact_scalar(&1).unwrap_err().kind(), ErrorKind::Domain);
        assert_eq!(
            b.to_lil().divexact_scalar(&1).unwrap_err().kind(),
            ErrorKind::Domain
        );
    }

    #[test]
    fn test_lil_ops_match_csr() {
        let f = PrimeField::new(7);
        let a = CsrMatrix::from_triplets(&f, 2, 3, &[(0, 0, 3), (1, 2, 2), (1, 1, 6)]).unwrap();
        let b = CsrMatrix::from_triplets(&f, 2, 3, &[(0, 0, 4), (1, 2, 5), (0, 1, 1)]).unwrap();
        let (la, lb) = (a.to_lil(), b.to_lil());

        assert!(la.add(&lb).unwrap().to_csr().equal(&a.add(&b).unwrap()).unwrap().is_true());
        assert!(la.sub(&lb).unwrap().to_csr().equal(&a.sub(&b).unwrap()).unwrap().is_true());
        assert!(la.mul(&lb).unwrap().to_csr().equal(&a.mul(&b).unwrap()).unwrap().is_true());
        assert!(la
            .addmul_scalar(&lb, &3)
            .unwrap()
            .to_csr()
            .equal(&a.addmul_scalar(&b, &3).unwrap())
            .unwrap()
            .is_true());
    }

    #[test]
    fn test_coo_ops() {
        let f = PrimeField::new(7);
        let a = CsrMatrix::from_triplets(&f, 2, 2, &[(0, 0, 3), (1, 1, 2)]).unwrap();
        let b = CsrMatrix::from_triplets(&f, 2, 2, &[(0, 0, 4), (0, 1, 1)]).unwrap();
        let (ca, cb) = (a.to_coo(), b.to_coo());

        let sum = ca.add(&cb).unwrap();
        assert!(!sum.is_canonical());
        assert!(sum.to_csr().equal(&a.add(&b).unwrap()).unwrap().is_true());

        let diff = ca.sub(&ca).unwrap();
        assert_eq!(diff.canonical().nnz(), 0);

        let prod = ca.mul(&cb).unwrap();
        assert!(prod.is_canonical());
        assert_eq!(prod.get_entry(0, 0).unwrap(), 5);

        let scaled = ca.mul_scalar(&3);
        assert!(scaled.is_canonical());
        assert_eq!(scaled.get_entry(1, 1).unwrap(), 6);
        assert!(ca
            .submul_scalar(&cb, &1)
            .unwrap()
            .equal(&a.sub(&b).unwrap().to_coo())
            .unwrap()
            .is_true());
    }
}
