//! Sparse matrix as a list of sparse rows (LIL format).
//!
//! Each row is an independent [`SparseVector`], so rows can be swapped,
//! replaced or grown without touching the rest of the matrix. This is the
//! working format of the elimination algorithms.

use std::fmt;
use std::ops::Range;

use tertius_rings::{Ring, Truth};

use crate::csr::invert_permutation;
use crate::error::{check_index, check_shape, LinalgError, Result};
use crate::sparse_vec::SparseVector;

/// Sparse matrix stored as one [`SparseVector`] per row.
pub struct LilMatrix<'a, R: Ring> {
    ring: &'a R,
    num_cols: usize,
    rows: Vec<SparseVector<'a, R>>,
}

impl<R: Ring> Clone for LilMatrix<'_, R> {
    fn clone(&self) -> Self {
        Self {
            ring: self.ring,
            num_cols: self.num_cols,
            rows: self.rows.clone(),
        }
    }
}

impl<R: Ring> fmt::Debug for LilMatrix<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LilMatrix")
            .field("num_rows", &self.rows.len())
            .field("num_cols", &self.num_cols)
            .field("rows", &self.rows)
            .finish()
    }
}

impl<'a, R: Ring> LilMatrix<'a, R> {
    /// Creates the zero matrix.
    #[must_use]
    pub fn new(ring: &'a R, num_rows: usize, num_cols: usize) -> Self {
        Self {
            ring,
            num_cols,
            rows: (0..num_rows).map(|_| SparseVector::new(ring, num_cols)).collect(),
        }
    }

    /// Creates an identity matrix of size n×n.
    #[must_use]
    pub fn identity(ring: &'a R, n: usize) -> Self {
        let mut m = Self::new(ring, n, n);
        for (i, row) in m.rows.iter_mut().enumerate() {
            row.push_unchecked(i, ring.one());
        }
        m
    }

    /// Builds a matrix from its rows.
    ///
    /// # Errors
    ///
    /// Returns a domain error if a row does not have length `num_cols`.
    pub fn from_rows(ring: &'a R, num_cols: usize, rows: Vec<SparseVector<'a, R>>) -> Result<Self> {
        for row in &rows {
            check_shape((1, num_cols), (1, row.len()))?;
        }
        Ok(Self {
            ring,
            num_cols,
            rows,
        })
    }

    /// Builds a matrix from rows already known to have length `num_cols`.
    pub(crate) fn from_rows_unchecked(
        ring: &'a R,
        num_cols: usize,
        rows: Vec<SparseVector<'a, R>>,
    ) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == num_cols));
        Self {
            ring,
            num_cols,
            rows,
        }
    }

    /// Returns the ring context.
    #[must_use]
    pub fn ring(&self) -> &'a R {
        self.ring
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(SparseVector::nnz).sum()
    }

    /// Returns a row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= num_rows`.
    #[must_use]
    pub fn row(&self, row: usize) -> &SparseVector<'a, R> {
        &self.rows[row]
    }

    pub(crate) fn row_mut(&mut self, row: usize) -> &mut SparseVector<'a, R> {
        &mut self.rows[row]
    }

    /// Returns all rows.
    #[must_use]
    pub fn rows(&self) -> &[SparseVector<'a, R>] {
        &self.rows
    }

    /// Consumes the matrix, returning its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<SparseVector<'a, R>> {
        self.rows
    }

    /// Replaces a row.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `row` is out of range or `value` has the
    /// wrong length.
    pub fn set_row(&mut self, row: usize, value: SparseVector<'a, R>) -> Result<()> {
        check_index(row, self.rows.len())?;
        check_shape((1, self.num_cols), (1, value.len()))?;
        self.rows[row] = value;
        Ok(())
    }

    /// Returns the stored entry at (row, col), or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the position is out of range.
    pub fn find_entry(&self, row: usize, col: usize) -> Result<Option<&R::Element>> {
        check_index(row, self.rows.len())?;
        self.rows[row].find_entry(col)
    }

    /// Returns the entry at (row, col), zero if absent.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the position is out of range.
    pub fn get_entry(&self, row: usize, col: usize) -> Result<R::Element> {
        check_index(row, self.rows.len())?;
        self.rows[row].get_entry(col)
    }

    /// Sets the entry at (row, col); a zero value removes it.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the position is out of range.
    pub fn set_entry(&mut self, row: usize, col: usize, value: R::Element) -> Result<()> {
        check_index(row, self.rows.len())?;
        self.rows[row].set_entry(col, value)
    }

    /// Swaps two rows in O(1).
    ///
    /// # Errors
    ///
    /// Returns a domain error if either row is out of range.
    pub fn swap_rows(&mut self, i: usize, j: usize) -> Result<()> {
        check_index(i, self.rows.len())?;
        check_index(j, self.rows.len())?;
        self.rows.swap(i, j);
        Ok(())
    }

    /// Moves row `i` to position `perm[i]` in place.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `perm` is not a permutation of the rows.
    pub fn permute_rows(&mut self, perm: &[usize]) -> Result<()> {
        let inverse = invert_permutation(perm, self.rows.len())?;
        let mut old: Vec<Option<SparseVector<'a, R>>> =
            std::mem::take(&mut self.rows).into_iter().map(Some).collect();
        self.rows = inverse
            .iter()
            .map(|&source| {
                old[source]
                    .take()
                    .unwrap_or_else(|| SparseVector::new(self.ring, self.num_cols))
            })
            .collect();
        Ok(())
    }

    /// Returns the transpose.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut out = Self::new(self.ring, self.num_cols, self.rows.len());
        for (r, row) in self.rows.iter().enumerate() {
            for (c, v) in row.iter() {
                // Rows are visited in increasing order, so each target row
                // receives strictly increasing indices.
                out.rows[c].push_unchecked(r, v.clone());
            }
        }
        out
    }

    /// Drops every entry and releases the row storage; the shape is kept.
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.clear();
        }
    }

    /// Entrywise equality.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn equal(&self, other: &Self) -> Result<Truth> {
        check_shape(
            (self.num_rows(), self.num_cols),
            (other.num_rows(), other.num_cols),
        )?;
        let mut truth = Truth::True;
        for (a, b) in self.rows.iter().zip(&other.rows) {
            truth = truth.and(a.equal(b)?);
            if truth.is_false() {
                break;
            }
        }
        Ok(truth)
    }

    /// Borrows the submatrix `rows × cols` without copying.
    ///
    /// # Errors
    ///
    /// Returns a domain error if either range does not fit in the matrix.
    pub fn window(&self, rows: Range<usize>, cols: Range<usize>) -> Result<LilWindow<'_, 'a, R>> {
        if rows.start > rows.end || rows.end > self.rows.len() {
            return Err(LinalgError::IndexOutOfRange {
                index: rows.end,
                len: self.rows.len(),
            });
        }
        if cols.start > cols.end || cols.end > self.num_cols {
            return Err(LinalgError::IndexOutOfRange {
                index: cols.end,
                len: self.num_cols,
            });
        }
        Ok(LilWindow {
            matrix: self,
            rows,
            cols,
        })
    }
}

/// A borrowed rectangular view into a [`LilMatrix`].
///
/// Indices passed to and returned from the view are relative to its
/// top-left corner.
#[derive(Debug)]
pub struct LilWindow<'w, 'a, R: Ring> {
    matrix: &'w LilMatrix<'a, R>,
    rows: Range<usize>,
    cols: Range<usize>,
}

impl<'a, R: Ring> LilWindow<'_, 'a, R> {
    /// Returns the number of rows in the view.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of columns in the view.
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.cols.len()
    }

    /// Returns the entry at a position relative to the view.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the position lies outside the view.
    pub fn get_entry(&self, row: usize, col: usize) -> Result<R::Element> {
        check_index(row, self.num_rows())?;
        check_index(col, self.num_cols())?;
        self.matrix
            .get_entry(self.rows.start + row, self.cols.start + col)
    }

    /// Stored entries of one row of the view, with relative column indices.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `row` lies outside the view.
    pub fn row_entries(&self, row: usize) -> Result<impl Iterator<Item = (usize, &R::Element)>> {
        check_index(row, self.num_rows())?;
        let source = &self.matrix.rows[self.rows.start + row];
        let lo = source.indices().partition_point(|&c| c < self.cols.start);
        let hi = source.indices().partition_point(|&c| c < self.cols.end);
        let offset = self.cols.start;
        Ok(source.indices()[lo..hi]
            .iter()
            .zip(&source.values()[lo..hi])
            .map(move |(&c, v)| (c - offset, v)))
    }

    /// Copies the view into a standalone matrix.
    #[must_use]
    pub fn to_lil(&self) -> LilMatrix<'a, R> {
        let ring = self.matrix.ring;
        let rows = self.matrix.rows[self.rows.clone()]
            .iter()
            .map(|row| {
                row.slice(self.cols.clone())
                    .unwrap_or_else(|_| SparseVector::new(ring, self.cols.len()))
            })
            .collect();
        LilMatrix {
            ring,
            num_cols: self.cols.len(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tertius_rings::PrimeField;

    fn sample(f: &PrimeField) -> LilMatrix<'_, PrimeField> {
        // [[1, 0, 2, 0],
        //  [0, 3, 0, 4],
        //  [5, 0, 0, 6]]
        let mut m = LilMatrix::new(f, 3, 4);
        for &(r, c, v) in &[(0, 0, 1), (0, 2, 2), (1, 1, 3), (1, 3, 4), (2, 0, 5), (2, 3, 6)] {
            m.set_entry(r, c, v).unwrap();
        }
        m
    }

    #[test]
    fn test_set_get() {
        let f = PrimeField::new(101);
        let m = sample(&f);
        assert_eq!(m.nnz(), 6);
        assert_eq!(m.get_entry(1, 3).unwrap(), 4);
        assert_eq!(m.get_entry(2, 1).unwrap(), 0);
        assert_eq!(m.get_entry(3, 0).unwrap_err().kind(), ErrorKind::Domain);
    }

    #[test]
    fn test_swap_rows() {
        let f = PrimeField::new(101);
        let mut m = sample(&f);
        m.swap_rows(0, 2).unwrap();
        assert_eq!(m.get_entry(0, 0).unwrap(), 5);
        assert_eq!(m.get_entry(2, 2).unwrap(), 2);
        assert!(m.swap_rows(0, 3).is_err());
    }

    #[test]
    fn test_permute_rows() {
        let f = PrimeField::new(101);
        let mut m = sample(&f);
        m.permute_rows(&[1, 2, 0]).unwrap();
        assert_eq!(m.row(1).indices(), &[0, 2]);
        assert_eq!(m.row(2).indices(), &[1, 3]);
        assert_eq!(m.row(0).indices(), &[0, 3]);
    }

    #[test]
    fn test_transpose() {
        let f = PrimeField::new(101);
        let m = sample(&f);
        let t = m.transpose();
        assert_eq!(t.num_rows(), 4);
        assert_eq!(t.num_cols(), 3);
        assert_eq!(t.get_entry(3, 2).unwrap(), 6);
        assert_eq!(t.row(0).indices(), &[0, 2]);
        assert!(t.transpose().equal(&m).unwrap().is_true());
    }

    #[test]
    fn test_window() {
        let f = PrimeField::new(101);
        let m = sample(&f);
        let w = m.window(1..3, 1..4).unwrap();

        assert_eq!(w.num_rows(), 2);
        assert_eq!(w.num_cols(), 3);
        assert_eq!(w.get_entry(0, 0).unwrap(), 3);
        assert_eq!(w.get_entry(1, 2).unwrap(), 6);
        assert!(w.get_entry(2, 0).is_err());

        let entries: Vec<_> = w.row_entries(0).unwrap().map(|(c, v)| (c, *v)).collect();
        assert_eq!(entries, vec![(0, 3), (2, 4)]);

        let copy = w.to_lil();
        assert_eq!(copy.num_rows(), 2);
        assert_eq!(copy.row(1).indices(), &[2]);
        assert!(m.window(0..4, 0..1).is_err());
    }

    #[test]
    fn test_identity() {
        let f = PrimeField::new(3);
        let id = LilMatrix::identity(&f, 4);
        assert_eq!(id.nnz(), 4);
        assert_eq!(id.get_entry(3, 3).unwrap(), 1);
    }
}
