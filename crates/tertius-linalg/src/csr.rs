//! Sparse matrix in Compressed Sparse Row (CSR) format.
//!
//! CSR format is optimal for row-wise access patterns, which are common in:
//! - Sparse matrix-vector multiplication (SpMV)
//! - Iterative solvers (Lanczos, Wiedemann)
//! - Bulk read-only storage of a system

use std::fmt;

use tertius_rings::{Ring, Truth};

use crate::error::{check_index, check_shape, LinalgError, Result};
use crate::sparse_vec::SparseVector;

/// Sparse matrix in Compressed Sparse Row (CSR) format.
///
/// # Memory Layout
///
/// For an m×n matrix with nnz stored entries:
/// - `values`: Vec of nnz values
/// - `col_indices`: Vec of nnz column indices
/// - `row_ptrs`: Vec of m+1 row pointers
///
/// Row i contains entries from `row_ptrs[i]` to `row_ptrs[i+1]`, with
/// strictly increasing column indices and no provably zero value.
pub struct CsrMatrix<'a, R: Ring> {
    ring: &'a R,
    /// Stored values in row-major order.
    values: Vec<R::Element>,
    /// Column index for each stored value.
    col_indices: Vec<usize>,
    /// Row pointers: `row_ptrs[i]` is the index into values where row i starts.
    row_ptrs: Vec<usize>,
    /// Number of columns.
    num_cols: usize,
}

impl<R: Ring> Clone for CsrMatrix<'_, R> {
    fn clone(&self) -> Self {
        Self {
            ring: self.ring,
            values: self.values.clone(),
            col_indices: self.col_indices.clone(),
            row_ptrs: self.row_ptrs.clone(),
            num_cols: self.num_cols,
        }
    }
}

impl<R: Ring> fmt::Debug for CsrMatrix<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsrMatrix")
            .field("num_rows", &self.num_rows())
            .field("num_cols", &self.num_cols)
            .field("row_ptrs", &self.row_ptrs)
            .field("col_indices", &self.col_indices)
            .field("values", &self.values)
            .finish()
    }
}

impl<'a, R: Ring> CsrMatrix<'a, R> {
    /// Creates a new empty sparse matrix.
    #[must_use]
    pub fn new(ring: &'a R, num_rows: usize, num_cols: usize) -> Self {
        Self {
            ring,
            values: Vec::new(),
            col_indices: Vec::new(),
            row_ptrs: vec![0; num_rows + 1],
            num_cols,
        }
    }

    /// Creates an identity matrix of size n×n.
    #[must_use]
    pub fn identity(ring: &'a R, n: usize) -> Self {
        let mut m = Self::new(ring, n, n);
        if ring.is_zero(&ring.one()).is_true() {
            return m;
        }
        m.values = (0..n).map(|_| ring.one()).collect();
        m.col_indices = (0..n).collect();
        m.row_ptrs = (0..=n).collect();
        m
    }

    /// Creates a sparse matrix from triplets (row, col, value).
    ///
    /// Duplicate entries are summed and cancellations dropped.
    ///
    /// # Errors
    ///
    /// Returns a domain error if an index is out of range.
    pub fn from_triplets(
        ring: &'a R,
        num_rows: usize,
        num_cols: usize,
        triplets: &[(usize, usize, R::Element)],
    ) -> Result<Self> {
        let mut coo = crate::coo::CooMatrix::new(ring, num_rows, num_cols);
        for (r, c, v) in triplets {
            coo.push_entry(*r, *c, v.clone())?;
        }
        Ok(coo.to_csr())
    }

    /// Assembles a matrix from raw arrays already in canonical order.
    pub(crate) fn from_raw_parts(
        ring: &'a R,
        num_cols: usize,
        row_ptrs: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<R::Element>,
    ) -> Self {
        debug_assert_eq!(col_indices.len(), values.len());
        debug_assert_eq!(row_ptrs.last().copied(), Some(values.len()));
        Self {
            ring,
            values,
            col_indices,
            row_ptrs,
            num_cols,
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
        self.row_ptrs.len().saturating_sub(1)
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Returns the density (fraction of stored entries).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn density(&self) -> f64 {
        let total = self.num_rows() * self.num_cols;
        if total == 0 {
            0.0
        } else {
            self.nnz() as f64 / total as f64
        }
    }

    /// Checks if the matrix has no rows or no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0 || self.num_cols == 0
    }

    /// Raw row pointer array.
    #[must_use]
    pub fn row_ptrs(&self) -> &[usize] {
        &self.row_ptrs
    }

    /// Raw column index array.
    #[must_use]
    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// Raw value array.
    #[must_use]
    pub fn values(&self) -> &[R::Element] {
        &self.values
    }

    /// Column indices and values of one row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= num_rows`.
    #[must_use]
    pub fn row(&self, row: usize) -> (&[usize], &[R::Element]) {
        let start = self.row_ptrs[row];
        let end = self.row_ptrs[row + 1];
        (&self.col_indices[start..end], &self.values[start..end])
    }

    /// Returns an iterator over stored entries in a row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= num_rows`.
    pub fn row_iter(&self, row: usize) -> impl Iterator<Item = (usize, &R::Element)> {
        let (cols, vals) = self.row(row);
        cols.iter().copied().zip(vals)
    }

    /// Copies one row into a sparse vector.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `row` is out of range.
    pub fn row_vector(&self, row: usize) -> Result<SparseVector<'a, R>> {
        check_index(row, self.num_rows())?;
        let (cols, vals) = self.row(row);
        Ok(SparseVector::from_sorted_parts(
            self.ring,
            self.num_cols,
            cols.to_vec(),
            vals.to_vec(),
        ))
    }

    fn locate(&self, row: usize, col: usize) -> Result<std::result::Result<usize, usize>> {
        check_index(row, self.num_rows())?;
        check_index(col, self.num_cols)?;
        let start = self.row_ptrs[row];
        let end = self.row_ptrs[row + 1];
        Ok(match self.col_indices[start..end].binary_search(&col) {
            Ok(pos) => Ok(start + pos),
            Err(pos) => Err(start + pos),
        })
    }

    /// Returns the stored entry at (row, col), or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the position is out of range.
    pub fn find_entry(&self, row: usize, col: usize) -> Result<Option<&R::Element>> {
        Ok(self.locate(row, col)?.ok().map(|pos| &self.values[pos]))
    }

    /// Returns the entry at (row, col), zero if absent.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the position is out of range.
    pub fn get_entry(&self, row: usize, col: usize) -> Result<R::Element> {
        Ok(self
            .find_entry(row, col)?
            .cloned()
            .unwrap_or_else(|| self.ring.zero()))
    }

    /// Sets the entry at (row, col); a zero value removes it.
    ///
    /// Inserting or removing shifts the tail of the storage, so this is
    /// O(nnz) and meant for occasional edits.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the position is out of range.
    pub fn set_entry(&mut self, row: usize, col: usize, value: R::Element) -> Result<()> {
        let zero = self.ring.is_zero(&value).is_true();
        match self.locate(row, col)? {
            Ok(pos) if zero => {
                self.values.remove(pos);
                self.col_indices.remove(pos);
                for p in &mut self.row_ptrs[row + 1..] {
                    *p -= 1;
                }
            }
            Ok(pos) => self.values[pos] = value,
            Err(_) if zero => {}
            Err(pos) => {
                self.values.insert(pos, value);
                self.col_indices.insert(pos, col);
                for p in &mut self.row_ptrs[row + 1..] {
                    *p += 1;
                }
            }
        }
        Ok(())
    }

    /// Removes every entry and releases the storage; the shape is kept.
    pub fn clear(&mut self) {
        self.values = Vec::new();
        self.col_indices = Vec::new();
        self.row_ptrs = vec![0; self.row_ptrs.len()];
    }

    /// Returns the transpose of the matrix.
    ///
    /// Counting sort over columns, so the result is canonical in O(nnz).
    #[must_use]
    pub fn transpose(&self) -> Self {
        let num_rows = self.num_rows();
        let mut counts = vec![0usize; self.num_cols + 1];
        for &c in &self.col_indices {
            counts[c + 1] += 1;
        }
        for c in 0..self.num_cols {
            counts[c + 1] += counts[c];
        }
        let row_ptrs = counts.clone();

        let mut slots: Vec<Option<(usize, R::Element)>> = vec![None; self.nnz()];
        let mut next = counts;
        for row in 0..num_rows {
            for (col, val) in self.row_iter(row) {
                slots[next[col]] = Some((row, val.clone()));
                next[col] += 1;
            }
        }

        let (col_indices, values) = slots.into_iter().flatten().unzip();
        Self::from_raw_parts(self.ring, num_rows, row_ptrs, col_indices, values)
    }

    /// Moves row `i` to position `perm[i]`.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `perm` is not a permutation of the rows.
    pub fn permute_rows(&self, perm: &[usize]) -> Result<Self> {
        let num_rows = self.num_rows();
        let inverse = invert_permutation(perm, num_rows)?;

        let mut values = Vec::with_capacity(self.nnz());
        let mut col_indices = Vec::with_capacity(self.nnz());
        let mut row_ptrs = Vec::with_capacity(num_rows + 1);
        row_ptrs.push(0);
        for &source in &inverse {
            let (cols, vals) = self.row(source);
            col_indices.extend_from_slice(cols);
            values.extend_from_slice(vals);
            row_ptrs.push(values.len());
        }

        Ok(Self::from_raw_parts(
            self.ring,
            self.num_cols,
            row_ptrs,
            col_indices,
            values,
        ))
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
        for row in 0..self.num_rows() {
            let lhs = self.row_vector(row)?;
            let rhs = other.row_vector(row)?;
            truth = truth.and(lhs.equal(&rhs)?);
            if truth.is_false() {
                break;
            }
        }
        Ok(truth)
    }
}

/// Inverts `perm`, where `perm[i]` is the new position of item `i`.
///
/// # Errors
///
/// Returns a domain error if `perm` is not a permutation of `0..n`.
pub(crate) fn invert_permutation(perm: &[usize], n: usize) -> Result<Vec<usize>> {
    check_shape((n, 1), (perm.len(), 1))?;
    let mut inverse = vec![usize::MAX; n];
    for (i, &p) in perm.iter().enumerate() {
        check_index(p, n)?;
        if inverse[p] != usize::MAX {
            return Err(LinalgError::InvalidArgument("permutation is not injective"));
        }
        inverse[p] = i;
    }
    Ok(inverse)
}
