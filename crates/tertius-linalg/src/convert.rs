//! Conversions between the sparse formats and dense matrices.
//!
//! Every format converts to every other. Conversions out of COO work on a
//! canonical copy, so repeated positions are summed first.

use std::borrow::Cow;

use tertius_rings::Ring;

use crate::coo::CooMatrix;
use crate::csr::CsrMatrix;
use crate::dense_matrix::DenseMatrix;
use crate::lil::LilMatrix;
use crate::sparse_vec::SparseVector;

impl<'a, R: Ring> CsrMatrix<'a, R> {
    /// Creates a sparse matrix from a dense matrix, dropping zeros.
    #[must_use]
    pub fn from_dense(dense: &DenseMatrix<'a, R>) -> Self {
        let ring = dense.ring();
        let mut values = Vec::new();
        let mut col_indices = Vec::new();
        let mut row_ptrs = Vec::with_capacity(dense.num_rows() + 1);
        row_ptrs.push(0);

        for row in 0..dense.num_rows() {
            for (col, val) in dense.row(row).iter().enumerate() {
                if !ring.is_zero(val).is_true() {
                    values.push(val.clone());
                    col_indices.push(col);
                }
            }
            row_ptrs.push(values.len());
        }

        Self::from_raw_parts(ring, dense.num_cols(), row_ptrs, col_indices, values)
    }

    /// Converts to dense matrix representation.
    #[must_use]
    pub fn to_dense(&self) -> DenseMatrix<'a, R> {
        let mut dense = DenseMatrix::zeros(self.ring(), self.num_rows(), self.num_cols());
        for row in 0..self.num_rows() {
            for (col, val) in self.row_iter(row) {
                dense[(row, col)] = val.clone();
            }
        }
        dense
    }

    /// Converts to list-of-rows format.
    #[must_use]
    pub fn to_lil(&self) -> LilMatrix<'a, R> {
        let ring = self.ring();
        let rows = (0..self.num_rows())
            .map(|i| {
                let (cols, vals) = self.row(i);
                SparseVector::from_sorted_parts(ring, self.num_cols(), cols.to_vec(), vals.to_vec())
            })
            .collect();
        LilMatrix::from_rows_unchecked(ring, self.num_cols(), rows)
    }

    /// Converts to canonical coordinate format.
    #[must_use]
    pub fn to_coo(&self) -> CooMatrix<'a, R> {
        let mut keys = Vec::with_capacity(self.nnz());
        for row in 0..self.num_rows() {
            for &col in self.row(row).0 {
                keys.push((row, col));
            }
        }
        CooMatrix::from_canonical_parts(
            self.ring(),
            self.num_rows(),
            self.num_cols(),
            keys,
            self.values().to_vec(),
        )
    }
}

impl<'a, R: Ring> LilMatrix<'a, R> {
    /// Creates a sparse matrix from a dense matrix, dropping zeros.
    #[must_use]
    pub fn from_dense(dense: &DenseMatrix<'a, R>) -> Self {
        let ring = dense.ring();
        let rows = (0..dense.num_rows())
            .map(|i| SparseVector::from_dense(ring, dense.row(i)))
            .collect();
        Self::from_rows_unchecked(ring, dense.num_cols(), rows)
    }

    /// Converts to dense matrix representation.
    #[must_use]
    pub fn to_dense(&self) -> DenseMatrix<'a, R> {
        let mut dense = DenseMatrix::zeros(self.ring(), self.num_rows(), self.num_cols());
        for (r, row) in self.rows().iter().enumerate() {
            for (c, v) in row.iter() {
                dense[(r, c)] = v.clone();
            }
        }
        dense
    }

    /// Converts to compressed sparse row format.
    #[must_use]
    pub fn to_csr(&self) -> CsrMatrix<'a, R> {
        let mut values = Vec::with_capacity(self.nnz());
        let mut col_indices = Vec::with_capacity(self.nnz());
        let mut row_ptrs = Vec::with_capacity(self.num_rows() + 1);
        row_ptrs.push(0);
        for row in self.rows() {
            col_indices.extend_from_slice(row.indices());
            values.extend_from_slice(row.values());
            row_ptrs.push(values.len());
        }
        CsrMatrix::from_raw_parts(self.ring(), self.num_cols(), row_ptrs, col_indices, values)
    }

    /// Converts to canonical coordinate format.
    #[must_use]
    pub fn to_coo(&self) -> CooMatrix<'a, R> {
        let mut keys = Vec::with_capacity(self.nnz());
        let mut values = Vec::with_capacity(self.nnz());
        for (r, row) in self.rows().iter().enumerate() {
            for (c, v) in row.iter() {
                keys.push((r, c));
                values.push(v.clone());
            }
        }
        CooMatrix::from_canonical_parts(self.ring(), self.num_rows(), self.num_cols(), keys, values)
    }
}

impl<'a, R: Ring> CooMatrix<'a, R> {
    /// Creates a canonical matrix from a dense matrix, dropping zeros.
    #[must_use]
    pub fn from_dense(dense: &DenseMatrix<'a, R>) -> Self {
        CsrMatrix::from_dense(dense).to_coo()
    }

    fn canonical_view(&self) -> Cow<'_, Self> {
        if self.is_canonical() {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(self.canonical())
        }
    }

    /// Converts to dense matrix representation.
    #[must_use]
    pub fn to_dense(&self) -> DenseMatrix<'a, R> {
        let canonical = self.canonical_view();
        let mut dense = DenseMatrix::zeros(self.ring(), self.num_rows(), self.num_cols());
        for (r, c, v) in canonical.iter() {
            dense[(r, c)] = v.clone();
        }
        dense
    }

    /// Converts to compressed sparse row format.
    #[must_use]
    pub fn to_csr(&self) -> CsrMatrix<'a, R> {
        let canonical = self.canonical_view();
        let mut row_ptrs = vec![0usize; self.num_rows() + 1];
        let mut col_indices = Vec::with_capacity(canonical.nnz());
        for (r, c, _) in canonical.iter() {
            row_ptrs[r + 1] += 1;
            col_indices.push(c);
        }
        for r in 0..self.num_rows() {
            row_ptrs[r + 1] += row_ptrs[r];
        }
        CsrMatrix::from_raw_parts(
            self.ring(),
            self.num_cols(),
            row_ptrs,
            col_indices,
            canonical.values().to_vec(),
        )
    }

    /// Converts to list-of-rows format.
    #[must_use]
    pub fn to_lil(&self) -> LilMatrix<'a, R> {
        let canonical = self.canonical_view();
        let mut lil = LilMatrix::new(self.ring(), self.num_rows(), self.num_cols());
        for (r, c, v) in canonical.iter() {
            lil.row_mut(r).push_unchecked(c, v.clone());
        }
        lil
    }
}
