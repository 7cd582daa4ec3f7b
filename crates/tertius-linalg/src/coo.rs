//! Sparse matrix in coordinate (COO) format.
//!
//! A COO matrix is a log of `(row, col, value)` triplets. Until it is
//! canonicalized the log may be in any order and may repeat a position, in
//! which case the repeated values add up. A canonical matrix is sorted by
//! `(row, col)`, has at most one entry per position and stores no zero.

use std::fmt;

use tertius_rings::{Ring, Truth};

use crate::error::{check_index, check_shape, LinalgError, Result};
use crate::merge::{riffle, Merged};

/// Sparse matrix stored as parallel row, column and value arrays.
pub struct CooMatrix<'a, R: Ring> {
    ring: &'a R,
    num_rows: usize,
    num_cols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<R::Element>,
    is_canonical: bool,
}

impl<R: Ring> Clone for CooMatrix<'_, R> {
    fn clone(&self) -> Self {
        Self {
            ring: self.ring,
            num_rows: self.num_rows,
            num_cols: self.num_cols,
            rows: self.rows.clone(),
            cols: self.cols.clone(),
            values: self.values.clone(),
            is_canonical: self.is_canonical,
        }
    }
}

impl<R: Ring> fmt::Debug for CooMatrix<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CooMatrix")
            .field("num_rows", &self.num_rows)
            .field("num_cols", &self.num_cols)
            .field("is_canonical", &self.is_canonical)
            .field("entries", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<'a, R: Ring> CooMatrix<'a, R> {
    /// Creates the zero matrix.
    #[must_use]
    pub fn new(ring: &'a R, num_rows: usize, num_cols: usize) -> Self {
        Self {
            ring,
            num_rows,
            num_cols,
            rows: Vec::new(),
            cols: Vec::new(),
            values: Vec::new(),
            is_canonical: true,
        }
    }

    /// Creates an identity matrix of size n×n.
    #[must_use]
    pub fn identity(ring: &'a R, n: usize) -> Self {
        let mut m = Self::new(ring, n, n);
        if !ring.is_zero(&ring.one()).is_true() {
            m.rows = (0..n).collect();
            m.cols = (0..n).collect();
            m.values = (0..n).map(|_| ring.one()).collect();
        }
        m
    }

    /// Builds a matrix from parallel triplet arrays.
    ///
    /// With `is_canonical` set the triplets must be strictly increasing in
    /// `(row, col)`; zero values are still dropped. Otherwise any order and
    /// repeated positions are accepted.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the arrays differ in length, an index is
    /// out of range, or canonical input is out of order.
    pub fn from_entries(
        ring: &'a R,
        num_rows: usize,
        num_cols: usize,
        rows: Vec<usize>,
        cols: Vec<usize>,
        values: Vec<R::Element>,
        is_canonical: bool,
    ) -> Result<Self> {
        check_shape((rows.len(), 1), (cols.len(), 1))?;
        check_shape((rows.len(), 1), (values.len(), 1))?;
        for (&r, &c) in rows.iter().zip(&cols) {
            check_index(r, num_rows)?;
            check_index(c, num_cols)?;
        }

        let mut m = Self {
            ring,
            num_rows,
            num_cols,
            rows,
            cols,
            values,
            is_canonical,
        };

        if is_canonical {
            let ordered = m
                .rows
                .windows(2)
                .zip(m.cols.windows(2))
                .all(|(r, c)| (r[0], c[0]) < (r[1], c[1]));
            if !ordered {
                return Err(LinalgError::InvalidArgument(
                    "canonical triplets must be strictly increasing",
                ));
            }
            m.drop_zeros();
        }

        Ok(m)
    }

    fn drop_zeros(&mut self) {
        let ring = self.ring;
        let mut keep = 0;
        for i in 0..self.values.len() {
            if !ring.is_zero(&self.values[i]).is_true() {
                self.rows.swap(keep, i);
                self.cols.swap(keep, i);
                self.values.swap(keep, i);
                keep += 1;
            }
        }
        self.rows.truncate(keep);
        self.cols.truncate(keep);
        self.values.truncate(keep);
    }

    /// Returns the ring context.
    #[must_use]
    pub fn ring(&self) -> &'a R {
        self.ring
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Number of stored triplets, counting repeats.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Whether the triplets are sorted, unique and zero-free.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.is_canonical
    }

    /// Iterates over stored triplets in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &R::Element)> + '_ {
        self.rows
            .iter()
            .zip(&self.cols)
            .zip(&self.values)
            .map(|((&r, &c), v)| (r, c, v))
    }

    /// Appends a triplet; the matrix is no longer canonical.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the position is out of range.
    pub fn push_entry(&mut self, row: usize, col: usize, value: R::Element) -> Result<()> {
        check_index(row, self.num_rows)?;
        check_index(col, self.num_cols)?;
        self.rows.push(row);
        self.cols.push(col);
        self.values.push(value);
        self.is_canonical = false;
        Ok(())
    }

    /// Sets the entry at (row, col), replacing every stored triplet at that
    /// position. The matrix is canonicalized first and stays canonical.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the position is out of range.
    pub fn set_entry(&mut self, row: usize, col: usize, value: R::Element) -> Result<()> {
        check_index(row, self.num_rows)?;
        check_index(col, self.num_cols)?;
        self.canonicalize();

        let zero = self.ring.is_zero(&value).is_true();
        match self.search(row, col) {
            Ok(pos) if zero => {
                self.rows.remove(pos);
                self.cols.remove(pos);
                self.values.remove(pos);
            }
            Ok(pos) => self.values[pos] = value,
            Err(_) if zero => {}
            Err(pos) => {
                self.rows.insert(pos, row);
                self.cols.insert(pos, col);
                self.values.insert(pos, value);
            }
        }
        Ok(())
    }

    /// Binary search in canonical storage.
    fn search(&self, row: usize, col: usize) -> std::result::Result<usize, usize> {
        debug_assert!(self.is_canonical);
        let lo = self.rows.partition_point(|&r| r < row);
        let hi = lo + self.rows[lo..].partition_point(|&r| r == row);
        match self.cols[lo..hi].binary_search(&col) {
            Ok(pos) => Ok(lo + pos),
            Err(pos) => Err(lo + pos),
        }
    }

    /// Returns the value at (row, col).
    ///
    /// Canonical storage is binary searched; otherwise every triplet at the
    /// position is summed in one linear scan.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the position is out of range.
    pub fn get_entry(&self, row: usize, col: usize) -> Result<R::Element> {
        check_index(row, self.num_rows)?;
        check_index(col, self.num_cols)?;
        let ring = self.ring;

        if self.is_canonical {
            return Ok(self
                .search(row, col)
                .map_or_else(|_| ring.zero(), |pos| self.values[pos].clone()));
        }

        let mut acc = ring.zero();
        for (r, c, v) in self.iter() {
            if r == row && c == col {
                acc = ring.add(&acc, v);
            }
        }
        Ok(acc)
    }

    /// Sorts the triplets by `(row, col)`, sums repeated positions and drops
    /// zeros. Repeated values are summed in insertion order.
    pub fn canonicalize(&mut self) {
        if self.is_canonical {
            return;
        }
        let ring = self.ring;

        let mut order: Vec<usize> = (0..self.values.len()).collect();
        order.sort_by_key(|&i| (self.rows[i], self.cols[i]));

        let mut slots: Vec<Option<R::Element>> =
            std::mem::take(&mut self.values).into_iter().map(Some).collect();
        let mut rows = Vec::with_capacity(order.len());
        let mut cols = Vec::with_capacity(order.len());
        let mut values = Vec::with_capacity(order.len());

        let mut k = 0;
        while k < order.len() {
            let (r, c) = (self.rows[order[k]], self.cols[order[k]]);
            let mut acc: Option<R::Element> = None;
            while k < order.len() && (self.rows[order[k]], self.cols[order[k]]) == (r, c) {
                if let Some(v) = slots[order[k]].take() {
                    acc = Some(match acc {
                        Some(a) => ring.add(&a, &v),
                        None => v,
                    });
                }
                k += 1;
            }
            if let Some(v) = acc {
                if !ring.is_zero(&v).is_true() {
                    rows.push(r);
                    cols.push(c);
                    values.push(v);
                }
            }
        }

        self.rows = rows;
        self.cols = cols;
        self.values = values;
        self.is_canonical = true;
    }

    /// Returns a canonical copy.
    #[must_use]
    pub fn canonical(&self) -> Self {
        let mut m = self.clone();
        m.canonicalize();
        m
    }

    /// Returns the transpose, canonical if `self` is.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut t = Self {
            ring: self.ring,
            num_rows: self.num_cols,
            num_cols: self.num_rows,
            rows: self.cols.clone(),
            cols: self.rows.clone(),
            values: self.values.clone(),
            is_canonical: false,
        };
        if self.is_canonical {
            t.canonicalize();
        }
        t
    }

    /// Drops every triplet and releases the storage; the shape is kept.
    pub fn clear(&mut self) {
        self.rows = Vec::new();
        self.cols = Vec::new();
        self.values = Vec::new();
        self.is_canonical = true;
    }

    /// Position keys of canonical storage, for merging.
    pub(crate) fn keys(&self) -> Vec<(usize, usize)> {
        self.rows.iter().copied().zip(self.cols.iter().copied()).collect()
    }

    pub(crate) fn values(&self) -> &[R::Element] {
        &self.values
    }

    /// Applies `f` to every stored value in place of position. Canonical
    /// storage stays canonical: values mapped to zero are dropped.
    pub(crate) fn try_map_values<E>(
        &self,
        f: impl FnMut(&R::Element) -> std::result::Result<R::Element, E>,
    ) -> std::result::Result<Self, E> {
        let values = self
            .values
            .iter()
            .map(f)
            .collect::<std::result::Result<Vec<_>, E>>()?;
        let mut out = Self {
            ring: self.ring,
            num_rows: self.num_rows,
            num_cols: self.num_cols,
            rows: self.rows.clone(),
            cols: self.cols.clone(),
            values,
            is_canonical: self.is_canonical,
        };
        if out.is_canonical {
            out.drop_zeros();
        }
        Ok(out)
    }

    /// Assembles a matrix from canonical parts.
    pub(crate) fn from_canonical_parts(
        ring: &'a R,
        num_rows: usize,
        num_cols: usize,
        keys: Vec<(usize, usize)>,
        values: Vec<R::Element>,
    ) -> Self {
        let (rows, cols) = keys.into_iter().unzip();
        Self {
            ring,
            num_rows,
            num_cols,
            rows,
            cols,
            values,
            is_canonical: true,
        }
    }

    /// Equality as matrices, independent of triplet order and repeats.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn equal(&self, other: &Self) -> Result<Truth> {
        check_shape(
            (self.num_rows, self.num_cols),
            (other.num_rows, other.num_cols),
        )?;
        let lhs = self.canonical();
        let rhs = other.canonical();
        let (lk, rk) = (lhs.keys(), rhs.keys());
        let ring = self.ring;

        let mut truth = Truth::True;
        for (_, entry) in riffle((&lk[..], lhs.values()), (&rk[..], rhs.values())) {
            let t = match entry {
                Merged::Left(a) => ring.is_zero(a),
                Merged::Right(b) => ring.is_zero(b),
                Merged::Both(a, b) => ring.equal(a, b),
            };
            truth = truth.and(t);
            if truth.is_false() {
                break;
            }
        }
        Ok(truth)
    }
}
