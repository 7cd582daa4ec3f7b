//! Dense matrices over a ring context.
//!
//! Dense matrices carry the small block coefficient matrices of the block
//! Krylov solvers and hold kernel bases. Their elimination also gives an
//! independent rank against which the sparse decompositions are checked.

use std::fmt;
use std::ops::{Index, IndexMut};

use rand::Rng;

use tertius_rings::{Ring, Truth};

use crate::error::{check_shape, LinalgError, Result};

/// Dense matrix stored in row-major order.
pub struct DenseMatrix<'a, R: Ring> {
    ring: &'a R,
    /// Matrix entries in row-major order.
    data: Vec<R::Element>,
    /// Number of rows.
    num_rows: usize,
    /// Number of columns.
    num_cols: usize,
}

impl<R: Ring> Clone for DenseMatrix<'_, R> {
    fn clone(&self) -> Self {
        Self {
            ring: self.ring,
            data: self.data.clone(),
            num_rows: self.num_rows,
            num_cols: self.num_cols,
        }
    }
}

impl<R: Ring> fmt::Debug for DenseMatrix<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<_> = (0..self.num_rows).map(|i| self.row(i)).collect();
        f.debug_struct("DenseMatrix")
            .field("num_rows", &self.num_rows)
            .field("num_cols", &self.num_cols)
            .field("rows", &rows)
            .finish()
    }
}

impl<'a, R: Ring> DenseMatrix<'a, R> {
    /// Creates a new matrix filled with zeros.
    #[must_use]
    pub fn zeros(ring: &'a R, num_rows: usize, num_cols: usize) -> Self {
        Self {
            ring,
            data: vec![ring.zero(); num_rows * num_cols],
            num_rows,
            num_cols,
        }
    }

    /// Creates an identity matrix.
    #[must_use]
    pub fn identity(ring: &'a R, n: usize) -> Self {
        let mut m = Self::zeros(ring, n, n);
        for i in 0..n {
            m[(i, i)] = ring.one();
        }
        m
    }

    /// Creates a matrix with uniformly random entries.
    pub fn random<G: Rng + ?Sized>(
        ring: &'a R,
        num_rows: usize,
        num_cols: usize,
        rng: &mut G,
    ) -> Self {
        Self {
            ring,
            data: (0..num_rows * num_cols).map(|_| ring.random(rng)).collect(),
            num_rows,
            num_cols,
        }
    }

    /// Creates a matrix from a list of rows.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the rows have different lengths.
    pub fn from_rows(ring: &'a R, rows: Vec<Vec<R::Element>>) -> Result<Self> {
        let num_rows = rows.len();
        let num_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(num_rows * num_cols);
        for row in rows {
            check_shape((1, num_cols), (1, row.len()))?;
            data.extend(row);
        }
        Ok(Self {
            ring,
            data,
            num_rows,
            num_cols,
        })
    }

    /// Creates a matrix whose columns are the given vectors.
    ///
    /// # Errors
    ///
    /// Returns a domain error if a column does not have `num_rows` entries.
    pub fn from_cols(ring: &'a R, num_rows: usize, cols: &[Vec<R::Element>]) -> Result<Self> {
        let mut m = Self::zeros(ring, num_rows, cols.len());
        for (j, col) in cols.iter().enumerate() {
            m.set_col(j, col)?;
        }
        Ok(m)
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

    /// Returns a slice of the specified row.
    #[must_use]
    pub fn row(&self, row: usize) -> &[R::Element] {
        let start = row * self.num_cols;
        &self.data[start..start + self.num_cols]
    }

    /// Returns a mutable slice of the specified row.
    pub fn row_mut(&mut self, row: usize) -> &mut [R::Element] {
        let start = row * self.num_cols;
        &mut self.data[start..start + self.num_cols]
    }

    /// Returns a column as a vector.
    #[must_use]
    pub fn col(&self, col: usize) -> Vec<R::Element> {
        (0..self.num_rows)
            .map(|row| self[(row, col)].clone())
            .collect()
    }

    /// Sets a column from a slice.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `values` does not have `num_rows` entries.
    pub fn set_col(&mut self, col: usize, values: &[R::Element]) -> Result<()> {
        check_shape((self.num_rows, 1), (values.len(), 1))?;
        for (row, val) in values.iter().enumerate() {
            self[(row, col)] = val.clone();
        }
        Ok(())
    }

    /// Returns true if every entry is provably zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|x| self.ring.is_zero(x).is_true())
    }

    /// Entrywise equality.
    #[must_use]
    pub fn equal(&self, other: &Self) -> Truth {
        if self.num_rows != other.num_rows || self.num_cols != other.num_cols {
            return Truth::False;
        }
        self.data
            .iter()
            .zip(&other.data)
            .fold(Truth::True, |acc, (a, b)| acc.and(self.ring.equal(a, b)))
    }

    /// Matrix-vector multiply: y = A * x.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `x` does not have `num_cols` entries.
    pub fn mv(&self, x: &[R::Element]) -> Result<Vec<R::Element>> {
        check_shape((self.num_cols, 1), (x.len(), 1))?;
        let ring = self.ring;
        Ok((0..self.num_rows)
            .map(|row| {
                let mut acc = ring.zero();
                for (a, b) in self.row(row).iter().zip(x) {
                    ring.addmul(&mut acc, a, b);
                }
                acc
            })
            .collect())
    }

    /// Matrix-matrix multiply: C = A * B.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the inner dimensions differ.
    pub fn mm(&self, other: &Self) -> Result<Self> {
        if self.num_cols != other.num_rows {
            return Err(LinalgError::ShapeMismatch {
                expected: (self.num_cols, other.num_cols),
                found: (other.num_rows, other.num_cols),
            });
        }

        let ring = self.ring;
        let mut result = Self::zeros(ring, self.num_rows, other.num_cols);
        for i in 0..self.num_rows {
            for k in 0..self.num_cols {
                let a = &self[(i, k)];
                if ring.is_zero(a).is_true() {
                    continue;
                }
                for j in 0..other.num_cols {
                    let mut acc = result[(i, j)].clone();
                    ring.addmul(&mut acc, a, &other[(k, j)]);
                    result[(i, j)] = acc;
                }
            }
        }
        Ok(result)
    }

    /// Returns the transpose of the matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut result = Self::zeros(self.ring, self.num_cols, self.num_rows);
        for i in 0..self.num_rows {
            for j in 0..self.num_cols {
                result[(j, i)] = self[(i, j)].clone();
            }
        }
        result
    }

    fn zip_with(
        &self,
        other: &Self,
        f: impl Fn(&R::Element, &R::Element) -> R::Element,
    ) -> Result<Self> {
        check_shape(
            (self.num_rows, self.num_cols),
            (other.num_rows, other.num_cols),
        )?;
        Ok(Self {
            ring: self.ring,
            data: self.data.iter().zip(&other.data).map(|(a, b)| f(a, b)).collect(),
            num_rows: self.num_rows,
            num_cols: self.num_cols,
        })
    }

    /// Entrywise sum.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| self.ring.add(a, b))
    }

    /// Entrywise difference.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the shapes differ.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| self.ring.sub(a, b))
    }

    /// Negates every entry.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            ring: self.ring,
            data: self.data.iter().map(|v| self.ring.neg(v)).collect(),
            num_rows: self.num_rows,
            num_cols: self.num_cols,
        }
    }

    /// Swaps two rows in-place.
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let i_start = i * self.num_cols;
        let j_start = j * self.num_cols;
        for k in 0..self.num_cols {
            self.data.swap(i_start + k, j_start + k);
        }
    }

    /// Adds a scaled row to another: row[target] += scale * row[source].
    pub fn add_scaled_row(&mut self, target: usize, source: usize, scale: &R::Element) {
        let ring = self.ring;
        for k in 0..self.num_cols {
            let src = self[(source, k)].clone();
            ring.addmul(&mut self[(target, k)], scale, &src);
        }
    }

    /// Scales a row by a scalar.
    pub fn scale_row(&mut self, row: usize, scale: &R::Element) {
        let ring = self.ring;
        for v in self.row_mut(row) {
            *v = ring.mul(v, scale);
        }
    }

    /// Reduced row echelon form by Gauss-Jordan elimination.
    ///
    /// Pivots must be units of the ring; a column with no invertible entry
    /// below the current pivot row is treated as free. Over a field this is
    /// the usual reduced row echelon form.
    ///
    /// Returns (reduced matrix, pivot columns).
    #[must_use]
    pub fn rref(&self) -> (Self, Vec<usize>) {
        let ring = self.ring;
        let mut m = self.clone();
        let mut pivots = Vec::new();
        let mut pivot_row = 0;

        for pivot_col in 0..m.num_cols {
            if pivot_row == m.num_rows {
                break;
            }

            // Find the first invertible entry in the column
            let found = (pivot_row..m.num_rows)
                .find_map(|row| ring.inv(&m[(row, pivot_col)]).ok().map(|inv| (row, inv)));
            let Some((row, inv)) = found else {
                continue;
            };

            m.swap_rows(pivot_row, row);
            m.scale_row(pivot_row, &inv);

            for other in 0..m.num_rows {
                if other != pivot_row && !ring.is_zero(&m[(other, pivot_col)]).is_true() {
                    let factor = ring.neg(&m[(other, pivot_col)]);
                    m.add_scaled_row(other, pivot_row, &factor);
                }
            }

            pivots.push(pivot_col);
            pivot_row += 1;
        }

        (m, pivots)
    }

    /// Rank over a field.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.rref().1.len()
    }
}

impl<R: Ring> Index<(usize, usize)> for DenseMatrix<'_, R> {
    type Output = R::Element;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[row * self.num_cols + col]
    }
}

impl<R: Ring> IndexMut<(usize, usize)> for DenseMatrix<'_, R> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.data[row * self.num_cols + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tertius_rings::{Integers, PrimeField};

    #[test]
    fn test_zeros_identity() {
        let f7 = PrimeField::new(7);
        let m = DenseMatrix::zeros(&f7, 3, 4);
        assert_eq!(m.num_rows(), 3);
        assert_eq!(m.num_cols(), 4);
        assert!(m.is_zero());

        let id = DenseMatrix::identity(&f7, 3);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(id[(i, j)], u64::from(i == j));
            }
        }
    }

    #[test]
    fn test_mv() {
        let zz = Integers;
        let m = DenseMatrix::from_rows(
            &zz,
            vec![
                [1, 2, 3].map(|n| zz.from_i64(n)).to_vec(),
                [4, 5, 6].map(|n| zz.from_i64(n)).to_vec(),
            ],
        )
        .unwrap();
        let x = [1, 2, 3].map(|n| zz.from_i64(n));
        let y = m.mv(&x).unwrap();
        // [1*1 + 2*2 + 3*3, 4*1 + 5*2 + 6*3] = [14, 32]
        assert_eq!(y, [14, 32].map(|n| zz.from_i64(n)).to_vec());
        assert!(m.mv(&x[..2]).is_err());
    }

    #[test]
    fn test_mm() {
        let f = PrimeField::new(101);
        let a = DenseMatrix::from_rows(&f, vec![vec![1, 2], vec![3, 4]]).unwrap();
        let b = DenseMatrix::from_rows(&f, vec![vec![5, 6], vec![7, 8]]).unwrap();
        let c = a.mm(&b).unwrap();
        // [[19, 22], [43, 50]]
        assert_eq!(c.row(0), &[19, 22]);
        assert_eq!(c.row(1), &[43, 50]);
    }

    #[test]
    fn test_transpose() {
        let f = PrimeField::new(101);
        let m = DenseMatrix::from_rows(&f, vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        let t = m.transpose();
        assert_eq!(t.num_rows(), 3);
        assert_eq!(t.num_cols(), 2);
        assert_eq!(t[(1, 0)], 2);
        assert_eq!(t[(2, 1)], 6);
    }

    #[test]
    fn test_ragged_rows() {
        let f = PrimeField::new(101);
        assert!(DenseMatrix::from_rows(&f, vec![vec![1, 2], vec![3]]).is_err());
    }

    #[test]
    fn test_rref_pivots() {
        let f = PrimeField::new(7);
        let m = DenseMatrix::from_rows(&f, vec![vec![0, 2, 4], vec![0, 1, 2], vec![1, 0, 1]])
            .unwrap();
        let (r, pivots) = m.rref();
        assert_eq!(pivots, vec![0, 1]);
        assert_eq!(r.row(0), &[1, 0, 1]);
        assert_eq!(r.row(1), &[0, 1, 2]);
        assert_eq!(r.row(2), &[0, 0, 0]);
    }
}
