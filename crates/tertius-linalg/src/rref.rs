//! Sparse reduced row echelon form.
//!
//! Columns are processed left to right. Each pivot is taken from the
//! shortest unused row holding a unit in the column, and the column is then
//! cleared from every other row, above and below. A transposed view of the
//! working rows finds the rows to clear without scanning the matrix.

use tertius_rings::Ring;
use tracing::{debug, instrument, trace};

use crate::csr::CsrMatrix;
use crate::dense_matrix::DenseMatrix;
use crate::error::Result;
use crate::lil::LilMatrix;
use crate::lu::pivots_first;
use crate::sparse_vec::SparseVector;

/// Reduced row echelon form of a matrix.
#[derive(Debug)]
pub struct Rref<'a, R: Ring> {
    /// Number of pivots.
    pub rank: usize,
    /// Pivot column of each of the first `rank` rows, increasing.
    pub pivot_cols: Vec<usize>,
    /// The reduced matrix: pivot rows first, then zero rows.
    pub matrix: LilMatrix<'a, R>,
}

struct Reducer<'a, R: Ring> {
    rows: Vec<SparseVector<'a, R>>,
    cols: Vec<SparseVector<'a, R>>,
}

impl<'a, R: Ring> Reducer<'a, R> {
    fn replace_row(&mut self, r: usize, new: SparseVector<'a, R>) -> Result<()> {
        let old = std::mem::replace(&mut self.rows[r], new);
        let mut touched: Vec<usize> = old
            .indices()
            .iter()
            .chain(self.rows[r].indices())
            .copied()
            .collect();
        touched.sort_unstable();
        touched.dedup();
        for c in touched {
            let value = self.rows[r].get_entry(c)?;
            self.cols[c].set_entry(r, value)?;
        }
        Ok(())
    }
}

impl<'a, R: Ring> LilMatrix<'a, R> {
    /// Computes the reduced row echelon form.
    ///
    /// Outside fields a column whose unused rows hold no unit is left
    /// unreduced and counted as free.
    ///
    /// # Errors
    ///
    /// Returns an `Unable` error if a ring operation fails.
    #[instrument(skip_all, fields(rows = self.num_rows(), cols = self.num_cols(), nnz = self.nnz()))]
    pub fn rref(&self) -> Result<Rref<'a, R>> {
        let ring = self.ring();
        let (m, n) = (self.num_rows(), self.num_cols());
        let mut work = Reducer {
            rows: self.rows().to_vec(),
            cols: self.transpose().into_rows(),
        };
        let mut used = vec![false; m];
        let mut pivots: Vec<(usize, usize)> = Vec::new();

        for c in 0..n {
            let mut best: Option<(usize, R::Element)> = None;
            for (r, value) in work.cols[c].iter() {
                if used[r] {
                    continue;
                }
                let shorter = best
                    .as_ref()
                    .map_or(true, |(b, _)| work.rows[r].nnz() < work.rows[*b].nnz());
                if !shorter {
                    continue;
                }
                if let Ok(inv) = ring.inv(value) {
                    best = Some((r, inv));
                }
            }
            let Some((r, inv)) = best else {
                continue;
            };
            trace!(row = r, col = c, "pivot");

            let normalized = work.rows[r].mul_scalar(&inv);
            work.replace_row(r, normalized)?;
            let pivot = work.rows[r].clone();

            let targets: Vec<(usize, R::Element)> = work.cols[c]
                .iter()
                .filter(|&(i, _)| i != r)
                .map(|(i, v)| (i, v.clone()))
                .collect();
            for (i, a) in targets {
                let updated = work.rows[i].submul_scalar(&pivot, &a)?;
                work.replace_row(i, updated)?;
            }

            used[r] = true;
            pivots.push((r, c));
        }

        let rank = pivots.len();
        let pivot_cols = pivots.iter().map(|&(_, c)| c).collect();
        let mut matrix = LilMatrix::from_rows_unchecked(ring, n, work.rows);
        matrix.permute_rows(&pivots_first(pivots.iter().map(|&(r, _)| r), m))?;

        debug!(rank, "RREF complete");
        Ok(Rref {
            rank,
            pivot_cols,
            matrix,
        })
    }

    /// Rank, as the number of RREF pivots.
    ///
    /// # Errors
    ///
    /// Returns an `Unable` error if a ring operation fails.
    pub fn rank(&self) -> Result<usize> {
        Ok(self.rref()?.rank)
    }

    /// Right kernel basis read off the reduced form, one column per free
    /// variable. Complete over a field.
    ///
    /// # Errors
    ///
    /// Returns an `Unable` error if a ring operation fails.
    pub fn nullspace_rref(&self) -> Result<DenseMatrix<'a, R>> {
        let ring = self.ring();
        let n = self.num_cols();
        let reduced = self.rref()?;

        let mut is_pivot = vec![false; n];
        for &c in &reduced.pivot_cols {
            is_pivot[c] = true;
        }
        let free: Vec<usize> = (0..n).filter(|&c| !is_pivot[c]).collect();

        let mut basis = DenseMatrix::zeros(ring, n, free.len());
        for (k, &f) in free.iter().enumerate() {
            basis[(f, k)] = ring.one();
        }
        for (row, &pc) in reduced.pivot_cols.iter().enumerate() {
            for (c, v) in reduced.matrix.row(row).iter() {
                if let Ok(k) = free.binary_search(&c) {
                    basis[(pc, k)] = ring.neg(v);
                }
            }
        }
        Ok(basis)
    }
}

impl<'a, R: Ring> CsrMatrix<'a, R> {
    /// Reduced row echelon form; see [`LilMatrix::rref`].
    ///
    /// # Errors
    ///
    /// Returns an `Unable` error if a ring operation fails.
    pub fn rref(&self) -> Result<Rref<'a, R>> {
        self.to_lil().rref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use tertius_rings::PrimeField;

    fn sparse_random<'a>(
        f: &'a PrimeField,
        m: usize,
        n: usize,
        density: f64,
        rng: &mut ChaCha8Rng,
    ) -> LilMatrix<'a, PrimeField> {
        let mut a = LilMatrix::new(f, m, n);
        for r in 0..m {
            for c in 0..n {
                if rng.gen_bool(density) {
                    a.set_entry(r, c, f.random_nonzero(rng)).unwrap();
                }
            }
        }
        a
    }

    #[test]
    fn test_rref_known() {
        let f = PrimeField::new(7);
        let a = LilMatrix::from_dense(
            &DenseMatrix::from_rows(&f, vec![vec![0, 2, 4], vec![1, 1, 1], vec![1, 2, 3]]).unwrap(),
        );
        let r = a.rref().unwrap();
        // row 3 = row 2 + row 1 / 2
        assert_eq!(r.rank, 2);
        assert_eq!(r.pivot_cols, vec![0, 1]);
        let expected =
            DenseMatrix::from_rows(&f, vec![vec![1, 0, 6], vec![0, 1, 2], vec![0, 0, 0]]).unwrap();
        assert!(r.matrix.to_dense().equal(&expected).is_true());
    }

    #[test]
    fn test_rref_idempotent_and_rank() {
        let f = PrimeField::new(31);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for (m, n, d) in [(6, 6, 0.3), (5, 9, 0.25), (9, 4, 0.5), (12, 12, 0.15)] {
            let a = sparse_random(&f, m, n, d, &mut rng);
            let once = a.rref().unwrap();
            let twice = once.matrix.rref().unwrap();
            assert!(twice.matrix.equal(&once.matrix).unwrap().is_true());
            assert_eq!(twice.pivot_cols, once.pivot_cols);
            assert_eq!(once.rank, a.to_dense().rank());
            assert_eq!(a.rank().unwrap(), once.rank);
        }
    }

    #[test]
    fn test_rref_zero_matrix() {
        let f = PrimeField::new(5);
        for (m, n) in [(0, 0), (4, 0), (0, 3), (4, 3)] {
            let r = LilMatrix::new(&f, m, n).rref().unwrap();
            assert_eq!(r.rank, 0);
            assert!(r.pivot_cols.is_empty());
            assert_eq!(r.matrix.num_rows(), m);
        }
    }

    #[test]
    fn test_nullspace_rref() {
        let f = PrimeField::new(31);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let a = sparse_random(&f, 5, 8, 0.4, &mut rng);
        let basis = a.nullspace_rref().unwrap();
        let rank = a.rank().unwrap();
        assert_eq!(basis.num_cols(), 8 - rank);
        let product = a.to_dense().mm(&basis).unwrap();
        assert!(product.is_zero());
        assert_eq!(basis.rank(), basis.num_cols());
    }

    #[test]
    fn test_csr_rref() {
        let f = PrimeField::new(5);
        let a = CsrMatrix::from_triplets(&f, 2, 2, &[(0, 0, 2), (1, 0, 4)]).unwrap();
        let r = a.rref().unwrap();
        assert_eq!(r.rank, 1);
        assert_eq!(r.matrix.get_entry(0, 0).unwrap(), 1);
        assert_eq!(r.matrix.row(1).nnz(), 0);
    }
}
