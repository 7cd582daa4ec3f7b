//! Sparse LU decomposition with Markowitz-style pivoting.
//!
//! The elimination keeps two live views of the active submatrix: the rows
//! (a [`LilMatrix`]) and their transpose, which answers "which active rows
//! touch column `c`". Pivot columns come off a min-heap keyed by remaining
//! column count; stale heap entries are skipped on pop rather than removed.
//! Within the chosen column the pivot row is the shortest row whose entry
//! is a unit.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tertius_rings::{Ring, RingError};
use tracing::{debug, instrument, trace};

use crate::csr::CsrMatrix;
use crate::error::{check_shape, Result};
use crate::lil::LilMatrix;
use crate::sparse_vec::SparseVector;

/// Result of [`LilMatrix::lu`]: `P·A·Q = L·U`.
///
/// `row_perm[r]` is the position of original row `r` in `P·A`, and
/// `col_perm[c]` the position of original column `c` in `A·Q`. Pivots occupy
/// positions `0..rank` in both.
#[derive(Debug)]
pub struct LuDecomposition<'a, R: Ring> {
    /// Number of pivots.
    pub rank: usize,
    /// Row permutation `P`, as new position per original row.
    pub row_perm: Vec<usize>,
    /// Column permutation `Q`, as new position per original column.
    pub col_perm: Vec<usize>,
    /// m×m lower triangular factor; unit diagonal on the first `rank`
    /// columns, zero beyond.
    pub l: LilMatrix<'a, R>,
    /// m×n upper triangular factor; invertible diagonal on the first `rank`
    /// rows, zero rows beyond.
    pub u: LilMatrix<'a, R>,
}

struct Elimination<'a, R: Ring> {
    ring: &'a R,
    rows: Vec<SparseVector<'a, R>>,
    cols: Vec<SparseVector<'a, R>>,
    col_done: Vec<bool>,
    heap: BinaryHeap<Reverse<(usize, usize)>>,
}

impl<'a, R: Ring> Elimination<'a, R> {
    fn new(a: &LilMatrix<'a, R>) -> Self {
        let cols = a.transpose().into_rows();
        let heap = cols
            .iter()
            .enumerate()
            .map(|(c, col)| Reverse((col.nnz(), c)))
            .collect();
        Self {
            ring: a.ring(),
            rows: a.rows().to_vec(),
            col_done: vec![false; a.num_cols()],
            cols,
            heap,
        }
    }

    /// Pops the live column with the fewest active entries.
    fn next_column(&mut self) -> Option<usize> {
        while let Some(Reverse((count, c))) = self.heap.pop() {
            if self.col_done[c] || count != self.cols[c].nnz() {
                continue;
            }
            if count == 0 {
                // Fill-in re-pushes the column if it ever becomes live again.
                continue;
            }
            return Some(c);
        }
        None
    }

    /// Shortest active row with a unit in column `c`, with the inverse.
    fn pivot_row(&self, c: usize) -> Option<(usize, R::Element)> {
        let mut best: Option<(usize, R::Element)> = None;
        for (r, value) in self.cols[c].iter() {
            let shorter = best
                .as_ref()
                .map_or(true, |(b, _)| self.rows[r].nnz() < self.rows[*b].nnz());
            if !shorter {
                continue;
            }
            if let Ok(inv) = self.ring.inv(value) {
                best = Some((r, inv));
            }
        }
        best
    }

    /// Replaces row `r` and patches the column view where it changed.
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
            if !self.col_done[c] {
                self.heap.push(Reverse((self.cols[c].nnz(), c)));
            }
        }
        Ok(())
    }

    /// Removes a pivot row from the column view.
    fn retire_row(&mut self, r: usize) -> Result<()> {
        let zero = self.ring.zero();
        for &c in self.rows[r].indices() {
            self.cols[c].set_entry(r, zero.clone())?;
            if !self.col_done[c] {
                self.heap.push(Reverse((self.cols[c].nnz(), c)));
            }
        }
        Ok(())
    }
}

/// Builds the permutation placing `pivots` first, in order, then every
/// other index in increasing order.
pub(crate) fn pivots_first(pivots: impl Iterator<Item = usize>, n: usize) -> Vec<usize> {
    const UNSET: usize = usize::MAX;
    let mut perm = vec![UNSET; n];
    let mut next = 0;
    for p in pivots {
        perm[p] = next;
        next += 1;
    }
    for slot in &mut perm {
        if *slot == UNSET {
            *slot = next;
            next += 1;
        }
    }
    perm
}

impl<'a, R: Ring> LilMatrix<'a, R> {
    /// Computes `P·A·Q = L·U`.
    ///
    /// # Errors
    ///
    /// Returns an `Unable` error if some pivot column has no unit entry
    /// among the active rows, which can only happen outside fields.
    #[instrument(skip_all, fields(rows = self.num_rows(), cols = self.num_cols(), nnz = self.nnz()))]
    pub fn lu(&self) -> Result<LuDecomposition<'a, R>> {
        let ring = self.ring();
        let (m, n) = (self.num_rows(), self.num_cols());
        let mut elim = Elimination::new(self);

        // (row, col, pivot row as it stood when chosen)
        let mut pivots: Vec<(usize, usize, SparseVector<'a, R>)> = Vec::new();
        // (original row, step, multiplier)
        let mut multipliers: Vec<(usize, usize, R::Element)> = Vec::new();

        while let Some(c) = elim.next_column() {
            let Some((r, inv)) = elim.pivot_row(c) else {
                debug!(col = c, "no unit pivot in column");
                return Err(RingError::NotInvertible.into());
            };
            let step = pivots.len();
            trace!(step, row = r, col = c, "pivot");

            elim.col_done[c] = true;
            elim.retire_row(r)?;
            let pivot = elim.rows[r].clone();

            let targets: Vec<(usize, R::Element)> = elim.cols[c]
                .iter()
                .map(|(i, v)| (i, v.clone()))
                .collect();
            for (i, a) in targets {
                let l = ring.mul(&a, &inv);
                let updated = elim.rows[i].submul_scalar(&pivot, &l)?;
                elim.replace_row(i, updated)?;
                multipliers.push((i, step, l));
            }

            pivots.push((r, c, pivot));
        }

        let rank = pivots.len();
        let row_perm = pivots_first(pivots.iter().map(|(r, _, _)| *r), m);
        let col_perm = pivots_first(pivots.iter().map(|(_, c, _)| *c), n);

        let mut l_rows: Vec<Vec<(usize, R::Element)>> = vec![Vec::new(); m];
        for (i, step, value) in multipliers {
            l_rows[row_perm[i]].push((step, value));
        }
        for (step, entries) in l_rows.iter_mut().enumerate().take(rank) {
            entries.push((step, ring.one()));
        }
        let l_rows = l_rows
            .into_iter()
            .map(|entries| {
                let (indices, values) = entries.into_iter().unzip();
                SparseVector::from_sorted_parts(ring, m, indices, values)
            })
            .collect();
        let l = LilMatrix::from_rows_unchecked(ring, m, l_rows);

        let mut u = LilMatrix::new(ring, m, n);
        for (step, (_, _, row)) in pivots.into_iter().enumerate() {
            u.set_row(step, row.permute(&col_perm)?)?;
        }

        debug!(rank, "LU decomposition complete");
        Ok(LuDecomposition {
            rank,
            row_perm,
            col_perm,
            l,
            u,
        })
    }
}

impl<'a, R: Ring> CsrMatrix<'a, R> {
    /// Computes `P·A·Q = L·U`; see [`LilMatrix::lu`].
    ///
    /// # Errors
    ///
    /// Returns an `Unable` error if some pivot column has no unit entry.
    pub fn lu(&self) -> Result<LuDecomposition<'a, R>> {
        self.to_lil().lu()
    }
}

impl<'a, R: Ring> LuDecomposition<'a, R> {
    /// Solves `A x = b` by forward and back substitution.
    ///
    /// Free variables are set to zero. Returns `None` if the system is
    /// inconsistent.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `b` does not have one entry per row, and
    /// an `Unable` error if a division is inexact.
    pub fn solve(&self, b: &[R::Element]) -> Result<Option<Vec<R::Element>>> {
        let ring = self.l.ring();
        let (m, n) = (self.u.num_rows(), self.u.num_cols());
        check_shape((m, 1), (b.len(), 1))?;

        let mut y = vec![ring.zero(); m];
        for (i, bi) in b.iter().enumerate() {
            y[self.row_perm[i]] = bi.clone();
        }

        // L y' = P b on the first `rank` rows, consistency on the rest
        for j in 0..m {
            let mut acc = y[j].clone();
            for (k, l) in self.l.row(j).iter() {
                if k != j {
                    ring.submul(&mut acc, l, &y[k]);
                }
            }
            if j >= self.rank && !ring.is_zero(&acc).is_true() {
                return Ok(None);
            }
            y[j] = acc;
        }

        let mut z = vec![ring.zero(); n];
        for k in (0..self.rank).rev() {
            let row = self.u.row(k);
            let mut acc = y[k].clone();
            let mut diagonal = None;
            for (j, u) in row.iter() {
                if j == k {
                    diagonal = Some(u);
                } else {
                    ring.submul(&mut acc, u, &z[j]);
                }
            }
            let diagonal = diagonal.ok_or(RingError::DivisionByZero)?;
            z[k] = ring.div(&acc, diagonal)?;
        }

        Ok(Some(self.col_perm.iter().map(|&p| z[p].clone()).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense_matrix::DenseMatrix;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tertius_rings::PrimeField;

    fn permutation_matrix<'a>(f: &'a PrimeField, perm: &[usize]) -> DenseMatrix<'a, PrimeField> {
        let mut p = DenseMatrix::zeros(f, perm.len(), perm.len());
        for (i, &j) in perm.iter().enumerate() {
            p[(j, i)] = 1;
        }
        p
    }

    fn assert_lu_identity(a: &LilMatrix<'_, PrimeField>, lu: &LuDecomposition<'_, PrimeField>) {
        let f = a.ring();
        let p = permutation_matrix(f, &lu.row_perm);
        let q = permutation_matrix(f, &lu.col_perm).transpose();
        let paq = p.mm(&a.to_dense()).unwrap().mm(&q).unwrap();
        let prod = lu.l.to_dense().mm(&lu.u.to_dense()).unwrap();
        assert!(paq.equal(&prod).is_true());

        for i in 0..lu.l.num_rows() {
            for (k, v) in lu.l.row(i).iter() {
                assert!(k <= i);
                assert!(k < lu.rank);
                if k == i {
                    assert_eq!(*v, 1);
                }
            }
        }
        for i in 0..lu.u.num_rows() {
            let row = lu.u.row(i);
            if i >= lu.rank {
                assert_eq!(row.nnz(), 0);
            } else {
                assert_eq!(row.indices()[0], i);
            }
        }
    }

    #[test]
    fn test_lu_small() {
        let f = PrimeField::new(7);
        let a = CsrMatrix::from_triplets(
            &f,
            3,
            3,
            &[(0, 0, 2), (0, 1, 1), (1, 0, 4), (1, 1, 3), (1, 2, 1), (2, 2, 5)],
        )
        .unwrap()
        .to_lil();
        let lu = a.lu().unwrap();
        assert_eq!(lu.rank, 3);
        assert_lu_identity(&a, &lu);
    }

    #[test]
    fn test_lu_rank_deficient() {
        let f = PrimeField::new(11);
        // third row = first + second
        let a = LilMatrix::from_dense(
            &DenseMatrix::from_rows(
                &f,
                vec![vec![1, 2, 0, 3], vec![0, 1, 4, 0], vec![1, 3, 4, 3]],
            )
            .unwrap(),
        );
        let lu = a.lu().unwrap();
        assert_eq!(lu.rank, 2);
        assert_lu_identity(&a, &lu);
    }

    #[test]
    fn test_lu_random_matches_dense_rank() {
        let f = PrimeField::new(101);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for (m, n) in [(5, 5), (4, 7), (8, 3), (10, 10)] {
            let dense = DenseMatrix::random(&f, m, n, &mut rng);
            let a = LilMatrix::from_dense(&dense);
            let lu = a.lu().unwrap();
            assert_eq!(lu.rank, dense.rank());
            assert_lu_identity(&a, &lu);
        }
    }

    #[test]
    fn test_lu_empty() {
        let f = PrimeField::new(5);
        for (m, n) in [(0, 0), (3, 0), (0, 4), (3, 4)] {
            let lu = LilMatrix::new(&f, m, n).lu().unwrap();
            assert_eq!(lu.rank, 0);
            assert_eq!(lu.l.nnz(), 0);
            assert_eq!(lu.u.nnz(), 0);
        }
    }

    #[test]
    fn test_lu_solve() {
        let f = PrimeField::new(13);
        let a = CsrMatrix::from_triplets(
            &f,
            3,
            3,
            &[(0, 0, 1), (0, 2, 2), (1, 1, 3), (2, 0, 4), (2, 1, 1)],
        )
        .unwrap();
        let lu = a.lu().unwrap();
        let x = vec![5, 7, 11];
        let b = a.mul_vec(&x).unwrap();
        let solved = lu.solve(&b).unwrap().unwrap();
        assert_eq!(a.mul_vec(&solved).unwrap(), b);
    }

    #[test]
    fn test_lu_solve_inconsistent() {
        let f = PrimeField::new(13);
        let a = CsrMatrix::from_triplets(&f, 2, 2, &[(0, 0, 1), (1, 0, 2)]).unwrap();
        let lu = a.lu().unwrap();
        assert_eq!(lu.rank, 1);
        assert!(lu.solve(&[1, 2]).unwrap().is_some());
        assert!(lu.solve(&[1, 3]).unwrap().is_none());
    }
}
