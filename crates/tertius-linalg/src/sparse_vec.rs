//! Sparse vectors over a ring context.
//!
//! A [`SparseVector`] stores the nonzero entries of a vector of fixed length
//! as two parallel arrays: strictly increasing indices and their values. No
//! stored value is provably zero; entries whose zero test is `Unknown` are
//! kept.
//!
//! All binary operations go through [`crate::merge`], so the sorted-index
//! invariant is preserved by construction.

use std::fmt;
use std::ops::Range;

use tertius_rings::{Ring, Truth};

use crate::error::{check_index, LinalgError, Result};
use crate::merge::{merge_with, riffle, Merged};

/// A sparse vector of length `len` over the ring `R`.
pub struct SparseVector<'a, R: Ring> {
    ring: &'a R,
    len: usize,
    indices: Vec<usize>,
    values: Vec<R::Element>,
}

impl<R: Ring> Clone for SparseVector<'_, R> {
    fn clone(&self) -> Self {
        Self {
            ring: self.ring,
            len: self.len,
            indices: self.indices.clone(),
            values: self.values.clone(),
        }
    }
}

impl<R: Ring> fmt::Debug for SparseVector<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseVector")
            .field("len", &self.len)
            .field("entries", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<'a, R: Ring> SparseVector<'a, R> {
    /// Creates the zero vector of length `len`.
    #[must_use]
    pub fn new(ring: &'a R, len: usize) -> Self {
        Self {
            ring,
            len,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates the zero vector with room for `nnz` entries.
    #[must_use]
    pub fn with_capacity(ring: &'a R, len: usize, nnz: usize) -> Self {
        let nnz = nnz.min(len);
        Self {
            ring,
            len,
            indices: Vec::with_capacity(nnz),
            values: Vec::with_capacity(nnz),
        }
    }

    /// Builds a vector from parallel index/value arrays.
    ///
    /// With `is_canonical` set the indices must already be strictly
    /// increasing. Otherwise entries are sorted, duplicate indices are summed
    /// and cancellations dropped. Zero values are dropped in both cases.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the arrays differ in length, an index is
    /// out of range, or canonical input is not strictly increasing.
    pub fn from_entries(
        ring: &'a R,
        len: usize,
        indices: Vec<usize>,
        values: Vec<R::Element>,
        is_canonical: bool,
    ) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(LinalgError::ShapeMismatch {
                expected: (indices.len(), 1),
                found: (values.len(), 1),
            });
        }
        for &i in &indices {
            check_index(i, len)?;
        }

        let mut out = Self::with_capacity(ring, len, indices.len());

        if is_canonical {
            if indices.windows(2).any(|w| w[0] >= w[1]) {
                return Err(LinalgError::InvalidArgument(
                    "canonical indices must be strictly increasing",
                ));
            }
            for (i, v) in indices.into_iter().zip(values) {
                out.push_unchecked(i, v);
            }
            return Ok(out);
        }

        let mut pairs: Vec<(usize, R::Element)> = indices.into_iter().zip(values).collect();
        pairs.sort_by_key(|(i, _)| *i);

        let mut pending: Option<(usize, R::Element)> = None;
        for (i, v) in pairs {
            pending = match pending {
                Some((j, acc)) if j == i => Some((j, ring.add(&acc, &v))),
                Some((j, acc)) => {
                    out.push_unchecked(j, acc);
                    Some((i, v))
                }
                None => Some((i, v)),
            };
        }
        if let Some((j, acc)) = pending {
            out.push_unchecked(j, acc);
        }

        Ok(out)
    }

    /// Builds a vector from its dense coefficients.
    #[must_use]
    pub fn from_dense(ring: &'a R, dense: &[R::Element]) -> Self {
        let mut out = Self::new(ring, dense.len());
        for (i, v) in dense.iter().enumerate() {
            out.push_unchecked(i, v.clone());
        }
        out
    }

    /// Assembles a vector from parts already known to be strictly increasing,
    /// in range and zero-free.
    pub(crate) fn from_sorted_parts(
        ring: &'a R,
        len: usize,
        indices: Vec<usize>,
        values: Vec<R::Element>,
    ) -> Self {
        debug_assert_eq!(indices.len(), values.len());
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(indices.last().map_or(true, |&i| i < len));
        Self {
            ring,
            len,
            indices,
            values,
        }
    }

    /// Appends an entry past the current last index, dropping zeros.
    pub(crate) fn push_unchecked(&mut self, index: usize, value: R::Element) {
        debug_assert!(self.indices.last().map_or(true, |&last| last < index));
        if !self.ring.is_zero(&value).is_true() {
            self.indices.push(index);
            self.values.push(value);
        }
    }

    /// Returns the ring context.
    #[must_use]
    pub fn ring(&self) -> &'a R {
        self.ring
    }

    /// Returns the ambient dimension.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the ambient dimension is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if no entry is stored.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the number of entries that fit without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.indices.capacity().min(self.values.capacity())
    }

    /// Stored indices, strictly increasing.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Stored values, parallel to [`Self::indices`].
    #[must_use]
    pub fn values(&self) -> &[R::Element] {
        &self.values
    }

    /// Iterates over stored `(index, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &R::Element)> + '_ {
        self.indices.iter().copied().zip(self.values.iter())
    }

    /// Consumes the vector, returning its index and value arrays.
    #[must_use]
    pub fn into_parts(self) -> (Vec<usize>, Vec<R::Element>) {
        (self.indices, self.values)
    }

    /// Grows the capacity to hold at least `nnz` entries, capped at the
    /// ambient dimension. Growth at least doubles the current capacity.
    pub fn fit_nnz(&mut self, nnz: usize) {
        let need = nnz.min(self.len);
        if self.capacity() < need {
            let want = need.max(2 * self.capacity()).min(self.len);
            self.indices.reserve_exact(want - self.indices.len());
            self.values.reserve_exact(want - self.values.len());
        }
    }

    /// Drops every entry and releases the storage.
    pub fn clear(&mut self) {
        self.indices = Vec::new();
        self.values = Vec::new();
    }

    /// Looks up the stored value at `index`.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `index` is out of range.
    pub fn find_entry(&self, index: usize) -> Result<Option<&R::Element>> {
        check_index(index, self.len)?;
        Ok(self
            .indices
            .binary_search(&index)
            .ok()
            .map(|pos| &self.values[pos]))
    }

    /// Returns the value at `index`, zero if absent.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `index` is out of range.
    pub fn get_entry(&self, index: usize) -> Result<R::Element> {
        Ok(self
            .find_entry(index)?
            .cloned()
            .unwrap_or_else(|| self.ring.zero()))
    }

    /// Sets the value at `index`; a zero value removes the entry.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `index` is out of range.
    pub fn set_entry(&mut self, index: usize, value: R::Element) -> Result<()> {
        check_index(index, self.len)?;
        let zero = self.ring.is_zero(&value).is_true();
        match self.indices.binary_search(&index) {
            Ok(pos) if zero => {
                self.indices.remove(pos);
                self.values.remove(pos);
            }
            Ok(pos) => self.values[pos] = value,
            Err(_) if zero => {}
            Err(pos) => {
                self.fit_nnz(self.nnz() + 1);
                self.indices.insert(pos, index);
                self.values.insert(pos, value);
            }
        }
        Ok(())
    }

    /// Expands to a dense coefficient vector.
    #[must_use]
    pub fn to_dense(&self) -> Vec<R::Element> {
        let mut dense = vec![self.ring.zero(); self.len];
        for (i, v) in self.iter() {
            dense[i] = v.clone();
        }
        dense
    }

    /// Returns the entries in `range`, shifted to start at index zero.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the range does not fit in the vector.
    pub fn slice(&self, range: Range<usize>) -> Result<Self> {
        if range.start > range.end || range.end > self.len {
            return Err(LinalgError::IndexOutOfRange {
                index: range.end,
                len: self.len,
            });
        }
        let lo = self.indices.partition_point(|&i| i < range.start);
        let hi = self.indices.partition_point(|&i| i < range.end);
        Ok(Self::from_sorted_parts(
            self.ring,
            range.end - range.start,
            self.indices[lo..hi].iter().map(|&i| i - range.start).collect(),
            self.values[lo..hi].to_vec(),
        ))
    }

    /// Moves the entry at index `i` to index `perm[i]`.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `perm` does not have length `len` or maps
    /// outside the vector.
    pub fn permute(&self, perm: &[usize]) -> Result<Self> {
        if perm.len() != self.len {
            return Err(LinalgError::ShapeMismatch {
                expected: (self.len, 1),
                found: (perm.len(), 1),
            });
        }
        let mut pairs = Vec::with_capacity(self.nnz());
        for (i, v) in self.iter() {
            let target = perm[i];
            check_index(target, self.len)?;
            pairs.push((target, v.clone()));
        }
        pairs.sort_by_key(|(i, _)| *i);
        if pairs.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(LinalgError::InvalidArgument("permutation is not injective"));
        }
        let (indices, values) = pairs.into_iter().unzip();
        Ok(Self::from_sorted_parts(self.ring, self.len, indices, values))
    }

    fn check_len(&self, other_len: usize) -> Result<()> {
        if self.len == other_len {
            Ok(())
        } else {
            Err(LinalgError::ShapeMismatch {
                expected: (self.len, 1),
                found: (other_len, 1),
            })
        }
    }

    fn nonzero(&self, value: R::Element) -> Option<R::Element> {
        if self.ring.is_zero(&value).is_true() {
            None
        } else {
            Some(value)
        }
    }

    /// Additive inverse.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self::from_sorted_parts(
            self.ring,
            self.len,
            self.indices.clone(),
            self.values.iter().map(|v| self.ring.neg(v)).collect(),
        )
    }

    /// Entrywise equality.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the lengths differ.
    pub fn equal(&self, other: &Self) -> Result<Truth> {
        self.check_len(other.len)?;
        let ring = self.ring;
        let mut truth = Truth::True;
        for (_, entry) in riffle(
            (&self.indices[..], &self.values[..]),
            (&other.indices[..], &other.values[..]),
        ) {
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

    /// Sum `self + other`.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the lengths differ.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.add_mapped(other, Clone::clone)
    }

    /// Difference `self - other`.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the lengths differ.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.sub_mapped(other, Clone::clone)
    }

    /// Entrywise (Hadamard) product.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the lengths differ.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        self.check_len(other.len)?;
        let ring = self.ring;
        let (indices, values) = merge_with(
            (&self.indices[..], &self.values[..]),
            (&other.indices[..], &other.values[..]),
            |_| None,
            |_| None,
            |a, b| self.nonzero(ring.mul(a, b)),
        );
        Ok(Self::from_sorted_parts(ring, self.len, indices, values))
    }

    /// Sum with a vector over another ring, embedded entrywise.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the lengths differ.
    pub fn add_mapped<S: Ring>(
        &self,
        other: &SparseVector<'_, S>,
        embed: impl Fn(&S::Element) -> R::Element,
    ) -> Result<Self> {
        self.check_len(other.len)?;
        let ring = self.ring;
        let (indices, values) = merge_with(
            (&self.indices[..], &self.values[..]),
            (&other.indices[..], &other.values[..]),
            |a| Some(a.clone()),
            |b| self.nonzero(embed(b)),
            |a, b| self.nonzero(ring.add(a, &embed(b))),
        );
        Ok(Self::from_sorted_parts(ring, self.len, indices, values))
    }

    /// Difference with a vector over another ring, embedded entrywise.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the lengths differ.
    pub fn sub_mapped<S: Ring>(
        &self,
        other: &SparseVector<'_, S>,
        embed: impl Fn(&S::Element) -> R::Element,
    ) -> Result<Self> {
        self.check_len(other.len)?;
        let ring = self.ring;
        let (indices, values) = merge_with(
            (&self.indices[..], &self.values[..]),
            (&other.indices[..], &other.values[..]),
            |a| Some(a.clone()),
            |b| self.nonzero(ring.neg(&embed(b))),
            |a, b| self.nonzero(ring.sub(a, &embed(b))),
        );
        Ok(Self::from_sorted_parts(ring, self.len, indices, values))
    }

    /// Product with a scalar; products that vanish are dropped.
    #[must_use]
    pub fn mul_scalar(&self, c: &R::Element) -> Self {
        let ring = self.ring;
        let mut out = Self::with_capacity(ring, self.len, self.nnz());
        for (i, v) in self.iter() {
            if let Some(p) = self.nonzero(ring.mul(v, c)) {
                out.push_unchecked(i, p);
            }
        }
        out
    }

    /// Quotient by a scalar, entry by entry.
    ///
    /// # Errors
    ///
    /// Fails with the ring's error if some entry is not divisible by `c`.
    pub fn div_scalar(&self, c: &R::Element) -> Result<Self> {
        let ring = self.ring;
        let mut out = Self::with_capacity(ring, self.len, self.nnz());
        for (i, v) in self.iter() {
            if let Some(q) = self.nonzero(ring.div(v, c)?) {
                out.push_unchecked(i, q);
            }
        }
        Ok(out)
    }

    /// Computes `self + c * other`.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the lengths differ.
    pub fn addmul_scalar(&self, other: &Self, c: &R::Element) -> Result<Self> {
        self.check_len(other.len)?;
        let ring = self.ring;
        let (indices, values) = merge_with(
            (&self.indices[..], &self.values[..]),
            (&other.indices[..], &other.values[..]),
            |a| Some(a.clone()),
            |b| self.nonzero(ring.mul(b, c)),
            |a, b| {
                let mut acc = a.clone();
                ring.addmul(&mut acc, b, c);
                self.nonzero(acc)
            },
        );
        Ok(Self::from_sorted_parts(ring, self.len, indices, values))
    }

    /// Computes `self - c * other`.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the lengths differ.
    pub fn submul_scalar(&self, other: &Self, c: &R::Element) -> Result<Self> {
        self.check_len(other.len)?;
        let ring = self.ring;
        let (indices, values) = merge_with(
            (&self.indices[..], &self.values[..]),
            (&other.indices[..], &other.values[..]),
            |a| Some(a.clone()),
            |b| self.nonzero(ring.neg(&ring.mul(b, c))),
            |a, b| {
                let mut acc = a.clone();
                ring.submul(&mut acc, b, c);
                self.nonzero(acc)
            },
        );
        Ok(Self::from_sorted_parts(ring, self.len, indices, values))
    }

    /// Inner product of two sparse vectors.
    ///
    /// Walks the operand with fewer entries and gallops through the other,
    /// so the cost is `O(k log(n / k))` for `k` and `n` stored entries.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the lengths differ.
    pub fn dot(&self, other: &Self) -> Result<R::Element> {
        self.check_len(other.len)?;
        let (small, large) = if self.nnz() <= other.nnz() {
            (self, other)
        } else {
            (other, self)
        };

        let ring = self.ring;
        let mut acc = ring.zero();
        let mut cursor = 0;
        for (i, v) in small.iter() {
            cursor = gallop(&large.indices, cursor, i);
            if cursor == large.indices.len() {
                break;
            }
            if large.indices[cursor] == i {
                ring.addmul(&mut acc, v, &large.values[cursor]);
                cursor += 1;
            }
        }
        Ok(acc)
    }

    /// Inner product with a dense vector.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the lengths differ.
    pub fn dot_dense(&self, dense: &[R::Element]) -> Result<R::Element> {
        self.check_len(dense.len())?;
        let ring = self.ring;
        let mut acc = ring.zero();
        for (i, v) in self.iter() {
            ring.addmul(&mut acc, v, &dense[i]);
        }
        Ok(acc)
    }
}

/// First position `p >= start` with `keys[p] >= target`, found by
/// exponential then binary search.
fn gallop(keys: &[usize], start: usize, target: usize) -> usize {
    let mut lo = start;
    let mut hi = start;
    let mut step = 1;
    while hi < keys.len() && keys[hi] < target {
        lo = hi;
        hi += step;
        step *= 2;
    }
    let hi = hi.min(keys.len());
    lo + keys[lo..hi].partition_point(|&k| k < target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use dashu::integer::IBig;
    use dashu::rational::RBig;
    use tertius_rings::{Integers, PrimeField, Rationals};

    #[test]
    fn test_set_and_get() {
        let f7 = PrimeField::new(7);
        let mut v = SparseVector::new(&f7, 5);

        v.set_entry(3, 4).unwrap();
        v.set_entry(1, 2).unwrap();
        assert_eq!(v.indices(), &[1, 3]);
        assert_eq!(v.get_entry(3).unwrap(), 4);
        assert_eq!(v.get_entry(0).unwrap(), 0);

        // Setting zero deletes
        v.set_entry(3, 0).unwrap();
        assert_eq!(v.nnz(), 1);
        assert_eq!(v.find_entry(3).unwrap(), None);

        let err = v.set_entry(5, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    #[test]
    fn test_from_entries_noncanonical() {
        let f5 = PrimeField::new(5);
        let v = SparseVector::from_entries(
            &f5,
            6,
            vec![4, 1, 4, 2, 1],
            vec![2, 3, 3, 1, 1],
            false,
        )
        .unwrap();

        // index 4: 2 + 3 = 0 mod 5 cancels
        assert_eq!(v.indices(), &[1, 2]);
        assert_eq!(v.values(), &[4, 1]);
    }

    #[test]
    fn test_from_entries_canonical_rejects_unsorted() {
        let f5 = PrimeField::new(5);
        let err = SparseVector::from_entries(&f5, 4, vec![2, 1], vec![1, 1], true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    #[test]
    fn test_add_sub() {
        let zz = Integers;
        let a = SparseVector::from_dense(&zz, &[1, 0, 2, 0].map(zz_of));
        let b = SparseVector::from_dense(&zz, &[0, 3, -2, 0].map(zz_of));

        let sum = a.add(&b).unwrap();
        assert_eq!(sum.indices(), &[0, 1]);
        assert_eq!(sum.to_dense(), [1, 3, 0, 0].map(zz_of).to_vec());

        let diff = a.sub(&a).unwrap();
        assert!(diff.is_zero());
    }

    #[test]
    fn test_addmul_submul() {
        let f7 = PrimeField::new(7);
        let a = SparseVector::from_dense(&f7, &[1, 2, 0]);
        let b = SparseVector::from_dense(&f7, &[3, 0, 1]);

        let c = a.addmul_scalar(&b, &2).unwrap();
        assert_eq!(c.to_dense(), vec![0, 2, 2]);

        let d = c.submul_scalar(&b, &2).unwrap();
        assert!(d.equal(&a).unwrap().is_true());
    }

    #[test]
    fn test_mapped_from_integers() {
        let qq = Rationals;
        let zz = Integers;
        let a = SparseVector::from_dense(&qq, &[1, 1, 0].map(|n| qq.from_i64(n)));
        let b = SparseVector::from_dense(&zz, &[-1, 0, 7].map(zz_of));

        let embed = |x: &IBig| RBig::from(x.clone());
        let sum = a.add_mapped(&b, embed).unwrap();
        assert_eq!(sum.indices(), &[1, 2]);
        assert_eq!(sum.to_dense(), [0, 1, 7].map(|n| qq.from_i64(n)).to_vec());

        let diff = a.sub_mapped(&b, embed).unwrap();
        assert_eq!(diff.to_dense(), [2, 1, -7].map(|n| qq.from_i64(n)).to_vec());
    }

    #[test]
    fn test_hadamard() {
        let f7 = PrimeField::new(7);
        let a = SparseVector::from_dense(&f7, &[1, 2, 0, 4]);
        let b = SparseVector::from_dense(&f7, &[0, 3, 5, 2]);
        assert_eq!(a.mul(&b).unwrap().to_dense(), vec![0, 6, 0, 1]);
    }

    #[test]
    fn test_dot_galloping() {
        let f = PrimeField::new(1_000_003);
        let n = 1000;
        let dense_a: Vec<u64> = (0..n).map(|i| if i % 3 == 0 { i } else { 0 }).collect();
        let dense_b: Vec<u64> = (0..n).map(|i| if i % 250 == 0 { 2 } else { 0 }).collect();
        let a = SparseVector::from_dense(&f, &dense_a);
        let b = SparseVector::from_dense(&f, &dense_b);

        let expected = dense_a
            .iter()
            .zip(&dense_b)
            .fold(0, |acc, (x, y)| f.add(&acc, &f.mul(x, y)));
        assert_eq!(a.dot(&b).unwrap(), expected);
        assert_eq!(b.dot(&a).unwrap(), expected);
        assert_eq!(a.dot_dense(&dense_b).unwrap(), expected);
    }

    #[test]
    fn test_dot_length_mismatch() {
        let f7 = PrimeField::new(7);
        let a = SparseVector::new(&f7, 3);
        let b = SparseVector::new(&f7, 4);
        assert_eq!(a.dot(&b).unwrap_err().kind(), ErrorKind::Domain);
    }

    #[test]
    fn test_slice_and_permute() {
        let f7 = PrimeField::new(7);
        let v = SparseVector::from_dense(&f7, &[1, 0, 2, 3, 0]);

        let s = v.slice(1..4).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.to_dense(), vec![0, 2, 3]);

        let p = v.permute(&[4, 3, 2, 1, 0]).unwrap();
        assert_eq!(p.to_dense(), vec![0, 3, 2, 0, 1]);
    }

    #[test]
    fn test_scalar_ops() {
        let f7 = PrimeField::new(7);
        let v = SparseVector::from_dense(&f7, &[1, 0, 3]);
        let w = v.mul_scalar(&3);
        assert_eq!(w.to_dense(), vec![3, 0, 2]);
        assert!(w.div_scalar(&3).unwrap().equal(&v).unwrap().is_true());
        assert!(v.mul_scalar(&0).is_zero());
        assert_eq!(v.neg().to_dense(), vec![6, 0, 4]);
    }

    #[test]
    fn test_div_scalar_inexact() {
        let zz = Integers;
        let v = SparseVector::from_dense(&zz, &[2, 3].map(zz_of));
        assert_eq!(v.div_scalar(&zz_of(2)).unwrap_err().kind(), ErrorKind::Unable);
    }

    #[test]
    fn test_fit_nnz_and_clear() {
        let f7 = PrimeField::new(7);
        let mut v = SparseVector::new(&f7, 4);
        v.fit_nnz(100);
        assert!(v.capacity() >= 4);
        v.set_entry(0, 1).unwrap();
        v.clear();
        assert_eq!(v.nnz(), 0);
        assert_eq!(v.capacity(), 0);
    }

    #[test]
    fn test_fit_nnz_grows_geometrically() {
        let f7 = PrimeField::new(7);
        let mut v = SparseVector::new(&f7, 20);
        v.fit_nnz(3);
        assert_eq!(v.capacity(), 3);
        v.fit_nnz(4);
        assert_eq!(v.capacity(), 6);
        v.fit_nnz(5);
        assert_eq!(v.capacity(), 6);

        let mut short = SparseVector::new(&f7, 10);
        short.fit_nnz(6);
        short.fit_nnz(7);
        assert_eq!(short.capacity(), 10);

        // inserts go through the same growth and never pass the length
        let mut w = SparseVector::new(&f7, 5);
        for i in 0..5 {
            w.set_entry(i, 1).unwrap();
        }
        assert_eq!(w.capacity(), 5);
    }

    #[test]
    fn test_gallop() {
        let keys = [1, 4, 9, 16, 25, 36];
        assert_eq!(gallop(&keys, 0, 0), 0);
        assert_eq!(gallop(&keys, 0, 9), 2);
        assert_eq!(gallop(&keys, 2, 10), 3);
        assert_eq!(gallop(&keys, 0, 100), 6);
    }

    fn zz_of(n: i64) -> IBig {
        IBig::from(n)
    }
}
