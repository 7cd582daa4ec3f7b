//! Two-pointer merge of sorted key streams.
//!
//! Every binary operation on sparse storage walks two strictly increasing key
//! sequences in lockstep. [`Riffle`] yields each key once, tagged with which
//! side carries it; [`merge_with`] collects the result of per-case closures
//! into fresh parallel key/value vectors.

use std::cmp::Ordering;

/// Which operands carry a given key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Merged<A, B> {
    /// Only the left operand.
    Left(A),
    /// Only the right operand.
    Right(B),
    /// Both operands.
    Both(A, B),
}

/// Iterator interleaving two sorted `(keys, values)` streams.
#[derive(Debug)]
pub struct Riffle<'x, K, A, B> {
    left_keys: &'x [K],
    left_vals: &'x [A],
    right_keys: &'x [K],
    right_vals: &'x [B],
    i: usize,
    j: usize,
}

/// Starts a merge of two sorted streams.
///
/// Keys must be strictly increasing within each stream and each key slice
/// must be as long as its value slice.
pub fn riffle<'x, K: Ord + Copy, A, B>(
    left: (&'x [K], &'x [A]),
    right: (&'x [K], &'x [B]),
) -> Riffle<'x, K, A, B> {
    debug_assert_eq!(left.0.len(), left.1.len());
    debug_assert_eq!(right.0.len(), right.1.len());
    Riffle {
        left_keys: left.0,
        left_vals: left.1,
        right_keys: right.0,
        right_vals: right.1,
        i: 0,
        j: 0,
    }
}

impl<'x, K: Ord + Copy, A, B> Iterator for Riffle<'x, K, A, B> {
    type Item = (K, Merged<&'x A, &'x B>);

    fn next(&mut self) -> Option<Self::Item> {
        let left = self.left_keys.get(self.i);
        let right = self.right_keys.get(self.j);

        let order = match (left, right) {
            (None, None) => return None,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(l), Some(r)) => l.cmp(r),
        };

        let item = match order {
            Ordering::Less => {
                let key = self.left_keys[self.i];
                let item = (key, Merged::Left(&self.left_vals[self.i]));
                self.i += 1;
                item
            }
            Ordering::Greater => {
                let key = self.right_keys[self.j];
                let item = (key, Merged::Right(&self.right_vals[self.j]));
                self.j += 1;
                item
            }
            Ordering::Equal => {
                let key = self.left_keys[self.i];
                let item = (
                    key,
                    Merged::Both(&self.left_vals[self.i], &self.right_vals[self.j]),
                );
                self.i += 1;
                self.j += 1;
                item
            }
        };
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let l = self.left_keys.len() - self.i;
        let r = self.right_keys.len() - self.j;
        (l.max(r), Some(l + r))
    }
}

/// Merges two sorted streams, keeping every key for which the matching
/// closure returns `Some`.
pub fn merge_with<K, A, B, T>(
    left: (&[K], &[A]),
    right: (&[K], &[B]),
    mut only_left: impl FnMut(&A) -> Option<T>,
    mut only_right: impl FnMut(&B) -> Option<T>,
    mut both: impl FnMut(&A, &B) -> Option<T>,
) -> (Vec<K>, Vec<T>)
where
    K: Ord + Copy,
{
    let merged = riffle(left, right);
    let (lower, _) = merged.size_hint();
    let mut keys = Vec::with_capacity(lower);
    let mut values = Vec::with_capacity(lower);

    for (key, entry) in merged {
        let value = match entry {
            Merged::Left(a) => only_left(a),
            Merged::Right(b) => only_right(b),
            Merged::Both(a, b) => both(a, b),
        };
        if let Some(value) = value {
            keys.push(key);
            values.push(value);
        }
    }

    (keys, values)
}
