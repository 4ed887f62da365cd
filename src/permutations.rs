//! Enumerates every ordering of a small set without recursion.
//!
//! Permutation `k` is found by writing `k` in the factorial number system. Digit `j` has place
//! value `(n - 1 - j)!` and lies in `0..n - j`; it says how far ahead of position `j` to swap
//! from. Applying the `n - 1` swaps in order to a fresh copy of the items gives each of the
//! `n!` orderings exactly once.

use super::error::{Error, Result};
use std::iter::FusedIterator;

fn factorial(n: usize) -> Option<usize> {
    (1..=n).try_fold(1usize, |product, factor| product.checked_mul(factor))
}

#[derive(Debug, Clone)]
pub struct Permutations<T> {
    items: Box<[T]>,
    /// `places[j] == (n - 1 - j)!`
    places: Box<[usize]>,
    count: usize,
}

impl<T: Clone> Permutations<T> {
    /// Fails with [`Error::TooManyItems`] if `n!` doesn't fit in a `usize`.
    pub fn new(items: impl Into<Vec<T>>) -> Result<Self> {
        let items = items.into().into_boxed_slice();
        let len = items.len();
        let count = factorial(len).ok_or(Error::TooManyItems { len })?;
        let places = (0..len.saturating_sub(1))
            .map(|position| factorial(len - 1 - position))
            .collect::<Option<Box<[usize]>>>()
            .ok_or(Error::TooManyItems { len })?;
        Ok(Permutations {
            items,
            places,
            count,
        })
    }

    /// The number of permutations, `n!`.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The permutation with the given rank, or `None` if `rank >= n!`.
    pub fn permutation(&self, rank: usize) -> Option<Vec<T>> {
        if rank >= self.count {
            return None;
        }

        let mut permutation = self.items.to_vec();
        let mut remainder = rank;
        for (position, place) in self.places.iter().enumerate() {
            let offset = remainder / place;
            remainder %= place;
            permutation.swap(position, position + offset);
        }
        Some(permutation)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            permutations: self,
            rank: 0,
        }
    }
}

impl<'a, T: Clone> IntoIterator for &'a Permutations<T> {
    type Item = Vec<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Yields permutations in increasing rank. Each call to [`Permutations::iter`] starts over.
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    permutations: &'a Permutations<T>,
    rank: usize,
}

impl<'a, T: Clone> Iterator for Iter<'a, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let permutation = self.permutations.permutation(self.rank)?;
        self.rank += 1;
        Some(permutation)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.permutations.count - self.rank;
        (remaining, Some(remaining))
    }
}

impl<'a, T: Clone> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T: Clone> FusedIterator for Iter<'a, T> {}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::Itertools;
    use std::collections::HashSet;

    #[test]
    fn three_items() {
        let permutations = Permutations::new(vec![1, 2, 3]).unwrap();
        assert_eq!(permutations.len(), 6);

        let all: Vec<_> = permutations.iter().collect();
        assert_eq!(
            all,
            vec![
                vec![1, 2, 3],
                vec![1, 3, 2],
                vec![2, 1, 3],
                vec![2, 3, 1],
                vec![3, 2, 1],
                vec![3, 1, 2],
            ]
        );
        assert_eq!(all.iter().collect::<HashSet<_>>().len(), 6);
    }

    #[test]
    fn rank_order_is_not_lexicographic() {
        let permutations = Permutations::new(vec![1, 2, 3]).unwrap();
        let all: Vec<_> = permutations.iter().collect();
        let mut sorted = all.clone();
        sorted.sort();
        assert_ne!(all, sorted);
    }

    #[test]
    fn complete_up_to_seven() {
        for n in 1..=7 {
            let items: Vec<i64> = (0..n).map(|value| value * 3 - 5).collect();
            let permutations = Permutations::new(items.clone()).unwrap();

            let generated: Vec<_> = permutations.iter().collect();
            let distinct: HashSet<_> = generated.iter().cloned().collect();
            let expected: HashSet<_> = items.iter().cloned().permutations(items.len()).collect();

            assert_eq!(generated.len(), permutations.len());
            assert_eq!(distinct.len(), generated.len());
            assert_eq!(distinct, expected);
        }
    }

    #[test]
    fn restartable() {
        let permutations = Permutations::new(vec!['a', 'b', 'c', 'd']).unwrap();
        let first: Vec<_> = permutations.iter().collect();
        let second: Vec<_> = (&permutations).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(permutations.iter().len(), 24);
    }

    #[test]
    fn random_access_matches_iteration() {
        let permutations = Permutations::new(vec![5, 6, 7, 8, 9]).unwrap();
        for (rank, permutation) in permutations.iter().enumerate() {
            assert_eq!(permutations.permutation(rank), Some(permutation));
        }
        assert_eq!(permutations.permutation(120), None);
    }

    #[test]
    fn trivial_sets() {
        let empty = Permutations::<i64>::new(vec![]).unwrap();
        assert_eq!(empty.iter().collect::<Vec<_>>(), vec![Vec::<i64>::new()]);

        let single = Permutations::new(vec![4]).unwrap();
        assert_eq!(single.iter().collect::<Vec<_>>(), vec![vec![4]]);
    }

    #[test]
    fn too_many_items() {
        assert!(matches!(
            Permutations::new((0..21).collect::<Vec<i64>>()),
            Err(Error::TooManyItems { len: 21 })
        ));
    }
}
