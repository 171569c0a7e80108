//! Subsets of indices.

use rand::Rng;

/// An iterator over all `k`-subsets of `0..n` in lexicographic order.
///
/// Each subset is yielded as a sorted vector of indices.
#[derive(Clone, Debug)]
pub struct Combinations {
    n: usize,
    current: Option<Vec<usize>>,
}

impl Combinations {
    /// Creates a new iterator over the `k`-subsets of `0..n`.
    ///
    /// If `k` is zero, a single empty subset is yielded. If `k` exceeds `n`, nothing is yielded.
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            current: (k <= n).then(|| (0..k).collect()),
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        let k = current.len();

        // Rightmost index that can still be incremented
        let pivot = (0..k).rev().find(|&i| current[i] < self.n - k + i);

        if let Some(i) = pivot {
            let mut next = current.clone();
            next[i] += 1;
            for j in i + 1..k {
                next[j] = next[j - 1] + 1;
            }
            self.current = Some(next);
        }

        Some(current)
    }
}

/// Returns the indices of `0..n` not in `subset`.
///
/// The subset must be sorted.
pub fn complement(n: usize, subset: &[usize]) -> Vec<usize> {
    let mut rest = subset.iter().peekable();

    (0..n)
        .filter(|i| {
            if rest.peek() == Some(&i) {
                rest.next();
                false
            } else {
                true
            }
        })
        .collect()
}

/// Draws a uniformly random `k`-subset of `0..n`, returned sorted.
///
/// # Panics
///
/// If `k` exceeds `n`.
pub fn sample<R>(n: usize, k: usize, rng: &mut R) -> Vec<usize>
where
    R: Rng + ?Sized,
{
    let mut subset = rand::seq::index::sample(rng, n, k).into_vec();
    subset.sort_unstable();
    subset
}
