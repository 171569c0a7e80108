//! Distances between isolates.

use crate::matrix::{with_grid, Cell, GenotypeMatrix, Grid};

/// How missing data is treated when calculating distances.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Strictness {
    /// Missing alleles match any allele, minimising distances.
    ///
    /// See [`Cell::distance`].
    #[default]
    Relaxed,
    /// Missing alleles never match, maximising distances.
    ///
    /// See [`Cell::strict_distance`].
    Strict,
}

impl Strictness {
    fn distance<C>(self, first: &C, second: &C) -> u32
    where
        C: Cell,
    {
        match self {
            Strictness::Relaxed => first.distance(second),
            Strictness::Strict => first.strict_distance(second),
        }
    }
}

/// Summed distances over loci between every pair of isolates.
///
/// Pairs are ordered `(0, 1), (0, 2), ..., (1, 2), ...`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IsoDistances {
    isolates: usize,
    distances: Vec<u32>,
}

impl IsoDistances {
    /// Calculates distances over all loci.
    pub fn new(matrix: &GenotypeMatrix, strictness: Strictness) -> Self {
        let loci = (0..matrix.num_cols()).collect::<Vec<_>>();
        Self::over_loci(matrix, &loci, strictness)
    }

    /// Calculates distances over the provided loci only.
    pub fn over_loci(matrix: &GenotypeMatrix, loci: &[usize], strictness: Strictness) -> Self {
        let isolates = matrix.num_rows();

        let distances: Vec<u32> = with_grid!(matrix.data(), grid => {
            pairs(isolates)
                .map(|(i, j)| {
                    loci.iter()
                        .map(|&locus| strictness.distance(&grid[(i, locus)], &grid[(j, locus)]))
                        .sum::<u32>()
                })
                .collect()
        });

        Self {
            isolates,
            distances,
        }
    }

    /// Returns the distances in order of pairs.
    pub fn as_slice(&self) -> &[u32] {
        &self.distances
    }

    /// Returns the proportion of pairs of isolates that differ.
    ///
    /// Zero if there are no pairs.
    pub fn diversity(&self) -> f64 {
        if self.distances.is_empty() {
            return 0.0;
        }

        let different = self.distances.iter().filter(|&&d| d > 0).count();
        different as f64 / self.distances.len() as f64
    }

    /// Returns the number of copies of each genotype.
    ///
    /// Isolates are clustered greedily: each isolate not yet clustered claims every later
    /// unclustered isolate at distance zero. The returned vector has one entry per isolate, holding
    /// the size of the cluster it started, or zero if it was claimed by an earlier isolate. With
    /// missing data, the result depends on the order of isolates, since distance zero is then not
    /// transitive.
    pub fn frequencies(&self) -> Vec<usize> {
        let mut frequencies = vec![1; self.isolates];

        for ((i, j), &distance) in pairs(self.isolates).zip(self.distances.iter()) {
            if frequencies[i] > 0 && frequencies[j] > 0 && distance == 0 {
                frequencies[j] = 0;
                frequencies[i] += 1;
            }
        }

        frequencies
    }

    /// Returns the distance between two distinct isolates.
    ///
    /// # Panics
    ///
    /// If the isolates are equal or out of bounds.
    pub fn get(&self, first: usize, second: usize) -> u32 {
        assert_ne!(first, second, "no distance between an isolate and itself");

        let (i, j) = if first < second {
            (first, second)
        } else {
            (second, first)
        };

        self.distances[i * self.isolates - i * (i + 1) / 2 + j - i - 1]
    }

    /// Returns the size of the largest genotype cluster.
    ///
    /// See [`IsoDistances::frequencies`].
    pub fn max_frequency(&self) -> usize {
        self.frequencies().into_iter().max().unwrap_or(0)
    }

    /// Returns the number of distinct genotypes.
    ///
    /// See [`IsoDistances::frequencies`].
    pub fn num_genotypes(&self) -> usize {
        self.frequencies().into_iter().filter(|&f| f > 0).count()
    }

    /// Returns the number of isolates.
    pub fn num_isolates(&self) -> usize {
        self.isolates
    }

    /// Returns the population variance of the distances.
    ///
    /// NaN if there are no pairs.
    pub fn variance(&self) -> f64 {
        variance(self.distances.iter().copied())
    }
}

/// Returns the relaxed distance at a single locus for every pair of isolates.
pub(super) fn locus_distances<C>(grid: &Grid<C>, locus: usize) -> Vec<u32>
where
    C: Cell,
{
    pairs(grid.num_rows())
        .map(|(i, j)| grid[(i, locus)].distance(&grid[(j, locus)]))
        .collect()
}

/// Returns the population variance of integer values, or NaN if there are none.
pub(super) fn variance<I>(values: I) -> f64
where
    I: IntoIterator<Item = u32>,
{
    let (n, sum, sum_sq) = values
        .into_iter()
        .fold((0.0, 0.0, 0.0), |(n, sum, sum_sq): (f64, f64, f64), x| {
            let x = f64::from(x);
            (n + 1.0, sum + x, sum_sq + x * x)
        });

    super::ratio(sum_sq - sum * sum / n, n)
}

/// Returns an iterator over all pairs `(i, j)` with `i < j < n`, in order.
pub(super) fn pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::matrix::parse_str;

    #[test]
    fn test_pairs() {
        assert_eq!(
            pairs(4).collect::<Vec<_>>(),
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
        assert_eq!(pairs(1).count(), 0);
    }

    #[test]
    fn test_iso_distances() {
        let matrix = parse_str("A\tB\tC\nA\tA\tC\nB\tB\tC\n").unwrap();
        let distances = IsoDistances::new(&matrix, Strictness::Relaxed);

        assert_eq!(distances.as_slice(), &[1, 1, 2]);
        assert_eq!(distances.get(0, 1), 1);
        assert_eq!(distances.get(2, 1), 2);
        assert_eq!(distances.num_genotypes(), 3);
        assert_eq!(distances.max_frequency(), 1);
        assert_approx_eq!(distances.diversity(), 1.0);
    }

    #[test]
    fn test_strictness() {
        let matrix = parse_str("A\t?\nA\tB\nA\tB\n").unwrap();

        let relaxed = IsoDistances::new(&matrix, Strictness::Relaxed);
        assert_eq!(relaxed.as_slice(), &[0, 0, 0]);
        assert_eq!(relaxed.num_genotypes(), 1);
        assert_eq!(relaxed.max_frequency(), 3);
        assert_approx_eq!(relaxed.diversity(), 0.0);

        let strict = IsoDistances::new(&matrix, Strictness::Strict);
        assert_eq!(strict.as_slice(), &[1, 1, 0]);
        assert_eq!(strict.frequencies(), vec![1, 2, 0]);
        assert_eq!(strict.num_genotypes(), 2);
    }

    #[test]
    fn test_greedy_clustering_depends_on_order() {
        // The second isolate matches both others, which differ from each other
        let matrix = parse_str("A\tB\nA\t?\nA\tC\n").unwrap();
        let distances = IsoDistances::new(&matrix, Strictness::Relaxed);

        assert_eq!(distances.frequencies(), vec![2, 0, 1]);
        assert_eq!(distances.num_genotypes(), 2);

        let matrix = parse_str("A\t?\nA\tB\nA\tC\n").unwrap();
        let distances = IsoDistances::new(&matrix, Strictness::Relaxed);

        assert_eq!(distances.frequencies(), vec![3, 0, 0]);
        assert_eq!(distances.num_genotypes(), 1);
    }

    #[test]
    fn test_over_loci() {
        let matrix = parse_str("A\tB\tC\nA\tA\tC\nB\tB\tC\n").unwrap();

        let distances = IsoDistances::over_loci(&matrix, &[1, 2], Strictness::Relaxed);
        assert_eq!(distances.as_slice(), &[1, 0, 1]);
        assert_eq!(distances.num_genotypes(), 2);

        let distances = IsoDistances::over_loci(&matrix, &[2], Strictness::Relaxed);
        assert_approx_eq!(distances.diversity(), 0.0);
    }

    #[test]
    fn test_diploid_distances() {
        let matrix = parse_str("a/b\tc/c\nb/a\tc/d\nx/y\t?/?\n").unwrap();
        let distances = IsoDistances::new(&matrix, Strictness::Relaxed);

        assert_eq!(distances.as_slice(), &[1, 2, 2]);
    }

    #[test]
    fn test_variance() {
        assert_approx_eq!(variance([1, 1, 2]), 2.0 / 9.0);
        assert!(variance(Vec::new()).is_nan());
    }

    #[test]
    fn test_single_isolate() {
        let matrix = parse_str("A\tB\n").unwrap();
        let distances = IsoDistances::new(&matrix, Strictness::Relaxed);

        assert!(distances.as_slice().is_empty());
        assert_eq!(distances.num_genotypes(), 1);
        assert_eq!(distances.max_frequency(), 1);
        assert_approx_eq!(distances.diversity(), 0.0);
        assert!(distances.variance().is_nan());
    }
}
