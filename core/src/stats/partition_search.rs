//! Search for hidden population structure.
//!
//! A subset of isolates forms a partition of the data if, at every locus, it shares at most one
//! allele with the remaining isolates. Such subsets suggest reproductive isolation between groups
//! of isolates within a population.

use indexmap::{IndexMap, IndexSet};

use crate::{
    combination::{complement, Combinations},
    matrix::{Allele, GenotypeMatrix, Grid, Matrix},
    randomization::{Direction, PValue, Tally},
    stats::StatsError,
};

/// The smallest number of isolates for which a partition search is meaningful.
pub const MIN_ISOLATES: usize = 4;

/// Searches the working data of a matrix for partitions.
///
/// Every subset of isolates of size two up to half the number of isolates is tested. When the
/// subset is exactly half the isolates, only subsets including the first isolate are tested, so
/// that each split is found once. Missing alleles are ignored.
///
/// Only haploid data with at least [`MIN_ISOLATES`] isolates can be searched.
pub fn find_partitions(matrix: &GenotypeMatrix) -> Result<PartitionSearch, StatsError> {
    let grid = match matrix.data() {
        Matrix::Haploid(grid) => grid,
        Matrix::Diploid(_) => return Err(StatsError::NotHaploid),
    };

    let n = grid.num_rows();
    if n < MIN_ISOLATES {
        return Err(StatsError::TooFewIsolates {
            found: n,
            required: MIN_ISOLATES,
        });
    }

    let mut search = PartitionSearch::default();

    for size in 2..=n / 2 {
        for subset in Combinations::new(n, size) {
            if 2 * size == n && subset[0] != 0 {
                break;
            }

            if is_partition(grid, &subset) {
                *search.sizes.entry(size).or_insert(0) += 1;
                search.partitions.push(subset);
            }
        }
    }

    Ok(search)
}

fn is_partition(grid: &Grid<Allele>, subset: &[usize]) -> bool {
    let rest = complement(grid.num_rows(), subset);

    (0..grid.num_cols()).all(|locus| {
        let alleles = |isolates: &[usize]| {
            isolates
                .iter()
                .map(|&isolate| &grid[(isolate, locus)])
                .filter(|allele| !allele.is_missing())
                .collect::<IndexSet<_>>()
        };

        alleles(subset).intersection(&alleles(&rest)).count() <= 1
    })
}

/// The partitions found by [`find_partitions`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PartitionSearch {
    partitions: Vec<Vec<usize>>,
    sizes: IndexMap<usize, usize>,
}

impl PartitionSearch {
    /// Returns `true` if no partitions were found.
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Returns the number of partitions found.
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    /// Returns the smaller side of each partition found, as sorted 0-based isolate indices.
    ///
    /// Partitions are ordered by size, and then lexicographically.
    pub fn partitions(&self) -> &[Vec<usize>] {
        &self.partitions
    }

    /// Returns the number of partitions found for each size of the smaller side, in order of size.
    pub fn sizes(&self) -> &IndexMap<usize, usize> {
        &self.sizes
    }
}

impl Tally for PartitionSearch {
    type PValues = PValue;

    fn p_values(observed: &Self, replicates: &[Self]) -> Self::PValues {
        PValue::new(
            Direction::AtLeast,
            observed.len() as f64,
            replicates.iter().map(|search| search.len() as f64),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::matrix::parse_str;

    #[test]
    fn test_planted_split() {
        let matrix = parse_str("A\tA\nA\tA\nB\tB\nB\tB\n").unwrap();
        let search = find_partitions(&matrix).unwrap();

        assert_eq!(search.partitions(), &[vec![0, 1]]);
        assert_eq!(search.sizes().get(&2), Some(&1));
        assert_eq!(search.len(), 1);
    }

    #[test]
    fn test_single_shared_allele_allowed() {
        // Isolates 1 and 2 share allele C at the second locus with the rest
        let matrix = parse_str("A\tC\nA\tD\nB\tC\nB\tE\nB\tE\n").unwrap();
        let search = find_partitions(&matrix).unwrap();

        assert!(search.partitions().contains(&vec![0, 1]));
    }

    #[test]
    fn test_two_shared_alleles_rejected() {
        let matrix = parse_str("A\nB\nA\nB\n").unwrap();
        let search = find_partitions(&matrix).unwrap();

        // Only {1, 3} versus {2, 4} separates the alleles
        assert_eq!(search.partitions(), &[vec![0, 2]]);
    }

    #[test]
    fn test_missing_alleles_ignored() {
        let matrix = parse_str("A\tX\nA\t?\nB\tY\nB\t-\n").unwrap();
        let search = find_partitions(&matrix).unwrap();

        assert_eq!(search.partitions(), &[vec![0, 1]]);
    }

    #[test]
    fn test_no_partitions() {
        let matrix = parse_str("A\tA\nA\tB\nB\tA\nB\tB\n").unwrap();
        let search = find_partitions(&matrix).unwrap();

        assert!(search.is_empty());
        assert!(search.sizes().is_empty());
    }

    #[test]
    fn test_requirements() {
        let diploid = parse_str("A/A\nA/B\nB/B\nB/A\n").unwrap();
        assert_eq!(find_partitions(&diploid), Err(StatsError::NotHaploid));

        let small = parse_str("A\nA\nB\n").unwrap();
        assert_eq!(
            find_partitions(&small),
            Err(StatsError::TooFewIsolates {
                found: 3,
                required: 4
            })
        );
    }
}
