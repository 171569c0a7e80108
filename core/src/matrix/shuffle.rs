use std::ops::Range;

use rand::Rng;

use crate::Partition;

use super::{with_grid, Cell, GenotypeMatrix, Grid, MissingPolicy};

impl GenotypeMatrix {
    /// Shuffles the working data within populations, keeping linkage groups together.
    ///
    /// For each population, each isolate in turn swaps the data of each linkage group with that of
    /// a uniformly drawn isolate of the same population. With [`MissingPolicy::Fixed`], a locus is
    /// not swapped if either cell is missing.
    pub fn shuffle<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let populations = self.populations.clone();
        let linkage_groups = self.linkage_groups.clone();
        let policy = self.missing_policy;

        with_grid!(self.data_mut(), grid => {
            shuffle_grid(grid, &populations, &linkage_groups, policy, rng)
        })
    }

    /// Shuffles whole isolates, ignoring populations, linkage groups and the missing data policy.
    pub fn shuffle_unconstrained<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let populations = Partition::new(self.num_rows());
        let linkage_groups = Partition::new(self.num_cols());

        with_grid!(self.data_mut(), grid => {
            shuffle_grid(grid, &populations, &linkage_groups, MissingPolicy::Free, rng)
        })
    }

    /// Shuffles isolates among the provided isolates only, ignoring populations and linkage groups.
    ///
    /// Every isolate swaps its data at all loci with a uniformly drawn isolate from the same set.
    /// With [`MissingPolicy::Fixed`], a locus is not swapped if either cell is missing.
    pub fn shuffle_rows_among<R>(&mut self, isolates: &[usize], rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        if isolates.len() < 2 {
            return;
        }

        let policy = self.missing_policy;

        with_grid!(self.data_mut(), grid => {
            let loci = 0..grid.num_cols();

            for &i in isolates {
                let j = isolates[rng.gen_range(0..isolates.len())];
                swap_isolates(grid, i, j, loci.clone(), policy);
            }
        })
    }
}

fn shuffle_grid<C, R>(
    grid: &mut Grid<C>,
    populations: &Partition,
    linkage_groups: &Partition,
    policy: MissingPolicy,
    rng: &mut R,
) where
    C: Cell,
    R: Rng + ?Sized,
{
    for (from, to) in populations.iter().filter(|(from, to)| to > from) {
        for (first_locus, last_locus) in linkage_groups.iter() {
            for i in from..=to {
                let j = rng.gen_range(from..=to);
                swap_isolates(grid, i, j, first_locus..last_locus + 1, policy);
            }
        }
    }
}

fn swap_isolates<C>(
    grid: &mut Grid<C>,
    first: usize,
    second: usize,
    loci: Range<usize>,
    policy: MissingPolicy,
) where
    C: Cell,
{
    if first == second {
        return;
    }

    for locus in loci {
        let fixed = policy == MissingPolicy::Fixed
            && (grid[(first, locus)].is_missing() || grid[(second, locus)].is_missing());

        if !fixed {
            grid.swap(locus, first, second);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{rngs::StdRng, SeedableRng};

    use crate::matrix::parse_str;

    fn sorted_column(
        matrix: &GenotypeMatrix,
        isolates: std::ops::Range<usize>,
        locus: usize,
    ) -> Vec<String> {
        let mut column = isolates
            .map(|i| matrix.data_string(i, locus))
            .collect::<Vec<_>>();
        column.sort();
        column
    }

    fn rows(matrix: &GenotypeMatrix) -> Vec<Vec<String>> {
        (0..matrix.num_rows())
            .map(|i| (0..matrix.num_cols()).map(|j| matrix.data_string(i, j)).collect())
            .collect()
    }

    const TEXT: &str = "A\tB\tC\nD\tE\tF\nG\tH\tI\nJ\tK\tL\nM\tN\tO\nP\tQ\tR\n";

    #[test]
    fn test_shuffle_preserves_column_multisets_within_populations() {
        let mut matrix = parse_str(TEXT).unwrap();
        matrix.set_populations(&[2, 4]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let before = (0..3)
            .map(|j| (sorted_column(&matrix, 0..2, j), sorted_column(&matrix, 2..6, j)))
            .collect::<Vec<_>>();

        for _ in 0..20 {
            matrix.shuffle(&mut rng);
        }

        let after = (0..3)
            .map(|j| (sorted_column(&matrix, 0..2, j), sorted_column(&matrix, 2..6, j)))
            .collect::<Vec<_>>();

        assert_eq!(before, after);
    }

    #[test]
    fn test_shuffle_keeps_linkage_groups_together() {
        let mut matrix = parse_str(TEXT).unwrap();
        matrix.set_linkage_groups(&[2, 1]).unwrap();
        let original = rows(&matrix);
        let mut rng = StdRng::seed_from_u64(2);

        for _ in 0..20 {
            matrix.shuffle(&mut rng);
        }

        for row in rows(&matrix) {
            assert!(original.iter().any(|o| o[..2] == row[..2]));
        }
    }

    #[test]
    fn test_singleton_populations_unchanged() {
        let mut matrix = parse_str(TEXT).unwrap();
        matrix.set_populations(&[1, 1, 1, 1, 1, 1]).unwrap();
        let original = rows(&matrix);

        matrix.shuffle(&mut StdRng::seed_from_u64(3));

        assert_eq!(rows(&matrix), original);
    }

    #[test]
    fn test_fixed_missing_stays_in_place() {
        let mut matrix = parse_str("A\t?\nB\tC\n-\tD\nE\tF\n?\t-\n").unwrap();
        matrix.set_missing_policy(MissingPolicy::Fixed);
        let mut rng = StdRng::seed_from_u64(4);

        let missing = |matrix: &GenotypeMatrix| {
            (0..matrix.num_rows())
                .flat_map(|i| (0..matrix.num_cols()).map(move |j| (i, j)))
                .filter(|&(i, j)| matrix.is_missing(i, j))
                .map(|(i, j)| (i, j, matrix.data_string(i, j)))
                .collect::<Vec<_>>()
        };
        let before = missing(&matrix);

        for _ in 0..20 {
            matrix.shuffle(&mut rng);
            assert_eq!(missing(&matrix), before);
        }
    }

    #[test]
    fn test_shuffle_rows_among() {
        let mut matrix = parse_str(TEXT).unwrap();
        let original = rows(&matrix);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..20 {
            matrix.shuffle_rows_among(&[1, 3, 4], &mut rng);
        }

        let shuffled = rows(&matrix);
        for i in [0, 2, 5] {
            assert_eq!(shuffled[i], original[i]);
        }

        let mut selected = [1, 3, 4].map(|i| shuffled[i].clone()).to_vec();
        selected.sort();
        assert_eq!(selected, [1, 3, 4].map(|i| original[i].clone()).to_vec());
    }

    #[test]
    fn test_shuffle_rows_among_fixed_missing_stays_in_place() {
        let mut matrix = parse_str("?\tA\nB\tC\nD\tE\nF\tG\nH\t-\n").unwrap();
        matrix.set_missing_policy(MissingPolicy::Fixed);

        for seed in 0..50 {
            matrix.shuffle_rows_among(&[0, 1, 2, 3], &mut StdRng::seed_from_u64(seed));

            assert_eq!(matrix.data_string(0, 0), "?");
            assert_eq!(sorted_column(&matrix, 1..4, 0), ["B", "D", "F"]);
            assert_eq!(sorted_column(&matrix, 0..4, 1), ["A", "C", "E", "G"]);
            assert_eq!(rows(&matrix)[4], ["H", "-"]);
        }
    }

    #[test]
    fn test_shuffle_unconstrained_moves_whole_rows() {
        let mut matrix = parse_str(TEXT).unwrap();
        matrix.set_populations(&[3, 3]).unwrap();
        matrix.set_missing_policy(MissingPolicy::Fixed);
        let mut original = rows(&matrix);
        let mut rng = StdRng::seed_from_u64(6);

        for _ in 0..10 {
            matrix.shuffle_unconstrained(&mut rng);
        }

        let mut shuffled = rows(&matrix);
        shuffled.sort();
        original.sort();
        assert_eq!(shuffled, original);
        assert_eq!(matrix.populations().sizes(), vec![3, 3]);
    }
}
