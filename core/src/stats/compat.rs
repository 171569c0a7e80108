//! Pairwise compatibility of loci.

use indexmap::IndexSet;

use crate::{
    matrix::{with_grid, Allele, Cell, GenotypeMatrix, Grid},
    stats::{distance::pairs, ratio},
};

/// Returns the proportion of pairs of loci that are compatible.
///
/// A pair of loci is compatible if the two-locus genotypes observed in the data can be joined in
/// a tree without homoplasy, tested by growing a lattice of genotypes after Estabrook & Landrum
/// (1975). Isolates with missing data at either locus are ignored. Diploid isolates are decomposed
/// into haplotypes when homozygous at either locus, and ignored when heterozygous at both.
///
/// NaN if there are fewer than two loci.
pub fn proportion_compatible(matrix: &GenotypeMatrix) -> f64 {
    with_grid!(matrix.data(), grid => proportion_compatible_grid(grid))
}

fn proportion_compatible_grid<C>(grid: &Grid<C>) -> f64
where
    C: Cell,
{
    let (total, incompatible) =
        pairs(grid.num_cols()).fold((0, 0), |(total, incompatible), (i, j)| {
            (total + 1, incompatible + usize::from(!is_compatible(grid, i, j)))
        });

    ratio((total - incompatible) as f64, total as f64)
}

fn is_compatible<C>(grid: &Grid<C>, first: usize, second: usize) -> bool
where
    C: Cell,
{
    let mut unique = IndexSet::new();
    for row in grid.rows() {
        let (a, b) = (&row[first], &row[second]);

        if !(a.is_missing() || b.is_missing()) {
            unique.extend(a.haplotypes(b).into_iter().rev());
        }
    }

    let mut genotypes: Vec<[&Allele; 2]> = unique.into_iter().collect();

    while let Some(seed) = genotypes.pop() {
        let mut lattice = vec![seed];

        let mut k = 0;
        while k < genotypes.len() {
            let candidate = genotypes[k];
            let unique_first = lattice.iter().all(|g| g[0] != candidate[0]);
            let unique_second = lattice.iter().all(|g| g[1] != candidate[1]);

            match (unique_first, unique_second) {
                (false, false) => {
                    debug_assert!(!lattice.contains(&candidate));
                    return false;
                }
                (true, false) | (false, true) => {
                    lattice.push(genotypes.remove(k));
                    k = 0;
                }
                (true, true) => k += 1,
            }
        }
    }

    true
}
