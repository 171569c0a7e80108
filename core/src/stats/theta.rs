//! Population differentiation.
//!
//! θ is Weir & Cockerham's estimator of F_ST, following Weir (1996), "Genetic Data Analysis II",
//! p. 170. Missing alleles are ignored, and both alleles of diploid isolates are counted.

use indexmap::IndexMap;

use crate::{
    matrix::{with_grid, Allele, Cell, GenotypeMatrix, Grid},
    stats::StatsError,
};

/// Returns θ over all populations of the working data of a matrix.
///
/// At least two populations must be defined, and at least one locus must have two distinct
/// alleles. Populations of a single isolate are allowed.
///
/// The result is not finite when a polymorphic locus has on average at most one typed allele per
/// population, as with haploid single-isolate populations, or when a population has no typed
/// alleles at a polymorphic locus.
pub fn theta(matrix: &GenotypeMatrix) -> Result<f64, StatsError> {
    let populations = matrix.populations().iter().collect::<Vec<_>>();

    if populations.len() < 2 {
        return Err(StatsError::TooFewPopulations {
            found: populations.len(),
        });
    }

    with_grid!(matrix.data(), grid => theta_grid(grid, &populations))
}

/// Returns θ over a selection of populations of the working data of a matrix.
///
/// Populations are given by 0-based index. Duplicates are ignored, and at least two distinct
/// populations must be selected.
pub fn theta_subset(matrix: &GenotypeMatrix, selected: &[usize]) -> Result<f64, StatsError> {
    let selected = normalise_selection(matrix, selected)?;
    let populations = selected
        .iter()
        .map(|&i| matrix.populations().bounds(i))
        .collect::<Vec<_>>();

    with_grid!(matrix.data(), grid => theta_grid(grid, &populations))
}

/// Returns the isolates belonging to a selection of populations, in order.
///
/// The selection is checked as for [`theta_subset`].
pub fn selected_isolates(
    matrix: &GenotypeMatrix,
    selected: &[usize],
) -> Result<Vec<usize>, StatsError> {
    let selected = normalise_selection(matrix, selected)?;

    Ok(selected
        .into_iter()
        .flat_map(|i| {
            let (start, end) = matrix.populations().bounds(i);
            start..=end
        })
        .collect())
}

fn normalise_selection(
    matrix: &GenotypeMatrix,
    selected: &[usize],
) -> Result<Vec<usize>, StatsError> {
    let count = matrix.populations().num_parts();

    let mut selected = selected.to_vec();
    selected.sort_unstable();
    selected.dedup();

    if let Some(&index) = selected.iter().find(|&&i| i >= count) {
        return Err(StatsError::UnknownPopulation { index, count });
    }

    if selected.len() < 2 {
        return Err(StatsError::TooFewPopulations {
            found: selected.len(),
        });
    }

    Ok(selected)
}

fn theta_grid<C>(grid: &Grid<C>, populations: &[(usize, usize)]) -> Result<f64, StatsError>
where
    C: Cell,
{
    let (sites, sum_q2, sum_q3) = (0..grid.num_cols())
        .filter_map(|locus| locus_components(grid, locus, populations))
        .fold((0.0, 0.0, 0.0), |(sites, sum_q2, sum_q3), (q2, q3)| {
            (sites + 1.0, sum_q2 + q2, sum_q3 + q3)
        });

    if sites == 0.0 {
        Err(StatsError::NoPolymorphicLocus)
    } else {
        Ok((sum_q2 - sum_q3) / (sites - sum_q3))
    }
}

/// Returns `(Q2, Q3)` at a locus, or `None` if the locus has fewer than two distinct alleles.
fn locus_components<C>(
    grid: &Grid<C>,
    locus: usize,
    populations: &[(usize, usize)],
) -> Option<(f64, f64)>
where
    C: Cell,
{
    let counts: Vec<IndexMap<&Allele, usize>> = populations
        .iter()
        .map(|&(start, end)| {
            let mut counts = IndexMap::new();
            (start..=end)
                .flat_map(|isolate| grid[(isolate, locus)].alleles())
                .filter(|allele| !allele.is_missing())
                .for_each(|allele| *counts.entry(allele).or_insert(0) += 1);
            counts
        })
        .collect();

    let mut totals: IndexMap<&Allele, usize> = IndexMap::new();
    for (&allele, &count) in counts.iter().flatten() {
        *totals.entry(allele).or_insert(0) += count;
    }

    if totals.len() < 2 {
        return None;
    }

    let r = populations.len() as f64;
    let sizes = counts
        .iter()
        .map(|counts| counts.values().sum::<usize>() as f64)
        .collect::<Vec<_>>();

    let sum_n: f64 = sizes.iter().sum();
    let sum_n_sq: f64 = sizes.iter().map(|n| n * n).sum();

    let y: f64 = totals.values().map(|&total| (total * total) as f64).sum();
    let x: f64 = totals
        .keys()
        .map(|allele| {
            counts
                .iter()
                .zip(&sizes)
                .filter_map(|(counts, n)| counts.get(allele).map(|&c| (c * c) as f64 / n))
                .sum::<f64>()
        })
        .sum();

    let n_bar = sum_n / r;
    let n_c = (sum_n - sum_n_sq / sum_n) / (r - 1.0);

    let q2 = (x - r) / (r * (n_bar - 1.0));
    let q3 = (y - n_bar * (n_c - 1.0) / (n_bar - 1.0) * x) / (r * (r - 1.0) * n_bar * n_c)
        + (n_bar - n_c) / (n_c * (n_bar - 1.0)) * (1.0 - x / (r - 1.0));

    Some((q2, q3))
}
