//! Linkage disequilibrium on allele ranks.

use crate::{
    matrix::{with_grid, Cell, GenotypeMatrix, Grid},
    stats::ratio,
    utils::{sum_sqrt_products, variance},
};

/// The variance of allele ranks over isolates at each locus.
///
/// Ranks are read from alleles consisting of decimal digits, such as microsatellite repeat
/// counts, see [`Cell::rank`]. Like [`VarianceDistances`](super::VarianceDistances), these do not
/// change under shuffling within loci.
#[derive(Clone, Debug, PartialEq)]
pub struct RankVariances {
    sum: f64,
    max_sum_covariance: f64,
}

impl RankVariances {
    /// Calculates the rank variances from the working data of a matrix.
    ///
    /// Returns `None` if the data cannot be read as ranks.
    pub fn new(matrix: &GenotypeMatrix) -> Option<Self> {
        if !matrix.is_rankable() {
            return None;
        }

        let variances: Vec<f64> = with_grid!(matrix.data(), grid => {
            (0..grid.num_cols())
                .map(|locus| values_variance(grid.column(locus).map(rank)))
                .collect()
        });

        Some(Self {
            sum: variances.iter().sum(),
            max_sum_covariance: sum_sqrt_products(&variances),
        })
    }

    /// Returns r̄s, the standardised index of association on ranks, of the working data of a
    /// matrix.
    ///
    /// NaN if there are fewer than two loci with rank variance.
    pub fn rbar_s(&self, matrix: &GenotypeMatrix) -> f64 {
        let observed = with_grid!(matrix.data(), grid => values_variance(rank_sums(grid)));

        ratio(observed - self.sum, 2.0 * self.max_sum_covariance)
    }
}

fn rank<C>(cell: &C) -> f64
where
    C: Cell,
{
    cell.rank().unwrap_or(0) as f64
}

fn rank_sums<C>(grid: &Grid<C>) -> impl Iterator<Item = f64> + '_
where
    C: Cell,
{
    grid.rows().map(|row| row.iter().map(rank).sum())
}

fn values_variance<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (n, sum, sum_sq) = values
        .into_iter()
        .fold((0.0, 0.0, 0.0), |(n, sum, sum_sq), x| {
            (n + 1.0, sum + x, sum_sq + x * x)
        });

    variance(sum, sum_sq, n)
}
