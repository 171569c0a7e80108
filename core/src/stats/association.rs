//! Multilocus linkage disequilibrium.
//!
//! The index of association and its standardised form r̄d contrast the observed variance of
//! distances between isolates with the variance expected if loci were independent, after Maynard
//! Smith et al. (1993) and Agapow & Burt (2001).

use crate::{
    matrix::{with_grid, GenotypeMatrix},
    randomization::{Direction, PValue, Tally},
    stats::{
        distance::{locus_distances, pairs, variance},
        ratio, IsoDistances, Strictness,
    },
    utils::sum_sqrt_products,
};

/// The variance of distances between isolates at each locus.
///
/// Under shuffling within loci, these variances do not change, and so they need only be
/// calculated once on the observed data.
#[derive(Clone, Debug, PartialEq)]
pub struct VarianceDistances {
    variances: Vec<f64>,
    sum: f64,
    max_sum_covariance: f64,
}

impl VarianceDistances {
    /// Calculates the variances from the working data of a matrix.
    pub fn new(matrix: &GenotypeMatrix) -> Self {
        let variances: Vec<f64> = with_grid!(matrix.data(), grid => {
            (0..grid.num_cols())
                .map(|locus| variance(locus_distances(grid, locus)))
                .collect()
        });

        Self {
            sum: variances.iter().sum(),
            max_sum_covariance: sum_sqrt_products(&variances),
            variances,
        }
    }

    /// Returns the index of association and r̄d of the working data of a matrix.
    ///
    /// Distances are relaxed, see [`Strictness::Relaxed`].
    pub fn index_association(&self, matrix: &GenotypeMatrix) -> IndexAssociation {
        let observed = IsoDistances::new(matrix, Strictness::Relaxed).variance();

        IndexAssociation {
            index: ratio(observed, self.sum) - 1.0,
            rbar_d: ratio(observed - self.sum, 2.0 * self.max_sum_covariance),
        }
    }

    /// Returns the maximum sum of covariances, `Σ_{i<j} sqrt(var_i var_j)`.
    pub fn max_sum_covariance(&self) -> f64 {
        self.max_sum_covariance
    }

    /// Returns r for every pair of loci in the working data of a matrix.
    ///
    /// Pairs including a locus without variance have no r.
    pub fn pairwise_r(&self, matrix: &GenotypeMatrix) -> PairwiseR {
        let distances: Vec<Vec<u32>> = with_grid!(matrix.data(), grid => {
            (0..grid.num_cols())
                .map(|locus| locus_distances(grid, locus))
                .collect()
        });

        let values = pairs(self.variances.len())
            .map(|(i, j)| {
                let (var_i, var_j) = (self.variances[i], self.variances[j]);

                if var_i == 0.0 || var_j == 0.0 {
                    return None;
                }

                let joint = variance(distances[i].iter().zip(&distances[j]).map(|(a, b)| a + b));
                Some((joint - (var_i + var_j)) / (2.0 * (var_i * var_j).sqrt()))
            })
            .collect();

        PairwiseR {
            loci: self.variances.len(),
            values,
        }
    }

    /// Returns the sum of variances over loci.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Returns the variance at each locus.
    pub fn variances(&self) -> &[f64] {
        &self.variances
    }
}

/// The index of association and r̄d.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndexAssociation {
    /// The index of association, I_A.
    ///
    /// NaN if no locus has any variance.
    pub index: f64,
    /// The standardised index of association, r̄d.
    ///
    /// NaN if there are fewer than two loci with variance.
    pub rbar_d: f64,
}

/// The correlation r of distances for every pair of loci.
#[derive(Clone, Debug, PartialEq)]
pub struct PairwiseR {
    loci: usize,
    values: Vec<Option<f64>>,
}

impl PairwiseR {
    /// Returns an iterator over the pairs of loci and their r, in order of pairs.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), Option<f64>)> + '_ {
        pairs(self.loci).zip(self.values.iter().copied())
    }

    /// Returns r in order of pairs `(0, 1), (0, 2), ..., (1, 2), ...`.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}

impl Tally for PairwiseR {
    type PValues = Vec<Option<PValue>>;

    fn p_values(observed: &Self, replicates: &[Self]) -> Self::PValues {
        observed
            .values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                value.map(|value| {
                    PValue::new(
                        Direction::AtLeast,
                        value,
                        replicates.iter().map(|replicate| replicate.values[i]),
                    )
                })
            })
            .collect()
    }
}
