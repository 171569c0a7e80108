//! The standard suite of diversity and linkage statistics.

use crate::{
    matrix::GenotypeMatrix,
    randomization::{Direction, PValue, Tally},
    stats::{
        proportion_compatible, IsoDistances, PairwiseR, RankVariances, Strictness,
        VarianceDistances,
    },
};

/// Evaluates [`DiversityStats`] on a matrix.
///
/// The per-locus variances needed by the linkage statistics are calculated once on creation, and
/// reused for every evaluation. This is valid as long as the data is only shuffled within loci
/// between evaluations.
#[derive(Clone, Debug)]
pub struct Diversity {
    strictness: Strictness,
    variances: VarianceDistances,
    ranks: Option<RankVariances>,
}

impl Diversity {
    /// Prepares the statistics for the working data of a matrix.
    ///
    /// The strictness applies to the number of genotypes, their maximum frequency, and the
    /// diversity only.
    pub fn new(matrix: &GenotypeMatrix, strictness: Strictness) -> Self {
        Self {
            strictness,
            variances: VarianceDistances::new(matrix),
            ranks: RankVariances::new(matrix),
        }
    }

    /// Evaluates the statistics on the working data of a matrix.
    pub fn evaluate(&self, matrix: &GenotypeMatrix) -> DiversityStats {
        let distances = IsoDistances::new(matrix, self.strictness);
        let association = self.variances.index_association(matrix);

        DiversityStats {
            num_genotypes: distances.num_genotypes(),
            max_frequency: distances.max_frequency(),
            diversity: distances.diversity(),
            proportion_compatible: proportion_compatible(matrix),
            index_association: association.index,
            rbar_d: association.rbar_d,
            rbar_s: self.ranks.as_ref().map(|ranks| ranks.rbar_s(matrix)),
        }
    }

    /// Evaluates r for each pair of loci on the working data of a matrix.
    pub fn pairwise(&self, matrix: &GenotypeMatrix) -> PairwiseR {
        self.variances.pairwise_r(matrix)
    }

    /// Returns the per-locus variances of distances.
    pub fn variances(&self) -> &VarianceDistances {
        &self.variances
    }
}

/// Diversity and linkage statistics of a genotype matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct DiversityStats {
    /// Number of distinct genotypes.
    pub num_genotypes: usize,
    /// Number of copies of the most frequent genotype.
    pub max_frequency: usize,
    /// Proportion of pairs of isolates with different genotypes.
    pub diversity: f64,
    /// Proportion of pairs of loci that are compatible.
    pub proportion_compatible: f64,
    /// Index of association.
    pub index_association: f64,
    /// Standardised index of association.
    pub rbar_d: f64,
    /// Standardised index of association on allele ranks, if the data can be read as ranks.
    pub rbar_s: Option<f64>,
}

/// P-values for each of the [`DiversityStats`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[allow(missing_docs)]
pub struct DiversityPValues {
    pub num_genotypes: PValue,
    pub max_frequency: PValue,
    pub diversity: PValue,
    pub proportion_compatible: PValue,
    pub index_association: PValue,
    pub rbar_d: PValue,
    pub rbar_s: Option<PValue>,
}

impl Tally for DiversityStats {
    type PValues = DiversityPValues;

    fn p_values(observed: &Self, replicates: &[Self]) -> Self::PValues {
        let p_value = |direction: Direction, observed: f64, get: fn(&Self) -> f64| {
            PValue::new(direction, observed, replicates.iter().map(get))
        };

        DiversityPValues {
            num_genotypes: p_value(
                Direction::AtMost,
                observed.num_genotypes as f64,
                |stats| stats.num_genotypes as f64,
            ),
            max_frequency: p_value(
                Direction::AtLeast,
                observed.max_frequency as f64,
                |stats| stats.max_frequency as f64,
            ),
            diversity: p_value(Direction::AtMost, observed.diversity, |stats| {
                stats.diversity
            }),
            proportion_compatible: p_value(
                Direction::AtLeast,
                observed.proportion_compatible,
                |stats| stats.proportion_compatible,
            ),
            index_association: p_value(
                Direction::AtLeast,
                observed.index_association,
                |stats| stats.index_association,
            ),
            rbar_d: p_value(Direction::AtLeast, observed.rbar_d, |stats| stats.rbar_d),
            rbar_s: observed.rbar_s.map(|rbar_s| {
                PValue::new(
                    Direction::TwoSided,
                    rbar_s,
                    replicates.iter().map(|stats| stats.rbar_s),
                )
            }),
        }
    }
}
