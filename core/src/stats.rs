//! Statistics on genotype matrices.
//!
//! All statistics are calculated on the working data of a [`GenotypeMatrix`](crate::GenotypeMatrix).
//! Statistics that are undefined for the data, e.g. because there are too few loci to form a
//! pair, are returned as NaN rather than as an error. Errors are reserved for preconditions that
//! the caller is expected to check, such as the number of populations.

use std::fmt;

use crate::matrix::MatrixError;

pub mod association;
pub use association::{IndexAssociation, PairwiseR, VarianceDistances};

pub mod compat;
pub use compat::proportion_compatible;

pub mod distance;
pub use distance::{IsoDistances, Strictness};

pub mod diversity;
pub use diversity::{Diversity, DiversityPValues, DiversityStats};

pub mod partition_search;
pub use partition_search::{find_partitions, PartitionSearch};

pub mod plot;
pub use plot::{diversity_by_loci, DiversityPoint};

pub mod rank;
pub use rank::RankVariances;

pub mod theta;
pub use theta::{theta, theta_subset};

/// Returns `numerator / denominator`, or NaN if the denominator is zero.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// An error associated with calculating statistics.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StatsError {
    /// The matrix could not be backed up or restored around a randomization.
    Matrix(MatrixError),
    /// No locus had at least two distinct alleles among the sampled isolates.
    NoPolymorphicLocus,
    /// The data is diploid, but the statistic requires haploid data.
    NotHaploid,
    /// Too few isolates for the statistic.
    TooFewIsolates {
        /// Number of isolates found.
        found: usize,
        /// Number of isolates required.
        required: usize,
    },
    /// Fewer than two populations are defined or selected.
    TooFewPopulations {
        /// Number of populations found.
        found: usize,
    },
    /// A selected population does not exist.
    UnknownPopulation {
        /// 0-based index of the population.
        index: usize,
        /// Number of populations defined.
        count: usize,
    },
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::Matrix(e) => write!(f, "{e}"),
            StatsError::NoPolymorphicLocus => {
                f.write_str("need to be able to sample at least 1 polymorphic locus")
            }
            StatsError::NotHaploid => f.write_str("statistic is only defined for haploid data"),
            StatsError::TooFewIsolates { found, required } => {
                write!(f, "need at least {required} isolates, found {found}")
            }
            StatsError::TooFewPopulations { found } => {
                write!(f, "need at least 2 populations, found {found}")
            }
            StatsError::UnknownPopulation { index, count } => write!(
                f,
                "population {} selected, but only {count} population(s) defined",
                index + 1
            ),
        }
    }
}

impl std::error::Error for StatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StatsError::Matrix(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MatrixError> for StatsError {
    fn from(e: MatrixError) -> Self {
        Self::Matrix(e)
    }
}
