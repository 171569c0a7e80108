//! Genotypic diversity as a function of the number of loci sampled.

use rand::Rng;

use crate::{
    combination::sample,
    matrix::GenotypeMatrix,
    stats::{IsoDistances, Strictness},
    utils::Summary,
};

/// The genotypic diversity observed when sampling a fixed number of loci.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiversityPoint {
    /// The number of loci sampled.
    pub loci: usize,
    /// The number of distinct genotypes over samples.
    pub genotypes: Summary,
    /// The diversity over samples.
    pub diversity: Summary,
}

/// Returns the genotypic diversity for every number of loci from one to all.
///
/// For each number of loci, `samples` random subsets of loci are drawn, except when sampling all
/// loci, where the single subset is used once. The number of genotypes and the diversity of the
/// isolates over the sampled loci are summarised over subsets. No point is produced if `samples`
/// is zero.
pub fn diversity_by_loci<R>(
    matrix: &GenotypeMatrix,
    samples: usize,
    strictness: Strictness,
    rng: &mut R,
) -> Vec<DiversityPoint>
where
    R: Rng + ?Sized,
{
    let n = matrix.num_cols();

    (1..=n)
        .filter_map(|k| {
            let samples = if k == n { samples.min(1) } else { samples };

            let (genotypes, diversity): (Vec<f64>, Vec<f64>) = (0..samples)
                .map(|_| {
                    let loci = sample(n, k, rng);
                    let distances = IsoDistances::over_loci(matrix, &loci, strictness);
                    (distances.num_genotypes() as f64, distances.diversity())
                })
                .unzip();

            log::debug!("Sampled {samples} subset(s) of {k} loci");

            Some(DiversityPoint {
                loci: k,
                genotypes: Summary::new(&genotypes)?,
                diversity: Summary::new(&diversity)?,
            })
        })
        .collect()
}
