use std::io;

use anyhow::Error;

use clap::Parser;

use multilocus_core::{
    randomization::Randomization,
    stats::{Diversity as Statistics, Strictness},
};

use crate::args::{log_progress, DataArgs, RandomizationArgs};

mod runner;
use runner::Runner;

/// Calculate genotypic diversity and linkage disequilibrium.
///
/// Reports the number of distinct genotypes, the frequency of the most common genotype, the
/// genotypic diversity, the proportion of compatible pairs of loci, the index of association,
/// r̄d and r̄s. With randomizations, the data is shuffled within populations, keeping linkage
/// groups together, to obtain p-values.
#[derive(Debug, Parser)]
pub struct Diversity {
    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    randomization: RandomizationArgs,

    /// Also calculate r for every pair of loci.
    #[arg(long)]
    pairs: bool,

    /// Never let missing alleles match when counting genotypes.
    ///
    /// By default, a missing allele matches any allele when comparing isolates, which minimises
    /// the number of distinct genotypes. Setting this flag maximises it instead. Linkage
    /// statistics always let missing alleles match.
    #[arg(long)]
    strict: bool,

    /// Precision to use when printing statistics.
    #[arg(short = 'p', long, default_value_t = 6, value_name = "INT")]
    precision: usize,
}

impl Diversity {
    pub fn run(self) -> Result<(), Error> {
        let mut matrix = self.data.load()?;
        let mut rng = self.randomization.rng();

        let strictness = if self.strict {
            Strictness::Strict
        } else {
            Strictness::Relaxed
        };
        let statistics = Statistics::new(&matrix, strictness);
        let pairs = self.pairs;

        if !matrix.is_rankable() {
            log::info!("Data cannot be read as ranks, r̄s will not be calculated");
        }

        let replicates = Randomization::new(self.randomization.randomizations).run(
            &mut matrix,
            &mut rng,
            |matrix| {
                Ok::<_, Error>((
                    statistics.evaluate(matrix),
                    pairs.then(|| statistics.pairwise(matrix)),
                ))
            },
            log_progress,
        )?;

        let mut runner = Runner::new(io::stdout().lock(), self.precision);
        runner.write_statistics(&replicates)?;

        if pairs {
            runner.write_pairs(&replicates)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tests::parse_subcmd;

    #[test]
    fn test_defaults() {
        let args = parse_subcmd::<Diversity>("multilocus diversity data.txt");

        assert_eq!(args.randomization.randomizations, 0);
        assert_eq!(args.randomization.seed, None);
        assert!(!args.pairs);
        assert!(!args.strict);
        assert_eq!(args.precision, 6);
    }

    #[test]
    fn test_parse_randomization() {
        let args = parse_subcmd::<Diversity>("multilocus diversity -r 100 --seed 3 --pairs data.txt");

        assert_eq!(args.randomization.randomizations, 100);
        assert_eq!(args.randomization.seed, Some(3));
        assert!(args.pairs);
    }
}
