use std::path::PathBuf;

use anyhow::{Context, Error};

use clap::{Args, ValueEnum};
use rand::{rngs::StdRng, SeedableRng};

use multilocus_core::{matrix::read, GenotypeMatrix, Input, MissingPolicy};

/// Arguments for reading and structuring a dataset, shared by every analysis.
#[derive(Args, Debug)]
pub struct DataArgs {
    /// Input data file.
    ///
    /// Tab-delimited alleles, one isolate per line, with diploid alleles written as 'a/b'. Lines
    /// starting with '#' are ignored, and an empty line ends the data. The file may be
    /// gzip-compressed. If no file is provided, stdin will be used.
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Population sizes.
    ///
    /// By default, all isolates form a single population. By providing sizes, isolates are split
    /// into consecutive populations of the given sizes, which must sum to the number of isolates.
    /// Use comma to separate sizes.
    #[arg(
        short = 'P',
        long,
        use_value_delimiter = true,
        value_delimiter = ',',
        value_name = "INT,..."
    )]
    pub populations: Option<Vec<usize>>,

    /// Linkage group sizes.
    ///
    /// By default, each locus forms its own linkage group. By providing sizes, loci are split
    /// into consecutive linkage groups of the given sizes, which must sum to the number of loci.
    /// Loci in the same linkage group are kept together when shuffling. Use comma to separate
    /// sizes.
    #[arg(
        short = 'L',
        long,
        use_value_delimiter = true,
        value_delimiter = ',',
        value_name = "INT,..."
    )]
    pub linkage: Option<Vec<usize>>,

    /// Treatment of missing data when shuffling.
    #[arg(short = 'm', long, value_enum, default_value_t = Missing::Free)]
    pub missing: Missing,

    /// Exclude data with missing alleles before analysis.
    ///
    /// Exclusion happens before populations and linkage groups are set, so sizes must refer to
    /// the remaining data.
    #[arg(short = 'x', long, value_enum, value_name = "AXIS")]
    pub exclude: Option<Exclude>,
}

impl DataArgs {
    /// Reads the dataset and applies exclusions, populations, linkage groups and missing data
    /// policy.
    pub fn load(&self) -> Result<GenotypeMatrix, Error> {
        let input = Input::new(self.input.clone())?;
        let source = input.to_string();

        let mut matrix = read::Builder::default()
            .set_input(input)
            .read()
            .with_context(|| format!("failed to read data from {source}"))?;

        log::info!(
            "Read {} {} isolates typed at {} loci from {source}",
            matrix.num_rows(),
            matrix.ploidy(),
            matrix.num_cols(),
        );

        match self.exclude {
            Some(Exclude::Isolates) => matrix.exclude_missing_isolates()?,
            Some(Exclude::Loci) => matrix.exclude_missing_loci()?,
            None => (),
        }

        if let Some(sizes) = &self.populations {
            matrix
                .set_populations(sizes)
                .context("invalid population sizes")?;
        }

        if let Some(sizes) = &self.linkage {
            matrix
                .set_linkage_groups(sizes)
                .context("invalid linkage group sizes")?;
        }

        matrix.set_missing_policy(self.missing.into());

        Ok(matrix)
    }
}

/// Arguments for randomization tests.
#[derive(Args, Debug)]
pub struct RandomizationArgs {
    /// Number of randomizations.
    ///
    /// The data is shuffled this many times, and statistics are calculated for each replicate
    /// to obtain p-values. No p-values are reported if zero.
    #[arg(short = 'r', long, default_value_t = 0, value_name = "INT")]
    pub randomizations: usize,

    /// Seed for the random number generator.
    ///
    /// If not provided, a seed will be chosen randomly.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,
}

impl RandomizationArgs {
    /// Creates the random number generator.
    pub fn rng(&self) -> StdRng {
        rng(self.seed)
    }
}

/// Creates a random number generator from a seed, or from entropy if no seed is provided.
pub fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Logs randomization progress.
pub fn log_progress(done: usize, total: usize) {
    log::info!("Doing randomization {done} of {total}...");
}

#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Missing {
    /// Missing data stays in place when shuffling.
    Fixed,
    /// Missing data is shuffled like any other data.
    Free,
}

impl From<Missing> for MissingPolicy {
    fn from(missing: Missing) -> Self {
        match missing {
            Missing::Fixed => MissingPolicy::Fixed,
            Missing::Free => MissingPolicy::Free,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Exclude {
    /// Exclude every isolate with missing data at any locus.
    Isolates,
    /// Exclude every locus with missing data in any isolate.
    Loci,
}
