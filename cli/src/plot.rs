use std::io;

use anyhow::Error;

use clap::Parser;

use multilocus_core::stats::{diversity_by_loci, DiversityPoint, Strictness};

use crate::{
    args::{rng, DataArgs},
    table::Table,
};

const HEADER: [&str; 5] = [
    "#Loci_Sampled",
    "Mean_#Genotypes",
    "Std_Error",
    "Mean_Diversity",
    "Std_Error",
];

/// Plot genotypic diversity against the number of loci sampled.
///
/// For every number of loci from one to all, random subsets of loci are drawn, and the number of
/// genotypes and the diversity over those loci is averaged.
#[derive(Debug, Parser)]
pub struct Plot {
    #[command(flatten)]
    data: DataArgs,

    /// Number of random subsets of loci to draw for each number of loci.
    #[arg(short = 'n', long, default_value_t = 100, value_name = "INT")]
    samples: usize,

    /// Seed for the random number generator.
    ///
    /// If not provided, a seed will be chosen randomly.
    #[arg(long, value_name = "INT")]
    seed: Option<u64>,

    /// Precision to use when printing means and standard errors.
    #[arg(short = 'p', long, default_value_t = 6, value_name = "INT")]
    precision: usize,
}

impl Plot {
    pub fn run(self) -> Result<(), Error> {
        let matrix = self.data.load()?;
        let mut rng = rng(self.seed);

        let points = diversity_by_loci(&matrix, self.samples, Strictness::Relaxed, &mut rng);

        write_points(io::stdout().lock(), &points, self.precision)
    }
}

fn write_points<W>(writer: W, points: &[DiversityPoint], precision: usize) -> Result<(), Error>
where
    W: io::Write,
{
    let mut table = Table::new(writer, precision);

    table.write_row(HEADER)?;
    for point in points {
        let row = [
            point.loci.to_string(),
            table.float(point.genotypes.mean),
            table.float(point.genotypes.std_error),
            table.float(point.diversity.mean),
            table.float(point.diversity.std_error),
        ];
        table.write_row(row)?;
    }

    Ok(())
}
