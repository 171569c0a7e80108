use std::io::{self, Write};

use anyhow::Error;

use clap::Parser;

use multilocus_core::{
    randomization::{Randomization, Replicates},
    stats::{find_partitions, PartitionSearch},
    GenotypeMatrix,
};

use crate::{
    args::{log_progress, DataArgs, RandomizationArgs},
    table::{Table, OBSERVED, P_VALUES},
};

/// Replicates between progress reports, lower than usual since searching is slow.
const PROGRESS_STEP: usize = 2;

/// Search for partitions of isolates.
///
/// A partition is a group of isolates that shares at most one allele with the remaining
/// isolates at every locus. Every group from two isolates up to half the isolates is tested,
/// which is slow for large datasets. Haploid data with at least four isolates only.
#[derive(Debug, Parser)]
pub struct Partitions {
    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    randomization: RandomizationArgs,
}

impl Partitions {
    pub fn run(self) -> Result<(), Error> {
        let mut matrix = self.data.load()?;
        let mut rng = self.randomization.rng();

        let replicates = Randomization::new(self.randomization.randomizations)
            .set_progress_step(PROGRESS_STEP)
            .run(&mut matrix, &mut rng, find_partitions, log_progress)?;

        write_partitions(io::stdout().lock(), &matrix, &replicates)
    }
}

fn write_partitions<W>(
    mut writer: W,
    matrix: &GenotypeMatrix,
    replicates: &Replicates<PartitionSearch>,
) -> Result<(), Error>
where
    W: Write,
{
    let observed = &replicates.observed;
    let n = matrix.num_rows();

    if observed.is_empty() {
        writeln!(writer, "No partitions found")?;
    }

    let width = (0..n)
        .flat_map(|i| (0..matrix.num_cols()).map(move |j| (i, j)))
        .map(|(i, j)| matrix.data_string(i, j).len())
        .fold(3, usize::max)
        + 1;

    for partition in observed.partitions() {
        writeln!(
            writer,
            "* Partition of size {} and {} found:",
            partition.len(),
            n - partition.len()
        )?;

        for &isolate in partition {
            write!(writer, "Isolate {:>3} : ", isolate + 1)?;
            for locus in 0..matrix.num_cols() {
                write!(writer, "{:>width$}", matrix.data_string(isolate, locus))?;
            }
            writeln!(writer)?;
        }
        writeln!(writer)?;
    }

    let mut table = Table::new(writer, 0);

    if !observed.is_empty() {
        table.write_row(["Partition_Size", "Frequency"])?;
        for (size, frequency) in observed.sizes() {
            table.write_row([size, frequency])?;
        }
    }

    if let Some(p) = replicates.p_values() {
        table.write_empty()?;
        table.write_row(["Replicate", "Partitions"])?;
        table.write_row([OBSERVED.to_string(), observed.len().to_string()])?;
        for (i, search) in replicates.replicates.iter().enumerate() {
            table.write_row([(i + 1).to_string(), search.len().to_string()])?;
        }
        table.write_row([P_VALUES.to_string(), p.to_string()])?;
    }

    Ok(())
}
