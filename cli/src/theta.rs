use std::io::{self, Write};

use anyhow::Error;

use clap::Parser;

use multilocus_core::{
    randomization::{Randomization, Shuffle, Tally},
    stats::{self, theta::selected_isolates},
};

use crate::args::{log_progress, DataArgs, RandomizationArgs};

/// Calculate population differentiation as Weir's θ.
///
/// Requires at least two populations. With randomizations, whole isolates are shuffled across
/// populations to obtain a p-value.
#[derive(Debug, Parser)]
pub struct Theta {
    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    randomization: RandomizationArgs,

    /// Populations to include.
    ///
    /// By default, all populations are included. By providing a selection, θ is calculated over
    /// the selected populations only, and randomizations shuffle isolates among the selected
    /// populations only. Populations are numbered from 1 in order of isolates. Use comma to
    /// separate populations.
    #[arg(
        short = 's',
        long,
        use_value_delimiter = true,
        value_delimiter = ',',
        value_parser = clap::value_parser!(u64).range(1..),
        value_name = "INT,..."
    )]
    select: Option<Vec<u64>>,

    /// Precision to use when printing θ.
    #[arg(short = 'p', long, default_value_t = 6, value_name = "INT")]
    precision: usize,
}

impl Theta {
    pub fn run(self) -> Result<(), Error> {
        let mut matrix = self.data.load()?;
        let mut rng = self.randomization.rng();
        let randomization = Randomization::new(self.randomization.randomizations);

        let mut writer = io::stdout().lock();
        let precision = self.precision;

        let replicates = match &self.select {
            Some(selected) => {
                let mut selected = selected
                    .iter()
                    .map(|&i| (i - 1) as usize)
                    .collect::<Vec<_>>();
                selected.sort_unstable();
                selected.dedup();

                let isolates = selected_isolates(&matrix, &selected)?;

                write!(writer, "Populations selected for analysis:")?;
                for i in selected.iter() {
                    write!(writer, " {}", i + 1)?;
                }
                writeln!(writer)?;
                writeln!(writer)?;

                randomization.set_shuffle(Shuffle::Among(isolates)).run(
                    &mut matrix,
                    &mut rng,
                    |matrix| stats::theta_subset(matrix, &selected),
                    log_progress,
                )?
            }
            None => randomization.set_shuffle(Shuffle::Unconstrained).run(
                &mut matrix,
                &mut rng,
                stats::theta,
                log_progress,
            )?,
        };

        writeln!(writer, "Theta:\t{:.precision$}", replicates.observed)?;

        if !replicates.replicates.is_empty() {
            writeln!(writer)?;
            for (i, theta) in replicates.replicates.iter().enumerate() {
                writeln!(writer, "Randomization #{}:\t{theta:.precision$}", i + 1)?;
            }

            let p = f64::p_values(&replicates.observed, &replicates.replicates);
            writeln!(writer)?;
            writeln!(writer, "P value:\t{p:.precision$}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::error::ErrorKind as ClapErrorKind;

    use crate::tests::{parse_subcmd, try_parse_subcmd};

    #[test]
    fn test_parse_select() {
        let args = parse_subcmd::<Theta>("multilocus theta -P 2,2,2 -s 3,1 data.txt");

        assert_eq!(args.select, Some(vec![3, 1]));
    }

    #[test]
    fn test_select_is_one_based() {
        let result = try_parse_subcmd::<Theta>("multilocus theta -P 2,2 -s 0,1 data.txt");

        assert_eq!(result.unwrap_err().kind(), ClapErrorKind::ValueValidation);
    }
}
