use std::io::{self, Write};

use anyhow::Error;

use clap::Parser;

use crate::args::DataArgs;

/// Print dataset with its settings.
#[derive(Debug, Parser)]
pub struct View {
    #[command(flatten)]
    data: DataArgs,
}

impl View {
    pub fn run(self) -> Result<(), Error> {
        let matrix = self.data.load()?;

        let mut writer = io::stdout().lock();
        writeln!(
            writer,
            "Data is {}, with {} isolates and {} loci.",
            matrix.ploidy(),
            matrix.num_rows(),
            matrix.num_cols()
        )?;
        write!(writer, "{}", matrix.settings())?;
        writeln!(writer)?;
        write!(writer, "{matrix}")?;

        Ok(())
    }
}
