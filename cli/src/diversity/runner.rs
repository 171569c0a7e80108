use std::io;

use anyhow::Error;

use multilocus_core::{
    randomization::{Replicates, Tally},
    stats::{DiversityStats, PairwiseR},
};

use crate::table::{Table, OBSERVED, P_VALUES};

const HEADER: [&str; 8] = [
    "Replicate",
    "NumDiff",
    "MaxFreq",
    "Diver",
    "PrCompat",
    "IndAssoc",
    "rBarD",
    "rBarS",
];

type Row = (DiversityStats, Option<PairwiseR>);

#[derive(Debug)]
pub struct Runner<W> {
    table: Table<W>,
}

impl<W> Runner<W>
where
    W: io::Write,
{
    pub fn new(writer: W, precision: usize) -> Self {
        Self {
            table: Table::new(writer, precision),
        }
    }

    pub fn write_statistics(&mut self, replicates: &Replicates<Row>) -> Result<(), Error> {
        self.table.write_row(HEADER)?;

        let (observed, _) = &replicates.observed;
        self.write_stats(OBSERVED, observed)?;

        for (i, (stats, _)) in replicates.replicates.iter().enumerate() {
            self.write_stats(&(i + 1).to_string(), stats)?;
        }

        if !replicates.replicates.is_empty() {
            let values = replicates
                .replicates
                .iter()
                .map(|(stats, _)| stats.clone())
                .collect::<Vec<_>>();
            let p = DiversityStats::p_values(observed, &values);

            let table = &self.table;
            let row = vec![
                String::from(P_VALUES),
                table.optional(Some(p.num_genotypes)),
                table.optional(Some(p.max_frequency)),
                table.optional(Some(p.diversity)),
                table.optional(Some(p.proportion_compatible)),
                table.optional(Some(p.index_association)),
                table.optional(Some(p.rbar_d)),
                table.optional(p.rbar_s),
            ];
            self.table.write_row(row)?;
        }

        Ok(())
    }

    pub fn write_pairs(&mut self, replicates: &Replicates<Row>) -> Result<(), Error> {
        let (_, Some(observed)) = &replicates.observed else {
            return Ok(());
        };

        let values = replicates
            .replicates
            .iter()
            .filter_map(|(_, pairs)| pairs.clone())
            .collect::<Vec<_>>();

        self.table.write_empty()?;

        let header = std::iter::once(String::from("Replicate")).chain(
            observed
                .iter()
                .map(|((i, j), _)| format!("{}&{}", i + 1, j + 1)),
        );
        self.table.write_row(header)?;

        self.write_r(OBSERVED, observed)?;
        for (i, pairs) in values.iter().enumerate() {
            self.write_r(&(i + 1).to_string(), pairs)?;
        }

        if !values.is_empty() {
            let p_values = PairwiseR::p_values(observed, &values);

            let row = std::iter::once(String::from(P_VALUES))
                .chain(p_values.into_iter().map(|p| self.table.optional(p)))
                .collect::<Vec<_>>();
            self.table.write_row(row)?;
        }

        Ok(())
    }

    fn write_r(&mut self, label: &str, pairs: &PairwiseR) -> Result<(), Error> {
        let row = std::iter::once(String::from(label))
            .chain(pairs.values().iter().map(|&r| self.table.optional(r)))
            .collect::<Vec<_>>();

        self.table.write_row(row)?;
        Ok(())
    }

    fn write_stats(&mut self, label: &str, stats: &DiversityStats) -> Result<(), Error> {
        let table = &self.table;
        let row = vec![
            String::from(label),
            stats.num_genotypes.to_string(),
            stats.max_frequency.to_string(),
            table.float(stats.diversity),
            table.float(stats.proportion_compatible),
            table.float(stats.index_association),
            table.float(stats.rbar_d),
            table.optional(stats.rbar_s),
        ];

        self.table.write_row(row)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use multilocus_core::{
        matrix::parse_str,
        stats::{Diversity, Strictness},
    };

    fn observed(s: &str) -> Replicates<Row> {
        let matrix = parse_str(s).unwrap();
        let diversity = Diversity::new(&matrix, Strictness::Relaxed);

        Replicates {
            observed: (
                diversity.evaluate(&matrix),
                Some(diversity.pairwise(&matrix)),
            ),
            replicates: Vec::new(),
        }
    }

    #[test]
    fn test_write_statistics() {
        let mut output = Vec::new();

        Runner::new(&mut output, 3)
            .write_statistics(&observed("A\tB\tC\nA\tA\tC\nB\tB\tC\n"))
            .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Replicate\tNumDiff\tMaxFreq\tDiver\tPrCompat\tIndAssoc\trBarD\trBarS\n\
             Observed\t3\t1\t1.000\t1.000\t-0.500\t-0.500\tN/A\n"
        );
    }

    #[test]
    fn test_write_pairs() {
        let mut output = Vec::new();

        Runner::new(&mut output, 2)
            .write_pairs(&observed("A\tB\tC\nA\tA\tC\nB\tB\tC\n"))
            .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "\nReplicate\t1&2\t1&3\t2&3\nObserved\t-0.50\tN/A\tN/A\n"
        );
    }

    #[test]
    fn test_write_p_values() {
        let mut replicates = observed("1\t1\n2\t2\n3\t3\n");
        replicates.replicates = vec![replicates.observed.clone(); 2];
        let mut output = Vec::new();

        Runner::new(&mut output, 1)
            .write_statistics(&replicates)
            .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output.lines().last(),
            Some("P_Values\t1.0\t1.0\t1.0\t1.0\t< 0.5\t< 0.5\t2.0")
        );
    }
}
