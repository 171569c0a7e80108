//! Genotype matrices.
//!
//! A [`GenotypeMatrix`] holds the allelic data of a number of isolates (rows) typed at a number of
//! loci (columns), along with the partitions of isolates into populations and of loci into
//! linkage groups that constrain randomization.

use std::fmt;

use crate::{partition::PartitionError, Partition};

mod allele;
pub use allele::{Allele, AllelePair, IllegalAllele};

mod cell;
pub use cell::Cell;

mod grid;
pub use grid::Grid;

pub mod parse;
pub use parse::{parse, parse_str, ParseError};

pub mod read;

mod shuffle;

/// Evaluates an expression generically over the grid of a [`Matrix`].
macro_rules! with_grid {
    ($matrix:expr, $grid:ident => $body:expr) => {
        match $matrix {
            $crate::matrix::Matrix::Haploid($grid) => $body,
            $crate::matrix::Matrix::Diploid($grid) => $body,
        }
    };
}
pub(crate) use with_grid;

/// The ploidy of the data.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Ploidy {
    /// One allele per locus.
    Haploid,
    /// Two alleles per locus.
    Diploid,
}

impl fmt::Display for Ploidy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Ploidy::Haploid => "haploid",
            Ploidy::Diploid => "diploid",
        })
    }
}

/// Allelic data, either haploid or diploid.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Matrix {
    /// Haploid data.
    Haploid(Grid<Allele>),
    /// Diploid data.
    Diploid(Grid<AllelePair>),
}

impl Matrix {
    /// Returns the data as a string for the provided isolate and locus.
    pub fn data_string(&self, isolate: usize, locus: usize) -> String {
        with_grid!(self, grid => grid[(isolate, locus)].to_string())
    }

    /// Returns `true` if the data for the provided isolate and locus is missing.
    pub fn is_missing(&self, isolate: usize, locus: usize) -> bool {
        with_grid!(self, grid => grid[(isolate, locus)].is_missing())
    }

    /// Returns `true` if all alleles are missing or can be read as ranks.
    pub fn is_rankable(&self) -> bool {
        with_grid!(self, grid => grid
            .rows()
            .flatten()
            .all(|cell| cell.rank().is_some()))
    }

    /// Returns the number of loci.
    pub fn num_cols(&self) -> usize {
        with_grid!(self, grid => grid.num_cols())
    }

    /// Returns the number of isolates.
    pub fn num_rows(&self) -> usize {
        with_grid!(self, grid => grid.num_rows())
    }

    /// Returns the ploidy of the data.
    pub fn ploidy(&self) -> Ploidy {
        match self {
            Matrix::Haploid(_) => Ploidy::Haploid,
            Matrix::Diploid(_) => Ploidy::Diploid,
        }
    }

    fn retain_cols<F>(&mut self, keep: F)
    where
        F: FnMut(usize) -> bool,
    {
        with_grid!(self, grid => grid.retain_cols(keep))
    }

    fn retain_rows<F>(&mut self, keep: F)
    where
        F: FnMut(usize) -> bool,
    {
        with_grid!(self, grid => grid.retain_rows(keep))
    }
}

/// Whether missing data is held in place when shuffling.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum MissingPolicy {
    /// Missing data stays in place; swaps involving a missing cell are skipped.
    Fixed,
    /// Missing data is shuffled like any other data.
    #[default]
    Free,
}

/// A genotype matrix with its population and linkage structure.
///
/// The matrix keeps the data as originally read, which is only used to restore the data after
/// exclusions, a working copy on which all calculations take place, and optionally a backup of
/// the working copy taken before randomization.
#[derive(Clone, Debug)]
pub struct GenotypeMatrix {
    original: Matrix,
    working: Matrix,
    backup: Option<Matrix>,
    populations: Partition,
    linkage_groups: Partition,
    missing_policy: MissingPolicy,
    isolates_excluded: bool,
    loci_excluded: bool,
    rankable: bool,
}

impl GenotypeMatrix {
    /// Creates a new genotype matrix from data.
    ///
    /// Isolates start out in a single population, and each locus in its own linkage group.
    pub fn new(matrix: Matrix) -> Self {
        let mut new = Self {
            original: matrix.clone(),
            working: matrix,
            backup: None,
            populations: Partition::new(0),
            linkage_groups: Partition::new(0),
            missing_policy: MissingPolicy::default(),
            isolates_excluded: false,
            loci_excluded: false,
            rankable: false,
        };
        new.rederive();
        new
    }

    /// Takes a backup of the working data.
    ///
    /// Only one backup may exist at a time.
    pub fn backup(&mut self) -> Result<(), MatrixError> {
        if self.backup.is_some() {
            return Err(MatrixError::BackupExists);
        }

        self.backup = Some(self.working.clone());
        Ok(())
    }

    /// Returns the working data.
    pub fn data(&self) -> &Matrix {
        &self.working
    }

    pub(crate) fn data_mut(&mut self) -> &mut Matrix {
        &mut self.working
    }

    /// Returns the data as a string for the provided isolate and locus.
    pub fn data_string(&self, isolate: usize, locus: usize) -> String {
        self.working.data_string(isolate, locus)
    }

    /// Removes the backup of the working data, if any.
    pub fn discard_backup(&mut self) {
        self.backup = None;
    }

    /// Removes all loci containing missing data.
    ///
    /// If every locus contains missing data, an error is returned and the matrix is unchanged.
    pub fn exclude_missing_loci(&mut self) -> Result<(), MatrixError> {
        let missing = (0..self.num_cols())
            .map(|locus| self.is_col_missing(locus))
            .collect::<Vec<_>>();

        if missing.iter().all(|&m| m) {
            return Err(MatrixError::ExclusionWouldEmpty { axis: Axis::Loci });
        }

        self.working.retain_cols(|locus| !missing[locus]);
        self.loci_excluded = true;
        self.rederive();

        Ok(())
    }

    /// Removes all isolates containing missing data.
    ///
    /// If every isolate contains missing data, an error is returned and the matrix is unchanged.
    pub fn exclude_missing_isolates(&mut self) -> Result<(), MatrixError> {
        let missing = (0..self.num_rows())
            .map(|isolate| self.is_row_missing(isolate))
            .collect::<Vec<_>>();

        if missing.iter().all(|&m| m) {
            return Err(MatrixError::ExclusionWouldEmpty {
                axis: Axis::Isolates,
            });
        }

        self.working.retain_rows(|isolate| !missing[isolate]);
        self.isolates_excluded = true;
        self.rederive();

        Ok(())
    }

    /// Returns `true` if a backup of the working data exists.
    pub fn has_backup(&self) -> bool {
        self.backup.is_some()
    }

    /// Restores the data as originally read, undoing any exclusions.
    ///
    /// Populations and linkage groups are reset.
    pub fn include_all_data(&mut self) {
        self.working = self.original.clone();
        self.isolates_excluded = false;
        self.loci_excluded = false;
        self.rederive();
    }

    /// Returns `true` if any locus of the provided isolate is missing.
    pub fn is_row_missing(&self, isolate: usize) -> bool {
        (0..self.num_cols()).any(|locus| self.is_missing(isolate, locus))
    }

    /// Returns `true` if any isolate is missing data at the provided locus.
    pub fn is_col_missing(&self, locus: usize) -> bool {
        (0..self.num_rows()).any(|isolate| self.is_missing(isolate, locus))
    }

    /// Returns `true` if the data for the provided isolate and locus is missing.
    pub fn is_missing(&self, isolate: usize, locus: usize) -> bool {
        self.working.is_missing(isolate, locus)
    }

    /// Returns `true` if all alleles in the working data are missing or can be read as ranks.
    pub fn is_rankable(&self) -> bool {
        self.rankable
    }

    /// Returns the linkage groups of loci.
    pub fn linkage_groups(&self) -> &Partition {
        &self.linkage_groups
    }

    /// Returns the missing data policy used when shuffling.
    pub fn missing_policy(&self) -> MissingPolicy {
        self.missing_policy
    }

    /// Returns the number of loci.
    pub fn num_cols(&self) -> usize {
        self.working.num_cols()
    }

    /// Returns the number of isolates.
    pub fn num_rows(&self) -> usize {
        self.working.num_rows()
    }

    /// Returns the ploidy of the data.
    pub fn ploidy(&self) -> Ploidy {
        self.working.ploidy()
    }

    /// Returns the populations of isolates.
    pub fn populations(&self) -> &Partition {
        &self.populations
    }

    /// Restores the working data from the backup, keeping the backup.
    pub fn restore(&mut self) -> Result<(), MatrixError> {
        match &self.backup {
            Some(backup) => {
                self.working.clone_from(backup);
                Ok(())
            }
            None => Err(MatrixError::NoBackup),
        }
    }

    /// Set the sizes of linkage groups, in order of loci.
    pub fn set_linkage_groups(&mut self, sizes: &[usize]) -> Result<(), PartitionError> {
        self.linkage_groups.set_sizes(sizes)
    }

    /// Set the missing data policy used when shuffling.
    pub fn set_missing_policy(&mut self, missing_policy: MissingPolicy) {
        self.missing_policy = missing_policy;
    }

    /// Set the sizes of populations, in order of isolates.
    pub fn set_populations(&mut self, sizes: &[usize]) -> Result<(), PartitionError> {
        self.populations.set_sizes(sizes)
    }

    /// Returns a summary of the linkage groups, populations, and exclusions of the matrix.
    pub fn settings(&self) -> Settings<'_> {
        Settings(self)
    }

    fn rederive(&mut self) {
        self.populations = Partition::new(self.num_rows());
        self.linkage_groups = Partition::singletons(self.num_cols());
        self.rankable = self.working.is_rankable();
    }
}

impl fmt::Display for GenotypeMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MIN_WIDTH: usize = 3;

        let width = (0..self.num_rows())
            .flat_map(|i| (0..self.num_cols()).map(move |j| (i, j)))
            .map(|(i, j)| self.data_string(i, j).len())
            .fold(MIN_WIDTH, usize::max)
            + 1;

        write!(f, "Iso   Loci: ")?;
        for locus in 1..=self.num_cols() {
            write!(f, "{locus:>width$}")?;
        }
        writeln!(f)?;
        writeln!(f)?;

        for isolate in 0..self.num_rows() {
            write!(f, "{:>3}       : ", isolate + 1)?;
            for locus in 0..self.num_cols() {
                write!(f, "{:>width$}", self.data_string(isolate, locus))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// A summary of the settings of a [`GenotypeMatrix`].
#[derive(Debug)]
pub struct Settings<'a>(&'a GenotypeMatrix);

impl<'a> fmt::Display for Settings<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let matrix = self.0;

        describe_partition(f, matrix.linkage_groups(), "linkage group")?;
        describe_partition(f, matrix.populations(), "population")?;

        if matrix.loci_excluded {
            writeln!(f, "Loci with missing data excluded.")?;
        }
        if matrix.isolates_excluded {
            writeln!(f, "Isolates with missing data excluded.")?;
        }
        if !(matrix.loci_excluded || matrix.isolates_excluded) {
            writeln!(f, "All datapoints included.")?;
        }

        Ok(())
    }
}

fn describe_partition(
    f: &mut fmt::Formatter<'_>,
    partition: &Partition,
    name: &str,
) -> fmt::Result {
    match partition.num_parts() {
        1 => write!(f, "There is 1 {name}: ")?,
        n => write!(f, "There are {n} {name}s: ")?,
    }
    writeln!(f, "{partition}")
}

/// An axis of a genotype matrix.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Axis {
    /// Isolates, i.e. rows.
    Isolates,
    /// Loci, i.e. columns.
    Loci,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::Isolates => "isolates",
            Axis::Loci => "loci",
        })
    }
}

/// An error associated with manipulating a genotype matrix.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MatrixError {
    /// A backup was requested while one already exists.
    BackupExists,
    /// Excluding missing data would remove every isolate or locus.
    ExclusionWouldEmpty {
        /// The axis along which exclusion was attempted.
        axis: Axis,
    },
    /// A restore was requested without a backup.
    NoBackup,
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::BackupExists => f.write_str("a backup of the working data already exists"),
            MatrixError::ExclusionWouldEmpty { axis } => {
                write!(f, "all {axis} contain missing data, cannot exclude them")
            }
            MatrixError::NoBackup => f.write_str("no backup of the working data to restore"),
        }
    }
}

impl std::error::Error for MatrixError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(s: &str) -> GenotypeMatrix {
        parse_str(s).unwrap()
    }

    #[test]
    fn test_new_derives_partitions() {
        let matrix = matrix("A\tB\tC\nA\tA\tC\n");

        assert_eq!(matrix.populations().sizes(), vec![2]);
        assert_eq!(matrix.linkage_groups().sizes(), vec![1, 1, 1]);
        assert_eq!(matrix.missing_policy(), MissingPolicy::Free);
        assert!(!matrix.is_rankable());
    }

    #[test]
    fn test_exclude_missing_isolates() {
        let mut matrix = matrix("A\t?\nA\tB\n-\tB\nC\tC\n");
        matrix.set_populations(&[2, 2]).unwrap();

        matrix.exclude_missing_isolates().unwrap();

        assert_eq!(matrix.num_rows(), 2);
        assert_eq!(matrix.data_string(0, 1), "B");
        assert_eq!(matrix.data_string(1, 0), "C");
        assert_eq!(matrix.populations().sizes(), vec![2]);
    }

    #[test]
    fn test_exclude_missing_loci() {
        let mut matrix = matrix("A\t?\tC\nA\tB\tD\n");

        matrix.exclude_missing_loci().unwrap();

        assert_eq!(matrix.num_cols(), 2);
        assert_eq!(matrix.data_string(1, 1), "D");
        assert_eq!(matrix.linkage_groups().num_parts(), 2);
    }

    #[test]
    fn test_exclusion_that_would_empty_is_rejected() {
        let mut matrix = matrix("A\t?\n-\tB\n");
        let before = matrix.data().clone();

        assert_eq!(
            matrix.exclude_missing_isolates(),
            Err(MatrixError::ExclusionWouldEmpty {
                axis: Axis::Isolates
            })
        );
        assert_eq!(
            matrix.exclude_missing_loci(),
            Err(MatrixError::ExclusionWouldEmpty { axis: Axis::Loci })
        );
        assert_eq!(matrix.data(), &before);
    }

    #[test]
    fn test_include_all_data() {
        let mut matrix = matrix("1\t?\n2\t3\n");
        matrix.exclude_missing_loci().unwrap();
        assert_eq!(matrix.num_cols(), 1);

        matrix.include_all_data();
        assert_eq!(matrix.num_cols(), 2);
        assert_eq!(matrix.data_string(0, 1), "?");
        assert!(matrix.is_rankable());
    }

    #[test]
    fn test_overflowing_diploid_ranks_are_not_rankable() {
        assert!(matrix("18446744073709551615/?\t1/2\n").is_rankable());
        assert!(!matrix("18446744073709551615/1\t1/2\n").is_rankable());
    }

    #[test]
    fn test_backup_discipline() {
        let mut matrix = matrix("A\tB\n");

        assert_eq!(matrix.restore(), Err(MatrixError::NoBackup));
        matrix.backup().unwrap();
        assert_eq!(matrix.backup(), Err(MatrixError::BackupExists));
        matrix.restore().unwrap();
        assert!(matrix.has_backup());
        matrix.discard_backup();
        assert!(!matrix.has_backup());
    }

    #[test]
    fn test_display_dataset() {
        let matrix = matrix("a/b\tc/d\nx/y\t?/?\n");
        let expected = "\
Iso   Loci:    1   2

  1       :  a/b c/d
  2       :  x/y ?/?
";
        assert_eq!(matrix.to_string(), expected);
    }

    #[test]
    fn test_display_settings() {
        let mut matrix = matrix("A\tB\tC\nA\tA\tC\nB\tB\tC\n");
        matrix.set_linkage_groups(&[3]).unwrap();

        assert_eq!(
            matrix.settings().to_string(),
            "There is 1 linkage group: 1-3\nThere is 1 population: 1-3\nAll datapoints included.\n"
        );

        matrix.set_populations(&[1, 2]).unwrap();
        matrix.exclude_missing_loci().unwrap();

        assert_eq!(
            matrix.settings().to_string(),
            "There are 3 linkage groups: 1 2 3\nThere is 1 population: 1-3\n\
             Loci with missing data excluded.\n"
        );
    }
}
