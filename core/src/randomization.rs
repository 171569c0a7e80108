//! Randomization tests.
//!
//! A statistic is evaluated once on the observed data and then once per replicate on shuffled
//! data. The observed value is compared to the replicates to obtain a p-value, see [`Tally`].

use std::fmt;

use rand::Rng;

use crate::matrix::{GenotypeMatrix, MatrixError};

/// How data is shuffled between replicates.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Shuffle {
    /// Within populations, keeping linkage groups together, honouring the missing data policy.
    ///
    /// See [`GenotypeMatrix::shuffle`].
    #[default]
    Constrained,
    /// Whole isolates across the entire matrix.
    ///
    /// See [`GenotypeMatrix::shuffle_unconstrained`].
    Unconstrained,
    /// Isolates among the provided isolates only, across all loci, honouring the missing data
    /// policy.
    ///
    /// See [`GenotypeMatrix::shuffle_rows_among`].
    Among(Vec<usize>),
}

/// A randomization test.
#[derive(Clone, Debug)]
pub struct Randomization {
    replicates: usize,
    progress_step: usize,
    shuffle: Shuffle,
}

impl Randomization {
    /// The default number of replicates between progress reports.
    pub const DEFAULT_PROGRESS_STEP: usize = 10;

    /// Creates a new randomization test with the provided number of replicates.
    pub fn new(replicates: usize) -> Self {
        Self {
            replicates,
            progress_step: Self::DEFAULT_PROGRESS_STEP,
            shuffle: Shuffle::default(),
        }
    }

    /// Returns the number of replicates.
    pub fn replicates(&self) -> usize {
        self.replicates
    }

    /// Evaluates `statistic` on the observed data and on each replicate.
    ///
    /// The working data of the matrix is backed up first, and restored after every replicate, so
    /// that the matrix is unchanged when this returns, also on error. The `on_progress` callback
    /// receives the number of finished replicates and the total at every progress step.
    pub fn run<T, E, R, F, P>(
        &self,
        matrix: &mut GenotypeMatrix,
        rng: &mut R,
        mut statistic: F,
        mut on_progress: P,
    ) -> Result<Replicates<T>, E>
    where
        E: From<MatrixError>,
        R: Rng + ?Sized,
        F: FnMut(&GenotypeMatrix) -> Result<T, E>,
        P: FnMut(usize, usize),
    {
        let observed = statistic(matrix)?;

        matrix.backup()?;

        let result = self.run_replicates(matrix, rng, &mut statistic, &mut on_progress);

        let restored = matrix.restore();
        matrix.discard_backup();
        let replicates = result?;
        restored?;

        Ok(Replicates {
            observed,
            replicates,
        })
    }

    /// Set the number of replicates between calls to the progress callback.
    ///
    /// A step of zero disables progress reports.
    pub fn set_progress_step(mut self, progress_step: usize) -> Self {
        self.progress_step = progress_step;
        self
    }

    /// Set how data is shuffled between replicates.
    pub fn set_shuffle(mut self, shuffle: Shuffle) -> Self {
        self.shuffle = shuffle;
        self
    }

    fn run_replicates<T, E, R, F, P>(
        &self,
        matrix: &mut GenotypeMatrix,
        rng: &mut R,
        statistic: &mut F,
        on_progress: &mut P,
    ) -> Result<Vec<T>, E>
    where
        E: From<MatrixError>,
        R: Rng + ?Sized,
        F: FnMut(&GenotypeMatrix) -> Result<T, E>,
        P: FnMut(usize, usize),
    {
        let mut values = Vec::with_capacity(self.replicates);

        for i in 1..=self.replicates {
            match &self.shuffle {
                Shuffle::Constrained => matrix.shuffle(rng),
                Shuffle::Unconstrained => matrix.shuffle_unconstrained(rng),
                Shuffle::Among(isolates) => matrix.shuffle_rows_among(isolates, rng),
            }

            values.push(statistic(matrix)?);
            matrix.restore()?;

            if self.progress_step > 0 && i % self.progress_step == 0 {
                on_progress(i, self.replicates);
            }
        }

        Ok(values)
    }
}

/// The observed value of a statistic along with its values in each replicate.
#[derive(Clone, Debug, PartialEq)]
pub struct Replicates<T> {
    /// Value on the observed data.
    pub observed: T,
    /// Values on shuffled data, in order of replicates.
    pub replicates: Vec<T>,
}

impl<T> Replicates<T>
where
    T: Tally,
{
    /// Returns the p-values of the observed value, or `None` if there are no replicates.
    pub fn p_values(&self) -> Option<T::PValues> {
        (!self.replicates.is_empty()).then(|| T::p_values(&self.observed, &self.replicates))
    }
}

/// A statistic, or a row of statistics, that can be tallied against replicates.
pub trait Tally: Sized {
    /// The p-values of the statistic.
    type PValues;

    /// Returns the p-values of the observed value given the replicate values.
    ///
    /// Only called with at least one replicate.
    fn p_values(observed: &Self, replicates: &[Self]) -> Self::PValues;
}

/// The direction in which a replicate counts as at least as extreme as the observed value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// Replicates less than or equal to the observed value.
    AtMost,
    /// Replicates greater than or equal to the observed value.
    AtLeast,
    /// Replicates on the same side of zero as the observed value and at least as far from it.
    ///
    /// P-values are doubled.
    TwoSided,
}

impl Direction {
    /// Returns the number of values at least as extreme as `observed`.
    pub fn count<I>(self, observed: f64, values: I) -> usize
    where
        I: IntoIterator<Item = f64>,
    {
        let extreme = |x: f64| match self {
            Direction::AtMost => x <= observed,
            Direction::AtLeast => x >= observed,
            Direction::TwoSided if observed < 0.0 => x <= observed,
            Direction::TwoSided => x >= observed,
        };

        values.into_iter().filter(|&x| extreme(x)).count()
    }

    fn factor(self) -> usize {
        match self {
            Direction::AtMost | Direction::AtLeast => 1,
            Direction::TwoSided => 2,
        }
    }
}

/// An empirical p-value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PValue {
    count: usize,
    replicates: usize,
    factor: usize,
}

impl PValue {
    /// Creates a new p-value by counting the replicate values at least as extreme as the observed
    /// value.
    ///
    /// Replicates may be given as `Option<f64>`, where `None` marks a replicate in which the
    /// statistic is undefined. Such replicates are never counted as extreme, but still count
    /// towards the number of replicates.
    pub fn new<I>(direction: Direction, observed: f64, replicates: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<f64>>,
    {
        let mut n = 0;
        let values = replicates
            .into_iter()
            .inspect(|_| n += 1)
            .filter_map(Into::<Option<f64>>::into);
        let count = direction.count(observed, values);

        Self {
            count,
            replicates: n,
            factor: direction.factor(),
        }
    }

    /// Returns the number of replicates at least as extreme as the observed value.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the p-value.
    ///
    /// When no replicate is at least as extreme, this is the upper bound on the p-value.
    pub fn value(&self) -> f64 {
        (self.factor * self.count.max(1)) as f64 / self.replicates as f64
    }
}

impl fmt::Display for PValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            f.write_str("< ")?;
        }

        match f.precision() {
            Some(precision) => write!(f, "{:.precision$}", self.value()),
            None => write!(f, "{}", self.value()),
        }
    }
}

impl Tally for f64 {
    type PValues = PValue;

    fn p_values(observed: &Self, replicates: &[Self]) -> Self::PValues {
        PValue::new(Direction::AtLeast, *observed, replicates.iter().copied())
    }
}
