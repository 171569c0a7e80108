//! Contiguous partitions of an index range.
//!
//! Both populations (over isolates) and linkage groups (over loci) are described by a
//! [`Partition`]: an ordered sequence of non-empty, contiguous blocks that together cover the
//! indices `0..len` exactly.

use std::fmt;

/// A partition of the indices `0..len` into ordered, non-empty, contiguous blocks.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Partition {
    // Exclusive end of each block; strictly increasing, with the last equal to the length.
    ends: Vec<usize>,
}

impl Partition {
    /// Creates a new partition of `len` indices consisting of a single block.
    pub fn new(len: usize) -> Self {
        let mut partition = Self { ends: Vec::new() };
        partition.set_len(len);
        partition
    }

    /// Creates a new partition of `len` indices with one block per index.
    pub fn singletons(len: usize) -> Self {
        Self {
            ends: (1..=len).collect(),
        }
    }

    /// Creates a new partition from block sizes.
    pub fn from_sizes(sizes: &[usize]) -> Result<Self, PartitionError> {
        let len = sizes.iter().sum();
        let mut partition = Self::new(len);
        partition.set_sizes(sizes)?;
        Ok(partition)
    }

    /// Returns the inclusive bounds `(start, end)` of block `i`.
    ///
    /// # Panics
    ///
    /// If `i` is not less than the number of parts.
    pub fn bounds(&self, i: usize) -> (usize, usize) {
        let start = if i == 0 { 0 } else { self.ends[i - 1] };
        (start, self.ends[i] - 1)
    }

    /// Returns an iterator over the inclusive bounds of each block in order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.num_parts()).map(|i| self.bounds(i))
    }

    /// Returns `true` if the partition covers no indices.
    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// Returns the number of indices covered by the partition.
    pub fn len(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    /// Joins all blocks into a single block.
    pub fn merge_all(&mut self) {
        self.set_len(self.len())
    }

    /// Returns the number of blocks.
    pub fn num_parts(&self) -> usize {
        self.ends.len()
    }

    /// Returns the index of the block containing `index`, if any.
    pub fn part_of(&self, index: usize) -> Option<usize> {
        match self.ends.binary_search(&index) {
            Ok(i) => (i + 1 < self.ends.len()).then_some(i + 1),
            Err(i) => (i < self.ends.len()).then_some(i),
        }
    }

    /// Resets the partition to a single block covering `len` indices.
    pub fn set_len(&mut self, len: usize) {
        self.ends.clear();

        if len > 0 {
            self.ends.push(len);
        }
    }

    /// Replaces all blocks with blocks of the provided sizes, assigned in order.
    ///
    /// The sizes must be non-zero and sum to the length of the partition. On error, the partition
    /// is left unchanged.
    pub fn set_sizes(&mut self, sizes: &[usize]) -> Result<(), PartitionError> {
        if sizes.is_empty() {
            return Err(PartitionError::NoParts);
        }

        if let Some(index) = sizes.iter().position(|&size| size == 0) {
            return Err(PartitionError::EmptyPart { index });
        }

        let total: usize = sizes.iter().sum();
        if total != self.len() {
            return Err(PartitionError::WrongTotal {
                expected: self.len(),
                found: total,
            });
        }

        self.ends = sizes
            .iter()
            .scan(0, |end, size| {
                *end += size;
                Some(*end)
            })
            .collect();

        Ok(())
    }

    /// Returns the sizes of each block.
    pub fn sizes(&self) -> Vec<usize> {
        self.iter().map(|(start, end)| end - start + 1).collect()
    }

    /// Splits the partition into one block per index.
    pub fn split_all(&mut self) {
        *self = Self::singletons(self.len())
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (start, end)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }

            if start == end {
                write!(f, "{}", start + 1)?;
            } else {
                write!(f, "{}-{}", start + 1, end + 1)?;
            }
        }

        Ok(())
    }
}

/// An error associated with setting the blocks of a partition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PartitionError {
    /// A block size was zero.
    EmptyPart {
        /// Index of the first empty block.
        index: usize,
    },
    /// No block sizes were provided.
    NoParts,
    /// Block sizes do not sum to the length of the partition.
    WrongTotal {
        /// The length of the partition.
        expected: usize,
        /// The sum of the provided sizes.
        found: usize,
    },
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionError::EmptyPart { index } => {
                write!(f, "size of block {} must be at least one", index + 1)
            }
            PartitionError::NoParts => f.write_str("at least one block size required"),
            PartitionError::WrongTotal { expected, found } => write!(
                f,
                "block sizes must sum to {expected} (found sizes summing to {found})"
            ),
        }
    }
}

impl std::error::Error for PartitionError {}
