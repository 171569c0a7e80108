#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Tools for analysing linkage, diversity and differentiation in multilocus allelic data.
//!
//! This serves as the core library implementation for the `multilocus` CLI, but can also be used
//! as a free-standing library.
//!
//! # Overview
//!
//! The core struct is a [`GenotypeMatrix`], holding haploid or diploid alleles for a number of
//! isolates typed at a number of loci, along with their division into populations and linkage
//! groups. Statistics in the [`stats`] module are calculated on a matrix, and can be tested for
//! significance by shuffling the matrix using a [`Randomization`](randomization::Randomization).
//!
//! # Example
//!
//! Let's read a small haploid dataset and calculate the index of association.
//!
//! ```
//! use multilocus_core::{matrix::parse_str, stats::VarianceDistances};
//!
//! let matrix = parse_str("A\tB\tC\nA\tA\tC\nB\tB\tC\n").expect("valid data");
//!
//! let association = VarianceDistances::new(&matrix).index_association(&matrix);
//!
//! assert!((association.index - -0.5).abs() < 1e-12);
//! ```

#[cfg(test)]
#[macro_use]
pub(crate) mod approx;

pub mod combination;

pub mod input;
pub use input::Input;

pub mod matrix;
pub use matrix::{GenotypeMatrix, MissingPolicy, Ploidy};

pub mod partition;
pub use partition::Partition;

pub mod randomization;

pub mod scanner;
pub use scanner::Scanner;

pub mod stats;

pub mod utils;
