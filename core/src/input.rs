//! Where genotype data is read from.

use std::{
    env, error, fmt,
    fs::File,
    io::{self, IsTerminal as _},
    path::{Path, PathBuf},
};

/// A file or stdin.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Input {
    /// A file path.
    Path(PathBuf),
    /// Stdin.
    Stdin,
}

impl Input {
    /// Setting this environment variable disables the check in [`Input::new`].
    ///
    /// Useful where stdin is neither a terminal nor carries data, as when testing.
    pub const ENV_KEY_ALLOW_STDIN: &'static str = "MULTILOCUS_ALLOW_STDIN";

    /// Creates an input from an optional path, falling back to stdin.
    ///
    /// Fails if a path is given while data is also piped to stdin, or if neither is the case, so
    /// that reading never blocks on an interactive terminal.
    pub fn new(path: Option<PathBuf>) -> Result<Self, InputError> {
        let input = Self::new_unchecked(path);

        if env::var_os(Self::ENV_KEY_ALLOW_STDIN).is_none() {
            input.check(!io::stdin().is_terminal())?;
        }

        Ok(input)
    }

    /// Creates an input without inspecting stdin.
    pub fn new_unchecked(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdin, Self::Path)
    }

    fn check(&self, piped: bool) -> Result<(), InputError> {
        match (self, piped) {
            (Input::Path(_), true) => Err(InputError::Ambiguous),
            (Input::Stdin, false) => Err(InputError::Missing),
            _ => Ok(()),
        }
    }

    /// Returns the path, if reading from a file.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Input::Path(path) => Some(path.as_path()),
            Input::Stdin => None,
        }
    }

    /// Opens the input for buffered reading.
    pub fn open(&self) -> io::Result<Reader> {
        Ok(match self {
            Input::Path(path) => Reader::File(io::BufReader::new(File::open(path)?)),
            Input::Stdin => Reader::Stdin(io::stdin().lock()),
        })
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Path(path) => write!(f, "{}", path.display()),
            Input::Stdin => f.write_str("stdin"),
        }
    }
}

/// An opened [`Input`].
#[derive(Debug)]
pub enum Reader {
    /// A buffered file.
    File(io::BufReader<File>),
    /// Locked stdin.
    Stdin(io::StdinLock<'static>),
}

/// An error associated with choosing an input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputError {
    /// A path was given while data was also piped to stdin.
    Ambiguous,
    /// No path was given and nothing was piped to stdin.
    Missing,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Ambiguous => f.write_str("received input both via file and stdin"),
            InputError::Missing => f.write_str("received no input via file or stdin"),
        }
    }
}

impl error::Error for InputError {}
