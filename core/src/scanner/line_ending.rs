use std::fmt;

const CR: char = '\r';
const LF: char = '\n';

/// A line ending convention.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LineEnding {
    /// Lines end with a pair of CR and LF, in either order.
    Dos,
    /// Lines end with CR.
    Mac,
    /// Lines end with LF.
    Unix,
    /// No line terminator has been seen; CR and LF are both accepted.
    Unknown,
}

impl LineEnding {
    /// Classifies the convention from the first terminator in a source and the character following
    /// it, if any.
    pub(super) fn classify(terminator: char, next: Option<char>) -> Self {
        match (terminator, next) {
            (LF, Some(CR)) | (CR, Some(LF)) => Self::Dos,
            (LF, _) => Self::Unix,
            (CR, _) => Self::Mac,
            _ => Self::Unknown,
        }
    }

    /// Returns `true` if `c` ends a line under this convention.
    pub(super) fn terminates(self, c: char) -> bool {
        match self {
            Self::Unix => c == LF,
            Self::Mac => c == CR,
            Self::Dos | Self::Unknown => c == CR || c == LF,
        }
    }

    /// Returns the character that may follow `terminator` as part of the same line ending.
    pub(super) fn partner(self, terminator: char) -> Option<char> {
        match (self, terminator) {
            (Self::Dos | Self::Unknown, LF) => Some(CR),
            (Self::Dos | Self::Unknown, CR) => Some(LF),
            _ => None,
        }
    }

    /// Returns the 1-based line number following `cr` carriage returns and `lf` line feeds.
    pub(super) fn line_number(self, cr: usize, lf: usize) -> usize {
        match self {
            Self::Unix => lf + 1,
            Self::Mac => cr + 1,
            Self::Dos | Self::Unknown => cr.max(lf) + 1,
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dos => "dos",
            Self::Mac => "mac",
            Self::Unix => "unix",
            Self::Unknown => "unknown",
        })
    }
}

pub(super) fn is_terminator(c: char) -> bool {
    c == CR || c == LF
}
