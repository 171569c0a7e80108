//! Character scanning and tokenizing.
//!
//! A [`Scanner`] wraps any character [`Source`] and provides token operations on top of the
//! source's primitives: peeking, reading up to or while in a set of delimiters, reading lines with
//! automatic line ending detection, and reading numeric tokens. Comments are stripped
//! transparently as characters are read.
//!
//! Nothing in the scanner assumes that more than one character can be pushed back: every
//! look-ahead is done by recording a position and moving back to it.

use std::{fmt, io};

mod line_ending;
pub use line_ending::LineEnding;

mod source;
pub use source::{BufferSource, Source};

mod stream;
pub use stream::StreamSource;

const DIGITS: &str = "0123456789";

/// The default set of whitespace characters.
pub const DEFAULT_SPACE: &str = " \r\n\t";

/// A tokenizer over a character source.
#[derive(Debug)]
pub struct Scanner<S> {
    source: S,
    comment_start: Option<Vec<char>>,
    comment_stop: Option<Vec<char>>,
    line_comment: Option<Vec<char>>,
    comments_are_space: bool,
    space: String,
    line_ending: Option<LineEnding>,
}

impl<S> Scanner<S>
where
    S: Source,
{
    /// Creates a new scanner over a source.
    ///
    /// By default, block comments are delimited by `/*` and `*/`, line comments start with `//`,
    /// comments are read as a single space, and whitespace is [`DEFAULT_SPACE`].
    pub fn new(source: S) -> Self {
        Self {
            source,
            comment_start: Some("/*".chars().collect()),
            comment_stop: Some("*/".chars().collect()),
            line_comment: Some("//".chars().collect()),
            comments_are_space: true,
            space: DEFAULT_SPACE.to_string(),
            line_ending: None,
        }
    }

    /// Returns the underlying source.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Set the block comment delimiters.
    ///
    /// Passing `None` as the start delimiter disables block comments.
    pub fn set_comments(mut self, start: Option<&str>, stop: Option<&str>) -> Self {
        self.comment_start = delimiter(start);
        self.comment_stop = delimiter(stop);
        self
    }

    /// Set whether a comment is read as a single space, rather than skipped entirely.
    pub fn set_comments_are_space(mut self, comments_are_space: bool) -> Self {
        self.comments_are_space = comments_are_space;
        self
    }

    /// Set the prefix starting a comment that runs to the end of the line.
    ///
    /// Passing `None` disables line comments.
    pub fn set_line_comment(mut self, prefix: Option<&str>) -> Self {
        self.line_comment = delimiter(prefix);
        self
    }

    /// Set the characters considered whitespace.
    pub fn set_space(mut self, space: &str) -> Self {
        self.space = space.to_string();
        self
    }

    /// Skips any whitespace.
    pub fn consume_space(&mut self) -> Result<(), ScanError> {
        let space = self.space.clone();
        self.read_while(&space).map(|_| ())
    }

    /// Skips the remainder of the current line, including its terminator.
    pub fn consume_line(&mut self) -> Result<(), ScanError> {
        self.read_line(false).map(|_| ())
    }

    /// Detects the line ending convention of the source.
    ///
    /// The source is scanned from the start until the first line terminator, after which the
    /// scanner returns to its current position. The result is cached for later line operations.
    pub fn detect_line_ending(&mut self) -> Result<LineEnding, ScanError> {
        let position = self.position();
        self.rewind()?;

        let mut line_ending = LineEnding::Unknown;
        while let Some(c) = self.source.get_char()? {
            if line_ending::is_terminator(c) {
                let next = self.source.get_char()?;
                line_ending = LineEnding::classify(c, next);
                break;
            }
        }

        self.goto(position)?;
        self.line_ending = Some(line_ending);

        Ok(line_ending)
    }

    /// Moves to `position`.
    pub fn goto(&mut self, position: usize) -> Result<(), ScanError> {
        Ok(self.source.goto(position)?)
    }

    /// Returns `true` if any characters remain after the current position.
    pub fn has_more(&mut self) -> Result<bool, ScanError> {
        Ok(self.source.has_more()?)
    }

    /// Returns the line ending convention of the source, detecting it if necessary.
    pub fn line_ending(&mut self) -> Result<LineEnding, ScanError> {
        match self.line_ending {
            Some(line_ending) => Ok(line_ending),
            None => self.detect_line_ending(),
        }
    }

    /// Returns the 1-based line number of the current position.
    ///
    /// This requires scanning the source from the start, and so should be reserved for error
    /// reporting.
    pub fn line_index(&mut self) -> Result<usize, ScanError> {
        self.line_index_at(self.position())
    }

    /// Returns the 1-based line number of `position`.
    pub fn line_index_at(&mut self, position: usize) -> Result<usize, ScanError> {
        let line_ending = self.line_ending()?;
        let saved = self.position();
        self.rewind()?;

        let (mut cr, mut lf) = (0, 0);
        while self.source.position() < position {
            match self.source.get_char()? {
                Some('\r') => cr += 1,
                Some('\n') => lf += 1,
                Some(_) => (),
                None => break,
            }
        }

        self.goto(saved)?;

        Ok(line_ending.line_number(cr, lf))
    }

    /// Returns the next character without consuming it.
    pub fn peek_char(&mut self) -> Result<Option<char>, ScanError> {
        let position = self.position();
        let c = self.read_char()?;
        self.goto(position)?;
        Ok(c)
    }

    /// Returns the next token without consuming it.
    ///
    /// See [`Scanner::read_token`].
    pub fn peek_token(&mut self, delimiters: &str) -> Result<String, ScanError> {
        let position = self.position();
        let token = self.read_token(delimiters)?;
        self.goto(position)?;
        Ok(token)
    }

    /// Returns the current position.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Reads the next character, or `None` if the source is exhausted.
    ///
    /// Comments starting at the current position are consumed whole, and either read as a single
    /// space or skipped, depending on configuration.
    pub fn read_char(&mut self) -> Result<Option<char>, ScanError> {
        loop {
            let in_comment = match &self.comment_start {
                Some(start) => consume_prefix(&mut self.source, start)?,
                None => false,
            };

            if in_comment {
                let stop = self
                    .comment_stop
                    .as_ref()
                    .ok_or(ScanError::MalformedComment)?;

                let terminated = loop {
                    if consume_prefix(&mut self.source, stop)? {
                        break true;
                    } else if self.source.get_char()?.is_none() {
                        break false;
                    }
                };

                if !terminated {
                    let line = self.line_index()?;
                    return Err(ScanError::UnterminatedComment { line });
                } else if self.comments_are_space {
                    return Ok(Some(' '));
                } else {
                    continue;
                }
            }

            let in_line_comment = match &self.line_comment {
                Some(prefix) => consume_prefix(&mut self.source, prefix)?,
                None => false,
            };

            if in_line_comment {
                let line_ending = self.line_ending()?;
                skip_to_line_end(&mut self.source, line_ending)?;

                if self.comments_are_space {
                    return Ok(Some(' '));
                } else {
                    continue;
                }
            }

            return Ok(self.source.get_char()?);
        }
    }

    /// Reads the next token and returns `true` if it equals `expected`.
    ///
    /// If the token does not match, nothing is consumed.
    pub fn read_expected(&mut self, expected: &str) -> Result<bool, ScanError> {
        let position = self.position();

        if self.read_token("")? == expected {
            Ok(true)
        } else {
            self.goto(position)?;
            Ok(false)
        }
    }

    /// Reads the longest prefix of an optionally signed integer.
    ///
    /// Leading whitespace is skipped. Trailing characters that cannot be part of an integer are
    /// left unread, so that the returned token may be empty or consist of a sign only.
    pub fn read_int_token(&mut self) -> Result<String, ScanError> {
        self.consume_space()?;

        let mut token = self.read_sign()?;
        token.push_str(&self.read_while(DIGITS)?);

        Ok(token)
    }

    /// Reads a line, returning it without its terminator.
    ///
    /// If `eat_leading_space` is set, whitespace at the start of the line is skipped. Line
    /// terminators are never skipped as leading whitespace. The line ending convention is detected
    /// once per source.
    pub fn read_line(&mut self, eat_leading_space: bool) -> Result<String, ScanError> {
        let line_ending = self.line_ending()?;

        if eat_leading_space {
            let space = self
                .space
                .chars()
                .filter(|&c| !line_ending::is_terminator(c))
                .collect::<String>();
            self.read_while(&space)?;
        }

        let mut line = String::new();
        while let Some(c) = self.read_char()? {
            if line_ending.terminates(c) {
                self.read_partner(line_ending, c)?;
                break;
            }

            line.push(c);
        }

        Ok(line)
    }

    /// Reads the longest prefix of an optionally signed decimal number.
    ///
    /// Leading whitespace is skipped. See [`Scanner::read_int_token`].
    pub fn read_number_token(&mut self) -> Result<String, ScanError> {
        let mut token = self.read_int_token()?;

        let position = self.position();
        if self.read_char()? == Some('.') {
            token.push('.');
            token.push_str(&self.read_while(DIGITS)?);
        } else {
            self.goto(position)?;
        }

        Ok(token)
    }

    /// Reads a whitespace-delimited token.
    ///
    /// Leading whitespace is skipped, and the token ends before the first whitespace character,
    /// any character in `delimiters`, or the end of the source.
    pub fn read_token(&mut self, delimiters: &str) -> Result<String, ScanError> {
        self.consume_space()?;

        let mut stop = self.space.clone();
        stop.push_str(delimiters);

        let mut token = String::new();
        loop {
            let position = self.position();
            match self.read_char()? {
                Some(c) if !stop.contains(c) => token.push(c),
                Some(_) => {
                    self.goto(position)?;
                    break;
                }
                None => break,
            }
        }

        Ok(token)
    }

    /// Reads characters up to the first character in `delimiters`, returning the characters read
    /// and the delimiter found.
    ///
    /// If `eat_delimiter` is set, the delimiter is consumed; otherwise, it is left as the next
    /// character. If the source is exhausted before any delimiter is found,
    /// [`ScanError::Exhausted`] is returned.
    pub fn read_until(
        &mut self,
        delimiters: &str,
        eat_delimiter: bool,
    ) -> Result<(String, char), ScanError> {
        let mut token = String::new();

        loop {
            let position = self.position();
            match self.read_char()? {
                Some(c) if delimiters.contains(c) => {
                    if !eat_delimiter {
                        self.goto(position)?;
                    }
                    return Ok((token, c));
                }
                Some(c) => token.push(c),
                None => return Err(ScanError::Exhausted),
            }
        }
    }

    /// Reads characters while they are in `set`.
    pub fn read_while(&mut self, set: &str) -> Result<String, ScanError> {
        let mut token = String::new();

        loop {
            let position = self.position();
            match self.read_char()? {
                Some(c) if set.contains(c) => token.push(c),
                _ => {
                    self.goto(position)?;
                    break;
                }
            }
        }

        Ok(token)
    }

    /// Moves to the start of the source.
    pub fn rewind(&mut self) -> Result<(), ScanError> {
        self.goto(0)
    }

    /// Skips any lines consisting only of a line comment, including their terminators.
    ///
    /// Does nothing unless the current position is at the start of a line comment.
    pub fn skip_comment_lines(&mut self) -> Result<(), ScanError> {
        let Some(prefix) = self.line_comment.clone() else {
            return Ok(());
        };

        let line_ending = self.line_ending()?;
        while consume_prefix(&mut self.source, &prefix)? {
            skip_to_line_end(&mut self.source, line_ending)?;

            if let Some(c) = self.source.get_char()? {
                self.read_partner(line_ending, c)?;
            }
        }

        Ok(())
    }

    /// Moves to the end of the source.
    pub fn wind_to_end(&mut self) -> Result<(), ScanError> {
        let end = self.source.end()?;
        self.goto(end)
    }

    fn read_partner(&mut self, line_ending: LineEnding, terminator: char) -> Result<(), ScanError> {
        if let Some(partner) = line_ending.partner(terminator) {
            let position = self.position();
            if self.source.get_char()? != Some(partner) {
                self.goto(position)?;
            }
        }

        Ok(())
    }

    fn read_sign(&mut self) -> Result<String, ScanError> {
        let position = self.position();

        match self.read_char()? {
            Some(c @ ('+' | '-')) => Ok(c.to_string()),
            _ => {
                self.goto(position)?;
                Ok(String::new())
            }
        }
    }
}

fn delimiter(s: Option<&str>) -> Option<Vec<char>> {
    s.filter(|s| !s.is_empty()).map(|s| s.chars().collect())
}

fn consume_prefix<S>(source: &mut S, prefix: &[char]) -> io::Result<bool>
where
    S: Source,
{
    if prefix.is_empty() {
        return Ok(false);
    }

    let position = source.position();
    for &expected in prefix {
        if source.get_char()? != Some(expected) {
            source.goto(position)?;
            return Ok(false);
        }
    }

    Ok(true)
}

fn skip_to_line_end<S>(source: &mut S, line_ending: LineEnding) -> io::Result<()>
where
    S: Source,
{
    loop {
        let position = source.position();
        match source.get_char()? {
            Some(c) if line_ending.terminates(c) => return source.goto(position),
            Some(_) => (),
            None => return Ok(()),
        }
    }
}

/// An error associated with scanning.
#[derive(Debug)]
pub enum ScanError {
    /// The source was exhausted before an expected delimiter.
    Exhausted,
    /// I/O error in the underlying source.
    Io(io::Error),
    /// A comment was started, but no comment stop delimiter is configured.
    MalformedComment,
    /// A comment was not closed before the end of the source.
    UnterminatedComment {
        /// 1-based line number at which the source ended.
        line: usize,
    },
}

impl From<io::Error> for ScanError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Exhausted => f.write_str("source exhausted before expected token"),
            ScanError::Io(e) => write!(f, "{e}"),
            ScanError::MalformedComment => {
                f.write_str("malformed comment configuration: no comment stop delimiter")
            }
            ScanError::UnterminatedComment { line } => {
                write!(f, "unterminated comment at line {line}")
            }
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::Io(e) => Some(e),
            _ => None,
        }
    }
}
