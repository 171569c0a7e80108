use std::io;

/// A position-addressable source of characters.
///
/// Positions are byte offsets from the start of the source. All token operations of a
/// [`Scanner`](super::Scanner) are built from these primitives.
pub trait Source {
    /// Returns the character at the current position and advances past it, or `None` if the
    /// source is exhausted.
    fn get_char(&mut self) -> io::Result<Option<char>>;

    /// Returns the current position.
    fn position(&self) -> usize;

    /// Moves to `position`.
    fn goto(&mut self, position: usize) -> io::Result<()>;

    /// Returns the position one past the last character of the source.
    fn end(&mut self) -> io::Result<usize>;

    /// Returns `true` if any characters remain after the current position.
    fn has_more(&mut self) -> io::Result<bool> {
        let position = self.position();
        let more = self.get_char()?.is_some();
        self.goto(position)?;
        Ok(more)
    }
}

/// A source backed by an in-memory string.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BufferSource {
    buf: String,
    position: usize,
}

impl BufferSource {
    /// Creates a new source from a string.
    pub fn new<S>(buf: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            buf: buf.into(),
            position: 0,
        }
    }

    /// Returns the full underlying string.
    pub fn as_str(&self) -> &str {
        &self.buf
    }
}

impl From<&str> for BufferSource {
    fn from(buf: &str) -> Self {
        Self::new(buf)
    }
}

impl From<String> for BufferSource {
    fn from(buf: String) -> Self {
        Self::new(buf)
    }
}

impl Source for BufferSource {
    fn get_char(&mut self) -> io::Result<Option<char>> {
        let c = self
            .buf
            .get(self.position..)
            .and_then(|rest| rest.chars().next());

        if let Some(c) = c {
            self.position += c.len_utf8();
        }

        Ok(c)
    }

    fn position(&self) -> usize {
        self.position
    }

    fn goto(&mut self, position: usize) -> io::Result<()> {
        if position <= self.buf.len() && self.buf.is_char_boundary(position) {
            self.position = position;
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot move to position {position} in buffer source"),
            ))
        }
    }

    fn end(&mut self) -> io::Result<usize> {
        Ok(self.buf.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_char_and_goto() {
        let mut source = BufferSource::from("aøb");

        assert_eq!(source.get_char().unwrap(), Some('a'));
        assert_eq!(source.get_char().unwrap(), Some('ø'));
        assert_eq!(source.position(), 3);
        assert_eq!(source.get_char().unwrap(), Some('b'));
        assert_eq!(source.get_char().unwrap(), None);
        assert!(!source.has_more().unwrap());

        source.goto(1).unwrap();
        assert!(source.has_more().unwrap());
        assert_eq!(source.get_char().unwrap(), Some('ø'));
    }

    #[test]
    fn test_goto_invalid_position() {
        let mut source = BufferSource::from("aøb");

        assert!(source.goto(2).is_err());
        assert!(source.goto(5).is_err());
        assert_eq!(source.position(), 0);
        assert_eq!(source.end().unwrap(), 4);
    }
}
