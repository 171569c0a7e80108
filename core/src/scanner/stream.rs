use std::io::{self, BufRead as _, Seek as _};

use super::Source;

/// A source backed by a seekable byte stream, such as a file.
///
/// The stream is decoded as UTF-8 one character at a time, so that the whole stream never needs to
/// be held in memory.
#[derive(Debug)]
pub struct StreamSource<R> {
    inner: io::BufReader<R>,
    position: usize,
}

impl<R> StreamSource<R>
where
    R: io::Read + io::Seek,
{
    /// Creates a new source reading from the start of `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner: io::BufReader::new(inner),
            position: 0,
        }
    }

    /// Returns the inner stream.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = self.inner.fill_buf()?.first().copied();

        if byte.is_some() {
            self.inner.consume(1);
            self.position += 1;
        }

        Ok(byte)
    }
}

impl<R> Source for StreamSource<R>
where
    R: io::Read + io::Seek,
{
    fn get_char(&mut self) -> io::Result<Option<char>> {
        let Some(first) = self.next_byte()? else {
            return Ok(None);
        };

        let width = utf8_width(first).ok_or_else(invalid_utf8)?;

        let mut bytes = [first, 0, 0, 0];
        for byte in bytes.iter_mut().take(width).skip(1) {
            *byte = self.next_byte()?.ok_or_else(invalid_utf8)?;
        }

        std::str::from_utf8(&bytes[..width])
            .map_err(|_| invalid_utf8())
            .map(|s| s.chars().next())
    }

    fn position(&self) -> usize {
        self.position
    }

    fn goto(&mut self, position: usize) -> io::Result<()> {
        let offset = position as i64 - self.position as i64;
        self.inner.seek_relative(offset)?;
        self.position = position;
        Ok(())
    }

    fn end(&mut self) -> io::Result<usize> {
        let end = self.inner.seek(io::SeekFrom::End(0))?;
        self.inner.seek(io::SeekFrom::Start(self.position as u64))?;
        Ok(end as usize)
    }
}

fn utf8_width(first: u8) -> Option<usize> {
    match first {
        0x00..=0x7f => Some(1),
        0xc0..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf7 => Some(4),
        _ => None,
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8")
}
