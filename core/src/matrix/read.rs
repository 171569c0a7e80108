//! Reading genotype matrices from files or stdin.

use std::io::{self, BufRead, Read as _, Seek as _};

use flate2::bufread::MultiGzDecoder;

use crate::{
    input,
    scanner::{BufferSource, StreamSource},
    Input,
};

use super::{parse, GenotypeMatrix, ParseError};

/// A builder to read a genotype matrix.
#[derive(Debug, Default)]
pub struct Builder {
    input: Option<Input>,
    compression_method: Option<Option<CompressionMethod>>,
}

impl Builder {
    /// Reads the genotype matrix from the input, or from stdin if no input is set.
    ///
    /// Uncompressed files are scanned directly from disk. Compressed data and stdin are first read
    /// into memory.
    pub fn read(self) -> Result<GenotypeMatrix, ParseError> {
        match self.input.as_ref().unwrap_or(&Input::Stdin).open()? {
            input::Reader::File(mut reader) => {
                let compression_method = match self.compression_method {
                    Some(compression_method) => compression_method,
                    None => CompressionMethod::detect(&mut reader)?,
                };

                match compression_method {
                    Some(CompressionMethod::Gzip) => parse(decompress(reader)?),
                    None => {
                        let mut file = reader.into_inner();
                        file.rewind()?;
                        parse(StreamSource::new(file))
                    }
                }
            }
            input::Reader::Stdin(mut reader) => {
                let compression_method = match self.compression_method {
                    Some(compression_method) => compression_method,
                    None => CompressionMethod::detect(&mut reader)?,
                };

                match compression_method {
                    Some(CompressionMethod::Gzip) => parse(decompress(reader)?),
                    None => {
                        let mut buf = String::new();
                        reader.read_to_string(&mut buf)?;
                        parse(BufferSource::new(buf))
                    }
                }
            }
        }
    }

    /// Set the compression method of the input.
    ///
    /// By default, the compression method is detected from the input.
    pub fn set_compression_method(mut self, compression_method: Option<CompressionMethod>) -> Self {
        self.compression_method = Some(compression_method);
        self
    }

    /// Set the input to read from.
    pub fn set_input(mut self, input: Input) -> Self {
        self.input = Some(input);
        self
    }
}

fn decompress<R>(reader: R) -> io::Result<BufferSource>
where
    R: BufRead,
{
    let mut buf = String::new();
    MultiGzDecoder::new(reader).read_to_string(&mut buf)?;
    Ok(BufferSource::new(buf))
}

/// A compression method.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompressionMethod {
    /// Gzip compression, including BGZF.
    Gzip,
}

impl CompressionMethod {
    /// Detects the compression method from the magic number at the start of the reader.
    ///
    /// Nothing is consumed from the reader.
    pub fn detect<R>(reader: &mut R) -> io::Result<Option<Self>>
    where
        R: BufRead,
    {
        const GZIP_MAGIC_NUMBER: [u8; 2] = [0x1f, 0x8b];

        let src = reader.fill_buf()?;

        if let Some(buf) = src.get(..GZIP_MAGIC_NUMBER.len()) {
            if buf == GZIP_MAGIC_NUMBER {
                return Ok(Some(CompressionMethod::Gzip));
            }
        }

        Ok(None)
    }
}
