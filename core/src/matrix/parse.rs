//! Parsing genotype matrices from text.
//!
//! The format is a tab-delimited table with one row per isolate and one column per locus. Diploid
//! cells are written as two alleles separated by `/`. The ploidy and the number of loci are
//! determined by the first line of data. Lines starting with `#` are comments, and an empty line
//! ends the data.

use std::{fmt, io};

use crate::scanner::{BufferSource, ScanError, Scanner, Source};

use super::{Allele, AllelePair, GenotypeMatrix, Grid, Matrix, Ploidy};

const ALLELE_SEPARATOR: char = '/';
const COLUMN_DELIMITER: char = '\t';
const COMMENT: &str = "#";

/// Parses a genotype matrix from a source.
pub fn parse<S>(source: S) -> Result<GenotypeMatrix, ParseError>
where
    S: Source,
{
    let mut scanner = Scanner::new(source)
        .set_comments(None, None)
        .set_line_comment(Some(COMMENT))
        .set_comments_are_space(false);

    let (ploidy, num_cols) = read_layout(&mut scanner)?;

    let matrix = match ploidy {
        Ploidy::Haploid => Matrix::Haploid(read_grid(&mut scanner, num_cols)?),
        Ploidy::Diploid => Matrix::Diploid(read_grid(&mut scanner, num_cols)?),
    };

    Ok(GenotypeMatrix::new(matrix))
}

/// Parses a genotype matrix from a string.
pub fn parse_str(s: &str) -> Result<GenotypeMatrix, ParseError> {
    parse(BufferSource::from(s))
}

fn read_layout<S>(scanner: &mut Scanner<S>) -> Result<(Ploidy, usize), ParseError>
where
    S: Source,
{
    scanner.skip_comment_lines()?;

    let start = scanner.position();
    let line = scanner.read_line(false)?;
    scanner.goto(start)?;

    let mut columns = line.split(COLUMN_DELIMITER).collect::<Vec<_>>();
    let trailing = columns
        .iter()
        .rev()
        .take_while(|column| column.trim().is_empty())
        .count();
    columns.truncate(columns.len() - trailing);

    let num_cols = columns.len();
    if num_cols == 0 {
        return Err(ParseError::Format {
            line: None,
            kind: FormatErrorKind::NoData,
        });
    } else if trailing > 0 {
        log::warn!("Ignoring {trailing} trailing empty column(s) in first line of data");
    }

    match line.matches(ALLELE_SEPARATOR).count() {
        0 => Ok((Ploidy::Haploid, num_cols)),
        n if n == num_cols => Ok((Ploidy::Diploid, num_cols)),
        _ => Err(format_error(
            scanner,
            start,
            FormatErrorKind::MissingColumnDelimiter,
        )),
    }
}

fn read_grid<C, S>(scanner: &mut Scanner<S>, num_cols: usize) -> Result<Grid<C>, ParseError>
where
    C: ReadCell,
    S: Source,
{
    let mut rows = Vec::new();

    loop {
        scanner.skip_comment_lines()?;

        match scanner.peek_char()? {
            None | Some('\r' | '\n') => break,
            Some(_) => (),
        }

        let row = (0..num_cols)
            .map(|col| C::read(scanner, col + 1 == num_cols))
            .collect::<Result<Vec<_>, _>>()?;

        rows.push(row);
    }

    log::debug!("Read {} isolates with {num_cols} loci", rows.len());

    match Grid::from_rows(rows) {
        Some(grid) if grid.num_rows() > 0 => Ok(grid),
        _ => Err(ParseError::Format {
            line: None,
            kind: FormatErrorKind::NoData,
        }),
    }
}

trait ReadCell: Sized {
    fn read<S>(scanner: &mut Scanner<S>, last: bool) -> Result<Self, ParseError>
    where
        S: Source;
}

impl ReadCell for Allele {
    fn read<S>(scanner: &mut Scanner<S>, last: bool) -> Result<Self, ParseError>
    where
        S: Source,
    {
        read_column_allele(scanner, last)
    }
}

impl ReadCell for AllelePair {
    fn read<S>(scanner: &mut Scanner<S>, last: bool) -> Result<Self, ParseError>
    where
        S: Source,
    {
        let first = read_allele(scanner, "/\t\r\n", FormatErrorKind::MissingAlleleSeparator)?;
        expect(
            scanner,
            ALLELE_SEPARATOR,
            FormatErrorKind::MissingAlleleSeparator,
        )?;
        let second = read_column_allele(scanner, last)?;

        Ok(AllelePair::new(first, second))
    }
}

/// Reads the final allele of a column, along with the column delimiter or line terminator.
fn read_column_allele<S>(scanner: &mut Scanner<S>, last: bool) -> Result<Allele, ParseError>
where
    S: Source,
{
    if last {
        let start = scanner.position();
        let token = scanner.read_line(false)?;
        to_allele(scanner, &token, start)
    } else {
        let allele = read_allele(scanner, "\t\r\n", FormatErrorKind::MissingColumnDelimiter)?;
        expect(
            scanner,
            COLUMN_DELIMITER,
            FormatErrorKind::MissingColumnDelimiter,
        )?;
        Ok(allele)
    }
}

/// Reads an allele up to, but not including, any of `delimiters`.
///
/// If the source ends first, an error of the provided kind is returned.
fn read_allele<S>(
    scanner: &mut Scanner<S>,
    delimiters: &str,
    kind: FormatErrorKind,
) -> Result<Allele, ParseError>
where
    S: Source,
{
    let start = scanner.position();

    match scanner.read_until(delimiters, false) {
        Ok((token, _)) => to_allele(scanner, &token, start),
        Err(ScanError::Exhausted) => Err(format_error(scanner, start, kind)),
        Err(e) => Err(e.into()),
    }
}

fn to_allele<S>(
    scanner: &mut Scanner<S>,
    token: &str,
    position: usize,
) -> Result<Allele, ParseError>
where
    S: Source,
{
    token.trim().parse().map_err(|_| {
        format_error(
            scanner,
            position,
            FormatErrorKind::IllegalAllele(token.trim().to_string()),
        )
    })
}

fn expect<S>(scanner: &mut Scanner<S>, expected: char, kind: FormatErrorKind) -> Result<(), ParseError>
where
    S: Source,
{
    let position = scanner.position();

    if scanner.read_char()? == Some(expected) {
        Ok(())
    } else {
        Err(format_error(scanner, position, kind))
    }
}

fn format_error<S>(scanner: &mut Scanner<S>, position: usize, kind: FormatErrorKind) -> ParseError
where
    S: Source,
{
    match scanner.line_index_at(position) {
        Ok(line) => ParseError::Format {
            line: Some(line),
            kind,
        },
        Err(e) => e.into(),
    }
}

/// The kind of a format error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FormatErrorKind {
    /// An allele was neither alphanumeric nor a missing marker.
    IllegalAllele(String),
    /// A diploid cell lacked the separator between alleles.
    MissingAlleleSeparator,
    /// A row had too few column delimiters, or the separators in the first line did not match the
    /// number of columns.
    MissingColumnDelimiter,
    /// No data was found.
    NoData,
}

impl fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatErrorKind::IllegalAllele(allele) => write!(f, "illegal allele '{allele}'"),
            FormatErrorKind::MissingAlleleSeparator => f.write_str("missing allele separator"),
            FormatErrorKind::MissingColumnDelimiter => f.write_str("missing column delimiter"),
            FormatErrorKind::NoData => f.write_str("no data found"),
        }
    }
}

/// An error associated with parsing a genotype matrix.
#[derive(Debug)]
pub enum ParseError {
    /// The data is not in the expected format.
    Format {
        /// 1-based line number of the error, if known.
        line: Option<usize>,
        /// The kind of error.
        kind: FormatErrorKind,
    },
    /// I/O error when opening or decompressing the input.
    Io(io::Error),
    /// Error in the underlying scanner.
    Scan(ScanError),
}

impl ParseError {
    /// Returns the kind of format error, if this is a format error.
    pub fn format_kind(&self) -> Option<&FormatErrorKind> {
        match self {
            ParseError::Format { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Returns the 1-based line number of the error, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Format { line, .. } => *line,
            ParseError::Scan(ScanError::UnterminatedComment { line }) => Some(*line),
            _ => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ScanError> for ParseError {
    fn from(e: ScanError) -> Self {
        Self::Scan(e)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Format {
                line: Some(line),
                kind,
            } => write!(f, "{kind} at line {line}"),
            ParseError::Format { line: None, kind } => write!(f, "{kind}"),
            ParseError::Io(e) => write!(f, "{e}"),
            ParseError::Scan(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            ParseError::Scan(e) => Some(e),
            ParseError::Format { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::matrix::Cell;

    #[test]
    fn test_parse_haploid() {
        let matrix = parse_str("A\tB\tC\t1\n A \tA\tC\t22\nB\t?\tC\t-\n").unwrap();

        assert_eq!(matrix.ploidy(), Ploidy::Haploid);
        assert_eq!(matrix.num_rows(), 3);
        assert_eq!(matrix.num_cols(), 4);

        let expected = [
            ["A", "B", "C", "1"],
            ["A", "A", "C", "22"],
            ["B", "?", "C", "-"],
        ];
        for (i, row) in expected.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                assert_eq!(matrix.data_string(i, j), *cell);
            }
        }
    }

    #[test]
    fn test_parse_diploid() {
        let matrix = parse_str("1/2\t3/3\n2/?\t1/3\n").unwrap();

        assert_eq!(matrix.ploidy(), Ploidy::Diploid);
        assert_eq!(matrix.num_rows(), 2);
        assert_eq!(matrix.data_string(1, 0), "2/?");
        assert!(matrix.is_missing(1, 0));
        assert!(matrix.is_rankable());

        match matrix.data() {
            Matrix::Diploid(grid) => assert_eq!(grid[(0, 0)].rank(), Some(3)),
            Matrix::Haploid(_) => panic!("expected diploid data"),
        }
    }

    #[test]
    fn test_parse_without_final_newline() {
        let matrix = parse_str("A\tB\nC\tD").unwrap();

        assert_eq!(matrix.num_rows(), 2);
        assert_eq!(matrix.data_string(1, 1), "D");
    }

    #[test]
    fn test_parse_dos_and_mac_line_endings() {
        for text in ["A\tB\r\nC\tD\r\n", "A\tB\rC\tD\r"] {
            let matrix = parse_str(text).unwrap();

            assert_eq!(matrix.num_rows(), 2);
            assert_eq!(matrix.data_string(1, 0), "C");
            assert_eq!(matrix.data_string(1, 1), "D");
        }
    }

    #[test]
    fn test_parse_comments() {
        let text = "# header\n# more\nA\tB # trailing\n# between\nC\tD\n";
        let matrix = parse_str(text).unwrap();

        assert_eq!(matrix.num_rows(), 2);
        assert_eq!(matrix.data_string(0, 1), "B");
        assert_eq!(matrix.data_string(1, 0), "C");
    }

    #[test]
    fn test_empty_line_ends_data() {
        let matrix = parse_str("A\tB\nC\tD\n\nthis is ignored\n").unwrap();

        assert_eq!(matrix.num_rows(), 2);
    }

    #[test]
    fn test_trailing_empty_columns_ignored() {
        let matrix = parse_str("A\tB\t\t\nC\tD\t\n").unwrap();

        assert_eq!(matrix.num_cols(), 2);
        assert_eq!(matrix.data_string(1, 1), "D");
    }

    #[test]
    fn test_rankable() {
        assert!(parse_str("1\t2\n?\t10\n").unwrap().is_rankable());
        assert!(!parse_str("1\t2\n?\tA\n").unwrap().is_rankable());
    }

    #[test]
    fn test_illegal_allele() {
        let error = parse_str("A\tB\nC\tD\nE\tF!\n").unwrap_err();

        assert_eq!(
            error.format_kind(),
            Some(&FormatErrorKind::IllegalAllele("F!".into()))
        );
        assert_eq!(error.line(), Some(3));

        let error = parse_str("A\tB\nC*\tD\n").unwrap_err();

        assert_eq!(
            error.format_kind(),
            Some(&FormatErrorKind::IllegalAllele("C*".into()))
        );
        assert_eq!(error.line(), Some(2));
    }

    #[test]
    fn test_missing_column_delimiter() {
        let error = parse_str("A\tB\tC\nD\tE\nF\tG\tH\n").unwrap_err();

        assert_eq!(
            error.format_kind(),
            Some(&FormatErrorKind::MissingColumnDelimiter)
        );
        assert_eq!(error.line(), Some(2));
    }

    #[test]
    fn test_separator_count_mismatch() {
        let error = parse_str("1/2\t3\n").unwrap_err();

        assert_eq!(
            error.format_kind(),
            Some(&FormatErrorKind::MissingColumnDelimiter)
        );
        assert_eq!(error.line(), Some(1));
    }

    #[test]
    fn test_missing_allele_separator() {
        let error = parse_str("1/2\t3/4\n1/2\t34\n").unwrap_err();

        assert_eq!(
            error.format_kind(),
            Some(&FormatErrorKind::MissingAlleleSeparator)
        );
        assert_eq!(error.line(), Some(2));
    }

    #[test]
    fn test_no_data() {
        for text in ["", "# only a comment\n", "\nA\tB\n"] {
            assert_eq!(
                parse_str(text).unwrap_err().format_kind(),
                Some(&FormatErrorKind::NoData)
            );
        }
    }
}
