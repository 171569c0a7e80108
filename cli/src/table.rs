use std::{fmt, io};

/// Label of the row of observed values.
pub const OBSERVED: &str = "Observed";

/// Label of the row of p-values.
pub const P_VALUES: &str = "P_Values";

/// Placeholder for values that are not defined.
pub const NOT_AVAILABLE: &str = "N/A";

/// Writes tab-delimited rows.
#[derive(Debug)]
pub struct Table<W> {
    writer: W,
    precision: usize,
}

impl<W> Table<W>
where
    W: io::Write,
{
    pub fn new(writer: W, precision: usize) -> Self {
        Self { writer, precision }
    }

    /// Formats a float with the precision of the table.
    pub fn float(&self, value: f64) -> String {
        format!("{value:.precision$}", precision = self.precision)
    }

    /// Formats an optional float, writing missing values as [`NOT_AVAILABLE`].
    pub fn optional<T>(&self, value: Option<T>) -> String
    where
        T: fmt::Display,
    {
        match value {
            Some(value) => format!("{value:.precision$}", precision = self.precision),
            None => String::from(NOT_AVAILABLE),
        }
    }

    pub fn write_empty(&mut self) -> io::Result<()> {
        writeln!(self.writer)
    }

    pub fn write_row<I>(&mut self, items: I) -> io::Result<()>
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        for (i, x) in items.into_iter().enumerate() {
            if i > 0 {
                write!(self.writer, "\t")?;
            }
            write!(self.writer, "{x}")?;
        }
        writeln!(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_row() {
        let mut table = Table::new(Vec::new(), 2);

        let row = vec![String::from(OBSERVED), table.float(0.5), table.optional::<f64>(None)];
        table.write_row(row).unwrap();
        table.write_row(["a", "b"]).unwrap();

        assert_eq!(
            String::from_utf8(table.writer).unwrap(),
            "Observed\t0.50\tN/A\na\tb\n"
        );
    }

    #[test]
    fn test_optional_respects_precision() {
        let table = Table::new(Vec::new(), 3);

        assert_eq!(table.optional(Some(1.0 / 3.0)), "0.333");
        assert_eq!(table.float(f64::NAN), "NaN");
    }
}
