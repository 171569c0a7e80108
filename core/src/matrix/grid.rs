use std::ops::{Index, IndexMut};

/// A dense, row-major table of cells.
///
/// Rows correspond to isolates and columns to loci.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid<T> {
    data: Vec<T>,
    cols: usize,
}

impl<T> Grid<T> {
    /// Creates a new grid from rows, returning `None` if rows differ in length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);

        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }

        Some(Self {
            data: rows.into_iter().flatten().collect(),
            cols,
        })
    }

    /// Returns an iterator over the cells of a column.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &T> + '_ {
        self.data.iter().skip(col).step_by(self.cols.max(1))
    }

    /// Returns the cell at the provided row and column, if in bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        (col < self.cols)
            .then(|| self.data.get(row * self.cols + col))
            .flatten()
    }

    /// Returns the number of columns.
    pub fn num_cols(&self) -> usize {
        self.cols
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        if self.cols == 0 {
            0
        } else {
            self.data.len() / self.cols
        }
    }

    /// Returns the cells of a row.
    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Returns an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.data.chunks(self.cols.max(1))
    }

    /// Keeps only the columns for which `keep` returns `true`.
    pub fn retain_cols<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize) -> bool,
    {
        let cols = self.cols;
        let kept = (0..cols).filter(|&col| keep(col)).count();

        let mut i = 0;
        self.data.retain(|_| {
            let col = i % cols;
            i += 1;
            keep(col)
        });
        self.cols = kept;
    }

    /// Keeps only the rows for which `keep` returns `true`.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize) -> bool,
    {
        let cols = self.cols;

        let mut i = 0;
        self.data.retain(|_| {
            let row = i / cols;
            i += 1;
            keep(row)
        });
    }

    /// Swaps the cells in a column between two rows.
    pub fn swap(&mut self, col: usize, first: usize, second: usize) {
        self.data
            .swap(first * self.cols + col, second * self.cols + col)
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.data[row * self.cols + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid<u8> {
        Grid::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap()
    }

    #[test]
    fn test_from_rows() {
        let grid = grid();

        assert_eq!(grid.num_rows(), 2);
        assert_eq!(grid.num_cols(), 3);
        assert_eq!(grid[(1, 0)], 4);
        assert_eq!(grid.get(0, 3), None);
        assert_eq!(grid.column(1).copied().collect::<Vec<_>>(), vec![2, 5]);

        assert!(Grid::from_rows(vec![vec![1, 2], vec![3]]).is_none());
    }

    #[test]
    fn test_retain() {
        let mut grid = grid();

        grid.retain_cols(|col| col != 1);
        assert_eq!(grid.rows().collect::<Vec<_>>(), vec![&[1, 3], &[4, 6]]);

        grid.retain_rows(|row| row == 1);
        assert_eq!(grid.num_rows(), 1);
        assert_eq!(grid.row(0), &[4, 6]);
    }

    #[test]
    fn test_swap() {
        let mut grid = grid();

        grid.swap(2, 0, 1);
        assert_eq!(grid.row(0), &[1, 2, 6]);
        assert_eq!(grid.row(1), &[4, 5, 3]);
    }
}
