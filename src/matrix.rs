//! Dense column-major matrices for search results.

use std::ops::{Index, IndexMut};

/// A dense matrix stored one column after another.
///
/// Search results use one column per query point, so each query's neighbors are contiguous.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Clone> Matrix<T> {
    /// Create a matrix with every entry set to `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }
}

impl<T> Matrix<T> {
    /// Get the number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get the number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get a column.
    pub fn column(&self, col: usize) -> &[T] {
        assert!(col < self.cols, "column {} out of bounds for {} columns", col, self.cols);
        &self.data[col * self.rows..(col + 1) * self.rows]
    }

    /// Get a mutable column.
    pub fn column_mut(&mut self, col: usize) -> &mut [T] {
        assert!(col < self.cols, "column {} out of bounds for {} columns", col, self.cols);
        &mut self.data[col * self.rows..(col + 1) * self.rows]
    }

    /// Iterate over the columns in order.
    pub fn columns(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        (0..self.cols).map(move |col| self.column(col))
    }

    /// Get the underlying column-major storage.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Unwrap the underlying column-major storage.
    pub fn into_inner(self) -> Vec<T> {
        self.data
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(row < self.rows, "row {} out of bounds for {} rows", row, self.rows);
        &self.column(col)[row]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(row < self.rows, "row {} out of bounds for {} rows", row, self.rows);
        &mut self.column_mut(col)[row]
    }
}
