//! Data
//!
//! The dense matrix container shared by every estimator in the crate.
use crate::errors::FairnessError;
use ndarray::{Array1, Array2, ShapeBuilder};

/// Contiguous Column Major Matrix data container.
///
/// This structure borrows a dense matrix of values held in a single contiguous memory block.
/// It follows column-major order (Fortran-style), so every feature column is a contiguous
/// slice. The per-column residual models of the counterfactually fair classifier and the
/// single-column protected attribute design matrix both rely on this layout.
///
/// # Type Parameters
/// * `T` - The numeric type of the data (e.g., `f64`).
#[derive(Debug, Clone, Copy)]
pub struct Matrix<'a, T> {
    /// The raw data stored in a single slice.
    pub data: &'a [T],
    /// Number of rows in the matrix.
    pub rows: usize,
    /// Number of columns in the matrix.
    pub cols: usize,
}

impl<'a, T> Matrix<'a, T> {
    /// Create a new Matrix from column-major data.
    ///
    /// The caller guarantees `data.len() == rows * cols`, use [`Matrix::try_new`]
    /// when the buffer comes from user input.
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Self {
        Matrix { data, rows, cols }
    }

    /// Create a new Matrix, validating that the buffer matches the shape.
    pub fn try_new(data: &'a [T], rows: usize, cols: usize) -> Result<Self, FairnessError> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(FairnessError::InvalidShape(rows, cols, data.len()));
        }
        Ok(Matrix { data, rows, cols })
    }

    /// Get a single reference to an item in the matrix.
    ///
    /// * `i` - The ith row of the data to get.
    /// * `j` - the jth column of the data to get.
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[self.item_index(i, j)]
    }

    #[inline]
    fn item_index(&self, i: usize, j: usize) -> usize {
        j * self.rows + i
    }

    /// Get an entire column in the matrix.
    ///
    /// * `col` - The index of the column to get.
    pub fn get_col(&self, col: usize) -> &'a [T] {
        let start = self.item_index(0, col);
        &self.data[start..start + self.rows]
    }

    /// Shape of the matrix as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

impl<'a> Matrix<'a, f64> {
    /// Copy into an owned `ndarray` matrix, keeping the column-major layout.
    pub fn to_array(&self) -> Result<Array2<f64>, FairnessError> {
        Array2::from_shape_vec((self.rows, self.cols).f(), self.data.to_vec())
            .map_err(|_| FairnessError::InvalidShape(self.rows, self.cols, self.data.len()))
    }
}

/// Binary targets as class labels, `1.0` becomes class `1`.
pub fn to_labels(y: &[f64]) -> Array1<usize> {
    y.iter().map(|v| usize::from(*v == 1.0)).collect()
}
