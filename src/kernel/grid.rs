use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// A field was handed to the actuators with the wrong dimensions.
    /// The control loop must keep field and table dimensions consistent.
    #[error("shape mismatch: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    Shape {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    #[error("ragged rows: row {row} has {len} cells, expected {expected}")]
    Ragged { row: usize, len: usize, expected: usize },
}

/// Dense row-major 2D height field.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl Grid {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            cells: vec![value; rows * cols],
        }
    }

    /// Builds a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut cells = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                cells.push(f(r, c));
            }
        }
        Self { rows, cols, cells }
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, GridError> {
        let expected = rows.first().map(Vec::len).unwrap_or(0);
        let height = rows.len();
        let mut cells = Vec::with_capacity(height * expected);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != expected {
                return Err(GridError::Ragged { row, len: values.len(), expected });
            }
            cells.extend(values);
        }
        Ok(Self { rows: height, cols: expected, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> bool {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = value;
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [f64] {
        &mut self.cells
    }

    /// Smallest cell, `None` for an empty grid.
    pub fn min(&self) -> Option<f64> {
        self.cells.iter().copied().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.cells.iter().copied().reduce(f64::max)
    }

    pub fn mean(&self) -> Option<f64> {
        if self.cells.is_empty() {
            None
        } else {
            Some(self.cells.iter().sum::<f64>() / self.cells.len() as f64)
        }
    }

    pub fn map_in_place<F>(&mut self, mut f: F)
    where
        F: FnMut(f64) -> f64,
    {
        for cell in self.cells.iter_mut() {
            *cell = f(*cell);
        }
    }

    /// Clamps every cell to `[lo, hi]`. NaN cells collapse to `lo`.
    pub fn clamp_in_place(&mut self, lo: f64, hi: f64) {
        self.map_in_place(|v| clamp_cell(v, lo, hi));
    }
}

/// Never panics: NaN goes to `lo`, and `lo > hi` yields `hi`.
pub(crate) fn clamp_cell(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        lo
    } else {
        value.max(lo).min(hi)
    }
}

/// Physical limits below zero or non-finite collapse to zero.
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
