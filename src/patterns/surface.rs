use crate::kernel::grid::{clamp_cell, non_negative, Grid};

/// Fields flatter than this are treated as constant by `normalize`.
const FLAT_EPSILON: f64 = 1e-8;

/// Table geometry shared by all generators: dimensions, pin travel and the
/// normalized coordinate axes (0 at the first pin, 1 at the last).
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    rows: usize,
    cols: usize,
    max_height: f64,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Surface {
    /// A negative or non-finite `max_height` is floored to zero.
    pub fn new(rows: usize, cols: usize, max_height: f64) -> Self {
        Self {
            rows,
            cols,
            max_height: non_negative(max_height),
            xs: linspace(cols),
            ys: linspace(rows),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    /// Largest valid column index as a float, never below 1 so it can divide.
    pub fn col_span(&self) -> f64 {
        self.cols.saturating_sub(1).max(1) as f64
    }

    pub fn row_span(&self) -> f64 {
        self.rows.saturating_sub(1).max(1) as f64
    }

    /// Evaluates `f(x, y)` on the normalized coordinate grid.
    pub fn field<F>(&self, mut f: F) -> Grid
    where
        F: FnMut(f64, f64) -> f64,
    {
        Grid::from_fn(self.rows, self.cols, |r, c| f(self.xs[c], self.ys[r]))
    }

    /// Maps `[-1, 1]` linearly onto `[0, max_height]`. Anything outside is clamped.
    pub fn remap(&self, mut field: Grid) -> Grid {
        let max_height = self.max_height;
        field.map_in_place(|z| clamp_cell((z + 1.0) / 2.0 * max_height, 0.0, max_height));
        field
    }

    /// Stretches the field's own min/max onto `[0, max_height]`.
    /// A flat field comes back as a constant `max_height / 2`.
    pub fn normalize(&self, mut field: Grid) -> Grid {
        let max_height = self.max_height;
        let (lo, hi) = match (field.min(), field.max()) {
            (Some(lo), Some(hi)) if lo.is_finite() && hi.is_finite() => (lo, hi),
            _ => {
                field.map_in_place(|_| max_height / 2.0);
                return field;
            }
        };
        if hi - lo < FLAT_EPSILON {
            field.map_in_place(|_| max_height / 2.0);
        } else {
            let span = hi - lo;
            field.map_in_place(|z| (z - lo) / span * max_height);
        }
        field
    }

    pub fn clamp(&self, mut field: Grid) -> Grid {
        field.clamp_in_place(0.0, self.max_height);
        field
    }
}

fn linspace(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let last = (n - 1) as f64;
            (0..n).map(|i| i as f64 / last).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_span_unit_interval() {
        let surface = Surface::new(3, 5, 100.0);
        let field = surface.field(|x, y| x + 10.0 * y);
        assert_eq!(field.get(0, 0), Some(0.0));
        assert_eq!(field.get(0, 4), Some(1.0));
        assert_eq!(field.get(2, 4), Some(11.0));
        assert_eq!(field.get(1, 2), Some(5.5));
    }

    #[test]
    fn test_remap_endpoints() {
        let surface = Surface::new(1, 3, 100.0);
        let field = Grid::from_rows(vec![vec![-1.0, 0.0, 1.0]]).unwrap();
        assert_eq!(surface.remap(field).as_slice(), &[0.0, 50.0, 100.0]);
    }

    #[test]
    fn test_normalize_stretches_range() {
        let surface = Surface::new(1, 3, 100.0);
        let field = Grid::from_rows(vec![vec![2.0, 3.0, 6.0]]).unwrap();
        assert_eq!(surface.normalize(field).as_slice(), &[0.0, 25.0, 100.0]);
    }
}
