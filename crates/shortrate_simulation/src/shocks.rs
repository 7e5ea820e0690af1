//! Externally supplied standard-normal shocks.

use shortrate_core::types::ValidationError;

/// Shock matrix with one row per time step and one column per path.
///
/// Stored row-major. Every entry is finite.
///
/// # Examples
///
/// ```rust
/// use shortrate_simulation::ShockMatrix;
///
/// let shocks = ShockMatrix::from_rows(vec![vec![0.1, -0.2], vec![1.5, 0.0]]).unwrap();
/// assert_eq!((shocks.rows(), shocks.cols()), (2, 2));
/// assert_eq!(shocks.get(1, 0), Some(1.5));
///
/// assert!(ShockMatrix::from_rows(vec![vec![0.1, -0.2], vec![1.5]]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ShockMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ShockMatrix {
    /// Build from row-major `data` of shape `rows × cols`.
    ///
    /// # Errors
    ///
    /// * `ValidationError::ShockShapeMismatch` - `data.len() != rows·cols`
    /// * `ValidationError::NonFiniteShock` - a NaN or infinite entry
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, ValidationError> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(ValidationError::ShockShapeMismatch {
                expected_rows: rows,
                expected_cols: cols,
                rows: if cols == 0 { data.len() } else { data.len() / cols },
                cols,
            });
        }
        if let Some(k) = data.iter().position(|z| !z.is_finite()) {
            return Err(ValidationError::NonFiniteShock {
                row: k / cols,
                col: k % cols,
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build from nested rows.
    ///
    /// # Errors
    ///
    /// * `ValidationError::RaggedShocks` - rows of different lengths
    /// * `ValidationError::NonFiniteShock` - a NaN or infinite entry
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ValidationError> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(ValidationError::RaggedShocks {
                row,
                len: r.len(),
                expected: cols,
            });
        }
        let n = rows.len();
        Self::from_vec(n, cols, rows.into_iter().flatten().collect())
    }

    /// Number of rows (time steps).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (paths).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Shock for step `row` of path `col`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Shocks of time step `row` across all paths.
    #[inline]
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        (row < self.rows).then(|| &self.data[row * self.cols..(row + 1) * self.cols])
    }

    /// Row-major entries.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Check the shape against `(rows, cols)`.
    ///
    /// # Errors
    ///
    /// `ValidationError::ShockShapeMismatch` on any difference.
    pub fn check_shape(&self, rows: usize, cols: usize) -> Result<(), ValidationError> {
        if self.rows == rows && self.cols == cols {
            Ok(())
        } else {
            Err(ValidationError::ShockShapeMismatch {
                expected_rows: rows,
                expected_cols: cols,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }
}
