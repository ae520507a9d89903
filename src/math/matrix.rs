use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};

/// Dense row-major matrix of `f64`.
///
/// Every binary operation checks shapes and reports
/// `Error::DimensionMismatch` instead of panicking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a matrix from row vectors. All rows must have the same length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, |row| row.len());
        if let Some(bad) = data.iter().find(|row| row.len() != cols) {
            return Err(Error::mismatch("from_data", (1, cols), (1, bad.len())));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Fills a `rows × cols` matrix with draws from N(0, 1), row by row.
    ///
    /// The generator is passed in so that callers control seeding; two
    /// generators seeded alike yield identical matrices.
    pub fn random_normal<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let data = (0..rows)
            .map(|_| (0..cols).map(|_| rng.sample::<f64, _>(StandardNormal)).collect())
            .collect();
        Matrix { rows, cols, data }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn column(&self, col: usize) -> Option<Vec<f64>> {
        if col >= self.cols {
            return None;
        }
        Some(self.data.iter().map(|row| row[col]).collect())
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Matrix product `self · rhs`.
    pub fn dot(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(Error::mismatch("dot", self.shape(), rhs.shape()));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    /// Adds a `1 × cols` row vector to every row.
    pub fn add_row_broadcast(&self, row: &Matrix) -> Result<Matrix> {
        if row.rows != 1 || row.cols != self.cols {
            return Err(Error::mismatch("add_row_broadcast", self.shape(), row.shape()));
        }
        let bias = &row.data[0];
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|r| r.iter().zip(bias).map(|(x, b)| x + b).collect())
                .collect(),
        })
    }

    pub fn sub(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "sub", |a, b| a - b)
    }

    /// Element-wise (Hadamard) product.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "hadamard", |a, b| a * b)
    }

    /// Column-wise sum, as a `1 × cols` row vector.
    pub fn sum_columns(&self) -> Matrix {
        let mut sums = vec![0.0; self.cols];
        for row in &self.data {
            for (acc, x) in sums.iter_mut().zip(row) {
                *acc += x;
            }
        }
        Matrix {
            rows: 1,
            cols: self.cols,
            data: vec![sums],
        }
    }

    /// Per-column `(min, max)`; `None` for an empty matrix.
    pub fn column_bounds(&self) -> Option<Vec<(f64, f64)>> {
        let first = self.data.first()?;
        let mut bounds: Vec<(f64, f64)> = first.iter().map(|&x| (x, x)).collect();
        for row in &self.data[1..] {
            for ((lo, hi), &x) in bounds.iter_mut().zip(row) {
                *lo = lo.min(x);
                *hi = hi.max(x);
            }
        }
        Some(bounds)
    }

    /// Largest absolute value in the matrix, `0.0` when empty.
    pub fn max_abs(&self) -> f64 {
        self.data
            .iter()
            .flatten()
            .fold(0.0_f64, |acc, &x| acc.max(x.abs()))
    }

    fn zip_with<F>(&self, rhs: &Matrix, op: &'static str, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != rhs.shape() {
            return Err(Error::mismatch(op, self.shape(), rhs.shape()));
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&rhs.data)
                .map(|(ra, rb)| ra.iter().zip(rb).map(|(&a, &b)| f(a, b)).collect())
                .collect(),
        })
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}
