use rand::Rng;

use crate::error::{Error, Result};

/// Dense row-major matrix of `f64`.
///
/// Shape is fixed at creation; every operation returns a new matrix and
/// checks shapes first, failing with [`Error::DimensionMismatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
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
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = data.first().map_or(0, Vec::len);
        if let Some(bad) = data.iter().find(|row| row.len() != cols) {
            return Err(Error::dimensions("from_rows", (1, cols), (1, bad.len())));
        }
        Ok(Matrix {
            rows: data.len(),
            cols,
            data,
        })
    }

    /// Samples every entry uniformly from `[-epsilon, epsilon]`.
    pub fn random_uniform<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        epsilon: f64,
        rng: &mut R,
    ) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for row in &mut res.data {
            for x in row.iter_mut() {
                *x = rng.gen_range(-epsilon..=epsilon);
            }
        }
        res
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

    /// Entry at (`row`, `col`). Panics when out of bounds, like slice indexing.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.iter().map(Vec::as_slice)
    }

    /// Returns a copy with one entry replaced.
    #[cfg(test)]
    pub(crate) fn with_entry(&self, row: usize, col: usize, value: f64) -> Matrix {
        let mut res = self.clone();
        res.data[row][col] = value;
        res
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

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("add", rhs, |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("sub", rhs, |a, b| a - b)
    }

    /// Element-wise (Hadamard) product.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("hadamard", rhs, |a, b| a * b)
    }

    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(Error::dimensions("matmul", self.shape(), rhs.shape()));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        // i-k-j order walks both operands row by row.
        for (out_row, lhs_row) in res.data.iter_mut().zip(&self.data) {
            for (&a, rhs_row) in lhs_row.iter().zip(&rhs.data) {
                for (out, &b) in out_row.iter_mut().zip(rhs_row) {
                    *out += a * b;
                }
            }
        }

        Ok(res)
    }

    /// Prepends a column of ones (bias augmentation).
    pub fn with_bias_column(&self) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols + 1,
            data: self
                .data
                .iter()
                .map(|row| {
                    let mut biased = Vec::with_capacity(row.len() + 1);
                    biased.push(1.0);
                    biased.extend_from_slice(row);
                    biased
                })
                .collect(),
        }
    }

    /// Drops the first row (the bias row of a weight matrix).
    pub fn without_first_row(&self) -> Matrix {
        Matrix {
            rows: self.rows.saturating_sub(1),
            cols: self.cols,
            data: self.data.iter().skip(1).cloned().collect(),
        }
    }

    /// Gathers the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        Matrix {
            rows: indices.len(),
            cols: self.cols,
            data: indices.iter().map(|&i| self.data[i].clone()).collect(),
        }
    }

    /// Mean over all entries; `0.0` for an empty matrix.
    pub fn mean(&self) -> f64 {
        let n = self.rows * self.cols;
        if n == 0 {
            return 0.0;
        }
        self.data.iter().flatten().sum::<f64>() / n as f64
    }

    /// Column index of the maximum of each row. Ties resolve to the lowest index.
    pub fn row_argmax(&self) -> Vec<usize> {
        self.data.iter().map(|row| argmax(row)).collect()
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().flatten().all(|x| x.is_finite())
    }

    fn zip_with<F>(&self, op: &'static str, rhs: &Matrix, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != rhs.shape() {
            return Err(Error::dimensions(op, self.shape(), rhs.shape()));
        }
        let data = self
            .data
            .iter()
            .zip(&rhs.data)
            .map(|(a, b)| a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect())
            .collect();
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix {
            rows: 0,
            cols: 0,
            data: vec![],
        }
    }
}

/// Index of the maximum element; the first one wins on ties, `0` for an empty slice.
pub fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, &x) in v.iter().enumerate().skip(1) {
        if x > v[best] {
            best = i;
        }
    }
    best
}
