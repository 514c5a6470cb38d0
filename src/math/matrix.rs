use rand::Rng;
use std::f64::consts::PI;
use std::ops::{Add, Sub, Mul};

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, Vec::len),
            data
        }
    }

    /// Builds a 1 x n matrix from a single row of values.
    pub fn from_row(values: Vec<f64>) -> Matrix {
        Matrix {
            rows: 1,
            cols: values.len(),
            data: vec![values]
        }
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    /// Both u1 and u2 must be uniform on (0, 1].
    fn sample_standard_normal<R: Rng>(rng: &mut R) -> f64 {
        // Draw two independent uniform samples in (0, 1] to avoid log(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Builds a matrix with every entry drawn independently from N(0, 1).
    ///
    /// The generator is supplied by the caller, so construction is
    /// reproducible with a seeded source such as `StdRng::seed_from_u64`.
    pub fn standard_normal<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = Matrix::sample_standard_normal(rng);
            }
        }
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
        Matrix::from_data(
            (self.data)
                .clone()
                .into_iter()
                .map(|row| row.into_iter().map(|x| functor(x)).collect())
                .collect()
        )
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(self.rows, rhs.rows);
        assert_eq!(self.cols, rhs.cols);
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(row_a, row_b)| row_a.iter().zip(row_b.iter()).map(|(x, y)| x * y).collect())
            .collect();
        Matrix::from_data(data)
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().flatten().sum()
    }

    /// True when both matrices have the same shape and every pair of
    /// entries differs by at most `tolerance`.
    pub fn approx_eq(&self, rhs: &Matrix, tolerance: f64) -> bool {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            return false;
        }
        self.data.iter().zip(rhs.data.iter()).all(|(row_a, row_b)| {
            row_a
                .iter()
                .zip(row_b.iter())
                .all(|(x, y)| (x - y).abs() <= tolerance)
        })
    }

    /// Encodes the matrix into the binary layout embedded in saved models.
    ///
    /// # Layout
    /// ```text
    /// bytes  0-7:   rows (little-endian u64)
    /// bytes  8-15:  cols (little-endian u64)
    /// bytes 16..:   rows * cols f64 values, little-endian, row-major
    /// ```
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(16 + self.rows * self.cols * 8);
        bytes.extend_from_slice(&(self.rows as u64).to_le_bytes());
        bytes.extend_from_slice(&(self.cols as u64).to_le_bytes());
        for row in &self.data {
            for value in row {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
        }
        bytes
    }

    /// Decodes a matrix from the layout written by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Matrix, String> {
        if bytes.len() < 16 {
            return Err(format!(
                "matrix encoding too short: expected at least 16 header bytes, got {}",
                bytes.len()
            ));
        }

        let mut word = [0u8; 8];
        word.copy_from_slice(&bytes[0..8]);
        let rows = u64::from_le_bytes(word) as usize;
        word.copy_from_slice(&bytes[8..16]);
        let cols = u64::from_le_bytes(word) as usize;

        let n_values = rows.checked_mul(cols).ok_or_else(|| {
            format!(
                "matrix encoding: rows * cols overflows usize (rows={}, cols={})",
                rows, cols
            )
        })?;
        let expected_len = n_values
            .checked_mul(8)
            .and_then(|n| n.checked_add(16))
            .ok_or_else(|| {
                format!(
                    "matrix encoding: value section overflows usize (rows={}, cols={})",
                    rows, cols
                )
            })?;
        if bytes.len() != expected_len {
            return Err(format!(
                "matrix encoding: a {}x{} matrix needs {} bytes, got {}",
                rows,
                cols,
                expected_len,
                bytes.len()
            ));
        }

        let mut data = Vec::with_capacity(rows);
        let mut offset = 16;
        for _ in 0..rows {
            let mut row = Vec::with_capacity(cols);
            for _ in 0..cols {
                word.copy_from_slice(&bytes[offset..offset + 8]);
                row.push(f64::from_le_bytes(word));
                offset += 8;
            }
            data.push(row);
        }

        Ok(Matrix { rows, cols, data })
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] + rhs.data[i][j];
            }
        }

        res
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] - rhs.data[i][j];
            }
        }

        res
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res =  Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        res
    }
}
