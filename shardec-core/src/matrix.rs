//! Encode and decode matrices
//!
//! The systematic Cauchy encode matrix reproduces ISA-L's
//! `gf_gen_cauchy1_matrix` layout byte for byte: identity rows for
//! the k source fragments, `inv(i ^ j)` coefficients for the parity
//! rows. Any k rows of it form an invertible submatrix, which is what
//! makes any k surviving fragments sufficient for recovery.
//!
//! [`DecodePlan::build`] turns an erasure set into the coefficient
//! rows that reconstruct exactly the missing fragments from the
//! lowest-indexed k survivors.

use crate::error::{Result, ShardecError};
use crate::gf;
use crate::params::CodeParams;

/// Flat row-major byte matrix over GF(2^8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl Matrix {
    /// All-zero matrix.
    pub fn zero(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// n x n identity.
    pub fn identity(n: usize) -> Self {
        let mut mat = Self::zero(n, n);
        for i in 0..n {
            mat.data[i * n + i] = 1;
        }
        mat
    }

    /// Systematic m x k Cauchy encode matrix.
    ///
    /// Rows `0..k` are the identity (source fragments pass through
    /// unmodified); rows `k..m` hold `inv(i ^ j)`. Pure function of
    /// `(m, k)`, so concurrent workers may regenerate or share it
    /// freely.
    pub fn cauchy(m: usize, k: usize) -> Self {
        let mut mat = Self::zero(m, k);
        for i in 0..k {
            mat.data[i * k + i] = 1;
        }
        for i in k..m {
            for j in 0..k {
                mat.data[i * k + j] = gf::inv((i as u8) ^ (j as u8));
            }
        }
        mat
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        assert!(row < self.rows && col < self.cols, "matrix index out of bounds");
        self.data[row * self.cols + col]
    }

    /// One row as a slice.
    pub fn row(&self, row: usize) -> &[u8] {
        assert!(row < self.rows, "matrix row out of bounds");
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Contiguous slice of rows `from..rows` (e.g. the parity rows of
    /// an encode matrix, `rows_from(k)`).
    pub fn rows_from(&self, from: usize) -> &[u8] {
        assert!(from <= self.rows, "matrix row out of bounds");
        &self.data[from * self.cols..]
    }

    /// Whole matrix as flat row-major bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Gauss-Jordan inverse over GF(2^8) with row-swap pivoting.
    ///
    /// `SingularMatrix` here means the caller handed us rows that are
    /// not linearly independent; for a Cauchy submatrix that is an
    /// internal-consistency defect, never a user-input error.
    pub fn inverted(&self) -> Result<Matrix> {
        assert_eq!(self.rows, self.cols, "only square matrices can be inverted");
        let n = self.cols;
        let mut work = self.data.clone();
        let mut out = Matrix::identity(n);

        for i in 0..n {
            if work[i * n + i] == 0 {
                let pivot = (i + 1..n)
                    .find(|&r| work[r * n + i] != 0)
                    .ok_or(ShardecError::SingularMatrix)?;
                for c in 0..n {
                    work.swap(i * n + c, pivot * n + c);
                    out.data.swap(i * n + c, pivot * n + c);
                }
            }

            let scale = gf::inv(work[i * n + i]);
            for c in 0..n {
                work[i * n + c] = gf::mul(work[i * n + c], scale);
                out.data[i * n + c] = gf::mul(out.data[i * n + c], scale);
            }

            for r in 0..n {
                if r == i {
                    continue;
                }
                let factor = work[r * n + i];
                if factor == 0 {
                    continue;
                }
                for c in 0..n {
                    work[r * n + c] ^= gf::mul(factor, work[i * n + c]);
                    out.data[r * n + c] ^= gf::mul(factor, out.data[i * n + c]);
                }
            }
        }
        Ok(out)
    }
}

/// Coefficients and input selection for one decode operation.
///
/// `matrix` rows follow the order of the erasure set handed to
/// [`DecodePlan::build`]; `decode_index` lists the k surviving
/// fragment indices that serve as recombine inputs, lowest first.
/// Built per decode, consumed once, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodePlan {
    pub matrix: Matrix,
    pub decode_index: Vec<usize>,
}

impl DecodePlan {
    /// Derive the decode matrix for the given erasure set.
    ///
    /// Survivor selection is deterministic: scan `0..m` ascending and
    /// take the first k indices not in the erasure set. Missing source
    /// rows come straight out of the inverted submatrix; missing
    /// parity rows are re-derived as the encode row times the inverse.
    pub fn build(encode: &Matrix, params: &CodeParams, missing: &[usize]) -> Result<Self> {
        let k = params.data_fragments;
        let m = params.total();
        debug_assert_eq!(encode.rows(), m);
        debug_assert_eq!(encode.cols(), k);

        if missing.len() > params.max_failures() {
            return Err(ShardecError::TooManyErasures {
                lost: missing.len(),
                max: params.max_failures(),
            });
        }

        let mut in_err = vec![false; m];
        for &e in missing {
            assert!(e < m, "erasure index out of range");
            in_err[e] = true;
        }

        // Submatrix of the rows that encoded the surviving fragments,
        // lowest index first.
        let mut sub = Matrix::zero(k, k);
        let mut decode_index = Vec::with_capacity(k);
        let mut r = 0;
        for i in 0..k {
            while in_err[r] {
                r += 1;
            }
            sub.data[i * k..(i + 1) * k].copy_from_slice(encode.row(r));
            decode_index.push(r);
            r += 1;
        }

        let inverse = sub.inverted()?;

        let mut matrix = Matrix::zero(missing.len(), k);
        for (row, &e) in missing.iter().enumerate() {
            if e < k {
                // missing source fragment: its recovery row is the
                // inverse row at that position
                matrix.data[row * k..(row + 1) * k].copy_from_slice(inverse.row(e));
            } else {
                // missing parity fragment: re-derive its linear
                // combination in terms of the survivors
                for c in 0..k {
                    let mut s = 0;
                    for j in 0..k {
                        s ^= gf::mul(inverse.get(j, c), encode.get(e, j));
                    }
                    matrix.data[row * k + c] = s;
                }
            }
        }

        Ok(Self {
            matrix,
            decode_index,
        })
    }
}
