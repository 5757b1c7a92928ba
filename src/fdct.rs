/*
 * Orthonormal 2-D DCT-II over square blocks of any supported size.
 *
 * basis[u][v][x][y] = (2 / N) * a(u) * a(v)
 *                   * cos((2x + 1) * u * PI / 2N) * cos((2y + 1) * v * PI / 2N)
 *
 * with a(0) = 1 / sqrt(2) and a(n) = 1 otherwise. For N = 8 the leading
 * constant is the familiar 0.25.
 *
 * The 4-D table is the outer product of the 1-D factors
 * c[u][x] = sqrt(2 / N) * a(u) * cos((2x + 1) * u * PI / 2N), so the forward
 * and inverse transforms are done as a pass over rows followed by a pass over
 * columns. Because the basis is orthonormal the inverse uses the same table.
 */

use alloc::vec::Vec;
use core::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::error::{CodecError, CodecResult};
use crate::MAX_BLOCK_SIZE;

/// Precomputed DCT basis functions for one block size
#[derive(Debug, Clone)]
pub struct TransformBasis {
    size: usize,
    // factors[u * size + x], kept in f64 for the separable passes
    factors: Vec<f64>,
    // table[((u * size + v) * size + x) * size + y]
    table: Vec<f32>,
}

#[inline(always)]
fn alpha(n: usize) -> f64 {
    if n == 0 {
        FRAC_1_SQRT_2
    } else {
        1.0
    }
}

impl TransformBasis {
    pub fn new(size: usize) -> CodecResult<TransformBasis> {
        if size == 0 || size > MAX_BLOCK_SIZE {
            return Err(CodecError::InvalidBlockSize(size));
        }
        Ok(Self::build(size))
    }

    // size must already be validated
    pub(crate) fn build(size: usize) -> TransformBasis {
        let n = size as f64;
        let norm = (2.0 / n).sqrt();

        // Computed in f64 and narrowed once so the table is as close to
        // orthonormal as f32 allows.
        let mut factors64 = Vec::with_capacity(size * size);
        for u in 0..size {
            for x in 0..size {
                let angle = (2 * x + 1) as f64 * u as f64 * PI / (2.0 * n);
                factors64.push(norm * alpha(u) * angle.cos());
            }
        }

        let mut table = Vec::with_capacity(size * size * size * size);
        for u in 0..size {
            for v in 0..size {
                for x in 0..size {
                    for y in 0..size {
                        table.push((factors64[u * size + x] * factors64[v * size + y]) as f32);
                    }
                }
            }
        }

        TransformBasis {
            size,
            factors: factors64,
            table,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Contribution of basis function `(u, v)` at spatial position `(x, y)`
    pub fn get(&self, u: usize, v: usize, x: usize, y: usize) -> CodecResult<f32> {
        let n = self.size;
        if u >= n || v >= n {
            return Err(CodecError::InvalidIndex {
                table: "transform basis",
                index: (u, v),
                size: n,
            });
        }
        if x >= n || y >= n {
            return Err(CodecError::InvalidIndex {
                table: "transform basis",
                index: (x, y),
                size: n,
            });
        }
        Ok(self.table[((u * n + v) * n + x) * n + y])
    }

    /// Forward transform of one row-major block.
    ///
    /// * `pixels`: `N * N` intensities, row-major by `(x, y)`.
    /// * `coefficients`: `N * N` outputs, row-major by `(u, v)`.
    /// * `scratch`: `N * N` temporary values.
    ///
    /// Sums are accumulated in `f64`, so exact ties such as `127.5` survive the round trip.
    pub fn forward(&self, pixels: &[f32], coefficients: &mut [f32], scratch: &mut [f64]) {
        let n = self.size;
        debug_assert_eq!(pixels.len(), n * n);
        debug_assert_eq!(coefficients.len(), n * n);
        debug_assert_eq!(scratch.len(), n * n);

        // Pass 1: rows. scratch[x][v] = sum_y pixels[x][y] * c[v][y]
        for x in 0..n {
            let row = &pixels[x * n..(x + 1) * n];
            for v in 0..n {
                let c = &self.factors[v * n..(v + 1) * n];
                scratch[x * n + v] = row.iter().zip(c).map(|(&p, c)| f64::from(p) * c).sum();
            }
        }

        // Pass 2: columns. coefficients[u][v] = sum_x c[u][x] * scratch[x][v]
        for u in 0..n {
            let c = &self.factors[u * n..(u + 1) * n];
            for v in 0..n {
                let mut acc = 0.0f64;
                for x in 0..n {
                    acc += c[x] * scratch[x * n + v];
                }
                coefficients[u * n + v] = acc as f32;
            }
        }
    }

    /// Inverse transform of one row-major coefficient block.
    ///
    /// The mirror of [forward](Self::forward), uses the same scratch layout.
    pub fn inverse(&self, coefficients: &[f32], pixels: &mut [f32], scratch: &mut [f64]) {
        let n = self.size;
        debug_assert_eq!(pixels.len(), n * n);
        debug_assert_eq!(coefficients.len(), n * n);
        debug_assert_eq!(scratch.len(), n * n);

        // scratch[u][y] = sum_v coefficients[u][v] * c[v][y]
        for u in 0..n {
            let row = &coefficients[u * n..(u + 1) * n];
            for y in 0..n {
                let mut acc = 0.0f64;
                for v in 0..n {
                    acc += f64::from(row[v]) * self.factors[v * n + y];
                }
                scratch[u * n + y] = acc;
            }
        }

        // pixels[x][y] = sum_u c[u][x] * scratch[u][y]
        for x in 0..n {
            for y in 0..n {
                let mut acc = 0.0f64;
                for u in 0..n {
                    acc += self.factors[u * n + x] * scratch[u * n + y];
                }
                pixels[x * n + y] = acc as f32;
            }
        }
    }

    /// Forward transform as the direct sum over the full basis table.
    ///
    /// Reference for the separable path; roughly `N²` times slower.
    #[cfg(any(test, feature = "benchmark"))]
    pub fn forward_direct(&self, pixels: &[f32], coefficients: &mut [f32]) {
        let n = self.size;
        let nn = n * n;
        for (uv, out) in coefficients.iter_mut().enumerate().take(nn) {
            let basis = &self.table[uv * nn..(uv + 1) * nn];
            *out = pixels.iter().zip(basis).map(|(p, b)| p * b).sum();
        }
    }
}
