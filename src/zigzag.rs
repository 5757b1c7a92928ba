use alloc::vec::Vec;

use crate::error::{CodecError, CodecResult};
use crate::MAX_BLOCK_SIZE;

/// Zig-zag position of every coefficient of an 8x8 block, row-major by `(u, v)`
pub static ZIGZAG_8X8: [u8; 64] = [
    0, 1, 5, 6, 14, 15, 27, 28, 2, 4, 7, 13, 16, 26, 29, 42, 3, 8, 12, 17, 25, 30, 41, 43, 9, 11,
    18, 24, 31, 40, 44, 53, 10, 19, 23, 32, 39, 45, 52, 54, 20, 22, 33, 38, 46, 51, 55, 60, 21, 34,
    37, 47, 50, 56, 59, 61, 35, 36, 48, 49, 57, 58, 62, 63,
];

/// Bijection between `(u, v)` block positions and their zig-zag scan position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZigzagIndex {
    size: usize,
    // scan position of natural index u * size + v
    to_scan: Vec<u16>,
    // natural index of each scan position
    to_natural: Vec<u16>,
}

impl ZigzagIndex {
    /// Builds the JPEG diagonal scan for `size x size` blocks.
    ///
    /// Diagonals `u + v = s` are visited in ascending order. Even diagonals run from bottom-left
    /// to top-right (decreasing `u`), odd ones from top-right to bottom-left.
    pub fn new(size: usize) -> CodecResult<ZigzagIndex> {
        if size == 0 || size > MAX_BLOCK_SIZE {
            return Err(CodecError::InvalidBlockSize(size));
        }
        Ok(Self::build(size))
    }

    pub(crate) fn build(size: usize) -> ZigzagIndex {
        let mut to_natural = Vec::with_capacity(size * size);
        for s in 0..(2 * size - 1) {
            let u_min = s.saturating_sub(size - 1);
            let u_max = s.min(size - 1);

            if s % 2 == 0 {
                for u in (u_min..=u_max).rev() {
                    to_natural.push((u * size + (s - u)) as u16);
                }
            } else {
                for u in u_min..=u_max {
                    to_natural.push((u * size + (s - u)) as u16);
                }
            }
        }

        let mut to_scan = alloc::vec![0u16; size * size];
        for (pos, &natural) in to_natural.iter().enumerate() {
            to_scan[natural as usize] = pos as u16;
        }

        ZigzagIndex {
            size,
            to_scan,
            to_natural,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Scan position of `(u, v)`
    pub fn forward(&self, u: usize, v: usize) -> CodecResult<usize> {
        if u >= self.size || v >= self.size {
            return Err(CodecError::InvalidIndex {
                table: "zig-zag index",
                index: (u, v),
                size: self.size,
            });
        }
        Ok(self.to_scan[u * self.size + v] as usize)
    }

    /// `(u, v)` at scan position `pos`
    pub fn inverse(&self, pos: usize) -> CodecResult<(usize, usize)> {
        match self.to_natural.get(pos) {
            Some(&natural) => {
                let natural = natural as usize;
                Ok((natural / self.size, natural % self.size))
            }
            None => Err(CodecError::InvalidIndex {
                table: "zig-zag scan",
                index: (pos, 0),
                size: self.size * self.size,
            }),
        }
    }

    /// Natural (row-major) index of every scan position
    #[inline]
    pub(crate) fn scan_order(&self) -> &[u16] {
        &self.to_natural
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_jpeg_table() {
        let zigzag = ZigzagIndex::new(8).unwrap();

        for u in 0..8 {
            for v in 0..8 {
                assert_eq!(
                    zigzag.forward(u, v).unwrap(),
                    ZIGZAG_8X8[u * 8 + v] as usize,
                    "({}, {})",
                    u,
                    v
                );
            }
        }
    }

    #[test]
    fn test_known_positions() {
        let zigzag = ZigzagIndex::new(8).unwrap();

        assert_eq!(zigzag.inverse(0).unwrap(), (0, 0));
        assert_eq!(zigzag.inverse(1).unwrap(), (0, 1));
        assert_eq!(zigzag.inverse(2).unwrap(), (1, 0));
        assert_eq!(zigzag.inverse(3).unwrap(), (2, 0));
        assert_eq!(zigzag.inverse(63).unwrap(), (7, 7));
    }

    #[test]
    fn test_bijection() {
        for size in [1, 2, 3, 4, 5, 8, 16] {
            let zigzag = ZigzagIndex::new(size).unwrap();
            let mut seen = vec![false; size * size];

            for u in 0..size {
                for v in 0..size {
                    let pos = zigzag.forward(u, v).unwrap();
                    assert!(!seen[pos], "position {} used twice for size {}", pos, size);
                    seen[pos] = true;
                    assert_eq!(zigzag.inverse(pos).unwrap(), (u, v));
                }
            }
            assert!(seen.iter().all(|&s| s));
        }
    }

    #[test]
    fn test_low_frequencies_first() {
        let zigzag = ZigzagIndex::new(16).unwrap();

        let mut last_diagonal = 0;
        for pos in 0..256 {
            let (u, v) = zigzag.inverse(pos).unwrap();
            assert!(u + v >= last_diagonal);
            last_diagonal = u + v;
        }
    }

    #[test]
    fn test_out_of_range() {
        let zigzag = ZigzagIndex::new(8).unwrap();

        assert!(matches!(
            zigzag.forward(8, 0),
            Err(CodecError::InvalidIndex { .. })
        ));
        assert!(matches!(
            zigzag.inverse(64),
            Err(CodecError::InvalidIndex { .. })
        ));
        assert!(ZigzagIndex::new(0).is_err());
    }
}
